use crate::types::Tick;

#[derive(Clone, Debug)]
pub struct CommandEnvelope<C> {
    pub intended_tick: Tick,
    pub payload: C,
}
