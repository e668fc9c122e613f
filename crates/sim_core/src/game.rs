use crate::envelope::CommandEnvelope;
use crate::types::Tick;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminalOutcome {
    Victory,
    Defeat,
}

pub trait Game: Sized {
    type Config: Clone + Send + Sync + 'static;
    type Command: Clone + Send + Sync + 'static;
    type Observation: Clone + Send + Sync + 'static;
    type Event: Clone + Send + Sync + 'static;

    fn new(config: Self::Config, seed: u64) -> Self;

    fn step(
        &mut self,
        tick: Tick,
        commands: &[CommandEnvelope<Self::Command>],
        out_events: &mut Vec<Self::Event>,
    );

    fn observe(&self, tick: Tick) -> Self::Observation;

    fn is_terminal(&self) -> Option<TerminalOutcome>;
}
