/// Simulation tick counter. Tick 0 is "before the first step".
pub type Tick = u64;
