/// Duration in whole milliseconds.
///
/// Game configs express pacing in milliseconds; the simulation runs on
/// integer ticks. Conversion floors, except that any nonzero duration
/// maps to at least one tick so a configured delay can never vanish.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Millis(u64);

impl Millis {
    const MILLIS_PER_SEC: u64 = 1_000;

    /// Create from whole seconds.
    pub const fn from_secs(secs: u32) -> Self {
        Self(secs as u64 * Self::MILLIS_PER_SEC)
    }

    /// Create from whole milliseconds.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Convert to tick count at the given tick rate.
    ///
    /// Formula: ticks = (millis * tick_hz) / 1000, floored.
    /// A nonzero duration shorter than one tick yields 1.
    pub const fn to_ticks(self, tick_hz: u32) -> u64 {
        let ticks = self.0 * tick_hz as u64 / Self::MILLIS_PER_SEC;
        if ticks == 0 && self.0 > 0 {
            1
        } else {
            ticks
        }
    }
}
