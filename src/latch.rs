use crate::board::Direction;

/// Holds the most recent steering intent between ticks.
///
/// Any number of key presses may arrive between two ticks; only the last
/// acceptable one is committed when the engine asks for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputLatch {
    committed: Direction,
    latched: Direction,
}

impl InputLatch {
    pub fn new(initial: Direction) -> Self {
        InputLatch {
            committed: initial,
            latched: initial,
        }
    }

    /// Latch `candidate` unless it would turn the snake straight back onto
    /// its neck.
    pub fn record_direction(&mut self, candidate: Direction) -> bool {
        if candidate == self.committed.opposite() {
            return false;
        }
        self.latched = candidate;
        true
    }

    /// Commit the latched direction for this tick. The latch keeps its value.
    pub fn consume_latched(&mut self) -> Direction {
        self.committed = self.latched;
        self.committed
    }

    pub fn committed(&self) -> Direction {
        self.committed
    }
}
