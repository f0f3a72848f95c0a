//! Nullable clock: deterministic block headers for testing.

use foundation::BlockHeader;
use foundation_types::Timestamp;
use std::cell::Cell;

/// A deterministic block clock.
///
/// Time only advances when you tell it to. Every advance also moves to the
/// next block height.
pub struct NullClock {
    height: Cell<u64>,
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            height: Cell::new(1),
            current: Cell::new(initial_secs),
        }
    }

    /// Get the current time.
    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.get())
    }

    pub fn height(&self) -> u64 {
        self.height.get()
    }

    /// Header of the current block.
    pub fn header(&self) -> BlockHeader {
        BlockHeader {
            height: self.height(),
            time: self.now(),
        }
    }

    /// Advance time by a number of seconds and move to the next block.
    pub fn advance(&self, secs: u64) {
        self.current.set(self.current.get() + secs);
        self.height.set(self.height.get() + 1);
    }

    /// Set the time to a specific value.
    pub fn set(&self, secs: u64) {
        self.current.set(secs);
    }
}
