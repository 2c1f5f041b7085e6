//! Update context: the one thread allowed to mutate panels and drive ticks.

use crate::error::{Error, Result};
use std::thread::{self, ThreadId};

/// Identity of the host's update thread, captured once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateContext {
    owner: ThreadId,
}

impl UpdateContext {
    /// Capture the calling thread as the update thread.
    pub fn current() -> Self {
        Self {
            owner: thread::current().id(),
        }
    }

    /// The captured thread.
    pub const fn owner(&self) -> ThreadId {
        self.owner
    }

    /// Whether the calling thread is the update thread.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Fail with [`Error::WrongThread`] unless called on the update thread.
    pub fn ensure(&self) -> Result<()> {
        let actual = thread::current().id();
        if actual == self.owner {
            Ok(())
        } else {
            Err(Error::WrongThread {
                expected: self.owner,
                actual,
            })
        }
    }
}
