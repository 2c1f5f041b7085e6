//! Recording renderer: keeps every call in memory.
//!
//! Useful for hosts that poll panel state instead of pushing it, and for tests.

use super::Renderer;
use crate::error::RenderError;
use crate::panel::{Slot, ViewerId};
use crate::text::StyledText;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// One renderer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    /// A `render` call.
    Render {
        /// Target viewer.
        viewer: ViewerId,
        /// Target slot.
        slot: Slot,
        /// Identifier segment (or whole title).
        head: StyledText,
        /// Overflow segment.
        tail: StyledText,
        /// Badge override.
        badge: Option<StyledText>,
    },
    /// A `clear` call.
    Clear {
        /// Target viewer.
        viewer: ViewerId,
        /// Target slot.
        slot: Slot,
    },
}

impl RecordedCall {
    /// The slot the call targeted.
    pub const fn slot(&self) -> Slot {
        match self {
            Self::Render { slot, .. } | Self::Clear { slot, .. } => *slot,
        }
    }

    /// The viewer the call targeted.
    pub const fn viewer(&self) -> ViewerId {
        match self {
            Self::Render { viewer, .. } | Self::Clear { viewer, .. } => *viewer,
        }
    }
}

/// Renderer that records calls.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: Mutex<Vec<RecordedCall>>,
    failing: AtomicBool,
}

impl RecordingRenderer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (and not be recorded) until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Take and clear the recorded calls.
    pub fn take(&self) -> Vec<RecordedCall> {
        std::mem::take(&mut *self.calls.lock())
    }

    /// Copy of the recorded calls.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Number of recorded calls.
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    fn record(&self, call: RecordedCall) -> Result<(), RenderError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(RenderError(format!("refusing write to {}", call.slot())));
        }
        self.calls.lock().push(call);
        Ok(())
    }
}

impl Renderer for RecordingRenderer {
    fn render(
        &self,
        viewer: ViewerId,
        slot: Slot,
        head: &StyledText,
        tail: &StyledText,
        badge: Option<&StyledText>,
    ) -> Result<(), RenderError> {
        self.record(RecordedCall::Render {
            viewer,
            slot,
            head: head.clone(),
            tail: tail.clone(),
            badge: badge.cloned(),
        })
    }

    fn clear(&self, viewer: ViewerId, slot: Slot) -> Result<(), RenderError> {
        self.record(RecordedCall::Clear { viewer, slot })
    }
}
