//! Renderer sink: the transport that paints slots onto a viewer's client.
//!
//! The core never talks to a client directly. It hands each slot's shaped
//! content to a [`Renderer`] once per tick at most, and treats any failure as
//! a best-effort miss.

mod recording;
mod terminal;

pub use recording::{RecordedCall, RecordingRenderer};
pub use terminal::TerminalRenderer;

use crate::error::RenderError;
use crate::panel::{Slot, ViewerId};
use crate::text::StyledText;

/// Transport-specific writer of slot content.
///
/// Both methods must be idempotent for identical arguments.
pub trait Renderer: Send + Sync {
    /// Write or replace one slot.
    ///
    /// For rows, `head` is the identifier-sized segment and `tail` the
    /// overflow. For the title, `head` is the whole title and `tail` is empty.
    /// `badge` is the row's numeric-badge override; `None` hides the badge.
    fn render(
        &self,
        viewer: ViewerId,
        slot: Slot,
        head: &StyledText,
        tail: &StyledText,
        badge: Option<&StyledText>,
    ) -> Result<(), RenderError>;

    /// Remove one slot.
    fn clear(&self, viewer: ViewerId, slot: Slot) -> Result<(), RenderError>;
}

/// A renderer that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&self, _: ViewerId, _: Slot, _: &StyledText, _: &StyledText, _: Option<&StyledText>) -> Result<(), RenderError> {
        Ok(())
    }

    fn clear(&self, _: ViewerId, _: Slot) -> Result<(), RenderError> {
        Ok(())
    }
}
