//! Text module: styled text and the operations that shape it for display.
//!
//! This module contains:
//! - [`StyledText`]: Immutable tree of styled runs
//! - [`Style`]: Colour and tri-state decorations
//! - [`legacy`]: `&`-code parser for raw strings
//! - [`split`]: Identifier/overflow splitting with style continuity

mod style;
mod styled;
pub mod legacy;
pub mod split;

pub use style::{Decorations, NamedColor, Rgb, Style, TextColor};
pub use styled::{Run, StyledText};
pub use split::{split, SplitResult, IDENTIFIER_BUDGET, SEGMENT_BUDGET};
