//! # Scoreline
//!
//! Tick-driven, per-viewer sidebar panels.
//!
//! Scoreline keeps thousands of live sidebars (a title plus up to fifteen
//! rows each) up to date from one cooperative scheduler loop instead of one
//! timer per row.
//!
//! ## Core Concepts
//!
//! - **Heartbeat**: a single tick loop runs due tasks in order, then flushes
//!   each panel once, so a renderer sees at most one write per slot per tick
//! - **Shared animations**: identical animations are deduplicated in a cache
//!   and advance once per tick however many rows display them
//! - **Line splitting**: rows are split into a 16-character identifier and an
//!   overflow segment without losing style at the cut
//! - **Renderer sink**: transports plug in behind the [`Renderer`] trait
//!
//! ## Example
//!
//! ```rust
//! use scoreline::{AnimationCache, Heartbeat, PanelManager, RecordingRenderer, ViewerId};
//! use std::sync::Arc;
//!
//! let heartbeat = Arc::new(Heartbeat::new());
//! let renderer = Arc::new(RecordingRenderer::new());
//! let manager = PanelManager::new(Arc::clone(&heartbeat), renderer.clone());
//!
//! let panel = manager.create(ViewerId(1)).unwrap();
//! let spinner = manager.cache().get_or_create_legacy(&["&e|", "&e/", "&e-", "&e\\"], 2).unwrap();
//! panel.lock().set_title_text("&6&lArena").unwrap();
//! panel.lock().set_animated_line(1, spinner.into()).unwrap();
//!
//! heartbeat.start().unwrap();
//! for _ in 0..10 {
//!     heartbeat.tick().unwrap();
//! }
//! assert!(renderer.len() > 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod animation;
pub mod config;
pub mod context;
pub mod error;
pub mod panel;
pub mod placeholder;
pub mod render;
pub mod scheduler;
pub mod text;

// Re-exports for convenience
pub use animation::{Animation, AnimationCache, ExclusiveAnimation, SharedAnimation, SharedAnimationRef};
pub use config::Config;
pub use context::UpdateContext;
pub use error::{ConfigError, Error, RenderError, ResolveError, Result};
pub use panel::{Panel, PanelHandle, PanelManager, Row, Slot, SlotKind, ViewerId};
pub use placeholder::{NoPlaceholders, PlaceholderResolver};
pub use render::{NullRenderer, RecordedCall, RecordingRenderer, Renderer, TerminalRenderer};
pub use scheduler::{Heartbeat, ScheduledTask, SchedulerHandle, TickReport, TickSource};
pub use text::{Decorations, NamedColor, Rgb, SplitResult, Style, StyledText, TextColor};
