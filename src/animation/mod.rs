//! Animations: frame sequences advanced by the scheduler.
//!
//! Two variants exist:
//! - [`ExclusiveAnimation`]: one cursor owned by exactly one row or title.
//! - [`SharedAnimationRef`]: a subscription to a [`SharedAnimation`] held in
//!   an [`AnimationCache`]; every subscriber sees the same cursor.
//!
//! Advancing either variant is a pure rotation: `index = (index + 1) % len`.

mod cache;

pub use cache::{AnimationCache, AnimationKey, SharedAnimation, SharedAnimationRef};

use crate::error::{Error, Result};
use crate::text::{legacy, StyledText};
use std::sync::Arc;

/// Validate frames and interval before any animation or cache work.
pub(crate) fn validate(frames: &[StyledText], interval_ticks: u32) -> Result<()> {
    if frames.is_empty() {
        return Err(Error::InvalidArgument("animation frames must not be empty"));
    }
    if interval_ticks == 0 {
        return Err(Error::InvalidArgument("animation interval must be positive"));
    }
    Ok(())
}

/// An animation with its own private cursor.
#[derive(Debug, Clone)]
pub struct ExclusiveAnimation {
    frames: Arc<[StyledText]>,
    interval_ticks: u32,
    index: usize,
}

impl ExclusiveAnimation {
    /// Create from styled frames.
    pub fn new(frames: Vec<StyledText>, interval_ticks: u32) -> Result<Self> {
        validate(&frames, interval_ticks)?;
        Ok(Self {
            frames: frames.into(),
            interval_ticks,
            index: 0,
        })
    }

    /// Create from legacy `&`-coded strings.
    pub fn from_legacy<S: AsRef<str>>(frames: &[S], interval_ticks: u32) -> Result<Self> {
        Self::new(
            frames.iter().map(|frame| legacy::parse(frame.as_ref())).collect(),
            interval_ticks,
        )
    }

    /// Return the frame at the cursor, then rotate the cursor.
    pub fn next_frame(&mut self) -> StyledText {
        let frame = self.frames[self.index].clone();
        self.index = (self.index + 1) % self.frames.len();
        frame
    }

    /// Ticks between frames.
    pub const fn interval_ticks(&self) -> u32 {
        self.interval_ticks
    }

    /// Current cursor position.
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Number of frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// Content for an animated row or title.
#[derive(Debug)]
pub enum Animation {
    /// Private cursor.
    Exclusive(ExclusiveAnimation),
    /// Subscription to a cached shared cursor.
    Shared(SharedAnimationRef),
}

impl Animation {
    /// Ticks between frames.
    pub fn interval_ticks(&self) -> u32 {
        match self {
            Self::Exclusive(animation) => animation.interval_ticks(),
            Self::Shared(shared) => shared.interval_ticks(),
        }
    }

    /// Return the frame at the cursor, then rotate the cursor.
    pub fn next_frame(&mut self) -> StyledText {
        match self {
            Self::Exclusive(animation) => animation.next_frame(),
            Self::Shared(shared) => shared.next_frame(),
        }
    }
}

impl From<ExclusiveAnimation> for Animation {
    fn from(animation: ExclusiveAnimation) -> Self {
        Self::Exclusive(animation)
    }
}

impl From<SharedAnimationRef> for Animation {
    fn from(shared: SharedAnimationRef) -> Self {
        Self::Shared(shared)
    }
}
