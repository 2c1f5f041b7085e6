//! Animation cache: one shared cursor per distinct (frames, interval).
//!
//! Panels that animate identical content subscribe to the same
//! [`SharedAnimation`], so the cursor is advanced once per tick no matter how
//! many rows display it. Subscriptions are reference counted through
//! [`SharedAnimationRef`]; dropping the last one evicts the entry.

use super::validate;
use crate::error::Result;
use crate::text::{legacy, StyledText};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

/// Cache key: an immutable snapshot of the frames plus the interval.
///
/// Equality is element-wise over frames (style included) and the interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnimationKey {
    frames: Arc<[StyledText]>,
    interval_ticks: u32,
}

impl AnimationKey {
    /// Snapshot `frames` into a key.
    pub fn new(frames: &[StyledText], interval_ticks: u32) -> Self {
        Self {
            frames: frames.into(),
            interval_ticks,
        }
    }

    /// The frames.
    pub fn frames(&self) -> &[StyledText] {
        &self.frames
    }

    /// Ticks between frames.
    pub const fn interval_ticks(&self) -> u32 {
        self.interval_ticks
    }
}

#[derive(Debug, Default)]
struct Cursor {
    /// Next frame to hand out.
    index: usize,
    /// Earliest tick the cursor may rotate again; `None` until started.
    next_advance: Option<u64>,
    /// Frame most recently handed out.
    shown: usize,
}

/// A frame cursor shared by every subscriber with the same key.
#[derive(Debug)]
pub struct SharedAnimation {
    key: AnimationKey,
    cursor: Mutex<Cursor>,
    subscribers: AtomicUsize,
}

impl SharedAnimation {
    fn new(key: AnimationKey) -> Self {
        Self {
            key,
            cursor: Mutex::new(Cursor::default()),
            subscribers: AtomicUsize::new(0),
        }
    }

    /// The cache key.
    pub const fn key(&self) -> &AnimationKey {
        &self.key
    }

    /// Ticks between frames.
    pub const fn interval_ticks(&self) -> u32 {
        self.key.interval_ticks
    }

    /// Number of frames.
    pub fn frame_count(&self) -> usize {
        self.key.frames.len()
    }

    /// Current cursor position.
    pub fn index(&self) -> usize {
        self.cursor.lock().index
    }

    /// Live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.load(Ordering::Acquire)
    }

    /// Return the frame at the cursor, then rotate the shared cursor.
    ///
    /// Every call advances exactly once, whichever subscriber makes it.
    pub fn next_frame(&self) -> StyledText {
        let mut cursor = self.cursor.lock();
        self.rotate(&mut cursor)
    }

    /// The frame at the cursor, without advancing.
    pub fn current_frame(&self) -> StyledText {
        let cursor = self.cursor.lock();
        self.key.frames[cursor.index].clone()
    }

    /// Advance at most once per interval.
    ///
    /// The first caller at or after the next advance tick rotates the cursor.
    /// Every other caller receives the frame already shown, so subscribers
    /// firing on different phases still display the same frame and the
    /// cursor moves once per interval however many of them there are.
    pub fn frame_for_tick(&self, tick: u64) -> StyledText {
        let mut cursor = self.cursor.lock();
        if cursor.next_advance.is_some_and(|next| tick < next) {
            return self.key.frames[cursor.shown].clone();
        }
        cursor.next_advance = Some(tick + u64::from(self.key.interval_ticks));
        self.rotate(&mut cursor)
    }

    /// The frame subscribers are currently displaying.
    ///
    /// If no tick has advanced the cursor yet, this starts the animation on
    /// `tick` exactly as [`frame_for_tick`](Self::frame_for_tick) would.
    pub fn displayed_frame(&self, tick: u64) -> StyledText {
        let mut cursor = self.cursor.lock();
        if cursor.next_advance.is_some() {
            return self.key.frames[cursor.shown].clone();
        }
        // The first scheduled task may land on an aligned tick before a full interval passes
        cursor.next_advance = Some(tick + 1);
        self.rotate(&mut cursor)
    }

    fn rotate(&self, cursor: &mut Cursor) -> StyledText {
        let index = cursor.index;
        cursor.shown = index;
        cursor.index = (index + 1) % self.key.frames.len();
        self.key.frames[index].clone()
    }
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: Mutex<HashMap<AnimationKey, Arc<SharedAnimation>>>,
}

impl CacheInner {
    fn release(&self, animation: &Arc<SharedAnimation>) {
        let mut entries = self.entries.lock();
        let previous = animation.subscribers.fetch_sub(1, Ordering::AcqRel);
        if previous == 1
            && entries
                .get(&animation.key)
                .is_some_and(|entry| Arc::ptr_eq(entry, animation))
        {
            entries.remove(&animation.key);
            debug!(frames = animation.frame_count(), interval = animation.interval_ticks(), "evicted shared animation");
        }
    }
}

/// Deduplicating store of shared animations.
///
/// Cloning the cache yields another handle to the same store.
#[derive(Debug, Clone, Default)]
pub struct AnimationCache {
    inner: Arc<CacheInner>,
}

impl AnimationCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to the shared animation for `(frames, interval_ticks)`,
    /// creating it if absent.
    ///
    /// Equal keys always yield the same [`SharedAnimation`], even under
    /// concurrent calls.
    pub fn get_or_create(&self, frames: &[StyledText], interval_ticks: u32) -> Result<SharedAnimationRef> {
        validate(frames, interval_ticks)?;
        let key = AnimationKey::new(frames, interval_ticks);

        let mut entries = self.inner.entries.lock();
        let animation = Arc::clone(
            entries
                .entry(key)
                .or_insert_with_key(|key| Arc::new(SharedAnimation::new(key.clone()))),
        );
        animation.subscribers.fetch_add(1, Ordering::AcqRel);
        drop(entries);

        Ok(SharedAnimationRef {
            animation,
            cache: Arc::downgrade(&self.inner),
        })
    }

    /// [`get_or_create`](Self::get_or_create) from legacy `&`-coded strings.
    pub fn get_or_create_legacy<S: AsRef<str>>(
        &self,
        frames: &[S],
        interval_ticks: u32,
    ) -> Result<SharedAnimationRef> {
        let frames: Vec<StyledText> = frames.iter().map(|frame| legacy::parse(frame.as_ref())).collect();
        self.get_or_create(&frames, interval_ticks)
    }

    /// Look up an entry without subscribing.
    pub fn lookup(&self, frames: &[StyledText], interval_ticks: u32) -> Option<Arc<SharedAnimation>> {
        let key = AnimationKey::new(frames, interval_ticks);
        self.inner.entries.lock().get(&key).cloned()
    }

    /// Release a subscription. Equivalent to dropping it.
    pub fn release(&self, subscription: SharedAnimationRef) {
        drop(subscription);
    }

    /// Number of cached animations.
    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    /// Whether the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.lock().is_empty()
    }
}

/// One subscription to a [`SharedAnimation`].
///
/// Dropping it decrements the subscriber count; the last drop evicts the
/// animation from its cache.
#[derive(Debug)]
pub struct SharedAnimationRef {
    animation: Arc<SharedAnimation>,
    cache: Weak<CacheInner>,
}

impl SharedAnimationRef {
    /// The shared animation.
    pub const fn animation(&self) -> &Arc<SharedAnimation> {
        &self.animation
    }

    /// Ticks between frames.
    pub fn interval_ticks(&self) -> u32 {
        self.animation.interval_ticks()
    }

    /// See [`SharedAnimation::next_frame`].
    pub fn next_frame(&self) -> StyledText {
        self.animation.next_frame()
    }

    /// See [`SharedAnimation::current_frame`].
    pub fn current_frame(&self) -> StyledText {
        self.animation.current_frame()
    }

    /// See [`SharedAnimation::frame_for_tick`].
    pub fn frame_for_tick(&self, tick: u64) -> StyledText {
        self.animation.frame_for_tick(tick)
    }

    /// See [`SharedAnimation::displayed_frame`].
    pub fn displayed_frame(&self, tick: u64) -> StyledText {
        self.animation.displayed_frame(tick)
    }

    /// Live subscriptions to the underlying animation.
    pub fn subscriber_count(&self) -> usize {
        self.animation.subscriber_count()
    }
}

impl Clone for SharedAnimationRef {
    fn clone(&self) -> Self {
        // The source subscription keeps the count above zero, so no eviction can race.
        self.animation.subscribers.fetch_add(1, Ordering::AcqRel);
        Self {
            animation: Arc::clone(&self.animation),
            cache: Weak::clone(&self.cache),
        }
    }
}

impl Drop for SharedAnimationRef {
    fn drop(&mut self) {
        match self.cache.upgrade() {
            Some(inner) => inner.release(&self.animation),
            None => {
                self.animation.subscribers.fetch_sub(1, Ordering::AcqRel);
            }
        }
    }
}
