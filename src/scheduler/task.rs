//! Scheduled update tasks.

use crate::panel::{Row, Slot, ViewerId};
use std::sync::Arc;

/// What a task does when it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    /// Resolve placeholders in `raw` and show it on `row`.
    RowReEvaluate {
        /// Target row.
        row: Row,
        /// Unresolved text.
        raw: Arc<str>,
    },
    /// Show the next frame of the animation on `row`.
    RowAnimationAdvance {
        /// Target row.
        row: Row,
    },
    /// Resolve placeholders in `raw` and show it as the title.
    TitleReEvaluate {
        /// Unresolved text.
        raw: Arc<str>,
    },
    /// Show the next frame of the title animation.
    TitleAnimationAdvance,
}

impl TaskKind {
    /// The slot this task writes to.
    pub const fn slot(&self) -> Slot {
        match self {
            Self::RowReEvaluate { row, .. } | Self::RowAnimationAdvance { row } => Slot::Row(*row),
            Self::TitleReEvaluate { .. } | Self::TitleAnimationAdvance => Slot::Title,
        }
    }

    /// Build the re-evaluate task for `slot`.
    pub fn re_evaluate(slot: Slot, raw: Arc<str>) -> Self {
        match slot {
            Slot::Title => Self::TitleReEvaluate { raw },
            Slot::Row(row) => Self::RowReEvaluate { row, raw },
        }
    }

    /// Build the animation-advance task for `slot`.
    pub const fn animation_advance(slot: Slot) -> Self {
        match slot {
            Slot::Title => Self::TitleAnimationAdvance,
            Slot::Row(row) => Self::RowAnimationAdvance { row },
        }
    }
}

/// A unit of work for the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask {
    /// Owning panel.
    pub panel: ViewerId,
    /// Tick at which the task becomes due.
    pub due_tick: u64,
    /// 0 runs once; otherwise the task repeats every `interval_ticks`.
    pub interval_ticks: u32,
    /// What to do.
    pub kind: TaskKind,
}

impl ScheduledTask {
    /// Create a task that runs once at `due_tick`.
    pub const fn once(panel: ViewerId, due_tick: u64, kind: TaskKind) -> Self {
        Self {
            panel,
            due_tick,
            interval_ticks: 0,
            kind,
        }
    }

    /// Create a task first due at `due_tick`, then every `interval_ticks`.
    pub const fn recurring(panel: ViewerId, due_tick: u64, interval_ticks: u32, kind: TaskKind) -> Self {
        Self {
            panel,
            due_tick,
            interval_ticks,
            kind,
        }
    }

    /// Whether the task repeats.
    #[inline]
    pub const fn is_recurring(&self) -> bool {
        self.interval_ticks > 0
    }

    /// The slot this task writes to.
    #[inline]
    pub const fn slot(&self) -> Slot {
        self.kind.slot()
    }

    /// The next occurrence after running on `current_tick`.
    ///
    /// Returns `None` for one-shot tasks.
    pub fn reschedule(&self, current_tick: u64) -> Option<Self> {
        self.is_recurring().then(|| Self {
            due_tick: current_tick + u64::from(self.interval_ticks),
            ..self.clone()
        })
    }
}

/// Position of a task in the queue: due tick, then insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskKey {
    /// Due tick.
    pub due_tick: u64,
    /// Insertion sequence number.
    pub seq: u64,
}
