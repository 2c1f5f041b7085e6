//! Task queue: tasks ordered by due tick, indexed by panel.
//!
//! Ordering is `(due_tick, insertion sequence)`, so tasks due on the same tick
//! run first-in first-out. A popped task stays in its panel's index until it
//! is completed; cancelling it in between prevents the reschedule.

use super::task::{ScheduledTask, TaskKey};
use crate::panel::{Slot, ViewerId};
use std::collections::{BTreeMap, HashMap};

/// Ordered task store with a per-panel index.
#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: BTreeMap<TaskKey, ScheduledTask>,
    by_panel: HashMap<ViewerId, BTreeMap<TaskKey, Slot>>,
    next_seq: u64,
}

impl TaskQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a task.
    pub fn push(&mut self, task: ScheduledTask) -> TaskKey {
        let key = TaskKey {
            due_tick: task.due_tick,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.by_panel.entry(task.panel).or_default().insert(key, task.slot());
        self.tasks.insert(key, task);
        key
    }

    /// Remove and return the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<(TaskKey, ScheduledTask)> {
        let (key, _) = self.tasks.first_key_value()?;
        if key.due_tick > now {
            return None;
        }
        self.tasks.pop_first()
    }

    /// Finish a popped task, re-enqueueing it if it recurs and was not cancelled.
    ///
    /// Returns the key of the next occurrence.
    pub fn complete(&mut self, key: TaskKey, task: &ScheduledTask, now: u64) -> Option<TaskKey> {
        let index = self.by_panel.get_mut(&task.panel)?;
        index.remove(&key)?;
        if index.is_empty() {
            self.by_panel.remove(&task.panel);
        }
        task.reschedule(now).map(|next| self.push(next))
    }

    /// Finish a popped task without rescheduling it.
    pub fn discard(&mut self, key: TaskKey, task: &ScheduledTask) {
        if let Some(index) = self.by_panel.get_mut(&task.panel) {
            index.remove(&key);
            if index.is_empty() {
                self.by_panel.remove(&task.panel);
            }
        }
    }

    /// Remove every task of `panel`, including any popped but not completed.
    pub fn cancel_panel(&mut self, panel: ViewerId) -> usize {
        let Some(index) = self.by_panel.remove(&panel) else {
            return 0;
        };
        for key in index.keys() {
            self.tasks.remove(key);
        }
        index.len()
    }

    /// Remove every task of `panel` that targets `slot`.
    pub fn cancel_slot(&mut self, panel: ViewerId, slot: Slot) -> usize {
        let Some(index) = self.by_panel.get_mut(&panel) else {
            return 0;
        };
        let doomed: Vec<TaskKey> = index
            .iter()
            .filter(|(_, target)| **target == slot)
            .map(|(key, _)| *key)
            .collect();
        for key in &doomed {
            index.remove(key);
            self.tasks.remove(key);
        }
        if index.is_empty() {
            self.by_panel.remove(&panel);
        }
        doomed.len()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.by_panel.clear();
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of live tasks owned by `panel`.
    pub fn pending_for(&self, panel: ViewerId) -> usize {
        self.by_panel.get(&panel).map_or(0, BTreeMap::len)
    }

    /// Number of live tasks owned by `panel` targeting `slot`.
    pub fn pending_for_slot(&self, panel: ViewerId, slot: Slot) -> usize {
        self.by_panel
            .get(&panel)
            .map_or(0, |index| index.values().filter(|target| **target == slot).count())
    }

    /// Due tick of the earliest queued task.
    pub fn next_due(&self) -> Option<u64> {
        self.tasks.first_key_value().map(|(key, _)| key.due_tick)
    }
}
