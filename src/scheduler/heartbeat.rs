//! Heartbeat: the single tick-aligned loop that drives every panel.
//!
//! Each [`Heartbeat::tick`] advances the tick counter, runs every due task in
//! `(due_tick, insertion)` order, re-enqueues recurring tasks, then visits
//! every registered panel once to flush its staged writes. A renderer
//! therefore sees at most one write per slot per tick.
//!
//! Lock order is panel, then queue. The tick loop never holds the queue lock
//! while it executes a task.

use super::queue::TaskQueue;
use super::task::{ScheduledTask, TaskKey};
use crate::config::Config;
use crate::context::UpdateContext;
use crate::error::{Error, Result};
use crate::panel::{PanelHandle, Slot, TaskOutcome, ViewerId};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// State shared between the heartbeat and every panel's [`SchedulerHandle`].
#[derive(Debug)]
struct Core {
    queue: Mutex<TaskQueue>,
    tick: AtomicU64,
    running: AtomicBool,
    context: UpdateContext,
    align_shared_animations: bool,
}

/// Cheap handle panels use to enqueue and cancel their own tasks.
///
/// Holds no reference to the panel registry, so panels never keep the
/// heartbeat alive.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    core: Arc<Core>,
}

impl SchedulerHandle {
    /// Enqueue a task. Safe from any thread.
    pub fn schedule(&self, task: ScheduledTask) -> TaskKey {
        self.core.queue.lock().push(task)
    }

    /// Cancel every task of `viewer` targeting `slot`. Safe from any thread.
    pub fn cancel_slot(&self, viewer: ViewerId, slot: Slot) -> usize {
        self.core.queue.lock().cancel_slot(viewer, slot)
    }

    /// Cancel every task of `viewer`. Safe from any thread.
    pub fn cancel_panel(&self, viewer: ViewerId) -> usize {
        self.core.queue.lock().cancel_panel(viewer)
    }

    /// Live tasks of `viewer` targeting `slot`.
    pub fn pending_for_slot(&self, viewer: ViewerId, slot: Slot) -> usize {
        self.core.queue.lock().pending_for_slot(viewer, slot)
    }

    /// The tick most recently executed.
    pub fn current_tick(&self) -> u64 {
        self.core.tick.load(Ordering::Acquire)
    }

    /// The update thread.
    pub fn context(&self) -> &UpdateContext {
        &self.core.context
    }

    /// First due tick for a task repeating every `interval_ticks`.
    ///
    /// With `aligned`, and alignment enabled in the config, the result is the
    /// next multiple of the interval, so every subscriber of one shared
    /// animation fires on the same tick.
    pub fn first_due(&self, interval_ticks: u32, aligned: bool) -> u64 {
        let now = self.current_tick();
        let interval = u64::from(interval_ticks.max(1));
        if aligned && self.core.align_shared_animations {
            (now / interval + 1) * interval
        } else {
            now + interval
        }
    }
}

/// Summary of one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The tick that ran.
    pub tick: u64,
    /// Tasks that ran and applied.
    pub executed: usize,
    /// Tasks whose execution failed; recurring ones were still rescheduled.
    pub failed: usize,
    /// Tasks whose panel was not registered; dropped.
    pub orphaned: usize,
    /// Tasks whose slot no longer held matching content; dropped.
    pub stale: usize,
    /// Renderer calls made by the flush pass.
    pub writes: usize,
}

/// The task scheduler.
///
/// Created on the update thread, which it captures as the only thread
/// allowed to start, stop and tick it.
#[derive(Debug)]
pub struct Heartbeat {
    core: Arc<Core>,
    panels: RwLock<BTreeMap<ViewerId, PanelHandle>>,
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self::new()
    }
}

impl Heartbeat {
    /// Create a stopped heartbeat with the default config.
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Create a stopped heartbeat.
    pub fn with_config(config: &Config) -> Self {
        Self {
            core: Arc::new(Core {
                queue: Mutex::new(TaskQueue::new()),
                tick: AtomicU64::new(0),
                running: AtomicBool::new(false),
                context: UpdateContext::current(),
                align_shared_animations: config.align_shared_animations,
            }),
            panels: RwLock::new(BTreeMap::new()),
        }
    }

    /// A handle for enqueueing and cancelling tasks.
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            core: Arc::clone(&self.core),
        }
    }

    /// The captured update thread.
    pub fn context(&self) -> &UpdateContext {
        &self.core.context
    }

    /// Transition stopped to running.
    pub fn start(&self) -> Result<()> {
        self.core.context.ensure()?;
        if self.core.running.swap(true, Ordering::AcqRel) {
            warn!("heartbeat start requested while already running");
            return Err(Error::AlreadyRunning);
        }
        info!(queued = self.queue_len(), panels = self.active_panel_count(), "heartbeat started");
        Ok(())
    }

    /// Transition running to stopped, dropping every pending task and
    /// resetting the tick counter.
    ///
    /// Registered panels stay registered.
    pub fn stop(&self) -> Result<()> {
        self.core.context.ensure()?;
        if !self.core.running.swap(false, Ordering::AcqRel) {
            warn!("heartbeat stop requested while not running");
            return Err(Error::NotRunning);
        }
        let dropped = {
            let mut queue = self.core.queue.lock();
            let dropped = queue.len();
            queue.clear();
            dropped
        };
        self.core.tick.store(0, Ordering::Release);
        info!(dropped, "heartbeat stopped");
        Ok(())
    }

    /// Run one tick: execute due tasks, then flush every panel once.
    pub fn tick(&self) -> Result<TickReport> {
        self.core.context.ensure()?;
        if !self.is_running() {
            return Err(Error::NotRunning);
        }

        let now = self.core.tick.fetch_add(1, Ordering::AcqRel) + 1;
        let mut report = TickReport {
            tick: now,
            ..TickReport::default()
        };

        loop {
            let Some((key, task)) = self.core.queue.lock().pop_due(now) else {
                break;
            };
            self.execute(key, &task, now, &mut report);
        }

        // Snapshot so panels can be registered or destroyed from other threads mid-flush
        let panels: Vec<PanelHandle> = self.panels.read().values().cloned().collect();
        for panel in panels {
            report.writes += panel.lock().flush();
        }

        trace!(
            tick = now,
            executed = report.executed,
            failed = report.failed,
            writes = report.writes,
            "tick complete"
        );
        Ok(report)
    }

    fn execute(&self, key: TaskKey, task: &ScheduledTask, now: u64, report: &mut TickReport) {
        let panel = self.panels.read().get(&task.panel).cloned();
        let Some(panel) = panel else {
            debug!(viewer = %task.panel, slot = %task.slot(), "dropping orphaned task");
            self.core.queue.lock().discard(key, task);
            report.orphaned += 1;
            return;
        };

        let outcome = panel.lock().run_task(&task.kind, now);
        match outcome {
            Ok(TaskOutcome::Applied) => report.executed += 1,
            Ok(TaskOutcome::Stale) => {
                debug!(viewer = %task.panel, slot = %task.slot(), "dropping stale task");
                self.core.queue.lock().discard(key, task);
                report.stale += 1;
                return;
            }
            Err(err) => {
                warn!(viewer = %task.panel, slot = %task.slot(), error = %err, "task execution failed");
                report.failed += 1;
            }
        }
        self.core.queue.lock().complete(key, task, now);
    }

    /// Enqueue a task. Safe from any thread.
    pub fn schedule_task(&self, task: ScheduledTask) -> TaskKey {
        self.core.queue.lock().push(task)
    }

    /// Remove every task of `viewer`. Idempotent; safe from any thread.
    pub fn cancel_tasks_for_panel(&self, viewer: ViewerId) -> usize {
        self.core.queue.lock().cancel_panel(viewer)
    }

    /// Add a panel to the flush pass, replacing any panel registered for the
    /// same viewer.
    pub fn register_panel(&self, viewer: ViewerId, panel: PanelHandle) -> Option<PanelHandle> {
        self.panels.write().insert(viewer, panel)
    }

    /// Remove a panel from the flush pass and cancel its tasks.
    pub fn unregister_panel(&self, viewer: ViewerId) -> Option<PanelHandle> {
        let removed = self.panels.write().remove(&viewer);
        self.cancel_tasks_for_panel(viewer);
        removed
    }

    /// The panel registered for `viewer`.
    pub fn panel(&self, viewer: ViewerId) -> Option<PanelHandle> {
        self.panels.read().get(&viewer).cloned()
    }

    /// Every registered viewer, in id order.
    pub fn viewers(&self) -> Vec<ViewerId> {
        self.panels.read().keys().copied().collect()
    }

    /// The tick most recently executed; 0 before the first tick.
    pub fn current_tick(&self) -> u64 {
        self.core.tick.load(Ordering::Acquire)
    }

    /// Whether the heartbeat is running.
    pub fn is_running(&self) -> bool {
        self.core.running.load(Ordering::Acquire)
    }

    /// Number of queued tasks.
    pub fn queue_len(&self) -> usize {
        self.core.queue.lock().len()
    }

    /// Number of registered panels.
    pub fn active_panel_count(&self) -> usize {
        self.panels.read().len()
    }

    /// Number of live tasks owned by `viewer`.
    pub fn pending_tasks_for(&self, viewer: ViewerId) -> usize {
        self.core.queue.lock().pending_for(viewer)
    }

    /// Due tick of the earliest queued task.
    pub fn next_due(&self) -> Option<u64> {
        self.core.queue.lock().next_due()
    }
}
