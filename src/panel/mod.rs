//! Panel: one viewer's title and fifteen rows.
//!
//! Each slot holds exactly one content variant: static text, raw text pending
//! periodic placeholder evaluation, or an animation. Setting a slot first
//! cancels the previous variant's tasks and drops it (releasing any shared
//! animation subscription), then installs the new one.
//!
//! Writes are staged per slot and handed to the [`Renderer`] by [`Panel::flush`].
//! API calls flush immediately; task-driven changes are flushed once per tick
//! by the heartbeat.

mod manager;
mod slot;

pub use manager::PanelManager;
pub use slot::{Row, Slot, ViewerId};

use crate::animation::Animation;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::placeholder::{resolve_or_raw, PlaceholderResolver};
use crate::render::Renderer;
use crate::scheduler::{ScheduledTask, SchedulerHandle, TaskKind};
use crate::text::{legacy, split, SplitResult, StyledText};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared, lockable panel as stored in the heartbeat's registry.
pub type PanelHandle = Arc<Mutex<Panel>>;

/// What happened when a task ran against its panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TaskOutcome {
    /// The slot was updated.
    Applied,
    /// The slot no longer holds content the task applies to.
    Stale,
}

/// The variant a slot currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// Fixed text.
    Static,
    /// Raw text re-resolved on an interval.
    PendingEvaluation,
    /// Animation with a private cursor.
    ExclusiveAnimation,
    /// Subscription to a cached shared animation.
    SharedAnimation,
}

enum Content {
    Static,
    Pending { raw: Arc<str> },
    Animated(Animation),
}

impl Content {
    const fn kind(&self) -> SlotKind {
        match self {
            Self::Static => SlotKind::Static,
            Self::Pending { .. } => SlotKind::PendingEvaluation,
            Self::Animated(Animation::Exclusive(_)) => SlotKind::ExclusiveAnimation,
            Self::Animated(Animation::Shared(_)) => SlotKind::SharedAnimation,
        }
    }
}

struct SlotState {
    content: Content,
    shown: SplitResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingWrite {
    Render,
    Clear,
}

/// A viewer's sidebar.
pub struct Panel {
    viewer: ViewerId,
    scheduler: SchedulerHandle,
    renderer: Arc<dyn Renderer>,
    resolver: Arc<dyn PlaceholderResolver>,
    refresh_interval_ticks: u32,
    title_refresh_interval_ticks: u32,
    slots: BTreeMap<Slot, SlotState>,
    badges: BTreeMap<Row, StyledText>,
    pending: BTreeMap<Slot, PendingWrite>,
    destroyed: bool,
}

impl fmt::Debug for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("viewer", &self.viewer)
            .field("slots", &self.slots.len())
            .field("badges", &self.badges.len())
            .field("pending", &self.pending)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

/// Rows are split into identifier and overflow; the title is sent whole.
fn shape(slot: Slot, text: StyledText) -> SplitResult {
    match slot {
        Slot::Title => SplitResult {
            head: text,
            tail: StyledText::empty(),
        },
        Slot::Row(_) => split(&text),
    }
}

impl Panel {
    /// Create an empty panel. It is not visited by the heartbeat's flush pass
    /// until registered.
    pub fn new(
        viewer: ViewerId,
        scheduler: SchedulerHandle,
        renderer: Arc<dyn Renderer>,
        resolver: Arc<dyn PlaceholderResolver>,
        config: &Config,
    ) -> Self {
        Self {
            viewer,
            scheduler,
            renderer,
            resolver,
            refresh_interval_ticks: config.refresh_interval_ticks,
            title_refresh_interval_ticks: config.title_refresh_interval_ticks,
            slots: BTreeMap::new(),
            badges: BTreeMap::new(),
            pending: BTreeMap::new(),
            destroyed: false,
        }
    }

    /// Wrap in a [`PanelHandle`].
    pub fn into_handle(self) -> PanelHandle {
        Arc::new(Mutex::new(self))
    }

    /// The owning viewer.
    pub const fn viewer(&self) -> ViewerId {
        self.viewer
    }

    /// Whether [`destroy`](Self::destroy) has run.
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // ==================== Title ====================

    /// Show fixed title text.
    pub fn set_title(&mut self, title: StyledText) -> Result<()> {
        self.check()?;
        self.install(Slot::Title, Content::Static, title);
        self.flush();
        Ok(())
    }

    /// Show a title from legacy `&`-coded text.
    ///
    /// Text with placeholders is re-resolved every
    /// `title_refresh_interval_ticks`.
    pub fn set_title_text(&mut self, raw: &str) -> Result<()> {
        self.check()?;
        self.install_text(Slot::Title, raw, self.title_refresh_interval_ticks)?;
        self.flush();
        Ok(())
    }

    /// Show an animated title.
    pub fn set_animated_title(&mut self, animation: Animation) -> Result<()> {
        self.check()?;
        self.install_animation(Slot::Title, animation);
        self.flush();
        Ok(())
    }

    /// Remove the title.
    pub fn clear_title(&mut self) -> Result<()> {
        self.check()?;
        self.vacate(Slot::Title);
        self.flush();
        Ok(())
    }

    // ==================== Rows ====================

    /// Show fixed text on `row`.
    pub fn set_line(&mut self, row: u8, text: StyledText) -> Result<()> {
        self.check()?;
        let row = Row::new(row)?;
        self.install(row.into(), Content::Static, text);
        self.flush();
        Ok(())
    }

    /// Show legacy `&`-coded text on `row`, re-resolving placeholders every
    /// `refresh_interval_ticks`.
    pub fn set_line_text(&mut self, row: u8, raw: &str) -> Result<()> {
        self.set_line_text_every(row, raw, self.refresh_interval_ticks)
    }

    /// Show legacy `&`-coded text on `row`, re-resolving placeholders every
    /// `interval_ticks`.
    pub fn set_line_text_every(&mut self, row: u8, raw: &str, interval_ticks: u32) -> Result<()> {
        self.check()?;
        let row = Row::new(row)?;
        self.install_text(row.into(), raw, interval_ticks)?;
        self.flush();
        Ok(())
    }

    /// Show an animation on `row`.
    pub fn set_animated_line(&mut self, row: u8, animation: Animation) -> Result<()> {
        self.check()?;
        let row = Row::new(row)?;
        self.install_animation(row.into(), animation);
        self.flush();
        Ok(())
    }

    /// Override the badge shown beside `row`. `None` or blank text hides it.
    pub fn set_line_badge(&mut self, row: u8, badge: Option<StyledText>) -> Result<()> {
        self.check()?;
        let row = Row::new(row)?;
        self.store_badge(row, badge);
        if self.slots.contains_key(&Slot::Row(row)) {
            self.pending.insert(row.into(), PendingWrite::Render);
        }
        self.flush();
        Ok(())
    }

    /// Show fixed text and a badge on `row` in one write.
    pub fn set_line_with_badge(&mut self, row: u8, text: StyledText, badge: Option<StyledText>) -> Result<()> {
        self.check()?;
        let row = Row::new(row)?;
        self.store_badge(row, badge);
        self.install(row.into(), Content::Static, text);
        self.flush();
        Ok(())
    }

    /// Show legacy `&`-coded text and a legacy-coded badge on `row` in one
    /// write. A blank badge hides it.
    ///
    /// Placeholders in `raw` are re-resolved every `refresh_interval_ticks`.
    pub fn set_line_text_with_badge(&mut self, row: u8, raw: &str, badge: &str) -> Result<()> {
        self.check()?;
        let row = Row::new(row)?;
        self.install_text(row.into(), raw, self.refresh_interval_ticks)?;
        self.store_badge(row, Some(legacy::parse(badge)));
        self.flush();
        Ok(())
    }

    /// Empty `row` and drop its badge.
    pub fn remove_line(&mut self, row: u8) -> Result<()> {
        self.check()?;
        let row = Row::new(row)?;
        self.badges.remove(&row);
        self.vacate(row.into());
        self.flush();
        Ok(())
    }

    // ==================== Lifecycle ====================

    /// Cancel every task, release every shared animation and clear every
    /// occupied slot. Idempotent.
    pub fn destroy(&mut self) -> Result<()> {
        self.scheduler.context().ensure()?;
        if self.destroyed {
            return Ok(());
        }
        let cancelled = self.scheduler.cancel_panel(self.viewer);
        self.pending = self.slots.keys().map(|slot| (*slot, PendingWrite::Clear)).collect();
        self.slots.clear();
        self.badges.clear();
        self.flush();
        self.destroyed = true;
        debug!(viewer = %self.viewer, cancelled, "panel destroyed");
        Ok(())
    }

    /// Hand every staged write to the renderer.
    ///
    /// Failed writes are logged and dropped. Returns the number delivered.
    pub fn flush(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let mut writes = 0;
        for (slot, write) in pending {
            let result = match write {
                PendingWrite::Render => {
                    let Some(state) = self.slots.get(&slot) else {
                        continue;
                    };
                    let badge = slot.row().and_then(|row| self.badges.get(&row));
                    self.renderer
                        .render(self.viewer, slot, &state.shown.head, &state.shown.tail, badge)
                }
                PendingWrite::Clear => self.renderer.clear(self.viewer, slot),
            };
            match result {
                Ok(()) => writes += 1,
                Err(err) => warn!(viewer = %self.viewer, %slot, error = %err, "renderer write failed"),
            }
        }
        writes
    }

    // ==================== Inspection ====================

    /// The split currently shown on `row`.
    pub fn rendered_row(&self, row: u8) -> Result<Option<&SplitResult>> {
        let row = Row::new(row)?;
        Ok(self.slots.get(&Slot::Row(row)).map(|state| &state.shown))
    }

    /// The title currently shown.
    pub fn rendered_title(&self) -> Option<&StyledText> {
        self.slots.get(&Slot::Title).map(|state| &state.shown.head)
    }

    /// The badge override on `row`.
    pub fn badge(&self, row: u8) -> Result<Option<&StyledText>> {
        let row = Row::new(row)?;
        Ok(self.badges.get(&row))
    }

    /// The variant `slot` holds, if occupied.
    pub fn slot_kind(&self, slot: Slot) -> Option<SlotKind> {
        self.slots.get(&slot).map(|state| state.content.kind())
    }

    /// Occupied rows, lowest first.
    pub fn occupied_rows(&self) -> impl Iterator<Item = Row> + '_ {
        self.slots.keys().filter_map(|slot| slot.row())
    }

    /// Whether `slot` has a live scheduled task.
    pub fn has_scheduled_task(&self, slot: Slot) -> bool {
        self.scheduler.pending_for_slot(self.viewer, slot) > 0
    }

    /// Whether writes are staged but not flushed.
    pub fn has_pending_writes(&self) -> bool {
        !self.pending.is_empty()
    }

    // ==================== Task execution ====================

    /// Apply one scheduled task. Runs on the update thread during a tick;
    /// the write is staged for the tick's flush pass.
    pub(crate) fn run_task(&mut self, kind: &TaskKind, tick: u64) -> Result<TaskOutcome> {
        if self.destroyed {
            return Err(Error::PanelDestroyed(self.viewer));
        }
        let slot = kind.slot();
        let Some(state) = self.slots.get_mut(&slot) else {
            return Ok(TaskOutcome::Stale);
        };

        let frame = match kind {
            TaskKind::RowReEvaluate { raw, .. } | TaskKind::TitleReEvaluate { raw } => match &state.content {
                Content::Pending { raw: current } if current == raw => {
                    legacy::parse(&resolve_or_raw(self.resolver.as_ref(), self.viewer, raw))
                }
                _ => return Ok(TaskOutcome::Stale),
            },
            TaskKind::RowAnimationAdvance { .. } | TaskKind::TitleAnimationAdvance => match &mut state.content {
                Content::Animated(Animation::Exclusive(animation)) => animation.next_frame(),
                Content::Animated(Animation::Shared(shared)) => shared.frame_for_tick(tick),
                _ => return Ok(TaskOutcome::Stale),
            },
        };

        state.shown = shape(slot, frame);
        self.pending.insert(slot, PendingWrite::Render);
        Ok(TaskOutcome::Applied)
    }

    // ==================== Internals ====================

    fn check(&self) -> Result<()> {
        self.scheduler.context().ensure()?;
        if self.destroyed {
            return Err(Error::PanelDestroyed(self.viewer));
        }
        Ok(())
    }

    fn store_badge(&mut self, row: Row, badge: Option<StyledText>) {
        match badge.filter(|badge| !badge.is_blank()) {
            Some(badge) => {
                self.badges.insert(row, badge);
            }
            None => {
                self.badges.remove(&row);
            }
        }
    }

    /// Tear down whatever `slot` holds: its tasks first, then the content.
    fn release(&mut self, slot: Slot) -> Option<SlotState> {
        self.scheduler.cancel_slot(self.viewer, slot);
        self.slots.remove(&slot)
    }

    fn install(&mut self, slot: Slot, content: Content, text: StyledText) {
        drop(self.release(slot));
        self.slots.insert(
            slot,
            SlotState {
                content,
                shown: shape(slot, text),
            },
        );
        self.pending.insert(slot, PendingWrite::Render);
    }

    fn vacate(&mut self, slot: Slot) {
        drop(self.release(slot));
        self.pending.insert(slot, PendingWrite::Clear);
    }

    fn install_text(&mut self, slot: Slot, raw: &str, interval_ticks: u32) -> Result<()> {
        if interval_ticks == 0 {
            return Err(Error::InvalidArgument("refresh interval must be positive"));
        }
        if !self.resolver.contains_placeholders(raw) {
            self.install(slot, Content::Static, legacy::parse(raw));
            return Ok(());
        }

        let raw: Arc<str> = Arc::from(raw);
        let text = legacy::parse(&resolve_or_raw(self.resolver.as_ref(), self.viewer, &raw));
        self.install(slot, Content::Pending { raw: Arc::clone(&raw) }, text);

        let due = self.scheduler.first_due(interval_ticks, false);
        self.scheduler.schedule(ScheduledTask::recurring(
            self.viewer,
            due,
            interval_ticks,
            TaskKind::re_evaluate(slot, raw),
        ));
        Ok(())
    }

    fn install_animation(&mut self, slot: Slot, mut animation: Animation) {
        let (first, aligned) = match &mut animation {
            Animation::Exclusive(exclusive) => (exclusive.next_frame(), false),
            Animation::Shared(shared) => (shared.displayed_frame(self.scheduler.current_tick()), true),
        };
        let interval_ticks = animation.interval_ticks();
        self.install(slot, Content::Animated(animation), first);

        let due = self.scheduler.first_due(interval_ticks, aligned);
        self.scheduler.schedule(ScheduledTask::recurring(
            self.viewer,
            due,
            interval_ticks,
            TaskKind::animation_advance(slot),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationCache, ExclusiveAnimation};
    use crate::error::ResolveError;
    use crate::placeholder::NoPlaceholders;
    use crate::render::{RecordedCall, RecordingRenderer};
    use crate::scheduler::Heartbeat;
    use crate::text::{NamedColor, Style};
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Fixture {
        heartbeat: Heartbeat,
        renderer: Arc<RecordingRenderer>,
        panel: PanelHandle,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_resolver(Arc::new(NoPlaceholders))
        }

        fn with_resolver(resolver: Arc<dyn PlaceholderResolver>) -> Self {
            let heartbeat = Heartbeat::new();
            let renderer = Arc::new(RecordingRenderer::new());
            let panel = Panel::new(ViewerId(1), heartbeat.handle(), renderer.clone(), resolver, &Config::default())
                .into_handle();
            heartbeat.register_panel(ViewerId(1), Arc::clone(&panel));
            heartbeat.start().unwrap();
            Self {
                heartbeat,
                renderer,
                panel,
            }
        }

        fn tick_to(&self, tick: u64) {
            while self.heartbeat.current_tick() < tick {
                self.heartbeat.tick().unwrap();
            }
        }
    }

    fn frames(names: &[&str]) -> Vec<StyledText> {
        names.iter().map(|name| StyledText::plain(*name)).collect()
    }

    fn row_slot(n: u8) -> Slot {
        Slot::Row(Row::new(n).unwrap())
    }

    fn rendered_heads(calls: &[RecordedCall]) -> Vec<String> {
        calls
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Render { head, .. } => Some(head.plain_text()),
                RecordedCall::Clear { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_set_line_static_matches_split() {
        let fixture = Fixture::new();
        let text = StyledText::styled("Welcome to the arena, ", Style::new().color(NamedColor::Gold))
            .append(StyledText::plain("challenger"));
        for row in 1..=15 {
            fixture.panel.lock().set_line(row, text.clone()).unwrap();
        }

        let panel = fixture.panel.lock();
        for row in 1..=15 {
            assert_eq!(panel.rendered_row(row).unwrap(), Some(&split(&text)));
            assert!(!panel.has_scheduled_task(row_slot(row)));
            assert_eq!(panel.slot_kind(row_slot(row)), Some(SlotKind::Static));
        }
        assert_eq!(fixture.renderer.len(), 15);
    }

    #[test]
    fn test_invalid_rows_rejected_everywhere() {
        let fixture = Fixture::new();
        let mut panel = fixture.panel.lock();
        panel.set_line(3, StyledText::plain("keep")).unwrap();
        let animation = || -> Animation { ExclusiveAnimation::new(frames(&["a"]), 1).unwrap().into() };

        for row in [0, 16, 255] {
            assert_eq!(panel.set_line(row, StyledText::plain("x")), Err(Error::InvalidRow(row)));
            assert_eq!(panel.set_line_text(row, "x"), Err(Error::InvalidRow(row)));
            assert_eq!(panel.set_line_text_every(row, "x", 5), Err(Error::InvalidRow(row)));
            assert_eq!(panel.set_animated_line(row, animation()), Err(Error::InvalidRow(row)));
            assert_eq!(panel.set_line_badge(row, None), Err(Error::InvalidRow(row)));
            assert_eq!(
                panel.set_line_with_badge(row, StyledText::plain("x"), None),
                Err(Error::InvalidRow(row))
            );
            assert_eq!(panel.remove_line(row), Err(Error::InvalidRow(row)));
        }

        assert_eq!(panel.occupied_rows().map(Row::get).collect::<Vec<_>>(), [3]);
        assert_eq!(panel.rendered_row(3).unwrap().unwrap().head.plain_text(), "keep");
        assert_eq!(fixture.heartbeat.queue_len(), 0);
    }

    #[test]
    fn test_zero_refresh_interval_rejected() {
        let fixture = Fixture::new();
        let result = fixture.panel.lock().set_line_text_every(1, "%x%", 0);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_zero_title_refresh_interval_rejected() {
        let heartbeat = Heartbeat::new();
        let renderer = Arc::new(RecordingRenderer::new());
        let config = Config {
            title_refresh_interval_ticks: 0,
            ..Config::default()
        };
        let mut panel = Panel::new(ViewerId(1), heartbeat.handle(), renderer.clone(), Arc::new(NoPlaceholders), &config);

        assert!(matches!(panel.set_title_text("&6%server%"), Err(Error::InvalidArgument(_))));
        assert!(panel.rendered_title().is_none());
        assert_eq!(heartbeat.queue_len(), 0);
        assert!(renderer.is_empty());
    }

    #[test]
    fn test_placeholder_text_re_evaluates() {
        let counter = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&counter);
        let resolver = move |_: ViewerId, raw: &str| {
            let n = seen.fetch_add(1, Ordering::Relaxed);
            Ok::<_, ResolveError>(raw.replace("%online%", &n.to_string()))
        };
        let fixture = Fixture::with_resolver(Arc::new(resolver));

        fixture.panel.lock().set_line_text_every(2, "&aOnline: %online%", 10).unwrap();
        {
            let panel = fixture.panel.lock();
            assert_eq!(panel.slot_kind(row_slot(2)), Some(SlotKind::PendingEvaluation));
            assert!(panel.has_scheduled_task(row_slot(2)));
            assert_eq!(panel.rendered_row(2).unwrap().unwrap().head.plain_text(), "Online: 0");
        }

        fixture.tick_to(10);
        assert_eq!(
            fixture.panel.lock().rendered_row(2).unwrap().unwrap().head.plain_text(),
            "Online: 1"
        );
        fixture.tick_to(20);
        assert_eq!(rendered_heads(&fixture.renderer.take()), ["Online: 0", "Online: 1", "Online: 2"]);
    }

    #[test]
    fn test_text_without_placeholders_is_static() {
        let fixture = Fixture::new();
        fixture.panel.lock().set_line_text(1, "&c100% ready").unwrap();
        let panel = fixture.panel.lock();
        assert_eq!(panel.slot_kind(row_slot(1)), Some(SlotKind::Static));
        assert!(!panel.has_scheduled_task(row_slot(1)));
    }

    #[test]
    fn test_resolution_failure_shows_raw() {
        let resolver = |_: ViewerId, _: &str| Err::<String, _>(ResolveError("offline".into()));
        let fixture = Fixture::with_resolver(Arc::new(resolver));
        fixture.panel.lock().set_title_text("&6%server_name%").unwrap();

        let panel = fixture.panel.lock();
        assert_eq!(panel.rendered_title().unwrap().plain_text(), "%server_name%");
        assert!(panel.has_scheduled_task(Slot::Title));
    }

    #[test]
    fn test_exclusive_animation_shows_first_frame_then_advances() {
        let fixture = Fixture::new();
        let animation = ExclusiveAnimation::new(frames(&["a", "b", "c"]), 5).unwrap();
        fixture.panel.lock().set_animated_line(4, animation.into()).unwrap();
        fixture.tick_to(15);

        assert_eq!(rendered_heads(&fixture.renderer.take()), ["a", "b", "c", "a"]);
    }

    #[test]
    fn test_replacing_animation_cancels_its_task() {
        let fixture = Fixture::new();
        let cache = AnimationCache::new();
        let shared = cache.get_or_create(&frames(&["a", "b"]), 2).unwrap();
        let animation = Arc::clone(shared.animation());

        fixture.panel.lock().set_animated_line(1, shared.into()).unwrap();
        assert_eq!(animation.subscriber_count(), 1);

        fixture.panel.lock().set_line(1, StyledText::plain("done")).unwrap();
        assert_eq!(animation.subscriber_count(), 0);
        assert!(cache.is_empty());
        assert!(!fixture.panel.lock().has_scheduled_task(row_slot(1)));

        fixture.renderer.take();
        fixture.tick_to(10);
        assert!(fixture.renderer.is_empty());
    }

    #[test]
    fn test_title_is_not_split() {
        let fixture = Fixture::new();
        let title = StyledText::plain("A title well beyond sixteen characters");
        fixture.panel.lock().set_title(title.clone()).unwrap();

        let calls = fixture.renderer.take();
        assert_eq!(
            calls,
            [RecordedCall::Render {
                viewer: ViewerId(1),
                slot: Slot::Title,
                head: title,
                tail: StyledText::empty(),
                badge: None,
            }]
        );
    }

    #[test]
    fn test_clear_title() {
        let fixture = Fixture::new();
        let mut panel = fixture.panel.lock();
        panel
            .set_animated_title(ExclusiveAnimation::new(frames(&["x", "y"]), 3).unwrap().into())
            .unwrap();
        panel.clear_title().unwrap();

        assert!(panel.rendered_title().is_none());
        assert!(!panel.has_scheduled_task(Slot::Title));
        assert_eq!(
            fixture.renderer.take().last(),
            Some(&RecordedCall::Clear {
                viewer: ViewerId(1),
                slot: Slot::Title
            })
        );
    }

    #[test]
    fn test_badge_set_and_hidden() {
        let fixture = Fixture::new();
        let mut panel = fixture.panel.lock();
        panel.set_line(5, StyledText::plain("Kills")).unwrap();
        panel.set_line_badge(5, Some(StyledText::plain("12"))).unwrap();
        assert_eq!(panel.badge(5).unwrap().map(StyledText::plain_text).as_deref(), Some("12"));

        panel.set_line_badge(5, Some(StyledText::empty())).unwrap();
        assert!(panel.badge(5).unwrap().is_none());

        let badges: Vec<Option<String>> = fixture
            .renderer
            .take()
            .into_iter()
            .filter_map(|call| match call {
                RecordedCall::Render { badge, .. } => Some(badge.map(|b| b.plain_text())),
                RecordedCall::Clear { .. } => None,
            })
            .collect();
        assert_eq!(badges, [None, Some("12".to_owned()), None]);
    }

    #[test]
    fn test_badge_on_empty_row_waits_for_content() {
        let fixture = Fixture::new();
        let mut panel = fixture.panel.lock();
        panel.set_line_badge(6, Some(StyledText::plain("7"))).unwrap();
        assert!(fixture.renderer.is_empty());

        panel.set_line(6, StyledText::plain("Deaths")).unwrap();
        let calls = fixture.renderer.take();
        assert!(matches!(&calls[..], [RecordedCall::Render { badge: Some(_), .. }]));
    }

    #[test]
    fn test_set_line_with_badge_single_write() {
        let fixture = Fixture::new();
        fixture
            .panel
            .lock()
            .set_line_with_badge(2, StyledText::plain("Coins"), Some(StyledText::plain("40")))
            .unwrap();
        assert_eq!(fixture.renderer.len(), 1);
    }

    #[test]
    fn test_set_line_text_with_badge_parses_both() {
        let fixture = Fixture::new();
        fixture.panel.lock().set_line_text_with_badge(4, "&aKills", "&c12").unwrap();

        let calls = fixture.renderer.take();
        let [RecordedCall::Render { head, badge: Some(badge), .. }] = &calls[..] else {
            panic!("expected one render with a badge, got {calls:?}");
        };
        assert_eq!(head.plain_text(), "Kills");
        assert_eq!(badge.plain_text(), "12");
        assert_eq!(badge.runs()[0].style.text_color(), Some(NamedColor::Red.into()));

        fixture.panel.lock().set_line_text_with_badge(4, "&aKills", "").unwrap();
        assert!(fixture.panel.lock().badge(4).unwrap().is_none());
    }

    #[test]
    fn test_remove_line() {
        let fixture = Fixture::new();
        let mut panel = fixture.panel.lock();
        panel
            .set_line_with_badge(9, StyledText::plain("Level"), Some(StyledText::plain("3")))
            .unwrap();
        panel.remove_line(9).unwrap();

        assert!(panel.rendered_row(9).unwrap().is_none());
        assert!(panel.badge(9).unwrap().is_none());
        assert_eq!(
            fixture.renderer.take().last(),
            Some(&RecordedCall::Clear {
                viewer: ViewerId(1),
                slot: row_slot(9)
            })
        );
    }

    #[test]
    fn test_destroy_releases_everything() {
        let fixture = Fixture::new();
        let cache = AnimationCache::new();
        let others: Vec<_> = (0..2)
            .map(|_| cache.get_or_create(&frames(&["a", "b"]), 4).unwrap())
            .collect();
        {
            let mut panel = fixture.panel.lock();
            panel
                .set_animated_line(1, cache.get_or_create(&frames(&["a", "b"]), 4).unwrap().into())
                .unwrap();
            panel.set_line_text(2, "%x%").unwrap();
            panel.set_title(StyledText::plain("T")).unwrap();
            assert_eq!(others[0].subscriber_count(), 3);

            fixture.renderer.take();
            panel.destroy().unwrap();
            assert!(panel.is_destroyed());
        }

        assert_eq!(others[0].subscriber_count(), 2);
        assert!(cache.lookup(&frames(&["a", "b"]), 4).is_some());
        assert_eq!(fixture.heartbeat.pending_tasks_for(ViewerId(1)), 0);

        let calls = fixture.renderer.take();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|call| matches!(call, RecordedCall::Clear { .. })));

        let mut panel = fixture.panel.lock();
        assert_eq!(panel.set_line(1, StyledText::plain("x")), Err(Error::PanelDestroyed(ViewerId(1))));
        assert!(panel.destroy().is_ok());
    }

    #[test]
    fn test_off_thread_mutation_rejected() {
        let fixture = Fixture::new();
        let panel = Arc::clone(&fixture.panel);
        let result = std::thread::spawn(move || panel.lock().set_line(1, StyledText::plain("x")))
            .join()
            .unwrap();

        assert!(matches!(result, Err(Error::WrongThread { .. })));
        assert!(fixture.panel.lock().rendered_row(1).unwrap().is_none());
        assert!(fixture.renderer.is_empty());
    }

    #[test]
    fn test_stale_task_dropped() {
        let fixture = Fixture::new();
        fixture.panel.lock().set_line(1, StyledText::plain("still")).unwrap();
        fixture.heartbeat.schedule_task(ScheduledTask::recurring(
            ViewerId(1),
            1,
            1,
            TaskKind::RowAnimationAdvance { row: Row::new(1).unwrap() },
        ));

        let report = fixture.heartbeat.tick().unwrap();
        assert_eq!(report.stale, 1);
        assert_eq!(fixture.heartbeat.queue_len(), 0);
    }
}
