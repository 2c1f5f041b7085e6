//! Panel manager: one panel per viewer.

use super::{Panel, PanelHandle, ViewerId};
use crate::animation::AnimationCache;
use crate::config::Config;
use crate::error::Result;
use crate::placeholder::{NoPlaceholders, PlaceholderResolver};
use crate::render::Renderer;
use crate::scheduler::Heartbeat;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Creates, looks up and tears down panels, keeping the heartbeat's
/// registry in step.
///
/// # Example
///
/// ```
/// use scoreline::{Heartbeat, PanelManager, RecordingRenderer, StyledText, ViewerId};
/// use std::sync::Arc;
///
/// let heartbeat = Arc::new(Heartbeat::new());
/// let manager = PanelManager::new(Arc::clone(&heartbeat), Arc::new(RecordingRenderer::new()));
///
/// let panel = manager.create(ViewerId(7)).unwrap();
/// panel.lock().set_line(1, StyledText::plain("Hello")).unwrap();
/// assert_eq!(manager.len(), 1);
///
/// manager.destroy(ViewerId(7)).unwrap();
/// assert!(manager.get(ViewerId(7)).is_none());
/// ```
pub struct PanelManager {
    heartbeat: Arc<Heartbeat>,
    renderer: Arc<dyn Renderer>,
    resolver: Arc<dyn PlaceholderResolver>,
    cache: AnimationCache,
    config: Config,
}

impl fmt::Debug for PanelManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelManager")
            .field("panels", &self.len())
            .field("cached_animations", &self.cache.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PanelManager {
    /// Create a manager with no placeholder service and the default config.
    pub fn new(heartbeat: Arc<Heartbeat>, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            heartbeat,
            renderer,
            resolver: Arc::new(NoPlaceholders),
            cache: AnimationCache::new(),
            config: Config::default(),
        }
    }

    /// Use `resolver` for placeholder text in panels created from now on.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn PlaceholderResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Use `config` for panels created from now on.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Create an empty panel for `viewer`, destroying any existing one.
    pub fn create(&self, viewer: ViewerId) -> Result<PanelHandle> {
        self.heartbeat.context().ensure()?;
        if let Some(previous) = self.heartbeat.unregister_panel(viewer) {
            previous.lock().destroy()?;
            debug!(%viewer, "replacing existing panel");
        }

        let panel = Panel::new(
            viewer,
            self.heartbeat.handle(),
            Arc::clone(&self.renderer),
            Arc::clone(&self.resolver),
            &self.config,
        )
        .into_handle();
        self.heartbeat.register_panel(viewer, Arc::clone(&panel));
        debug!(%viewer, "panel created");
        Ok(panel)
    }

    /// The panel for `viewer`.
    pub fn get(&self, viewer: ViewerId) -> Option<PanelHandle> {
        self.heartbeat.panel(viewer)
    }

    /// Tear down the panel for `viewer`. Returns whether one existed.
    pub fn destroy(&self, viewer: ViewerId) -> Result<bool> {
        self.heartbeat.context().ensure()?;
        let Some(panel) = self.heartbeat.unregister_panel(viewer) else {
            return Ok(false);
        };
        panel.lock().destroy()?;
        Ok(true)
    }

    /// Tear down every panel. Returns how many were destroyed.
    pub fn destroy_all(&self) -> Result<usize> {
        self.heartbeat.context().ensure()?;
        let mut destroyed = 0;
        for viewer in self.heartbeat.viewers() {
            if self.destroy(viewer)? {
                destroyed += 1;
            }
        }
        info!(destroyed, "destroyed all panels");
        Ok(destroyed)
    }

    /// Number of live panels.
    pub fn len(&self) -> usize {
        self.heartbeat.active_panel_count()
    }

    /// Whether no panel exists.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The animation cache shared by this manager's panels.
    pub const fn cache(&self) -> &AnimationCache {
        &self.cache
    }

    /// The heartbeat driving this manager's panels.
    pub const fn heartbeat(&self) -> &Arc<Heartbeat> {
        &self.heartbeat
    }

    /// Config applied to new panels.
    pub const fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::render::{RecordedCall, RecordingRenderer};
    use crate::text::StyledText;

    fn manager() -> (PanelManager, Arc<RecordingRenderer>) {
        let renderer = Arc::new(RecordingRenderer::new());
        let manager = PanelManager::new(Arc::new(Heartbeat::new()), renderer.clone());
        (manager, renderer)
    }

    #[test]
    fn test_create_and_get() {
        let (manager, _) = manager();
        let panel = manager.create(ViewerId(1)).unwrap();
        let fetched = manager.get(ViewerId(1)).unwrap();
        assert!(Arc::ptr_eq(&panel, &fetched));
        assert!(manager.get(ViewerId(2)).is_none());
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_create_replaces_existing() {
        let (manager, renderer) = manager();
        let old = manager.create(ViewerId(1)).unwrap();
        old.lock().set_line_text(1, "%tps%").unwrap();
        renderer.take();

        let new = manager.create(ViewerId(1)).unwrap();
        assert!(!Arc::ptr_eq(&old, &new));
        assert!(old.lock().is_destroyed());
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.heartbeat().pending_tasks_for(ViewerId(1)), 0);
        assert!(matches!(&renderer.take()[..], [RecordedCall::Clear { .. }]));
    }

    #[test]
    fn test_destroy_missing_is_noop() {
        let (manager, _) = manager();
        assert!(!manager.destroy(ViewerId(5)).unwrap());
    }

    #[test]
    fn test_destroy_all() {
        let (manager, _) = manager();
        for viewer in 1..=4 {
            let panel = manager.create(ViewerId(viewer)).unwrap();
            panel.lock().set_title(StyledText::plain("T")).unwrap();
        }
        assert_eq!(manager.destroy_all().unwrap(), 4);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_create_off_thread_rejected() {
        let (manager, _) = manager();
        let manager = Arc::new(manager);
        let remote = Arc::clone(&manager);
        let result = std::thread::spawn(move || remote.create(ViewerId(1)).map(|_| ()))
            .join()
            .unwrap();
        assert!(matches!(result, Err(Error::WrongThread { .. })));
        assert!(manager.is_empty());
    }
}
