//! Terminal preview: drive a few animated sidebars and paint one of them.
//!
//! Run with `RUST_LOG=scoreline=debug` to watch the scheduler's logs on stderr.

use scoreline::{
    Config, ExclusiveAnimation, Heartbeat, PanelManager, ResolveError, StyledText, TerminalRenderer, TickSource,
    ViewerId,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const TICKS: u64 = 200;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config {
        tick_interval_ms: 50,
        refresh_interval_ticks: 10,
        ..Config::default()
    };

    let heartbeat = Arc::new(Heartbeat::with_config(&config));
    let renderer = Arc::new(TerminalRenderer::stdout(32));

    // Fake placeholder service: an online counter that ticks up on every lookup
    let online = AtomicU64::new(40);
    let resolver = move |viewer: ViewerId, raw: &str| {
        let players = online.fetch_add(1, Ordering::Relaxed) % 64;
        Ok::<_, ResolveError>(
            raw.replace("%online%", &players.to_string())
                .replace("%viewer%", &viewer.0.to_string()),
        )
    };

    let manager = PanelManager::new(Arc::clone(&heartbeat), renderer.clone())
        .with_resolver(Arc::new(resolver))
        .with_config(config.clone());

    let rainbow = manager
        .cache()
        .get_or_create_legacy(&["&c&lARENA", "&6&lARENA", "&e&lARENA", "&a&lARENA", "&b&lARENA"], 4)?;

    for viewer in 1..=3 {
        let panel = manager.create(ViewerId(viewer))?;
        let mut panel = panel.lock();
        panel.set_animated_title(rainbow.clone().into())?;
        panel.set_line_text(6, "&7Viewer &f#%viewer%")?;
        panel.set_line_text(5, "&aOnline: &f%online%")?;
        panel.set_line(4, StyledText::plain(""))?;
        panel.set_line_text_with_badge(3, "&#ff8800Kills", "&c12")?;
        panel.set_animated_line(
            2,
            ExclusiveAnimation::from_legacy(&["&e>    ", "&e >   ", "&e  >  ", "&e   > "], 2)?.into(),
        )?;
        panel.set_line_text(1, "&8play.example.net - a long footer line that overflows")?;
    }
    drop(rainbow);

    heartbeat.start()?;
    let mut paint_error = None;
    TickSource::from_config(&config).drive(&heartbeat, |report| {
        if renderer.is_dirty(ViewerId(1)) {
            if let Err(err) = renderer.present(ViewerId(1)) {
                paint_error = Some(err);
                return false;
            }
        }
        report.tick < TICKS
    })?;
    if let Some(err) = paint_error {
        return Err(err.into());
    }

    manager.destroy_all()?;
    heartbeat.stop()?;
    Ok(())
}
