//! Placeholder resolution.
//!
//! Rows and titles set from raw strings may contain `%name%` placeholders
//! that an external service substitutes per viewer. Such slots are
//! re-evaluated on a fixed interval.

use crate::error::ResolveError;
use crate::panel::ViewerId;
use std::borrow::Cow;
use tracing::warn;

/// External placeholder-substitution service.
///
/// Implementations must be synchronous and fast; they run inline on the
/// update thread during a tick.
pub trait PlaceholderResolver: Send + Sync {
    /// Substitute placeholders in `raw` for `viewer`.
    fn resolve(&self, viewer: ViewerId, raw: &str) -> Result<String, ResolveError>;

    /// Whether `raw` may contain placeholders worth re-evaluating.
    fn contains_placeholders(&self, raw: &str) -> bool {
        has_placeholders(raw)
    }
}

/// Heuristic: at least two `%` characters.
pub fn has_placeholders(text: &str) -> bool {
    text.find('%')
        .is_some_and(|first| text[first + 1..].contains('%'))
}

/// Resolve, falling back to the raw text if the service fails.
pub fn resolve_or_raw<'a>(resolver: &dyn PlaceholderResolver, viewer: ViewerId, raw: &'a str) -> Cow<'a, str> {
    match resolver.resolve(viewer, raw) {
        Ok(resolved) => Cow::Owned(resolved),
        Err(err) => {
            warn!(%viewer, error = %err, "placeholder resolution failed, showing raw text");
            Cow::Borrowed(raw)
        }
    }
}

/// Resolver used when no placeholder service is installed: returns text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPlaceholders;

impl PlaceholderResolver for NoPlaceholders {
    fn resolve(&self, _viewer: ViewerId, raw: &str) -> Result<String, ResolveError> {
        Ok(raw.to_owned())
    }
}

impl<F> PlaceholderResolver for F
where
    F: Fn(ViewerId, &str) -> Result<String, ResolveError> + Send + Sync,
{
    fn resolve(&self, viewer: ViewerId, raw: &str) -> Result<String, ResolveError> {
        self(viewer, raw)
    }
}
