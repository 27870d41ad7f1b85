//! Logging hook for event observation.

use simhook_core::{BoxError, Context, Hook};
use std::any::Any;

/// A hook that logs every dispatch it sees.
///
/// Logs the hook kind, the event path, its metadata and, inside a firing,
/// the firing id. Register it on a topic covering `::` to trace a whole run.
#[derive(Debug, Clone, Copy)]
pub struct LoggingHook {
    name: &'static str,
}

impl LoggingHook {
    /// Create a new `LoggingHook` with a default name.
    pub const fn new() -> Self {
        Self { name: "simhook" }
    }

    /// Create a new `LoggingHook` with a custom name, used as a log field.
    pub const fn named(name: &'static str) -> Self {
        Self { name }
    }

    /// The name used in log records.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Default for LoggingHook {
    fn default() -> Self {
        Self::new()
    }
}

impl Hook for LoggingHook {
    fn on_event(&self, ctx: &Context, data: &dyn Any) -> Result<(), BoxError> {
        #[cfg(feature = "tracing")]
        {
            let _ = data;
            tracing::info!(
                name = %self.name,
                hook = %ctx.hook(),
                event = %ctx.event_path(),
                metadata = %ctx.metadata(),
                firing = ctx.raw_event().map(|raw| raw.id()),
                "event observed"
            );
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = (ctx, data);
        }
        Ok(())
    }
}
