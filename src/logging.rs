/// Conditional logging module for development builds
///
/// The `dev_log!` macro provides informational tracing that is compiled out
/// in production (release) builds by default. Warnings about bad input should
/// continue using `log::warn!` directly so they survive in every build.
///
/// Logging is enabled when either:
/// - Building in debug mode (`cfg(debug_assertions)`)
/// - The `console_logging` feature is explicitly enabled
///
/// Output goes through the `log` facade, so whichever logger the host installs
/// (`env_logger` in the tests and benches) decides where it ends up.
///
/// # Examples
///
/// ```rust,ignore
/// use crate::logging::dev_log;
///
/// dev_log!("Split node {} into {}", node, sibling);
/// ```
macro_rules! dev_log {
    ($($arg:tt)+) => {
        #[cfg(any(debug_assertions, feature = "console_logging"))]
        {
            ::log::debug!($($arg)+);
        }
    };
}

pub(crate) use dev_log;

/// Wall-clock timer for a processing phase, only compiled with `perf_timing`.
#[cfg(feature = "perf_timing")]
pub(crate) struct PhaseTimer {
    label: &'static str,
    start: std::time::Instant,
}

#[cfg(feature = "perf_timing")]
impl PhaseTimer {
    pub(crate) fn start(label: &'static str) -> Self {
        Self {
            label,
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "perf_timing")]
impl Drop for PhaseTimer {
    fn drop(&mut self) {
        ::log::info!("{} took {:?}", self.label, self.start.elapsed());
    }
}
