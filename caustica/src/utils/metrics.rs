use std::time::{Duration, Instant};

/// Runs given function, returning its result together with how long it took.
pub fn measure<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let tt = Instant::now();
    let val = f();

    (val, tt.elapsed())
}

/// Runs given function and, with the `metrics` feature enabled, logs how
/// long it took.
pub fn metric<T>(name: &str, f: impl FnOnce() -> T) -> T {
    let (val, tt) = measure(f);

    #[cfg(feature = "metrics")]
    log::trace!("{name}: {}", humantime::format_duration(tt));

    #[cfg(not(feature = "metrics"))]
    let _ = (name, tt);

    val
}
