/// Time `$block` and warn when it runs longer than `$limit_micros`.
/// Compiles to the bare block when `DF.log_performance` is off.
#[macro_export]
macro_rules! trace_time {
    ($label:expr, $limit_micros:expr, $block:block) => {{
        if $crate::config::LOG_PERFORMANCE {
            let started = std::time::Instant::now();
            let value = $block;
            let elapsed = started.elapsed().as_micros();
            if elapsed > $limit_micros {
                log::warn!(
                    "Replay cycle '{}' is slow: {:.1}ms against a {:.1}ms budget.",
                    $label,
                    elapsed as f64 / 1000.0,
                    $limit_micros as f64 / 1000.0
                );
            }
            value
        } else {
            $block
        }
    }};
}
