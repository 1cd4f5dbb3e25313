/// Normalized progress of a phase that started at `start_ms`.
///
/// Saturates at both ends: a clock that jumped backwards reads 0 and an
/// overrun phase reads 1. A non-positive or non-finite duration is treated
/// as already complete.
pub fn phase_progress(now_ms: f64, start_ms: f64, duration_ms: f64) -> f64 {
    if !duration_ms.is_finite() || duration_ms <= 0.0 {
        return 1.0;
    }
    let raw = (now_ms - start_ms) / duration_ms;
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timer.rs"]
mod tests;
