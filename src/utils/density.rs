use crate::config::REPLAY;

/// Axis label spacing: show one label every `n` points so that labels of
/// `min_label_width_px` fit into `pixel_width`.
pub fn label_interval(buffer_len: usize, pixel_width: f64) -> usize {
    label_interval_with(buffer_len, pixel_width, REPLAY.density.min_label_width_px)
}

pub fn label_interval_with(
    buffer_len: usize,
    pixel_width: f64,
    min_label_width_px: f64,
) -> usize {
    if pixel_width.is_nan() || pixel_width <= 0.0 || min_label_width_px <= 0.0 {
        return 1;
    }
    let max_labels = ((pixel_width / min_label_width_px).floor() as usize).max(1);
    (buffer_len / max_labels).max(1)
}
