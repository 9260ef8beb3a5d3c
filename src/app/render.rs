//! Text rendering of a panel window for the terminal front-end.

use {
    crate::{
        engine::PanelSnapshot,
        models::OrderMark,
        utils::label_interval,
    },
    tabled::{builder::Builder, settings::Style},
};

/// Table of the newest `rows` points of a panel.
///
/// The time column follows the axis label density for `pixel_width`: only every
/// n-th point (counted from the oldest point in the window) carries a label.
pub fn render_window(
    snapshot: &PanelSnapshot,
    marks: &[OrderMark],
    pixel_width: f64,
    rows: usize,
) -> String {
    let buffer = &snapshot.buffer;
    let every = label_interval(buffer.len(), pixel_width);

    let mut header = vec!["#".to_string(), "TIME (UTC+8)".to_string()];
    header.extend(buffer.series_names().iter().cloned());
    header.push("ORDER".to_string());

    let mut builder = Builder::default();
    builder.push_record(header);

    let start = buffer.len().saturating_sub(rows);
    for (index, at) in buffer.timestamps().iter().enumerate().skip(start) {
        let label = if index % every == 0 {
            at.to_display_utc8()
        } else {
            String::new()
        };

        let mut record = vec![index.to_string(), label];
        record.extend(buffer.series_names().iter().map(|name| {
            buffer
                .value_at(name, index)
                .map(|v| format!("{:.4}", v))
                .unwrap_or_default()
        }));

        let order = marks
            .iter()
            .filter(|m| &m.at == at)
            .map(|m| m.side.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        record.push(order);

        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    format!(
        "{} [{}] {}/{} points, cursor {}\n{}",
        snapshot.panel,
        snapshot.phase,
        buffer.len(),
        buffer.capacity(),
        snapshot
            .cursor
            .as_ref()
            .map_or_else(|| "-".to_string(), |c| c.to_display_utc8()),
        table
    )
}
