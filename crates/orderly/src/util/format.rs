//! Plain-text rendering helpers for command output

/// Format a funnel value: two decimals, with a `%` suffix for rates
pub fn format_value(value: f64, percentage: bool) -> String {
    // Avoid printing "-0.00"
    let value = if value.abs() < 0.005 { 0.0 } else { value };
    if percentage {
        format!("{value:.2}%")
    } else {
        format!("{value:.2}")
    }
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    line.join("  ").trim_end().to_string()
}

/// Render rows as a left-aligned table with a header and a rule under it
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(render_row(headers.iter().copied(), &widths));
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        out.push(render_row(row.iter().map(String::as_str), &widths));
    }
    out.join("\n")
}
