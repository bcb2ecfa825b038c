use std::fmt::Write as _;

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

const MIN_COLUMN: usize = 4;
const GAP: &str = "  ";

/// Render rows as space-aligned columns under a dashed header rule.
///
/// Numeric cells are right-aligned. When `max_width` is set the widest
/// columns are narrowed first and overflowing cells end in `…`.
#[must_use]
pub fn render_rows(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths = column_widths(headers, rows);
    if let Some(max_width) = options.max_width {
        shrink_to(&mut widths, headers, max_width);
    }

    let mut out = String::new();
    let header = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(&clip(h, *w), *w, false))
        .collect::<Vec<_>>()
        .join(GAP);
    let rule_len = header.chars().count();
    let _ = writeln!(out, "{header}");
    out.push_str(&"-".repeat(rule_len));

    for row in rows {
        out.push('\n');
        let line = widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let cell = clip(row.get(i).map_or("-", String::as_str), *w);
                let padded = pad(&cell, *w, is_numeric(&cell));
                if options.color {
                    paint(&cell, padded)
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join(GAP);
        out.push_str(line.trim_end());
    }
    out
}

fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
                .max(MIN_COLUMN)
        })
        .collect()
}

fn shrink_to(widths: &mut [usize], headers: &[&str], max_width: usize) {
    let gaps = widths.len().saturating_sub(1) * GAP.len();
    while widths.iter().sum::<usize>() + gaps > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(i, w)| **w > headers[*i].chars().count().max(MIN_COLUMN))
            .max_by_key(|(_, w)| **w)
            .map(|(i, _)| i);
        let Some(i) = widest else {
            break;
        };
        widths[i] -= 1;
    }
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    if right_align {
        format!("{value:>width$}")
    } else {
        format!("{value:<width$}")
    }
}

fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().is_ok()
}

/// Color reconcile states and Yes/No flags.
fn paint(cell: &str, padded: String) -> String {
    let code = match cell.trim() {
        "applied" | "Yes" => "32",
        "skipped_no_trigger" | "skipped_resolve_failed" | "not found" => "33",
        "failed" => "31",
        _ => return padded,
    };
    format!("\u{1b}[{code}m{padded}\u{1b}[0m")
}
