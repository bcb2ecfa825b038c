use serde::Serialize;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Rows that know how to lay themselves out as table columns.
pub trait Tabular {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

/// Render rows in the requested format.
///
/// JSON and raw output serialize the rows themselves; table output uses
/// [`Tabular`].
pub fn render<T: Serialize + Tabular>(rows: &[T], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Raw => Ok(serde_json::to_string(rows)?),
        OutputFormat::Table => {
            if rows.is_empty() {
                return Ok(String::from("(no rows)"));
            }
            let prefs = ui::prefs();
            let cells = rows.iter().map(Tabular::cells).collect::<Vec<_>>();
            Ok(table::render_rows(
                T::HEADERS,
                &cells,
                table::TableOptions {
                    max_width: prefs.term_width,
                    color: prefs.table_color,
                },
            ))
        }
    }
}

/// Print rows to stdout in the requested format.
pub fn output<T: Serialize + Tabular>(rows: &[T], format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(rows, format)?;
    println!("{rendered}");
    Ok(())
}

/// Confidence as shown in tables.
#[must_use]
pub fn confidence(value: f64) -> String {
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::{Tabular, render};
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Example {
        id: &'static str,
        value: u32,
    }

    impl Tabular for Example {
        const HEADERS: &'static [&'static str] = &["id", "value"];

        fn cells(&self) -> Vec<String> {
            vec![self.id.to_string(), self.value.to_string()]
        }
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&[Example { id: "x", value: 7 }], OutputFormat::Json)
            .expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed[0]["id"], "x");
        assert_eq!(parsed[0]["value"], 7);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&[Example { id: "x", value: 7 }], OutputFormat::Raw)
            .expect("raw render should work");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn table_render_uses_declared_headers() {
        let out = render(&[Example { id: "x", value: 7 }], OutputFormat::Table)
            .expect("table render should work");
        let header = out.lines().next().unwrap();
        assert!(header.starts_with("id"));
        assert!(header.contains("value"));
    }

    #[test]
    fn empty_table_says_so() {
        let rows: [Example; 0] = [];
        assert_eq!(render(&rows, OutputFormat::Table).unwrap(), "(no rows)");
    }
}
