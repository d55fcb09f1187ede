//! Writing command results to stdout in the `--output` format.

use std::io::{self, Write};

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::{GlobalOpts, OutputFormat};

/// A view shown as one row of a table.
pub trait Listed: Serialize {
    type Row: Tabled;

    fn row(&self) -> Self::Row;

    /// What `--output plain` prints for this item.
    fn key(&self) -> String;
}

/// A view shown on its own as `Label: value` lines.
pub trait Detailed: Serialize {
    fn fields(&self) -> Vec<(&'static str, String)>;

    fn key(&self) -> String;
}

pub struct Printer {
    format: OutputFormat,
    quiet: bool,
}

impl Printer {
    pub fn new(global: &GlobalOpts) -> Self {
        Self {
            format: global.output.clone(),
            quiet: global.quiet,
        }
    }

    pub fn format(&self) -> &OutputFormat {
        &self.format
    }

    pub fn list<T: Listed>(&self, items: &[T]) {
        let text = match self.format {
            OutputFormat::Table => Table::new(items.iter().map(T::row))
                .with(Style::rounded())
                .to_string(),
            OutputFormat::Plain => items.iter().map(T::key).collect::<Vec<_>>().join("\n"),
            OutputFormat::Json | OutputFormat::JsonCompact => self.json(items),
        };
        self.emit(&text);
    }

    pub fn detail<T: Detailed>(&self, item: &T) {
        let text = match self.format {
            OutputFormat::Table => labelled(&item.fields()),
            OutputFormat::Plain => item.key(),
            OutputFormat::Json | OutputFormat::JsonCompact => self.json(item),
        };
        self.emit(&text);
    }

    /// Compact for `json-compact`, pretty otherwise.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> String {
        let rendered = match self.format {
            OutputFormat::JsonCompact => serde_json::to_string(value),
            _ => serde_json::to_string_pretty(value),
        };
        rendered.unwrap_or_default()
    }

    pub fn emit(&self, text: &str) {
        let text = text.trim_end();
        if self.quiet || text.is_empty() {
            return;
        }
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{text}");
    }
}

fn labelled(fields: &[(&str, String)]) -> String {
    let width = fields.iter().map(|(label, _)| label.len() + 1).max().unwrap_or(0);
    fields
        .iter()
        .map(|(label, value)| format!("{:<width$} {value}", format!("{label}:")))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Lamp {
        id: &'static str,
        level: u8,
    }

    fn printer(format: OutputFormat) -> Printer {
        Printer {
            format,
            quiet: false,
        }
    }

    #[test]
    fn labels_are_aligned() {
        let text = labelled(&[("Lightpad", "abcd".into()), ("On", "yes".into())]);
        assert_eq!(text, "Lightpad: abcd\nOn:       yes");
    }

    #[test]
    fn compact_json_is_single_line() {
        let lamp = Lamp { id: "abcd", level: 40 };
        assert_eq!(
            printer(OutputFormat::JsonCompact).json(&lamp),
            r#"{"id":"abcd","level":40}"#
        );
        assert!(printer(OutputFormat::Json).json(&lamp).contains('\n'));
    }
}
