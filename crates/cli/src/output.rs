//! Output formatting for CLI

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Plain text format
    Plain,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

fn table_of<T: TableDisplay>(items: &[T]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(T::headers());
    for item in items {
        table.add_row(item.row());
    }
    table
}

fn plain_lines<T: TableDisplay>(item: &T) -> String {
    T::headers()
        .iter()
        .zip(item.row())
        .map(|(header, value)| format!("{}: {}", header, value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a single item
pub fn render_item<T: Serialize + TableDisplay>(item: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => table_of(std::slice::from_ref(item)).to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(item).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(item).unwrap_or_default(),
        OutputFormat::Plain => plain_lines(item),
    }
}

/// Render a list of items
pub fn render_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table if items.is_empty() => "No quotes found.".to_string(),
        OutputFormat::Table => table_of(items).to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(items).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(items).unwrap_or_default(),
        OutputFormat::Plain => items
            .iter()
            .map(plain_lines)
            .collect::<Vec<_>>()
            .join("\n---\n"),
    }
}

/// Print a single item
pub fn print_item<T: Serialize + TableDisplay>(item: &T, format: OutputFormat) {
    println!("{}", render_item(item, format));
}

/// Print a list of items
pub fn print_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) {
    println!("{}", render_list(items, format));
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", "✔".green(), message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✘".red(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        id: u64,
        text: String,
    }

    impl TableDisplay for Row {
        fn headers() -> Vec<&'static str> {
            vec!["ID", "Text"]
        }

        fn row(&self) -> Vec<String> {
            vec![self.id.to_string(), self.text.clone()]
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: 1, text: "CSS rulez".into() },
            Row { id: 2, text: "This is fun!".into() },
        ]
    }

    #[test]
    fn test_plain_list() {
        assert_eq!(
            render_list(&rows(), OutputFormat::Plain),
            "ID: 1\nText: CSS rulez\n---\nID: 2\nText: This is fun!"
        );
    }

    #[test]
    fn test_json_and_yaml() {
        let json = render_list(&rows(), OutputFormat::Json);
        assert!(json.contains("\"text\": \"CSS rulez\""));
        let yaml = render_item(&rows()[0], OutputFormat::Yaml);
        assert!(yaml.contains("text: CSS rulez"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(render_list::<Row>(&[], OutputFormat::Table), "No quotes found.");
        assert!(render_list(&rows(), OutputFormat::Table).contains("This is fun!"));
    }
}
