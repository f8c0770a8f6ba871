/// Standard output utilities for consistent command formatting
use crate::core::ResultRow;
use colored::*;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color as TableColor, ContentArrangement, Table};

pub fn section_header(title: &str) {
    println!("\n{}", title.bold().cyan());
}

pub fn section_header_with_line(title: &str) {
    println!("\n{}", title.bold().cyan());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn info(message: &str) {
    println!("{} {}", "●".blue(), message);
}

pub fn warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Display an empty/none indicator
pub fn empty(message: &str) {
    println!("{} {}", "◌".dimmed(), message);
}

/// Tree structure item
pub fn tree_item(is_last: bool, label: &str, value: Option<&str>) {
    let prefix = if is_last { "└─" } else { "├─" };
    if let Some(val) = value {
        println!("{} {}: {}", prefix.dimmed(), label, val);
    } else {
        println!("{} {}", prefix.dimmed(), label);
    }
}

/// Create a standard table with our preferred styling
pub fn create_standard_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .add_attribute(Attribute::Bold)
        .fg(TableColor::Cyan)
}

/// Format a number with thousands separator
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Short flag summary, e.g. `exact, vernacular`
pub fn match_flags(row: &ResultRow) -> String {
    let mut flags = Vec::new();
    if row.exact {
        flags.push("exact");
    }
    if row.near {
        flags.push("near");
    }
    if row.vernacular_matched {
        flags.push("vernacular");
    }
    flags.join(", ")
}

/// Ranked rows as a table; synonyms show the accepted name
pub fn results_table(rows: &[ResultRow]) -> Table {
    let mut table = create_standard_table();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Id"),
        header_cell("Name"),
        header_cell("Authority"),
        header_cell("Vernacular"),
        header_cell("Match"),
        header_cell("Accepted"),
    ]);

    for (rank, row) in rows.iter().enumerate() {
        let name = if row.exact {
            Cell::new(&row.qname).add_attribute(Attribute::Bold)
        } else {
            Cell::new(&row.qname)
        };

        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&row.entity_id),
            name,
            Cell::new(&row.authority),
            Cell::new(&row.vernacular),
            Cell::new(match_flags(row)),
            Cell::new(row.accepted_qname.as_deref().unwrap_or("")),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_match_flags() {
        let row = ResultRow {
            exact: true,
            vernacular_matched: true,
            ..ResultRow::default()
        };
        assert_eq!(match_flags(&row), "exact, vernacular");
        assert_eq!(match_flags(&ResultRow::default()), "");
    }

    #[test]
    fn test_results_table_has_row_per_result() {
        let rows = vec![
            ResultRow {
                entity_id: "a".to_string(),
                qname: "Rosa canina".to_string(),
                ..ResultRow::default()
            },
            ResultRow {
                entity_id: "b".to_string(),
                qname: "Rosa arvensis".to_string(),
                ..ResultRow::default()
            },
        ];
        let table = results_table(&rows);
        assert_eq!(table.row_iter().count(), 2);
    }
}
