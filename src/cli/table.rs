//! Table output shared by the list commands
//!
//! Commands declare their columns once as a `&[ColumnDef]`, convert records
//! into [`TableRow`]s and hand them to a [`TableFormatter`], which renders
//! the requested format.

use chrono::{DateTime, Utc};
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::helpers::{format_date, format_meters, format_short_id, truncate_str};
use crate::cli::OutputFormat;
use crate::core::entity::{Priority, Status};

/// A column a list command can show
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A typed table cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Id(String),
    Text(String),
    Status(Status),
    Priority(Priority),
    Date(DateTime<Utc>),
    Meters(Decimal),
    Number(u64),
    Empty,
}

impl CellValue {
    /// Full value, used for CSV and TSV
    pub fn plain(&self) -> String {
        match self {
            CellValue::Id(id) => id.clone(),
            CellValue::Text(text) => text.clone(),
            CellValue::Status(status) => status.to_string(),
            CellValue::Priority(priority) => priority.to_string(),
            CellValue::Date(date) => format_date(*date),
            CellValue::Meters(meters) => meters.normalize().to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// Human display, shortened to fit `width`
    pub fn display(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => format_short_id(id),
            CellValue::Status(status) => status.label(),
            CellValue::Meters(meters) => format_meters(*meters),
            CellValue::Empty => "-".to_string(),
            other => truncate_str(&other.plain(), width),
        }
    }
}

/// One record's cells, keyed by column
#[derive(Debug, Clone)]
pub struct TableRow {
    pub id: String,
    cells: HashMap<&'static str, CellValue>,
}

impl TableRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cells: HashMap::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> &CellValue {
        self.cells.get(key).unwrap_or(&CellValue::Empty)
    }
}

/// Renders rows in any list format
pub struct TableFormatter {
    columns: &'static [ColumnDef],
    entity_name: &'static str,
}

impl TableFormatter {
    pub fn new(columns: &'static [ColumnDef], entity_name: &'static str) -> Self {
        Self {
            columns,
            entity_name,
        }
    }

    fn visible_columns(&self, visible: &[&str]) -> Vec<&ColumnDef> {
        if visible.is_empty() {
            return self.columns.iter().collect();
        }
        visible
            .iter()
            .filter_map(|key| self.columns.iter().find(|c| c.key == *key))
            .collect()
    }

    /// Bordered table for terminals
    pub fn render_table(&self, rows: &[TableRow], visible: &[&str]) -> String {
        let columns = self.visible_columns(visible);
        let mut builder = Builder::default();
        builder.push_record(columns.iter().map(|c| c.header.to_string()));
        for row in rows {
            builder.push_record(columns.iter().map(|c| row.get(c.key).display(c.width)));
        }
        let mut table = builder.build();
        table.with(Style::rounded());
        table.to_string()
    }

    /// Tab-separated, header first, full values
    pub fn render_tsv(&self, rows: &[TableRow], visible: &[&str]) -> String {
        let columns = self.visible_columns(visible);
        let mut out = String::new();
        let header: Vec<&str> = columns.iter().map(|c| c.header).collect();
        out.push_str(&header.join("\t"));
        out.push('\n');
        for row in rows {
            let cells: Vec<String> = columns
                .iter()
                .map(|c| row.get(c.key).plain().replace(['\t', '\n'], " "))
                .collect();
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
        out
    }

    pub fn render_csv(&self, rows: &[TableRow], visible: &[&str]) -> Result<String> {
        let columns = self.visible_columns(visible);
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(columns.iter().map(|c| c.key))
            .into_diagnostic()?;
        for row in rows {
            writer
                .write_record(columns.iter().map(|c| row.get(c.key).plain()))
                .into_diagnostic()?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| miette::miette!("Failed to write CSV: {}", e))?;
        String::from_utf8(bytes).into_diagnostic()
    }

    /// Print rows in `format`
    pub fn output(&self, rows: Vec<TableRow>, format: OutputFormat, visible: &[&str]) -> Result<()> {
        match format {
            OutputFormat::Id => {
                for row in &rows {
                    println!("{}", row.id);
                }
            }
            OutputFormat::Tsv => print!("{}", self.render_tsv(&rows, visible)),
            OutputFormat::Csv => print!("{}", self.render_csv(&rows, visible)?),
            _ => {
                if rows.is_empty() {
                    println!("No {}s found.", self.entity_name);
                    return Ok(());
                }
                println!("{}", self.render_table(&rows, visible));
                println!(
                    "{} {}(s) shown",
                    console::style(rows.len()).cyan(),
                    self.entity_name
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("id", "ID", 12),
        ColumnDef::new("name", "NAME", 10),
        ColumnDef::new("meters", "METERS", 10),
    ];

    fn rows() -> Vec<TableRow> {
        vec![TableRow::new("65f1c2a9e4b0a1b2c3d4e5f6")
            .cell("id", CellValue::Id("65f1c2a9e4b0a1b2c3d4e5f6".to_string()))
            .cell("name", CellValue::Text("Denim, heavy".to_string()))
            .cell("meters", CellValue::Meters(Decimal::new(1200, 1)))]
    }

    #[test]
    fn test_tsv_uses_full_values() {
        let out = TableFormatter::new(COLUMNS, "item").render_tsv(&rows(), &[]);
        assert_eq!(out, "ID\tNAME\tMETERS\n65f1c2a9e4b0a1b2c3d4e5f6\tDenim, heavy\t120\n");
    }

    #[test]
    fn test_csv_quotes_commas() {
        let out = TableFormatter::new(COLUMNS, "item")
            .render_csv(&rows(), &["name", "meters"])
            .unwrap();
        assert_eq!(out, "name,meters\n\"Denim, heavy\",120\n");
    }

    #[test]
    fn test_table_shortens_cells() {
        let out = TableFormatter::new(COLUMNS, "item").render_table(&rows(), &[]);
        assert!(out.contains("65f1c2a9e4…"));
        assert!(out.contains("Denim, ..."));
        assert!(out.contains("120 m"));
    }

    #[test]
    fn test_missing_cell_is_empty() {
        let row = TableRow::new("x");
        assert_eq!(row.get("name"), &CellValue::Empty);
        assert_eq!(row.get("name").display(5), "-");
    }
}
