//! Table definitions for snapshot databases
//!
//! Every sheet becomes one table named after the sheet, with one `TEXT`
//! column per record field, in sheet order.

use crate::records::{
    Admission, CostOfLiving, Lab, Notes, Outcome, Program, Record, Scholarship, Timeline,
    University,
};
use rusqlite::Connection;

/// Sheet names and their columns, in workbook order
pub fn sheets() -> [(&'static str, &'static [&'static str]); 9] {
    [
        (University::SHEET, University::COLUMNS),
        (Program::SHEET, Program::COLUMNS),
        (Lab::SHEET, Lab::COLUMNS),
        (Scholarship::SHEET, Scholarship::COLUMNS),
        (Admission::SHEET, Admission::COLUMNS),
        (CostOfLiving::SHEET, CostOfLiving::COLUMNS),
        (Outcome::SHEET, Outcome::COLUMNS),
        (Notes::SHEET, Notes::COLUMNS),
        (Timeline::SHEET, Timeline::COLUMNS),
    ]
}

/// Quotes an SQL identifier; sheet and column names carry spaces and symbols
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn create_table_sql(sheet: &str, columns: &[&str]) -> String {
    let columns: Vec<String> = columns
        .iter()
        .map(|c| format!("{} TEXT NOT NULL", quote_ident(c)))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_ident(sheet),
        columns.join(", ")
    )
}

pub fn insert_sql(sheet: &str, columns: &[&str]) -> String {
    let names: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(sheet),
        names.join(", "),
        placeholders.join(", ")
    )
}

/// Creates every sheet table
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    for (sheet, columns) in sheets() {
        conn.execute(&create_table_sql(sheet, columns), [])?;
    }
    Ok(())
}
