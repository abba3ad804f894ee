use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One labelled value in a human-readable report.
pub type Field = (&'static str, String);

/// Print a single record: JSON from `record`, table and pretty from `fields`.
pub fn print_record<T: Serialize>(record: &T, fields: &[Field], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(record),
        OutputFormat::Table => {
            let mut table = new_table(vec!["FIELD", "VALUE"]);
            for (name, value) in fields {
                table.add_row(vec![name.to_string(), value.clone()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (name, value) in fields {
                println!("{name}: {value}");
            }
        }
    }
}

/// Print a record followed by rows: JSON from `record`, otherwise the
/// summary fields then a table (or `key=value` lines) of rows.
pub fn print_rows<T: Serialize>(
    record: &T,
    fields: &[Field],
    header: &[&'static str],
    rows: &[Vec<String>],
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => print_json(record),
        OutputFormat::Table => {
            print_record(record, fields, OutputFormat::Table);
            let mut table = new_table(header.to_vec());
            for row in rows {
                table.add_row(row.clone());
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            print_record(record, fields, OutputFormat::Pretty);
            for row in rows {
                let line: Vec<String> = header
                    .iter()
                    .zip(row)
                    .map(|(name, value)| format!("{}={value}", name.to_lowercase()))
                    .collect();
                println!("{}", line.join(" "));
            }
        }
    }
}

fn print_json<T: Serialize>(record: &T) {
    println!(
        "{}",
        serde_json::to_string(record).unwrap_or_else(|_| "{}".to_string())
    );
}

fn new_table(header: Vec<&'static str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn hex_string(data: &[u8]) -> String {
    hex::encode(data)
}

/// UTF-8 text when the bytes are printable, `None` otherwise.
pub fn text_preview(data: &[u8]) -> Option<String> {
    std::str::from_utf8(data)
        .ok()
        .filter(|text| !text.chars().any(|c| c.is_control() && !c.is_whitespace()))
        .map(str::to_owned)
}

pub fn crc_string(crc: u32) -> String {
    format!("0x{crc:08x}")
}
