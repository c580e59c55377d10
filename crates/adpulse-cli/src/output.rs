//! Rendering of command results to stdout.

use serde_json::Value;

use crate::cli::OutputFormat;
use crate::commands::CommandResult;
use crate::error::CliError;

pub fn render(
    result: &CommandResult,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(&result.data)?
            } else {
                serde_json::to_string(&result.data)?
            };
            println!("{payload}");
        }
        OutputFormat::Csv => match &result.csv {
            Some(csv) => print!("{csv}"),
            None => {
                return Err(CliError::Command(String::from(
                    "csv output is not available for this command",
                )))
            }
        },
        OutputFormat::Table => render_table(&result.data)?,
    }

    Ok(())
}

/// Builds a `;`-delimited CSV document with a header row.
pub fn csv_document(columns: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    out.push_str(&columns.join(";"));
    out.push('\n');
    for row in rows {
        out.push_str(&row.join(";"));
        out.push('\n');
    }
    out
}

/// Prints top-level scalars as `key: value` lines and arrays of flat
/// objects as aligned columns.
fn render_table(data: &Value) -> Result<(), CliError> {
    let Some(object) = data.as_object() else {
        println!("{}", serde_json::to_string_pretty(data)?);
        return Ok(());
    };

    for (key, value) in object {
        match value {
            Value::Array(rows) if !rows.is_empty() && rows.iter().all(Value::is_object) => {
                println!("{key}:");
                print_rows(rows);
            }
            Value::Array(rows) if rows.is_empty() => {
                println!("{key}: (empty)");
            }
            Value::Object(_) => {
                println!("{key}:");
                let pretty = serde_json::to_string_pretty(value)?;
                for line in pretty.lines() {
                    println!("  {line}");
                }
            }
            other => println!("{key}: {}", scalar(other)),
        }
    }

    Ok(())
}

fn print_rows(rows: &[Value]) {
    let headers: Vec<String> = match rows[0].as_object() {
        Some(map) => map.keys().cloned().collect(),
        None => return,
    };

    let mut widths: Vec<usize> = headers.iter().map(String::len).collect();
    let mut cells: Vec<Vec<String>> = Vec::with_capacity(rows.len());
    for row in rows {
        let mut line = Vec::with_capacity(headers.len());
        for (index, header) in headers.iter().enumerate() {
            let cell = row.get(header).map(scalar).unwrap_or_default();
            widths[index] = widths[index].max(cell.chars().count());
            line.push(cell);
        }
        cells.push(line);
    }

    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{h:<width$}", width = widths[i]))
        .collect();
    println!("  {}", header_line.join("  "));

    for line in cells {
        let rendered: Vec<String> = line
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{cell:<width$}", width = widths[i]))
            .collect();
        println!("  {}", rendered.join("  ").trim_end());
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
