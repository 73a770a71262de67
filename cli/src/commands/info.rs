use anyhow::{Context, Result};
use record_diff::{collect, format_field_value, parse_json};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

pub fn run(path: &Path) -> Result<ExitCode> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read record: {}", path.display()))?;
    let node = parse_json(&text)
        .with_context(|| format!("Failed to parse record: {}", path.display()))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let filename = path
        .file_name()
        .map(|s| s.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());
    writeln!(handle, "Record: {}", filename)?;

    let Some(node) = node else {
        writeln!(handle, "(empty)")?;
        return Ok(ExitCode::from(0));
    };
    let collected = collect(&node);

    let mut keys: Vec<&String> = collected.fields.keys().collect();
    keys.sort();
    writeln!(handle, "Fields: {}", keys.len())?;
    for key in keys {
        writeln!(
            handle,
            "  - {} = {}",
            key,
            format_field_value(&collected.fields[key])
        )?;
    }

    let mut paths: Vec<&String> = collected.tables.keys().collect();
    paths.sort();
    writeln!(handle, "Tables: {}", paths.len())?;
    for path in paths {
        let table = &collected.tables[path];
        let title = table
            .name
            .as_deref()
            .map(|t| format!(" ({})", t))
            .unwrap_or_default();
        writeln!(
            handle,
            "  - \"{}\"{} {}x{}, columns: {}",
            path,
            title,
            table.rows.len(),
            table.columns.len(),
            table.columns.join(", ")
        )?;
    }

    Ok(ExitCode::from(0))
}
