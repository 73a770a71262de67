//! Line-delimited JSON output: a header line, then one line per field row and
//! one per table row.

use crate::diff::{DiffReport, DiffStatus, FieldRow, TableDiffRow};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum JsonLine<'a> {
    Header {
        version: &'a str,
        errors: &'a [String],
    },
    Field(&'a FieldRow),
    TableRow {
        path: &'a str,
        #[serde(flatten)]
        row: &'a TableDiffRow,
    },
}

/// Writes `report` as JSON Lines. With `changes_only`, unchanged rows are
/// left out.
pub fn write_json_lines<W: Write>(
    mut w: W,
    report: &DiffReport,
    changes_only: bool,
) -> io::Result<()> {
    write_line(
        &mut w,
        &JsonLine::Header {
            version: &report.version,
            errors: &report.errors,
        },
    )?;

    for field in &report.fields {
        if changes_only && field.status == DiffStatus::Unchanged {
            continue;
        }
        write_line(&mut w, &JsonLine::Field(field))?;
    }

    for table in &report.tables {
        for row in &table.rows {
            if changes_only && row.status == DiffStatus::Unchanged {
                continue;
            }
            write_line(
                &mut w,
                &JsonLine::TableRow {
                    path: &table.path,
                    row,
                },
            )?;
        }
    }
    w.flush()
}

fn write_line<W: Write>(w: &mut W, line: &JsonLine<'_>) -> io::Result<()> {
    serde_json::to_writer(&mut *w, line).map_err(io::Error::other)?;
    w.write_all(b"\n")
}
