use crate::commands::diff::Verbosity;
use anyhow::Result;
use record_diff::{
    CellDiff, DiffReport, DiffSpan, DiffStatus, FieldRow, SpanKind, TableDiff, TableDiffRow,
};
use std::io::Write;

pub fn write_text_report<W: Write>(
    w: &mut W,
    report: &DiffReport,
    left_label: &str,
    right_label: &str,
    verbosity: Verbosity,
) -> Result<()> {
    if !report.has_differences() {
        writeln!(w, "No differences found.")?;
        write_summary(w, report, verbosity)?;
        return Ok(());
    }

    if verbosity != Verbosity::Quiet {
        writeln!(w, "--- {}", left_label)?;
        writeln!(w, "+++ {}", right_label)?;
        writeln!(w)?;
        write_fields(w, &report.fields, verbosity)?;
        for table in &report.tables {
            write_table(w, table, verbosity)?;
        }
    }

    write_summary(w, report, verbosity)?;

    Ok(())
}

fn write_fields<W: Write>(w: &mut W, fields: &[FieldRow], verbosity: Verbosity) -> Result<()> {
    let shown: Vec<&FieldRow> = fields
        .iter()
        .filter(|f| f.status != DiffStatus::Unchanged || verbosity == Verbosity::Verbose)
        .collect();
    if shown.is_empty() {
        return Ok(());
    }

    writeln!(w, "Fields:")?;
    for field in shown {
        for line in render_field(field, verbosity) {
            writeln!(w, "  {}", line)?;
        }
    }
    writeln!(w)?;
    Ok(())
}

fn render_field(field: &FieldRow, verbosity: Verbosity) -> Vec<String> {
    let left = quoted(field.left.as_deref());
    let right = quoted(field.right.as_deref());
    match field.status {
        DiffStatus::Added => vec![format!("Field {}: ADDED {}", field.key, right)],
        DiffStatus::Removed => vec![format!("Field {}: REMOVED {}", field.key, left)],
        DiffStatus::Unchanged => vec![format!("Field {}: {}", field.key, left)],
        DiffStatus::Changed | DiffStatus::Moved => {
            let mut lines = vec![format!("Field {}: {} → {}", field.key, left, right)];
            if verbosity == Verbosity::Verbose {
                if let Some(spans) = &field.spans {
                    lines.push(format!("  inline: {}", render_spans(spans)));
                }
            }
            lines
        }
    }
}

fn write_table<W: Write>(w: &mut W, table: &TableDiff, verbosity: Verbosity) -> Result<()> {
    if !table.has_differences() && verbosity != Verbosity::Verbose {
        return Ok(());
    }

    match &table.title {
        Some(title) => writeln!(w, "Table \"{}\" ({}):", table.path, title)?,
        None => writeln!(w, "Table \"{}\":", table.path)?,
    }
    for row in &table.rows {
        for line in render_row(row, verbosity) {
            writeln!(w, "  {}", line)?;
        }
    }
    writeln!(w)?;
    Ok(())
}

fn render_row(row: &TableDiffRow, verbosity: Verbosity) -> Vec<String> {
    let mut lines = match (row.status, &row.move_info) {
        (DiffStatus::Unchanged, _) if verbosity != Verbosity::Verbose => return Vec::new(),
        (DiffStatus::Unchanged, _) => vec![format!("Row {}: unchanged", row.id)],
        (DiffStatus::Moved, Some(info)) => vec![format!(
            "Row {}: MOVED row {} → row {}",
            row.id,
            info.from_index + 1,
            info.to_index + 1
        )],
        (DiffStatus::Added, _) if row.pair.is_some() => {
            vec![format!("Row {}: ADDED (replaces removed row)", row.id)]
        }
        (DiffStatus::Removed, _) if row.pair.is_some() => {
            vec![format!("Row {}: REMOVED (replaced by added row)", row.id)]
        }
        (status, _) => vec![format!("Row {}: {}", row.id, status.as_str().to_uppercase())],
    };

    // A split pair shares one comparison; print it under the added half.
    if row.status == DiffStatus::Removed {
        return lines;
    }
    if let Some(cells) = &row.cell_diffs {
        for cell in cells.iter().filter(|c| !c.is_equal()) {
            lines.extend(render_cell(cell, verbosity));
        }
    }
    lines
}

fn render_cell(cell: &CellDiff, verbosity: Verbosity) -> Vec<String> {
    let left = cell_text(&cell.left_text, cell.left_null);
    let right = cell_text(&cell.right_text, cell.right_null);
    let mut lines = vec![format!("  {}: {} → {}", cell.column, left, right)];
    if verbosity == Verbosity::Verbose {
        if let Some(spans) = &cell.spans {
            lines.push(format!("    inline: {}", render_spans(spans)));
        }
    }
    lines
}

fn cell_text(text: &str, is_null: bool) -> String {
    if is_null {
        "null".to_string()
    } else if text.is_empty() {
        "<empty>".to_string()
    } else {
        format!("\"{}\"", escape_string(text))
    }
}

fn quoted(value: Option<&str>) -> String {
    match value {
        Some(text) => format!("\"{}\"", escape_string(text)),
        None => "<none>".to_string(),
    }
}

/// Renders spans in word-diff notation: `[-deleted-]{+inserted+}`.
fn render_spans(spans: &[DiffSpan]) -> String {
    let mut out = String::new();
    for span in spans {
        let text = escape_string(&span.text);
        match span.kind {
            SpanKind::Equal => out.push_str(&text),
            SpanKind::Delete => out.push_str(&format!("[-{}-]", text)),
            SpanKind::Insert => out.push_str(&format!("{{+{}+}}", text)),
        }
    }
    out
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
        .replace('"', "\\\"")
}

fn write_summary<W: Write>(w: &mut W, report: &DiffReport, verbosity: Verbosity) -> Result<()> {
    if verbosity == Verbosity::Quiet && !report.has_differences() {
        return Ok(());
    }

    let fields = report.field_counts();
    let summary = report.summary();

    writeln!(w, "---")?;
    writeln!(w, "Summary:")?;
    writeln!(
        w,
        "  Fields: {} changed, {} added, {} removed",
        fields.changed, fields.added, fields.removed
    )?;
    for table in &report.tables {
        let counts = table.counts();
        writeln!(
            w,
            "  Table {}: {} changed, {} added, {} removed, {} moved, {} unchanged",
            table.path,
            counts.changed,
            counts.added,
            counts.removed,
            counts.moved,
            counts.unchanged
        )?;
    }
    writeln!(
        w,
        "  Total changes: {}",
        summary.total() - summary.unchanged
    )?;
    if !report.errors.is_empty() {
        writeln!(w, "  Input errors: {}", report.errors.len())?;
    }

    Ok(())
}
