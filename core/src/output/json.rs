use crate::diff::DiffReport;
use std::io::Write;

pub fn serialize_diff_report(report: &DiffReport) -> serde_json::Result<String> {
    serde_json::to_string(report)
}

pub fn serialize_diff_report_pretty(report: &DiffReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

pub fn write_diff_report<W: Write>(w: W, report: &DiffReport) -> serde_json::Result<()> {
    serde_json::to_writer(w, report)
}
