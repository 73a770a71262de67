pub mod json;
pub mod json_lines;
