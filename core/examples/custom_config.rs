use record_diff::{DiffConfig, DiffSession};

fn usage() -> ! {
    eprintln!("Usage: custom_config <OLD.json> <NEW.json>");
    std::process::exit(2);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let old_path = args.next().unwrap_or_else(|| usage());
    let new_path = args.next().unwrap_or_else(|| usage());

    let old_text = std::fs::read_to_string(&old_path)?;
    let new_text = std::fs::read_to_string(&new_path)?;

    let cfg = DiffConfig::builder()
        .max_align_cells(10_000)
        .move_similarity_threshold(0.9)
        .log_decisions(true)
        .build()?;
    let session = DiffSession::with_config(cfg)?;

    let report = session.diff_json(&old_text, &new_text);

    for error in &report.errors {
        eprintln!("error: {}", error);
    }

    for table in &report.tables {
        let counts = table.counts();
        println!(
            "{}: {} rows, {} moved",
            table.path,
            table.rows.len(),
            counts.moved
        );
    }
    Ok(())
}
