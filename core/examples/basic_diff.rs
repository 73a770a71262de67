use record_diff::DiffSession;

fn usage() -> ! {
    eprintln!("Usage: basic_diff <OLD.json> <NEW.json> [N]");
    eprintln!("  N: optionally print the first N rows of every table");
    std::process::exit(2);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let old_path = args.next().unwrap_or_else(|| usage());
    let new_path = args.next().unwrap_or_else(|| usage());
    let show_n: Option<usize> = args.next().map(|s| s.parse()).transpose()?;

    let old_text = std::fs::read_to_string(&old_path)?;
    let new_text = std::fs::read_to_string(&new_path)?;

    let report = DiffSession::new().diff_json(&old_text, &new_text);

    for error in &report.errors {
        eprintln!("error: {}", error);
    }
    let summary = report.summary();
    println!("fields: {}", report.fields.len());
    println!("tables: {}", report.tables.len());
    println!(
        "changed: {}, added: {}, removed: {}, moved: {}",
        summary.changed, summary.added, summary.removed, summary.moved
    );

    if let Some(n) = show_n {
        for table in &report.tables {
            println!("[{}]", table.path);
            for (i, row) in table.rows.iter().take(n).enumerate() {
                println!("{:>4}: {} {}", i, row.status, row.id);
            }
        }
    }

    Ok(())
}
