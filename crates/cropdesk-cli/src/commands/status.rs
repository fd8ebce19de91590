//! Status command - show curation progress and summary.

use std::path::PathBuf;

use colored::Colorize;
use cropdesk::ImageDatabase;

pub fn run(dbpath: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !dbpath.exists() {
        return Err(format!(
            "Metadata file not found: {}\nRun 'cropdesk serve --dbpath {}' first.",
            dbpath.display(),
            dbpath.display()
        )
        .into());
    }

    let db = ImageDatabase::load_from(&dbpath)?;
    let summary = db.summary();

    if json_output {
        let status = serde_json::json!({
            "file": dbpath.display().to_string(),
            "progress": summary.progress(),
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{} {}", "Database:".cyan().bold(), dbpath.display());
    println!();
    println!("  Images:    {}", summary.total.to_string().white().bold());
    println!("  Processed: {}", summary.processed.to_string().green());
    println!("  Approved:  {}", summary.approved.to_string().green());
    println!("  Pending:   {}", summary.pending.to_string().yellow());
    println!();

    let progress = summary.progress() * 100.0;
    if summary.pending == 0 {
        println!("  {} All images have been reviewed!", "✓".green());
    } else {
        println!("  Progress: {:.1}%", progress);
    }

    Ok(())
}
