//! Export command - write approved crops to the dataset directory.

use std::path::PathBuf;

use colored::Colorize;
use cropdesk::{ExportOptions, ExtendMode, export_dataset};

pub fn run(
    imgdir: PathBuf,
    dbpath: PathBuf,
    outdir: PathBuf,
    extend_mode: ExtendMode,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !dbpath.exists() {
        return Err(format!("Metadata file not found: {}", dbpath.display()).into());
    }

    println!(
        "{} approved crops to {} ({} background)",
        "Exporting".cyan().bold(),
        outdir.display().to_string().white().bold(),
        extend_mode
    );

    let options = ExportOptions::new(imgdir, dbpath, &outdir).with_extend_mode(extend_mode);
    let summary = export_dataset(&options)?;

    println!();
    println!(
        "{} {} image(s) exported",
        "Done:".green().bold(),
        summary.exported.to_string().white().bold()
    );

    if summary.skipped() > 0 {
        println!(
            "  {} approved image(s) skipped",
            summary.skipped().to_string().yellow()
        );
        if summary.missing > 0 {
            println!("    {} missing source file(s)", summary.missing);
        }
        if summary.unreadable > 0 {
            println!("    {} unreadable source file(s)", summary.unreadable);
        }
        if summary.empty_crop > 0 {
            println!("    {} without a crop size", summary.empty_crop);
        }
        if summary.oversized > 0 {
            println!("    {} with a crop size above the limit", summary.oversized);
        }
        if summary.invalid_name > 0 {
            println!("    {} with a key that is not a plain filename", summary.invalid_name);
        }
    }

    if verbose {
        println!(
            "  {} unapproved image(s) ignored",
            summary.skipped_unapproved.to_string().dimmed()
        );
    }

    Ok(())
}
