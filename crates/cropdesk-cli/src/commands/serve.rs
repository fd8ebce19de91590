//! Serve command - run the curation API.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use colored::Colorize;
use cropdesk::ImageDatabase;
use tracing::{error, info};

use crate::server::{app, state::AppState};

pub fn run(
    imgdir: PathBuf,
    dbpath: PathBuf,
    host: IpAddr,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    if !imgdir.is_dir() {
        return Err(format!("Image directory not found: {}", imgdir.display()).into());
    }

    let db = ImageDatabase::open(&dbpath, &imgdir)?;
    let summary = db.summary();

    let addr = SocketAddr::new(host, port);
    println!();
    println!(
        "{} {}",
        "Starting curation server at".cyan().bold(),
        format!("http://{}", addr).white().bold()
    );
    println!();
    println!("  Images:   {}", imgdir.display());
    println!("  Database: {}", dbpath.display());
    println!(
        "  Records:  {} ({} processed, {} approved)",
        summary.total, summary.processed, summary.approved
    );
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let state = AppState::new(db, imgdir);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let served = app::run_server(state.clone(), addr).await;

        // Flush once more on the way out.
        info!("Shutting down");
        if let Err(e) = state.save().await {
            error!(error = %e, "Failed to save image database on shutdown");
            return Err(e.into());
        }

        served
    })
}
