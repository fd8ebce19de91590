//! CLI argument definitions using clap.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cropdesk::ExtendMode;

/// Cropdesk: human-in-the-loop image curation
#[derive(Parser)]
#[command(name = "cropdesk")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the curation API over HTTP
    Serve {
        /// Directory containing the images to curate
        #[arg(long, value_name = "DIR")]
        imgdir: PathBuf,

        /// Path to the metadata JSON file (created if missing)
        #[arg(long, value_name = "FILE")]
        dbpath: PathBuf,

        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,

        /// Port for the web server
        #[arg(short, long, default_value = "8084")]
        port: u16,
    },

    /// Export approved crops as a fixed-size dataset
    Export {
        /// Directory containing the source images
        #[arg(long, value_name = "DIR")]
        imgdir: PathBuf,

        /// Path to the metadata JSON file
        #[arg(long, value_name = "FILE")]
        dbpath: PathBuf,

        /// Destination directory for the exported images
        #[arg(long, value_name = "DIR")]
        outdir: PathBuf,

        /// Background for uncovered canvas area ("white", anything else is black)
        #[arg(long, default_value = "black")]
        extend_mode: ExtendMode,
    },

    /// Show curation progress
    Status {
        /// Path to the metadata JSON file
        #[arg(long, value_name = "FILE")]
        dbpath: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
