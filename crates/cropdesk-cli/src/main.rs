//! Cropdesk CLI - image curation service and dataset exporter.

mod cli;
mod commands;
mod logging;
mod server;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs);

    let result = match cli.command {
        Commands::Serve {
            imgdir,
            dbpath,
            host,
            port,
        } => commands::serve::run(imgdir, dbpath, host, port),

        Commands::Export {
            imgdir,
            dbpath,
            outdir,
            extend_mode,
        } => commands::export::run(imgdir, dbpath, outdir, extend_mode, cli.verbose),

        Commands::Status { dbpath, json } => commands::status::run(dbpath, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
