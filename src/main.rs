//! chitter CLI Entry Point
//!
//! Parses the command line, establishes the single database connection, and
//! hands control to the interactive session loop.
//!
//! Exit status: nonzero only when the initial connection cannot be
//! established; everything after that point ends the process normally.
//! Logs go to stderr; stdout belongs to the interactive UI.

use clap::Parser;
use dialoguer::Password;
use tracing_subscriber::EnvFilter;

use chitter::config::{self, Cli};
use chitter::db::Db;
use chitter::session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("info") };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let profile = match config::profile_path().and_then(|path| config::load_profile(&path)) {
        Ok(profile) => profile,
        Err(err) => {
            // A broken profile should not keep the tool from starting
            eprintln!("Warning: {err}");
            chitter::ConnectionProfile::default()
        }
    };

    let password = match config::resolve_password(&profile)? {
        Some(password) => password,
        None => Password::new()
            .with_prompt(format!("Password for {}", cli.user))
            .allow_empty_password(true)
            .interact()?,
    };

    let params = config::resolve_params(&cli, &profile, password);

    print!("Connecting to database...");
    let mut db = match Db::connect(&params).await {
        Ok(db) => {
            println!("Done\n");
            db
        }
        Err(err) => {
            eprintln!("\nError - Unable to Connect to Database: {err}");
            eprintln!("Make sure the database server is reachable at {}:{}", params.host, params.port);
            std::process::exit(1);
        }
    };

    if let Err(err) = session::run(&mut db).await {
        // Prompt failures (stdin closed) end the session but not with an error status
        eprintln!("{err}");
    }

    print!("Disconnecting from database...");
    db.close();
    println!("Done.\n\nBye!");

    Ok(())
}
