use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use namechecker::check::Client;
use namechecker::config::Endpoints;
use namechecker::platform::check_identifier;
use namechecker::report::{self, USAGE};

#[derive(Parser)]
#[command(
    name = "namechecker",
    version,
    about = "Check whether a name is available on GitHub and as an npm organization",
    after_help = "A name counts as available on GitHub when its profile page returns 404, \
                  and on npm when no package is published under the scope and the \
                  registry does not know the org. Any network error is reported as taken."
)]
struct Cli {
    /// Names to check
    #[arg(allow_hyphen_values = true)]
    ids: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    if cli.ids.is_empty() {
        println!("{USAGE}");
        return ExitCode::from(1);
    }

    let ids: Vec<&str> = cli
        .ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .collect();

    if ids.is_empty() {
        eprintln!("Error: Please provide at least one valid ID");
        return ExitCode::from(1);
    }

    match run(&ids) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(ids: &[&str]) -> anyhow::Result<()> {
    report::init_colors();
    let client = Client::with_endpoints(Endpoints::from_env());
    debug!(endpoints = ?client.endpoints(), "starting");

    let divider = ids.len() > 1;
    let mut stdout = io::stdout().lock();
    for id in ids {
        let results = check_identifier(&client, id);
        report::write_section(&mut stdout, id, &results, divider)
            .and_then(|()| stdout.flush())
            .with_context(|| format!("writing report for {id}"))?;
    }
    Ok(())
}
