mod collectors;
mod config;
mod error;
mod interactive;
mod models;
mod normalizer;
mod pipeline;
mod store;

use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::collectors::runner;
use crate::config::{Command, Config};
use crate::interactive::Prompter;
use crate::normalizer::Normalizer;
use crate::store::JsonStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jobfeed=info"));
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    let store = JsonStore::new(config.data_file.clone());
    tracing::debug!("Using data file {}", store.path().display());

    match config.resolved_command() {
        Command::Interactive => {
            let mut prompter = Prompter::new(io::stdin().lock(), io::stdout().lock());
            interactive::run(&config, &store, &mut prompter).await?;
        }
        Command::Fetch { provider, keyword } => {
            let summaries = runner::run(&config, &store, &provider.sources(), &keyword).await?;
            let total: usize = summaries.iter().map(|s| s.found).sum();
            tracing::info!("Stored {total} vacancies in {}", store.path().display());
        }
        command @ Command::Show { .. } => {
            store.ensure_ready()?;

            let query = command.query().unwrap_or_default();
            let vacancies = store.load_vacancies(&Normalizer::new(config.exchange_rate))?;
            let vacancies = query.apply(vacancies);
            let mut out = io::stdout().lock();
            interactive::print_vacancies(&mut out, &vacancies)?;
            tracing::info!("Found {} vacancies", vacancies.len());
        }
    }

    Ok(())
}
