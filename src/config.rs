use std::path::PathBuf;

use clap::Parser;

use crate::models::vacancy::Source;
use crate::normalizer::DEFAULT_EXCHANGE_RATE;
use crate::pipeline::Query;

#[derive(Parser, Debug, Clone)]
#[command(name = "jobfeed", about = "Aggregate and filter HeadHunter and SuperJob vacancies")]
pub struct Config {
    /// JSON file caching fetched vacancies
    #[arg(long, env = "JOBFEED_DATA_FILE", default_value = "data.json")]
    pub data_file: PathBuf,

    /// Roubles per unit of any foreign salary currency
    #[arg(long, env = "JOBFEED_EXCHANGE_RATE", default_value_t = DEFAULT_EXCHANGE_RATE)]
    pub exchange_rate: u64,

    /// Maximum number of result pages requested per provider
    #[arg(long, env = "JOBFEED_MAX_PAGES", default_value = "10")]
    pub max_pages: u32,

    /// Results requested per page
    #[arg(long, default_value = "100")]
    pub per_page: u32,

    /// HeadHunter area code (113 = Russia)
    #[arg(long, default_value = "113")]
    pub hh_area: u32,

    /// SuperJob catalogue id
    #[arg(long, default_value = "1")]
    pub sj_catalogue: u32,

    /// SuperJob application key sent as X-Api-App-Id
    #[arg(long, env = "SUPERJOB_API_KEY", hide_env_values = true)]
    pub superjob_api_key: Option<String>,

    /// Emit logs as JSON
    #[arg(long, env = "JOBFEED_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Prompt for every step (default when no subcommand given)
    Interactive,
    /// Replace the data file with fresh search results
    Fetch {
        /// Which service to search
        #[arg(long, value_enum, default_value = "all")]
        provider: Provider,

        /// Search phrase
        keyword: String,
    },
    /// Filter and print the vacancies in the data file
    Show {
        #[arg(long, value_enum)]
        source: Option<Source>,

        /// Keep vacancies whose salary range admits this amount
        #[arg(long)]
        salary: Option<u64>,

        /// Keep vacancies whose requirements mention this phrase
        #[arg(long)]
        requirement: Option<String>,

        /// Sort ascending by salary
        #[arg(long)]
        sort: bool,

        /// After sorting, keep only the N best paid
        #[arg(long, requires = "sort")]
        top: Option<usize>,
    },
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Headhunter,
    Superjob,
    All,
}

impl Provider {
    pub fn sources(self) -> Vec<Source> {
        match self {
            Provider::Headhunter => vec![Source::HeadHunter],
            Provider::Superjob => vec![Source::SuperJob],
            Provider::All => Source::ALL.to_vec(),
        }
    }
}

impl Config {
    /// Resolve the command, defaulting to Interactive if none specified.
    pub fn resolved_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Interactive)
    }
}

impl Command {
    /// The pipeline described by `show` flags.
    pub fn query(&self) -> Option<Query> {
        match self {
            Command::Show {
                source,
                salary,
                requirement,
                sort,
                top,
            } => Some(Query {
                source: *source,
                salary: *salary,
                requirement: requirement.clone(),
                sort: *sort,
                top: *top,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Config::command().debug_assert();
    }

    #[test]
    fn defaults_to_interactive() {
        let config = Config::try_parse_from(["jobfeed", "--superjob-api-key", "k"]).unwrap();
        assert!(matches!(config.resolved_command(), Command::Interactive));
        assert_eq!(config.max_pages, 10);
        assert_eq!(config.per_page, 100);
    }

    #[test]
    fn show_flags_build_query() {
        let config = Config::try_parse_from([
            "jobfeed", "show", "--source", "superjob", "--salary", "90000", "--sort", "--top", "3",
        ])
        .unwrap();
        let query = config.resolved_command().query().unwrap();
        assert_eq!(
            query,
            Query {
                source: Some(Source::SuperJob),
                salary: Some(90000),
                requirement: None,
                sort: true,
                top: Some(3),
            }
        );
    }

    #[test]
    fn top_requires_sort() {
        assert!(Config::try_parse_from(["jobfeed", "show", "--top", "3"]).is_err());
    }

    #[test]
    fn fetch_parses_provider() {
        let config =
            Config::try_parse_from(["jobfeed", "fetch", "--provider", "headhunter", "rust"]).unwrap();
        match config.resolved_command() {
            Command::Fetch { provider, keyword } => {
                assert_eq!(provider.sources(), vec![Source::HeadHunter]);
                assert_eq!(keyword, "rust");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
