// Vacancy collectors: one paginated search API client per provider.

pub mod headhunter;
pub mod runner;
pub mod superjob;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::Config;
use crate::error::AppError;
use crate::models::vacancy::Source;

/// One page of raw search results with the provider's pagination signal
/// already interpreted.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<Value>,
    pub has_more: bool,
}

/// Trait that every provider client implements.
#[async_trait]
pub trait VacancyCollector: Send + Sync {
    fn source(&self) -> Source;

    /// Fetch a single zero-based page of results for `keyword`.
    async fn fetch_page(&self, keyword: &str, page: u32) -> Result<Page, AppError>;
}

/// Request pages from page 0 until the provider reports no more results or
/// `max_pages` pages have been fetched. Any failing page aborts the whole fetch.
pub async fn fetch_all(
    collector: &dyn VacancyCollector,
    keyword: &str,
    max_pages: u32,
) -> Result<Vec<Value>, AppError> {
    tracing::info!("Searching {}...", collector.source());

    let mut items = Vec::new();
    for page in 0..max_pages {
        let result = collector.fetch_page(keyword, page).await?;
        tracing::debug!(
            "{} page {page}: {} items, more: {}",
            collector.source(),
            result.items.len(),
            result.has_more
        );
        items.extend(result.items);
        if !result.has_more {
            break;
        }
    }
    Ok(items)
}

/// Build the client for `source` from the runtime configuration.
pub fn get_collector(source: Source, config: &Config) -> Result<Box<dyn VacancyCollector>, AppError> {
    let client = build_client()?;
    match source {
        Source::HeadHunter => Ok(Box::new(headhunter::HeadHunter::new(
            client,
            config.hh_area,
            config.per_page,
        ))),
        Source::SuperJob => {
            let api_key = config
                .superjob_api_key
                .clone()
                .ok_or(AppError::MissingApiKey(Source::SuperJob))?;
            Ok(Box::new(superjob::SuperJob::new(
                client,
                api_key,
                config.sj_catalogue,
                config.per_page,
            )))
        }
    }
}

fn build_client() -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))
}

/// Read a required array of items out of a page response.
fn take_items(source: Source, data: &mut Value, key: &str) -> Result<Vec<Value>, AppError> {
    match data.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        _ => Err(AppError::UnexpectedResponse {
            provider: source,
            reason: format!("missing '{key}' list"),
        }),
    }
}
