use async_trait::async_trait;
use serde_json::Value;

use crate::collectors::{Page, VacancyCollector, take_items};
use crate::error::AppError;
use crate::models::vacancy::Source;

const SEARCH_URL: &str = "https://api.superjob.ru/2.0/vacancies/";
const API_KEY_HEADER: &str = "X-Api-App-Id";

pub struct SuperJob {
    client: reqwest::Client,
    api_key: String,
    catalogue: u32,
    per_page: u32,
}

impl SuperJob {
    pub fn new(client: reqwest::Client, api_key: String, catalogue: u32, per_page: u32) -> Self {
        Self {
            client,
            api_key,
            catalogue,
            per_page,
        }
    }

    fn query(&self, keyword: &str, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("keywords", keyword.to_string()),
            ("c", self.catalogue.to_string()),
            ("page", page.to_string()),
            ("count", self.per_page.to_string()),
            // no_agreement=1 drops "salary by agreement" postings
            ("no_agreement", "1".to_string()),
        ]
    }
}

#[async_trait]
impl VacancyCollector for SuperJob {
    fn source(&self) -> Source {
        Source::SuperJob
    }

    async fn fetch_page(&self, keyword: &str, page: u32) -> Result<Page, AppError> {
        let data: Value = self
            .client
            .get(SEARCH_URL)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&self.query(keyword, page))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|error| AppError::Request {
                provider: Source::SuperJob,
                error,
            })?
            .json()
            .await
            .map_err(|error| AppError::Decode {
                provider: Source::SuperJob,
                error,
            })?;

        parse_page(data)
    }
}

fn parse_page(mut data: Value) -> Result<Page, AppError> {
    let has_more = data
        .get("more")
        .and_then(Value::as_bool)
        .ok_or_else(|| AppError::UnexpectedResponse {
            provider: Source::SuperJob,
            reason: "missing 'more' flag".to_string(),
        })?;
    let items = take_items(Source::SuperJob, &mut data, "objects")?;

    Ok(Page { items, has_more })
}
