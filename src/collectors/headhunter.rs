use async_trait::async_trait;
use serde_json::Value;

use crate::collectors::{Page, VacancyCollector, take_items};
use crate::error::AppError;
use crate::models::vacancy::Source;

const SEARCH_URL: &str = "https://api.hh.ru/vacancies";

pub struct HeadHunter {
    client: reqwest::Client,
    area: u32,
    per_page: u32,
}

impl HeadHunter {
    pub fn new(client: reqwest::Client, area: u32, per_page: u32) -> Self {
        Self {
            client,
            area,
            per_page,
        }
    }

    fn query(&self, keyword: &str, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("text", keyword.to_string()),
            ("area", self.area.to_string()),
            ("page", page.to_string()),
            ("per_page", self.per_page.to_string()),
            ("only_with_salary", "true".to_string()),
            ("search_field", "name".to_string()),
        ]
    }
}

#[async_trait]
impl VacancyCollector for HeadHunter {
    fn source(&self) -> Source {
        Source::HeadHunter
    }

    async fn fetch_page(&self, keyword: &str, page: u32) -> Result<Page, AppError> {
        let request_error = |error| AppError::Request {
            provider: Source::HeadHunter,
            error,
        };

        let data: Value = self
            .client
            .get(SEARCH_URL)
            .query(&self.query(keyword, page))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(request_error)?
            .json()
            .await
            .map_err(|error| AppError::Decode {
                provider: Source::HeadHunter,
                error,
            })?;

        parse_page(data, page)
    }
}

/// `pages` is the total page count; the current page is the last one when
/// fewer than two pages remain from it.
fn parse_page(mut data: Value, page: u32) -> Result<Page, AppError> {
    let pages = data
        .get("pages")
        .and_then(Value::as_i64)
        .ok_or_else(|| AppError::UnexpectedResponse {
            provider: Source::HeadHunter,
            reason: "missing 'pages' count".to_string(),
        })?;
    let items = take_items(Source::HeadHunter, &mut data, "items")?;

    Ok(Page {
        items,
        has_more: pages - i64::from(page) > 1,
    })
}
