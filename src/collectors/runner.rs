use crate::collectors::{VacancyCollector, fetch_all, get_collector};
use crate::config::Config;
use crate::error::AppError;
use crate::models::vacancy::{Source, Vacancy};
use crate::normalizer::{Normalizer, Origin};
use crate::store::JsonStore;

/// Outcome of collecting from one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub source: Source,
    pub found: usize,
}

/// Replace the data file with fresh results for `keyword` from each of `sources`.
pub async fn run(
    config: &Config,
    store: &JsonStore,
    sources: &[Source],
    keyword: &str,
) -> Result<Vec<RunSummary>, AppError> {
    let collectors = sources
        .iter()
        .map(|source| get_collector(*source, config))
        .collect::<Result<Vec<_>, _>>()?;

    let normalizer = Normalizer::new(config.exchange_rate);
    collect_into(store, &normalizer, &collectors, keyword, config.max_pages).await
}

/// Clear the store, then fetch, normalize and append each provider in turn.
/// The first failing provider aborts the run.
pub async fn collect_into(
    store: &JsonStore,
    normalizer: &Normalizer,
    collectors: &[Box<dyn VacancyCollector>],
    keyword: &str,
    max_pages: u32,
) -> Result<Vec<RunSummary>, AppError> {
    store.save(&[])?;

    let mut summaries = Vec::with_capacity(collectors.len());
    for collector in collectors {
        let source = collector.source();
        let items = fetch_all(collector.as_ref(), keyword, max_pages).await?;
        tracing::info!("Found {} vacancies on {source}", items.len());

        let vacancies = items
            .iter()
            .map(|item| normalizer.normalize(source, item, Origin::Provider))
            .collect::<Result<Vec<Vacancy>, _>>()?;

        store.append(&vacancies)?;
        summaries.push(RunSummary {
            source,
            found: vacancies.len(),
        });
    }

    Ok(summaries)
}
