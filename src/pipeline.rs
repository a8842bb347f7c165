use crate::models::vacancy::{Source, Vacancy};

pub fn filter_by_source(vacancies: Vec<Vacancy>, source: Source) -> Vec<Vacancy> {
    vacancies.into_iter().filter(|v| v.source == source).collect()
}

/// `salary_from` is a hard floor; `salary_to` only caps when advertised.
pub fn filter_by_salary(vacancies: Vec<Vacancy>, target: u64) -> Vec<Vacancy> {
    vacancies
        .into_iter()
        .filter(|v| target >= v.salary_from && (v.salary_to == 0 || target <= v.salary_to))
        .collect()
}

/// Case-insensitive substring match on the requirement text.
pub fn filter_by_requirement(vacancies: Vec<Vacancy>, phrase: &str) -> Vec<Vacancy> {
    let phrase = phrase.to_lowercase();
    vacancies
        .into_iter()
        .filter(|v| v.requirement.to_lowercase().contains(&phrase))
        .collect()
}

/// Ascending by [`Vacancy::salary`].
pub fn sort_by_salary(mut vacancies: Vec<Vacancy>) -> Vec<Vacancy> {
    vacancies.sort_by_key(Vacancy::salary);
    vacancies
}

/// Keep the last `n` entries, i.e. the highest paid after [`sort_by_salary`].
pub fn top_n(mut vacancies: Vec<Vacancy>, n: usize) -> Vec<Vacancy> {
    let skip = vacancies.len().saturating_sub(n);
    vacancies.drain(..skip);
    vacancies
}

/// A complete filter/sort run over a loaded vacancy set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub source: Option<Source>,
    pub salary: Option<u64>,
    pub requirement: Option<String>,
    pub sort: bool,
    /// Only honoured when `sort` is set.
    pub top: Option<usize>,
}

impl Query {
    pub fn apply(&self, mut vacancies: Vec<Vacancy>) -> Vec<Vacancy> {
        if let Some(source) = self.source {
            vacancies = filter_by_source(vacancies, source);
        }
        if let Some(salary) = self.salary {
            vacancies = filter_by_salary(vacancies, salary);
        }
        if let Some(phrase) = &self.requirement {
            vacancies = filter_by_requirement(vacancies, phrase);
        }
        if self.sort {
            vacancies = sort_by_salary(vacancies);
            if let Some(n) = self.top {
                vacancies = top_n(vacancies, n);
            }
        }
        vacancies
    }
}
