use serde_json::Value;

use crate::error::AppError;
use crate::models::vacancy::{Source, Vacancy};

/// Default rate used to convert foreign-currency salaries into roubles.
pub const DEFAULT_EXCHANGE_RATE: u64 = 80;

/// Emphasis markers HeadHunter wraps around matched search terms.
const HIGHLIGHT_MARKERS: [&str; 2] = ["<highlighttext>", "</highlighttext>"];

/// Punctuation kept in requirement text besides letters, digits and spaces.
const ALLOWED_PUNCTUATION: &str = "~`!?@№#$%^&*-+[]{}()<>|/\\.,;:\"'«»–— ";

/// Where a raw record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A search API response item in the provider's own shape.
    Provider,
    /// An entry of the local data file, already in canonical shape.
    Store,
}

/// JSON pointers locating each canonical field inside a raw record.
struct FieldMap {
    name: &'static str,
    url: &'static str,
    requirement: &'static str,
    salary_from: &'static str,
    salary_to: &'static str,
    /// Pointer to the currency code and the code treated as roubles.
    currency: Option<(&'static str, &'static str)>,
}

const HEADHUNTER_FIELDS: FieldMap = FieldMap {
    name: "/name",
    url: "/alternate_url",
    requirement: "/snippet/requirement",
    salary_from: "/salary/from",
    salary_to: "/salary/to",
    currency: Some(("/salary/currency", "RUR")),
};

const SUPERJOB_FIELDS: FieldMap = FieldMap {
    name: "/profession",
    url: "/link",
    requirement: "/candidat",
    salary_from: "/payment_from",
    salary_to: "/payment_to",
    currency: Some(("/currency", "rub")),
};

const STORE_FIELDS: FieldMap = FieldMap {
    name: "/name",
    url: "/url",
    requirement: "/requirement",
    salary_from: "/salary_from",
    salary_to: "/salary_to",
    currency: None,
};

fn field_map(source: Source, origin: Origin) -> &'static FieldMap {
    match (origin, source) {
        (Origin::Store, _) => &STORE_FIELDS,
        (Origin::Provider, Source::HeadHunter) => &HEADHUNTER_FIELDS,
        (Origin::Provider, Source::SuperJob) => &SUPERJOB_FIELDS,
    }
}

/// Converts raw provider or data-file records into [`Vacancy`] values.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    exchange_rate: u64,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_EXCHANGE_RATE)
    }
}

impl Normalizer {
    pub fn new(exchange_rate: u64) -> Self {
        Self { exchange_rate }
    }

    pub fn normalize(
        &self,
        source: Source,
        raw: &Value,
        origin: Origin,
    ) -> Result<Vacancy, AppError> {
        let fields = field_map(source, origin);
        let reader = FieldReader { source, raw };

        let name = reader.string(fields.name)?;
        let url = reader.string(fields.url)?;
        let requirement = match reader.get(fields.requirement)? {
            Value::Null => String::new(),
            Value::String(text) => sanitize_requirement(text),
            other => return Err(reader.invalid(fields.requirement, "expected text", other)),
        };

        let salary_from = reader.salary(fields.salary_from)?;
        let salary_to = reader.salary(fields.salary_to)?;

        let (salary_from, salary_to) = match fields.currency {
            Some((pointer, local)) if salary_from.is_some() || salary_to.is_some() => {
                let foreign = reader.get(pointer)?.as_str() != Some(local);
                let convert = |amount: Option<u64>| match amount {
                    Some(v) if foreign => v.saturating_mul(self.exchange_rate),
                    Some(v) => v,
                    None => 0,
                };
                (convert(salary_from), convert(salary_to))
            }
            _ => (salary_from.unwrap_or(0), salary_to.unwrap_or(0)),
        };

        Ok(Vacancy {
            name,
            url,
            requirement,
            salary_from,
            salary_to,
            source,
        })
    }
}

struct FieldReader<'a> {
    source: Source,
    raw: &'a Value,
}

impl<'a> FieldReader<'a> {
    fn get(&self, pointer: &str) -> Result<&'a Value, AppError> {
        self.raw
            .pointer(pointer)
            .ok_or_else(|| AppError::MissingField {
                provider: self.source,
                field: field_label(pointer),
            })
    }

    fn string(&self, pointer: &str) -> Result<String, AppError> {
        match self.get(pointer)? {
            Value::String(text) => Ok(text.clone()),
            other => Err(self.invalid(pointer, "expected text", other)),
        }
    }

    /// `None` when the figure is present but null.
    fn salary(&self, pointer: &str) -> Result<Option<u64>, AppError> {
        let value = self.get(pointer)?;
        if value.is_null() {
            return Ok(None);
        }
        value
            .as_u64()
            .or_else(|| {
                value
                    .as_f64()
                    .filter(|v| *v >= 0.0 && *v <= u64::MAX as f64 && v.fract() == 0.0)
                    .map(|v| v as u64)
            })
            .map(Some)
            .ok_or_else(|| self.invalid(pointer, "expected a non-negative whole number", value))
    }

    fn invalid(&self, pointer: &str, expected: &str, found: &Value) -> AppError {
        AppError::InvalidField {
            provider: self.source,
            field: field_label(pointer),
            reason: format!("{expected}, found {found}"),
        }
    }
}

/// `/salary/from` -> `salary.from`
fn field_label(pointer: &str) -> String {
    pointer.trim_start_matches('/').replace('/', ".")
}

/// Strip highlight markers, then drop every character outside the allow-list.
pub fn sanitize_requirement(text: &str) -> String {
    let mut text = text.to_string();
    for marker in HIGHLIGHT_MARKERS {
        text = text.replace(marker, "");
    }
    text.chars().filter(|c| is_allowed(*c)).collect()
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphabetic()
        || c.is_numeric()
        || matches!(c, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё')
        || ALLOWED_PUNCTUATION.contains(c)
}
