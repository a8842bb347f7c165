use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::AppError;
use crate::models::vacancy::{Source, Vacancy};
use crate::normalizer::{Normalizer, Origin};

/// Result of checking the data file before use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Ready,
    Missing,
    Corrupt,
    Empty,
    /// Present but could not be read, e.g. permissions or invalid UTF-8.
    Unreadable(String),
    Schema { index: usize, reason: String },
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validation::Ready => f.write_str("data file is ready"),
            Validation::Missing => f.write_str("data file does not exist"),
            Validation::Corrupt => f.write_str("data file is corrupt"),
            Validation::Empty => f.write_str("data file is empty"),
            Validation::Unreadable(error) => write!(f, "data file cannot be read: {error}"),
            Validation::Schema { index, reason } => {
                write!(f, "data file entry #{index} is invalid: {reason}")
            }
        }
    }
}

/// JSON array file holding the canonical vacancy set.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Raw entries of the file. An absent file reads as an empty set.
    pub fn load(&self) -> Result<Vec<Value>, AppError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => {
                return Err(AppError::Io {
                    path: self.path.clone(),
                    error,
                });
            }
        };
        serde_json::from_str(&text).map_err(|error| AppError::CorruptFile {
            path: self.path.clone(),
            error,
        })
    }

    pub fn check(&self) -> Validation {
        if !self.exists() {
            return Validation::Missing;
        }
        let entries = match self.load() {
            Ok(entries) => entries,
            Err(AppError::CorruptFile { .. }) => return Validation::Corrupt,
            Err(error) => return Validation::Unreadable(error.to_string()),
        };
        if entries.is_empty() {
            return Validation::Empty;
        }
        for (index, entry) in entries.iter().enumerate() {
            if let Err(reason) = check_entry(entry) {
                return Validation::Schema { index, reason };
            }
        }
        Validation::Ready
    }

    /// Whether the file can be used as is; otherwise the data must be refetched.
    pub fn validate(&self) -> bool {
        match self.check() {
            Validation::Ready => true,
            failed => {
                tracing::warn!("{failed}, data must be reloaded");
                false
            }
        }
    }

    /// Like [`check`](Self::check), but as an error naming what is wrong.
    pub fn ensure_ready(&self) -> Result<(), AppError> {
        if !self.exists() {
            return Err(self.not_ready(Validation::Missing));
        }
        let entries = self.load()?;
        if entries.is_empty() {
            return Err(self.not_ready(Validation::Empty));
        }
        for (index, entry) in entries.iter().enumerate() {
            check_entry(entry).map_err(|reason| AppError::SchemaInvalid { index, reason })?;
        }
        Ok(())
    }

    fn not_ready(&self, reason: Validation) -> AppError {
        AppError::NotReady {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }

    /// Replace the whole file with `vacancies`.
    pub fn save(&self, vacancies: &[Vacancy]) -> Result<(), AppError> {
        self.write(vacancies)
    }

    /// Read-modify-write: existing entries followed by `vacancies`.
    pub fn append(&self, vacancies: &[Vacancy]) -> Result<(), AppError> {
        let mut entries = self.load()?;
        for vacancy in vacancies {
            entries.push(
                serde_json::to_value(vacancy)
                    .map_err(|e| AppError::Internal(format!("Failed to serialize vacancy: {e}")))?,
            );
        }
        self.write(&entries)
    }

    /// Validated entries turned back into vacancies.
    pub fn load_vacancies(&self, normalizer: &Normalizer) -> Result<Vec<Vacancy>, AppError> {
        let entries = self.load()?;
        let mut vacancies = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let source = check_entry(entry)
                .map_err(|reason| AppError::SchemaInvalid { index, reason })?;
            vacancies.push(normalizer.normalize(source, entry, Origin::Store)?);
        }
        Ok(vacancies)
    }

    /// Serialize to a sibling temp file, then rename it over the target.
    fn write<T: serde::Serialize + ?Sized>(&self, data: &T) -> Result<(), AppError> {
        let io_error = |error| AppError::Io {
            path: self.path.clone(),
            error,
        };
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(io_error)?;

        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(io_error)?;
        serde_json::to_writer_pretty(&mut file, data).map_err(|e| {
            AppError::Internal(format!("Failed to write {}: {e}", self.path.display()))
        })?;
        file.write_all(b"\n").map_err(io_error)?;
        file.persist(&self.path).map_err(|e| io_error(e.error))?;
        Ok(())
    }
}

/// Every canonical key present and well typed. Returns the entry's source.
fn check_entry(entry: &Value) -> Result<Source, String> {
    let Some(obj) = entry.as_object() else {
        return Err("not an object".to_string());
    };

    require(obj, "name", Value::is_string, "a string")?;
    require(obj, "url", Value::is_string, "a string")?;
    require(obj, "requirement", |v| v.is_null() || v.is_string(), "a string or null")?;
    require(obj, "salary_from", |v| v.is_null() || v.is_u64(), "an integer or null")?;
    require(obj, "salary_to", |v| v.is_null() || v.is_u64(), "an integer or null")?;
    require(obj, "source", Value::is_string, "a string")?;

    let tag = obj["source"].as_str().unwrap_or_default();
    Source::from_tag(tag).ok_or_else(|| format!("unknown source '{tag}'"))
}

fn require(
    obj: &Map<String, Value>,
    key: &str,
    well_typed: impl Fn(&Value) -> bool,
    expected: &str,
) -> Result<(), String> {
    match obj.get(key) {
        None => Err(format!("missing '{key}'")),
        Some(value) if !well_typed(value) => Err(format!("'{key}' must be {expected}")),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn vacancy(name: &str, salary_from: u64, salary_to: u64, source: Source) -> Vacancy {
        Vacancy {
            name: name.to_string(),
            url: format!("https://example.com/{name}"),
            requirement: "Знание Rust".to_string(),
            salary_from,
            salary_to,
            source,
        }
    }

    fn store_in(dir: &TempDir) -> JsonStore {
        JsonStore::new(dir.path().join("data.json"))
    }

    fn write_raw(store: &JsonStore, text: &str) {
        fs::write(store.path(), text).unwrap();
    }

    #[test]
    fn save_then_load_preserves_records_and_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let records = vec![
            vacancy("b", 500, 800, Source::SuperJob),
            vacancy("a", 1000, 0, Source::HeadHunter),
        ];

        store.save(&records).unwrap();
        assert!(store.exists());
        assert_eq!(store.check(), Validation::Ready);

        let loaded = store.load_vacancies(&Normalizer::default()).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn file_keeps_non_ascii_text_readable() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&[vacancy("a", 1, 2, Source::HeadHunter)]).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("Знание Rust"));
        assert!(text.contains("\"source\": \"HeadHunter\""));
    }

    #[test]
    fn append_concatenates() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append(&[vacancy("a", 1, 2, Source::HeadHunter)]).unwrap();
        store.append(&[vacancy("b", 3, 4, Source::SuperJob)]).unwrap();

        let names: Vec<_> = store
            .load_vacancies(&Normalizer::default())
            .unwrap()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn absent_file_is_empty_and_invalid() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(!store.exists());
        assert!(store.load().unwrap().is_empty());
        assert_eq!(store.check(), Validation::Missing);
        assert!(!store.validate());
    }

    #[test]
    fn empty_file_is_invalid() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&[]).unwrap();
        assert_eq!(store.check(), Validation::Empty);
        assert!(!store.validate());
    }

    #[test]
    fn corrupt_file_is_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        write_raw(&store, "[{\"name\": ");

        assert!(matches!(store.load(), Err(AppError::CorruptFile { .. })));
        assert_eq!(store.check(), Validation::Corrupt);
        assert!(!store.validate());
        assert!(store.append(&[]).is_err());
    }

    #[test]
    fn entry_without_source_invalidates_whole_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let good = json!({
            "name": "a", "url": "u", "requirement": null,
            "salary_from": 1, "salary_to": null, "source": "HeadHunter"
        });
        let mut bad = good.clone();
        bad.as_object_mut().unwrap().remove("source");
        write_raw(&store, &json!([good, bad]).to_string());

        assert_eq!(
            store.check(),
            Validation::Schema {
                index: 1,
                reason: "missing 'source'".to_string()
            }
        );
        assert!(!store.validate());
        assert!(matches!(
            store.load_vacancies(&Normalizer::default()),
            Err(AppError::SchemaInvalid { index: 1, .. })
        ));
    }

    #[test]
    fn non_integer_salary_is_invalid() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        write_raw(
            &store,
            &json!([{
                "name": "a", "url": "u", "requirement": "r",
                "salary_from": "1000", "salary_to": 0, "source": "SuperJob"
            }])
            .to_string(),
        );
        assert!(matches!(store.check(), Validation::Schema { index: 0, .. }));
        assert!(!store.validate());
    }

    #[test]
    fn invalid_utf8_is_unreadable_not_corrupt() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), [0x5b, 0xff, 0xfe, 0x5d]).unwrap();

        assert!(matches!(store.check(), Validation::Unreadable(_)));
        assert!(!store.validate());
        assert!(matches!(store.ensure_ready(), Err(AppError::Io { .. })));
    }

    #[test]
    fn ensure_ready_names_the_failure() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let err = store.ensure_ready().unwrap_err();
        assert!(matches!(err, AppError::NotReady { .. }));
        assert!(err.to_string().contains("does not exist"));

        store.save(&[]).unwrap();
        let err = store.ensure_ready().unwrap_err();
        assert!(err.to_string().contains("is empty"));

        write_raw(&store, "{not json");
        assert!(matches!(store.ensure_ready(), Err(AppError::CorruptFile { .. })));

        write_raw(
            &store,
            &json!([{
                "name": "a", "url": "u", "requirement": "r",
                "salary_from": 1, "salary_to": 2.5, "source": "HeadHunter"
            }])
            .to_string(),
        );
        assert!(matches!(
            store.ensure_ready(),
            Err(AppError::SchemaInvalid { index: 0, ref reason }) if reason == "'salary_to' must be an integer or null"
        ));

        store.save(&[vacancy("a", 1, 2, Source::HeadHunter)]).unwrap();
        assert!(store.ensure_ready().is_ok());
    }

    #[test]
    fn unknown_source_is_invalid() {
        let entry = json!({
            "name": "a", "url": "u", "requirement": "r",
            "salary_from": 1, "salary_to": 2, "source": "Indeed"
        });
        assert_eq!(check_entry(&entry), Err("unknown source 'Indeed'".to_string()));
    }
}
