use std::fmt;

use serde::{Deserialize, Serialize};

/// The recruiting service a vacancy was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum Source {
    #[value(name = "headhunter")]
    HeadHunter,
    #[value(name = "superjob")]
    SuperJob,
}

impl Source {
    pub const ALL: [Source; 2] = [Source::HeadHunter, Source::SuperJob];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::HeadHunter => "HeadHunter",
            Source::SuperJob => "SuperJob",
        }
    }

    /// Parse the tag written to the data file.
    pub fn from_tag(tag: &str) -> Option<Source> {
        Source::ALL.into_iter().find(|s| s.as_str() == tag)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical vacancy record shared by every provider.
///
/// Salaries are in roubles per month; `0` means the bound is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vacancy {
    pub name: String,
    pub url: String,
    pub requirement: String,
    pub salary_from: u64,
    pub salary_to: u64,
    pub source: Source,
}

impl Vacancy {
    /// Comparison key: the upper bound when advertised, otherwise the lower one.
    pub fn salary(&self) -> u64 {
        if self.salary_to != 0 {
            self.salary_to
        } else {
            self.salary_from
        }
    }
}

impl fmt::Display for Vacancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Service: {}", self.source)?;
        writeln!(f, "Title: {}", self.name)?;
        writeln!(f, "Link: {}", self.url)?;
        writeln!(f, "Requirements: {}", self.requirement)?;
        let to = if self.salary_to != 0 {
            self.salary_to.to_string()
        } else {
            String::new()
        };
        writeln!(f, "Salary: {} -> {} RUB/month", self.salary_from, to)
    }
}
