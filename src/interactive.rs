// Prompt-driven session: reuse or refetch the data file, then filter, sort and print.

use std::io::{self, BufRead, Write};

use crate::collectors::runner;
use crate::config::{Config, Provider};
use crate::models::vacancy::{Source, Vacancy};
use crate::normalizer::Normalizer;
use crate::pipeline::Query;
use crate::store::JsonStore;

/// Typing this at any choice prompt ends the session without output.
const STOP: &str = "stop";

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// One trimmed line, `None` at end of input.
    fn line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim().to_string()))
    }

    /// Re-prompt until one of `options` is entered. `None` on stop.
    fn choose(&mut self, prompt: &str, options: &[&str]) -> io::Result<Option<String>> {
        loop {
            match self.line(prompt)? {
                None => return Ok(None),
                Some(answer) if answer == STOP => return Ok(None),
                Some(answer) if options.contains(&answer.as_str()) => return Ok(Some(answer)),
                Some(_) => continue,
            }
        }
    }

    /// Re-prompt until a whole number (at most `max`, if given) is entered.
    fn number(&mut self, prompt: &str, max: Option<u64>) -> io::Result<Option<u64>> {
        loop {
            let Some(answer) = self.line(prompt)? else {
                return Ok(None);
            };
            if answer == STOP {
                return Ok(None);
            }
            if !answer.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            match answer.parse::<u64>() {
                Ok(n) if max.is_none_or(|max| n <= max) => return Ok(Some(n)),
                _ => continue,
            }
        }
    }

    /// `true` to reuse the data file, `false` to fetch again.
    pub fn ask_reuse(&mut self) -> io::Result<Option<bool>> {
        let answer = self.choose(
            "Found a usable data file. Choose:\n\t1 - use the file\n\t2 - fetch from the services\n",
            &["1", "2"],
        )?;
        Ok(answer.map(|a| a == "1"))
    }

    pub fn ask_fetch_request(&mut self) -> io::Result<Option<(Provider, String)>> {
        let Some(service) = self.choose(
            "Which service should be searched? (\"1\" - HeadHunter | \"2\" - SuperJob | \"0\" - all | \"stop\" - exit): ",
            &["0", "1", "2"],
        )?
        else {
            return Ok(None);
        };
        let provider = match service.as_str() {
            "1" => Provider::Headhunter,
            "2" => Provider::Superjob,
            _ => Provider::All,
        };

        match self.line("Enter a search phrase (\"stop\" - exit): ")? {
            Some(keyword) if keyword != STOP => Ok(Some((provider, keyword))),
            _ => Ok(None),
        }
    }

    /// Source, salary and requirement filters.
    pub fn ask_filters(&mut self) -> io::Result<Option<Query>> {
        writeln!(self.output, "Choose what to do with the data:")?;

        let Some(service) = self.choose(
            "\t- Filter by service (\"1\" - HeadHunter only | \"2\" - SuperJob only | \"0\" - both | \"stop\" - exit):\n",
            &["0", "1", "2"],
        )?
        else {
            return Ok(None);
        };
        let source = match service.as_str() {
            "1" => Some(Source::HeadHunter),
            "2" => Some(Source::SuperJob),
            _ => None,
        };

        let Some(by_salary) = self.choose(
            "\t- Filter by salary (\"1\" - yes | \"0\" - no | \"stop\" - exit):\n",
            &["0", "1"],
        )?
        else {
            return Ok(None);
        };
        let salary = if by_salary == "1" {
            match self.number("Enter the salary:\n", None)? {
                Some(amount) => Some(amount),
                None => return Ok(None),
            }
        } else {
            None
        };

        let Some(by_phrase) = self.choose(
            "\t- Search for a phrase in the requirements (\"1\" - yes | \"0\" - no | \"stop\" - exit):\n",
            &["0", "1"],
        )?
        else {
            return Ok(None);
        };
        let requirement = if by_phrase == "1" {
            match self.line("Enter the phrase (\"stop\" - exit):\n")? {
                Some(phrase) if phrase != STOP => Some(phrase),
                _ => return Ok(None),
            }
        } else {
            None
        };

        Ok(Some(Query {
            source,
            salary,
            requirement,
            ..Query::default()
        }))
    }

    /// Sorting and top-N choice for `count` filtered vacancies.
    pub fn ask_presentation(&mut self, count: usize) -> io::Result<Option<Query>> {
        let Some(sort) = self.choose(
            "\t- Sort the result by salary? (\"1\" - yes | \"0\" - no | \"stop\" - exit):\n",
            &["0", "1"],
        )?
        else {
            return Ok(None);
        };
        if sort == "0" {
            return Ok(Some(Query::default()));
        }

        let Some(show) = self.choose(
            "\t- Print (\"0\" - all sorted | \"1\" - top n | \"stop\" - exit):\n",
            &["0", "1"],
        )?
        else {
            return Ok(None);
        };
        let top = if show == "1" {
            match self.number(&format!("Enter n (max {count}): "), Some(count as u64))? {
                Some(n) => Some(n as usize),
                None => return Ok(None),
            }
        } else {
            None
        };

        Ok(Some(Query {
            sort: true,
            top,
            ..Query::default()
        }))
    }
}

pub fn print_vacancies<W: Write>(out: &mut W, vacancies: &[Vacancy]) -> io::Result<()> {
    for vacancy in vacancies {
        writeln!(out, "{vacancy}")?;
    }
    Ok(())
}

/// Run the whole session. A "stop" answer returns `Ok(())` early.
pub async fn run<R: BufRead, W: Write>(
    config: &Config,
    store: &JsonStore,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    let reuse = if store.validate() {
        match prompter.ask_reuse()? {
            Some(reuse) => reuse,
            None => return Ok(()),
        }
    } else {
        false
    };

    if !reuse {
        let Some((provider, keyword)) = prompter.ask_fetch_request()? else {
            return Ok(());
        };
        let summaries = runner::run(config, store, &provider.sources(), &keyword).await?;
        for summary in &summaries {
            writeln!(
                prompter.output(),
                "Found {} vacancies on {}",
                summary.found,
                summary.source
            )?;
        }
    }

    let Some(filters) = prompter.ask_filters()? else {
        return Ok(());
    };
    let vacancies = store.load_vacancies(&Normalizer::new(config.exchange_rate))?;
    let vacancies = filters.apply(vacancies);
    writeln!(prompter.output(), "Found {} vacancies.", vacancies.len())?;

    let Some(presentation) = prompter.ask_presentation(vacancies.len())? else {
        return Ok(());
    };
    let vacancies = presentation.apply(vacancies);
    print_vacancies(prompter.output(), &vacancies)?;
    Ok(())
}
