use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use anyhow::{Context, Result};

use crate::config::AppConfig;
use crate::filter::matches_search;
use crate::fixtures::{Fixture, fixtures_from_response_json};
use crate::predictions_fetch::PredictionsApi;
use crate::state::{Delta, ProviderCommand};

pub trait FixtureSource: Send {
    fn by_date(&self, date: &str) -> Result<Vec<Fixture>>;
    fn by_name(&self, name: &str) -> Result<Vec<Fixture>>;
    fn describe(&self) -> String;
}

impl FixtureSource for PredictionsApi {
    fn by_date(&self, date: &str) -> Result<Vec<Fixture>> {
        self.get_predictions_by_date(date)
    }

    fn by_name(&self, name: &str) -> Result<Vec<Fixture>> {
        self.get_fixtures_by_name(name)
    }

    fn describe(&self) -> String {
        "prediction api".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct SampleFileSource {
    path: PathBuf,
}

impl SampleFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<Vec<Fixture>> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("read sample file {}", self.path.display()))?;
        fixtures_from_response_json(&raw)
    }
}

impl FixtureSource for SampleFileSource {
    fn by_date(&self, date: &str) -> Result<Vec<Fixture>> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|f| f.starting_at.trim().starts_with(date))
            .collect())
    }

    fn by_name(&self, name: &str) -> Result<Vec<Fixture>> {
        let query = name.trim().to_lowercase();
        Ok(self
            .load()?
            .into_iter()
            .filter(|f| matches_search(f, &query))
            .collect())
    }

    fn describe(&self) -> String {
        format!("sample file {}", self.path.display())
    }
}

pub fn source_from_config(cfg: &AppConfig) -> Result<Box<dyn FixtureSource>> {
    if let Some(path) = cfg.sample_file.as_ref() {
        return Ok(Box::new(SampleFileSource::new(path.clone())));
    }
    let api = PredictionsApi::from_config(cfg)?;
    Ok(Box::new(api))
}

pub fn execute_command(source: &dyn FixtureSource, cmd: &ProviderCommand) -> Delta {
    let key = cmd.key();
    let result = match cmd {
        ProviderCommand::FetchByDate { date } => source.by_date(date),
        ProviderCommand::FetchByName { name } => source.by_name(name),
    };
    match result {
        Ok(fixtures) => Delta::FixturesLoaded { key, fixtures },
        Err(err) => Delta::FetchFailed {
            key,
            error: format!("{err:#}"),
        },
    }
}

pub fn coalesce(first: ProviderCommand, rx: &Receiver<ProviderCommand>) -> (ProviderCommand, usize) {
    let mut latest = first;
    let mut superseded = 0usize;
    while let Ok(next) = rx.try_recv() {
        latest = next;
        superseded += 1;
    }
    (latest, superseded)
}

pub fn spawn_provider(
    source: Option<Box<dyn FixtureSource>>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) {
    thread::spawn(move || {
        match source.as_ref() {
            Some(src) => {
                let _ = tx.send(Delta::Log(format!("[INFO] Source: {}", src.describe())));
            }
            None => {
                let _ = tx.send(Delta::Log(
                    "[WARN] No fixture source configured (set PREDICTIONS_API_URL)".to_string(),
                ));
            }
        }

        while let Ok(first) = cmd_rx.recv() {
            let (cmd, superseded) = coalesce(first, &cmd_rx);
            if superseded > 0 {
                let _ = tx.send(Delta::Log(format!(
                    "[INFO] Skipped {superseded} superseded request(s)"
                )));
            }
            let delta = match source.as_deref() {
                Some(src) => execute_command(src, &cmd),
                None => Delta::FetchFailed {
                    key: cmd.key(),
                    error: "no fixture source configured".to_string(),
                },
            };
            if tx.send(delta).is_err() {
                break;
            }
        }
    });
}
