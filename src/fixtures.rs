use anyhow::{Context, Result, anyhow};
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::outcome::Probabilities;

pub const HOME_PLACEHOLDER: &str = "Home Team";
pub const AWAY_PLACEHOLDER: &str = "Away Team";
pub const LEAGUE_PLACEHOLDER: &str = "Unknown league";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixturesResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub status: ResponseStatus,
    #[serde(default)]
    pub data: Option<FixturesPage>,
    #[serde(default, deserialize_with = "null_default")]
    pub message: String,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixturesPage {
    #[serde(default)]
    pub data: Option<Vec<Fixture>>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default, deserialize_with = "null_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub league_id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub starting_at: String,
    #[serde(default)]
    pub result_info: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub league: League,
    #[serde(default, deserialize_with = "null_default")]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub predictions: Option<Vec<PredictionRecord>>,
    #[serde(default)]
    pub state: Option<FixtureState>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct League {
    #[serde(default, deserialize_with = "null_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub country: Country,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Country {
    #[serde(default, deserialize_with = "null_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Home,
    Away,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParticipantMeta {
    #[serde(default, deserialize_with = "null_default")]
    pub location: Location,
    #[serde(default)]
    pub winner: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default, deserialize_with = "null_default")]
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub meta: ParticipantMeta,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionType {
    #[serde(default, deserialize_with = "null_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_default")]
    pub developer_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionRecord {
    #[serde(default, deserialize_with = "null_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub fixture_id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub type_id: u64,
    #[serde(default, rename = "type")]
    pub kind: Option<PredictionType>,
    #[serde(default, deserialize_with = "null_default")]
    pub predictions: Probabilities,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FixtureState {
    #[serde(default, deserialize_with = "null_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub developer_name: String,
}

impl Fixture {
    pub fn participant(&self, location: Location) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.meta.location == location)
    }

    pub fn home_name(&self) -> &str {
        self.participant(Location::Home)
            .and_then(|p| p.name.as_deref())
            .unwrap_or("")
    }

    pub fn away_name(&self) -> &str {
        self.participant(Location::Away)
            .and_then(|p| p.name.as_deref())
            .unwrap_or("")
    }

    pub fn home_label(&self) -> &str {
        non_empty(self.home_name()).unwrap_or(HOME_PLACEHOLDER)
    }

    pub fn away_label(&self) -> &str {
        non_empty(self.away_name()).unwrap_or(AWAY_PLACEHOLDER)
    }

    pub fn league_label(&self) -> &str {
        non_empty(&self.league.name).unwrap_or(LEAGUE_PLACEHOLDER)
    }

    pub fn prediction_records(&self) -> &[PredictionRecord] {
        self.predictions.as_deref().unwrap_or(&[])
    }

    /// Only the first record takes part in classification.
    pub fn first_prediction(&self) -> Option<&Probabilities> {
        self.prediction_records().first().map(|r| &r.predictions)
    }

    pub fn status_label(&self) -> &str {
        self.state
            .as_ref()
            .and_then(|s| non_empty(&s.name).or_else(|| non_empty(&s.state)))
            .unwrap_or("Scheduled")
    }

    pub fn kickoff(&self) -> Option<NaiveDateTime> {
        parse_kickoff(self.starting_at.trim())
    }

    pub fn kickoff_time(&self) -> String {
        match self.kickoff() {
            Some(dt) => dt.format("%H:%M").to_string(),
            None => "TBD".to_string(),
        }
    }

    pub fn kickoff_long(&self) -> String {
        match self.kickoff() {
            Some(dt) => dt.format("%B %-d, %Y at %H:%M").to_string(),
            None if self.starting_at.trim().is_empty() => "TBD".to_string(),
            None => self.starting_at.trim().to_string(),
        }
    }
}

impl PredictionRecord {
    pub fn type_label(&self) -> String {
        match &self.kind {
            Some(kind) if !kind.name.is_empty() => kind.name.clone(),
            _ => format!("Type {}", self.type_id),
        }
    }
}

impl FixturesResponse {
    pub fn into_fixtures(self) -> Result<Vec<Fixture>> {
        if self.status == ResponseStatus::Error {
            let reason = self
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or(self.message);
            return Err(anyhow!("prediction api error: {reason}"));
        }
        Ok(self.data.and_then(|page| page.data).unwrap_or_default())
    }
}

/// Decodes a response body. A literal `null` (or empty body) is `None`.
pub fn parse_fixtures_response_json(raw: &str) -> Result<Option<FixturesResponse>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let resp = serde_json::from_str::<FixturesResponse>(trimmed)
        .context("invalid fixtures response json")?;
    Ok(Some(resp))
}

pub fn fixtures_from_response_json(raw: &str) -> Result<Vec<Fixture>> {
    match parse_fixtures_response_json(raw)? {
        Some(resp) => resp.into_fixtures(),
        None => Ok(Vec::new()),
    }
}

fn parse_kickoff(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 5] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S%.fZ",
    ];

    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    None
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

pub(crate) fn null_default<'de, D, T>(de: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}
