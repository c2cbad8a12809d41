use anyhow::{Context, Result, anyhow};
use reqwest::Url;

use crate::config::AppConfig;
use crate::fixtures::{Fixture, fixtures_from_response_json};
use crate::http_cache::fetch_json_cached;
use crate::http_client::http_client_with_timeout;

#[derive(Debug, Clone)]
pub struct PredictionsApi {
    base_url: String,
    timeout_secs: u64,
    prediction_type_id: u32,
    min_percentage: u32,
}

impl PredictionsApi {
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let base_url = cfg
            .api_base_url
            .clone()
            .context("prediction api url not configured (set PREDICTIONS_API_URL)")?;
        Ok(Self {
            base_url,
            timeout_secs: cfg.timeout_secs,
            prediction_type_id: cfg.prediction_type_id,
            min_percentage: cfg.min_percentage,
        })
    }

    pub fn predictions_by_date_url(&self, date: &str) -> Result<Url> {
        let filters = format!("predictionTypes:{}", self.prediction_type_id);
        let pct = self.min_percentage.to_string();
        endpoint_url(
            &self.base_url,
            &["prediction", date],
            &[
                ("include", "predictions.type;participants"),
                ("filters", filters.as_str()),
                ("filterByPercentage", pct.as_str()),
            ],
        )
    }

    pub fn fixtures_by_name_url(&self, name: &str) -> Result<Url> {
        endpoint_url(
            &self.base_url,
            &["fixtures", "search", name.trim()],
            &[("include", "predictions.type;participants;league.country")],
        )
    }

    pub fn get_predictions_by_date(&self, date: &str) -> Result<Vec<Fixture>> {
        let url = self.predictions_by_date_url(date)?;
        self.get_fixtures(&url)
            .with_context(|| format!("predictions for {date}"))
    }

    pub fn get_fixtures_by_name(&self, name: &str) -> Result<Vec<Fixture>> {
        if name.trim().is_empty() {
            return Err(anyhow!("empty search"));
        }
        let url = self.fixtures_by_name_url(name)?;
        self.get_fixtures(&url)
            .with_context(|| format!("fixtures matching \"{}\"", name.trim()))
    }

    fn get_fixtures(&self, url: &Url) -> Result<Vec<Fixture>> {
        let client = http_client_with_timeout(self.timeout_secs)?;
        let body = fetch_json_cached(client, url.as_str(), &[])?;
        fixtures_from_response_json(&body)
    }
}

fn endpoint_url(base: &str, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
    let mut url = Url::parse(base.trim()).with_context(|| format!("invalid api url {base}"))?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("api url cannot hold a path: {base}"))?
        .pop_if_empty()
        .extend(segments);
    url.query_pairs_mut().extend_pairs(query);
    Ok(url)
}
