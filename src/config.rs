use std::env;
use std::path::PathBuf;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PREDICTION_TYPE_ID: u32 = 237;
const DEFAULT_MIN_PERCENTAGE: u32 = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: Option<String>,
    pub timeout_secs: u64,
    pub prediction_type_id: u32,
    pub min_percentage: u32,
    pub date: Option<String>,
    pub search: Option<String>,
    pub sample_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            prediction_type_id: DEFAULT_PREDICTION_TYPE_ID,
            min_percentage: DEFAULT_MIN_PERCENTAGE,
            date: None,
            search: None,
            sample_file: None,
        }
    }
}

impl AppConfig {
    pub fn load(args: &[String]) -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        let mut cfg = Self::from_env();
        cfg.apply_args(args);
        cfg
    }

    pub fn from_env() -> Self {
        let api_base_url = env_string("PREDICTIONS_API_URL").or_else(|| env_string("BASE_URL"));
        let timeout_secs = env::var("PREDICTIONS_TIMEOUT_SECS")
            .ok()
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(1, 120);
        let prediction_type_id = env::var("PREDICTIONS_TYPE_ID")
            .ok()
            .and_then(|val| val.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_PREDICTION_TYPE_ID);
        let min_percentage = env::var("PREDICTIONS_MIN_PERCENTAGE")
            .ok()
            .and_then(|val| val.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_MIN_PERCENTAGE)
            .min(100);
        Self {
            api_base_url,
            timeout_secs,
            prediction_type_id,
            min_percentage,
            date: env_string("PREDICTIONS_DATE"),
            search: None,
            sample_file: env_string("PREDICTIONS_SAMPLE_FILE").map(PathBuf::from),
        }
    }

    pub fn apply_args(&mut self, args: &[String]) {
        if let Some(date) = flag_value(args, "--date") {
            self.date = Some(date);
        }
        if let Some(search) = flag_value(args, "--search") {
            self.search = Some(search);
        }
        if let Some(url) = flag_value(args, "--api-url") {
            self.api_base_url = Some(url);
        }
        if let Some(path) = flag_value(args, "--sample-file") {
            self.sample_file = Some(PathBuf::from(path));
        }
    }
}

/// Accepts `--name value` and `--name=value`. Blank values are ignored.
pub fn flag_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() && !next.starts_with("--") {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
