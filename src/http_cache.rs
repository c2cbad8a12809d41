use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED, USER_AGENT};

const USER_AGENT_VALUE: &str = concat!("predictions_terminal/", env!("CARGO_PKG_VERSION"));

// Process-lifetime only; nothing is written to disk.
static CACHE: Mutex<Option<SessionCache>> = Mutex::new(None);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub body: String,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
}

impl CacheEntry {
    pub fn can_revalidate(&self) -> bool {
        self.etag.is_some() || self.last_modified.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionCache {
    entries: HashMap<String, CacheEntry>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<&CacheEntry> {
        self.entries.get(url)
    }

    pub fn insert(&mut self, url: &str, entry: CacheEntry) {
        self.entries.insert(url.to_string(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

pub fn fetch_json_cached(
    client: &Client,
    url: &str,
    extra_headers: &[(&str, &str)],
) -> Result<String> {
    let cached_entry = with_cache(|cache| cache.get(url).cloned());

    let mut req = client.get(url).header(USER_AGENT, USER_AGENT_VALUE);
    for (name, value) in extra_headers {
        req = req.header(*name, *value);
    }
    if let Some(entry) = cached_entry.as_ref() {
        if let Some(etag) = entry.etag.as_ref() {
            req = req.header(IF_NONE_MATCH, etag);
        }
        if let Some(last_modified) = entry.last_modified.as_ref() {
            req = req.header(IF_MODIFIED_SINCE, last_modified);
        }
    }

    let resp = req.send().context("request failed")?;
    let status = resp.status();
    let headers = resp.headers().clone();
    if status == StatusCode::NOT_MODIFIED {
        if let Some(entry) = cached_entry {
            return Ok(entry.body);
        }
        return Err(anyhow!("received 304 without cache body"));
    }

    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {}: {}", status, truncate(&body, 200)));
    }

    let etag = headers
        .get(ETAG)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    let last_modified = headers
        .get(LAST_MODIFIED)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    let entry = CacheEntry {
        body: body.clone(),
        etag,
        last_modified,
    };
    if entry.can_revalidate() {
        with_cache(|cache| cache.insert(url, entry));
    }
    Ok(body)
}

fn with_cache<T>(f: impl FnOnce(&mut SessionCache) -> T) -> T {
    let mut guard = CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let cache = guard.get_or_insert_with(SessionCache::new);
    f(cache)
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(etag: Option<&str>) -> CacheEntry {
        CacheEntry {
            body: "{}".to_string(),
            etag: etag.map(str::to_string),
            last_modified: None,
        }
    }

    #[test]
    fn session_cache_keys_by_url() {
        let mut cache = SessionCache::new();
        cache.insert("http://a/prediction/2024-03-09", entry(Some("\"v1\"")));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("http://a/prediction/2024-03-10").is_none());
        let hit = cache.get("http://a/prediction/2024-03-09").unwrap();
        assert!(hit.can_revalidate());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn entry_without_validators_cannot_revalidate() {
        assert!(!entry(None).can_revalidate());
    }

    #[test]
    fn truncate_long_bodies() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdef", 3), "abc…");
    }
}
