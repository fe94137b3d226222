use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";

/// A fully normalized recommendation. Only ever built from a complete
/// two-stage fetch or from the seeded placeholder.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub overview: String,
    pub poster_path: String,
    pub release_date: Option<NaiveDate>,
    pub vote_average: f32,
    pub watch_providers: Option<WatchAvailability>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct WatchAvailability {
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flatrate: Vec<Provider>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rent: Vec<Provider>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buy: Vec<Provider>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ads: Vec<Provider>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Provider {
    pub provider_name: String,
}

impl Provider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            provider_name: name.into(),
        }
    }
}

impl Movie {
    pub fn poster_url(&self) -> Option<String> {
        let path = self.poster_path.trim();
        if path.is_empty() {
            return None;
        }
        Some(format!("{POSTER_BASE}{path}"))
    }

    /// US long form, e.g. "July 15, 2010".
    pub fn formatted_release_date(&self) -> Option<String> {
        self.release_date
            .map(|d| d.format("%B %-d, %Y").to_string())
    }

    pub fn score_label(&self) -> String {
        format!("{:.1}/10", self.vote_average)
    }
}

/// Keeps a score inside the 0-10 range the rest of the crate relies on.
pub fn clamp_score(score: f32) -> f32 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 10.0)
}

/// TMDB sends "" for unknown dates; anything unparsable is treated the same way.
pub fn parse_release_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
