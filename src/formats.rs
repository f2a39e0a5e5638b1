use std::collections::BTreeMap;

use serde::Deserialize;

use crate::layout::SiteLayout;

/// Placeholder for any field the page markup did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub area: String,
}

/// Jobs extracted from a single page, keyed by job id.
pub type JobMap = BTreeMap<String, JobRecord>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Site {
    pub url: String,
    #[serde(default)]
    pub layout: SiteLayout,
}

impl Site {
    pub fn legacy(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            layout: SiteLayout::Legacy,
        }
    }
}
