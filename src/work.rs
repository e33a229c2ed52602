use serde::Serialize;
use serde_json::Value;

use crate::json::{get_path, items_at, text_at};

pub const UNTITLED: &str = "Untitled";
pub const DOI_RESOLVER: &str = "https://doi.org/";

/// One publication as the site renders it. Every field is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkRecord {
    pub title: String,
    pub year: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub doi: String,
    pub url: String,
}

/// Fields pulled from the first work-summary of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub title: String,
    pub year: String,
    pub kind: String,
    pub url: String,
    pub put_code: Option<String>,
}

impl Summary {
    /// Read the first variant of a `group[]` entry. A malformed or empty group yields the defaults.
    pub fn from_group(group: &Value) -> Self {
        let summary = get_path(group, "work-summary.0").unwrap_or(&Value::Null);
        Summary::from_work_summary(summary)
    }

    pub fn from_work_summary(summary: &Value) -> Self {
        let put_code = ["put-code", "putCode"]
            .iter()
            .map(|key| text_at(summary, key, ""))
            .find(|code| !code.is_empty());

        Summary {
            title: text_at(summary, "title.title.value", UNTITLED),
            year: text_at(summary, "publication-date.year.value", ""),
            kind: text_at(summary, "type", ""),
            url: text_at(summary, "url.value", ""),
            put_code,
        }
    }
}

/// Outcome of the best-effort detail lookup for one work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    /// The detail document was read; carries its DOI if it listed one.
    Enriched { doi: Option<String> },
    /// Nothing to add: no put-code, or the detail lookup failed.
    Unenriched,
}

impl Enrichment {
    pub fn from_detail(detail: &Value) -> Self {
        Enrichment::Enriched {
            doi: find_doi(detail),
        }
    }
}

/// First external identifier typed `doi` (any case), trimmed.
pub fn find_doi(detail: &Value) -> Option<String> {
    items_at(detail, "external-ids.external-id")
        .iter()
        .find(|ext| text_at(ext, "external-id-type", "").eq_ignore_ascii_case("doi"))
        .map(|ext| text_at(ext, "external-id-value", "").trim().to_string())
}

impl WorkRecord {
    /// Combine summary fields with whatever the detail lookup found.
    ///
    /// A summary URL always wins; the DOI resolver link only fills an empty one.
    pub fn assemble(summary: Summary, enrichment: Enrichment) -> Self {
        let doi = match enrichment {
            Enrichment::Enriched { doi: Some(doi) } => doi,
            Enrichment::Enriched { doi: None } | Enrichment::Unenriched => String::new(),
        };
        let url = if summary.url.is_empty() && !doi.is_empty() {
            format!("{DOI_RESOLVER}{doi}")
        } else {
            summary.url
        };

        WorkRecord {
            title: summary.title,
            year: summary.year,
            kind: summary.kind,
            doi,
            url,
        }
    }
}
