use std::{thread, time::Duration};

use anyhow::Context;
use serde_json::Value;

use crate::{
    json::items_at,
    registry::{Endpoints, JSON, Registry},
    report::Reporter,
    work::{Enrichment, Summary, WorkRecord},
};

/// How the per-work detail lookups went.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    /// Detail document fetched and read.
    pub expanded: usize,
    /// Detail lookup attempted and failed.
    pub failed: usize,
    /// No put-code, so nothing to look up.
    pub skipped: usize,
}

#[derive(Debug)]
pub struct Harvest {
    /// One record per group, in registry order.
    pub records: Vec<WorkRecord>,
    pub tally: Tally,
}

/// Gather every work on the record, expanding each with its DOI where possible.
///
/// Only a failure to get or read the summary list is an error. Per-work lookups that fail are
/// reported and the work is kept with its summary fields.
pub fn collect_works<R: Registry + ?Sized>(
    registry: &R,
    endpoints: &Endpoints,
    delay: Duration,
    reporter: &Reporter,
) -> anyhow::Result<Harvest> {
    let body = registry
        .fetch(&endpoints.works(), JSON)
        .with_context(|| format!("failed to fetch works of {}", endpoints.subject()))?;
    let works: Value = serde_json::from_str(&body).context("works summary is not valid JSON")?;

    let groups = items_at(&works, "group");
    reporter.start(groups.len());

    let mut tally = Tally::default();
    let mut records = Vec::with_capacity(groups.len());
    for group in groups {
        let summary = Summary::from_group(group);
        reporter.advance(&summary.title);

        let enrichment = match summary.put_code.as_deref() {
            Some(put_code) => {
                let enrichment = match expand(registry, endpoints, put_code) {
                    Ok(detail) => {
                        tally.expanded += 1;
                        Enrichment::from_detail(&detail)
                    }
                    Err(e) => {
                        tally.failed += 1;
                        reporter.warn(&format!("could not expand work {put_code}: {e:#}"));
                        Enrichment::Unenriched
                    }
                };
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
                enrichment
            }
            None => {
                tally.skipped += 1;
                Enrichment::Unenriched
            }
        };

        records.push(WorkRecord::assemble(summary, enrichment));
    }

    Ok(Harvest { records, tally })
}

/// Fetch and parse the detail document of one work.
fn expand<R: Registry + ?Sized>(
    registry: &R,
    endpoints: &Endpoints,
    put_code: &str,
) -> anyhow::Result<Value> {
    let body = registry.fetch(&endpoints.work(put_code), JSON)?;
    serde_json::from_str(&body).context("detail document is not valid JSON")
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::HashMap, str::FromStr};

    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::{cli::OrcidId, order::sort_descending_by_year, registry::FetchError};

    const BASE: &str = "https://registry.test/v3.0/";
    const ID: &str = "0000-0003-2271-6803";

    /// Serves canned bodies by URL; anything unknown is a 404.
    #[derive(Default)]
    struct FakeRegistry {
        docs: HashMap<String, String>,
        calls: RefCell<Vec<(String, String)>>,
    }

    impl FakeRegistry {
        fn with(mut self, path: &str, body: serde_json::Value) -> Self {
            self.docs.insert(format!("{BASE}{ID}/{path}"), body.to_string());
            self
        }

        fn with_raw(mut self, path: &str, body: &str) -> Self {
            self.docs.insert(format!("{BASE}{ID}/{path}"), body.to_string());
            self
        }
    }

    impl Registry for FakeRegistry {
        fn fetch(&self, url: &str, accept: &str) -> Result<String, FetchError> {
            self.calls
                .borrow_mut()
                .push((url.to_string(), accept.to_string()));
            self.docs.get(url).cloned().ok_or(FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    fn endpoints() -> Endpoints {
        Endpoints::new(Url::parse(BASE).unwrap(), OrcidId::from_str(ID).unwrap())
    }

    fn collect(registry: &FakeRegistry) -> anyhow::Result<Harvest> {
        collect_works(registry, &endpoints(), Duration::ZERO, &Reporter::hidden())
    }

    fn group(summary: serde_json::Value) -> serde_json::Value {
        json!({"work-summary": [summary]})
    }

    fn doi_detail(doi: &str) -> serde_json::Value {
        json!({"external-ids": {"external-id": [
            {"external-id-type": "doi", "external-id-value": doi}
        ]}})
    }

    #[test]
    fn end_to_end_two_groups() {
        let registry = FakeRegistry::default()
            .with(
                "works",
                json!({"group": [
                    group(json!({
                        "putCode": "100",
                        "title": {"title": {"value": "Paper One"}},
                        "publication-date": {"year": {"value": "2022"}}
                    })),
                    group(json!({"publication-date": {"year": {"value": "2021"}}}))
                ]}),
            )
            .with("work/100", doi_detail("10.1000/xyz"));

        let harvest = collect(&registry).expect("collect");
        let records = sort_descending_by_year(harvest.records);
        assert_eq!(
            serde_json::to_value(&records).unwrap(),
            json!([
                {"title": "Paper One", "year": "2022", "type": "", "doi": "10.1000/xyz", "url": "https://doi.org/10.1000/xyz"},
                {"title": "Untitled", "year": "2021", "type": "", "doi": "", "url": ""}
            ])
        );
        assert_eq!(
            harvest.tally,
            Tally {
                expanded: 1,
                failed: 0,
                skipped: 1
            }
        );
    }

    #[test]
    fn one_record_per_group_even_when_malformed() {
        let registry = FakeRegistry::default().with(
            "works",
            json!({"group": [
                group(json!({"title": {"title": {"value": "A"}}})),
                {},
                {"work-summary": []},
                "junk",
                group(json!({"title": {"title": {"value": "B"}}}))
            ]}),
        );
        let harvest = collect(&registry).expect("collect");
        let titles: Vec<_> = harvest.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["A", "Untitled", "Untitled", "Untitled", "B"]);
    }

    #[test]
    fn failed_detail_keeps_summary_fields() {
        let registry = FakeRegistry::default()
            .with(
                "works",
                json!({"group": [
                    group(json!({"put-code": 1, "title": {"title": {"value": "Gone"}}, "url": {"value": "https://example.org/gone"}})),
                    group(json!({"put-code": 2, "title": {"title": {"value": "Garbled"}}})),
                    group(json!({"put-code": 3, "title": {"title": {"value": "Fine"}}}))
                ]}),
            )
            .with_raw("work/2", "<html>not json</html>")
            .with("work/3", doi_detail(" 10.1000/fine ")); // work/1 is a 404

        let harvest = collect(&registry).expect("collect");
        assert_eq!(harvest.records.len(), 3);
        assert_eq!(harvest.records[0].doi, "");
        assert_eq!(harvest.records[0].url, "https://example.org/gone");
        assert_eq!(harvest.records[1].title, "Garbled");
        assert_eq!(harvest.records[1].doi, "");
        assert_eq!(harvest.records[2].doi, "10.1000/fine");
        assert_eq!(harvest.records[2].url, "https://doi.org/10.1000/fine");
        assert_eq!(
            harvest.tally,
            Tally {
                expanded: 1,
                failed: 2,
                skipped: 0
            }
        );
    }

    #[test]
    fn detail_without_doi_leaves_fields_empty() {
        let registry = FakeRegistry::default()
            .with("works", json!({"group": [group(json!({"put-code": 7}))]}))
            .with(
                "work/7",
                json!({"external-ids": {"external-id": [
                    {"external-id-type": "isbn", "external-id-value": "978-0-00-000000-0"}
                ]}}),
            );
        let harvest = collect(&registry).expect("collect");
        assert_eq!(harvest.records[0].doi, "");
        assert_eq!(harvest.records[0].url, "");
        assert_eq!(harvest.tally.expanded, 1);
    }

    #[test]
    fn requests_ask_for_json() {
        let registry = FakeRegistry::default()
            .with("works", json!({"group": [group(json!({"put-code": 5}))]}))
            .with("work/5", json!({}));
        collect(&registry).expect("collect");
        let calls = registry.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, format!("{BASE}{ID}/works"));
        assert_eq!(calls[1].0, format!("{BASE}{ID}/work/5"));
        assert!(calls.iter().all(|(_, accept)| accept == "application/json"));
    }

    #[test]
    fn no_detail_request_without_put_code() {
        let registry =
            FakeRegistry::default().with("works", json!({"group": [group(json!({}))]}));
        collect(&registry).expect("collect");
        assert_eq!(registry.calls.borrow().len(), 1);
    }

    #[test]
    fn summary_without_groups_is_empty() {
        let registry = FakeRegistry::default().with("works", json!({"last-modified-date": null}));
        assert!(collect(&registry).expect("collect").records.is_empty());
    }

    #[test]
    fn summary_fetch_failure_is_fatal() {
        let err = collect(&FakeRegistry::default()).unwrap_err();
        assert!(
            format!("{err:#}").contains("failed to fetch works of 0000-0003-2271-6803"),
            "{err:#}"
        );
    }

    #[test]
    fn unreadable_summary_is_fatal() {
        let registry = FakeRegistry::default().with_raw("works", "{\"group\": [");
        let err = collect(&registry).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"), "{err:#}");
    }
}
