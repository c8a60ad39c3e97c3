use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use toolhub_core::catalog::{CatalogFormat, CatalogSource, CatalogStore, RawCatalog, SourceError, StaticSource};
use toolhub_core::selection::ToolType;
use toolhub_core::types::ToolRecord;
use toolhub_core::view::{activate, Activation, CatalogView};

const CATALOG: &str = r##"[
  {"id": "reviewer", "name": "Reviewer Bot", "description": "Automated code review", "category": "code_review",
   "url": "https://review.example.com", "tags": ["ci"], "is_external": true},
  {"id": "wiki", "name": "Team Wiki", "description": "Internal documentation", "category": "docs",
   "guide_content": "# Wiki\nRead **this**.", "tags": ["wiki"], "is_external": false},
  {"id": "grafana", "name": "Grafana", "description": "Dashboards", "category": "devops",
   "url": "https://grafana.example.com", "tags": ["ops", "ci"]}
]"##;

const SMALLER: &str = r##"[
  {"id": "wiki", "name": "Team Wiki", "description": "Internal documentation", "category": "docs",
   "guide_content": "# Wiki", "is_external": false}
]"##;

struct ScriptedSource {
    results: Mutex<VecDeque<Option<&'static str>>>,
}

impl ScriptedSource {
    fn new(results: Vec<Option<&'static str>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
        }
    }
}

#[async_trait]
impl CatalogSource for ScriptedSource {
    fn describe(&self) -> String {
        "scripted".into()
    }

    async fn fetch(&self) -> Result<RawCatalog, SourceError> {
        let next = self.results.lock().unwrap().pop_front().flatten();
        match next {
            Some(text) => Ok(RawCatalog {
                bytes: text.as_bytes().to_vec(),
                format: CatalogFormat::Json,
            }),
            None => Err(SourceError::Io {
                path: PathBuf::from("/tools.json"),
                source: io::Error::new(io::ErrorKind::NotFound, "gone"),
            }),
        }
    }
}

fn visible_ids(view: &CatalogView) -> Vec<&str> {
    view.visible().iter().map(|r| r.id.as_str()).collect()
}

async fn loaded_view(results: Vec<Option<&'static str>>) -> CatalogView {
    let store = Arc::new(CatalogStore::new(ScriptedSource::new(results)));
    let mut view = CatalogView::new(store);
    view.reload().await.unwrap();
    view
}

#[tokio::test]
async fn view_before_load_is_empty() {
    let store = Arc::new(CatalogStore::new(StaticSource::json(CATALOG)));
    let view = CatalogView::new(store);

    assert!(view.visible().is_empty());
    assert!(view.categories().is_empty());
    assert_eq!(view.stats().total_tools, 0);
    assert_eq!(view.visible().summary(), "No tools found");
}

#[tokio::test]
async fn view_exposes_visible_records_facets_and_stats() {
    let view = loaded_view(vec![Some(CATALOG)]).await;

    assert_eq!(visible_ids(&view), vec!["reviewer", "wiki", "grafana"]);
    assert_eq!(view.visible().summary(), "Found 3 tool(s)");

    let labels: Vec<&str> = view.categories().iter().map(|c| c.display_name.as_str()).collect();
    assert_eq!(labels, vec!["Code Review", "Devops", "Docs"]);

    assert_eq!(view.stats().total_tools, 3);
    assert_eq!(view.stats().external_tools, 2);
    assert_eq!(view.stats().internal_tools, 1);
}

#[tokio::test]
async fn filter_mutations_recompute_the_visible_list() {
    let mut view = loaded_view(vec![Some(CATALOG)]).await;

    view.set_search_query("REVIEW");
    assert_eq!(visible_ids(&view), vec!["reviewer"]);

    view.set_search_query("");
    assert!(view.toggle_category("docs"));
    assert!(view.toggle_category("devops"));
    assert_eq!(visible_ids(&view), vec!["wiki", "grafana"]);

    view.set_tool_type(ToolType::External);
    assert_eq!(visible_ids(&view), vec!["grafana"]);

    assert!(!view.toggle_category("devops"));
    assert!(view.visible().is_empty());

    view.clear_filters();
    assert!(view.toggle_tag("ci"));
    assert_eq!(visible_ids(&view), vec!["reviewer", "grafana"]);

    view.clear_filters();
    assert!(view.filters().is_empty());
    assert_eq!(view.visible().len(), 3);
}

#[tokio::test]
async fn facets_ignore_filters() {
    let mut view = loaded_view(vec![Some(CATALOG)]).await;
    let before = view.facets().clone();

    view.set_search_query("wiki");
    view.set_tool_type(ToolType::Internal);

    assert_eq!(view.visible().len(), 1);
    assert_eq!(view.facets(), &before);
    assert_eq!(view.stats().total_tools, 3);
}

#[tokio::test]
async fn reload_failure_empties_visible_list_and_facets() {
    let mut view = loaded_view(vec![Some(CATALOG), None]).await;
    view.set_tool_type(ToolType::External);
    assert_eq!(view.visible().len(), 2);

    assert!(view.reload().await.is_err());

    assert!(view.visible().is_empty());
    assert!(view.categories().is_empty());
    assert_eq!(view.stats().total_tools, 0);
    assert!(view.snapshot().failure().is_some());
    // Filters survive the reload.
    assert_eq!(view.filters().tool_type, ToolType::External);
}

#[tokio::test]
async fn reload_after_failure_recovers() {
    let mut view = loaded_view(vec![Some(CATALOG), None, Some(SMALLER)]).await;

    assert!(view.reload().await.is_err());
    view.reload().await.unwrap();

    assert_eq!(visible_ids(&view), vec!["wiki"]);
    assert_eq!(view.categories().len(), 1);
}

#[tokio::test]
async fn unchanged_content_reuses_facets() {
    let mut view = loaded_view(vec![Some(CATALOG), Some(CATALOG)]).await;
    let before = Arc::clone(view.facets());
    let generation = view.snapshot().generation();

    view.reload().await.unwrap();

    assert!(view.snapshot().generation() > generation);
    assert!(Arc::ptr_eq(&before, view.facets()));
}

#[tokio::test]
async fn view_follows_reloads_triggered_elsewhere() {
    let store = Arc::new(CatalogStore::new(ScriptedSource::new(vec![Some(CATALOG), Some(SMALLER)])));
    let mut view = CatalogView::new(Arc::clone(&store));

    assert!(!view.sync());

    store.load().await.unwrap();
    assert!(view.sync());
    assert_eq!(view.visible().len(), 3);

    let other = Arc::clone(&store);
    let handle = tokio::spawn(async move { other.reload().await.map(|r| r.committed) });
    assert!(view.changed().await);
    assert!(handle.await.unwrap().unwrap());
    assert_eq!(visible_ids(&view), vec!["wiki"]);
}

#[tokio::test]
async fn popular_tags_come_from_the_whole_catalog() {
    let mut view = loaded_view(vec![Some(CATALOG)]).await;
    view.set_search_query("nothing matches");

    let tags = view.popular_tags(1);
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].tag, "ci");
    assert_eq!(tags[0].count, 2);
}

#[tokio::test]
async fn activation_by_id() {
    let view = loaded_view(vec![Some(CATALOG)]).await;

    match view.activate("wiki") {
        Some(Activation::OpenGuide { title, html, .. }) => {
            assert_eq!(title, "Team Wiki");
            assert_eq!(html, "<h1>Wiki</h1><br/>Read <strong>this</strong>.");
        }
        other => panic!("expected guide, got {other:?}"),
    }

    assert_eq!(
        view.activate("reviewer"),
        Some(Activation::OpenUrl {
            url: "https://review.example.com".into()
        })
    );
    assert_eq!(view.activate("missing"), None);
}

#[test]
fn guide_content_wins_over_url() {
    let mut record = ToolRecord::internal("both", "Both", "d", "misc", "Guide");
    record.url = Some("https://both.example".into());

    assert!(matches!(activate(&record), Activation::OpenGuide { .. }));
}

#[test]
fn empty_guide_falls_back_to_url_then_noop() {
    let mut record = ToolRecord::internal("empty", "Empty", "d", "misc", "");
    assert_eq!(activate(&record), Activation::Noop);

    record.url = Some("https://fallback.example".into());
    assert_eq!(
        activate(&record),
        Activation::OpenUrl {
            url: "https://fallback.example".into()
        }
    );

    record.url = Some(String::new());
    assert_eq!(activate(&record), Activation::Noop);
}
