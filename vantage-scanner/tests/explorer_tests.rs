mod common;

use common::{FakeAuditor, FakePage, FakeSession};
use std::sync::Arc;
use std::time::Duration;
use vantage_scanner::explorer::Explorer;
use vantage_scanner::pipeline::AuditPipeline;
use vantage_scanner::result::{PageResult, CRAWL_ERROR_TITLE};

const SEED: &str = "https://site.invalid/";

fn explorer_for(session: &Arc<FakeSession>) -> Explorer {
    let pipeline = AuditPipeline::new(session.clone(), Arc::new(FakeAuditor::clean()));
    Explorer::new(pipeline)
}

fn page_url(path: &str) -> String {
    format!("https://site.invalid/{path}")
}

#[tokio::test]
async fn depth_zero_audits_the_seed_only() {
    let session = Arc::new(FakeSession::new(&[(
        SEED,
        FakePage::new("Home").with_links(&[&page_url("a"), &page_url("b")]),
    )]));

    let results = explorer_for(&session)
        .with_max_depth(0)
        .with_max_links_per_page(10)
        .explore(SEED)
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].url(), SEED);
    assert_eq!(session.visits(), vec![SEED.to_string()]);
}

#[tokio::test]
async fn traversal_is_depth_first_in_dom_order() {
    let a = page_url("a");
    let a_child = page_url("a/child");
    let b = page_url("b");
    let session = Arc::new(FakeSession::new(&[
        (SEED, FakePage::new("Home").with_links(&[&a, &b])),
        (&a, FakePage::new("A").with_links(&[&a_child])),
        (&a_child, FakePage::new("A child")),
        (&b, FakePage::new("B")),
    ]));

    let results = explorer_for(&session)
        .with_max_depth(2)
        .with_max_links_per_page(5)
        .explore(SEED)
        .await;

    let visited: Vec<&str> = results.iter().map(|r| r.url()).collect();
    assert_eq!(visited, vec![SEED, a.as_str(), a_child.as_str(), b.as_str()]);
}

#[tokio::test]
async fn link_cycles_do_not_revisit_pages() {
    let a = page_url("a");
    let b = page_url("b");
    let session = Arc::new(FakeSession::new(&[
        (&a, FakePage::new("A").with_links(&[&b])),
        (&b, FakePage::new("B").with_links(&[&a])),
    ]));

    let results = explorer_for(&session)
        .with_max_depth(5)
        .with_max_links_per_page(5)
        .explore(&a)
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(session.visits().len(), 2);
}

#[tokio::test]
async fn downloads_are_filtered_before_the_link_cap_applies() {
    let doc = page_url("paper.pdf");
    let a = page_url("a");
    let b = page_url("b");
    // The pdf comes first in the DOM; with a cap of 2 both real pages
    // must still be followed.
    let session = Arc::new(FakeSession::new(&[
        (SEED, FakePage::new("Home").with_links(&[&doc, &a, &b])),
        (&a, FakePage::new("A")),
        (&b, FakePage::new("B")),
    ]));

    let results = explorer_for(&session)
        .with_max_depth(1)
        .with_max_links_per_page(2)
        .explore(SEED)
        .await;

    let visited: Vec<&str> = results.iter().map(|r| r.url()).collect();
    assert_eq!(visited, vec![SEED, a.as_str(), b.as_str()]);
}

#[tokio::test]
async fn ten_links_with_two_downloads_and_cap_three_yield_four_pages() {
    let mut links: Vec<String> = (0..8).map(|i| page_url(&format!("page{i}"))).collect();
    links.insert(2, page_url("one.pdf"));
    links.insert(5, page_url("two.zip"));
    let link_refs: Vec<&str> = links.iter().map(String::as_str).collect();

    let mut pages = vec![(SEED.to_string(), FakePage::new("Home").with_links(&link_refs))];
    for i in 0..8 {
        pages.push((page_url(&format!("page{i}")), FakePage::new("Page")));
    }
    let page_refs: Vec<(&str, FakePage)> = pages
        .iter()
        .map(|(url, page)| (url.as_str(), page.clone()))
        .collect();
    let session = Arc::new(FakeSession::new(&page_refs));

    let results = explorer_for(&session)
        .with_max_depth(1)
        .with_max_links_per_page(3)
        .explore(SEED)
        .await;

    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| !r.is_failed()));
}

#[tokio::test]
async fn navigation_failure_degrades_one_page_and_spares_siblings() {
    let broken = page_url("broken");
    let fine = page_url("fine");
    let session = Arc::new(FakeSession::new(&[
        (SEED, FakePage::new("Home").with_links(&[&broken, &fine])),
        (&broken, FakePage::new("Broken").unreachable()),
        (&fine, FakePage::new("Fine").with_links(&[&page_url("never")])),
    ]));

    let results = explorer_for(&session)
        .with_max_depth(1)
        .with_max_links_per_page(5)
        .explore(SEED)
        .await;

    assert_eq!(results.len(), 3);
    let failed = &results[1];
    assert!(failed.is_failed());
    assert_eq!(failed.url(), broken);
    assert_eq!(failed.title(), CRAWL_ERROR_TITLE);
    assert_eq!(failed.http_status(), 0);
    assert!(!results[2].is_failed());
    // Children of "fine" and anything queued off the failed visit sit
    // beyond max_depth.
    assert_eq!(session.visits().len(), 3);
}

#[tokio::test]
async fn link_discovery_still_runs_after_a_failed_visit() {
    let broken = page_url("broken");
    let extra = page_url("extra");
    // With a link cap of 1 only "broken" is queued off the seed. The
    // failed visit leaves the session on the seed document, so "extra"
    // is discovered from there.
    let session = Arc::new(FakeSession::new(&[
        (SEED, FakePage::new("Home").with_links(&[&broken, &extra])),
        (&broken, FakePage::new("Broken").unreachable()),
        (&extra, FakePage::new("Extra")),
    ]));

    let results = explorer_for(&session)
        .with_max_depth(2)
        .with_max_links_per_page(1)
        .explore(SEED)
        .await;

    let visited: Vec<&str> = results.iter().map(|r| r.url()).collect();
    assert_eq!(visited, vec![SEED, broken.as_str(), extra.as_str()]);
    assert!(results[1].is_failed());
    assert!(!results[2].is_failed());
}

#[tokio::test]
async fn deadline_expiry_degrades_the_page_and_the_crawl_continues() {
    let slow = page_url("slow");
    let fine = page_url("fine");
    let session = Arc::new(FakeSession::new(&[
        (SEED, FakePage::new("Home").with_links(&[&slow, &fine])),
        (
            &slow,
            FakePage::new("Slow").with_navigation_delay(Duration::from_secs(30)),
        ),
        (&fine, FakePage::new("Fine")),
    ]));

    let pipeline = AuditPipeline::new(session.clone(), Arc::new(FakeAuditor::clean()))
        .with_deadline(Duration::from_millis(100));
    let results = Explorer::new(pipeline)
        .with_max_depth(1)
        .with_max_links_per_page(5)
        .explore(SEED)
        .await;

    assert_eq!(results.len(), 3);
    match &results[1] {
        PageResult::Failed(failure) => {
            assert_eq!(failure.url, slow);
            assert!(failure.reason.contains("deadline"));
        }
        PageResult::Audited(_) => panic!("the slow page must degrade"),
    }
    assert!(!results[2].is_failed());
}

#[tokio::test]
async fn failing_probe_leaves_its_section_empty_and_the_rest_intact() {
    let session = Arc::new(FakeSession::new(&[(
        SEED,
        FakePage::new("Home").with_failing_timing(),
    )]));

    let results = explorer_for(&session).explore(SEED).await;

    assert_eq!(results.len(), 1);
    match &results[0] {
        PageResult::Audited(audit) => {
            assert!(audit.performance.is_none());
            assert!(audit.security.is_some());
            assert!(audit.network.is_some());
            assert!(audit.seo.is_some());
            assert!(audit.accessibility.is_some());
        }
        PageResult::Failed(failure) => panic!("visit should not fail: {}", failure.reason),
    }
}

#[tokio::test]
async fn bare_pages_still_produce_an_interaction_log() {
    let session = Arc::new(FakeSession::new(&[(SEED, FakePage::new("Empty"))]));

    let results = explorer_for(&session).explore(SEED).await;

    match &results[0] {
        PageResult::Audited(audit) => {
            assert_eq!(audit.forms_detected, 0);
            // Overlay, form count, action button and two scroll steps
            // each leave a record even when there is nothing to do.
            assert!(audit.actions.len() >= 5);
        }
        PageResult::Failed(failure) => panic!("visit should not fail: {}", failure.reason),
    }
}
