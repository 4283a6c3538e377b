//! Golden tests for the co-author crawler.
//!
//! These tests pin down depth assignment, dedup and weights on small,
//! hand-checked provider datasets.

use std::sync::Arc;
use coauthor_graph::{
    AuthorId, AuthorQuery, CachedProvider, DatasetProvider, InMemoryProfileProvider,
    TraversalEngine, TraversalPolicy, WeightReconciliation,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn id(s: &str) -> AuthorId {
    AuthorId::new(s)
}

/// A→[(B,5),(C,2)], B→[(A,5),(D,1)], C→[(A,2)], D→[(B,1),(E,4)]
fn build_scenario_provider() -> InMemoryProfileProvider {
    let mut p = InMemoryProfileProvider::new();
    p.add_author("A", "Alice", &[("B", "Bob", 5), ("C", "Carol", 2)]);
    p.add_author("B", "Bob", &[("A", "Alice", 5), ("D", "Dan", 1)]);
    p.add_author("C", "Carol", &[("A", "Alice", 2)]);
    p.add_author("D", "Dan", &[("B", "Bob", 1), ("E", "Erin", 4)]);
    p.add_author("E", "Erin", &[("D", "Dan", 4)]);
    p
}

fn engine(policy: TraversalPolicy) -> TraversalEngine<InMemoryProfileProvider> {
    TraversalEngine::new(Arc::new(build_scenario_provider()), policy)
}

fn node_depths(export: &coauthor_graph::GraphExport) -> Vec<(String, u32)> {
    export
        .nodes
        .iter()
        .map(|n| (n.id.as_str().to_string(), n.depth))
        .collect()
}

fn edge_weights(export: &coauthor_graph::GraphExport) -> Vec<(String, String, u32)> {
    export
        .edges
        .iter()
        .map(|e| (e.source.as_str().to_string(), e.target.as_str().to_string(), e.weight))
        .collect()
}

fn owned(v: &[(&str, u32)]) -> Vec<(String, u32)> {
    v.iter().map(|(s, d)| (s.to_string(), *d)).collect()
}

fn owned_edges(v: &[(&str, &str, u32)]) -> Vec<(String, String, u32)> {
    v.iter().map(|(a, b, w)| (a.to_string(), b.to_string(), *w)).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// SCENARIO TESTS
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_depth_two_scenario() {
    let graph = engine(TraversalPolicy::new(2, None)).build("Alice").await.unwrap();
    let export = graph.export();

    assert_eq!(
        node_depths(&export),
        owned(&[("A", 0), ("B", 1), ("C", 1), ("D", 2)])
    );
    assert_eq!(
        edge_weights(&export),
        owned_edges(&[("A", "B", 5), ("A", "C", 2), ("B", "D", 1)])
    );

    // D sits at the depth limit: it is a leaf and E is never created.
    assert!(!graph.contains_author(&id("E")));
    assert_eq!(graph.node_degree(&id("D")), Some(1));
}

#[tokio::test]
async fn test_depth_one_scenario() {
    let engine = engine(TraversalPolicy::new(1, None));
    let graph = engine.build("Alice").await.unwrap();

    assert_eq!(
        node_depths(&graph.export()),
        owned(&[("A", 0), ("B", 1), ("C", 1)])
    );
    assert!(!graph.contains_author(&id("D")));
    // B and C are leaves: only the seed is ever looked up.
    assert_eq!(engine.provider().calls(), vec![AuthorQuery::Name("Alice".into())]);
}

#[tokio::test]
async fn test_fan_out_cap_scenario() {
    let policy = TraversalPolicy::new(1, None).with_max_authors_per_node(1);
    let graph = engine(policy).build("Alice").await.unwrap();

    assert!(graph.contains_author(&id("B")));
    assert!(!graph.contains_author(&id("C")));
    assert_eq!(graph.collaboration(&id("A"), &id("B")).unwrap().weight, 5);
    assert_eq!(graph.num_collaborations(), 1);
}

#[tokio::test]
async fn test_fan_out_capped_author_reached_via_other_path() {
    // A lists C second, so cap 1 drops it from A's expansion; B lists C
    // first, so C still appears at depth 2.
    let mut p = InMemoryProfileProvider::new();
    p.add_author("A", "Alice", &[("B", "Bob", 5), ("C", "Carol", 2)]);
    p.add_author("B", "Bob", &[("C", "Carol", 3), ("A", "Alice", 5)]);
    p.add_author("C", "Carol", &[]);
    let engine = TraversalEngine::new(
        Arc::new(p),
        TraversalPolicy::new(2, None).with_max_authors_per_node(1),
    );

    let graph = engine.build("Alice").await.unwrap();
    assert_eq!(graph.author(&id("C")).unwrap().depth, 2);
    assert!(graph.collaboration(&id("A"), &id("C")).is_none());
    assert_eq!(graph.collaboration(&id("B"), &id("C")).unwrap().weight, 3);
}

#[tokio::test]
async fn test_cyclic_source_terminates() {
    let mut p = InMemoryProfileProvider::new();
    p.add_author("A", "Alice", &[("B", "Bob", 1), ("X", "Xavier", 1)]);
    p.add_author("B", "Bob", &[("A", "Alice", 1), ("Y", "Yara", 1)]);
    p.add_author("X", "Xavier", &[("A", "Alice", 1)]);
    p.add_author("Y", "Yara", &[("B", "Bob", 1)]);
    let engine = TraversalEngine::new(Arc::new(p), TraversalPolicy::new(50, None));

    let report = engine.crawl("Alice").await.unwrap();
    let mut ids: Vec<_> = report.graph.authors().map(|a| a.id.as_str().to_string()).collect();
    ids.sort();
    assert_eq!(ids, vec!["A", "B", "X", "Y"]);
    assert_eq!(report.stats.expansions, 4);
    assert_eq!(report.graph.num_collaborations(), 3);

    // Each author fetched at most once despite the cycle.
    for author in ["B", "X", "Y"] {
        assert_eq!(engine.provider().fetch_count(&id(author)), 1);
    }
}

#[tokio::test]
async fn test_shared_collaborator_not_recreated() {
    // D is a co-author of both B and C; it keeps its first depth and
    // accumulates both edges.
    let mut p = InMemoryProfileProvider::new();
    p.add_author("A", "Alice", &[("B", "Bob", 1), ("C", "Carol", 1)]);
    p.add_author("B", "Bob", &[("D", "Dan", 2)]);
    p.add_author("C", "Carol", &[("D", "Dan (alias)", 3)]);
    p.add_author("D", "Dan", &[]);
    let engine = TraversalEngine::new(Arc::new(p), TraversalPolicy::new(3, None));

    let graph = engine.build("Alice").await.unwrap();
    let dan = graph.author(&id("D")).unwrap();
    assert_eq!(dan.depth, 2);
    assert_eq!(dan.name, "Dan");
    assert_eq!(graph.node_degree(&id("D")), Some(2));
    assert_eq!(engine.provider().fetch_count(&id("D")), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// DETERMINISM TESTS
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_same_seed_same_fingerprint_100_runs() {
    let engine = engine(TraversalPolicy::new(3, None));

    let mut fingerprints: Vec<String> = Vec::with_capacity(100);
    for _ in 0..100 {
        let graph = engine.build("Alice").await.unwrap();
        fingerprints.push(graph.export().fingerprint.as_str().to_string());
    }

    for (i, fp) in fingerprints.iter().enumerate().skip(1) {
        assert_eq!(
            &fingerprints[0], fp,
            "Fingerprint must be deterministic (run {} differs from run 0)",
            i
        );
    }
}

#[tokio::test]
async fn test_seed_by_name_and_by_pid_agree() {
    let engine = engine(TraversalPolicy::new(2, None));
    let by_name = engine.build("alice").await.unwrap().export();
    let by_pid = engine.build("pid:A").await.unwrap().export();
    let by_url = engine.build("https://dblp.org/pid/A.html").await.unwrap().export();

    assert_eq!(by_name.fingerprint, by_pid.fingerprint);
    assert_eq!(by_name.fingerprint, by_url.fingerprint);
}

#[tokio::test]
async fn test_reconciliation_changes_fingerprint_only_on_conflict() {
    let mut p = InMemoryProfileProvider::new();
    p.add_author("A", "Alice", &[("B", "Bob", 2)]);
    p.add_author("B", "Bob", &[("A", "Alice", 6)]);
    let p = Arc::new(p);

    let max = TraversalEngine::new(Arc::clone(&p), TraversalPolicy::new(2, None));
    let first = TraversalEngine::new(
        Arc::clone(&p),
        TraversalPolicy::new(2, None).with_reconciliation(WeightReconciliation::FirstWrite),
    );

    let max_export = max.build("Alice").await.unwrap().export();
    let first_export = first.build("Alice").await.unwrap().export();
    assert_eq!(max_export.edges[0].weight, 6);
    assert_eq!(first_export.edges[0].weight, 2);
    assert_ne!(max_export.fingerprint, first_export.fingerprint);

    // Without conflicts both rules agree.
    let a = engine(TraversalPolicy::new(3, None)).build("Alice").await.unwrap().export();
    let b = engine(TraversalPolicy::new(3, None).with_reconciliation(WeightReconciliation::FirstWrite))
        .build("Alice")
        .await
        .unwrap()
        .export();
    assert_eq!(a.fingerprint, b.fingerprint);
}

// ─────────────────────────────────────────────────────────────────────────────
// PROVIDER STACK TESTS
// ─────────────────────────────────────────────────────────────────────────────

const DATASET: &str = r#"{
    "authors": [
        {"id": "232/1606", "name": "Ada Lovelace", "collaborators": [
            {"id": "b/CBabbage", "name": "Charles Babbage", "joint_count": 4},
            {"id": "m/LMenabrea", "name": "Luigi Menabrea", "joint_count": 1},
            {"name": "Anonymous", "joint_count": 2}
        ]},
        {"id": "b/CBabbage", "name": "Charles Babbage", "collaborators": [
            {"id": "232/1606", "name": "Ada Lovelace", "joint_count": 4},
            {"id": "h/JHerschel", "name": "John Herschel", "joint_count": 3}
        ]},
        {"id": "h/JHerschel", "name": "John Herschel", "collaborators": []}
    ]
}"#;

#[tokio::test]
async fn test_dataset_crawl_with_partial_failures() {
    let provider = Arc::new(DatasetProvider::from_json_str(DATASET).unwrap());
    let engine = TraversalEngine::new(provider, TraversalPolicy::new(2, None));

    let report = engine.crawl("https://dblp.org/pid/232/1606.html").await.unwrap();
    assert_eq!(report.seed, id("232/1606"));
    assert_eq!(report.stats.rejected_entries, 1);

    // Menabrea has no profile in the dataset: recorded, not fatal.
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].author, id("m/LMenabrea"));

    let export = report.graph.export();
    assert_eq!(export.nodes.len(), 4);
    assert_eq!(export.node(&id("h/JHerschel")).unwrap().depth, 2);
    assert_eq!(export.node(&id("232/1606")).unwrap().degree, 2);
    assert!(export.node(&id("232/1606")).unwrap().is_seed);
    assert_eq!(export.node(&id("232/1606")).unwrap().label, "AL");
    assert_eq!(export.node(&id("b/CBabbage")).unwrap().label, "CB");
}

#[tokio::test]
async fn test_cached_provider_shared_across_runs() {
    let inner = Arc::new(build_scenario_provider());
    let cached = Arc::new(CachedProvider::new(Arc::clone(&inner)));
    let engine = TraversalEngine::new(Arc::clone(&cached), TraversalPolicy::new(3, None));

    let first = engine.build("Alice").await.unwrap().export();
    let calls_after_first = inner.calls().len();
    let second = engine.build("Alice").await.unwrap().export();

    assert_eq!(first, second);
    assert_eq!(inner.calls().len(), calls_after_first);
    let stats = cached.cache_stats().unwrap();
    assert!(stats.hits > 0);
}
