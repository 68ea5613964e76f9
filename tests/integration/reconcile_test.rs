use std::sync::Arc;

use popdash::{
    FallbackFlagLookup, FlagEntry, FlagReconciler, MemoryTransport, NameNormalizer,
    PopulationCount, PopulationError, PopulationRecord,
};

use crate::utils::{endpoints, fallback_answer, fallback_calls, total_fallback_calls};

fn record(country: &str, city: &str, population: f64) -> PopulationRecord {
    PopulationRecord::new(
        country,
        city,
        vec![PopulationCount {
            year: 2013,
            value: population,
        }],
    )
}

fn reconciler(transport: &MemoryTransport) -> FlagReconciler<&MemoryTransport> {
    FlagReconciler::new(
        Arc::new(NameNormalizer::default()),
        FallbackFlagLookup::new(transport, endpoints()),
    )
}

/// A country matched through normalization needs no fallback call
#[tokio::test]
async fn test_scenario_normalized_match() {
    let transport = MemoryTransport::new();
    let records = vec![record("Russian Federation", "Moscow", 12_000_000.0)];
    let flags = vec![FlagEntry::new("Russia", "http://x/ru.svg")];

    let result = reconciler(&transport).reconcile(records, &flags).await;

    assert_eq!(result.flags.get("russia"), Some("http://x/ru.svg"));
    assert!(result.missing.is_empty());
    assert!(result.fallback.is_empty());
    assert!(transport.requests().is_empty());
}

/// An unknown country triggers one fallback call; a 404 leaves an empty flag
#[tokio::test]
async fn test_scenario_fallback_not_found() {
    let transport = MemoryTransport::new();
    let records = vec![record("Wakanda", "Birnin Zana", 500_000.0)];

    let result = reconciler(&transport).reconcile(records, &[]).await;

    assert_eq!(result.missing, vec!["Wakanda".to_string()]);
    assert_eq!(fallback_calls(&transport, "Wakanda"), 1);
    assert_eq!(result.flags.get("wakanda"), Some(""));
    assert!(matches!(
        result.fallback.outcomes()[0].1,
        Err(PopulationError::FlagNotFound(_))
    ));
    assert_eq!(result.records.len(), 1);
}

/// A primary entry with a blank URL is treated as missing
#[tokio::test]
async fn test_blank_primary_flag_is_resolved_by_fallback() {
    let transport = MemoryTransport::new().with_json(
        &endpoints().country_by_name_url("Kosovo").unwrap(),
        fallback_answer("http://x/xk.png"),
    );
    let records = vec![record("Kosovo", "Pristina", 200_000.0)];
    let flags = vec![FlagEntry::new("Kosovo", "")];

    let result = reconciler(&transport).reconcile(records, &flags).await;

    assert_eq!(result.missing, vec!["Kosovo".to_string()]);
    assert_eq!(fallback_calls(&transport, "Kosovo"), 1);
    assert_eq!(result.flags.get("kosovo"), Some("http://x/xk.png"));
}

#[tokio::test]
async fn test_lookup_is_case_insensitive() {
    let transport = MemoryTransport::new();
    let records = vec![record("United States of America", "New York", 8_000_000.0)];
    let flags = vec![FlagEntry::new("United States", "http://x/us.svg")];

    let result = reconciler(&transport).reconcile(records, &flags).await;
    let normalizer = NameNormalizer::default();

    for name in ["united states", "UNITED STATES", "United States"] {
        assert_eq!(result.flags.get(name), Some("http://x/us.svg"));
    }
    assert_eq!(
        result.flags.flag_for(&normalizer, &result.records[0].country),
        "http://x/us.svg"
    );
}

#[tokio::test]
async fn test_shared_missing_country_is_looked_up_once() {
    let transport = MemoryTransport::new().with_json(
        &endpoints().country_by_name_url("Kosovo").unwrap(),
        fallback_answer("http://x/xk.png"),
    );
    let records = vec![
        record("Kosovo", "Pristina", 200_000.0),
        record("Kosovo", "Prizren", 180_000.0),
        record("kosovo", "Peja", 100_000.0),
        record("Norway", "Oslo", 700_000.0),
    ];
    let flags = vec![FlagEntry::new("Norway", "http://x/no.svg")];

    let result = reconciler(&transport).reconcile(records, &flags).await;

    assert_eq!(fallback_calls(&transport, "Kosovo"), 1);
    assert_eq!(total_fallback_calls(&transport), 1);
    assert_eq!(result.flags.get("kosovo"), Some("http://x/xk.png"));
    assert_eq!(result.flags.get("norway"), Some("http://x/no.svg"));
}

#[tokio::test]
async fn test_fallback_failures_degrade_to_empty() {
    let endpoints = endpoints();
    let transport = MemoryTransport::new()
        .with_status(&endpoints.country_by_name_url("Tokelau").unwrap(), 503)
        .with_failure(&endpoints.country_by_name_url("Niue").unwrap(), "connection reset");
    let records = vec![
        record("Tokelau", "Atafu", 500.0),
        record("Niue", "Alofi", 600.0),
        record("Saint Helena ex. dep.", "Jamestown", 700.0),
        record("Curaçao", "Willemstad", 150_000.0),
    ];

    let result = reconciler(&transport).reconcile(records, &[]).await;

    for name in ["tokelau", "niue", "saint helena", "curaçao"] {
        assert_eq!(result.flags.get(name), Some(""), "{name}");
    }
    let outcomes = result.fallback.outcomes();
    assert!(matches!(outcomes[0].1, Err(PopulationError::FlagLookupFailed { .. })));
    assert!(matches!(outcomes[1].1, Err(PopulationError::FlagLookupFailed { .. })));
    // "Saint Helena" is valid after normalization; the fixture has no route for it
    assert!(matches!(outcomes[2].1, Err(PopulationError::FlagNotFound(_))));
    assert!(matches!(outcomes[3].1, Err(PopulationError::InvalidNameInput(_))));
    assert_eq!(total_fallback_calls(&transport), 3);
}

#[tokio::test]
async fn test_aland_spelling_is_restored_for_lookup() {
    let transport = MemoryTransport::new().with_json(
        &endpoints().country_by_name_url("Åland Islands").unwrap(),
        fallback_answer("http://x/ax.png"),
    );
    let records = vec![record("Åland Islands", "Mariehamn", 11_000.0)];

    let result = reconciler(&transport).reconcile(records, &[]).await;

    assert_eq!(result.missing, vec!["Aland Islands".to_string()]);
    assert_eq!(fallback_calls(&transport, "Åland Islands"), 1);
    assert_eq!(result.flags.get("aland islands"), Some("http://x/ax.png"));
}

#[tokio::test]
async fn test_fallback_calls_are_sequential_in_first_seen_order() {
    let transport = MemoryTransport::new();
    let records = vec![
        record("Wakanda", "Birnin Zana", 1.0),
        record("Genovia", "Pyrus", 1.0),
        record("Wakanda", "Golden City", 1.0),
        record("Latveria", "Doomstadt", 1.0),
    ];

    let result = reconciler(&transport).reconcile(records, &[]).await;

    assert_eq!(result.missing, vec!["Wakanda", "Genovia", "Latveria"]);
    let requested: Vec<String> = transport.requests();
    assert_eq!(
        requested,
        vec![
            "http://fixture.test/api/name/Wakanda".to_string(),
            "http://fixture.test/api/name/Genovia".to_string(),
            "http://fixture.test/api/name/Latveria".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_without_fallback_leaves_missing_flags_empty() {
    let transport = MemoryTransport::new();
    let reconciler: FlagReconciler<&MemoryTransport> =
        FlagReconciler::without_fallback(Arc::new(NameNormalizer::default()));
    let records = vec![record("Wakanda", "Birnin Zana", 500_000.0)];

    let result = reconciler.reconcile(records, &[]).await;

    assert_eq!(result.flags.get("wakanda"), Some(""));
    assert!(result.fallback.is_empty());
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_injected_name_table() {
    let transport = MemoryTransport::new();
    let reconciler = FlagReconciler::new(
        Arc::new(NameNormalizer::from_pairs([("kingdom of ruritania", "Ruritania")])),
        FallbackFlagLookup::new(&transport, endpoints()),
    );
    let records = vec![record("Kingdom of Ruritania", "Strelsau", 90_000.0)];
    let flags = vec![FlagEntry::new("Ruritania", "http://x/rr.svg")];

    let result = reconciler.reconcile(records, &flags).await;

    assert_eq!(result.flags.get("ruritania"), Some("http://x/rr.svg"));
    assert!(transport.requests().is_empty());
}
