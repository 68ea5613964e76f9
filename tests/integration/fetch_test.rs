use popdash::{MemoryTransport, PopulationError, PrimaryFetcher, SecondaryFetcher};
use serde_json::json;

use crate::utils::{city, endpoints, flag, primary_transport};

#[tokio::test]
async fn test_fetch_population_records() {
    let transport = primary_transport(
        json!([city("Norway", "Oslo", 700_000), city("Sweden", "Stockholm", 975_000)]),
        json!([]),
    );
    let fetcher = PrimaryFetcher::new(&transport, endpoints());

    let outcome = fetcher.fetch_population_records().await;

    assert!(!outcome.is_degraded());
    let records = outcome.into_data();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].city, "Oslo");
    assert!((records[1].headline_population() - 975_000.0).abs() < f64::EPSILON);
}

/// A network failure resolves to an empty, degraded outcome
#[tokio::test]
async fn test_network_failure_yields_empty_records() {
    let endpoints = endpoints();
    let transport = MemoryTransport::new()
        .with_failure(&endpoints.city_population_url().unwrap(), "connection refused");
    let fetcher = PrimaryFetcher::new(&transport, endpoints);

    let outcome = fetcher.fetch_population_records().await;

    assert!(outcome.data().is_empty());
    assert!(matches!(
        outcome.error(),
        Some(PopulationError::DataUnavailable { .. })
    ));
}

#[tokio::test]
async fn test_empty_dataset_is_not_degraded() {
    let transport = primary_transport(json!([]), json!([]));
    let fetcher = PrimaryFetcher::new(&transport, endpoints());

    let records = fetcher.fetch_population_records().await;
    let flags = fetcher.fetch_flag_entries().await;

    assert!(records.data().is_empty() && !records.is_degraded());
    assert!(flags.data().is_empty() && !flags.is_degraded());
}

#[tokio::test]
async fn test_server_error_and_provider_error_flag() {
    let endpoints = endpoints();
    let transport = MemoryTransport::new()
        .with_status(&endpoints.flag_images_url().unwrap(), 502)
        .with_json(
            &endpoints.city_population_url().unwrap(),
            json!({"error": true, "msg": "rate limited", "data": []}),
        );
    let fetcher = PrimaryFetcher::new(&transport, endpoints);

    let flags = fetcher.fetch_flag_entries().await;
    let records = fetcher.fetch_population_records().await;

    assert!(flags.data().is_empty() && flags.is_degraded());
    let error = records.error().map(ToString::to_string).unwrap_or_default();
    assert!(error.contains("rate limited"), "{error}");
}

#[tokio::test]
async fn test_malformed_entries_are_skipped() {
    let transport = primary_transport(
        json!([]),
        json!([
            flag("Chad", "http://x/td.svg"),
            {"name": "Mali"},
            flag("Niger", "http://x/ne.svg")
        ]),
    );
    let fetcher = PrimaryFetcher::new(&transport, endpoints());

    let outcome = fetcher.fetch_flag_entries().await;

    assert_eq!(outcome.data().len(), 2);
    assert!(matches!(
        outcome.error(),
        Some(PopulationError::MalformedEntries { skipped: 1, .. })
    ));
}

#[tokio::test]
async fn test_fetch_country_aggregates() {
    let endpoints = endpoints();
    let transport = MemoryTransport::new().with_json(
        &endpoints.all_countries_url().unwrap(),
        json!([
            {
                "name": {"common": "Iceland", "official": "Iceland"},
                "flags": {"png": "http://x/is.png", "svg": "http://x/is.svg"},
                "population": 366425
            },
            {
                "name": {"common": "Antarctica"},
                "flags": {"svg": "http://x/aq.svg"},
                "population": 1000
            }
        ]),
    );
    let fetcher = SecondaryFetcher::new(&transport, endpoints);

    let countries = fetcher.fetch_country_aggregates().await.into_data();

    assert_eq!(countries.len(), 2);
    assert_eq!(countries[0].name, "Iceland");
    assert_eq!(countries[0].flag, "http://x/is.svg");
    assert_eq!(countries[1].population, 1000);
}

#[tokio::test]
async fn test_country_fetch_failure_yields_empty() {
    let transport = MemoryTransport::new();
    let fetcher = SecondaryFetcher::new(&transport, endpoints());

    let outcome = fetcher.fetch_country_aggregates().await;

    assert!(outcome.data().is_empty());
    assert!(outcome.is_degraded());
}
