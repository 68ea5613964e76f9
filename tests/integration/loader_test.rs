use std::sync::Arc;

use popdash::view::{city_rows, search_cities};
use popdash::{
    ExportFormat, MemoryTransport, NameNormalizer, PopulationClientConfig, PopulationError,
    PopulationLoader, Selection, ViewSession, export_selection,
};
use serde_json::json;

use crate::utils::{
    city, endpoints, fallback_answer, fallback_calls, flag, primary_transport, total_fallback_calls,
};

fn config() -> PopulationClientConfig {
    PopulationClientConfig {
        endpoints: endpoints(),
        ..PopulationClientConfig::default()
    }
}

fn loader(
    transport: &Arc<MemoryTransport>,
    config: &PopulationClientConfig,
) -> PopulationLoader<Arc<MemoryTransport>> {
    PopulationLoader::new(
        Arc::clone(transport),
        config,
        Arc::new(NameNormalizer::default()),
    )
}

fn dashboard_transport() -> MemoryTransport {
    primary_transport(
        json!([
            city("Russian Federation", "Moscow", 12_000_000),
            city("Russian Federation", "Saint Petersburg", 5_300_000),
            city("Kosovo", "Pristina", 200_000),
            city("Wakanda", "Birnin Zana", 500_000),
        ]),
        json!([flag("Russia", "http://x/ru.svg"), flag("Norway", "http://x/no.svg")]),
    )
    .with_json(
        &endpoints().country_by_name_url("Kosovo").unwrap(),
        fallback_answer("http://x/xk.png"),
    )
}

#[tokio::test]
async fn test_load_city_dataset_end_to_end() {
    let transport = Arc::new(dashboard_transport());
    let dataset = loader(&transport, &config()).load_city_dataset().await;

    assert!(!dataset.is_degraded());
    assert_eq!(dataset.records.len(), 4);
    assert_eq!(dataset.missing, vec!["Kosovo", "Wakanda"]);
    assert_eq!(fallback_calls(&transport, "Kosovo"), 1);
    assert_eq!(fallback_calls(&transport, "Wakanda"), 1);

    let rows = city_rows(&dataset, &search_cities(&dataset.records, ""));
    let flags: Vec<&str> = rows.iter().map(|row| row.flag).collect();
    assert_eq!(
        flags,
        ["http://x/ru.svg", "http://x/ru.svg", "http://x/xk.png", ""]
    );
    assert_eq!(rows[0].population, 12_000_000);

    let hits = search_cities(&dataset.records, "birnin");
    let document = export_selection(&[Selection::City(hits[0])], ExportFormat::Csv).unwrap();
    assert_eq!(document.content, "City,Country,Population\nBirnin Zana,Wakanda,500000");
}

#[tokio::test]
async fn test_failed_flag_list_falls_back_per_country() {
    let endpoints = endpoints();
    let transport = Arc::new(
        MemoryTransport::new()
            .with_json(
                &endpoints.city_population_url().unwrap(),
                json!({"error": false, "data": [city("Kosovo", "Pristina", 200_000)]}),
            )
            .with_failure(&endpoints.flag_images_url().unwrap(), "dns failure")
            .with_json(
                &endpoints.country_by_name_url("Kosovo").unwrap(),
                fallback_answer("http://x/xk.png"),
            ),
    );

    let dataset = loader(&transport, &config()).load_city_dataset().await;

    assert!(dataset.is_degraded());
    assert!(dataset.records_error.is_none());
    assert!(dataset.flags_error.is_some());
    assert_eq!(dataset.flag_for(&dataset.records[0]), "http://x/xk.png");
}

#[tokio::test]
async fn test_failed_records_issue_no_fallback_calls() {
    let endpoints = endpoints();
    let transport = Arc::new(
        MemoryTransport::new()
            .with_status(&endpoints.city_population_url().unwrap(), 500)
            .with_json(&endpoints.flag_images_url().unwrap(), json!({"data": []})),
    );

    let dataset = loader(&transport, &config()).load_city_dataset().await;

    assert!(dataset.records.is_empty());
    assert!(matches!(
        dataset.records_error,
        Some(PopulationError::DataUnavailable { .. })
    ));
    assert_eq!(total_fallback_calls(&transport), 0);
}

#[tokio::test]
async fn test_fallback_disabled_by_config() {
    let transport = Arc::new(dashboard_transport());
    let config = config().without_fallback();

    let dataset = loader(&transport, &config).load_city_dataset().await;

    assert_eq!(total_fallback_calls(&transport), 0);
    assert_eq!(dataset.flags.get("kosovo"), Some(""));
    assert_eq!(dataset.flags.get("russia"), Some("http://x/ru.svg"));
}

#[tokio::test]
async fn test_load_country_dataset() {
    let endpoints = endpoints();
    let transport = Arc::new(MemoryTransport::new().with_json(
        &endpoints.all_countries_url().unwrap(),
        json!([{
            "name": {"common": "Chad"},
            "flags": {"svg": "http://x/td.svg"},
            "population": 17179740
        }]),
    ));

    let dataset = loader(&transport, &config()).load_country_dataset().await;

    assert!(!dataset.is_degraded());
    assert_eq!(dataset.countries[0].name, "Chad");
}

#[tokio::test]
async fn test_session_discards_superseded_load() {
    let transport = Arc::new(dashboard_transport());
    let config = config();
    let loader = loader(&transport, &config);
    let session = ViewSession::new();

    let (stale, fresh) = futures::join!(
        session.run(async {
            futures::future::pending::<()>().await;
            loader.load_country_dataset().await
        }),
        session.run(loader.load_city_dataset())
    );

    assert!(matches!(stale, Err(PopulationError::Cancelled)));
    assert_eq!(fresh.unwrap().records.len(), 4);
}
