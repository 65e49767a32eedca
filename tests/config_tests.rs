//! Tests for the type-safe configuration builder pattern

use std::path::Path;
use std::time::Duration;

use leadscrape::config::{ConfigError, Pacing, ScrapeConfig};
use leadscrape::{ScrapeEvent, ScrapePhase, scrape_with};

mod common;
use common::{FakeSite, collect_events};

#[tokio::test]
async fn test_builder_requires_keyword_and_locations() {
    // This should not compile if uncommented - testing compile-time guarantees
    // let config = ScrapeConfig::builder().build();

    // This should also not compile - missing locations
    // let config = ScrapeConfig::builder().keyword("dentist").build();

    // This SHOULD compile - both required fields provided
    let config = ScrapeConfig::builder()
        .keyword("dentist")
        .location("DHA Lahore")
        .build()
        .unwrap();

    assert_eq!(config.keyword(), "dentist");
    assert_eq!(config.locations(), ["DHA Lahore"]);
}

#[tokio::test]
async fn test_builder_optional_fields_have_defaults() {
    let config = ScrapeConfig::builder()
        .keyword("dentist")
        .location("DHA Lahore")
        .build()
        .unwrap();

    assert_eq!(config.max_results_per_location(), 120);
    assert_eq!(config.max_details_per_location(), 100);
    assert_eq!(config.batch_size(), 5);
    assert!(config.headless());
    assert_eq!(config.feed_wait_timeout(), Duration::from_secs(40));
    assert_eq!(config.detail_wait_timeout(), Duration::from_secs(25));
    assert!(!config.scroll_pacing().is_zero());
    assert!(!config.record_pacing().is_zero());
    assert!(!config.batch_pacing().is_zero());
    assert_eq!(config.chrome_executable(), None);
}

#[tokio::test]
async fn test_builder_with_all_optional_fields() {
    let config = ScrapeConfig::builder()
        .keyword("  cafe ")
        .locations(["Gulberg", "  ", " Model Town "])
        .max_results_per_location(30)
        .max_details_per_location(10)
        .batch_size(2)
        .headless(false)
        .feed_wait_timeout(Duration::from_secs(5))
        .detail_wait_timeout(Duration::from_secs(3))
        .record_pacing(Pacing::fixed(Duration::from_millis(50)))
        .event_buffer(4)
        .chrome_executable("/opt/chromium/chrome")
        .build()
        .unwrap();

    assert_eq!(config.keyword(), "cafe");
    assert_eq!(config.locations(), ["Gulberg", "Model Town"]);
    assert_eq!(config.max_results_per_location(), 30);
    assert_eq!(config.max_details_per_location(), 10);
    assert_eq!(config.batch_size(), 2);
    assert!(!config.headless());
    assert_eq!(config.feed_wait_timeout(), Duration::from_secs(5));
    assert_eq!(config.detail_wait_timeout(), Duration::from_secs(3));
    assert_eq!(
        config.record_pacing(),
        Pacing::fixed(Duration::from_millis(50))
    );
    assert_eq!(config.event_buffer(), 4);
    assert_eq!(
        config.chrome_executable(),
        Some(Path::new("/opt/chromium/chrome"))
    );
}

#[test]
fn test_validation_rejects_bad_values() {
    let blank = ScrapeConfig::builder().keyword("   ").location("X").build();
    assert_eq!(blank.unwrap_err(), ConfigError::EmptyKeyword);

    let no_locations = ScrapeConfig::builder()
        .keyword("dentist")
        .locations(["", "  "])
        .build();
    assert_eq!(no_locations.unwrap_err(), ConfigError::NoLocations);

    let zero_batch = ScrapeConfig::builder()
        .keyword("dentist")
        .location("X")
        .batch_size(0)
        .build();
    assert_eq!(
        zero_batch.unwrap_err(),
        ConfigError::ZeroValue {
            field: "batch_size"
        }
    );

    let inverted = ScrapeConfig::builder()
        .keyword("dentist")
        .location("X")
        .scroll_pacing(Pacing::new(
            Duration::ZERO,
            (Duration::from_secs(2), Duration::from_secs(1)),
        ))
        .build();
    assert!(matches!(
        inverted.unwrap_err(),
        ConfigError::InvertedPacing {
            field: "scroll_pacing",
            ..
        }
    ));
}

#[test]
fn test_config_round_trips_through_json() {
    let config = ScrapeConfig::builder()
        .keyword("dentist")
        .locations(["DHA Lahore", "Clifton Karachi"])
        .batch_size(3)
        .build()
        .unwrap();

    let json = serde_json::to_string(&config).unwrap();
    let back: ScrapeConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(back.keyword(), "dentist");
    assert_eq!(back.locations(), config.locations());
    assert_eq!(back.batch_size(), 3);
    assert_eq!(back.scroll_pacing(), config.scroll_pacing());
}

#[tokio::test]
async fn test_invalid_deserialized_config_reports_run_error() {
    let config = ScrapeConfig::builder()
        .keyword("dentist")
        .location("DHA Lahore")
        .build()
        .unwrap();
    let mut value = serde_json::to_value(&config).unwrap();
    value["keyword"] = serde_json::Value::String(String::new());
    let invalid: ScrapeConfig = serde_json::from_value(value).unwrap();

    let site = FakeSite::new();
    let events = collect_events(scrape_with(site.clone(), invalid)).await;

    assert_eq!(events.len(), 1);
    match &events[0] {
        ScrapeEvent::RunError { phase, .. } => assert_eq!(*phase, ScrapePhase::Configuration),
        other => panic!("expected RunError, got {other:?}"),
    }
    assert_eq!(site.stats().opened, 0);
}
