mod helpers;

use helpers::*;
use oi_tracker::config::{AppConfig, HeaderMismatchPolicy};
use oi_tracker::models::{Category, TableSchema};
use oi_tracker::services::{CsvObservationSource, HeaderStatus};
use oi_tracker::store::{CsvTableStore, MemoryTableStore, TableStore};
use oi_tracker::{build_tracker, init_tables, AppError};
use std::sync::Arc;

fn config_for(symbols: &[&str]) -> AppConfig {
    AppConfig {
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        ..AppConfig::default()
    }
}

/// Observations file → classification → CSV tables → read back
#[tokio::test]
async fn test_eod_summary_flow() {
    let input = observations_csv(&[
        "BANKNIFTY,2024-06-26 09:15:00,2024-06-27,1000000,100",
        "SBIN,2024-06-26 09:15:00,2024-06-27,5000,850",
        "BANKNIFTY,2024-06-26 15:30:00,2024-06-27,1200000,105",
        "SBIN,2024-06-26 15:30:00,2024-06-27,4000,842.5",
        "TCS,2024-06-26 15:30:00,2024-06-27,10,3900",
    ]);
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(CsvTableStore::new(dir.path()).unwrap());
    let tracker = build_tracker(
        &config_for(&["BANKNIFTY", "SBIN"]),
        Arc::new(CsvObservationSource::new(input.path())),
        store.clone(),
    );

    let appended = tracker.record_eod_summary().await.unwrap();

    assert_eq!(appended, 2);
    let rows = store.read_rows("EOD_Summary").await.unwrap();
    assert_eq!(rows[0], TableSchema::eod_summary().header());
    assert_eq!(
        rows[1],
        row(&[
            "2024-06-26",
            "BANKNIFTY",
            "1000000",
            "1200000",
            "20.00",
            "100",
            "105",
            "5.00",
            "Long Buildup",
            ""
        ])
    );
    assert_eq!(rows[2][1], "SBIN");
    assert_eq!(rows[2][8], Category::LongUnwinding.as_str());
    assert_eq!(rows[2][6], "842.5");
}

#[tokio::test]
async fn test_second_run_appends_below_first() {
    let input = observations_csv(&[
        "SBIN,2024-06-26,,5000,850",
        "SBIN,2024-06-27,,5500,860",
    ]);
    let store = MemoryTableStore::new();
    let tracker = build_tracker(
        &config_for(&["SBIN"]),
        Arc::new(CsvObservationSource::new(input.path())),
        Arc::new(store.clone()),
    );

    tracker.record_oi_log().await.unwrap();
    tracker.record_oi_log().await.unwrap();

    let rows = store.read_rows("OI_DailyLog").await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1], row(&["2024-06-27 00:00:00", "SBIN", "860", "5500", "10.00"]));
    assert_eq!(rows[1], rows[2]);
}

#[tokio::test]
async fn test_rollover_and_delivery_flow() {
    let input = observations_csv(&[
        "SBIN,2024-06-27 15:30:00,2024-06-27,1000,850",
        "SBIN,2024-06-27 15:30:00,2024-07-25,600,855",
        "SBIN,2024-06-28 15:30:00,2024-07-25,900,860",
    ]);
    let store = MemoryTableStore::new();
    let tracker = build_tracker(
        &config_for(&["SBIN"]),
        Arc::new(CsvObservationSource::new(input.path())),
        Arc::new(store.clone()),
    );

    // on 2024-06-28 only one contract trades, so rollover has nothing to write
    let err = tracker.record_rollover().await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let appended = tracker
        .record_expiry_delivery(date(2024, 6, 27))
        .await
        .unwrap();
    assert_eq!(appended, 1);

    let rows = store.read_rows("Rollover_Analysis").await.unwrap();
    assert_eq!(
        rows[1],
        row(&["2024-06-28", "SBIN", "2024-06-27", "1000", "900", "100", "90.00", "10.00"])
    );
}

#[tokio::test]
async fn test_init_tables_reports_status() {
    let store = MemoryTableStore::new();
    store
        .insert_table("EOD_Summary", vec![row(&["Date", "Symbol", "LTP", "Change %", "Volume"])])
        .await;
    store
        .insert_table("OI_DailyLog", vec![TableSchema::oi_log().header()])
        .await;

    let statuses = init_tables(&AppConfig::default(), Arc::new(store.clone()))
        .await
        .unwrap();

    assert_eq!(
        statuses,
        vec![
            ("OI_DailyLog".to_string(), HeaderStatus::Matched),
            ("EOD_Summary".to_string(), HeaderStatus::Reset),
            ("Rollover".to_string(), HeaderStatus::Written),
            ("Rollover_Analysis".to_string(), HeaderStatus::Written),
        ]
    );
}

#[tokio::test]
async fn test_init_tables_honours_reject_policy() {
    let store = MemoryTableStore::new();
    store
        .insert_table("Rollover", vec![row(&["Date", "Symbol"]), row(&["2024-06-27", "SBIN"])])
        .await;
    let mut config = AppConfig::default();
    config.store.mismatch_policy = HeaderMismatchPolicy::Reject;

    let err = init_tables(&config, Arc::new(store.clone())).await.unwrap_err();

    assert!(matches!(err, AppError::SchemaMismatch { .. }));
    assert_eq!(store.row_count("Rollover").await, 2);
}

#[tokio::test]
async fn test_unknown_symbols_is_no_data() {
    let input = observations_csv(&["TCS,2024-06-26,,10,3900"]);
    let store = MemoryTableStore::new();
    let tracker = build_tracker(
        &config_for(&["SBIN"]),
        Arc::new(CsvObservationSource::new(input.path())),
        Arc::new(store.clone()),
    );

    let err = tracker.record_eod_summary().await.unwrap_err();

    assert!(err.is_no_data());
    assert_eq!(store.row_count("EOD_Summary").await, 0);
}
