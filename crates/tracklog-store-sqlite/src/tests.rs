//! Integration tests for `SqliteStore` against an in-memory database.

use tracklog_core::{
  aircraft::{AircraftMetadata, AircraftStats, PositionRecord, TypeCount},
  dataset::{Dataset, Observation},
  store::{Page, RecordStore},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn page(page: u64, size: u64) -> Page { Page::new(page, size).unwrap() }

fn metadata(icao: &str, registration: Option<&str>, aircraft_type: Option<&str>) -> AircraftMetadata {
  AircraftMetadata {
    icao:          icao.into(),
    registration:  registration.map(Into::into),
    aircraft_type: aircraft_type.map(Into::into),
  }
}

fn position(icao: &str, timestamp: Option<f64>) -> PositionRecord {
  PositionRecord {
    icao: icao.into(),
    timestamp,
    lat: 41.29,
    lon: 2.07,
    alt_baro: None,
    gs: None,
    emergency: None,
  }
}

fn observe(metadata: AircraftMetadata, position: Option<PositionRecord>) -> Observation {
  Observation { metadata, position }
}

/// Three aircraft; `06a0af` has three positions delivered out of time order.
fn sample() -> Dataset {
  Dataset::reduce([
    observe(
      metadata("06a0af", Some("EC-MTI"), Some("A320")),
      Some(PositionRecord {
        alt_baro: Some(3200.0),
        gs: Some(180.5),
        ..position("06a0af", Some(300.0))
      }),
    ),
    observe(
      metadata("06a0af", Some("EC-MTI"), Some("A320")),
      Some(PositionRecord {
        alt_baro: None,
        emergency: Some("on".into()),
        ..position("06a0af", Some(100.0))
      }),
    ),
    observe(
      metadata("06a0af", Some("EC-MTI"), Some("A320")),
      Some(PositionRecord {
        alt_baro: Some(1500.0),
        gs: Some(210.0),
        ..position("06a0af", Some(200.0))
      }),
    ),
    observe(metadata("aabbcc", Some("N12345"), Some("B737")), Some(position("aabbcc", Some(150.0)))),
    observe(metadata("0000ff", None, None), None),
  ])
}

// ─── Empty store ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_store_reads_are_empty() {
  let s = store().await;

  assert!(s.list_metadata(page(0, 100)).await.unwrap().is_empty());
  assert!(s.list_positions("06a0af", page(0, 100)).await.unwrap().is_empty());
  assert_eq!(s.aggregate_stats("06a0af").await.unwrap(), AircraftStats::default());
  assert_eq!(s.latest_position("06a0af").await.unwrap(), None);
  assert!(s.type_counts().await.unwrap().is_empty());
  assert_eq!(s.current_generation().await.unwrap(), None);
}

#[tokio::test]
async fn replace_with_empty_dataset_is_queryable() {
  let s = store().await;
  s.replace_all(Dataset::new()).await.unwrap();

  assert!(s.list_metadata(page(0, 100)).await.unwrap().is_empty());
  assert_eq!(s.aggregate_stats("06a0af").await.unwrap(), AircraftStats::default());

  let generation = s.current_generation().await.unwrap().unwrap();
  assert_eq!(generation.aircraft_count, 0);
  assert_eq!(generation.position_count, 0);
}

// ─── Metadata ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn metadata_is_ordered_by_icao() {
  let s = store().await;
  s.replace_all(sample()).await.unwrap();

  let all = s.list_metadata(page(0, 100)).await.unwrap();
  let keys: Vec<_> = all.iter().map(|a| a.icao.as_str()).collect();
  assert_eq!(keys, ["0000ff", "06a0af", "aabbcc"]);
  assert_eq!(all[0], metadata("0000ff", None, None));
  assert_eq!(all[2], metadata("aabbcc", Some("N12345"), Some("B737")));
}

#[tokio::test]
async fn metadata_pagination() {
  let s = store().await;
  s.replace_all(sample()).await.unwrap();

  let second = s.list_metadata(page(1, 2)).await.unwrap();
  assert_eq!(second.len(), 1);
  assert_eq!(second[0].icao, "aabbcc");

  assert!(s.list_metadata(page(5, 2)).await.unwrap().is_empty());
  assert!(s.list_metadata(page(0, 0)).await.unwrap().is_empty());
}

#[tokio::test]
async fn metadata_last_write_wins() {
  let s = store().await;
  s.replace_all(Dataset::reduce([
    observe(metadata("abc123", Some("N1"), Some("C172")), None),
    observe(metadata("abc123", Some("N2"), None), None),
  ]))
  .await
  .unwrap();

  let all = s.list_metadata(page(0, 10)).await.unwrap();
  assert_eq!(all, [metadata("abc123", Some("N2"), None)]);
}

// ─── Positions ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn positions_are_ordered_by_timestamp() {
  let s = store().await;
  s.replace_all(sample()).await.unwrap();

  let track = s.list_positions("06a0af", page(0, 100)).await.unwrap();
  let times: Vec<_> = track.iter().map(|p| p.timestamp).collect();
  assert_eq!(times, [Some(100.0), Some(200.0), Some(300.0)]);
  assert_eq!(track[0].emergency.as_deref(), Some("on"));
}

#[tokio::test]
async fn positions_page_one_is_the_second_item() {
  let s = store().await;
  s.replace_all(sample()).await.unwrap();

  let second = s.list_positions("06a0af", page(1, 1)).await.unwrap();
  assert_eq!(second.len(), 1);
  assert_eq!(second[0].timestamp, Some(200.0));
}

#[tokio::test]
async fn equal_timestamps_keep_arrival_order() {
  let s = store().await;
  s.replace_all(Dataset::reduce((0..5).map(|i| {
    observe(
      metadata("abc123", None, None),
      Some(PositionRecord { lat: f64::from(i), ..position("abc123", Some(42.0)) }),
    )
  })))
  .await
  .unwrap();

  let track = s.list_positions("abc123", page(0, 10)).await.unwrap();
  let lats: Vec<_> = track.iter().map(|p| p.lat).collect();
  assert_eq!(lats, [0.0, 1.0, 2.0, 3.0, 4.0]);
}

#[tokio::test]
async fn duplicate_positions_are_all_stored() {
  let s = store().await;
  let dup = position("abc123", Some(10.0));
  s.replace_all(Dataset::reduce([
    observe(metadata("abc123", None, None), Some(dup.clone())),
    observe(metadata("abc123", None, None), Some(dup.clone())),
  ]))
  .await
  .unwrap();

  let track = s.list_positions("abc123", page(0, 10)).await.unwrap();
  assert_eq!(track, [dup.clone(), dup]);
}

#[tokio::test]
async fn unknown_aircraft_has_no_positions() {
  let s = store().await;
  s.replace_all(sample()).await.unwrap();
  assert!(s.list_positions("ffffff", page(0, 10)).await.unwrap().is_empty());
}

#[tokio::test]
async fn position_without_metadata_is_stored() {
  let s = store().await;
  let mut dataset = Dataset::new();
  dataset.push(observe(metadata("abc123", None, None), Some(position("abc123", None))));
  s.replace_all(dataset).await.unwrap();

  let track = s.list_positions("abc123", page(0, 10)).await.unwrap();
  assert_eq!(track.len(), 1);
  assert_eq!(track[0].timestamp, None);
}

// ─── Stats ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn stats_skip_nulls_and_detect_emergency() {
  let s = store().await;
  s.replace_all(Dataset::reduce([
    observe(
      metadata("abc123", None, None),
      Some(PositionRecord { alt_baro: Some(3200.0), ..position("abc123", Some(1.0)) }),
    ),
    observe(
      metadata("abc123", None, None),
      Some(PositionRecord { emergency: Some("on".into()), ..position("abc123", Some(2.0)) }),
    ),
  ]))
  .await
  .unwrap();

  let stats = s.aggregate_stats("abc123").await.unwrap();
  assert_eq!(stats, AircraftStats {
    max_altitude_baro: Some(3200.0),
    max_ground_speed:  None,
    had_emergency:     true,
  });
}

#[tokio::test]
async fn stats_over_sample_track() {
  let s = store().await;
  s.replace_all(sample()).await.unwrap();

  let stats = s.aggregate_stats("06a0af").await.unwrap();
  assert_eq!(stats.max_altitude_baro, Some(3200.0));
  assert_eq!(stats.max_ground_speed, Some(210.0));
  assert!(stats.had_emergency);

  let quiet = s.aggregate_stats("aabbcc").await.unwrap();
  assert!(!quiet.had_emergency);
  assert_eq!(s.aggregate_stats("ffffff").await.unwrap(), AircraftStats::default());
}

// ─── Latest position ─────────────────────────────────────────────────────────

#[tokio::test]
async fn latest_position_is_newest_with_metadata() {
  let s = store().await;
  s.replace_all(sample()).await.unwrap();

  let latest = s.latest_position("06a0af").await.unwrap().unwrap();
  assert_eq!(latest.timestamp, Some(300.0));
  assert_eq!(latest.registration.as_deref(), Some("EC-MTI"));
  assert_eq!(latest.aircraft_type.as_deref(), Some("A320"));
  assert_eq!(latest.alt_baro, Some(3200.0));
  assert_eq!(latest.ground_speed, Some(180.5));

  // Metadata without positions is not a latest position.
  assert_eq!(s.latest_position("0000ff").await.unwrap(), None);
}

// ─── Type counts ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn type_counts_are_sorted_by_count() {
  let s = store().await;
  s.replace_all(sample()).await.unwrap();

  let counts = s.type_counts().await.unwrap();
  assert_eq!(counts, [
    TypeCount { aircraft_type: Some("A320".into()), count: 3 },
    TypeCount { aircraft_type: Some("B737".into()), count: 1 },
  ]);
}

// ─── Run replacement ─────────────────────────────────────────────────────────

#[tokio::test]
async fn replace_all_discards_previous_run() {
  let s = store().await;
  s.replace_all(sample()).await.unwrap();
  s.replace_all(Dataset::reduce([observe(
    metadata("111111", Some("D-EABC"), None),
    Some(position("111111", Some(5.0))),
  )]))
  .await
  .unwrap();

  let all = s.list_metadata(page(0, 100)).await.unwrap();
  assert_eq!(all, [metadata("111111", Some("D-EABC"), None)]);
  assert!(s.list_positions("06a0af", page(0, 100)).await.unwrap().is_empty());
  assert_eq!(s.aggregate_stats("06a0af").await.unwrap(), AircraftStats::default());

  let generation = s.current_generation().await.unwrap().unwrap();
  assert_eq!(generation.id, 2);
  assert_eq!(generation.aircraft_count, 1);
  assert_eq!(generation.position_count, 1);
}

#[tokio::test]
async fn replaying_a_run_gives_identical_results() {
  let s = store().await;

  s.replace_all(sample()).await.unwrap();
  let first = (
    s.list_metadata(page(0, 100)).await.unwrap(),
    s.list_positions("06a0af", page(0, 100)).await.unwrap(),
    s.aggregate_stats("06a0af").await.unwrap(),
  );

  s.replace_all(sample()).await.unwrap();
  let second = (
    s.list_metadata(page(0, 100)).await.unwrap(),
    s.list_positions("06a0af", page(0, 100)).await.unwrap(),
    s.aggregate_stats("06a0af").await.unwrap(),
  );

  assert_eq!(first, second);
}

#[tokio::test]
async fn unpublished_generation_is_invisible_and_collected() {
  let s = store().await;
  s.replace_all(sample()).await.unwrap();

  // Simulate a run that crashed after staging.
  let orphan = s
    .stage(Dataset::reduce([observe(metadata("999999", None, None), None)]))
    .await
    .unwrap();
  let keys: Vec<_> = s
    .list_metadata(page(0, 100))
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.icao)
    .collect();
  assert!(!keys.contains(&"999999".to_string()));

  s.replace_all(sample()).await.unwrap();
  let generation = s.current_generation().await.unwrap().unwrap();
  assert!(generation.id > orphan);

  let leftover: i64 = s
    .conn
    .call(move |conn| {
      Ok(conn.query_row(
        "SELECT COUNT(*) FROM aircraft WHERE generation = ?1",
        [orphan],
        |row| row.get(0),
      )?)
    })
    .await
    .unwrap();
  assert_eq!(leftover, 0);
}

#[tokio::test]
async fn reopening_a_file_store_keeps_the_published_run() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("aircraft.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.replace_all(sample()).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.list_metadata(page(0, 100)).await.unwrap().len(), 3);
}
