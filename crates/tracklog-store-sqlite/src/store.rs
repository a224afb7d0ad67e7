//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::{path::Path, sync::Arc};

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use tokio::sync::Mutex;
use tracklog_core::{
  aircraft::{AircraftMetadata, AircraftStats, LatestPosition, PositionRecord, TypeCount},
  dataset::Dataset,
  store::{Page, RecordStore},
};

use crate::{
  Result,
  encode::{
    RawGeneration, RawTypeCount, encode_count, encode_dt, encode_page, latest_from_row,
    metadata_from_row, position_from_row,
  },
  schema::SCHEMA,
};

// ─── Generation ──────────────────────────────────────────────────────────────

/// Bookkeeping for one published ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
  pub id:             i64,
  pub created_at:     DateTime<Utc>,
  pub aircraft_count: u64,
  pub position_count: u64,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A tracklog record store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  /// Serialises `replace_all` so two runs never stage into each other.
  replace_lock:    Arc<Mutex<()>>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::with_connection(conn).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::with_connection(conn).await
  }

  async fn with_connection(conn: tokio_rusqlite::Connection) -> Result<Self> {
    let store = Self { conn, replace_lock: Arc::new(Mutex::new(())) };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// The published generation, or `None` before the first run.
  pub async fn current_generation(&self) -> Result<Option<Generation>> {
    let raw: Option<RawGeneration> = self
      .conn
      .call(|conn| {
        Ok(conn
          .query_row(
            "SELECT g.generation, g.created_at, g.aircraft_count, g.position_count
             FROM current_generation c
             JOIN generations g ON g.generation = c.generation
             WHERE c.id = 0",
            [],
            |row| {
              Ok(RawGeneration {
                generation:     row.get(0)?,
                created_at:     row.get(1)?,
                aircraft_count: row.get(2)?,
                position_count: row.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawGeneration::into_generation).transpose()
  }

  /// Write `dataset` under a fresh generation id without publishing it.
  ///
  /// Rows of an unpublished generation are invisible to every read.
  pub(crate) async fn stage(&self, dataset: Dataset) -> Result<i64> {
    let aircraft_count = encode_count(dataset.aircraft_count() as u64);
    let position_count = encode_count(dataset.position_count() as u64);
    let created_at = encode_dt(Utc::now());
    let (aircraft, positions) = dataset.into_parts();

    let generation = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let generation: i64 = tx.query_row(
          "SELECT COALESCE(MAX(generation), 0) + 1 FROM generations",
          [],
          |row| row.get(0),
        )?;

        tx.execute(
          "INSERT INTO generations (generation, created_at, aircraft_count, position_count)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![generation, created_at, aircraft_count, position_count],
        )?;

        {
          let mut insert = tx.prepare(
            "INSERT INTO aircraft (generation, icao, registration, type)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for a in &aircraft {
            insert.execute(rusqlite::params![
              generation,
              a.icao,
              a.registration,
              a.aircraft_type,
            ])?;
          }

          let mut insert = tx.prepare(
            "INSERT INTO positions (
               generation, seq, icao, timestamp, lat, lon, alt_baro, gs, emergency
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          )?;
          for (seq, p) in positions.iter().enumerate() {
            insert.execute(rusqlite::params![
              generation,
              seq as i64,
              p.icao,
              p.timestamp,
              p.lat,
              p.lon,
              p.alt_baro,
              p.gs,
              p.emergency,
            ])?;
          }
        }

        tx.commit()?;
        Ok(generation)
      })
      .await?;

    Ok(generation)
  }

  /// Point readers at `generation`.
  async fn publish(&self, generation: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO current_generation (id, generation) VALUES (0, ?1)
           ON CONFLICT (id) DO UPDATE SET generation = excluded.generation",
          [generation],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Drop every generation other than `keep`, including runs that were staged
  /// but never published.
  async fn collect_garbage(&self, keep: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM positions WHERE generation != ?1", [keep])?;
        tx.execute("DELETE FROM aircraft WHERE generation != ?1", [keep])?;
        tx.execute("DELETE FROM generations WHERE generation != ?1", [keep])?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = crate::Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn replace_all(&self, dataset: Dataset) -> Result<()> {
    let _guard = self.replace_lock.lock().await;

    let generation = self.stage(dataset).await?;
    self.publish(generation).await?;
    tracing::debug!(generation, "published generation");

    // The new run is already visible; a failure here only leaves garbage
    // behind for the next run to collect.
    if let Err(e) = self.collect_garbage(generation).await {
      tracing::warn!(generation, error = %e, "failed to drop superseded generations");
    }
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_metadata(&self, page: Page) -> Result<Vec<AircraftMetadata>> {
    let (limit, offset) = encode_page(page);

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT icao, registration, type
           FROM aircraft
           WHERE generation = (SELECT generation FROM current_generation WHERE id = 0)
           ORDER BY icao ASC
           LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit, offset], metadata_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  async fn list_positions(&self, icao: &str, page: Page) -> Result<Vec<PositionRecord>> {
    let icao = icao.to_owned();
    let (limit, offset) = encode_page(page);

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT icao, timestamp, lat, lon, alt_baro, gs, emergency
           FROM positions
           WHERE generation = (SELECT generation FROM current_generation WHERE id = 0)
             AND icao = ?1
           ORDER BY timestamp ASC, seq ASC
           LIMIT ?2 OFFSET ?3",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![icao, limit, offset], position_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  async fn aggregate_stats(&self, icao: &str) -> Result<AircraftStats> {
    let icao = icao.to_owned();

    // Aggregates without matching rows still yield one row of NULLs.
    let stats = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT
             MAX(alt_baro),
             MAX(gs),
             COALESCE(MAX(emergency IS NOT NULL), 0)
           FROM positions
           WHERE generation = (SELECT generation FROM current_generation WHERE id = 0)
             AND icao = ?1",
          rusqlite::params![icao],
          |row| {
            Ok(AircraftStats {
              max_altitude_baro: row.get(0)?,
              max_ground_speed:  row.get(1)?,
              had_emergency:     row.get(2)?,
            })
          },
        )?)
      })
      .await?;

    Ok(stats)
  }

  async fn latest_position(&self, icao: &str) -> Result<Option<LatestPosition>> {
    let icao = icao.to_owned();

    let latest = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT p.icao, a.registration, a.type,
                    p.timestamp, p.lat, p.lon, p.alt_baro, p.gs
             FROM positions p
             LEFT JOIN aircraft a
               ON a.generation = p.generation AND a.icao = p.icao
             WHERE p.generation = (SELECT generation FROM current_generation WHERE id = 0)
               AND p.icao = ?1
             ORDER BY p.timestamp DESC, p.seq DESC
             LIMIT 1",
            rusqlite::params![icao],
            latest_from_row,
          )
          .optional()?)
      })
      .await?;

    Ok(latest)
  }

  async fn type_counts(&self) -> Result<Vec<TypeCount>> {
    let raws: Vec<RawTypeCount> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT a.type, COUNT(*) AS n
           FROM positions p
           LEFT JOIN aircraft a
             ON a.generation = p.generation AND a.icao = p.icao
           WHERE p.generation = (SELECT generation FROM current_generation WHERE id = 0)
           GROUP BY a.type
           ORDER BY n DESC, a.type ASC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawTypeCount {
              aircraft_type: row.get(0)?,
              count:         row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTypeCount::into_type_count).collect()
  }
}
