//! SQL schema for the tracklog SQLite store.
//!
//! Every row belongs to a generation (one ingestion run). Readers only see the
//! generation named by `current_generation`; a run is published by flipping
//! that pointer.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS generations (
    generation     INTEGER PRIMARY KEY,
    created_at     TEXT    NOT NULL,   -- ISO 8601 UTC
    aircraft_count INTEGER NOT NULL,
    position_count INTEGER NOT NULL
);

-- Single-row pointer to the published generation.
CREATE TABLE IF NOT EXISTS current_generation (
    id         INTEGER PRIMARY KEY CHECK (id = 0),
    generation INTEGER NOT NULL REFERENCES generations(generation)
);

CREATE TABLE IF NOT EXISTS aircraft (
    generation   INTEGER NOT NULL,
    icao         TEXT    NOT NULL,
    registration TEXT,
    type         TEXT,
    PRIMARY KEY (generation, icao)
);

-- No foreign key to aircraft: a position may arrive without metadata.
CREATE TABLE IF NOT EXISTS positions (
    generation INTEGER NOT NULL,
    seq        INTEGER NOT NULL,   -- arrival order within the run
    icao       TEXT    NOT NULL,
    timestamp  REAL,               -- epoch seconds
    lat        REAL    NOT NULL,
    lon        REAL    NOT NULL,
    alt_baro   REAL,               -- feet; 0 when on the ground
    gs         REAL,               -- knots
    emergency  TEXT,               -- raw indicator; presence is what matters
    PRIMARY KEY (generation, seq)
);

CREATE INDEX IF NOT EXISTS positions_track_idx
    ON positions(generation, icao, timestamp, seq);

PRAGMA user_version = 1;
";
