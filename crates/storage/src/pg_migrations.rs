//! PostgreSQL schema for the pipeline.
//!
//! Two versions, each safe to rerun: v1 is the bare staging/normalized table
//! pair, v2 adds the maintained `search_vector` and both serving indexes.

use sqlx::PgPool;

/// Indexes created by the v2 schema.
pub const SCHEMA_INDEXES: [&str; 2] = ["idx_events_source_date_name", "idx_events_search_vector"];

const V1_STATEMENTS: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS raw_data (
        id SERIAL PRIMARY KEY,
        source_spider TEXT,
        raw_json TEXT
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS events (
        id SERIAL PRIMARY KEY,
        name TEXT,
        url TEXT UNIQUE,
        event_date TEXT,
        venue_name TEXT,
        venue_address TEXT,
        description TEXT,
        source TEXT,
        category TEXT,
        genre TEXT,
        season TEXT,
        latitude REAL,
        longitude REAL
    )
    ",
];

const V2_STATEMENTS: &[&str] = &[
    "ALTER TABLE events ADD COLUMN IF NOT EXISTS search_vector TSVECTOR",
    // Weights: name A, description B, venue name C, venue address D.
    r"
    CREATE OR REPLACE FUNCTION events_search_vector_refresh() RETURNS trigger AS $$
    BEGIN
        NEW.search_vector :=
            setweight(to_tsvector('english', COALESCE(NEW.name, '')), 'A') ||
            setweight(to_tsvector('english', COALESCE(NEW.description, '')), 'B') ||
            setweight(to_tsvector('english', COALESCE(NEW.venue_name, '')), 'C') ||
            setweight(to_tsvector('english', COALESCE(NEW.venue_address, '')), 'D');
        RETURN NEW;
    END
    $$ LANGUAGE plpgsql
    ",
    r"
    DO $$ BEGIN
        IF NOT EXISTS (
            SELECT 1 FROM pg_trigger
            WHERE tgname = 'events_search_vector_trigger'
              AND tgrelid = 'events'::regclass
        ) THEN
            CREATE TRIGGER events_search_vector_trigger
                BEFORE INSERT OR UPDATE ON events
                FOR EACH ROW EXECUTE FUNCTION events_search_vector_refresh();
        END IF;
    END $$
    ",
    // Rows written before the trigger existed.
    "UPDATE events SET name = name WHERE search_vector IS NULL",
    "CREATE INDEX IF NOT EXISTS idx_events_source_date_name ON events (source, event_date ASC, name ASC)",
    "CREATE INDEX IF NOT EXISTS idx_events_search_vector ON events USING GIN (search_vector)",
];

async fn apply(pool: &PgPool, version: u32, statements: &[&str]) -> Result<(), sqlx::Error> {
    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::debug!(version, "schema version applied");
    Ok(())
}

/// Run all PostgreSQL migrations. Idempotent.
pub async fn run_pg_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    apply(pool, 1, V1_STATEMENTS).await?;
    apply(pool, 2, V2_STATEMENTS).await?;
    Ok(())
}
