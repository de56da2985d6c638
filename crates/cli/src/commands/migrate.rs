//! Schema creation and upgrade.
//!
//! Idempotent: every statement is guarded, so rerunning against an
//! up-to-date database changes nothing.

use anyhow::Result;
use nashville_core::Settings;
use nashville_storage::SCHEMA_INDEXES;

pub(crate) async fn run(settings: &Settings) -> Result<()> {
    // Opening the store runs the migrations.
    let storage = crate::open_storage(settings).await?;
    drop(storage);
    println!("Schema is up to date (indexes: {}).", SCHEMA_INDEXES.join(", "));
    Ok(())
}
