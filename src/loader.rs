use crate::fetcher::Fetcher;
use crate::model::AppError;
use crate::normalizer::normalize_all;
use crate::parser::Parser;
use crate::storage::SqliteStorage;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows_parsed: usize,
    pub rows_inserted: usize,
    pub batches: usize,
}

/// Downloads, parses and cleans the dataset, then replaces the collection with it.
/// Batches commit one by one: a failure midway leaves the batches already written.
pub async fn load_dataset(
    fetcher: &dyn Fetcher,
    parser: &dyn Parser,
    storage: &mut SqliteStorage,
    url: &str,
    batch_size: usize,
) -> Result<LoadSummary, AppError> {
    info!("Downloading CSV from: {}", url);
    let text = fetcher.fetch(url).await?;

    info!("Parsing CSV...");
    let mut records = parser.parse(&text)?;
    info!("Total rows (excluding header): {}", records.len());

    info!("Cleaning and filtering fields...");
    normalize_all(&mut records);

    info!("Dropping previous collection...");
    storage.reset_collection()?;

    info!("Inserting data in batches of {}...", batch_size);
    let mut rows_inserted = 0;
    let mut batches = 0;
    for batch in records.chunks(batch_size.max(1)) {
        rows_inserted += storage.insert_batch(batch)?;
        batches += 1;
        info!("Inserted {} records...", rows_inserted);
    }

    info!("All data inserted successfully. Total: {}", rows_inserted);
    Ok(LoadSummary {
        rows_parsed: records.len(),
        rows_inserted,
        batches,
    })
}
