//! `GetAllPseudonymsPaged`, `spec.md` §6's pagination surface: page over the
//! `PSU_` key range, resuming from a bookmark, reporting `more` iff the page
//! is full and further keys remain.

use super::error::LedgerError;
use super::store::MemoryLedgerStore;
use super::types::{PagedPseudonymResult, PseudonymRecord};

const PSU_PREFIX: &str = "PSU_";
const PSU_UPPER_BOUND: &str = "PSU_~";

pub fn get_all_pseudonyms_paged(
    store: &MemoryLedgerStore,
    page_size: i64,
    bookmark: &str,
) -> Result<PagedPseudonymResult, LedgerError> {
    if page_size <= 0 {
        return Err(LedgerError::InvalidPageSize(page_size));
    }
    let page_size = page_size as usize;

    let matches = store.range(PSU_PREFIX, PSU_UPPER_BOUND, bookmark);

    let mut records = Vec::with_capacity(page_size.min(matches.len()));
    for (key, value) in matches.iter().take(page_size) {
        let record: PseudonymRecord = serde_json::from_slice(value)
            .map_err(|e| LedgerError::Corrupt(key.clone(), e.to_string()))?;
        records.push(record);
    }

    let next_bookmark = matches
        .iter()
        .take(page_size)
        .last()
        .map(|(k, _)| k.clone())
        .unwrap_or_default();

    let more = records.len() == page_size && matches.len() > page_size;

    Ok(PagedPseudonymResult {
        records,
        bookmark: next_bookmark,
        more,
    })
}
