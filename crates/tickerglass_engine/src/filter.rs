use tickerglass_models::CoinRecord;

/// Case-insensitive substring search over name and symbol. An empty query
/// keeps every record. Input order is preserved.
pub fn filter_records(records: &[CoinRecord], query: &str) -> Vec<CoinRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|coin| matches(coin, &needle))
        .cloned()
        .collect()
}

fn matches(coin: &CoinRecord, needle: &str) -> bool {
    coin.name.to_lowercase().contains(needle) || coin.symbol.to_lowercase().contains(needle)
}
