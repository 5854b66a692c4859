use super::record::Record;

/// Queries shorter than this (in characters) show the whole collection
pub const MIN_QUERY_LEN: usize = 3;

/// Name-substring filter over a collection
pub struct SearchIndex;

impl SearchIndex {
    /// Trim and lower-case a raw query
    pub fn normalize(query: &str) -> String {
        query.trim().to_lowercase()
    }

    /// Whether a query is long enough to filter at all
    pub fn is_active(query: &str) -> bool {
        Self::normalize(query).chars().count() >= MIN_QUERY_LEN
    }

    /// Records whose display name contains `query`, in collection order.
    /// Inactive queries return every record.
    pub fn filter<'a>(query: &str, records: &'a [Record]) -> Vec<&'a Record> {
        let needle = Self::normalize(query);
        if needle.chars().count() < MIN_QUERY_LEN {
            return records.iter().collect();
        }

        records
            .iter()
            .filter(|record| record.display_name().to_lowercase().contains(&needle))
            .collect()
    }
}
