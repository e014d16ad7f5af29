/// Page sizing for feed requests.
///
/// The aggregator over-fetches `page_size * overfetch_factor` candidates
/// (capped at `overfetch_cap`) so that posts dropped by shield filtering do
/// not usually under-fill a page. This is a heuristic: when more than
/// `fetch_size - page_size` candidates are excluded the page comes back
/// short even though older posts exist. Callers that need a full page must
/// request again with the last returned `created_at` as the `before` cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePolicy {
    pub default_limit: usize,
    pub max_limit: usize,
    pub overfetch_factor: usize,
    pub overfetch_cap: usize,
}

impl Default for PagePolicy {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 50,
            overfetch_factor: 2,
            overfetch_cap: 100,
        }
    }
}

impl PagePolicy {
    /// Number of posts to return for a requested limit.
    pub fn page_size(&self, requested: Option<u32>) -> usize {
        requested
            .map_or(self.default_limit, |n| n as usize)
            .min(self.max_limit)
    }

    /// Number of candidate posts to fetch for a page. Never below `page_size`.
    pub fn fetch_size(&self, page_size: usize) -> usize {
        page_size
            .saturating_mul(self.overfetch_factor)
            .min(self.overfetch_cap)
            .max(page_size)
    }
}
