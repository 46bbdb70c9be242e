pub const DEFAULT_PAGE: u64 = 1;

/// Default page size for a caller's own posts.
pub const OWNED_PAGE_SIZE: u64 = 10;

/// Default page size for the public listing.
pub const GLOBAL_PAGE_SIZE: u64 = 5;

/// Page number and page size, both always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub size: u64,
}

impl Pagination {
    pub fn new(page: u64, size: u64) -> Self {
        Self { page: page.max(1), size: size.max(1) }
    }

    /// Build pagination from raw query-string values. Missing, non-numeric,
    /// zero or negative inputs fall back to page 1 / `default_size`.
    pub fn from_query(page: Option<&str>, size: Option<&str>, default_size: u64) -> Self {
        Self::new(
            page.and_then(parse_positive).unwrap_or(DEFAULT_PAGE),
            size.and_then(parse_positive).unwrap_or(default_size),
        )
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.size)
    }

    pub fn limit(&self) -> u64 {
        self.size
    }

    /// Number of pages needed to hold `total` records.
    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(self.size)
    }
}

/// Leading decimal digits of `raw`, so "3", " 3" and "3rd" all give 3.
fn parse_positive(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = trimmed.find(|c: char| !c.is_ascii_digit()).unwrap_or(trimmed.len());
    trimmed[..end].parse::<u64>().ok().filter(|n| *n > 0)
}
