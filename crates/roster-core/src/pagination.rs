//! Page requests and the pagination block returned alongside list results.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// A validated `(page, limit)` pair. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  page:  u64,
  limit: u64,
}

impl PageRequest {
  /// Returns `None` unless `page >= 1` and `1 <= limit <= MAX_LIMIT`, or
  /// when the page starts past the last row SQLite can address.
  pub fn new(page: i64, limit: i64) -> Option<Self> {
    let page = u64::try_from(page).ok().filter(|p| *p >= 1)?;
    let limit = u64::try_from(limit)
      .ok()
      .filter(|l| (1..=MAX_LIMIT).contains(l))?;
    (page - 1)
      .checked_mul(limit)
      .filter(|offset| i64::try_from(*offset).is_ok())?;
    Some(Self { page, limit })
  }

  pub fn page(&self) -> u64 { self.page }

  pub fn limit(&self) -> u64 { self.limit }

  /// Number of rows to skip before this page starts.
  pub fn offset(&self) -> u64 { (self.page - 1) * self.limit }
}

impl Default for PageRequest {
  fn default() -> Self { Self { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT } }
}

/// Navigation metadata for one page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
  pub current_page:      u64,
  pub page_size:         u64,
  pub total_records:     u64,
  pub total_pages:       u64,
  pub has_next_page:     bool,
  pub has_previous_page: bool,
}

impl Pagination {
  pub fn new(request: PageRequest, total_records: u64) -> Self {
    let total_pages = total_records.div_ceil(request.limit);
    Self {
      current_page: request.page,
      page_size: request.limit,
      total_records,
      total_pages,
      has_next_page: request.page < total_pages,
      has_previous_page: request.page > 1,
    }
  }
}
