//! Shared pagination and ordering types for list queries.

use sea_orm::Order;

/// Requested sort direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Parse `asc`/`desc` case-insensitively; anything else is `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn to_order(self) -> Order {
        match self {
            Self::Asc => Order::Asc,
            Self::Desc => Order::Desc,
        }
    }
}

/// Half-open `[start, end)` window over a result set
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListWindow {
    pub start: u64,
    pub end: Option<u64>,
}

impl ListWindow {
    pub fn offset(&self) -> u64 {
        self.start
    }

    /// Number of rows to fetch, `None` for unbounded
    pub fn limit(&self) -> Option<u64> {
        self.end.map(|end| end.saturating_sub(self.start))
    }

    /// Row count for the query; SQLite rejects `OFFSET` without `LIMIT`
    pub fn fetch_limit(&self) -> u64 {
        self.limit().unwrap_or(i64::MAX as u64)
    }
}

/// Escape `%`, `_` and the escape character itself for a `LIKE` pattern
pub fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
