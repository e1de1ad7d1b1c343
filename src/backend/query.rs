//! Translation of client list parameters into the REST filter dialect.
//!
//! # Responsibilities
//! - Permissive parsing of `page`, `limit`, `search`, `sort`
//! - Offset computation
//! - Building the ordering / `or=(...ilike...)` filter shared by the page
//!   fetch and the count probe
//! - Reading the total out of a `Content-Range` header
//!
//! # Design Decisions
//! - One filter builder feeds both list calls so they can never diverge
//! - No bounds checks on page/limit; the backend rejects nonsense offsets
//! - An unreadable count degrades to the page length and says so

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 100;
pub const DEFAULT_SORT: &str = "created_at";

/// Columns matched by free-text search.
pub const SEARCH_COLUMNS: [&str; 3] = ["store_name", "address", "phone"];

/// Raw query string of a list request. Everything stays text so a bad value
/// can never reject the request.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl ListParams {
    /// Decode a raw query string. The first occurrence of a key wins and
    /// unknown keys are ignored.
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(raw) = raw else {
            return params;
        };
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                "search" => &mut params.search,
                "sort" => &mut params.sort,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }
}

/// A parsed list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: i64,
    pub limit: i64,
    pub search: Option<String>,
    pub sort: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: None,
            sort: DEFAULT_SORT.to_string(),
        }
    }
}

impl From<ListParams> for ListQuery {
    fn from(params: ListParams) -> Self {
        Self {
            page: parse_int_or(params.page.as_deref(), DEFAULT_PAGE),
            limit: parse_int_or(params.limit.as_deref(), DEFAULT_LIMIT),
            search: params.search.filter(|s| !s.is_empty()),
            sort: params
                .sort
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SORT.to_string()),
        }
    }
}

impl ListQuery {
    /// Rows skipped before the requested page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Filter shared by the page fetch and the count probe.
    pub fn filter(&self) -> ListFilter<'_> {
        ListFilter {
            sort: &self.sort,
            search: self.search.as_deref(),
        }
    }

    /// Query parameters of the page fetch: the shared filter plus window.
    pub fn page_params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.filter().params();
        params.push(("limit", self.limit.to_string()));
        params.push(("offset", self.offset().to_string()));
        params
    }

    /// Query parameters of the count probe: the shared filter only.
    pub fn count_params(&self) -> Vec<(&'static str, String)> {
        self.filter().params()
    }
}

/// Ordering and search predicate, independent of pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListFilter<'a> {
    pub sort: &'a str,
    pub search: Option<&'a str>,
}

impl ListFilter<'_> {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("order", format!("{}.desc", self.sort))];
        if let Some(term) = self.search {
            params.push(("or", search_expression(term)));
        }
        params
    }
}

/// `(store_name.ilike.%t%,address.ilike.%t%,phone.ilike.%t%)`
pub fn search_expression(term: &str) -> String {
    let pattern = quote_operand(&format!("%{term}%"));
    let clauses: Vec<String> = SEARCH_COLUMNS
        .iter()
        .map(|column| format!("{column}.ilike.{pattern}"))
        .collect();
    format!("({})", clauses.join(","))
}

// Reserved characters inside a logic group must be double-quoted.
fn quote_operand(value: &str) -> String {
    if !value.contains([',', '(', ')', '"', '\\']) {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// Integer parsing that accepts a numeric prefix (`"12abc"` is 12) and falls
/// back to `default` for anything without one.
pub fn parse_int_or(raw: Option<&str>, default: i64) -> i64 {
    let Some(raw) = raw else {
        return default;
    };
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    match digits[..end].parse::<i64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) => default,
    }
}

/// How the `total` of a list response was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalCount {
    /// Read from the count probe.
    Exact(u64),
    /// Count metadata was missing or unreadable; this is the number of rows
    /// on the current page and undercounts whenever more pages exist.
    PageLength(u64),
}

impl TotalCount {
    pub fn resolve(content_range: Option<&str>, page_len: usize) -> Self {
        match content_range.and_then(parse_content_range_total) {
            Some(total) if total > 0 => TotalCount::Exact(total),
            _ => TotalCount::PageLength(page_len as u64),
        }
    }

    pub fn value(self) -> u64 {
        match self {
            TotalCount::Exact(n) | TotalCount::PageLength(n) => n,
        }
    }
}

/// Total from `0-24/3573` or `*/0`. `None` for an unknown (`*`) or malformed total.
pub fn parse_content_range_total(header: &str) -> Option<u64> {
    let (_, total) = header.split_once('/')?;
    let total = total.trim_start();
    let end = total
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(total.len());
    total[..end].parse().ok()
}
