//! Filtering and sorting of the listings shown on the dashboard.
//!
//! The view never modifies the session's store; it derives the displayed
//! list from a snapshot.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use skinwatch_sdk::Listing;

/// Field to sort listings by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Sort by price.
    Price,
    /// Sort by name.
    Name,
}

impl SortKey {
    /// Returns the key name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Name => "name",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" => Ok(Self::Price),
            "name" => Ok(Self::Name),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// Returns the arrow shown next to the sorted column.
    #[must_use]
    pub const fn arrow(&self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }
}

/// Active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    /// Field sorted by.
    pub key: SortKey,
    /// Direction.
    pub direction: SortDirection,
}

impl SortConfig {
    /// Returns the sort after the operator selects `key`.
    ///
    /// Selecting the key that is already sorted ascending flips it to
    /// descending; anything else starts ascending.
    #[must_use]
    pub fn toggle(current: Option<Self>, key: SortKey) -> Self {
        let direction = match current {
            Some(c) if c.key == key && c.direction == SortDirection::Asc => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        Self { key, direction }
    }

    fn compare(&self, a: &Listing, b: &Listing) -> Ordering {
        let ordering = match self.key {
            SortKey::Price => a.price.cmp(&b.price),
            SortKey::Name => compare_names(&a.name, &b.name),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.direction.arrow())
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Inclusive price bounds. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceRange {
    /// Lower bound.
    pub min: Option<Decimal>,
    /// Upper bound.
    pub max: Option<Decimal>,
}

impl PriceRange {
    /// Builds a range from raw operator input.
    ///
    /// `-`, blank or unparsable bounds are treated as open.
    #[must_use]
    pub fn parse(min: &str, max: &str) -> Self {
        Self {
            min: parse_bound(min),
            max: parse_bound(max),
        }
    }

    /// Returns true if no bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Returns true if `price` lies within the range.
    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        !self.min.is_some_and(|min| price < min) && !self.max.is_some_and(|max| price > max)
    }
}

fn parse_bound(raw: &str) -> Option<Decimal> {
    let raw = raw.trim().trim_start_matches('$');
    if raw.is_empty() || raw == "-" {
        return None;
    }
    Decimal::from_str(raw).ok()
}

/// Operator-controlled view of the listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Case-insensitive sticker substring; empty shows everything.
    pub sticker_filter: String,
    /// Price bounds.
    pub price_range: PriceRange,
    /// Active sort, or `None` for newest first.
    pub sort: Option<SortConfig>,
}

impl ViewState {
    /// Creates an unfiltered, unsorted view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sticker filter.
    pub fn set_sticker_filter(&mut self, filter: impl Into<String>) {
        self.sticker_filter = filter.into();
    }

    /// Sets the price bounds.
    pub fn set_price_range(&mut self, range: PriceRange) {
        self.price_range = range;
    }

    /// Selects `key` for sorting, toggling direction on repeat.
    pub fn sort_by(&mut self, key: SortKey) {
        self.sort = Some(SortConfig::toggle(self.sort, key));
    }

    /// Returns true if `listing` passes the filters.
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        let sticker_ok = self.sticker_filter.is_empty()
            || listing
                .sticker
                .to_lowercase()
                .contains(&self.sticker_filter.to_lowercase());
        sticker_ok && self.price_range.contains(listing.price)
    }

    /// Returns the listings to display, filtered and ordered.
    #[must_use]
    pub fn apply(&self, listings: &[Listing]) -> Vec<Listing> {
        let mut shown: Vec<Listing> = listings
            .iter()
            .filter(|l| self.matches(l))
            .cloned()
            .collect();

        match self.sort {
            Some(sort) => shown.sort_by(|a, b| sort.compare(a, b)),
            None => shown.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        }

        shown
    }
}

/// Returns the distinct stickers in first-seen order.
#[must_use]
pub fn unique_stickers(listings: &[Listing]) -> Vec<String> {
    let mut seen = HashSet::new();
    listings
        .iter()
        .filter(|l| seen.insert(l.sticker.as_str()))
        .map(|l| l.sticker.clone())
        .collect()
}
