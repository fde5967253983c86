//! Price statistics over the displayed listings.

use rust_decimal::Decimal;
use skinwatch_sdk::Listing;

/// Summary of the displayed listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingStats {
    /// Number of listings.
    pub total: usize,
    /// Mean price.
    pub average: Decimal,
    /// Lowest price.
    pub lowest: Decimal,
    /// Highest price.
    pub highest: Decimal,
}

impl ListingStats {
    /// Computes statistics, or `None` for an empty list.
    #[must_use]
    pub fn compute(listings: &[Listing]) -> Option<Self> {
        let first = listings.first()?.price;

        let (lowest, highest) = listings
            .iter()
            .fold((first, first), |(lo, hi), l| (lo.min(l.price), hi.max(l.price)));

        Some(Self {
            total: listings.len(),
            average: mean(listings).unwrap_or(highest),
            lowest,
            highest,
        })
    }
}

/// Mean price. Falls back to summing `price / n` when the plain sum
/// overflows `Decimal`.
fn mean(listings: &[Listing]) -> Option<Decimal> {
    let count = Decimal::from(listings.len());

    listings
        .iter()
        .try_fold(Decimal::ZERO, |sum, l| sum.checked_add(l.price))
        .and_then(|sum| sum.checked_div(count))
        .or_else(|| {
            listings.iter().try_fold(Decimal::ZERO, |sum, l| {
                sum.checked_add(l.price.checked_div(count)?)
            })
        })
}
