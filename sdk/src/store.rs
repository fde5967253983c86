//! In-memory listing store.
//!
//! Keeps listings in arrival order, keyed by name, with upsert semantics.

use std::collections::HashMap;

use crate::types::Listing;

/// Result of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A listing with a new name was appended.
    Inserted,
    /// An existing listing was replaced.
    Updated,
}

/// Ordered collection of listings keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ListingStore {
    /// Listings in insertion order.
    listings: Vec<Listing>,

    /// Position of each name in `listings`.
    index: HashMap<String, usize>,
}

impl ListingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the demo listing.
    #[must_use]
    pub fn with_demo_listing(now_ms: i64) -> Self {
        let mut store = Self::new();
        store.upsert(Listing::demo(now_ms), now_ms);
        store
    }

    /// Inserts a new listing or replaces the one with the same name.
    ///
    /// Both timestamps of a new listing are set to `now_ms`. A replaced
    /// listing takes every field from `listing` except the first-seen
    /// timestamp, which is kept; its last-updated timestamp becomes `now_ms`.
    pub fn upsert(&mut self, mut listing: Listing, now_ms: i64) -> UpsertOutcome {
        listing.last_updated = now_ms;

        if let Some(existing) = self
            .index
            .get(&listing.name)
            .and_then(|&pos| self.listings.get_mut(pos))
        {
            listing.timestamp = existing.timestamp;
            *existing = listing;
            return UpsertOutcome::Updated;
        }

        listing.timestamp = now_ms;
        self.index.insert(listing.name.clone(), self.listings.len());
        self.listings.push(listing);
        UpsertOutcome::Inserted
    }

    /// Returns all listings in insertion order.
    #[must_use]
    pub fn all(&self) -> &[Listing] {
        &self.listings
    }

    /// Returns the listing with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Listing> {
        self.index.get(name).and_then(|&pos| self.listings.get(pos))
    }

    /// Returns the number of listings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Returns true if the store holds no listings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::DEMO_LISTING_NAME;

    fn listing(name: &str, price: i64) -> Listing {
        Listing::new(name, Decimal::from(price))
            .with_sticker("Titan | Katowice 2014")
            .with_market_link(format!("https://example.com/{price}"))
    }

    #[test]
    fn test_store_new_is_empty() {
        let store = ListingStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_upsert_insert_stamps_arrival_time() {
        let mut store = ListingStore::new();
        let mut incoming = listing("Knife A", 100);
        incoming.timestamp = 5;
        incoming.last_updated = 6;

        let outcome = store.upsert(incoming, 1_000);

        assert_eq!(outcome, UpsertOutcome::Inserted);
        assert_eq!(store.len(), 1);
        let stored = store.get("Knife A").expect("stored");
        assert_eq!(stored.timestamp, 1_000);
        assert_eq!(stored.last_updated, 1_000);
    }

    #[test]
    fn test_upsert_update_replaces_fields() {
        let mut store = ListingStore::new();
        store.upsert(listing("Knife A", 100), 1_000);

        let replacement = listing("Knife A", 120).with_sticker("Dignitas | Katowice 2014");
        let outcome = store.upsert(replacement, 2_000);

        assert_eq!(outcome, UpsertOutcome::Updated);
        assert_eq!(store.len(), 1);
        let stored = store.get("Knife A").expect("stored");
        assert_eq!(stored.price, Decimal::from(120));
        assert_eq!(stored.sticker, "Dignitas | Katowice 2014");
        assert_eq!(stored.market_link, "https://example.com/120");
        assert_eq!(stored.last_updated, 2_000);
    }

    #[test]
    fn test_upsert_update_keeps_first_seen() {
        let mut store = ListingStore::new();
        store.upsert(listing("Knife A", 100), 1_000);

        let mut replacement = listing("Knife A", 120);
        replacement.timestamp = 9_999;
        store.upsert(replacement, 2_000);

        assert_eq!(store.get("Knife A").expect("stored").timestamp, 1_000);
    }

    #[test]
    fn test_all_preserves_insertion_order() {
        let mut store = ListingStore::new();
        store.upsert(listing("C", 3), 1);
        store.upsert(listing("A", 1), 2);
        store.upsert(listing("B", 2), 3);
        store.upsert(listing("A", 10), 4);

        let names: Vec<&str> = store.all().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_demo_store_seeded_once() {
        let store = ListingStore::with_demo_listing(50);
        assert_eq!(store.len(), 1);
        assert!(store.get(DEMO_LISTING_NAME).is_some());
    }

    #[test]
    fn test_demo_listing_overwritten_by_matching_update() {
        let mut store = ListingStore::with_demo_listing(50);
        store.upsert(listing(DEMO_LISTING_NAME, 250), 100);

        assert_eq!(store.len(), 1);
        let stored = store.get(DEMO_LISTING_NAME).expect("stored");
        assert_eq!(stored.price, Decimal::from(250));
        assert_eq!(stored.timestamp, 50);
    }

    #[test]
    fn test_demo_listing_kept_alongside_real_data() {
        let mut store = ListingStore::with_demo_listing(50);
        store.upsert(listing("Knife A", 100), 100);

        assert_eq!(store.len(), 2);
        assert_eq!(store.all().first().map(|l| l.name.as_str()), Some(DEMO_LISTING_NAME));
    }
}
