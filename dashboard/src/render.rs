//! Plain-text rendering of the dashboard.

use std::fmt;

use skinwatch_sdk::{Listing, SessionSnapshot};

use crate::format::{format_usd, local_time, status_line, time_since};
use crate::stats::ListingStats;
use crate::view::{SortKey, ViewState};

/// Dashboard title.
pub const TITLE: &str = "CSGO Skin Sniper";

/// Message shown when nothing matches while connected.
pub const WAITING_MESSAGE: &str = "No skin listings received yet. Waiting for data...";

/// Message shown when nothing matches while disconnected.
pub const DISCONNECTED_MESSAGE: &str = "Connect to WebSocket to receive skin listings.";

/// One frame of the dashboard.
#[derive(Debug)]
pub struct DashboardView<'a> {
    snapshot: &'a SessionSnapshot,
    view: &'a ViewState,
    url: &'a str,
    now_ms: i64,
}

impl<'a> DashboardView<'a> {
    /// Creates a view of `snapshot` filtered through `view`.
    #[must_use]
    pub const fn new(
        snapshot: &'a SessionSnapshot,
        view: &'a ViewState,
        url: &'a str,
        now_ms: i64,
    ) -> Self {
        Self {
            snapshot,
            view,
            url,
            now_ms,
        }
    }

    fn sort_label(&self, key: SortKey) -> String {
        match self.view.sort {
            Some(sort) if sort.key == key => format!("{key} {}", sort.direction.arrow()),
            _ => key.to_string(),
        }
    }

    fn write_card(&self, f: &mut fmt::Formatter<'_>, listing: &Listing) -> fmt::Result {
        writeln!(f, "  {}", listing.name)?;
        writeln!(f, "    Sticker: {}", listing.sticker)?;
        writeln!(
            f,
            "    Price:   {:<14} Updated: {}",
            format_usd(listing.price),
            time_since(listing.timestamp, self.now_ms)
        )?;
        if listing.last_updated > listing.timestamp {
            writeln!(f, "    Refreshed at {}", local_time(listing.updated_at()))?;
        }
        if !listing.market_link.is_empty() {
            writeln!(f, "    Market:  {}", listing.market_link)?;
        }
        if let Some(image) = &listing.image_url {
            writeln!(f, "    Image:   {image}")?;
        }
        Ok(())
    }
}

impl fmt::Display for DashboardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self.view.apply(&self.snapshot.listings);

        writeln!(f, "{TITLE}")?;
        writeln!(f, "Real-time skin listings with stickers")?;
        writeln!(f)?;

        let link = if self.snapshot.connected {
            format!("Connected to {}", self.url)
        } else {
            "Disconnected".to_string()
        };
        writeln!(f, "{link} | {}", status_line(&self.snapshot.status))?;
        writeln!(f)?;

        match ListingStats::compute(&shown) {
            Some(stats) => writeln!(
                f,
                "Total: {}  Average: {}  Lowest: {}  Highest: {}",
                stats.total,
                format_usd(stats.average),
                format_usd(stats.lowest),
                format_usd(stats.highest)
            )?,
            None => writeln!(f, "Total: 0")?,
        }
        writeln!(f)?;

        write!(
            f,
            "Skin Listings  [sort: {} | {}]",
            self.sort_label(SortKey::Name),
            self.sort_label(SortKey::Price)
        )?;
        if !self.view.sticker_filter.is_empty() {
            write!(f, "  [sticker: {}]", self.view.sticker_filter)?;
        }
        if !self.view.price_range.is_unbounded() {
            let bound = |b: Option<rust_decimal::Decimal>| b.map_or_else(|| "-".to_string(), format_usd);
            write!(
                f,
                "  [price: {} .. {}]",
                bound(self.view.price_range.min),
                bound(self.view.price_range.max)
            )?;
        }
        writeln!(f)?;

        if shown.is_empty() {
            let message = if self.snapshot.connected {
                WAITING_MESSAGE
            } else {
                DISCONNECTED_MESSAGE
            };
            return writeln!(f, "  {message}");
        }

        for listing in &shown {
            self.write_card(f, listing)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use skinwatch_sdk::{ConnectionStatus, DEMO_LISTING_NAME};

    use super::*;

    fn snapshot(connected: bool, listings: Vec<Listing>) -> SessionSnapshot {
        SessionSnapshot {
            status: if connected {
                ConnectionStatus::online(0)
            } else {
                ConnectionStatus::offline(0)
            },
            connected,
            listings,
            last_message: None,
        }
    }

    fn render(snapshot: &SessionSnapshot, view: &ViewState) -> String {
        DashboardView::new(snapshot, view, "ws://localhost:8080", 120_000).to_string()
    }

    #[test]
    fn test_render_empty_disconnected() {
        let text = render(&snapshot(false, Vec::new()), &ViewState::new());

        assert!(text.starts_with(TITLE));
        assert!(text.contains("Disconnected | Server Offline"));
        assert!(text.contains("Total: 0"));
        assert!(text.contains(DISCONNECTED_MESSAGE));
    }

    #[test]
    fn test_render_empty_connected() {
        let text = render(&snapshot(true, Vec::new()), &ViewState::new());

        assert!(text.contains("Connected to ws://localhost:8080 | Server Online"));
        assert!(text.contains(WAITING_MESSAGE));
    }

    #[test]
    fn test_render_cards_and_stats() {
        let text = render(
            &snapshot(true, vec![Listing::demo(0)]),
            &ViewState::new(),
        );

        assert!(text.contains(DEMO_LISTING_NAME));
        assert!(text.contains("$207.20"));
        assert!(text.contains("Updated: 2m ago"));
        assert!(text.contains("Total: 1  Average: $207.20"));
        assert!(!text.contains(WAITING_MESSAGE));
    }

    #[test]
    fn test_render_filtered_out_shows_empty_state() {
        let mut view = ViewState::new();
        view.set_sticker_filter("no such sticker");

        let text = render(&snapshot(true, vec![Listing::demo(0)]), &view);

        assert!(text.contains("[sticker: no such sticker]"));
        assert!(text.contains(WAITING_MESSAGE));
    }

    #[test]
    fn test_render_card_refresh_and_image() {
        let mut listing = Listing::new("Knife A", Decimal::from(100));
        listing.timestamp = 1_000;
        listing.last_updated = 60_000;
        listing.image_url = Some("https://example.com/knife.png".to_string());
        let fresh = Listing::new("Knife B", Decimal::from(50));

        let text = render(&snapshot(true, vec![listing, fresh]), &ViewState::new());

        assert_eq!(text.matches("Refreshed at").count(), 1);
        assert!(text.contains("Image:   https://example.com/knife.png"));
    }

    #[test]
    fn test_render_sort_arrow() {
        let mut view = ViewState::new();
        view.sort_by(SortKey::Price);
        view.sort_by(SortKey::Price);

        let listings = vec![
            Listing::new("Cheap", Decimal::from(1)),
            Listing::new("Dear", Decimal::from(9)),
        ];
        let text = render(&snapshot(true, listings), &view);

        assert!(text.contains("price ↓"));
        let dear = text.find("Dear").expect("dear");
        let cheap = text.find("Cheap").expect("cheap");
        assert!(dear < cheap);
    }
}
