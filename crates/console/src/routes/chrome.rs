//! The header and stats cards around every signed-in screen.

use pustakalaya_core::{LibraryStats, Session};

use super::Screen;
use crate::state::AppState;

/// A header navigation link.
#[derive(Debug, Clone)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// One counter card.
#[derive(Debug, Clone)]
pub struct StatCard {
    pub title: &'static str,
    /// `None` until the first successful fetch.
    pub value: Option<u64>,
    pub description: &'static str,
}

/// The stats cards and the state of their last fetch.
#[derive(Debug, Clone)]
pub struct StatsView {
    pub cards: Vec<StatCard>,
    pub error: Option<String>,
}

impl StatsView {
    fn new(stats: Option<&LibraryStats>, error: Option<&str>) -> Self {
        let card = |title, value: fn(&LibraryStats) -> u64, description| StatCard {
            title,
            value: stats.map(value),
            description,
        };

        Self {
            cards: vec![
                card("Total Books", |s| s.total_books, "Available in library"),
                card("Total Donors", |s| s.total_donors, "Active book donors"),
                card("Librarians", |s| s.total_librarians, "Managing the library"),
                card(
                    "Donations Recorded",
                    |s| s.total_donations,
                    "Books donated so far",
                ),
            ],
            error: error.map(str::to_string),
        }
    }
}

/// Layout context shared by every signed-in page.
#[derive(Debug, Clone)]
pub struct Chrome {
    pub user_name: String,
    pub nav: Vec<NavLink>,
    pub stats: StatsView,
    /// Path the stats retry button returns to.
    pub current_path: String,
    pub title: &'static str,
}

impl Chrome {
    /// Build the layout, fetching the stats on first display.
    pub async fn build(state: &AppState, session: &Session, screen: Screen, current_path: String) -> Self {
        let mut stats = state.stats().lock().await;
        // The cards show the failure and offer a retry.
        let _ = stats.ensure_loaded().await;

        Self {
            user_name: session.display_name.clone(),
            nav: Screen::NAV
                .into_iter()
                .map(|nav| NavLink {
                    label: nav.label(),
                    href: nav.path(),
                    active: nav == screen,
                })
                .collect(),
            stats: StatsView::new(stats.stats(), stats.error()),
            current_path,
            title: screen.title(),
        }
    }
}
