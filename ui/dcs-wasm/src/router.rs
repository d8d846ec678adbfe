//! Hash routing between the three views.

use crate::dom::{self, Elements};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Borrower,
    Lender,
}

impl Route {
    /// Unknown hashes fall back to home.
    pub fn from_hash(hash: &str) -> Route {
        let path = hash.trim_start_matches('#').trim_start_matches('/');
        match path.trim_end_matches('/') {
            "borrower" => Route::Borrower,
            "lender" => Route::Lender,
            _ => Route::Home,
        }
    }

    /// Matches the `data-route` attribute of nav links and the id of views.
    pub fn name(self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Borrower => "borrower",
            Route::Lender => "lender",
        }
    }
}

pub fn current() -> Route {
    let hash = gloo_utils::window().location().hash().unwrap_or_default();
    Route::from_hash(&hash)
}

/// Show the view for `route` and mark its nav link active.
pub fn show(els: &Elements, route: Route) {
    for link in &els.nav_links {
        let active = link.get_attribute("data-route").as_deref() == Some(route.name());
        dom::toggle_class(link, "active", active);
    }
    for view in &els.views {
        dom::set_hidden(view, view.id() != route.name());
    }
}
