//! Navigable views.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Public sign-in view.
    Login,
    /// Protected catalog view.
    Catalog,
}

impl View {
    /// Canonical path for this view.
    pub const fn path(self) -> &'static str {
        match self {
            View::Login => "/login",
            View::Catalog => "/dashboard",
        }
    }

    /// Whether the view requires a session.
    pub const fn is_protected(self) -> bool {
        matches!(self, View::Catalog)
    }

    /// Maps a path to a view. Returns `None` for unknown paths.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim();
        let normalized = path.trim_end_matches('/');
        match normalized {
            "/login" | "login" => Some(View::Login),
            "/dashboard" | "dashboard" | "/catalog" | "catalog" => Some(View::Catalog),
            _ => None,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Login => write!(f, "login"),
            View::Catalog => write!(f, "catalog"),
        }
    }
}
