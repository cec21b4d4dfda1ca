//! App shell state: route, notifications, navbar.

use quill_flux_derive::state;

use crate::routing::Route;
use crate::session::Session;

/// The page being shown.
#[state("app/route")]
pub struct AppRoute {
    pub path: String,
    pub route: Route,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Transient notifications, oldest first.
#[state("app/toasts")]
#[derive(Default)]
pub struct Toasts {
    pub items: Vec<Toast>,
}

impl Toasts {
    pub fn messages(&self) -> Vec<&str> {
        self.items.iter().map(|t| t.message.as_str()).collect()
    }

    pub fn contains(&self, kind: ToastKind, message: &str) -> bool {
        self.items
            .iter()
            .any(|t| t.kind == kind && t.message == message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    pub path: String,
}

impl NavLink {
    fn new(label: &str, path: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            path: path.into(),
        }
    }
}

#[state("app/navbar")]
#[derive(Default)]
pub struct Navbar {
    pub links: Vec<NavLink>,
    /// Right-hand side: login / register for guests.
    pub guest_links: Vec<NavLink>,
    /// Username dropdown for a signed-in viewer. Its last entry, logout,
    /// is the `auth/logout` request rather than a link.
    pub username: Option<String>,
    pub user_menu: Vec<NavLink>,
}

impl Navbar {
    pub fn for_session(session: Option<&Session>) -> Self {
        let links = vec![
            NavLink::new("Posts", "/posts"),
            NavLink::new("Feed", "/posts/feed"),
            NavLink::new("Profiles", "/profiles"),
        ];
        match session {
            Some(s) => Self {
                links,
                guest_links: Vec::new(),
                username: Some(s.username.clone()),
                user_menu: vec![NavLink::new("Profile", format!("/profiles/{}", s.username))],
            },
            None => Self {
                links,
                guest_links: vec![
                    NavLink::new("Login", "/auth/login"),
                    NavLink::new("Register", "/auth/register"),
                ],
                username: None,
                user_menu: Vec::new(),
            },
        }
    }
}
