//! Command implementations.
//!
//! A command emits requests on the wired app, then reads page state back
//! the way a renderer would. Error notifications fail the command.

pub mod auth;
pub mod post;
pub mod posts;
pub mod profiles;

use std::any::Any;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use quill_app::handlers::app::refresh_session;
use quill_app::request::{NavigateReq, RefreshReq};
use quill_app::state::{AppRoute, SessionState, ToastKind, Toasts};
use quill_app::{ClientConfig, QuillApp, Route};

pub struct Shell {
    app: QuillApp,
    pub json: bool,
    /// Highest toast id already printed.
    seen: AtomicU64,
}

impl Shell {
    pub async fn open(config_path: &Path, json: bool) -> Result<Self> {
        let config = ClientConfig::load(config_path)?;
        tracing::debug!(
            api = %config.api_url,
            storage = %config.storage_path().display(),
            "opening client"
        );
        let app = QuillApp::open(config)?;
        let session = refresh_session(app.flux.store(), &app.ctx);
        let shell = Self {
            app,
            json,
            seen: AtomicU64::new(0),
        };
        // Stored but expired: the server would answer 401.
        if session.has_token && session.session.is_none() {
            tracing::debug!("access token expired, refreshing");
            if let Err(e) = shell.emit(RefreshReq::PATH, RefreshReq).await {
                eprintln!("warning: {e}");
            }
        }
        Ok(shell)
    }

    /// Emit one request and report the notifications it raised.
    pub async fn emit<T: Any + Send + Sync>(&self, path: &str, req: T) -> Result<()> {
        if self.app.flux.emit(path, req).await == 0 {
            anyhow::bail!("no handler for {path}");
        }
        self.report()
    }

    pub async fn navigate(&self, path: &str) -> Result<Route> {
        self.emit(NavigateReq::PATH, NavigateReq { path: path.to_string() })
            .await?;
        Ok(self.route())
    }

    pub fn state<T: Any + Clone + Default>(&self, path: &str) -> T {
        self.app.flux.get_as(path).unwrap_or_default()
    }

    pub fn route(&self) -> Route {
        self.app
            .flux
            .get_as::<AppRoute>(AppRoute::PATH)
            .map_or(Route::NotFound, |r| r.route)
    }

    pub fn session(&self) -> SessionState {
        self.state(SessionState::PATH)
    }

    pub fn require_login(&self) -> Result<()> {
        if !self.session().has_token {
            anyhow::bail!("Not logged in. Run `quill login`.");
        }
        Ok(())
    }

    /// Print new success toasts. The last new error becomes the result.
    fn report(&self) -> Result<()> {
        let toasts: Toasts = self.state(Toasts::PATH);
        let seen = self.seen.load(Ordering::Relaxed);
        let mut failure = None;
        for toast in toasts.items.iter().filter(|t| t.id > seen) {
            self.seen.fetch_max(toast.id, Ordering::Relaxed);
            match toast.kind {
                ToastKind::Success => eprintln!("{}", toast.message),
                ToastKind::Error => {
                    if let Some(prev) = failure.replace(toast.message.clone()) {
                        eprintln!("error: {prev}");
                    }
                }
            }
        }
        match failure {
            Some(message) => Err(anyhow::anyhow!(message)),
            None => Ok(()),
        }
    }
}
