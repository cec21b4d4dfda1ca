//! Path-addressed client state engine.
//!
//! Rust owns the state and the logic; a renderer only reads paths and
//! emits requests.
//!
//! - `get(path)` reads state (an `Arc` handle, no copy)
//! - `emit(path, payload)` routes a request to its handler(s)
//! - `subscribe(pattern, f)` observes state changes
//!
//! Paths use `/` as separator: `session/state`, `posts/list`,
//! `post/{slug}/comments`. Subscriptions and handlers accept MQTT-style
//! wildcards, `+` for one level and `#` for any depth.
//!
//! ```ignore
//! let flux = Flux::new();
//! flux.on_typed("auth/logout", |_: Arc<LogoutReq>, store| async move {
//!     store.set("app/route", "/auth/login".to_string());
//! });
//! flux.subscribe("app/#", |path, _| println!("{path} changed"));
//! flux.emit("auth/logout", LogoutReq).await;
//! ```

pub mod app;
pub mod router;
pub mod store;
pub mod trie;
pub mod value;

pub use app::Flux;
pub use router::{BoxFuture, Payload, Router};
pub use store::{ChangeHandler, StateStore};
pub use trie::Trie;
pub use value::{StateValue, SubscriptionId};
