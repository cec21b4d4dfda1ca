//! Shared helpers for handlers.

use quill_client::{ApiError, Paginated};
use quill_flux::StateStore;
use quill_query::{QueryError, QueryKey};

use crate::state::{LoadStatus, SessionState};
use crate::strings::SOMETHING_WENT_WRONG;

pub fn session_state(store: &StateStore) -> SessionState {
    store.get_as::<SessionState>(SessionState::PATH).unwrap_or_default()
}

/// Username of the signed-in viewer, if any.
pub fn viewer(store: &StateStore) -> Option<String> {
    session_state(store).username().map(str::to_string)
}

/// Cursor extractor for every paginated infinite query.
pub fn next_cursor<T>(page: &Paginated<T>) -> Option<u32> {
    page.next_page_param()
}

pub fn is_not_found(err: &QueryError<ApiError>) -> bool {
    err.source_error().is_some_and(ApiError::is_not_found)
}

/// Inline state for a failed query.
pub fn query_failed(key: &QueryKey, err: &QueryError<ApiError>) -> LoadStatus {
    tracing::warn!(%key, error = %err, "query failed");
    LoadStatus::Failed(SOMETHING_WENT_WRONG.to_string())
}

/// `http_message` when the server answered, the generic text otherwise.
pub fn mutation_message<'a>(err: &ApiError, http_message: &'a str) -> &'a str {
    if err.is_http() {
        http_message
    } else {
        SOMETHING_WENT_WRONG
    }
}

/// The server's own message for HTTP errors.
pub fn server_message(err: &ApiError) -> String {
    match err {
        ApiError::Server { message, .. } if !message.is_empty() => message.clone(),
        _ => SOMETHING_WENT_WRONG.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn server(status: u16, message: &str) -> ApiError {
        ApiError::Server {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn mutation_messages_by_error_class() {
        assert_eq!(mutation_message(&server(400, ""), "Failed to register..."), "Failed to register...");
        assert_eq!(
            mutation_message(&ApiError::Decode("eof".into()), "Failed to register..."),
            SOMETHING_WENT_WRONG
        );
        assert_eq!(server_message(&server(403, "Not the author")), "Not the author");
        assert_eq!(server_message(&ApiError::Auth("x".into())), SOMETHING_WENT_WRONG);
    }

    #[test]
    fn not_found_only_from_404() {
        assert!(is_not_found(&QueryError::Fetch(Arc::new(server(404, "")))));
        assert!(!is_not_found(&QueryError::Fetch(Arc::new(server(500, "")))));
        assert!(!is_not_found(&QueryError::<ApiError>::Disabled));
    }
}
