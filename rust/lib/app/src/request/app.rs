use quill_flux_derive::request;

/// Load persisted tokens, derive the session, show the posts list.
#[request("app/initialize")]
pub struct InitializeReq;

/// Go to a URL path. The auth gate may redirect.
#[request("app/navigate")]
pub struct NavigateReq {
    pub path: String,
}

#[request("app/toast-dismiss")]
pub struct ToastDismissReq {
    pub id: u64,
}
