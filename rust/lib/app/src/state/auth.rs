use quill_flux_derive::state;

use crate::session::Session;

/// Who is signed in.
///
/// `has_token` drives the route gate; `session` is only present while the
/// token decodes and has not expired.
#[state("session/state")]
#[derive(Default)]
pub struct SessionState {
    pub has_token: bool,
    pub session: Option<Session>,
    pub busy: bool,
}

impl SessionState {
    pub fn username(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.username.as_str())
    }

    pub fn is_current_user(&self, username: &str) -> bool {
        self.username() == Some(username)
    }
}

#[state("login/form")]
#[derive(Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub busy: bool,
}

#[state("register/form")]
#[derive(Default)]
pub struct RegisterForm {
    pub email: String,
    pub username: String,
    pub password1: String,
    pub password2: String,
    pub busy: bool,
}
