use quill_flux_derive::request;

#[request("auth/login")]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

#[request("auth/register")]
pub struct RegisterReq {
    pub email: String,
    pub username: String,
    pub password1: String,
    pub password2: String,
}

/// Clear tokens, session and cached user data.
#[request("auth/logout")]
pub struct LogoutReq;

/// Trade the stored refresh token for a new access token.
#[request("auth/refresh")]
pub struct RefreshReq;
