//! Login / register / logout commands.

use anyhow::Result;
use quill_app::request::{LoginReq, LogoutReq, RegisterReq};
use serde_json::json;

use super::Shell;
use crate::output;

pub async fn login(shell: &Shell, email: &str, password: &str) -> Result<()> {
    shell
        .emit(
            LoginReq::PATH,
            LoginReq {
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await?;
    match shell.session().username() {
        Some(username) => println!("Logged in as {username}."),
        None => println!("Logged in."),
    }
    Ok(())
}

pub async fn register(shell: &Shell, email: &str, username: &str, password: &str) -> Result<()> {
    shell
        .emit(
            RegisterReq::PATH,
            RegisterReq {
                email: email.to_string(),
                username: username.to_string(),
                password1: password.to_string(),
                password2: password.to_string(),
            },
        )
        .await?;
    println!("Run `quill login --email {email}` to sign in.");
    Ok(())
}

pub async fn logout(shell: &Shell) -> Result<()> {
    if !shell.session().has_token {
        println!("Not logged in.");
        return Ok(());
    }
    shell.emit(LogoutReq::PATH, LogoutReq).await?;
    println!("Logged out.");
    Ok(())
}

pub fn whoami(shell: &Shell) -> Result<()> {
    let state = shell.session();
    let Some(session) = state.session else {
        if state.has_token {
            anyhow::bail!("Stored token is expired or unreadable. Run `quill login`.");
        }
        anyhow::bail!("Not logged in.");
    };
    if shell.json {
        return output::json(&json!({
            "user_id": session.user_id,
            "username": session.username,
            "email": session.email,
            "expires_at": session.expires_at,
        }));
    }
    output::table(
        &["user", "email", "expires"],
        &[vec![
            session.username.clone(),
            session.email.clone(),
            output::timestamp(session.expires_at),
        ]],
    );
    Ok(())
}
