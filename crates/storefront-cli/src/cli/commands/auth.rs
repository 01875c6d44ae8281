//! Auth command handlers.

use std::io::BufRead;
use std::sync::Arc;

use anyhow::{Context, Result};
use storefront_core::auth::AuthGateway;

use super::Services;

pub async fn login(
    services: &Services,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let (username, password) = {
        let mut stdin = std::io::stdin().lock();
        let username = match username {
            Some(u) => u,
            None => read_field(&mut stdin, "Username: ")?,
        };
        let password = match password {
            Some(p) => p,
            None => read_field(&mut stdin, "Password: ")?,
        };
        (username, password)
    };

    let auth = AuthGateway::new(Arc::clone(&services.session), services.api.clone());
    auth.login(&username, &password).await?;

    let name = services
        .session
        .get()
        .map(|s| s.display_name().to_string())
        .unwrap_or_default();
    println!("Logged in. Welcome, {name}!");
    Ok(())
}

pub fn logout(services: &Services) {
    if !services.session.is_authenticated() {
        println!("Not logged in.");
        return;
    }
    let auth = AuthGateway::new(Arc::clone(&services.session), services.api.clone());
    auth.logout();
    println!("Logged out.");
}

pub fn whoami(services: &Services) {
    match services.session.get() {
        Some(session) => match session.username() {
            Some(username) => println!("Logged in as {} ({username})", session.display_name()),
            None => println!("Logged in as {}", session.display_name()),
        },
        None => println!("Not logged in."),
    }
}

/// Reads one line, prompting on stderr so stdout stays scriptable.
fn read_field(input: &mut impl BufRead, label: &str) -> Result<String> {
    eprint!("{label}");
    let mut line = String::new();
    input.read_line(&mut line).context("read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
