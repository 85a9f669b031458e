//! Login and theme commands.

use mass_market_storefront::AppState;
use mass_market_storefront::services::ThemeMode;

/// # Errors
///
/// Returns an error if the credentials are wrong or cannot be saved.
pub async fn login(
    state: &AppState,
    identifier: &str,
    password: &str,
) -> mass_market_storefront::Result<()> {
    let auth = state.auth().attempt_login(identifier, password).await?;
    let email = auth.email.as_ref().map_or("", |email| email.as_str());
    let role = auth.role.map_or("", |role| role.as_str());
    println!("Login successful! Logged in as {email} ({role}).");
    Ok(())
}

/// # Errors
///
/// Returns an error if the login flags cannot be removed.
pub fn logout(state: &AppState) -> mass_market_storefront::Result<()> {
    state.auth().logout()?;
    println!("Logged out.");
    Ok(())
}

/// # Errors
///
/// Returns an error if the login flags cannot be read.
pub fn whoami(state: &AppState) -> mass_market_storefront::Result<()> {
    let auth = state.auth().current()?;
    if !auth.is_logged_in {
        println!("Not logged in.");
        return Ok(());
    }
    match (&auth.email, auth.role) {
        (Some(email), Some(role)) => println!("{email} ({role})"),
        (Some(email), None) => println!("{email}"),
        _ => println!("Logged in."),
    }
    Ok(())
}

pub fn theme_show(state: &AppState) {
    let theme = state.theme();
    let mode = theme.mode();
    let rendered = if theme.is_dark() { "dark" } else { "light" };
    println!("Theme: {mode} (currently {rendered})");
}

/// # Errors
///
/// Returns an error if the preference cannot be saved.
pub fn theme_set(state: &AppState, mode: ThemeMode) -> mass_market_storefront::Result<()> {
    state.theme().set_mode(mode)?;
    println!("Theme set to {mode}.");
    Ok(())
}

/// # Errors
///
/// Returns an error if the preference cannot be saved.
pub fn theme_toggle(state: &AppState) -> mass_market_storefront::Result<()> {
    let mode = state.theme().toggle()?;
    println!("Theme set to {mode}.");
    Ok(())
}
