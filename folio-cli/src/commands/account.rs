//! Account commands

use super::{connect, spinner};
use anyhow::{Context, Result};
use folio_client::HttpCatalog;
use folio_core::pages::{AuthPage, LoadState, ProfilePage};
use folio_core::{
    BorrowRecord, FolioConfig, ProfileDetails, Registration, SessionContext, UserProfile,
    UserStats,
};
use serde::Serialize;

/// Profile output
#[derive(Serialize)]
struct ProfileReport<'a> {
    user: &'a UserProfile,
    details: Option<&'a ProfileDetails>,
    stats: Option<&'a UserStats>,
    borrows: &'a [BorrowRecord],
}

pub(super) async fn sign_in(
    config: &FolioConfig,
    username: &str,
    password: &str,
) -> Result<(HttpCatalog, AuthPage, UserProfile)> {
    let session = SessionContext::new();
    let client = connect(config, session.clone())?;
    let mut auth = AuthPage::new(session);

    let pb = spinner("Signing in...");
    let result = auth.login(&client, username, password).await;
    pb.finish_and_clear();
    let user = result.with_context(|| format!("Failed to sign in as {}", username.trim()))?;

    tracing::info!("Signed in as {}", user.username);
    Ok((client, auth, user))
}

/// Sign in and show the account
pub async fn login(
    config: &FolioConfig,
    username: &str,
    password: &str,
    logout: bool,
) -> Result<()> {
    let (client, mut auth, user) = sign_in(config, username, password).await?;

    println!("Username:    {}", user.username);
    if !user.email.is_empty() {
        println!("Email:       {}", user.email);
    }
    if user.is_admin {
        println!("Role:        admin");
    }

    if logout {
        auth.logout(&client).await.context("Failed to sign out")?;
        println!("Signed out");
    }
    Ok(())
}

/// Create an account after checking the form locally
pub async fn register(
    config: &FolioConfig,
    username: &str,
    email: &str,
    password: &str,
    password2: &str,
) -> Result<()> {
    let session = SessionContext::new();
    let client = connect(config, session.clone())?;
    let mut auth = AuthPage::new(session);
    auth.toggle_mode();

    let form = Registration::new(username.trim(), email.trim(), password, password2);
    let pb = spinner("Registering...");
    let result = auth.register(&client, &form).await;
    pb.finish_and_clear();
    let ack = result.context("Registration failed")?;

    println!(
        "{}",
        ack.message
            .unwrap_or_else(|| format!("Registered {}", form.username))
    );
    println!("You can now sign in with `folio login`");
    Ok(())
}

/// Sign in, then show profile and borrowing statistics
pub async fn profile(
    config: &FolioConfig,
    username: &str,
    password: &str,
    json: bool,
) -> Result<()> {
    let (client, auth, user) = sign_in(config, username, password).await?;
    let mut page = ProfilePage::new(auth.session().clone());

    let pb = spinner("Fetching profile...");
    let result = page.load(&client).await;
    pb.finish_and_clear();
    result.context("Session was rejected, sign in again")?;

    if let LoadState::Failed(message) = page.load_state() {
        tracing::warn!("Profile unavailable: {}", message);
    }

    if json {
        let report = ProfileReport {
            user: &user,
            details: page.details(),
            stats: page.stats(),
            borrows: page.borrows(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Username:    {}", user.username);
    if let Some(details) = page.details() {
        if let Some(address) = &details.profile.address {
            println!("Address:     {}", address);
        }
        if let Some(phone) = details.profile.phone {
            println!("Phone:       {}", phone);
        }
        println!("Warnings:    {}", details.profile.warning);
    }
    if let Some(stats) = page.stats() {
        println!(
            "Borrowed:    {} of {} ({:.0}%)",
            stats.active_borrows,
            stats.borrow_limit,
            stats.usage_ratio() * 100.0
        );
        println!("Remaining:   {}", stats.remaining_borrow_limit);
        println!("Returned:    {}", stats.returned_borrows);
        println!("Total:       {}", stats.total_borrows);
        if stats.has_overdue() {
            println!("Overdue:     {}", stats.overdue_borrows);
        }
    }

    let now = chrono::Utc::now();
    for borrow in page.borrows() {
        let flag = if borrow.is_overdue(now) { "  overdue" } else { "" };
        println!(
            "  #{:<5} {:<40} due {}{}",
            borrow.id,
            borrow.book.name,
            borrow.return_date.format("%Y-%m-%d"),
            flag
        );
    }
    Ok(())
}
