//! Command handlers.

use anyhow::{bail, Context as AnyhowContext, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use eventdesk_client::models::{CalendarRange, EventsQuery, Page, TableQuery};
use eventdesk_client::validation::RecoverPasswordForm;
use eventdesk_client::{AuthState, EventDesk, GuardDecision, Location, LoginRedirect};

use crate::{CatalogsCommand, Commands, EventsCommand, GuestsCommand, UsersCommand};

pub async fn run(desk: &EventDesk, command: Commands, json: bool) -> Result<()> {
    match command {
        Commands::Login {
            email,
            password,
            return_to,
        } => login(desk, &email, password, return_to.as_deref(), json).await,
        Commands::Logout => {
            desk.auth().sign_out().await?;
            println!("Signed out.");
            Ok(())
        }
        Commands::Status => status(desk, json).await,
        Commands::ForgotPassword { email } => {
            let message = desk.auth().forgot_password(&email).await?;
            println!("{}", message);
            Ok(())
        }
        Commands::RecoverPassword { token, password } => {
            let form = match password {
                Some(password) => RecoverPasswordForm {
                    confirm_password: password.clone(),
                    password,
                },
                None => RecoverPasswordForm {
                    password: rpassword::prompt_password("New password: ")
                        .context("Failed to read password")?,
                    confirm_password: rpassword::prompt_password("Confirm password: ")
                        .context("Failed to read password")?,
                },
            };
            let message = desk.auth().recover_password(&token, &form).await?;
            println!("{}", message);
            Ok(())
        }
        Commands::Events { command } => events(desk, command, json).await,
        Commands::Guests { command } => guests(desk, command, json).await,
        Commands::Users { command } => users(desk, command, json).await,
        Commands::Catalogs { command } => catalogs(desk, command, json).await,
    }
}

/// Refuse to run a command whose view the session may not open.
async fn authorize(desk: &EventDesk, target: &str) -> Result<()> {
    let target = Location::parse(target);
    match desk.guard().check(&target).await {
        GuardDecision::Render(_) => Ok(()),
        GuardDecision::RedirectToLogin(redirect) => bail!(
            "Not signed in or session expired. Run `eventdesk login --email <EMAIL> --return-to {}` first.",
            redirect.return_to()
        ),
        GuardDecision::RedirectTo(landing) => bail!(
            "Your profile cannot open {}. Try {} instead.",
            target,
            landing
        ),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_page_footer<T>(page: &Page<T>) {
    println!(
        "\nPage {} of {} ({} total)",
        page.number.saturating_add(1),
        page.total_pages.max(1),
        page.total_elements
    );
}

fn format_timestamp(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

async fn login(
    desk: &EventDesk,
    email: &str,
    password: Option<String>,
    return_to: Option<&str>,
    json: bool,
) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ").context("Failed to read password")?,
    };

    let session = desk.auth().sign_in(email, &password).await?;
    let redirect = return_to.map(|raw| LoginRedirect {
        login: desk.guard().login().clone(),
        from: Location::parse(raw),
    });
    let next = desk.guard().after_login(redirect.as_ref());

    if json {
        return print_json(&serde_json::json!({
            "userId": session.user_id,
            "profile": session.profile,
            "expiresAt": session.expires_at,
            "next": next.to_string(),
        }));
    }

    println!("Signed in as user {} ({}).", session.user_id, session.profile);
    if let Some(exp) = session.expires_at {
        println!("Session expires at {}.", format_timestamp(exp));
    }
    println!("Continue at {}", next);
    Ok(())
}

async fn status(desk: &EventDesk, json: bool) -> Result<()> {
    let expired = desk.session().is_token_expired().await;
    let state = desk.session().state().await;

    if json {
        let body = match &state {
            AuthState::Authenticated(session) => serde_json::json!({
                "authenticated": true,
                "userId": session.user_id,
                "profile": session.profile,
                "expiresAt": session.expires_at,
                "expired": expired,
            }),
            AuthState::Anonymous => serde_json::json!({ "authenticated": false }),
        };
        return print_json(&body);
    }

    match state {
        AuthState::Authenticated(session) => {
            println!("  {:<12} {}", "USER", session.user_id);
            println!("  {:<12} {}", "PROFILE", session.profile);
            let expiry = session
                .expires_at
                .map(format_timestamp)
                .unwrap_or_else(|| "never".to_string());
            println!("  {:<12} {}", "EXPIRES", expiry);
            println!("  {:<12} {}", "EXPIRED", if expired { "yes" } else { "no" });
        }
        AuthState::Anonymous => println!("Not signed in."),
    }
    Ok(())
}

async fn events(desk: &EventDesk, command: EventsCommand, json: bool) -> Result<()> {
    let service = desk.events();
    match command {
        EventsCommand::List {
            keyword,
            from,
            to,
            sort_by,
            order,
            page,
            size,
        } => {
            authorize(desk, "/events").await?;
            let query = EventsQuery {
                keyword,
                date_init: from,
                date_end: to,
                sort_by,
                order,
                page: Some(page),
                size: Some(size),
            };
            let page = service.page(&query).await?;
            if json {
                return print_json(&page);
            }
            println!("{:<38} {:<12} {:<6} {:<30} {:<20}", "ID", "DATE", "TIME", "TITLE", "OWNER");
            for event in &page.content {
                println!(
                    "{:<38} {:<12} {:<6} {:<30} {:<20}",
                    event.id,
                    event.date,
                    event.time,
                    event.title,
                    event.user_dto.full_name()
                );
            }
            print_page_footer(&page);
        }
        EventsCommand::Get { id } => {
            authorize(desk, &format!("/events/{}", id)).await?;
            let event = service.get(&id).await?;
            if json {
                return print_json(&event);
            }
            println!("{} ({} {})", event.title, event.date, event.time);
            println!("  Owner:    {}", event.user_dto.full_name());
            println!("  Group:    {}", event.event_group_dto.title);
            println!("  Package:  {}", event.package_dto.title);
            println!("  Guests:   up to {} (+{} escorts)", event.limit_guests, event.escorts_limit);
            for slug in &event.slugs {
                println!("  Link:     {}", slug.slug);
            }
        }
        EventsCommand::Delete { id } => {
            authorize(desk, "/events").await?;
            println!("{}", service.delete(&id).await?);
        }
        EventsCommand::Calendar { from, to } => {
            authorize(desk, "/calendar").await?;
            if to < from {
                bail!("--to must not be before --from");
            }
            let entries = service
                .calendar(CalendarRange {
                    date_begin: from,
                    date_end: to,
                })
                .await?;
            if json {
                return print_json(&entries);
            }
            for entry in &entries {
                println!("{} {:<6} {}", entry.date, entry.time, entry.title);
            }
            if entries.is_empty() {
                println!("No events between {} and {}.", from, to);
            }
        }
        EventsCommand::Stats { id } => {
            authorize(desk, &format!("/events/{}", id)).await?;
            let stats = service.stats(&id).await?;
            if json {
                return print_json(&stats);
            }
            println!("{} ({} {})", stats.title, stats.date, stats.time);
            println!("  Total:         {}", stats.total_guests);
            println!("  Assisting:     {}", stats.total_assisting);
            println!("  Not assisting: {}", stats.total_not_assisting);
            println!("  Unconfirmed:   {}", stats.total_unconfirmed);
        }
    }
    Ok(())
}

async fn guests(desk: &EventDesk, command: GuestsCommand, json: bool) -> Result<()> {
    let service = desk.guests();
    match command {
        GuestsCommand::List {
            event_id,
            keyword,
            page,
            size,
        } => {
            authorize(desk, &format!("/events/{}", event_id)).await?;
            let mut query = TableQuery::page(page, size);
            query.keyword = keyword;
            let page = service.page(&event_id, &query).await?;
            if json {
                return print_json(&page);
            }
            println!("{:<38} {:<30} {:<12} {:<8}", "ID", "NAME", "PHONE", "ESCORTS");
            for guest in &page.content {
                println!(
                    "{:<38} {:<30} {:<12} {:<8}",
                    guest.id,
                    format!("{} {}", guest.name, guest.paternal_surname),
                    guest.phone_number,
                    guest.escorts
                );
            }
            print_page_footer(&page);
        }
        GuestsCommand::Get { event_id, guest_id } => {
            authorize(desk, &format!("/events/{}", event_id)).await?;
            let guest = service.get(&event_id, &guest_id).await?;
            if json {
                return print_json(&guest);
            }
            println!("{} {} {}", guest.name, guest.paternal_surname, guest.maternal_surname);
            println!("  Phone:      {}", guest.phone_number);
            println!("  Escorts:    {}", guest.escorts);
            println!("  Assistance: {:?}", guest.assistance());
            if !guest.notes.is_empty() {
                println!("  Notes:      {}", guest.notes);
            }
        }
        GuestsCommand::Delete { event_id, guest_id } => {
            authorize(desk, &format!("/events/{}", event_id)).await?;
            println!("{}", service.delete(&event_id, &guest_id).await?);
        }
    }
    Ok(())
}

async fn users(desk: &EventDesk, command: UsersCommand, json: bool) -> Result<()> {
    authorize(desk, "/users").await?;
    let service = desk.users();
    match command {
        UsersCommand::List {
            keyword,
            page,
            size,
        } => {
            let mut query = TableQuery::page(page, size);
            query.keyword = keyword;
            let page = service.page(&query).await?;
            if json {
                return print_json(&page);
            }
            println!("{:<8} {:<30} {:<30} {:<8}", "ID", "NAME", "EMAIL", "PROFILE");
            for user in &page.content {
                println!(
                    "{:<8} {:<30} {:<30} {:<8}",
                    user.id,
                    user.full_name(),
                    user.email,
                    user.profile
                );
            }
            print_page_footer(&page);
        }
        UsersCommand::Get { id } => {
            let user = service.get(id).await?;
            if json {
                return print_json(&user);
            }
            println!("{} <{}>", user.full_name(), user.email);
            println!("  Profile: {}", user.profile);
            println!("  Phone:   +{} {}", user.person.state_code, user.person.phone);
        }
    }
    Ok(())
}

async fn catalogs(desk: &EventDesk, command: CatalogsCommand, json: bool) -> Result<()> {
    authorize(desk, "/catalogs").await?;
    match command {
        CatalogsCommand::List { kind } => {
            let entries = desk.catalogs().select(&kind).await?;
            if json {
                return print_json(&entries);
            }
            println!("{:<8} {:<40}", "ID", "TITLE");
            for entry in &entries {
                println!("{:<8} {:<40}", entry.id(), entry.title());
            }
        }
    }
    Ok(())
}
