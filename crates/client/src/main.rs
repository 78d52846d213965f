//! `conceptforge` -- command-line front end for the client stores.
//!
//! Hydrates the session and profile from local storage, runs one command,
//! and prints the result as JSON.
//!
//! # Commands
//!
//! | Command                             | Effect                                   |
//! |-------------------------------------|------------------------------------------|
//! | `login <email> <password> [role]`   | Sign in (`admin` default, or `respondent`) |
//! | `logout`                            | Sign out locally and notify the API      |
//! | `whoami`                            | Print the current session                |
//! | `profile`                           | Print the current profile                |
//! | `profile-set <field> <value>`       | Update one profile field                 |
//! | `profile-reset`                     | Clear the stored profile                 |
//!
//! Configuration comes from environment variables (see
//! [`ClientConfig::from_env`]); a `.env` file is honoured.

use conceptforge_client::{ClientConfig, ClientContext, ProfileStatus, UpdateOutcome};
use conceptforge_core::credentials::Credentials;
use conceptforge_core::profile::ProfilePatch;
use conceptforge_core::roles::Role;
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: conceptforge <login <email> <password> [role] | logout | whoami | profile | profile-set <field> <value> | profile-reset>";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "conceptforge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    let ctx = ClientContext::from_config(&config).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build client");
        std::process::exit(1);
    });

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    ctx.init().await;

    if let Err(message) = run(&ctx, &args).await {
        tracing::error!(error = %message, "Command failed");
        std::process::exit(1);
    }
}

async fn run(ctx: &ClientContext, args: &[&str]) -> Result<(), String> {
    match args {
        ["login", email, password, rest @ ..] => {
            let role = rest.first().map(|r| Role::from_name(r)).unwrap_or_default();
            let credentials = Credentials::new(*email, *password).with_role(role);
            let session = ctx
                .session
                .authenticate(credentials)
                .await
                .map_err(|e| e.to_string())?;
            print_json(&json!({
                "session": session,
                "home": ctx.session.home_route().await,
            }));
            Ok(())
        }
        ["logout"] => {
            // Local state is already cleared even when the API call failed.
            ctx.session
                .deauthenticate()
                .await
                .map_err(|e| e.to_string())?;
            print_json(&json!({ "authenticated": false }));
            Ok(())
        }
        ["whoami"] => {
            print_json(&json!({
                "authenticated": ctx.session.is_authenticated().await,
                "user": ctx.session.user().await,
                "home": ctx.session.home_route().await,
            }));
            Ok(())
        }
        ["profile"] => {
            let snapshot = ctx.profile.snapshot().await;
            match (snapshot.status, snapshot.user, snapshot.error) {
                (ProfileStatus::Ready, Some(profile), _) => {
                    print_json(&profile);
                    Ok(())
                }
                (_, _, Some(err)) => Err(err.to_string()),
                (status, _, None) => Err(format!("profile not available ({status:?})")),
            }
        }
        ["profile-set", field, value] => {
            let patch = field_patch(ctx, field, value).await?;
            match ctx.profile.update(patch).await {
                UpdateOutcome::Updated(profile) => {
                    print_json(&profile);
                    Ok(())
                }
                UpdateOutcome::Failed(err) => Err(err.to_string()),
            }
        }
        ["profile-reset"] => {
            ctx.profile.logout().await;
            print_json(&json!({ "status": ctx.profile.status().await }));
            Ok(())
        }
        _ => Err(USAGE.to_string()),
    }
}

/// Build a single-field patch. Notification flags take `true`/`false`.
async fn field_patch(
    ctx: &ClientContext,
    field: &str,
    value: &str,
) -> Result<ProfilePatch, String> {
    let text = Some(value.to_string());
    let patch = match field {
        "name" => ProfilePatch {
            name: text,
            ..Default::default()
        },
        "email" => ProfilePatch {
            email: text,
            ..Default::default()
        },
        "role" => ProfilePatch {
            role: text,
            ..Default::default()
        },
        "bio" => ProfilePatch {
            bio: text,
            ..Default::default()
        },
        "avatar-url" => ProfilePatch {
            avatar_url: text,
            ..Default::default()
        },
        "research-updates" | "weekly-digest" | "new-feedback" => {
            let enabled: bool = value
                .parse()
                .map_err(|_| format!("{field} expects true or false, got '{value}'"))?;
            let mut notifications = ctx
                .profile
                .user()
                .await
                .map(|p| p.notifications)
                .unwrap_or_default();
            match field {
                "research-updates" => notifications.research_updates = enabled,
                "weekly-digest" => notifications.weekly_digest = enabled,
                _ => notifications.new_feedback = enabled,
            }
            ProfilePatch {
                notifications: Some(notifications),
                ..Default::default()
            }
        }
        other => return Err(format!("unknown profile field '{other}'")),
    };
    Ok(patch)
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => tracing::error!(error = %e, "Failed to render output"),
    }
}
