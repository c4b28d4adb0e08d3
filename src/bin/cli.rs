//! Comics Timeline CLI
//!
//! Command-line front end for the comics timeline service:
//! - Log in and out, register, verify e-mail
//! - Inspect the current session
//! - Browse eras and sub-eras
//! - Manage the theme preference and config file
//!
//! # Configuration
//!
//! Settings come from `--config`, the default config locations, or the
//! environment (`COMICS_TIMELINE_*`, see `comics-timeline config`).
//! `RUST_LOG` takes precedence over the configured log level.

use anyhow::Context;
use clap::{Parser, Subcommand};
use comics_timeline::config::{generate_default_config, LoggingConfig};
use comics_timeline::{AppContext, Config, Era, Notification, NotificationKind, Theme, User};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "comics-timeline")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Browse the comics timeline and manage your account")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: platform config dir, then ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and persist the session
    Login {
        username: String,
        /// Password
        #[arg(short, long, env = "COMICS_TIMELINE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log out and forget the stored credential
    Logout,

    /// Create an account
    Register {
        username: String,
        email: String,
        /// Password
        #[arg(short, long, env = "COMICS_TIMELINE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show the logged-in user's profile
    Whoami,

    /// Show session and connection status
    Status,

    /// Redeem an e-mail verification code
    VerifyEmail {
        /// Code from the verification e-mail
        code: String,
    },

    /// Send a new verification e-mail
    ResendVerification { email: String },

    /// Change the password of the logged-in user
    ChangePassword {
        /// Current password
        #[arg(long, env = "COMICS_TIMELINE_PASSWORD", hide_env_values = true)]
        current: String,
        /// New password
        #[arg(long, env = "COMICS_TIMELINE_NEW_PASSWORD", hide_env_values = true)]
        new: String,
    },

    /// List eras
    Eras {
        /// Publisher (e.g. DC, Marvel)
        #[arg(short, long)]
        publisher: Option<String>,
        /// Earliest year
        #[arg(long)]
        start_year: Option<i32>,
        /// Latest year
        #[arg(long)]
        end_year: Option<i32>,
    },

    /// List sub-eras of an era
    Suberas {
        /// Publisher (e.g. DC, Marvel)
        #[arg(short, long)]
        publisher: Option<String>,
        /// Era title
        #[arg(short, long)]
        era: Option<String>,
    },

    /// Show or change the theme (dark, light, toggle)
    Theme { value: Option<String> },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_config(output.as_ref());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_logging(&config.logging);

    let ctx = AppContext::from_config(&config).context("Failed to initialise client")?;
    let phase = ctx.init().await;
    tracing::debug!(%phase, "Session ready");

    let json = cli.format == "json";

    match cli.command {
        Commands::Login { username, password } => {
            match ctx.auth.login(&username, &password).await {
                Ok(_) => ctx
                    .notifications
                    .show_success(format!("Welcome back, {}!", ctx.session().display_name())),
                Err(e) => ctx.notifications.show_error(e.user_message()),
            }
            report(&ctx);
        }

        Commands::Logout => {
            ctx.auth.logout().await;
            ctx.notifications.show_info("Logged out");
            report(&ctx);
        }

        Commands::Register {
            username,
            email,
            password,
        } => {
            match ctx.auth.register(&username, &email, &password).await {
                Ok(response) if response.verification_sent => ctx.notifications.show_success(
                    format!("{} Check {} for a verification code.", response.message, email),
                ),
                Ok(response) => ctx.notifications.show_success(response.message),
                Err(e) => ctx.notifications.show_error(e.user_message()),
            }
            report(&ctx);
        }

        Commands::Whoami => match ctx.session().user() {
            Some(user) if json => println!("{}", serde_json::to_string_pretty(&user)?),
            Some(user) => print_user(&user),
            None => {
                ctx.notifications.show_warning("Not logged in");
                report(&ctx);
            }
        },

        Commands::Status => {
            let state = ctx.session().snapshot();
            if json {
                let status = serde_json::json!({
                    "phase": state.phase().to_string(),
                    "user": state.user,
                    "auth_url": config.api.auth_url,
                    "timeline_url": config.api.timeline_url,
                    "theme": ctx.theme.load().as_str(),
                });
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("Comics Timeline v{}", env!("CARGO_PKG_VERSION"));
                println!();
                println!("Session: {}", state.phase());
                println!("User:    {}", state.display_name());
                if state.is_logged_in() {
                    println!("Admin:   {}", state.is_admin());
                    println!("Email verified: {}", state.is_email_verified());
                }
                println!();
                println!("Auth API:     {}", config.api.auth_url);
                println!("Timeline API: {}", config.api.timeline_url);
                println!("Theme:        {}", ctx.theme.load());
            }
        }

        Commands::VerifyEmail { code } => {
            let outcome = ctx.auth.verify_email(&code).await;
            if outcome.is_success() {
                ctx.notifications.show_success(outcome.message());
            } else {
                ctx.notifications.show_error(outcome.message());
            }
            report(&ctx);
        }

        Commands::ResendVerification { email } => {
            match ctx.auth.resend_verification_email(&email).await {
                Ok(response) => ctx
                    .notifications
                    .show_success(or_default(response.message, "Verification e-mail sent")),
                Err(e) => ctx.notifications.show_error(e.user_message()),
            }
            report(&ctx);
        }

        Commands::ChangePassword { current, new } => {
            if !ctx.session().is_logged_in() {
                ctx.notifications.show_warning("Log in first");
            } else {
                match ctx.auth.change_password(&current, &new).await {
                    Ok(response) => ctx
                        .notifications
                        .show_success(or_default(response.message, "Password changed")),
                    Err(e) => ctx.notifications.show_error(e.user_message()),
                }
            }
            report(&ctx);
        }

        Commands::Eras {
            publisher,
            start_year,
            end_year,
        } => {
            let eras = ctx
                .timeline
                .get_eras(publisher.as_deref(), start_year, end_year)
                .await;

            match eras {
                Ok(eras) if json => println!("{}", serde_json::to_string_pretty(&eras)?),
                Ok(eras) => print_eras(&eras),
                Err(e) => {
                    ctx.notifications.show_error(e.user_message());
                    report(&ctx);
                }
            }
        }

        Commands::Suberas { publisher, era } => {
            let suberas = ctx
                .timeline
                .get_suberas(publisher.as_deref(), era.as_deref())
                .await;

            match suberas {
                Ok(suberas) if json => println!("{}", serde_json::to_string_pretty(&suberas)?),
                Ok(suberas) => print_suberas(&suberas),
                Err(e) => {
                    ctx.notifications.show_error(e.user_message());
                    report(&ctx);
                }
            }
        }

        Commands::Theme { value } => {
            let theme = match value.as_deref() {
                None => ctx.theme.load(),
                Some("toggle") => ctx.theme.toggle()?,
                Some(s) => {
                    let theme: Theme = s.parse().map_err(anyhow::Error::msg)?;
                    ctx.theme.set(theme)?;
                    theme
                }
            };
            println!("Theme: {}", theme);
        }

        Commands::Config { .. } => unreachable!("handled before bootstrap"),
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("comics_timeline={}", config.level)));

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so `--format json` output stays parseable
    if config.format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn write_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let config = generate_default_config();

    match output {
        Some(path) => {
            // Create parent directory if needed
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)
                .with_context(|| format!("Failed to write config to {:?}", path))?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", config);
        }
    }

    Ok(())
}

/// Print the visible notification; an error notification fails the process
fn report(ctx: &AppContext) {
    let Some(Notification { message, kind, .. }) = ctx.notifications.current() else {
        return;
    };

    match kind {
        NotificationKind::Error => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
        NotificationKind::Warning => eprintln!("{}", message),
        NotificationKind::Success | NotificationKind::Info => println!("{}", message),
    }

    ctx.notifications.dismiss();
}

/// Acknowledgements may come back without a message
fn or_default(message: String, fallback: &str) -> String {
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

fn print_user(user: &User) {
    println!("Username:  {}", user.username);
    println!("Email:     {}", user.email);
    println!("Verified:  {}", user.is_email_verified);
    println!("Admin:     {}", user.is_admin);
    println!("Active:    {}", user.is_active);
    println!("Joined:    {}", user.created_at.format("%Y-%m-%d"));
    if let Some(last) = user.last_login {
        println!("Last seen: {}", last.format("%Y-%m-%d %H:%M"));
    }
}

fn print_eras(eras: &[Era]) {
    if eras.is_empty() {
        println!("No eras match the selected filters");
        return;
    }

    println!("{:<6} {:<40} {:<11} {}", "ID", "Title", "Years", "Ending event");
    println!("{}", "-".repeat(80));

    for era in eras {
        println!(
            "{:<6} {:<40} {:<11} {}",
            era.id,
            era.title,
            format!("{}-{}", era.start_year(), era.end_year()),
            era.ending_event.as_deref().unwrap_or("-")
        );
    }
}

fn print_suberas(suberas: &[serde_json::Value]) {
    if suberas.is_empty() {
        println!("No sub-eras found");
        return;
    }

    for subera in suberas {
        let title = subera["title"]
            .as_str()
            .or_else(|| subera["name"].as_str())
            .unwrap_or("-");
        match subera["years"].as_array().map(Vec::as_slice) {
            Some([start, end]) => println!("{:<40} {}-{}", title, start, end),
            _ => println!("{}", title),
        }
    }
}
