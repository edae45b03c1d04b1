//! `DevClub` command-line client
//!
//! Drives the same flows as the web front end against a running backend:
//! member registration with email verification, admin sign-in, the admin
//! dashboard and the back-office screens.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

mod console;
mod rows;

use chrono::Utc;
use clap::{Parser, Subcommand};
use console::{ConsoleNotifier, Output, table};
use devclub_client::content::page_for;
use devclub_client::dashboard::DashboardState;
use devclub_client::routes::{self, Route};
use devclub_client::screens::{
    Announcement, BlogPost, EventItem, Member, RegistrationRecord, Resource, ResourceScreen,
    ScreenKind,
};
use devclub_client::{
    AdminAuthFlow, ApiClient, Dashboard, FileTokenStore, HistoryNavigator, MountGuard, Notifier,
    RegistrationFlow, RegistrationState, SessionContext,
};
use devclub_core::types::RegistrationDraft;
use devclub_core::utils::mask_token;
use devclub_core::{Config, Error, Result};
use rows::Row;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

/// Command line interface for the `DevClub` client
#[derive(Parser)]
#[command(
    name = "devclub",
    version = env!("CARGO_PKG_VERSION"),
    about = "DevClub membership and administration client",
    long_about = "Register as a member, verify your email, and manage the club from the command line."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Register as a member, then enter the emailed code
    Register(RegisterArgs),

    /// Verify an email with a code received earlier
    Verify {
        /// Email the code was sent to
        #[arg(long)]
        email: String,

        /// Verification code
        #[arg(long)]
        code: String,
    },

    /// Sign in as an administrator
    Login {
        /// Admin email
        #[arg(long)]
        email: String,

        /// Admin password
        #[arg(long, env = "DEVCLUB_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and forget the stored token
    Logout,

    /// Show the signed-in admin
    Whoami,

    /// Show the admin dashboard
    Dashboard {
        /// Number of recent logins to list
        #[arg(long, default_value = "5")]
        logins: usize,
    },

    /// List communes, optionally of one wilaya
    Cities {
        /// Wilaya code
        #[arg(long)]
        wilaya: Option<String>,
    },

    /// List faculties
    Faculties,

    /// List the departments of a faculty
    Departments {
        /// Faculty id
        #[arg(value_name = "FACULTY_ID")]
        faculty_id: i64,
    },

    /// Browse an admin screen
    Screen {
        /// members, events, announcements, blog or registrations
        #[arg(value_name = "KIND")]
        kind: ScreenKind,

        /// Case-insensitive search text
        #[arg(short, long, default_value = "")]
        search: String,

        /// Facet filter as key=value; repeatable, `all` clears
        #[arg(short, long, value_name = "KEY=VALUE", value_parser = parse_filter)]
        filter: Vec<(String, String)>,
    },

    /// Resolve a path through the route table and admin guard
    Route {
        /// Path such as /admin/members
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Print a public page
    Page {
        /// Path such as /about
        #[arg(value_name = "PATH", default_value = "/")]
        path: String,
    },

    /// Inspect configuration
    Config {
        /// Show resolved configuration
        #[arg(short, long)]
        show: bool,
    },
}

/// Registration form fields
#[derive(clap::Args)]
struct RegisterArgs {
    /// Student registration number
    #[arg(long)]
    registration_number: String,

    /// Registration year; defaults to the current year
    #[arg(long)]
    year: Option<String>,

    /// Full name
    #[arg(long)]
    name: String,

    /// Email address; the code is sent here
    #[arg(long)]
    email: String,

    /// Account password
    #[arg(long, env = "DEVCLUB_PASSWORD", hide_env_values = true)]
    password: String,

    /// Wilaya code
    #[arg(long)]
    wilaya: String,

    /// Commune name
    #[arg(long)]
    commune: String,

    /// Faculty id
    #[arg(long)]
    faculty: i64,

    /// Department id
    #[arg(long)]
    department: i64,

    /// Study level, e.g. L2
    #[arg(long)]
    level: String,

    /// Stop after registering instead of prompting for the code
    #[arg(long)]
    no_verify: bool,
}

impl RegisterArgs {
    fn into_draft(self) -> RegistrationDraft {
        let defaults = RegistrationDraft::default();
        RegistrationDraft {
            registration_number: self.registration_number,
            registration_year: self.year.unwrap_or(defaults.registration_year),
            full_name: self.name,
            email: self.email,
            password: self.password,
            wilaya_code: self.wilaya,
            commune_name: self.commune,
            faculty_id: Some(self.faculty),
            department_id: Some(self.department),
            level: self.level,
        }
    }
}

/// Parse a `key=value` facet filter
fn parse_filter(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))
}

/// Everything a command needs
struct App {
    config: Config,
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    output: Output,
}

/// Main entry point for the CLI
///
/// Failures already shown as a notice are not printed again; the exit code
/// is non-zero either way.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let console = Arc::new(ConsoleNotifier::default());

    match run(cli, console.clone()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            console.report_failure(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, console: Arc<ConsoleNotifier>) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    devclub_core::init_logging(&config.logging)?;

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.api.base_url,
        "DevClub client starting"
    );

    let store = Arc::new(FileTokenStore::new(config.session.token_file.clone()));
    let session = SessionContext::new(store, Arc::new(HistoryNavigator::default()));
    let api = ApiClient::from_config(&config, session)?;
    let app = App {
        config,
        api,
        notifier: console,
        output: Output::new(cli.json),
    };

    match cli.command {
        Commands::Register(args) => register(&app, args).await,
        Commands::Verify { email, code } => verify(&app, &email, &code).await,
        Commands::Login { email, password } => login(&app, &email, &password).await,
        Commands::Logout => logout(&app),
        Commands::Whoami => whoami(&app).await,
        Commands::Dashboard { logins } => dashboard(&app, logins).await,
        Commands::Cities { wilaya } => cities(&app, wilaya.as_deref()).await,
        Commands::Faculties => faculties(&app).await,
        Commands::Departments { faculty_id } => departments(&app, faculty_id).await,
        Commands::Screen {
            kind,
            search,
            filter,
        } => screen(&app, kind, &search, &filter),
        Commands::Route { path } => resolve_route(&app, &path),
        Commands::Page { path } => page(&app, &path),
        Commands::Config { show } => handle_config_command(&app.config, show),
    }
}

/// Submit a registration and, unless told otherwise, read the code from stdin
async fn register(app: &App, args: RegisterArgs) -> Result<()> {
    let no_verify = args.no_verify;
    let mut flow =
        RegistrationFlow::with_settings(app.api.clone(), app.notifier.clone(), &app.config.registration);
    flow.set_draft(args.into_draft());

    let (score, label) = flow.password_strength();
    info!(score, "Password strength: {}", label);

    let started = Utc::now();
    flow.submit(started).await?;

    if no_verify {
        println!(
            "Check your inbox, then run: devclub verify --email {} --code <CODE>",
            flow.draft().email
        );
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while flow.state() == RegistrationState::AwaitingOtp {
        eprint!(
            "Verification code ({} left, blank to quit): ",
            flow.countdown().display(Utc::now())
        );
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            break;
        }
        // A short or wrong code is reported by a notice and prompted again
        if flow.submit_otp(&line).await.is_err() {
            continue;
        }
    }

    let state = flow.state();
    app.output.emit(&state, format!("Registration state: {state:?}"))
}

/// Verify a code outside the interactive registration prompt
async fn verify(app: &App, email: &str, code: &str) -> Result<()> {
    let mut flow =
        RegistrationFlow::with_settings(app.api.clone(), app.notifier.clone(), &app.config.registration);
    flow.resume(email);
    let state = flow.submit_otp(code).await?;
    app.output.emit(
        &serde_json::json!({"verified": state == RegistrationState::Verified}),
        "Account verified successfully",
    )
}

async fn login(app: &App, email: &str, password: &str) -> Result<()> {
    let auth = AdminAuthFlow::new(app.api.clone(), app.notifier.clone());
    auth.login(email, password).await?;
    let token = app.api.session().token().unwrap_or_default();
    app.output.emit(
        &serde_json::json!({"signed_in": true}),
        format!("Signed in, token {}", mask_token(&token)),
    )
}

fn logout(app: &App) -> Result<()> {
    let auth = AdminAuthFlow::new(app.api.clone(), app.notifier.clone());
    auth.logout()
}

async fn whoami(app: &App) -> Result<()> {
    let profile = app.api.get_admin_profile().await?;
    let role = if profile.is_super_admin {
        "super admin"
    } else {
        "admin"
    };
    app.output.emit(
        &profile,
        format!("{} <{}> ({role})", profile.full_name, profile.email),
    )
}

async fn dashboard(app: &App, logins: usize) -> Result<()> {
    let screen = Dashboard::new(app.api.clone(), app.notifier.clone());
    match screen.bootstrap(&MountGuard::new()).await {
        DashboardState::Ready(data) => {
            let cards = data.summary_cards();
            let recent = data.recent_logins(logins);

            let mut text = format!("Welcome, {}\n\n", data.profile.full_name);
            let card_rows: Vec<Vec<String>> = cards
                .iter()
                .map(|c| vec![c.label.to_string(), c.value.to_string(), c.detail.clone()])
                .collect();
            text.push_str(&table(&["Metric", "Total", "Detail"], &card_rows));
            text.push_str("\n\nRecent logins\n");
            let login_rows: Vec<Vec<String>> = recent
                .iter()
                .map(|e| {
                    vec![
                        e.login_time.format("%Y-%m-%d %H:%M").to_string(),
                        e.ip_address.clone().unwrap_or_default(),
                        e.user_agent.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            text.push_str(&table(&["When", "IP", "User agent"], &login_rows));

            app.output.emit(&data, text)
        }
        DashboardState::Redirected => Err(Error::Authentication(
            "Please log in again to continue".to_string(),
        )),
        DashboardState::Failed(e) => Err(e),
        DashboardState::Abandoned => Ok(()),
    }
}

async fn cities(app: &App, wilaya: Option<&str>) -> Result<()> {
    let cities = match wilaya {
        Some(code) => app.api.get_cities_by_wilaya(code).await?,
        None => app.api.get_cities().await?,
    };
    let rows: Vec<Vec<String>> = cities
        .iter()
        .map(|c| {
            vec![
                c.wilaya_code.clone(),
                c.wilaya_name.clone(),
                c.commune_name.clone(),
            ]
        })
        .collect();
    app.output
        .emit(&cities, table(&["Wilaya", "Name", "Commune"], &rows))
}

async fn faculties(app: &App) -> Result<()> {
    let faculties = app.api.get_faculties().await?;
    let rows: Vec<Vec<String>> = faculties
        .iter()
        .map(|f| vec![f.id.to_string(), f.faculty_name.clone()])
        .collect();
    app.output.emit(&faculties, table(&["ID", "Faculty"], &rows))
}

async fn departments(app: &App, faculty_id: i64) -> Result<()> {
    let departments = app.api.get_departments_by_faculty(faculty_id).await?;
    let rows: Vec<Vec<String>> = departments
        .iter()
        .map(|d| vec![d.id.to_string(), d.department_name.clone()])
        .collect();
    app.output
        .emit(&departments, table(&["ID", "Department"], &rows))
}

/// Admin screens sit behind the same guard as in the browser
fn screen(app: &App, kind: ScreenKind, search: &str, filters: &[(String, String)]) -> Result<()> {
    let landed = app.api.session().enter(kind.route());
    if landed != kind.route() {
        return Err(Error::Authentication("Not authenticated".to_string()));
    }

    match kind {
        ScreenKind::Members => show_screen::<Member>(app, search, filters),
        ScreenKind::Events => show_screen::<EventItem>(app, search, filters),
        ScreenKind::Announcements => show_screen::<Announcement>(app, search, filters),
        ScreenKind::Blog => show_screen::<BlogPost>(app, search, filters),
        ScreenKind::Registrations => show_screen::<RegistrationRecord>(app, search, filters),
    }
}

fn show_screen<T: Resource + Row>(
    app: &App,
    search: &str,
    filters: &[(String, String)],
) -> Result<()> {
    let mut screen: ResourceScreen<T> = ResourceScreen::seeded(app.notifier.clone());
    screen.set_query(search);
    for (key, value) in filters {
        screen.set_facet(key, value)?;
    }

    let visible = screen.visible();
    let rows: Vec<Vec<String>> = visible.iter().map(|item| item.cells()).collect();
    let text = format!(
        "{}\n{} of {} shown",
        table(T::HEADERS, &rows),
        visible.len(),
        screen.items().len()
    );
    app.output.emit(&visible, text)
}

fn resolve_route(app: &App, path: &str) -> Result<()> {
    let requested = Route::from_path(path);
    let landed = app.api.session().enter(requested);
    let links = routes::links_for(landed);

    if app.output.is_json() {
        let links: Vec<serde_json::Value> = links
            .iter()
            .map(|l| serde_json::json!({"label": l.label, "path": l.path}))
            .collect();
        return app.output.emit(
            &serde_json::json!({
                "requested": requested,
                "route": landed,
                "path": landed.path(),
                "chrome": landed.chrome(),
                "links": links,
            }),
            "",
        );
    }

    let mut text = format!("{} -> {} ({})", path, landed.path(), landed.title());
    for link in links {
        text.push_str(&format!("\n  {:<14} {}", link.label, link.path));
    }
    app.output.emit(&landed, text)
}

fn page(app: &App, path: &str) -> Result<()> {
    let route = Route::from_path(path);
    let page = page_for(route).ok_or_else(|| {
        Error::validation("path", format!("{} has no static content", route.path()))
    })?;
    app.output.emit(&page, &page)
}

/// Show configuration as TOML
///
/// # Errors
///
/// Returns error if configuration cannot be serialized
fn show_config(config: &Config) -> Result<()> {
    let config_toml = toml::to_string_pretty(config).map_err(|e| Error::Configuration {
        message: format!("Failed to serialize configuration: {e}"),
    })?;
    println!("{config_toml}");
    Ok(())
}

/// Handle configuration commands
fn handle_config_command(config: &Config, show: bool) -> Result<()> {
    config.validate()?;
    if show {
        show_config(config)?;
    } else {
        println!("Configuration is valid");
    }
    Ok(())
}
