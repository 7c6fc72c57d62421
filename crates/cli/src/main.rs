//! StoreDesk CLI - Back office and shop from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in; the session is kept in the state directory
//! storedesk login -e admin@example.com
//!
//! # Back office
//! storedesk categories list --search shoes
//! storedesk employees add --name "Asha Rao" --phone 9876543210 --gender Female \
//!     --address "12 MG Road" --department Sales
//!
//! # Shop and checkout
//! storedesk cart add 66f1c0
//! storedesk checkout start
//! storedesk checkout address --address "12 MG Road" --city Bengaluru \
//!     --state KA --zip 560001 --country India
//! storedesk checkout shipping express
//! storedesk checkout confirm
//! ```
//!
//! # Environment Variables
//!
//! - `STOREDESK_API_URL` - Backend base URL
//! - `STOREDESK_STATE_DIR` - Where the session, cart and checkout are kept
//! - `STOREDESK_PAYMENT_KEY_ID` - Payment gateway public key id
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT` - Error tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use storedesk_client::{App, ClientConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::CliError;

#[derive(Parser)]
#[command(name = "storedesk")]
#[command(author, version, about = "StoreDesk back office and shop")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "STOREDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the session, landing route and menu
    Whoami,
    /// Resolve a route path against the session
    Open {
        /// Route path, e.g. `/purchase`
        path: String,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "STOREDESK_PASSWORD", hide_env_values = true)]
        password: String,

        /// `admin`, `user` or `user2`
        #[arg(short, long)]
        role: Option<String>,
    },
    /// Send a password reset link
    ForgotPassword {
        #[arg(short, long)]
        email: String,
    },
    /// Set a new password with the token from a reset link
    ResetPassword {
        #[arg(short, long)]
        token: String,

        #[arg(short, long, env = "STOREDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Browse and add shop products
    Products {
        #[command(subcommand)]
        action: commands::catalog::ProductAction,
    },
    /// Edit the product catalogue
    Classes {
        #[command(subcommand)]
        action: commands::catalog::ClassAction,
    },
    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: commands::categories::CategoryAction,
    },
    /// Manage employees
    Employees {
        #[command(subcommand)]
        action: commands::employees::EmployeeAction,
    },
    /// Manage accounts
    Users {
        #[command(subcommand)]
        action: commands::users::UserAction,
    },
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: commands::shop::CartAction,
    },
    /// Walk through checkout
    Checkout {
        #[command(subcommand)]
        action: commands::shop::CheckoutAction,
    },
    /// Class fee payments and payment history
    Payments {
        #[command(subcommand)]
        action: commands::payments::PaymentAction,
    },
    /// List placed orders
    Orders,
    /// Show the dashboard charts
    Dashboard,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::debug!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = ClientConfig::from_env();

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storedesk_client=info,storedesk_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(CliError::from(storedesk_client::AppError::from(e))),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), CliError> {
    let mut app = App::open(config).await?;

    let result = match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&mut app, &email, &password).await
        }
        Commands::Logout => commands::auth::logout(&mut app).await,
        Commands::Whoami => {
            commands::auth::whoami(&app);
            Ok(())
        }
        Commands::Open { path } => {
            commands::auth::open(&app, &path);
            Ok(())
        }
        Commands::Register {
            email,
            password,
            role,
        } => commands::auth::register(&mut app, &email, &password, role.as_deref()).await,
        Commands::ForgotPassword { email } => commands::auth::forgot_password(&mut app, &email).await,
        Commands::ResetPassword { token, password } => {
            commands::auth::reset_password(&mut app, &token, &password).await
        }
        Commands::Products { action } => commands::catalog::products(&app, action).await,
        Commands::Classes { action } => commands::catalog::classes(&app, action).await,
        Commands::Categories { action } => commands::categories::run(&app, action).await,
        Commands::Employees { action } => commands::employees::run(&app, action).await,
        Commands::Users { action } => commands::users::run(&app, action).await,
        Commands::Cart { action } => commands::shop::cart(&mut app, action).await,
        Commands::Checkout { action } => commands::shop::checkout(&mut app, action).await,
        Commands::Payments { action } => commands::payments::run(&app, action).await,
        Commands::Orders => commands::shop::orders(&app).await,
        Commands::Dashboard => commands::dashboard::show(&app).await,
    };

    output::notices(&app.notifier().drain());
    result
}
