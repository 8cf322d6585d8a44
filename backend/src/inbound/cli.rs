//! Command-line driver for the session core.
//!
//! Each invocation opens one browsing context over the JSON storage file,
//! runs a single command and prints `key=value` lines.

use std::io::Write;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use zeroize::Zeroizing;

use crate::domain::ports::KeyValueStore;
use crate::domain::{
    AuthController, AuthPorts, Catalogue, HeaderSync, IdentityDirectory, LoginOutcome,
    PasswordStrength, ProductFilter, SessionEvents, SignupForm, SignupOutcome, Wishlist,
};
use crate::outbound::simulated_backend::SimulatedAuthBackend;
use crate::outbound::storage::FileStorage;
use crate::outbound::tracing_ui::{
    FixedConfirmation, TracingHeaderMount, TracingNavigator, TracingNotifier,
};
use crate::settings::AuthSettings;

/// `mivo` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mivo",
    about = "Drive the MIVO account session core against a local storage file",
    version
)]
pub struct Cli {
    /// Storage file. Falls back to `MIVO_STORAGE_PATH`, then `mivo-storage.json`.
    #[arg(long = "storage", value_name = "path", global = true)]
    pub storage: Option<std::path::PathBuf>,
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Log in with an account id.
    Login {
        /// Account id; case is ignored.
        id: String,
    },
    /// Register a new account.
    Signup(SignupArgs),
    /// End the current session.
    Logout {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Print the current session.
    Whoami,
    /// Print the header for the current session.
    Header,
    /// Score a password.
    Strength {
        /// Password to score.
        password: String,
    },
    /// List products, optionally filtered by category.
    Products {
        /// `all`, `energi`, `pertanian` or `industri`.
        #[arg(long, default_value = "all")]
        filter: String,
        /// Append each product's description.
        #[arg(long)]
        details: bool,
    },
    /// Show or change the wishlist.
    Wishlist {
        /// Product id to add or remove; lists the wishlist when omitted.
        toggle: Option<String>,
    },
}

/// Signup form fields.
#[derive(Debug, Clone, Args)]
pub struct SignupArgs {
    /// Desired account id.
    #[arg(long)]
    pub id: String,
    /// Full name.
    #[arg(long)]
    pub name: String,
    /// Email address.
    #[arg(long)]
    pub email: String,
    /// Phone number.
    #[arg(long, default_value = "")]
    pub phone: String,
    /// `Admin` or `Pengguna`.
    #[arg(long)]
    pub role: String,
    /// Password.
    #[arg(long)]
    pub password: String,
    /// Password confirmation; defaults to the password.
    #[arg(long)]
    pub confirm: Option<String>,
    /// Accept the terms and conditions.
    #[arg(long)]
    pub agree_terms: bool,
    /// Subscribe to the newsletter.
    #[arg(long)]
    pub newsletter: bool,
}

impl From<SignupArgs> for SignupForm {
    fn from(args: SignupArgs) -> Self {
        let confirm = args.confirm.unwrap_or_else(|| args.password.clone());
        Self {
            user_id: args.id,
            full_name: args.name,
            email: args.email,
            phone: args.phone,
            role: args.role,
            password: Zeroizing::new(args.password),
            confirm_password: Zeroizing::new(confirm),
            agree_terms: args.agree_terms,
            newsletter: args.newsletter,
        }
    }
}

struct Page {
    store: Arc<dyn KeyValueStore>,
    controller: AuthController,
}

fn open_page(storage: Arc<dyn KeyValueStore>, settings: &AuthSettings) -> Page {
    let backend = SimulatedAuthBackend::new(
        IdentityDirectory::new(Arc::clone(&storage)),
        settings.latency_profile(),
    );
    let ports = AuthPorts {
        backend: Arc::new(backend),
        navigator: Arc::new(TracingNavigator),
        notifier: Arc::new(TracingNotifier),
        clock: Arc::new(DefaultClock),
    };
    let controller = AuthController::new(Arc::clone(&storage), SessionEvents::default(), ports)
        .with_timings(settings.flow_timings());
    Page {
        store: storage,
        controller,
    }
}

/// Open the storage file named by `cli` or `settings` and run the command.
pub async fn run(cli: Cli, settings: &AuthSettings, out: &mut dyn Write) -> Result<()> {
    let path = cli.storage.clone().unwrap_or_else(|| settings.storage_path());
    let storage = FileStorage::open(&path)
        .wrap_err_with(|| format!("open storage at {}", path.display()))?;
    execute(cli.command, Arc::new(storage), settings, out).await
}

/// Run `command` against `storage`.
pub async fn execute(
    command: Command,
    storage: Arc<dyn KeyValueStore>,
    settings: &AuthSettings,
    out: &mut dyn Write,
) -> Result<()> {
    let page = open_page(storage, settings);
    let controller = &page.controller;

    match command {
        Command::Login { id } => match controller.login(&id).await {
            LoginOutcome::Success(session) => {
                writeln!(out, "status=success")?;
                writeln!(out, "user_id={}", session.user_id())?;
                writeln!(out, "user_name={}", session.user_name())?;
                writeln!(out, "role={}", session.role())?;
            }
            LoginOutcome::Rejected(error) => return Err(eyre!("{error}")),
            LoginOutcome::NotFound { id } => {
                writeln!(out, "status=not_found")?;
                writeln!(out, "user_id={id}")?;
            }
            LoginOutcome::Busy => return Err(eyre!("a login is already in progress")),
            LoginOutcome::Failed => return Err(eyre!("login failed")),
        },
        Command::Signup(args) => match controller.signup(&SignupForm::from(args)).await {
            SignupOutcome::Registered(account) => {
                writeln!(out, "status=registered")?;
                writeln!(out, "user_id={}", account.id())?;
                writeln!(out, "role={}", account.role())?;
            }
            SignupOutcome::Rejected(errors) => {
                for error in &errors {
                    writeln!(out, "error={error}")?;
                }
                return Err(eyre!("signup rejected with {} error(s)", errors.len()));
            }
            SignupOutcome::Duplicate { id } => {
                return Err(eyre!("account id {id} is already taken"));
            }
            SignupOutcome::Busy => return Err(eyre!("a signup is already in progress")),
            SignupOutcome::Failed => return Err(eyre!("signup failed")),
        },
        Command::Logout { yes } => {
            let header = HeaderSync::new(controller, Some(Arc::new(TracingHeaderMount)));
            let logged_out = header.logout(controller, &FixedConfirmation::new(yes));
            writeln!(out, "logged_out={logged_out}")?;
        }
        Command::Whoami => match controller.existing_session() {
            Some(session) => {
                writeln!(out, "user_id={}", session.user_id())?;
                writeln!(out, "user_name={}", session.user_name())?;
                writeln!(out, "role={}", session.role())?;
                if let Some(at) = session.logged_in_at() {
                    writeln!(out, "login_time={}", at.to_rfc3339())?;
                }
            }
            None => writeln!(out, "status=guest")?,
        },
        Command::Header => {
            let header = HeaderSync::new(controller, Some(Arc::new(TracingHeaderMount)));
            let view = header.view();
            if let Some(greeting) = view.greeting() {
                writeln!(out, "greeting={greeting}")?;
            }
            for action in view.actions() {
                writeln!(out, "action={}", action.label())?;
            }
        }
        Command::Strength { password } => {
            let strength = PasswordStrength::evaluate(&password);
            writeln!(out, "score={}", strength.score())?;
            writeln!(out, "label={}", strength.label())?;
        }
        Command::Products { filter, details } => {
            let filter: ProductFilter = filter.parse()?;
            for product in Catalogue::mivo().filter(filter) {
                write!(
                    out,
                    "{}\t{}\t{}",
                    product.id(),
                    product.category(),
                    product.title()
                )?;
                if details {
                    write!(out, "\t{}", product.description())?;
                }
                writeln!(out)?;
            }
        }
        Command::Wishlist { toggle } => {
            let wishlist = Wishlist::new(Arc::clone(&page.store), Arc::new(TracingNotifier));
            if let Some(product_id) = toggle {
                if Catalogue::mivo().find(&product_id).is_none() {
                    return Err(eyre!("unknown product: {product_id}"));
                }
                let change = wishlist.toggle(&product_id)?;
                writeln!(out, "change={change:?}")?;
            }
            for id in wishlist.items()? {
                writeln!(out, "item={id}")?;
            }
        }
    }
    Ok(())
}
