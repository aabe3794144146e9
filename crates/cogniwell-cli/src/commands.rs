//! Command handlers. Each builds the client it needs from the loaded config.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use cogniwell_core::api::ApiClient;
use cogniwell_core::auth::{
    AuthService, CredentialStore, FileCredentialStore, KeyringCredentialStore, Navigator, NewUser,
};
use cogniwell_core::config::{StoreKind, APP_NAME};
use cogniwell_core::training::{self, Action, ExerciseKind};
use cogniwell_core::{Config, TrainingService};
use serde_json::Value;
use tracing::info;

use crate::cli::Commands;
use crate::navigator::TerminalNavigator;

/// Everything a command needs, wired once per process.
struct App {
    client: ApiClient,
    store: Arc<dyn CredentialStore>,
}

impl App {
    fn new(config: &Config, navigator: TerminalNavigator) -> Result<Self> {
        let store: Arc<dyn CredentialStore> = match config.store {
            StoreKind::Keyring => Arc::new(KeyringCredentialStore::new(APP_NAME)),
            StoreKind::File => Arc::new(FileCredentialStore::new(config.credentials_path()?)),
        };
        let navigator: Arc<dyn Navigator> = Arc::new(navigator);
        let client = ApiClient::authenticated(config.client_config()?, store.clone(), navigator)
            .context("Failed to build HTTP client")?;
        info!(origin = %client.config().origin, "Client ready");
        Ok(Self { client, store })
    }

    fn auth(&self) -> AuthService {
        AuthService::new(self.client.clone(), self.store.clone())
    }

    fn training(&self) -> TrainingService {
        TrainingService::new(self.client.clone())
    }
}

pub async fn handle(config: &Config, command: Commands) -> Result<()> {
    let navigator = match command {
        Commands::Login { .. } | Commands::Register { .. } => TerminalNavigator::at_login(),
        _ => TerminalNavigator::new(),
    };
    let app = App::new(config, navigator)?;

    match command {
        Commands::Login { email } => login(&app, &email).await,
        Commands::Register { name, email } => register(&app, name, email).await,
        Commands::Logout => {
            app.auth().logout()?;
            println!("Logged out.");
            Ok(())
        }
        Commands::Whoami => whoami(&app).await,
        Commands::Progress => {
            let progress = app
                .training()
                .progress()
                .await
                .map_err(|e| friendly(e, Action::LoadProgress))?;
            print_json(&progress)
        }
        Commands::Exercise { id } => {
            let exercise = app
                .training()
                .exercise(&id)
                .await
                .map_err(|e| friendly(e, Action::LoadExercise))?;
            print_json(&exercise)
        }
        Commands::Generate { request } => {
            let request: Value =
                serde_json::from_str(&request).context("Request must be valid JSON")?;
            let exercise = app
                .training()
                .generate_exercise(&request)
                .await
                .map_err(|e| friendly(e, Action::GenerateExercise))?;
            print_json(&exercise)
        }
        Commands::Submit { kind, file } => submit(&app, &kind, &file).await,
        Commands::Config { .. } => anyhow::bail!("config does not need a session"),
    }
}

/// Update the saved configuration file. Environment overrides are left out
/// so they never end up persisted.
pub fn configure(
    mut config: Config,
    origin: Option<String>,
    store: Option<StoreKind>,
    timeout_ms: Option<u64>,
) -> Result<()> {
    let changed = origin.is_some() || store.is_some() || timeout_ms.is_some();
    if let Some(origin) = origin {
        config.origin = Some(origin);
    }
    if let Some(store) = store {
        config.store = store;
    }
    if let Some(timeout_ms) = timeout_ms {
        config.timeout_ms = Some(timeout_ms);
    }

    if changed {
        config.origin()?;
        let path = config.save()?;
        info!(path = %path.display(), "Configuration saved");
        println!("Saved {}", path.display());
    }
    print_json(&serde_json::to_value(&config)?)
}

async fn login(app: &App, email: &str) -> Result<()> {
    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;
    let session = app
        .auth()
        .login(email, &password)
        .await
        .context("Login failed")?;
    println!("Logged in as {}.", session.user.display_name());
    Ok(())
}

async fn register(app: &App, name: String, email: String) -> Result<()> {
    let password = rpassword::prompt_password("Choose a password: ")
        .context("Failed to read password")?;
    let new_user = NewUser {
        name,
        email,
        password,
    };
    let registration = app
        .auth()
        .register(&new_user)
        .await
        .context("Registration failed")?;

    if registration.session.is_some() {
        println!("Registered and logged in as {}.", registration.user.display_name());
    } else {
        println!(
            "Registered {}. Run `cogniwell login {}` to sign in.",
            registration.user.display_name(),
            registration.user.email
        );
    }
    Ok(())
}

async fn whoami(app: &App) -> Result<()> {
    let auth = app.auth();
    if !auth.is_authenticated()? {
        println!("Not logged in.");
        return Ok(());
    }
    let user = auth.current_user().await.context("Failed to fetch profile")?;
    println!("{} <{}>", user.display_name(), user.email);
    Ok(())
}

async fn submit(app: &App, kind: &str, file: &Path) -> Result<()> {
    let kind: ExerciseKind = kind.parse().map_err(anyhow::Error::msg)?;
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let results: Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    let evaluation = app
        .training()
        .submit_results(kind, &results)
        .await
        .map_err(|e| friendly(e, Action::SaveProgress(kind)))?;
    print_json(&evaluation)
}

/// Keep the underlying error as context under the user-facing message.
fn friendly(error: cogniwell_core::ApiError, action: Action) -> anyhow::Error {
    let message = training::user_message(&error, action);
    anyhow::Error::new(error).context(message)
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
