use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use documind::api::{ApiClient, Credentials};
use documind::app::App;
use documind::chat::ChatController;
use documind::config::Config;
use documind::login::LoginForm;
use documind::session::{ExpiryReason, FileTokenStore, Session};
use documind::ui::{message_row, sidebar};

#[derive(Parser)]
#[command(name = "documind", version, about = "Chat with your documents")]
struct Args {
    /// Backend URL (overrides DOCUMIND_BASE_URL)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Where the login token is stored (overrides DOCUMIND_TOKEN_FILE)
    #[arg(long, value_name = "FILE")]
    token_file: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and remember the token
    Login {
        #[arg(long)]
        email: String,
        /// Read from DOCUMIND_PASSWORD or prompted when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored token
    Logout,
    /// Check that the backend is reachable
    Status,
    /// List uploaded documents
    Files,
    /// Upload a document
    Upload { path: PathBuf },
    /// Ask a single question
    Ask {
        #[arg(required = true, trailing_var_arg = true)]
        question: Vec<String>,
    },
    /// Start an interactive chat
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(token_file) = &args.token_file {
        config.token_path = token_file.clone();
    }
    config.verbose |= args.verbose;

    // Enable logging
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if config.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let store = FileTokenStore::new(&config.token_path);
    let session = Session::new(store)
        .with_context(|| format!("Failed to load token from {}", config.token_path.display()))?
        .with_observer(|reason| {
            if reason == ExpiryReason::Unauthorized {
                eprintln!("Session expired or invalid. Please log in again.");
            }
        });
    let client = ApiClient::new(config, Arc::new(session)).context("Failed to build HTTP client")?;

    match args.command {
        Command::Login { email, password } => {
            let mut form = LoginForm::new(email, resolve_password(password)?);
            if form.submit(&client).await.is_err() {
                bail!("{}", form.error().unwrap_or("Login failed"));
            }
            println!("Logged in.");
        }
        Command::Register { email, password } => {
            let credentials = Credentials::new(email, resolve_password(password)?);
            let user = client
                .register(&credentials)
                .await
                .context("Registration failed")?;
            println!("Registered {} (id {}). You can now log in.", user.email, user.id);
        }
        Command::Logout => {
            client
                .session()
                .logout()
                .context("Failed to clear stored credential")?;
            println!("Logged out.");
        }
        Command::Status => {
            let health = client.health().await.context("Backend is not reachable")?;
            let state = if client.session().is_authenticated() {
                "logged in"
            } else {
                "not logged in"
            };
            println!("{} ({}, {})", health.message, client.config().base_url, state);
        }
        Command::Files => {
            require_login(&client)?;
            let files = client.list_files().await.context("Failed to fetch files")?;
            print!("{}", sidebar::render_files(&files));
        }
        Command::Upload { path } => {
            require_login(&client)?;
            let mut chat = ChatController::new(client);
            if chat.upload(&path).await.is_err() {
                bail!("{}", chat.upload_error().unwrap_or("Upload failed"));
            }
            print!("{}", sidebar::render_files(chat.files()));
        }
        Command::Ask { question } => {
            require_login(&client)?;
            let mut chat = ChatController::new(client);
            if let Some(answer_id) = chat.ask(&question.join(" ")).await
                && let Some(answer) = chat.transcript().get(answer_id)
            {
                print!("{}", message_row::render_message(answer));
                if answer.is_error {
                    bail!("The question could not be answered");
                }
            }
        }
        Command::Chat => {
            require_login(&client)?;
            App::new(ChatController::new(client)).run().await?;
        }
    }

    Ok(())
}

fn require_login(client: &ApiClient) -> Result<()> {
    if !client.session().is_authenticated() {
        bail!("Not logged in. Run `documind login --email <EMAIL>` first.");
    }
    Ok(())
}

fn resolve_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    if let Ok(password) = std::env::var("DOCUMIND_PASSWORD") {
        return Ok(password);
    }

    eprint!("Password: ");
    io::stderr().flush().ok();
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
