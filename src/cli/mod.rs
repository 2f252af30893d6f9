pub mod commands;

use clap::{Parser, Subcommand};

use crate::client::ApiClient;

#[derive(Parser)]
#[command(name = "pulse")]
#[command(about = "ServicePulse CLI - drive the service tracking API from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "API base URL (default http://localhost:3001/api, or PULSE_API_URL)")]
    pub api_url: Option<String>,

    #[arg(long, global = true, help = "Bearer token (or PULSE_TOKEN)")]
    pub token: Option<String>,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Check server liveness")]
    Health,

    #[command(about = "Log in and print a bearer token")]
    Login {
        email: String,
        password: String,
    },

    #[command(about = "Register a new account and print a bearer token")]
    Register {
        email: String,
        password: String,
        name: String,
    },

    #[command(about = "Service management")]
    Service {
        #[command(subcommand)]
        cmd: commands::service::ServiceCommands,
    },

    #[command(about = "Notification management and dispatch")]
    Notify {
        #[command(subcommand)]
        cmd: commands::notify::NotifyCommands,
    },

    #[command(about = "Recent account activity")]
    Activity {
        #[arg(long, help = "Max items to return")]
        limit: Option<i64>,
        #[arg(long, help = "Items to skip")]
        offset: Option<i64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Resolved invocation context shared by all subcommand handlers.
pub struct CliContext {
    pub api_url: String,
    pub token: Option<String>,
    pub output: OutputFormat,
}

impl CliContext {
    fn from_cli(cli: &Cli) -> Self {
        let api_url = cli
            .api_url
            .clone()
            .or_else(|| std::env::var("PULSE_API_URL").ok())
            .unwrap_or_else(|| "http://localhost:3001/api".to_string());
        let token = cli
            .token
            .clone()
            .or_else(|| std::env::var("PULSE_TOKEN").ok());
        let output = if cli.json { OutputFormat::Json } else { OutputFormat::Text };

        Self { api_url, token, output }
    }

    pub fn client(&self) -> ApiClient {
        let mut client = ApiClient::new(&self.api_url);
        if let Some(token) = &self.token {
            client.set_token(token);
        }
        client
    }

    pub fn print_json(&self, value: &serde_json::Value) {
        match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{}", text),
            Err(_) => println!("{}", value),
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = CliContext::from_cli(&cli);

    match cli.command {
        Commands::Health => commands::account::health(&ctx).await,
        Commands::Login { email, password } => commands::account::login(&ctx, &email, &password).await,
        Commands::Register { email, password, name } => {
            commands::account::register(&ctx, &email, &password, &name).await
        }
        Commands::Service { cmd } => commands::service::handle(cmd, &ctx).await,
        Commands::Notify { cmd } => commands::notify::handle(cmd, &ctx).await,
        Commands::Activity { limit, offset } => commands::account::activity(&ctx, limit, offset).await,
    }
}
