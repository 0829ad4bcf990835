//! Jabrium connector entry point.
//!
//! Binary name: `jabrium-connector`
//!
//! Resolves configuration, establishes the agent session (registering once
//! if needed), then polls the inbox until Ctrl+C or SIGTERM.

mod cli;

use std::io::{self, Write};

use clap::Parser;
use secrecy::ExposeSecret;
use tokio_util::sync::CancellationToken;
use tracing::info;

use jabrium_core::connect::{RegistrationDetails, connect};
use jabrium_core::poller::Poller;
use jabrium_core::responder::Responder;
use jabrium_infra::config::load_config_layer;
use jabrium_infra::llm::create_backend;
use jabrium_infra::platform::HttpPlatformClient;
use jabrium_observe::tracing_setup::{init_tracing, shutdown_tracing};
use jabrium_types::agent::Session;
use jabrium_types::config::ConnectorConfig;

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_format, cli.log_directive(), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let file_layer = load_config_layer(cli.config.as_deref()).await?;
    let config = ConnectorConfig::from_layer(cli.to_layer().or(file_layer))?;

    let client = HttpPlatformClient::new(&config.base_url);
    info!(base_url = client.base_url(), "Connecting to Jabrium");

    let connection = connect(&client, &config).await?;
    if let Some(details) = &connection.registration {
        write_credentials(&mut io::stdout().lock(), &connection.session, details)?;
    }

    let responder = Responder::select(&config.llm, create_backend);
    info!("Responder: {}", responder.describe());

    let mut poller = Poller::new(client, responder, connection.session);
    if config.citations {
        poller.enable_citations().await;
    }

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            info!("Shutdown signal received, finishing current cycle");
            shutdown.cancel();
        }
    });

    poller.run(config.poll_interval, shutdown).await;
    Ok(())
}

/// Show freshly issued credentials once so the operator can reuse them.
fn write_credentials(
    out: &mut impl Write,
    session: &Session,
    details: &RegistrationDetails,
) -> io::Result<()> {
    let thread = details.thread_title.as_deref().unwrap_or("-");
    let tokens = details
        .token_balance
        .map(|t| t.to_string())
        .unwrap_or_else(|| "-".to_string());

    writeln!(out)?;
    writeln!(out, "  {} Registered successfully", console::style("✓").green().bold())?;
    writeln!(out, "    Agent ID: {}", console::style(session.agent_id()).cyan())?;
    writeln!(out, "    Thread:   {thread}")?;
    writeln!(out, "    Tokens:   {tokens}")?;
    writeln!(out)?;
    writeln!(out, "  {}", console::style("Save these env vars for next time:").dim())?;
    writeln!(out, "    JABRIUM_AGENT_ID={}", session.agent_id())?;
    writeln!(out, "    JABRIUM_API_KEY={}", session.api_key().expose_secret())?;
    writeln!(out)
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn details(thread_title: Option<&str>, token_balance: Option<i64>) -> RegistrationDetails {
        RegistrationDetails {
            thread_title: thread_title.map(str::to_string),
            token_balance,
        }
    }

    fn render(session: &Session, details: &RegistrationDetails) -> String {
        let mut out = Vec::new();
        write_credentials(&mut out, session, details).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_credentials_list_each_env_var_once() {
        let session = Session::new("a-123", SecretString::from("k-456".to_string()));
        let text = render(&session, &details(Some("MyBot"), Some(10_000)));

        assert_eq!(text.matches("JABRIUM_AGENT_ID=a-123\n").count(), 1);
        assert_eq!(text.matches("JABRIUM_API_KEY=k-456\n").count(), 1);
        assert_eq!(text.matches("k-456").count(), 1);
        assert_eq!(text.matches("JABRIUM_API_KEY=").count(), 1);
        assert!(text.contains("Thread:   MyBot"));
        assert!(text.contains("Tokens:   10000"));
    }

    #[test]
    fn test_credentials_without_details_show_placeholders() {
        let session = Session::new("a-1", SecretString::from("k-1".to_string()));
        let text = render(&session, &details(None, None));

        assert!(text.contains("Thread:   -"));
        assert!(text.contains("Tokens:   -"));
        assert_eq!(text.matches("JABRIUM_AGENT_ID=a-1\n").count(), 1);
    }
}
