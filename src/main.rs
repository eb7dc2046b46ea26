use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use genesis_client::api::{ChatService, GenesisClient};
use genesis_client::models::{Attachment, GeminiResponse};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "genesis-client")]
#[command(about = "Talk to the GENESIS coaching backend")]
struct CliArgs {
    /// Backend base URL. Overrides GENESIS_API_URL.
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send a prompt to the chat endpoint.
    Chat {
        prompt: String,

        /// Image file to attach. May be repeated.
        #[arg(long = "image", value_name = "PATH")]
        images: Vec<PathBuf>,

        #[arg(long)]
        session_id: Option<String>,

        #[arg(long)]
        user_id: Option<String>,

        /// Print the full response as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Check whether the backend is up.
    Health,
}

fn load_attachments(paths: &[PathBuf]) -> Result<Vec<Attachment>> {
    paths
        .iter()
        .map(|path| {
            Attachment::from_path(path)
                .with_context(|| format!("Failed to read attachment {}", path.display()))
        })
        .collect()
}

fn render(response: &GeminiResponse, as_json: bool) -> Result<String> {
    if as_json {
        return Ok(serde_json::to_string_pretty(response)?);
    }

    let mut out = format!("[{}] {}", response.agent, response.text);
    if let Some(payload) = &response.payload {
        out.push('\n');
        out.push_str(&serde_json::to_string_pretty(payload)?);
    }
    Ok(out)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "genesis_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let mut client = GenesisClient::from_env();
    if let Some(api_url) = args.api_url {
        client.set_api_url(api_url);
    }
    info!("Using backend at {}", client.api_url());

    match args.command {
        Command::Chat {
            prompt,
            images,
            session_id,
            user_id,
            json,
        } => {
            let attachments = match load_attachments(&images) {
                Ok(attachments) => attachments,
                Err(e) => {
                    error!("{:#}", e);
                    std::process::exit(1);
                }
            };

            let response = client
                .generate_content(
                    &prompt,
                    &attachments,
                    session_id.as_deref(),
                    user_id.as_deref(),
                )
                .await;

            println!("{}", render(&response, json)?);
            Ok(())
        }
        Command::Health => match client.health_check().await {
            Ok(health) => {
                println!("{}", serde_json::to_string_pretty(&health)?);
                Ok(())
            }
            Err(e) => {
                error!("Backend health check failed: {}", e);
                std::process::exit(1);
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genesis_client::models::GENESIS_AGENT;

    #[test]
    fn test_cli_parses_repeated_images() {
        let args = CliArgs::parse_from([
            "genesis-client",
            "--api-url",
            "https://example.com",
            "chat",
            "Analiza mi plato",
            "--image",
            "a.png",
            "--image",
            "b.jpg",
        ]);

        assert_eq!(args.api_url.as_deref(), Some("https://example.com"));
        match args.command {
            Command::Chat { prompt, images, .. } => {
                assert_eq!(prompt, "Analiza mi plato");
                assert_eq!(images.len(), 2);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_load_attachments_reports_missing_file() {
        let err = load_attachments(&[PathBuf::from("/nonexistent/meal.png")]).unwrap_err();
        assert!(format!("{:#}", err).contains("meal.png"));
    }

    #[test]
    fn test_render_plain_includes_agent_and_payload() {
        let response = GeminiResponse::connection_error("HTTP error! status: 500");
        let out = render(&response, false).unwrap();

        assert!(out.starts_with(&format!("[{}] ", GENESIS_AGENT)));
        assert!(out.contains("alert-banner"));
    }

    #[test]
    fn test_render_plain_without_payload() {
        let response = GeminiResponse {
            text: "Listo".to_string(),
            agent: "GENESIS".to_string(),
            payload: None,
        };
        assert_eq!(render(&response, false).unwrap(), "[GENESIS] Listo");
    }
}
