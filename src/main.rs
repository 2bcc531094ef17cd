mod config;
mod display;
mod handlers;
mod models;
mod services;

#[cfg(feature = "server")]
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;

use config::ClientConfig;
use models::UserProfile;
use services::{encode_image_file, AnalyzeClient, FoodHistory};

#[derive(Parser)]
#[command(
    name = "nutrisnap",
    version,
    about = "Snap a photo of your food and get nutrition insights"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the analysis server
    #[cfg(feature = "server")]
    Serve,
    /// Analyze a food photo and record it in the local history
    Analyze {
        image: PathBuf,
        /// Analysis server URL (overrides NUTRISNAP_URL)
        #[arg(long)]
        server: Option<String>,
        /// Do not record the result in the history
        #[arg(long)]
        no_record: bool,
    },
    /// Show recorded food and progress towards daily goals
    History,
    /// Toggle the eaten flag on a history entry
    Eat { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    dotenv().ok();

    let cli = Cli::parse();
    let client_config = ClientConfig::from_env();

    match cli.command {
        #[cfg(feature = "server")]
        Command::Serve => serve().await,
        Command::Analyze {
            image,
            server,
            no_record,
        } => {
            let server_url = server.unwrap_or(client_config.server_url);
            let client = AnalyzeClient::new(server_url);
            let image_data = encode_image_file(&image)?;

            let estimate = client.analyze_image(&image_data).await?;
            println!("{}", display::render_estimate(&estimate, &UserProfile::default().goals));

            if !no_record {
                let mut history = FoodHistory::load(&client_config.history_path)?;
                let id = history
                    .record(&estimate, Some(image.display().to_string()))
                    .id;
                history.save(&client_config.history_path)?;
                println!(
                    "📝 Recorded as entry {} (mark it eaten with `nutrisnap eat {}`)",
                    id, id
                );
            }
            Ok(())
        }
        Command::History => {
            let history = FoodHistory::load(&client_config.history_path)?;
            print!(
                "{}",
                display::render_history(
                    &history.entries,
                    &history.eaten_totals(),
                    &UserProfile::default()
                )
            );
            Ok(())
        }
        Command::Eat { id } => {
            let mut history = FoodHistory::load(&client_config.history_path)?;
            let eaten = history.toggle_eaten(id)?;
            history.save(&client_config.history_path)?;
            println!("{} entry {}", if eaten { "✅ Ate" } else { "↩️ Un-ate" }, id);
            Ok(())
        }
    }
}

#[cfg(feature = "server")]
async fn serve() -> Result<()> {
    use config::ServerConfig;
    use handlers::AnalyzeHandler;
    use services::OpenAIService;
    use std::sync::Arc;

    log::info!("🚀 Starting NutriSnap analysis server...");

    let config = ServerConfig::from_env()?;

    let openai = Arc::new(OpenAIService::new(
        config.api_key.clone(),
        config.model.clone(),
        config.base_url.clone(),
    ));
    log::info!("✅ OpenAI service initialized with model: {}", openai.model());

    let analyze_handler = Arc::new(AnalyzeHandler::new(openai));
    let app = server::create_router(analyze_handler, config.static_dir.as_deref());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    log::info!("🌐 Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("🛑 Shutting down...");
        })
        .await?;

    Ok(())
}
