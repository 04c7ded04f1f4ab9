use clap::{Parser, Subcommand};
use log::{debug, info};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};

use dilloscan::{
    pipelines, FileImageCache, ImageCache, MarkerPolicy, ScanConfig, ScanResult, Scanner,
};

#[derive(Parser, Debug)]
#[command(name = "dilloscan")]
#[command(version)]
#[command(about = "Read ingredient lists off nutrition labels", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract ingredients from recognized text (argument, file or stdin)
    Extract {
        /// Label text; read from stdin when omitted
        text: Option<String>,

        /// Read the label text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Only read text following an "ingredients" marker
        #[arg(long)]
        require_marker: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recognize label images and extract their ingredients
    Scan {
        /// Image files; with --session and no images, the cached image is scanned
        images: Vec<String>,

        /// Use the simulated recognizer instead of Google Vision
        #[arg(long)]
        simulated: bool,

        /// Only read text following an "ingredients" marker
        #[arg(long)]
        require_marker: bool,

        /// Remember the scanned image under this session id
        #[arg(long, env = "DILLOSCAN_SESSION")]
        session: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Forget the cached image of a session
    Forget {
        session: String,
    },

    /// Ask the armadillo about an ingredient
    Chat {
        /// Reply delay in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config = ScanConfig::load()?;
    debug!("Loaded configuration: {:?}", config);

    match cli.command {
        Commands::Extract {
            text,
            file,
            require_marker,
            json,
        } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(path).await?,
                (None, None) => {
                    let mut buffer = String::new();
                    tokio::io::stdin().read_to_string(&mut buffer).await?;
                    buffer
                }
            };

            let mut extractor = config.extractor();
            if require_marker {
                extractor = dilloscan::IngredientExtractor::new(MarkerPolicy::RequireMarker);
            }

            print_result(&pipelines::text::process(&text, &extractor), json)?;
        }
        Commands::Scan {
            images,
            simulated,
            require_marker,
            session,
            json,
        } => {
            let mut builder = Scanner::from_config(&config)?;
            for image in images {
                builder = builder.image(image);
            }
            if simulated {
                builder = builder.simulated();
            }
            if require_marker {
                builder = builder.marker_policy(MarkerPolicy::RequireMarker);
            }
            if let Some(session) = session {
                let cache = Arc::new(FileImageCache::new(&config.cache.dir));
                builder = builder.cache(cache, session);
            }

            print_result(&builder.build().await?, json)?;
        }
        Commands::Forget { session } => {
            FileImageCache::new(&config.cache.dir).clear(&session).await?;
            info!("Cleared cached image for session '{}'", session);
        }
        Commands::Chat { delay_ms } => {
            let mut bot = config.chatbot();
            if let Some(delay_ms) = delay_ms {
                bot = dilloscan::Chatbot::new(
                    Duration::from_millis(delay_ms),
                    config.chat.template.clone(),
                );
            }

            println!("Ask about an ingredient (or 'quit'):");
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                if matches!(line.trim().to_lowercase().as_str(), "quit" | "exit") {
                    break;
                }
                if let Some(reply) = bot.send(&line).await {
                    println!("{}", reply.text);
                }
            }
        }
    }

    Ok(())
}

fn print_result(result: &ScanResult, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else if result.ingredients.is_empty() {
        println!("No ingredients to show.");
    } else {
        println!("Detected ingredients: {}", result.ingredients);
    }
    Ok(())
}
