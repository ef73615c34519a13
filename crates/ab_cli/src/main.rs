use std::path::PathBuf;
use std::sync::Arc;

use ab_core::{GenerationRequest, GenerationStep, ResultCache};
use ab_inference::{ArticlePipeline, Config, PipelineOptions, TemplateStore};
use ab_keywords::{create_source, KeywordConfig, KeywordProvider};
use ab_storage::FileCache;
use ab_web::{AppState, ServerConfig};
use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

mod logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "Keyword to blog article generator", long_about = None)]
pub struct Cli {
    /// Directory holding the six prompt templates
    #[arg(long, env = "AUTOBLOG_TEMPLATES", default_value = "prompts")]
    templates: PathBuf,
    /// Heading text of the closing section, written by the summary step
    #[arg(long, env = "AUTOBLOG_CLOSING_MARKER", default_value = ab_inference::pipeline::DEFAULT_CLOSING_MARKER)]
    closing_marker: String,
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    anthropic_api_key: Option<String>,
    #[arg(long, env = "RAKKO_API_KEY", hide_env_values = true)]
    rakko_api_key: Option<String>,
    /// Model used when a request does not name one. "dummy" runs offline.
    #[arg(long, env = "ANTHROPIC_MODEL")]
    model: Option<String>,
    /// Where the last generated article is kept
    #[arg(long, env = "AUTOBLOG_CACHE", default_value = ab_storage::backends::file::DEFAULT_CACHE_FILE)]
    cache: PathBuf,
    #[arg(long, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "PORT", default_value_t = ab_web::DEFAULT_PORT)]
        port: u16,
    },
    /// Generate one article and print it as JSON
    Generate {
        keyword: String,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        authority: Option<String>,
        #[arg(long)]
        call_to_action: Option<String>,
        /// Write the article here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print keyword suggestions
    Suggest { keyword: String },
    /// Print the last generated article
    Last {
        /// Forget the cached article instead
        #[arg(long)]
        clear: bool,
    },
}

impl Cli {
    fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            closing_marker: self.closing_marker.clone(),
        }
    }

    fn model_config(&self) -> Config {
        Config {
            api_key: self.anthropic_api_key.clone(),
            model_name: self.model.clone(),
            ..Config::default()
        }
    }

    fn keyword_provider(&self) -> KeywordProvider {
        KeywordProvider::from_credential(self.rakko_api_key.as_deref())
    }
}

/// Waits for the progress printer. Its failure is logged, never fatal.
async fn finish_progress(watcher: JoinHandle<()>) -> bool {
    match watcher.await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("⚠️ Progress reporter stopped abnormally: {}", e);
            false
        }
    }
}

async fn generate(cli: &Cli, request: GenerationRequest, output: Option<&PathBuf>) -> anyhow::Result<()> {
    request.validate()?;
    let model = ab_inference::create_model(cli.model_config())?;
    info!("🧠 Inference model initialized (using {})", model.name());
    let source = create_source(&cli.keyword_provider(), &KeywordConfig::default());
    info!("🔎 Keyword source: {}", source.name());

    let templates = Arc::new(TemplateStore::load(&cli.templates));
    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
    let pipeline = ArticlePipeline::new(templates)
        .with_options(cli.pipeline_options())
        .with_progress(progress_tx);

    let watcher = tokio::spawn(async move {
        while let Some(step) = progress_rx.recv().await {
            if step == GenerationStep::Complete {
                eprintln!("🎉 done");
            } else {
                eprintln!("[{}/7] {}", step.ordinal(), step);
            }
        }
    });

    let article = pipeline
        .generate(&request, source.as_ref(), model.as_ref())
        .await
        .context("article generation failed")?;
    drop(pipeline);
    finish_progress(watcher).await;

    let cache = FileCache::new(&cli.cache);
    if let Err(e) = cache.save(&article).await {
        tracing::warn!("⚠️ Could not cache article: {}", e);
    }

    let json = serde_json::to_string_pretty(&article)?;
    match output {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            info!("💾 Article written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    match &cli.command {
        Commands::Serve { port } => {
            let templates = Arc::new(TemplateStore::load(&cli.templates));
            let missing = templates.missing();
            if !missing.is_empty() {
                tracing::warn!("⚠️ {} templates missing; those steps send empty prompts", missing.len());
            }
            let config = ServerConfig {
                model_api_key: cli.anthropic_api_key.clone(),
                keyword_api_key: cli.rakko_api_key.clone(),
                default_model: cli.model.clone(),
                pipeline: cli.pipeline_options(),
            };
            info!(
                "🔑 Claude key {}, Rakko key {}",
                if config.model_api_key.is_some() { "loaded" } else { "not set" },
                if cli.keyword_provider().is_primary() { "loaded" } else { "not set (using Google Suggest)" }
            );
            ab_web::serve(AppState::new(templates, config), *port).await?;
        }
        Commands::Generate {
            keyword,
            genre,
            theme,
            authority,
            call_to_action,
            output,
        } => {
            let request = GenerationRequest {
                keyword: keyword.clone(),
                genre: genre.clone(),
                theme: theme.clone(),
                authority: authority.clone(),
                call_to_action: call_to_action.clone(),
            };
            generate(&cli, request, output.as_ref()).await?;
        }
        Commands::Suggest { keyword } => {
            let source = create_source(&cli.keyword_provider(), &KeywordConfig::default());
            for suggestion in source.fetch_suggestions(keyword.trim()).await? {
                println!("{}", suggestion);
            }
        }
        Commands::Last { clear } => {
            let cache = FileCache::new(&cli.cache);
            if *clear {
                cache.clear().await?;
                info!("🧹 Cleared {}", cache.path().display());
            } else {
                match cache.load().await? {
                    Some(article) => println!("{}", serde_json::to_string_pretty(&article)?),
                    None => eprintln!("No article generated yet"),
                }
            }
        }
    }

    Ok(())
}
