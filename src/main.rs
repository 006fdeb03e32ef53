//! Ladle entrypoint: HTTP server by default, interactive chat with `--chat`.

use std::net::SocketAddr;
use std::sync::Arc;

use mimalloc::MiMalloc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use ladle::analyzer::{FoodRelevanceClassifier, QueryAnalyzer};
use ladle::cache::RecipeCache;
use ladle::catalog::CatalogClient;
use ladle::config::Config;
use ladle::constants::DEFAULT_RESULT_COUNT;
use ladle::embedding::{EmbedderConfig, TextEmbedder};
use ladle::guardrail::{GuardrailValidator, RateLimiter};
use ladle::llm::{LlmBackend, QueryUnderstanding};
use ladle::ranking::SemanticRanker;
use ladle::retrieval::{RetrievalOrchestrator, RetrievalOutcome};
use ladle::server::{AppState, create_router};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const EXIT_COMMANDS: &[&str] = &[
    "exit",
    "quit",
    "bye",
    "goodbye",
    "see you later",
    "leave",
    "end chat",
    "stop",
    "close",
    "finish",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the subscriber so RUST_LOG from the file is honored.
    let dotenv_result = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = dotenv_result {
        tracing::debug!("no .env file loaded: {e}");
    }

    let config = Config::from_env()?;
    config.validate()?;

    let embedder_config = match &config.model_dir {
        Some(dir) => EmbedderConfig::new(dir.clone()),
        None => {
            warn!("no LADLE_MODEL_DIR configured, running embedder in stub mode");
            EmbedderConfig::stub()
        }
    };
    let embedder = Arc::new(TextEmbedder::load(embedder_config)?);

    let classifier = FoodRelevanceClassifier::new(Arc::clone(&embedder))?;
    let analyzer = QueryAnalyzer::new(classifier);

    let understanding = QueryUnderstanding::new(
        LlmBackend::from_config(&config),
        GuardrailValidator::new(RateLimiter::llm_level()),
    );

    let orchestrator = Arc::new(RetrievalOrchestrator::new(
        GuardrailValidator::new(RateLimiter::request_level()),
        analyzer,
        understanding,
        CatalogClient::new(&config)?,
        RecipeCache::new(Arc::clone(&embedder)),
        SemanticRanker::new(embedder),
    ));

    if std::env::args().any(|arg| arg == "--chat") {
        return run_chat(orchestrator).await;
    }

    let state = AppState::new(orchestrator);
    let app = create_router(state);

    let addr: SocketAddr = config.socket_addr().parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "ladle listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("ladle shutdown complete");
    Ok(())
}

async fn run_chat<S, C>(orchestrator: Arc<RetrievalOrchestrator<S, C>>) -> anyhow::Result<()>
where
    S: ladle::catalog::RecipeSource,
    C: ladle::analyzer::RelevanceCheck,
{
    use std::io::Write;

    info!("starting chat session");
    println!("Hello! I'm Ladle, your recipe assistant.");
    println!("Tell me what you're craving or what's in your fridge. Type 'exit' to leave.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let query = line.trim();

        if query.is_empty() {
            continue;
        }

        if EXIT_COMMANDS.contains(&query.to_lowercase().as_str()) {
            info!("chat session ended by user");
            println!("Bot: See you later!");
            break;
        }

        match orchestrator
            .retrieve(query, "cli", DEFAULT_RESULT_COUNT)
            .await
        {
            RetrievalOutcome::Ranked(recipes) if recipes.is_empty() => {
                println!(
                    "\nBot: I'm sorry, I couldn't find any matching recipes. Can you try rephrasing your request?"
                );
            }
            RetrievalOutcome::Ranked(recipes) => {
                println!("\nBot: Here are some recipes that might interest you:");
                for (i, recipe) in recipes.iter().enumerate() {
                    println!("\n{}", "=".repeat(20));
                    println!("Recipe #{}: {}", i + 1, recipe.name);
                    println!("{}", "=".repeat(20));
                    println!("  Ready in: {} minutes", recipe.ready_in_minutes);
                    println!("  Servings: {}", recipe.servings);

                    println!("\nIngredients:");
                    for ingredient in &recipe.ingredients {
                        println!("  - {ingredient}");
                    }

                    println!("\nInstructions:");
                    for (step_number, step) in recipe.steps.iter().enumerate() {
                        println!("  {}. {step}", step_number + 1);
                    }

                    println!("\nSource: {}", recipe.source_url);
                }
            }
            RetrievalOutcome::Rejected(violation) => {
                println!("\nBot: I can't help with that one: {violation}.");
            }
            RetrievalOutcome::QuotaExhausted => {
                println!(
                    "\nBot: I'm sorry, we've reached our daily API limit. Please try again tomorrow!"
                );
            }
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("received SIGTERM, shutting down");
        }
    }
}
