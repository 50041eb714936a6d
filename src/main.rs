use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use vectormind_cli::{
    ChatCommand, ChatSession, Role, clear_screen, display_banner, handle_input_with_history,
    print_help, print_status, render_answer,
};
use vectormind_core::{ServiceStatus, VectorIndex};
use vectormind_ollama::OllamaClient;
use vectormind_rag::{
    DocumentSource, InMemoryIndex, IndexBackend, IngestionPipeline, QdrantIndex, RagConfig,
    RagWorkflow,
};

type Pipeline = IngestionPipeline<OllamaClient, dyn VectorIndex>;
type Workflow = RagWorkflow<OllamaClient, dyn VectorIndex, OllamaClient>;

#[derive(Parser)]
#[command(name = "vectormind")]
#[command(about = "Ask questions about your own documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Index one or more PDF or text documents
    Ingest {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Answer a single question from the indexed documents
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Interactive session (default)
    Chat,
    /// Check whether Ollama and Qdrant are reachable
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let rag_config = RagConfig::from_env()?;
    let ollama = Arc::new(OllamaClient::from_env()?);
    debug!(
        backend = ?rag_config.backend,
        collection = %rag_config.collection_name,
        embed_model = %ollama.config().embed_model,
        "configuration loaded"
    );

    let command = cli.command.unwrap_or(Commands::Chat);
    if let Commands::Status = command {
        print_status(&service_statuses(&ollama, &rag_config).await);
        return Ok(());
    }

    let index = build_index(&rag_config)?;
    let pipeline = IngestionPipeline::new(ollama.clone(), index.clone(), &rag_config)?;
    let workflow = RagWorkflow::new(ollama.clone(), index.clone(), ollama.clone(), &rag_config)?;

    match command {
        Commands::Ingest { paths } => {
            warn_if_ephemeral(&rag_config);
            ingest_all(&pipeline, &paths).await
        }
        Commands::Ask { question } => {
            warn_if_ephemeral(&rag_config);
            let started = Instant::now();
            let answered = workflow.run(&question.join(" ")).await?;
            render_answer(&answered.answer, started.elapsed()).await?;
            Ok(())
        }
        Commands::Chat => run_chat(&ollama, &rag_config, index, &pipeline, &workflow).await,
        Commands::Status => Ok(()),
    }
}

fn build_index(config: &RagConfig) -> Result<Arc<dyn VectorIndex>> {
    let index: Arc<dyn VectorIndex> = match config.backend {
        IndexBackend::Qdrant => Arc::new(QdrantIndex::new(&config.qdrant_url)?),
        IndexBackend::Memory => Arc::new(InMemoryIndex::new()),
    };
    Ok(index)
}

fn warn_if_ephemeral(config: &RagConfig) {
    if config.backend == IndexBackend::Memory {
        println!(
            "{} VECTOR_BACKEND=memory keeps the index only for this process; use 'chat' to ingest and ask together",
            "⚠️".yellow()
        );
    }
}

async fn service_statuses(
    ollama: &OllamaClient,
    config: &RagConfig,
) -> Vec<(&'static str, ServiceStatus)> {
    let qdrant = match QdrantIndex::new(&config.qdrant_url) {
        Ok(index) => index.health_check().await,
        Err(_) => ServiceStatus::Offline,
    };

    vec![("Ollama", ollama.status().await), ("Qdrant", qdrant)]
}

async fn ingest_one(pipeline: &Pipeline, path: &Path) -> Result<()> {
    println!("{} Indexing {}...", "📄".blue(), path.display());

    let source = DocumentSource::from_path(path).await?;
    let report = pipeline.ingest(&source).await?;

    println!(
        "{} {} indexed successfully ({} chunks, {} dimensions)",
        "✅".green(),
        report.document,
        report.chunks,
        report.dimensions
    );
    Ok(())
}

async fn ingest_all(pipeline: &Pipeline, paths: &[PathBuf]) -> Result<()> {
    let mut failed = 0;

    for path in paths {
        if let Err(e) = ingest_one(pipeline, path).await {
            println!("{} Failed to index {}: {}", "❌".red(), path.display(), e);
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} of {} documents failed to index", failed, paths.len());
    }
    Ok(())
}

async fn run_chat(
    ollama: &OllamaClient,
    config: &RagConfig,
    index: Arc<dyn VectorIndex>,
    pipeline: &Pipeline,
    workflow: &Workflow,
) -> Result<()> {
    let already_indexed = match index.count(&config.collection_name).await {
        Ok(count) => count > 0,
        Err(e) => {
            warn!(error = %e, collection = %config.collection_name, "could not count indexed points");
            false
        }
    };
    let mut session = ChatSession::new(already_indexed);

    display_banner(workflow.model(), pipeline.collection());

    let mut history = Vec::new();

    loop {
        let input = handle_input_with_history(&mut history).await?;

        match ChatCommand::parse(&input) {
            ChatCommand::Empty => continue,
            ChatCommand::Exit => {
                println!("{}", "👋 Goodbye!".green());
                break;
            }
            ChatCommand::Help => print_help(),
            ChatCommand::Status => print_status(&service_statuses(ollama, config).await),
            ChatCommand::Clear => {
                let dropped = session.clear();
                clear_screen(&mut io::stdout())?;
                display_banner(workflow.model(), pipeline.collection());
                println!("{} Conversation cleared ({} messages)", "🧹".cyan(), dropped);
            }
            ChatCommand::Upload(path) => {
                if path.is_empty() {
                    println!("{} Usage: /upload <path>", "⚠️".yellow());
                    continue;
                }
                match ingest_one(pipeline, Path::new(&path)).await {
                    Ok(()) => session.mark_document_ready(),
                    Err(e) => println!("{} Failed to index document: {}", "❌".red(), e),
                }
            }
            ChatCommand::Ask(question) => {
                if !session.is_document_ready() {
                    println!(
                        "{} Index a document before asking questions (/upload <path>)",
                        "⚠️".yellow()
                    );
                    continue;
                }

                session.push(Role::User, question.as_str());
                println!("{} Analyzing documents...", "🔍".blue());

                let started = Instant::now();
                match workflow.run(&question).await {
                    Ok(answered) => {
                        render_answer(&answered.answer, started.elapsed()).await?;
                        session.push(Role::Assistant, answered.answer);
                    }
                    Err(e) => println!("{} Failed to answer: {}", "❌".red(), e),
                }
            }
        }
    }

    Ok(())
}
