use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use taskshot_core::task::{CreateTask, Status};
use taskshot_store::ScreenshotStore;
use tokio::net::TcpListener;
use tracing::info;

use taskshot_server::config::ServerConfig;

#[derive(Parser)]
#[command(name = "taskshot-server", about = "Serves task screenshots over HTTP")]
struct Cli {
    #[command(flatten)]
    config: ServerConfig,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a task so its screenshots can be served
    AddTask {
        /// Task id (defaults to a fresh UUID)
        #[arg(long)]
        id: Option<String>,
        /// Workflow type of the automation run
        #[arg(long)]
        workflow_type: String,
        /// Natural-language query that started the task
        #[arg(long, default_value = "")]
        query: String,
        /// Initial status
        #[arg(long, default_value = "pending", value_parser = parse_status)]
        status: Status,
    },
    /// List registered tasks
    ListTasks,
    /// Remove a task from the registry (its screenshots are left on disk)
    RemoveTask {
        /// The task id to remove
        id: String,
    },
}

fn parse_status(s: &str) -> Result<Status, String> {
    Status::parse_str(s).ok_or_else(|| {
        let valid: Vec<_> = Status::ALL.iter().map(|s| s.as_str()).collect();
        format!("unknown status {s:?} (expected one of: {})", valid.join(", "))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let db = taskshot_db::open_database(&cli.config.db_config())
        .context("failed to open task registry")?;

    match cli.command {
        Some(Commands::AddTask {
            id,
            workflow_type,
            query,
            status,
        }) => {
            let task = db
                .create_task(&CreateTask {
                    id,
                    workflow_type,
                    query,
                    status,
                })
                .await?;
            eprintln!("Registered task ({})", task.workflow_type);
            // Print the id to stdout so it can be captured
            println!("{}", task.id);
        }
        Some(Commands::ListTasks) => {
            let tasks = db.list_tasks().await?;
            if tasks.is_empty() {
                eprintln!("No tasks registered.");
            } else {
                println!("{:<38} {:<24} {:<12} CREATED", "ID", "WORKFLOW", "STATUS");
                for task in tasks {
                    println!(
                        "{:<38} {:<24} {:<12} {}",
                        task.id,
                        task.workflow_type,
                        task.status.as_str(),
                        task.created_at.to_rfc3339(),
                    );
                }
            }
        }
        Some(Commands::RemoveTask { id }) => {
            db.delete_task(&id).await?;
            eprintln!("Removed task {id}");
        }
        None => {
            let store = Arc::new(ScreenshotStore::new(&cli.config.store_config()));
            info!("serving screenshots from {}", store.base_dir().display());
            if !store.base_dir().is_dir() {
                tracing::warn!(
                    "screenshot directory {} does not exist yet; every task will list empty",
                    store.base_dir().display()
                );
            }

            let addr = cli.config.addr();
            let listener = TcpListener::bind(addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            info!("taskshot-server listening on http://{addr}");

            taskshot_server::serve(listener, db, store).await?;
        }
    }

    Ok(())
}
