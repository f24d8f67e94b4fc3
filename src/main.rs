use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Result, bail, eyre};
use std::path::PathBuf;
use taskstore::config::{ENV_BASE_URL, ENV_TOKEN};
use taskstore::{Config, HttpClient, RestClient, Task, TaskDraft, TaskId, TaskPatch, TaskStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskstore")]
#[command(about = "TaskStore CLI - Manage tasks kept on a remote task backend")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the config file (default: <config dir>/taskstore/config.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL, e.g. http://localhost:3000/api
    #[arg(long, env = ENV_BASE_URL)]
    base_url: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, env = ENV_TOKEN, hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tasks
    List {
        /// all, active or completed
        #[arg(short, long, default_value = "all")]
        filter: String,
    },

    /// Create a task
    Add {
        title: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Create the task already completed
        #[arg(long)]
        completed: bool,
    },

    /// Change a task's title, description or completion
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        completed: Option<bool>,
    },

    /// Flip a task between active and completed
    Toggle { id: String },

    /// Delete a task
    Rm { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup tracing; logs go to stderr so they don't mix with listings
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::load_or_default(cli.config.as_deref())?.with_overrides(cli.base_url, cli.token);
    let store = TaskStore::new(RestClient::new(&config)?);

    match cli.command {
        Commands::List { filter } => {
            store.set_filter(filter);
            load(&store).await?;

            let snapshot = store.snapshot();
            for task in snapshot.filtered_tasks() {
                print_task(task);
            }
            println!(
                "{} active, {} completed",
                snapshot.active_count().to_string().bold(),
                snapshot.completed_count().to_string().bold()
            );
        }
        Commands::Add {
            title,
            description,
            completed,
        } => {
            if title.trim().is_empty() {
                bail!("Task title cannot be empty");
            }

            let mut draft = TaskDraft::new(title).with_completed(completed);
            if let Some(description) = description {
                draft = draft.with_description(description);
            }

            let task = store.create(draft).await?;
            println!("{} {}", "Created".green(), task.id);
        }
        Commands::Edit {
            id,
            title,
            description,
            completed,
        } => {
            load(&store).await?;
            let id = resolve_id(&store, &id);
            let current = store.find(&id).ok_or_else(|| eyre!("Task not found: {}", id))?;

            let patch = TaskPatch {
                title: title.unwrap_or(current.title),
                description: description.unwrap_or(current.description),
                completed: completed.unwrap_or(current.completed),
            };
            if patch.title.trim().is_empty() {
                bail!("Task title cannot be empty");
            }

            let task = store.update(&id, patch).await?;
            println!("{}", "Updated".green());
            print_task(&task);
        }
        Commands::Toggle { id } => {
            load(&store).await?;
            let id = resolve_id(&store, &id);

            match store.toggle_completion(&id).await? {
                Some(task) => print_task(&task),
                None => bail!("Task not found: {}", id),
            }
        }
        Commands::Rm { id } => {
            store.delete(&TaskId::from(id.as_str())).await?;
            println!("{} {}", "Deleted".green(), id);
        }
    }

    Ok(())
}

/// Fetch, turning a recorded fetch failure into an error
async fn load<C: HttpClient>(store: &TaskStore<C>) -> Result<()> {
    store.fetch().await;
    match store.error() {
        Some(message) => Err(eyre!(message)),
        None => Ok(()),
    }
}

/// Match a command-line id against the loaded tasks, so `7` finds a numeric id
fn resolve_id<C>(store: &TaskStore<C>, raw: &str) -> TaskId {
    store
        .tasks()
        .into_iter()
        .map(|task| task.id)
        .find(|id| id.to_string() == raw)
        .unwrap_or_else(|| TaskId::from(raw))
}

fn print_task(task: &Task) {
    let mark = if task.completed { "[x]".green() } else { "[ ]".normal() };
    let title = if task.completed {
        task.title.as_str().dimmed()
    } else {
        task.title.as_str().bold()
    };

    if task.description.is_empty() {
        println!("{} {} {}", mark, task.id.to_string().cyan(), title);
    } else {
        println!("{} {} {} - {}", mark, task.id.to_string().cyan(), title, task.description);
    }
}
