use anyhow::Result;
use clap::{Parser, Subcommand};
use server_api::ApiContext;
use shared::{
    domain::TodoId,
    protocol::{CreateTodoRequest, ReorderRequest},
};
use storage::{prepare_database_url, Storage, DEFAULT_DATABASE_URL};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Offline maintenance against the todo database file.
#[derive(Parser, Debug)]
#[command(name = "todo-tools")]
struct Cli {
    #[arg(long, default_value = DEFAULT_DATABASE_URL)]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List,
    Add {
        content: String,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        priority: Option<i64>,
    },
    /// Rewrite positions so the given ids come first, in this order.
    Reorder {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let cli = Cli::parse();
    let ctx = open_context(&cli.database_url).await?;

    match cli.command {
        Command::List => {
            for todo in server_api::list_todos(&ctx).await? {
                println!(
                    "{:>4}  pos={:<3} {} {}",
                    todo.id,
                    todo.position,
                    if todo.is_completed { "[x]" } else { "[ ]" },
                    todo.content
                );
            }
        }
        Command::Add {
            content,
            due,
            priority,
        } => {
            let request = CreateTodoRequest {
                content: Some(content),
                due_date: due,
                priority,
            };
            let todo = server_api::create_todo(&ctx, request).await?;
            println!("created todo_id={} position={}", todo.id, todo.position);
        }
        Command::Reorder { ids } => {
            let request = ReorderRequest {
                ordered_ids: ids.into_iter().map(TodoId).collect(),
            };
            let response = server_api::reorder_todos(&ctx, request).await?;
            println!("reordered {} todos", response.reordered);
        }
    }

    Ok(())
}

/// Accepts the same database locations as the server: bare paths, `sqlite:`
/// urls and `sqlite::memory:`. Missing parent directories are created.
async fn open_context(raw_database_url: &str) -> Result<ApiContext> {
    let database_url = prepare_database_url(raw_database_url)?;
    info!(%database_url, "opening todo database");
    Ok(ApiContext {
        storage: Storage::new(&database_url).await?,
    })
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
