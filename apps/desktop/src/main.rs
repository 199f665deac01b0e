use std::{sync::Arc, time::Duration};

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use client_core::{
    widget::DEFAULT_SYNC_INTERVAL, DropIntent, HttpTodoClient, TodoWidget, WidgetEvent,
    WidgetState,
};
use shared::{domain::TodoId, protocol::TodoItem};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Terminal front end for the todo widget.
#[derive(Parser, Debug)]
#[command(name = "todo-widget")]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server_url: String,
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the full list in display order.
    List,
    Add {
        content: String,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        priority: Option<i64>,
    },
    Toggle {
        id: i64,
    },
    Delete {
        id: i64,
    },
    /// Move a todo, the way dropping it in the list would.
    Move {
        id: i64,
        #[command(flatten)]
        target: MoveTarget,
    },
    /// Show the active todo and keep it in sync until interrupted.
    Watch {
        #[arg(long, default_value_t = DEFAULT_SYNC_INTERVAL.as_secs())]
        interval_secs: u64,
    },
}

#[derive(ClapArgs, Debug)]
#[group(required = true, multiple = false)]
struct MoveTarget {
    /// Into the active slot, ahead of everything else.
    #[arg(long)]
    front: bool,
    #[arg(long, value_name = "ID")]
    before: Option<i64>,
    #[arg(long, value_name = "ID")]
    after: Option<i64>,
    #[arg(long)]
    end: bool,
}

impl MoveTarget {
    fn intent(&self) -> DropIntent {
        match (self.before, self.after) {
            (Some(id), _) => DropIntent::Before(TodoId(id)),
            (_, Some(id)) => DropIntent::After(TodoId(id)),
            _ if self.front => DropIntent::MoveToFront,
            _ => DropIntent::Append,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let client = HttpTodoClient::new(&args.server_url, Duration::from_secs(args.timeout_secs))?;
    let widget = TodoWidget::new(Arc::new(client));
    if let Command::Watch { interval_secs } = args.command {
        return watch(widget, interval_secs).await;
    }
    widget.reload().await?;

    match args.command {
        Command::List => print_list(&widget.state().await),
        Command::Add {
            content,
            due,
            priority,
        } => {
            let created = widget.add(&content, due, priority).await?;
            println!("created id={} position={}", created.id, created.position);
        }
        Command::Toggle { id } => {
            let updated = widget.toggle_complete(TodoId(id)).await?;
            println!(
                "todo {} is now {}",
                updated.id,
                if updated.is_completed { "done" } else { "open" }
            );
        }
        Command::Delete { id } => {
            widget.delete(TodoId(id)).await?;
            println!("deleted id={id}");
        }
        Command::Move { id, target } => {
            if widget.move_with_intent(TodoId(id), target.intent()).await? {
                print_list(&widget.state().await);
            } else {
                println!("nothing to move");
            }
        }
        Command::Watch { .. } => {}
    }

    Ok(())
}

async fn watch(widget: Arc<TodoWidget>, interval_secs: u64) -> Result<()> {
    let mut events = widget.subscribe_events();
    // The first load goes through the event stream like every later one.
    if let Err(err) = widget.reload().await {
        warn!(error = %err, "initial load failed");
    }

    let sync = widget.spawn_sync_task(Duration::from_secs(interval_secs.max(1)));
    info!(interval_secs, "watching for changes");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(WidgetEvent::Snapshot(_)) => println!("{}", widget.state().await.headline()),
                Ok(WidgetEvent::Notice(notice)) => eprintln!("! {notice}"),
                Ok(WidgetEvent::Expanded(_)) => {}
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "dropped widget events"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    sync.abort();
    Ok(())
}

fn print_list(state: &WidgetState) {
    if state.todos.is_empty() {
        println!("{}", state.headline());
        return;
    }
    let active = state.active_todo().map(|todo| todo.id);
    for todo in &state.todos {
        println!("{}", format_row(todo, active == Some(todo.id)));
    }
}

fn format_row(todo: &TodoItem, is_active: bool) -> String {
    let marker = if is_active { '>' } else { ' ' };
    let check = if todo.is_completed { 'x' } else { ' ' };
    let due = todo
        .due_date
        .map(|due| format!("  due {}", due.format("%Y-%m-%d %H:%M")))
        .unwrap_or_default();
    format!(
        "{marker} [{check}] {:>4}  {}{due}",
        todo.id, todo.content
    )
}
