//! tasktree CLI
//!
//! Command-line interface for managing to-do lists stored in SQLite:
//! - Create and delete lists
//! - Add and edit items
//! - Show the item tree, filtered and sorted
//! - Complete, delete and reorder items
//! - Move items with their sub items between lists

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use tasktree::{
    logging, CardConfig, Config, DueState, ItemUpdate, ListId, NewTodoItem, SortKey,
    SqliteTodoService, TodoBoard, TodoItem, TodoListCard, TodoService, TransferRequest,
};

#[derive(Parser)]
#[command(name = "tasktree")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Hierarchical to-do lists")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the usual locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overriding the config
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all to-do lists
    Lists,

    /// Create a to-do list
    NewList {
        /// List entity, e.g. todo.shopping
        entity: String,
    },

    /// Delete a to-do list and all of its items
    DeleteList { list: String },

    /// Show a list's items
    Show {
        list: String,
        /// Only items whose summary contains this text
        #[arg(long)]
        filter: Option<String>,
        /// Sort key (summary, due)
        #[arg(short, long)]
        sort: Option<SortKey>,
        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
        /// Leave out completed items
        #[arg(long)]
        hide_completed: bool,
    },

    /// Add an item
    Add {
        list: String,
        summary: String,
        /// Parent item uid, making this a sub item
        #[arg(short, long)]
        parent: Option<String>,
        /// Due date (YYYY-MM-DD) or date-time (RFC 3339)
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Change an item's summary, description or due date
    Edit {
        list: String,
        uid: String,
        #[arg(long)]
        summary: Option<String>,
        /// New description; an empty value clears it
        #[arg(long)]
        description: Option<String>,
        /// New due date; an empty value clears it
        #[arg(long)]
        due: Option<String>,
    },

    /// Toggle an item between open and completed
    Complete { list: String, uid: String },

    /// Delete items
    Delete {
        list: String,
        #[arg(required = true)]
        uids: Vec<String>,
    },

    /// Delete all completed items
    ClearCompleted { list: String },

    /// Move an item after another (or to the top)
    Move {
        list: String,
        uid: String,
        /// Predecessor uid; omit to move to the top
        #[arg(long)]
        after: Option<String>,
    },

    /// Move an item and its sub items to another list
    Transfer {
        uid: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Predecessor uid in the target list; omit to put it first
        #[arg(long)]
        after: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = tasktree::config::generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(database) = &cli.database {
        config.storage.database = database.clone();
    }
    logging::init(&config.logging).context("Failed to initialize logging")?;

    let service = SqliteTodoService::open(&config.storage.database, config.notifier.clone())
        .with_context(|| format!("Failed to open {:?}", config.storage.database))?;
    let service = Arc::new(service);
    let board = Arc::new(TodoBoard::new(service.clone()));

    match cli.command {
        Commands::Lists => {
            let lists = service.lists().await?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&lists)?),
                OutputFormat::Table => {
                    if lists.is_empty() {
                        println!("No lists yet.");
                        println!();
                        println!("Create one with:");
                        println!("  tasktree new-list todo.shopping");
                    }
                    for list in lists {
                        let items = service.items(&list).await?;
                        let open = items.iter().filter(|i| !i.is_completed()).count();
                        println!("{:<30} {:>4} open {:>4} total", list, open, items.len());
                    }
                }
            }
        }

        Commands::NewList { entity } => {
            let list = ListId::parse(&entity)?;
            if service.create_list(&list).await? {
                println!("Created {}", list);
            } else {
                println!("{} already exists", list);
            }
        }

        Commands::DeleteList { list } => {
            let list = ListId::parse(&list)?;
            board.delete_list(&list).await?;
            println!("Deleted {}", list);
        }

        Commands::Show {
            list,
            filter,
            sort,
            desc,
            hide_completed,
        } => {
            let config = CardConfig::new(list).hide_completed(hide_completed);
            let mut card = TodoListCard::new(config, board.clone())?;
            card.subscribe().await?;

            if let Some(filter) = filter {
                card.set_filter(filter);
            }
            if sort.is_some() {
                card.sort_by_key(sort);
                if desc {
                    card.sort_by_key(sort);
                }
            }

            let unchecked = card.unchecked_items();
            let checked = card.checked_items();
            match cli.format {
                OutputFormat::Json => {
                    let body = serde_json::json!({
                        "list": card.list(),
                        "unchecked": unchecked,
                        "checked": checked,
                    });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                OutputFormat::Table => {
                    println!("{}", card.list());
                    print_section("Open", &unchecked);
                    if !hide_completed {
                        print_section("Completed", &checked);
                    }
                }
            }
        }

        Commands::Add {
            list,
            summary,
            parent,
            due,
            description,
        } => {
            let mut item = NewTodoItem::new(summary);
            if let Some(parent) = parent {
                item = item.parent(parent);
            }
            if let Some(due) = due {
                item = item.due(due);
            }
            if let Some(description) = description {
                item = item.description(description);
            }

            let mut card = TodoListCard::new(CardConfig::new(list), board.clone())?;
            card.subscribe().await?;
            let created = card.add_detailed_item(item).await?;
            print_item(cli.format, &created)?;
        }

        Commands::Edit {
            list,
            uid,
            summary,
            description,
            due,
        } => {
            if summary.is_none() && description.is_none() && due.is_none() {
                bail!("Nothing to change; pass --summary, --description or --due");
            }

            let mut update = ItemUpdate::new(uid);
            update.summary = summary;
            update.description = description;
            update.due = due;

            let mut card = TodoListCard::new(CardConfig::new(list), board.clone())?;
            card.subscribe().await?;
            let edited = card.edit_item(update).await?;
            print_item(cli.format, &edited)?;
        }

        Commands::Complete { list, uid } => {
            let mut card = TodoListCard::new(CardConfig::new(list), board.clone())?;
            card.subscribe().await?;
            let updated = card.complete_item(&uid).await?;
            print_item(cli.format, &updated)?;
        }

        Commands::Delete { list, uids } => {
            let list = ListId::parse(&list)?;
            service.delete(&list, &uids).await?;
            println!("Deleted {} item(s) from {}", uids.len(), list);
        }

        Commands::ClearCompleted { list } => {
            let mut card = TodoListCard::new(CardConfig::new(list), board.clone())?;
            card.subscribe().await?;
            let cleared = card.clear_completed().await?;
            println!("Cleared {} completed item(s)", cleared);
        }

        Commands::Move { list, uid, after } => {
            let list = ListId::parse(&list)?;
            board
                .move_item_in_order(&uid, &list, after.as_deref())
                .await?;
            match after {
                Some(after) => println!("Moved {} after {}", uid, after),
                None => println!("Moved {} to the top", uid),
            }
        }

        Commands::Transfer {
            uid,
            from,
            to,
            after,
        } => {
            let request = TransferRequest {
                uid,
                from: ListId::parse(&from)?,
                to: ListId::parse(&to)?,
                after,
            };
            let report = board.transfer(request).await?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Table => {
                    println!(
                        "Moved {} item(s) to {} (new uid {})",
                        report.created.len(),
                        to,
                        report.new_uid
                    );
                }
            }
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

fn print_item(format: OutputFormat, item: &TodoItem) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(item)?),
        OutputFormat::Table => println!("{}  {}", item.uid, item.summary),
    }
    Ok(())
}

fn print_section(title: &str, items: &[TodoItem]) {
    println!();
    println!("{} ({})", title, items.len());
    println!("{}", "-".repeat(60));

    let now = Local::now();
    for item in items {
        let marker = if item.is_completed() { "[x]" } else { "[ ]" };
        let indent = if item.is_child() { "    " } else { "" };
        let due = match (item.due.as_deref(), item.due_state(&now)) {
            (Some(due), Some(DueState::Overdue)) => format!("  (overdue: {})", due),
            (Some(due), Some(DueState::Today)) => format!("  (today: {})", due),
            (Some(due), _) => format!("  (due {})", due),
            (None, _) => String::new(),
        };
        println!("{}{} {}{}  [{}]", indent, marker, item.summary, due, item.uid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desc_requires_sort() {
        assert!(Cli::try_parse_from(["tasktree", "show", "todo.shopping", "--desc"]).is_err());

        let cli =
            Cli::try_parse_from(["tasktree", "show", "todo.shopping", "--sort", "due", "--desc"])
                .unwrap();
        match cli.command {
            Commands::Show { sort, desc, .. } => {
                assert_eq!(sort, Some(SortKey::Due));
                assert!(desc);
            }
            _ => panic!("Expected show"),
        }
    }

    #[test]
    fn test_edit_and_delete_list_parse() {
        let cli = Cli::try_parse_from([
            "tasktree",
            "edit",
            "todo.shopping",
            "abc",
            "--due",
            "",
            "--summary",
            "Oat milk",
        ])
        .unwrap();
        match cli.command {
            Commands::Edit {
                uid, summary, due, description, ..
            } => {
                assert_eq!(uid, "abc");
                assert_eq!(summary.as_deref(), Some("Oat milk"));
                assert_eq!(due.as_deref(), Some(""));
                assert_eq!(description, None);
            }
            _ => panic!("Expected edit"),
        }

        let cli = Cli::try_parse_from(["tasktree", "delete-list", "todo.shopping"]).unwrap();
        assert!(matches!(cli.command, Commands::DeleteList { list } if list == "todo.shopping"));
    }
}
