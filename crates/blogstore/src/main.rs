mod config;
mod repository;
mod services;
mod state;
mod storage;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blogstore_core::blog::{Author, Blog};
use blogstore_core::keys;

use crate::{config::Config, state::AppState};

/// Blogstore - Authors and blogs on a single DynamoDB table
#[derive(Parser, Debug)]
#[command(name = "blogstore")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Prefix prepended to every table name
    #[arg(long, global = true, env = "BLOGSTORE_TABLE_PREFIX")]
    table_prefix: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage authors
    #[command(subcommand)]
    Author(AuthorCommand),
    /// Manage blogs
    #[command(subcommand)]
    Blog(BlogCommand),
    /// Manage the backing table
    #[command(subcommand)]
    Table(TableCommand),
}

#[derive(Subcommand, Debug)]
enum AuthorCommand {
    /// Create or replace an author
    Save {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Print one author
    Get { id: String },
    /// Delete an author (their blogs are kept)
    Delete { id: String },
    /// Print every author
    List,
}

#[derive(Subcommand, Debug)]
enum BlogCommand {
    /// Create or replace a blog
    Save(SaveBlogArgs),
    /// Print one blog
    Get { id: String },
    /// Delete a blog
    Delete { id: String },
    /// Print blogs, newest first
    List {
        /// Only blogs by this author
        #[arg(long)]
        author: Option<String>,
    },
    /// Record one view and print the updated blog
    View { id: String },
}

#[derive(Args, Debug)]
struct SaveBlogArgs {
    #[arg(long)]
    id: String,
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    content: String,
    /// Creation date as YYYY-MM-DD
    #[arg(long, value_parser = keys::parse_date)]
    created_date: NaiveDate,
    #[arg(long)]
    published: bool,
    #[arg(long)]
    author_id: String,
}

#[derive(Subcommand, Debug)]
enum TableCommand {
    /// Create the table and its indexes when missing
    Create,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blogstore=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(prefix) = cli.table_prefix {
        config.table_prefix = prefix;
    }

    tracing::debug!(
        endpoint = %config.target_display(),
        table_prefix = %config.table_prefix,
        "Configuration loaded"
    );

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    match cli.command {
        Command::Table(TableCommand::Create) => AppState::ensure_tables(&config).await,
        Command::Author(command) => {
            let state = AppState::new(&config).await?;
            run_author(&state, command, &cancel).await
        }
        Command::Blog(command) => {
            let state = AppState::new(&config).await?;
            run_blog(&state, command, &cancel).await
        }
    }
}

async fn run_author(
    state: &AppState,
    command: AuthorCommand,
    cancel: &CancellationToken,
) -> Result<()> {
    match command {
        AuthorCommand::Save { id, name, email } => {
            let author = Author::new(id, name, email);
            state.authors.save(&author, cancel).await?;
            print_json(&author)
        }
        AuthorCommand::Get { id } => match state.authors.get_by_id(&id, cancel).await? {
            Some(author) => print_json(&author),
            None => bail!("Author not found: {}", id),
        },
        AuthorCommand::Delete { id } => {
            state.authors.delete(&id, cancel).await?;
            tracing::info!(author_id = %id, "Author deleted");
            Ok(())
        }
        AuthorCommand::List => print_json(&state.authors.list(cancel).await?),
    }
}

async fn run_blog(
    state: &AppState,
    command: BlogCommand,
    cancel: &CancellationToken,
) -> Result<()> {
    match command {
        BlogCommand::Save(args) => {
            let blog = Blog::new(args.id, args.title, args.author_id, args.created_date)
                .with_content(args.content)
                .with_published(args.published);
            state.blogs.save(&blog, cancel).await?;
            print_json(&blog)
        }
        BlogCommand::Get { id } => match state.blogs.get_by_id(&id, cancel).await? {
            Some(blog) => print_json(&blog),
            None => bail!("Blog not found: {}", id),
        },
        BlogCommand::Delete { id } => {
            state.blogs.delete(&id, cancel).await?;
            tracing::info!(blog_id = %id, "Blog deleted");
            Ok(())
        }
        BlogCommand::List { author: Some(author_id) } => {
            print_json(&state.blogs.list_by_author(&author_id, cancel).await?)
        }
        BlogCommand::List { author: None } => print_json(&state.blogs.list_all(cancel).await?),
        BlogCommand::View { id } => print_json(&state.blogs.record_view(&id, cancel).await?),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Cancels in-flight store calls on Ctrl+C or SIGTERM.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, cancelling...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, cancelling...");
        }
    }

    cancel.cancel();
}
