use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use toolhub_core::catalog::CatalogStore;
use toolhub_core::config::{HubConfig, SourceConfig};
use toolhub_core::selection::{FilterState, ToolType};
use toolhub_core::view::{Activation, CatalogView};

#[derive(Debug, Parser)]
#[command(author, version, about = "Browse and filter a tool catalog")]
struct App {
    /// TOML configuration file
    #[arg(long, env = "TOOLHUB_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Read the catalog from this file instead of the configured source
    #[arg(long, global = true, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Fetch the catalog from this URL instead of the configured source
    #[arg(long, global = true)]
    url: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the tools that pass the given filters
    List {
        /// Case-insensitive text matched against name, description and tags
        #[arg(long, default_value = "")]
        search: String,
        /// Category to include (repeatable; any match passes)
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Tag to include (repeatable; any match passes)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// all, external or internal
        #[arg(long = "type", default_value = "all")]
        tool_type: ToolType,
    },
    /// Show the category list
    Categories,
    /// Show catalog statistics
    Stats,
    /// Show the most used tags
    Tags {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show what activating a tool does
    Open { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let app = App::parse();

    let mut config = HubConfig::load(app.config.as_deref()).context("loading configuration")?;
    if let Some(path) = &app.file {
        config.source = SourceConfig::File { path: path.clone() };
    }
    if let Some(url) = &app.url {
        config.source = SourceConfig::Http { url: url.clone() };
    }

    let store = Arc::new(CatalogStore::from_boxed(config.build_source()?));
    let mut view = CatalogView::new(store);

    // An unavailable source leaves the view empty; report it and keep going.
    if let Err(err) = view.reload().await {
        warn!(error = %err, "continuing with an empty catalog");
        eprintln!("{}: {err}", config.app_name);
    }

    match app.command {
        Command::List {
            search,
            categories,
            tags,
            tool_type,
        } => {
            view.set_filters(
                FilterState::new()
                    .with_search(search)
                    .with_categories(categories)
                    .with_tags(tags)
                    .with_tool_type(tool_type),
            );
            let visible = view.visible();
            if app.json {
                print_json(visible)?;
            } else {
                println!("{}", visible.summary());
                for tool in visible.iter() {
                    let kind = if tool.guide().is_some() { "guide" } else { "link" };
                    println!("{} {:<24} [{}] {} ({kind})", tool.icon, tool.id, tool.category, tool.name);
                }
            }
        }
        Command::Categories => {
            if app.json {
                print_json(view.categories())?;
            } else {
                for facet in view.categories() {
                    let count = view.stats().tools_by_category.get(&facet.value).copied().unwrap_or(0);
                    println!("{:<32} {count}", facet.display_name);
                }
            }
        }
        Command::Stats => {
            let stats = view.stats();
            if app.json {
                print_json(stats)?;
            } else {
                println!("Tools:      {}", stats.total_tools);
                println!("Categories: {}", stats.total_categories);
                println!("External:   {}", stats.external_tools);
                println!("Internal:   {}", stats.internal_tools);
            }
        }
        Command::Tags { limit } => {
            let tags = view.popular_tags(limit.unwrap_or(config.popular_tags_limit));
            if app.json {
                print_json(&tags)?;
            } else {
                for entry in tags {
                    println!("{:<24} {}", entry.tag, entry.count);
                }
            }
        }
        Command::Open { id } => {
            let activation = view
                .activate(&id)
                .with_context(|| format!("no tool with id `{id}`"))?;
            if app.json {
                print_json(&activation)?;
            } else {
                match activation {
                    Activation::OpenGuide { title, icon, html } => {
                        println!("{icon} {title}");
                        println!("{html}");
                    }
                    Activation::OpenUrl { url } => println!("{url}"),
                    Activation::Noop => println!("Nothing to open for `{id}`"),
                }
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
