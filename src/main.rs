use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deal_scout::config::{ScoutConfig, SourceConfig};
use deal_scout::discovery::codec::DiscoveryQuery;
use deal_scout::discovery::controller::{AdminColumn, AdminTable, MarketplaceController};
use deal_scout::discovery::render::{render_admin_table, render_marketplace};
use deal_scout::discovery::saved::{JsonFileSavedStore, SavedStore};
use deal_scout::discovery::visibility::{ViewerRole, VisibilityContext};
use deal_scout::sources::{DealSource, JsonFileSource, RestDealSource};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "deal-scout", version, about = "Browse wholesale real-estate deals")]
struct Cli {
    /// Path to a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Id of the viewing user
    #[arg(long, global = true)]
    viewer: Option<String>,

    /// Role of the viewing user (anonymous, member, admin)
    #[arg(long, global = true, default_value = "anonymous", value_parser = parse_role)]
    role: ViewerRole,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show one marketplace page for a URL query string
    Browse {
        /// Query string, e.g. "bedrooms=3&city=Austin&page=2"
        #[arg(default_value = "")]
        query: String,

        /// Replace the keyword search
        #[arg(long)]
        search: Option<String>,

        /// Only show saved deals
        #[arg(long)]
        saved_only: bool,
    },
    /// Show the admin deals table
    Admin {
        /// Local search across title, address and wholesaler
        #[arg(long)]
        search: Option<String>,

        /// Column header to click, in order (e.g. "Entry / ARV")
        #[arg(long = "click")]
        clicks: Vec<String>,
    },
    /// Save or unsave a deal for the viewer
    Save { deal_id: String },
    /// Print the canonical shareable link for a query string
    Url { query: String },
}

fn parse_role(raw: &str) -> Result<ViewerRole, String> {
    ViewerRole::parse(raw).ok_or_else(|| format!("unknown role '{}'", raw))
}

fn build_source(config: &ScoutConfig) -> Result<Arc<dyn DealSource>> {
    let source: Arc<dyn DealSource> = match &config.source {
        SourceConfig::Rest(params) => Arc::new(RestDealSource::new(params.clone())?),
        SourceConfig::File { path } => Arc::new(JsonFileSource::new(path.clone())),
    };
    info!("Using {} deal source", source.source_name());
    Ok(source)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = ScoutConfig::load(cli.config.as_deref())?;
    let context = VisibilityContext {
        viewer_id: cli.viewer.clone(),
        role: cli.role,
    };
    let saved_store = Arc::new(JsonFileSavedStore::new(config.saved_store_path.clone()));

    info!("🏠 Deal Scout");

    match cli.command {
        Command::Browse {
            query,
            search,
            saved_only,
        } => {
            let source = build_source(&config)?;
            let mut controller = MarketplaceController::new(
                source,
                saved_store,
                Arc::new(config.visibility()),
                context,
            )
            .with_base_path(config.base_path.clone())
            .with_default_limit(config.page_size)
            .with_search_debounce(config.search_debounce());

            controller.navigate(&query);
            // A one-shot flag is already settled, no keystrokes to debounce
            if let Some(text) = search {
                controller.set_search(&text);
            }
            controller.set_show_saved_only(saved_only);

            let view = controller.refresh().await;
            print!("{}", render_marketplace(&view));
        }
        Command::Admin { search, clicks } => {
            if cli.role != ViewerRole::Admin {
                warn!("Admin table requested without --role admin");
            }
            let source = build_source(&config)?;
            let mut table = AdminTable::new(source, context);
            table.load().await;

            if let Some(text) = search {
                table.set_search(&text);
            }
            for label in clicks {
                let column = AdminColumn::from_label(&label)
                    .with_context(|| format!("No column named '{}'", label))?;
                let state = table.click_header(column);
                info!("Sorted by {} {}", state.key, state.direction.as_str());
            }
            print!("{}", render_admin_table(&table));
        }
        Command::Save { deal_id } => {
            let viewer = cli
                .viewer
                .context("--viewer is required to save deals")?;
            let outcome = saved_store
                .toggle(&viewer, &deal_id)
                .await
                .context("Failed to update saved deals")?;
            if outcome.saved {
                println!("♥ Saved {}", deal_id);
            } else {
                println!("♡ Removed {} from saved deals", deal_id);
            }
            info!("💾 Saved deals stored in {}", saved_store.path().display());
        }
        Command::Url { query } => {
            println!("{}", DiscoveryQuery::from_query_str(&query).href(&config.base_path));
        }
    }

    Ok(())
}
