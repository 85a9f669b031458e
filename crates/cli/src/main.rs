//! Mass Market Supplies CLI - Drive the storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! mms-cli products --category lighting
//! mms-cli product 1
//! mms-cli deals
//! mms-cli search led --sort price-low --max 20
//!
//! # Cart
//! mms-cli cart add 1 --quantity 2
//! mms-cli cart set 1 5
//! mms-cli cart show
//!
//! # Account
//! mms-cli login user --password user
//! mms-cli whoami
//! mms-cli theme toggle
//!
//! # Checkout
//! mms-cli buy 5 --quantity 2 --address addr2
//! mms-cli quote 1 --name "Dana Buyer" --email dana@example.com --phone 555-0100
//! ```
//!
//! State persists in `MMS_DATA_DIR` (default `.mms`). See
//! `mass_market_storefront::config` for the other variables.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use mass_market_core::ProductId;
use mass_market_storefront::config::StorefrontConfig;
use mass_market_storefront::search::SortOption;
use mass_market_storefront::services::ThemeMode;
use mass_market_storefront::{AppError, AppState};

mod commands;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "mass_market_storefront=info,mms_cli=info";

#[derive(Parser)]
#[command(name = "mms-cli")]
#[command(author, version, about = "Mass Market Supplies storefront shell")]
struct Cli {
    /// Skip the simulated backend delays
    #[arg(long, global = true)]
    no_delay: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalog
    Products {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one product with its details and related products
    Product { id: ProductId },
    /// List products on sale
    Deals,
    /// Search and filter the catalog
    Search {
        /// Text matched against name and description
        #[arg(default_value = "")]
        query: String,

        /// relevance, price-low, price-high or rating
        #[arg(short, long, default_value = "relevance")]
        sort: String,

        /// Lowest price to include
        #[arg(long)]
        min: Option<Decimal>,

        /// Highest price to include
        #[arg(long)]
        max: Option<Decimal>,

        /// Include out-of-stock products
        #[arg(long)]
        include_out_of_stock: bool,

        /// Only products on sale
        #[arg(long)]
        on_sale: bool,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Log in with an email (or alias) and password
    Login {
        identifier: String,

        #[arg(short, long)]
        password: String,
    },
    /// Log out
    Logout,
    /// Show who is logged in
    Whoami,
    /// Show or change the theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Buy a product now (requires login)
    Buy {
        id: ProductId,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Saved address id (default: the default address)
        #[arg(short, long)]
        address: Option<String>,
    },
    /// Request a business quote for a product
    Quote {
        id: ProductId,

        /// Full name (default: from the saved draft)
        #[arg(long)]
        name: Option<String>,

        /// Email (default: from the saved draft)
        #[arg(long)]
        email: Option<String>,

        /// Phone number (default: from the saved draft)
        #[arg(long)]
        phone: Option<String>,

        /// Additional notes
        #[arg(long)]
        note: Option<String>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show lines and totals
    Show,
    /// Add a product
    Add {
        id: ProductId,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product's line
    Remove { id: ProductId },
    /// Set a line's quantity (below 1 is ignored)
    Set {
        id: ProductId,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Show the stored mode
    Show,
    /// Store a mode (light, dark or auto)
    Set { mode: ThemeMode },
    /// Switch between light and dark
    Toggle,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Command failed");
        #[allow(clippy::print_stderr)]
        {
            eprintln!("{}", e.user_message());
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = StorefrontConfig::from_env()?;
    if cli.no_delay {
        config = config.without_latency();
    }
    let state = AppState::from_config(config)?;

    match cli.command {
        Commands::Products { category } => commands::catalog::products(&state, category.as_deref()),
        Commands::Product { id } => commands::catalog::product(&state, id)?,
        Commands::Deals => commands::catalog::deals(&state),
        Commands::Search {
            query,
            sort,
            min,
            max,
            include_out_of_stock,
            on_sale,
        } => {
            let mut search = state.search_state().with_query(query);
            search.sort = SortOption::parse(&sort);
            if let Some(min) = min {
                search.price_range.min = min;
            }
            if let Some(max) = max {
                search.price_range.max = max;
            }
            search.show_in_stock = !include_out_of_stock;
            search.show_on_sale = on_sale;
            commands::catalog::search(&state, &search);
        }
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state),
            CartAction::Add { id, quantity } => commands::cart::add(&state, id, quantity)?,
            CartAction::Remove { id } => commands::cart::remove(&state, id)?,
            CartAction::Set { id, quantity } => commands::cart::set(&state, id, quantity)?,
            CartAction::Clear => commands::cart::clear(&state)?,
        },
        Commands::Login {
            identifier,
            password,
        } => commands::account::login(&state, &identifier, &password).await?,
        Commands::Logout => commands::account::logout(&state)?,
        Commands::Whoami => commands::account::whoami(&state)?,
        Commands::Theme { action } => match action.unwrap_or(ThemeAction::Show) {
            ThemeAction::Show => commands::account::theme_show(&state),
            ThemeAction::Set { mode } => commands::account::theme_set(&state, mode)?,
            ThemeAction::Toggle => commands::account::theme_toggle(&state)?,
        },
        Commands::Buy {
            id,
            quantity,
            address,
        } => commands::checkout::buy(&state, id, quantity, address.as_deref()).await?,
        Commands::Quote {
            id,
            name,
            email,
            phone,
            note,
        } => {
            let fields = commands::checkout::QuoteFields {
                full_name: name,
                email,
                phone,
                note,
            };
            commands::checkout::quote(&state, id, fields).await?;
        }
    }
    Ok(())
}
