//! crab-guest - guest session core from the command line
//!
//! Each invocation acts as one browser tab whose session storage is a JSON
//! file under `STORAGE_DIR`, so a scan, a session start and later page
//! resolutions can be run as separate commands.

mod logger;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use crab_guest::storage::FileStorage;
use crab_guest::{
    BillBreakdown, Destination, GuestConfig, RouteParams, SessionApi, SessionBootstrap,
    SessionParams, SessionStore, TenantSettingsProvider, customer_href, decode_qr_token,
    resolve_customer_context,
};
use rust_decimal::Decimal;
use shared::models::SessionStartRequest;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "crab-guest", about = "Guest ordering session tools", long_about = None)]
struct Cli {
    /// Directory holding this tab's session storage
    #[arg(long, env = "STORAGE_DIR", global = true)]
    storage_dir: Option<PathBuf>,

    /// Backend API base URL
    #[arg(long, env = "API_BASE_URL", global = true)]
    api_base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a table QR token without storing anything
    Decode { token: String },

    /// Accept a scanned QR token: remember its table and token
    Scan {
        #[arg(long)]
        tenant: String,
        token: String,
    },

    /// Start a session upstream and store the returned tenant settings
    Start {
        #[arg(long)]
        tenant: String,
        #[arg(long)]
        table: String,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        party_size: Option<u32>,
    },

    /// Resolve the customer context of a page
    Resolve {
        #[arg(long)]
        tenant: String,
        #[command(flatten)]
        params: QueryArgs,
    },

    /// Build a customer link
    Href {
        #[arg(long)]
        tenant: String,
        #[arg(value_enum)]
        page: Page,
        /// Item id, required for `item`
        #[arg(long)]
        item: Option<String>,
        #[command(flatten)]
        params: QueryArgs,
    },

    /// Show the tenant settings as the provider exposes them
    Settings,

    /// Format an amount with the tenant's currency
    Price { amount: Decimal },

    /// Bill breakdown for a subtotal
    Bill { subtotal: Decimal },

    /// End the session and forget every stored record
    End,
}

/// `table` and `token` as a page URL would carry them
#[derive(clap::Args, Debug)]
struct QueryArgs {
    #[arg(long)]
    table: Option<String>,
    #[arg(long)]
    token: Option<String>,
}

impl QueryArgs {
    fn to_params(&self) -> SessionParams {
        SessionParams::new(self.table.as_deref(), self.token.as_deref())
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Page {
    Menu,
    Cart,
    Item,
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = GuestConfig::from_env();
    if let Some(dir) = cli.storage_dir.clone() {
        config = config.with_storage_dir(dir);
    }
    if let Some(url) = cli.api_base_url.clone() {
        config = config.with_api_base_url(url);
    }

    logger::init_logger(&config.log_level, config.log_json, config.log_dir.as_deref())?;

    let storage = FileStorage::new(config.storage_file());
    tracing::debug!(path = %storage.path().display(), "Using tab storage");
    let store = Arc::new(SessionStore::new(storage));

    run(cli.command, &config, store).await
}

async fn run(command: Command, config: &GuestConfig, store: Arc<SessionStore>) -> Result<()> {
    match command {
        Command::Decode { token } => {
            let payload = decode_qr_token(&token).context("token not usable")?;
            print_json(&payload)
        }

        Command::Scan { tenant, token } => {
            let scanned = SessionBootstrap::new(store)
                .accept_qr_token(&tenant, &token)
                .context("token not usable")?;
            println!("{}", scanned.menu_href);
            Ok(())
        }

        Command::Start {
            tenant,
            table,
            language,
            party_size,
        } => {
            let api = SessionApi::new(config)?;
            let language = language.unwrap_or_else(|| config.default_language.clone());
            let mut request = SessionStartRequest::new(tenant, table, language);
            if let Some(size) = party_size {
                request = request.with_party_size(size);
            }

            let data = SessionBootstrap::new(store)
                .start_session(&api, &request)
                .await
                .with_context(|| format!("session start failed for table {}", request.table_code))?;
            print_json(&data)
        }

        Command::Resolve { tenant, params } => {
            let route = RouteParams {
                tenant_slug: tenant,
                session: params.to_params(),
            };
            let ctx = resolve_customer_context(&route, store.as_ref())
                .context("customer context not resolved")?;
            print_json(&ctx)
        }

        Command::Href {
            tenant,
            page,
            item,
            params,
        } => {
            let destination = match (page, item.as_deref()) {
                (Page::Menu, _) => Destination::Menu,
                (Page::Cart, _) => Destination::Cart,
                (Page::Item, Some(id)) => Destination::Item(id),
                (Page::Item, None) => bail!("--item is required for item links"),
            };
            println!(
                "{}",
                customer_href(&tenant, destination, &params.to_params(), store.as_ref())
            );
            Ok(())
        }

        Command::Settings => {
            let provider = TenantSettingsProvider::new(store);
            let snapshot = provider.mount();
            print_json(snapshot.as_ref())?;

            let open = snapshot
                .settings
                .is_open_at(chrono::Local::now().naive_local());
            println!("open now: {open}");
            Ok(())
        }

        Command::Price { amount } => {
            let provider = TenantSettingsProvider::new(store);
            provider.mount();
            println!("{}", provider.format_price(amount));
            Ok(())
        }

        Command::Bill { subtotal } => {
            let provider = TenantSettingsProvider::new(store);
            let snapshot = provider.mount();
            let bill = BillBreakdown::compute(subtotal, &snapshot.settings);
            let formatter = snapshot.formatter();

            println!("subtotal        {}", formatter.format(bill.subtotal));
            println!("service charge  {}", formatter.format(bill.service_charge));
            let tax_label = snapshot.settings.tax.label.as_deref().unwrap_or("tax");
            if bill.tax_inclusive {
                println!("{tax_label} (incl.)    {}", formatter.format(bill.tax));
            } else {
                println!("{tax_label:<16}{}", formatter.format(bill.tax));
            }
            println!("total           {}", formatter.format(bill.total));
            Ok(())
        }

        Command::End => {
            SessionBootstrap::new(store).end_session();
            Ok(())
        }
    }
}
