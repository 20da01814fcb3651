//! dshop
//!
//! Terminal storefront for the Dynamic Online Shopping backend.

mod commands;
mod config;
mod signal;
mod widget;

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use commands::App;
use config::ConfigLoader;
use dshop_core::listing::{OrderSort, ProductSort};
use dshop_sdk::objects::{OrderStatus, Role};
use rust_decimal::Decimal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Dynamic Online Shopping - browse, fill a cart and pay from the terminal
#[derive(Parser, Debug)]
#[command(name = "dshop")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "DSHOP_CONFIG", default_value = "./dshop.toml")]
    config: PathBuf,

    /// Override the API base URL (e.g. http://localhost:8080/api/)
    #[arg(long, env = "DSHOP_API_URL")]
    api_url: Option<String>,

    /// Emit logs as JSON
    #[arg(long, default_value = "false")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and remember the session
    Login {
        email: String,
        #[arg(long, env = "DSHOP_PASSWORD")]
        password: String,
    },
    /// Create an account and log in
    Register {
        #[arg(long)]
        full_name: String,
        email: String,
        #[arg(long, env = "DSHOP_PASSWORD")]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show account stats for the signed-in user
    Profile,
    /// Browse the catalogue
    Products(ProductFilter),
    /// Show one product
    Product { id: i64 },
    /// Show or edit the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartCommand>,
    },
    /// Place an order for the cart and pay for it
    Checkout,
    /// List your orders
    Orders(OrderFilter),
    /// Show one order
    Order { id: i64 },
    /// Store administration
    Admin {
        #[command(subcommand)]
        action: AdminCommand,
    },
}

#[derive(ClapArgs, Debug)]
struct ProductFilter {
    /// Search titles and descriptions
    #[arg(short, long, default_value = "")]
    search: String,
    /// name, price-low or price-high
    #[arg(long, default_value_t = ProductSort::Name)]
    sort: ProductSort,
    #[arg(long)]
    min_price: Option<Decimal>,
    #[arg(long)]
    max_price: Option<Decimal>,
}

#[derive(ClapArgs, Debug)]
struct OrderFilter {
    /// Search order ids and item titles
    #[arg(short, long, default_value = "")]
    search: String,
    #[arg(long)]
    status: Option<OrderStatus>,
    /// newest, oldest, amount-high or amount-low
    #[arg(long, default_value_t = OrderSort::Newest)]
    sort: OrderSort,
}

#[derive(Subcommand, Debug)]
enum CartCommand {
    Show,
    Add {
        product_id: i64,
        #[arg(default_value_t = 1)]
        quantity: u32,
    },
    Set { line_id: i64, quantity: u32 },
    Inc { line_id: i64 },
    Dec { line_id: i64 },
    Remove { line_id: i64 },
}

#[derive(ClapArgs, Debug)]
struct ProductFields {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    price: String,
    #[arg(long, default_value = "")]
    stock: String,
    #[arg(long, default_value = "")]
    sku: String,
    #[arg(long, default_value = "")]
    image_url: String,
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// Dashboard totals
    Stats,
    Products {
        #[arg(short, long, default_value = "")]
        search: String,
    },
    CreateProduct(ProductFields),
    UpdateProduct {
        id: i64,
        #[command(flatten)]
        fields: ProductFields,
    },
    DeleteProduct { id: i64 },
    Orders {
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(long)]
        status: Option<OrderStatus>,
    },
    SetStatus { order_id: i64, status: OrderStatus },
    Users {
        #[arg(short, long, default_value = "")]
        search: String,
    },
    SetRole { user_id: i64, role: Role },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    tracing::debug!("Starting dshop v{}", env!("CARGO_PKG_VERSION"));

    let settings = ConfigLoader::new(&args.config, args.api_url.clone())
        .load()
        .map_err(|e| {
            tracing::error!("Failed to load configuration: {}", e);
            e
        })?;
    tracing::debug!(api = %settings.api_url, "Configuration loaded from {:?}", args.config);

    let app = App::new(settings).await?;
    let result = run(&app, args.command).await;
    if let Err(e) = &result {
        tracing::error!(error = %format!("{e:#}"), "Command failed");
        eprintln!("error: {e}");
    }
    result
}

async fn run(app: &App, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => commands::auth::login(app, email, password).await,
        Command::Register {
            full_name,
            email,
            password,
            confirm_password,
        } => commands::auth::register(app, full_name, email, password, confirm_password).await,
        Command::Logout => commands::auth::logout(app).await,
        Command::Whoami => commands::auth::whoami(app).await,
        Command::Profile => commands::auth::profile(app).await,
        Command::Products(filter) => {
            commands::catalog::list(
                app,
                filter.search,
                filter.sort,
                filter.min_price,
                filter.max_price,
            )
            .await
        }
        Command::Product { id } => commands::catalog::show(app, id).await,
        Command::Cart { action } => match action.unwrap_or(CartCommand::Show) {
            CartCommand::Show => commands::cart::show(app).await,
            CartCommand::Add {
                product_id,
                quantity,
            } => commands::cart::add(app, product_id, quantity).await,
            CartCommand::Set { line_id, quantity } => {
                commands::cart::set(app, line_id, quantity).await
            }
            CartCommand::Inc { line_id } => commands::cart::increment(app, line_id).await,
            CartCommand::Dec { line_id } => commands::cart::decrement(app, line_id).await,
            CartCommand::Remove { line_id } => commands::cart::remove(app, line_id).await,
        },
        Command::Checkout => commands::checkout::run(app).await,
        Command::Orders(filter) => {
            commands::orders::list(app, filter.search, filter.status, filter.sort).await
        }
        Command::Order { id } => commands::orders::show(app, id).await,
        Command::Admin { action } => match action {
            AdminCommand::Stats => commands::admin::stats(app).await,
            AdminCommand::Products { search } => commands::admin::products(app, &search).await,
            AdminCommand::CreateProduct(fields) => {
                commands::admin::create_product(app, fields.into()).await
            }
            AdminCommand::UpdateProduct { id, fields } => {
                commands::admin::update_product(app, id, fields.into()).await
            }
            AdminCommand::DeleteProduct { id } => commands::admin::delete_product(app, id).await,
            AdminCommand::Orders { search, status } => {
                commands::admin::orders(app, &search, status).await
            }
            AdminCommand::SetStatus { order_id, status } => {
                commands::admin::set_status(app, order_id, status).await
            }
            AdminCommand::Users { search } => commands::admin::users(app, &search).await,
            AdminCommand::SetRole { user_id, role } => {
                commands::admin::set_role(app, user_id, role).await
            }
        },
    }
}

impl From<ProductFields> for dshop_core::validation::ProductForm {
    fn from(f: ProductFields) -> Self {
        Self {
            title: f.title,
            description: f.description,
            price: f.price,
            stock: f.stock,
            sku: f.sku,
            image_url: f.image_url,
        }
    }
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
