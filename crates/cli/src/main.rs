//! Elegance CLI - storefront and admin console.
//!
//! # Usage
//!
//! ```bash
//! # Browse and buy
//! elegance products list --featured
//! elegance cart add linen-dress --size M
//! elegance checkout --address "Moi Avenue 12" --city Nairobi
//!
//! # Administer
//! elegance auth signin -e admin@example.com -p secret
//! elegance admin stats
//! elegance pages import home.yaml
//! elegance site set theme '{"primary_color": "#8b5cf6"}'
//! ```
//!
//! # Environment Variables
//!
//! See [`elegance_storefront::config`]; `RUST_LOG` controls log output.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use elegance_storefront::ClientConfig;

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "elegance")]
#[command(author, version, about = "Elegance storefront and admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign up, sign in and manage the current account
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// First-run store setup
    Setup {
        #[command(subcommand)]
        action: SetupAction,
    },
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Browse categories
    Categories {
        #[command(subcommand)]
        action: CategoriesAction,
    },
    /// Manage the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the cart, paid with M-Pesa
    Checkout(commands::checkout::CheckoutArgs),
    /// Your orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Website configuration
    Site {
        #[command(subcommand)]
        action: SiteAction,
    },
    /// Website-builder pages
    Pages {
        #[command(subcommand)]
        action: PagesAction,
    },
    /// Store administration
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Create a customer account
    Signup(commands::auth::AccountArgs),
    /// Sign in and remember the session
    Signin {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Forget the stored session
    Signout,
    /// Show the signed-in account
    Me,
}

#[derive(Subcommand)]
enum SetupAction {
    /// Show whether an administrator exists
    Status,
    /// Create the first administrator
    Admin(commands::auth::AccountArgs),
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List(commands::catalog::ProductListArgs),
    /// Show one product
    Show { slug: String },
}

#[derive(Subcommand)]
enum CategoriesAction {
    /// List categories
    List,
    /// Show one category
    Show { slug: String },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    Show,
    /// Add a product by slug
    Add {
        slug: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Remove a line
    Remove {
        product_id: String,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Set a line's quantity (0 removes it)
    Set {
        product_id: String,
        quantity: u32,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders; defaults to the signed-in user's orders
    List {
        /// Lookup field (`id`, `user_id`, `email`)
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        value: Option<String>,
    },
    /// Cancel an order
    Cancel { order_id: String },
}

#[derive(Subcommand)]
enum SiteAction {
    /// Show the merged website configuration
    Show {
        /// Only this section
        key: Option<String>,
    },
    /// Save one section from a JSON value
    Set { key: String, value: String },
    /// Print the WhatsApp chat link
    WhatsappLink,
}

#[derive(Subcommand)]
enum PagesAction {
    /// List pages
    List,
    /// Show a page and its sections
    Show { id: String },
    /// Create a page from a template
    Create {
        title: String,
        /// `home`, `about`, `contact` or `custom`
        #[arg(short, long, default_value = "custom")]
        template: String,
    },
    /// Create or update a page from a YAML file
    Import { file: String },
    /// Append a section with its defaults
    AddSection {
        id: String,
        /// Section type, e.g. `hero`, `gallery`
        kind: String,
    },
    /// Remove a section
    RemoveSection { id: String, section_id: String },
    /// Move a section up or down
    MoveSection {
        id: String,
        section_id: String,
        /// `up` or `down`
        direction: String,
    },
    /// Publish a page
    Publish { id: String },
    /// Return a page to draft
    Unpublish { id: String },
    /// Copy a page
    Duplicate { id: String },
    /// Delete a page
    Delete { id: String },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List accounts
    Users {
        /// Filter by name or email
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Change an account's role (`admin` or `customer`)
    SetRole { user_id: String, role: String },
    /// Delete an account
    DeleteUser { user_id: String },
    /// List every order
    Orders {
        /// Filter by customer name, email or order ID
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Move an order to a new status
    SetOrderStatus { order_id: String, status: String },
    /// Dashboard figures
    Stats,
    /// Upload an image and print its URL
    UploadImage { file: String },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "elegance=info,elegance_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = commands::Context::new(config)?;

    match cli.command {
        Commands::Auth { action } => match action {
            AuthAction::Signup(args) => commands::auth::sign_up(&ctx, args).await?,
            AuthAction::Signin { email, password } => {
                commands::auth::sign_in(&ctx, email, password).await?;
            }
            AuthAction::Signout => commands::auth::sign_out(&ctx).await?,
            AuthAction::Me => commands::auth::me(&ctx).await?,
        },
        Commands::Setup { action } => match action {
            SetupAction::Status => commands::auth::setup_status(&ctx).await?,
            SetupAction::Admin(args) => commands::auth::setup_admin(&ctx, args).await?,
        },
        Commands::Products { action } => match action {
            ProductsAction::List(args) => commands::catalog::list_products(&ctx, args).await?,
            ProductsAction::Show { slug } => commands::catalog::show_product(&ctx, &slug).await?,
        },
        Commands::Categories { action } => match action {
            CategoriesAction::List => commands::catalog::list_categories(&ctx).await?,
            CategoriesAction::Show { slug } => {
                commands::catalog::show_category(&ctx, &slug).await?;
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx)?,
            CartAction::Add {
                slug,
                quantity,
                size,
                color,
            } => commands::cart::add(&ctx, &slug, quantity, size, color).await?,
            CartAction::Remove {
                product_id,
                size,
                color,
            } => commands::cart::remove(&ctx, &product_id, size.as_deref(), color.as_deref())?,
            CartAction::Set {
                product_id,
                quantity,
                size,
                color,
            } => commands::cart::set_quantity(
                &ctx,
                &product_id,
                quantity,
                size.as_deref(),
                color.as_deref(),
            )?,
            CartAction::Clear => commands::cart::clear(&ctx)?,
        },
        Commands::Checkout(args) => commands::checkout::run(&ctx, args).await?,
        Commands::Orders { action } => match action {
            OrdersAction::List { key, value } => {
                commands::orders::list(&ctx, key.as_deref(), value.as_deref()).await?;
            }
            OrdersAction::Cancel { order_id } => commands::orders::cancel(&ctx, &order_id).await?,
        },
        Commands::Site { action } => match action {
            SiteAction::Show { key } => commands::site::show(&ctx, key.as_deref()).await?,
            SiteAction::Set { key, value } => commands::site::set(&ctx, &key, &value).await?,
            SiteAction::WhatsappLink => commands::site::whatsapp_link(&ctx).await?,
        },
        Commands::Pages { action } => run_pages(&ctx, action).await?,
        Commands::Admin { action } => run_admin(&ctx, action).await?,
    }
    Ok(())
}

async fn run_pages(
    ctx: &commands::Context,
    action: PagesAction,
) -> Result<(), Box<dyn std::error::Error>> {
    use commands::pages;

    match action {
        PagesAction::List => pages::list(ctx).await?,
        PagesAction::Show { id } => pages::show(ctx, &id).await?,
        PagesAction::Create { title, template } => pages::create(ctx, &title, &template).await?,
        PagesAction::Import { file } => pages::import(ctx, &file).await?,
        PagesAction::AddSection { id, kind } => pages::add_section(ctx, &id, &kind).await?,
        PagesAction::RemoveSection { id, section_id } => {
            pages::remove_section(ctx, &id, &section_id).await?;
        }
        PagesAction::MoveSection {
            id,
            section_id,
            direction,
        } => pages::move_section(ctx, &id, &section_id, &direction).await?,
        PagesAction::Publish { id } => pages::publish(ctx, &id).await?,
        PagesAction::Unpublish { id } => pages::unpublish(ctx, &id).await?,
        PagesAction::Duplicate { id } => pages::duplicate(ctx, &id).await?,
        PagesAction::Delete { id } => pages::delete(ctx, &id).await?,
    }
    Ok(())
}

async fn run_admin(
    ctx: &commands::Context,
    action: AdminAction,
) -> Result<(), Box<dyn std::error::Error>> {
    use commands::admin;

    match action {
        AdminAction::Users { search } => admin::users(ctx, search.as_deref()).await?,
        AdminAction::SetRole { user_id, role } => admin::set_role(ctx, &user_id, &role).await?,
        AdminAction::DeleteUser { user_id } => admin::delete_user(ctx, &user_id).await?,
        AdminAction::Orders { search } => admin::orders(ctx, search.as_deref()).await?,
        AdminAction::SetOrderStatus { order_id, status } => {
            admin::set_order_status(ctx, &order_id, &status).await?;
        }
        AdminAction::Stats => admin::stats(ctx).await?,
        AdminAction::UploadImage { file } => admin::upload_image(ctx, &file).await?,
    }
    Ok(())
}
