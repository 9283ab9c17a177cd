//! Account and first-run setup commands.

use clap::Args;
use elegance_core::models::{SignInRequest, SignUpRequest};

use super::Context;
use crate::output;

/// Details for a new account.
#[derive(Args, Debug)]
pub struct AccountArgs {
    #[arg(short, long)]
    pub email: String,
    #[arg(short, long)]
    pub password: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long, default_value = "")]
    pub phone: String,
}

impl From<AccountArgs> for SignUpRequest {
    fn from(args: AccountArgs) -> Self {
        Self {
            email: args.email,
            password: args.password,
            first_name: args.first_name,
            last_name: args.last_name,
            phone_number: args.phone,
        }
    }
}

pub async fn sign_up(ctx: &Context, args: AccountArgs) -> Result<(), Box<dyn std::error::Error>> {
    let user = ctx.client.sign_up(&args.into()).await?;
    output::print(&format!(
        "Account created for {}. Sign in to continue.",
        user.email
    ));
    Ok(())
}

pub async fn sign_in(
    ctx: &Context,
    email: String,
    password: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = ctx
        .client
        .sign_in(&SignInRequest { email, password })
        .await?;
    output::print(&format!(
        "Signed in as {} ({})",
        session.user.full_name(),
        session.user.role
    ));
    Ok(())
}

pub async fn sign_out(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.client.sign_out().await?;
    output::print("Signed out");
    Ok(())
}

pub async fn me(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    if !ctx.client.is_signed_in().await {
        output::print("Not signed in");
        return Ok(());
    }
    let user = ctx.client.me().await?;
    output::print(&output::user_line(&user));
    Ok(())
}

pub async fn setup_status(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let status = ctx.client.setup_status().await?;
    if status.has_admin {
        output::print("Store is set up");
    } else {
        output::print("No administrator yet. Run `elegance setup admin` to create one.");
    }
    Ok(())
}

pub async fn setup_admin(
    ctx: &Context,
    args: AccountArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = ctx.client.setup_admin(&args.into()).await?;
    output::print(&format!(
        "Administrator {} created and signed in",
        session.user.email
    ));
    Ok(())
}
