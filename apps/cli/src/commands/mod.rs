//! # Commands
//!
//! One module per top-level subcommand. Every handler returns
//! `anyhow::Result` and prints its own output.
//!
//! ```text
//! main ──► commands::run ──┬── auth      signup / verify / login
//!                          ├── items     list / add / edit / delete
//!                          ├── products  list / add / delete
//!                          ├── orders    grouped recent orders
//!                          ├── report    inventory PDF
//!                          ├── bill      interactive bill loop
//!                          └── config    init / show
//! ```

mod auth;
mod bill;
mod config;
mod items;
mod orders;
mod products;
mod report;

use std::path::PathBuf;

use crate::cli::Command;
use crate::console::Console;
use crate::context::AppContext;

pub async fn run(command: Command, ctx: &AppContext, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut console = Console::new();

    match command {
        Command::Signup { email } => auth::signup(ctx, &email).await,
        Command::Verify { name, otp } => auth::verify(ctx, &mut console, name, otp).await,
        Command::Login => auth::login(ctx, &mut console).await,
        Command::Items(cmd) => items::run(ctx, &mut console, cmd).await,
        Command::Products(cmd) => products::run(ctx, &mut console, cmd).await,
        Command::Orders { page } => orders::run(ctx, &mut console, page).await,
        Command::Report { search, out } => report::run(ctx, &mut console, search, out).await,
        Command::Bill => bill::run(ctx, &mut console).await,
        Command::Config(cmd) => config::run(ctx, cmd, config_path),
    }
}
