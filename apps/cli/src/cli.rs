//! Command line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "stockroom", version, about = "Shop inventory and billing client")]
pub struct Cli {
    /// Config file (defaults to the platform config directory).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Account email; overrides `api.email` from the config.
    #[arg(long, global = true)]
    pub email: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Request a signup OTP by email.
    Signup {
        email: String,
    },

    /// Finish signup with the emailed OTP. Password from STOCKROOM_PASSWORD or a prompt.
    Verify {
        #[arg(long)]
        name: String,

        #[arg(long)]
        otp: String,
    },

    /// Check credentials and show the account.
    Login,

    /// Inventory items.
    #[command(subcommand)]
    Items(ItemsCommand),

    /// Admin product catalogue.
    #[command(subcommand)]
    Products(ProductsCommand),

    /// Recent orders, grouped by minute.
    Orders {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Export the inventory table as a PDF.
    Report {
        /// Only items whose name or description contains this text.
        #[arg(long)]
        search: Option<String>,

        /// Output directory (defaults to `invoice.output_dir`).
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Interactive bill: search, add, adjust and finalize.
    Bill,

    /// Config file helpers.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

#[derive(Debug, Subcommand)]
pub enum ItemsCommand {
    List(ListArgs),

    Add {
        #[arg(long)]
        name: String,

        /// Unit price, e.g. 12.50
        #[arg(long)]
        price: String,

        #[arg(long)]
        quantity: i64,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "")]
        category: String,

        #[arg(long)]
        image: Option<String>,
    },

    /// Change the given fields of an item; others keep their values.
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        price: Option<String>,

        #[arg(long)]
        quantity: Option<i64>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        category: Option<String>,
    },

    Delete {
        id: String,
    },

    /// Units in stock, stock value and low-stock count.
    Summary,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    List(ListArgs),

    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        category: String,

        #[arg(long)]
        image: Option<String>,
    },

    Delete {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with default values.
    Init {
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration.
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_items_list() {
        let cli = Cli::try_parse_from(["stockroom", "items", "list", "--search", "pen", "--page", "2"]).unwrap();
        match cli.command {
            Command::Items(ItemsCommand::List(args)) => {
                assert_eq!(args.search.as_deref(), Some("pen"));
                assert_eq!(args.page, 2);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_items_summary() {
        let cli = Cli::try_parse_from(["stockroom", "items", "summary"]).unwrap();
        assert!(matches!(cli.command, Command::Items(ItemsCommand::Summary)));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["stockroom", "bill", "--email", "owner@shop.in", "--config", "s.toml"]).unwrap();
        assert!(matches!(cli.command, Command::Bill));
        assert_eq!(cli.email.as_deref(), Some("owner@shop.in"));
        assert_eq!(cli.config, Some(PathBuf::from("s.toml")));
    }

    #[test]
    fn test_items_add_requires_price() {
        assert!(Cli::try_parse_from(["stockroom", "items", "add", "--name", "Pen", "--quantity", "3"]).is_err());
    }
}
