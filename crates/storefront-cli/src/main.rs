mod cart;
mod widget;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::widget::WidgetArgs;

#[derive(Debug, Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Drive the storefront purchase widget from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a variant from option selections and print the widget state
    Resolve {
        #[command(flatten)]
        widget: WidgetArgs,
    },
    /// Resolve a variant, then add it to the cart
    Add {
        #[command(flatten)]
        widget: WidgetArgs,
        /// Quantity submitted with the product form
        #[arg(long, default_value = "1")]
        quantity: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = storefront_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, shop_url = ?config.shop_url, "configuration loaded");

    match cli.command {
        Commands::Resolve { widget } => widget::run_resolve(&config, &widget).await,
        Commands::Add { widget, quantity } => cart::run_add(&config, &widget, quantity).await,
    }
}

#[cfg(test)]
mod tests;
