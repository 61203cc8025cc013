//! Quote inspection commands.

use quotebox_admin::db::QuoteStore;
use quotebox_admin::services::quotes;
use quotebox_core::ShopDomain;

use super::{CliError, connect};

/// Print a shop's quotes, newest first.
///
/// # Errors
///
/// Returns an error if the shop is invalid or the query fails.
pub async fn list(shop: &str) -> Result<(), CliError> {
    let shop = ShopDomain::parse(shop)?;
    let store = connect().await?;

    let quotes = quotes::get_quotes(&store, shop.as_str()).await?;
    tracing::info!(shop = %shop, count = quotes.len(), "Loaded quotes");

    #[allow(clippy::print_stdout)]
    {
        println!("{:>6}  {:<10}  {:<20}  TITLE", "ID", "STATUS", "CREATED");
        for quote in &quotes {
            println!(
                "{:>6}  {:<10}  {:<20}  {}",
                quote.id.as_i32(),
                quote.status,
                quote.created_at.format("%Y-%m-%d %H:%M:%S"),
                quote.title
            );
        }
    }

    store.close().await;
    Ok(())
}
