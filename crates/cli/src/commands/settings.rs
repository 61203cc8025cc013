//! Settings commands.

use quotebox_admin::db::QuoteStore;
use quotebox_admin::services::quotes;
use quotebox_core::{Email, ShopDomain};

use super::{CliError, connect};

/// Set a shop's notification email, creating its settings row if needed.
///
/// # Errors
///
/// Returns an error if the shop or email is invalid, or the store fails.
pub async fn set(shop: &str, email: &str) -> Result<(), CliError> {
    let shop = ShopDomain::parse(shop)?;
    let email = Email::parse(email)?;
    let store = connect().await?;

    let settings = quotes::update_settings(&store, shop.as_str(), email.as_str()).await?;
    tracing::info!(
        shop = %settings.shop_id,
        admin_email = %settings.admin_email,
        "Notification email saved"
    );

    store.close().await;
    Ok(())
}
