//! Per-shop settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quotebox_core::SettingsId;

/// Settings row. There is at most one per shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub id: SettingsId,
    pub shop_id: String,
    /// Address that receives new quote notifications.
    pub admin_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
