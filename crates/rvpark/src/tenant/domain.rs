use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A resident renting exactly one space at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub move_in_date: DateTime<Utc>,
    pub space_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a tenant. The move-in date defaults to the current
/// time when unset; the ID and timestamps are assigned server-side.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewTenant {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub space_id: String,
    #[serde(default)]
    pub move_in_date: Option<DateTime<Utc>>,
}

/// Payload for updating a tenant. Creation timestamp and move-in date are
/// preserved from the stored record; changing `space_id` triggers the
/// move-out/move-in flow.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TenantUpdate {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub space_id: String,
}

/// Field constraints rejected before anything is persisted.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TenantValidation {
    #[error("tenant name is required")]
    NameRequired,
    #[error("space id is required")]
    SpaceRequired,
}
