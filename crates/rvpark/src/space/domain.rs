use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Occupancy state of a rental space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpaceStatus {
    Vacant,
    Reserved,
    Occupied,
}

impl SpaceStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SpaceStatus::Vacant => "Vacant",
            SpaceStatus::Reserved => "Reserved",
            SpaceStatus::Occupied => "Occupied",
        }
    }
}

impl fmt::Display for SpaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Billing cadence shown on a space's display card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentCadence {
    Monthly,
    Weekly,
    Daily,
}

/// A rental space, grouped into a named section of the park.
///
/// `reserved` and `tenant_id` are redundant with `status` on purpose — they
/// mirror how the record is stored — and the pair of invariants
/// `reserved ⟺ Reserved` and `tenant_id ⟺ Occupied` is enforced on every
/// administrative write via [`Space::check_invariants`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub id: String,
    pub section: String,
    pub status: SpaceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    pub reserved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_cadence: Option<PaymentCadence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_payment: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tenant_notified: bool,
    #[serde(default)]
    pub past_due_amount: f64,
}

impl Space {
    /// A freshly seeded vacant space with no display state.
    pub fn vacant(id: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            section: section.into(),
            status: SpaceStatus::Vacant,
            tenant_id: None,
            reserved: false,
            payment_cadence: None,
            next_payment: None,
            tenant_notified: false,
            past_due_amount: 0.0,
        }
    }

    /// Validate the status/flag/binding consistency rules.
    pub fn check_invariants(&self) -> Result<(), SpaceValidation> {
        if self.reserved != (self.status == SpaceStatus::Reserved) {
            return Err(SpaceValidation::ReservedFlagMismatch);
        }
        if self.tenant_id.is_some() && self.status != SpaceStatus::Occupied {
            return Err(SpaceValidation::TenantWithoutOccupied);
        }
        if self.status == SpaceStatus::Occupied && self.tenant_id.is_none() {
            return Err(SpaceValidation::OccupiedWithoutTenant);
        }
        Ok(())
    }

    pub(crate) fn clear_payment_display(&mut self) {
        self.payment_cadence = None;
        self.next_payment = None;
        self.tenant_notified = false;
        self.past_due_amount = 0.0;
    }
}

/// A space enriched with the read-time display status derived from the
/// tenant's payment standing. Never written back to storage.
#[derive(Debug, Clone, Serialize)]
pub struct SpaceView {
    #[serde(flatten)]
    pub space: Space,
    pub display_status: String,
}

/// Consistency violations rejected by the administrative update path.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpaceValidation {
    #[error("the reserved flag is only valid for spaces in Reserved status")]
    ReservedFlagMismatch,
    #[error("a tenant may only be bound to a space in Occupied status")]
    TenantWithoutOccupied,
    #[error("occupied spaces must have a tenant bound")]
    OccupiedWithoutTenant,
}

/// Sort key that orders "A2" before "A10" by comparing alternating text and
/// numeric runs of the ID.
pub(crate) fn natural_key(id: &str) -> Vec<IdSegment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut numeric = false;

    for ch in id.chars() {
        if current.is_empty() {
            numeric = ch.is_ascii_digit();
        } else if ch.is_ascii_digit() != numeric {
            segments.push(IdSegment::from_run(std::mem::take(&mut current), numeric));
            numeric = ch.is_ascii_digit();
        }
        current.push(ch);
    }
    if !current.is_empty() {
        segments.push(IdSegment::from_run(current, numeric));
    }
    segments
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum IdSegment {
    Text(String),
    Number(u64),
}

impl IdSegment {
    fn from_run(run: String, numeric: bool) -> Self {
        if numeric {
            // Runs longer than a u64 still order after every valid number.
            run.parse().map_or(IdSegment::Number(u64::MAX), IdSegment::Number)
        } else {
            IdSegment::Text(run)
        }
    }
}

pub(crate) fn compare_ids(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}
