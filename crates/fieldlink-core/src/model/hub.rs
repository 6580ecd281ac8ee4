// ── Hub activation ──

use serde::{Deserialize, Serialize};
use strum::Display;

use super::Alliance;

/// Scoring state of one alliance hub.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HubStatus {
    Active,
    #[default]
    Inactive,
    /// Active, but about to hand over to the other alliance.
    Warning,
}

impl HubStatus {
    /// Balls scored now count. A warning hub still scores.
    pub fn is_scoring(self) -> bool {
        matches!(self, Self::Active | Self::Warning)
    }
}

/// Status of both hubs, as derived from one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubStatuses {
    pub red: HubStatus,
    pub blue: HubStatus,
}

impl HubStatuses {
    pub fn both(status: HubStatus) -> Self {
        Self {
            red: status,
            blue: status,
        }
    }

    /// `active` for one alliance, `inactive` for the other.
    pub fn only(active: Alliance) -> Self {
        let mut hubs = Self::both(HubStatus::Inactive);
        *hubs.get_mut(active) = HubStatus::Active;
        hubs
    }

    pub fn get(&self, alliance: Alliance) -> HubStatus {
        match alliance {
            Alliance::Red => self.red,
            Alliance::Blue => self.blue,
        }
    }

    pub fn get_mut(&mut self, alliance: Alliance) -> &mut HubStatus {
        match alliance {
            Alliance::Red => &mut self.red,
            Alliance::Blue => &mut self.blue,
        }
    }
}
