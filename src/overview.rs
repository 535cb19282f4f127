use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::roles::Role;

/// A card on the overview dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Widget {
    /// Accumulated revenue.
    Income,
    /// Patients seen.
    Patients,
    /// Doctors on duty.
    Doctors,
    /// Distinct medicines in stock.
    Medicines,
    /// Self-service guide pointing patients at bookings and billing.
    ServiceGuide,
}

/// widgets_for
///
/// The overview cards rendered for `role`, in display order.
pub fn widgets_for(role: Role) -> &'static [Widget] {
    match role {
        Role::OrgAdmin | Role::GlobalAdmin => &[
            Widget::Income,
            Widget::Patients,
            Widget::Doctors,
            Widget::Medicines,
        ],
        Role::Finance => &[Widget::Income],
        Role::Doctor | Role::Registration => &[Widget::Patients, Widget::Medicines],
        Role::Storekeeper => &[Widget::Medicines],
        Role::GeneralUser => &[Widget::ServiceGuide],
    }
}

/// Whether the overview of `role` shows statistics and so needs the stats endpoint.
/// Patients never call it; the API would refuse them.
pub fn needs_stats(role: Role) -> bool {
    widgets_for(role).iter().any(|w| *w != Widget::ServiceGuide)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_gets_at_least_one_widget() {
        for role in Role::ALL {
            assert!(!widgets_for(role).is_empty(), "{role} has no widgets");
        }
    }

    #[test]
    fn only_patients_skip_statistics() {
        for role in Role::ALL {
            assert_eq!(needs_stats(role), role != Role::GeneralUser);
        }
    }
}
