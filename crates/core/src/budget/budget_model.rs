use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Monthly budget plus per-category ceilings.
///
/// Category ceilings are independent caps; they are not required to add up
/// to the monthly total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// `None` until the user sets a monthly total.
    pub monthly_total: Option<Decimal>,
    pub category_ceilings: BTreeMap<String, Decimal>,
}

impl Budget {
    pub fn ceiling_for(&self, category_id: &str) -> Option<Decimal> {
        self.category_ceilings.get(category_id).copied()
    }

    pub fn set_monthly_total(&mut self, amount: Decimal) {
        self.monthly_total = Some(amount);
    }

    pub fn set_ceiling(&mut self, category_id: impl Into<String>, amount: Decimal) {
        self.category_ceilings.insert(category_id.into(), amount);
    }

    /// Returns the removed ceiling, if any.
    pub fn clear_ceiling(&mut self, category_id: &str) -> Option<Decimal> {
        self.category_ceilings.remove(category_id)
    }
}
