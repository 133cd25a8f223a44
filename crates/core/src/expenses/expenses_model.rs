//! Expense domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where an expense was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy in meters, when the device reported one.
    pub accuracy: Option<f64>,
}

/// Domain model representing a confirmed expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub amount: Decimal,
    pub category_id: String,
    pub description: String,
    pub store_name: String,
    pub receipt_image_url: Option<String>,
    pub location: Option<Location>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Calendar date the expense was recorded on.
    pub fn recorded_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

/// Input model for creating a new expense; the service assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub amount: Decimal,
    pub category_id: String,
    pub description: String,
    pub store_name: String,
    pub receipt_image_url: Option<String>,
    pub location: Option<Location>,
}

/// Partial update of an expense. `None` leaves a field unchanged.
///
/// The optional fields take `Some(None)` to clear them; on the wire that is
/// an explicit `null`, while an absent key leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdate {
    pub amount: Option<Decimal>,
    pub category_id: Option<String>,
    pub description: Option<String>,
    pub store_name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub receipt_image_url: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub location: Option<Option<Location>>,
}

impl ExpenseUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the present fields onto an expense.
    pub fn apply_to(&self, expense: &mut Expense) {
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(category_id) = &self.category_id {
            expense.category_id = category_id.clone();
        }
        if let Some(description) = &self.description {
            expense.description = description.clone();
        }
        if let Some(store_name) = &self.store_name {
            expense.store_name = store_name.clone();
        }
        if let Some(url) = &self.receipt_image_url {
            expense.receipt_image_url = url.clone();
        }
        if let Some(location) = self.location {
            expense.location = location;
        }
    }
}

/// Filters for listing expenses. All present filters must match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFilters {
    /// Inclusive lower bound on the recording date.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the recording date.
    pub end_date: Option<NaiveDate>,
    pub category_id: Option<String>,
}

impl ExpenseFilters {
    pub fn for_category(category_id: impl Into<String>) -> Self {
        Self {
            category_id: Some(category_id.into()),
            ..Self::default()
        }
    }

    pub fn between(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
            category_id: None,
        }
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        let date = expense.recorded_on();
        if self.start_date.is_some_and(|start| date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| date > end) {
            return false;
        }
        match &self.category_id {
            Some(category_id) => expense.category_id == *category_id,
            None => true,
        }
    }
}
