//! Record builders shared by unit tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::expenses::Expense;
use crate::goals::Goal;
use crate::portfolio::{AssetType, PortfolioAsset};

pub fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
}

pub fn expense(id: &str, amount: Decimal, category_id: &str) -> Expense {
    Expense {
        id: id.to_string(),
        amount,
        category_id: category_id.to_string(),
        description: format!("Expense {}", id),
        store_name: "Corner Shop".to_string(),
        receipt_image_url: None,
        location: None,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn expense_on(id: &str, amount: Decimal, category_id: &str, date: NaiveDate) -> Expense {
    let at = date.and_hms_opt(12, 0, 0).unwrap().and_utc();
    Expense {
        created_at: at,
        updated_at: at,
        ..expense(id, amount, category_id)
    }
}

pub fn goal(id: &str, target: Decimal, current: Decimal) -> Goal {
    Goal {
        id: id.to_string(),
        user_id: "user-1".to_string(),
        family_id: "family-1".to_string(),
        goal_name: format!("Goal {}", id),
        target_amount: target,
        current_amount: current,
        deadline: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        monthly_contribution: Decimal::ZERO,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn asset(id: &str, quantity: Decimal, purchase: Decimal, current: Decimal) -> PortfolioAsset {
    PortfolioAsset {
        id: id.to_string(),
        symbol: id.to_uppercase(),
        asset_type: AssetType::Equity,
        quantity,
        purchase_price: purchase,
        purchase_date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
        current_price: current,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn ids<R: crate::records::LedgerRecord>(records: &[R]) -> Vec<&str> {
    records.iter().map(|r| r.id()).collect()
}
