//! Portfolio domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Broad type of a held asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Equity, // Stocks and ETFs that trade like stocks
    Fund,   // Mutual funds and other pooled vehicles
    Crypto,
    #[default]
    #[serde(other)]
    Other,
}

impl AssetType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AssetType::Equity => "equity",
            AssetType::Fund => "fund",
            AssetType::Crypto => "crypto",
            AssetType::Other => "other",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = std::convert::Infallible;

    /// Unknown labels map to `Other` so a new server-side type never breaks a load.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "equity" | "stock" | "share" | "etf" => AssetType::Equity,
            "fund" | "mutual_fund" | "mutualfund" => AssetType::Fund,
            "crypto" | "cryptocurrency" => AssetType::Crypto,
            _ => AssetType::Other,
        })
    }
}

/// Domain model representing a held portfolio asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioAsset {
    pub id: String,
    pub symbol: String,
    pub asset_type: AssetType,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub purchase_date: NaiveDate,
    /// Last market price. Only a price refresh or a full load changes it.
    pub current_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PortfolioAsset {
    /// `None` when quantity × current price is not representable.
    pub fn checked_market_value(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.current_price)
    }

    pub fn checked_cost_basis(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.purchase_price)
    }

    /// Saturates at the `Decimal` bounds. Validated records never reach them.
    pub fn market_value(&self) -> Decimal {
        self.quantity.saturating_mul(self.current_price)
    }

    pub fn cost_basis(&self) -> Decimal {
        self.quantity.saturating_mul(self.purchase_price)
    }
}

/// Input model for adding an asset. The service sets the current price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolioAsset {
    pub symbol: String,
    pub asset_type: AssetType,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub purchase_date: NaiveDate,
}

/// Partial update of holding fields. Prices are not editable here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioAssetUpdate {
    pub symbol: Option<String>,
    pub asset_type: Option<AssetType>,
    pub quantity: Option<Decimal>,
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
}

impl PortfolioAssetUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, asset: &mut PortfolioAsset) {
        if let Some(symbol) = &self.symbol {
            asset.symbol = symbol.clone();
        }
        if let Some(asset_type) = self.asset_type {
            asset.asset_type = asset_type;
        }
        if let Some(quantity) = self.quantity {
            asset.quantity = quantity;
        }
        if let Some(purchase_price) = self.purchase_price {
            asset.purchase_price = purchase_price;
        }
        if let Some(purchase_date) = self.purchase_date {
            asset.purchase_date = purchase_date;
        }
    }
}
