use crate::errors::Result;
use crate::portfolio::portfolio_model::{NewPortfolioAsset, PortfolioAsset, PortfolioAssetUpdate};
use async_trait::async_trait;

/// Record service for portfolio assets
#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    async fn list(&self) -> Result<Vec<PortfolioAsset>>;
    async fn create(&self, new_asset: NewPortfolioAsset) -> Result<PortfolioAsset>;
    async fn update(&self, asset_id: &str, changes: PortfolioAssetUpdate) -> Result<PortfolioAsset>;
    async fn delete(&self, asset_id: &str) -> Result<()>;
    /// Reprices every held asset and returns the full, freshly priced list.
    async fn refresh_prices(&self) -> Result<Vec<PortfolioAsset>>;
}
