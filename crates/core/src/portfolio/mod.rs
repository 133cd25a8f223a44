//! Portfolio module - held assets and the record service trait.

mod portfolio_model;
mod portfolio_traits;

pub use portfolio_model::{AssetType, NewPortfolioAsset, PortfolioAsset, PortfolioAssetUpdate};
pub use portfolio_traits::PortfolioServiceTrait;
