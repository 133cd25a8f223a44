//! Ledger settings loaded from the environment.

mod settings_model;

pub use settings_model::LedgerSettings;
