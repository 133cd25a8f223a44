//! Record store - ordered, identity-unique collections of ledger records.

mod record_collection;
mod record_store;
mod records_model;


pub use record_collection::RecordCollection;
pub use record_store::RecordStore;
pub use records_model::{InsertPosition, LedgerRecord, RecordKind, UpsertOutcome};
