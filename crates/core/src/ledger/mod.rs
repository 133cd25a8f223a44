//! Ledger module - mutation application, session state and the service
//! that drives the record services.

mod ledger_service;
mod ledger_state;
mod mutation;
mod mutation_applier;
mod validation;

#[cfg(test)]
mod ledger_service_tests;
#[cfg(test)]
mod mutation_applier_tests;

pub use ledger_service::{LedgerService, SyncFailure, SyncReport};
pub use ledger_state::{Ledger, LedgerSnapshot, SliceStatus};
pub use mutation::{ApplyOutcome, Mutation};
pub use mutation_applier::MutationApplier;
pub use validation::RecordValidator;
