//! Ledger events module.
//!
//! Event types plus the sink trait the ledger service emits through after
//! each applied mutation.

mod ledger_event;
mod sink;

pub use ledger_event::*;
pub use sink::*;
