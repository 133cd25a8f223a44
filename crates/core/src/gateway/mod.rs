//! Record service implementations.

mod in_memory_service;

pub use in_memory_service::InMemoryRecordService;
