// Adapters layer: concrete implementations for external systems (database, filesystem).

pub mod local;
pub mod postgres;
