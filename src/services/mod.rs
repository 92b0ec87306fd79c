//! Core services for traversal, classification and aggregation

pub mod aggregate;
pub mod classify;
pub mod hidden;
pub mod resolve;
pub mod traverse;
