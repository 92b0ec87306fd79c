//! Persistence of scan results

pub mod snapshot;
