//! Persistence for the log collection, the active-log slot and the
//! derived statistics. [log_store::LogStore] is the only place in the
//! crate that touches these files.

pub mod entities;
pub mod log_store;
