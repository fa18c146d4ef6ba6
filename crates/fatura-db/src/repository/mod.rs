//! # Repository Module
//!
//! Database repository implementations for Fatura.
//!
//! ## Available Repositories
//!
//! - [`counter::CounterRepository`] - Document number counters

pub mod counter;
