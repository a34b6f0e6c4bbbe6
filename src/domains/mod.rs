//! Domains module containing business logic organized by bounded contexts.
//!
//! This server has a single domain: tools backed by the Carity API.

pub mod tools;
