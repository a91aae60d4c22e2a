//! Functional core for blogstore.
//!
//! Everything in this crate is store-agnostic: the key scheme used by the
//! single-table design, the domain records, the item model, and the trait
//! that storage backends implement. Backends and services live in the
//! `blogstore` crate.

pub mod blog;
pub mod keys;
pub mod storage;
