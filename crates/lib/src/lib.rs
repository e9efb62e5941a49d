//! reentry-lib: a persistent cache of installed distributions' entry points
//!
//! This crate provides:
//! - `EntryPoint`: a parsed `name = module:attr [extras]` registration
//! - `EntryPointStore`: the cache itself, queryable by distribution, group and name
//! - `scan`: discovery of installed distributions feeding the cache

pub mod consts;
pub mod entrypoint;
pub mod platform;
pub mod scan;
pub mod store;

pub use entrypoint::{EntryPoint, SpecError};
pub use store::{EntryPointMatch, EntryPointStore, Selector, StoreError};
