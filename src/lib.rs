//! # Chainstate
//!
//! Chain-state resolution layer for cross-chain bridge relayers.
//!
//! Turns point-query, rate-limited RPC endpoints into deterministic answers
//! to the three questions relaying depends on:
//!
//! - which id (block or slot) a chain was at, at a given wall-clock time
//!   ([`finder::BlockFinder`]),
//! - at which id a monotonically increasing on-chain counter first crossed a
//!   target ([`search::BoundarySearch`]),
//! - what the current settlement state of a relay is, given its raw event
//!   stream ([`status::RelayStatusResolver`]).
//!
//! All chain access goes through the [`accessor::ChainAccessor`] trait,
//! supplied by a provider pooling layer outside this crate.

pub mod accessor;
pub mod chains;
pub mod config;
pub mod constants;
pub mod error;
pub mod finder;
pub mod index;
pub mod metrics;
pub mod search;
pub mod status;
pub mod types;
