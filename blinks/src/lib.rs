//! Solana Actions service for lucky packets: SOL gifts split into a fixed
//! number of shares, claimable once per wallet until they expire.

pub mod actions;
pub mod card;
pub mod config;
pub mod consts;
pub mod contract;
pub mod cors;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod format;
pub mod packet;
pub mod program;
pub mod router;
pub mod schema;
pub mod state;
pub mod tx;
