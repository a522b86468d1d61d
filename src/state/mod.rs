//! State module for tracking per-category pagination chains
//!
//! Each category is a two-state machine: it starts `Paginating` and moves to
//! `Done` exactly once, recording why the chain ended.

mod chain_state;

pub use chain_state::{ChainEnd, ChainState};
