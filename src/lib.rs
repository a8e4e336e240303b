//! Raydium AMM v4 pool decoding and single-pool swap assembly.

pub mod client;
pub mod config;
pub mod dex;
pub mod error;
pub mod rpc;
pub mod state;
pub mod submit;
pub mod transactions;
pub mod tx;
pub mod utils;

pub use client::PoolClient;
pub use dex::SwapDirection;
pub use submit::{SwapOutcome, SwapResult};
