//! # Mock Provider

pub mod fixtures;
pub mod wallet;

pub use wallet::Wallet;
