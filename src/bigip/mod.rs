//! BigIP iControl REST 访问

pub mod client;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use client::BigIpClient;
pub use types::*;
