#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod error;
mod locate;
mod payload;
mod types;

pub use alloy_primitives::{Address, Bytes, B256, U256};
pub use error::*;
pub use locate::*;
pub use payload::*;
pub use types::*;
