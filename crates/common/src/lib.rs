//! Shared primitives for the drip relay: account addresses, the address
//! validator, and process setup helpers (logging, config files).

pub mod address;
pub mod error;
pub mod types;
pub mod utils;

pub use address::{is_valid, validate};
pub use error::AddressError;
pub use types::{Address, ADDRESS_LENGTH};
