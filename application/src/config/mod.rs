//! Application-level configuration.
//!
//! - [`DeliveryParams`]: response delivery control (mode preference, tail
//!   read timeout, poll backoff)

pub mod delivery_params;

pub use delivery_params::DeliveryParams;
