//! Progress indication while waiting on the gateway

pub mod spinner;

pub use spinner::WaitSpinner;
