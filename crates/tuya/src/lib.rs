//! Client for the Tuya cloud OpenAPI.
//!
//! Covers the small slice of the API the bridge needs: HMAC request
//! signing, the access-token grant/refresh cycle, and the device status
//! query. [`DeviceStatusSource`] is the seam the HTTP layer depends on.

pub mod client;
pub mod error;
pub mod sign;
pub mod source;
pub mod token;

pub use client::{TuyaConfig, TuyaOpenApi};
pub use error::TuyaError;
pub use source::DeviceStatusSource;
