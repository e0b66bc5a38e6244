//! Domain logic for the battery telemetry bridge.
//!
//! Everything in this crate is pure: no network, no clock, no global state.
//! The API and Tuya crates fetch data points and hand them in here.

pub mod battery;
pub mod error;
pub mod soc;
pub mod telemetry;
