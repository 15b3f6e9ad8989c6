//! Application core: controller orchestration, zero direct I/O.
//!
//! All interaction with the fixture happens through **port traits**
//! defined in [`ports`], keeping this layer fully testable without real
//! peripherals.

pub mod events;
pub mod ports;
pub mod service;

pub use events::AppEvent;
pub use service::Controller;
