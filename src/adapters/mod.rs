//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements                         | Connects to               |
//! |---------------|------------------------------------|---------------------------|
//! | `hal`         | LedPort, AnalogPort, SerialPort    | embedded-hal PWM and pins |
//! | `sim`         | AnalogPort, LedPort, SerialPort    | host simulation console   |
//! | `time`        | Clock                              | `std::time::Instant`      |
//! | `log_sink`    | EventSink                          | `log` facade              |
//! | `console_log` | `log::Log`                         | stderr                    |

pub mod console_log;
pub mod hal;
pub mod log_sink;
pub mod sim;
pub mod time;
