//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements          | Connects to              |
//! |------------|---------------------|--------------------------|
//! | `log_sink` | EventSink           | Serial log output        |
//! |            | ClimatePort         | Serial log output        |
//! | `nvs`      | ConfigPort          | NVS / in-memory store    |
//! |            | StoragePort         |                          |
//! | `time`     | Clock               | ESP32 system timer       |
//! | `uart`     | Transport           | ESP-IDF UART1 (espidf)   |

pub mod log_sink;
pub mod nvs;
pub mod time;
#[cfg(target_os = "espidf")]
pub mod uart;
