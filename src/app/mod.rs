//! Application core: climate orchestration, zero I/O.
//!
//! This module contains the rules that sit on top of the protocol
//! emulation: applying control calls, restoring and persisting the
//! setpoint, and turning stove reports into published climate state.
//! All interaction with the UART, NVS and the control surface happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
