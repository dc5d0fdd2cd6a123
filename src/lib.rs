//! RIKA stove bridge library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod climate;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod persist;
pub mod protocol;
pub mod runtime;

pub mod adapters;
pub mod pins;
