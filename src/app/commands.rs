//! Inbound commands to the application service.
//!
//! These represent control events requested by the outside world (Home
//! Assistant API, a local button, a test harness) that the
//! [`StoveService`](super::service::StoveService) interprets and turns
//! into stove commands.

use crate::climate::ClimateMode;

/// A single control event. Either field may be absent because one event
/// can change the mode, the target temperature, or both.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClimateCall {
    pub mode: Option<ClimateMode>,
    pub target_temperature: Option<f32>,
}

impl ClimateCall {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ClimateMode) -> Self {
        self.mode = Some(mode);
        self
    }

    #[must_use]
    pub fn with_target_temperature(mut self, target: f32) -> Self {
        self.target_temperature = Some(target);
        self
    }

    /// Requested mode, if this event sets one.
    pub fn get_mode(&self) -> Option<ClimateMode> {
        self.mode
    }

    /// Requested target temperature, if this event sets one.
    pub fn get_target_temperature(&self) -> Option<f32> {
        self.target_temperature
    }

    pub fn is_empty(&self) -> bool {
        self.mode.is_none() && self.target_temperature.is_none()
    }
}
