//! Climate-facing data model.
//!
//! The controller exposed to the outside world looks like a plain
//! thermostat: a mode, a target temperature and a current temperature.
//! How those map onto the stove's own command set is the business of
//! [`crate::protocol::translate`].

use serde::{Deserialize, Serialize};

use crate::config::StoveConfig;

/// Operating mode requested by the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClimateMode {
    Off,
    /// Power mode on the stove: the target temperature is reinterpreted
    /// as a heat output percentage.
    Heat,
    /// Room mode on the stove (thermostat-regulated).
    Cool,
    Auto,
}

impl ClimateMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Heat => "HEAT",
            Self::Cool => "COOL",
            Self::Auto => "AUTO",
        }
    }
}

/// Snapshot published to the control surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateState {
    pub mode: ClimateMode,
    pub target_temperature: f32,
    /// Last temperature reported by the stove, in display units.
    pub current_temperature: f32,
}

impl ClimateState {
    /// State before the stove has reported anything and nothing was restored.
    pub fn initial(current_temperature: f32) -> Self {
        Self {
            mode: ClimateMode::Off,
            target_temperature: current_temperature.round(),
            current_temperature,
        }
    }
}

/// Capabilities advertised to the control surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateTraits {
    pub supports_current_temperature: bool,
    pub supports_auto_mode: bool,
    pub supports_cool_mode: bool,
    pub supports_heat_mode: bool,
    pub supports_two_point_target_temperature: bool,
    pub visual_min_temperature: f32,
    pub visual_max_temperature: f32,
    pub visual_temperature_step: f32,
}

impl ClimateTraits {
    pub fn from_config(config: &StoveConfig) -> Self {
        Self {
            supports_current_temperature: true,
            supports_auto_mode: true,
            supports_cool_mode: config.supports_cool,
            supports_heat_mode: config.supports_heat,
            supports_two_point_target_temperature: false,
            visual_min_temperature: config.visual_min_temperature,
            visual_max_temperature: config.visual_max_temperature,
            visual_temperature_step: config.temperature_step,
        }
    }

    /// Whether the control surface may select `mode`.
    pub fn supports_mode(&self, mode: ClimateMode) -> bool {
        match mode {
            ClimateMode::Off => true,
            ClimateMode::Auto => self.supports_auto_mode,
            ClimateMode::Cool => self.supports_cool_mode,
            ClimateMode::Heat => self.supports_heat_mode,
        }
    }
}
