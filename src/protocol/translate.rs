//! Climate intent ⇄ stove command translation.
//!
//! The stove has no notion of a thermostat setpoint in power mode: it
//! only accepts a heat output between 30 % and 100 % in 5 % steps. HEAT
//! is therefore used as a proxy for power control, and the display range
//! 17..30 maps linearly onto the power range:
//!
//! ```text
//!   temp  17 ──────────────────────────── 30
//!   power 30 ──────────────────────────── 100   (rounded to 5 %)
//! ```
//!
//! Wire commands:
//!
//! | Event                         | Token          | Wire   |
//! |-------------------------------|----------------|--------|
//! | mode OFF                      | `OFF`          | `OFF`  |
//! | mode changed to HEAT/COOL     | `HEAT`/`ROOM`  | same   |
//! | mode changed to AUTO          | `AUTO`         | `TEL`  |
//! | target changed in HEAT        | `h<power>`     | same   |
//! | target changed in COOL        | `r<temp>`      | same   |
//! | target changed in AUTO        | `?`            | `?`    |

use core::fmt;

use crate::climate::ClimateMode;
use crate::config::StoveConfig;

use super::reply::{ReplyMode, StoveReply};

/// Stove-side operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoveMode {
    /// Power mode (`HEAT` / `h`).
    Heat,
    /// Room mode (`ROOM` / `r`).
    Room,
    Auto,
}

impl StoveMode {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Heat => "HEAT",
            Self::Room => "ROOM",
            Self::Auto => "AUTO",
        }
    }

    /// One-letter prefix of a setpoint command, if the mode takes one.
    pub const fn short_code(self) -> Option<char> {
        match self {
            Self::Heat => Some('h'),
            Self::Room => Some('r'),
            Self::Auto => None,
        }
    }
}

/// One appliance-bound instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoveCommand {
    Off,
    /// Ask the stove to send its full telemetry.
    Telemetry,
    SelectMode(StoveMode),
    /// Setpoint in the mode's own unit (power % for Heat, °C for Room).
    Setpoint { mode: StoveMode, value: u8 },
    /// Bare re-query.
    Query,
}

impl StoveCommand {
    /// Command token as chosen for the control event.
    pub fn token(&self) -> String {
        match self {
            Self::Off => "OFF".to_string(),
            Self::Telemetry => "TEL".to_string(),
            Self::SelectMode(mode) => mode.name().to_string(),
            Self::Setpoint { mode, value } => match mode.short_code() {
                Some(code) => format!("{code}{value}"),
                None => "?".to_string(),
            },
            Self::Query => "?".to_string(),
        }
    }

    /// Text delivered to the stove in the `+CMGR` body.
    ///
    /// Identical to [`token`](Self::token) except AUTO, which the stove
    /// understands as a telemetry refresh.
    pub fn wire(&self) -> String {
        match self {
            Self::SelectMode(StoveMode::Auto) => "TEL".to_string(),
            other => other.token(),
        }
    }
}

impl fmt::Display for StoveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

/// Converts climate intents to stove commands and stove reports back.
#[derive(Debug, Clone)]
pub struct StateTranslator {
    visual_min: f32,
    visual_max: f32,
    power_min: f32,
    power_max: f32,
    power_step: u8,
}

impl StateTranslator {
    pub fn new(config: &StoveConfig) -> Self {
        Self {
            visual_min: config.visual_min_temperature,
            visual_max: config.visual_max_temperature,
            power_min: config.power_min_percent,
            power_max: config.power_max_percent,
            power_step: config.power_step_percent.max(1),
        }
    }

    /// Build the command for a control event.
    ///
    /// `mode_changed` is true when the event set the mode; a bare mode
    /// name then takes priority over the target temperature.
    pub fn encode(&self, mode: ClimateMode, target: f32, mode_changed: bool) -> StoveCommand {
        let stove_mode = match mode {
            ClimateMode::Off => return StoveCommand::Off,
            ClimateMode::Heat => StoveMode::Heat,
            ClimateMode::Cool => StoveMode::Room,
            ClimateMode::Auto => StoveMode::Auto,
        };

        if mode_changed {
            return StoveCommand::SelectMode(stove_mode);
        }

        let temp = self.clamp_display(target);
        match stove_mode {
            StoveMode::Heat => StoveCommand::Setpoint {
                mode: stove_mode,
                value: self.power_from_temperature(temp),
            },
            StoveMode::Room => StoveCommand::Setpoint {
                mode: stove_mode,
                value: temp as u8,
            },
            StoveMode::Auto => StoveCommand::Query,
        }
    }

    /// Display temperature → power percentage, snapped to the power step.
    pub fn power_from_temperature(&self, temp: f32) -> u8 {
        let power = (temp - self.visual_min) * ((self.power_max - self.power_min)
            / (self.visual_max - self.visual_min))
            + self.power_min;
        let step = f32::from(self.power_step);
        ((power / step).round() * step) as u8
    }

    /// Power percentage → display temperature (inverse remap, rounded).
    pub fn temperature_from_power(&self, power: i32) -> i32 {
        let temp = (power as f32 - self.power_min)
            * ((self.visual_max - self.visual_min) / (self.power_max - self.power_min))
            + self.visual_min;
        temp.round() as i32
    }

    /// Current temperature implied by a status reply, if it carries one.
    pub fn current_temperature(&self, reply: &StoveReply) -> Option<f32> {
        match reply {
            StoveReply::On {
                mode: ReplyMode::Heat,
                value: Some(power),
            } => Some(self.temperature_from_power(*power) as f32),
            StoveReply::On {
                value: Some(value), ..
            } => Some(*value as f32),
            _ => None,
        }
    }

    fn clamp_display(&self, target: f32) -> f32 {
        let target = if target.is_nan() { self.visual_min } else { target };
        target.clamp(self.visual_min, self.visual_max).round()
    }
}
