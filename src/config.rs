//! Bridge configuration parameters
//!
//! All tunable parameters for the stove bridge. Values can be overridden via
//! NVS (non-volatile storage) or a JSON document at provisioning time.

use heapless::String;
use log::info;
use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Maximum length of the phone number echoed in the `+CMGR` header.
pub const PHONE_NUMBER_LEN: usize = 24;
/// Maximum length of the stove's SMS PIN code.
pub const PIN_CODE_LEN: usize = 8;

/// Core bridge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoveConfig {
    // --- Capabilities ---
    /// Advertise COOL (mapped to the stove's ROOM mode).
    pub supports_cool: bool,
    /// Advertise HEAT (mapped to the stove's power mode).
    pub supports_heat: bool,

    // --- SMS identity ---
    /// Sender number the stove expects in incoming SMS headers.
    pub phone_number: String<PHONE_NUMBER_LEN>,
    /// PIN the stove expects as the first word of every command SMS.
    pub pin_code: String<PIN_CODE_LEN>,

    // --- Display range ---
    /// Lowest target temperature exposed to the control surface (Celsius)
    pub visual_min_temperature: f32,
    /// Highest target temperature exposed to the control surface (Celsius)
    pub visual_max_temperature: f32,
    /// Target temperature granularity (Celsius)
    pub temperature_step: f32,

    // --- Power mode ---
    /// Heat output at the bottom of the display range (%)
    pub power_min_percent: f32,
    /// Heat output at the top of the display range (%)
    pub power_max_percent: f32,
    /// The stove only accepts power in multiples of this (%)
    pub power_step_percent: u8,

    // --- Startup ---
    /// Current temperature assumed until the stove reports (Celsius)
    pub default_current_temperature: f32,

    // --- Timing ---
    /// Maximum wait for the Ctrl-Z terminated SMS body (milliseconds)
    pub body_timeout_ms: u32,
    /// Pause after delivering a command before reading more input (milliseconds)
    pub read_settle_ms: u32,
    /// Serial poll interval of the runtime task (milliseconds)
    pub poll_interval_ms: u32,

    // --- UART ---
    pub baud_rate: u32,
}

impl Default for StoveConfig {
    fn default() -> Self {
        Self {
            // Capabilities
            supports_cool: false,
            supports_heat: true,

            // SMS identity
            phone_number: fixed_str("+436508012415"),
            pin_code: fixed_str("1211"),

            // Display range
            visual_min_temperature: 17.0,
            visual_max_temperature: 30.0,
            temperature_step: 1.0,

            // Power mode
            power_min_percent: 30.0,
            power_max_percent: 100.0,
            power_step_percent: 5,

            default_current_temperature: 20.0,

            // Timing
            body_timeout_ms: 10_000,
            read_settle_ms: 2_000,
            poll_interval_ms: 10,

            baud_rate: 38_400,
        }
    }
}

impl StoveConfig {
    /// Parse a JSON configuration document; missing fields are an error.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Range-check every field. Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pin_code.is_empty() || !self.pin_code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::ValidationFailed(
                "pin_code must be a non-empty string of digits",
            ));
        }
        if self.phone_number.is_empty() || !is_printable_ascii(&self.phone_number) {
            return Err(ConfigError::ValidationFailed(
                "phone_number must be non-empty printable ASCII",
            ));
        }
        if self.phone_number.contains('"') {
            return Err(ConfigError::ValidationFailed(
                "phone_number must not contain quotes",
            ));
        }
        if !(self.visual_min_temperature < self.visual_max_temperature) {
            return Err(ConfigError::ValidationFailed(
                "visual_min_temperature must be < visual_max_temperature",
            ));
        }
        if !(self.temperature_step > 0.0) {
            return Err(ConfigError::ValidationFailed("temperature_step must be > 0"));
        }
        if !(0.0..=100.0).contains(&self.power_min_percent)
            || !(0.0..=100.0).contains(&self.power_max_percent)
            || self.power_min_percent >= self.power_max_percent
        {
            return Err(ConfigError::ValidationFailed(
                "power range must satisfy 0 <= power_min_percent < power_max_percent <= 100",
            ));
        }
        if self.power_step_percent == 0 {
            return Err(ConfigError::ValidationFailed("power_step_percent must be > 0"));
        }
        if !self.default_current_temperature.is_finite() {
            return Err(ConfigError::ValidationFailed(
                "default_current_temperature must be finite",
            ));
        }
        if self.body_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("body_timeout_ms must be > 0"));
        }
        if !(1..=1000).contains(&self.poll_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "poll_interval_ms must be 1..=1000",
            ));
        }
        if self.baud_rate == 0 {
            return Err(ConfigError::ValidationFailed("baud_rate must be > 0"));
        }
        Ok(())
    }

    /// Log the effective configuration once at startup.
    pub fn dump(&self) {
        info!("Rika stove:");
        info!("  supports heat/cool: {}/{}", self.supports_heat, self.supports_cool);
        info!("  phone number: {}", self.phone_number);
        info!("  PIN code: {}", "*".repeat(self.pin_code.len()));
        info!(
            "  visual range: {:.0}..{:.0} step {:.1}",
            self.visual_min_temperature, self.visual_max_temperature, self.temperature_step
        );
        info!(
            "  power range: {:.0}%..{:.0}% step {}%",
            self.power_min_percent, self.power_max_percent, self.power_step_percent
        );
        info!(
            "  timing: body timeout {}ms, settle {}ms, poll {}ms",
            self.body_timeout_ms, self.read_settle_ms, self.poll_interval_ms
        );
        info!("  UART: {} baud", self.baud_rate);
    }
}

/// Build a fixed-capacity string, truncating input that does not fit.
pub fn fixed_str<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    let end = s
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|&end| end <= N)
        .last()
        .unwrap_or(0);
    let _ = out.push_str(&s[..end]);
    out
}

/// Returns `true` if every byte of `s` is in the printable ASCII range
/// `0x20..=0x7E` (space through tilde, inclusive).
fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}
