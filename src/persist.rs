//! Saved climate setpoint.
//!
//! The last mode and target temperature survive a reboot so the control
//! surface does not snap back to OFF. The blob is postcard-encoded and
//! lives under its own NVS namespace.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{StorageError, StoragePort};
use crate::climate::{ClimateMode, ClimateState};

pub const NAMESPACE: &str = "rikastove";
pub const CLIMATE_KEY: &str = "climate";

/// Upper bound of the encoded blob (one enum tag plus an f32).
const MAX_BLOB: usize = 16;

/// Persisted part of the climate state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedClimate {
    pub mode: ClimateMode,
    pub target_temperature: f32,
}

impl SavedClimate {
    pub fn from_state(state: &ClimateState) -> Self {
        Self {
            mode: state.mode,
            target_temperature: state.target_temperature,
        }
    }

    /// Load the saved setpoint. `None` if absent or undecodable.
    pub fn load(storage: &impl StoragePort) -> Option<Self> {
        let mut buf = [0u8; MAX_BLOB];
        let len = match storage.read(NAMESPACE, CLIMATE_KEY, &mut buf) {
            Ok(len) => len,
            Err(StorageError::NotFound) => {
                debug!("Persist: no saved climate state");
                return None;
            }
            Err(e) => {
                warn!("Persist: reading climate state failed: {}", e);
                return None;
            }
        };

        match postcard::from_bytes::<Self>(&buf[..len]) {
            Ok(saved) if saved.target_temperature.is_finite() => Some(saved),
            _ => {
                warn!("Persist: saved climate state is corrupted, ignoring");
                None
            }
        }
    }

    /// Write the setpoint.
    pub fn save(&self, storage: &mut impl StoragePort) -> Result<(), StorageError> {
        let mut buf = [0u8; MAX_BLOB];
        let bytes = postcard::to_slice(self, &mut buf).map_err(|_| StorageError::Corrupted)?;
        storage.write(NAMESPACE, CLIMATE_KEY, bytes)
    }
}
