// src/services/pin.rs

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::RwLock;

/// Exactly four ASCII digits. `[0-9]` rather than `\d` so fullwidth
/// Unicode digits do not pass the gate.
pub static PIN_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}$").unwrap());

/// Holds the currently accepted order PIN.
///
/// Injected as a collaborator wherever authorization happens, never a
/// process-global, so tests can run each flow against its own store and a
/// reset flow can swap the value without a restart.
pub struct PinStore {
    current: RwLock<String>,
}

impl PinStore {
    pub fn new(pin: impl Into<String>) -> Self {
        Self {
            current: RwLock::new(pin.into()),
        }
    }

    pub fn verify(&self, candidate: &str) -> bool {
        *self.current.read().expect("pin lock") == candidate
    }

    /// Replace the accepted PIN (used by the reset flow).
    pub fn rotate(&self, new_pin: impl Into<String>) {
        *self.current.write().expect("pin lock") = new_pin.into();
    }
}

// ======================================================================
// UNIT TESTS
// ======================================================================
