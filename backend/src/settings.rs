//! Runtime settings loaded via OrthoConfig.
//!
//! Timings default to those of the mock pages. Environment variables take
//! the `MIVO_` prefix, for example `MIVO_LOGIN_LATENCY_MS=0`.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::FlowTimings;
use crate::outbound::simulated_backend::LatencyProfile;

const DEFAULT_STORAGE_PATH: &str = "mivo-storage.json";

/// Settings for the session core and its simulated backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MIVO")]
pub struct AuthSettings {
    /// JSON file holding the persisted storage.
    pub storage_path: Option<PathBuf>,
    /// Simulated login round trip, in milliseconds.
    #[ortho_config(default = 1500)]
    pub login_latency_ms: u64,
    /// Simulated registration round trip, in milliseconds.
    #[ortho_config(default = 2000)]
    pub signup_latency_ms: u64,
    /// Upper bound of random extra latency, in milliseconds.
    #[ortho_config(default = 0)]
    pub latency_jitter_ms: u64,
    /// Delay before leaving the login page, in milliseconds.
    #[ortho_config(default = 1500)]
    pub login_redirect_ms: u64,
    /// Delay before leaving the signup page, in milliseconds.
    #[ortho_config(default = 2000)]
    pub signup_redirect_ms: u64,
    /// Delay before offering signup for an unknown id, in milliseconds.
    #[ortho_config(default = 1000)]
    pub not_found_offer_ms: u64,
    /// Delay before returning to the landing page, in milliseconds.
    #[ortho_config(default = 1000)]
    pub logout_redirect_ms: u64,
}

impl AuthSettings {
    /// Storage file path, falling back to `mivo-storage.json`.
    pub fn storage_path(&self) -> PathBuf {
        self.storage_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH))
    }

    /// Backend latencies for [`SimulatedAuthBackend`](crate::outbound::simulated_backend::SimulatedAuthBackend).
    pub fn latency_profile(&self) -> LatencyProfile {
        LatencyProfile {
            login: Duration::from_millis(self.login_latency_ms),
            signup: Duration::from_millis(self.signup_latency_ms),
            jitter: Duration::from_millis(self.latency_jitter_ms),
        }
    }

    /// Navigation delays for the auth controller.
    pub fn flow_timings(&self) -> FlowTimings {
        FlowTimings {
            login_redirect: Duration::from_millis(self.login_redirect_ms),
            signup_redirect: Duration::from_millis(self.signup_redirect_ms),
            not_found_offer: Duration::from_millis(self.not_found_offer_ms),
            logout_redirect: Duration::from_millis(self.logout_redirect_ms),
        }
    }
}
