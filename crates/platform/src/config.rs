//! Static per-product machine configuration.
//!
//! Board bring-up resolves device-tree/platform data into this plain struct
//! before the machine layer is constructed; nothing here changes at runtime.

use embassy_time::Duration;

/// Per-product configuration for the codec machine layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    /// Master-clock frequency fed to the codec (PLL reference), in Hz.
    pub sysclk_hz: u32,
    /// Invert the jack-detect pin: when `true`, a low level means inserted.
    pub jack_invert: bool,
    /// Whether a separate microphone-detect pin is wired on this product.
    /// Only consulted when deciding to re-evaluate after resume.
    pub mic_wired: bool,
    /// Settle period applied after a jack edge before the level is trusted.
    pub debounce: Duration,
    /// Settle period applied after device resume before re-evaluating the
    /// jack; pin state is not guaranteed valid until this has elapsed.
    pub resume_settle: Duration,
    /// Host-internal serial port carrying the link.
    pub internal_port: u8,
    /// External serial port routed to the codec.
    pub external_port: u8,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            sysclk_hz: 24_576_000,
            jack_invert: false,
            mic_wired: false,
            debounce: Duration::from_millis(150),
            resume_settle: Duration::from_millis(200),
            internal_port: 1,
            external_port: 3,
        }
    }
}
