//! Codec control-port abstraction.
//!
//! Covers the RT5625-class codec's control interface: microphone presence
//! probing, DAI format, PLL programming, and system-clock source selection.
//! The register map stays behind the implementation; the machine layer never
//! sees raw registers.

use crate::dai::DaiFormat;

/// Codec control collaborator.
pub trait CodecControl {
    /// Error type
    type Error: core::fmt::Debug;

    /// Probe whether the inserted headset has a microphone.
    ///
    /// Only meaningful while the jack reports "inserted". A transient probe
    /// failure is not fatal — callers degrade to "no microphone".
    async fn probe_mic_present(&mut self) -> Result<bool, Self::Error>;

    /// Apply the hardware format to the codec side of the link.
    async fn set_dai_format(&mut self, format: DaiFormat) -> Result<(), Self::Error>;

    /// Program the codec PLL: lock `out_hz` from the `ref_hz` master-clock
    /// reference.
    async fn set_pll(&mut self, ref_hz: u32, out_hz: u32) -> Result<(), Self::Error>;

    /// Select the codec system clock. Called with the PLL output frequency
    /// after [`set_pll`](CodecControl::set_pll) has locked.
    async fn set_sysclk(&mut self, freq_hz: u32) -> Result<(), Self::Error>;
}
