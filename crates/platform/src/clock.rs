//! Gated master-clock abstraction.
//!
//! The codec's MCLK comes from a host clock output that can be gated when no
//! stream is active. The clock sequencer reference-counts enable/disable;
//! this trait is the single gate it drives.

/// Gated master clock collaborator.
pub trait MasterClock {
    /// Error type
    type Error: core::fmt::Debug;

    /// Ungate the clock output.
    async fn enable(&mut self) -> Result<(), Self::Error>;

    /// Gate the clock output.
    async fn disable(&mut self) -> Result<(), Self::Error>;
}
