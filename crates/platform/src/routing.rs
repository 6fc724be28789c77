//! Analog routing-endpoint abstraction (power-pin control).
//!
//! The codec's power-management layer exposes named endpoints ("terminals")
//! that can be enabled or disabled; a commit call propagates the accumulated
//! pin power state to hardware in one pass. Commit is idempotent and may be
//! called with zero pending changes.

/// Routing terminal collaborator.
pub trait TerminalControl {
    /// Error type
    type Error: core::fmt::Debug;

    /// Mark a named terminal enabled or disabled. Takes effect at the next
    /// [`commit`](TerminalControl::commit).
    async fn set_terminal_enabled(
        &mut self,
        name: &'static str,
        enabled: bool,
    ) -> Result<(), Self::Error>;

    /// Propagate accumulated terminal state to hardware.
    async fn commit(&mut self) -> Result<(), Self::Error>;
}
