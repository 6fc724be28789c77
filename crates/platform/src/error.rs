//! Machine-layer error taxonomy.
//!
//! Collaborator traits carry their own associated error types; the machine
//! layer collapses them into this small taxonomy at the component boundary.
//! Propagation is asymmetric: jack detection and routing failures stop at a
//! log line, while clock sequencing failures must fail the stream open.
//! Misclocked audio never silently proceeds.

use thiserror_no_std::Error;

/// Errors surfaced by the codec machine layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MachineError {
    /// A register read/write against a collaborator failed. The triggering
    /// operation is aborted and machine state is left unchanged.
    #[error("hardware register access failed")]
    HardwareIo,

    /// Clock/PLL sequencing failed part-way; the device may be misclocked.
    /// Not retryable within the current stream — the open must fail.
    #[error("clock or PLL sequencing failed")]
    Config,

    /// Reference-count underflow or another broken caller contract.
    /// Unreachable in a correct integration.
    #[error("precondition violated (reference count underflow)")]
    Precond,

    /// The microphone-presence probe failed. Non-fatal: the jack state
    /// machine degrades to "no microphone".
    #[error("microphone presence probe failed")]
    Probe,
}
