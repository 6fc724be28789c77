//! Jack-state notification sinks.
//!
//! Three fan-out targets, all best-effort: a switch-class indicator visible
//! to the OS, a structured user-space event, and an optional product hook.
//! The machine layer's own state is the source of truth — notification
//! delivery failures are logged and swallowed, never propagated.

/// Switch-class indicator (e.g. an OS-level headset switch device).
pub trait StateIndicator {
    /// Error type
    type Error: core::fmt::Debug;

    /// Publish the integer headset state code (0/1/2).
    async fn set_state(&mut self, code: u8) -> Result<(), Self::Error>;
}

/// Structured user-space event sink (uevent-equivalent).
pub trait EventSink {
    /// Error type
    type Error: core::fmt::Debug;

    /// Emit a named state-change event with a `KEY=value` payload.
    async fn emit(&mut self, name: &'static str, payload: &str) -> Result<(), Self::Error>;
}

/// Optional product-specific jack-state callback.
///
/// Invoked synchronously after the indicator and event sinks. A misbehaving
/// hook must never destabilize the state machine, so errors are swallowed by
/// the dispatcher.
pub trait HeadsetHook {
    /// Error type
    type Error: core::fmt::Debug;

    /// Receive the integer headset state code (0/1/2).
    fn on_state(&mut self, code: u8) -> Result<(), Self::Error>;
}

/// Hook for products without a callback configured.
pub struct NoHook;

impl HeadsetHook for NoHook {
    type Error = core::convert::Infallible;

    fn on_state(&mut self, _code: u8) -> Result<(), Self::Error> {
        Ok(())
    }
}
