//! Jack-detect GPIO abstraction.
//!
//! The machine layer never owns interrupt registration or debounce hardware;
//! it consumes a level query plus an edge wait. Products without a detect
//! pin use [`NotWired`], which turns the whole jack state machine into a
//! permanent no-op.

use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

/// Headset jack-detect pin.
pub trait JackDetect {
    /// Error type
    type Error: core::fmt::Debug;

    /// Whether this product wires a detect pin at all.
    ///
    /// Returning `false` disables jack detection entirely: the state machine
    /// stays in its default state and routing keeps the speaker enabled.
    fn is_wired(&self) -> bool;

    /// Read the current (debounced) pin level. `true` = electrically high.
    async fn read_level(&mut self) -> Result<bool, Self::Error>;

    /// Wait for the next level change on the pin.
    async fn wait_for_edge(&mut self) -> Result<(), Self::Error>;
}

/// Adapter wiring any HAL input pin with edge-wait support into
/// [`JackDetect`].
///
/// On hardware this is typically an EXTI-capable input (e.g.
/// `embassy_stm32::exti::ExtiInput`); any `InputPin + Wait` implementor
/// works.
pub struct EdgePin<P> {
    pin: P,
}

impl<P> EdgePin<P>
where
    P: InputPin + Wait,
{
    /// Wrap a configured input pin.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Release the underlying pin.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P> JackDetect for EdgePin<P>
where
    P: InputPin + Wait,
{
    type Error = P::Error;

    fn is_wired(&self) -> bool {
        true
    }

    async fn read_level(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }

    async fn wait_for_edge(&mut self) -> Result<(), Self::Error> {
        self.pin.wait_for_any_edge().await
    }
}

/// Null pin for products that do not wire jack detection.
///
/// `read_level` reports "low" (never used — the state machine checks
/// [`JackDetect::is_wired`] first) and `wait_for_edge` never completes.
pub struct NotWired;

impl JackDetect for NotWired {
    type Error = core::convert::Infallible;

    fn is_wired(&self) -> bool {
        false
    }

    async fn read_level(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }

    async fn wait_for_edge(&mut self) -> Result<(), Self::Error> {
        core::future::pending().await
    }
}
