//! Mock implementations for testing
//!
//! Recording fakes for every collaborator trait, for use in unit and
//! integration tests. All mocks that touch hardware-facing traits share one
//! ordered [`CallLog`] so tests can assert cross-collaborator sequencing
//! (e.g. host dividers before codec PLL).

#![cfg(any(test, feature = "std"))]

use core::cell::{Cell, RefCell};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::{
    ClockDivider, CodecControl, DaiFormat, EventSink, HeadsetHook, HostDai, JackDetect,
    MasterClock, StateIndicator, TdmSlots, TerminalControl,
};

/// Maximum calls retained by a [`CallLog`].
///
/// Sized for property tests that replay dozens of pin samples; a full log
/// drops further calls silently, which would skew count assertions.
pub const LOG_CAPACITY: usize = 256;

/// Error type shared by all mocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// One recorded collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `TerminalControl::set_terminal_enabled`
    SetTerminal {
        /// Terminal name.
        name: &'static str,
        /// Requested enablement.
        enabled: bool,
    },
    /// `TerminalControl::commit`
    Commit,
    /// `MasterClock::enable`
    ClockEnable,
    /// `MasterClock::disable`
    ClockDisable,
    /// `HostDai::configure_link`
    ConfigureLink {
        /// Host-internal port.
        internal: u8,
        /// External port.
        external: u8,
    },
    /// `HostDai::set_dai_format`
    HostDaiFormat(DaiFormat),
    /// `HostDai::set_clock_divider`
    SetClockDivider {
        /// Divider stage.
        divider: ClockDivider,
        /// Programmed value.
        value: u32,
    },
    /// `HostDai::set_tdm_slots`
    SetTdmSlots(TdmSlots),
    /// `CodecControl::set_dai_format`
    CodecDaiFormat(DaiFormat),
    /// `CodecControl::probe_mic_present`
    MicProbe,
    /// `CodecControl::set_pll`
    SetPll {
        /// Reference frequency.
        ref_hz: u32,
        /// Requested PLL output.
        out_hz: u32,
    },
    /// `CodecControl::set_sysclk`
    SetSysclk(u32),
    /// `StateIndicator::set_state`
    IndicatorState(u8),
    /// `EventSink::emit`
    EmitEvent {
        /// Event name.
        name: &'static str,
        /// `KEY=value` payload.
        payload: heapless::String<32>,
    },
    /// `HeadsetHook::on_state`
    HookState(u8),
}

/// Shared, ordered record of collaborator calls.
///
/// Interior-mutable so several mocks can hold `&CallLog` at once; the
/// blocking mutex keeps it usable from any context the machine runs in.
pub struct CallLog {
    calls: Mutex<CriticalSectionRawMutex, RefCell<heapless::Vec<Call, LOG_CAPACITY>>>,
}

impl CallLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self {
            calls: Mutex::new(RefCell::new(heapless::Vec::new())),
        }
    }

    /// Append a call. Silently drops once [`LOG_CAPACITY`] is reached.
    pub fn record(&self, call: Call) {
        self.calls.lock(|calls| {
            let _ = calls.borrow_mut().push(call);
        });
    }

    /// Copy out everything recorded so far.
    pub fn snapshot(&self) -> heapless::Vec<Call, LOG_CAPACITY> {
        self.calls.lock(|calls| calls.borrow().clone())
    }

    /// Drop all recorded calls.
    pub fn clear(&self) {
        self.calls.lock(|calls| calls.borrow_mut().clear());
    }

    /// Count recorded calls matching a predicate.
    pub fn count_matching(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock(|calls| calls.borrow().iter().filter(|c| pred(c)).count())
    }
}

impl Default for CallLog {
    fn default() -> Self {
        Self::new()
    }
}

// ── Jack-detect pin ─────────────────────────────────────────────────────────

/// Mock jack-detect pin with a scriptable level.
///
/// The level lives in a shared [`Cell`] so the test can flip it after the
/// pin has been moved into the machine.
pub struct MockJackPin<'a> {
    wired: bool,
    level: &'a Cell<bool>,
    /// When `true`, `read_level` fails.
    pub fail_read: bool,
}

impl<'a> MockJackPin<'a> {
    /// Create a wired (or not) pin reading from `level`.
    pub fn new(wired: bool, level: &'a Cell<bool>) -> Self {
        Self {
            wired,
            level,
            fail_read: false,
        }
    }
}

impl JackDetect for MockJackPin<'_> {
    type Error = MockError;

    fn is_wired(&self) -> bool {
        self.wired
    }

    async fn read_level(&mut self) -> Result<bool, Self::Error> {
        if self.fail_read {
            return Err(MockError);
        }
        Ok(self.level.get())
    }

    async fn wait_for_edge(&mut self) -> Result<(), Self::Error> {
        // Tests drive evaluation through MachineEvents, not pin edges.
        core::future::pending().await
    }
}

// ── Codec control ───────────────────────────────────────────────────────────

/// Mock codec control port.
pub struct MockCodec<'a> {
    log: &'a CallLog,
    mic_present: &'a Cell<bool>,
    /// When `true`, `probe_mic_present` fails.
    pub probe_fails: bool,
    /// When `true`, `set_pll` fails.
    pub pll_fails: bool,
}

impl<'a> MockCodec<'a> {
    /// Create a codec whose mic probe reads from `mic_present`.
    pub fn new(log: &'a CallLog, mic_present: &'a Cell<bool>) -> Self {
        Self {
            log,
            mic_present,
            probe_fails: false,
            pll_fails: false,
        }
    }
}

impl CodecControl for MockCodec<'_> {
    type Error = MockError;

    async fn probe_mic_present(&mut self) -> Result<bool, Self::Error> {
        self.log.record(Call::MicProbe);
        if self.probe_fails {
            return Err(MockError);
        }
        Ok(self.mic_present.get())
    }

    async fn set_dai_format(&mut self, format: DaiFormat) -> Result<(), Self::Error> {
        self.log.record(Call::CodecDaiFormat(format));
        Ok(())
    }

    async fn set_pll(&mut self, ref_hz: u32, out_hz: u32) -> Result<(), Self::Error> {
        if self.pll_fails {
            return Err(MockError);
        }
        self.log.record(Call::SetPll { ref_hz, out_hz });
        Ok(())
    }

    async fn set_sysclk(&mut self, freq_hz: u32) -> Result<(), Self::Error> {
        self.log.record(Call::SetSysclk(freq_hz));
        Ok(())
    }
}

// ── Host DAI ────────────────────────────────────────────────────────────────

/// Mock host digital audio interface.
pub struct MockHostDai<'a> {
    log: &'a CallLog,
}

impl<'a> MockHostDai<'a> {
    /// Create a host DAI recording into `log`.
    pub fn new(log: &'a CallLog) -> Self {
        Self { log }
    }
}

impl HostDai for MockHostDai<'_> {
    type Error = MockError;

    async fn configure_link(
        &mut self,
        internal_port: u8,
        external_port: u8,
    ) -> Result<(), Self::Error> {
        self.log.record(Call::ConfigureLink {
            internal: internal_port,
            external: external_port,
        });
        Ok(())
    }

    async fn set_dai_format(&mut self, format: DaiFormat) -> Result<(), Self::Error> {
        self.log.record(Call::HostDaiFormat(format));
        Ok(())
    }

    async fn set_clock_divider(
        &mut self,
        divider: ClockDivider,
        value: u32,
    ) -> Result<(), Self::Error> {
        self.log.record(Call::SetClockDivider { divider, value });
        Ok(())
    }

    async fn set_tdm_slots(&mut self, slots: TdmSlots) -> Result<(), Self::Error> {
        self.log.record(Call::SetTdmSlots(slots));
        Ok(())
    }
}

// ── Master clock ────────────────────────────────────────────────────────────

/// Mock gated master clock.
pub struct MockMclk<'a> {
    log: &'a CallLog,
}

impl<'a> MockMclk<'a> {
    /// Create a master clock recording into `log`.
    pub fn new(log: &'a CallLog) -> Self {
        Self { log }
    }
}

impl MasterClock for MockMclk<'_> {
    type Error = MockError;

    async fn enable(&mut self) -> Result<(), Self::Error> {
        self.log.record(Call::ClockEnable);
        Ok(())
    }

    async fn disable(&mut self) -> Result<(), Self::Error> {
        self.log.record(Call::ClockDisable);
        Ok(())
    }
}

// ── Terminal control ────────────────────────────────────────────────────────

/// Mock routing terminal controller.
pub struct MockDapm<'a> {
    log: &'a CallLog,
}

impl<'a> MockDapm<'a> {
    /// Create a terminal controller recording into `log`.
    pub fn new(log: &'a CallLog) -> Self {
        Self { log }
    }
}

impl TerminalControl for MockDapm<'_> {
    type Error = MockError;

    async fn set_terminal_enabled(
        &mut self,
        name: &'static str,
        enabled: bool,
    ) -> Result<(), Self::Error> {
        self.log.record(Call::SetTerminal { name, enabled });
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), Self::Error> {
        self.log.record(Call::Commit);
        Ok(())
    }
}

// ── Notification sinks ──────────────────────────────────────────────────────

/// Mock switch-class indicator.
pub struct MockIndicator<'a> {
    log: &'a CallLog,
    /// When `true`, `set_state` fails (still recorded).
    pub fails: bool,
}

impl<'a> MockIndicator<'a> {
    /// Create an indicator recording into `log`.
    pub fn new(log: &'a CallLog) -> Self {
        Self { log, fails: false }
    }
}

impl StateIndicator for MockIndicator<'_> {
    type Error = MockError;

    async fn set_state(&mut self, code: u8) -> Result<(), Self::Error> {
        self.log.record(Call::IndicatorState(code));
        if self.fails {
            return Err(MockError);
        }
        Ok(())
    }
}

/// Mock user-space event sink.
pub struct MockEventSink<'a> {
    log: &'a CallLog,
}

impl<'a> MockEventSink<'a> {
    /// Create an event sink recording into `log`.
    pub fn new(log: &'a CallLog) -> Self {
        Self { log }
    }
}

impl EventSink for MockEventSink<'_> {
    type Error = MockError;

    async fn emit(&mut self, name: &'static str, payload: &str) -> Result<(), Self::Error> {
        let mut copied: heapless::String<32> = heapless::String::new();
        let _ = copied.push_str(payload);
        self.log.record(Call::EmitEvent {
            name,
            payload: copied,
        });
        Ok(())
    }
}

/// Mock product hook.
pub struct MockHook<'a> {
    log: &'a CallLog,
    /// When `true`, `on_state` fails (still recorded).
    pub fails: bool,
}

impl<'a> MockHook<'a> {
    /// Create a hook recording into `log`.
    pub fn new(log: &'a CallLog) -> Self {
        Self { log, fails: false }
    }
}

impl HeadsetHook for MockHook<'_> {
    type Error = MockError;

    fn on_state(&mut self, code: u8) -> Result<(), Self::Error> {
        self.log.record(Call::HookState(code));
        if self.fails {
            return Err(MockError);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn call_log_preserves_order() {
        let log = CallLog::new();
        let mut mclk = MockMclk::new(&log);
        let mut dapm = MockDapm::new(&log);

        mclk.enable().await.unwrap();
        dapm.commit().await.unwrap();
        mclk.disable().await.unwrap();

        let calls = log.snapshot();
        assert_eq!(
            calls.as_slice(),
            &[Call::ClockEnable, Call::Commit, Call::ClockDisable]
        );
    }

    #[tokio::test]
    async fn jack_pin_level_is_scriptable_after_move() {
        let level = Cell::new(false);
        let mut pin = MockJackPin::new(true, &level);

        assert!(!pin.read_level().await.unwrap());
        level.set(true);
        assert!(pin.read_level().await.unwrap());
    }

    #[tokio::test]
    async fn failed_indicator_call_is_still_recorded() {
        let log = CallLog::new();
        let mut indicator = MockIndicator::new(&log);
        indicator.fails = true;

        assert!(indicator.set_state(1).await.is_err());
        assert_eq!(log.count_matching(|c| matches!(c, Call::IndicatorState(1))), 1);
    }
}
