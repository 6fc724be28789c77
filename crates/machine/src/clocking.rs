//! Master-clock gating and PLL sequencing.
//!
//! The codec's master clock is shared by both stream directions, so it is
//! reference-counted: the 0→1 edge ungates it, the 1→0 edge gates it again.
//! PLL programming is only legal while the clock is running.
//!
//! # Programming order
//!
//! `program()` issues, in this order:
//!
//! 1. DAI hardware format on the host, then the codec
//! 2. the host-side transmit clock divider chain
//! 3. the codec PLL (reference = MCLK, output = rate × 512)
//! 4. codec system-clock source = PLL output
//!
//! The order is mandatory on this class of hardware: committing the codec
//! PLL before the host divider chain yields out-of-lock audio. A failure at
//! any step leaves the device silently misclocked — `program` reports
//! [`MachineError::Config`] and the caller must fail the stream open rather
//! than retry.

use platform::{ClockDivider, CodecControl, DaiFormat, HostDai, MachineError, MasterClock};

/// Fixed MCLK/fs oversampling ratio for this link: PLL output = rate × 512.
pub const OVERSAMPLE_RATIO: u32 = 512;

/// Programmable-modulus value for the transmit divider chain.
const TX_PM_DIV: u32 = 3;

/// Reference-counted master-clock gate plus PLL programmer.
pub struct ClockSequencer {
    count: u32,
    pll_target: Option<u32>,
    sysclk_hz: u32,
}

impl ClockSequencer {
    /// Create the sequencer with the clock gated.
    ///
    /// `sysclk_hz` is the MCLK reference frequency fed to the codec PLL.
    pub fn new(sysclk_hz: u32) -> Self {
        Self {
            count: 0,
            pll_target: None,
            sysclk_hz,
        }
    }

    /// Current reference count.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// PLL output currently programmed, if any. `Some` only while the
    /// reference count is above zero.
    pub fn pll_target(&self) -> Option<u32> {
        self.pll_target
    }

    /// Take a reference on the master clock, ungating it on the 0→1 edge.
    ///
    /// On a gate failure the count is left unchanged so a later
    /// [`release`](ClockSequencer::release) cannot underflow.
    pub async fn acquire<M: MasterClock>(&mut self, mclk: &mut M) -> Result<(), MachineError> {
        if self.count == 0 {
            mclk.enable().await.map_err(|_e| {
                #[cfg(feature = "defmt")]
                defmt::warn!("master clock enable failed");
                MachineError::HardwareIo
            })?;
        }
        self.count = self.count.saturating_add(1);
        Ok(())
    }

    /// Drop a reference on the master clock, gating it on the 1→0 edge.
    ///
    /// Releasing with no reference held is a caller bug and reports
    /// [`MachineError::Precond`] with the count unchanged.
    pub async fn release<M: MasterClock>(&mut self, mclk: &mut M) -> Result<(), MachineError> {
        let next = self.count.checked_sub(1).ok_or(MachineError::Precond)?;
        self.count = next;
        if next == 0 {
            self.pll_target = None;
            mclk.disable().await.map_err(|_e| {
                #[cfg(feature = "defmt")]
                defmt::warn!("master clock disable failed");
                MachineError::HardwareIo
            })?;
        }
        Ok(())
    }

    /// Program the link clocking for a negotiated sample rate.
    ///
    /// Requires a held clock reference. See the module docs for the
    /// mandatory step order and the no-retry failure contract.
    pub async fn program<H, C>(
        &mut self,
        rate_hz: u32,
        host: &mut H,
        codec: &mut C,
    ) -> Result<(), MachineError>
    where
        H: HostDai,
        C: CodecControl,
    {
        if self.count == 0 {
            return Err(MachineError::Precond);
        }

        let pll_out = rate_hz
            .checked_mul(OVERSAMPLE_RATIO)
            .ok_or(MachineError::Config)?;

        // Any failure below leaves the hardware part-programmed; clear the
        // cached target so nothing believes the old rate is still locked.
        self.pll_target = None;

        let format = DaiFormat::i2s_host_provided();
        host.set_dai_format(format)
            .await
            .map_err(|_e| MachineError::Config)?;
        codec
            .set_dai_format(format)
            .await
            .map_err(|_e| MachineError::Config)?;

        host.set_clock_divider(ClockDivider::TxDiv2, 0)
            .await
            .map_err(|_e| MachineError::Config)?;
        host.set_clock_divider(ClockDivider::TxPsr, 0)
            .await
            .map_err(|_e| MachineError::Config)?;
        host.set_clock_divider(ClockDivider::TxPm, TX_PM_DIV)
            .await
            .map_err(|_e| MachineError::Config)?;

        codec
            .set_pll(self.sysclk_hz, pll_out)
            .await
            .map_err(|_e| MachineError::Config)?;
        codec
            .set_sysclk(pll_out)
            .await
            .map_err(|_e| MachineError::Config)?;

        self.pll_target = Some(pll_out);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use platform::mocks::{Call, CallLog, MockCodec, MockHostDai, MockMclk};

    #[tokio::test]
    async fn clock_gates_only_on_count_edges() {
        let log = CallLog::new();
        let mut mclk = MockMclk::new(&log);
        let mut clocks = ClockSequencer::new(24_576_000);

        clocks.acquire(&mut mclk).await.unwrap();
        clocks.acquire(&mut mclk).await.unwrap();
        assert_eq!(clocks.count(), 2);

        clocks.release(&mut mclk).await.unwrap();
        clocks.release(&mut mclk).await.unwrap();
        assert_eq!(clocks.count(), 0);

        // One enable at 0→1, one disable at 1→0 — nothing in between.
        let calls = log.snapshot();
        assert_eq!(calls.as_slice(), &[Call::ClockEnable, Call::ClockDisable]);
    }

    #[tokio::test]
    async fn release_on_zero_count_is_a_precondition_error() {
        let log = CallLog::new();
        let mut mclk = MockMclk::new(&log);
        let mut clocks = ClockSequencer::new(24_576_000);

        assert_eq!(
            clocks.release(&mut mclk).await,
            Err(MachineError::Precond)
        );
        assert_eq!(clocks.count(), 0);
        assert_eq!(log.snapshot().len(), 0);
    }

    #[tokio::test]
    async fn pll_target_is_rate_times_512() {
        let log = CallLog::new();
        let mic = Cell::new(false);
        let mut mclk = MockMclk::new(&log);
        let mut host = MockHostDai::new(&log);
        let mut codec = MockCodec::new(&log, &mic);
        let mut clocks = ClockSequencer::new(24_576_000);

        clocks.acquire(&mut mclk).await.unwrap();
        clocks.program(44_100, &mut host, &mut codec).await.unwrap();

        assert_eq!(clocks.pll_target(), Some(22_579_200));
        assert_eq!(
            log.count_matching(|c| matches!(
                c,
                Call::SetPll { ref_hz: 24_576_000, out_hz: 22_579_200 }
            )),
            1
        );
        assert_eq!(log.count_matching(|c| matches!(c, Call::SetSysclk(22_579_200))), 1);
    }

    #[tokio::test]
    async fn program_sequencing_order_is_fixed() {
        let log = CallLog::new();
        let mic = Cell::new(false);
        let mut mclk = MockMclk::new(&log);
        let mut host = MockHostDai::new(&log);
        let mut codec = MockCodec::new(&log, &mic);
        let mut clocks = ClockSequencer::new(24_576_000);

        clocks.acquire(&mut mclk).await.unwrap();
        log.clear();
        clocks.program(48_000, &mut host, &mut codec).await.unwrap();

        let calls = log.snapshot();
        let format = DaiFormat::i2s_host_provided();
        assert_eq!(
            calls.as_slice(),
            &[
                Call::HostDaiFormat(format),
                Call::CodecDaiFormat(format),
                Call::SetClockDivider { divider: ClockDivider::TxDiv2, value: 0 },
                Call::SetClockDivider { divider: ClockDivider::TxPsr, value: 0 },
                Call::SetClockDivider { divider: ClockDivider::TxPm, value: 3 },
                Call::SetPll { ref_hz: 24_576_000, out_hz: 24_576_000 },
                Call::SetSysclk(24_576_000),
            ]
        );
    }

    #[tokio::test]
    async fn program_without_reference_is_a_precondition_error() {
        let log = CallLog::new();
        let mic = Cell::new(false);
        let mut host = MockHostDai::new(&log);
        let mut codec = MockCodec::new(&log, &mic);
        let mut clocks = ClockSequencer::new(24_576_000);

        assert_eq!(
            clocks.program(44_100, &mut host, &mut codec).await,
            Err(MachineError::Precond)
        );
        assert_eq!(log.snapshot().len(), 0);
    }

    #[tokio::test]
    async fn failed_pll_clears_cached_target() {
        let log = CallLog::new();
        let mic = Cell::new(false);
        let mut mclk = MockMclk::new(&log);
        let mut host = MockHostDai::new(&log);
        let mut codec = MockCodec::new(&log, &mic);
        let mut clocks = ClockSequencer::new(24_576_000);

        clocks.acquire(&mut mclk).await.unwrap();
        clocks.program(44_100, &mut host, &mut codec).await.unwrap();
        assert!(clocks.pll_target().is_some());

        codec.pll_fails = true;
        assert_eq!(
            clocks.program(48_000, &mut host, &mut codec).await,
            Err(MachineError::Config)
        );
        assert_eq!(clocks.pll_target(), None);
    }

    #[tokio::test]
    async fn release_clears_cached_target_with_the_clock() {
        let log = CallLog::new();
        let mic = Cell::new(false);
        let mut mclk = MockMclk::new(&log);
        let mut host = MockHostDai::new(&log);
        let mut codec = MockCodec::new(&log, &mic);
        let mut clocks = ClockSequencer::new(24_576_000);

        clocks.acquire(&mut mclk).await.unwrap();
        clocks.program(44_100, &mut host, &mut codec).await.unwrap();
        clocks.release(&mut mclk).await.unwrap();

        assert_eq!(clocks.pll_target(), None);
    }
}
