//! Host-side digital audio interface (DAI) abstraction.
//!
//! Covers the host's serial audio port (SSI/SAI class): one-time link
//! topology configuration, hardware format, clock dividers, and TDM slot
//! selection. The stream transport itself (DMA framing) is out of scope.

/// Serial interface framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DaiInterfaceFormat {
    /// Philips I2S framing.
    I2s,
    /// Left-justified framing.
    LeftJustified,
    /// Right-justified framing.
    RightJustified,
}

/// Bit-clock / frame-sync polarity pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DaiClockPolarity {
    /// Normal bit clock, normal frame sync.
    NormalNormal,
    /// Normal bit clock, inverted frame sync.
    NormalInverted,
    /// Inverted bit clock, normal frame sync.
    InvertedNormal,
    /// Inverted bit clock, inverted frame sync.
    InvertedInverted,
}

/// Which side of the link drives bit clock and frame sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DaiClockProvider {
    /// Host drives both clocks; the codec is a clock consumer.
    Host,
    /// Codec drives both clocks; the host is a clock consumer.
    Codec,
}

/// Complete DAI hardware format, applied to both ends of the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DaiFormat {
    /// Serial framing.
    pub interface: DaiInterfaceFormat,
    /// Clock polarities.
    pub polarity: DaiClockPolarity,
    /// Clock direction.
    pub provider: DaiClockProvider,
}

impl DaiFormat {
    /// The link format used by this card: I2S, normal polarities, host as
    /// clock provider (the codec runs its DAI in consumer mode and derives
    /// its system clock from the PLL instead).
    pub const fn i2s_host_provided() -> Self {
        Self {
            interface: DaiInterfaceFormat::I2s,
            polarity: DaiClockPolarity::NormalNormal,
            provider: DaiClockProvider::Host,
        }
    }
}

/// TDM slot selection on the serial link.
///
/// Masks follow the host convention: a **cleared** bit selects an active
/// slot. The link always runs 2 slots of 32 bits; mono streams occupy one
/// slot, everything else both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TdmSlots {
    /// Transmit slot mask.
    pub tx_mask: u32,
    /// Receive slot mask.
    pub rx_mask: u32,
    /// Total slot count per frame.
    pub slots: u8,
    /// Slot width in bits.
    pub slot_width: u8,
}

impl TdmSlots {
    /// Mask selecting the first slot only (mono).
    pub const MONO_MASK: u32 = 0xFFFF_FFFE;
    /// Mask selecting the first two slots (stereo / multi-channel).
    pub const STEREO_MASK: u32 = 0xFFFF_FFFC;

    /// Slot selection for a negotiated channel count.
    pub fn for_channels(channels: u8) -> Self {
        let mask = if channels == 1 {
            Self::MONO_MASK
        } else {
            Self::STEREO_MASK
        };
        Self {
            tx_mask: mask,
            rx_mask: mask,
            slots: 2,
            slot_width: 32,
        }
    }
}

/// Host-side clock divider selectors.
///
/// The host serial port has a three-stage transmit clock divider chain; the
/// sequencer programs all three before touching the codec PLL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockDivider {
    /// Fixed /2 prescaler stage.
    TxDiv2,
    /// Prescaler range bit.
    TxPsr,
    /// Programmable modulus stage.
    TxPm,
}

/// Host digital audio interface collaborator.
pub trait HostDai {
    /// Error type
    type Error: core::fmt::Debug;

    /// One-time static configuration of which hardware ports carry clock and
    /// frame-sync between host and codec.
    ///
    /// Idempotent; called exactly once at startup before any stream runs.
    async fn configure_link(&mut self, internal_port: u8, external_port: u8)
        -> Result<(), Self::Error>;

    /// Apply the hardware format to the host side of the link.
    async fn set_dai_format(&mut self, format: DaiFormat) -> Result<(), Self::Error>;

    /// Program one stage of the transmit clock divider chain.
    async fn set_clock_divider(
        &mut self,
        divider: ClockDivider,
        value: u32,
    ) -> Result<(), Self::Error>;

    /// Select the active TDM slots.
    async fn set_tdm_slots(&mut self, slots: TdmSlots) -> Result<(), Self::Error>;
}
