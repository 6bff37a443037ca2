use super::{Error, Mode, Phase, Polarity};
use crate::time::Hertz;

/// The order in which the bits of a frame are shifted out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Least significant bit first
    LsbFirst,
    /// Most significant bit first. MSB first is the default SPI behavior.
    #[default]
    MsbFirst,
}

/// The four standard SPI modes.
///
/// | Mode | CPHA        | CPOL |
/// |------|-------------|------|
/// | 0    | first edge  | high |
/// | 1    | second edge | high |
/// | 2    | first edge  | low  |
/// | 3    | second edge | low  |
///
/// CPOL is named after the SSP convention: a "high" clock is active high, so it idles low
/// ([`Polarity::IdleLow`]) and leaves `CR0.CPOL` clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataMode {
    #[default]
    Mode0 = 0,
    Mode1 = 1,
    Mode2 = 2,
    Mode3 = 3,
}

impl DataMode {
    /// Clock phase for this mode
    pub const fn phase(self) -> Phase {
        match self {
            DataMode::Mode0 | DataMode::Mode2 => {
                Phase::CaptureOnFirstTransition
            }
            DataMode::Mode1 | DataMode::Mode3 => {
                Phase::CaptureOnSecondTransition
            }
        }
    }

    /// Clock polarity for this mode
    pub const fn polarity(self) -> Polarity {
        match self {
            DataMode::Mode0 | DataMode::Mode1 => Polarity::IdleLow,
            DataMode::Mode2 | DataMode::Mode3 => Polarity::IdleHigh,
        }
    }

    pub const fn mode(self) -> Mode {
        Mode {
            polarity: self.polarity(),
            phase: self.phase(),
        }
    }
}

impl TryFrom<u8> for DataMode {
    type Error = Error;

    fn try_from(mode: u8) -> Result<Self, Error> {
        match mode {
            0 => Ok(DataMode::Mode0),
            1 => Ok(DataMode::Mode1),
            2 => Ok(DataMode::Mode2),
            3 => Ok(DataMode::Mode3),
            _ => Err(Error::InvalidDataMode(mode)),
        }
    }
}

impl From<Mode> for DataMode {
    fn from(mode: Mode) -> Self {
        match (mode.polarity, mode.phase) {
            (Polarity::IdleLow, Phase::CaptureOnFirstTransition) => {
                DataMode::Mode0
            }
            (Polarity::IdleLow, Phase::CaptureOnSecondTransition) => {
                DataMode::Mode1
            }
            (Polarity::IdleHigh, Phase::CaptureOnFirstTransition) => {
                DataMode::Mode2
            }
            (Polarity::IdleHigh, Phase::CaptureOnSecondTransition) => {
                DataMode::Mode3
            }
        }
    }
}

/// Frame size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataSize {
    #[default]
    Bits8,
    Bits16,
}

impl DataSize {
    pub const fn bits(self) -> u8 {
        match self {
            DataSize::Bits8 => 8,
            DataSize::Bits16 => 16,
        }
    }
}

/// Default clock of a freshly constructed unit
pub const DEFAULT_CLOCK: Hertz = Hertz::from_raw(4_000_000);

/// Transaction settings for a unit.
///
/// This structure uses builder semantics to generate the settings.
///
/// `Example`
/// ```
/// use lpc176x_spi::spi::{BitOrder, DataMode, DataSize, SpiSettings};
/// use lpc176x_spi::time::Hertz;
///
/// let settings = SpiSettings::new(Hertz::MHz(1))
///     .data_mode(DataMode::Mode3)
///     .data_size(DataSize::Bits16);
/// assert_eq!(settings.bit_order, BitOrder::MsbFirst);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiSettings {
    /// Requested bus clock.
    ///
    /// Note:
    /// * `begin_transaction` does not apply this value. Use `set_clock` followed by `begin`.
    pub clock: Hertz,
    pub bit_order: BitOrder,
    pub data_mode: DataMode,
    pub data_size: DataSize,
}

impl SpiSettings {
    /// MSB first, mode 0, 8 bit frames at `clock`
    pub const fn new(clock: Hertz) -> Self {
        Self {
            clock,
            bit_order: BitOrder::MsbFirst,
            data_mode: DataMode::Mode0,
            data_size: DataSize::Bits8,
        }
    }

    #[must_use]
    pub fn bit_order(mut self, bit_order: BitOrder) -> Self {
        self.bit_order = bit_order;
        self
    }

    #[must_use]
    pub fn data_mode(mut self, data_mode: impl Into<DataMode>) -> Self {
        self.data_mode = data_mode.into();
        self
    }

    #[must_use]
    pub fn data_size(mut self, data_size: DataSize) -> Self {
        self.data_size = data_size;
        self
    }
}

impl Default for SpiSettings {
    fn default() -> Self {
        Self::new(DEFAULT_CLOCK)
    }
}

impl From<Mode> for SpiSettings {
    fn from(mode: Mode) -> Self {
        Self::default().data_mode(mode)
    }
}
