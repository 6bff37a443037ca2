//! Abstract speed indices
//!
//! Storage and display drivers ask for a bus speed by index rather than by frequency. Index 0 is
//! the fastest rate, every further index roughly halves it. Indices above 6 are clamped to 6.

use crate::time::Hertz;

/// Number of entries in the rate table
pub const SPEED_COUNT: usize = 7;

/// Clock rate for each speed index, with a 50 MHz SSP clock (CCLK / 2) and CPSR = 2
pub const RATES: [Hertz; SPEED_COUNT] = [
    Hertz::from_raw(8_333_333), // SCR 2, "full speed"
    Hertz::from_raw(4_166_667), // SCR 5, "half speed"
    Hertz::from_raw(2_083_333), // SCR 11, "quarter speed"
    Hertz::from_raw(1_000_000), // SCR 24, "eighth speed"
    Hertz::from_raw(500_000),   // SCR 49
    Hertz::from_raw(250_000),   // SCR 99
    Hertz::from_raw(125_000),   // SCR 199, default
];

/// A speed index in `0..=6`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedIndex(u8);

impl SpeedIndex {
    pub const FULL: Self = Self(0);
    pub const HALF: Self = Self(1);
    pub const QUARTER: Self = Self(2);
    pub const EIGHTH: Self = Self(3);
    pub const SLOWEST: Self = Self(SPEED_COUNT as u8 - 1);

    /// Clamp `index` into the table
    pub const fn new(index: u8) -> Self {
        if index > Self::SLOWEST.0 {
            Self::SLOWEST
        } else {
            Self(index)
        }
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    /// The fixed clock rate for this index
    pub const fn rate(self) -> Hertz {
        RATES[self.0 as usize]
    }
}

impl From<u8> for SpeedIndex {
    fn from(index: u8) -> Self {
        Self::new(index)
    }
}
