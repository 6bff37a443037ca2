//! Bit-banged SPI master, mode 0, MSB first.
//!
//! Timing comes from the GPIO writes themselves: with a non-zero stretch factor every level is
//! written `factor` times, which holds it for roughly that many bus cycles.

use crate::gpio::{Direction, PinControl};
use crate::time::Hertz;

use super::{SpeedIndex, SpiPins, SpiSettings, SpiTransport};

/// Core clock of a stock LPC1768
pub const DEFAULT_CORE_CLOCK: Hertz = Hertz::from_raw(100_000_000);

const FAST_CORE_CLOCK: Hertz = Hertz::from_raw(120_000_000);

/// Stretch factor for the slowest speed index, per core clock
const BASE_FACTOR_120MHZ: u8 = 44;
const BASE_FACTOR: u8 = 38;

/// Stretch factor for `speed`: the base factor halved once per step above the slowest index.
/// The three fastest indices end up at 0, which disables stretching.
pub(crate) const fn stretch_factor(core_clock: Hertz, speed: SpeedIndex) -> u8 {
    let base = if core_clock.raw() == FAST_CORE_CLOCK.raw() {
        BASE_FACTOR_120MHZ
    } else {
        BASE_FACTOR
    };
    base >> (SpeedIndex::SLOWEST.index() - speed.index())
}

/// Software SPI engine
pub struct SoftSpi<G> {
    gpio: G,
    pins: SpiPins,
    core_clock: Hertz,
    factor: u8,
}

impl<G: PinControl> SoftSpi<G> {
    /// Create the engine. `core_clock` selects the timing base of the stretch factor
    pub fn new(gpio: G, pins: SpiPins, core_clock: Hertz) -> Self {
        Self {
            gpio,
            pins,
            core_clock,
            factor: 0,
        }
    }

    pub fn pins(&self) -> SpiPins {
        self.pins
    }

    /// Current half-period stretch factor
    pub fn factor(&self) -> u8 {
        self.factor
    }

    pub fn free(self) -> G {
        self.gpio
    }

    #[inline(always)]
    fn hold(&mut self, pin: crate::gpio::Pin, high: bool) {
        self.gpio.set_level(pin, high);
        for _ in 1..self.factor {
            self.gpio.set_level(pin, high);
        }
    }
}

impl<G: PinControl> SpiTransport for SoftSpi<G> {
    fn begin(&mut self) {
        self.gpio.set_direction(self.pins.sck, Direction::Output);
        self.gpio.set_direction(self.pins.miso, Direction::Input);
        self.gpio.set_direction(self.pins.mosi, Direction::Output);
    }

    fn init(&mut self, speed: SpeedIndex) {
        self.gpio.set_high(self.pins.mosi);
        self.gpio.set_low(self.pins.sck);
        self.factor = stretch_factor(self.core_clock, speed);
        debug!(
            "soft spi speed {} factor {}",
            speed.index(),
            self.factor
        );
    }

    fn transfer_byte(&mut self, byte: u8) -> u8 {
        let SpiPins { sck, miso, mosi } = self.pins;
        let mut shift = byte;
        for _ in 0..8 {
            self.hold(mosi, shift & 0x80 != 0);
            self.hold(sck, true);
            shift <<= 1;
            if self.gpio.is_high(miso) {
                shift |= 1;
            }
            self.hold(sck, false);
        }
        shift
    }

    /// The software engine only speaks mode 0, MSB first, at the speed chosen by `init`
    fn begin_transaction(&mut self, _settings: SpiSettings) {}
}
