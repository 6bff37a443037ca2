//! General Purpose Input / Output
//!
//! LPC176x pins are addressed by port and pin number (`P0.15` is port 0, pin 15). Every pin has
//! a pin-select function (0 is plain GPIO, 1-3 are the alternate peripheral functions), a
//! direction, an optional open-drain mode and a pull mode.
//!
//! The SPI drivers in this crate never touch the `PINSEL`, `PINMODE` or `FIOx` registers
//! directly. They go through the [`PinControl`] trait, which the application implements on top
//! of its PAC (or on top of an in-memory fake for host tests).
//!
//! ```
//! use lpc176x_spi::gpio::{self, Direction, PinControl};
//!
//! fn drive_sck_low<G: PinControl>(gpio: &mut G) {
//!     gpio.set_direction(gpio::P0_15, Direction::Output);
//!     gpio.set_low(gpio::P0_15);
//! }
//! ```

use core::fmt;

/// A pin, identified by its port and its bit within the port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin {
    port: u8,
    pin: u8,
}

impl Pin {
    pub const fn new(port: u8, pin: u8) -> Self {
        Self { port, pin }
    }

    /// Port number starting from 0
    pub const fn port(&self) -> u8 {
        self.port
    }

    /// Bit number within the port
    pub const fn pin(&self) -> u8 {
        self.pin
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}.{}", self.port, self.pin)
    }
}

macro_rules! pins {
    ($($port:literal: [$($pin:literal),+])+) => { paste::paste! {
        $($(
            #[doc = "Port " $port " pin " $pin]
            pub const [<P $port _ $pin>]: Pin = Pin::new($port, $pin);
        )+)+
    }};
}

// Pins that carry an SSP function on LPC176x packages
pins! {
    0: [06, 07, 08, 09, 15, 16, 17, 18]
    1: [20, 21, 23, 24]
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Input,
    Output,
}

/// On-chip pull resistor mode (`PINMODE`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// Pulled up. This is the reset state
    Up = 0,
    /// Repeater mode
    Repeater = 1,
    /// Floating
    None = 2,
    /// Pulled down
    Down = 3,
}

/// Complete pin-select configuration for one pin (`PINSEL`, `PINMODE`, `PINMODE_OD`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinFunction {
    /// Function number, 0 = GPIO
    pub func: u8,
    pub open_drain: bool,
    pub pull: Pull,
}

impl PinFunction {
    /// Plain GPIO
    pub const GPIO: Self = Self::alternate(0);

    /// Push-pull alternate function `func` with the pull-up left enabled
    pub const fn alternate(func: u8) -> Self {
        Self {
            func,
            open_drain: false,
            pull: Pull::Up,
        }
    }
}

/// Pin configuration and level access, addressed by port and pin
pub trait PinControl {
    /// Route the pin to a peripheral function (or to GPIO)
    fn set_function(&mut self, pin: Pin, function: PinFunction);

    fn set_direction(&mut self, pin: Pin, direction: Direction);

    fn set_high(&mut self, pin: Pin);

    fn set_low(&mut self, pin: Pin);

    fn is_high(&self, pin: Pin) -> bool;

    /// Drive the pin to `high`
    #[inline(always)]
    fn set_level(&mut self, pin: Pin, high: bool) {
        if high {
            self.set_high(pin)
        } else {
            self.set_low(pin)
        }
    }
}

impl<G: PinControl + ?Sized> PinControl for &mut G {
    fn set_function(&mut self, pin: Pin, function: PinFunction) {
        (**self).set_function(pin, function)
    }

    fn set_direction(&mut self, pin: Pin, direction: Direction) {
        (**self).set_direction(pin, direction)
    }

    fn set_high(&mut self, pin: Pin) {
        (**self).set_high(pin)
    }

    fn set_low(&mut self, pin: Pin) {
        (**self).set_low(pin)
    }

    fn is_high(&self, pin: Pin) -> bool {
        (**self).is_high(pin)
    }
}
