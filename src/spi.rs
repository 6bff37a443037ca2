//! Serial Peripheral Interface (SPI)
//!
//! This module provides SPI as a master through one of two engines:
//!
//! - [`SoftSpi`]: a bit-banged engine that drives SCK/MOSI and samples MISO through
//!   [`PinControl`]. Some LCD adapters share the SD card SPI pins, and while the SSP owns those
//!   pins they can not be set or cleared as GPIO. Such boards must use the software engine.
//! - The SSP hardware block, reached either through [`HwSpi`] (a single unit with the plain
//!   byte/block API) or through [`SpiController`] (up to two units with per-unit settings,
//!   transaction-style configuration and GPDMA transmit bursts).
//!
//! All of them implement [`SpiTransport`], and [`Transport`] selects one at startup. Chip select
//! is never touched by this module; callers assert and release it around each exchange.
//!
//! # Usage
//!
//! ## Initialization
//! The engines are built from explicit resources. The hardware engines take an SSP register
//! handle implementing [`Instance`], a GPIO handle and the SCK/MISO/MOSI pins:
//!
//! ```
//! use lpc176x_spi::gpio::PinControl;
//! use lpc176x_spi::spi::{self, Instance, SpeedIndex, SpiTransport, SspId, Transport, TransportKind};
//! use lpc176x_spi::time::Hertz;
//!
//! fn bring_up<G: PinControl, R: Instance>(gpio: G, ssp: R) -> Result<Transport<G, R>, spi::Error> {
//!     let core_clock = Hertz::MHz(100);
//!     let mut spi = Transport::new(TransportKind::Hardware, gpio, ssp, SspId::Ssp1.pins(), core_clock)?;
//!     spi.begin();
//!     spi.init(SpeedIndex::QUARTER);
//!     Ok(spi)
//! }
//! ```
//!
//! ## Blocking API
//! Every operation blocks until the bus is idle again. There are no timeouts: a stalled
//! peripheral hangs the caller.
//!
//! ```
//! use lpc176x_spi::spi::SpiTransport;
//!
//! fn write_sector<T: SpiTransport>(spi: &mut T, sector: &[u8; 512]) -> u8 {
//!     spi.send_block(0xFE, sector);
//!     spi.receive_byte()
//! }
//! ```
//!
//! The engines also implement the [embedded-hal][embedded_hal] [`SpiBus`][spi_bus] trait for
//! `u8` words.
//!
//! ## DMA
//! [`SpiController::dma_send`] pushes a buffer to the transmit FIFO through GPDMA channel 0 and
//! waits for the burst to leave the shift register.
//!
//! [embedded_hal]: https://docs.rs/embedded-hal/1.0.0/embedded_hal/spi/index.html
//! [spi_bus]: https://docs.rs/embedded-hal/1.0.0/embedded_hal/spi/trait.SpiBus.html

pub use embedded_hal::spi::{
    Mode, Phase, Polarity, MODE_0, MODE_1, MODE_2, MODE_3,
};

use crate::gpio::{Pin, PinControl};
use crate::time::Hertz;

mod config;
mod device;
mod dma;
mod hal;
mod hw;
mod soft;
pub mod speed;
mod ssp_def;

pub use config::{
    BitOrder, DataMode, DataSize, SpiSettings, DEFAULT_CLOCK,
};
pub use device::{DeviceSettings, SpiController, Unit, MAX_UNITS};
pub use hw::HwSpi;
pub use soft::SoftSpi;
pub use speed::SpeedIndex;
pub use ssp_def::{Instance, PclkDivider, SspId, Status};

/// Payload size of a block transfer, one storage sector
pub const BLOCK_SIZE: usize = 512;

/// Word clocked out while reading
pub const FILLER: u8 = 0xFF;

/// SPI error
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The 1-based unit number does not name a configured unit
    InvalidModule(u8),
    /// More units were supplied than the controller can hold
    TooManyUnits { max: usize },
    /// The pins are not an SCK/MISO/MOSI triple of the requested SSP block
    InvalidPins,
    /// SPI modes are numbered 0 to 3
    InvalidDataMode(u8),
    /// A buffer is too big to be processed
    BufferTooBig { max_size: usize },
    /// The requested length runs past the end of the buffer
    BufferTooShort,
    /// The buffer word type does not match the configured data size
    WordSizeMismatch,
}

/// The SCK, MISO and MOSI lines of a bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiPins {
    pub sck: Pin,
    pub miso: Pin,
    pub mosi: Pin,
}

impl SpiPins {
    pub const fn new(sck: Pin, miso: Pin, mosi: Pin) -> Self {
        Self { sck, miso, mosi }
    }
}

/// Words the SSP can move: 8 and 16 bit frames
pub trait Word: Copy + Default + 'static + crate::Sealed {
    const SIZE: DataSize;
}

impl Word for u8 {
    const SIZE: DataSize = DataSize::Bits8;
}

impl Word for u16 {
    const SIZE: DataSize = DataSize::Bits16;
}

impl crate::Sealed for u8 {}
impl crate::Sealed for u16 {}

/// The operations every SPI engine provides.
///
/// `send_byte`, `receive_byte`, `read_buffer` and `send_buffer` are compositions of
/// [`transfer_byte`](SpiTransport::transfer_byte) and rarely need overriding.
pub trait SpiTransport {
    /// Configure the pins and the engine with its defaults
    fn begin(&mut self);

    /// Select the bus speed. Indices above 6 are clamped
    fn init(&mut self, speed: SpeedIndex);

    /// Clock one byte out and return the byte clocked in
    fn transfer_byte(&mut self, byte: u8) -> u8;

    /// Send one token byte followed by a full block
    fn send_block(&mut self, token: u8, block: &[u8; BLOCK_SIZE]) {
        self.send_byte(token);
        self.send_buffer(block);
    }

    /// Apply transaction settings, where the engine supports them
    fn begin_transaction(&mut self, settings: SpiSettings);

    #[inline]
    fn send_byte(&mut self, byte: u8) {
        let _ = self.transfer_byte(byte);
    }

    #[inline]
    fn receive_byte(&mut self) -> u8 {
        self.transfer_byte(FILLER)
    }

    fn read_buffer(&mut self, buf: &mut [u8]) {
        for byte in buf.iter_mut() {
            *byte = self.transfer_byte(FILLER);
        }
    }

    fn send_buffer(&mut self, buf: &[u8]) {
        for byte in buf {
            self.send_byte(*byte);
        }
    }
}

/// Which engine a [`Transport`] uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportKind {
    /// Bit-banged over GPIO
    Software,
    /// The SSP block the pins belong to
    Hardware,
}

/// An SPI engine chosen once at startup
pub enum Transport<G, R> {
    Software(SoftSpi<G>),
    Hardware(HwSpi<R, G>),
}

impl<G: PinControl, R: Instance> Transport<G, R> {
    /// Build the engine of the requested `kind` on `pins`.
    ///
    /// `core_clock` is the running CPU clock; the software engine derives its timing from it.
    /// The software engine drops `ssp`. The hardware engine fails with [`Error::InvalidPins`]
    /// when the pins are not the triple of the SSP block.
    pub fn new(
        kind: TransportKind,
        gpio: G,
        ssp: R,
        pins: SpiPins,
        core_clock: Hertz,
    ) -> Result<Self, Error> {
        debug!("spi transport: {:?}, core clock {} Hz", kind, core_clock.raw());
        match kind {
            TransportKind::Software => {
                Ok(Transport::Software(SoftSpi::new(gpio, pins, core_clock)))
            }
            TransportKind::Hardware => {
                HwSpi::new(ssp, gpio, pins).map(Transport::Hardware)
            }
        }
    }

    pub fn kind(&self) -> TransportKind {
        match self {
            Transport::Software(_) => TransportKind::Software,
            Transport::Hardware(_) => TransportKind::Hardware,
        }
    }
}

impl<G: PinControl, R: Instance> SpiTransport for Transport<G, R> {
    fn begin(&mut self) {
        match self {
            Transport::Software(spi) => spi.begin(),
            Transport::Hardware(spi) => spi.begin(),
        }
    }

    fn init(&mut self, speed: SpeedIndex) {
        match self {
            Transport::Software(spi) => spi.init(speed),
            Transport::Hardware(spi) => spi.init(speed),
        }
    }

    fn transfer_byte(&mut self, byte: u8) -> u8 {
        match self {
            Transport::Software(spi) => spi.transfer_byte(byte),
            Transport::Hardware(spi) => spi.transfer_byte(byte),
        }
    }

    fn send_block(&mut self, token: u8, block: &[u8; BLOCK_SIZE]) {
        match self {
            Transport::Software(spi) => spi.send_block(token, block),
            Transport::Hardware(spi) => spi.send_block(token, block),
        }
    }

    fn begin_transaction(&mut self, settings: SpiSettings) {
        match self {
            Transport::Software(spi) => spi.begin_transaction(settings),
            Transport::Hardware(spi) => spi.begin_transaction(settings),
        }
    }
}
