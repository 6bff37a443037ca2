use crate::gpio::{Direction, PinControl, PinFunction};

use super::ssp_def::{self, FrameConfig};
use super::{
    DataMode, DataSize, Error, Instance, PclkDivider, SpeedIndex, SpiPins,
    SpiSettings, SpiTransport, SspId,
};

/// Pin-select function of the SSP lines
pub(crate) const SSP_PIN_FUNCTION: PinFunction = PinFunction::alternate(2);

/// Route `pins` to the SSP and set their directions
pub(crate) fn bind_pins<G: PinControl>(gpio: &mut G, pins: &SpiPins) {
    gpio.set_function(pins.sck, SSP_PIN_FUNCTION);
    gpio.set_direction(pins.sck, Direction::Output);

    gpio.set_function(pins.miso, SSP_PIN_FUNCTION);
    gpio.set_direction(pins.miso, Direction::Input);

    gpio.set_function(pins.mosi, SSP_PIN_FUNCTION);
    gpio.set_direction(pins.mosi, Direction::Output);
}

/// Check that `pins` are the hardware triple of `id`
pub(crate) fn check_pins(id: SspId, pins: &SpiPins) -> Result<(), Error> {
    match SspId::from_pins(pins) {
        Some(owner) if owner == id => Ok(()),
        _ => Err(Error::InvalidPins),
    }
}

/// A single SSP unit driven by busy-wait polling.
///
/// Frames are always 8 bit, mode 0. The speed is chosen through [`SpiTransport::init`].
pub struct HwSpi<SSP, G> {
    ssp: SSP,
    gpio: G,
    pins: SpiPins,
}

impl<SSP: Instance, G: PinControl> HwSpi<SSP, G> {
    /// Take ownership of an SSP unit and its pins.
    ///
    /// Fails with [`Error::InvalidPins`] unless `pins` is the SCK/MISO/MOSI triple of the unit.
    pub fn new(ssp: SSP, gpio: G, pins: SpiPins) -> Result<Self, Error> {
        check_pins(ssp.id(), &pins)?;
        Ok(Self { ssp, gpio, pins })
    }

    /// Deconstructs the driver and returns the component parts.
    pub fn free(self) -> (SSP, G) {
        (self.ssp, self.gpio)
    }

    pub fn inner(&self) -> &SSP {
        &self.ssp
    }

    pub fn inner_mut(&mut self) -> &mut SSP {
        &mut self.ssp
    }
}

impl<SSP: Instance, G: PinControl> SpiTransport for HwSpi<SSP, G> {
    fn begin(&mut self) {
        bind_pins(&mut self.gpio, &self.pins);
        self.ssp.set_pclk_divider(PclkDivider::Div2);
        self.init(SpeedIndex::FULL);
        ssp_def::enable(&mut self.ssp);
    }

    fn init(&mut self, speed: SpeedIndex) {
        let frame = FrameConfig {
            clock: speed.rate(),
            data_size: DataSize::Bits8,
            data_mode: DataMode::Mode0,
        };
        ssp_def::configure(&mut self.ssp, frame);
        ssp_def::enable(&mut self.ssp);
        debug!(
            "ssp {:?} speed {} -> {} Hz",
            self.ssp.id(),
            speed.index(),
            speed.rate().raw()
        );
    }

    fn transfer_byte(&mut self, byte: u8) -> u8 {
        self.ssp.write_data(u16::from(byte));
        while self.ssp.status().is_busy() {
            core::hint::spin_loop();
        }
        (self.ssp.read_data() & 0xFF) as u8
    }

    /// Transaction settings are not applied by this engine; the frame format stays at 8 bit
    /// mode 0 and the speed at the one chosen by `init`.
    fn begin_transaction(&mut self, _settings: SpiSettings) {
        trace!("ssp {:?}: transaction settings ignored", self.ssp.id());
    }
}
