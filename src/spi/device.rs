//! Up to two SSP units behind one handle, each with its own settings record.
//!
//! Settings changes are only recorded; [`SpiController::begin`] applies the active record to the
//! hardware. A unit goes through `begin` → transfers → [`SpiController::end`] → `begin` ...

use heapless::Vec;

use crate::gpdma::DmaController;
use crate::gpio::PinControl;
use crate::time::Hertz;

use super::hw::{bind_pins, check_pins};
use super::ssp_def::{self, FrameConfig};
use super::{
    BitOrder, DataMode, DataSize, Error, Instance, PclkDivider, SpeedIndex,
    SpiPins, SpiSettings, SpiTransport, DEFAULT_CLOCK, FILLER,
};

/// Number of SSP units a controller can hold
pub const MAX_UNITS: usize = 2;

/// One SSP unit and the pins wired to it
pub struct Unit<SSP> {
    pub ssp: SSP,
    pub pins: SpiPins,
}

impl<SSP> Unit<SSP> {
    pub fn new(ssp: SSP, pins: SpiPins) -> Self {
        Self { ssp, pins }
    }
}

/// Settings record of one unit, together with the unit's register handle
pub struct DeviceSettings<SSP> {
    pub(super) ssp: SSP,
    pub clock: Hertz,
    pub bit_order: BitOrder,
    pub data_mode: DataMode,
    pub data_size: DataSize,
}

impl<SSP> DeviceSettings<SSP> {
    fn new(ssp: SSP) -> Self {
        Self {
            ssp,
            clock: DEFAULT_CLOCK,
            bit_order: BitOrder::MsbFirst,
            data_mode: DataMode::Mode0,
            data_size: DataSize::Bits8,
        }
    }

    pub fn ssp(&self) -> &SSP {
        &self.ssp
    }

    fn frame(&self) -> FrameConfig {
        FrameConfig {
            clock: self.clock,
            data_size: self.data_size,
            data_mode: self.data_mode,
        }
    }
}

/// SSP controller with per-unit settings and GPDMA transmit
pub struct SpiController<SSP, DMA> {
    settings: Vec<DeviceSettings<SSP>, MAX_UNITS>,
    active: usize,
    pub(super) dma: DMA,
}

impl<SSP: Instance, DMA: DmaController> SpiController<SSP, DMA> {
    /// Bind the pins of every unit, initialise the GPDMA controller and select `module`
    /// (1-based).
    ///
    /// Errors:
    /// * [`Error::TooManyUnits`] when more than [`MAX_UNITS`] units are given
    /// * [`Error::InvalidPins`] when a unit's pins are not its SCK/MISO/MOSI triple
    /// * [`Error::InvalidModule`] when `module` does not name one of the units
    ///
    /// On error no pin has been reconfigured.
    pub fn new<G, I>(
        gpio: &mut G,
        units: I,
        mut dma: DMA,
        module: u8,
    ) -> Result<Self, Error>
    where
        G: PinControl,
        I: IntoIterator<Item = Unit<SSP>>,
    {
        // Nothing is routed until every unit has been accepted
        let mut accepted: Vec<Unit<SSP>, MAX_UNITS> = Vec::new();
        for unit in units {
            check_pins(unit.ssp.id(), &unit.pins)?;
            accepted
                .push(unit)
                .map_err(|_| Error::TooManyUnits { max: MAX_UNITS })?;
        }

        if !(1..=accepted.len()).contains(&usize::from(module)) {
            return Err(Error::InvalidModule(module));
        }

        let mut settings = Vec::new();
        for unit in accepted {
            bind_pins(gpio, &unit.pins);
            // Same capacity as `accepted`
            let _ = settings.push(DeviceSettings::new(unit.ssp));
        }

        dma.init();

        let mut controller = Self {
            settings,
            active: 0,
            dma,
        };
        controller.set_module(module)?;
        Ok(controller)
    }

    /// Select the unit later calls operate on. Units are numbered from 1.
    ///
    /// An unknown unit leaves the current selection in place.
    pub fn set_module(&mut self, module: u8) -> Result<(), Error> {
        let index = usize::from(module)
            .checked_sub(1)
            .filter(|index| *index < self.settings.len())
            .ok_or(Error::InvalidModule(module))?;
        self.active = index;
        Ok(())
    }

    /// 1-based number of the active unit
    pub fn module(&self) -> u8 {
        self.active as u8 + 1
    }

    /// Number of configured units
    pub fn units(&self) -> usize {
        self.settings.len()
    }

    /// Settings record of unit `module` (1-based)
    pub fn unit_settings(&self, module: u8) -> Option<&DeviceSettings<SSP>> {
        usize::from(module)
            .checked_sub(1)
            .and_then(|index| self.settings.get(index))
    }

    /// Settings record of the active unit
    pub fn settings(&self) -> &DeviceSettings<SSP> {
        self.current()
    }

    #[inline(always)]
    pub(super) fn current(&self) -> &DeviceSettings<SSP> {
        // `active` is only ever set to an index below `settings.len()`
        &self.settings[self.active]
    }

    #[inline(always)]
    pub(super) fn current_mut(&mut self) -> &mut DeviceSettings<SSP> {
        &mut self.settings[self.active]
    }

    #[inline(always)]
    pub(super) fn ssp_mut(&mut self) -> &mut SSP {
        &mut self.current_mut().ssp
    }

    /// Apply the active settings record to its unit and enable it
    pub fn begin(&mut self) {
        let current = self.current_mut();
        if current.bit_order == BitOrder::LsbFirst {
            warn!(
                "ssp {:?}: LSB first is not supported, sending MSB first",
                current.ssp.id()
            );
        }
        let frame = current.frame();
        current.ssp.set_pclk_divider(PclkDivider::Div2);
        ssp_def::configure(&mut current.ssp, frame);
        ssp_def::enable(&mut current.ssp);
        debug!(
            "ssp {:?} begin: {} Hz, mode {}, {} bit",
            current.ssp.id(),
            frame.clock.raw(),
            frame.data_mode as u8,
            frame.data_size.bits()
        );
    }

    /// Set bit order, data mode and data size of the active unit, then [`begin`](Self::begin).
    ///
    /// The clock in `settings` is not applied; the unit keeps the clock set through
    /// [`set_clock`](Self::set_clock).
    pub fn begin_transaction(&mut self, settings: SpiSettings) {
        self.set_bit_order(settings.bit_order);
        self.set_data_mode(settings.data_mode);
        self.set_data_size(settings.data_size);
        if settings.clock != self.current().clock {
            trace!(
                "transaction clock {} Hz not applied, keeping {} Hz",
                settings.clock.raw(),
                self.current().clock.raw()
            );
        }
        self.begin();
    }

    /// Disable the active unit and gate its clock
    pub fn end(&mut self) {
        ssp_def::deinit(self.ssp_mut());
    }

    /// Exchange one word. Any stale word in the receive FIFO is discarded first.
    pub fn transfer(&mut self, word: u16) -> u16 {
        let ssp = self.ssp_mut();
        let _ = ssp.read_data();
        ssp.write_data(word);
        ssp_def::wait_tx_end(&*ssp);
        ssp.read_data()
    }

    /// Exchange a 16 bit value as two byte transfers, high byte first.
    ///
    /// This always performs two 8 bit exchanges, even when the unit is set up for 16 bit
    /// frames.
    pub fn transfer16(&mut self, data: u16) -> u16 {
        let high = self.transfer((data >> 8) & 0xFF) & 0xFF;
        let low = self.transfer(data & 0xFF) & 0xFF;
        (high << 8) | low
    }

    /// Queue one word without waiting for it
    pub fn send(&mut self, word: u16) {
        self.ssp_mut().write_data(word);
    }

    /// Pop the receive FIFO without clocking. Only meaningful after a [`send`](Self::send).
    pub fn read(&mut self) -> u16 {
        self.ssp_mut().read_data()
    }

    /// Fill `buf` with one full transfer of `0xFF` per byte
    pub fn read_into(&mut self, buf: &mut [u8]) {
        for byte in buf.iter_mut() {
            *byte = self.transfer(u16::from(FILLER)) as u8;
        }
    }

    pub fn set_clock(&mut self, clock: Hertz) {
        self.current_mut().clock = clock;
    }

    pub fn set_bit_order(&mut self, bit_order: BitOrder) {
        self.current_mut().bit_order = bit_order;
    }

    pub fn set_data_mode(&mut self, data_mode: DataMode) {
        self.current_mut().data_mode = data_mode;
    }

    pub fn set_data_size(&mut self, data_size: DataSize) {
        self.current_mut().data_size = data_size;
    }

    /// Deconstructs the controller and returns the unit handles and the DMA controller.
    pub fn free(self) -> (Vec<SSP, MAX_UNITS>, DMA) {
        let units = self.settings.into_iter().map(|s| s.ssp).collect();
        (units, self.dma)
    }
}

impl<SSP: Instance, DMA: DmaController> SpiTransport for SpiController<SSP, DMA> {
    fn begin(&mut self) {
        SpiController::begin(self)
    }

    /// Record the rate of `speed` as the active unit's clock and re-apply the settings
    fn init(&mut self, speed: SpeedIndex) {
        self.set_clock(speed.rate());
        SpiController::begin(self);
    }

    fn transfer_byte(&mut self, byte: u8) -> u8 {
        self.transfer(u16::from(byte)) as u8
    }

    fn begin_transaction(&mut self, settings: SpiSettings) {
        SpiController::begin_transaction(self, settings)
    }
}
