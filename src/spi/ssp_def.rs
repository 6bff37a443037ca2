use crate::gpdma::Connection;
use crate::gpio;
use crate::time::Hertz;

use super::config::{DataMode, DataSize};
use super::{Phase, Polarity, SpiPins};

/// The SSP blocks of the LPC176x
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SspId {
    Ssp0,
    Ssp1,
}

impl SspId {
    /// GPDMA request connection for the transmit FIFO
    pub const fn tx_dma_request(self) -> Connection {
        match self {
            SspId::Ssp0 => Connection::Ssp0Tx,
            SspId::Ssp1 => Connection::Ssp1Tx,
        }
    }

    /// The SCK/MISO/MOSI triple wired to this block (pin function 2)
    pub const fn pins(self) -> SpiPins {
        match self {
            SspId::Ssp0 => SpiPins::new(gpio::P0_15, gpio::P0_17, gpio::P0_18),
            SspId::Ssp1 => SpiPins::new(gpio::P0_07, gpio::P0_08, gpio::P0_09),
        }
    }

    /// The SSP block that `pins` belong to, if they form a hardware triple
    pub fn from_pins(pins: &SpiPins) -> Option<Self> {
        [SspId::Ssp0, SspId::Ssp1]
            .into_iter()
            .find(|id| id.pins() == *pins)
    }
}

/// Peripheral clock divider (`PCLKSEL0/1`), relative to CCLK
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PclkDivider {
    Div4 = 0,
    Div1 = 1,
    Div2 = 2,
    Div8 = 3,
}

/// Snapshot of the SSP status register (`SSPnSR`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status(pub u8);

impl Status {
    /// Transmit FIFO empty
    pub const TFE: u8 = 1 << 0;
    /// Transmit FIFO not full
    pub const TNF: u8 = 1 << 1;
    /// Receive FIFO not empty
    pub const RNE: u8 = 1 << 2;
    /// Receive FIFO full
    pub const RFF: u8 = 1 << 3;
    /// Busy
    pub const BSY: u8 = 1 << 4;

    /// Status of an idle, empty block
    pub const IDLE: Self = Self(Self::TFE | Self::TNF);

    #[inline(always)]
    pub const fn is_tx_fifo_empty(self) -> bool {
        self.0 & Self::TFE != 0
    }

    #[inline(always)]
    pub const fn is_tx_fifo_not_full(self) -> bool {
        self.0 & Self::TNF != 0
    }

    #[inline(always)]
    pub const fn is_rx_fifo_not_empty(self) -> bool {
        self.0 & Self::RNE != 0
    }

    #[inline(always)]
    pub const fn is_busy(self) -> bool {
        self.0 & Self::BSY != 0
    }
}

// CR0
pub(crate) const CR0_DSS_MASK: u32 = 0xF;
pub(crate) const CR0_FRF_SPI: u32 = 0 << 4;
pub(crate) const CR0_CPOL: u32 = 1 << 6;
pub(crate) const CR0_CPHA: u32 = 1 << 7;
pub(crate) const CR0_SCR_SHIFT: u32 = 8;

// CR1
pub(crate) const CR1_SSE: u32 = 1 << 1;
pub(crate) const CR1_MS_SLAVE: u32 = 1 << 2;

// DMACR
pub(crate) const DMACR_TXDMAE: u32 = 1 << 1;

/// Register level access to one SSP block.
///
/// Implementations map each method onto the matching register of the block they wrap; the
/// drivers never hold more than one `Instance` per block.
pub trait Instance {
    fn id(&self) -> SspId;

    /// Program this block's field in `PCLKSEL`
    fn set_pclk_divider(&mut self, divider: PclkDivider);

    /// Current SSP input clock (CCLK divided by the programmed divider)
    fn pclk(&self) -> Hertz;

    /// Gate the block's clock in `PCONP`
    fn set_power(&mut self, on: bool);

    fn cr0(&self) -> u32;
    fn set_cr0(&mut self, bits: u32);

    fn cr1(&self) -> u32;
    fn set_cr1(&mut self, bits: u32);

    fn set_cpsr(&mut self, prescale: u8);

    fn status(&self) -> Status;

    /// Pop the receive FIFO
    fn read_data(&mut self) -> u16;

    /// Push the transmit FIFO
    fn write_data(&mut self, word: u16);

    fn dmacr(&self) -> u32;
    fn set_dmacr(&mut self, bits: u32);
}

/// Frame format and clock settings that end up in CR0 and CPSR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameConfig {
    pub clock: Hertz,
    pub data_size: DataSize,
    pub data_mode: DataMode,
}

/// Find the SSP clock prescaler (`CPSR`, even, 2..=254) and serial clock rate (`SCR`, 0..=255)
/// whose bit rate `pclk / (cpsr * (scr + 1))` is the fastest not above `target`.
///
/// Targets below the slowest reachable rate get the slowest setting.
pub(crate) fn calc_prescale(pclk: u32, target: u32) -> (u8, u8) {
    let mut cpsr: u32 = 2;
    let mut scr: u32 = 0;
    while pclk / ((scr + 1) * cpsr) > target {
        scr += 1;
        if scr > 0xFF {
            scr = 0;
            cpsr += 2;
            if cpsr > 254 {
                return (254, 0xFF);
            }
        }
    }
    (cpsr as u8, scr as u8)
}

/// Write CR0, CPSR and CR1 for master SPI operation. Leaves the block disabled.
pub(crate) fn configure<SSP: Instance>(ssp: &mut SSP, frame: FrameConfig) {
    ssp.set_power(true);

    let (cpsr, scr) = calc_prescale(ssp.pclk().raw(), frame.clock.raw());

    let mut cr0 = (u32::from(frame.data_size.bits()) - 1) & CR0_DSS_MASK;
    cr0 |= CR0_FRF_SPI;
    if frame.data_mode.polarity() == Polarity::IdleHigh {
        cr0 |= CR0_CPOL;
    }
    if frame.data_mode.phase() == Phase::CaptureOnSecondTransition {
        cr0 |= CR0_CPHA;
    }
    cr0 |= u32::from(scr) << CR0_SCR_SHIFT;

    ssp.set_cr1(ssp.cr1() & !(CR1_SSE | CR1_MS_SLAVE));
    ssp.set_cr0(cr0);
    ssp.set_cpsr(cpsr);

    trace!(
        "ssp cr0={} cpsr={} for {} Hz",
        cr0,
        cpsr,
        frame.clock.raw()
    );
}

#[inline]
pub(crate) fn enable<SSP: Instance>(ssp: &mut SSP) {
    ssp.set_cr1(ssp.cr1() | CR1_SSE);
}

/// Disable the block and gate its clock
#[inline]
pub(crate) fn deinit<SSP: Instance>(ssp: &mut SSP) {
    ssp.set_cr1(ssp.cr1() & !CR1_SSE);
    ssp.set_power(false);
}

#[inline]
pub(crate) fn set_tx_dma<SSP: Instance>(ssp: &mut SSP, enabled: bool) {
    let dmacr = ssp.dmacr();
    if enabled {
        ssp.set_dmacr(dmacr | DMACR_TXDMAE);
    } else {
        ssp.set_dmacr(dmacr & !DMACR_TXDMAE);
    }
}

/// Wait until the transmit FIFO has drained and the last frame left the shift register
#[inline]
pub(crate) fn wait_tx_end<SSP: Instance>(ssp: &SSP) {
    while !ssp.status().is_tx_fifo_empty() {
        core::hint::spin_loop();
    }
    while ssp.status().is_busy() {
        core::hint::spin_loop();
    }
}
