//! In-memory stand-ins for the pin, SSP and GPDMA register blocks.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use lpc176x_spi::gpdma::{ChannelConfig, DmaController, IntFlag};
use lpc176x_spi::gpio::{Direction, Pin, PinControl, PinFunction};
use lpc176x_spi::spi::{Instance, PclkDivider, SpiPins, SspId, Status};
use lpc176x_spi::time::Hertz;

pub const CCLK: u32 = 100_000_000;

/// GPIO with MISO wired back to MOSI. Every rising SCK edge latches the MOSI level into
/// `sent`, MSB first.
pub struct LoopbackGpio {
    pub pins: SpiPins,
    pub levels: HashMap<Pin, bool>,
    pub functions: HashMap<Pin, PinFunction>,
    pub directions: HashMap<Pin, Direction>,
    pub writes: usize,
    pub sent: Vec<u8>,
    shift: u8,
    bits: u8,
}

impl LoopbackGpio {
    pub fn new(pins: SpiPins) -> Self {
        Self {
            pins,
            levels: HashMap::new(),
            functions: HashMap::new(),
            directions: HashMap::new(),
            writes: 0,
            sent: Vec::new(),
            shift: 0,
            bits: 0,
        }
    }

    pub fn level(&self, pin: Pin) -> bool {
        self.levels.get(&pin).copied().unwrap_or(false)
    }

    fn drive(&mut self, pin: Pin, high: bool) {
        self.writes += 1;
        let rising = pin == self.pins.sck && high && !self.level(pin);
        self.levels.insert(pin, high);
        if rising {
            self.shift = (self.shift << 1) | u8::from(self.level(self.pins.mosi));
            self.bits += 1;
            if self.bits == 8 {
                self.sent.push(self.shift);
                self.shift = 0;
                self.bits = 0;
            }
        }
    }
}

impl PinControl for LoopbackGpio {
    fn set_function(&mut self, pin: Pin, function: PinFunction) {
        self.functions.insert(pin, function);
    }

    fn set_direction(&mut self, pin: Pin, direction: Direction) {
        self.directions.insert(pin, direction);
    }

    fn set_high(&mut self, pin: Pin) {
        self.drive(pin, true);
    }

    fn set_low(&mut self, pin: Pin) {
        self.drive(pin, false);
    }

    fn is_high(&self, pin: Pin) -> bool {
        if pin == self.pins.miso {
            self.level(self.pins.mosi)
        } else {
            self.level(pin)
        }
    }
}

/// Register writes observed on a [`FakeSsp`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SspEvent {
    Divider(PclkDivider),
    Power(bool),
    Cr0(u32),
    Cr1(u32),
    Cpsr(u8),
    Write(u16),
    Dmacr(u32),
    /// A status register read and the value it returned
    Status(Status),
}

const TXDMAE: u32 = 1 << 1;

/// SSP block whose shift register loops MOSI back to MISO.
///
/// After every data write, and after transmit DMA is switched on, the next `busy_polls` status
/// reads report a busy block with a non-empty transmit FIFO.
pub struct FakeSsp {
    pub id: SspId,
    pub divider: PclkDivider,
    pub powered: bool,
    pub cr0: u32,
    pub cr1: u32,
    pub cpsr: u8,
    pub dmacr: u32,
    pub rx: VecDeque<u16>,
    pub busy_polls: u32,
    busy: Cell<u32>,
    events: RefCell<Vec<SspEvent>>,
}

impl FakeSsp {
    pub fn new(id: SspId) -> Self {
        Self {
            id,
            divider: PclkDivider::Div4,
            powered: false,
            cr0: 0,
            cr1: 0,
            cpsr: 0,
            dmacr: 0,
            rx: VecDeque::new(),
            busy_polls: 0,
            busy: Cell::new(0),
            events: RefCell::new(Vec::new()),
        }
    }

    pub fn with_busy_polls(id: SspId, busy_polls: u32) -> Self {
        Self {
            busy_polls,
            ..Self::new(id)
        }
    }

    pub fn events(&self) -> Vec<SspEvent> {
        self.events.borrow().clone()
    }

    fn log(&self, event: SspEvent) {
        self.events.borrow_mut().push(event);
    }

    /// Number of status reads that reported a busy block
    pub fn busy_reads(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, SspEvent::Status(status) if status.is_busy()))
            .count()
    }

    pub fn enabled(&self) -> bool {
        self.cr1 & (1 << 1) != 0
    }

    pub fn scr(&self) -> u32 {
        self.cr0 >> 8
    }

    pub fn written(&self) -> Vec<u16> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                SspEvent::Write(word) => Some(*word),
                _ => None,
            })
            .collect()
    }
}

impl Instance for FakeSsp {
    fn id(&self) -> SspId {
        self.id
    }

    fn set_pclk_divider(&mut self, divider: PclkDivider) {
        self.divider = divider;
        self.log(SspEvent::Divider(divider));
    }

    fn pclk(&self) -> Hertz {
        let div = match self.divider {
            PclkDivider::Div1 => 1,
            PclkDivider::Div2 => 2,
            PclkDivider::Div4 => 4,
            PclkDivider::Div8 => 8,
        };
        Hertz::from_raw(CCLK / div)
    }

    fn set_power(&mut self, on: bool) {
        self.powered = on;
        self.log(SspEvent::Power(on));
    }

    fn cr0(&self) -> u32 {
        self.cr0
    }

    fn set_cr0(&mut self, bits: u32) {
        self.cr0 = bits;
        self.log(SspEvent::Cr0(bits));
    }

    fn cr1(&self) -> u32 {
        self.cr1
    }

    fn set_cr1(&mut self, bits: u32) {
        self.cr1 = bits;
        self.log(SspEvent::Cr1(bits));
    }

    fn set_cpsr(&mut self, prescale: u8) {
        self.cpsr = prescale;
        self.log(SspEvent::Cpsr(prescale));
    }

    fn status(&self) -> Status {
        let mut bits = Status::TNF;
        match self.busy.get() {
            0 => bits |= Status::TFE,
            polls => {
                bits |= Status::BSY;
                self.busy.set(polls - 1);
            }
        }
        if !self.rx.is_empty() {
            bits |= Status::RNE;
        }
        let status = Status(bits);
        self.log(SspEvent::Status(status));
        status
    }

    fn read_data(&mut self) -> u16 {
        self.rx.pop_front().unwrap_or(0)
    }

    fn write_data(&mut self, word: u16) {
        let mask = (1u32 << ((self.cr0 & 0xF) + 1)) - 1;
        self.rx.push_back((u32::from(word) & mask) as u16);
        self.busy.set(self.busy_polls);
        self.log(SspEvent::Write(word));
    }

    fn dmacr(&self) -> u32 {
        self.dmacr
    }

    fn set_dmacr(&mut self, bits: u32) {
        if bits & TXDMAE != 0 && self.dmacr & TXDMAE == 0 {
            self.busy.set(self.busy_polls);
        }
        self.dmacr = bits;
        self.log(SspEvent::Dmacr(bits));
    }
}

/// Calls observed on a [`FakeDma`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmaEvent {
    Init,
    Setup(ChannelConfig),
    Enable(u8),
    Disable(u8),
    Clear(IntFlag, u8),
}

/// GPDMA controller whose channels finish the moment they are enabled
#[derive(Default)]
pub struct FakeDma {
    pub events: Vec<DmaEvent>,
    /// Raise the error flag instead of terminal count
    pub fail: bool,
    terminal_count: u8,
    error: u8,
}

impl FakeDma {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn setups(&self) -> Vec<ChannelConfig> {
        self.events
            .iter()
            .filter_map(|event| match event {
                DmaEvent::Setup(config) => Some(*config),
                _ => None,
            })
            .collect()
    }
}

impl DmaController for FakeDma {
    fn init(&mut self) {
        self.events.push(DmaEvent::Init);
    }

    fn setup(&mut self, config: &ChannelConfig) {
        self.events.push(DmaEvent::Setup(*config));
    }

    fn set_channel_enabled(&mut self, channel: u8, enabled: bool) {
        if enabled {
            self.events.push(DmaEvent::Enable(channel));
            if self.fail {
                self.error |= 1 << channel;
            } else {
                self.terminal_count |= 1 << channel;
            }
        } else {
            self.events.push(DmaEvent::Disable(channel));
        }
    }

    fn int_status(&self, flag: IntFlag, channel: u8) -> bool {
        let bits = match flag {
            IntFlag::TerminalCount => self.terminal_count,
            IntFlag::Error => self.error,
        };
        bits & (1 << channel) != 0
    }

    fn clear_int_pending(&mut self, flag: IntFlag, channel: u8) {
        match flag {
            IntFlag::TerminalCount => self.terminal_count &= !(1 << channel),
            IntFlag::Error => self.error &= !(1 << channel),
        }
        self.events.push(DmaEvent::Clear(flag, channel));
    }
}
