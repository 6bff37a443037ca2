mod common;

use common::{FakeSsp, LoopbackGpio};
use embedded_hal::spi::SpiBus;
use lpc176x_spi::gpio::{Direction, PinFunction};
use lpc176x_spi::spi::{
    Error, SoftSpi, SpeedIndex, SpiSettings, SpiTransport, SspId, Transport,
    TransportKind, BLOCK_SIZE,
};
use lpc176x_spi::time::Hertz;

const CORE_CLOCK: Hertz = Hertz::from_raw(100_000_000);

fn exchange_all<T: SpiTransport>(spi: &mut T) {
    for byte in 0..=u8::MAX {
        assert_eq!(spi.transfer_byte(byte), byte);
    }
}

#[test]
fn software_engine_loops_every_byte_back() {
    let pins = SspId::Ssp1.pins();
    let mut gpio = LoopbackGpio::new(pins);
    {
        let mut spi = Transport::new(
            TransportKind::Software,
            &mut gpio,
            FakeSsp::new(SspId::Ssp1),
            pins,
            CORE_CLOCK,
        )
        .unwrap();
        assert_eq!(spi.kind(), TransportKind::Software);
        spi.begin();
        spi.init(SpeedIndex::FULL);
        exchange_all(&mut spi);
    }
    assert_eq!(gpio.sent, (0..=u8::MAX).collect::<Vec<_>>());
    assert_eq!(gpio.directions[&pins.sck], Direction::Output);
    assert_eq!(gpio.directions[&pins.miso], Direction::Input);
    assert_eq!(gpio.directions[&pins.mosi], Direction::Output);
    // The software engine never routes the pins to the SSP
    assert!(gpio.functions.is_empty());
}

#[test]
fn hardware_engine_loops_every_byte_back() {
    let pins = SspId::Ssp0.pins();
    let mut gpio = LoopbackGpio::new(pins);
    let mut spi = Transport::new(
        TransportKind::Hardware,
        &mut gpio,
        FakeSsp::new(SspId::Ssp0),
        pins,
        CORE_CLOCK,
    )
    .unwrap();
    spi.begin();
    exchange_all(&mut spi);

    let Transport::Hardware(hw) = spi else {
        panic!("expected the hardware engine");
    };
    let (ssp, _) = hw.free();
    assert_eq!(ssp.written(), (0..=255).collect::<Vec<u16>>());
    assert!(ssp.enabled());
    // 8 bit frames, mode 0, full speed: SCR 2 at CPSR 2 from a 50 MHz SSP clock
    assert_eq!(ssp.cr0, 0x07 | (2 << 8));
    assert_eq!(ssp.cpsr, 2);

    for pin in [pins.sck, pins.miso, pins.mosi] {
        assert_eq!(gpio.functions[&pin], PinFunction::alternate(2));
    }
    assert_eq!(gpio.directions[&pins.miso], Direction::Input);
}

#[test]
fn software_timing_follows_core_clock() {
    let pins = SspId::Ssp1.pins();
    for (core_clock, factor) in [(Hertz::MHz(120), 44), (Hertz::MHz(100), 38)] {
        let mut spi = Transport::new(
            TransportKind::Software,
            LoopbackGpio::new(pins),
            FakeSsp::new(SspId::Ssp1),
            pins,
            core_clock,
        )
        .unwrap();
        spi.begin();
        spi.init(SpeedIndex::SLOWEST);
        let Transport::Software(soft) = &spi else {
            panic!("expected the software engine");
        };
        assert_eq!(soft.factor(), factor);
        assert_eq!(spi.transfer_byte(0x81), 0x81);
    }
}

#[test]
fn hardware_engine_waits_while_busy() {
    let pins = SspId::Ssp0.pins();
    let mut spi = Transport::new(
        TransportKind::Hardware,
        LoopbackGpio::new(pins),
        FakeSsp::with_busy_polls(SspId::Ssp0, 3),
        pins,
        CORE_CLOCK,
    )
    .unwrap();
    spi.begin();
    for byte in [0x00, 0x5A, 0xFF] {
        assert_eq!(spi.transfer_byte(byte), byte);
    }

    let Transport::Hardware(hw) = &spi else {
        unreachable!();
    };
    assert_eq!(hw.inner().busy_reads(), 3 * 3);
    assert!(hw.inner().rx.is_empty());
}

#[test]
fn hardware_engine_rejects_foreign_pins() {
    let pins = SspId::Ssp1.pins();
    let result = Transport::new(
        TransportKind::Hardware,
        LoopbackGpio::new(pins),
        FakeSsp::new(SspId::Ssp0),
        pins,
        CORE_CLOCK,
    );
    assert!(matches!(result, Err(Error::InvalidPins)));
}

#[test]
fn hardware_speed_index_selects_scr() {
    let pins = SspId::Ssp1.pins();
    let mut spi = Transport::new(
        TransportKind::Hardware,
        LoopbackGpio::new(pins),
        FakeSsp::new(SspId::Ssp1),
        pins,
        CORE_CLOCK,
    )
    .unwrap();
    spi.begin();

    let expected = [2, 5, 11, 24, 49, 99, 199, 199];
    for (index, scr) in (0..=7u8).zip(expected) {
        spi.init(SpeedIndex::new(index));
        let Transport::Hardware(hw) = &spi else {
            unreachable!();
        };
        assert_eq!(hw.inner().scr(), scr, "speed index {index}");
        assert!(hw.inner().enabled());
    }
}

#[test]
fn send_block_sends_token_then_payload() {
    let pins = SspId::Ssp0.pins();
    let mut block = [0u8; BLOCK_SIZE];
    for (i, byte) in block.iter_mut().enumerate() {
        *byte = i as u8;
    }

    let mut gpio = LoopbackGpio::new(pins);
    {
        let mut spi = SoftSpi::new(&mut gpio, pins, Hertz::MHz(100));
        spi.begin();
        spi.init(SpeedIndex::FULL);
        spi.send_block(0xFE, &block);
    }
    assert_eq!(gpio.sent.len(), BLOCK_SIZE + 1);
    assert_eq!(gpio.sent[0], 0xFE);
    assert_eq!(&gpio.sent[1..], &block[..]);
}

#[test]
fn reads_clock_out_filler() {
    let pins = SspId::Ssp1.pins();
    let mut spi = Transport::new(
        TransportKind::Hardware,
        LoopbackGpio::new(pins),
        FakeSsp::new(SspId::Ssp1),
        pins,
        CORE_CLOCK,
    )
    .unwrap();
    spi.begin();

    let mut buf = [0u8; 4];
    spi.read_buffer(&mut buf);
    assert_eq!(buf, [0xFF; 4]);
    assert_eq!(spi.receive_byte(), 0xFF);

    let Transport::Hardware(hw) = spi else {
        unreachable!();
    };
    assert_eq!(hw.inner().written(), [0xFF; 5]);
}

#[test]
fn slow_software_speed_stretches_levels() {
    let pins = SspId::Ssp1.pins();

    let mut fast = LoopbackGpio::new(pins);
    let mut slow = LoopbackGpio::new(pins);
    for (gpio, speed) in [
        (&mut fast, SpeedIndex::FULL),
        (&mut slow, SpeedIndex::SLOWEST),
    ] {
        let mut spi = SoftSpi::new(&mut *gpio, pins, Hertz::MHz(100));
        spi.begin();
        spi.init(speed);
        assert_eq!(spi.transfer_byte(0xA5), 0xA5);
    }
    // 3 levels per bit, written once at full speed and 38 times at the slowest speed
    assert_eq!(fast.writes, 2 + 8 * 3);
    assert_eq!(slow.writes, 2 + 8 * 3 * 38);
}

#[test]
fn transaction_settings_leave_hardware_engine_alone() {
    let pins = SspId::Ssp0.pins();
    let mut spi = Transport::new(
        TransportKind::Hardware,
        LoopbackGpio::new(pins),
        FakeSsp::new(SspId::Ssp0),
        pins,
        CORE_CLOCK,
    )
    .unwrap();
    spi.begin();
    let Transport::Hardware(hw) = &spi else {
        unreachable!();
    };
    let before = hw.inner().events().len();

    spi.begin_transaction(SpiSettings::new(Hertz::MHz(1)));

    let Transport::Hardware(hw) = &spi else {
        unreachable!();
    };
    assert_eq!(hw.inner().events().len(), before);
}

#[test]
fn embedded_hal_bus() {
    let pins = SspId::Ssp1.pins();
    let mut gpio = LoopbackGpio::new(pins);
    let mut spi = SoftSpi::new(&mut gpio, pins, Hertz::MHz(100));
    spi.begin();
    spi.init(SpeedIndex::FULL);

    let mut read = [0u8; 4];
    SpiBus::transfer(&mut spi, &mut read, &[1, 2]).unwrap();
    assert_eq!(read, [1, 2, 0xFF, 0xFF]);

    let mut words = [9u8, 8, 7];
    SpiBus::transfer_in_place(&mut spi, &mut words).unwrap();
    assert_eq!(words, [9, 8, 7]);

    SpiBus::write(&mut spi, &[0x42]).unwrap();
    SpiBus::flush(&mut spi).unwrap();
    drop(spi);
    assert_eq!(gpio.sent, [1, 2, 0xFF, 0xFF, 9, 8, 7, 0x42]);
}
