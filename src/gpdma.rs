//! The GPDMA is the general purpose DMA engine of the LPC176x. It has 8 channels, each of which
//! can move data memory-to-memory, memory-to-peripheral, peripheral-to-memory or
//! peripheral-to-peripheral. A peripheral is attached to a channel through its request
//! connection number (see UM10360 Table 543).
//!
//! This module only describes the controller. The register work is left to the application,
//! which implements [`DmaController`] on top of its PAC. The SPI driver uses it for
//! transmit-only bursts, see [`SpiController::dma_send`](crate::spi::SpiController::dma_send).
//!
//! # Usage
//! A transfer is described by a [`ChannelConfig`]. Starting it is a three step affair:
//! ```
//! use lpc176x_spi::gpdma::{ChannelConfig, Connection, DmaController, TransferWidth, IntFlag};
//!
//! fn send<D: DmaController>(dma: &mut D, bytes: &[u8]) {
//!     let config = ChannelConfig::memory_to_peripheral(
//!         0,
//!         bytes.as_ptr() as u32,
//!         bytes.len() as u16,
//!         TransferWidth::Byte,
//!         Connection::Ssp1Tx,
//!     );
//!     dma.setup(&config);
//!     dma.set_channel_enabled(0, true);
//!     while !dma.int_status(IntFlag::TerminalCount, 0) {}
//!     dma.clear_int_pending(IntFlag::TerminalCount, 0);
//!     dma.set_channel_enabled(0, false);
//! }
//! ```

/// Largest number of elements a single channel operation can move (the 12 bit `TransferSize`
/// field of `DMACCxControl`).
pub const MAX_TRANSFER_SIZE: usize = 0xFFF;

/// Width of one element on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferWidth {
    Byte,
    HalfWord,
}

/// Peripheral request connections used by this crate. The discriminant is the request line
/// number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Connection {
    Ssp0Tx = 0,
    Ssp1Tx = 2,
}

/// Channel interrupt status flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntFlag {
    /// Terminal count: the channel finished its transfer
    TerminalCount,
    /// The channel hit a bus error
    Error,
}

/// Setup for one single-block memory to peripheral channel operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    pub channel: u8,
    pub src_addr: u32,
    /// Number of elements, at most [`MAX_TRANSFER_SIZE`]
    pub transfer_size: u16,
    pub width: TransferWidth,
    /// Increment the source address after each element
    pub src_increment: bool,
    /// Request line of the destination peripheral
    pub dst_conn: Connection,
}

impl ChannelConfig {
    /// A memory to peripheral transfer with source increment
    pub const fn memory_to_peripheral(
        channel: u8,
        src_addr: u32,
        transfer_size: u16,
        width: TransferWidth,
        dst_conn: Connection,
    ) -> Self {
        Self {
            channel,
            src_addr,
            transfer_size,
            width,
            src_increment: true,
            dst_conn,
        }
    }
}

/// Register level access to the GPDMA controller
pub trait DmaController {
    /// Power up and reset the controller
    fn init(&mut self);

    /// Program a channel. The channel must be disabled
    fn setup(&mut self, config: &ChannelConfig);

    fn set_channel_enabled(&mut self, channel: u8, enabled: bool);

    /// Whether `flag` is pending for `channel`
    fn int_status(&self, flag: IntFlag, channel: u8) -> bool;

    fn clear_int_pending(&mut self, flag: IntFlag, channel: u8);
}

impl<D: DmaController + ?Sized> DmaController for &mut D {
    fn init(&mut self) {
        (**self).init()
    }

    fn setup(&mut self, config: &ChannelConfig) {
        (**self).setup(config)
    }

    fn set_channel_enabled(&mut self, channel: u8, enabled: bool) {
        (**self).set_channel_enabled(channel, enabled)
    }

    fn int_status(&self, flag: IntFlag, channel: u8) -> bool {
        (**self).int_status(flag, channel)
    }

    fn clear_int_pending(&mut self, flag: IntFlag, channel: u8) {
        (**self).clear_int_pending(flag, channel)
    }
}
