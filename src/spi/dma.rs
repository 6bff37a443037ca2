//! GPDMA transmit bursts.
//!
//! The GPDMA has no way to repeat one source element without incrementing, so a non-incrementing
//! burst is issued as one single-element channel operation per element, each reading the same
//! source word.

use core::sync::atomic::{fence, Ordering};

use crate::gpdma::{
    ChannelConfig, DmaController, IntFlag, TransferWidth, MAX_TRANSFER_SIZE,
};

use super::ssp_def;
use super::{DataSize, Error, Instance, SpiController, Word};

/// Channel used for transmit bursts
pub const DMA_CHANNEL: u8 = 0;

impl DataSize {
    /// GPDMA element width matching this frame size
    pub const fn dma_width(self) -> TransferWidth {
        match self {
            DataSize::Bits8 => TransferWidth::Byte,
            DataSize::Bits16 => TransferWidth::HalfWord,
        }
    }
}

impl<SSP: Instance, DMA: DmaController> SpiController<SSP, DMA> {
    /// Send `length` words to the active unit through GPDMA channel 0 and wait until they have
    /// left the shift register.
    ///
    /// With `increment_source` the first `length` words of `buffer` are sent in one channel
    /// operation. Without it, `buffer[0]` is sent `length` times.
    ///
    /// The element width follows the unit's data size, so `W` must match it. A DMA error does
    /// not end the burst early and is not reported in the result.
    ///
    /// Errors:
    /// * [`Error::WordSizeMismatch`] when `W` does not match the data size
    /// * [`Error::BufferTooBig`] when an incrementing burst exceeds the GPDMA transfer size
    /// * [`Error::BufferTooShort`] when `buffer` holds fewer words than the burst reads
    pub fn dma_send<W: Word>(
        &mut self,
        buffer: &[W],
        length: u16,
        increment_source: bool,
    ) -> Result<(), Error> {
        let data_size = self.current().data_size;
        if W::SIZE != data_size {
            return Err(Error::WordSizeMismatch);
        }
        if length == 0 {
            return Ok(());
        }

        let needed = if increment_source {
            if usize::from(length) > MAX_TRANSFER_SIZE {
                return Err(Error::BufferTooBig {
                    max_size: MAX_TRANSFER_SIZE,
                });
            }
            usize::from(length)
        } else {
            1
        };
        if buffer.len() < needed {
            return Err(Error::BufferTooShort);
        }

        let id = self.current().ssp.id();
        let mut config = ChannelConfig::memory_to_peripheral(
            DMA_CHANNEL,
            buffer.as_ptr() as u32,
            if increment_source { length } else { 1 },
            data_size.dma_width(),
            id.tx_dma_request(),
        );
        config.src_increment = increment_source;

        let operations = if increment_source { 1 } else { length };
        trace!(
            "ssp {:?} dma: {} words in {} operations",
            id,
            length,
            operations
        );

        ssp_def::set_tx_dma(self.ssp_mut(), true);

        for _ in 0..operations {
            self.dma.setup(&config);

            // Buffer writes must land before the channel starts reading
            fence(Ordering::SeqCst);
            self.dma.set_channel_enabled(DMA_CHANNEL, true);

            let mut failed = false;
            loop {
                if self.dma.int_status(IntFlag::TerminalCount, DMA_CHANNEL) {
                    break;
                }
                if self.dma.int_status(IntFlag::Error, DMA_CHANNEL) {
                    failed = true;
                    break;
                }
                core::hint::spin_loop();
            }
            if failed {
                warn!("ssp {:?} dma: channel error", id);
            }

            self.dma.clear_int_pending(IntFlag::TerminalCount, DMA_CHANNEL);
            self.dma.clear_int_pending(IntFlag::Error, DMA_CHANNEL);
            self.dma.set_channel_enabled(DMA_CHANNEL, false);
            fence(Ordering::SeqCst);
        }

        let ssp = self.ssp_mut();
        ssp_def::wait_tx_end(&*ssp);
        ssp_def::set_tx_dma(ssp, false);
        Ok(())
    }
}
