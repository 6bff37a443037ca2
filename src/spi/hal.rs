use embedded_hal::spi::{Error as HalError, ErrorKind, ErrorType, SpiBus};

use super::{
    Error, HwSpi, Instance, SoftSpi, SpiController, SpiTransport, FILLER,
};
use crate::gpdma::DmaController;
use crate::gpio::PinControl;

impl HalError for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidModule(_) => ErrorKind::Other,
            Error::TooManyUnits { max: _ } => ErrorKind::Other,
            Error::InvalidPins => ErrorKind::Other,
            Error::InvalidDataMode(_) => ErrorKind::Other,
            Error::BufferTooBig { max_size: _ } => ErrorKind::Other,
            Error::BufferTooShort => ErrorKind::Other,
            Error::WordSizeMismatch => ErrorKind::Other,
        }
    }
}

/// Full-duplex exchange over `transfer_byte`. The shorter side is padded with the filler byte
/// on write and discarded on read.
fn exchange<T: SpiTransport + ?Sized>(spi: &mut T, read: &mut [u8], write: &[u8]) {
    let len = core::cmp::max(read.len(), write.len());
    for i in 0..len {
        let out = write.get(i).copied().unwrap_or(FILLER);
        let word = spi.transfer_byte(out);
        if let Some(slot) = read.get_mut(i) {
            *slot = word;
        }
    }
}

fn exchange_in_place<T: SpiTransport + ?Sized>(spi: &mut T, words: &mut [u8]) {
    for word in words.iter_mut() {
        *word = spi.transfer_byte(*word);
    }
}

macro_rules! spi_bus {
    ($($ty:ty => [$($bounds:tt)*]),+ $(,)?) => {
        $(
            impl<$($bounds)*> ErrorType for $ty {
                type Error = Error;
            }

            impl<$($bounds)*> SpiBus<u8> for $ty {
                fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
                    self.read_buffer(words);
                    Ok(())
                }

                fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
                    self.send_buffer(words);
                    Ok(())
                }

                fn transfer(
                    &mut self,
                    read: &mut [u8],
                    write: &[u8],
                ) -> Result<(), Self::Error> {
                    exchange(self, read, write);
                    Ok(())
                }

                fn transfer_in_place(
                    &mut self,
                    words: &mut [u8],
                ) -> Result<(), Self::Error> {
                    exchange_in_place(self, words);
                    Ok(())
                }

                fn flush(&mut self) -> Result<(), Self::Error> {
                    // Every byte is exchanged to completion before the call returns
                    Ok(())
                }
            }
        )+
    };
}

spi_bus! {
    SoftSpi<G> => [G: PinControl],
    HwSpi<SSP, G> => [SSP: Instance, G: PinControl],
    SpiController<SSP, DMA> => [SSP: Instance, DMA: DmaController],
}
