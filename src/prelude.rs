//! Prelude

pub use crate::spi::SpiTransport as _lpc176x_spi_SpiTransport;
pub use crate::time::U32Ext as _lpc176x_spi_time_U32Ext;

pub use fugit::{ExtU32 as _, RateExtU32 as _};
