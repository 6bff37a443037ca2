//! SPI transport for LPC176x microcontrollers.
//!
//! Two interchangeable engines drive the bus: a software bit-banged engine for boards where the
//! SSP pins are shared with peripherals that need plain GPIO access, and the SSP hardware block
//! with optional GPDMA transmit bursts. Both are reached through the
//! [`SpiTransport`](spi::SpiTransport) capability set and can be chosen at startup through
//! [`Transport`](spi::Transport).
//!
//! The crate does not touch memory-mapped registers itself. Pin configuration, SSP registers and
//! the GPDMA controller are reached through the [`gpio::PinControl`], [`spi::Instance`] and
//! [`gpdma::DmaController`] traits, so the drivers run unchanged against a PAC-backed
//! implementation on the target or against an in-memory fake on the host.
#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
mod macros;

pub mod gpdma;
pub mod gpio;
pub mod prelude;
pub mod spi;
pub mod time;

mod sealed {
    pub trait Sealed {}
}

pub(crate) use sealed::Sealed;
