use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
mod bit_fields;
pub use bit_fields::{Config, RegisterValue, RfSetup};
mod command;
pub use command::Command;
mod constants;
pub use constants::{commands, mnemonics, registers};
mod details;
mod fifo;
mod mode;

use super::LinkConfig;
use crate::{packet::PACKET_LENGTH, Mode, StatusFlags};

/// An collection of error types to describe hardware malfunctions
/// and link failures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LinkError<SPI, DO> {
    /// Represents a SPI transaction error.
    Spi(SPI),
    /// Represents a DigitalOutput error.
    Gpo(DO),
    /// The completion interrupt never arrived, not even after
    /// re-submitting the payload [`RetryPolicy::max_retries()`](fn@crate::radio::RetryPolicy::max_retries) times.
    LinkTimeout,
    /// The TX FIFO stayed full for the whole poll budget.
    FifoTimeout,
    /// The payload width register does not hold
    /// [`PACKET_LENGTH`](value@crate::packet::PACKET_LENGTH).
    ///
    /// Both ends of the link must agree on the packet length,
    /// so this is an integration error rather than a runtime condition.
    ConfigMismatch,
}

/// The command driver for one nRF24L01 transceiver.
///
/// This struct implements the [`Link*` traits](mod@crate::radio::prelude).
pub struct Transceiver<SPI, DO, DELAY> {
    /// The CE pin for the radio.
    ///
    /// Pulsing this pin starts the transmission of an uploaded payload;
    /// holding it high keeps a receiver listening.
    pub ce_pin: DO,
    _spi: SPI,
    _delay_impl: DELAY,
    _buf: [u8; PACKET_LENGTH + 1],
    _status: StatusFlags,
    _config: LinkConfig,
    _mode: Option<Mode>,
}

impl<SPI, DO, DELAY> Transceiver<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Instantiate a [`Transceiver`] object for use on the specified
    /// `spi` bus with the given `ce_pin`.
    ///
    /// The radio's CSN pin (aka Chip Select pin) shall be defined
    /// when instantiating the [`SpiDevice`](trait@embedded_hal::spi::SpiDevice)
    /// object (passed to the `spi` parameter).
    /// Nothing is written to the radio until
    /// [`LinkMode::configure()`](fn@crate::radio::prelude::LinkMode::configure) is called.
    pub fn new(ce_pin: DO, spi: SPI, delay_impl: DELAY, config: LinkConfig) -> Self {
        Transceiver {
            ce_pin,
            _spi: spi,
            _delay_impl: delay_impl,
            _buf: [0u8; PACKET_LENGTH + 1],
            _status: StatusFlags::from_bits(0),
            _config: config,
            _mode: None,
        }
    }

    /// Give back the hardware handed to [`Transceiver::new()`].
    pub fn release(self) -> (DO, SPI, DELAY) {
        (self.ce_pin, self._spi, self._delay_impl)
    }

    /// The configuration used to build the register tables.
    pub fn config(&self) -> &LinkConfig {
        &self._config
    }

    /// The STATUS byte cached from the latest bus transaction.
    pub fn status_flags(&self) -> StatusFlags {
        self._status
    }

    /// Pulse the CE pin to start transmitting the payload at the head of the TX FIFO.
    ///
    /// CE stays high for [`LinkConfig::ce_pulse_us()`] (at least 10 microseconds).
    pub fn pulse_ce(&mut self) -> Result<(), LinkError<SPI::Error, DO::Error>> {
        self.ce_pin.set_high().map_err(LinkError::Gpo)?;
        self._delay_impl.delay_us(self._config.ce_pulse_us());
        self.ce_pin.set_low().map_err(LinkError::Gpo)
    }

    pub(crate) fn delay_us(&mut self, us: u32) {
        self._delay_impl.delay_us(us);
    }

    /// Shift `len` bytes of the internal buffer through the bus in one transaction.
    fn spi_transfer(&mut self, len: usize) -> Result<(), LinkError<SPI::Error, DO::Error>> {
        debug_assert!(
            len <= self._buf.len(),
            "command exceeds the transfer buffer"
        );
        self._spi
            .transfer_in_place(&mut self._buf[..len])
            .map_err(LinkError::Spi)?;
        self._status = StatusFlags::from_bits(self._buf[0]);
        Ok(())
    }
}
