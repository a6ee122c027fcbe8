use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{LinkError, Transceiver};
use crate::radio::{
    prelude::{LinkCommands, LinkFifo},
    RetryPolicy,
};
use crate::FifoStatus;

impl<SPI, DO, DELAY> Transceiver<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Poll FIFO_STATUS until `ready` holds, at most [`RetryPolicy::poll_limit()`] times.
    fn wait_for_fifo(
        &mut self,
        policy: &RetryPolicy,
        ready: fn(&FifoStatus) -> bool,
    ) -> Result<(), LinkError<SPI::Error, DO::Error>> {
        for _ in 0..policy.poll_limit() {
            if ready(&self.fifo_status()?) {
                return Ok(());
            }
            self.delay_us(policy.poll_interval_us());
        }
        #[cfg(all(feature = "defmt", target_os = "none"))]
        defmt::warn!("gave up waiting on the TX FIFO");
        Err(LinkError::FifoTimeout)
    }
}

impl<SPI, DO, DELAY> LinkFifo for Transceiver<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type FifoErrorType = LinkError<SPI::Error, DO::Error>;

    fn wait_for_place_in_tx_fifo(
        &mut self,
        policy: &RetryPolicy,
    ) -> Result<(), Self::FifoErrorType> {
        self.wait_for_fifo(policy, |fifo| !fifo.tx_full())
    }

    fn wait_for_empty_tx_fifo(&mut self, policy: &RetryPolicy) -> Result<(), Self::FifoErrorType> {
        self.wait_for_fifo(policy, FifoStatus::tx_empty)
    }

    fn available(&mut self) -> Result<bool, Self::FifoErrorType> {
        Ok(!self.fifo_status()?.rx_empty())
    }
}
