use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{Packet, PACKET_LENGTH};
use crate::radio::{
    prelude::{LinkCommands, LinkFifo},
    LinkError, Transceiver,
};

/// The receiving end of the link.
///
/// Holds no state across calls: every [`Receiver::receive_packet()`] reads exactly
/// one packet out of the transceiver and releases its IRQ line.
pub struct Receiver<SPI, DO, DELAY> {
    radio: Transceiver<SPI, DO, DELAY>,
    received: u32,
}

impl<SPI, DO, DELAY> Receiver<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Wrap a transceiver that was put in [`Mode::Receive`](value@crate::Mode::Receive).
    pub fn new(radio: Transceiver<SPI, DO, DELAY>) -> Self {
        Self { radio, received: 0 }
    }

    pub fn release(self) -> Transceiver<SPI, DO, DELAY> {
        self.radio
    }

    pub fn radio(&mut self) -> &mut Transceiver<SPI, DO, DELAY> {
        &mut self.radio
    }

    /// The number of packets read so far.
    pub fn received(&self) -> u32 {
        self.received
    }

    /// Download the packet at the head of the RX FIFO and clear the IRQ flags.
    ///
    /// Nothing checks that a packet is actually waiting: with an empty RX FIFO
    /// the transceiver clocks out the previously received packet again.
    /// Use [`Receiver::poll()`] to avoid that.
    pub fn receive_packet(&mut self) -> Result<Packet, LinkError<SPI::Error, DO::Error>> {
        let mut packet = [0u8; PACKET_LENGTH];
        self.radio.download_payload(&mut packet)?;
        self.radio.clear_irq()?;
        self.received = self.received.wrapping_add(1);
        Ok(packet)
    }

    /// Is a packet waiting in the RX FIFO?
    pub fn available(&mut self) -> Result<bool, LinkError<SPI::Error, DO::Error>> {
        self.radio.available()
    }

    /// Receive a packet only if one is waiting.
    pub fn poll(&mut self) -> Result<Option<Packet>, LinkError<SPI::Error, DO::Error>> {
        if !self.available()? {
            return Ok(None);
        }
        self.receive_packet().map(Some)
    }
}
