use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{Packet, PACKET_LENGTH};
use crate::{
    radio::{
        prelude::{LinkCommands, LinkFifo, SampleSource},
        CompletionSignal, Handshake, LinkError, RetryPolicy, Transceiver,
    },
    HandshakeState,
};

/// The transmitting end of the link.
///
/// Bytes are appended to a packet buffer; every time the buffer fills up it is
/// uploaded to the transceiver and transmitted, and the append call returns only
/// once the transmit-complete interrupt was taken through the
/// [`CompletionSignal`] (or the [`RetryPolicy`] ran out).
pub struct Sender<'s, SPI, DO, DELAY> {
    radio: Transceiver<SPI, DO, DELAY>,
    handshake: Handshake<'s>,
    policy: RetryPolicy,
    packet: Packet,
    cursor: usize,
}

impl<'s, SPI, DO, DELAY> Sender<'s, SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Wrap a transceiver that was put in [`Mode::Transmit`](value@crate::Mode::Transmit).
    ///
    /// The `signal` must be raised by the handler of the transceiver's IRQ pin.
    pub fn new(
        radio: Transceiver<SPI, DO, DELAY>,
        signal: &'s CompletionSignal,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            radio,
            handshake: Handshake::new(signal),
            policy,
            packet: [0u8; PACKET_LENGTH],
            cursor: 0,
        }
    }

    /// Give back the transceiver. Bytes not yet transmitted are dropped.
    pub fn release(self) -> Transceiver<SPI, DO, DELAY> {
        self.radio
    }

    pub fn radio(&mut self) -> &mut Transceiver<SPI, DO, DELAY> {
        &mut self.radio
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn state(&self) -> HandshakeState {
        self.handshake.state()
    }

    /// Bytes waiting in the current packet.
    pub fn pending(&self) -> usize {
        self.cursor
    }

    /// Transmissions started, each counted once however often it was re-submitted.
    pub fn started_transmissions(&self) -> u32 {
        self.handshake.armed()
    }

    /// Transmissions confirmed by the completion interrupt.
    pub fn completed_transmissions(&self) -> u32 {
        self.handshake.completed()
    }

    /// Append a byte; transmits the packet once it is full.
    pub fn append_byte(&mut self, byte: u8) -> Result<(), LinkError<SPI::Error, DO::Error>> {
        self.packet[self.cursor] = byte;
        self.cursor += 1;
        if self.cursor < PACKET_LENGTH {
            return Ok(());
        }
        self.cursor = 0;
        let packet = self.packet;
        self.transmit(&packet)
    }

    /// Append a 16-bit value, most significant byte first.
    pub fn append_u16(&mut self, value: u16) -> Result<(), LinkError<SPI::Error, DO::Error>> {
        for byte in value.to_be_bytes() {
            self.append_byte(byte)?;
        }
        Ok(())
    }

    /// Append a signed 16-bit value (two's complement), most significant byte first.
    pub fn append_i16(&mut self, value: i16) -> Result<(), LinkError<SPI::Error, DO::Error>> {
        self.append_u16(value as u16)
    }

    /// Append one sample of each of the first `channels` inputs of `source`.
    pub fn append_samples<S: SampleSource>(
        &mut self,
        source: &mut S,
        channels: u8,
    ) -> Result<(), LinkError<SPI::Error, DO::Error>> {
        for channel in 0..channels {
            let sample = source.sample_channel(channel);
            self.append_u16(sample)?;
        }
        Ok(())
    }

    /// Zero-pad and transmit a partially filled packet.
    ///
    /// Does nothing if no bytes are pending.
    pub fn flush(&mut self) -> Result<(), LinkError<SPI::Error, DO::Error>> {
        if self.cursor == 0 {
            return Ok(());
        }
        self.packet[self.cursor..].fill(0);
        self.cursor = 0;
        let packet = self.packet;
        self.transmit(&packet)
    }

    /// Transmit a complete packet, bypassing the append buffer.
    pub fn send_packet(&mut self, packet: &Packet) -> Result<(), LinkError<SPI::Error, DO::Error>> {
        self.transmit(packet)
    }

    fn transmit(&mut self, packet: &Packet) -> Result<(), LinkError<SPI::Error, DO::Error>> {
        let result = self.try_transmit(packet);
        if result.is_err() {
            self.handshake.abandon();
        }
        result
    }

    fn try_transmit(&mut self, packet: &Packet) -> Result<(), LinkError<SPI::Error, DO::Error>> {
        self.radio.wait_for_place_in_tx_fifo(&self.policy)?;
        self.handshake.arm();
        self.radio.upload_payload(packet)?;
        self.radio.pulse_ce()?;
        if self.await_completion() {
            return self.radio.clear_irq();
        }

        for _attempt in 1..=self.policy.max_retries() {
            #[cfg(all(feature = "defmt", target_os = "none"))]
            defmt::warn!("no completion interrupt; re-submitting ({=u8})", _attempt);

            // The payload never left (or its interrupt got lost). The IRQ flags
            // must be cleared so the next completion drives a new falling edge.
            self.radio.flush_tx()?;
            self.radio.clear_irq()?;
            self.handshake.arm();
            self.radio.upload_payload(packet)?;
            self.radio.pulse_ce()?;
            if self.await_completion() {
                return self.radio.clear_irq();
            }
        }

        #[cfg(all(feature = "defmt", target_os = "none"))]
        defmt::warn!("transmission abandoned");
        self.radio.flush_tx()?;
        self.radio.clear_irq()?;
        Err(LinkError::LinkTimeout)
    }

    fn await_completion(&mut self) -> bool {
        for _ in 0..self.policy.poll_limit() {
            if self.handshake.poll() {
                return true;
            }
            self.radio.delay_us(self.policy.poll_interval_us());
        }
        false
    }
}
