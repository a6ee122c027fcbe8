//! This module defines the generic traits that may
//! need to imported to use the link implementation.
//!
//! Since rustc only compiles objects that are used,
//! it is convenient to import these traits with the `*` syntax.
//!
//! ```
//! use nrf_link::radio::prelude::*;
//! ```

use crate::{
    packet::Packet,
    types::{FifoStatus, Mode, StatusFlags},
};

use super::{RegisterTable, RetryPolicy};

/// The fixed command set of the transceiver.
///
/// Every command is a single bus transaction: chip-select is asserted,
/// the opcode byte is shifted in (while the STATUS byte is shifted out),
/// the command's data bytes follow, and chip-select is released only once
/// the bus is idle again.
pub trait LinkCommands {
    type CommandErrorType;

    /// Read `buf.len()` bytes from the register at `address`.
    ///
    /// The `address` is masked to the valid register range (5 bits).
    fn read_register(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::CommandErrorType>;

    /// Write `data` to the register at `address`.
    ///
    /// The `address` is masked to the valid register range (5 bits)
    /// and combined with the write bit.
    fn write_register(&mut self, address: u8, data: &[u8]) -> Result<(), Self::CommandErrorType>;

    /// Put a full packet into the TX FIFO.
    ///
    /// This transaction is time-critical; it runs with interrupts disabled.
    fn upload_payload(&mut self, packet: &Packet) -> Result<(), Self::CommandErrorType>;

    /// Fetch the packet at the head of the RX FIFO.
    ///
    /// If the RX FIFO is empty, the transceiver clocks out the last packet again.
    fn download_payload(&mut self, packet: &mut Packet) -> Result<(), Self::CommandErrorType>;

    /// Discard all 3 levels of the TX FIFO.
    fn flush_tx(&mut self) -> Result<(), Self::CommandErrorType>;

    /// Discard all 3 levels of the RX FIFO.
    fn flush_rx(&mut self) -> Result<(), Self::CommandErrorType>;

    /// A no-op command; returns the STATUS byte.
    fn nop(&mut self) -> Result<StatusFlags, Self::CommandErrorType>;

    /// Read the FIFO_STATUS register.
    fn fifo_status(&mut self) -> Result<FifoStatus, Self::CommandErrorType>;

    /// Clear all IRQ flags in the STATUS register.
    ///
    /// This releases the transceiver's (active low) IRQ line so the
    /// next event produces a new falling edge.
    fn clear_irq(&mut self) -> Result<(), Self::CommandErrorType>;

    /// Width of the payload at the head of the RX FIFO.
    fn read_rx_payload_length(&mut self) -> Result<u8, Self::CommandErrorType>;
}

/// A trait to represent the startup configuration of the transceiver.
pub trait LinkMode {
    type ModeErrorType;

    /// Drive CE low, wait for the transceiver to settle and clear stale IRQ flags.
    fn init(&mut self) -> Result<(), Self::ModeErrorType>;

    /// Write the register table of the given `mode`.
    ///
    /// CONFIG is written first (it gates the power-up), followed by the
    /// power-up settle delay and then the remaining registers.
    /// The payload width is read back afterwards; a mismatch with
    /// [`PACKET_LENGTH`](value@crate::packet::PACKET_LENGTH) is reported
    /// as a configuration error.
    fn configure(&mut self, mode: Mode) -> Result<(), Self::ModeErrorType>;

    /// Initialize the transceiver as primary transmitter (CE left low).
    fn enter_tx_mode(&mut self) -> Result<(), Self::ModeErrorType>;

    /// Initialize the transceiver as primary receiver and start listening (CE high).
    fn enter_rx_mode(&mut self) -> Result<(), Self::ModeErrorType>;

    /// Read back every register of the table used for `mode`.
    fn query_register_table(&mut self, mode: Mode) -> Result<RegisterTable, Self::ModeErrorType>;

    /// The mode set by the last successful [`LinkMode::configure()`], if any.
    fn mode(&self) -> Option<Mode>;
}

/// A trait to represent flow control over the transceiver's FIFOs.
pub trait LinkFifo {
    type FifoErrorType;

    /// Block until the TX FIFO has room for another payload.
    ///
    /// Gives up after [`RetryPolicy::poll_limit()`] polls.
    fn wait_for_place_in_tx_fifo(
        &mut self,
        policy: &RetryPolicy,
    ) -> Result<(), Self::FifoErrorType>;

    /// Block until the TX FIFO is empty.
    ///
    /// Gives up after [`RetryPolicy::poll_limit()`] polls.
    fn wait_for_empty_tx_fifo(&mut self, policy: &RetryPolicy) -> Result<(), Self::FifoErrorType>;

    /// Is there a received payload in the RX FIFO?
    fn available(&mut self) -> Result<bool, Self::FifoErrorType>;
}

/// A trait to represent debug output of the transceiver's registers.
pub trait LinkDetails {
    type DetailsErrorType;

    /// Print the live register values.
    ///
    /// Requires the `defmt` feature (on bare metal) or the `std` feature,
    /// otherwise this does nothing.
    fn print_details(&mut self) -> Result<(), Self::DetailsErrorType>;
}

/// The analog sampler feeding the send path.
pub trait SampleSource {
    /// Acquire one 16-bit sample from the given `channel`.
    fn sample_channel(&mut self, channel: u8) -> u16;
}

/// The host-facing serial line.
pub trait ByteSink {
    type SinkErrorType;

    /// Emit a single byte.
    fn emit_byte(&mut self, byte: u8) -> Result<(), Self::SinkErrorType>;
}
