//! A point-to-point sample link over a pair of nRF24L01(+) transceivers.
//!
//! One node packetizes 16-bit samples and transmits them; the other node
//! receives the packets and forwards them, framed, to a host over a serial line.
//! Every packet is [`PACKET_LENGTH`] bytes; auto-ACK is disabled, so the sender
//! learns about a finished transmission only through the transceiver's
//! "TX Data Sent" interrupt.
//!
//! ## Transceiver API
//!
//! - [`Transceiver::new()`](fn@crate::radio::Transceiver::new)
//! - [`LinkMode::enter_tx_mode()`](fn@crate::radio::prelude::LinkMode::enter_tx_mode)
//! - [`LinkMode::enter_rx_mode()`](fn@crate::radio::prelude::LinkMode::enter_rx_mode)
//! - [`LinkMode::configure()`](fn@crate::radio::prelude::LinkMode::configure)
//! - [`LinkMode::query_register_table()`](fn@crate::radio::prelude::LinkMode::query_register_table)
//! - [`LinkCommands`](trait@crate::radio::prelude::LinkCommands)
//! - [`LinkFifo`](trait@crate::radio::prelude::LinkFifo)
//! - [`LinkDetails::print_details()`](fn@crate::radio::prelude::LinkDetails::print_details)
//!
//! ## Link API
//!
//! - [`Sender::append_byte()`](fn@crate::packet::Sender::append_byte)
//! - [`Sender::append_u16()`](fn@crate::packet::Sender::append_u16)
//! - [`Sender::append_samples()`](fn@crate::packet::Sender::append_samples)
//! - [`Sender::flush()`](fn@crate::packet::Sender::flush)
//! - [`Sender::send_packet()`](fn@crate::packet::Sender::send_packet)
//! - [`Receiver::receive_packet()`](fn@crate::packet::Receiver::receive_packet)
//! - [`Receiver::poll()`](fn@crate::packet::Receiver::poll)
//! - [`ReportFramer::write_packet()`](fn@crate::report::ReportFramer::write_packet)
//!
//! ## Completion interrupt
//!
//! The transmitting node must forward the falling edge of the transceiver's
//! IRQ pin to a [`CompletionSignal`](struct@crate::radio::CompletionSignal)
//! that outlives the [`Sender`](struct@crate::packet::Sender):
//!
//! ```
//! use nrf_link::radio::CompletionSignal;
//!
//! static TX_COMPLETE: CompletionSignal = CompletionSignal::new();
//!
//! // in the pin interrupt handler
//! fn on_irq_falling_edge() {
//!     TX_COMPLETE.signal();
//! }
//! # on_irq_falling_edge();
//! # assert!(TX_COMPLETE.take());
//! ```
//!
//! The handler only raises the signal. Reading and clearing the transceiver's
//! flags is left to the main loop.
#![no_std]

mod types;
pub use types::{CrcLength, DataRate, FifoStatus, HandshakeState, Mode, PaLevel, StatusFlags};
pub mod packet;
pub use packet::{Packet, PACKET_LENGTH};
pub mod radio;
pub mod report;

#[cfg(test)]
mod sim;
