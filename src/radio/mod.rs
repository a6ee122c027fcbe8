//! A module to encapsulate all things related to radio operation.
pub mod prelude;

mod nrf24;
pub use nrf24::{
    commands, mnemonics, registers, Command, Config, LinkError, RegisterValue, RfSetup, Transceiver,
};

mod config;
pub use config::{LinkConfig, RegisterTable, RegisterWrite, RetryPolicy, REGISTER_TABLE_LEN};

mod handshake;
pub use handshake::{CompletionSignal, Handshake};
