//! Framing of the byte stream forwarded to the host over a serial line.
//!
//! Data is cut into frames of [`ReportConfig::data_length()`] bytes:
//!
//! ```text
//! sync_byte | channels | message_length | data_length | data[data_length] | check_byte
//! ```
//!
//! The host resynchronizes on `sync_byte` and drops any frame whose trailing
//! byte is not `check_byte`.

use crate::{packet::Packet, radio::prelude::ByteSink};

/// The frame header and trailer values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    sync_byte: u8,
    channels: u8,
    message_length: u8,
    data_length: u8,
    check_byte: u8,
}

impl Default for ReportConfig {
    /// | feature | default value |
    /// |--------:|:--------------|
    /// | [`ReportConfig::sync_byte()`] | `b'\n'` |
    /// | [`ReportConfig::channels()`] | `2` |
    /// | [`ReportConfig::message_length()`] | `2` |
    /// | [`ReportConfig::data_length()`] | `64` |
    /// | [`ReportConfig::check_byte()`] | `0xFF` |
    fn default() -> Self {
        Self {
            sync_byte: b'\n',
            channels: 2,
            message_length: 2,
            data_length: 64,
            check_byte: 0xFF,
        }
    }
}

impl ReportConfig {
    pub const fn sync_byte(&self) -> u8 {
        self.sync_byte
    }

    pub fn with_sync_byte(self, value: u8) -> Self {
        Self {
            sync_byte: value,
            ..self
        }
    }

    /// The number of interleaved input channels in the data.
    pub const fn channels(&self) -> u8 {
        self.channels
    }

    pub fn with_channels(self, value: u8) -> Self {
        Self {
            channels: value,
            ..self
        }
    }

    /// The number of bytes per sample.
    pub const fn message_length(&self) -> u8 {
        self.message_length
    }

    pub fn with_message_length(self, value: u8) -> Self {
        Self {
            message_length: value,
            ..self
        }
    }

    /// The number of data bytes per frame.
    pub const fn data_length(&self) -> u8 {
        self.data_length
    }

    /// This value is clamped to a minimum of `1`.
    pub fn with_data_length(self, value: u8) -> Self {
        Self {
            data_length: value.max(1),
            ..self
        }
    }

    pub const fn check_byte(&self) -> u8 {
        self.check_byte
    }

    pub fn with_check_byte(self, value: u8) -> Self {
        Self {
            check_byte: value,
            ..self
        }
    }
}

/// Writes data bytes to a [`ByteSink`], framing them per [`ReportConfig`].
pub struct ReportFramer<S> {
    sink: S,
    config: ReportConfig,
    position: u8,
}

impl<S: ByteSink> ReportFramer<S> {
    pub fn new(sink: S, config: ReportConfig) -> Self {
        Self {
            sink,
            config,
            position: 0,
        }
    }

    pub fn release(self) -> S {
        self.sink
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Data bytes already written into the current frame.
    pub fn position(&self) -> u8 {
        self.position
    }

    fn write_header(&mut self) -> Result<(), S::SinkErrorType> {
        for byte in [
            self.config.sync_byte,
            self.config.channels,
            self.config.message_length,
            self.config.data_length,
        ] {
            self.sink.emit_byte(byte)?;
        }
        Ok(())
    }

    /// Write one data byte, opening and closing frames as needed.
    pub fn write_byte(&mut self, byte: u8) -> Result<(), S::SinkErrorType> {
        if self.position == 0 {
            self.write_header()?;
        }
        self.sink.emit_byte(byte)?;
        self.position += 1;
        if self.position >= self.config.data_length {
            self.position = 0;
            self.sink.emit_byte(self.config.check_byte)?;
        }
        Ok(())
    }

    /// Write a 16-bit value, most significant byte first.
    pub fn write_u16(&mut self, value: u16) -> Result<(), S::SinkErrorType> {
        for byte in value.to_be_bytes() {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Write every byte of a received packet.
    pub fn write_packet(&mut self, packet: &Packet) -> Result<(), S::SinkErrorType> {
        for byte in packet {
            self.write_byte(*byte)?;
        }
        Ok(())
    }
}
