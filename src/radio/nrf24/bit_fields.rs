use bitfield_struct::bitfield;

use crate::{CrcLength, DataRate, FifoStatus, Mode, PaLevel, StatusFlags};

use super::{mnemonics, registers};

/// A single-byte transceiver register held as a typed value.
///
/// All bit manipulation goes through [`RegisterValue::set()`],
/// [`RegisterValue::clear()`] and [`RegisterValue::overwrite()`] on explicit
/// masks, so the value written to the bus is always the full register.
pub trait RegisterValue: Copy {
    /// The register's address on the transceiver.
    const ADDRESS: u8;

    fn raw(self) -> u8;

    fn from_raw(bits: u8) -> Self;

    /// Assert all bits in `mask`.
    fn set(self, mask: u8) -> Self {
        Self::from_raw(self.raw() | mask)
    }

    /// Deassert all bits in `mask`.
    fn clear(self, mask: u8) -> Self {
        Self::from_raw(self.raw() & !mask)
    }

    /// Replace the bits in `mask` with the corresponding bits of `value`.
    fn overwrite(self, mask: u8, value: u8) -> Self {
        Self::from_raw(self.raw() & !mask | (value & mask))
    }
}

macro_rules! register_value {
    ($reg:ty, $address:expr) => {
        impl RegisterValue for $reg {
            const ADDRESS: u8 = $address;

            fn raw(self) -> u8 {
                self.into_bits()
            }

            fn from_raw(bits: u8) -> Self {
                Self::from_bits(bits)
            }
        }
    };
}

#[bitfield(u8, order = Msb)]
#[derive(PartialEq, Eq)]
pub struct Config {
    #[bits(1)]
    _padding: u8,

    /// Keep the "RX Data Ready" event off the IRQ pin.
    pub mask_rx_dr: bool,

    /// Keep the "TX Data Sent" event off the IRQ pin.
    pub mask_tx_ds: bool,

    /// Keep the "TX Data Failed" event off the IRQ pin.
    pub mask_max_rt: bool,

    #[bits(2, access = None)]
    crc_length: u8,

    pub power: bool,

    pub is_rx: bool,
}

register_value!(Config, registers::CONFIG);

impl Config {
    pub fn crc_length(&self) -> CrcLength {
        CrcLength::from_bits(self.into_bits() & CrcLength::MASK)
    }

    pub fn with_crc_length(self, length: CrcLength) -> Self {
        self.overwrite(CrcLength::MASK, length.into_bits())
    }

    pub fn as_rx(self) -> Self {
        self.set(mnemonics::PRIM_RX)
    }

    pub fn as_tx(self) -> Self {
        self.clear(mnemonics::PRIM_RX)
    }

    /// The CONFIG value for `mode`; only PRIM_RX depends on the mode.
    pub fn for_mode(self, mode: Mode) -> Self {
        match mode {
            Mode::Transmit => self.as_tx(),
            Mode::Receive => self.as_rx(),
        }
    }
}

#[bitfield(u8, order = Msb)]
#[derive(PartialEq, Eq)]
pub struct RfSetup {
    pub cont_wave: bool,

    #[bits(1)]
    _padding: u8,

    #[bits(5, access = None)]
    rf: u8,

    /// Obsolete on the nRF24L01+, drives LNA gain on older variants and clones.
    pub lna_enable: bool,
}

register_value!(RfSetup, registers::RF_SETUP);

impl RfSetup {
    pub fn data_rate(&self) -> DataRate {
        DataRate::from_bits(self.into_bits() & DataRate::MASK)
    }

    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        self.overwrite(DataRate::MASK, data_rate.into_bits())
    }

    pub fn pa_level(&self) -> PaLevel {
        PaLevel::from_bits(self.into_bits() & PaLevel::MASK)
    }

    pub fn with_pa_level(self, level: PaLevel) -> Self {
        self.overwrite(PaLevel::MASK, level.into_bits())
    }
}

register_value!(FifoStatus, registers::FIFO_STATUS);
register_value!(StatusFlags, registers::STATUS);
