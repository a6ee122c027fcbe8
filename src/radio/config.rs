use crate::radio::nrf24::{registers, Config, RegisterValue, RfSetup};
use crate::{packet::PACKET_LENGTH, CrcLength, DataRate, Mode, PaLevel};

/// Bounds for every busy-wait on the send path.
///
/// No wait in this crate is unbounded: a FIFO wait gives up after
/// [`RetryPolicy::poll_limit()`] polls and a transmission is re-submitted at most
/// [`RetryPolicy::max_retries()`] times before reporting
/// [`LinkError::LinkTimeout`](value@crate::radio::LinkError::LinkTimeout).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    poll_interval_us: u32,
    poll_limit: u32,
    max_retries: u8,
}

impl Default for RetryPolicy {
    /// | feature | default value |
    /// |--------:|:--------------|
    /// | [`RetryPolicy::poll_interval_us()`] | `10` |
    /// | [`RetryPolicy::poll_limit()`] | `1000` |
    /// | [`RetryPolicy::max_retries()`] | `3` |
    fn default() -> Self {
        Self {
            poll_interval_us: 10,
            poll_limit: 1000,
            max_retries: 3,
        }
    }
}

impl RetryPolicy {
    /// Microseconds to wait between two polls.
    pub const fn poll_interval_us(&self) -> u32 {
        self.poll_interval_us
    }

    pub fn with_poll_interval_us(self, value: u32) -> Self {
        Self {
            poll_interval_us: value,
            ..self
        }
    }

    /// How many times a condition is polled before giving up.
    pub const fn poll_limit(&self) -> u32 {
        self.poll_limit
    }

    /// This value is clamped to a minimum of `1` (every wait polls at least once).
    pub fn with_poll_limit(self, value: u32) -> Self {
        Self {
            poll_limit: value.max(1),
            ..self
        }
    }

    /// How many times a payload is re-submitted after its completion interrupt
    /// failed to arrive.
    pub const fn max_retries(&self) -> u8 {
        self.max_retries
    }

    pub fn with_max_retries(self, value: u8) -> Self {
        Self {
            max_retries: value,
            ..self
        }
    }
}

/// A single entry of a [`RegisterTable`]: the register address and
/// the 1 to 5 bytes written to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegisterWrite {
    address: u8,
    len: u8,
    value: [u8; 5],
}

impl RegisterWrite {
    /// A single byte register value.
    pub const fn byte(address: u8, value: u8) -> Self {
        Self {
            address,
            len: 1,
            value: [value, 0, 0, 0, 0],
        }
    }

    /// A multi-byte register value (at most 5 bytes are kept).
    pub fn bytes(address: u8, data: &[u8]) -> Self {
        let len = data.len().min(5);
        let mut value = [0u8; 5];
        value[..len].copy_from_slice(&data[..len]);
        Self {
            address,
            len: len as u8,
            value,
        }
    }

    pub const fn address(&self) -> u8 {
        self.address
    }

    pub fn data(&self) -> &[u8] {
        &self.value[..self.len as usize]
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.value[..self.len as usize]
    }
}

/// The number of registers written by [`LinkMode::configure()`](fn@crate::radio::prelude::LinkMode::configure).
pub const REGISTER_TABLE_LEN: usize = 12;

/// The ordered list of register writes for one [`Mode`].
pub type RegisterTable = [RegisterWrite; REGISTER_TABLE_LEN];

/// An object to configure the link.
///
/// This struct follows a builder pattern. Since all fields are private, users should
/// start with the [`LinkConfig::default`] constructor, then mutate the object accordingly.
/// ```
/// use nrf_link::radio::LinkConfig;
///
/// let config = LinkConfig::default().with_channel(42);
/// assert_eq!(config.channel(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkConfig {
    pub(crate) config_reg: Config,
    pub(crate) rf_setup: RfSetup,
    tx_lna: bool,
    rx_lna: bool,
    channel: u8,
    address_length: u8,
    address: [u8; 5],
    settle_delay_us: u32,
    ce_pulse_us: u32,
}

impl Default for LinkConfig {
    /// Instantiate a [`LinkConfig`] object with the reference link's values.
    ///
    /// | feature | default value |
    /// |--------:|:--------------|
    /// | [`LinkConfig::channel()`] | `0x68` |
    /// | [`LinkConfig::address_length()`] | `3` |
    /// | [`LinkConfig::address()`] | `[0x0F, 0x0E, 0x0F, 0x0E, 0x0F]` |
    /// | [`LinkConfig::pa_level()`] | [`PaLevel::Max`] |
    /// | [`LinkConfig::data_rate()`] | [`DataRate::Mbps2`] |
    /// | [`LinkConfig::lna_enable()`] | `true` for [`Mode::Transmit`], `false` for [`Mode::Receive`] |
    /// | [`LinkConfig::crc_length()`] | [`CrcLength::Bit8`] |
    /// | [`LinkConfig::rx_dr()`] | `true` |
    /// | [`LinkConfig::tx_ds()`] | `true` |
    /// | [`LinkConfig::tx_df()`] | `false` |
    /// | [`LinkConfig::settle_delay_us()`] | `65000` |
    /// | [`LinkConfig::ce_pulse_us()`] | `10` |
    ///
    /// Auto-ACK, auto-retransmit, dynamic payloads and the FEATURE register
    /// are always disabled; only pipe 0 is enabled, with a fixed
    /// [`PACKET_LENGTH`] payload width.
    fn default() -> Self {
        Self {
            /*
               - MAX_RT event kept off the IRQ pin
               - 8 bit CRC
               - powered up
            */
            config_reg: Config::new()
                .with_mask_max_rt(true)
                .with_crc_length(CrcLength::Bit8)
                .with_power(true),
            rf_setup: RfSetup::new()
                .with_data_rate(DataRate::Mbps2)
                .with_pa_level(PaLevel::Max),
            tx_lna: true,
            rx_lna: false,
            channel: 0x68,
            address_length: 3,
            address: [0x0F, 0x0E, 0x0F, 0x0E, 0x0F],
            settle_delay_us: 65_000,
            ce_pulse_us: 10,
        }
    }
}

impl LinkConfig {
    /// The minimum CE pulse that starts a transmission.
    pub const MIN_CE_PULSE_US: u32 = 10;

    /// Returns the value set by [`LinkConfig::with_crc_length()`].
    pub fn crc_length(&self) -> CrcLength {
        self.config_reg.crc_length()
    }

    /// The Cyclical Redundancy Checksum (CRC) length.
    pub fn with_crc_length(self, length: CrcLength) -> Self {
        Self {
            config_reg: self.config_reg.with_crc_length(length),
            ..self
        }
    }

    /// Returns the value set by [`LinkConfig::with_data_rate()`].
    pub fn data_rate(&self) -> DataRate {
        self.rf_setup.data_rate()
    }

    /// The Data Rate (over the air).
    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        Self {
            rf_setup: self.rf_setup.with_data_rate(data_rate),
            ..self
        }
    }

    /// Returns the value set by [`LinkConfig::with_pa_level()`].
    pub fn pa_level(&self) -> PaLevel {
        self.rf_setup.pa_level()
    }

    /// The Power Amplitude (PA) level.
    pub fn with_pa_level(self, level: PaLevel) -> Self {
        Self {
            rf_setup: self.rf_setup.with_pa_level(level),
            ..self
        }
    }

    /// Returns the value set by [`LinkConfig::with_lna_enable()`] for the given `mode`.
    pub const fn lna_enable(&self, mode: Mode) -> bool {
        match mode {
            Mode::Transmit => self.tx_lna,
            Mode::Receive => self.rx_lna,
        }
    }

    /// Enable or disable the chip's Low Noise Amplifier (LNA) bit in the given `mode`.
    ///
    /// This value may not be respected depending on the radio module used.
    pub fn with_lna_enable(self, mode: Mode, enable: bool) -> Self {
        match mode {
            Mode::Transmit => Self {
                tx_lna: enable,
                ..self
            },
            Mode::Receive => Self {
                rx_lna: enable,
                ..self
            },
        }
    }

    /// Returns the value set by [`LinkConfig::with_channel()`].
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// Set the channel (over the air frequency).
    ///
    /// This value is clamped to range [0, 125].
    /// ```text
    /// frequency (in MHz) = channel + 2400
    /// ```
    pub fn with_channel(self, value: u8) -> Self {
        Self {
            channel: value.min(125),
            ..self
        }
    }

    /// Returns the value set by [`LinkConfig::with_address_length()`].
    pub const fn address_length(&self) -> u8 {
        self.address_length
    }

    /// The number of address bytes matched over the air.
    ///
    /// This value is clamped to range [3, 5].
    pub fn with_address_length(self, value: u8) -> Self {
        Self {
            address_length: value.clamp(3, 5),
            ..self
        }
    }

    /// Returns the value set by [`LinkConfig::with_address()`].
    pub const fn address(&self) -> [u8; 5] {
        self.address
    }

    /// The pipe address shared by both ends of the link (LSB first).
    ///
    /// At most 5 bytes are used; missing bytes keep their previous value.
    pub fn with_address(self, address: &[u8]) -> Self {
        let len = address.len().min(5);
        let mut new_address = self.address;
        new_address[..len].copy_from_slice(&address[..len]);
        Self {
            address: new_address,
            ..self
        }
    }

    /// Get the value set by [`LinkConfig::with_rx_dr()`].
    pub fn rx_dr(&self) -> bool {
        !self.config_reg.mask_rx_dr()
    }

    /// Enable or disable the "RX Data Ready" event triggering the radio's IRQ.
    pub fn with_rx_dr(self, enable: bool) -> Self {
        Self {
            config_reg: self.config_reg.with_mask_rx_dr(!enable),
            ..self
        }
    }

    /// Get the value set by [`LinkConfig::with_tx_ds()`].
    pub fn tx_ds(&self) -> bool {
        !self.config_reg.mask_tx_ds()
    }

    /// Enable or disable the "TX Data Sent" event triggering the radio's IRQ.
    ///
    /// The completion handshake depends on this event.
    pub fn with_tx_ds(self, enable: bool) -> Self {
        Self {
            config_reg: self.config_reg.with_mask_tx_ds(!enable),
            ..self
        }
    }

    /// Get the value set by [`LinkConfig::with_tx_df()`].
    pub fn tx_df(&self) -> bool {
        !self.config_reg.mask_max_rt()
    }

    /// Enable or disable the "TX Data Failed" event triggering the radio's IRQ.
    pub fn with_tx_df(self, enable: bool) -> Self {
        Self {
            config_reg: self.config_reg.with_mask_max_rt(!enable),
            ..self
        }
    }

    /// Returns the value set by [`LinkConfig::with_settle_delay_us()`].
    pub const fn settle_delay_us(&self) -> u32 {
        self.settle_delay_us
    }

    /// Microseconds to wait after powering up (and after reset) before
    /// the remaining registers are written.
    pub fn with_settle_delay_us(self, value: u32) -> Self {
        Self {
            settle_delay_us: value,
            ..self
        }
    }

    /// Returns the value set by [`LinkConfig::with_ce_pulse_us()`].
    pub const fn ce_pulse_us(&self) -> u32 {
        self.ce_pulse_us
    }

    /// How long CE is held high to start a transmission.
    ///
    /// This value is clamped to a minimum of [`LinkConfig::MIN_CE_PULSE_US`].
    pub fn with_ce_pulse_us(self, value: u32) -> Self {
        Self {
            ce_pulse_us: value.max(Self::MIN_CE_PULSE_US),
            ..self
        }
    }

    /// The register writes for `mode`, in the order they are applied.
    ///
    /// CONFIG comes first because it gates the power-up.
    pub fn register_table(&self, mode: Mode) -> RegisterTable {
        let rf_setup = self.rf_setup.with_lna_enable(self.lna_enable(mode));
        [
            RegisterWrite::byte(registers::CONFIG, self.config_reg.for_mode(mode).raw()),
            RegisterWrite::byte(registers::EN_AA, 0),
            RegisterWrite::byte(registers::EN_RXADDR, 1),
            RegisterWrite::byte(registers::SETUP_AW, self.address_length - 2),
            RegisterWrite::byte(registers::SETUP_RETR, 0),
            RegisterWrite::byte(registers::RF_CH, self.channel),
            RegisterWrite::byte(registers::RF_SETUP, rf_setup.raw()),
            RegisterWrite::bytes(registers::RX_ADDR_P0, &self.address),
            RegisterWrite::bytes(registers::TX_ADDR, &self.address),
            RegisterWrite::byte(registers::RX_PW_P0, PACKET_LENGTH as u8),
            RegisterWrite::byte(registers::DYNPD, 0),
            RegisterWrite::byte(registers::FEATURE, 0),
        ]
    }
}
