use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{bit_fields::RegisterValue, commands, registers, LinkError, Transceiver};
use crate::{
    packet::{Packet, PACKET_LENGTH},
    radio::prelude::LinkCommands,
    FifoStatus, StatusFlags,
};

/// The commands understood by the transceiver.
///
/// Each command is one chip-select framed bus transaction made of
/// the [`Command::opcode()`] byte followed by the command's data bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Read a register (address masked to 5 bits).
    ReadRegister(u8),
    /// Write a register (address masked to 5 bits).
    WriteRegister(u8),
    UploadPayload,
    DownloadPayload,
    FlushTx,
    FlushRx,
    Nop,
    /// Read the FIFO_STATUS register.
    FifoStatus,
    /// Write `1`s to all IRQ flags in the STATUS register.
    ClearIrq,
    ReadRxPayloadLength,
}

impl Command {
    /// The first byte shifted in for this command.
    pub const fn opcode(self) -> u8 {
        match self {
            Command::ReadRegister(address) => {
                commands::R_REGISTER | (address & commands::REGISTER_MASK)
            }
            Command::WriteRegister(address) => {
                commands::W_REGISTER | (address & commands::REGISTER_MASK)
            }
            Command::UploadPayload => commands::W_TX_PAYLOAD,
            Command::DownloadPayload => commands::R_RX_PAYLOAD,
            Command::FlushTx => commands::FLUSH_TX,
            Command::FlushRx => commands::FLUSH_RX,
            Command::Nop => commands::NOP,
            Command::FifoStatus => commands::R_REGISTER | registers::FIFO_STATUS,
            Command::ClearIrq => commands::W_REGISTER | registers::STATUS,
            Command::ReadRxPayloadLength => commands::R_RX_PL_WID,
        }
    }

    /// The number of data bytes following the opcode,
    /// or `None` for register access (which depends on the register).
    pub const fn data_length(self) -> Option<usize> {
        match self {
            Command::ReadRegister(_) | Command::WriteRegister(_) => None,
            Command::UploadPayload | Command::DownloadPayload => Some(PACKET_LENGTH),
            Command::FlushTx | Command::FlushRx | Command::Nop => Some(0),
            Command::FifoStatus | Command::ClearIrq | Command::ReadRxPayloadLength => Some(1),
        }
    }
}

impl<SPI, DO, DELAY> Transceiver<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Issue `command` with the first `len` data bytes of the internal buffer.
    fn transact(
        &mut self,
        command: Command,
        len: usize,
    ) -> Result<(), LinkError<SPI::Error, DO::Error>> {
        debug_assert_eq!(command.data_length().unwrap_or(len), len);
        self._buf[0] = command.opcode();
        self.spi_transfer(len + 1)
    }

    /// Issue `command` while clocking `len` dummy bytes to read its response.
    fn transact_read(
        &mut self,
        command: Command,
        len: usize,
    ) -> Result<(), LinkError<SPI::Error, DO::Error>> {
        self._buf[1..(len + 1)].fill(commands::NOP);
        self.transact(command, len)
    }

    /// Read a register into its typed representation.
    pub fn read_typed<R: RegisterValue>(&mut self) -> Result<R, LinkError<SPI::Error, DO::Error>> {
        self.transact_read(Command::ReadRegister(R::ADDRESS), 1)?;
        Ok(R::from_raw(self._buf[1]))
    }

    /// Write a typed register value.
    pub fn write_typed<R: RegisterValue>(
        &mut self,
        value: R,
    ) -> Result<(), LinkError<SPI::Error, DO::Error>> {
        self._buf[1] = value.raw();
        self.transact(Command::WriteRegister(R::ADDRESS), 1)
    }
}

impl<SPI, DO, DELAY> LinkCommands for Transceiver<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type CommandErrorType = LinkError<SPI::Error, DO::Error>;

    fn read_register(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::CommandErrorType> {
        debug_assert!(buf.len() <= PACKET_LENGTH, "register data block too long");
        let len = buf.len().min(PACKET_LENGTH);
        self.transact_read(Command::ReadRegister(address), len)?;
        buf[..len].copy_from_slice(&self._buf[1..(len + 1)]);
        Ok(())
    }

    fn write_register(&mut self, address: u8, data: &[u8]) -> Result<(), Self::CommandErrorType> {
        debug_assert!(data.len() <= PACKET_LENGTH, "register data block too long");
        let len = data.len().min(PACKET_LENGTH);
        self._buf[1..(len + 1)].copy_from_slice(&data[..len]);
        self.transact(Command::WriteRegister(address), len)
    }

    fn upload_payload(&mut self, packet: &Packet) -> Result<(), Self::CommandErrorType> {
        self._buf[0] = Command::UploadPayload.opcode();
        self._buf[1..].copy_from_slice(packet);
        let (spi, buf) = (&mut self._spi, &mut self._buf);
        // an ISR touching the bus mid-payload would corrupt the upload
        critical_section::with(|_| spi.transfer_in_place(buf)).map_err(LinkError::Spi)?;
        self._status = StatusFlags::from_bits(self._buf[0]);
        Ok(())
    }

    fn download_payload(&mut self, packet: &mut Packet) -> Result<(), Self::CommandErrorType> {
        self.transact_read(Command::DownloadPayload, PACKET_LENGTH)?;
        packet.copy_from_slice(&self._buf[1..]);
        Ok(())
    }

    fn flush_tx(&mut self) -> Result<(), Self::CommandErrorType> {
        self.transact(Command::FlushTx, 0)
    }

    fn flush_rx(&mut self) -> Result<(), Self::CommandErrorType> {
        self.transact(Command::FlushRx, 0)
    }

    fn nop(&mut self) -> Result<StatusFlags, Self::CommandErrorType> {
        self.transact(Command::Nop, 0)?;
        Ok(self._status)
    }

    fn fifo_status(&mut self) -> Result<FifoStatus, Self::CommandErrorType> {
        self.transact_read(Command::FifoStatus, 1)?;
        Ok(FifoStatus::from_bits(self._buf[1]))
    }

    fn clear_irq(&mut self) -> Result<(), Self::CommandErrorType> {
        self._buf[1] = StatusFlags::IRQ_MASK;
        self.transact(Command::ClearIrq, 1)
    }

    fn read_rx_payload_length(&mut self) -> Result<u8, Self::CommandErrorType> {
        self.transact_read(Command::ReadRxPayloadLength, 1)?;
        Ok(self._buf[1])
    }
}
