use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{registers, LinkError, Transceiver};
use crate::{
    packet::PACKET_LENGTH,
    radio::{
        prelude::{LinkCommands, LinkMode},
        RegisterTable,
    },
    Mode,
};

impl<SPI, DO, DELAY> LinkMode for Transceiver<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type ModeErrorType = LinkError<SPI::Error, DO::Error>;

    fn init(&mut self) -> Result<(), Self::ModeErrorType> {
        self.ce_pin.set_low().map_err(LinkError::Gpo)?;
        // The radio needs time to settle after power-on or reset,
        // else configuration bits will not necessarily stick.
        self.delay_us(self._config.settle_delay_us());
        self.clear_irq()
    }

    fn configure(&mut self, mode: Mode) -> Result<(), Self::ModeErrorType> {
        let table = self._config.register_table(mode);
        let (config_reg, others) = (&table[0], &table[1..]);
        self.write_register(config_reg.address(), config_reg.data())?;
        // power-up (and PRIM_RX) must take effect before the rest is written
        self.delay_us(self._config.settle_delay_us());
        for entry in others {
            self.write_register(entry.address(), entry.data())?;
        }

        let mut payload_width = [0u8];
        self.read_register(registers::RX_PW_P0, &mut payload_width)?;
        if payload_width[0] != PACKET_LENGTH as u8 {
            #[cfg(all(feature = "defmt", target_os = "none"))]
            defmt::warn!(
                "payload width reads back as {=u8}, expected {=u8}",
                payload_width[0],
                PACKET_LENGTH as u8
            );
            self._mode = None;
            return Err(LinkError::ConfigMismatch);
        }
        self._mode = Some(mode);
        #[cfg(all(feature = "defmt", target_os = "none"))]
        defmt::debug!("configured as {}", mode);
        Ok(())
    }

    fn enter_tx_mode(&mut self) -> Result<(), Self::ModeErrorType> {
        self.init()?;
        // CE stays low; a transmission is started by pulsing it.
        self.configure(Mode::Transmit)
    }

    fn enter_rx_mode(&mut self) -> Result<(), Self::ModeErrorType> {
        self.init()?;
        self.configure(Mode::Receive)?;
        self.clear_irq()?;
        self.ce_pin.set_high().map_err(LinkError::Gpo)
    }

    fn query_register_table(&mut self, mode: Mode) -> Result<RegisterTable, Self::ModeErrorType> {
        let mut table = self._config.register_table(mode);
        for entry in table.iter_mut() {
            let address = entry.address();
            self.read_register(address, entry.data_mut())?;
        }
        Ok(table)
    }

    fn mode(&self) -> Option<Mode> {
        self._mode
    }
}
