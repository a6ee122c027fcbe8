use super::{LinkError, Transceiver};
use crate::radio::prelude::LinkDetails;
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

#[cfg(any(
    all(feature = "defmt", target_os = "none"),
    all(feature = "std", not(target_os = "none"))
))]
use super::{registers, Config, RfSetup};
#[cfg(any(
    all(feature = "defmt", target_os = "none"),
    all(feature = "std", not(target_os = "none"))
))]
use crate::radio::prelude::LinkCommands;

#[cfg(all(feature = "std", not(target_os = "none")))]
extern crate std;

impl<SPI, DO, DELAY> LinkDetails for Transceiver<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type DetailsErrorType = LinkError<SPI::Error, DO::Error>;

    #[cfg(all(feature = "defmt", target_os = "none"))]
    fn print_details(&mut self) -> Result<(), Self::DetailsErrorType> {
        let config: Config = self.read_typed()?;
        let rx = defmt::intern!("R");
        let tx = defmt::intern!("T");
        defmt::println!(
            "Primary Mode______________{=istr}X",
            if config.is_rx() { rx } else { tx }
        );
        defmt::println!("Powered Up________________{=bool}", config.power());
        defmt::println!("CRC Length________________{}", config.crc_length());
        defmt::println!("IRQ on Data Ready_________{=bool}", !config.mask_rx_dr());
        defmt::println!("    Data Ready triggered__{=bool}", self._status.rx_dr());
        defmt::println!("IRQ on Data Sent__________{=bool}", !config.mask_tx_ds());
        defmt::println!("    Data Sent triggered___{=bool}", self._status.tx_ds());
        defmt::println!("IRQ on Data Fail__________{=bool}", !config.mask_max_rt());
        defmt::println!("    Data Fail triggered___{=bool}", self._status.tx_df());

        let mut channel = [0u8];
        self.read_register(registers::RF_CH, &mut channel)?;
        defmt::println!(
            "Channel___________________{=u8} ~ {=u16} MHz",
            channel[0],
            channel[0] as u16 + 2400u16
        );

        let rf_setup: RfSetup = self.read_typed()?;
        defmt::println!("RF Data Rate______________{}", rf_setup.data_rate());
        defmt::println!("RF Power Amplifier________{}", rf_setup.pa_level());
        defmt::println!("RF LNA enabled____________{=bool}", rf_setup.lna_enable());

        let mut setup_aw = [0u8];
        self.read_register(registers::SETUP_AW, &mut setup_aw)?;
        defmt::println!(
            "Address length____________{=u8} bytes",
            (setup_aw[0] & 3) + 2
        );
        let mut payload_width = [0u8];
        self.read_register(registers::RX_PW_P0, &mut payload_width)?;
        defmt::println!("Payload length____________{=u8} bytes", payload_width[0]);

        let fifo = self.fifo_status()?;
        defmt::println!("{}", fifo);

        let mut address = [0u8; 5];
        self.read_register(registers::TX_ADDR, &mut address)?;
        defmt::println!("TX address________________{=[u8; 5]:#04X}", address);
        self.read_register(registers::RX_ADDR_P0, &mut address)?;
        defmt::println!("Pipe 0 address____________{=[u8; 5]:#04X}", address);
        Ok(())
    }

    #[cfg(not(any(
        all(feature = "defmt", target_os = "none"),
        all(feature = "std", not(target_os = "none"))
    )))]
    fn print_details(&mut self) -> Result<(), Self::DetailsErrorType> {
        Ok(())
    }

    #[cfg(all(feature = "std", not(target_os = "none")))]
    fn print_details(&mut self) -> Result<(), Self::DetailsErrorType> {
        let config: Config = self.read_typed()?;
        std::println!(
            "Primary Mode______________{}X",
            if config.is_rx() { "R" } else { "T" }
        );
        std::println!("Powered Up________________{}", config.power());
        std::println!("CRC Length________________{}", config.crc_length());
        std::println!("IRQ on Data Ready_________{}", !config.mask_rx_dr());
        std::println!("    Data Ready triggered__{}", self._status.rx_dr());
        std::println!("IRQ on Data Sent__________{}", !config.mask_tx_ds());
        std::println!("    Data Sent triggered___{}", self._status.tx_ds());
        std::println!("IRQ on Data Fail__________{}", !config.mask_max_rt());
        std::println!("    Data Fail triggered___{}", self._status.tx_df());

        let mut channel = [0u8];
        self.read_register(registers::RF_CH, &mut channel)?;
        std::println!(
            "Channel___________________{} ~ {} MHz",
            channel[0],
            channel[0] as u16 + 2400u16
        );

        let rf_setup: RfSetup = self.read_typed()?;
        std::println!("RF Data Rate______________{}", rf_setup.data_rate());
        std::println!("RF Power Amplifier________{}", rf_setup.pa_level());
        std::println!("RF LNA enabled____________{}", rf_setup.lna_enable());

        let mut setup_aw = [0u8];
        self.read_register(registers::SETUP_AW, &mut setup_aw)?;
        std::println!("Address length____________{} bytes", (setup_aw[0] & 3) + 2);
        let mut payload_width = [0u8];
        self.read_register(registers::RX_PW_P0, &mut payload_width)?;
        std::println!("Payload length____________{} bytes", payload_width[0]);

        let fifo = self.fifo_status()?;
        std::println!("{}", fifo);

        let mut address = [0u8; 5];
        self.read_register(registers::TX_ADDR, &mut address)?;
        std::println!("TX address________________{:02X?}", address);
        self.read_register(registers::RX_ADDR_P0, &mut address)?;
        std::println!("Pipe 0 address____________{:02X?}", address);
        Ok(())
    }
}
