//! A simulated pair of transceivers sharing the air, for host tests.
//!
//! The transmitting chip raises its IRQ line on "TX Data Sent" and delivers the
//! interrupt to a [`CompletionSignal`] the way a falling-edge pin interrupt would:
//! only when the line goes from inactive to active, after a configurable latency.
//! Simulated time advances only through the [`DelayNs`] handed to each transceiver.
extern crate std;

use core::{cell::RefCell, convert::Infallible};
use std::{boxed::Box, collections::VecDeque, rc::Rc, vec::Vec};

use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType as PinErrorType, OutputPin},
    spi::{ErrorType as SpiErrorType, Operation, SpiDevice},
};

use crate::{
    packet::{Packet, PACKET_LENGTH},
    radio::{commands, mnemonics, registers, CompletionSignal, LinkConfig, Transceiver},
};

const MIN_CE_PULSE_NS: u64 = 10_000;
const FIFO_DEPTH: usize = 3;
const IRQ_FLAGS: u8 = mnemonics::RX_DR | mnemonics::TX_DS | mnemonics::MAX_RT;

/// How the interrupt controller treats the transmitting chip's IRQ edges.
#[derive(Default)]
pub struct IrqControls {
    /// Latency of the next interrupts (consumed front to back).
    pub latencies: VecDeque<u64>,
    /// Latency once `latencies` ran dry.
    pub latency_ns: u64,
    /// Swallow this many interrupts.
    pub drop_next: usize,
    /// Deliver every interrupt twice (1 microsecond apart).
    pub duplicate: bool,
}

pub struct Chip {
    registers: [[u8; 5]; 0x20],
    tx_fifo: VecDeque<Packet>,
    rx_fifo: VecDeque<Packet>,
    last_rx: Packet,
    status: u8,
    ce: bool,
    ce_rise_ns: u64,
    now_ns: u64,
    peer: Option<Rc<RefCell<Chip>>>,
    isr: Option<&'static CompletionSignal>,
    pending_isr: Vec<u64>,
    pub irq: IrqControls,
    /// Every bus transaction as it was shifted in.
    pub log: Vec<Vec<u8>>,
    pub uploads: usize,
    pub transmitted: usize,
}

impl Chip {
    fn new() -> Self {
        let mut chip = Self {
            registers: [[0u8; 5]; 0x20],
            tx_fifo: VecDeque::new(),
            rx_fifo: VecDeque::new(),
            last_rx: [0u8; PACKET_LENGTH],
            status: 0,
            ce: false,
            ce_rise_ns: 0,
            now_ns: 0,
            peer: None,
            isr: None,
            pending_isr: Vec::new(),
            irq: IrqControls::default(),
            log: Vec::new(),
            uploads: 0,
            transmitted: 0,
        };
        // power-on reset values
        chip.registers[registers::CONFIG as usize][0] = 0x08;
        chip.registers[registers::EN_AA as usize][0] = 0x3F;
        chip.registers[registers::EN_RXADDR as usize][0] = 0x03;
        chip.registers[registers::SETUP_AW as usize][0] = 0x03;
        chip.registers[registers::SETUP_RETR as usize][0] = 0x03;
        chip.registers[registers::RF_CH as usize][0] = 0x02;
        chip.registers[registers::RF_SETUP as usize][0] = 0x0F;
        chip.registers[registers::RX_ADDR_P0 as usize] = [0xE7; 5];
        chip.registers[registers::RX_ADDR_P0 as usize + 1] = [0xC2; 5];
        chip.registers[registers::TX_ADDR as usize] = [0xE7; 5];
        chip
    }

    fn width(address: u8) -> usize {
        match address {
            0x0A | 0x0B | 0x10 => 5,
            _ => 1,
        }
    }

    fn reg(&self, address: u8) -> u8 {
        self.registers[address as usize][0]
    }

    fn powered(&self) -> bool {
        self.reg(registers::CONFIG) & mnemonics::PWR_UP != 0
    }

    fn prim_rx(&self) -> bool {
        self.reg(registers::CONFIG) & mnemonics::PRIM_RX != 0
    }

    fn listening(&self) -> bool {
        self.powered() && self.prim_rx() && self.ce
    }

    fn address(&self, address: u8) -> &[u8] {
        let width = (self.reg(registers::SETUP_AW) & 3) as usize + 2;
        &self.registers[address as usize][..width]
    }

    fn status_byte(&self) -> u8 {
        let rx_pipe = if self.rx_fifo.is_empty() { 7 } else { 0 };
        self.status | (rx_pipe << 1) | (self.tx_fifo.len() >= FIFO_DEPTH) as u8
    }

    fn fifo_status_byte(&self) -> u8 {
        let mut fifo = 0;
        if self.tx_fifo.len() >= FIFO_DEPTH {
            fifo |= mnemonics::FIFO_TX_FULL;
        }
        if self.tx_fifo.is_empty() {
            fifo |= mnemonics::FIFO_TX_EMPTY;
        }
        if self.rx_fifo.len() >= FIFO_DEPTH {
            fifo |= mnemonics::FIFO_RX_FULL;
        }
        if self.rx_fifo.is_empty() {
            fifo |= mnemonics::FIFO_RX_EMPTY;
        }
        fifo
    }

    /// The (active low) IRQ pin is asserted.
    fn irq_line_active(&self) -> bool {
        let unmasked = !self.reg(registers::CONFIG) & IRQ_FLAGS;
        self.status & unmasked != 0
    }

    pub fn irq_flags(&self) -> u8 {
        self.status
    }

    pub fn tx_fifo_len(&self) -> usize {
        self.tx_fifo.len()
    }

    fn raise(&mut self, flags: u8) {
        let was_active = self.irq_line_active();
        self.status |= flags;
        if !was_active && self.irq_line_active() {
            self.schedule_isr();
        }
    }

    fn schedule_isr(&mut self) {
        if self.isr.is_none() {
            return;
        }
        if self.irq.drop_next > 0 {
            self.irq.drop_next -= 1;
            return;
        }
        let latency = self
            .irq
            .latencies
            .pop_front()
            .unwrap_or(self.irq.latency_ns);
        self.pending_isr.push(self.now_ns + latency);
        if self.irq.duplicate {
            self.pending_isr.push(self.now_ns + latency + 1_000);
        }
        self.deliver_due();
    }

    fn deliver_due(&mut self) {
        let now = self.now_ns;
        if let Some(isr) = self.isr {
            self.pending_isr.retain(|due| {
                if *due <= now {
                    isr.signal();
                    false
                } else {
                    true
                }
            });
        }
    }

    fn advance(&mut self, ns: u64) {
        self.now_ns += ns;
        self.deliver_due();
    }

    fn set_ce(&mut self, high: bool) {
        if high {
            if !self.ce {
                self.ce_rise_ns = self.now_ns;
            }
            self.ce = true;
            return;
        }
        let pulsed = self.ce && self.now_ns - self.ce_rise_ns >= MIN_CE_PULSE_NS;
        self.ce = false;
        if pulsed {
            self.transmit();
        }
    }

    fn transmit(&mut self) {
        if !self.powered() || self.prim_rx() {
            return;
        }
        let Some(packet) = self.tx_fifo.pop_front() else {
            return;
        };
        self.transmitted += 1;
        if let Some(peer) = &self.peer {
            peer.borrow_mut().on_air(
                &packet,
                self.reg(registers::RF_CH),
                self.address(registers::TX_ADDR),
            );
        }
        // no auto-ACK: the payload counts as sent once it left the antenna
        self.raise(mnemonics::TX_DS);
    }

    fn on_air(&mut self, packet: &Packet, channel: u8, address: &[u8]) {
        if !self.listening()
            || self.reg(registers::RF_CH) != channel
            || self.reg(registers::EN_RXADDR) & 1 == 0
            || self.address(registers::RX_ADDR_P0) != address
        {
            return;
        }
        if self.rx_fifo.len() < FIFO_DEPTH {
            self.rx_fifo.push_back(*packet);
        }
        self.raise(mnemonics::RX_DR);
    }

    fn read_register(&self, address: u8, data: &mut [u8]) {
        match address {
            registers::STATUS => data.fill(self.status_byte()),
            registers::FIFO_STATUS => data.fill(self.fifo_status_byte()),
            _ => {
                for (i, byte) in data.iter_mut().enumerate() {
                    *byte = self.registers[address as usize][i.min(4)];
                }
            }
        }
    }

    fn write_register(&mut self, address: u8, data: &[u8]) {
        match address {
            registers::STATUS => {
                if let Some(flags) = data.first() {
                    self.status &= !(flags & IRQ_FLAGS);
                }
            }
            registers::FIFO_STATUS => (),
            _ => {
                let len = data.len().min(Self::width(address));
                self.registers[address as usize][..len].copy_from_slice(&data[..len]);
            }
        }
    }

    fn execute(&mut self, buf: &mut [u8]) {
        self.log.push(buf.to_vec());
        let status = self.status_byte();
        let opcode = buf[0];
        let data = &mut buf[1..];
        match opcode {
            op if op & 0xE0 == commands::R_REGISTER => {
                self.read_register(op & commands::REGISTER_MASK, data)
            }
            op if op & 0xE0 == commands::W_REGISTER => {
                self.write_register(op & commands::REGISTER_MASK, data)
            }
            commands::R_RX_PL_WID => data.fill(PACKET_LENGTH as u8),
            commands::R_RX_PAYLOAD => {
                if let Some(packet) = self.rx_fifo.pop_front() {
                    self.last_rx = packet;
                }
                let len = data.len().min(PACKET_LENGTH);
                data[..len].copy_from_slice(&self.last_rx[..len]);
            }
            commands::W_TX_PAYLOAD => {
                self.uploads += 1;
                if self.tx_fifo.len() < FIFO_DEPTH {
                    let mut packet = [0u8; PACKET_LENGTH];
                    let len = data.len().min(PACKET_LENGTH);
                    packet[..len].copy_from_slice(&data[..len]);
                    self.tx_fifo.push_back(packet);
                }
            }
            commands::FLUSH_TX => self.tx_fifo.clear(),
            commands::FLUSH_RX => self.rx_fifo.clear(),
            _ => (),
        }
        buf[0] = status;
    }
}

pub struct SimSpi {
    chip: Rc<RefCell<Chip>>,
}

impl SpiErrorType for SimSpi {
    type Error = Infallible;
}

impl SpiDevice for SimSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
        let mut chip = self.chip.borrow_mut();
        for operation in operations {
            match operation {
                Operation::TransferInPlace(buf) => chip.execute(buf),
                Operation::DelayNs(ns) => chip.advance(*ns as u64),
                _ => (),
            }
        }
        Ok(())
    }
}

pub struct SimPin {
    chip: Rc<RefCell<Chip>>,
}

impl PinErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.chip.borrow_mut().set_ce(true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.chip.borrow_mut().set_ce(false);
        Ok(())
    }
}

pub struct SimDelay {
    chip: Rc<RefCell<Chip>>,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.chip.borrow_mut().advance(ns as u64);
    }
}

pub type SimTransceiver = Transceiver<SimSpi, SimPin, SimDelay>;

/// Two chips on the same air; only `tx` is wired to the interrupt controller.
pub struct SimPair {
    pub tx: Rc<RefCell<Chip>>,
    pub rx: Rc<RefCell<Chip>>,
    pub signal: &'static CompletionSignal,
}

impl SimPair {
    pub fn new() -> Self {
        let signal: &'static CompletionSignal = Box::leak(Box::new(CompletionSignal::new()));
        let rx = Rc::new(RefCell::new(Chip::new()));
        let mut tx = Chip::new();
        tx.peer = Some(rx.clone());
        tx.isr = Some(signal);
        Self {
            tx: Rc::new(RefCell::new(tx)),
            rx,
            signal,
        }
    }

    fn radio(chip: &Rc<RefCell<Chip>>, config: LinkConfig) -> SimTransceiver {
        Transceiver::new(
            SimPin { chip: chip.clone() },
            SimSpi { chip: chip.clone() },
            SimDelay { chip: chip.clone() },
            config,
        )
    }

    pub fn tx_radio(&self, config: LinkConfig) -> SimTransceiver {
        Self::radio(&self.tx, config)
    }

    pub fn rx_radio(&self, config: LinkConfig) -> SimTransceiver {
        Self::radio(&self.rx, config)
    }
}

#[cfg(test)]
mod test {
    extern crate std;
    use super::{SimDelay, SimPair, SimPin, SimSpi};
    use crate::{
        packet::{Packet, Receiver, Sender, PACKET_LENGTH},
        radio::{
            commands,
            prelude::{ByteSink, LinkCommands, LinkMode, SampleSource},
            registers, Handshake, LinkConfig, LinkError, RetryPolicy,
        },
        report::{ReportConfig, ReportFramer},
        HandshakeState, Mode,
    };
    use core::convert::Infallible;
    use embedded_hal::digital::OutputPin;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::vec::Vec;

    type SimSender = Sender<'static, SimSpi, SimPin, SimDelay>;
    type SimReceiver = Receiver<SimSpi, SimPin, SimDelay>;

    fn link(policy: RetryPolicy) -> (SimSender, SimReceiver, SimPair) {
        let pair = SimPair::new();
        let mut tx = pair.tx_radio(LinkConfig::default());
        tx.enter_tx_mode().unwrap();
        let mut rx = pair.rx_radio(LinkConfig::default());
        rx.enter_rx_mode().unwrap();
        (
            Sender::new(tx, pair.signal, policy),
            Receiver::new(rx),
            pair,
        )
    }

    fn hello() -> Packet {
        let mut packet = [0u8; PACKET_LENGTH];
        packet[..6].copy_from_slice(b"Hello!");
        packet
    }

    #[test]
    fn round_trip() {
        let (mut sender, mut receiver, _pair) = link(RetryPolicy::default());
        for round in 0..4u16 {
            let values: Vec<u16> = (0..(PACKET_LENGTH as u16 / 2))
                .map(|i| round.wrapping_mul(0x1357) ^ (i << 9) ^ i)
                .collect();
            for value in &values {
                sender.append_u16(*value).unwrap();
            }
            assert_eq!(sender.pending(), 0);
            let packet = receiver.poll().unwrap().unwrap();
            let received: Vec<u16> = packet
                .chunks(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            assert_eq!(received, values);
        }
        assert_eq!(sender.completed_transmissions(), 4);
        assert_eq!(receiver.poll().unwrap(), None);
        assert_eq!(receiver.received(), 4);
    }

    #[test]
    fn hello_packet() {
        let (mut sender, mut receiver, pair) = link(RetryPolicy::default());
        let packet = hello();
        assert_eq!(sender.state(), HandshakeState::Idle);
        sender.send_packet(&packet).unwrap();
        assert_eq!(sender.state(), HandshakeState::Idle);
        // one Idle -> AwaitingCompletion -> Idle cycle
        assert_eq!(sender.started_transmissions(), 1);
        assert_eq!(sender.completed_transmissions(), 1);
        {
            let chip = pair.tx.borrow();
            assert_eq!(chip.uploads, 1);
            let uploads: Vec<&Vec<u8>> = chip
                .log
                .iter()
                .filter(|t| t[0] == commands::W_TX_PAYLOAD)
                .collect();
            assert_eq!(uploads.len(), 1);
            assert_eq!(&uploads[0][1..], &packet[..]);
            // IRQ flags were released after completion
            assert_eq!(chip.irq_flags(), 0);
        }
        assert_eq!(receiver.receive_packet().unwrap(), packet);
    }

    #[test]
    fn handshake_follows_transmission() {
        let pair = SimPair::new();
        let mut radio = pair.tx_radio(LinkConfig::default());
        radio.enter_tx_mode().unwrap();
        let policy = RetryPolicy::default();
        let mut handshake = Handshake::new(pair.signal);
        assert_eq!(handshake.state(), HandshakeState::Idle);

        handshake.arm();
        assert_eq!(handshake.state(), HandshakeState::AwaitingCompletion);
        radio.upload_payload(&hello()).unwrap();
        // nothing leaves the chip before CE is pulsed
        assert!(!handshake.poll());
        assert_eq!(handshake.state(), HandshakeState::AwaitingCompletion);

        radio.pulse_ce().unwrap();
        let mut polls = 0;
        while !handshake.poll() {
            polls += 1;
            assert!(polls < policy.poll_limit(), "completion never arrived");
            radio.delay_us(policy.poll_interval_us());
        }
        assert_eq!(handshake.state(), HandshakeState::Idle);
        assert_eq!(handshake.armed(), 1);
        assert_eq!(handshake.completed(), 1);
        // the signal was consumed exactly once
        assert!(!handshake.poll());
        assert!(!pair.signal.is_pending());
    }

    #[test]
    fn flush_pads_with_zeros() {
        let (mut sender, mut receiver, _pair) = link(RetryPolicy::default());
        for byte in b"Hello!" {
            sender.append_byte(*byte).unwrap();
        }
        assert_eq!(receiver.poll().unwrap(), None);
        sender.flush().unwrap();
        assert_eq!(sender.pending(), 0);
        assert_eq!(receiver.poll().unwrap(), Some(hello()));
        // nothing left to flush
        sender.flush().unwrap();
        assert_eq!(sender.completed_transmissions(), 1);
    }

    #[test]
    fn address_write_is_one_frame() {
        let (_sender, _receiver, pair) = link(RetryPolicy::default());
        let chip = pair.tx.borrow();
        let tx_addr: Vec<&Vec<u8>> = chip
            .log
            .iter()
            .filter(|t| t[0] == registers::TX_ADDR | commands::W_REGISTER)
            .collect();
        assert_eq!(tx_addr.len(), 1);
        assert_eq!(tx_addr[0].as_slice(), &[0x30, 0x0F, 0x0E, 0x0F, 0x0E, 0x0F]);
    }

    #[test]
    fn stale_receive_repeats() {
        let (mut sender, mut receiver, _pair) = link(RetryPolicy::default());
        sender.send_packet(&hello()).unwrap();
        let first = receiver.receive_packet().unwrap();
        assert!(!receiver.available().unwrap());
        let second = receiver.receive_packet().unwrap();
        assert_eq!(first, hello());
        assert_eq!(second, first);
    }

    #[test]
    fn lost_interrupt_is_retried() {
        let (mut sender, mut receiver, pair) = link(RetryPolicy::default());
        pair.tx.borrow_mut().irq.drop_next = 1;
        sender.send_packet(&hello()).unwrap();
        assert_eq!(sender.state(), HandshakeState::Idle);
        assert_eq!(sender.completed_transmissions(), 1);
        assert_eq!(pair.tx.borrow().uploads, 2);
        // the first copy did go out; only its interrupt was lost
        assert_eq!(receiver.poll().unwrap(), Some(hello()));
        assert_eq!(receiver.poll().unwrap(), Some(hello()));
        assert_eq!(receiver.poll().unwrap(), None);
    }

    #[test]
    fn link_timeout() {
        let policy = RetryPolicy::default().with_max_retries(3);
        let (mut sender, mut receiver, pair) = link(policy);
        pair.tx.borrow_mut().irq.drop_next = 4;
        assert_eq!(sender.send_packet(&hello()), Err(LinkError::LinkTimeout));
        assert_eq!(sender.state(), HandshakeState::Idle);
        assert_eq!(sender.completed_transmissions(), 0);
        {
            let chip = pair.tx.borrow();
            assert_eq!(chip.uploads, 4);
            assert_eq!(chip.tx_fifo_len(), 0);
            assert_eq!(chip.irq_flags(), 0);
        }
        // every attempt went out; the RX FIFO keeps the first 3
        for _ in 0..3 {
            assert_eq!(receiver.poll().unwrap(), Some(hello()));
        }
        assert_eq!(receiver.poll().unwrap(), None);

        // the link recovers on the next packet
        sender.send_packet(&[7u8; PACKET_LENGTH]).unwrap();
        assert_eq!(sender.completed_transmissions(), 1);
        assert_eq!(receiver.poll().unwrap(), Some([7u8; PACKET_LENGTH]));
    }

    #[test]
    fn late_interrupt_is_not_counted_twice() {
        let policy = RetryPolicy::default();
        let (mut sender, _receiver, pair) = link(policy);
        let budget_ns = policy.poll_limit() as u64 * policy.poll_interval_us() as u64 * 1000;
        pair.tx
            .borrow_mut()
            .irq
            .latencies
            .push_back(budget_ns + budget_ns / 2);
        sender.send_packet(&hello()).unwrap();
        assert_eq!(sender.completed_transmissions(), 1);
        assert_eq!(pair.tx.borrow().uploads, 2);
        // the first attempt's interrupt is still in flight; it completes
        // at most one transmission
        for expected in 2..5 {
            sender.send_packet(&hello()).unwrap();
            assert_eq!(sender.completed_transmissions(), expected);
        }
        assert_eq!(pair.tx.borrow().uploads, 5);
    }

    #[test]
    fn fuzzed_interrupt_timing() {
        const ROUNDS: usize = 200;
        let policy = RetryPolicy::default();
        let budget_ns = policy.poll_limit() as u64 * policy.poll_interval_us() as u64 * 1000;
        let (mut sender, mut receiver, pair) = link(policy);
        let mut rng = StdRng::seed_from_u64(0x6E52_4634);
        for _ in 0..ROUNDS {
            {
                let mut chip = pair.tx.borrow_mut();
                let latency = rng.gen_range(0..budget_ns / 2);
                chip.irq.latencies.push_back(latency);
                chip.irq.duplicate = rng.gen_bool(0.25);
            }
            let mut packet = [0u8; PACKET_LENGTH];
            rng.fill(&mut packet[..]);
            sender.send_packet(&packet).unwrap();
            assert_eq!(sender.state(), HandshakeState::Idle);
            assert_eq!(receiver.poll().unwrap(), Some(packet));
        }
        assert_eq!(sender.completed_transmissions(), ROUNDS as u32);
        assert_eq!(pair.tx.borrow().uploads, ROUNDS);
        assert_eq!(pair.tx.borrow().transmitted, ROUNDS);
    }

    #[test]
    fn short_ce_pulse_does_not_transmit() {
        let pair = SimPair::new();
        let mut radio = pair.tx_radio(LinkConfig::default());
        radio.enter_tx_mode().unwrap();
        radio.upload_payload(&hello()).unwrap();
        radio.ce_pin.set_high().unwrap();
        radio.ce_pin.set_low().unwrap();
        assert_eq!(pair.tx.borrow().transmitted, 0);
        assert_eq!(pair.tx.borrow().tx_fifo_len(), 1);
        radio.pulse_ce().unwrap();
        assert_eq!(pair.tx.borrow().transmitted, 1);
        assert_eq!(pair.tx.borrow().tx_fifo_len(), 0);
    }

    #[test]
    fn register_tables_read_back() {
        let pair = SimPair::new();
        let config = LinkConfig::default();
        let mut radio = pair.tx_radio(config);
        for mode in [Mode::Receive, Mode::Transmit, Mode::Receive, Mode::Transmit] {
            radio.configure(mode).unwrap();
            assert_eq!(radio.mode(), Some(mode));
            let table = radio.query_register_table(mode).unwrap();
            assert_eq!(table, config.register_table(mode));
            let expected_config = match mode {
                Mode::Transmit => 0x1A,
                Mode::Receive => 0x1B,
            };
            assert_eq!(table[0].data(), &[expected_config]);
        }
    }

    #[test]
    fn custom_config_round_trip() {
        let pair = SimPair::new();
        let config = LinkConfig::default()
            .with_channel(42)
            .with_address_length(5)
            .with_address(&[1, 2, 3, 4, 5]);
        let mut tx = pair.tx_radio(config);
        tx.enter_tx_mode().unwrap();
        let mut rx = pair.rx_radio(config);
        rx.enter_rx_mode().unwrap();
        let mut sender = Sender::new(tx, pair.signal, RetryPolicy::default());
        let mut receiver = Receiver::new(rx);
        sender.send_packet(&hello()).unwrap();
        assert_eq!(receiver.poll().unwrap(), Some(hello()));
    }

    #[test]
    fn mismatched_channel_is_not_heard() {
        let pair = SimPair::new();
        let mut tx = pair.tx_radio(LinkConfig::default());
        tx.enter_tx_mode().unwrap();
        let mut rx = pair.rx_radio(LinkConfig::default().with_channel(5));
        rx.enter_rx_mode().unwrap();
        let mut sender = Sender::new(tx, pair.signal, RetryPolicy::default());
        let mut receiver = Receiver::new(rx);
        // without auto-ACK the sender cannot tell
        sender.send_packet(&hello()).unwrap();
        assert_eq!(receiver.poll().unwrap(), None);
    }

    struct Ramp(u16);

    impl SampleSource for Ramp {
        fn sample_channel(&mut self, channel: u8) -> u16 {
            self.0 = self.0.wrapping_add(1);
            (channel as u16) << 12 | self.0
        }
    }

    struct VecSink(Vec<u8>);

    impl ByteSink for VecSink {
        type SinkErrorType = Infallible;

        fn emit_byte(&mut self, byte: u8) -> Result<(), Self::SinkErrorType> {
            self.0.push(byte);
            Ok(())
        }
    }

    #[test]
    fn samples_to_host() {
        let (mut sender, mut receiver, _pair) = link(RetryPolicy::default());
        let mut source = Ramp(0);
        let mut framer = ReportFramer::new(VecSink(Vec::new()), ReportConfig::default());
        // 64 data bytes per frame = 2 packets = 16 pairs of samples
        for _ in 0..16 {
            sender.append_samples(&mut source, 2).unwrap();
            while let Some(packet) = receiver.poll().unwrap() {
                framer.write_packet(&packet).unwrap();
            }
        }
        assert_eq!(sender.completed_transmissions(), 2);
        let sink = framer.release();
        assert_eq!(sink.0.len(), 4 + 64 + 1);
        assert_eq!(&sink.0[..4], &[b'\n', 2, 2, 64]);
        assert_eq!(&sink.0[4..8], &[0x00, 0x01, 0x10, 0x02]);
        assert_eq!(sink.0[68], 0xFF);
    }
}
