use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{commands, registers, RadioHandle, CE_PULSE_US};
use crate::{
    log::debug,
    radio::{
        prelude::{EsbFifo, EsbPayloadLength, EsbPipe, EsbRadio, EsbStatus},
        register_map::{FifoStatus, ObserveTx},
    },
    RadioError, RadioMode, StatusFlags,
};

impl<SPI, DO, DELAY> EsbRadio for RadioHandle<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    fn as_rx(&mut self) -> Result<(), Self::Error> {
        self.require_powered()?;
        if self.mode() == RadioMode::ActiveTx {
            // let a pending CE pulse finish
            self.delay_impl.delay_us(CE_PULSE_US);
        }
        self.config_reg = self.config_reg.with_prim_rx(true);
        self.write_reg(registers::CONFIG, self.config_reg.into_bits())?;
        self.clear_status_flags(StatusFlags::new())?;

        // TX mode borrowed pipe 0 for ACK packets
        if let Some(address) = self.pipe0_rx_addr {
            let aw = self.address_length as usize;
            self.write_reg_buf(registers::RX_ADDR_P0, &address[..aw])?;
        } else {
            self.close_rx_pipe(0)?;
        }
        self.set_ce(true)
    }

    fn as_tx(&mut self) -> Result<(), Self::Error> {
        self.require_powered()?;
        if self.mode() == RadioMode::ActiveTx {
            // let a pending CE pulse finish
            self.delay_impl.delay_us(CE_PULSE_US);
        }
        self.set_ce(false)?;

        // an outgoing ACK packet may still be on air
        self.delay_impl.delay_us(self.tx_delay);
        if self.feature.en_ack_pay() {
            // leftover ACK payloads would be transmitted as regular payloads
            self.flush_tx()?;
        }

        self.config_reg = self.config_reg.with_prim_rx(false);
        self.write_reg(registers::CONFIG, self.config_reg.into_bits())?;

        let aw = self.address_length as usize;
        let address = self.tx_address;
        self.write_reg_buf(registers::RX_ADDR_P0, &address[..aw])?;
        let enabled = self.read_reg(registers::EN_RXADDR)?;
        self.write_reg(registers::EN_RXADDR, enabled | 1)
    }

    fn is_rx(&self) -> bool {
        self.config_reg.prim_rx()
    }

    fn mode(&self) -> RadioMode {
        if !self.config_reg.pwr_up() {
            RadioMode::PowerDown
        } else if !self.ce_active {
            RadioMode::Standby
        } else if self.config_reg.prim_rx() {
            RadioMode::ActiveRx
        } else {
            RadioMode::ActiveTx
        }
    }

    /// See [`EsbRadio::send()`] for implementation-agnostic detail.
    ///
    /// The TX FIFO is flushed first, so only `buf` is transmitted.
    /// The CE pin is inactive when this function returns.
    fn send(&mut self, buf: &[u8], ask_no_ack: bool) -> Result<bool, Self::Error> {
        self.require_tx()?;
        self.set_ce(false)?;
        self.flush_tx()?;
        match self.write(buf, ask_no_ack, true) {
            Err(RadioError::FifoFull) => return Ok(false),
            result => result?,
        }
        self.delay_impl.delay_us(CE_PULSE_US);
        let result = self.wait_for_tx_result()?;
        self.set_ce(false)?;
        Ok(result)
    }

    /// See [`EsbRadio::write()`] for implementation-agnostic detail.
    ///
    /// <div class="warning">
    ///
    /// A transmission only starts after the CE pin has been active for
    /// 10 µs. With `start_tx = true`, the caller must keep the CE pin
    /// active (by not calling other mode changing functions) for that long.
    ///
    /// </div>
    ///
    /// Payloads longer than 32 bytes are truncated. With static payload
    /// lengths, `buf` is also truncated or zero-padded to the static length.
    fn write(&mut self, buf: &[u8], ask_no_ack: bool, start_tx: bool) -> Result<(), Self::Error> {
        self.require_tx()?;
        self.clear_status_flags(StatusFlags::from_bits(0).with_tx_ds(true).with_tx_df(true))?;
        if self.status.tx_full() {
            debug!("TX FIFO is full");
            return Err(RadioError::FifoFull);
        }

        let command = if ask_no_ack && self.feature.en_dyn_ack() {
            commands::W_TX_PAYLOAD_NO_ACK
        } else {
            commands::W_TX_PAYLOAD
        };
        let len = buf.len().min(32);
        if self.dynamic_pipes & 1 == 1 {
            self.write_command_buf(command, &buf[..len])?;
        } else {
            let static_len = self.payload_lengths[0] as usize;
            let len = len.min(static_len);
            self.buf[0] = command;
            self.buf[1..=len].copy_from_slice(&buf[..len]);
            self.buf[len + 1..=static_len].fill(0);
            self.transfer(static_len + 1)?;
        }

        if start_tx {
            self.set_ce(true)?;
        }
        Ok(())
    }

    fn resend(&mut self) -> Result<bool, Self::Error> {
        self.rewrite()?;
        self.delay_impl.delay_us(CE_PULSE_US);
        let result = self.wait_for_tx_result()?;
        self.set_ce(false)?;
        Ok(result)
    }

    fn rewrite(&mut self) -> Result<(), Self::Error> {
        self.require_tx()?;
        self.set_ce(false)?;
        self.clear_status_flags(StatusFlags::from_bits(0).with_tx_ds(true).with_tx_df(true))?;
        self.read_buf(commands::REUSE_TX_PL, 0)?;
        self.set_ce(true)
    }

    fn get_last_arc(&mut self) -> Result<u8, Self::Error> {
        Ok(ObserveTx::from_bits(self.read_reg(registers::OBSERVE_TX)?).arc_cnt())
    }

    /// See [`EsbRadio::read()`] for implementation-agnostic detail.
    ///
    /// A payload is removed from the RX FIFO once any part of it is read,
    /// so a `len` shorter than the payload discards the remaining bytes.
    fn read(&mut self, buf: &mut [u8], len: Option<u8>) -> Result<u8, Self::Error> {
        self.require_powered()?;
        let fifo = FifoStatus::from_bits(self.read_reg(registers::FIFO_STATUS)?);
        if fifo.rx_empty() {
            return Ok(0);
        }
        let pipe = self.status.rx_pipe();
        let length = match len {
            Some(len) => len,
            None if self.dynamic_pipes & (1 << pipe) != 0 => self.get_dynamic_payload_length()?,
            None => self
                .payload_lengths
                .get(pipe as usize)
                .copied()
                .unwrap_or(32),
        };
        let length = (buf.len().min(32) as u8).min(length);
        if length == 0 {
            return Ok(0);
        }
        let end = length as usize;
        self.read_buf(commands::R_RX_PAYLOAD, end)?;
        buf[..end].copy_from_slice(&self.buf[1..=end]);
        self.clear_status_flags(StatusFlags::from_bits(0).with_rx_dr(true))?;
        Ok(length)
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use crate::radio::prelude::{EsbAutoAck, EsbFifo, EsbRadio};
    use crate::radio::{commands, registers, RadioHandle};
    use crate::{spi_test_expects, test::mk_radio, RadioError, RadioMode};
    use core::cell::RefCell;
    use embedded_hal::delay::DelayNs;
    use embedded_hal_mock::eh1::{
        digital::{Mock as PinMock, State as PinState, Transaction as PinTransaction},
        spi::{Mock as SpiMock, Transaction as SpiTransaction},
    };
    use std::{rc::Rc, vec, vec::Vec};

    use crate::radio::register_map::FeatureReg;

    #[test]
    fn as_rx() {
        let ce_expectations = [PinTransaction::set(PinState::High)];
        let spi_expectations = spi_test_expects![
            // assert PRIM_RX flag
            (
                vec![registers::CONFIG | commands::W_REGISTER, 0xFu8],
                vec![0xEu8, 0u8],
            ),
            // clear_status_flags()
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x70u8],
                vec![0xEu8, 0u8],
            ),
            // close_rx_pipe(0)
            (vec![registers::EN_RXADDR, 0u8], vec![0xEu8, 3u8]),
            (
                vec![registers::EN_RXADDR | commands::W_REGISTER, 2u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.config_reg = radio.config_reg.with_pwr_up(true);
        radio.as_rx().unwrap();
        assert!(radio.is_rx());
        assert_eq!(radio.mode(), RadioMode::ActiveRx);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn as_rx_restores_pipe0() {
        let ce_expectations = [PinTransaction::set(PinState::High)];
        let mut address = [0x55u8; 6];
        address[0] = registers::RX_ADDR_P0 | commands::W_REGISTER;
        let spi_expectations = spi_test_expects![
            (
                vec![registers::CONFIG | commands::W_REGISTER, 0xFu8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x70u8],
                vec![0xEu8, 0u8],
            ),
            (address.to_vec(), vec![0xEu8, 0u8, 0u8, 0u8, 0u8, 0u8]),
        ];
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.config_reg = radio.config_reg.with_pwr_up(true);
        radio.pipe0_rx_addr = Some([0x55; 5]);
        radio.as_rx().unwrap();
        spi.done();
        ce_pin.done();
    }

    /// Records every requested delay (in nanoseconds).
    #[derive(Clone, Default)]
    struct DelayLog(Rc<RefCell<Vec<u32>>>);

    impl DelayNs for DelayLog {
        fn delay_ns(&mut self, ns: u32) {
            self.0.borrow_mut().push(ns);
        }

        fn delay_us(&mut self, us: u32) {
            self.0.borrow_mut().push(us * 1000);
        }
    }

    #[test]
    fn as_rx_waits_for_ce_pulse() {
        let ce_expectations = [
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::High),
        ];
        let mut payload = [0u8; 33];
        payload[0] = commands::W_TX_PAYLOAD;
        payload[1..9].copy_from_slice(&[0x55; 8]);
        let spi_expectations = spi_test_expects![
            // write(.., start_tx = true)
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x30u8],
                vec![0xEu8, 0u8],
            ),
            (payload.to_vec(), vec![0xEu8; 33]),
            // as_rx()
            (
                vec![registers::CONFIG | commands::W_REGISTER, 0xFu8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x70u8],
                vec![0xEu8, 0u8],
            ),
            (vec![registers::EN_RXADDR, 0u8], vec![0xEu8, 3u8]),
            (
                vec![registers::EN_RXADDR | commands::W_REGISTER, 2u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mut spi = SpiMock::new(&spi_expectations);
        let mut ce_pin = PinMock::new(&ce_expectations);
        let delays = DelayLog::default();
        let mut radio = RadioHandle::new(ce_pin.clone(), spi.clone(), delays.clone());
        radio.config_reg = radio.config_reg.with_pwr_up(true);
        radio.write(&[0x55; 8], false, true).unwrap();
        assert_eq!(radio.mode(), RadioMode::ActiveTx);
        assert!(delays.0.borrow().is_empty());
        radio.as_rx().unwrap();
        assert_eq!(*delays.0.borrow(), [10_000]);
        assert_eq!(radio.mode(), RadioMode::ActiveRx);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn as_tx_from_rx() {
        let ce_expectations = [PinTransaction::set(PinState::Low)];
        let mut address = [0xE7u8; 6];
        address[0] = registers::RX_ADDR_P0 | commands::W_REGISTER;
        let spi_expectations = spi_test_expects![
            // flush_tx() of leftover ACK payloads
            (vec![commands::FLUSH_TX], vec![0xEu8]),
            // clear PRIM_RX flag
            (
                vec![registers::CONFIG | commands::W_REGISTER, 0xEu8],
                vec![0xEu8, 0u8],
            ),
            // TX address on pipe 0 for ACK packets
            (address.to_vec(), vec![0xEu8, 0u8, 0u8, 0u8, 0u8, 0u8]),
            (vec![registers::EN_RXADDR, 0u8], vec![0xEu8, 2u8]),
            (
                vec![registers::EN_RXADDR | commands::W_REGISTER, 3u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.config_reg = radio.config_reg.with_pwr_up(true).with_prim_rx(true);
        radio.ce_active = true;
        radio.feature = FeatureReg::new().with_en_dpl(true).with_en_ack_pay(true);
        assert_eq!(radio.mode(), RadioMode::ActiveRx);
        radio.as_tx().unwrap();
        assert_eq!(radio.mode(), RadioMode::Standby);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn powered_down_rejects_operations() {
        let mocks = mk_radio(&[], &[]);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let expected = Err(RadioError::InvalidState(RadioMode::PowerDown));
        let mut buf = [0u8; 32];
        assert_eq!(radio.write(&[0x55; 8], false, false), expected);
        assert_eq!(radio.send(&[0x55; 8], false).map(|_| ()), expected);
        assert_eq!(radio.read(&mut buf, None).map(|_| ()), expected);
        assert_eq!(radio.rewrite(), expected);
        assert_eq!(radio.resend().map(|_| ()), expected);
        assert_eq!(radio.as_rx(), expected);
        assert_eq!(radio.as_tx(), expected);
        radio.feature = FeatureReg::new().with_en_dpl(true).with_en_ack_pay(true);
        assert_eq!(radio.write_ack_payload(1, &[0x55; 4]).map(|_| ()), expected);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn rx_mode_rejects_tx_operations() {
        let mocks = mk_radio(&[], &[]);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.config_reg = radio.config_reg.with_pwr_up(true).with_prim_rx(true);
        radio.ce_active = true;
        let expected = Err(RadioError::InvalidState(RadioMode::ActiveRx));
        assert_eq!(radio.write(&[0x55; 8], false, false), expected);
        assert_eq!(radio.send(&[0x55; 8], false).map(|_| ()), expected);
        assert_eq!(radio.rewrite(), expected);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn fourth_write_fills_fifo() {
        let mut payload = [0u8; 33];
        payload[0] = commands::W_TX_PAYLOAD;
        payload[1..9].copy_from_slice(&[0x55; 8]);
        let clear_tx_events = vec![registers::STATUS | commands::W_REGISTER, 0x30u8];

        let spi_expectations = spi_test_expects![
            (clear_tx_events.clone(), vec![0xEu8, 0u8]),
            (payload.to_vec(), vec![0xEu8; 33]),
            (clear_tx_events.clone(), vec![0xEu8, 0u8]),
            (payload.to_vec(), vec![0xEu8; 33]),
            (clear_tx_events.clone(), vec![0xEu8, 0u8]),
            (payload.to_vec(), vec![0xFu8; 33]),
            // TX_FULL asserted
            (clear_tx_events, vec![0xFu8, 0u8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.config_reg = radio.config_reg.with_pwr_up(true);
        for _ in 0..3 {
            radio.write(&[0x55; 8], false, false).unwrap();
        }
        assert_eq!(
            radio.write(&[0x55; 8], false, false),
            Err(RadioError::FifoFull)
        );
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn ask_no_ack() {
        let mut static_buf = [0u8; 33];
        static_buf[0] = commands::W_TX_PAYLOAD;
        static_buf[1..9].copy_from_slice(&[0x55; 8]);
        let mut dyn_buf = [0x55u8; 9];
        dyn_buf[0] = commands::W_TX_PAYLOAD_NO_ACK;
        let clear_tx_events = vec![registers::STATUS | commands::W_REGISTER, 0x30u8];

        let spi_expectations = spi_test_expects![
            (clear_tx_events.clone(), vec![0xEu8, 0u8]),
            // not allowed by FEATURE, so a regular payload
            (static_buf.to_vec(), vec![0u8; 33]),
            (clear_tx_events, vec![0xEu8, 0u8]),
            (dyn_buf.to_vec(), vec![0u8; 9]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.config_reg = radio.config_reg.with_pwr_up(true);
        radio.write(&[0x55; 8], true, false).unwrap();
        radio.feature = FeatureReg::new().with_en_dpl(true).with_en_dyn_ack(true);
        radio.dynamic_pipes = 0x3F;
        radio.write(&[0x55; 8], true, false).unwrap();
        spi.done();
        ce_pin.done();
    }

    fn send_parametrized(nop_status: u8, tx_timeout: u32, nop_count: usize, expected: bool) {
        let ce_expectations = [
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ];
        let mut payload = [0u8; 33];
        payload[0] = commands::W_TX_PAYLOAD;
        payload[1..9].copy_from_slice(&[0x55; 8]);

        let mut spi_expectations = spi_test_expects![
            (vec![commands::FLUSH_TX], vec![0xEu8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x30u8],
                vec![0xEu8, 0u8],
            ),
            (payload.to_vec(), vec![0u8; 33]),
        ]
        .to_vec();
        for _ in 0..nop_count {
            spi_expectations.extend(spi_test_expects![(
                vec![commands::NOP],
                vec![nop_status],
            ),]);
        }
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.config_reg = radio.config_reg.with_pwr_up(true);
        radio.tx_timeout = tx_timeout;
        assert_eq!(radio.send(&[0x55; 8], false), Ok(expected));
        assert_eq!(radio.mode(), RadioMode::Standby);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn send_acknowledged() {
        send_parametrized(0x2E, 100_000, 1, true);
    }

    #[test]
    fn send_max_retries() {
        send_parametrized(0x1E, 100_000, 1, false);
    }

    #[test]
    fn send_timeout() {
        // polls at 0, 50 and 100 µs
        send_parametrized(0xE, 100, 3, false);
    }

    #[test]
    fn send_with_full_fifo() {
        let ce_expectations = [PinTransaction::set(PinState::Low)];
        let spi_expectations = spi_test_expects![
            (vec![commands::FLUSH_TX], vec![0xEu8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x30u8],
                vec![0xFu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.config_reg = radio.config_reg.with_pwr_up(true);
        assert_eq!(radio.send(&[0x55; 8], false), Ok(false));
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn rewrite_reuses_payload() {
        let ce_expectations = [
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ];
        let spi_expectations = spi_test_expects![
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x30u8],
                vec![0xEu8, 0u8],
            ),
            (vec![commands::REUSE_TX_PL], vec![0xEu8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x30u8],
                vec![0xEu8, 0u8],
            ),
            (vec![commands::REUSE_TX_PL], vec![0xEu8]),
            // only one payload in the TX FIFO
            (vec![registers::FIFO_STATUS, 0u8], vec![0xEu8, 0x41u8]),
        ];
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.config_reg = radio.config_reg.with_pwr_up(true);
        radio.rewrite().unwrap();
        radio.rewrite().unwrap();
        assert_eq!(radio.mode(), RadioMode::ActiveTx);
        assert_eq!(
            radio.get_fifo_state(true).unwrap(),
            crate::FifoState::PartiallyFull
        );
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn resend_bounded() {
        let mut ce_expectations = vec![];
        let mut spi_expectations = vec![];
        for status in [0x1Eu8, 0x2E] {
            ce_expectations.extend([
                PinTransaction::set(PinState::Low),
                PinTransaction::set(PinState::High),
                PinTransaction::set(PinState::Low),
            ]);
            spi_expectations.extend(spi_test_expects![
                (
                    vec![registers::STATUS | commands::W_REGISTER, 0x30u8],
                    vec![0xEu8, 0u8],
                ),
                (vec![commands::REUSE_TX_PL], vec![0xEu8]),
                (vec![commands::NOP], vec![status]),
            ]);
        }
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.config_reg = radio.config_reg.with_pwr_up(true);
        // succeeds on the second attempt
        assert!(radio.resend_bounded(3).unwrap());
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn last_arc() {
        let spi_expectations = spi_test_expects![
            (vec![registers::OBSERVE_TX, 0u8], vec![0xEu8, 0x2Fu8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert_eq!(radio.get_last_arc().unwrap(), 15);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn read_static() {
        let mut expected = [0u8; 33];
        expected[0] = commands::R_RX_PAYLOAD;
        let spi_expectations = spi_test_expects![
            // a payload from pipe 1
            (vec![registers::FIFO_STATUS, 0u8], vec![0x42u8, 0x10u8]),
            (expected.to_vec(), vec![0x55u8; 33]),
            // clear the rx_dr event
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x40u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.config_reg = radio.config_reg.with_pwr_up(true);
        radio.payload_lengths[1] = 32;
        let mut buf = [0u8; 32];
        assert_eq!(radio.read(&mut buf, None).unwrap(), 32);
        assert_eq!(buf, [0x55; 32]);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn read_ack_payload() {
        let spi_expectations = spi_test_expects![
            // ACK payloads arrive on pipe 0
            (vec![registers::FIFO_STATUS, 0u8], vec![0x60u8, 0x10u8]),
            (vec![commands::R_RX_PL_WID, 0u8], vec![0x60u8, 4u8]),
            (
                vec![commands::R_RX_PAYLOAD, 0u8, 0u8, 0u8, 0u8],
                vec![0x60u8, 1u8, 2u8, 3u8, 4u8],
            ),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x40u8],
                vec![0x2Eu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.config_reg = radio.config_reg.with_pwr_up(true);
        radio.feature = FeatureReg::new().with_en_dpl(true).with_en_ack_pay(true);
        radio.dynamic_pipes = 0x3F;
        let mut buf = [0u8; 32];
        assert_eq!(radio.read(&mut buf, None).unwrap(), 4);
        assert_eq!(buf[..4], [1, 2, 3, 4]);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn send_then_read_ack_payload() {
        let ce_expectations = [
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ];
        let mut payload = vec![commands::W_TX_PAYLOAD];
        payload.extend_from_slice(b"ping");
        let spi_expectations = spi_test_expects![
            // send()
            (vec![commands::FLUSH_TX], vec![0xEu8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x30u8],
                vec![0xEu8, 0u8],
            ),
            (payload, vec![0xEu8; 5]),
            // TX_DS with an ACK payload on pipe 0
            (vec![commands::NOP], vec![0x60u8]),
            // available()
            (vec![registers::FIFO_STATUS, 0u8], vec![0x60u8, 0x10u8]),
            // read()
            (vec![registers::FIFO_STATUS, 0u8], vec![0x60u8, 0x10u8]),
            (vec![commands::R_RX_PL_WID, 0u8], vec![0x60u8, 4u8]),
            (
                vec![commands::R_RX_PAYLOAD, 0u8, 0u8, 0u8, 0u8],
                vec![0x60u8, b'A', b'C', b'K', b'!'],
            ),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x40u8],
                vec![0x20u8, 0u8],
            ),
        ];
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.config_reg = radio.config_reg.with_pwr_up(true);
        radio.feature = FeatureReg::new().with_en_dpl(true).with_en_ack_pay(true);
        radio.dynamic_pipes = 0x3F;
        assert!(radio.send(b"ping", false).unwrap());
        assert!(radio.available().unwrap());
        let mut buf = [0u8; 32];
        assert_eq!(radio.read(&mut buf, None).unwrap(), 4);
        assert_eq!(&buf[..4], b"ACK!");
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn read_empty_and_truncated() {
        let spi_expectations = spi_test_expects![
            (vec![registers::FIFO_STATUS, 0u8], vec![0xEu8, 0x11u8]),
            (vec![registers::FIFO_STATUS, 0u8], vec![0x42u8, 0x10u8]),
            (
                vec![commands::R_RX_PAYLOAD, 0u8, 0u8],
                vec![0x42u8, 0xAAu8, 0xBBu8],
            ),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x40u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.config_reg = radio.config_reg.with_pwr_up(true);
        let mut buf = [0u8; 2];
        assert_eq!(radio.read(&mut buf, None).unwrap(), 0);
        assert_eq!(radio.read(&mut buf, Some(16)).unwrap(), 2);
        assert_eq!(buf, [0xAA, 0xBB]);
        spi.done();
        ce_pin.done();
    }
}
