//! UART transport to the stove's GSM option board.
//!
//! Implements [`Transport`] on top of the ESP-IDF UART driver. Reads are
//! non-blocking (the runtime polls), writes block until the bytes are in
//! the driver's TX ring buffer, and `flush` waits for the FIFO to drain
//! so a full reply leaves the wire before the engine changes state.

use esp_idf_hal::delay::{NON_BLOCK, TickType};
use esp_idf_hal::gpio::AnyIOPin;
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::uart::{UART1, UartDriver, config::Config};
use esp_idf_hal::units::Hertz;
use esp_idf_svc::sys::EspError;
use log::info;

use crate::pins;
use crate::protocol::transport::Transport;

/// Upper bound for draining the TX FIFO after a reply.
const FLUSH_TIMEOUT_MS: u64 = 100;

pub struct UartTransport {
    driver: UartDriver<'static>,
}

impl UartTransport {
    /// Bring up UART1 at `baud_rate`, 8N1, on the stove-side pins.
    pub fn new(
        uart: impl Peripheral<P = UART1> + 'static,
        baud_rate: u32,
    ) -> Result<Self, EspError> {
        let config = Config::default().baudrate(Hertz(baud_rate));
        // SAFETY: the stove pins are reserved for this driver and not
        // handed out anywhere else.
        let (tx, rx) = unsafe {
            (
                AnyIOPin::new(pins::STOVE_UART_TX_GPIO),
                AnyIOPin::new(pins::STOVE_UART_RX_GPIO),
            )
        };
        let driver = UartDriver::new(
            uart,
            tx,
            rx,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &config,
        )?;
        info!(
            "UartTransport: UART1 {} baud (tx={}, rx={})",
            baud_rate,
            pins::STOVE_UART_TX_GPIO,
            pins::STOVE_UART_RX_GPIO
        );
        Ok(Self { driver })
    }
}

impl Transport for UartTransport {
    type Error = EspError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.driver.read(buf, NON_BLOCK)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.driver.write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.driver
            .wait_tx_done(TickType::new_millis(FLUSH_TIMEOUT_MS).ticks())
    }

    fn available(&self) -> bool {
        self.driver.remaining_read().is_ok_and(|n| n > 0)
    }
}
