//! UART transport adapter (ESP-IDF).
//!
//! Implements [`Transport`] over an `esp-idf-hal` UART driver. Reads are
//! non-blocking so the request loop never stalls the control loop; a flush
//! waits until the TX FIFO has drained onto the line.

use esp_idf_hal::delay::{BLOCK, NON_BLOCK};
use esp_idf_hal::gpio::{AnyIOPin, InputPin, OutputPin};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::uart::{Uart, UartDriver, config::Config};
use esp_idf_hal::units::Hertz;
use esp_idf_sys::EspError;
use log::info;

use crate::rpc::transport::Transport;

/// Serial link carrying RPC requests and replies.
pub struct UartTransport<'d> {
    driver: UartDriver<'d>,
}

impl<'d> UartTransport<'d> {
    /// Configure `uart` on the given pins, 8N1 at `baud_rate`, no flow control.
    pub fn new<U: Uart>(
        uart: impl Peripheral<P = U> + 'd,
        tx: impl Peripheral<P = impl OutputPin> + 'd,
        rx: impl Peripheral<P = impl InputPin> + 'd,
        baud_rate: u32,
    ) -> Result<Self, EspError> {
        let config = Config::new().baudrate(Hertz(baud_rate));
        let driver = UartDriver::new(
            uart,
            tx,
            rx,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &config,
        )?;
        info!("UART transport ready at {} baud", baud_rate);
        Ok(Self { driver })
    }
}

impl Transport for UartTransport<'_> {
    type Error = EspError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EspError> {
        self.driver.read(buf, NON_BLOCK)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, EspError> {
        self.driver.write(data)
    }

    fn flush(&mut self) -> Result<(), EspError> {
        self.driver.wait_tx_done(BLOCK)
    }

    fn available(&self) -> bool {
        self.driver.remaining_read().is_ok_and(|n| n > 0)
    }
}
