//! Doorlock HMI Firmware
//!
//! Firmware for the keypad/LCD panel (STM32F042K6). Collects passwords,
//! shows menus and progress screens, and drives the control node over
//! USART2.

#![no_std]
#![no_main]

mod hmi;
mod tick;

use core::cell::RefCell;

use cortex_m_rt::entry;
use defmt::*;
use embassy_executor::InterruptExecutor;
use embassy_stm32::bind_interrupts;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_stm32::peripherals::USART2;
use embassy_stm32::usart::{self, BufferedUart};
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use doorlock_core::config::{NodeConfig, LINK_BAUDRATE};
use doorlock_core::node::HmiNode;
use doorlock_core::sequencer::ScreenSink;
use doorlock_drivers::keypad::MatrixKeypad;
use doorlock_drivers::lcd::Hd44780;
use doorlock_hal::{DataBits, IoUart, Parity, StopBits, UartConfig};
use doorlock_hal_embassy::{DisplayCell, SharedDisplay};
use doorlock_protocol::{Link, NodeRole};

use crate::tick::{Lcd, SEQUENCER};

bind_interrupts!(struct Irqs {
    USART2 => usart::BufferedInterruptHandler<USART2>;
});

static TX_BUF: StaticCell<[u8; 32]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 32]> = StaticCell::new();

/// LCD shared by the main flow and the screen sequencer
static LCD: StaticCell<DisplayCell<Lcd>> = StaticCell::new();

/// Runs the timer task above thread mode
static EXECUTOR_TICK: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SPI1() {
    EXECUTOR_TICK.on_interrupt()
}

/// STM32 USART settings for a link configuration
fn usart_config(link: &UartConfig) -> usart::Config {
    let mut config = usart::Config::default();
    config.baudrate = link.baudrate;
    config.data_bits = match link.data_bits {
        DataBits::Seven => usart::DataBits::DataBits7,
        DataBits::Eight => usart::DataBits::DataBits8,
    };
    config.parity = match link.parity {
        Parity::None => usart::Parity::ParityNone,
        Parity::Even => usart::Parity::ParityEven,
        Parity::Odd => usart::Parity::ParityOdd,
    };
    config.stop_bits = match link.stop_bits {
        StopBits::One => usart::StopBits::STOP1,
        StopBits::Two => usart::StopBits::STOP2,
    };
    config
}

#[entry]
fn main() -> ! {
    info!("Doorlock HMI firmware starting...");

    let p = embassy_stm32::init(Default::default());

    // LCD 4-bit: RS=PA4, E=PA5, D4..D7=PA6, PA7, PB0, PB1
    let lcd = unwrap!(Hd44780::new(
        Output::new(p.PA4, Level::Low, Speed::Low),
        Output::new(p.PA5, Level::Low, Speed::Low),
        [
            Output::new(p.PA6, Level::Low, Speed::Low),
            Output::new(p.PA7, Level::Low, Speed::Low),
            Output::new(p.PB0, Level::Low, Speed::Low),
            Output::new(p.PB1, Level::Low, Speed::Low),
        ],
        Delay,
    ));
    let lcd: &'static DisplayCell<Lcd> = LCD.init(Mutex::new(RefCell::new(lcd)));
    info!("LCD initialized");

    // Keypad rows PA8..PA11 driven, columns PB3..PB6 pulled up
    let keypad = unwrap!(MatrixKeypad::new(
        [
            Output::new(p.PA8, Level::High, Speed::Low),
            Output::new(p.PA9, Level::High, Speed::Low),
            Output::new(p.PA10, Level::High, Speed::Low),
            Output::new(p.PA11, Level::High, Speed::Low),
        ],
        [
            Input::new(p.PB3, Pull::Up),
            Input::new(p.PB4, Pull::Up),
            Input::new(p.PB5, Pull::Up),
            Input::new(p.PB6, Pull::Up),
        ],
        Delay,
    ));
    info!("Keypad initialized");

    // Link to the control node (PA2=TX, PA3=RX)
    let link_config = UartConfig {
        baudrate: LINK_BAUDRATE,
        ..UartConfig::default()
    };

    let tx_buf = TX_BUF.init([0u8; 32]);
    let rx_buf = RX_BUF.init([0u8; 32]);
    let uart = unwrap!(BufferedUart::new(
        p.USART2,
        p.PA3, // RX
        p.PA2, // TX
        tx_buf,
        rx_buf,
        Irqs,
        usart_config(&link_config),
    ));
    let link = Link::new(IoUart::new(uart), Delay, NodeRole::Hmi);
    info!("UART initialized at {} baud", link_config.baudrate);

    // Timer task preempts the blocking main flow
    interrupt::SPI1.set_priority(Priority::P1);
    let spawner = EXECUTOR_TICK.start(interrupt::SPI1);
    spawner
        .spawn(tick::tick_task(ScreenSink::new(SharedDisplay::new(lcd))))
        .unwrap();

    let node = HmiNode::new(
        link,
        keypad,
        SharedDisplay::new(lcd),
        SEQUENCER.handle(),
        NodeConfig::default(),
    );
    info!("HMI node running");
    hmi::run(node)
}
