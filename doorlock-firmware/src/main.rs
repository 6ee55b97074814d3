//! Doorlock - Control Node Firmware
//!
//! Main firmware binary for the RP2040 control node. Owns the stored
//! password (AT24C16 EEPROM), the door motor (H-bridge) and the alarm
//! buzzer, and answers the HMI node over UART0.
//!
//! The node main flow is blocking and runs in thread mode. Sequences are
//! ticked by a task on an interrupt executor, which preempts the main flow.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt::*;
use embassy_executor::InterruptExecutor;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::uart::{self, BufferedInterruptHandler, Uart};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use doorlock_core::config::{NodeConfig, LINK_BAUDRATE};
use doorlock_core::node::ControlNode;
use doorlock_core::password::PasswordStore;
use doorlock_core::sequencer::ControlActuators;
use doorlock_drivers::alarm::Buzzer;
use doorlock_drivers::motor::{HBridgeConfig, HBridgeMotor};
use doorlock_drivers::storage::At24c16;
use doorlock_hal::{DataBits, IoUart, Parity, StopBits, UartConfig};
use doorlock_protocol::{Link, NodeRole};

mod controller;
mod tasks;

use crate::tasks::SEQUENCER;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// PWM wrap value: 125 MHz / (12_499 + 1) = 10 kHz on the bridge enable
const PWM_TOP: u16 = 12_499;

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Runs the timer task above thread mode
static EXECUTOR_TICK: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_TICK.on_interrupt()
}

/// RP2040 UART settings for a link configuration
fn rp_uart_config(link: &UartConfig) -> uart::Config {
    let mut config = uart::Config::default();
    config.baudrate = link.baudrate;
    config.data_bits = match link.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    config.parity = match link.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    config.stop_bits = match link.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    config
}

#[entry]
fn main() -> ! {
    info!("Doorlock control node starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Door motor: IN1=GPIO3, IN2=GPIO6, EN=GPIO2 (PWM1 A)
    let mut pwm_config = pwm::Config::default();
    pwm_config.top = PWM_TOP;
    let (enable, _) = Pwm::new_output_a(p.PWM_SLICE1, p.PIN_2, pwm_config).split();
    let motor = unwrap!(HBridgeMotor::new(
        Output::new(p.PIN_3, Level::Low),
        Output::new(p.PIN_6, Level::Low),
        unwrap!(enable),
        HBridgeConfig::default(),
    ));

    // Buzzer through an NPN transistor on GPIO7
    let buzzer = unwrap!(Buzzer::new_active_high(Output::new(p.PIN_7, Level::Low)));
    info!("Motor and buzzer initialized");

    // EEPROM on I2C0 (GPIO4=SDA, GPIO5=SCL)
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c::Config::default());
    let store = PasswordStore::new(At24c16::new(i2c), Delay);
    info!("EEPROM initialized, password at {=u16:#x}", store.base_address());

    // Link to the HMI node on UART0 (GPIO0=TX, GPIO1=RX)
    let link_config = UartConfig {
        baudrate: LINK_BAUDRATE,
        ..UartConfig::default()
    };

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 64]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, rp_uart_config(&link_config));
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let link = Link::new(IoUart::new(uart), Delay, NodeRole::Control);
    info!("UART initialized at {} baud", link_config.baudrate);

    // Timer task preempts the blocking main flow
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let spawner = EXECUTOR_TICK.start(interrupt::SWI_IRQ_1);
    spawner
        .spawn(tasks::tick_task(ControlActuators::new(motor, buzzer)))
        .unwrap();

    let node = ControlNode::new(link, store, SEQUENCER.handle(), NodeConfig::default());
    info!("Control node running");
    controller::run(node)
}
