//! Sequencer timer task
//!
//! Fires the actuator sequencer on the interrupt executor. The actuators
//! live here; the main flow only starts sequences and polls for completion.

use defmt::*;
use doorlock_core::sequencer::{ControlAction, ControlActuators, TickOutcome};
use doorlock_drivers::alarm::Buzzer;
use doorlock_drivers::motor::HBridgeMotor;
use doorlock_hal_embassy::{firings, run_ticks, SequencerCell};
use embassy_rp::gpio::Output;
use embassy_rp::pwm::PwmOutput;

/// Actuator sequencer shared with the main flow
pub static SEQUENCER: SequencerCell<ControlAction> = SequencerCell::new();

pub type DoorMotor = HBridgeMotor<Output<'static>, Output<'static>, PwmOutput<'static>>;

pub type Actuators = ControlActuators<DoorMotor, Buzzer<Output<'static>>>;

#[embassy_executor::task]
pub async fn tick_task(mut actuators: Actuators) {
    info!("Tick task started");

    if let Err(e) = actuators.safe_state() {
        error!("Failed to reach safe state: {}", e);
    }

    run_ticks(&SEQUENCER, &mut actuators, |outcome| match outcome {
        Ok(TickOutcome::Fired {
            index,
            action,
            complete,
        }) => {
            debug!("Step {} fired: {} (complete={})", index, action, complete);
        }
        Ok(TickOutcome::Chunk) => trace!("Intermediate firing #{}", firings()),
        Ok(TickOutcome::Halted) => warn!("Sequence aborted, actuators stopped"),
        Ok(TickOutcome::Inactive) => warn!("Spurious timer firing"),
        Err(e) => error!("Actuator failed: {}", e),
    })
    .await;
}
