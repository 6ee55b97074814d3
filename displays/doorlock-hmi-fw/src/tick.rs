//! Screen sequencer timer task

use defmt::*;
use doorlock_core::sequencer::{ScreenAction, ScreenSink, TickOutcome};
use doorlock_drivers::lcd::Hd44780;
use doorlock_hal_embassy::{run_ticks, SequencerCell, SharedDisplay};
use embassy_stm32::gpio::Output;
use embassy_time::Delay;

pub type Lcd = Hd44780<Output<'static>, Delay>;

/// Screen sequencer shared with the main flow
pub static SEQUENCER: SequencerCell<ScreenAction> = SequencerCell::new();

#[embassy_executor::task]
pub async fn tick_task(mut screen: ScreenSink<SharedDisplay<'static, Lcd>>) {
    info!("Tick task started");

    run_ticks(&SEQUENCER, &mut screen, |outcome| match outcome {
        Ok(TickOutcome::Fired { index, action, .. }) => {
            debug!("Screen step {}: {}", index, action);
        }
        Ok(TickOutcome::Chunk) => {}
        Ok(TickOutcome::Halted) => warn!("Screen sequence aborted"),
        Ok(TickOutcome::Inactive) => warn!("Spurious timer firing"),
        Err(e) => error!("Screen update failed: {}", e),
    })
    .await;
}
