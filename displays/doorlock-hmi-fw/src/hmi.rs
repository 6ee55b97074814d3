//! HMI node main loop

use defmt::*;
use doorlock_core::node::{HmiError, HmiNode};
use doorlock_core::sequencer::{ScreenAction, SequenceRunner};
use doorlock_core::traits::{CharDisplay, Keypad};
use doorlock_hal::{UartRx, UartTx};
use embedded_hal::delay::DelayNs;

/// Step the node forever, logging every transition and fault
pub fn run<U, L, K, D, R, E>(mut node: HmiNode<U, L, K, D, R>) -> !
where
    U: UartTx<Error = E> + UartRx<Error = E>,
    L: DelayNs,
    K: Keypad,
    K::Error: Format,
    D: CharDisplay,
    D::Error: Format,
    R: SequenceRunner<Action = ScreenAction>,
    E: Format,
{
    loop {
        match node.step() {
            Ok(t) if t.changed() => info!("{} -> {} on {}", t.from, t.to, t.event),
            Ok(t) => debug!("Staying in {} after {}", t.to, t.event),
            Err(HmiError::UnexpectedReply(byte)) => {
                warn!("Unexpected reply {=u8:#x}, back to {}", byte, node.state());
            }
            Err(HmiError::Keypad(e)) => error!("Keypad failed: {}", e),
            Err(HmiError::Display(e)) => error!("Display failed: {}", e),
            Err(e) => warn!("Link fault, back to {}: {}", node.state(), e),
        }
    }
}
