//! Control node main loop

use defmt::*;
use doorlock_core::node::{ControlError, ControlNode};
use doorlock_core::sequencer::{ControlAction, SequenceRunner};
use doorlock_hal::{ByteStorage, UartRx, UartTx};
use embedded_hal::delay::DelayNs;

/// Step the node forever, logging every transition and fault
pub fn run<U, D, S, W, R, E>(mut node: ControlNode<U, D, S, W, R>) -> !
where
    U: UartTx<Error = E> + UartRx<Error = E>,
    D: DelayNs,
    S: ByteStorage,
    S::Error: Format,
    W: DelayNs,
    R: SequenceRunner<Action = ControlAction>,
    E: Format,
{
    loop {
        match node.step() {
            Ok(t) if t.changed() => info!("{} -> {} on {}", t.from, t.to, t.event),
            Ok(t) => debug!("Staying in {} after {}", t.to, t.event),
            Err(ControlError::Store(e)) => {
                error!("Password storage failed: {}", e);
            }
            Err(ControlError::SequenceTimeout(e)) => {
                error!("Sequence did not finish after {} ms", e.waited_ms);
            }
            Err(e) => warn!("Link fault, back to {}: {}", node.state(), e),
        }
    }
}
