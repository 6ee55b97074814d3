//! Action sinks connecting step tables to the node's outputs

use super::step::ActionSink;
use super::tables::{ControlAction, ScreenAction};
use crate::traits::{Alarm, AlarmError, CharDisplay, Motor, MotorDirection, MotorError};

/// Errors from the control node's actuators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    Motor(MotorError),
    Alarm(AlarmError),
}

impl From<MotorError> for ActuatorError {
    fn from(e: MotorError) -> Self {
        ActuatorError::Motor(e)
    }
}

impl From<AlarmError> for ActuatorError {
    fn from(e: AlarmError) -> Self {
        ActuatorError::Alarm(e)
    }
}

/// Door motor and buzzer of the control node
pub struct ControlActuators<M, B> {
    pub motor: M,
    pub alarm: B,
}

impl<M: Motor, B: Alarm> ControlActuators<M, B> {
    pub fn new(motor: M, alarm: B) -> Self {
        Self { motor, alarm }
    }

    /// Stop the motor and silence the buzzer
    pub fn safe_state(&mut self) -> Result<(), ActuatorError> {
        self.motor.set_motor(MotorDirection::Stop, 0)?;
        self.alarm.set_alarm(false)?;
        Ok(())
    }
}

impl<M: Motor, B: Alarm> ActionSink<ControlAction> for ControlActuators<M, B> {
    type Error = ActuatorError;

    fn apply(&mut self, action: ControlAction) -> Result<(), ActuatorError> {
        match action {
            ControlAction::Motor(direction, speed) => self.motor.set_motor(direction, speed)?,
            ControlAction::Alarm(on) => self.alarm.set_alarm(on)?,
        }
        Ok(())
    }

    fn halt(&mut self) -> Result<(), ActuatorError> {
        self.safe_state()
    }
}

/// HMI display used as the target of screen tables
pub struct ScreenSink<D> {
    display: D,
}

impl<D: CharDisplay> ScreenSink<D> {
    pub fn new(display: D) -> Self {
        Self { display }
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn into_inner(self) -> D {
        self.display
    }
}

impl<D: CharDisplay> ActionSink<ScreenAction> for ScreenSink<D> {
    type Error = D::Error;

    fn apply(&mut self, action: ScreenAction) -> Result<(), D::Error> {
        match action {
            ScreenAction::ShowUnlocking => {
                self.display.clear()?;
                self.display.show_text(0, 4, "Door is")?;
                self.display.show_text(1, 3, "Unlocking")
            }
            ScreenAction::Clear => self.display.clear(),
            // Written at the home position left by the preceding clear
            ScreenAction::ShowLocking => self.display.show_text(0, 0, "Door is Locking"),
            ScreenAction::ShowError => {
                self.display.clear()?;
                self.display.show_text(0, 5, "ERROR")
            }
        }
    }

    fn halt(&mut self) -> Result<(), D::Error> {
        self.display.clear()
    }
}
