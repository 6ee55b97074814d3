//! Door motor trait

/// Rotation command for the door motor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorDirection {
    /// Both bridge inputs low, motor coasts
    #[default]
    Stop,
    /// Unlocking direction
    Clockwise,
    /// Locking direction
    Anticlockwise,
}

/// Errors that can occur with motor operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// Speed above 100 percent
    InvalidSpeed,
    /// Direction or PWM output could not be driven
    Output,
}

/// DC motor with direction and PWM speed control
pub trait Motor {
    /// Drive the motor in `direction` at `speed_percent` (0-100)
    ///
    /// `speed_percent` is ignored by `Stop`.
    fn set_motor(&mut self, direction: MotorDirection, speed_percent: u8) -> Result<(), MotorError>;

    /// Last commanded direction
    fn direction(&self) -> MotorDirection;
}

impl<T: Motor + ?Sized> Motor for &mut T {
    fn set_motor(&mut self, direction: MotorDirection, speed_percent: u8) -> Result<(), MotorError> {
        T::set_motor(self, direction, speed_percent)
    }

    fn direction(&self) -> MotorDirection {
        T::direction(self)
    }
}
