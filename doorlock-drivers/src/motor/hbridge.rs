//! DC door motor behind an H-bridge
//!
//! Two direction inputs select the rotation, a PWM channel on the bridge
//! enable input sets the speed:
//!
//! | Direction     | IN1  | IN2  |
//! |---------------|------|------|
//! | Stop          | low  | low  |
//! | Clockwise     | high | low  |
//! | Anticlockwise | low  | high |
//!
//! ```ignore
//! let mut motor = HBridgeMotor::new(in1, in2, pwm, HBridgeConfig::default())?;
//! motor.set_motor(MotorDirection::Clockwise, 100)?;
//! ```

use doorlock_core::traits::{Motor, MotorDirection, MotorError};
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

/// H-bridge motor configuration
#[derive(Debug, Clone, Default)]
pub struct HBridgeConfig {
    /// Minimum duty cycle percentage (below this the motor won't start)
    pub min_duty: u8,
}

/// Door motor driven through an H-bridge
pub struct HBridgeMotor<A, B, P> {
    in1: A,
    in2: B,
    enable: P,
    config: HBridgeConfig,
    direction: MotorDirection,
    speed: u8,
}

impl<A, B, P> HBridgeMotor<A, B, P>
where
    A: OutputPin,
    B: OutputPin,
    P: SetDutyCycle,
{
    /// Take the pins and leave the motor stopped
    pub fn new(in1: A, in2: B, enable: P, config: HBridgeConfig) -> Result<Self, MotorError> {
        let mut motor = Self {
            in1,
            in2,
            enable,
            config,
            direction: MotorDirection::Stop,
            speed: 0,
        };
        motor.set_motor(MotorDirection::Stop, 0)?;
        Ok(motor)
    }

    /// Commanded speed in percent; zero while stopped
    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn config(&self) -> &HBridgeConfig {
        &self.config
    }

    /// Release the pins
    pub fn release(self) -> (A, B, P) {
        (self.in1, self.in2, self.enable)
    }

    /// Scale the speed percentage to the actual duty cycle
    ///
    /// Maps 1-100% onto min_duty-100% so small requests still turn the rotor.
    fn scale_duty(&self, speed: u8) -> u8 {
        if speed == 0 {
            0
        } else {
            let min = self.config.min_duty.min(100) as u32;
            let range = 100 - min;
            let scaled = min + (speed as u32 * range / 100);
            scaled.min(100) as u8
        }
    }

    fn drive_inputs(&mut self, in1: bool, in2: bool) -> Result<(), MotorError> {
        self.in1
            .set_state(in1.into())
            .map_err(|_| MotorError::Output)?;
        self.in2
            .set_state(in2.into())
            .map_err(|_| MotorError::Output)
    }
}

impl<A, B, P> Motor for HBridgeMotor<A, B, P>
where
    A: OutputPin,
    B: OutputPin,
    P: SetDutyCycle,
{
    fn set_motor(&mut self, direction: MotorDirection, speed_percent: u8) -> Result<(), MotorError> {
        if speed_percent > 100 {
            return Err(MotorError::InvalidSpeed);
        }

        let speed = match direction {
            MotorDirection::Stop => 0,
            _ => speed_percent,
        };

        // Cut the drive before touching the direction inputs
        self.enable
            .set_duty_cycle_fully_off()
            .map_err(|_| MotorError::Output)?;
        match direction {
            MotorDirection::Stop => self.drive_inputs(false, false)?,
            MotorDirection::Clockwise => self.drive_inputs(true, false)?,
            MotorDirection::Anticlockwise => self.drive_inputs(false, true)?,
        }
        self.enable
            .set_duty_cycle_percent(self.scale_duty(speed))
            .map_err(|_| MotorError::Output)?;

        self.direction = direction;
        self.speed = speed;
        Ok(())
    }

    fn direction(&self) -> MotorDirection {
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType as PinErrorType;
    use embedded_hal::pwm::ErrorType as PwmErrorType;

    #[derive(Default)]
    struct MockPin {
        high: bool,
    }

    impl PinErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockPwm {
        duty: u16,
    }

    impl PwmErrorType for MockPwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockPwm {
        fn max_duty_cycle(&self) -> u16 {
            1000
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
            self.duty = duty;
            Ok(())
        }
    }

    fn motor(min_duty: u8) -> HBridgeMotor<MockPin, MockPin, MockPwm> {
        HBridgeMotor::new(
            MockPin::default(),
            MockPin::default(),
            MockPwm::default(),
            HBridgeConfig { min_duty },
        )
        .unwrap()
    }

    #[test]
    fn test_starts_stopped() {
        let motor = motor(0);
        assert_eq!(motor.direction(), MotorDirection::Stop);
        assert!(!motor.in1.high && !motor.in2.high);
        assert_eq!(motor.enable.duty, 0);
    }

    #[test]
    fn test_direction_truth_table() {
        let mut motor = motor(0);

        motor.set_motor(MotorDirection::Clockwise, 100).unwrap();
        assert!(motor.in1.high && !motor.in2.high);
        assert_eq!(motor.enable.duty, 1000);

        motor.set_motor(MotorDirection::Anticlockwise, 50).unwrap();
        assert!(!motor.in1.high && motor.in2.high);
        assert_eq!(motor.enable.duty, 500);

        motor.set_motor(MotorDirection::Stop, 80).unwrap();
        assert!(!motor.in1.high && !motor.in2.high);
        assert_eq!(motor.enable.duty, 0);
        assert_eq!(motor.speed(), 0);
    }

    #[test]
    fn test_rejects_speed_over_100() {
        let mut motor = motor(0);
        motor.set_motor(MotorDirection::Clockwise, 40).unwrap();

        assert_eq!(
            motor.set_motor(MotorDirection::Anticlockwise, 101),
            Err(MotorError::InvalidSpeed)
        );
        // Previous command still in effect
        assert_eq!(motor.direction(), MotorDirection::Clockwise);
        assert_eq!(motor.enable.duty, 400);
    }

    #[test]
    fn test_duty_scaling() {
        let mut motor = motor(20);

        // 50% should be scaled: 20 + (50% of 80) = 60
        motor.set_motor(MotorDirection::Clockwise, 50).unwrap();
        assert_eq!(motor.enable.duty, 600);

        motor.set_motor(MotorDirection::Clockwise, 0).unwrap();
        assert_eq!(motor.enable.duty, 0);
    }
}
