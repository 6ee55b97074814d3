//! GPIO buzzer
//!
//! Active buzzer switched by a GPIO pin, directly or through a transistor.

use doorlock_core::traits::{Alarm, AlarmError};
use embedded_hal::digital::OutputPin;

/// Buzzer on a GPIO pin
///
/// The pin can be configured as active-high (default) or active-low.
pub struct Buzzer<P> {
    pin: P,
    /// If true, buzzer ON = pin LOW
    inverted: bool,
    on: bool,
}

impl<P: OutputPin> Buzzer<P> {
    /// Take the pin and silence the buzzer
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, the buzzer sounds when the pin is LOW
    pub fn new(pin: P, inverted: bool) -> Result<Self, AlarmError> {
        let mut buzzer = Self {
            pin,
            inverted,
            on: false,
        };
        buzzer.set_alarm(false)?;
        Ok(buzzer)
    }

    pub fn new_active_high(pin: P) -> Result<Self, AlarmError> {
        Self::new(pin, false)
    }

    pub fn new_active_low(pin: P) -> Result<Self, AlarmError> {
        Self::new(pin, true)
    }
}

impl<P: OutputPin> Alarm for Buzzer<P> {
    fn set_alarm(&mut self, on: bool) -> Result<(), AlarmError> {
        let result = if on != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|_| AlarmError::Output)?;
        self.on = on;
        Ok(())
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    struct MockPin {
        high: bool,
        broken: bool,
    }

    impl MockPin {
        fn new() -> Self {
            Self {
                high: true,
                broken: false,
            }
        }
    }

    impl ErrorType for MockPin {
        type Error = ErrorKind;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), ErrorKind> {
            if self.broken {
                return Err(ErrorKind::Other);
            }
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), ErrorKind> {
            if self.broken {
                return Err(ErrorKind::Other);
            }
            self.high = true;
            Ok(())
        }
    }

    #[test]
    fn test_active_high_buzzer() {
        let mut buzzer = Buzzer::new_active_high(MockPin::new()).unwrap();

        // Silenced on construction
        assert!(!buzzer.is_on());
        assert!(!buzzer.pin.high);

        buzzer.set_alarm(true).unwrap();
        assert!(buzzer.is_on());
        assert!(buzzer.pin.high);

        buzzer.set_alarm(false).unwrap();
        assert!(!buzzer.pin.high);
    }

    #[test]
    fn test_active_low_buzzer() {
        let mut buzzer = Buzzer::new_active_low(MockPin::new()).unwrap();
        assert!(buzzer.pin.high);

        buzzer.set_alarm(true).unwrap();
        assert!(buzzer.is_on());
        assert!(!buzzer.pin.high);
    }

    #[test]
    fn test_pin_failure_keeps_state() {
        let mut buzzer = Buzzer::new_active_high(MockPin::new()).unwrap();
        buzzer.pin.broken = true;

        assert_eq!(buzzer.set_alarm(true), Err(AlarmError::Output));
        assert!(!buzzer.is_on());
    }
}
