//! Alarm output trait

/// Errors from the alarm output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmError {
    /// Output pin could not be driven
    Output,
}

/// On/off audible alarm
pub trait Alarm {
    /// Switch the alarm on or off
    fn set_alarm(&mut self, on: bool) -> Result<(), AlarmError>;

    /// Whether the alarm is currently sounding
    fn is_on(&self) -> bool;
}
