//! Fixed step tables
//!
//! Periods are the compare values of a 16-bit timer clocked at
//! 8 MHz / 1024. The HMI screens mirror the control tables step for step so
//! both nodes finish at roughly the same time.

use doorlock_hal::TimerPeriod;

use super::step::Step;
use crate::config::MOTOR_SPEED_PERCENT;
use crate::traits::MotorDirection;

/// 62500 counts
pub const EIGHT_SECONDS: TimerPeriod = TimerPeriod::from_counts(62_500);
/// 54687 counts
pub const SEVEN_SECONDS: TimerPeriod = TimerPeriod::from_counts(54_687);
/// 23437 counts
pub const THREE_SECONDS: TimerPeriod = TimerPeriod::from_counts(23_437);
/// 31250 counts
pub const FOUR_SECONDS: TimerPeriod = TimerPeriod::from_counts(31_250);

/// Which sequence a node is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sequence {
    /// Unlock, hold, lock
    DoorOpen,
    /// One minute of alarm after a lockout
    Alarm,
}

impl Sequence {
    /// Actuator table run by the control node
    pub fn control_table(self) -> &'static [Step<ControlAction>] {
        match self {
            Sequence::DoorOpen => &DOOR_OPEN,
            Sequence::Alarm => &ALARM,
        }
    }

    /// Screen table run by the HMI node
    pub fn screen_table(self) -> &'static [Step<ScreenAction>] {
        match self {
            Sequence::DoorOpen => &DOOR_STATUS_SCREEN,
            Sequence::Alarm => &LOCKOUT_SCREEN,
        }
    }
}

/// Control node actuator action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlAction {
    /// Drive the door motor at the given percent
    Motor(MotorDirection, u8),
    /// Switch the buzzer
    Alarm(bool),
}

/// HMI node screen action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenAction {
    /// "Door is" / "Unlocking"
    ShowUnlocking,
    /// Blank screen
    Clear,
    /// "Door is Locking"
    ShowLocking,
    /// "ERROR"
    ShowError,
}

const OPEN: ControlAction = ControlAction::Motor(MotorDirection::Clockwise, MOTOR_SPEED_PERCENT);
const CLOSE: ControlAction =
    ControlAction::Motor(MotorDirection::Anticlockwise, MOTOR_SPEED_PERCENT);
const STOP: ControlAction = ControlAction::Motor(MotorDirection::Stop, 0);

/// Unlock for 15 s, pause 3 s, lock for 15 s
pub static DOOR_OPEN: [Step<ControlAction>; 6] = [
    Step::apply(TimerPeriod::IMMEDIATE, OPEN),
    Step::hold(EIGHT_SECONDS),
    Step::apply(SEVEN_SECONDS, STOP),
    Step::apply(THREE_SECONDS, CLOSE),
    Step::hold(EIGHT_SECONDS),
    Step::apply(SEVEN_SECONDS, STOP),
];

/// Buzzer on for one minute
pub static ALARM: [Step<ControlAction>; 9] = [
    Step::apply(TimerPeriod::IMMEDIATE, ControlAction::Alarm(true)),
    Step::hold(EIGHT_SECONDS),
    Step::hold(EIGHT_SECONDS),
    Step::hold(EIGHT_SECONDS),
    Step::hold(EIGHT_SECONDS),
    Step::hold(EIGHT_SECONDS),
    Step::hold(EIGHT_SECONDS),
    Step::hold(EIGHT_SECONDS),
    Step::apply(FOUR_SECONDS, ControlAction::Alarm(false)),
];

/// Mirrors [`DOOR_OPEN`]; the last message stays up
pub static DOOR_STATUS_SCREEN: [Step<ScreenAction>; 6] = [
    Step::apply(TimerPeriod::IMMEDIATE, ScreenAction::ShowUnlocking),
    Step::hold(EIGHT_SECONDS),
    Step::apply(SEVEN_SECONDS, ScreenAction::Clear),
    Step::apply(THREE_SECONDS, ScreenAction::ShowLocking),
    Step::hold(EIGHT_SECONDS),
    Step::hold(SEVEN_SECONDS),
];

/// Mirrors [`ALARM`]
pub static LOCKOUT_SCREEN: [Step<ScreenAction>; 9] = [
    Step::apply(TimerPeriod::IMMEDIATE, ScreenAction::ShowError),
    Step::hold(EIGHT_SECONDS),
    Step::hold(EIGHT_SECONDS),
    Step::hold(EIGHT_SECONDS),
    Step::hold(EIGHT_SECONDS),
    Step::hold(EIGHT_SECONDS),
    Step::hold(EIGHT_SECONDS),
    Step::hold(EIGHT_SECONDS),
    Step::apply(FOUR_SECONDS, ScreenAction::Clear),
];
