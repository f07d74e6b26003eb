//! Typed parameters for commands that take more than a flag.
//!
//! Everything here serializes to the device's native JSON shapes: numeric
//! codes for enums, a 7-element 0/1 array for weekdays.

use serde::{Deserialize, Serialize};

/// Security type for WiFi networks.
///
/// Used when scanning for networks or joining a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum KeyType {
    /// Open network (no security)
    None = 0,
    /// WEP encryption (legacy, insecure)
    Wep = 1,
    /// WPA-PSK encryption
    Wpa = 2,
    /// WPA2-PSK encryption (most common)
    #[default]
    Wpa2 = 3,
}

impl From<KeyType> for u8 {
    fn from(key_type: KeyType) -> Self {
        key_type as u8
    }
}

impl TryFrom<u8> for KeyType {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(KeyType::None),
            1 => Ok(KeyType::Wep),
            2 => Ok(KeyType::Wpa),
            3 => Ok(KeyType::Wpa2),
            _ => Err("Invalid key type: must be 0-3"),
        }
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyType::None => write!(f, "None"),
            KeyType::Wep => write!(f, "WEP"),
            KeyType::Wpa => write!(f, "WPA"),
            KeyType::Wpa2 => write!(f, "WPA2"),
        }
    }
}

/// Days a schedule rule fires on, Sunday first.
///
/// Serialized as the device's `wday` array: seven 0/1 flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 7]", into = "[u8; 7]")]
pub struct Weekdays([bool; 7]);

impl Weekdays {
    /// Sunday..Saturday flags.
    pub const fn new(days: [bool; 7]) -> Self {
        Self(days)
    }

    /// No day set: the rule runs once on its date.
    pub const fn none() -> Self {
        Self([false; 7])
    }

    /// Every day of the week.
    pub const fn every_day() -> Self {
        Self([true; 7])
    }

    /// Monday to Friday.
    pub const fn weekdays() -> Self {
        Self([false, true, true, true, true, true, false])
    }

    /// Returns the flags, Sunday first.
    pub fn days(&self) -> [bool; 7] {
        self.0
    }

    /// A rule repeats when at least one day is set.
    pub fn repeats(&self) -> bool {
        self.0.iter().any(|&d| d)
    }
}

impl From<[u8; 7]> for Weekdays {
    fn from(flags: [u8; 7]) -> Self {
        Self(flags.map(|f| f != 0))
    }
}

impl From<Weekdays> for [u8; 7] {
    fn from(days: Weekdays) -> Self {
        days.0.map(u8::from)
    }
}

/// How a schedule rule's start time is given (`stime_opt`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum TimeOption {
    /// Fixed minutes after midnight.
    #[default]
    Fixed,
    /// At sunrise.
    Sunrise,
    /// At sunset.
    Sunset,
}

impl From<TimeOption> for i32 {
    fn from(opt: TimeOption) -> Self {
        match opt {
            TimeOption::Fixed => 0,
            TimeOption::Sunrise => 1,
            TimeOption::Sunset => 2,
        }
    }
}

impl TryFrom<i32> for TimeOption {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TimeOption::Fixed),
            1 => Ok(TimeOption::Sunrise),
            2 => Ok(TimeOption::Sunset),
            other => Err(format!("unknown time option {}", other)),
        }
    }
}

/// What a schedule rule does to the relay (`sact`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum RuleAction {
    /// Switch the relay off.
    Off,
    /// Switch the relay on.
    On,
}

impl From<RuleAction> for i32 {
    fn from(action: RuleAction) -> Self {
        match action {
            RuleAction::Off => 0,
            RuleAction::On => 1,
        }
    }
}

impl TryFrom<i32> for RuleAction {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RuleAction::Off),
            1 => Ok(RuleAction::On),
            other => Err(format!("unknown rule action {}", other)),
        }
    }
}

/// A schedule rule to add or edit.
///
/// # Example
///
/// ```
/// use hs100_core::params::{RuleAction, ScheduleRule, Weekdays};
///
/// let rule = ScheduleRule::new("porch light", Weekdays::every_day(), RuleAction::On)
///     .at_sunset();
/// assert!(rule.repeats());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRule {
    /// Rule name shown in the app.
    pub name: String,
    /// Days the rule fires; all clear means a one-shot rule.
    pub weekdays: Weekdays,
    /// How the start time is given.
    pub start: TimeOption,
    /// Minutes after midnight for [`TimeOption::Fixed`].
    pub start_minutes: u16,
    /// Minutes before (negative) or after sunrise/sunset; ignored for fixed times.
    pub start_offset: i32,
    /// Relay action.
    pub action: RuleAction,
    /// Whether the rule is active.
    pub enable: bool,
    /// Date of a one-shot rule (`0` for repeating rules).
    pub year: u16,
    /// Month of a one-shot rule.
    pub month: u8,
    /// Day of a one-shot rule.
    pub day: u8,
}

impl ScheduleRule {
    /// Creates an enabled rule firing at midnight.
    pub fn new(name: impl Into<String>, weekdays: Weekdays, action: RuleAction) -> Self {
        Self {
            name: name.into(),
            weekdays,
            start: TimeOption::Fixed,
            start_minutes: 0,
            start_offset: 0,
            action,
            enable: true,
            year: 0,
            month: 0,
            day: 0,
        }
    }

    /// Fires at a fixed number of minutes after midnight.
    pub fn at_minutes(mut self, minutes: u16) -> Self {
        self.start = TimeOption::Fixed;
        self.start_minutes = minutes;
        self
    }

    /// Fires at sunrise.
    pub fn at_sunrise(mut self) -> Self {
        self.start = TimeOption::Sunrise;
        self.start_minutes = 0;
        self
    }

    /// Fires at sunset.
    pub fn at_sunset(mut self) -> Self {
        self.start = TimeOption::Sunset;
        self.start_minutes = 0;
        self
    }

    /// Shifts a sunrise/sunset start by `minutes` (negative for earlier).
    pub fn with_offset(mut self, minutes: i32) -> Self {
        self.start_offset = minutes;
        self
    }

    /// Sets the date of a one-shot rule.
    pub fn on_date(mut self, year: u16, month: u8, day: u8) -> Self {
        self.year = year;
        self.month = month;
        self.day = day;
        self
    }

    /// Enables or disables the rule.
    pub fn enabled(mut self, enable: bool) -> Self {
        self.enable = enable;
        self
    }

    /// Derived from the weekdays; sent as the rule's `repeat` field.
    pub fn repeats(&self) -> bool {
        self.weekdays.repeats()
    }

    pub(crate) fn to_params<'a>(&'a self, id: Option<&'a str>) -> RuleParams<'a> {
        let (start_minutes, start_offset) = match self.start {
            TimeOption::Fixed => (self.start_minutes, 0),
            TimeOption::Sunrise | TimeOption::Sunset => (0, self.start_offset),
        };
        RuleParams {
            id,
            name: &self.name,
            enable: u8::from(self.enable),
            wday: self.weekdays,
            repeat: u8::from(self.repeats()),
            stime_opt: self.start,
            smin: start_minutes,
            soffset: start_offset,
            sact: self.action,
            etime_opt: -1,
            emin: 0,
            eoffset: 0,
            eact: -1,
            year: self.year,
            month: self.month,
            day: self.day,
            force: 0,
            latitude: 0,
            longitude: 0,
        }
    }
}

/// Wire form of `add_rule` / `edit_rule` arguments.
#[derive(Debug, Serialize)]
pub(crate) struct RuleParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    name: &'a str,
    enable: u8,
    wday: Weekdays,
    repeat: u8,
    stime_opt: TimeOption,
    smin: u16,
    soffset: i32,
    sact: RuleAction,
    etime_opt: i32,
    emin: u16,
    eoffset: i32,
    eact: i32,
    year: u16,
    month: u8,
    day: u8,
    force: u8,
    latitude: i32,
    longitude: i32,
}

/// Date, time and timezone index for `set_timezone`.
///
/// The index is one of the device's own timezone table entries; no
/// conversion from an IANA zone is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimezoneSetting {
    /// Year, e.g. 2026.
    pub year: u16,
    /// Month, 1-12.
    pub month: u8,
    /// Day of month, 1-31.
    pub mday: u8,
    /// Hour, 0-23.
    pub hour: u8,
    /// Minute, 0-59.
    pub min: u8,
    /// Second, 0-59.
    pub sec: u8,
    /// Device timezone index.
    pub index: u16,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_key_type_numeric() {
        assert_eq!(serde_json::to_value(KeyType::Wpa2).unwrap(), json!(3));
        let parsed: KeyType = serde_json::from_value(json!(1)).unwrap();
        assert_eq!(parsed, KeyType::Wep);
        assert!(serde_json::from_value::<KeyType>(json!(9)).is_err());
        assert_eq!(KeyType::try_from(4), Err("Invalid key type: must be 0-3"));
    }

    #[test]
    fn test_weekdays_wire_form() {
        let days = Weekdays::weekdays();
        assert_eq!(serde_json::to_value(days).unwrap(), json!([0, 1, 1, 1, 1, 1, 0]));

        let parsed: Weekdays = serde_json::from_value(json!([1, 0, 0, 0, 0, 0, 1])).unwrap();
        assert_eq!(
            parsed.days(),
            [true, false, false, false, false, false, true]
        );
    }

    #[test]
    fn test_repeat_derived_from_weekdays() {
        assert!(!Weekdays::none().repeats());
        assert!(Weekdays::every_day().repeats());
        let single = Weekdays::new([false, false, false, true, false, false, false]);
        assert!(single.repeats());
    }

    #[test]
    fn test_rule_params_one_shot() {
        let rule = ScheduleRule::new("once", Weekdays::none(), RuleAction::Off)
            .at_minutes(420)
            .on_date(2026, 10, 19);
        let value = serde_json::to_value(rule.to_params(None)).unwrap();

        assert_eq!(value["repeat"], json!(0));
        assert_eq!(value["wday"], json!([0, 0, 0, 0, 0, 0, 0]));
        assert_eq!(value["smin"], json!(420));
        assert_eq!(value["sact"], json!(0));
        assert_eq!(value["year"], json!(2026));
        assert_eq!(value["etime_opt"], json!(-1));
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_rule_params_sunset_ignores_minutes() {
        let rule = ScheduleRule::new("dusk", Weekdays::every_day(), RuleAction::On)
            .at_minutes(600)
            .at_sunset();
        let value = serde_json::to_value(rule.to_params(Some("ABC"))).unwrap();

        assert_eq!(value["repeat"], json!(1));
        assert_eq!(value["stime_opt"], json!(2));
        assert_eq!(value["smin"], json!(0));
        assert_eq!(value["id"], json!("ABC"));
        assert_eq!(value["enable"], json!(1));
        assert_eq!(value["soffset"], json!(0));
    }

    #[test]
    fn test_rule_params_sunrise_offset() {
        let rule = ScheduleRule::new("early", Weekdays::weekdays(), RuleAction::On)
            .at_sunrise()
            .with_offset(-20);
        let value = serde_json::to_value(rule.to_params(None)).unwrap();

        assert_eq!(value["stime_opt"], json!(1));
        assert_eq!(value["smin"], json!(0));
        assert_eq!(value["soffset"], json!(-20));
        assert_eq!(value["eoffset"], json!(0));

        // A fixed-time rule never carries an offset.
        let fixed = rule.at_minutes(300);
        let value = serde_json::to_value(fixed.to_params(None)).unwrap();
        assert_eq!(value["soffset"], json!(0));
        assert_eq!(value["smin"], json!(300));
    }
}
