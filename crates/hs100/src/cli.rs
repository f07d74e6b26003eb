use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use hs100_core::{
    DEFAULT_PORT,
    params::{KeyType, RuleAction, ScheduleRule, TimezoneSetting, Weekdays},
};

pub fn parse_duration(arg: &str) -> Result<Duration, std::num::ParseIntError> {
    let seconds = arg.parse()?;
    Ok(Duration::from_secs(seconds))
}

/// Parses `YYYY-MM-DD`.
pub fn parse_date(arg: &str) -> Result<(u16, u8, u8), String> {
    let invalid = || format!("invalid date '{}', expected YYYY-MM-DD", arg);
    let mut parts = arg.splitn(3, '-');
    let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    let year = y.parse().map_err(|_| invalid())?;
    let month: u8 = m.parse().map_err(|_| invalid())?;
    let day: u8 = d.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(invalid());
    }
    Ok((year, month, day))
}

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_clock(arg: &str) -> Result<(u8, u8, u8), String> {
    let invalid = || format!("invalid time '{}', expected HH:MM[:SS]", arg);
    let fields = arg
        .split(':')
        .map(|p| p.parse::<u8>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;
    let (hour, min, sec) = match fields.as_slice() {
        [h, m] => (*h, *m, 0),
        [h, m, s] => (*h, *m, *s),
        _ => return Err(invalid()),
    };
    if hour > 23 || min > 59 || sec > 59 {
        return Err(invalid());
    }
    Ok((hour, min, sec))
}

/// Parses `daily`, `weekdays`, `weekends`, or a comma list such as `mon,wed,fri`.
pub fn parse_weekdays(arg: &str) -> Result<Weekdays, String> {
    const NAMES: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

    match arg.to_ascii_lowercase().as_str() {
        "daily" => return Ok(Weekdays::every_day()),
        "weekdays" => return Ok(Weekdays::weekdays()),
        "weekends" => {
            return Ok(Weekdays::new([true, false, false, false, false, false, true]));
        }
        _ => {}
    }

    let mut days = [false; 7];
    for name in arg.split(',').map(|s| s.trim().to_ascii_lowercase()) {
        let index = NAMES
            .iter()
            .position(|n| name.starts_with(n))
            .ok_or_else(|| format!("unknown day '{}'", name))?;
        days[index] = true;
    }
    Ok(Weekdays::new(days))
}

pub fn parse_key_type(arg: &str) -> Result<KeyType, String> {
    let value: u8 = arg
        .parse()
        .map_err(|_| format!("invalid key type '{}'", arg))?;
    KeyType::try_from(value).map_err(str::to_string)
}

/// TP-Link HS100 smart plug client
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show version information for CLI and core library
    Version,

    /// Send a command to a specific device
    Device {
        /// Target hostname or IP address
        target: String,

        /// Target port
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Timeout in seconds for connect, write and read
        #[arg(long, value_parser = parse_duration, default_value = "10")]
        timeout: Duration,

        #[command(subcommand)]
        command: DeviceCommand,
    },
}

/// Commands available for single device operations
#[derive(Subcommand)]
pub enum DeviceCommand {
    /// Get system info
    Info,
    /// Turn relay on
    On,
    /// Turn relay off
    Off,
    /// Turn LED on
    Ledon,
    /// Turn LED off
    Ledoff,
    /// Rename the device
    Alias {
        /// New device name
        name: String,
    },
    /// Reboot the device
    Reboot {
        /// Delay in seconds before rebooting
        #[arg(long, default_value_t = 1)]
        delay: u32,
    },
    /// Reset the device to factory defaults
    Reset {
        /// Delay in seconds before resetting
        #[arg(long, default_value_t = 1)]
        delay: u32,
    },
    /// Get device time
    Time,
    /// Get device timezone index
    Timezone,
    /// Set device date, time and timezone index
    SetTimezone {
        /// Index into the device's timezone table
        index: u16,

        /// Local date, YYYY-MM-DD
        #[arg(value_parser = parse_date)]
        date: (u16, u8, u8),

        /// Local time, HH:MM[:SS]
        #[arg(value_parser = parse_clock)]
        time: (u8, u8, u8),
    },
    /// Scan for wireless networks
    Wlanscan {
        /// Ask the device for a fresh scan instead of its cached list
        #[arg(long)]
        refresh: bool,
    },
    /// Connect device to a WiFi network
    WifiJoin {
        /// Network name (SSID)
        ssid: String,

        /// Security type: 0=none, 1=WEP, 2=WPA, 3=WPA2
        #[arg(long, value_parser = parse_key_type, default_value = "3")]
        keytype: KeyType,

        /// Read password from stdin instead of prompting.
        /// Useful for scripting: echo "pass" | hs100 device <ip> wifi-join SSID --password-stdin
        #[arg(long, conflicts_with = "password")]
        password_stdin: bool,

        /// Password (not recommended - use --password-stdin or interactive prompt instead)
        #[arg(long, hide = true)]
        password: Option<String>,
    },
    /// Get cloud info
    Cloudinfo,
    /// Bind device to TP-Link cloud account
    CloudBind {
        /// TP-Link account email address.
        /// Can also be set via HS100_USERNAME environment variable.
        #[arg(long, short, env = "HS100_USERNAME")]
        username: String,

        /// Read password from stdin instead of prompting.
        /// The password is taken from HS100_PASSWORD when that is set.
        #[arg(long, conflicts_with = "password")]
        password_stdin: bool,

        /// Password (not recommended - use --password-stdin or interactive prompt instead)
        #[arg(long, hide = true)]
        password: Option<String>,
    },
    /// Unbind device from TP-Link cloud account
    CloudUnbind,
    /// Point the device at another cloud server
    CloudServer {
        /// Server host name, e.g. devs.tplinkcloud.com
        url: String,
    },
    /// Get schedule rules
    Schedule,
    /// Get the next scheduled action
    NextAction,
    /// Add a schedule rule
    ScheduleAdd(RuleArgs),
    /// Replace an existing schedule rule
    ScheduleEdit {
        /// Rule id as shown by 'schedule'
        id: String,

        #[command(flatten)]
        rule: RuleArgs,
    },
    /// Delete a schedule rule
    ScheduleDelete {
        /// Rule id as shown by 'schedule'
        id: String,
    },
    /// Delete all schedule rules
    ScheduleClear,
    /// Send a raw command
    Raw {
        /// Module name, e.g. system
        module: String,

        /// Action name, e.g. get_sysinfo
        action: String,

        /// Arguments as a JSON object
        args: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl From<Switch> for RuleAction {
    fn from(switch: Switch) -> Self {
        match switch {
            Switch::On => RuleAction::On,
            Switch::Off => RuleAction::Off,
        }
    }
}

/// Options describing one schedule rule.
#[derive(Args)]
pub struct RuleArgs {
    /// Rule name
    #[arg(long)]
    pub name: String,

    /// Turn the relay on or off
    #[arg(long, value_enum)]
    pub action: Switch,

    /// Fire at a fixed time, HH:MM
    #[arg(long, value_parser = parse_clock, required_unless_present_any = ["sunrise", "sunset"])]
    pub at: Option<(u8, u8, u8)>,

    /// Fire at sunrise
    #[arg(long, conflicts_with_all = ["at", "sunset"])]
    pub sunrise: bool,

    /// Fire at sunset
    #[arg(long, conflicts_with = "at")]
    pub sunset: bool,

    /// Minutes to shift a sunrise/sunset start, e.g. -15
    #[arg(long, allow_hyphen_values = true, conflicts_with = "at")]
    pub offset: Option<i32>,

    /// Days to repeat on: daily, weekdays, weekends or e.g. mon,wed,fri.
    /// Without this the rule fires once, on --date.
    #[arg(long, value_parser = parse_weekdays)]
    pub days: Option<Weekdays>,

    /// Date of a one-time rule, YYYY-MM-DD
    #[arg(long, value_parser = parse_date, conflicts_with = "days")]
    pub date: Option<(u16, u8, u8)>,

    /// Create the rule disabled
    #[arg(long)]
    pub disabled: bool,
}

impl RuleArgs {
    pub fn to_rule(&self) -> ScheduleRule {
        let weekdays = self.days.unwrap_or_else(Weekdays::none);
        let mut rule = ScheduleRule::new(self.name.clone(), weekdays, self.action.into())
            .enabled(!self.disabled);

        rule = if self.sunrise {
            rule.at_sunrise().with_offset(self.offset.unwrap_or(0))
        } else if self.sunset {
            rule.at_sunset().with_offset(self.offset.unwrap_or(0))
        } else {
            let (hour, min, _) = self.at.unwrap_or_default();
            rule.at_minutes(u16::from(hour) * 60 + u16::from(min))
        };

        if let Some((year, month, day)) = self.date {
            rule = rule.on_date(year, month, day);
        }
        rule
    }
}

pub fn timezone_setting(index: u16, date: (u16, u8, u8), time: (u8, u8, u8)) -> TimezoneSetting {
    let (year, month, mday) = date;
    let (hour, min, sec) = time;
    TimezoneSetting {
        year,
        month,
        mday,
        hour,
        min,
        sec,
        index,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use hs100_core::params::TimeOption;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_date_and_clock() {
        assert_eq!(parse_date("2026-10-19"), Ok((2026, 10, 19)));
        assert!(parse_date("2026-13-01").is_err());
        assert!(parse_date("2026/10/19").is_err());

        assert_eq!(parse_clock("07:30"), Ok((7, 30, 0)));
        assert_eq!(parse_clock("23:59:59"), Ok((23, 59, 59)));
        assert!(parse_clock("24:00").is_err());
        assert!(parse_clock("7").is_err());
    }

    #[test]
    fn test_parse_weekdays() {
        assert_eq!(parse_weekdays("daily"), Ok(Weekdays::every_day()));
        assert_eq!(parse_weekdays("Weekdays"), Ok(Weekdays::weekdays()));
        assert_eq!(
            parse_weekdays("sun,wed").map(|w| w.days()),
            Ok([true, false, false, true, false, false, false])
        );
        assert!(parse_weekdays("someday").is_err());
    }

    #[test]
    fn test_parse_key_type() {
        assert_eq!(parse_key_type("0"), Ok(KeyType::None));
        assert!(parse_key_type("7").is_err());
        assert!(parse_key_type("wpa").is_err());
    }

    #[test]
    fn test_schedule_add_args() {
        let cli = Cli::try_parse_from([
            "hs100", "device", "10.0.0.5", "schedule-add", "--name", "wake", "--action", "on",
            "--at", "06:45", "--days", "weekdays",
        ])
        .unwrap();

        let Command::Device {
            command: DeviceCommand::ScheduleAdd(args),
            port,
            ..
        } = cli.command
        else {
            panic!("expected schedule-add");
        };
        assert_eq!(port, 9999);

        let rule = args.to_rule();
        assert_eq!(rule.start, TimeOption::Fixed);
        assert_eq!(rule.start_minutes, 405);
        assert_eq!(rule.action, RuleAction::On);
        assert!(rule.repeats());
        assert!(rule.enable);
    }

    #[test]
    fn test_schedule_rule_needs_a_start() {
        let result = Cli::try_parse_from([
            "hs100", "device", "10.0.0.5", "schedule-add", "--name", "x", "--action", "off",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_sunset_one_shot() {
        let cli = Cli::try_parse_from([
            "hs100", "device", "plug", "schedule-edit", "AB12", "--name", "dusk", "--action",
            "off", "--sunset", "--date", "2026-12-24",
        ])
        .unwrap();

        let Command::Device {
            command: DeviceCommand::ScheduleEdit { id, rule },
            ..
        } = cli.command
        else {
            panic!("expected schedule-edit");
        };
        assert_eq!(id, "AB12");

        let rule = rule.to_rule();
        assert_eq!(rule.start, TimeOption::Sunset);
        assert!(!rule.repeats());
        assert_eq!((rule.year, rule.month, rule.day), (2026, 12, 24));
    }

    #[test]
    fn test_sunrise_offset() {
        let cli = Cli::try_parse_from([
            "hs100", "device", "plug", "schedule-add", "--name", "dawn", "--action", "on",
            "--sunrise", "--offset", "-15", "--days", "weekdays",
        ])
        .unwrap();

        let Command::Device {
            command: DeviceCommand::ScheduleAdd(args),
            ..
        } = cli.command
        else {
            panic!("expected schedule-add");
        };

        let rule = args.to_rule();
        assert_eq!(rule.start, TimeOption::Sunrise);
        assert_eq!(rule.start_offset, -15);

        let result = Cli::try_parse_from([
            "hs100", "device", "plug", "schedule-add", "--name", "x", "--action", "on",
            "--at", "07:00", "--offset", "10",
        ]);
        assert!(result.is_err());
    }
}
