//! Ready-made commands for every action the plug understands.
//!
//! Each function returns a [`Command`] that can be handed to
//! [`execute_command`](crate::execute_command) or sent as text with
//! [`Command::to_json`].
//!
//! # Example
//!
//! ```no_run
//! use hs100_core::{commands, send_command, DEFAULT_PORT, DEFAULT_TIMEOUT};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), hs100_core::Error> {
//!     // Turn on a smart plug
//!     let cmd = commands::set_relay_state(true);
//!     send_command("192.168.1.100", DEFAULT_PORT, DEFAULT_TIMEOUT, &cmd.to_json()).await?;
//!     Ok(())
//! }
//! ```

use crate::{
    command::Command,
    credentials::Credentials,
    error::Error,
    params::{KeyType, ScheduleRule, TimezoneSetting},
};

/// Device information, relay and LED control, naming, reboot and reset.
pub const SYSTEM: &str = "system";

/// Device clock and timezone.
pub const TIME: &str = "time";

/// WiFi station settings.
pub const NETIF: &str = "netif";

/// TP-Link cloud account binding.
pub const CLOUD: &str = "cnCloud";

/// Schedule rules.
pub const SCHEDULE: &str = "schedule";

/// Get system information.
///
/// Returns device model, alias, MAC address, firmware version, relay state, and more.
pub fn get_sysinfo() -> Command {
    Command::new(SYSTEM, "get_sysinfo")
}

/// Turn the relay on or off (power to the connected appliance).
pub fn set_relay_state(on: bool) -> Command {
    Command::new(SYSTEM, "set_relay_state").arg("state", u8::from(on))
}

/// Turn the LED indicator light off (`true`) or back on (`false`).
pub fn set_led_off(off: bool) -> Command {
    Command::new(SYSTEM, "set_led_off").arg("off", u8::from(off))
}

/// Rename the device.
pub fn set_alias(alias: &str) -> Command {
    Command::new(SYSTEM, "set_dev_alias").arg("alias", alias)
}

/// Reboot the device after `delay` seconds.
pub fn reboot(delay: u32) -> Command {
    Command::new(SYSTEM, "reboot").arg("delay", delay)
}

/// Factory reset the device after `delay` seconds.
///
/// **Warning:** This will erase all settings and require re-setup.
pub fn reset(delay: u32) -> Command {
    Command::new(SYSTEM, "reset").arg("delay", delay)
}

/// Get the device's current time.
pub fn get_time() -> Command {
    Command::new(TIME, "get_time")
}

/// Get the device's timezone index.
pub fn get_timezone() -> Command {
    Command::new(TIME, "get_timezone")
}

/// Set the device's date, time and timezone index.
pub fn set_timezone(setting: &TimezoneSetting) -> Result<Command, Error> {
    Command::from_params(TIME, "set_timezone", setting)
}

/// Scan for available wireless networks.
///
/// With `refresh` the device performs a fresh scan instead of returning
/// its cached list.
pub fn scan_wifi(refresh: bool) -> Command {
    Command::new(NETIF, "get_scaninfo").arg("refresh", u8::from(refresh))
}

/// Connect the device to a WiFi network.
///
/// This command is used during device provisioning when the device is in AP mode.
///
/// # Example
///
/// ```
/// use hs100_core::{commands, params::KeyType};
///
/// let cmd = commands::join_wifi("My \"Home\" Net", "secret123", KeyType::Wpa2);
/// assert_eq!(cmd.arguments()["ssid"], "My \"Home\" Net");
/// assert_eq!(cmd.arguments()["key_type"], 3);
/// ```
pub fn join_wifi(ssid: &str, password: &str, key_type: KeyType) -> Command {
    Command::new(NETIF, "set_stainfo")
        .arg("ssid", ssid)
        .arg("password", password)
        .arg("key_type", u8::from(key_type))
}

/// Get cloud connection information.
pub fn get_cloud_info() -> Command {
    Command::new(CLOUD, "get_info")
}

/// Bind the device to a TP-Link cloud account.
///
/// The password travels inside the command document; it is only obscured
/// by the protocol cipher.
pub fn cloud_bind(credentials: &Credentials) -> Command {
    Command::new(CLOUD, "bind")
        .arg("username", credentials.username.as_str())
        .arg("password", credentials.expose_password())
}

/// Unbind the device from its cloud account.
///
/// This removes the device from cloud control but it continues to work locally.
pub fn cloud_unbind() -> Command {
    Command::new(CLOUD, "unbind")
}

/// Point the device at a different cloud server.
pub fn set_cloud_server(url: &str) -> Command {
    Command::new(CLOUD, "set_server_url").arg("server", url)
}

/// Get schedule rules.
pub fn get_schedule_rules() -> Command {
    Command::new(SCHEDULE, "get_rules")
}

/// Get the next scheduled action.
pub fn get_next_action() -> Command {
    Command::new(SCHEDULE, "get_next_action")
}

/// Add a schedule rule. The reply carries the new rule's id.
///
/// The rule's `repeat` flag is derived from its weekdays.
pub fn add_schedule_rule(rule: &ScheduleRule) -> Result<Command, Error> {
    Command::from_params(SCHEDULE, "add_rule", &rule.to_params(None))
}

/// Replace the schedule rule with the given id.
pub fn edit_schedule_rule(id: &str, rule: &ScheduleRule) -> Result<Command, Error> {
    Command::from_params(SCHEDULE, "edit_rule", &rule.to_params(Some(id)))
}

/// Delete the schedule rule with the given id.
pub fn delete_schedule_rule(id: &str) -> Command {
    Command::new(SCHEDULE, "delete_rule").arg("id", id)
}

/// Delete every schedule rule.
pub fn delete_all_schedule_rules() -> Command {
    Command::new(SCHEDULE, "delete_all_rules")
}
