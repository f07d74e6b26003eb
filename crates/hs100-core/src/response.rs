//! Typed structures for device replies.
//!
//! A reply mirrors the request: `{"<module>":{"<action>":{...}}}`. Only the
//! branch for the action that was sent is populated, so every module and
//! every action in [`ResponseDocument`] is optional. Each leaf carries an
//! `err_code` (0 = success) and sometimes an `err_msg`.
//!
//! # Example
//!
//! ```
//! use hs100_core::response::decode;
//!
//! let json = r#"{"system":{"get_sysinfo":{"alias":"Living Room","model":"HS100(US)","err_code":0}}}"#;
//! let doc = decode(json).unwrap();
//! let leaf = doc.system.unwrap().get_sysinfo.unwrap();
//! assert!(leaf.status.is_success());
//! assert_eq!(leaf.data.alias, "Living Room");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{error::Error, params::Weekdays};

/// Action-specific fields nobody has modeled; kept as raw JSON.
pub type Extra = Map<String, Value>;

/// Parses reply text into a [`ResponseDocument`].
///
/// Fails with [`Error::ParseError`] if the text is not a JSON object.
pub fn decode(text: &str) -> Result<ResponseDocument, Error> {
    serde_json::from_str(text).map_err(|e| Error::ParseError(e.to_string()))
}

/// Status carried by every leaf (and by a module that rejected the request
/// as a whole, e.g. `"module not support"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Status {
    /// 0 on success; any other value is a device-side failure.
    #[serde(default)]
    pub err_code: i64,

    /// Optional human-readable failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err_msg: Option<String>,
}

impl Status {
    /// Returns true if the response indicates success.
    pub fn is_success(&self) -> bool {
        self.err_code == 0
    }

    /// Converts a nonzero code into [`Error::DeviceError`].
    pub fn check(&self) -> Result<(), Error> {
        if self.is_success() {
            Ok(())
        } else {
            Err(Error::DeviceError {
                code: self.err_code,
                message: self.err_msg.clone(),
            })
        }
    }
}

/// Innermost record of a reply: a status plus action-specific fields.
///
/// When the status is nonzero the fields in `data` are absent or
/// meaningless; go through [`Leaf::check`] or [`Leaf::into_data`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Leaf<T = Extra> {
    /// `err_code` / `err_msg`.
    #[serde(flatten)]
    pub status: Status,

    /// Everything else in the leaf.
    #[serde(flatten)]
    pub data: T,
}

impl<T> Leaf<T> {
    /// Returns the data if the status is success.
    pub fn check(&self) -> Result<&T, Error> {
        self.status.check()?;
        Ok(&self.data)
    }

    /// Consumes the leaf, returning the data if the status is success.
    pub fn into_data(self) -> Result<T, Error> {
        self.status.check()?;
        Ok(self.data)
    }
}

/// Every module/action pair a plug can answer, all optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResponseDocument {
    /// `system` module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemModule>,

    /// `time` module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeModule>,

    /// `netif` module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netif: Option<NetifModule>,

    /// Cloud account module, `cnCloud` on the wire (`cloud` is accepted too).
    #[serde(
        default,
        rename = "cnCloud",
        alias = "cloud",
        skip_serializing_if = "Option::is_none"
    )]
    pub cloud: Option<CloudModule>,

    /// `schedule` module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleModule>,
}

impl ResponseDocument {
    /// Status of a module that failed as a whole, if any.
    ///
    /// Devices answer an unsupported module with the error directly under
    /// the module key instead of under an action.
    pub fn module_error(&self, module: &str) -> Option<&Status> {
        let status = match module {
            "system" => &self.system.as_ref()?.status,
            "time" => &self.time.as_ref()?.status,
            "netif" => &self.netif.as_ref()?.status,
            "cnCloud" | "cloud" => &self.cloud.as_ref()?.status,
            "schedule" => &self.schedule.as_ref()?.status,
            _ => return None,
        };
        (!status.is_success()).then_some(status)
    }

    /// Looks up the status of one module/action leaf by name.
    ///
    /// Fails with [`Error::MissingLeaf`] if the reply has no such leaf. A
    /// module-level failure is returned as that module's status.
    pub fn leaf_status(&self, module: &str, action: &str) -> Result<&Status, Error> {
        if let Some(status) = self.module_error(module) {
            return Ok(status);
        }
        self.find_status(module, action)
            .ok_or_else(|| Error::missing_leaf(module, action))
    }

    /// Looks up a leaf by name and converts a nonzero status into
    /// [`Error::DeviceError`].
    pub fn check(&self, module: &str, action: &str) -> Result<(), Error> {
        self.leaf_status(module, action)?.check()
    }

    fn find_status(&self, module: &str, action: &str) -> Option<&Status> {
        fn status<T>(leaf: &Option<Leaf<T>>) -> Option<&Status> {
            leaf.as_ref().map(|l| &l.status)
        }

        match module {
            "system" => {
                let m = self.system.as_ref()?;
                match action {
                    "get_sysinfo" => status(&m.get_sysinfo),
                    "set_relay_state" => status(&m.set_relay_state),
                    "set_led_off" => status(&m.set_led_off),
                    "set_dev_alias" => status(&m.set_dev_alias),
                    "reboot" => status(&m.reboot),
                    "reset" => status(&m.reset),
                    _ => None,
                }
            }
            "time" => {
                let m = self.time.as_ref()?;
                match action {
                    "get_time" => status(&m.get_time),
                    "get_timezone" => status(&m.get_timezone),
                    "set_timezone" => status(&m.set_timezone),
                    _ => None,
                }
            }
            "netif" => {
                let m = self.netif.as_ref()?;
                match action {
                    "get_scaninfo" => status(&m.get_scaninfo),
                    "set_stainfo" => status(&m.set_stainfo),
                    _ => None,
                }
            }
            "cnCloud" | "cloud" => {
                let m = self.cloud.as_ref()?;
                match action {
                    "get_info" => status(&m.get_info),
                    "bind" => status(&m.bind),
                    "unbind" => status(&m.unbind),
                    "set_server_url" => status(&m.set_server_url),
                    _ => None,
                }
            }
            "schedule" => {
                let m = self.schedule.as_ref()?;
                match action {
                    "get_rules" => status(&m.get_rules),
                    "get_next_action" => status(&m.get_next_action),
                    "add_rule" => status(&m.add_rule),
                    "edit_rule" => status(&m.edit_rule),
                    "delete_rule" => status(&m.delete_rule),
                    "delete_all_rules" => status(&m.delete_all_rules),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// Actions of the `system` module.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SystemModule {
    /// Module-level failure, e.g. `{"system":{"err_code":-1}}`.
    #[serde(flatten)]
    pub status: Status,
    pub get_sysinfo: Option<Leaf<SysInfo>>,
    pub set_relay_state: Option<Leaf>,
    pub set_led_off: Option<Leaf>,
    pub set_dev_alias: Option<Leaf>,
    pub reboot: Option<Leaf>,
    pub reset: Option<Leaf>,
}

/// Actions of the `time` module.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TimeModule {
    #[serde(flatten)]
    pub status: Status,
    pub get_time: Option<Leaf<DeviceTime>>,
    pub get_timezone: Option<Leaf<TimezoneInfo>>,
    pub set_timezone: Option<Leaf>,
}

/// Actions of the `netif` module.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NetifModule {
    #[serde(flatten)]
    pub status: Status,
    pub get_scaninfo: Option<Leaf<ScanInfo>>,
    pub set_stainfo: Option<Leaf>,
}

/// Actions of the `cnCloud` module.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CloudModule {
    #[serde(flatten)]
    pub status: Status,
    pub get_info: Option<Leaf<CloudInfo>>,
    pub bind: Option<Leaf>,
    pub unbind: Option<Leaf>,
    pub set_server_url: Option<Leaf>,
}

/// Actions of the `schedule` module.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScheduleModule {
    #[serde(flatten)]
    pub status: Status,
    pub get_rules: Option<Leaf<RuleList>>,
    pub get_next_action: Option<Leaf<NextAction>>,
    pub add_rule: Option<Leaf<AddedRule>>,
    pub edit_rule: Option<Leaf>,
    pub delete_rule: Option<Leaf>,
    pub delete_all_rules: Option<Leaf>,
}

/// Device system information.
///
/// Contains all device metadata and current state.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SysInfo {
    /// Device alias/name set by the user.
    pub alias: String,

    /// Device model (e.g., "HS100(US)", "HS110(EU)").
    pub model: String,

    /// Device name as reported by firmware.
    pub dev_name: String,

    /// MAC address of the device.
    pub mac: String,

    /// Alternative MAC address field used by some devices.
    pub mic_mac: String,

    /// Unique device ID.
    #[serde(rename = "deviceId")]
    pub device_id: String,

    /// Hardware ID.
    #[serde(rename = "hwId")]
    pub hw_id: String,

    /// OEM ID for device identification.
    #[serde(rename = "oemId")]
    pub oem_id: String,

    /// Hardware version.
    pub hw_ver: String,

    /// Software/firmware version.
    pub sw_ver: String,

    /// Device type identifier.
    #[serde(rename = "type")]
    pub device_type: String,

    /// Alternative type field used by some devices.
    pub mic_type: String,

    /// Current relay state (1 = on, 0 = off).
    pub relay_state: u8,

    /// Whether the LED indicator is off (1 = off, 0 = on).
    pub led_off: u8,

    /// WiFi signal strength in dBm (negative, closer to 0 = stronger).
    pub rssi: i32,

    /// Seconds since the relay was turned on (0 if off).
    pub on_time: u64,

    /// Whether a firmware update is in progress.
    pub updating: u8,

    /// Active mode (`schedule`, `count_down`, `none`).
    pub active_mode: String,

    /// Feature flags for the device.
    pub feature: String,

    /// Latitude for device location (if set), in 1e-4 degrees.
    pub latitude_i: i32,

    /// Longitude for device location (if set), in 1e-4 degrees.
    pub longitude_i: i32,
}

impl SysInfo {
    /// Returns the MAC address, preferring `mac` over `mic_mac`.
    pub fn mac_address(&self) -> &str {
        if self.mac.is_empty() {
            &self.mic_mac
        } else {
            &self.mac
        }
    }

    /// Returns the device type, preferring `type` over `mic_type`.
    pub fn device_type(&self) -> &str {
        if self.device_type.is_empty() {
            &self.mic_type
        } else {
            &self.device_type
        }
    }

    /// Returns true if the relay is on.
    pub fn is_on(&self) -> bool {
        self.relay_state == 1
    }

    /// Returns true if the LED is off.
    pub fn is_led_off(&self) -> bool {
        self.led_off == 1
    }

    /// Returns true if a firmware update is in progress.
    pub fn is_updating(&self) -> bool {
        self.updating == 1
    }
}

/// Device clock as reported by `get_time`, in the device's local time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DeviceTime {
    pub year: u16,
    pub month: u8,
    pub mday: u8,
    pub hour: u8,
    pub min: u8,
    pub sec: u8,
}

/// Timezone as reported by `get_timezone`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimezoneInfo {
    /// Index into the device's timezone table.
    pub index: i32,
    /// Zone name, on firmware that reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_str: Option<String>,
    /// POSIX TZ string, on firmware that reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tz_str: Option<String>,
    /// DST offset in minutes, on firmware that reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dst_offset: Option<i32>,
}

/// Result of `get_scaninfo`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanInfo {
    /// Networks visible to the device.
    pub ap_list: Vec<AccessPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wpa_level: Option<i32>,
}

/// Information about a WiFi network from a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AccessPoint {
    /// Network name (SSID)
    pub ssid: String,
    /// Security type: 0=none, 1=WEP, 2=WPA, 3=WPA2
    pub key_type: u8,
    /// Signal strength in dBm, on firmware that reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rssi: Option<i32>,
}

/// Cloud connection status information.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CloudInfo {
    /// Cloud username (email) if bound.
    pub username: String,

    /// Cloud server host.
    pub server: String,

    /// Whether the device is bound to a cloud account.
    pub binded: u8,

    /// Whether the device is connected to the cloud (1 = connected).
    pub cld_connection: u8,

    #[serde(rename = "illegalType")]
    pub illegal_type: i32,

    #[serde(rename = "stopConnect")]
    pub stop_connect: i32,

    #[serde(rename = "tcspStatus")]
    pub tcsp_status: i32,

    /// Firmware download page, if the cloud offered one.
    #[serde(rename = "fwDlPage")]
    pub fw_dl_page: String,
}

impl CloudInfo {
    /// Returns true if connected to the cloud.
    pub fn is_connected(&self) -> bool {
        self.cld_connection == 1
    }

    /// Returns true if bound to a cloud account.
    pub fn is_bound(&self) -> bool {
        self.binded == 1
    }
}

/// Result of `schedule.get_rules`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RuleList {
    pub rule_list: Vec<ScheduleRuleEntry>,
    /// Whether scheduling is enabled overall.
    pub enable: u8,
    pub version: u32,
}

/// One stored schedule rule.
///
/// Codes are kept as the device sent them; see [`ScheduleRuleEntry::start_option`]
/// and [`ScheduleRuleEntry::action`] for typed views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleRuleEntry {
    pub id: String,
    pub name: String,
    pub enable: u8,
    pub wday: Weekdays,
    pub repeat: u8,
    pub stime_opt: i32,
    pub smin: i32,
    /// Minutes relative to sunrise/sunset for such start options.
    pub soffset: i32,
    pub sact: i32,
    pub etime_opt: i32,
    pub emin: i32,
    pub eoffset: i32,
    pub eact: i32,
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub force: u8,
    pub latitude: i32,
    pub longitude: i32,
}

impl ScheduleRuleEntry {
    /// Returns true if the rule is active.
    pub fn is_enabled(&self) -> bool {
        self.enable == 1
    }

    /// Days the rule fires on.
    pub fn weekdays(&self) -> Weekdays {
        self.wday
    }

    /// Returns true if the rule repeats on its weekdays.
    pub fn repeats(&self) -> bool {
        self.repeat == 1
    }

    /// Start time option, if the code is known.
    pub fn start_option(&self) -> Option<crate::params::TimeOption> {
        crate::params::TimeOption::try_from(self.stime_opt).ok()
    }

    /// Relay action, if the code is known.
    pub fn action(&self) -> Option<crate::params::RuleAction> {
        crate::params::RuleAction::try_from(self.sact).ok()
    }
}

/// Result of `schedule.get_next_action`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NextAction {
    /// Rule type; -1 when nothing is scheduled.
    #[serde(rename = "type")]
    pub kind: i32,
    /// Id of the rule that fires next.
    pub id: String,
    /// Seconds after midnight (device time) at which it fires.
    #[serde(alias = "schd_time")]
    pub schd_sec: i64,
    /// Relay action (0 off, 1 on).
    pub action: i32,
}

/// Result of `schedule.add_rule`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AddedRule {
    /// Id assigned to the new rule.
    pub id: String,
}
