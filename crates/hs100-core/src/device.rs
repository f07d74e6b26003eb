//! Typed calls for every action the plug supports.
//!
//! [`DeviceExt`] is implemented for every [`Transport`], so a
//! [`TcpTransport`](crate::TcpTransport) doubles as a handle to one plug.
//! Each call builds its command, runs it through
//! [`execute_command`](crate::execute_command), picks its one leaf out of
//! the reply and turns a nonzero `err_code` into [`Error::DeviceError`].

use async_trait::async_trait;
use tracing::debug;

use crate::{
    command::Command,
    commands,
    credentials::Credentials,
    error::Error,
    execute_command,
    params::{KeyType, ScheduleRule, TimezoneSetting},
    response::{
        AccessPoint, CloudInfo, DeviceTime, Leaf, NextAction, ResponseDocument, RuleList,
        SysInfo, TimezoneInfo,
    },
    transport::Transport,
};

/// Per-action calls on a device.
///
/// # Example
///
/// ```no_run
/// use hs100_core::{DeviceExt, TcpTransport, DEFAULT_PORT, DEFAULT_TIMEOUT};
///
/// #[tokio::main]
/// async fn main() -> Result<(), hs100_core::Error> {
///     let plug = TcpTransport::new("192.168.1.100", DEFAULT_PORT, DEFAULT_TIMEOUT);
///     plug.set_relay_state(true).await?;
///     plug.set_alias("Desk lamp").await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait DeviceExt: Transport {
    /// Fetches device information and state.
    async fn get_sysinfo(&self) -> Result<SysInfo, Error> {
        call(self, commands::get_sysinfo(), |d| d.system?.get_sysinfo).await
    }

    /// Switches the relay on or off.
    async fn set_relay_state(&self, on: bool) -> Result<(), Error> {
        call(self, commands::set_relay_state(on), |d| {
            d.system?.set_relay_state
        })
        .await
        .map(drop)
    }

    /// Switches the LED indicator off (`true`) or on (`false`).
    async fn set_led_off(&self, off: bool) -> Result<(), Error> {
        call(self, commands::set_led_off(off), |d| d.system?.set_led_off)
            .await
            .map(drop)
    }

    /// Renames the device.
    async fn set_alias(&self, alias: &str) -> Result<(), Error> {
        call(self, commands::set_alias(alias), |d| d.system?.set_dev_alias)
            .await
            .map(drop)
    }

    /// Reboots the device after `delay` seconds.
    async fn reboot(&self, delay: u32) -> Result<(), Error> {
        call(self, commands::reboot(delay), |d| d.system?.reboot)
            .await
            .map(drop)
    }

    /// Factory resets the device after `delay` seconds.
    async fn reset(&self, delay: u32) -> Result<(), Error> {
        call(self, commands::reset(delay), |d| d.system?.reset)
            .await
            .map(drop)
    }

    /// Reads the device clock. No timezone conversion is applied.
    async fn get_time(&self) -> Result<DeviceTime, Error> {
        call(self, commands::get_time(), |d| d.time?.get_time).await
    }

    /// Reads the device's timezone index.
    async fn get_timezone(&self) -> Result<TimezoneInfo, Error> {
        call(self, commands::get_timezone(), |d| d.time?.get_timezone).await
    }

    /// Sets date, time and timezone index.
    async fn set_timezone(&self, setting: &TimezoneSetting) -> Result<(), Error> {
        call(self, commands::set_timezone(setting)?, |d| {
            d.time?.set_timezone
        })
        .await
        .map(drop)
    }

    /// Lists WiFi networks visible to the device.
    async fn scan_wifi(&self, refresh: bool) -> Result<Vec<AccessPoint>, Error> {
        call(self, commands::scan_wifi(refresh), |d| d.netif?.get_scaninfo)
            .await
            .map(|scan| scan.ap_list)
    }

    /// Joins the device to a WiFi network.
    async fn join_wifi(&self, ssid: &str, password: &str, key_type: KeyType) -> Result<(), Error> {
        call(self, commands::join_wifi(ssid, password, key_type), |d| {
            d.netif?.set_stainfo
        })
        .await
        .map(drop)
    }

    /// Reads the cloud binding state.
    async fn get_cloud_info(&self) -> Result<CloudInfo, Error> {
        call(self, commands::get_cloud_info(), |d| d.cloud?.get_info).await
    }

    /// Binds the device to a cloud account.
    async fn cloud_bind(&self, credentials: &Credentials) -> Result<(), Error> {
        call(self, commands::cloud_bind(credentials), |d| d.cloud?.bind)
            .await
            .map(drop)
    }

    /// Unbinds the device from its cloud account.
    async fn cloud_unbind(&self) -> Result<(), Error> {
        call(self, commands::cloud_unbind(), |d| d.cloud?.unbind)
            .await
            .map(drop)
    }

    /// Points the device at another cloud server.
    async fn set_cloud_server(&self, url: &str) -> Result<(), Error> {
        call(self, commands::set_cloud_server(url), |d| {
            d.cloud?.set_server_url
        })
        .await
        .map(drop)
    }

    /// Lists the schedule rules stored on the device.
    async fn get_schedule_rules(&self) -> Result<RuleList, Error> {
        call(self, commands::get_schedule_rules(), |d| d.schedule?.get_rules).await
    }

    /// Returns the next scheduled relay change, if any.
    async fn get_next_action(&self) -> Result<NextAction, Error> {
        call(self, commands::get_next_action(), |d| {
            d.schedule?.get_next_action
        })
        .await
    }

    /// Adds a rule and returns the id the device assigned to it.
    async fn add_schedule_rule(&self, rule: &ScheduleRule) -> Result<String, Error> {
        call(self, commands::add_schedule_rule(rule)?, |d| {
            d.schedule?.add_rule
        })
        .await
        .map(|added| added.id)
    }

    /// Replaces the rule stored under `id`.
    async fn edit_schedule_rule(&self, id: &str, rule: &ScheduleRule) -> Result<(), Error> {
        call(self, commands::edit_schedule_rule(id, rule)?, |d| {
            d.schedule?.edit_rule
        })
        .await
        .map(drop)
    }

    /// Deletes the rule stored under `id`.
    async fn delete_schedule_rule(&self, id: &str) -> Result<(), Error> {
        call(self, commands::delete_schedule_rule(id), |d| {
            d.schedule?.delete_rule
        })
        .await
        .map(drop)
    }

    /// Removes every schedule rule.
    async fn delete_all_schedule_rules(&self) -> Result<(), Error> {
        call(self, commands::delete_all_schedule_rules(), |d| {
            d.schedule?.delete_all_rules
        })
        .await
        .map(drop)
    }
}

impl<T: Transport + ?Sized> DeviceExt for T {}

/// Executes `command` and returns the data of the leaf chosen by `pick`.
async fn call<X, T, F>(transport: &X, command: Command, pick: F) -> Result<T, Error>
where
    X: Transport + ?Sized,
    T: Send,
    F: FnOnce(ResponseDocument) -> Option<Leaf<T>> + Send,
{
    let doc = execute_command(transport, &command).await?;

    if let Some(status) = doc.module_error(command.module()) {
        status.check()?;
    }

    let leaf = pick(doc).ok_or_else(|| Error::missing_leaf(command.module(), command.action()))?;
    debug!(
        module = command.module(),
        action = command.action(),
        err_code = leaf.status.err_code,
        "response leaf"
    );
    leaf.into_data()
}
