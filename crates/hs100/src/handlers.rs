use std::time::Duration;

use hs100_core::{Command as RawCommand, DeviceConfig, DeviceExt, TcpTransport, Transport};
use serde_json::json;
use tracing::{debug, error};

use crate::cli::{DeviceCommand, timezone_setting};
use crate::utils::{
    cloud_credentials, parse_raw_args, print_json, print_json_response, print_wifi_join_success,
    read_password,
};

/// Handle the version command.
pub fn handle_version() {
    println!("hs100 {}", env!("CARGO_PKG_VERSION"));
    println!("hs100-core {}", hs100_core::VERSION);
}

/// Handle the device command.
pub async fn handle_device(target: String, port: u16, timeout: Duration, command: DeviceCommand) {
    let config = DeviceConfig::new(target.as_str())
        .with_port(port)
        .with_timeout(timeout);
    let plug = TcpTransport::from_config(&config);
    debug!(host = %target, port, "sending device command");

    if let Err(e) = run_device_command(&plug, command).await {
        error!(host = %target, port, error = %e, "command failed");
        eprintln!("Error: {}:{}: {}", target, port, e);
        std::process::exit(1);
    }
}

/// Runs one subcommand and prints its result on stdout.
async fn run_device_command(plug: &TcpTransport, command: DeviceCommand) -> Result<(), String> {
    match command {
        DeviceCommand::Info => print_json(&plug.get_sysinfo().await.map_err(fail)?),
        DeviceCommand::On => done(plug.set_relay_state(true).await),
        DeviceCommand::Off => done(plug.set_relay_state(false).await),
        DeviceCommand::Ledon => done(plug.set_led_off(false).await),
        DeviceCommand::Ledoff => done(plug.set_led_off(true).await),
        DeviceCommand::Alias { name } => done(plug.set_alias(&name).await),
        DeviceCommand::Reboot { delay } => done(plug.reboot(delay).await),
        DeviceCommand::Reset { delay } => done(plug.reset(delay).await),
        DeviceCommand::Time => print_json(&plug.get_time().await.map_err(fail)?),
        DeviceCommand::Timezone => print_json(&plug.get_timezone().await.map_err(fail)?),
        DeviceCommand::SetTimezone { index, date, time } => {
            done(plug.set_timezone(&timezone_setting(index, date, time)).await)
        }
        DeviceCommand::Wlanscan { refresh } => {
            print_json(&plug.scan_wifi(refresh).await.map_err(fail)?)
        }
        DeviceCommand::WifiJoin {
            ssid,
            keytype,
            password_stdin,
            password,
        } => {
            // Read WiFi password before attempting connection
            let prompt = format!("WiFi password for '{}'", ssid);
            let pass = read_password(password_stdin, password, &prompt)?;
            done(plug.join_wifi(&ssid, &pass, keytype).await)?;
            print_wifi_join_success(plug.host(), &ssid);
            Ok(())
        }
        DeviceCommand::Cloudinfo => print_json(&plug.get_cloud_info().await.map_err(fail)?),
        DeviceCommand::CloudBind {
            username,
            password_stdin,
            password,
        } => {
            let credentials = cloud_credentials(username, password_stdin, password)?;
            done(plug.cloud_bind(&credentials).await)
        }
        DeviceCommand::CloudUnbind => done(plug.cloud_unbind().await),
        DeviceCommand::CloudServer { url } => done(plug.set_cloud_server(&url).await),
        DeviceCommand::Schedule => print_json(&plug.get_schedule_rules().await.map_err(fail)?),
        DeviceCommand::NextAction => print_json(&plug.get_next_action().await.map_err(fail)?),
        DeviceCommand::ScheduleAdd(args) => {
            let id = plug.add_schedule_rule(&args.to_rule()).await.map_err(fail)?;
            print_json(&json!({ "id": id }))
        }
        DeviceCommand::ScheduleEdit { id, rule } => {
            done(plug.edit_schedule_rule(&id, &rule.to_rule()).await)
        }
        DeviceCommand::ScheduleDelete { id } => done(plug.delete_schedule_rule(&id).await),
        DeviceCommand::ScheduleClear => done(plug.delete_all_schedule_rules().await),
        DeviceCommand::Raw {
            module,
            action,
            args,
        } => {
            let arguments = parse_raw_args(args.as_deref())?;
            let command =
                RawCommand::with_arguments(module, action, arguments).map_err(fail)?;
            debug!(command = %command.to_json(), "sending raw command");
            let response = plug.send(&command.to_json()).await.map_err(fail)?;
            print_json_response(&response);
            Ok(())
        }
    }
}

fn fail(e: hs100_core::Error) -> String {
    e.to_string()
}

/// Prints the outcome of an action that returns no data.
fn done(result: Result<(), hs100_core::Error>) -> Result<(), String> {
    result.map_err(fail)?;
    print_json(&json!({ "success": true }))
}
