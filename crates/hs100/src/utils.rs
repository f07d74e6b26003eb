use std::io::IsTerminal;

use hs100_core::Credentials;
use serde_json::Value;

/// Read password securely based on the provided options.
///
/// # Arguments
///
/// * `password_stdin` - Whether to read from stdin
/// * `password` - Pre-provided password (hidden CLI option)
/// * `prompt` - The prompt to display when reading interactively
///
/// # Priority
///
/// 1. If `password` was provided (hidden option), use it
/// 2. If `password_stdin` is true, read from stdin
/// 3. Otherwise, prompt interactively (if terminal is available)
pub fn read_password(
    password_stdin: bool,
    password: Option<String>,
    prompt: &str,
) -> Result<String, String> {
    if let Some(pass) = password {
        return Ok(pass);
    }

    if password_stdin {
        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .map_err(|e| format!("Failed to read password from stdin: {}", e))?;
        return Ok(input.trim_end_matches(['\r', '\n']).to_string());
    }

    if std::io::stdin().is_terminal() {
        eprint!("{}: ", prompt);
        rpassword::read_password().map_err(|e| format!("Failed to read password: {}", e))
    } else {
        Err("No password provided. Use --password-stdin when piping input.".to_string())
    }
}

/// Get cloud credentials for `username`.
///
/// The password comes from the hidden `--password` flag, the HS100_PASSWORD
/// env var, stdin (if --password-stdin), or an interactive prompt, in that order.
pub fn cloud_credentials(
    username: String,
    password_stdin: bool,
    password: Option<String>,
) -> Result<Credentials, String> {
    let password = match password {
        Some(pass) => Some(pass),
        None => std::env::var("HS100_PASSWORD").ok(),
    };

    let prompt = format!("Password for {}", username);
    let pass = read_password(password_stdin, password, &prompt)?;
    Ok(Credentials::new(username, pass))
}

/// Print the device's reply text as received.
pub fn print_json_response(response: &str) {
    println!("{}", response);
}

/// Print a typed result as JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string(value)
        .map_err(|e| format!("Failed to serialize response: {}", e))?;
    println!("{}", json);
    Ok(())
}

/// Parse the optional argument object of a raw command.
pub fn parse_raw_args(args: Option<&str>) -> Result<Value, String> {
    match args {
        None => Ok(Value::Null),
        Some(text) => {
            serde_json::from_str(text).map_err(|e| format!("Invalid JSON arguments: {}", e))
        }
    }
}

/// Print guidance message after successful WiFi join command.
pub fn print_wifi_join_success(host: &str, ssid: &str) {
    eprintln!();
    eprintln!("WiFi credentials sent successfully!");
    eprintln!();
    eprintln!("The device will now:");
    eprintln!("  1. Disconnect from its access point (you will lose connection)");
    eprintln!("  2. Attempt to connect to '{}'", ssid);
    eprintln!();
    eprintln!("Once it has joined, find its new address on your router and run:");
    eprintln!("  hs100 device <address> info");
    eprintln!("({} will no longer answer)", host);
}
