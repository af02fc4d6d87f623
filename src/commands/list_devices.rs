//! List available audio input devices.

use crate::recording::audio::suppress_alsa_warnings;
use anyhow::anyhow;
use cpal::traits::{DeviceTrait, HostTrait};

/// Lists all available audio input devices on the system.
///
/// Any listed name can be used as `audio.device` in tscribe.toml.
///
/// # Errors
/// - If the audio host cannot be initialized
pub fn handle_list_devices() -> Result<(), anyhow::Error> {
    let (host, devices) = suppress_alsa_warnings(|| {
        let host = cpal::default_host();
        let devices: Vec<cpal::Device> = host
            .input_devices()
            .map_err(|e| anyhow!("Failed to enumerate audio devices: {e}"))?
            .collect();
        Ok((host, devices))
    })?;

    if devices.is_empty() {
        println!("No audio input devices found on this system.");
        return Ok(());
    }

    println!("Available audio input devices:");
    println!();

    let default_device = host.default_input_device().and_then(|d| d.name().ok());

    for (index, device) in devices.iter().enumerate() {
        let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        let default_indicator = if default_device.as_ref() == Some(&name) {
            " [DEFAULT]"
        } else {
            ""
        };

        let config_info = match device.default_input_config() {
            Ok(config) => format!(
                "{}Hz, {} channels, {:?}",
                config.sample_rate().0,
                config.channels(),
                config.sample_format()
            ),
            Err(_) => "configuration unavailable".to_string(),
        };

        println!("  {index}: {name}{default_indicator}");
        println!("     {config_info}");
    }
    println!();
    println!("Set audio.device in tscribe.toml to one of the names above, or \"default\".");

    Ok(())
}
