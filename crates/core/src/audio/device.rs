use cpal::traits::{DeviceTrait, HostTrait};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("failed to enumerate audio devices: {0}")]
    Enumerate(#[from] cpal::DevicesError),
    #[error("no default input device available")]
    NoDefaultDevice,
    #[error("no input device matches '{0}'")]
    NoMatch(String),
    #[error("failed to read device configuration: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
}

/// How the user picked an input device on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeviceSelector {
    Default,
    Index(usize),
    Name(String),
}

impl DeviceSelector {
    /// A raw argument is a numeric ID when it parses as one, otherwise a
    /// case-insensitive name substring.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<usize>() {
            Ok(index) => Self::Index(index),
            Err(_) => Self::Name(raw.to_string()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct InputDeviceInfo {
    pub index: usize,
    pub name: String,
    pub channels: u16,
    pub default_sample_rate: u32,
}

/// Enumerate input devices for `--list-devices`.
///
/// Devices that refuse to report a default input configuration are skipped;
/// indices follow the host's enumeration order, matching what
/// [`select_input_device`] resolves numeric selectors against.
pub fn list_input_devices() -> Result<Vec<InputDeviceInfo>, DeviceError> {
    let host = cpal::default_host();
    let mut infos = Vec::new();
    for (index, device) in host.input_devices()?.enumerate() {
        let name = device
            .name()
            .unwrap_or_else(|_| "<unknown>".to_string());
        match device.default_input_config() {
            Ok(config) => infos.push(InputDeviceInfo {
                index,
                name,
                channels: config.channels(),
                default_sample_rate: config.sample_rate().0,
            }),
            Err(err) => log::debug!("skipping input device '{name}': {err}"),
        }
    }
    Ok(infos)
}

pub fn select_input_device(selector: &DeviceSelector) -> Result<cpal::Device, DeviceError> {
    let host = cpal::default_host();
    match selector {
        DeviceSelector::Default => host
            .default_input_device()
            .ok_or(DeviceError::NoDefaultDevice),
        DeviceSelector::Index(index) => host
            .input_devices()?
            .nth(*index)
            .ok_or_else(|| DeviceError::NoMatch(index.to_string())),
        DeviceSelector::Name(needle) => {
            let needle_lower = needle.to_lowercase();
            for device in host.input_devices()? {
                if let Ok(name) = device.name() {
                    if name.to_lowercase().contains(&needle_lower) {
                        return Ok(device);
                    }
                }
            }
            Err(DeviceError::NoMatch(needle.clone()))
        }
    }
}

/// The device's native rate, used when `-r` is not given.
pub fn default_sample_rate(device: &cpal::Device) -> Result<u32, DeviceError> {
    Ok(device.default_input_config()?.sample_rate().0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", DeviceSelector::Index(0))]
    #[case("12", DeviceSelector::Index(12))]
    #[case("pulse", DeviceSelector::Name("pulse".to_string()))]
    #[case("USB Mic 2", DeviceSelector::Name("USB Mic 2".to_string()))]
    fn test_selector_parse(#[case] raw: &str, #[case] expected: DeviceSelector) {
        assert_eq!(DeviceSelector::parse(raw), expected);
    }
}
