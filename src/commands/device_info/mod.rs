// Platform-specific device info lookup
#[cfg(target_os = "macos")]
mod macos;

#[cfg(not(target_os = "macos"))]
mod stub;

// Re-export the platform-specific implementation
#[cfg(target_os = "macos")]
pub use macos::*;

#[cfg(not(target_os = "macos"))]
pub use stub::*;


pub const UNKNOWN: &str = "unknown";

/// Identity of the device the shell runs on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub model: String,
    pub os_version: String,
    pub manufacturer: String,
}

impl DeviceInfo {
    pub fn new(
        model: impl Into<String>,
        os_version: impl Into<String>,
        manufacturer: impl Into<String>,
    ) -> Self {
        Self {
            model: normalize(model.into()),
            os_version: normalize(os_version.into()),
            manufacturer: normalize(manufacturer.into()),
        }
    }

    /// Detect the current device once
    pub fn detect() -> Self {
        PlatformDeviceInfo::device_info()
    }

    /// Three-line text returned to the page and shown as a notice
    pub fn summary(&self) -> String {
        format!(
            "Device model: {}\nOS version: {}\nManufacturer: {}",
            self.model, self.os_version, self.manufacturer
        )
    }
}

fn normalize(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        UNKNOWN.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Trait for platform-specific device identity lookup
pub trait DeviceInfoProvider {
    fn device_info() -> DeviceInfo;
}
