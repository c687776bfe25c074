// Device info for Android, Linux and everything else without a native lookup

use super::{DeviceInfo, DeviceInfoProvider, UNKNOWN};

/// Platform provider (non-macOS)
pub struct PlatformDeviceInfo;

#[cfg(target_os = "android")]
impl DeviceInfoProvider for PlatformDeviceInfo {
    fn device_info() -> DeviceInfo {
        DeviceInfo::new(
            getprop("ro.product.model"),
            getprop("ro.build.version.release"),
            getprop("ro.product.manufacturer"),
        )
    }
}

#[cfg(target_os = "linux")]
impl DeviceInfoProvider for PlatformDeviceInfo {
    fn device_info() -> DeviceInfo {
        DeviceInfo::new(
            read_trimmed("/sys/class/dmi/id/product_name"),
            read_trimmed("/proc/sys/kernel/osrelease"),
            read_trimmed("/sys/class/dmi/id/sys_vendor"),
        )
    }
}

#[cfg(not(any(target_os = "android", target_os = "linux")))]
impl DeviceInfoProvider for PlatformDeviceInfo {
    fn device_info() -> DeviceInfo {
        // Only the OS family is known here; model and vendor report as unknown
        DeviceInfo::new(UNKNOWN, std::env::consts::OS, UNKNOWN)
    }
}

#[cfg(target_os = "android")]
fn getprop(key: &str) -> String {
    match std::process::Command::new("getprop").arg(key).output() {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        }
        Ok(_) | Err(_) => {
            tracing::debug!(key, "getprop lookup failed");
            UNKNOWN.to_string()
        }
    }
}

#[cfg(target_os = "linux")]
fn read_trimmed(path: &str) -> String {
    std::fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|_| UNKNOWN.to_string())
}
