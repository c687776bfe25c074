use super::{DeviceInfo, DeviceInfoProvider, UNKNOWN};
use objc::runtime::Object;
use objc::{class, msg_send, sel, sel_impl};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

/// macOS-specific device info implementation
pub struct PlatformDeviceInfo;

impl PlatformDeviceInfo {
    /// Hardware model identifier, e.g. "MacBookPro18,3"
    fn hardware_model() -> Option<String> {
        let name = CString::new("hw.model").ok()?;
        let mut size: libc::size_t = 0;

        unsafe {
            if libc::sysctlbyname(name.as_ptr(), ptr::null_mut(), &mut size, ptr::null_mut(), 0)
                != 0
            {
                return None;
            }

            let mut buf = vec![0u8; size];
            if libc::sysctlbyname(
                name.as_ptr(),
                buf.as_mut_ptr() as *mut libc::c_void,
                &mut size,
                ptr::null_mut(),
                0,
            ) != 0
            {
                return None;
            }

            buf.truncate(size);
            while buf.last() == Some(&0) {
                buf.pop();
            }
            String::from_utf8(buf).ok()
        }
    }

    /// Human-readable OS version from NSProcessInfo
    fn os_version() -> Option<String> {
        unsafe {
            let process_info: *mut Object = msg_send![class!(NSProcessInfo), processInfo];
            if process_info.is_null() {
                return None;
            }

            let version: *mut Object = msg_send![process_info, operatingSystemVersionString];
            if version.is_null() {
                return None;
            }

            let utf8: *const c_char = msg_send![version, UTF8String];
            if utf8.is_null() {
                return None;
            }

            Some(CStr::from_ptr(utf8).to_string_lossy().into_owned())
        }
    }
}

impl DeviceInfoProvider for PlatformDeviceInfo {
    fn device_info() -> DeviceInfo {
        DeviceInfo::new(
            Self::hardware_model().unwrap_or_else(|| UNKNOWN.to_string()),
            Self::os_version().unwrap_or_else(|| UNKNOWN.to_string()),
            "Apple",
        )
    }
}
