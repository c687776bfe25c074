use super::{PermissionHandler, PermissionKind, PermissionResponder, PermissionStatus, Ticket};
use crate::error::ShellError;
use block::ConcreteBlock;
use objc::runtime::{BOOL, YES};
use objc::{class, msg_send, sel, sel_impl};
use objc_foundation::{INSString, NSString};
use tauri::plugin::PluginApi;
use tauri::{AppHandle, Wry};
use tracing::debug;

/// macOS-specific permission implementation
#[derive(Debug, Clone, Copy)]
pub struct PlatformPermissions;

impl PlatformPermissions {
    /// AVFoundation is queried directly; nothing to register
    pub fn register(_app: &AppHandle<Wry>, _api: PluginApi<Wry, ()>) -> Result<Self, ShellError> {
        Ok(Self)
    }

    /// AVMediaType backing a permission kind
    fn media_type(kind: PermissionKind) -> &'static str {
        match kind {
            PermissionKind::Camera => "vide",
            PermissionKind::Microphone => "soun",
        }
    }

    /// Convert AVAuthorizationStatus to our PermissionStatus
    fn convert_av_authorization_status(status: i64) -> PermissionStatus {
        match status {
            0 => PermissionStatus::NotDetermined, // AVAuthorizationStatusNotDetermined
            1 => PermissionStatus::Restricted,    // AVAuthorizationStatusRestricted
            2 => PermissionStatus::Denied,        // AVAuthorizationStatusDenied
            3 => PermissionStatus::Granted,       // AVAuthorizationStatusAuthorized
            _ => PermissionStatus::NotDetermined,
        }
    }
}

impl PermissionHandler for PlatformPermissions {
    fn check_permission(&self, kind: PermissionKind) -> PermissionStatus {
        unsafe {
            let av_capture_device_class = class!(AVCaptureDevice);
            let media_type = NSString::from_str(Self::media_type(kind));
            let status: i64 =
                msg_send![av_capture_device_class, authorizationStatusForMediaType: media_type];

            Self::convert_av_authorization_status(status)
        }
    }

    fn request_permission(&self, kind: PermissionKind, ticket: Ticket, responder: PermissionResponder) {
        debug!(?kind, ?ticket, "requesting AVFoundation access");

        unsafe {
            let av_capture_device_class = class!(AVCaptureDevice);
            let media_type = NSString::from_str(Self::media_type(kind));

            // The completion handler runs on an arbitrary queue; it only enqueues
            let block = ConcreteBlock::new(move |granted: BOOL| {
                let status = if granted == YES {
                    PermissionStatus::Granted
                } else {
                    PermissionStatus::Denied
                };
                responder.deliver(ticket, vec![status]);
            });
            let block = block.copy();

            let _: () = msg_send![
                av_capture_device_class,
                requestAccessForMediaType: media_type
                completionHandler: &*block
            ];
        }
    }
}
