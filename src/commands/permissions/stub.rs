use super::{PermissionHandler, PermissionKind, PermissionResponder, PermissionStatus, Ticket};
use crate::error::ShellError;
use tauri::plugin::PluginApi;
use tauri::{AppHandle, Wry};

/// Desktop platforms without a runtime permission model (Windows, Linux).
/// Mobile targets never use this.
#[derive(Debug, Clone, Copy)]
pub struct PlatformPermissions;

impl PlatformPermissions {
    pub fn register(_app: &AppHandle<Wry>, _api: PluginApi<Wry, ()>) -> Result<Self, ShellError> {
        Ok(Self)
    }
}

impl PermissionHandler for PlatformPermissions {
    fn check_permission(&self, _kind: PermissionKind) -> PermissionStatus {
        // Capture devices are not gated by the OS here
        PermissionStatus::Granted
    }

    fn request_permission(&self, _kind: PermissionKind, ticket: Ticket, responder: PermissionResponder) {
        responder.deliver(ticket, vec![PermissionStatus::Granted]);
    }
}
