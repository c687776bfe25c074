use super::{
    status_in_response, PermissionHandler, PermissionKind, PermissionResponder, PermissionStatus,
    Ticket,
};
use crate::error::ShellError;
use serde::Serialize;
use std::collections::HashMap;
use tauri::plugin::{PluginApi, PluginHandle};
use tauri::{AppHandle, Wry};
use tracing::{debug, warn};

const PLUGIN_PACKAGE: &str = "com.chatapp.shell";
const PLUGIN_CLASS: &str = "PermissionPlugin";

#[derive(Serialize)]
struct RequestArgs {
    permissions: Vec<&'static str>,
}

/// Android runtime permissions through the Kotlin `PermissionPlugin`.
///
/// The plugin declares `camera` and `microphone` aliases; its built-in
/// `checkPermissions`/`requestPermissions` commands answer with an
/// alias-to-state map.
#[derive(Clone)]
pub struct PlatformPermissions {
    handle: PluginHandle<Wry>,
}

impl PlatformPermissions {
    pub fn register(_app: &AppHandle<Wry>, api: PluginApi<Wry, ()>) -> Result<Self, ShellError> {
        let handle = api
            .register_android_plugin(PLUGIN_PACKAGE, PLUGIN_CLASS)
            .map_err(|e| ShellError::Permission(e.to_string()))?;
        Ok(Self { handle })
    }

    fn check_states(&self) -> Result<HashMap<String, String>, ShellError> {
        self.handle
            .run_mobile_plugin("checkPermissions", ())
            .map_err(|e| ShellError::Permission(e.to_string()))
    }

    fn request_states(&self, kind: PermissionKind) -> Result<HashMap<String, String>, ShellError> {
        self.handle
            .run_mobile_plugin(
                "requestPermissions",
                RequestArgs {
                    permissions: vec![kind.alias()],
                },
            )
            .map_err(|e| ShellError::Permission(e.to_string()))
    }
}

impl PermissionHandler for PlatformPermissions {
    fn check_permission(&self, kind: PermissionKind) -> PermissionStatus {
        match self.check_states() {
            Ok(states) => status_in_response(kind, &states),
            Err(e) => {
                warn!(permission = kind.platform_id(), "status check failed: {}", e);
                PermissionStatus::NotDetermined
            }
        }
    }

    fn request_permission(&self, kind: PermissionKind, ticket: Ticket, responder: PermissionResponder) {
        debug!(permission = kind.platform_id(), ?ticket, "requesting runtime permission");

        // The plugin call blocks until the user answers; keep it off the UI thread
        let permissions = self.clone();
        tauri::async_runtime::spawn_blocking(move || {
            let grants = match permissions.request_states(kind) {
                Ok(states) => vec![status_in_response(kind, &states)],
                Err(e) => {
                    warn!(permission = kind.platform_id(), "permission request failed: {}", e);
                    Vec::new()
                }
            };
            responder.deliver(ticket, grants);
        });
    }
}
