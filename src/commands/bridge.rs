//! The `Android` bridge object exposed to the hosted page.
//!
//! The page sees a frozen object with exactly the methods in
//! [`BridgeMethod::ALL`]. Each method forwards to one Tauri command below;
//! those commands only enqueue UI work and return immediately.

use super::device_info::DeviceInfo;
use super::notifications::NotificationRecord;
use super::permissions::{PermissionHandler, PermissionKind, PermissionStatus, PlatformPermissions};
use crate::shell::navigation::HistoryPosition;
use crate::shell::queue::{UiQueue, UiTask};
use crate::shell::Notice;
use tauri::State;
use tracing::{debug, warn};

/// Operations callable from the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeMethod {
    GetDeviceInfo,
    RequestCameraPermission,
    RequestMicrophonePermission,
    ShowNotification,
}

impl BridgeMethod {
    pub const ALL: [BridgeMethod; 4] = [
        BridgeMethod::GetDeviceInfo,
        BridgeMethod::RequestCameraPermission,
        BridgeMethod::RequestMicrophonePermission,
        BridgeMethod::ShowNotification,
    ];

    /// Name on the bridge object
    pub fn js_name(self) -> &'static str {
        match self {
            BridgeMethod::GetDeviceInfo => "getDeviceInfo",
            BridgeMethod::RequestCameraPermission => "requestCameraPermission",
            BridgeMethod::RequestMicrophonePermission => "requestMicrophonePermission",
            BridgeMethod::ShowNotification => "showNotification",
        }
    }

    /// Tauri command backing the method
    pub fn command(self) -> &'static str {
        match self {
            BridgeMethod::GetDeviceInfo => "get_device_info",
            BridgeMethod::RequestCameraPermission => "request_camera_permission",
            BridgeMethod::RequestMicrophonePermission => "request_microphone_permission",
            BridgeMethod::ShowNotification => "show_notification",
        }
    }

    fn js_function(self) -> String {
        match self {
            // Device info is known at injection time, so the call can return synchronously
            BridgeMethod::GetDeviceInfo => format!(
                "function () {{ invoke('{}', {{}}); return DEVICE_INFO; }}",
                self.command()
            ),
            BridgeMethod::ShowNotification => format!(
                "function (title, message) {{ invoke('{}', {{ title: String(title), message: String(message) }}); }}",
                self.command()
            ),
            BridgeMethod::RequestCameraPermission | BridgeMethod::RequestMicrophonePermission => {
                format!("function () {{ invoke('{}', {{}}); }}", self.command())
            }
        }
    }
}

/// Command the back-navigation listeners call; not part of the bridge object
pub const NAVIGATE_BACK_COMMAND: &str = "navigate_back";

/// Command the history tracker reports positions through
pub const HISTORY_CHANGED_COMMAND: &str = "history_changed";

const INIT_SCRIPT_TEMPLATE: &str = r#"
(function () {
    'use strict';
    if (window.__shellBridgeInstalled) { return; }
    window.__shellBridgeInstalled = true;

    var DEVICE_INFO = __DEVICE_INFO__;

    function invoke(cmd, args) {
        try {
            var pending = window.__TAURI_INTERNALS__.invoke(cmd, args);
            if (pending && typeof pending.catch === 'function') {
                pending.catch(function () {});
            }
        } catch (_) {}
    }

    Object.defineProperty(window, __BRIDGE_NAME__, {
        value: Object.freeze({
__BRIDGE_METHODS__
        }),
        writable: false,
        configurable: false,
        enumerable: true
    });

    window.__shellNotice = function (message, durationMs) {
        var show = function () {
            var el = document.createElement('div');
            el.setAttribute('role', 'status');
            el.textContent = message;
            el.style.cssText = 'position:fixed;left:50%;bottom:64px;transform:translateX(-50%);' +
                'max-width:80%;padding:10px 16px;border-radius:18px;background:rgba(40,40,40,0.9);' +
                'color:#fff;font:14px/1.4 sans-serif;white-space:pre-line;z-index:2147483647;' +
                'pointer-events:none;';
            document.body.appendChild(el);
            setTimeout(function () { el.remove(); }, durationMs);
        };
        if (document.body) { show(); } else {
            document.addEventListener('DOMContentLoaded', show, { once: true });
        }
    };

    // Each session history entry carries its index in history.state; the
    // index of the current entry is mirrored in sessionStorage so full loads
    // and fragment changes can number the entry they create.
    var HISTORY_KEY = '__shellHistoryIndex';
    var pushState = history.pushState;
    var replaceState = history.replaceState;

    function storedIndex() {
        try {
            var value = parseInt(sessionStorage.getItem(HISTORY_KEY), 10);
            return isNaN(value) ? -1 : value;
        } catch (_) { return -1; }
    }
    function entryIndex(state) {
        return state && typeof state[HISTORY_KEY] === 'number' ? state[HISTORY_KEY] : -1;
    }
    function taggable(state) {
        return state === null || state === undefined ||
            (typeof state === 'object' && Object.getPrototypeOf(state) === Object.prototype);
    }
    function tag(state, index) {
        var tagged = {};
        if (state) { for (var key in state) { tagged[key] = state[key]; } }
        tagged[HISTORY_KEY] = index;
        return tagged;
    }
    function report(index) {
        try { sessionStorage.setItem(HISTORY_KEY, String(index)); } catch (_) {}
        var nav = window.navigation;
        var canGoBack = nav && typeof nav.canGoBack === 'boolean' ? nav.canGoBack : null;
        invoke('__HISTORY_CHANGED__', { index: index, canGoBack: canGoBack });
    }
    function sync() {
        var index = entryIndex(history.state);
        if (index < 0) {
            // An entry not seen before: fresh load or fragment navigation
            index = storedIndex() + 1;
            if (taggable(history.state)) {
                replaceState.call(history, tag(history.state, index), '');
            }
        }
        report(index);
    }

    history.pushState = function (state, title, url) {
        var index = storedIndex() + 1;
        var result = pushState.call(history, taggable(state) ? tag(state, index) : state, title, url);
        report(index);
        return result;
    };
    history.replaceState = function (state, title, url) {
        var index = entryIndex(history.state);
        var next = index >= 0 && taggable(state) ? tag(state, index) : state;
        return replaceState.call(history, next, title, url);
    };
    window.addEventListener('popstate', sync);
    window.addEventListener('pageshow', function (e) {
        if (e.persisted) { sync(); }
    });
    sync();

    document.addEventListener('keydown', function (e) {
        if (e.key === 'BrowserBack' || (e.altKey && e.key === 'ArrowLeft')) {
            e.preventDefault();
            invoke('__NAVIGATE_BACK__', {});
        }
    }, true);
    window.addEventListener('mouseup', function (e) {
        if (e.button === 3) {
            e.preventDefault();
            invoke('__NAVIGATE_BACK__', {});
        }
    }, true);
})();
"#;

/// Script injected into every page load of the main webview
pub fn init_script(bridge_name: &str, device_summary: &str) -> String {
    let methods = BridgeMethod::ALL
        .iter()
        .map(|m| format!("            {}: {}", m.js_name(), m.js_function()))
        .collect::<Vec<_>>()
        .join(",\n");

    // Page-independent placeholders first, device text last
    INIT_SCRIPT_TEMPLATE
        .replace("__BRIDGE_METHODS__", &methods)
        .replace("__BRIDGE_NAME__", &js_string(bridge_name))
        .replace("__NAVIGATE_BACK__", NAVIGATE_BACK_COMMAND)
        .replace("__HISTORY_CHANGED__", HISTORY_CHANGED_COMMAND)
        .replace("__DEVICE_INFO__", &js_string(device_summary))
}

/// Script that shows a notice over the current page
pub fn notice_script(message: &str, duration_ms: u64) -> String {
    format!(
        "window.__shellNotice && window.__shellNotice({}, {});",
        js_string(message),
        duration_ms
    )
}

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

// ============================================================================
// Bridge Operations
// ============================================================================

/// `getDeviceInfo()`: show the info and hand the same text back
pub fn device_info_call(device: &DeviceInfo, queue: &UiQueue) -> String {
    let summary = device.summary();
    queue.post(UiTask::Notice(Notice::long(summary.clone())));
    summary
}

/// `requestCameraPermission()` / `requestMicrophonePermission()`
///
/// The OS status lookup may block, so it runs on the blocking pool; the UI
/// thread only receives the finished task.
pub async fn permission_call<P>(kind: PermissionKind, permissions: P, queue: &UiQueue)
where
    P: PermissionHandler + Send + 'static,
{
    let status = tokio::task::spawn_blocking(move || permissions.check_permission(kind))
        .await
        .unwrap_or_else(|e| {
            warn!(?kind, "permission status check failed: {}", e);
            PermissionStatus::NotDetermined
        });
    queue.post(UiTask::RequestPermission { kind, status });
}

/// `showNotification(title, message)`
pub fn notification_call(title: String, message: String, queue: &UiQueue) {
    queue.post(UiTask::ShowNotification(NotificationRecord::new(title, message)));
}

// ============================================================================
// Tauri Commands
// ============================================================================

#[tauri::command]
pub async fn get_device_info(
    device: State<'_, DeviceInfo>,
    queue: State<'_, UiQueue>,
) -> Result<String, String> {
    debug!("bridge: getDeviceInfo");
    Ok(device_info_call(&device, &queue))
}

#[tauri::command]
pub async fn request_camera_permission(
    permissions: State<'_, PlatformPermissions>,
    queue: State<'_, UiQueue>,
) -> Result<(), String> {
    debug!("bridge: requestCameraPermission");
    permission_call(PermissionKind::Camera, permissions.inner().clone(), &queue).await;
    Ok(())
}

#[tauri::command]
pub async fn request_microphone_permission(
    permissions: State<'_, PlatformPermissions>,
    queue: State<'_, UiQueue>,
) -> Result<(), String> {
    debug!("bridge: requestMicrophonePermission");
    permission_call(PermissionKind::Microphone, permissions.inner().clone(), &queue).await;
    Ok(())
}

#[tauri::command]
pub async fn show_notification(
    title: String,
    message: String,
    queue: State<'_, UiQueue>,
) -> Result<(), String> {
    debug!(%title, "bridge: showNotification");
    notification_call(title, message, &queue);
    Ok(())
}

/// Back trigger from the page's key and mouse listeners
#[tauri::command]
pub async fn navigate_back(queue: State<'_, UiQueue>) -> Result<(), String> {
    queue.dispatch(UiTask::NavigateBack).map_err(String::from)
}

/// Position report from the page's history tracker
#[tauri::command]
pub async fn history_changed(
    index: u32,
    can_go_back: Option<bool>,
    queue: State<'_, UiQueue>,
) -> Result<(), String> {
    debug!(index, ?can_go_back, "history changed");
    queue
        .dispatch(UiTask::HistoryChanged(HistoryPosition { index, can_go_back }))
        .map_err(String::from)
}
