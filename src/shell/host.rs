use super::queue::UiQueue;
use super::{HostSurface, Notice, NoticeLength, Shell};
use crate::commands::bridge;
use crate::commands::device_info::DeviceInfo;
use crate::commands::notifications::{NotificationChannel, NotificationKey, NotificationRecord};
use crate::commands::permissions::{
    PermissionHandler, PermissionKind, PermissionResponder, PlatformPermissions, Ticket,
};
use crate::config::{ShellConfig, MAIN_WINDOW};
use crate::error::ShellError;
use std::sync::Mutex;
use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use tauri_plugin_notification::NotificationExt;
use tracing::{info, warn};

/// Shell as managed Tauri state; only locked on the main thread
pub type ShellState = Mutex<Shell<TauriHost>>;

/// [`HostSurface`] backed by the Tauri app and its main webview window
pub struct TauriHost {
    app: AppHandle,
    queue: UiQueue,
    permissions: PlatformPermissions,
    short_notice_ms: u64,
    long_notice_ms: u64,
}

impl TauriHost {
    pub fn new(
        app: AppHandle,
        queue: UiQueue,
        permissions: PlatformPermissions,
        config: &ShellConfig,
    ) -> Self {
        Self {
            app,
            queue,
            permissions,
            short_notice_ms: config.short_notice_ms,
            long_notice_ms: config.long_notice_ms,
        }
    }

    fn main_window(&self) -> Result<WebviewWindow, ShellError> {
        self.app
            .get_webview_window(MAIN_WINDOW)
            .ok_or_else(|| ShellError::Window(format!("window '{}' not found", MAIN_WINDOW)))
    }

    fn eval(&self, script: &str) -> Result<(), ShellError> {
        self.main_window()?
            .eval(script)
            .map_err(|e| ShellError::Window(e.to_string()))
    }
}

impl HostSurface for TauriHost {
    fn show_notice(&self, notice: &Notice) {
        let duration = match notice.length {
            NoticeLength::Short => self.short_notice_ms,
            NoticeLength::Long => self.long_notice_ms,
        };
        if let Err(e) = self.eval(&bridge::notice_script(&notice.message, duration)) {
            warn!("could not show notice: {}", e);
        }
    }

    fn prompt_permission(&self, kind: PermissionKind, ticket: Ticket) {
        self.permissions.request_permission(
            kind,
            ticket,
            PermissionResponder::new(self.queue.clone()),
        );
    }

    #[cfg(mobile)]
    fn create_notification_channel(
        &self,
        channel: &NotificationChannel,
    ) -> Result<(), ShellError> {
        use tauri_plugin_notification::{Channel, Importance};

        self.app
            .notification()
            .create_channel(
                Channel::builder(channel.id.clone(), channel.name.clone())
                    .importance(Importance::Default)
                    .build(),
            )
            .map_err(|e| ShellError::Notification(e.to_string()))
    }

    // Desktop notification centers have no channels
    #[cfg(desktop)]
    fn create_notification_channel(
        &self,
        _channel: &NotificationChannel,
    ) -> Result<(), ShellError> {
        Ok(())
    }

    fn post_notification(
        &self,
        key: NotificationKey,
        record: &NotificationRecord,
        channel: &NotificationChannel,
    ) -> Result<(), ShellError> {
        self.app
            .notification()
            .builder()
            .id(key.0)
            .channel_id(channel.id.clone())
            .title(record.title.clone())
            .body(record.body.clone())
            .auto_cancel()
            .show()
            .map_err(|e| ShellError::Notification(e.to_string()))
    }

    fn history_back(&self) -> Result<(), ShellError> {
        self.eval("window.history.back();")
            .map_err(|e| ShellError::Navigation(e.to_string()))
    }

    fn exit(&self) {
        self.app.exit(0);
    }
}

/// Create the main webview window with the bridge installed
pub fn build_main_window(
    app: &tauri::App,
    config: &ShellConfig,
    device: &DeviceInfo,
) -> Result<WebviewWindow, ShellError> {
    let url = config.hosted_url()?;
    let script = bridge::init_script(&config.bridge_name, &device.summary());

    let builder = WebviewWindowBuilder::new(app, MAIN_WINDOW, WebviewUrl::External(url.clone()))
        .initialization_script(&script)
        .incognito(!config.persistent_storage);

    #[cfg(desktop)]
    let builder = builder
        .title(config.window_title.clone())
        .inner_size(420.0, 780.0);

    let window = builder
        .build()
        .map_err(|e| ShellError::Window(e.to_string()))?;

    info!(%url, bridge = %config.bridge_name, "main window created");
    Ok(window)
}
