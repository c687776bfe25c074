use std::sync::Mutex;
use tauri::Manager;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod config;
pub mod error;
pub mod shell;

use commands::device_info::DeviceInfo;
use commands::permissions::{self, PlatformPermissions};
use config::ShellConfig;
use shell::host::{self, TauriHost};
use shell::{queue, Shell};

const DEFAULT_LOG_DIRECTIVE: &str = "chatapp_shell_lib=info";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));
    // A second init (tests, re-entry from the mobile entry point) is harmless
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    init_tracing();

    let config = ShellConfig::default();
    if let Err(e) = config.validate() {
        error!("refusing to start: {}", e);
        return;
    }

    // Detected once; every getDeviceInfo() call returns the same text
    let device = DeviceInfo::detect();
    info!(model = %device.model, os = %device.os_version, "starting shell");

    let (ui_queue, ui_receiver) = queue::channel();

    tauri::Builder::default()
        .plugin(tauri_plugin_notification::init())
        .plugin(permissions::init())
        .manage(ui_queue.clone())
        .manage(device.clone())
        .invoke_handler(tauri::generate_handler![
            commands::bridge::get_device_info,
            commands::bridge::request_camera_permission,
            commands::bridge::request_microphone_permission,
            commands::bridge::show_notification,
            commands::bridge::navigate_back,
            commands::bridge::history_changed
        ])
        .setup(move |app| {
            // Managed by the permissions plugin, which is set up before this hook
            let platform_permissions = app.state::<PlatformPermissions>().inner().clone();
            let tauri_host = TauriHost::new(
                app.handle().clone(),
                ui_queue.clone(),
                platform_permissions,
                &config,
            );
            app.manage(Mutex::new(Shell::new(tauri_host, &config)));

            host::build_main_window(app, &config, &device)?;
            queue::spawn_pump(app.handle().clone(), ui_receiver);

            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
