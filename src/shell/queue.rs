use super::host::ShellState;
use super::navigation::HistoryPosition;
use super::Notice;
use crate::commands::notifications::NotificationRecord;
use crate::commands::permissions::{PermissionKind, PermissionStatus, Ticket};
use crate::error::ShellError;
use tauri::{AppHandle, Manager};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Work that has to run on the UI thread
#[derive(Debug, Clone, PartialEq)]
pub enum UiTask {
    Notice(Notice),
    /// Status is checked off the UI thread before the task is queued
    RequestPermission {
        kind: PermissionKind,
        status: PermissionStatus,
    },
    PermissionResult {
        ticket: Ticket,
        grants: Vec<PermissionStatus>,
    },
    ShowNotification(NotificationRecord),
    HistoryChanged(HistoryPosition),
    NavigateBack,
}

/// Producer side of the UI task queue. Cheap to clone, usable from any thread.
#[derive(Debug, Clone)]
pub struct UiQueue {
    tx: mpsc::UnboundedSender<UiTask>,
}

pub type UiReceiver = mpsc::UnboundedReceiver<UiTask>;

/// Create the queue; the receiver is its only consumer
pub fn channel() -> (UiQueue, UiReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (UiQueue { tx }, rx)
}

impl UiQueue {
    pub fn dispatch(&self, task: UiTask) -> Result<(), ShellError> {
        self.tx.send(task).map_err(|_| ShellError::QueueClosed)
    }

    /// Dispatch, logging instead of failing
    pub fn post(&self, task: UiTask) {
        if let Err(e) = self.dispatch(task) {
            warn!("ui task dropped: {}", e);
        }
    }
}

/// Forward queued tasks to the main thread, in order
pub fn spawn_pump(app: AppHandle, mut rx: UiReceiver) {
    tauri::async_runtime::spawn(async move {
        while let Some(task) = rx.recv().await {
            let handle = app.clone();
            if let Err(e) = app.run_on_main_thread(move || run_task(&handle, task)) {
                warn!("main thread unavailable, stopping ui pump: {}", e);
                break;
            }
        }
        debug!("ui pump finished");
    });
}

fn run_task(app: &AppHandle, task: UiTask) {
    let Some(state) = app.try_state::<ShellState>() else {
        warn!(?task, "shell not initialized, dropping ui task");
        return;
    };
    let mut shell = match state.lock() {
        Ok(shell) => shell,
        Err(poisoned) => {
            warn!("shell state poisoned, recovering");
            poisoned.into_inner()
        }
    };
    shell.handle(task);
}
