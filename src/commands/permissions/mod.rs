// Platform-specific permission implementations
#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "android")]
mod android;

#[cfg(not(any(target_os = "macos", target_os = "android")))]
mod stub;

// Re-export the platform-specific implementation
#[cfg(target_os = "macos")]
pub use macos::*;

#[cfg(target_os = "android")]
pub use android::*;

#[cfg(not(any(target_os = "macos", target_os = "android")))]
pub use stub::*;

use crate::shell::queue::{UiQueue, UiTask};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tauri::plugin::{Builder as PluginBuilder, TauriPlugin};
use tauri::{Manager, Wry};
use tracing::{debug, warn};

// ============================================================================
// Permission Types
// ============================================================================

/// Permissions the bridge can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionKind {
    Camera,
    Microphone,
}

impl PermissionKind {
    pub const ALL: [PermissionKind; 2] = [PermissionKind::Camera, PermissionKind::Microphone];

    /// Ticket every request of this kind is tagged with
    pub fn ticket(self) -> Ticket {
        match self {
            PermissionKind::Camera => Ticket::CAMERA,
            PermissionKind::Microphone => Ticket::MICROPHONE,
        }
    }

    /// Platform identifier of the permission
    pub fn platform_id(self) -> &'static str {
        match self {
            PermissionKind::Camera => "android.permission.CAMERA",
            PermissionKind::Microphone => "android.permission.RECORD_AUDIO",
        }
    }

    /// Alias the Android plugin declares for `platform_id`
    pub fn alias(self) -> &'static str {
        match self {
            PermissionKind::Camera => "camera",
            PermissionKind::Microphone => "microphone",
        }
    }

    pub fn granted_message(self) -> &'static str {
        match self {
            PermissionKind::Camera => "Camera permission granted",
            PermissionKind::Microphone => "Microphone permission granted",
        }
    }

    pub fn denied_message(self) -> &'static str {
        match self {
            PermissionKind::Camera => "Camera permission denied",
            PermissionKind::Microphone => "Microphone permission denied",
        }
    }
}

/// Integer tag correlating a prompt with its OS-delivered result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(pub i32);

impl Ticket {
    pub const CAMERA: Ticket = Ticket(100);
    pub const MICROPHONE: Ticket = Ticket(101);
}

/// Status as reported by the operating system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    NotDetermined,
    Granted,
    Denied,
    Restricted,
}

impl PermissionStatus {
    /// Map a Tauri mobile permission state ("granted", "denied", "prompt",
    /// "prompt-with-rationale")
    pub fn from_mobile_state(state: &str) -> Self {
        match state {
            "granted" => PermissionStatus::Granted,
            // Asked before and refused; Android wants a rationale now
            "denied" | "prompt-with-rationale" => PermissionStatus::Denied,
            _ => PermissionStatus::NotDetermined,
        }
    }
}

/// Status of `kind` in a mobile plugin response keyed by alias
pub fn status_in_response(kind: PermissionKind, states: &HashMap<String, String>) -> PermissionStatus {
    states
        .get(kind.alias())
        .map(|state| PermissionStatus::from_mobile_state(state))
        .unwrap_or(PermissionStatus::NotDetermined)
}

/// Final answer for one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionOutcome {
    pub kind: PermissionKind,
    pub granted: bool,
}

impl PermissionOutcome {
    pub fn message(&self) -> &'static str {
        if self.granted {
            self.kind.granted_message()
        } else {
            self.kind.denied_message()
        }
    }
}

/// What starting a request led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Already granted, no prompt needed
    AlreadyGranted,
    /// A prompt was issued with this ticket
    Prompted(Ticket),
}

#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub kind: PermissionKind,
    pub issued_at: DateTime<Utc>,
}

// ============================================================================
// Pending Request Table
// ============================================================================

/// Tracks issued prompts until the OS answers them.
///
/// A ticket is consumed exactly once; results for tickets that are not
/// pending are ignored.
#[derive(Debug, Default)]
pub struct PermissionBroker {
    pending: HashMap<Ticket, PendingRequest>,
}

impl PermissionBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request given the current OS status
    pub fn begin(&mut self, kind: PermissionKind, status: PermissionStatus) -> RequestOutcome {
        if status == PermissionStatus::Granted {
            return RequestOutcome::AlreadyGranted;
        }

        let ticket = kind.ticket();
        let previous = self.pending.insert(
            ticket,
            PendingRequest {
                kind,
                issued_at: Utc::now(),
            },
        );
        if let Some(previous) = previous {
            debug!(
                ?kind,
                since = %previous.issued_at,
                "replacing unanswered permission request"
            );
        }
        RequestOutcome::Prompted(ticket)
    }

    /// Consume the pending request for `ticket`.
    ///
    /// Granted only when the first grant result is granted.
    pub fn resolve(
        &mut self,
        ticket: Ticket,
        grants: &[PermissionStatus],
    ) -> Option<PermissionOutcome> {
        let request = self.pending.remove(&ticket)?;
        Some(PermissionOutcome {
            kind: request.kind,
            granted: grants.first() == Some(&PermissionStatus::Granted),
        })
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

// ============================================================================
// Platform Seam
// ============================================================================

/// Hands a prompt's result back to the UI thread
#[derive(Clone)]
pub struct PermissionResponder {
    queue: UiQueue,
}

impl PermissionResponder {
    pub fn new(queue: UiQueue) -> Self {
        Self { queue }
    }

    /// Enqueue the OS answer; never handled inline
    pub fn deliver(&self, ticket: Ticket, grants: Vec<PermissionStatus>) {
        if let Err(e) = self.queue.dispatch(UiTask::PermissionResult { ticket, grants }) {
            warn!(?ticket, "dropping permission result: {}", e);
        }
    }
}

/// Trait for platform-specific permission handling
pub trait PermissionHandler {
    /// Current OS status of a permission. May block; never called on the UI thread.
    fn check_permission(&self, kind: PermissionKind) -> PermissionStatus;

    /// Show the OS prompt; the answer arrives later through `responder`
    fn request_permission(&self, kind: PermissionKind, ticket: Ticket, responder: PermissionResponder);
}

/// Registers the platform permission handler as managed state
pub fn init() -> TauriPlugin<Wry> {
    PluginBuilder::<Wry>::new("shell-permissions")
        .setup(|app, api| {
            let permissions = PlatformPermissions::register(app, api)?;
            app.manage(permissions);
            Ok(())
        })
        .build()
}
