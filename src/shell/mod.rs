//! Shell core: everything that runs on the UI thread.
//!
//! Bridge entry points never touch the view directly. They enqueue a
//! [`queue::UiTask`], the pump hands it to the main thread and [`Shell::handle`]
//! performs the host calls through a [`HostSurface`].

pub mod host;
pub mod navigation;
pub mod queue;

use crate::commands::notifications::{
    NotificationCenter, NotificationChannel, NotificationKey, NotificationRecord,
};
use crate::commands::permissions::{
    PermissionBroker, PermissionKind, PermissionStatus, RequestOutcome, Ticket,
};
use crate::config::ShellConfig;
use crate::error::ShellError;
use navigation::{BackAction, NavigationHistory};
use queue::UiTask;
use tracing::{debug, info, warn};

/// How long a notice stays on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLength {
    Short,
    Long,
}

/// Transient, non-blocking message shown over the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub length: NoticeLength,
}

impl Notice {
    pub fn short(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            length: NoticeLength::Short,
        }
    }

    pub fn long(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            length: NoticeLength::Long,
        }
    }
}

/// Host operations the shell core needs. Implementations run on the UI thread.
pub trait HostSurface {
    fn show_notice(&self, notice: &Notice);

    /// Show the OS prompt; the answer comes back as `UiTask::PermissionResult`
    fn prompt_permission(&self, kind: PermissionKind, ticket: Ticket);

    fn create_notification_channel(&self, channel: &NotificationChannel)
        -> Result<(), ShellError>;

    fn post_notification(
        &self,
        key: NotificationKey,
        record: &NotificationRecord,
        channel: &NotificationChannel,
    ) -> Result<(), ShellError>;

    fn history_back(&self) -> Result<(), ShellError>;

    /// Default back behaviour once history is exhausted
    fn exit(&self);
}

/// UI-thread state of the shell
pub struct Shell<H: HostSurface> {
    host: H,
    permissions: PermissionBroker,
    notifications: NotificationCenter,
    history: NavigationHistory,
}

impl<H: HostSurface> Shell<H> {
    pub fn new(host: H, config: &ShellConfig) -> Self {
        Self {
            host,
            permissions: PermissionBroker::new(),
            notifications: NotificationCenter::new(config),
            history: NavigationHistory::new(),
        }
    }

    pub fn handle(&mut self, task: UiTask) {
        match task {
            UiTask::Notice(notice) => self.host.show_notice(&notice),
            UiTask::RequestPermission { kind, status } => self.request_permission(kind, status),
            UiTask::PermissionResult { ticket, grants } => {
                self.permission_result(ticket, &grants)
            }
            UiTask::ShowNotification(record) => self.show_notification(&record),
            UiTask::HistoryChanged(position) => self.history.report(position),
            UiTask::NavigateBack => self.navigate_back(),
        }
    }

    fn request_permission(&mut self, kind: PermissionKind, status: PermissionStatus) {
        match self.permissions.begin(kind, status) {
            RequestOutcome::AlreadyGranted => {
                debug!(?kind, "permission already granted");
                self.host.show_notice(&Notice::short(kind.granted_message()));
            }
            RequestOutcome::Prompted(ticket) => {
                info!(
                    permission = kind.platform_id(),
                    ?status,
                    ticket = ticket.0,
                    "prompting for permission"
                );
                self.host.prompt_permission(kind, ticket);
            }
        }
    }

    fn permission_result(&mut self, ticket: Ticket, grants: &[PermissionStatus]) {
        match self.permissions.resolve(ticket, grants) {
            Some(outcome) => {
                info!(kind = ?outcome.kind, granted = outcome.granted, "permission result");
                self.host.show_notice(&Notice::short(outcome.message()));
            }
            None => debug!(ticket = ticket.0, "ignoring result for unknown ticket"),
        }
    }

    fn show_notification(&mut self, record: &NotificationRecord) {
        if self.notifications.needs_channel() {
            match self
                .host
                .create_notification_channel(self.notifications.channel())
            {
                Ok(()) => self.notifications.mark_channel_ready(),
                Err(e) => {
                    warn!("notification channel unavailable: {}", e);
                    self.host.show_notice(&Notice::short(e.user_message()));
                    return;
                }
            }
        }

        let key = self.notifications.next_key(record);
        match self
            .host
            .post_notification(key, record, self.notifications.channel())
        {
            Ok(()) => debug!(key = key.0, "notification posted"),
            Err(e) => {
                warn!("failed to post notification: {}", e);
                self.host.show_notice(&Notice::short(e.user_message()));
            }
        }
    }

    fn navigate_back(&mut self) {
        match self.history.back() {
            BackAction::HistoryBack => {
                if let Err(e) = self.host.history_back() {
                    warn!("history back failed: {}", e);
                }
            }
            BackAction::Exit => {
                info!("no history left, leaving shell");
                self.host.exit();
            }
        }
    }
}

#[cfg(test)]
impl<H: HostSurface> Shell<H> {
    fn host(&self) -> &H {
        &self.host
    }

    fn permissions(&self) -> &PermissionBroker {
        &self.permissions
    }

    fn history(&self) -> &NavigationHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::navigation::HistoryPosition;
    use super::*;
    use chrono::{Duration, Utc};
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum HostCall {
        Notice(Notice),
        Prompt(PermissionKind, Ticket),
        CreateChannel(String),
        Post(NotificationKey, String),
        HistoryBack,
        Exit,
    }

    #[derive(Default)]
    struct FakeHost {
        fail_channel: bool,
        fail_post: bool,
        calls: RefCell<Vec<HostCall>>,
    }

    impl FakeHost {
        fn calls(&self) -> Vec<HostCall> {
            self.calls.borrow().clone()
        }
    }

    impl HostSurface for FakeHost {
        fn show_notice(&self, notice: &Notice) {
            self.calls.borrow_mut().push(HostCall::Notice(notice.clone()));
        }

        fn prompt_permission(&self, kind: PermissionKind, ticket: Ticket) {
            self.calls.borrow_mut().push(HostCall::Prompt(kind, ticket));
        }

        fn create_notification_channel(
            &self,
            channel: &NotificationChannel,
        ) -> Result<(), ShellError> {
            if self.fail_channel {
                return Err(ShellError::Notification("no service".to_string()));
            }
            self.calls
                .borrow_mut()
                .push(HostCall::CreateChannel(channel.id.clone()));
            Ok(())
        }

        fn post_notification(
            &self,
            key: NotificationKey,
            record: &NotificationRecord,
            _channel: &NotificationChannel,
        ) -> Result<(), ShellError> {
            if self.fail_post {
                return Err(ShellError::Notification("blocked".to_string()));
            }
            self.calls
                .borrow_mut()
                .push(HostCall::Post(key, record.title.clone()));
            Ok(())
        }

        fn history_back(&self) -> Result<(), ShellError> {
            self.calls.borrow_mut().push(HostCall::HistoryBack);
            Ok(())
        }

        fn exit(&self) {
            self.calls.borrow_mut().push(HostCall::Exit);
        }
    }

    fn shell(host: FakeHost) -> Shell<FakeHost> {
        Shell::new(host, &ShellConfig::default())
    }

    fn request(kind: PermissionKind, status: PermissionStatus) -> UiTask {
        UiTask::RequestPermission { kind, status }
    }

    fn at(index: u32) -> UiTask {
        UiTask::HistoryChanged(HistoryPosition {
            index,
            can_go_back: None,
        })
    }

    #[test]
    fn test_granted_permission_only_confirms() {
        for kind in PermissionKind::ALL {
            let mut shell = shell(FakeHost::default());
            shell.handle(request(kind, PermissionStatus::Granted));

            assert_eq!(
                shell.host().calls(),
                vec![HostCall::Notice(Notice::short(kind.granted_message()))]
            );
            assert_eq!(shell.permissions().pending_count(), 0);
        }
    }

    #[test]
    fn test_denied_camera_prompts_without_notice() {
        let mut shell = shell(FakeHost::default());
        shell.handle(request(PermissionKind::Camera, PermissionStatus::Denied));

        assert_eq!(
            shell.host().calls(),
            vec![HostCall::Prompt(PermissionKind::Camera, Ticket::CAMERA)]
        );

        shell.handle(UiTask::PermissionResult {
            ticket: Ticket::CAMERA,
            grants: vec![PermissionStatus::Denied],
        });
        assert_eq!(
            shell.host().calls().last(),
            Some(&HostCall::Notice(Notice::short("Camera permission denied")))
        );
    }

    #[test]
    fn test_microphone_uses_its_own_ticket() {
        let mut shell = shell(FakeHost::default());
        shell.handle(request(
            PermissionKind::Microphone,
            PermissionStatus::NotDetermined,
        ));

        assert_eq!(
            shell.host().calls(),
            vec![HostCall::Prompt(PermissionKind::Microphone, Ticket::MICROPHONE)]
        );

        shell.handle(UiTask::PermissionResult {
            ticket: Ticket::MICROPHONE,
            grants: vec![PermissionStatus::Granted],
        });
        assert_eq!(
            shell.host().calls().last(),
            Some(&HostCall::Notice(Notice::short("Microphone permission granted")))
        );
    }

    #[test]
    fn test_result_accepted_once() {
        let mut shell = shell(FakeHost::default());
        shell.handle(request(PermissionKind::Camera, PermissionStatus::NotDetermined));

        let result = UiTask::PermissionResult {
            ticket: Ticket::CAMERA,
            grants: vec![PermissionStatus::Granted],
        };
        shell.handle(result.clone());
        shell.handle(result);

        let notices = shell
            .host()
            .calls()
            .into_iter()
            .filter(|c| matches!(c, HostCall::Notice(_)))
            .count();
        assert_eq!(notices, 1);
    }

    #[test]
    fn test_unknown_ticket_is_silent() {
        let mut shell = shell(FakeHost::default());
        shell.handle(UiTask::PermissionResult {
            ticket: Ticket(999),
            grants: vec![PermissionStatus::Granted],
        });
        assert!(shell.host().calls().is_empty());
    }

    #[test]
    fn test_notifications_get_distinct_keys() {
        let mut shell = shell(FakeHost::default());
        let now = Utc::now();
        shell.handle(UiTask::ShowNotification(NotificationRecord::at("one", "a", now)));
        shell.handle(UiTask::ShowNotification(NotificationRecord::at(
            "two",
            "b",
            now + Duration::milliseconds(5),
        )));

        let calls = shell.host().calls();
        assert_eq!(calls[0], HostCall::CreateChannel("default_channel".to_string()));
        let keys: Vec<NotificationKey> = calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Post(key, _) => Some(*key),
                _ => None,
            })
            .collect();
        assert_eq!(keys.len(), 2);
        assert_ne!(keys[0], keys[1]);

        // Channel created lazily, once
        let channels = calls
            .iter()
            .filter(|c| matches!(c, HostCall::CreateChannel(_)))
            .count();
        assert_eq!(channels, 1);
    }

    #[test]
    fn test_channel_failure_degrades_to_notice() {
        let host = FakeHost {
            fail_channel: true,
            ..Default::default()
        };
        let mut shell = shell(host);
        shell.handle(UiTask::ShowNotification(NotificationRecord::new("t", "m")));

        assert_eq!(
            shell.host().calls(),
            vec![HostCall::Notice(Notice::short("Notification could not be shown"))]
        );
    }

    #[test]
    fn test_post_failure_degrades_to_notice() {
        let host = FakeHost {
            fail_post: true,
            ..Default::default()
        };
        let mut shell = shell(host);
        shell.handle(UiTask::ShowNotification(NotificationRecord::new("t", "m")));

        assert_eq!(
            shell.host().calls().last(),
            Some(&HostCall::Notice(Notice::short("Notification could not be shown")))
        );
    }

    #[test]
    fn test_back_navigation() {
        let mut shell = shell(FakeHost::default());
        shell.handle(at(0));
        shell.handle(at(1));
        assert_eq!(shell.history().depth(), 1);

        shell.handle(UiTask::NavigateBack);
        assert_eq!(shell.history().depth(), 0);
        assert_eq!(shell.host().calls(), vec![HostCall::HistoryBack]);

        shell.handle(UiTask::NavigateBack);
        assert_eq!(shell.host().calls().last(), Some(&HostCall::Exit));
    }

    #[test]
    fn test_page_initiated_back_then_trigger_exits() {
        let mut shell = shell(FakeHost::default());
        // A, B, page-initiated back to A, B again, page back to A
        for index in [0, 1, 0, 1, 0] {
            shell.handle(at(index));
        }

        shell.handle(UiTask::NavigateBack);
        assert_eq!(shell.host().calls(), vec![HostCall::Exit]);
    }

    #[test]
    fn test_notice_task_passes_through() {
        let mut shell = shell(FakeHost::default());
        shell.handle(UiTask::Notice(Notice::long("hello")));
        assert_eq!(
            shell.host().calls(),
            vec![HostCall::Notice(Notice::long("hello"))]
        );
    }
}
