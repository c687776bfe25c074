//! Local notifications posted on behalf of the hosted page.

use crate::config::ShellConfig;
use chrono::{DateTime, Utc};

/// A notification the page asked for; shown once and forgotten
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRecord {
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::at(title, body, Utc::now())
    }

    pub fn at(title: impl Into<String>, body: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            created_at,
        }
    }
}

/// Channel every notification is posted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationChannel {
    pub id: String,
    pub name: String,
}

/// Platform notification id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationKey(pub i32);

impl NotificationKey {
    /// Millisecond timestamp truncated to the platform's 32-bit id space
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        NotificationKey(at.timestamp_millis() as i32)
    }
}

/// Channel bookkeeping and key assignment for posted notifications
#[derive(Debug)]
pub struct NotificationCenter {
    channel: NotificationChannel,
    channel_ready: bool,
    last_key: Option<NotificationKey>,
}

impl NotificationCenter {
    pub fn new(config: &ShellConfig) -> Self {
        Self {
            channel: NotificationChannel {
                id: config.channel_id.clone(),
                name: config.channel_name.clone(),
            },
            channel_ready: false,
            last_key: None,
        }
    }

    pub fn channel(&self) -> &NotificationChannel {
        &self.channel
    }

    /// Whether the channel still has to be created
    pub fn needs_channel(&self) -> bool {
        !self.channel_ready
    }

    pub fn mark_channel_ready(&mut self) {
        self.channel_ready = true;
    }

    /// Key for a record; two records in the same millisecond still differ
    pub fn next_key(&mut self, record: &NotificationRecord) -> NotificationKey {
        let mut key = NotificationKey::from_timestamp(record.created_at);
        if let Some(last) = self.last_key {
            if key == last {
                key = NotificationKey(last.0.wrapping_add(1));
            }
        }
        self.last_key = Some(key);
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn center() -> NotificationCenter {
        NotificationCenter::new(&ShellConfig::default())
    }

    #[test]
    fn test_channel_from_config() {
        let center = center();
        assert_eq!(center.channel().id, "default_channel");
        assert!(center.needs_channel());
    }

    #[test]
    fn test_channel_created_once() {
        let mut center = center();
        center.mark_channel_ready();
        assert!(!center.needs_channel());
    }

    #[test]
    fn test_distinct_timestamps_distinct_keys() {
        let mut center = center();
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let first = NotificationRecord::at("a", "b", at);
        let second = NotificationRecord::at("c", "d", at + Duration::milliseconds(15));

        let k1 = center.next_key(&first);
        let k2 = center.next_key(&second);
        assert_ne!(k1, k2);
        assert_eq!(k1, NotificationKey::from_timestamp(at));
    }

    #[test]
    fn test_same_millisecond_bumped() {
        let mut center = center();
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let k1 = center.next_key(&NotificationRecord::at("a", "b", at));
        let k2 = center.next_key(&NotificationRecord::at("a", "b", at));
        assert_eq!(k2.0, k1.0.wrapping_add(1));
    }

    #[test]
    fn test_record_keeps_creation_time() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let record = NotificationRecord::at("Hello", "World", at);
        assert_eq!(record.created_at, at);
        assert_eq!(record.clone(), record);

        let before = Utc::now();
        assert!(NotificationRecord::new("t", "b").created_at >= before);
    }
}
