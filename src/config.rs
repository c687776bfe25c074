use crate::error::ShellError;

/// Address of the hosted page. 10.0.2.2 is the Android emulator's alias for
/// the development machine's loopback.
#[cfg(target_os = "android")]
pub const HOSTED_URL: &str = "http://10.0.2.2:5173";
#[cfg(not(target_os = "android"))]
pub const HOSTED_URL: &str = "http://localhost:5173";

/// Global name the bridge object is installed under
pub const BRIDGE_NAME: &str = "Android";

/// Label of the single webview window
pub const MAIN_WINDOW: &str = "main";

pub const NOTIFICATION_CHANNEL_ID: &str = "default_channel";
pub const NOTIFICATION_CHANNEL_NAME: &str = "Default notifications";

/// Android's Toast.LENGTH_SHORT / LENGTH_LONG
const SHORT_NOTICE_MS: u64 = 2000;
const LONG_NOTICE_MS: u64 = 3500;

/// Shell configuration.
///
/// Always built from defaults: the hosted address is fixed per build and is
/// not read from the environment or disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellConfig {
    /// Page loaded at startup
    pub hosted_url: String,
    /// Desktop window title
    pub window_title: String,
    /// Global binding name of the bridge in the page
    pub bridge_name: String,
    /// Notification channel id (mobile targets)
    pub channel_id: String,
    /// Notification channel display name (mobile targets)
    pub channel_name: String,
    /// Keep local storage across launches (non-incognito data store)
    pub persistent_storage: bool,
    /// Duration of a short notice (ms)
    pub short_notice_ms: u64,
    /// Duration of a long notice (ms)
    pub long_notice_ms: u64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            hosted_url: HOSTED_URL.to_string(),
            window_title: "ChatApp".to_string(),
            bridge_name: BRIDGE_NAME.to_string(),
            channel_id: NOTIFICATION_CHANNEL_ID.to_string(),
            channel_name: NOTIFICATION_CHANNEL_NAME.to_string(),
            persistent_storage: true,
            short_notice_ms: SHORT_NOTICE_MS,
            long_notice_ms: LONG_NOTICE_MS,
        }
    }
}

impl ShellConfig {
    /// Validate this configuration
    pub fn validate(&self) -> Result<(), ShellError> {
        self.hosted_url()?;

        if !is_js_identifier(&self.bridge_name) {
            return Err(ShellError::InvalidConfig(format!(
                "bridge name '{}' is not a valid JavaScript identifier",
                self.bridge_name
            )));
        }

        if self.channel_id.trim().is_empty() || self.channel_name.trim().is_empty() {
            return Err(ShellError::InvalidConfig(
                "notification channel id and name must not be empty".to_string(),
            ));
        }

        if self.short_notice_ms == 0 || self.long_notice_ms == 0 {
            return Err(ShellError::InvalidConfig(
                "notice durations must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Parsed hosted address
    pub fn hosted_url(&self) -> Result<tauri::Url, ShellError> {
        let url = self
            .hosted_url
            .parse::<tauri::Url>()
            .map_err(|e| ShellError::InvalidUrl {
                url: self.hosted_url.clone(),
                reason: e.to_string(),
            })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ShellError::InvalidUrl {
                url: self.hosted_url.clone(),
                reason: format!("unsupported scheme '{}'", other),
            }),
        }
    }
}

fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ShellConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bridge_name, "Android");
        assert_eq!(config.channel_id, "default_channel");
        assert_eq!(config.hosted_url().unwrap().port(), Some(5173));
    }

    #[test]
    fn test_rejects_bad_bridge_name() {
        let config = ShellConfig {
            bridge_name: "my bridge".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ShellError::InvalidConfig(_))));

        let config = ShellConfig {
            bridge_name: "1Android".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_http_url() {
        let config = ShellConfig {
            hosted_url: "file:///etc/passwd".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ShellError::InvalidUrl { .. })
        ));

        let config = ShellConfig {
            hosted_url: "localhost".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_durations() {
        let config = ShellConfig {
            short_notice_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
