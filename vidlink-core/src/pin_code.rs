//! Device pin-code authorization info.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Codes handed out when a device without a keyboard starts authorization.
/// The user enters `user_code` at `activate_link` while the device polls
/// with `device_code` every `interval` seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinCodeInfo {
    #[serde(default)]
    pub device_code: Option<String>,
    #[serde(default)]
    pub user_code: Option<String>,
    #[serde(default)]
    pub authorize_link: Option<String>,
    #[serde(default)]
    pub activate_link: Option<String>,
    /// Seconds until the codes expire.
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub expires_in: u64,
    /// Seconds between polls.
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub interval: u64,
}

impl PinCodeInfo {
    /// Lifetime of the codes.
    pub fn expires_in(&self) -> Duration {
        Duration::from_secs(self.expires_in)
    }

    /// Delay between authorization polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durations() {
        let info: PinCodeInfo = serde_json::from_str(
            r#"{"device_code":"d-1","user_code":"ABCD","activate_link":"https://example.com/activate","expires_in":600,"interval":5}"#,
        )
        .unwrap();

        assert_eq!(info.user_code.as_deref(), Some("ABCD"));
        assert_eq!(info.expires_in(), Duration::from_secs(600));
        assert_eq!(info.poll_interval(), Duration::from_secs(5));
        assert_eq!(PinCodeInfo::default().poll_interval(), Duration::ZERO);
    }
}
