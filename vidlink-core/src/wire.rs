//! Wire vocabulary shared by every record.
//!
//! The API speaks in short strings (`"transcode_starting"`, `"purchased"`,
//! `"2223"`). Each closed enum in the model implements [`WireValue`], which
//! pairs an exhaustive `as_wire` match with the `ALL` table so that lookups
//! work in both directions. Unknown tokens never fail a decode: fields use
//! [`lenient`] and the token simply resolves to absent.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Closed enum with a fixed wire spelling per variant.
pub trait WireValue: Sized + Copy + PartialEq + 'static {
    /// Short name used in logs and error messages.
    const KIND: &'static str;

    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    /// Wire spelling of this variant.
    fn as_wire(self) -> &'static str;

    /// Reverse lookup. Returns `None` for tokens the table does not know.
    fn from_wire(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|variant| variant.as_wire() == value)
    }
}

/// Raw token as it may appear in the payload. Codes arrive as numbers on
/// some endpoints and as strings on others.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireToken {
    Text(String),
    Number(i64),
    Other(IgnoredAny),
}

impl WireToken {
    fn into_text(self) -> Option<String> {
        match self {
            WireToken::Text(text) => Some(text),
            WireToken::Number(number) => Some(number.to_string()),
            WireToken::Other(_) => None,
        }
    }
}

/// Field deserializer mapping unknown or mistyped wire tokens to `None`.
///
/// Use with `#[serde(default, deserialize_with = "crate::wire::lenient")]`.
///
/// # Errors
///
/// - `D::Error` - The underlying deserializer failed to produce any value
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: WireValue,
{
    let token = Option::<WireToken>::deserialize(deserializer)?;
    Ok(token.and_then(WireToken::into_text).and_then(|value| {
        let parsed = T::from_wire(&value);
        if parsed.is_none() {
            tracing::debug!(kind = T::KIND, value = %value, "Unrecognized wire value");
        }
        parsed
    }))
}

/// Field deserializer reading JSON `null` as the type's default.
///
/// `#[serde(default)]` alone only covers missing keys; the API also sends
/// explicit `null` for counts, flags and lists it has no value for.
///
/// # Errors
///
/// - `D::Error` - The value is present but not a `T`
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaStatus;
    use crate::media::playback::PlayStatus;

    #[derive(Deserialize)]
    struct StatusField {
        #[serde(default, deserialize_with = "lenient")]
        status: Option<PlayStatus>,
    }

    fn play_status(json: &str) -> Option<PlayStatus> {
        serde_json::from_str::<StatusField>(json).unwrap().status
    }

    #[test]
    fn test_known_token_resolves() {
        assert_eq!(play_status(r#"{"status":"playable"}"#), Some(PlayStatus::Playable));
        assert_eq!(
            play_status(r#"{"status":"purchase_required"}"#),
            Some(PlayStatus::PurchaseRequired)
        );
    }

    #[test]
    fn test_unknown_or_missing_token_is_absent() {
        assert_eq!(play_status(r#"{"status":"warp_speed"}"#), None);
        assert_eq!(play_status(r#"{"status":null}"#), None);
        assert_eq!(play_status(r#"{"status":true}"#), None);
        assert_eq!(play_status("{}"), None);
    }

    #[derive(Deserialize)]
    struct Counts {
        #[serde(default, deserialize_with = "null_default")]
        total: u32,
        #[serde(default, deserialize_with = "null_default")]
        tags: Vec<String>,
    }

    #[test]
    fn test_null_reads_as_default() {
        let counts: Counts = serde_json::from_str(r#"{"total":null,"tags":null}"#).unwrap();
        assert_eq!(counts.total, 0);
        assert!(counts.tags.is_empty());

        let counts: Counts = serde_json::from_str(r#"{"total":7,"tags":["a"]}"#).unwrap();
        assert_eq!(counts.total, 7);
        assert_eq!(counts.tags, vec!["a".to_string()]);

        assert!(serde_json::from_str::<Counts>(r#"{"total":"seven"}"#).is_err());
    }

    #[test]
    fn test_table_is_bidirectional() {
        for status in MediaStatus::ALL {
            assert_eq!(MediaStatus::from_wire(status.as_wire()), Some(*status));
        }
        for status in PlayStatus::ALL {
            assert_eq!(PlayStatus::from_wire(status.as_wire()), Some(*status));
        }
    }
}
