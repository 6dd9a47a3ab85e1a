//! CLI command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde::Serialize;
use tokio::fs;
use vidlink_core::{
    AccountType, ActorRecord, ErrorBody, ErrorCode, ErrorRecord, JsonDecoder, MediaRecord,
    MediaStatus, PinCodeInfo, PlayStatus, RecordDecoder, TransportResponse, TvodVideoType,
    UserBadgeType,
};

use crate::config::{OutputConfig, OutputFormat};

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Summarize a video payload
    Video {
        /// Path to the JSON payload
        file: PathBuf,
    },
    /// Summarize a user payload
    User {
        /// Path to the JSON payload
        file: PathBuf,
    },
    /// Summarize a device pin-code payload
    Pin {
        /// Path to the JSON payload
        file: PathBuf,
    },
    /// Classify a failed API call
    Error {
        /// Path to the JSON error body, if one was received
        file: Option<PathBuf>,
        /// HTTP status of the response
        #[arg(long)]
        status: Option<u16>,
        /// Response header as "Name: value" (repeatable)
        #[arg(long = "header", requires = "status")]
        headers: Vec<String>,
        /// The call was cancelled by the caller
        #[arg(long)]
        cancelled: bool,
        /// Status recorded locally when no response arrived
        #[arg(long)]
        fallback_status: Option<u16>,
        /// Message of the local failure that ended the call
        #[arg(long)]
        cause: Option<String>,
    },
}

/// Runs a command and prints its summary to stdout.
///
/// # Errors
///
/// - `std::io::Error` - The payload file cannot be read
/// - `vidlink_core::ModelError::Decode` - The payload does not match the command
pub async fn run_command(command: Commands, output: &OutputConfig) -> anyhow::Result<()> {
    let rendered = inspect(command, output).await?;
    println!("{rendered}");
    Ok(())
}

/// Builds the rendered summary for a command without printing it.
///
/// # Errors
///
/// - `std::io::Error` - The payload file cannot be read
/// - `vidlink_core::ModelError::Decode` - The payload does not match the command
pub async fn inspect(command: Commands, output: &OutputConfig) -> anyhow::Result<String> {
    let decoder = JsonDecoder::new();

    match command {
        Commands::Video { file } => {
            let payload = read_payload(&file).await?;
            let media = decoder
                .decode_media(&payload)
                .with_context(|| format!("{} is not a video payload", file.display()))?;
            render(&MediaSummary::from(&media), output)
        }
        Commands::User { file } => {
            let payload = read_payload(&file).await?;
            let actor = decoder
                .decode_actor(&payload)
                .with_context(|| format!("{} is not a user payload", file.display()))?;
            render(&ActorSummary::from(&actor), output)
        }
        Commands::Pin { file } => {
            let payload = read_payload(&file).await?;
            let info = decoder
                .decode_pin_code(&payload)
                .with_context(|| format!("{} is not a pin-code payload", file.display()))?;
            render(&PinSummary::from(&info), output)
        }
        Commands::Error {
            file,
            status,
            headers,
            cancelled,
            fallback_status,
            cause,
        } => {
            let body = match file {
                Some(file) => {
                    let payload = read_payload(&file).await?;
                    decoder
                        .decode_error_body(&payload)
                        .with_context(|| format!("{} is not an error body", file.display()))?
                }
                None => ErrorBody::default(),
            };

            let mut builder = ErrorRecord::builder().body(body).cancelled(cancelled);
            if let Some(status) = status {
                let mut response = TransportResponse::new(status);
                for header in &headers {
                    let (name, value) = parse_header(header)?;
                    response = response.with_header(name, value);
                }
                builder = builder.response(response);
            }
            if let Some(fallback) = fallback_status {
                builder = builder.fallback_status(fallback);
            }
            if let Some(cause) = cause {
                builder = builder.cause(std::io::Error::other(cause));
            }

            let record = builder.build();
            tracing::debug!(message = %record.log_string(), "Classified error");
            render(&ErrorSummary::from(&record), output)
        }
    }
}

async fn read_payload(path: &Path) -> anyhow::Result<Vec<u8>> {
    tracing::debug!(path = %path.display(), "Reading payload");
    fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Splits a `Name: value` header argument.
///
/// # Errors
///
/// - `anyhow::Error` - The argument has no colon or an empty name
fn parse_header(raw: &str) -> anyhow::Result<(&str, &str)> {
    let Some((name, value)) = raw.split_once(':') else {
        bail!("Invalid header '{raw}', expected \"Name: value\"");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("Invalid header '{raw}', name is empty");
    }
    Ok((name, value.trim()))
}

fn render<T: Serialize>(summary: &T, output: &OutputConfig) -> anyhow::Result<String> {
    let rendered = match output.format {
        OutputFormat::Json if output.pretty => serde_json::to_string_pretty(summary)?,
        OutputFormat::Json => serde_json::to_string(summary)?,
        OutputFormat::Text => render_text(&serde_json::to_value(summary)?),
    };
    Ok(rendered)
}

/// Aligned `key: value` lines in field order, `-` for absent values.
fn render_text(value: &serde_json::Value) -> String {
    let Some(fields) = value.as_object() else {
        return value.to_string();
    };
    let width = fields.keys().map(String::len).max().unwrap_or(0);

    fields
        .iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::Null => "-".to_string(),
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            format!("{key:<width$}  {value}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Serialize)]
struct MediaSummary {
    resource_key: Option<String>,
    name: Option<String>,
    status: MediaStatus,
    raw_status: MediaStatus,
    play_status: Option<PlayStatus>,
    playable: bool,
    spatial: bool,
    tvod_type: TvodVideoType,
    tvod_expiration: Option<DateTime<Utc>>,
    trailer: bool,
    resume_seconds: Option<f32>,
    resume_millis: Option<i64>,
    file_count: usize,
    play_count: Option<u64>,
    like_count: u32,
    comment_count: u32,
    can_like: bool,
    liked: bool,
    can_watch_later: bool,
    in_watch_later: bool,
    recommendations_uri: Option<String>,
}

impl From<&MediaRecord> for MediaSummary {
    fn from(media: &MediaRecord) -> Self {
        Self {
            resource_key: media.resource_key.clone(),
            name: media.name.clone(),
            status: media.status(),
            raw_status: media.raw_status(),
            play_status: media.play_status(),
            playable: media.is_playable(),
            spatial: media.is_360(),
            tvod_type: media.tvod_video_type(),
            tvod_expiration: media.tvod_expiration(),
            trailer: media.is_trailer(),
            resume_seconds: media.play_progress_seconds(),
            resume_millis: media.play_progress_millis(),
            file_count: media.file_count(),
            play_count: media.play_count(),
            like_count: media.like_count(),
            comment_count: media.comment_count(),
            can_like: media.can_like(),
            liked: media.is_liked(),
            can_watch_later: media.can_watch_later(),
            in_watch_later: media.is_watch_later(),
            recommendations_uri: media.recommendations_uri(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ActorSummary {
    uri: Option<String>,
    name: Option<String>,
    account_type: AccountType,
    plus_or_pro: bool,
    badge: UserBadgeType,
    followers: u32,
    following: u32,
    likes: u32,
    videos: u32,
    channels: u32,
    moderated_channels: u32,
    appearances: u32,
    can_follow: bool,
    is_following: bool,
    can_upload_picture: bool,
    free_upload_space: Option<u64>,
}

impl From<&ActorRecord> for ActorSummary {
    fn from(actor: &ActorRecord) -> Self {
        Self {
            uri: actor.uri.clone(),
            name: actor.name.clone(),
            account_type: actor.account_type(),
            plus_or_pro: actor.is_plus_or_pro(),
            badge: actor.badge_type(),
            followers: actor.follower_count(),
            following: actor.following_count(),
            likes: actor.likes_count(),
            videos: actor.video_count(),
            channels: actor.channels_count(),
            moderated_channels: actor.moderated_channels_count(),
            appearances: actor.appearances_count(),
            can_follow: actor.can_follow(),
            is_following: actor.is_following(),
            can_upload_picture: actor.can_upload_picture(),
            free_upload_space: actor.free_upload_space(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PinSummary {
    user_code: Option<String>,
    activate_link: Option<String>,
    expires_in_secs: u64,
    poll_interval_secs: u64,
}

impl From<&PinCodeInfo> for PinSummary {
    fn from(info: &PinCodeInfo) -> Self {
        Self {
            user_code: info.user_code.clone(),
            activate_link: info.activate_link.clone(),
            expires_in_secs: info.expires_in().as_secs(),
            poll_interval_secs: info.poll_interval().as_secs(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorSummary {
    log_string: String,
    developer_message: Option<String>,
    error_code: ErrorCode,
    http_status: Option<u16>,
    network_error: bool,
    service_unavailable: bool,
    forbidden: bool,
    invalid_token: bool,
    password_required: bool,
    cancelled: bool,
    invalid_parameters: usize,
}

impl From<&ErrorRecord> for ErrorSummary {
    fn from(record: &ErrorRecord) -> Self {
        Self {
            log_string: record.log_string(),
            developer_message: record.developer_message().map(str::to_string),
            error_code: record.error_code(),
            http_status: record.effective_http_status(),
            network_error: record.is_network_error(),
            service_unavailable: record.is_service_unavailable(),
            forbidden: record.is_forbidden(),
            invalid_token: record.is_invalid_token(),
            password_required: record.is_password_required(),
            cancelled: record.is_cancelled(),
            invalid_parameters: record.invalid_parameters().map_or(0, <[_]>::len),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn payload_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    fn json_output() -> OutputConfig {
        OutputConfig {
            format: OutputFormat::Json,
            pretty: false,
        }
    }

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("WWW-Authenticate: Bearer error=\"invalid_token\"").unwrap(),
            ("WWW-Authenticate", "Bearer error=\"invalid_token\"")
        );
        assert!(parse_header("no colon here").is_err());
        assert!(parse_header(": value").is_err());
    }

    #[test]
    fn test_render_text_aligns_keys() {
        let value = serde_json::json!({"a": "x", "long_key": null, "n": 3});
        let text = render_text(&value);
        assert_eq!(text, "a         x\nlong_key  -\nn         3");
    }

    #[tokio::test]
    async fn test_video_summary() {
        let file = payload_file(
            r#"{
                "resource_key": "abc",
                "status": "available",
                "play": {"status": "playable", "progress": {"seconds": 42.9}},
                "metadata": {
                    "connections": {"likes": {"uri": "/videos/1/likes", "total": 7}},
                    "interactions": {"like": {"added": true, "uri": "/me/likes/1"}}
                }
            }"#,
        );

        let rendered = inspect(
            Commands::Video {
                file: file.path().to_path_buf(),
            },
            &json_output(),
        )
        .await
        .unwrap();
        let summary: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(summary["status"], "available");
        assert_eq!(summary["play_status"], "playable");
        assert_eq!(summary["playable"], true);
        assert_eq!(summary["resume_millis"], 42_000);
        assert_eq!(summary["like_count"], 7);
        assert_eq!(summary["liked"], true);
        assert_eq!(summary["tvod_type"], "none");
    }

    #[tokio::test]
    async fn test_video_text_keeps_field_order() {
        let file = payload_file(r#"{"resource_key": "abc", "status": "transcode_starting"}"#);

        let rendered = inspect(
            Commands::Video {
                file: file.path().to_path_buf(),
            },
            &OutputConfig::default(),
        )
        .await
        .unwrap();
        let keys: Vec<&str> = rendered
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .collect();

        assert_eq!(&keys[..4], ["resource_key", "name", "status", "raw_status"]);
    }

    #[tokio::test]
    async fn test_user_summary_as_text() {
        let file = payload_file(
            r#"{"uri": "/users/9", "name": "Ada", "account": "pro",
                "metadata": {"connections": {"followers": {"uri": "/users/9/followers", "total": 12}}}}"#,
        );

        let rendered = inspect(
            Commands::User {
                file: file.path().to_path_buf(),
            },
            &OutputConfig::default(),
        )
        .await
        .unwrap();

        assert!(rendered.lines().any(|line| line.starts_with("account_type") && line.ends_with("pro")));
        assert!(rendered.lines().any(|line| line.starts_with("followers") && line.ends_with("12")));
        assert!(rendered.lines().any(|line| line.starts_with("plus_or_pro") && line.ends_with("true")));
    }

    #[tokio::test]
    async fn test_error_without_body_uses_status_and_header() {
        let rendered = inspect(
            Commands::Error {
                file: None,
                status: Some(401),
                headers: vec!["www-authenticate: Bearer error=\"invalid_token\"".to_string()],
                cancelled: false,
                fallback_status: None,
                cause: None,
            },
            &json_output(),
        )
        .await
        .unwrap();
        let summary: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(summary["invalid_token"], true);
        assert_eq!(summary["http_status"], 401);
        assert_eq!(summary["log_string"], "HTTP Status Code: 401");
    }

    #[tokio::test]
    async fn test_error_with_local_cause_is_network_error() {
        let rendered = inspect(
            Commands::Error {
                file: None,
                status: None,
                headers: Vec::new(),
                cancelled: false,
                fallback_status: Some(503),
                cause: Some("connection reset".to_string()),
            },
            &json_output(),
        )
        .await
        .unwrap();
        let summary: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(summary["network_error"], true);
        assert_eq!(summary["service_unavailable"], false);
        assert_eq!(summary["http_status"], 503);
        assert_eq!(summary["log_string"], "Exception: connection reset");
    }

    #[tokio::test]
    async fn test_error_body_file() {
        let file = payload_file(
            r#"{"error": "Password needed", "error_code": 2223,
                "invalid_parameters": [{"field": "password", "error_code": 2223}]}"#,
        );

        let rendered = inspect(
            Commands::Error {
                file: Some(file.path().to_path_buf()),
                status: Some(403),
                headers: Vec::new(),
                cancelled: false,
                fallback_status: None,
                cause: None,
            },
            &json_output(),
        )
        .await
        .unwrap();
        let summary: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(summary["password_required"], true);
        assert_eq!(summary["forbidden"], true);
        assert_eq!(summary["error_code"], "2223");
        assert_eq!(summary["invalid_parameters"], 1);
    }

    #[tokio::test]
    async fn test_pin_summary() {
        let file = payload_file(r#"{"user_code": "WXYZ", "expires_in": 300, "interval": 5}"#);

        let rendered = inspect(
            Commands::Pin {
                file: file.path().to_path_buf(),
            },
            &json_output(),
        )
        .await
        .unwrap();
        let summary: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(summary["user_code"], "WXYZ");
        assert_eq!(summary["poll_interval_secs"], 5);
    }

    #[tokio::test]
    async fn test_missing_file_is_reported() {
        let result = inspect(
            Commands::Video {
                file: PathBuf::from("/nonexistent/vidlink/video.json"),
            },
            &json_output(),
        )
        .await;

        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("Failed to read"));
    }

    #[tokio::test]
    async fn test_wrong_payload_shape_is_reported() {
        let file = payload_file("[1, 2, 3]");

        let result = inspect(
            Commands::User {
                file: file.path().to_path_buf(),
            },
            &json_output(),
        )
        .await;

        assert!(result.unwrap_err().to_string().contains("is not a user payload"));
    }
}
