//! Media records and their derived playback state.

pub mod playback;
pub mod tvod;

use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use playback::{PlayProgress, PlayStatus, PlaybackRecord};
pub use tvod::{PurchaseWindow, TvodVideoType, later_expiration};

use crate::actor::{ActorRecord, Picture, PictureCollection, PrivacyValue};
use crate::engagement::{
    Connection, ConnectionKind, Engaged, EngagementGraph, Interaction, InteractionKind,
};
use crate::errors::ModelError;
use crate::wire::WireValue;

/// Path appended to a media URI when the payload carries no
/// recommendations edge.
pub const RECOMMENDATIONS_PATH: &str = "/recommendations";

/// Raw lifecycle state of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "&'static str")]
pub enum MediaStatus {
    #[default]
    None,
    Available,
    Uploading,
    TranscodeStarting,
    Transcoding,
    UploadingError,
    TranscodingError,
    QuotaExceeded,
}

impl MediaStatus {
    /// Checks whether the upload ended in a failure state.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Self::UploadingError | Self::TranscodingError | Self::QuotaExceeded
        )
    }
}

impl WireValue for MediaStatus {
    const KIND: &'static str = "media status";
    const ALL: &'static [Self] = &[
        Self::None,
        Self::Available,
        Self::Uploading,
        Self::TranscodeStarting,
        Self::Transcoding,
        Self::UploadingError,
        Self::TranscodingError,
        Self::QuotaExceeded,
    ];

    fn as_wire(self) -> &'static str {
        match self {
            Self::None => "N/A",
            Self::Available => "available",
            Self::Uploading => "uploading",
            Self::TranscodeStarting => "transcode_starting",
            Self::Transcoding => "transcoding",
            Self::UploadingError => "uploading_error",
            Self::TranscodingError => "transcoding_error",
            Self::QuotaExceeded => "quota_exceeded",
        }
    }
}

impl From<MediaStatus> for &'static str {
    fn from(status: MediaStatus) -> Self {
        status.as_wire()
    }
}

impl std::fmt::Display for MediaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for MediaStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s).ok_or_else(|| ModelError::UnknownWireValue {
            kind: Self::KIND,
            value: s.to_string(),
        })
    }
}

/// Presence-only marker for immersive (360) video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spatial {
    #[serde(default)]
    pub projection: Option<String>,
    #[serde(default)]
    pub stereo_format: Option<String>,
}

/// Status marker shown on a video tile (staff pick, festival selection, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoBadge {
    #[serde(default, rename = "type")]
    pub badge_type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub festival: Option<String>,
}

/// Player embed snippet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default)]
    pub html: Option<String>,
}

/// Who may view, embed, download or comment on a video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoPrivacy {
    #[serde(default, deserialize_with = "crate::wire::lenient")]
    pub view: Option<PrivacyValue>,
    #[serde(default)]
    pub embed: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub download: bool,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub add: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Normalized form used in URLs.
    #[serde(default)]
    pub canonical: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub top_level: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Absent when the owner hides the play count.
    #[serde(default)]
    pub plays: Option<u64>,
}

/// A video entity as decoded from the API.
///
/// Identity is the resource key alone: two records are equal only when both
/// carry the same key. A record without a key equals nothing, itself
/// included, so this type implements `PartialEq` but not `Eq`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaRecord {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub resource_key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    /// Length in seconds.
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub duration: u32,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub width: u32,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub height: u32,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub release_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub content_rating: Vec<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub review_link: Option<String>,
    #[serde(default, rename = "status", deserialize_with = "crate::wire::lenient")]
    pub raw_status: Option<MediaStatus>,
    #[serde(default, rename = "play")]
    pub playback: Option<PlaybackRecord>,
    #[serde(default, rename = "metadata")]
    pub engagement: Option<EngagementGraph>,
    #[serde(default)]
    pub badge: Option<VideoBadge>,
    #[serde(default)]
    pub spatial: Option<Spatial>,
    #[serde(default)]
    pub stats: Option<Stats>,
    #[serde(default)]
    pub user: Option<Box<ActorRecord>>,
    #[serde(default)]
    pub embed: Option<Embed>,
    #[serde(default)]
    pub privacy: Option<VideoPrivacy>,
    /// Thumbnails.
    #[serde(default)]
    pub pictures: Option<PictureCollection>,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub tags: Vec<Tag>,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub categories: Vec<Category>,
}

impl PartialEq for MediaRecord {
    fn eq(&self, other: &Self) -> bool {
        match (&self.resource_key, &other.resource_key) {
            (Some(mine), Some(theirs)) => mine == theirs,
            _ => false,
        }
    }
}

impl Hash for MediaRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.resource_key.hash(state);
    }
}

impl Engaged for MediaRecord {
    fn engagement(&self) -> Option<&EngagementGraph> {
        self.engagement.as_ref()
    }
}

impl MediaRecord {
    /// Lifecycle state exactly as the server reported it, `None` if absent.
    pub fn raw_status(&self) -> MediaStatus {
        self.raw_status.unwrap_or_default()
    }

    /// Client-facing lifecycle state.
    ///
    /// `TranscodeStarting` reads as `Transcoding`; the two are equivalent
    /// from the client's point of view.
    pub fn status(&self) -> MediaStatus {
        match self.raw_status() {
            MediaStatus::TranscodeStarting => MediaStatus::Transcoding,
            status => status,
        }
    }

    /// Playback verdict from the server, `None` without a play block.
    pub fn play_status(&self) -> Option<PlayStatus> {
        self.playback.as_ref()?.status
    }

    /// Theoretically playable; device limits may still prevent playback.
    pub fn is_playable(&self) -> bool {
        self.play_status() == Some(PlayStatus::Playable)
    }

    /// Immersive video. The spatial marker is the only signal consulted.
    pub fn is_360(&self) -> bool {
        self.spatial.is_some()
    }

    /// Raw progress block from the play payload.
    pub fn play_progress(&self) -> Option<&PlayProgress> {
        self.playback.as_ref()?.progress.as_ref()
    }

    /// Resume position in seconds.
    ///
    /// `None` when the payload has no progress block (missing API
    /// capability). A progress block without a value means "start over"
    /// and yields `0.0`. No duration-based thresholds are applied here; the
    /// server already decides when a resume point is worth reporting.
    pub fn play_progress_seconds(&self) -> Option<f32> {
        self.play_progress()
            .map(|progress| progress.seconds.unwrap_or(0.0))
    }

    /// Resume position in milliseconds, from the whole seconds of
    /// [`Self::play_progress_seconds`]. Signed so that it agrees with the
    /// seconds value for every input. `None` passes through unchanged.
    pub fn play_progress_millis(&self) -> Option<i64> {
        self.play_progress_seconds()
            .map(|seconds| (seconds as i64).saturating_mul(1000))
    }

    /// Number of plays, absent when the owner hides it.
    pub fn play_count(&self) -> Option<u64> {
        self.stats.as_ref()?.plays
    }

    /// Thumbnail sizes, empty when the record has none.
    pub fn thumbnails(&self) -> &[Picture] {
        self.pictures
            .as_ref()
            .and_then(|pictures| pictures.sizes.as_deref())
            .unwrap_or_default()
    }

    /// Who may watch the video.
    pub fn privacy_view(&self) -> Option<PrivacyValue> {
        self.privacy.as_ref()?.view
    }

    /// Player embed HTML.
    pub fn embed_html(&self) -> Option<&str> {
        self.embed.as_ref()?.html.as_deref()
    }

    /// Promotional badge, such as a staff pick.
    pub fn badge(&self) -> Option<&VideoBadge> {
        self.badge.as_ref()
    }

    /// Progressive files available for download or playback.
    pub fn file_count(&self) -> usize {
        self.playback
            .as_ref()
            .map_or(0, PlaybackRecord::file_count)
    }

    /// Watch-later interaction, if the API sent one.
    pub fn watch_later_interaction(&self) -> Option<&Interaction> {
        self.interaction(InteractionKind::WatchLater)
    }

    /// Whether the viewer may queue this video.
    pub fn can_watch_later(&self) -> bool {
        self.can_interact(InteractionKind::WatchLater)
    }

    /// Already in the viewer's watch-later queue.
    pub fn is_watch_later(&self) -> bool {
        self.has_interacted(InteractionKind::WatchLater)
    }

    /// Watch-later edge of the video.
    pub fn watch_later_connection(&self) -> Option<&Connection> {
        self.connection(ConnectionKind::WatchLater)
    }

    /// Like interaction, if the API sent one.
    pub fn like_interaction(&self) -> Option<&Interaction> {
        self.interaction(InteractionKind::Like)
    }

    /// Whether the viewer may like this video.
    pub fn can_like(&self) -> bool {
        self.can_interact(InteractionKind::Like)
    }

    /// The viewer already liked this video.
    pub fn is_liked(&self) -> bool {
        self.has_interacted(InteractionKind::Like)
    }

    /// Users who liked the video.
    pub fn likes_connection(&self) -> Option<&Connection> {
        self.connection(ConnectionKind::Likes)
    }

    /// Like total, `0` when the edge is missing.
    pub fn like_count(&self) -> u32 {
        self.connection_total(ConnectionKind::Likes)
    }

    /// Related videos.
    pub fn related_connection(&self) -> Option<&Connection> {
        self.connection(ConnectionKind::Related)
    }

    /// Comment thread.
    pub fn comments_connection(&self) -> Option<&Connection> {
        self.connection(ConnectionKind::Comments)
    }

    /// Comment total.
    pub fn comment_count(&self) -> u32 {
        self.connection_total(ConnectionKind::Comments)
    }

    /// Where to fetch recommendations: the dedicated edge, else the media
    /// URI plus [`RECOMMENDATIONS_PATH`].
    pub fn recommendations_uri(&self) -> Option<String> {
        self.connection_uri(ConnectionKind::Recommendations)
            .map(str::to_string)
            .or_else(|| {
                self.uri
                    .as_ref()
                    .map(|uri| format!("{uri}{RECOMMENDATIONS_PATH}"))
            })
    }

    /// Endpoint describing why playback failed (DRM failures at present).
    pub fn playback_failure_uri(&self) -> Option<&str> {
        self.connection_uri(ConnectionKind::PlaybackFailureReason)
    }
}
