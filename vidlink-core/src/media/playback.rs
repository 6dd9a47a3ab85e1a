//! Playback sub-record: play status, delivery files and resume progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::wire::WireValue;

/// The `play` block of a media record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackRecord {
    #[serde(default, deserialize_with = "crate::wire::lenient")]
    pub status: Option<PlayStatus>,
    #[serde(default)]
    pub progress: Option<PlayProgress>,
    #[serde(default)]
    pub hls: Option<ManifestFile>,
    #[serde(default)]
    pub dash: Option<ManifestFile>,
    #[serde(default)]
    pub progressive: Option<Vec<ProgressiveFile>>,
    #[serde(default)]
    pub drm: Option<Drm>,
}

impl PlaybackRecord {
    /// Number of deliverable files: one per streaming manifest, one per
    /// progressive rendition and one for Widevine DRM.
    pub fn file_count(&self) -> usize {
        usize::from(self.hls.is_some())
            + usize::from(self.dash.is_some())
            + self.progressive.as_ref().map_or(0, Vec::len)
            + usize::from(
                self.drm
                    .as_ref()
                    .is_some_and(|drm| drm.widevine.is_some()),
            )
    }

    /// Progressive renditions, empty when the payload had none.
    pub fn progressive_files(&self) -> &[ProgressiveFile] {
        self.progressive.as_deref().unwrap_or_default()
    }
}

/// Server verdict on whether the viewer can play the media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum PlayStatus {
    /// Not done transcoding.
    Unavailable,
    Playable,
    /// On-demand media the viewer has not bought.
    PurchaseRequired,
    /// Region cannot play or purchase this.
    Restricted,
}

impl WireValue for PlayStatus {
    const KIND: &'static str = "play status";
    const ALL: &'static [Self] = &[
        Self::Unavailable,
        Self::Playable,
        Self::PurchaseRequired,
        Self::Restricted,
    ];

    fn as_wire(self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Playable => "playable",
            Self::PurchaseRequired => "purchase_required",
            Self::Restricted => "restricted",
        }
    }
}

impl From<PlayStatus> for &'static str {
    fn from(status: PlayStatus) -> Self {
        status.as_wire()
    }
}

impl std::fmt::Display for PlayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Where the viewer left off.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayProgress {
    #[serde(default)]
    pub seconds: Option<f32>,
}

/// HLS or DASH manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestFile {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub link_expiration_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub log: Option<String>,
}

/// Single progressive download rendition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressiveFile {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub link_expiration_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub width: u32,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub height: u32,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub fps: f32,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub size: u64,
    #[serde(default)]
    pub md5: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Drm {
    #[serde(default)]
    pub widevine: Option<DrmLicense>,
    #[serde(default)]
    pub playready: Option<DrmLicense>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrmLicense {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub license_link: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_count_sums_every_delivery() {
        let play: PlaybackRecord = serde_json::from_str(
            r#"{
                "status": "playable",
                "hls": {"link": "https://cdn.example/master.m3u8"},
                "dash": {"link": "https://cdn.example/master.mpd"},
                "progressive": [{"width": 640, "height": 360}, {"width": 1920, "height": 1080}],
                "drm": {"widevine": {"license_link": "https://drm.example/wv"}}
            }"#,
        )
        .unwrap();

        assert_eq!(play.status, Some(PlayStatus::Playable));
        assert_eq!(play.file_count(), 5);
        assert_eq!(play.progressive_files()[1].height, 1080);
    }

    #[test]
    fn test_file_count_ignores_non_widevine_drm() {
        let play: PlaybackRecord =
            serde_json::from_str(r#"{"drm": {"playready": {"link": "x"}}}"#).unwrap();

        assert_eq!(play.file_count(), 0);
        assert!(play.progressive_files().is_empty());
        assert_eq!(PlaybackRecord::default().file_count(), 0);
    }
}
