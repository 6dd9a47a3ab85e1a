//! Media status, purchase and resume resolution over recorded payloads.

use chrono::{TimeZone, Utc};
use vidlink_core::actor::PrivacyValue;
use vidlink_core::{
    Engaged, InteractionKind, JsonDecoder, MediaRecord, MediaStatus, PlayStatus, RecordDecoder,
    TvodVideoType,
};

const AVAILABLE: &str = include_str!("../fixtures/video_available.json");
const TVOD_RENTAL: &str = include_str!("../fixtures/video_tvod_rental.json");
const TVOD_TRAILER: &str = include_str!("../fixtures/video_tvod_trailer.json");
const UNKNOWN_VALUES: &str = include_str!("../fixtures/video_unknown_values.json");
const NULL_FIELDS: &str = include_str!("../fixtures/video_null_fields.json");

fn media(fixture: &str) -> MediaRecord {
    JsonDecoder::new()
        .decode_media(fixture.as_bytes())
        .expect("fixture should decode")
}

#[test]
fn test_available_video_state() {
    let video = media(AVAILABLE);

    assert_eq!(video.status(), MediaStatus::Available);
    assert_eq!(video.play_status(), Some(PlayStatus::Playable));
    assert!(video.is_playable());
    assert!(video.is_360());
    assert_eq!(video.file_count(), 4);
    assert_eq!(video.play_count(), Some(48210));
    assert_eq!(video.tvod_video_type(), TvodVideoType::None);
    assert_eq!(video.tvod_expiration(), None);
    assert!(!video.is_trailer());
}

#[test]
fn test_available_video_resume_position() {
    let video = media(AVAILABLE);

    assert_eq!(video.play_progress_seconds(), Some(30.75));
    assert_eq!(video.play_progress_millis(), Some(30_000));
}

#[test]
fn test_available_video_engagement() {
    let video = media(AVAILABLE);

    assert_eq!(video.like_count(), 311);
    assert_eq!(video.comment_count(), 14);
    assert!(video.can_like());
    assert!(video.is_liked());
    assert!(video.can_watch_later());
    assert!(!video.is_watch_later());
    assert!(video.related_connection().is_some());
    assert_eq!(
        video.recommendations_uri().as_deref(),
        Some("/videos/76979871/recommendations/curated")
    );
    assert!(!video.can_interact(InteractionKind::Rent));
}

#[test]
fn test_available_video_presentation() {
    let video = media(AVAILABLE);

    assert_eq!(video.privacy_view(), Some(PrivacyValue::Anybody));
    let privacy = video.privacy.as_ref().expect("privacy block");
    assert!(privacy.download);
    assert_eq!(privacy.embed.as_deref(), Some("public"));
    assert!(video.embed_html().is_some_and(|html| html.starts_with("<iframe")));

    let widths: Vec<u32> = video.thumbnails().iter().map(|picture| picture.width).collect();
    assert_eq!(widths, [295, 640, 1280]);

    let tags: Vec<&str> = video
        .tags
        .iter()
        .filter_map(|tag| tag.canonical.as_deref())
        .collect();
    assert_eq!(tags, ["harbor", "timelapse"]);
    assert_eq!(video.categories.len(), 1);
    assert!(video.categories[0].top_level);
}

#[test]
fn test_embedded_owner_is_decoded() {
    let video = media(AVAILABLE);
    let owner = video.user.as_deref().expect("owner embedded");

    assert_eq!(owner.uri.as_deref(), Some("/users/152184"));
    assert!(!owner.is_plus_or_pro());
}

#[test]
fn test_rental_outlasting_subscription_wins() {
    let video = media(TVOD_RENTAL);

    assert!(video.is_tvod());
    assert!(!video.is_trailer());
    assert!(video.is_tvod_rental());
    assert!(video.is_tvod_subscription());
    assert!(!video.is_tvod_purchase());
    assert_eq!(video.tvod_video_type(), TvodVideoType::Rental);
    assert_eq!(
        video.tvod_expiration(),
        Some(Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap())
    );
    assert_eq!(video.tvod_season_name(), Some("Season One"));
    assert_eq!(video.trailer_uri(), Some("/videos/5000"));
    assert_eq!(video.playback_failure_uri(), Some("/videos/5001/playback"));
}

#[test]
fn test_transcode_starting_reads_as_transcoding() {
    let video = media(TVOD_RENTAL);

    assert_eq!(video.raw_status(), MediaStatus::TranscodeStarting);
    assert_eq!(video.status(), MediaStatus::Transcoding);
    assert_eq!(video.play_status(), Some(PlayStatus::PurchaseRequired));
    assert!(!video.is_playable());
    assert_eq!(video.play_progress_seconds(), None);
    assert_eq!(video.play_progress_millis(), None);
}

#[test]
fn test_trailer_ignores_purchase_signals() {
    let video = media(TVOD_TRAILER);

    assert!(video.is_trailer());
    assert!(!video.is_tvod_purchase());
    assert_eq!(video.tvod_video_type(), TvodVideoType::Trailer);
    assert_eq!(video.tvod_expiration(), None);
}

#[test]
fn test_unknown_wire_values_degrade() {
    let video = media(UNKNOWN_VALUES);

    assert_eq!(video.raw_status(), MediaStatus::None);
    assert_eq!(video.status(), MediaStatus::None);
    assert_eq!(video.play_status(), None);
    assert!(!video.is_playable());
    assert_eq!(video.play_progress_seconds(), Some(0.0));
    assert_eq!(video.play_progress_millis(), Some(0));
    assert!(!video.is_tvod_rental());
    assert_eq!(video.tvod_video_type(), TvodVideoType::Unknown);
    assert_eq!(video.recommendations_uri().as_deref(), Some("/videos/9/recommendations"));
}

#[test]
fn test_identity_follows_resource_key() {
    let first = media(AVAILABLE);
    let mut renamed = media(AVAILABLE);
    renamed.name = Some("Another title".to_string());

    assert_eq!(first, renamed);
    assert_ne!(first, media(TVOD_RENTAL));
}

#[test]
fn test_null_fields_read_as_defaults() {
    let video = media(NULL_FIELDS);

    assert_eq!(video.status(), MediaStatus::Uploading);
    assert_eq!((video.duration, video.width, video.height), (0, 0, 0));
    assert!(video.content_rating.is_empty());
    assert!(video.tags.is_empty());
    assert!(video.categories.is_empty());
    assert!(video.thumbnails().is_empty());
    assert_eq!(video.privacy_view(), Some(PrivacyValue::Nobody));
    assert_eq!(video.play_status(), None);
    assert_eq!(video.file_count(), 1);

    let file = &video.playback.as_ref().expect("play block").progressive_files()[0];
    assert_eq!((file.width, file.height, file.size), (0, 0, 0));

    assert_eq!(video.like_count(), 0);
    assert_eq!(video.comment_count(), 0);
    assert!(video.like_interaction().is_some());
    assert!(!video.is_liked());
}

#[test]
fn test_null_fields_in_embedded_owner() {
    let video = media(NULL_FIELDS);
    let owner = video.user.as_deref().expect("owner embedded");

    assert!(owner.verified_emails().is_empty());
    assert!(owner.websites.is_empty());
    assert_eq!(owner.free_upload_space(), Some(0));

    let notifications = owner.notification_connection().expect("notifications edge");
    assert_eq!(notifications.unread_total, 0);
    assert_eq!(notifications.new_total, 0);
}
