//! Actor account, counts and affordances over a recorded payload.

use vidlink_core::actor::PrivacyValue;
use vidlink_core::{AccountType, ActorRecord, JsonDecoder, RecordDecoder, UserBadgeType};

const PRO_USER: &str = include_str!("../fixtures/user_pro.json");

fn actor() -> ActorRecord {
    JsonDecoder::new()
        .decode_actor(PRO_USER.as_bytes())
        .expect("fixture should decode")
}

#[test]
fn test_account_and_badge() {
    let user = actor();

    assert_eq!(user.account_type(), AccountType::Pro);
    assert!(user.is_plus_or_pro());
    assert_eq!(user.badge_type(), UserBadgeType::Staff);
    assert_eq!(user.pictures_list().len(), 2);
}

#[test]
fn test_connection_counts() {
    let user = actor();

    assert_eq!(user.follower_count(), 1200);
    assert_eq!(user.following_count(), 85);
    assert_eq!(user.likes_count(), 430);
    assert_eq!(user.video_count(), 64);
    assert_eq!(user.channels_count(), 3);
    assert_eq!(user.moderated_channels_count(), 1);
    assert_eq!(user.appearances_count(), 7);

    let notifications = user.notification_connection().expect("notifications edge");
    assert_eq!(notifications.unread_total, 5);
    assert_eq!(notifications.new_total, 3);
}

#[test]
fn test_affordances() {
    let user = actor();

    assert!(user.can_follow());
    assert!(!user.is_following());
    assert!(user.can_upload_picture());
    assert!(user.watch_later_connection().is_none());
}

#[test]
fn test_quota_and_preferences() {
    let user = actor();

    assert_eq!(user.free_upload_space(), Some(5_368_709_120));
    assert_eq!(user.preferred_video_privacy(), Some(PrivacyValue::Unlisted));
}

#[test]
fn test_emails_and_websites() {
    let user = actor();

    let emails: Vec<&str> = user
        .verified_emails()
        .iter()
        .filter_map(|email| email.email.as_deref())
        .collect();
    assert_eq!(emails, ["studio@harborfilms.example"]);

    assert_eq!(user.websites.len(), 1);
    assert_eq!(user.websites[0].link.as_deref(), Some("https://harborfilms.example"));
}

#[test]
fn test_empty_actor_has_safe_defaults() {
    let user = JsonDecoder::new()
        .decode_actor(b"{}")
        .expect("empty object decodes");

    assert_eq!(user.account_type(), AccountType::Basic);
    assert_eq!(user.badge_type(), UserBadgeType::None);
    assert_eq!(user.follower_count(), 0);
    assert!(!user.can_follow());
    assert!(!user.can_upload_picture());
    assert_eq!(user.free_upload_space(), None);
    assert!(user.verified_emails().is_empty());
    assert!(user.websites.is_empty());
}
