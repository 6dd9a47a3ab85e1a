//! Actor (user) records.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engagement::{
    Connection, ConnectionKind, Engaged, EngagementGraph, Interaction, InteractionKind,
    NotificationConnection, OPTIONS_POST,
};
use crate::wire::WireValue;

/// Account tier. Anything unrecognized reads as `Basic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "&'static str")]
pub enum AccountType {
    #[default]
    Basic,
    Business,
    Plus,
    Pro,
    Staff,
}

impl WireValue for AccountType {
    const KIND: &'static str = "account type";
    const ALL: &'static [Self] = &[
        Self::Basic,
        Self::Business,
        Self::Plus,
        Self::Pro,
        Self::Staff,
    ];

    fn as_wire(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Business => "business",
            Self::Plus => "plus",
            Self::Pro => "pro",
            Self::Staff => "staff",
        }
    }
}

impl From<AccountType> for &'static str {
    fn from(account: AccountType) -> Self {
        account.as_wire()
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Badge shown next to an actor's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "&'static str")]
pub enum UserBadgeType {
    #[default]
    None,
    Alum,
    Business,
    Curation,
    Plus,
    Pro,
    Sponsor,
    Staff,
    Support,
}

impl WireValue for UserBadgeType {
    const KIND: &'static str = "user badge";
    const ALL: &'static [Self] = &[
        Self::None,
        Self::Alum,
        Self::Business,
        Self::Curation,
        Self::Plus,
        Self::Pro,
        Self::Sponsor,
        Self::Staff,
        Self::Support,
    ];

    fn as_wire(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Alum => "alum",
            Self::Business => "business",
            Self::Curation => "curation",
            Self::Plus => "plus",
            Self::Pro => "pro",
            Self::Sponsor => "sponsor",
            Self::Staff => "staff",
            Self::Support => "support",
        }
    }
}

impl From<UserBadgeType> for &'static str {
    fn from(badge: UserBadgeType) -> Self {
        badge.as_wire()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserBadge {
    #[serde(default, rename = "type", deserialize_with = "crate::wire::lenient")]
    pub badge_type: Option<UserBadgeType>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// Default privacy applied to an actor's new uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum PrivacyValue {
    Anybody,
    Nobody,
    Contacts,
    Password,
    Users,
    Unlisted,
    Disable,
}

impl WireValue for PrivacyValue {
    const KIND: &'static str = "privacy";
    const ALL: &'static [Self] = &[
        Self::Anybody,
        Self::Nobody,
        Self::Contacts,
        Self::Password,
        Self::Users,
        Self::Unlisted,
        Self::Disable,
    ];

    fn as_wire(self) -> &'static str {
        match self {
            Self::Anybody => "anybody",
            Self::Nobody => "nobody",
            Self::Contacts => "contacts",
            Self::Password => "password",
            Self::Users => "users",
            Self::Unlisted => "unlisted",
            Self::Disable => "disable",
        }
    }
}

impl From<PrivacyValue> for &'static str {
    fn from(privacy: PrivacyValue) -> Self {
        privacy.as_wire()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub videos: Option<VideoPreferences>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoPreferences {
    #[serde(default)]
    pub privacy: Option<PrivacyPreference>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrivacyPreference {
    #[serde(default, deserialize_with = "crate::wire::lenient")]
    pub view: Option<PrivacyValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadQuota {
    #[serde(default)]
    pub space: Option<QuotaSpace>,
}

/// Upload space in bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuotaSpace {
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub free: u64,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub max: u64,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub used: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PictureCollection {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub active: bool,
    #[serde(default)]
    pub sizes: Option<Vec<Picture>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Picture {
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub width: u32,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub height: u32,
    #[serde(default)]
    pub link: Option<String>,
}

/// An e-mail address on the account. The API only lists verified ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Email {
    #[serde(default)]
    pub email: Option<String>,
}

/// A link shown on the profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Website {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A user entity as decoded from the API.
///
/// Identity is the URI alone; a record without a URI equals nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActorRecord {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
    /// Raw tier string; see [`ActorRecord::account_type`].
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub pictures: Option<PictureCollection>,
    #[serde(default, rename = "metadata")]
    pub engagement: Option<EngagementGraph>,
    #[serde(default)]
    pub upload_quota: Option<UploadQuota>,
    #[serde(default)]
    pub preferences: Option<Preferences>,
    #[serde(default)]
    pub badge: Option<UserBadge>,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub emails: Vec<Email>,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub websites: Vec<Website>,
}

impl PartialEq for ActorRecord {
    fn eq(&self, other: &Self) -> bool {
        match (&self.uri, &other.uri) {
            (Some(mine), Some(theirs)) => mine == theirs,
            _ => false,
        }
    }
}

impl Hash for ActorRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
    }
}

impl Engaged for ActorRecord {
    fn engagement(&self) -> Option<&EngagementGraph> {
        self.engagement.as_ref()
    }
}

impl ActorRecord {
    /// Account tier mapped from the raw `account` string.
    ///
    /// Records built from a bare URI (deep links, say) have no account yet
    /// and read as `Basic` until refreshed.
    pub fn account_type(&self) -> AccountType {
        let Some(account) = self.account.as_deref() else {
            return AccountType::Basic;
        };
        AccountType::from_wire(account).unwrap_or_else(|| {
            tracing::debug!(account, "Unrecognized account type, treating as basic");
            AccountType::Basic
        })
    }

    /// Paid tier of either kind.
    pub fn is_plus_or_pro(&self) -> bool {
        matches!(self.account_type(), AccountType::Plus | AccountType::Pro)
    }

    /// Badge shown next to the name, `Default` without one.
    pub fn badge_type(&self) -> UserBadgeType {
        self.badge
            .as_ref()
            .and_then(|badge| badge.badge_type)
            .unwrap_or_default()
    }

    /// Picture sizes, empty when the record has none.
    pub fn pictures_list(&self) -> &[Picture] {
        self.pictures
            .as_ref()
            .and_then(|pictures| pictures.sizes.as_deref())
            .unwrap_or_default()
    }

    /// Addresses the account has verified, empty when none were sent.
    pub fn verified_emails(&self) -> &[Email] {
        &self.emails
    }

    /// Free upload space in bytes, `None` when the payload has no space
    /// object.
    pub fn free_upload_space(&self) -> Option<u64> {
        Some(self.upload_quota.as_ref()?.space.as_ref()?.free)
    }

    /// View privacy preselected for this actor's uploads.
    pub fn preferred_video_privacy(&self) -> Option<PrivacyValue> {
        self.preferences
            .as_ref()?
            .videos
            .as_ref()?
            .privacy
            .as_ref()?
            .view
    }

    /// Follow interaction, if the API sent one.
    pub fn follow_interaction(&self) -> Option<&Interaction> {
        self.interaction(InteractionKind::Follow)
    }

    /// Whether the viewer may follow this actor.
    pub fn can_follow(&self) -> bool {
        self.can_interact(InteractionKind::Follow)
    }

    /// The viewer already follows this actor.
    pub fn is_following(&self) -> bool {
        self.has_interacted(InteractionKind::Follow)
    }

    /// Accounts following this actor.
    pub fn followers_connection(&self) -> Option<&Connection> {
        self.connection(ConnectionKind::Followers)
    }

    /// Follower total, `0` when the edge is missing.
    pub fn follower_count(&self) -> u32 {
        self.connection_total(ConnectionKind::Followers)
    }

    /// Accounts this actor follows.
    pub fn following_connection(&self) -> Option<&Connection> {
        self.connection(ConnectionKind::Following)
    }

    /// How many accounts this actor follows.
    pub fn following_count(&self) -> u32 {
        self.connection_total(ConnectionKind::Following)
    }

    /// The actor's activity feed.
    pub fn feed_connection(&self) -> Option<&Connection> {
        self.connection(ConnectionKind::Feed)
    }

    /// Videos the actor liked.
    pub fn likes_connection(&self) -> Option<&Connection> {
        self.connection(ConnectionKind::Likes)
    }

    /// Liked video total.
    pub fn likes_count(&self) -> u32 {
        self.connection_total(ConnectionKind::Likes)
    }

    /// Channels the actor follows.
    pub fn channels_connection(&self) -> Option<&Connection> {
        self.connection(ConnectionKind::Channels)
    }

    /// Followed channel total.
    pub fn channels_count(&self) -> u32 {
        self.connection_total(ConnectionKind::Channels)
    }

    /// Channels the actor moderates.
    pub fn moderated_channels_connection(&self) -> Option<&Connection> {
        self.connection(ConnectionKind::ModeratedChannels)
    }

    /// Moderated channel total.
    pub fn moderated_channels_count(&self) -> u32 {
        self.connection_total(ConnectionKind::ModeratedChannels)
    }

    /// Videos the actor appears in without owning them.
    pub fn appearances_connection(&self) -> Option<&Connection> {
        self.connection(ConnectionKind::Appearances)
    }

    /// Appearance total.
    pub fn appearances_count(&self) -> u32 {
        self.connection_total(ConnectionKind::Appearances)
    }

    /// The actor's watch-later queue.
    pub fn watch_later_connection(&self) -> Option<&Connection> {
        self.connection(ConnectionKind::WatchLater)
    }

    /// Watch history.
    pub fn watched_videos_connection(&self) -> Option<&Connection> {
        self.connection(ConnectionKind::WatchedVideos)
    }

    /// Notifications edge, with its own counters.
    pub fn notification_connection(&self) -> Option<&NotificationConnection> {
        self.connections()?.notifications.as_ref()
    }

    /// Uploads owned by the actor.
    pub fn videos_connection(&self) -> Option<&Connection> {
        self.connection(ConnectionKind::Videos)
    }

    /// Upload total, `0` when the edge is missing.
    pub fn video_count(&self) -> u32 {
        self.connection_total(ConnectionKind::Videos)
    }

    /// The pictures edge advertises `POST`. Any missing level reads as
    /// `false`.
    pub fn can_upload_picture(&self) -> bool {
        self.connection(ConnectionKind::Pictures)
            .is_some_and(|pictures| pictures.allows(OPTIONS_POST))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(json: &str) -> ActorRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_account_type_mapping() {
        assert_eq!(actor(r#"{"account":"pro"}"#).account_type(), AccountType::Pro);
        assert_eq!(
            actor(r#"{"account":"business"}"#).account_type(),
            AccountType::Business
        );
        assert_eq!(actor(r#"{"account":"staff"}"#).account_type(), AccountType::Staff);
        assert_eq!(actor(r#"{"account":"live_premium"}"#).account_type(), AccountType::Basic);
        assert_eq!(actor("{}").account_type(), AccountType::Basic);
    }

    #[test]
    fn test_plus_or_pro() {
        assert!(actor(r#"{"account":"plus"}"#).is_plus_or_pro());
        assert!(actor(r#"{"account":"pro"}"#).is_plus_or_pro());
        assert!(!actor(r#"{"account":"business"}"#).is_plus_or_pro());
        assert!(!actor("{}").is_plus_or_pro());
    }

    #[test]
    fn test_badge_type_defaults_to_none() {
        assert_eq!(actor("{}").badge_type(), UserBadgeType::None);
        assert_eq!(actor(r#"{"badge":{}}"#).badge_type(), UserBadgeType::None);
        assert_eq!(
            actor(r#"{"badge":{"type":"sponsor","text":"Sponsor"}}"#).badge_type(),
            UserBadgeType::Sponsor
        );
    }

    #[test]
    fn test_free_upload_space() {
        assert_eq!(actor("{}").free_upload_space(), None);
        assert_eq!(actor(r#"{"upload_quota":{}}"#).free_upload_space(), None);
        assert_eq!(
            actor(r#"{"upload_quota":{"space":{"free":1024,"max":2048,"used":1024}}}"#)
                .free_upload_space(),
            Some(1024)
        );
    }

    #[test]
    fn test_counts_default_to_zero() {
        let bare = actor(r#"{"uri":"/users/1"}"#);
        let partial = actor(r#"{"metadata":{"connections":{"videos":{"total":8}}}}"#);

        for record in [&bare, &partial] {
            assert_eq!(record.follower_count(), 0);
            assert_eq!(record.following_count(), 0);
            assert_eq!(record.likes_count(), 0);
            assert_eq!(record.channels_count(), 0);
            assert_eq!(record.moderated_channels_count(), 0);
            assert_eq!(record.appearances_count(), 0);
            assert!(!record.can_follow());
            assert!(!record.is_following());
            assert!(!record.can_upload_picture());
            assert!(record.notification_connection().is_none());
        }
        assert_eq!(partial.video_count(), 8);
        assert_eq!(bare.video_count(), 0);
    }

    #[test]
    fn test_follow_affordances() {
        let can = actor(r#"{"metadata":{"interactions":{"follow":{"added":false}}}}"#);
        let does = actor(r#"{"metadata":{"interactions":{"follow":{"added":true}}}}"#);

        assert!(can.can_follow());
        assert!(!can.is_following());
        assert!(does.can_follow());
        assert!(does.is_following());
    }

    #[test]
    fn test_picture_upload_permission_chain() {
        let cases = [
            (r#"{}"#, false),
            (r#"{"metadata":{}}"#, false),
            (r#"{"metadata":{"connections":{}}}"#, false),
            (r#"{"metadata":{"connections":{"pictures":{}}}}"#, false),
            (r#"{"metadata":{"connections":{"pictures":{"options":["GET"]}}}}"#, false),
            (r#"{"metadata":{"connections":{"pictures":{"options":["GET","POST"]}}}}"#, true),
        ];

        for (json, expected) in cases {
            assert_eq!(actor(json).can_upload_picture(), expected, "{json}");
        }
    }

    #[test]
    fn test_notifications_and_privacy() {
        let record = actor(
            r#"{
                "metadata":{"connections":{"notifications":{"uri":"/me/notifications","total":9,"new_total":2,"unread_total":4}}},
                "preferences":{"videos":{"privacy":{"view":"unlisted"}}}
            }"#,
        );

        let notifications = record.notification_connection().unwrap();
        assert_eq!(notifications.new_total, 2);
        assert_eq!(notifications.unread_total, 4);
        assert_eq!(record.preferred_video_privacy(), Some(PrivacyValue::Unlisted));
        assert_eq!(actor("{}").preferred_video_privacy(), None);
    }

    #[test]
    fn test_pictures_list() {
        assert!(actor("{}").pictures_list().is_empty());
        let record = actor(
            r#"{"pictures":{"active":true,"sizes":[{"width":30,"height":30,"link":"a"},{"width":75,"height":75,"link":"b"}]}}"#,
        );
        assert_eq!(record.pictures_list().len(), 2);
    }

    #[test]
    fn test_identity_by_uri() {
        assert_eq!(actor(r#"{"uri":"/users/1"}"#), actor(r#"{"uri":"/users/1","name":"x"}"#));
        assert_ne!(actor(r#"{"uri":"/users/1"}"#), actor(r#"{"uri":"/users/2"}"#));
        assert_ne!(actor("{}"), actor("{}"));
    }
}
