//! Engagement graph: the `metadata` block of media and actor records.
//!
//! Connections are counted edges to related resources; interactions are
//! per-viewer flags. Every level of the graph is optional and absence is a
//! normal state, so every query here degrades to `None`, `0` or `false`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::wire::WireValue;

/// Capability token advertised in a connection's `options` when the viewer
/// may create resources on that edge.
pub const OPTIONS_POST: &str = "POST";

/// Combined connections and interactions attached to a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementGraph {
    #[serde(default)]
    pub connections: Option<Connections>,
    #[serde(default)]
    pub interactions: Option<Interactions>,
}

/// Named connection edges. Media and actor records populate different
/// subsets of these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connections {
    #[serde(default)]
    pub followers: Option<Connection>,
    #[serde(default)]
    pub following: Option<Connection>,
    #[serde(default)]
    pub feed: Option<Connection>,
    #[serde(default)]
    pub likes: Option<Connection>,
    #[serde(default)]
    pub videos: Option<Connection>,
    #[serde(default)]
    pub comments: Option<Connection>,
    #[serde(default)]
    pub channels: Option<Connection>,
    #[serde(default)]
    pub moderated_channels: Option<Connection>,
    #[serde(default)]
    pub appearances: Option<Connection>,
    #[serde(default)]
    pub watchlater: Option<Connection>,
    #[serde(default)]
    pub watched_videos: Option<Connection>,
    #[serde(default)]
    pub notifications: Option<NotificationConnection>,
    #[serde(default)]
    pub related: Option<Connection>,
    #[serde(default)]
    pub recommendations: Option<Connection>,
    #[serde(default)]
    pub season: Option<Connection>,
    #[serde(default)]
    pub trailer: Option<Connection>,
    #[serde(default, rename = "playback", alias = "playback_failure_reason")]
    pub playback_failure_reason: Option<Connection>,
    #[serde(default)]
    pub tvod: Option<Connection>,
    #[serde(default)]
    pub pictures: Option<Connection>,
}

/// A counted edge to a related resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    #[serde(default)]
    pub uri: Option<String>,
    /// HTTP methods the viewer may use on `uri`.
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub total: u32,
    /// Only populated on the season edge.
    #[serde(default)]
    pub name: Option<String>,
}

impl Connection {
    /// Checks whether `options` advertises the given capability token.
    pub fn allows(&self, option: &str) -> bool {
        self.options
            .as_ref()
            .is_some_and(|options| options.iter().any(|candidate| candidate == option))
    }
}

/// Notifications edge, which carries unread counters on top of the total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationConnection {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub total: u32,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub new_total: u32,
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub unread_total: u32,
}

/// Per-viewer interaction flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interactions {
    #[serde(default)]
    pub follow: Option<Interaction>,
    #[serde(default)]
    pub like: Option<Interaction>,
    #[serde(default)]
    pub watchlater: Option<Interaction>,
    #[serde(default)]
    pub rent: Option<Interaction>,
    #[serde(default)]
    pub buy: Option<Interaction>,
    #[serde(default)]
    pub subscribe: Option<Interaction>,
}

/// A single interaction. Presence means the viewer may perform it;
/// `added` means they already have.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    #[serde(default, deserialize_with = "crate::wire::null_default")]
    pub added: bool,
    #[serde(default)]
    pub added_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default, rename = "expires_time")]
    pub expiration: Option<DateTime<Utc>>,
    /// How the viewer obtained access to the stream.
    #[serde(default, deserialize_with = "crate::wire::lenient")]
    pub stream: Option<StreamSource>,
}

impl Interaction {
    /// Checks whether the viewer paid for this interaction.
    pub fn is_purchased(&self) -> bool {
        self.stream == Some(StreamSource::Purchased)
    }
}

/// Source tag on purchase-type interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum StreamSource {
    Purchased,
    Restricted,
    Available,
    Unavailable,
}

impl WireValue for StreamSource {
    const KIND: &'static str = "stream source";
    const ALL: &'static [Self] = &[
        Self::Purchased,
        Self::Restricted,
        Self::Available,
        Self::Unavailable,
    ];

    fn as_wire(self) -> &'static str {
        match self {
            Self::Purchased => "purchased",
            Self::Restricted => "restricted",
            Self::Available => "available",
            Self::Unavailable => "unavailable",
        }
    }
}

impl From<StreamSource> for &'static str {
    fn from(source: StreamSource) -> Self {
        source.as_wire()
    }
}

/// Connection edges addressable through [`Engaged::connection`].
///
/// Notifications are excluded because they use their own type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    Followers,
    Following,
    Feed,
    Likes,
    Videos,
    Comments,
    Channels,
    ModeratedChannels,
    Appearances,
    WatchLater,
    WatchedVideos,
    Related,
    Recommendations,
    Season,
    Trailer,
    PlaybackFailureReason,
    Tvod,
    Pictures,
}

/// Interaction flags addressable through [`Engaged::interaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Follow,
    Like,
    WatchLater,
    Rent,
    Buy,
    Subscribe,
}

impl Connections {
    /// Looks up a single named edge.
    pub fn edge(&self, kind: ConnectionKind) -> Option<&Connection> {
        match kind {
            ConnectionKind::Followers => self.followers.as_ref(),
            ConnectionKind::Following => self.following.as_ref(),
            ConnectionKind::Feed => self.feed.as_ref(),
            ConnectionKind::Likes => self.likes.as_ref(),
            ConnectionKind::Videos => self.videos.as_ref(),
            ConnectionKind::Comments => self.comments.as_ref(),
            ConnectionKind::Channels => self.channels.as_ref(),
            ConnectionKind::ModeratedChannels => self.moderated_channels.as_ref(),
            ConnectionKind::Appearances => self.appearances.as_ref(),
            ConnectionKind::WatchLater => self.watchlater.as_ref(),
            ConnectionKind::WatchedVideos => self.watched_videos.as_ref(),
            ConnectionKind::Related => self.related.as_ref(),
            ConnectionKind::Recommendations => self.recommendations.as_ref(),
            ConnectionKind::Season => self.season.as_ref(),
            ConnectionKind::Trailer => self.trailer.as_ref(),
            ConnectionKind::PlaybackFailureReason => self.playback_failure_reason.as_ref(),
            ConnectionKind::Tvod => self.tvod.as_ref(),
            ConnectionKind::Pictures => self.pictures.as_ref(),
        }
    }
}

impl Interactions {
    /// Looks up a single interaction flag.
    pub fn flag(&self, kind: InteractionKind) -> Option<&Interaction> {
        match kind {
            InteractionKind::Follow => self.follow.as_ref(),
            InteractionKind::Like => self.like.as_ref(),
            InteractionKind::WatchLater => self.watchlater.as_ref(),
            InteractionKind::Rent => self.rent.as_ref(),
            InteractionKind::Buy => self.buy.as_ref(),
            InteractionKind::Subscribe => self.subscribe.as_ref(),
        }
    }
}

/// Records that carry an engagement graph.
///
/// All graph traversal goes through the provided methods, so every derived
/// query on a record is one graph path plus a default.
pub trait Engaged {
    /// The record's graph, if the payload included one.
    fn engagement(&self) -> Option<&EngagementGraph>;

    fn connections(&self) -> Option<&Connections> {
        self.engagement()?.connections.as_ref()
    }

    fn interactions(&self) -> Option<&Interactions> {
        self.engagement()?.interactions.as_ref()
    }

    fn connection(&self, kind: ConnectionKind) -> Option<&Connection> {
        self.connections()?.edge(kind)
    }

    fn interaction(&self, kind: InteractionKind) -> Option<&Interaction> {
        self.interactions()?.flag(kind)
    }

    /// Edge total, `0` when any level of the path is missing.
    fn connection_total(&self, kind: ConnectionKind) -> u32 {
        self.connection(kind).map_or(0, |connection| connection.total)
    }

    /// Edge URI, if the edge and its URI are both present.
    fn connection_uri(&self, kind: ConnectionKind) -> Option<&str> {
        self.connection(kind)?.uri.as_deref()
    }

    /// The viewer may perform the interaction (its object is present).
    fn can_interact(&self, kind: InteractionKind) -> bool {
        self.interaction(kind).is_some()
    }

    /// The viewer has already performed the interaction.
    fn has_interacted(&self, kind: InteractionKind) -> bool {
        self.interaction(kind)
            .is_some_and(|interaction| interaction.added)
    }

    /// The interaction exists and was paid for.
    fn is_purchased(&self, kind: InteractionKind) -> bool {
        self.interaction(kind)
            .is_some_and(Interaction::is_purchased)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Holder(Option<EngagementGraph>);

    impl Engaged for Holder {
        fn engagement(&self) -> Option<&EngagementGraph> {
            self.0.as_ref()
        }
    }

    fn graph(json: &str) -> Holder {
        Holder(Some(serde_json::from_str(json).unwrap()))
    }

    #[test]
    fn test_missing_levels_default_to_zero_and_false() {
        let holders = [
            Holder(None),
            graph("{}"),
            graph(r#"{"connections":{},"interactions":{}}"#),
        ];

        for holder in &holders {
            assert_eq!(holder.connection_total(ConnectionKind::Likes), 0);
            assert!(holder.connection_uri(ConnectionKind::Likes).is_none());
            assert!(!holder.can_interact(InteractionKind::Like));
            assert!(!holder.has_interacted(InteractionKind::Like));
            assert!(!holder.is_purchased(InteractionKind::Rent));
        }
    }

    #[test]
    fn test_can_versus_has_interacted() {
        let holder = graph(
            r#"{"interactions":{
                "like":{"added":false},
                "watchlater":{"added":true,"added_time":"2024-02-01T10:00:00+00:00"}
            }}"#,
        );

        assert!(holder.can_interact(InteractionKind::Like));
        assert!(!holder.has_interacted(InteractionKind::Like));
        assert!(holder.can_interact(InteractionKind::WatchLater));
        assert!(holder.has_interacted(InteractionKind::WatchLater));
        assert!(!holder.can_interact(InteractionKind::Follow));
    }

    #[test]
    fn test_purchase_requires_purchased_stream() {
        let holder = graph(
            r#"{"interactions":{
                "rent":{"stream":"purchased"},
                "buy":{"stream":"available"},
                "subscribe":{"stream":"never_heard_of_it"}
            }}"#,
        );

        assert!(holder.is_purchased(InteractionKind::Rent));
        assert!(!holder.is_purchased(InteractionKind::Buy));
        assert!(!holder.is_purchased(InteractionKind::Subscribe));
        assert!(holder.can_interact(InteractionKind::Subscribe));
    }

    #[test]
    fn test_connection_options() {
        let holder = graph(
            r#"{"connections":{
                "pictures":{"uri":"/users/1/pictures","options":["GET","POST"],"total":3},
                "likes":{"uri":"/users/1/likes","total":12}
            }}"#,
        );

        let pictures = holder.connection(ConnectionKind::Pictures).unwrap();
        assert!(pictures.allows(OPTIONS_POST));
        assert!(!pictures.allows("DELETE"));
        assert!(!holder.connection(ConnectionKind::Likes).unwrap().allows(OPTIONS_POST));
        assert_eq!(holder.connection_total(ConnectionKind::Likes), 12);
        assert_eq!(
            holder.connection_uri(ConnectionKind::Pictures),
            Some("/users/1/pictures")
        );
    }

    #[test]
    fn test_playback_failure_edge_accepts_both_spellings() {
        let short = graph(r#"{"connections":{"playback":{"uri":"/videos/1/playback"}}}"#);
        let long = graph(
            r#"{"connections":{"playback_failure_reason":{"uri":"/videos/1/playback"}}}"#,
        );

        for holder in [short, long] {
            assert_eq!(
                holder.connection_uri(ConnectionKind::PlaybackFailureReason),
                Some("/videos/1/playback")
            );
        }
    }
}
