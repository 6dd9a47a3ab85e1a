//! Transactional video-on-demand resolution.
//!
//! A TVOD video can carry several purchase signals at once (a rental and a
//! subscription, say). [`MediaRecord::tvod_video_type`] collapses them into
//! one answer using a fixed priority order.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::MediaRecord;
use crate::engagement::{ConnectionKind, Engaged, InteractionKind};

/// Purchase classification of a media record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TvodVideoType {
    /// Not a TVOD video at all.
    None,
    Trailer,
    Rental,
    Subscription,
    Purchase,
    /// TVOD, but no purchase signal matched (own video, promo access, ...).
    Unknown,
}

impl std::fmt::Display for TvodVideoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TvodVideoType::None => "none",
            TvodVideoType::Trailer => "trailer",
            TvodVideoType::Rental => "rental",
            TvodVideoType::Subscription => "subscription",
            TvodVideoType::Purchase => "purchase",
            TvodVideoType::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Which time-limited purchase an expiration belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseWindow {
    Rental,
    Subscription,
}

/// Picks the expiration that ends last.
///
/// A missing side loses to a present one; equal instants go to the
/// subscription.
pub fn later_expiration(
    rental: Option<DateTime<Utc>>,
    subscription: Option<DateTime<Utc>>,
) -> Option<(PurchaseWindow, DateTime<Utc>)> {
    match (rental, subscription) {
        (Some(rental), Some(subscription)) if rental > subscription => {
            Some((PurchaseWindow::Rental, rental))
        }
        (_, Some(subscription)) => Some((PurchaseWindow::Subscription, subscription)),
        (Some(rental), None) => Some((PurchaseWindow::Rental, rental)),
        (None, None) => None,
    }
}

impl MediaRecord {
    /// Checks whether the record has a TVOD connection.
    pub fn is_tvod(&self) -> bool {
        self.connection(ConnectionKind::Tvod).is_some()
    }

    /// Checks whether this video is the trailer of a TVOD item.
    ///
    /// A full TVOD video links to its trailer; the trailer itself carries
    /// the TVOD edge without a trailer edge of its own.
    pub fn is_trailer(&self) -> bool {
        self.is_tvod() && self.connection(ConnectionKind::Trailer).is_none()
    }

    fn is_possible_tvod_purchase(&self) -> bool {
        self.is_tvod() && !self.is_trailer() && self.interactions().is_some()
    }

    /// TVOD video the viewer has rented.
    pub fn is_tvod_rental(&self) -> bool {
        self.is_possible_tvod_purchase() && self.is_purchased(InteractionKind::Rent)
    }

    /// TVOD video the viewer has subscribed to.
    pub fn is_tvod_subscription(&self) -> bool {
        self.is_possible_tvod_purchase() && self.is_purchased(InteractionKind::Subscribe)
    }

    /// TVOD video the viewer has bought outright.
    pub fn is_tvod_purchase(&self) -> bool {
        self.is_possible_tvod_purchase() && self.is_purchased(InteractionKind::Buy)
    }

    /// Rental expiration, only when [`Self::is_tvod_rental`] holds.
    pub fn tvod_rental_expiration(&self) -> Option<DateTime<Utc>> {
        if !self.is_tvod_rental() {
            return None;
        }
        self.interaction(InteractionKind::Rent)?.expiration
    }

    /// Subscription expiration, only when [`Self::is_tvod_subscription`] holds.
    pub fn tvod_subscription_expiration(&self) -> Option<DateTime<Utc>> {
        if !self.is_tvod_subscription() {
            return None;
        }
        self.interaction(InteractionKind::Subscribe)?.expiration
    }

    /// Resolves the single purchase type of this video.
    ///
    /// Priority: trailer, outright purchase, the later-expiring of rental
    /// and subscription when both exist (ties go to subscription),
    /// subscription, rental. A TVOD video matching none of these is
    /// `Unknown`; anything else is `None`.
    pub fn tvod_video_type(&self) -> TvodVideoType {
        if !self.is_tvod() {
            return TvodVideoType::None;
        }
        if self.is_trailer() {
            return TvodVideoType::Trailer;
        }
        if self.is_tvod_purchase() {
            return TvodVideoType::Purchase;
        }

        let rental = self.tvod_rental_expiration();
        let subscription = self.tvod_subscription_expiration();
        if rental.is_some()
            && subscription.is_some()
            && let Some((PurchaseWindow::Rental, _)) = later_expiration(rental, subscription)
        {
            return TvodVideoType::Rental;
        }

        if self.is_tvod_subscription() {
            return TvodVideoType::Subscription;
        }
        if self.is_tvod_rental() {
            return TvodVideoType::Rental;
        }

        tracing::trace!(
            resource_key = self.resource_key.as_deref().unwrap_or_default(),
            "TVOD video without a purchase signal"
        );
        TvodVideoType::Unknown
    }

    /// When access to this TVOD video ends, using the same later-wins rule
    /// as [`Self::tvod_video_type`].
    pub fn tvod_expiration(&self) -> Option<DateTime<Utc>> {
        if !self.is_tvod() {
            return None;
        }
        later_expiration(
            self.tvod_rental_expiration(),
            self.tvod_subscription_expiration(),
        )
        .map(|(_, expiration)| expiration)
    }

    /// Name of the season this TVOD video belongs to.
    pub fn tvod_season_name(&self) -> Option<&str> {
        self.connection(ConnectionKind::Season)?.name.as_deref()
    }

    /// Trailer video of a TVOD title.
    pub fn trailer_uri(&self) -> Option<&str> {
        self.connection_uri(ConnectionKind::Trailer)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn day(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn tvod(connections: &str, interactions: &str) -> MediaRecord {
        let json = format!(
            r#"{{"resource_key":"k","metadata":{{"connections":{connections},"interactions":{interactions}}}}}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    const TVOD_WITH_TRAILER: &str =
        r#"{"tvod":{"uri":"/ondemand/pages/1"},"trailer":{"uri":"/videos/2"}}"#;

    #[test]
    fn test_later_expiration_rules() {
        assert_eq!(
            later_expiration(Some(day(10)), Some(day(5))),
            Some((PurchaseWindow::Rental, day(10)))
        );
        assert_eq!(
            later_expiration(Some(day(5)), Some(day(10))),
            Some((PurchaseWindow::Subscription, day(10)))
        );
        assert_eq!(
            later_expiration(Some(day(7)), Some(day(7))),
            Some((PurchaseWindow::Subscription, day(7)))
        );
        assert_eq!(
            later_expiration(Some(day(3)), None),
            Some((PurchaseWindow::Rental, day(3)))
        );
        assert_eq!(
            later_expiration(None, Some(day(4))),
            Some((PurchaseWindow::Subscription, day(4)))
        );
        assert_eq!(later_expiration(None, None), None);
    }

    #[test]
    fn test_no_tvod_connection_is_none() {
        let media = tvod("{}", r#"{"buy":{"stream":"purchased"}}"#);

        assert!(!media.is_tvod());
        assert_eq!(media.tvod_video_type(), TvodVideoType::None);
        assert_eq!(media.tvod_expiration(), None);
        assert_eq!(MediaRecord::default().tvod_video_type(), TvodVideoType::None);
    }

    #[test]
    fn test_tvod_without_trailer_edge_is_trailer() {
        let media = tvod(
            r#"{"tvod":{"uri":"/ondemand/pages/1"}}"#,
            r#"{"buy":{"stream":"purchased"}}"#,
        );

        assert!(media.is_trailer());
        assert!(!media.is_tvod_purchase());
        assert_eq!(media.tvod_video_type(), TvodVideoType::Trailer);
    }

    #[test]
    fn test_buy_wins_over_rental_and_subscription() {
        let media = tvod(
            TVOD_WITH_TRAILER,
            r#"{
                "buy":{"stream":"purchased"},
                "rent":{"stream":"purchased","expires_time":"2024-01-10T00:00:00+00:00"},
                "subscribe":{"stream":"purchased","expires_time":"2024-01-05T00:00:00+00:00"}
            }"#,
        );

        assert_eq!(media.tvod_video_type(), TvodVideoType::Purchase);
    }

    #[test]
    fn test_later_rental_wins() {
        let media = tvod(
            TVOD_WITH_TRAILER,
            r#"{
                "rent":{"stream":"purchased","expires_time":"2024-01-10T00:00:00+00:00"},
                "subscribe":{"stream":"purchased","expires_time":"2024-01-05T00:00:00+00:00"}
            }"#,
        );

        assert_eq!(media.tvod_video_type(), TvodVideoType::Rental);
        assert_eq!(media.tvod_expiration(), Some(day(10)));
    }

    #[test]
    fn test_equal_expirations_favor_subscription() {
        let media = tvod(
            TVOD_WITH_TRAILER,
            r#"{
                "rent":{"stream":"purchased","expires_time":"2024-01-07T00:00:00+00:00"},
                "subscribe":{"stream":"purchased","expires_time":"2024-01-07T00:00:00+00:00"}
            }"#,
        );

        assert_eq!(media.tvod_video_type(), TvodVideoType::Subscription);
        assert_eq!(media.tvod_expiration(), Some(day(7)));
    }

    #[test]
    fn test_single_purchase_signals() {
        let subscribed = tvod(
            TVOD_WITH_TRAILER,
            r#"{"subscribe":{"stream":"purchased","expires_time":"2024-01-05T00:00:00+00:00"}}"#,
        );
        let rented = tvod(TVOD_WITH_TRAILER, r#"{"rent":{"stream":"purchased"}}"#);

        assert_eq!(subscribed.tvod_video_type(), TvodVideoType::Subscription);
        assert_eq!(subscribed.tvod_expiration(), Some(day(5)));
        assert_eq!(rented.tvod_video_type(), TvodVideoType::Rental);
        assert_eq!(rented.tvod_expiration(), None);
    }

    #[test]
    fn test_tvod_without_purchase_is_unknown() {
        let media = tvod(
            TVOD_WITH_TRAILER,
            r#"{"rent":{"stream":"available"},"buy":{"added":true}}"#,
        );

        assert_eq!(media.tvod_video_type(), TvodVideoType::Unknown);
    }

    #[test]
    fn test_expiration_accessors_are_guarded() {
        // Rent carries an expiration but was never purchased.
        let media = tvod(
            TVOD_WITH_TRAILER,
            r#"{"rent":{"stream":"restricted","expires_time":"2024-01-10T00:00:00+00:00"}}"#,
        );

        assert!(!media.is_tvod_rental());
        assert_eq!(media.tvod_rental_expiration(), None);
        assert_eq!(media.tvod_subscription_expiration(), None);
        assert_eq!(media.tvod_expiration(), None);
    }

    #[test]
    fn test_season_and_trailer_links() {
        let media = tvod(
            r#"{"tvod":{"uri":"/ondemand/pages/1"},"trailer":{"uri":"/videos/2"},"season":{"uri":"/ondemand/pages/1/seasons/3","name":"Season 3"}}"#,
            "{}",
        );

        assert_eq!(media.tvod_season_name(), Some("Season 3"));
        assert_eq!(media.trailer_uri(), Some("/videos/2"));
    }
}
