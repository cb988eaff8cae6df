use crate::models::{EventItem, NewsItem};
use chrono::{DateTime, Utc};
use serde::Deserialize;

const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsQuery {
    pub category: Option<String>,
    pub business_id: Option<String>,
    pub limit: Option<usize>,
}

/// Newest first.
pub fn news_feed(news: &[NewsItem], query: &NewsQuery) -> Vec<NewsItem> {
    let mut out: Vec<NewsItem> = news
        .iter()
        .filter(|n| category_matches(query.category.as_deref(), &n.category))
        .filter(|n| {
            query
                .business_id
                .as_ref()
                .is_none_or(|id| n.business_id.as_ref() == Some(id))
        })
        .cloned()
        .collect();
    out.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    out.truncate(query.limit.unwrap_or(DEFAULT_LIMIT));
    out
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum EventWhen {
    #[default]
    Upcoming,
    Past,
    All,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    #[serde(default)]
    pub when: EventWhen,
    pub category: Option<String>,
    #[serde(default)]
    pub featured_first: bool,
    pub limit: Option<usize>,
}

/// Upcoming events soonest first, past events most recent first. An event
/// is upcoming until it starts.
pub fn event_feed(events: &[EventItem], query: &EventQuery, now: DateTime<Utc>) -> Vec<EventItem> {
    let mut out: Vec<EventItem> = events
        .iter()
        .filter(|e| match query.when {
            EventWhen::Upcoming => e.starts_at >= now,
            EventWhen::Past => e.starts_at < now,
            EventWhen::All => true,
        })
        .filter(|e| category_matches(query.category.as_deref(), &e.category))
        .cloned()
        .collect();

    match query.when {
        EventWhen::Past => out.sort_by(|a, b| b.starts_at.cmp(&a.starts_at)),
        EventWhen::Upcoming | EventWhen::All => out.sort_by(|a, b| a.starts_at.cmp(&b.starts_at)),
    }
    if query.featured_first {
        // Stable, so chronological order holds within each group.
        out.sort_by_key(|e| !e.featured);
    }
    out.truncate(query.limit.unwrap_or(DEFAULT_LIMIT));
    out
}

fn category_matches(wanted: Option<&str>, category: &str) -> bool {
    match wanted.map(str::trim) {
        None | Some("") => true,
        Some(w) if w.eq_ignore_ascii_case("all") => true,
        Some(w) => category.eq_ignore_ascii_case(w),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_data;

    #[test]
    fn news_is_newest_first_and_limited() {
        let data = sample_data(Utc::now());
        let all = news_feed(&data.news, &NewsQuery::default());
        assert!(all.windows(2).all(|w| w[0].published_at >= w[1].published_at));

        let community = news_feed(
            &data.news,
            &NewsQuery {
                category: Some("community".into()),
                limit: Some(1),
                ..Default::default()
            },
        );
        assert_eq!(community.len(), 1);
        assert_eq!(community[0].id, "news_market");
    }

    #[test]
    fn events_split_upcoming_and_past() {
        let now = Utc::now();
        let data = sample_data(now);
        let upcoming = event_feed(&data.events, &EventQuery::default(), now);
        let ids: Vec<_> = upcoming.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["evt_jazz", "evt_signing"]);

        let featured = event_feed(
            &data.events,
            &EventQuery {
                featured_first: true,
                ..Default::default()
            },
            now,
        );
        assert_eq!(featured[0].id, "evt_signing");

        let past = event_feed(
            &data.events,
            &EventQuery {
                when: EventWhen::Past,
                ..Default::default()
            },
            now,
        );
        assert_eq!(past.len(), 1);
        assert_eq!(past[0].id, "evt_tasting");
    }

    #[test]
    fn started_event_moves_to_past() {
        let now = Utc::now();
        let mut events = sample_data(now).events;
        let mut running = events[0].clone();
        running.id = "evt_running".into();
        running.starts_at = now - chrono::Duration::hours(1);
        running.ends_at = now + chrono::Duration::hours(1);
        events.push(running);

        let upcoming = event_feed(&events, &EventQuery::default(), now);
        assert!(upcoming.iter().all(|e| e.id != "evt_running"));

        let past = event_feed(
            &events,
            &EventQuery {
                when: EventWhen::Past,
                ..Default::default()
            },
            now,
        );
        let ids: Vec<_> = past.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["evt_running", "evt_tasting"]);
    }
}
