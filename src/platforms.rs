use crate::errors::PublishError;
use crate::models::{ContentItem, ContentStatus, Platform};
use chrono::{DateTime, Utc};
use tracing::info;

pub fn connect(
    platform: &mut Platform,
    handle: &str,
    now: DateTime<Utc>,
) -> Result<(), PublishError> {
    let handle = handle.trim();
    if handle.is_empty() {
        return Err(PublishError::MissingHandle);
    }
    platform.connected = true;
    platform.connected_at = Some(now);
    platform.account_handle = Some(handle.to_string());
    Ok(())
}

pub fn disconnect(platform: &mut Platform) {
    platform.connected = false;
    platform.connected_at = None;
    platform.account_handle = None;
}

/// Schedules `item` for `when` on its connected platforms. Platforms that are
/// not connected are dropped from the item.
pub fn schedule(
    item: &mut ContentItem,
    platforms: &[Platform],
    when: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), PublishError> {
    if item.status == ContentStatus::Published {
        return Err(PublishError::AlreadyPublished);
    }
    if when <= now {
        return Err(PublishError::ScheduleInPast);
    }
    let connected: Vec<String> = item
        .platform_ids
        .iter()
        .filter(|id| platforms.iter().any(|p| &p.id == *id && p.connected))
        .cloned()
        .collect();
    if connected.is_empty() {
        return Err(PublishError::NoConnectedPlatform);
    }
    item.platform_ids = connected;
    item.status = ContentStatus::Scheduled;
    item.scheduled_for = Some(when);
    Ok(())
}

/// Publishes every scheduled item that is due. Returns the published ids.
pub fn publish_due(content: &mut [ContentItem], now: DateTime<Utc>) -> Vec<String> {
    let mut published = Vec::new();
    for item in content.iter_mut().filter(|c| {
        c.status == ContentStatus::Scheduled && c.scheduled_for.is_some_and(|at| at <= now)
    }) {
        item.status = ContentStatus::Published;
        item.published_at = Some(now);
        info!(content = %item.id, "published scheduled content");
        published.push(item.id.clone());
    }
    published
}

pub fn list_content(
    content: &[ContentItem],
    business_id: Option<&str>,
    status: Option<ContentStatus>,
) -> Vec<ContentItem> {
    let mut out: Vec<ContentItem> = content
        .iter()
        .filter(|c| business_id.is_none_or(|id| c.business_id == id))
        .filter(|c| status.is_none_or(|s| c.status == s))
        .cloned()
        .collect();
    out.sort_by_key(|c| c.scheduled_for);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_data;
    use chrono::Duration;

    #[test]
    fn connect_requires_handle() {
        let now = Utc::now();
        let mut platforms = sample_data(now).platforms;
        let yelp = platforms.iter_mut().find(|p| p.id == "plat_yelp").unwrap();
        assert_eq!(connect(yelp, "  ", now), Err(PublishError::MissingHandle));
        assert!(!yelp.connected);
        connect(yelp, "harbor-coffee", now).unwrap();
        assert!(yelp.connected);
        assert_eq!(yelp.account_handle.as_deref(), Some("harbor-coffee"));
        disconnect(yelp);
        assert!(yelp.connected_at.is_none());
    }

    #[test]
    fn schedule_keeps_only_connected_platforms() {
        let now = Utc::now();
        let data = sample_data(now);
        let mut draft = data.content[0].clone();
        draft.platform_ids.push("plat_yelp".into());

        assert_eq!(
            schedule(&mut draft, &data.platforms, now - Duration::minutes(1), now),
            Err(PublishError::ScheduleInPast)
        );
        schedule(&mut draft, &data.platforms, now + Duration::hours(2), now).unwrap();
        assert_eq!(draft.status, ContentStatus::Scheduled);
        assert_eq!(draft.platform_ids, vec!["plat_insta".to_string()]);

        let mut orphan = data.content[0].clone();
        orphan.platform_ids = vec!["plat_gbp".into()];
        assert_eq!(
            schedule(&mut orphan, &data.platforms, now + Duration::hours(2), now),
            Err(PublishError::NoConnectedPlatform)
        );
    }

    #[test]
    fn publish_due_only_touches_due_items() {
        let now = Utc::now();
        let mut content = sample_data(now).content;
        assert!(publish_due(&mut content, now).is_empty());
        let published = publish_due(&mut content, now + Duration::days(2));
        assert_eq!(published, vec!["post_jazz".to_string()]);
        assert_eq!(content[0].status, ContentStatus::Draft);
        assert_eq!(
            list_content(&content, Some("biz_harbor"), Some(ContentStatus::Published)).len(),
            1
        );
    }
}
