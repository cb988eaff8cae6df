use crate::models::{Achievement, Badge, Notification, NotificationKind, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const POINTS_PER_LEVEL_UNIT: i128 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ProfileTab {
    #[default]
    Overview,
    Badges,
    Achievements,
    Rewards,
    Activity,
}

impl FromStr for ProfileTab {
    type Err = std::convert::Infallible;

    /// Unknown names land on the overview.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "badges" => Self::Badges,
            "achievements" => Self::Achievements,
            "rewards" => Self::Rewards,
            "activity" => Self::Activity,
            _ => Self::Overview,
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub level: u32,
    pub points_into_level: i64,
    pub points_for_next: i64,
    pub percent: f64,
}

/// level = floor(sqrt(points / 100)) + 1, so level n starts at 100·(n-1)².
pub fn level_for(points: i64) -> Level {
    let points = i128::from(points.max(0));
    let mut level = ((points / POINTS_PER_LEVEL_UNIT) as f64).sqrt().floor() as i128;
    // Guard against float rounding near perfect squares.
    while level_floor(level + 2) <= points {
        level += 1;
    }
    while level > 0 && level_floor(level + 1) > points {
        level -= 1;
    }
    let level = level + 1;
    let start = level_floor(level);
    let next = level_floor(level + 1);
    Level {
        level: u32::try_from(level).unwrap_or(u32::MAX),
        points_into_level: clamp_i64(points - start),
        points_for_next: clamp_i64(next - points),
        percent: (points - start) as f64 / (next - start) as f64 * 100.0,
    }
}

/// Computed wide so the top of the `i64` range still has a next level.
fn level_floor(level: i128) -> i128 {
    (level - 1).pow(2) * POINTS_PER_LEVEL_UNIT
}

fn clamp_i64(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Profiles are addressed by id or, ignoring case, by username.
pub fn is_profile(profile: &UserProfile, key: &str) -> bool {
    profile.id == key || profile.username.eq_ignore_ascii_case(key)
}

pub fn earned_badges(profile: &UserProfile) -> Vec<&Badge> {
    profile.badges.iter().filter(|b| b.earned_at.is_some()).collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AchievementUpdate {
    pub achievement: Achievement,
    pub newly_completed: bool,
    pub points_awarded: i64,
    pub profile_points: i64,
}

/// Adds `increment` progress, clamped to the target. Completion awards the
/// achievement's points once.
pub fn record_progress(
    profile: &mut UserProfile,
    achievement_id: &str,
    increment: u32,
    now: DateTime<Utc>,
) -> Option<AchievementUpdate> {
    let achievement = profile
        .achievements
        .iter_mut()
        .find(|a| a.id == achievement_id)?;

    let was_complete = achievement.completed_at.is_some();
    achievement.progress = achievement
        .progress
        .saturating_add(increment)
        .min(achievement.target);

    let newly_completed = !was_complete && achievement.progress >= achievement.target;
    let mut points_awarded = 0;
    if newly_completed {
        achievement.completed_at = Some(now);
        points_awarded = achievement.points_reward;
    }
    let achievement = achievement.clone();
    profile.points = profile.points.saturating_add(points_awarded);

    Some(AchievementUpdate {
        achievement,
        newly_completed,
        points_awarded,
        profile_points: profile.points,
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub tab: ProfileTab,
    pub level: Level,
    pub earned_badge_count: usize,
    pub completed_achievements: usize,
    pub unread_notifications: usize,
}

pub fn view(profile: UserProfile, tab: ProfileTab, notifications: &[Notification]) -> ProfileView {
    ProfileView {
        tab,
        level: level_for(profile.points),
        earned_badge_count: earned_badges(&profile).len(),
        completed_achievements: profile
            .achievements
            .iter()
            .filter(|a| a.completed_at.is_some())
            .count(),
        unread_notifications: unread_count(notifications, &profile.id),
        profile,
    }
}

/// `all`, `unread`, or a notification kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationFilter {
    #[default]
    All,
    Unread,
    Kind(NotificationKind),
}

impl FromStr for NotificationFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "unread" => Ok(Self::Unread),
            "reward" => Ok(Self::Kind(NotificationKind::Reward)),
            "deal" => Ok(Self::Kind(NotificationKind::Deal)),
            "event" => Ok(Self::Kind(NotificationKind::Event)),
            "social" => Ok(Self::Kind(NotificationKind::Social)),
            "system" => Ok(Self::Kind(NotificationKind::System)),
            other => Err(format!("unknown notification filter {other:?}")),
        }
    }
}

/// Newest first.
pub fn list_notifications(
    notifications: &[Notification],
    user_id: &str,
    filter: NotificationFilter,
) -> Vec<Notification> {
    let mut out: Vec<Notification> = notifications
        .iter()
        .filter(|n| n.user_id == user_id)
        .filter(|n| match filter {
            NotificationFilter::All => true,
            NotificationFilter::Unread => !n.read,
            NotificationFilter::Kind(kind) => n.kind == kind,
        })
        .cloned()
        .collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}

pub fn mark_read(notifications: &mut [Notification], user_id: &str, id: &str) -> Option<Notification> {
    let n = notifications
        .iter_mut()
        .find(|n| n.id == id && n.user_id == user_id)?;
    n.read = true;
    Some(n.clone())
}

/// Returns how many were changed.
pub fn mark_all_read(notifications: &mut [Notification], user_id: &str) -> usize {
    let mut changed = 0;
    for n in notifications.iter_mut().filter(|n| n.user_id == user_id && !n.read) {
        n.read = true;
        changed += 1;
    }
    changed
}

pub fn unread_count(notifications: &[Notification], user_id: &str) -> usize {
    notifications
        .iter()
        .filter(|n| n.user_id == user_id && !n.read)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_data;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 2, 8, 0, 0).unwrap()
    }

    #[test]
    fn levels_follow_square_root_curve() {
        assert_eq!(level_for(0).level, 1);
        assert_eq!(level_for(99).level, 1);
        assert_eq!(level_for(100).level, 2);
        assert_eq!(level_for(399).level, 2);
        assert_eq!(level_for(400).level, 3);
        assert_eq!(level_for(-50).level, 1);

        let l = level_for(1_350);
        assert_eq!(l.level, 4);
        assert_eq!(l.points_into_level, 450);
        assert_eq!(l.points_for_next, 250);
    }

    #[test]
    fn levels_hold_at_the_top_of_the_range() {
        let top = level_for(i64::MAX);
        assert!(top.level > 1);
        assert!(top.points_for_next > 0);
        assert!((0.0..=100.0).contains(&top.percent));

        let mut profile = sample_data(now()).profiles.remove(0);
        profile.points = i64::MAX - 5;
        let update = record_progress(&mut profile, "ach_reviews", 100, now()).unwrap();
        assert!(update.newly_completed);
        assert_eq!(profile.points, i64::MAX);
        assert_eq!(update.profile_points, i64::MAX);
    }

    #[test]
    fn profiles_match_id_or_username() {
        let profile = sample_data(now()).profiles.remove(0);
        assert!(is_profile(&profile, "user_sam"));
        assert!(is_profile(&profile, &profile.username.to_uppercase()));
        assert!(!is_profile(&profile, "someone"));
    }

    #[test]
    fn tabs_parse_with_overview_fallback() {
        assert_eq!("Badges".parse::<ProfileTab>().unwrap(), ProfileTab::Badges);
        assert_eq!("rewards".parse::<ProfileTab>().unwrap(), ProfileTab::Rewards);
        assert_eq!("settings".parse::<ProfileTab>().unwrap(), ProfileTab::Overview);
    }

    #[test]
    fn achievement_completion_awards_once() {
        let mut profile = sample_data(now()).profiles.remove(0);
        let start = profile.points;

        let update = record_progress(&mut profile, "ach_reviews", 5, now()).unwrap();
        assert_eq!(update.achievement.progress, 23);
        assert!(!update.newly_completed);

        let update = record_progress(&mut profile, "ach_reviews", 10, now()).unwrap();
        assert_eq!(update.achievement.progress, 25);
        assert!(update.newly_completed);
        assert_eq!(update.points_awarded, 250);
        assert_eq!(profile.points, start + 250);

        let again = record_progress(&mut profile, "ach_reviews", 1, now()).unwrap();
        assert!(!again.newly_completed);
        assert_eq!(profile.points, start + 250);

        assert!(record_progress(&mut profile, "missing", 1, now()).is_none());
    }

    #[test]
    fn notifications_filter_and_mark_read() {
        let mut notifications = sample_data(now()).notifications;
        let unread = list_notifications(&notifications, "user_sam", NotificationFilter::Unread);
        assert_eq!(unread.len(), 2);
        assert!(unread[0].created_at > unread[1].created_at);

        let deals = list_notifications(
            &notifications,
            "user_sam",
            "deal".parse().unwrap(),
        );
        assert_eq!(deals.len(), 1);
        assert!("bogus".parse::<NotificationFilter>().is_err());

        mark_read(&mut notifications, "user_sam", "ntf_1").unwrap();
        assert_eq!(unread_count(&notifications, "user_sam"), 1);
        assert!(mark_read(&mut notifications, "someone_else", "ntf_2").is_none());
        assert_eq!(mark_all_read(&mut notifications, "user_sam"), 1);
        assert_eq!(unread_count(&notifications, "user_sam"), 0);
    }

    #[test]
    fn view_summarises_profile() {
        let data = sample_data(now());
        let view = view(data.profiles[0].clone(), ProfileTab::Achievements, &data.notifications);
        assert_eq!(view.earned_badge_count, 1);
        assert_eq!(view.completed_achievements, 1);
        assert_eq!(view.unread_notifications, 2);
        assert!(data.profiles[0].join_date < (now() - Duration::days(1)).date_naive());
    }
}
