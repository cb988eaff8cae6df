use crate::models::{Promotion, PromotionKind, Recurrence};
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PromotionStatus {
    Scheduled,
    Active,
    Paused,
    Expired,
}

pub fn status_at(promotion: &Promotion, now: DateTime<Utc>) -> PromotionStatus {
    if now < promotion.start_date {
        PromotionStatus::Scheduled
    } else if now > promotion.end_date {
        PromotionStatus::Expired
    } else if promotion.is_active {
        PromotionStatus::Active
    } else {
        PromotionStatus::Paused
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum PromotionSort {
    #[default]
    Newest,
    Expiring,
    Performance,
    Title,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionQuery {
    pub status: Option<PromotionStatus>,
    pub kind: Option<PromotionKind>,
    pub business_id: Option<String>,
    pub q: Option<String>,
    #[serde(default)]
    pub sort: PromotionSort,
}

pub fn list_promotions(
    promotions: &[Promotion],
    query: &PromotionQuery,
    now: DateTime<Utc>,
) -> Vec<Promotion> {
    let needle = query
        .q
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let mut out: Vec<Promotion> = promotions
        .iter()
        .filter(|p| query.business_id.as_ref().is_none_or(|id| &p.business_id == id))
        .filter(|p| query.kind.is_none_or(|k| p.kind == k))
        .filter(|p| query.status.is_none_or(|s| status_at(p, now) == s))
        .filter(|p| match &needle {
            Some(needle) => {
                p.title.to_lowercase().contains(needle)
                    || p.description.to_lowercase().contains(needle)
            }
            None => true,
        })
        .cloned()
        .collect();

    match query.sort {
        PromotionSort::Newest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        PromotionSort::Expiring => out.sort_by(|a, b| a.end_date.cmp(&b.end_date)),
        PromotionSort::Performance => {
            out.sort_by(|a, b| b.performance.conversions.cmp(&a.performance.conversions))
        }
        PromotionSort::Title => out.sort_by(|a, b| a.title.cmp(&b.title)),
    }
    out
}

pub fn toggle_active(promotions: &mut [Promotion], id: &str) -> Option<Promotion> {
    let promotion = promotions.iter_mut().find(|p| p.id == id)?;
    promotion.is_active = !promotion.is_active;
    Some(promotion.clone())
}

/// Next start at or after `now`, stepping by the recurrence period.
/// Never past `end_date`.
pub fn next_occurrence(promotion: &Promotion, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let start = promotion.start_date;
    let next = if start >= now {
        start
    } else {
        match promotion.recurrence {
            Recurrence::None => return None,
            Recurrence::Daily => step_fixed(start, now, Duration::days(1)),
            Recurrence::Weekly => step_fixed(start, now, Duration::weeks(1)),
            Recurrence::Monthly => step_months(start, now)?,
        }
    };
    (next <= promotion.end_date).then_some(next)
}

fn step_fixed(start: DateTime<Utc>, now: DateTime<Utc>, period: Duration) -> DateTime<Utc> {
    let elapsed = (now - start).num_seconds();
    let period_secs = period.num_seconds();
    let periods = (elapsed + period_secs - 1) / period_secs;
    start + Duration::seconds(periods * period_secs)
}

fn step_months(start: DateTime<Utc>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let mut months = 1u32;
    loop {
        let candidate = start.checked_add_months(Months::new(months))?;
        if candidate >= now {
            return Some(candidate);
        }
        months += 1;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionView {
    #[serde(flatten)]
    pub promotion: Promotion,
    pub status: PromotionStatus,
    pub next_occurrence: Option<DateTime<Utc>>,
    pub click_through_rate: f64,
}

pub fn view(promotion: Promotion, now: DateTime<Utc>) -> PromotionView {
    let perf = &promotion.performance;
    let click_through_rate = if perf.impressions == 0 {
        0.0
    } else {
        perf.clicks as f64 / perf.impressions as f64
    };
    PromotionView {
        status: status_at(&promotion, now),
        next_occurrence: next_occurrence(&promotion, now),
        click_through_rate,
        promotion,
    }
}

/// Ensures the window is well formed before a promotion is stored.
pub fn validate(promotion: &Promotion) -> Result<(), String> {
    if promotion.title.trim().is_empty() {
        return Err("title is required".into());
    }
    if promotion.end_date < promotion.start_date {
        return Err("end date must not precede start date".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_data;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 31, 9, 0, 0).unwrap()
    }

    #[test]
    fn expiring_sorts_ascending_by_end_date() {
        let promotions = sample_data(now()).promotions;
        let sorted = list_promotions(
            &promotions,
            &PromotionQuery {
                sort: PromotionSort::Expiring,
                ..Default::default()
            },
            now(),
        );
        let ids: Vec<_> = sorted.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["promo_holiday", "promo_author", "promo_happy"]);
    }

    #[test]
    fn status_follows_window_and_flag() {
        let mut promotions = sample_data(now()).promotions;
        let status = |p: &[Promotion], id: &str| {
            status_at(p.iter().find(|x| x.id == id).unwrap(), now())
        };
        assert_eq!(status(&promotions, "promo_happy"), PromotionStatus::Active);
        assert_eq!(status(&promotions, "promo_author"), PromotionStatus::Scheduled);
        assert_eq!(status(&promotions, "promo_holiday"), PromotionStatus::Expired);

        toggle_active(&mut promotions, "promo_happy").unwrap();
        assert_eq!(status(&promotions, "promo_happy"), PromotionStatus::Paused);

        let active = list_promotions(
            &promotions,
            &PromotionQuery {
                status: Some(PromotionStatus::Active),
                ..Default::default()
            },
            now(),
        );
        assert!(active.is_empty());
    }

    #[test]
    fn next_occurrence_steps_by_recurrence() {
        let promotions = sample_data(now()).promotions;
        let happy = promotions.iter().find(|p| p.id == "promo_happy").unwrap();
        // Started three days ago, daily: next start is exactly now.
        assert_eq!(next_occurrence(happy, now()), Some(now()));
        let later = now() + Duration::hours(1);
        assert_eq!(next_occurrence(happy, later), Some(now() + Duration::days(1)));

        let holiday = promotions.iter().find(|p| p.id == "promo_holiday").unwrap();
        assert_eq!(next_occurrence(holiday, now()), None);

        let author = promotions.iter().find(|p| p.id == "promo_author").unwrap();
        assert_eq!(next_occurrence(author, now()), Some(author.start_date));
    }

    #[test]
    fn monthly_recurrence_clamps_month_end() {
        let mut promo = sample_data(now()).promotions.remove(0);
        promo.recurrence = Recurrence::Monthly;
        promo.start_date = Utc.with_ymd_and_hms(2025, 12, 31, 9, 0, 0).unwrap();
        promo.end_date = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let next = next_occurrence(&promo, now() + Duration::hours(1)).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 2, 28, 9, 0, 0).unwrap());
    }

    #[test]
    fn validate_rejects_inverted_window() {
        let mut promo = sample_data(now()).promotions.remove(0);
        assert!(validate(&promo).is_ok());
        promo.end_date = promo.start_date - Duration::days(1);
        assert!(validate(&promo).is_err());
    }
}
