//! Loyalty points ledger.
//!
//! Balances only move through [`apply_adjustment`], [`earn`] and
//! [`redeem_reward`], each of which appends one history entry and
//! recomputes the member's tier from lifetime points.

use crate::errors::LedgerError;
use crate::models::{
    LoyaltyMember, LoyaltyProgram, PointsEntry, PointsEntryKind, Reward, Tier, new_id,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A member is active when seen within this many days.
pub const ACTIVE_WINDOW_DAYS: i64 = 30;

/// Highest tier whose threshold is at or below `lifetime_points`.
pub fn tier_for(lifetime_points: i64, tiers: &[Tier]) -> Option<&Tier> {
    tiers
        .iter()
        .filter(|t| t.threshold <= lifetime_points)
        .max_by_key(|t| t.threshold)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TierProgress {
    pub current: Option<String>,
    pub next: Option<String>,
    pub points_to_next: i64,
    /// 0..=100 through the current bracket; 100 at the top tier.
    pub percent: f64,
}

pub fn tier_progress(lifetime_points: i64, tiers: &[Tier]) -> TierProgress {
    let current = tier_for(lifetime_points, tiers);
    let next = tiers
        .iter()
        .filter(|t| t.threshold > lifetime_points)
        .min_by_key(|t| t.threshold);

    match next {
        Some(next) => {
            let floor = current.map_or(0, |t| t.threshold);
            let span = (next.threshold - floor).max(1);
            TierProgress {
                current: current.map(|t| t.name.clone()),
                next: Some(next.name.clone()),
                points_to_next: next.threshold - lifetime_points,
                percent: ((lifetime_points - floor) as f64 / span as f64 * 100.0).clamp(0.0, 100.0),
            }
        }
        None => TierProgress {
            current: current.map(|t| t.name.clone()),
            next: None,
            points_to_next: 0,
            percent: 100.0,
        },
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentRequest {
    pub points_to_adjust: i64,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentPreview {
    pub current_balance: i64,
    pub points_to_adjust: i64,
    pub new_balance: i64,
    pub can_submit: bool,
    pub problem: Option<String>,
}

pub fn check_adjustment(balance: i64, delta: i64, reason: &str) -> Result<i64, LedgerError> {
    if delta == 0 {
        return Err(LedgerError::ZeroAdjustment);
    }
    if reason.trim().is_empty() {
        return Err(LedgerError::MissingReason);
    }
    let new_balance = balance.checked_add(delta).ok_or(LedgerError::Overflow)?;
    if new_balance < 0 {
        return Err(LedgerError::NegativeBalance { balance, delta });
    }
    Ok(new_balance)
}

/// What the adjustment dialog shows before submitting.
pub fn preview_adjustment(member: &LoyaltyMember, req: &AdjustmentRequest) -> AdjustmentPreview {
    let check = check_adjustment(member.points_balance, req.points_to_adjust, &req.reason);
    AdjustmentPreview {
        current_balance: member.points_balance,
        points_to_adjust: req.points_to_adjust,
        new_balance: member.points_balance.saturating_add(req.points_to_adjust),
        can_submit: check.is_ok(),
        problem: check.err().map(|e| e.to_string()),
    }
}

pub fn apply_adjustment(
    member: &mut LoyaltyMember,
    program: &LoyaltyProgram,
    req: &AdjustmentRequest,
    now: DateTime<Utc>,
) -> Result<PointsEntry, LedgerError> {
    let new_balance = check_adjustment(member.points_balance, req.points_to_adjust, &req.reason)?;
    let lifetime = if req.points_to_adjust > 0 {
        member
            .lifetime_points
            .checked_add(req.points_to_adjust)
            .ok_or(LedgerError::Overflow)?
    } else {
        member.lifetime_points
    };
    member.points_balance = new_balance;
    member.lifetime_points = lifetime;
    Ok(record(
        member,
        program,
        req.points_to_adjust,
        req.reason.trim(),
        PointsEntryKind::Adjusted,
        now,
    ))
}

/// Points for a purchase of `amount_cents`, scaled by the member's tier.
pub fn points_for_purchase(program: &LoyaltyProgram, member: &LoyaltyMember, amount_cents: i64) -> i64 {
    let multiplier = program
        .tiers
        .iter()
        .find(|t| t.name == member.tier)
        .map_or(1.0, |t| t.multiplier);
    let dollars = amount_cents as f64 / 100.0;
    (dollars * program.points_per_dollar * multiplier).floor() as i64
}

pub fn earn(
    member: &mut LoyaltyMember,
    program: &LoyaltyProgram,
    amount_cents: i64,
    now: DateTime<Utc>,
) -> Result<PointsEntry, LedgerError> {
    if amount_cents <= 0 {
        return Err(LedgerError::InvalidAmount);
    }
    let points = points_for_purchase(program, member, amount_cents);
    let balance = member.points_balance.checked_add(points);
    let lifetime = member.lifetime_points.checked_add(points);
    let (Some(balance), Some(lifetime)) = (balance, lifetime) else {
        return Err(LedgerError::Overflow);
    };
    member.points_balance = balance;
    member.lifetime_points = lifetime;
    let reason = format!("Purchase of ${:.2}", amount_cents as f64 / 100.0);
    Ok(record(member, program, points, &reason, PointsEntryKind::Earned, now))
}

pub fn redeem_reward(
    member: &mut LoyaltyMember,
    program: &LoyaltyProgram,
    reward_id: &str,
    now: DateTime<Utc>,
) -> Result<PointsEntry, LedgerError> {
    let reward = program
        .rewards
        .iter()
        .find(|r| r.id == reward_id && r.is_active)
        .ok_or_else(|| LedgerError::RewardUnavailable(reward_id.to_string()))?;

    if member.points_balance < reward.points_cost {
        return Err(LedgerError::InsufficientPoints {
            needed: reward.points_cost,
            available: member.points_balance,
        });
    }
    let used = member.redemptions.get(reward_id).copied().unwrap_or(0);
    if let Some(limit) = reward.redemption_limit
        && used >= limit
    {
        return Err(LedgerError::RedemptionLimit {
            reward: reward.name.clone(),
            limit,
        });
    }

    member.points_balance -= reward.points_cost;
    member.redemptions.insert(reward_id.to_string(), used + 1);
    Ok(record(
        member,
        program,
        -reward.points_cost,
        &reward.name,
        PointsEntryKind::Redeemed,
        now,
    ))
}

fn record(
    member: &mut LoyaltyMember,
    program: &LoyaltyProgram,
    delta: i64,
    reason: &str,
    kind: PointsEntryKind,
    now: DateTime<Utc>,
) -> PointsEntry {
    let entry = PointsEntry {
        id: new_id("pts"),
        date: now,
        delta,
        reason: reason.to_string(),
        kind,
    };
    member.points_history.push(entry.clone());
    member.last_active = now;
    if let Some(tier) = tier_for(member.lifetime_points, &program.tiers) {
        member.tier = tier.name.clone();
    }
    entry
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDraft {
    pub business_id: String,
    pub name: String,
    pub points_per_dollar: f64,
    pub tiers: Vec<Tier>,
    #[serde(default)]
    pub rewards: Vec<RewardDraft>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// A reward without an id gets a fresh one.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub points_cost: i64,
    #[serde(default)]
    pub redemption_limit: Option<u32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

pub fn build_program(draft: ProgramDraft) -> Result<LoyaltyProgram, String> {
    let program = LoyaltyProgram {
        id: new_id("prog"),
        business_id: draft.business_id,
        name: draft.name.trim().to_string(),
        points_per_dollar: draft.points_per_dollar,
        tiers: draft.tiers,
        rewards: draft
            .rewards
            .into_iter()
            .map(|r| Reward {
                id: r
                    .id
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or_else(|| new_id("rw")),
                name: r.name.trim().to_string(),
                description: r.description,
                points_cost: r.points_cost,
                redemption_limit: r.redemption_limit,
                is_active: r.is_active,
            })
            .collect(),
        is_active: draft.is_active,
    };
    validate_program(&program)?;
    Ok(program)
}

/// Tiers need distinct names and thresholds, positive multipliers and a base
/// tier at zero so new members always land in one.
pub fn validate_program(program: &LoyaltyProgram) -> Result<(), String> {
    if program.name.trim().is_empty() {
        return Err("name is required".into());
    }
    if !(program.points_per_dollar.is_finite() && program.points_per_dollar > 0.0) {
        return Err("pointsPerDollar must be positive".into());
    }
    if program.tiers.is_empty() {
        return Err("at least one tier is required".into());
    }
    let mut names = HashSet::new();
    let mut thresholds = HashSet::new();
    for tier in &program.tiers {
        if tier.name.trim().is_empty() {
            return Err("tier name is required".into());
        }
        if !names.insert(tier.name.trim().to_lowercase()) {
            return Err(format!("tier {} is listed twice", tier.name));
        }
        if !thresholds.insert(tier.threshold) {
            return Err(format!("two tiers start at {} points", tier.threshold));
        }
        if !(tier.multiplier.is_finite() && tier.multiplier > 0.0) {
            return Err(format!("tier {} needs a positive multiplier", tier.name));
        }
    }
    if program.tiers.iter().map(|t| t.threshold).min() != Some(0) {
        return Err("the lowest tier must start at 0 points".into());
    }
    let mut reward_ids = HashSet::new();
    for reward in &program.rewards {
        if reward.name.trim().is_empty() {
            return Err("reward name is required".into());
        }
        if reward.points_cost <= 0 {
            return Err(format!("reward {} must cost points", reward.name));
        }
        if !reward_ids.insert(reward.id.as_str()) {
            return Err(format!("reward id {} is listed twice", reward.id));
        }
    }
    Ok(())
}

/// Re-derives each member's tier after the program's tiers change. Returns
/// how many members moved.
pub fn retier_members(program: &LoyaltyProgram, members: &mut [LoyaltyMember]) -> usize {
    let mut moved = 0;
    for member in members.iter_mut().filter(|m| m.program_id == program.id) {
        let tier = tier_for(member.lifetime_points, &program.tiers)
            .map(|t| t.name.clone())
            .unwrap_or_default();
        if member.tier != tier {
            member.tier = tier;
            moved += 1;
        }
    }
    moved
}

/// Contact details only; balances move through the ledger.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub fn update_member(
    members: &mut [LoyaltyMember],
    id: &str,
    update: MemberUpdate,
) -> Option<Result<LoyaltyMember, String>> {
    let index = members.iter().position(|m| m.id == id)?;
    let name = match update.name {
        Some(name) if name.trim().is_empty() => return Some(Err("name is required".into())),
        Some(name) => name.trim().to_string(),
        None => members[index].name.clone(),
    };
    let email = match update.email {
        Some(email) => email.trim().to_lowercase(),
        None => members[index].email.clone(),
    };
    if !email.contains('@') {
        return Some(Err("a valid email is required".into()));
    }
    let program_id = &members[index].program_id;
    if members
        .iter()
        .any(|m| m.id != id && &m.program_id == program_id && m.email.eq_ignore_ascii_case(&email))
    {
        return Some(Err(format!("{email} is already a member")));
    }
    let member = &mut members[index];
    member.name = name;
    member.email = email;
    Some(Ok(member.clone()))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub name: String,
    pub email: String,
}

/// Enrolls a new member at the base tier with a zero balance.
pub fn join(
    program: &LoyaltyProgram,
    existing: &[LoyaltyMember],
    req: JoinRequest,
    now: DateTime<Utc>,
) -> Result<LoyaltyMember, String> {
    let email = req.email.trim().to_lowercase();
    if req.name.trim().is_empty() {
        return Err("name is required".into());
    }
    if !email.contains('@') {
        return Err("a valid email is required".into());
    }
    if existing
        .iter()
        .any(|m| m.program_id == program.id && m.email.eq_ignore_ascii_case(&email))
    {
        return Err(format!("{email} is already a member"));
    }
    Ok(LoyaltyMember {
        id: new_id("mem"),
        program_id: program.id.clone(),
        name: req.name.trim().to_string(),
        email,
        points_balance: 0,
        lifetime_points: 0,
        tier: tier_for(0, &program.tiers)
            .map(|t| t.name.clone())
            .unwrap_or_default(),
        join_date: now.date_naive(),
        last_active: now,
        points_history: Vec::new(),
        redemptions: BTreeMap::new(),
    })
}

pub fn is_active(member: &LoyaltyMember, now: DateTime<Utc>) -> bool {
    now - member.last_active <= Duration::days(ACTIVE_WINDOW_DAYS)
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum MemberActivity {
    #[default]
    All,
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum MemberSort {
    #[default]
    Name,
    Points,
    Recent,
    Joined,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberQuery {
    #[serde(default)]
    pub activity: MemberActivity,
    pub tier: Option<String>,
    pub q: Option<String>,
    #[serde(default)]
    pub sort: MemberSort,
}

pub fn list_members(
    members: &[LoyaltyMember],
    program_id: &str,
    query: &MemberQuery,
    now: DateTime<Utc>,
) -> Vec<LoyaltyMember> {
    let needle = query
        .q
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let mut out: Vec<LoyaltyMember> = members
        .iter()
        .filter(|m| m.program_id == program_id)
        .filter(|m| match query.activity {
            MemberActivity::All => true,
            MemberActivity::Active => is_active(m, now),
            MemberActivity::Inactive => !is_active(m, now),
        })
        .filter(|m| {
            query
                .tier
                .as_ref()
                .is_none_or(|t| t.eq_ignore_ascii_case("all") || m.tier.eq_ignore_ascii_case(t))
        })
        .filter(|m| match &needle {
            Some(needle) => {
                m.name.to_lowercase().contains(needle) || m.email.to_lowercase().contains(needle)
            }
            None => true,
        })
        .cloned()
        .collect();

    match query.sort {
        MemberSort::Name => out.sort_by(|a, b| a.name.cmp(&b.name)),
        MemberSort::Points => out.sort_by(|a, b| b.points_balance.cmp(&a.points_balance)),
        MemberSort::Recent => out.sort_by(|a, b| b.last_active.cmp(&a.last_active)),
        MemberSort::Joined => out.sort_by(|a, b| b.join_date.cmp(&a.join_date)),
    }
    out
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgramStats {
    pub total_members: usize,
    pub active_members: usize,
    pub outstanding_points: i64,
    pub lifetime_points_issued: i64,
    pub points_redeemed: i64,
    pub members_by_tier: BTreeMap<String, usize>,
}

pub fn program_stats(
    program: &LoyaltyProgram,
    members: &[LoyaltyMember],
    now: DateTime<Utc>,
) -> ProgramStats {
    let mut members_by_tier: BTreeMap<String, usize> =
        program.tiers.iter().map(|t| (t.name.clone(), 0)).collect();
    let mut stats = ProgramStats {
        total_members: 0,
        active_members: 0,
        outstanding_points: 0,
        lifetime_points_issued: 0,
        points_redeemed: 0,
        members_by_tier: BTreeMap::new(),
    };

    for member in members.iter().filter(|m| m.program_id == program.id) {
        stats.total_members += 1;
        if is_active(member, now) {
            stats.active_members += 1;
        }
        stats.outstanding_points += member.points_balance;
        stats.lifetime_points_issued += member.lifetime_points;
        stats.points_redeemed += member
            .points_history
            .iter()
            .filter(|e| e.kind == PointsEntryKind::Redeemed)
            .map(|e| -e.delta)
            .sum::<i64>();
        *members_by_tier.entry(member.tier.clone()).or_default() += 1;
    }
    stats.members_by_tier = members_by_tier;
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_data;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
    }

    fn fixture() -> (LoyaltyProgram, Vec<LoyaltyMember>) {
        let data = sample_data(now());
        (data.loyalty_programs[0].clone(), data.loyalty_members)
    }

    #[test]
    fn tier_ignores_input_order() {
        let (mut program, _) = fixture();
        program.tiers.reverse();
        assert_eq!(tier_for(0, &program.tiers).unwrap().name, "Bronze");
        assert_eq!(tier_for(1_499, &program.tiers).unwrap().name, "Silver");
        assert_eq!(tier_for(1_500, &program.tiers).unwrap().name, "Gold");
        assert_eq!(tier_for(90_000, &program.tiers).unwrap().name, "Platinum");
        assert!(tier_for(-1, &program.tiers).is_none());
    }

    #[test]
    fn tier_progress_reports_remaining() {
        let (program, _) = fixture();
        let progress = tier_progress(1_000, &program.tiers);
        assert_eq!(progress.current.as_deref(), Some("Silver"));
        assert_eq!(progress.next.as_deref(), Some("Gold"));
        assert_eq!(progress.points_to_next, 500);
        assert_eq!(progress.percent, 50.0);

        let top = tier_progress(6_000, &program.tiers);
        assert_eq!(top.next, None);
        assert_eq!(top.percent, 100.0);
    }

    #[test]
    fn preview_computes_new_balance_and_gates_submit() {
        let (_, members) = fixture();
        let ava = &members[0];
        let preview = preview_adjustment(
            ava,
            &AdjustmentRequest {
                points_to_adjust: 180,
                reason: "Goodwill".into(),
            },
        );
        assert_eq!(preview.new_balance, ava.points_balance + 180);
        assert!(preview.can_submit);

        let zero = preview_adjustment(
            ava,
            &AdjustmentRequest {
                points_to_adjust: 0,
                reason: "Goodwill".into(),
            },
        );
        assert!(!zero.can_submit);

        let blank = preview_adjustment(
            ava,
            &AdjustmentRequest {
                points_to_adjust: 10,
                reason: "   ".into(),
            },
        );
        assert!(!blank.can_submit);
        assert_eq!(blank.new_balance, ava.points_balance + 10);
    }

    #[test]
    fn adjustment_updates_balance_history_and_tier() {
        let (program, mut members) = fixture();
        let noah = &mut members[1];
        let entry = apply_adjustment(
            noah,
            &program,
            &AdjustmentRequest {
                points_to_adjust: 900,
                reason: " Event bonus ".into(),
            },
            now(),
        )
        .unwrap();
        assert_eq!(noah.points_balance, 1_040);
        assert_eq!(noah.lifetime_points, 1_540);
        assert_eq!(noah.tier, "Gold");
        assert_eq!(entry.reason, "Event bonus");
        assert_eq!(noah.points_history.last(), Some(&entry));
        assert_eq!(noah.last_active, now());

        let err = apply_adjustment(
            noah,
            &program,
            &AdjustmentRequest {
                points_to_adjust: -5_000,
                reason: "Correction".into(),
            },
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::NegativeBalance { .. }));
        assert_eq!(noah.points_balance, 1_040);
    }

    #[test]
    fn earn_applies_tier_multiplier() {
        let (program, mut members) = fixture();
        let ava = &mut members[0];
        let before = ava.points_balance;
        let entry = earn(ava, &program, 1_250, now()).unwrap();
        // $12.50 * 10 pts * Gold 1.5
        assert_eq!(entry.delta, 187);
        assert_eq!(ava.points_balance, before + 187);
        assert_eq!(earn(ava, &program, 0, now()), Err(LedgerError::InvalidAmount));
    }

    #[test]
    fn ledger_rejects_totals_out_of_range() {
        let (program, mut members) = fixture();
        let ava = &mut members[0];
        let huge = AdjustmentRequest {
            points_to_adjust: i64::MAX,
            reason: "x".into(),
        };

        let preview = preview_adjustment(ava, &huge);
        assert_eq!(preview.new_balance, i64::MAX);
        assert!(!preview.can_submit);

        let err = apply_adjustment(ava, &program, &huge, now()).unwrap_err();
        assert_eq!(err, LedgerError::Overflow);
        assert_eq!(ava.points_balance, 820);
        assert_eq!(ava.lifetime_points, 2_100);
        assert_eq!(ava.points_history.len(), 2);

        ava.points_balance = i64::MAX - 10;
        assert_eq!(earn(ava, &program, 10_000, now()), Err(LedgerError::Overflow));
        assert_eq!(ava.points_balance, i64::MAX - 10);
        assert_eq!(ava.lifetime_points, 2_100);

        assert_eq!(
            check_adjustment(i64::MIN + 1, -5, "x"),
            Err(LedgerError::Overflow)
        );
    }

    #[test]
    fn redemption_checks_balance_and_limits() {
        let (program, mut members) = fixture();
        let ava = &mut members[0];
        let entry = redeem_reward(ava, &program, "rw_drink", now()).unwrap();
        assert_eq!(entry.delta, -250);
        assert_eq!(ava.points_balance, 570);
        assert_eq!(ava.redemptions["rw_drink"], 2);

        assert!(matches!(
            redeem_reward(ava, &program, "rw_mug", now()),
            Err(LedgerError::RewardUnavailable(_))
        ));
        assert!(matches!(
            redeem_reward(ava, &program, "rw_bag", now()),
            Err(LedgerError::InsufficientPoints { .. })
        ));

        ava.points_balance = 5_000;
        redeem_reward(ava, &program, "rw_bag", now()).unwrap();
        redeem_reward(ava, &program, "rw_bag", now()).unwrap();
        assert!(matches!(
            redeem_reward(ava, &program, "rw_bag", now()),
            Err(LedgerError::RedemptionLimit { limit: 2, .. })
        ));
        assert_eq!(ava.points_balance, 3_000);
    }

    #[test]
    fn active_filter_uses_thirty_day_window() {
        let (program, members) = fixture();
        let query = MemberQuery {
            activity: MemberActivity::Active,
            ..Default::default()
        };
        let active = list_members(&members, &program.id, &query, now());
        let names: Vec<_> = active.iter().map(|m| m.name.as_str()).collect();
        // Mia was last seen exactly 30 days ago, Noah 45.
        assert_eq!(names, vec!["Ava Thompson", "Mia Chen"]);
        for member in &members {
            let expected = now() - member.last_active <= Duration::days(30);
            assert_eq!(active.iter().any(|m| m.id == member.id), expected);
        }

        let inactive = list_members(
            &members,
            &program.id,
            &MemberQuery {
                activity: MemberActivity::Inactive,
                ..Default::default()
            },
            now(),
        );
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].name, "Noah Patel");
    }

    #[test]
    fn members_sort_and_search() {
        let (program, members) = fixture();
        let by_points = list_members(
            &members,
            &program.id,
            &MemberQuery {
                sort: MemberSort::Points,
                ..Default::default()
            },
            now(),
        );
        assert!(by_points.windows(2).all(|w| w[0].points_balance >= w[1].points_balance));

        let found = list_members(
            &members,
            &program.id,
            &MemberQuery {
                q: Some("NOAH@".into()),
                tier: Some("silver".into()),
                ..Default::default()
            },
            now(),
        );
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn join_starts_at_base_tier() {
        let (program, members) = fixture();
        let member = join(
            &program,
            &members,
            JoinRequest {
                name: "Leo".into(),
                email: "Leo@Example.com".into(),
            },
            now(),
        )
        .unwrap();
        assert_eq!(member.tier, "Bronze");
        assert_eq!(member.points_balance, 0);
        assert_eq!(member.email, "leo@example.com");

        let dup = join(
            &program,
            &members,
            JoinRequest {
                name: "Ava again".into(),
                email: "AVA@example.com".into(),
            },
            now(),
        );
        assert!(dup.is_err());
    }

    #[test]
    fn program_rules_reject_bad_tiers() {
        let (program, _) = fixture();
        assert_eq!(validate_program(&program), Ok(()));

        let mut empty = program.clone();
        empty.tiers.clear();
        assert!(validate_program(&empty).is_err());

        let mut same_threshold = program.clone();
        same_threshold.tiers[2].threshold = 500;
        assert_eq!(
            validate_program(&same_threshold),
            Err("two tiers start at 500 points".to_string())
        );

        let mut same_name = program.clone();
        same_name.tiers[1].name = "gold".into();
        assert!(validate_program(&same_name).is_err());

        let mut no_base = program.clone();
        no_base.tiers.remove(0);
        assert!(validate_program(&no_base).is_err());

        let mut free = program.clone();
        free.rewards[0].points_cost = 0;
        assert!(validate_program(&free).is_err());
    }

    #[test]
    fn build_program_assigns_ids() {
        let (program, _) = fixture();
        let built = build_program(ProgramDraft {
            business_id: "biz_ember".into(),
            name: " Slice club ".into(),
            points_per_dollar: 5.0,
            tiers: program.tiers.clone(),
            rewards: vec![RewardDraft {
                id: None,
                name: "Free slice".into(),
                description: String::new(),
                points_cost: 300,
                redemption_limit: None,
                is_active: true,
            }],
            is_active: true,
        })
        .unwrap();
        assert!(built.id.starts_with("prog_"));
        assert_eq!(built.name, "Slice club");
        assert!(built.rewards[0].id.starts_with("rw_"));
    }

    #[test]
    fn retier_follows_new_thresholds() {
        let (mut program, mut members) = fixture();
        program.tiers[2].threshold = 3_000;
        let moved = retier_members(&program, &mut members);
        assert_eq!(moved, 1);
        assert_eq!(members[0].tier, "Silver");
        assert_eq!(members[0].points_balance, 820);
    }

    #[test]
    fn member_update_keeps_balance_and_unique_email() {
        let (_, mut members) = fixture();
        let updated = update_member(
            &mut members,
            "mem_noah",
            MemberUpdate {
                name: Some(" Noah P. ".into()),
                email: Some("NOAH.P@example.com".into()),
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(updated.name, "Noah P.");
        assert_eq!(updated.email, "noah.p@example.com");
        assert_eq!(updated.points_balance, 140);

        let taken = members[0].email.to_uppercase();
        let clash = update_member(
            &mut members,
            "mem_noah",
            MemberUpdate {
                email: Some(taken),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(clash.is_err());
        assert_eq!(members[1].email, "noah.p@example.com");

        let blank = update_member(
            &mut members,
            "mem_mia",
            MemberUpdate {
                name: Some(" ".into()),
                ..Default::default()
            },
        );
        assert!(matches!(blank, Some(Err(_))));
        assert!(update_member(&mut members, "missing", MemberUpdate::default()).is_none());
    }

    #[test]
    fn stats_aggregate_members() {
        let (program, members) = fixture();
        let stats = program_stats(&program, &members, now());
        assert_eq!(stats.total_members, 3);
        assert_eq!(stats.active_members, 2);
        assert_eq!(stats.outstanding_points, 820 + 140 + 60);
        assert_eq!(stats.lifetime_points_issued, 2_100 + 640 + 60);
        assert_eq!(stats.points_redeemed, 1_280 + 500);
        assert_eq!(stats.members_by_tier["Platinum"], 0);
        assert_eq!(stats.members_by_tier["Gold"], 1);
    }
}
