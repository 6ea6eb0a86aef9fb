//! Analytics aggregation over all game sessions.
//!
//! [`compute_analytics`] is a pure function of the session collection and
//! the moment of computation. Empty input produces zeros, `None`, and
//! empty collections rather than an error, so "no data yet" is never
//! confused with a failure.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use phasequiz_types::{AnalyticsSummary, SessionRecord, TopTeam, all_phases};

use crate::config::GameConfig;

/// Default leaderboard length.
pub const DEFAULT_TOP_TEAMS: usize = 10;

/// Default trailing window for the sessions-by-date histogram.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Tunables for [`compute_analytics_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsOptions {
    /// Maximum number of leaderboard entries.
    pub top_teams_limit: usize,
    /// Trailing window, in days, for `sessions_by_date`.
    pub window_days: i64,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            top_teams_limit: DEFAULT_TOP_TEAMS,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl From<&GameConfig> for AnalyticsOptions {
    fn from(config: &GameConfig) -> Self {
        Self {
            top_teams_limit: config.top_teams_limit,
            window_days: config.analytics_window_days,
        }
    }
}

/// Compute the dashboard summary with the default options.
pub fn compute_analytics(records: &[SessionRecord], now: DateTime<Utc>) -> AnalyticsSummary {
    compute_analytics_with(records, now, AnalyticsOptions::default())
}

/// Compute the dashboard summary.
///
/// - `phase_completion_rates` holds raw result counts per phase, keyed
///   `phase_1` .. `phase_5`.
/// - `top_teams` lists completed sessions by `total_tokens` descending.
///   Ties go to the earlier `created_at`, then to input order.
/// - `sessions_by_date` counts sessions created within the trailing
///   window, keyed by UTC calendar date. Days with no sessions are absent.
pub fn compute_analytics_with(
    records: &[SessionRecord],
    now: DateTime<Utc>,
    options: AnalyticsOptions,
) -> AnalyticsSummary {
    let total_sessions = count(records.iter());
    let completed_sessions = count(records.iter().filter(|r| r.session.completed));

    AnalyticsSummary {
        total_sessions,
        completed_sessions,
        total_teams: total_sessions,
        average_tokens: average_tokens(records),
        average_completion_time: average_completion_time(records),
        phase_completion_rates: phase_completion_counts(records),
        top_teams: top_teams(records, options.top_teams_limit),
        sessions_by_date: sessions_by_date(records, now, options.window_days),
    }
}

fn count<I: Iterator>(iter: I) -> u64 {
    u64::try_from(iter.count()).unwrap_or(u64::MAX)
}

/// Mean of `total_tokens` over all sessions; 0 when there are none.
#[allow(clippy::cast_precision_loss)]
pub fn average_tokens(records: &[SessionRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: f64 = records.iter().map(|r| r.session.total_tokens as f64).sum();
    sum / records.len() as f64
}

/// Mean seconds from creation to completion over completed sessions.
///
/// Sessions flagged complete without a timestamp are skipped. Returns
/// `None` when no session qualifies.
#[allow(clippy::cast_precision_loss)]
pub fn average_completion_time(records: &[SessionRecord]) -> Option<f64> {
    let durations: Vec<f64> = records
        .iter()
        .filter(|r| r.session.completed)
        .filter_map(|r| {
            r.session
                .completed_at
                .map(|done| done.signed_duration_since(r.session.created_at))
        })
        .map(|delta| delta.num_milliseconds() as f64 / 1000.0)
        .collect();

    if durations.is_empty() {
        None
    } else {
        Some(durations.iter().sum::<f64>() / durations.len() as f64)
    }
}

/// Number of recorded results per phase, keyed `phase_N`.
///
/// This is a count, not a ratio.
pub fn phase_completion_counts(records: &[SessionRecord]) -> BTreeMap<String, u64> {
    all_phases()
        .map(|phase| {
            let n = count(
                records
                    .iter()
                    .flat_map(|r| r.phase_results.iter())
                    .filter(|pr| pr.phase_number == phase),
            );
            (format!("phase_{phase}"), n)
        })
        .collect()
}

/// Completed sessions with the most tokens, at most `limit` of them.
pub fn top_teams(records: &[SessionRecord], limit: usize) -> Vec<TopTeam> {
    let mut completed: Vec<&SessionRecord> =
        records.iter().filter(|r| r.session.completed).collect();

    // Stable sort keeps input order for full ties.
    completed.sort_by(|a, b| {
        b.session
            .total_tokens
            .cmp(&a.session.total_tokens)
            .then_with(|| a.session.created_at.cmp(&b.session.created_at))
    });

    completed
        .into_iter()
        .take(limit)
        .map(|r| TopTeam {
            team_name: r.session.team_name.clone(),
            total_tokens: r.session.total_tokens,
            created_at: r.session.created_at,
        })
        .collect()
}

/// Sessions created within `window_days` of `now`, per UTC date.
pub fn sessions_by_date(
    records: &[SessionRecord],
    now: DateTime<Utc>,
    window_days: i64,
) -> BTreeMap<String, u64> {
    let cutoff = TimeDelta::try_days(window_days)
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut by_date: BTreeMap<String, u64> = BTreeMap::new();
    for record in records.iter().filter(|r| r.session.created_at >= cutoff) {
        let day = record.session.created_at.date_naive().format("%Y-%m-%d").to_string();
        let entry = by_date.entry(day).or_insert(0);
        *entry = entry.saturating_add(1);
    }
    by_date
}
