// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget and spending figures derived from already-fetched expenses.
//!
//! Everything here is a pure function of its arguments. "Now" is always
//! passed in, never read from the clock, so the same input gives the same
//! output.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TrackerError};
use crate::models::{Category, Expense, UNCATEGORIZED};
use crate::utils::{ensure_amount, ensure_budget, fmt_money};

pub const UNCATEGORIZED_ICON: &str = "dots-horizontal";
pub const UNCATEGORIZED_COLOR: &str = "#45B7D1";
pub const TOP_CATEGORIES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    OnTrack,
    OverBudget,
}

impl BudgetStatus {
    pub fn from_remaining(remaining: Decimal) -> Self {
        if remaining < Decimal::ZERO {
            BudgetStatus::OverBudget
        } else {
            BudgetStatus::OnTrack
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetStatus::OnTrack => f.write_str("on track"),
            BudgetStatus::OverBudget => f.write_str("over budget"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSummary {
    pub total_budget: Decimal,
    pub total_expenses: Decimal,
    pub remaining_budget: Decimal,
    pub total_transactions: usize,
    pub status: BudgetStatus,
}

/// Sum that reports overflow instead of panicking.
pub fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal> {
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, d| {
        acc.checked_add(d)
            .ok_or_else(|| TrackerError::Validation("total overflows".into()))
    })
}

pub fn total_expenses(expenses: &[Expense]) -> Result<Decimal> {
    for e in expenses {
        ensure_amount(e.amount)?;
    }
    checked_sum(expenses.iter().map(|e| e.amount))
}

/// Negative when the board is over budget.
pub fn remaining_budget(total_budget: Decimal, total_expenses: Decimal) -> Decimal {
    total_budget - total_expenses
}

pub fn summarize_board(total_budget: Decimal, expenses: &[Expense]) -> Result<BoardSummary> {
    ensure_budget(total_budget)?;
    let total = total_expenses(expenses)?;
    let remaining = remaining_budget(total_budget, total);
    Ok(BoardSummary {
        total_budget,
        total_expenses: total,
        remaining_budget: remaining,
        total_transactions: expenses.len(),
        status: BudgetStatus::from_remaining(remaining),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    /// `None` for the synthetic "Uncategorized" group.
    pub category_id: Option<i64>,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub amount: Decimal,
    pub count: usize,
    pub percentage: u32,
}

/// Whole-number share of `part` in `total`, half rounded up; 0 for an empty total.
pub fn percentage_of(part: Decimal, total: Decimal) -> u32 {
    if total <= Decimal::ZERO {
        return 0;
    }
    (part / total * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

/// Groups by category. Expenses without a category, or whose category no
/// longer exists, land in a single "Uncategorized" group.
pub fn category_breakdown(
    expenses: &[Expense],
    categories: &HashMap<i64, Category>,
    top: Option<usize>,
) -> Result<Vec<CategoryShare>> {
    let total = total_expenses(expenses)?;
    let mut groups: BTreeMap<Option<i64>, (Decimal, usize)> = BTreeMap::new();
    for e in expenses {
        let key = e.category_id.filter(|id| categories.contains_key(id));
        let g = groups.entry(key).or_insert((Decimal::ZERO, 0));
        g.0 = checked_sum([g.0, e.amount])?;
        g.1 += 1;
    }

    let mut shares: Vec<CategoryShare> = groups
        .into_iter()
        .map(|(key, (amount, count))| {
            let cat = key.and_then(|id| categories.get(&id));
            CategoryShare {
                category_id: key,
                name: cat.map_or_else(|| UNCATEGORIZED.to_string(), |c| c.name.clone()),
                icon: cat.map_or_else(|| UNCATEGORIZED_ICON.to_string(), |c| c.icon.clone()),
                color: cat.map_or_else(|| UNCATEGORIZED_COLOR.to_string(), |c| c.color.clone()),
                amount,
                count,
                percentage: percentage_of(amount, total),
            }
        })
        .collect();
    shares.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.category_id.cmp(&b.category_id))
    });
    if let Some(n) = top {
        shares.truncate(n);
    }
    Ok(shares)
}

/// Relative analytics window. Month and year are fixed 30 and 365 day
/// spans, not calendar units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
    Year,
    All,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
            Period::All => "all",
        }
    }

    pub fn days(&self) -> Option<i64> {
        match self {
            Period::Week => Some(7),
            Period::Month => Some(30),
            Period::Year => Some(365),
            Period::All => None,
        }
    }

    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.days() {
            Some(d) => now - Duration::days(d),
            None => Utc.timestamp_opt(0, 0).single().unwrap_or(DateTime::<Utc>::MIN_UTC),
        }
    }

    /// The equal-length window ending where this one starts. `All` has none.
    pub fn previous_window(&self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let days = self.days()?;
        let end = self.cutoff(now);
        Some((end - Duration::days(days), end))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            "all" => Ok(Period::All),
            other => Err(TrackerError::Validation(format!(
                "Unknown period '{}', expected week|month|year|all",
                other
            ))),
        }
    }
}

/// Expenses dated at or after the period's cutoff.
pub fn filter_period(expenses: &[Expense], period: Period, now: DateTime<Utc>) -> Vec<Expense> {
    let cutoff = period.cutoff(now);
    expenses.iter().filter(|e| e.date >= cutoff).cloned().collect()
}

/// Expenses in `[start, end)`.
pub fn filter_between(
    expenses: &[Expense],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<Expense> {
    expenses
        .iter()
        .filter(|e| e.date >= start && e.date < end)
        .cloned()
        .collect()
}

/// `(current - previous) / previous * 100` to one decimal; 0 without a
/// previous total.
pub fn percentage_change(current: Decimal, previous: Decimal) -> Result<Decimal> {
    if previous.is_zero() {
        return Ok(Decimal::ZERO);
    }
    (current - previous)
        .checked_div(previous)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .map(|c| c.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| TrackerError::Validation("percentage change overflows".into()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub day: NaiveDate,
    pub amount: Decimal,
    pub count: usize,
    pub categories: Vec<CategoryShare>,
}

/// Per UTC calendar day, oldest first.
pub fn daily_trend(
    expenses: &[Expense],
    categories: &HashMap<i64, Category>,
) -> Result<Vec<DailyTotal>> {
    let mut days: BTreeMap<NaiveDate, Vec<Expense>> = BTreeMap::new();
    for e in expenses {
        days.entry(e.date.date_naive()).or_default().push(e.clone());
    }
    days.into_iter()
        .map(|(day, items)| -> Result<DailyTotal> {
            Ok(DailyTotal {
                day,
                amount: total_expenses(&items)?,
                count: items.len(),
                categories: category_breakdown(&items, categories, None)?,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodStats {
    pub total_amount: Decimal,
    pub highest_amount: Decimal,
    pub lowest_amount: Decimal,
    pub average_amount: Decimal,
    pub total_count: usize,
    pub days_in_period: i64,
    pub average_per_day: Decimal,
}

/// 7/30/365 for the fixed periods. For `All` the span from the earliest
/// expense to `now`, at least one day.
pub fn days_in_period(period: Period, expenses: &[Expense], now: DateTime<Utc>) -> i64 {
    if let Some(d) = period.days() {
        return d;
    }
    let Some(earliest) = expenses.iter().map(|e| e.date).min() else {
        return 1;
    };
    let secs = (now - earliest).num_seconds().max(0);
    let days = (secs + 86_399) / 86_400;
    days.max(1)
}

pub fn period_stats(expenses: &[Expense], period: Period, now: DateTime<Utc>) -> Result<PeriodStats> {
    let total = total_expenses(expenses)?;
    let count = expenses.len();
    let highest = expenses.iter().map(|e| e.amount).max().unwrap_or(Decimal::ZERO);
    let lowest = expenses.iter().map(|e| e.amount).min().unwrap_or(Decimal::ZERO);
    let average = if count > 0 {
        total / Decimal::from(count)
    } else {
        Decimal::ZERO
    };
    let days = days_in_period(period, expenses, now);
    let per_day = if days > 0 {
        total / Decimal::from(days)
    } else {
        Decimal::ZERO
    };
    Ok(PeriodStats {
        total_amount: total.round_dp(2),
        highest_amount: highest.round_dp(2),
        lowest_amount: lowest.round_dp(2),
        average_amount: average.round_dp(2),
        total_count: count,
        days_in_period: days,
        average_per_day: per_day.round_dp(2),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub color: String,
}

impl Insight {
    fn new(title: &str, description: String, icon: &str, color: &str) -> Self {
        Insight {
            title: title.to_string(),
            description,
            icon: icon.to_string(),
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub period: Period,
    pub total_expenses: Decimal,
    pub average_expense: Decimal,
    pub top_categories: Vec<CategoryShare>,
    pub stats: PeriodStats,
    pub insights: Vec<Insight>,
}

/// Headline figures for one period of a board's expenses.
pub fn analytics_summary(
    expenses: &[Expense],
    categories: &HashMap<i64, Category>,
    period: Period,
    now: DateTime<Utc>,
    currency: &str,
) -> Result<AnalyticsSummary> {
    let current = filter_period(expenses, period, now);
    let stats = period_stats(&current, period, now)?;
    let top = category_breakdown(&current, categories, Some(TOP_CATEGORIES))?;

    let mut insights = Vec::new();
    if let Some(first) = top.first() {
        insights.push(Insight::new(
            "Top Category",
            format!("{} is your highest spending category", first.name),
            &first.icon,
            &first.color,
        ));
    }
    if stats.highest_amount > Decimal::ZERO {
        insights.push(Insight::new(
            "Highest Expense",
            format!(
                "Your highest expense was {}",
                fmt_money(&stats.highest_amount, currency)
            ),
            "arrow-up",
            "#FF6B6B",
        ));
    }
    if stats.average_amount > Decimal::ZERO {
        insights.push(Insight::new(
            "Average Expense",
            format!(
                "You spend an average of {} per transaction",
                fmt_money(&stats.average_amount, currency)
            ),
            "chart-line",
            "#4ECDC4",
        ));
    }

    Ok(AnalyticsSummary {
        period,
        total_expenses: stats.total_amount,
        average_expense: stats.average_amount,
        top_categories: top,
        stats,
        insights,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviousPeriod {
    pub total_amount: Decimal,
    pub percentage_change: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub period: Period,
    pub statistics: PeriodStats,
    pub category_breakdown: Vec<CategoryShare>,
    pub previous_period: PreviousPeriod,
    pub trend: Vec<DailyTotal>,
    pub insights: Vec<Insight>,
}

/// Current period against the equal-length window before it.
pub fn trend_report(
    expenses: &[Expense],
    categories: &HashMap<i64, Category>,
    period: Period,
    now: DateTime<Utc>,
) -> Result<TrendReport> {
    let current = filter_period(expenses, period, now);
    let statistics = period_stats(&current, period, now)?;
    let previous_total = match period.previous_window(now) {
        Some((start, end)) => total_expenses(&filter_between(expenses, start, end))?,
        None => Decimal::ZERO,
    };
    let change = percentage_change(statistics.total_amount, previous_total)?;
    let breakdown = category_breakdown(&current, categories, None)?;
    let trend = daily_trend(&current, categories)?;

    let mut insights = Vec::new();
    if !change.is_zero() {
        let up = change > Decimal::ZERO;
        insights.push(Insight::new(
            if up { "Spending Increased" } else { "Spending Decreased" },
            format!(
                "Your spending {} by {:.1}% compared to last {}",
                if up { "increased" } else { "decreased" },
                change.abs(),
                period
            ),
            if up { "trending-up" } else { "trending-down" },
            if up { "#FF6B6B" } else { "#4ECDC4" },
        ));
    }
    if let Some(first) = breakdown.first() {
        insights.push(Insight::new(
            "Top Category",
            format!(
                "{} is your highest spending category at {}%",
                first.name, first.percentage
            ),
            &first.icon,
            &first.color,
        ));
    }
    if let Some(second) = breakdown.get(1) {
        insights.push(Insight::new(
            "Savings Opportunity",
            format!(
                "Consider reducing {} expenses ({}% of total)",
                second.name, second.percentage
            ),
            "piggy-bank",
            "#45B7D1",
        ));
    }

    Ok(TrendReport {
        period,
        statistics,
        category_breakdown: breakdown,
        previous_period: PreviousPeriod {
            total_amount: previous_total.round_dp(2),
            percentage_change: change,
        },
        trend,
        insights,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participant {
    pub user_id: i64,
    pub name: String,
    pub spent: Decimal,
    /// Share of the board total, two decimals.
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settlement {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardBreakdown {
    pub total_budget: Decimal,
    pub total_expenses: Decimal,
    pub per_person: Decimal,
    pub participants: Vec<Participant>,
    pub settlements: Vec<Settlement>,
}

/// Splits a board's spending between its members and works out who owes
/// whom so that everyone ends at an equal share.
pub fn board_breakdown(
    total_budget: Decimal,
    expenses: &[Expense],
    members: &[(i64, String)],
) -> Result<BoardBreakdown> {
    let total = total_expenses(expenses)?;
    let mut spent: HashMap<i64, Decimal> = HashMap::new();
    for e in expenses {
        let s = spent.entry(e.created_by).or_insert(Decimal::ZERO);
        *s = checked_sum([*s, e.amount])?;
    }
    let participants: Vec<Participant> = members
        .iter()
        .map(|(id, name)| {
            let s = spent.get(id).copied().unwrap_or(Decimal::ZERO);
            let pct = if total > Decimal::ZERO {
                (s / total * Decimal::ONE_HUNDRED).round_dp(2)
            } else {
                Decimal::ZERO
            };
            Participant {
                user_id: *id,
                name: name.clone(),
                spent: s,
                percentage: pct,
            }
        })
        .collect();
    let per_person = if participants.is_empty() {
        Decimal::ZERO
    } else {
        total / Decimal::from(participants.len())
    };
    let settlements = settle_up(&participants, per_person);
    Ok(BoardBreakdown {
        total_budget,
        total_expenses: total,
        per_person: per_person.round_dp(2),
        participants,
        settlements,
    })
}

/// Greedy pairing: each debtor pays creditors in member order until square.
pub fn settle_up(participants: &[Participant], fair_share: Decimal) -> Vec<Settlement> {
    let mut creditors: Vec<(String, Decimal)> = Vec::new();
    let mut debtors: Vec<(String, Decimal)> = Vec::new();
    for p in participants {
        let diff = p.spent - fair_share;
        if diff > Decimal::ZERO {
            creditors.push((p.name.clone(), diff));
        } else if diff < Decimal::ZERO {
            debtors.push((p.name.clone(), -diff));
        }
    }

    let mut out = Vec::new();
    for (debtor, mut owed) in debtors {
        for (creditor, due) in creditors.iter_mut() {
            if owed.is_zero() {
                break;
            }
            if due.is_zero() {
                continue;
            }
            let pay = owed.min(*due);
            out.push(Settlement {
                from: debtor.clone(),
                to: creditor.clone(),
                amount: pay.round_dp(2),
            });
            owed -= pay;
            *due -= pay;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn expense(id: i64, amount: i64, category_id: Option<i64>, date: DateTime<Utc>) -> Expense {
        Expense {
            id,
            board_id: 1,
            category_id,
            amount: Decimal::from(amount),
            description: format!("e{}", id),
            date,
            payment_method: None,
            created_by: 1,
            created_at: date,
        }
    }

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            user_id: 1,
            name: name.to_string(),
            description: None,
            icon: "tag".into(),
            color: "#000000".into(),
            created_at: at(2025, 1, 1),
        }
    }

    fn cats() -> HashMap<i64, Category> {
        [(1, category(1, "Food")), (2, category(2, "Transport"))]
            .into_iter()
            .collect()
    }

    #[test]
    fn board_with_exact_budget() {
        let now = at(2025, 6, 1);
        let xs = vec![
            expense(1, 300, Some(1), now),
            expense(2, 250, Some(1), now),
            expense(3, 450, Some(2), now),
        ];
        let s = summarize_board(Decimal::from(1000), &xs).unwrap();
        assert_eq!(s.total_expenses, Decimal::from(1000));
        assert_eq!(s.remaining_budget, Decimal::ZERO);
        assert_eq!(s.status, BudgetStatus::OnTrack);

        let b = category_breakdown(&xs, &cats(), None).unwrap();
        let got: Vec<_> = b.iter().map(|c| (c.name.as_str(), c.amount, c.percentage)).collect();
        assert_eq!(
            got,
            vec![("Food", Decimal::from(550), 55), ("Transport", Decimal::from(450), 45)]
        );
    }

    #[test]
    fn empty_board_keeps_full_budget() {
        let s = summarize_board(Decimal::from(500), &[]).unwrap();
        assert_eq!(s.total_expenses, Decimal::ZERO);
        assert_eq!(s.remaining_budget, Decimal::from(500));
        assert!(category_breakdown(&[], &cats(), None).unwrap().is_empty());
    }

    #[test]
    fn over_budget_is_a_status_not_an_error() {
        let s = summarize_board(Decimal::from(100), &[expense(1, 150, None, at(2025, 1, 2))]).unwrap();
        assert_eq!(s.remaining_budget, Decimal::from(-50));
        assert_eq!(s.status, BudgetStatus::OverBudget);
        assert_eq!(s.status.to_string(), "over budget");
    }

    #[test]
    fn bad_amounts_and_budgets_are_rejected() {
        let mut bad = expense(1, 10, None, at(2025, 1, 2));
        bad.amount = Decimal::ZERO;
        assert!(matches!(total_expenses(&[bad]), Err(TrackerError::Validation(_))));
        assert!(matches!(
            summarize_board(Decimal::from(-1), &[]),
            Err(TrackerError::Validation(_))
        ));
    }

    #[test]
    fn overflowing_totals_are_an_error() {
        let near_max = Decimal::MAX - Decimal::ONE;
        assert_eq!(
            checked_sum([near_max, near_max]),
            Err(TrackerError::Validation("total overflows".into()))
        );
        assert_eq!(checked_sum([Decimal::ONE, Decimal::from(2)]).unwrap(), Decimal::from(3));

        // rows written before the amount cap existed
        let now = at(2025, 6, 1);
        let mut a = expense(1, 1, Some(1), now);
        a.amount = near_max;
        let b = a.clone();
        assert!(matches!(total_expenses(&[a.clone(), b.clone()]), Err(TrackerError::Validation(_))));
        assert!(matches!(
            summarize_board(Decimal::from(10), &[a.clone(), b.clone()]),
            Err(TrackerError::Validation(_))
        ));
        assert!(matches!(
            board_breakdown(Decimal::from(10), &[a, b], &[(1, "Ana".into())]),
            Err(TrackerError::Validation(_))
        ));
    }

    #[test]
    fn missing_and_dangling_categories_share_one_group() {
        let now = at(2025, 6, 1);
        let xs = vec![
            expense(1, 40, None, now),
            expense(2, 60, Some(99), now),
            expense(3, 100, Some(1), now),
        ];
        let b = category_breakdown(&xs, &cats(), None).unwrap();
        assert_eq!(b.len(), 2);
        let unc = b.iter().find(|c| c.category_id.is_none()).unwrap();
        assert_eq!(unc.name, "Uncategorized");
        assert_eq!(unc.amount, Decimal::from(100));
        assert_eq!(unc.count, 2);
        let sum: Decimal = b.iter().map(|c| c.amount).sum();
        assert_eq!(sum, total_expenses(&xs).unwrap());
    }

    #[test]
    fn percentages_stay_near_one_hundred() {
        let now = at(2025, 6, 1);
        let xs = vec![
            expense(1, 1, Some(1), now),
            expense(2, 1, Some(2), now),
            expense(3, 1, None, now),
        ];
        let b = category_breakdown(&xs, &cats(), None).unwrap();
        let sum: u32 = b.iter().map(|c| c.percentage).sum();
        assert!(sum.abs_diff(100) <= b.len() as u32);
    }

    #[test]
    fn top_n_truncates_after_sorting() {
        let now = at(2025, 6, 1);
        let xs = vec![expense(1, 5, Some(1), now), expense(2, 9, Some(2), now)];
        let b = category_breakdown(&xs, &cats(), Some(1)).unwrap();
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].name, "Transport");
    }

    #[test]
    fn cutoff_is_inclusive() {
        let now = at(2025, 6, 15);
        let cutoff = Period::Week.cutoff(now);
        let xs = vec![
            expense(1, 10, None, cutoff),
            expense(2, 10, None, cutoff - Duration::seconds(1)),
        ];
        let kept = filter_period(&xs, Period::Week, now);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 1);
    }

    #[test]
    fn month_and_year_are_fixed_day_counts() {
        let now = at(2025, 3, 31);
        assert_eq!(Period::Month.cutoff(now), now - Duration::days(30));
        assert_eq!(Period::Year.cutoff(now), now - Duration::days(365));
        assert_eq!(Period::All.cutoff(now).timestamp(), 0);
        assert!(Period::All.previous_window(now).is_none());
        assert!("fortnight".parse::<Period>().is_err());
    }

    #[test]
    fn change_against_previous_window() {
        assert_eq!(
            percentage_change(Decimal::from(150), Decimal::from(100)).unwrap(),
            Decimal::new(500, 1)
        );
        assert_eq!(
            percentage_change(Decimal::from(150), Decimal::ZERO).unwrap(),
            Decimal::ZERO
        );
        assert!(matches!(
            percentage_change(Decimal::from(1_000_000_000_000i64), Decimal::new(1, 20)),
            Err(TrackerError::Validation(_))
        ));

        let now = at(2025, 6, 15);
        let xs = vec![
            expense(1, 150, Some(1), now - Duration::days(1)),
            expense(2, 100, Some(1), now - Duration::days(10)),
        ];
        let r = trend_report(&xs, &cats(), Period::Week, now).unwrap();
        assert_eq!(r.statistics.total_amount, Decimal::from(150));
        assert_eq!(r.previous_period.total_amount, Decimal::from(100));
        assert_eq!(r.previous_period.percentage_change, Decimal::new(500, 1));
        assert_eq!(r.insights[0].title, "Spending Increased");
    }

    #[test]
    fn daily_trend_groups_by_calendar_day() {
        let d1 = Utc.with_ymd_and_hms(2025, 6, 1, 0, 30, 0).unwrap();
        let d1_late = Utc.with_ymd_and_hms(2025, 6, 1, 23, 59, 0).unwrap();
        let d2 = Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap();
        let xs = vec![
            expense(1, 10, Some(1), d2),
            expense(2, 20, Some(1), d1),
            expense(3, 5, Some(2), d1_late),
        ];
        let t = daily_trend(&xs, &cats()).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t[0].day, d1.date_naive());
        assert_eq!((t[0].amount, t[0].count), (Decimal::from(25), 2));
        assert_eq!(t[0].categories.len(), 2);
        assert_eq!(t[1].amount, Decimal::from(10));
    }

    #[test]
    fn stats_cover_min_max_average() {
        let now = at(2025, 6, 15);
        let xs = vec![
            expense(1, 10, None, now - Duration::days(1)),
            expense(2, 30, None, now - Duration::days(2)),
            expense(3, 500, None, now - Duration::days(40)),
        ];
        let current = filter_period(&xs, Period::Week, now);
        let s = period_stats(&current, Period::Week, now).unwrap();
        assert_eq!(s.total_count, 2);
        assert_eq!(s.highest_amount, Decimal::from(30));
        assert_eq!(s.lowest_amount, Decimal::from(10));
        assert_eq!(s.average_amount, Decimal::from(20));
        assert_eq!(s.days_in_period, 7);
        assert_eq!(s.average_per_day, Decimal::new(571, 2));
    }

    #[test]
    fn aggregation_is_repeatable() {
        let now = at(2025, 6, 15);
        let xs = vec![
            expense(1, 12, Some(2), now),
            expense(2, 12, Some(1), now),
            expense(3, 7, None, now - Duration::days(3)),
        ];
        let a = analytics_summary(&xs, &cats(), Period::Month, now, "USD").unwrap();
        let b = analytics_summary(&xs, &cats(), Period::Month, now, "USD").unwrap();
        assert_eq!(a, b);
        // Equal amounts fall back to name order.
        assert_eq!(a.top_categories[0].name, "Food");
    }

    #[test]
    fn settle_up_evens_out_spending() {
        let now = at(2025, 6, 15);
        let mut a = expense(1, 90, None, now);
        a.created_by = 1;
        let mut b = expense(2, 30, None, now);
        b.created_by = 2;
        let members = vec![(1, "Ana".to_string()), (2, "Ben".to_string()), (3, "Cy".to_string())];
        let r = board_breakdown(Decimal::from(200), &[a, b], &members).unwrap();
        assert_eq!(r.per_person, Decimal::from(40));
        assert_eq!(
            r.settlements,
            vec![
                Settlement { from: "Ben".into(), to: "Ana".into(), amount: Decimal::from(10) },
                Settlement { from: "Cy".into(), to: "Ana".into(), amount: Decimal::from(40) },
            ]
        );
        assert_eq!(r.participants[0].percentage, Decimal::new(7500, 2));
    }
}
