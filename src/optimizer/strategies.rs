//! The three plan strategies.
//!
//! Every strategy works on a private copy of the trip's itinerary and
//! records each edit as a [`TripChange`], applying it through the same
//! replay path callers use. The proposal's trip is therefore exactly what
//! replaying its change log on the original produces.

use tracing::debug;

use crate::config::ScoringConfig;
use crate::optimizer::apply::{apply_change, ChangeError};
use crate::optimizer::{StrategyId, TripChange};
use crate::profiles::DestinationProfile;
use crate::scoring::categories::{heavy_threshold, transit_hours};
use crate::scoring::{Category, TripPossibilityResult};
use crate::trip::{Itinerary, TripData};

pub struct StrategyContext<'a> {
    pub trip: &'a TripData,
    pub result: &'a TripPossibilityResult,
    pub profile: &'a DestinationProfile,
    pub settings: &'a ScoringConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub trip: TripData,
    pub changes: Vec<TripChange>,
    /// Category the strategy aimed at, when it aimed at one.
    pub focus: Option<Category>,
}

impl StrategyId {
    pub fn propose(self, ctx: &StrategyContext<'_>) -> Result<Proposal, ChangeError> {
        let proposal = match self {
            Self::Balanced => propose_balanced(ctx)?,
            Self::Relaxed => propose_relaxed(ctx)?,
            Self::Budget => propose_budget(ctx)?,
        };
        debug!(
            strategy = %self,
            changes = proposal.changes.len(),
            "strategy proposal ready"
        );
        Ok(proposal)
    }
}

struct ChangeLog<'a> {
    base: &'a TripData,
    itinerary: Itinerary,
    changes: Vec<TripChange>,
}

impl<'a> ChangeLog<'a> {
    fn new(base: &'a TripData) -> Self {
        Self {
            base,
            itinerary: base.itinerary(),
            changes: Vec::new(),
        }
    }

    fn record(&mut self, change: TripChange) -> Result<(), ChangeError> {
        if change.count == 0 {
            return Ok(());
        }
        apply_change(&mut self.itinerary, &change)?;
        if let Some(last) = self.changes.last_mut() {
            if last.same_target(&change) {
                last.absorb(change.count);
                return Ok(());
            }
        }
        self.changes.push(change);
        Ok(())
    }

    fn loads(&self) -> Vec<u32> {
        self.itinerary.days().iter().map(|d| d.activities).collect()
    }

    fn rest_flags(&self) -> Vec<bool> {
        self.itinerary.days().iter().map(|d| d.rest).collect()
    }

    fn finish(self, focus: Option<Category>) -> Proposal {
        let focus = if self.changes.is_empty() { None } else { focus };
        Proposal {
            trip: self.itinerary.into_trip(self.base),
            changes: self.changes,
            focus,
        }
    }
}

/// Smallest change aimed at the weakest adjustable category.
fn propose_balanced(ctx: &StrategyContext<'_>) -> Result<Proposal, ChangeError> {
    let mut candidates = vec![Category::Budget, Category::Activity, Category::Time];
    // stable: declaration order breaks ratio ties
    candidates.sort_by(|a, b| {
        let ra = ctx.result.breakdown.get(*a).ratio();
        let rb = ctx.result.breakdown.get(*b).ratio();
        ra.total_cmp(&rb)
    });

    for category in candidates {
        if ctx.result.breakdown.get(category).ratio() >= 1.0 {
            continue;
        }
        let mut log = ChangeLog::new(ctx.trip);
        let total = log.itinerary.total_activities();
        let active = log.itinerary.active_days() as f64;
        let high = ctx.profile.sweet_spot_max;

        match category {
            Category::Budget => {
                if let Some(affordable) = affordable_activities(ctx.trip, ctx.profile, &log.itinerary) {
                    let target = affordable.max((high * active).floor() as u32);
                    if target < total {
                        trim_to(&mut log, target, false)?;
                    }
                }
            }
            Category::Activity => {
                if total as f64 / active > high {
                    trim_to(&mut log, (high * active).floor() as u32, false)?;
                } else {
                    rebalance(&mut log, ctx.profile.max_daily_activities, false)?;
                }
            }
            Category::Time => {
                let capacity = time_capacity(ctx, log.itinerary.active_days());
                rebalance(&mut log, capacity.max(1), true)?;
            }
            Category::TravelFlow | Category::Duration => {}
        }

        if !log.changes.is_empty() {
            return Ok(log.finish(Some(category)));
        }
    }
    Ok(ChangeLog::new(ctx.trip).finish(None))
}

/// Caps every day at a comfortable load and breaks up long heavy streaks.
fn propose_relaxed(ctx: &StrategyContext<'_>) -> Result<Proposal, ChangeError> {
    let mut log = ChangeLog::new(ctx.trip);
    if log.itinerary.total_activities() == 0 {
        return Ok(log.finish(None));
    }

    let comfortable = ctx.profile.sweet_spot_max.floor() as u32;
    let capacity = time_capacity(ctx, log.itinerary.active_days());
    let cap = comfortable.min(capacity).max(1);
    rebalance(&mut log, cap, true)?;

    let heavy = heavy_threshold(ctx.profile);
    if let Some((start, len)) = log.itinerary.longest_heavy_streak(heavy) {
        if len > ctx.settings.fatigue_streak_days as usize {
            clear_for_rest(&mut log, start + len / 2, cap)?;
        }
    }
    Ok(log.finish(Some(Category::Time)))
}

/// Reduces paid activities until the budget covers the trip, merging
/// where a day still has company for the merged activity.
fn propose_budget(ctx: &StrategyContext<'_>) -> Result<Proposal, ChangeError> {
    let mut log = ChangeLog::new(ctx.trip);
    let Some(affordable) = affordable_activities(ctx.trip, ctx.profile, &log.itinerary) else {
        return Ok(log.finish(None));
    };
    let total = log.itinerary.total_activities();
    let active = log.itinerary.active_days() as f64;
    let floor = (ctx.profile.sweet_spot_min * active).ceil() as u32;
    let target = affordable.max(floor);
    if target < total {
        trim_to(&mut log, target, true)?;
    }
    Ok(log.finish(Some(Category::Budget)))
}

/// Activities the budget can pay for after daily base costs, or `None`
/// when no budget is known.
fn affordable_activities(
    trip: &TripData,
    profile: &DestinationProfile,
    itinerary: &Itinerary,
) -> Option<u32> {
    if !trip.budget.is_finite() || trip.budget <= 0.0 || itinerary.is_empty() {
        return None;
    }
    let spare = trip.budget - itinerary.len() as f64 * profile.daily_base_cost;
    if spare <= 0.0 || profile.activity_cost <= 0.0 {
        return Some(0);
    }
    Some((spare / profile.activity_cost).floor().min(f64::from(u32::MAX)) as u32)
}

/// Activities per day that fit in waking hours alongside transit.
fn time_capacity(ctx: &StrategyContext<'_>, active_days: usize) -> u32 {
    let waking = ctx.settings.waking_hours.max(1.0);
    let transit_per_day = transit_hours(ctx.trip, ctx.profile) / active_days.max(1) as f64;
    ((waking - transit_per_day) / ctx.profile.activity_hours)
        .floor()
        .max(0.0) as u32
}

/// Removes (or merges) activities heaviest-day-first until `target` remain.
fn trim_to(log: &mut ChangeLog<'_>, target: u32, merge_first: bool) -> Result<(), ChangeError> {
    let loads = log.loads();
    let total: u64 = loads.iter().map(|l| u64::from(*l)).sum();
    let excess = total.saturating_sub(u64::from(target));
    if excess == 0 {
        return Ok(());
    }
    let trimmed = trim_levels(&loads, excess);

    for (day, (before, after)) in loads.iter().zip(&trimmed).enumerate() {
        let cut = before - after;
        if cut == 0 {
            continue;
        }
        // the last activity on a cleared day has nothing to merge with
        let merges = if merge_first {
            before.saturating_sub((*after).max(1))
        } else {
            0
        };
        log.record(TripChange::merge_activities(day, merges))?;
        log.record(TripChange::remove_activity(day, cut - merges))?;
    }
    Ok(())
}

/// Moves load off days above `cap` onto the lightest days below it. Surplus
/// that fits nowhere is dropped when `drop_overflow` is set.
fn rebalance(log: &mut ChangeLog<'_>, cap: u32, drop_overflow: bool) -> Result<(), ChangeError> {
    let loads = log.loads();
    let rest = log.rest_flags();
    let donors: Vec<(usize, u32)> = loads
        .iter()
        .enumerate()
        .filter(|(day, load)| !rest[*day] && **load > cap)
        .map(|(day, load)| (day, load - cap))
        .collect();
    if donors.is_empty() {
        return Ok(());
    }

    let receivers = receivers_below(&loads, &rest, cap, None);
    let surplus: u64 = donors.iter().map(|(_, extra)| u64::from(*extra)).sum();
    let room: u64 = receivers.iter().map(|&r| u64::from(cap - loads[r])).sum();
    let received = water_fill(&loads, &receivers, cap, surplus.min(room));

    let mut inbound = receivers
        .iter()
        .map(|&r| (r, received[r]))
        .filter(|(_, count)| *count > 0);
    let mut current = inbound.next();
    let mut removals = Vec::new();
    for (donor, extra) in donors {
        let mut left = extra;
        while left > 0 {
            let Some((to, open)) = current else {
                break;
            };
            let count = left.min(open);
            log.record(TripChange::move_activity(donor, to, count))?;
            left -= count;
            current = if open == count {
                inbound.next()
            } else {
                Some((to, open - count))
            };
        }
        if drop_overflow && left > 0 {
            removals.push((donor, left));
        }
    }
    for (day, count) in removals {
        log.record(TripChange::remove_activity(day, count))?;
    }
    Ok(())
}

/// Empties `day` onto lighter days (dropping what does not fit) and marks
/// it as a rest day.
fn clear_for_rest(log: &mut ChangeLog<'_>, day: usize, cap: u32) -> Result<(), ChangeError> {
    let loads = log.loads();
    let rest = log.rest_flags();
    let Some(load) = loads.get(day).copied() else {
        return Ok(());
    };
    let receivers = receivers_below(&loads, &rest, cap, Some(day));
    let room: u64 = receivers.iter().map(|&r| u64::from(cap - loads[r])).sum();
    let received = water_fill(&loads, &receivers, cap, u64::from(load).min(room));

    let mut moved = 0u32;
    for &to in &receivers {
        if received[to] > 0 {
            log.record(TripChange::move_activity(day, to, received[to]))?;
            moved += received[to];
        }
    }
    log.record(TripChange::remove_activity(day, load - moved))?;
    log.record(TripChange::add_rest(day))
}

/// Loads left after taking `excess` activities one at a time from the
/// heaviest day, earliest day first on ties.
fn trim_levels(loads: &[u32], excess: u64) -> Vec<u32> {
    let cut = |level: u32| -> u64 {
        loads
            .iter()
            .map(|load| u64::from(load.saturating_sub(level)))
            .sum()
    };
    // lowest level whose cut still fits in `excess`
    let (mut lo, mut hi) = (0u32, loads.iter().copied().max().unwrap_or(0));
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if cut(mid) <= excess {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    let level = lo;
    let mut extra = excess - cut(level);
    loads
        .iter()
        .map(|&load| {
            if level > 0 && load >= level && extra > 0 {
                extra -= 1;
                level - 1
            } else {
                load.min(level)
            }
        })
        .collect()
}

/// Per-day additions when `units` activities go one at a time to the
/// lightest receiver, earliest day first on ties, never past `cap`.
fn water_fill(loads: &[u32], receivers: &[usize], cap: u32, units: u64) -> Vec<u32> {
    let mut added = vec![0u32; loads.len()];
    if units == 0 || receivers.is_empty() {
        return added;
    }
    let fill = |level: u32| -> u64 {
        receivers
            .iter()
            .map(|&r| u64::from(level.saturating_sub(loads[r])))
            .sum()
    };
    // highest level the units can lift every receiver to
    let (mut lo, mut hi) = (0u32, cap);
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if fill(mid) <= units {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    let level = lo;
    let mut extra = units - fill(level);
    for &r in receivers {
        let mut gain = level.saturating_sub(loads[r]);
        if extra > 0 && level < cap && loads[r] <= level {
            gain += 1;
            extra -= 1;
        }
        added[r] = gain;
    }
    added
}

/// Non-rest days below `cap`, in day order.
fn receivers_below(loads: &[u32], rest: &[bool], cap: u32, except: Option<usize>) -> Vec<usize> {
    loads
        .iter()
        .enumerate()
        .filter(|(day, load)| !rest[*day] && Some(*day) != except && **load < cap)
        .map(|(day, _)| day)
        .collect()
}
