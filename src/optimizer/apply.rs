use thiserror::Error;

use crate::optimizer::{ChangeType, TripChange};
use crate::trip::{Itinerary, TripData};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangeError {
    #[error("change targets day {day} but the trip has {days} day(s)")]
    DayOutOfRange { day: usize, days: usize },
    #[error("day {day} holds {available} activities; cannot take {requested}")]
    NotEnoughActivities {
        day: usize,
        available: u32,
        requested: u32,
    },
    #[error("day {day} needs at least two activities to merge")]
    NothingToMerge { day: usize },
    #[error("day {day} still has {activities} activities and cannot become a rest day")]
    DayNotEmpty { day: usize, activities: u32 },
    #[error("cannot move activities onto rest day {day}")]
    RestDayTarget { day: usize },
    #[error("move on day {day} has no target day")]
    MissingTarget { day: usize },
    #[error("moving activities onto day {day} overflows its load")]
    LoadOverflow { day: usize },
}

/// Replays `changes` on a copy of `trip`.
///
/// The returned trip carries an explicit `daily_loads`/`rest_days` itinerary
/// and a `planned_activities` equal to its sum; `trip` is left untouched.
pub fn apply_changes(trip: &TripData, changes: &[TripChange]) -> Result<TripData, ChangeError> {
    let mut itinerary = trip.itinerary();
    for change in changes {
        apply_change(&mut itinerary, change)?;
    }
    Ok(itinerary.into_trip(trip))
}

pub fn apply_change(itinerary: &mut Itinerary, change: &TripChange) -> Result<(), ChangeError> {
    let days = itinerary.len();
    let day = change.day;
    let available = itinerary
        .load(day)
        .ok_or(ChangeError::DayOutOfRange { day, days })?;

    match change.change_type {
        ChangeType::RemoveActivity => {
            take(itinerary, day, available, change.count)?;
        }
        ChangeType::MergeActivities => {
            if available < 2 {
                return Err(ChangeError::NothingToMerge { day });
            }
            // each merge folds two activities into one
            if change.count > available - 1 {
                return Err(ChangeError::NotEnoughActivities {
                    day,
                    available: available - 1,
                    requested: change.count,
                });
            }
            take(itinerary, day, available, change.count)?;
        }
        ChangeType::MoveActivity => {
            let to = change.to_day.ok_or(ChangeError::MissingTarget { day })?;
            let target = itinerary
                .days()
                .get(to)
                .copied()
                .ok_or(ChangeError::DayOutOfRange { day: to, days })?;
            if target.rest {
                return Err(ChangeError::RestDayTarget { day: to });
            }
            if to != day && target.activities.checked_add(change.count).is_none() {
                return Err(ChangeError::LoadOverflow { day: to });
            }
            take(itinerary, day, available, change.count)?;
            if let Some(slot) = itinerary.slot_mut(to) {
                slot.activities += change.count;
            }
        }
        ChangeType::AddRest => {
            if available > 0 {
                return Err(ChangeError::DayNotEmpty {
                    day,
                    activities: available,
                });
            }
            if let Some(slot) = itinerary.slot_mut(day) {
                slot.rest = true;
            }
        }
    }
    Ok(())
}

fn take(itinerary: &mut Itinerary, day: usize, available: u32, count: u32) -> Result<(), ChangeError> {
    if count > available {
        return Err(ChangeError::NotEnoughActivities {
            day,
            available,
            requested: count,
        });
    }
    if let Some(slot) = itinerary.slot_mut(day) {
        slot.activities -= count;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::optimizer::apply::{apply_changes, ChangeError};
    use crate::optimizer::TripChange;
    use crate::trip::TripData;

    fn trip() -> TripData {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
        let end = NaiveDate::from_ymd_opt(2025, 6, 4).expect("valid date");
        TripData::new("Paris")
            .with_dates(start, end)
            .with_activities(10)
    }

    #[test]
    fn replays_changes_on_a_copy() {
        let original = trip();
        let changes = vec![
            TripChange::move_activity(0, 3, 1),
            TripChange::merge_activities(1, 1),
            TripChange::move_activity(2, 3, 1),
            TripChange::remove_activity(2, 1),
            TripChange::add_rest(2),
        ];
        let mutated = apply_changes(&original, &changes).expect("changes should apply");

        assert_eq!(mutated.daily_loads, vec![2, 2, 0, 4]);
        assert_eq!(mutated.rest_days, vec![2]);
        assert_eq!(mutated.planned_activities, 8);
        assert!(original.daily_loads.is_empty());
        assert_eq!(original.planned_activities, 10);
    }

    #[test]
    fn replay_is_deterministic() {
        let changes = vec![TripChange::remove_activity(0, 1)];
        let a = apply_changes(&trip(), &changes).expect("apply");
        let b = apply_changes(&trip(), &changes).expect("apply");
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn rejects_invalid_changes() {
        let t = trip();
        assert_eq!(
            apply_changes(&t, &[TripChange::remove_activity(9, 1)]),
            Err(ChangeError::DayOutOfRange { day: 9, days: 4 })
        );
        assert_eq!(
            apply_changes(&t, &[TripChange::remove_activity(0, 5)]),
            Err(ChangeError::NotEnoughActivities {
                day: 0,
                available: 3,
                requested: 5
            })
        );
        assert_eq!(
            apply_changes(&t, &[TripChange::add_rest(0)]),
            Err(ChangeError::DayNotEmpty {
                day: 0,
                activities: 3
            })
        );
        assert_eq!(
            apply_changes(&t, &[TripChange::merge_activities(0, 3)]),
            Err(ChangeError::NotEnoughActivities {
                day: 0,
                available: 2,
                requested: 3
            })
        );
    }

    #[test]
    fn rejects_moves_onto_rest_days() {
        let t = trip().with_daily_loads(vec![4, 3, 3, 0]).with_rest_days(vec![3]);
        assert_eq!(
            apply_changes(&t, &[TripChange::move_activity(0, 3, 1)]),
            Err(ChangeError::RestDayTarget { day: 3 })
        );
    }

    #[test]
    fn rejects_moves_that_overflow_the_target_day() {
        let t = trip().with_daily_loads(vec![u32::MAX - 1, 3, 0, 0]);
        assert_eq!(
            apply_changes(&t, &[TripChange::move_activity(1, 0, 2)]),
            Err(ChangeError::LoadOverflow { day: 0 })
        );
    }

    #[test]
    fn merge_needs_two_activities() {
        let t = trip().with_daily_loads(vec![1, 3, 3, 3]);
        assert_eq!(
            apply_changes(&t, &[TripChange::merge_activities(0, 1)]),
            Err(ChangeError::NothingToMerge { day: 0 })
        );
    }
}
