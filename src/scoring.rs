use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::member_score::{MemberScore, TOTALS_DAY};
use crate::models::Event;
use crate::ranking::SortKey;

/// Puzzles unlock at 05:00 UTC on each day of December.
pub fn day_starts_at(year: i32, day: u32) -> Option<i64> {
    let date = NaiveDate::from_ymd_opt(year, 12, day)?;
    let start = date.and_time(NaiveTime::from_hms_opt(5, 0, 0)?);
    Some(start.and_utc().timestamp())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    pub day: u32,
    pub year: i32,
    pub member_scores: BTreeMap<i64, MemberScore>,
}

impl Day {
    pub fn new(year: i32, day: u32) -> Self {
        Self {
            day,
            year,
            member_scores: BTreeMap::new(),
        }
    }
}

/// Everything derived from one upstream payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Standings {
    pub max_day: u32,
    pub days: BTreeMap<u32, Day>,
    /// Only members who completed part 2 of every day up to `max_day`.
    pub totals: BTreeMap<i64, MemberScore>,
    /// Every completed member-day, best weighted time first.
    pub top_scores: Vec<MemberScore>,
}

pub fn compute_standings(event: &Event, year: i32) -> Standings {
    let mut days: BTreeMap<u32, Day> = BTreeMap::new();
    let mut totals: BTreeMap<i64, MemberScore> = BTreeMap::new();
    let mut max_day = 0;

    for (key, member) in &event.members {
        let Some(id) = member.resolve_id(key) else {
            warn!("Skipping member with unparseable id {:?}", key);
            continue;
        };
        let name = member.display_name(id);

        for &day_num in member.completion_day_levels.keys() {
            let Some(starts_at) = day_starts_at(year, day_num) else {
                warn!(day = day_num, member = id, "Skipping invalid day");
                continue;
            };

            let mut ms = MemberScore {
                id,
                day: day_num,
                name: name.clone(),
                local_score: member.local_score,
                global_score: member.global_score,
                count: 1,
                ..Default::default()
            };

            if let Some(part1_ts) = member.star_ts(day_num, 1) {
                ms.part1 = part1_ts - starts_at;

                if let Some(part2_ts) = member.star_ts(day_num, 2) {
                    ms.part2 = part2_ts - starts_at;

                    let total = totals.entry(id).or_insert_with(|| MemberScore {
                        id,
                        day: TOTALS_DAY,
                        name: name.clone(),
                        local_score: member.local_score,
                        global_score: member.global_score,
                        ..Default::default()
                    });
                    total.part1 += ms.part1;
                    total.part2 += ms.part2;
                    total.count += 1;
                }
            }

            days.entry(day_num)
                .or_insert_with(|| Day::new(year, day_num))
                .member_scores
                .insert(id, ms);

            max_day = max_day.max(day_num);
        }
    }

    totals.retain(|_, total| total.count == i64::from(max_day));

    for day in days.values_mut() {
        apply_penalties(day, &mut totals);
    }

    let mut top_scores: Vec<MemberScore> = days
        .values()
        .flat_map(|day| day.member_scores.values())
        .filter(|ms| ms.part2 != 0)
        .cloned()
        .collect();
    SortKey::WeightedTime.sort(&mut top_scores);

    debug!(
        max_day,
        days = days.len(),
        totals = totals.len(),
        top_scores = top_scores.len(),
        "Standings computed"
    );

    Standings {
        max_day,
        days,
        totals,
        top_scores,
    }
}

/// Sets the weighted time of every completed record of `day` and adds it to
/// the member's totals entry, if any. Must run once per computation since
/// totals accumulate.
pub fn apply_penalties(day: &mut Day, totals: &mut BTreeMap<i64, MemberScore>) {
    // first strict minimum in id order wins ties
    let fastest = day
        .member_scores
        .values()
        .filter(|ms| ms.part1 > 0 && ms.part2 > 0)
        .fold(None::<&MemberScore>, |best, ms| match best {
            Some(b) if b.part1 <= ms.part1 => Some(b),
            _ => Some(ms),
        })
        .map(|ms| (ms.id, ms.part1 * 2, ms.part2_diff() / 2));

    for ms in day.member_scores.values_mut() {
        if ms.part2 == 0 {
            continue;
        }

        ms.w_time = match fastest {
            Some((fastest_id, _, _)) if fastest_id == ms.id => ms.part2_diff(),
            Some((_, threshold, max_penalty)) => {
                let start_diff = ms.part1 - threshold;
                let penalty = if start_diff > 0 {
                    (start_diff / 20).min(max_penalty)
                } else {
                    0
                };
                ms.part2_diff() + penalty
            }
            None => ms.part2_diff(),
        };

        if let Some(total) = totals.get_mut(&ms.id) {
            total.w_time += ms.w_time;
        }
    }
}
