use std::collections::BTreeMap;

use crate::member_score::MemberScore;
use crate::models::{Event, LooseInt, Member, StarCompletion};
use crate::ranking::{ranked, SortKey};
use crate::scoring::{compute_standings, day_starts_at};
use crate::source::SAMPLE_EVENT;

const YEAR: i32 = 2018;

fn member(id: i64, name: &str, stars: &[(u32, Option<i64>, Option<i64>)]) -> Member {
    let mut completion_day_levels = BTreeMap::new();
    for &(day, part1, part2) in stars {
        let starts_at = day_starts_at(YEAR, day).unwrap();
        let mut parts = BTreeMap::new();
        if let Some(offset) = part1 {
            parts.insert(1, StarCompletion { get_star_ts: LooseInt(starts_at + offset) });
        }
        if let Some(offset) = part2 {
            parts.insert(2, StarCompletion { get_star_ts: LooseInt(starts_at + offset) });
        }
        completion_day_levels.insert(day, parts);
    }

    Member {
        id: Some(LooseInt(id)),
        name: name.to_string(),
        global_score: 0,
        local_score: 0,
        stars: 0,
        last_star_ts: LooseInt(0),
        completion_day_levels,
    }
}

fn event(members: Vec<Member>) -> Event {
    Event {
        year: YEAR.to_string(),
        owner_id: None,
        members: members
            .into_iter()
            .map(|m| (m.id.unwrap().value().to_string(), m))
            .collect(),
    }
}

#[test]
fn single_member_single_day() {
    let standings = compute_standings(
        &event(vec![member(1, "solo", &[(1, Some(100), Some(300))])]),
        YEAR,
    );

    let ms = &standings.days[&1].member_scores[&1];
    assert_eq!(ms.part1, 100);
    assert_eq!(ms.part2, 300);
    assert_eq!(ms.part2_diff(), 200);
    assert_eq!(ms.w_time, 200);

    assert_eq!(standings.max_day, 1);
    let total = &standings.totals[&1];
    assert_eq!(total.count, 1);
    assert_eq!(total.w_time, 200);
    assert_eq!(standings.top_scores.len(), 1);
}

#[test]
fn totals_require_every_day() {
    let standings = compute_standings(
        &event(vec![
            member(1, "solo", &[(1, Some(100), Some(300))]),
            member(2, "two days", &[(1, Some(50), Some(80)), (2, Some(10), Some(40))]),
        ]),
        YEAR,
    );

    assert_eq!(standings.max_day, 2);
    assert!(!standings.totals.contains_key(&1));
    let total = &standings.totals[&2];
    assert_eq!(total.part1, 60);
    assert_eq!(total.part2, 120);
    assert_eq!(total.count, 2);
}

#[test]
fn part1_only_member_never_reaches_totals_or_top_scores() {
    let standings = compute_standings(
        &event(vec![
            member(1, "finisher", &[(1, Some(100), Some(300))]),
            member(2, "starter", &[(1, Some(50), None)]),
        ]),
        YEAR,
    );

    assert!(!standings.totals.contains_key(&2));
    assert!(standings.top_scores.iter().all(|ms| ms.id != 2));
    let ms = &standings.days[&1].member_scores[&2];
    assert_eq!(ms.part1, 50);
    assert_eq!(ms.part2_diff(), -1);
    assert_eq!(ms.w_time, 0);
}

#[test]
fn days_without_completions_are_absent() {
    let standings = compute_standings(
        &event(vec![
            member(1, "a", &[(1, Some(100), Some(300)), (2, Some(20), Some(30))]),
            member(2, "b", &[(2, Some(20), None)]),
        ]),
        YEAR,
    );

    assert!(!standings.days[&1].member_scores.contains_key(&2));
    assert!(standings.days[&2].member_scores.contains_key(&2));
}

#[test]
fn empty_name_falls_back_to_id() {
    let standings =
        compute_standings(&event(vec![member(77, "", &[(1, Some(5), Some(9))])]), YEAR);
    assert_eq!(standings.days[&1].member_scores[&77].name, "77");
    assert_eq!(standings.totals[&77].name, "77");
}

#[test]
fn equal_members_fall_through_to_part1() {
    let standings = compute_standings(
        &event(vec![
            member(1, "late", &[(1, Some(400), Some(600)), (2, Some(100), Some(200))]),
            member(2, "early", &[(1, Some(100), Some(300)), (2, Some(100), Some(200))]),
        ]),
        YEAR,
    );

    let totals = ranked(standings.totals.values(), SortKey::Part2Diff);
    assert_eq!(totals[0].part2_diff(), totals[1].part2_diff());
    assert_eq!(totals.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 1]);
}

#[test]
fn recomputing_does_not_double_weighted_totals() {
    let event: Event = Event::from_json(SAMPLE_EVENT).unwrap();
    let first = compute_standings(&event, YEAR);
    let second = compute_standings(&event, YEAR);

    assert_eq!(first, second);
    assert_eq!(first.totals[&201045].w_time, second.totals[&201045].w_time);
}

#[test]
fn sample_payload_standings() {
    let event = Event::from_json(SAMPLE_EVENT).unwrap();
    let standings = compute_standings(&event, YEAR);

    assert_eq!(standings.max_day, 9);
    assert_eq!(standings.days.len(), 9);
    assert_eq!(standings.top_scores.len(), 173);

    let mut ids: Vec<i64> = standings.totals.keys().copied().collect();
    ids.sort();
    assert_eq!(
        ids,
        vec![116603, 145084, 200948, 201045, 202227, 202546, 245916, 392678]
    );
    assert_eq!(standings.totals[&201045].w_time, 5272);
    assert_eq!(standings.totals[&245916].w_time, 5328);

    let best = &standings.top_scores[0];
    assert_eq!((best.id, best.day, best.w_time), (245916, 3, 89));
    assert!(standings
        .top_scores
        .windows(2)
        .all(|w| w[0].w_time <= w[1].w_time));

    // null name in the payload
    assert_eq!(standings.days[&1].member_scores[&371746].name, "371746");

    let by_wtime = ranked(standings.totals.values(), SortKey::WeightedTime);
    assert_eq!(by_wtime[0].id, 201045);
}

#[test]
fn day_nine_penalties_from_sample() {
    let event = Event::from_json(SAMPLE_EVENT).unwrap();
    let standings = compute_standings(&event, YEAR);
    let day9 = &standings.days[&9].member_scores;

    let w = |id: i64| day9[&id].w_time;
    assert_eq!(w(201045), 181);
    assert_eq!(w(116603), 190);
    assert_eq!(w(202546), 1071);
    assert_eq!(w(13966), 0);

    let ranked_day: Vec<MemberScore> = ranked(day9.values(), SortKey::Part2);
    let first_incomplete = ranked_day
        .iter()
        .position(|ms| ms.part2 == 0)
        .unwrap();
    assert!(ranked_day[first_incomplete..].iter().all(|ms| ms.part2 == 0));
    assert!(ranked_day[..first_incomplete]
        .windows(2)
        .all(|w| w[0].part2 <= w[1].part2));
}
