use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::member_score::MemberScore;

/// Orderings a ranked view can be built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Part2Diff,
    Part1,
    Part2,
    LocalScore,
    GlobalScore,
    Name,
    WeightedTime,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::Part2Diff,
        SortKey::Part1,
        SortKey::Part2,
        SortKey::LocalScore,
        SortKey::GlobalScore,
        SortKey::Name,
        SortKey::WeightedTime,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Part2Diff => "part2diff",
            SortKey::Part1 => "part1",
            SortKey::Part2 => "part2",
            SortKey::LocalScore => "olscore",
            SortKey::GlobalScore => "ogscore",
            SortKey::Name => "name",
            SortKey::WeightedTime => "wtime",
        }
    }

    /// Unknown names fall back to the default ordering.
    pub fn parse_or_default(name: &str) -> SortKey {
        name.parse().unwrap_or_default()
    }

    pub fn compare(self, a: &MemberScore, b: &MemberScore) -> Ordering {
        match self {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::Part1 => a.part1.cmp(&b.part1),
            // part2 == 0 means not completed and goes last
            SortKey::Part2 => (a.part2 == 0)
                .cmp(&(b.part2 == 0))
                .then(a.part2.cmp(&b.part2)),
            SortKey::LocalScore => b.local_score.cmp(&a.local_score),
            SortKey::GlobalScore => b
                .global_score
                .cmp(&a.global_score)
                .then(b.local_score.cmp(&a.local_score)),
            SortKey::Part2Diff => {
                let (da, db) = (a.part2_diff(), b.part2_diff());
                b.count
                    .cmp(&a.count)
                    .then((da == -1).cmp(&(db == -1)))
                    .then_with(|| {
                        if da == db {
                            a.part1.cmp(&b.part1)
                        } else {
                            da.cmp(&db)
                        }
                    })
            }
            // unfinished records have no weighted time and go last
            SortKey::WeightedTime => (a.part2 == 0)
                .cmp(&(b.part2 == 0))
                .then(a.w_time.cmp(&b.w_time)),
        }
    }

    /// Stable sort; ties keep their previous relative order.
    pub fn sort(self, scores: &mut [MemberScore]) {
        scores.sort_by(|a, b| self.compare(a, b));
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("unknown ordering '{}'", s))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clones and ranks a set of scores.
pub fn ranked<'a, I>(scores: I, key: SortKey) -> Vec<MemberScore>
where
    I: IntoIterator<Item = &'a MemberScore>,
{
    let mut out: Vec<MemberScore> = scores.into_iter().cloned().collect();
    key.sort(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(id: i64, name: &str, part1: i64, part2: i64, count: i64) -> MemberScore {
        MemberScore {
            id,
            name: name.to_string(),
            part1,
            part2,
            count,
            ..Default::default()
        }
    }

    fn ids(scores: &[MemberScore]) -> Vec<i64> {
        scores.iter().map(|s| s.id).collect()
    }

    #[test]
    fn parse_names_and_fallback() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
        assert_eq!(SortKey::parse_or_default("OGSCORE"), SortKey::GlobalScore);
        assert_eq!(SortKey::parse_or_default("bogus"), SortKey::Part2Diff);
    }

    #[test]
    fn name_is_case_insensitive() {
        let mut scores = vec![ms(1, "bob", 0, 0, 1), ms(2, "Alice", 0, 0, 1), ms(3, "carol", 0, 0, 1)];
        SortKey::Name.sort(&mut scores);
        assert_eq!(ids(&scores), vec![2, 1, 3]);
    }

    #[test]
    fn part2_puts_incomplete_last() {
        let mut scores = vec![
            ms(1, "a", 10, 0, 1),
            ms(2, "b", 10, 500, 1),
            ms(3, "c", 10, 0, 1),
            ms(4, "d", 10, 20, 1),
            ms(5, "e", 10, 9_000, 1),
        ];
        SortKey::Part2.sort(&mut scores);
        assert_eq!(ids(&scores), vec![4, 2, 5, 1, 3]);
    }

    #[test]
    fn part1_ascending_without_special_cases() {
        let mut scores = vec![ms(1, "a", 50, 0, 1), ms(2, "b", 0, 0, 1), ms(3, "c", 20, 0, 1)];
        SortKey::Part1.sort(&mut scores);
        assert_eq!(ids(&scores), vec![2, 3, 1]);
    }

    #[test]
    fn scores_descending_with_global_tiebreak() {
        let mut a = ms(1, "a", 0, 0, 1);
        a.global_score = 10;
        a.local_score = 100;
        let mut b = ms(2, "b", 0, 0, 1);
        b.global_score = 10;
        b.local_score = 300;
        let mut c = ms(3, "c", 0, 0, 1);
        c.global_score = 0;
        c.local_score = 900;

        let mut scores = vec![a.clone(), b.clone(), c.clone()];
        SortKey::GlobalScore.sort(&mut scores);
        assert_eq!(ids(&scores), vec![2, 1, 3]);

        let mut scores = vec![a, b, c];
        SortKey::LocalScore.sort(&mut scores);
        assert_eq!(ids(&scores), vec![3, 2, 1]);
    }

    #[test]
    fn part2_diff_prefers_more_completed_days() {
        // slow but more days beats fast with fewer days
        let mut scores = vec![
            ms(1, "fast", 10, 20, 2),
            ms(2, "slow", 5_000, 90_000, 3),
            ms(3, "incomplete", 10, 0, 3),
        ];
        SortKey::Part2Diff.sort(&mut scores);
        assert_eq!(ids(&scores), vec![2, 3, 1]);
    }

    #[test]
    fn part2_diff_ties_fall_through_to_part1() {
        let mut scores = vec![
            ms(1, "a", 300, 500, 2),
            ms(2, "b", 100, 300, 2),
            ms(3, "c", 50, 400, 2),
        ];
        SortKey::Part2Diff.sort(&mut scores);
        assert_eq!(ids(&scores), vec![2, 1, 3]);
    }

    #[test]
    fn part2_diff_incomplete_sorts_after_complete() {
        let mut scores = vec![
            ms(1, "a", 30, 0, 1),
            ms(2, "b", 100, 90_000, 1),
            ms(3, "c", 10, 0, 1),
        ];
        SortKey::Part2Diff.sort(&mut scores);
        assert_eq!(ids(&scores), vec![2, 3, 1]);
    }

    #[test]
    fn weighted_time_sort_is_stable() {
        let mut scores = vec![ms(1, "a", 5, 60, 1), ms(2, "b", 5, 60, 1), ms(3, "c", 5, 60, 1)];
        scores[0].w_time = 50;
        scores[1].w_time = 10;
        scores[2].w_time = 50;
        SortKey::WeightedTime.sort(&mut scores);
        assert_eq!(ids(&scores), vec![2, 1, 3]);
    }

    #[test]
    fn weighted_time_puts_unfinished_last() {
        let mut scores = vec![
            ms(1, "started", 40, 0, 1),
            ms(2, "slow", 10, 900, 1),
            ms(3, "quick", 10, 70, 1),
            ms(4, "idle", 0, 0, 1),
        ];
        scores[1].w_time = 890;
        scores[2].w_time = 60;
        SortKey::WeightedTime.sort(&mut scores);
        assert_eq!(ids(&scores), vec![3, 2, 1, 4]);
    }

    #[test]
    fn ranked_leaves_input_untouched() {
        let scores = vec![ms(1, "b", 0, 0, 1), ms(2, "a", 0, 0, 1)];
        let out = ranked(&scores, SortKey::Name);
        assert_eq!(ids(&out), vec![2, 1]);
        assert_eq!(ids(&scores), vec![1, 2]);
    }
}
