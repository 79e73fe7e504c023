use serde::Serialize;

/// Day number used for the aggregate record of a member.
pub const TOTALS_DAY: u32 = 0;

/// One member's result for a single day, or their aggregate over all days
/// when `day == TOTALS_DAY`. Part times are seconds since the day opened;
/// `0` means the part is not completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemberScore {
    pub id: i64,
    pub day: u32,
    pub name: String,
    pub part1: i64,
    pub part2: i64,
    pub local_score: i64,
    pub global_score: i64,
    pub count: i64,
    pub w_time: i64,
}

impl MemberScore {
    /// Seconds between the two stars, or `-1` when part 2 is missing.
    pub fn part2_diff(&self) -> i64 {
        if self.part2 == 0 {
            return -1;
        }
        self.part2 - self.part1
    }

    pub fn is_complete(&self) -> bool {
        self.part2 != 0
    }

    pub fn part1_avg(&self) -> i64 {
        if self.count == 0 {
            return 0;
        }
        self.part1 / self.count
    }

    pub fn part2_avg(&self) -> i64 {
        if self.part2 == 0 || self.count == 0 {
            return 0;
        }
        self.part2 / self.count
    }

    pub fn part2_diff_avg(&self) -> i64 {
        let diff = self.part2_diff();
        if diff < 1 || self.count == 0 {
            return 0;
        }
        diff / self.count
    }
}

/// Formats seconds as `HH:MM:SS`. Hours appear from one full hour on and
/// minutes from one full minute on; once hours are shown, minutes always are.
pub fn readable_time(seconds: i64) -> String {
    let mut remaining = seconds;
    let mut out = String::new();

    if remaining >= 60 * 60 {
        let hours = remaining / (60 * 60);
        out.push_str(&format!("{:02}:", hours));
        remaining -= hours * 60 * 60;
        out.push_str(&format!("{:02}:", remaining / 60));
        remaining %= 60;
    } else if remaining >= 60 {
        out.push_str(&format!("{:02}:", remaining / 60));
        remaining %= 60;
    }

    out.push_str(&format!("{:02}", remaining));
    out
}
