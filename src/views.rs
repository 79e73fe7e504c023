use crate::board::Board;
use crate::member_score::{readable_time, MemberScore, TOTALS_DAY};
use crate::ranking::SortKey;

pub const DAY_TOP_SCORES: usize = 20;
pub const EMBED_LIMIT: usize = 10;

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn time_cell(seconds: i64, present: bool) -> String {
    if present {
        readable_time(seconds)
    } else {
        "-".to_string()
    }
}

fn page(title: &str, board: &Board, body: &str) -> String {
    let synced = board
        .last_synced_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n\
         <link rel=\"stylesheet\" href=\"/css/leaderboard.css\">\n\
         </head>\n<body>\n{}\n<footer>Leaderboard {} ({}), last updated {}</footer>\n</body>\n</html>\n",
        escape_html(title),
        body,
        board.leaderboard_id,
        board.year,
        synced
    )
}

pub fn render_not_loaded(board: &Board) -> String {
    page(
        "Leaderboard",
        board,
        "<h1>Leaderboard not loaded yet</h1>\n<p>The first refresh has not completed. Try again shortly.</p>",
    )
}

fn day_nav(board: &Board, current: u32) -> String {
    let mut nav = String::from("<nav>");
    for day in TOTALS_DAY..=board.max_day {
        let label = if day == TOTALS_DAY {
            "Totals".to_string()
        } else {
            day.to_string()
        };
        if day == current {
            nav.push_str(&format!("<strong>{}</strong> ", label));
        } else {
            nav.push_str(&format!("<a href=\"/day/{}\">{}</a> ", day, label));
        }
    }
    nav.push_str("<a href=\"/topscores\">Top scores</a></nav>\n");
    nav
}

fn sort_header(day: u32, key: SortKey, active: SortKey, label: &str) -> String {
    if key == active {
        format!("<th class=\"active\">{}</th>", label)
    } else {
        format!("<th><a href=\"/day/{}/{}\">{}</a></th>", day, key, label)
    }
}

fn scores_table(day: u32, scores: &[MemberScore], order: SortKey) -> String {
    let totals = day == TOTALS_DAY;
    let mut table = String::from("<table class=\"scores\">\n<tr><th>#</th>");
    table.push_str(&sort_header(day, SortKey::Name, order, "Name"));
    table.push_str(&sort_header(day, SortKey::Part1, order, "Part 1"));
    table.push_str(&sort_header(day, SortKey::Part2, order, "Part 2"));
    table.push_str(&sort_header(day, SortKey::Part2Diff, order, "Diff"));
    table.push_str(&sort_header(day, SortKey::WeightedTime, order, "Weighted"));
    if totals {
        table.push_str("<th>Days</th><th>Avg part 1</th><th>Avg part 2</th><th>Avg diff</th>");
    }
    table.push_str(&sort_header(day, SortKey::LocalScore, order, "Local"));
    table.push_str(&sort_header(day, SortKey::GlobalScore, order, "Global"));
    table.push_str("</tr>\n");

    for (i, ms) in scores.iter().enumerate() {
        let complete = ms.is_complete();
        table.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
            i + 1,
            escape_html(&ms.name),
            time_cell(ms.part1, ms.part1 != 0),
            time_cell(ms.part2, complete),
            time_cell(ms.part2_diff(), complete),
            time_cell(ms.w_time, complete),
        ));
        if totals {
            table.push_str(&format!(
                "<td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
                ms.count,
                readable_time(ms.part1_avg()),
                readable_time(ms.part2_avg()),
                readable_time(ms.part2_diff_avg())
            ));
        }
        table.push_str(&format!(
            "<td>{}</td><td>{}</td></tr>\n",
            ms.local_score, ms.global_score
        ));
    }

    table.push_str("</table>\n");
    table
}

fn top_scores_table(scores: &[MemberScore]) -> String {
    let mut table = String::from(
        "<table class=\"top-scores\">\n<tr><th>#</th><th>Name</th><th>Day</th><th>Part 1</th><th>Part 2</th><th>Diff</th><th>Weighted</th></tr>\n",
    );
    for (i, ms) in scores.iter().enumerate() {
        table.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td><a href=\"/day/{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            i + 1,
            escape_html(&ms.name),
            ms.day,
            ms.day,
            readable_time(ms.part1),
            readable_time(ms.part2),
            readable_time(ms.part2_diff()),
            readable_time(ms.w_time),
        ));
    }
    table.push_str("</table>\n");
    table
}

/// Ranked table for one day, or the totals when `day == 0`.
pub fn render_day(board: &Board, day: u32, scores: &[MemberScore], order: SortKey) -> String {
    let heading = if day == TOTALS_DAY {
        format!("Totals {}", board.year)
    } else {
        format!("Day {} - {}", day, board.year)
    };

    let mut body = day_nav(board, day);
    body.push_str(&format!("<h1>{}</h1>\n", escape_html(&heading)));
    body.push_str(&format!(
        "<p class=\"order\">Ordered by {}</p>\n",
        order
    ));
    body.push_str(&scores_table(day, scores, order));

    let top: Vec<MemberScore> = board.top_scores.iter().take(DAY_TOP_SCORES).cloned().collect();
    body.push_str("<h2>Top scores</h2>\n");
    body.push_str(&top_scores_table(&top));

    page(&heading, board, &body)
}

pub fn render_embed(
    board: &Board,
    day: u32,
    day_scores: &[MemberScore],
    totals: &[MemberScore],
) -> String {
    let mut body = if day == TOTALS_DAY {
        format!("<h2>No stars yet - {}</h2>\n", board.year)
    } else {
        format!("<h2>Day {} - {}</h2>\n", day, board.year)
    };
    body.push_str(&scores_table(day, day_scores, SortKey::WeightedTime));
    body.push_str("<h2>Totals</h2>\n");
    body.push_str(&scores_table(TOTALS_DAY, totals, SortKey::WeightedTime));

    let top: Vec<MemberScore> = board.top_scores.iter().take(EMBED_LIMIT).cloned().collect();
    body.push_str("<h2>Top scores</h2>\n");
    body.push_str(&top_scores_table(&top));

    page("Leaderboard", board, &body)
}

pub fn render_top_scores(board: &Board) -> String {
    let mut body = day_nav(board, u32::MAX);
    body.push_str(&format!("<h1>Top scores {}</h1>\n", board.year));
    body.push_str(&top_scores_table(&board.top_scores));
    page("Top scores", board, &body)
}
