//! Terminal rendering of the ranking.

use std::fmt::Write as _;

use owo_colors::OwoColorize;
use ranking_core::{Medal, RankingList, RankingStatus, RecordPath};

const NO_DATA: &str = "No data available";

/// Render the whole screen for `status`.
pub fn render_status(status: &RankingStatus) -> String {
    let mut output = String::new();

    match status {
        RankingStatus::Idle => {
            let _ = writeln!(output, "{}", "Not watching any game".dimmed());
        }
        RankingStatus::Loading { path } => {
            let _ = writeln!(output, "{}", title(path));
            let _ = writeln!(output, "{}", "Loading scores...".dimmed());
        }
        RankingStatus::Failed { path, message } => {
            let _ = writeln!(output, "{}", title(path));
            let _ = writeln!(output, "{}", message.red());
        }
        RankingStatus::Ready { path, ranking } => {
            let _ = writeln!(output, "{}", title(path));
            output.push_str(&render_summary(ranking));
            output.push_str(&render_table(ranking));
        }
    }

    output
}

fn title(path: &RecordPath) -> String {
    format!("Ranking - {}  {}", path.game_id().bold(), "(live)".dimmed())
}

fn render_summary(ranking: &RankingList) -> String {
    let summary = ranking.summary();
    format!(
        "Participants: {}  Top: {}  Average: {}\n\n",
        summary.participants, summary.top_score, summary.average_score
    )
}

/// Plain table with one line per entry. Medal glyphs mark the podium.
pub fn render_table(ranking: &RankingList) -> String {
    let mut output = String::new();

    if ranking.is_empty() {
        let _ = writeln!(output, "{}", NO_DATA.dimmed());
        return output;
    }

    let headers = ["Pos.", "Nombre", "Apellido", "Email", "Puntaje"];
    let rows: Vec<[String; 5]> = ranking
        .iter()
        .map(|entry| {
            let position = match entry.medal() {
                Some(medal) => format!("{} {}", entry.position, medal_glyph(medal)),
                None => entry.position.to_string(),
            };
            [
                position,
                entry.record.given_name.clone(),
                entry.record.family_name.clone(),
                entry.record.email.clone(),
                entry.record.score.clone(),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header_line = pad_row(&headers.map(str::to_string), &widths);
    let _ = writeln!(output, "{}", header_line.bold());
    let _ = writeln!(output, "{}", "─".repeat(header_line.chars().count()).dimmed());

    for (row, entry) in rows.iter().zip(ranking.iter()) {
        let line = pad_row(row, &widths);
        match entry.medal() {
            Some(Medal::Gold) => {
                let _ = writeln!(output, "{}", line.yellow());
            }
            Some(_) => {
                let _ = writeln!(output, "{}", line.bold());
            }
            None => {
                let _ = writeln!(output, "{}", line);
            }
        }
    }

    output
}

fn pad_row(cells: &[String; 5], widths: &[usize; 5]) -> String {
    cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            let pad = width.saturating_sub(cell.chars().count());
            // score column is right aligned
            if i == 4 {
                format!("{}{}", " ".repeat(pad), cell)
            } else {
                format!("{}{}", cell, " ".repeat(pad))
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn medal_glyph(medal: Medal) -> &'static str {
    match medal {
        Medal::Gold => "🥇",
        Medal::Silver => "🥈",
        Medal::Bronze => "🥉",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranking_core::{GameType, project};
    use serde_json::json;
    use std::sync::Arc;

    const MEMOTEST: RecordPath = RecordPath::Game(GameType::Memotest);

    fn ranking() -> RankingList {
        project(&json!({
            "a": {"Nombre": "Ana", "Apellido": "Lee", "Email": "a@x.com", "Puntaje": "50"},
            "b": {"Nombre": "Bo", "Apellido": "Ng", "Email": "b@x.com", "Puntaje": "80"}
        }))
        .unwrap()
    }

    #[test]
    fn test_loading_and_failed_are_distinct() {
        let loading = render_status(&RankingStatus::Loading { path: MEMOTEST });
        assert!(loading.contains("Loading scores"));

        let failed = render_status(&RankingStatus::Failed {
            path: MEMOTEST,
            message: "Connection error".to_string(),
        });
        assert!(failed.contains("Connection error"));
        assert!(!failed.contains("Loading"));
    }

    #[test]
    fn test_empty_ranking_shows_no_data() {
        let output = render_status(&RankingStatus::Ready {
            path: MEMOTEST,
            ranking: Arc::new(RankingList::default()),
        });
        assert!(output.contains(NO_DATA));
    }

    #[test]
    fn test_table_lists_entries_in_order() {
        let output = render_table(&ranking());
        let bo = output.find("Bo").unwrap();
        let ana = output.find("Ana").unwrap();
        assert!(bo < ana);
        assert!(output.contains("🥇"));
        assert!(output.contains("🥈"));
        assert!(!output.contains("🥉"));
    }

    #[test]
    fn test_summary_line() {
        let output = render_status(&RankingStatus::Ready {
            path: MEMOTEST,
            ranking: Arc::new(ranking()),
        });
        assert!(output.contains("Participants: 2"));
        assert!(output.contains("Top: 80"));
        assert!(output.contains("Average: 65"));
    }
}
