use std::io::Write;

use anyhow::Result;
use colored::Colorize;
use portalgun_game::SessionSummary;

const HEADER: [&str; 3] = ["Game results", "Rick switched", "Rick stayed"];

fn rows(summary: &SessionSummary) -> Vec<[String; 3]> {
    let stats = &summary.stats;
    vec![
        [
            "Rounds".to_string(),
            stats.rounds_switched().to_string(),
            stats.rounds_stayed().to_string(),
        ],
        [
            "Wins".to_string(),
            stats.wins_switched().to_string(),
            stats.wins_stayed().to_string(),
        ],
        [
            "P (estimate)".to_string(),
            format!("{:.3}", summary.estimate_switched),
            format!("{:.3}", summary.estimate_stayed),
        ],
        [
            "P (exact)".to_string(),
            format!("{:.3}", summary.exact_switched),
            format!("{:.3}", summary.exact_stayed),
        ],
    ]
}

pub fn write_console_report(out: &mut dyn Write, summary: &SessionSummary) -> Result<()> {
    let body = rows(summary);
    let mut widths = HEADER.map(str::len);
    for row in &body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }
    let border = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    writeln!(out)?;
    writeln!(out, "{}", "GAME STATS".bright_cyan().bold())?;
    writeln!(out, "{border}")?;
    let header = HEADER
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!(" {} ", format!("{cell:<w$}").bold()))
        .collect::<Vec<_>>()
        .join("|");
    writeln!(out, "|{header}|")?;
    writeln!(out, "{border}")?;
    for row in &body {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!(" {cell:<w$} "))
            .collect::<Vec<_>>()
            .join("|");
        writeln!(out, "|{line}|")?;
    }
    writeln!(out, "{border}")?;
    Ok(())
}

pub fn write_json_report(out: &mut dyn Write, summary: &SessionSummary) -> Result<()> {
    let json_output = serde_json::to_string_pretty(summary)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn write_markdown_report(out: &mut dyn Write, summary: &SessionSummary) -> Result<()> {
    writeln!(out, "# Portal Gun Game Results\n")?;
    writeln!(out, "- **Morty**: {}", summary.strategy)?;
    writeln!(out, "- **Boxes**: {}", summary.boxes)?;
    writeln!(out, "- **Rounds**: {}\n", summary.rounds)?;
    writeln!(out, "| {} | {} | {} |", HEADER[0], HEADER[1], HEADER[2])?;
    writeln!(out, "|---|---:|---:|")?;
    for [label, switched, stayed] in rows(summary) {
        writeln!(out, "| {label} | {switched} | {stayed} |")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use portalgun_game::{RoundRecord, Statistics};

    fn summary() -> SessionSummary {
        let mut stats = Statistics::new();
        stats.extend([
            RoundRecord {
                switched: true,
                won: true,
            },
            RoundRecord {
                switched: true,
                won: false,
            },
            RoundRecord {
                switched: false,
                won: false,
            },
        ]);
        SessionSummary {
            strategy: "LazyMorty".to_string(),
            boxes: 3,
            rounds: stats.total(),
            stats,
            estimate_switched: stats.estimate_switched(),
            estimate_stayed: stats.estimate_stayed(),
            exact_switched: 2.0 / 3.0,
            exact_stayed: 1.0 / 3.0,
        }
    }

    #[test]
    fn console_table_lists_estimates_and_exact_values() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        write_console_report(&mut out, &summary()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("GAME STATS"));
        assert!(text.contains("| Rounds       | 2             | 1           |"));
        assert!(text.contains("| P (estimate) | 0.500         | 0.000       |"));
        assert!(text.contains("| P (exact)    | 0.667         | 0.333       |"));
    }

    #[test]
    fn json_report_carries_counters() {
        let mut out = Vec::new();
        write_json_report(&mut out, &summary()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["strategy"], "LazyMorty");
        assert_eq!(value["stats"]["rounds_switched"], 2);
        assert_eq!(value["stats"]["wins_switched"], 1);
    }

    #[test]
    fn markdown_report_has_table() {
        let mut out = Vec::new();
        write_markdown_report(&mut out, &summary()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("| Wins | 1 | 0 |"));
        assert!(text.contains("- **Morty**: LazyMorty"));
    }
}
