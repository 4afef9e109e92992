use crate::types::{AnalysisReport, RecommendedPath, SceneRecord};

/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

/// Format an analysis report as human-readable markdown
pub fn format_report_readable(report: &AnalysisReport) -> String {
    let mut output = String::new();

    output.push_str("# B-Roll Suggestions\n\n");
    output.push_str(&format!(
        "**Scenes:** {} | **AI-ready:** {} | **Tone:** {} | **Format:** {}\n\n",
        report.scenes.len(),
        report.ai_generate_count(),
        report.tone,
        report.format
    ));
    if report.beats_dropped > 0 {
        output.push_str(&format!(
            "_{} of {} detected beats could not be matched to the script and were skipped._\n\n",
            report.beats_dropped, report.beats_returned
        ));
    }

    for record in &report.scenes {
        output.push_str(&format!(
            "## Scene {} [{}] ({})\n\n",
            record.sequence, record.timestamp, record.tone
        ));
        output.push_str(&format!("**Insert after:** _{}_\n\n", record.insert_after));
        output.push_str("**Generation prompt:**\n\n");
        output.push_str(&format!("    {}\n\n", record.prompt));
        output.push_str(&format!(
            "**Duration:** {}s | **Aspect ratio:** {} | **AI feasibility:** {:.0}%\n\n",
            record.duration,
            record.aspect_ratio,
            record.confidence_score * 100.0
        ));
        match record.recommended_path {
            RecommendedPath::AiGenerate => {
                output.push_str("**Recommended:** generate with an AI video tool\n\n");
            }
            RecommendedPath::StockSearch => {
                output.push_str(&format!(
                    "**Recommended:** stock footage. {}\n\n",
                    record.search_instruction
                ));
            }
        }
    }

    output
}

/// Render records as CSV with a header row. Fields containing a comma,
/// quote or line break are quoted, with embedded quotes doubled.
pub fn records_to_csv(records: &[SceneRecord]) -> String {
    let mut output = SceneRecord::COLUMNS.join(",");
    output.push('\n');

    for record in records {
        let row = record
            .cells()
            .iter()
            .map(|cell| csv_field(cell))
            .collect::<Vec<_>>()
            .join(",");
        output.push_str(&row);
        output.push('\n');
    }

    output
}

pub fn records_to_json(records: &[SceneRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
