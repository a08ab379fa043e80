//! Plain-text rendering of a finished session for the terminal.

use comfy_table::{Cell, Table};

use confquiz_core::aggregate::{self, ScoreBand, Summary};
use confquiz_core::model::AnswerRecord;

use crate::results::SessionResult;

/// One-line score summary, e.g. `Score: 2/3 (67%, medium) | avg confidence 4.0`.
pub fn score_line(summary: &Summary) -> String {
    let band = match summary.band() {
        ScoreBand::High => "high",
        ScoreBand::Medium => "medium",
        ScoreBand::Low => "low",
    };
    let confidence = match summary.avg_confidence {
        Some(avg) => format!("{avg:.1}"),
        None => "-".to_string(),
    };
    format!(
        "Score: {}/{} ({}%, {band}) | avg confidence {confidence}",
        summary.score,
        summary.total_questions,
        summary.percentage()
    )
}

/// Numbered per-question review. The correct answer is only listed for
/// questions answered wrongly.
pub fn review(answers: &[AnswerRecord]) -> String {
    let mut out = String::new();
    for (i, a) in answers.iter().enumerate() {
        let mark = if a.is_correct { "OK" } else { "WRONG" };
        out.push_str(&format!("{}. [{mark}] {}\n", i + 1, a.question));
        out.push_str(&format!("   Your answer: {}\n", a.answer));
        if !a.is_correct {
            out.push_str(&format!("   Correct answer: {}\n", a.correct_answer));
        }
        out.push_str(&format!("   Confidence: {}\n", a.confidence.label()));
    }
    out
}

/// Accuracy per confidence level.
pub fn calibration_table(answers: &[AnswerRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Confidence", "Answered", "Correct", "Accuracy"]);

    for (confidence, row) in aggregate::calibration(answers) {
        table.add_row(vec![
            Cell::new(confidence.label()),
            Cell::new(row.answered),
            Cell::new(row.correct),
            Cell::new(format!("{:.0}%", row.accuracy() * 100.0)),
        ]);
    }
    table
}

/// Full results view: score line, review, calibration table.
pub fn render(result: &SessionResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("Quiz {}\n", result.quiz_id));
    out.push_str(&format!(
        "Finished {}\n",
        result.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("{}\n", score_line(&result.summary)));

    let generated = aggregate::generated_distractor_picks(&result.answers);
    if generated > 0 {
        out.push_str(&format!("Generated distractors picked: {generated}\n"));
    }

    out.push('\n');
    out.push_str(&review(&result.answers));
    if !result.answers.is_empty() {
        out.push_str(&format!("\n{}\n", calibration_table(&result.answers)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use confquiz_core::model::Confidence;

    fn record(question: &str, answer: &str, correct: &str, confidence: u8) -> AnswerRecord {
        AnswerRecord {
            question: question.into(),
            answer: answer.into(),
            not_selected_answers: vec![],
            is_correct: answer == correct,
            confidence: Confidence::try_from(confidence).unwrap(),
            correct_answer: correct.into(),
            is_generated: (answer != correct).then_some(true),
        }
    }

    #[test]
    fn score_line_formats() {
        let summary = Summary {
            score: 2,
            total_questions: 3,
            avg_confidence: Some(4.0),
        };
        assert_eq!(
            score_line(&summary),
            "Score: 2/3 (67%, medium) | avg confidence 4.0"
        );

        let empty = Summary {
            score: 0,
            total_questions: 0,
            avg_confidence: None,
        };
        assert_eq!(score_line(&empty), "Score: 0/0 (0%, low) | avg confidence -");
    }

    #[test]
    fn review_shows_correct_answer_only_when_wrong() {
        let answers = vec![
            record("What is 2 + 2?", "4", "4", 5),
            record("Capital of Australia?", "Sydney", "Canberra", 3),
        ];
        let text = review(&answers);

        assert!(text.contains("1. [OK] What is 2 + 2?"));
        assert!(text.contains("2. [WRONG] Capital of Australia?"));
        assert!(text.contains("Your answer: Sydney"));
        assert_eq!(text.matches("Correct answer:").count(), 1);
        assert!(text.contains("Correct answer: Canberra"));
        assert!(text.contains("Confidence: 5 (Very confident)"));
    }

    #[test]
    fn review_layout_is_line_per_field() {
        let answers = vec![record("Capital of Australia?", "Sydney", "Canberra", 3)];
        assert_eq!(
            review(&answers),
            "1. [WRONG] Capital of Australia?\n   Your answer: Sydney\n   Correct answer: Canberra\n   Confidence: 3\n"
        );
        assert_eq!(review(&[]), "");
    }

    #[test]
    fn calibration_rows_follow_confidence_order() {
        let answers = vec![
            record("a", "x", "x", 5),
            record("b", "y", "x", 5),
            record("c", "x", "x", 1),
        ];
        let rendered = calibration_table(&answers).to_string();

        let low = rendered.find("1 (Not confident)").unwrap();
        let high = rendered.find("5 (Very confident)").unwrap();
        assert!(low < high);
        assert!(rendered.contains("50%"));
        assert!(rendered.contains("100%"));
    }

    #[test]
    fn render_includes_every_section() {
        let answers = vec![record("a", "x", "x", 4), record("b", "y", "x", 2)];
        let result = SessionResult {
            quiz_id: "quiz-1".into(),
            finished_at: Utc::now(),
            summary: Summary::compute(&answers, 2),
            answers,
        };
        let text = render(&result);

        assert!(text.starts_with("Quiz quiz-1\n"));
        assert!(text.contains("Score: 1/2 (50%, low) | avg confidence 3.0"));
        assert!(text.contains("Generated distractors picked: 1"));
        assert!(text.contains("2. [WRONG] b"));
        assert!(text.contains("Accuracy"));
    }
}
