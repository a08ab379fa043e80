//! Turning a selection plus a confidence rating into an [`AnswerRecord`].

use crate::error::AnswerError;
use crate::model::{AnswerRecord, Confidence, Question};

/// Build the record for `question` from the user's pick.
///
/// `presented` is the order the options were shown in; the record lists the
/// unpicked options in that order. `selected` must be one of them.
///
/// Provenance: an incorrect pick carries the chosen distractor's
/// `is_generated` flag. A correct pick carries the question-level flag when
/// the service supplied one.
pub fn build_answer_record(
    question: &Question,
    presented: &[String],
    selected: &str,
    confidence: Confidence,
) -> Result<AnswerRecord, AnswerError> {
    if !presented.iter().any(|o| o == selected) {
        return Err(AnswerError::UnknownOption(selected.to_string()));
    }

    let is_correct = selected == question.correct_answer;
    let is_generated = if is_correct {
        question.is_generated
    } else {
        question.distractor(selected).map(|d| d.is_generated)
    };

    Ok(AnswerRecord {
        question: question.question.clone(),
        answer: selected.to_string(),
        not_selected_answers: presented
            .iter()
            .filter(|o| o.as_str() != selected)
            .cloned()
            .collect(),
        is_correct,
        confidence,
        correct_answer: question.correct_answer.clone(),
        is_generated,
    })
}

/// In-progress interaction with one question.
///
/// Selection and confidence arrive independently and in either order. A
/// record only exists once both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerDraft {
    pub selected: Option<String>,
    pub confidence: Option<Confidence>,
}

impl AnswerDraft {
    /// Seed a draft from a record that already exists.
    pub fn from_record(record: &AnswerRecord) -> Self {
        Self {
            selected: Some(record.answer.clone()),
            confidence: Some(record.confidence),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.selected.is_some() && self.confidence.is_some()
    }

    /// The record for this draft, or `None` while either half is missing.
    pub fn complete(
        &self,
        question: &Question,
        presented: &[String],
    ) -> Option<Result<AnswerRecord, AnswerError>> {
        let selected = self.selected.as_deref()?;
        let confidence = self.confidence?;
        Some(build_answer_record(question, presented, selected, confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Distractor;

    fn question() -> Question {
        Question {
            id: None,
            question: "What is 3 * 3?".into(),
            question_de: "Was ist 3 * 3?".into(),
            correct_answer: "9".into(),
            distractors: vec![Distractor::authored("6"), Distractor::generated("12")],
            is_generated: Some(true),
        }
    }

    fn presented() -> Vec<String> {
        vec!["12".into(), "9".into(), "6".into()]
    }

    fn conf(n: u8) -> Confidence {
        Confidence::try_from(n).unwrap()
    }

    #[test]
    fn correct_pick() {
        let record = build_answer_record(&question(), &presented(), "9", conf(5)).unwrap();
        assert!(record.is_correct);
        assert_eq!(record.question, "What is 3 * 3?");
        assert_eq!(record.answer, "9");
        assert_eq!(record.not_selected_answers, vec!["12", "6"]);
        assert_eq!(record.correct_answer, "9");
        assert_eq!(record.confidence.value(), 5);
        assert_eq!(record.is_generated, Some(true));
    }

    #[test]
    fn incorrect_pick_carries_distractor_provenance() {
        let record = build_answer_record(&question(), &presented(), "12", conf(2)).unwrap();
        assert!(!record.is_correct);
        assert_eq!(record.is_generated, Some(true));
        assert_eq!(record.not_selected_answers, vec!["9", "6"]);

        let record = build_answer_record(&question(), &presented(), "6", conf(2)).unwrap();
        assert_eq!(record.is_generated, Some(false));
    }

    #[test]
    fn unknown_option_is_rejected() {
        let err = build_answer_record(&question(), &presented(), "10", conf(3)).unwrap_err();
        assert_eq!(err, AnswerError::UnknownOption("10".into()));
    }

    #[test]
    fn draft_needs_both_halves() {
        let q = question();
        let opts = presented();

        let mut draft = AnswerDraft::default();
        assert!(draft.complete(&q, &opts).is_none());

        draft.selected = Some("6".into());
        assert!(!draft.is_complete());
        assert!(draft.complete(&q, &opts).is_none());

        draft.selected = None;
        draft.confidence = Some(conf(4));
        assert!(draft.complete(&q, &opts).is_none());

        draft.selected = Some("6".into());
        let record = draft.complete(&q, &opts).unwrap().unwrap();
        assert_eq!(record.answer, "6");
        assert_eq!(AnswerDraft::from_record(&record), draft);
    }
}
