use crate::diagnosis::presets;
use crate::diagnosis::{Answer, ScoringEngine, SubmissionInput, VariantConfig};

pub(super) const QUESTION_IDS: [&str; 5] =
    ["coffee", "smoking", "brushing", "cleaning", "whitening"];

pub(super) fn standard_engine() -> ScoringEngine {
    ScoringEngine::new(presets::standard()).expect("standard preset is valid")
}

pub(super) fn engine_for(config: VariantConfig) -> ScoringEngine {
    ScoringEngine::new(config).expect("preset is valid")
}

/// Answers every lifestyle question; `favorable` of them (in question order) get the
/// favorable value and the rest the opposite one.
pub(super) fn submission(tone: &str, age: u32, favorable: usize) -> SubmissionInput {
    let config = presets::standard();
    let mut input = SubmissionInput::new(tone, age);
    for (index, question) in config.questions.iter().enumerate() {
        let answer = if index < favorable {
            question.favorable
        } else {
            opposite(question.favorable)
        };
        input = input.with_answer(question.id.clone(), answer);
    }
    input
}

pub(super) fn opposite(answer: Answer) -> Answer {
    match answer {
        Answer::Yes => Answer::No,
        Answer::No => Answer::Yes,
    }
}
