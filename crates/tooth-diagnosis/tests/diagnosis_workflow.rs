//! End-to-end scenarios through the public engine, report, and batch surfaces.

use std::io::Cursor;
use std::sync::Arc;

use tooth_diagnosis::diagnosis::batch::parse_submissions;
use tooth_diagnosis::diagnosis::presets;
use tooth_diagnosis::diagnosis::report::DiagnosisReport;
use tooth_diagnosis::diagnosis::{
    Answer, InvalidInputError, Rank, ScoringEngine, SubmissionInput, VariantConfig,
};

fn standard_input(tone: &str, age: u32) -> SubmissionInput {
    SubmissionInput::new(tone, age)
        .with_answer("coffee", Answer::No)
        .with_answer("smoking", Answer::No)
        .with_answer("brushing", Answer::Yes)
        .with_answer("cleaning", Answer::Yes)
        .with_answer("whitening", Answer::No)
}

#[test]
fn standard_submission_produces_a_full_report() {
    let config = presets::standard();
    let engine = ScoringEngine::new(config.clone()).expect("valid preset");

    let result = engine
        .evaluate(&standard_input("3M-1", 30))
        .expect("valid submission");
    let report = DiagnosisReport::compose(result, &config);

    assert_eq!(report.result.visual_age, 29);
    // four favorable answers leave maintenance at 2
    assert_eq!(report.result.sub_score("maintenance"), Some(2.0));
    assert_eq!(report.rank(), Rank::B);
    assert_eq!(report.advice, config.advice.text(Rank::B).expect("advice"));
    assert!(report.gap_comment.contains("非常に良好"));

    let lines = report.render_lines();
    assert!(lines.iter().any(|line| line.contains("見た目年齢（推定）: 29 歳")));
    assert!(lines.iter().any(|line| line == "見た目年齢ギャップ: -1 歳"));
}

#[test]
fn report_json_keeps_literal_answers_and_rank_letters() {
    let config = presets::brand();
    let engine = ScoringEngine::new(config.clone()).expect("valid preset");

    let result = engine
        .evaluate(&SubmissionInput::new("A2", 33))
        .expect("valid submission");
    let report = DiagnosisReport::compose(result, &config);
    let json = serde_json::to_value(&report).expect("serializes");

    assert_eq!(json["variant"], "brand");
    assert_eq!(json["visual_age"], 36);
    assert_eq!(json["advice_key"], json["rank"]);
    assert!(json["gap_comment"]
        .as_str()
        .expect("comment string")
        .contains("約3歳高く"));

    let input: SubmissionInput =
        serde_json::from_str(r#"{"tone":"3M-1","age":30,"answers":{"coffee":"いいえ","smoking":"yes"}}"#)
            .expect("answers deserialize");
    assert_eq!(input.answers.get("coffee"), Some(&Answer::No));
    assert_eq!(input.answers.get("smoking"), Some(&Answer::Yes));
    assert_eq!(
        serde_json::to_string(&Answer::Yes).expect("serializes"),
        "\"はい\""
    );
}

#[test]
fn batch_rows_flow_through_the_engine() {
    let engine = Arc::new(ScoringEngine::new(presets::standard()).expect("valid preset"));
    let csv = "\
tone,age,coffee,smoking,brushing,cleaning,whitening
1M-1,28,いいえ,いいえ,はい,はい,はい
Z9-9,40,いいえ,いいえ,はい,はい,はい
3M-1,5,no,no,yes,yes,yes
5M-2,61,はい,はい,いいえ,いいえ,
";
    let rows = parse_submissions(Cursor::new(csv)).expect("csv parses");
    let outcomes: Vec<Result<Rank, InvalidInputError>> = rows
        .iter()
        .map(|row| {
            let input = row.submission.as_ref().expect("rows parse");
            engine.evaluate(input).map(|result| result.rank)
        })
        .collect();

    assert_eq!(outcomes[0], Ok(Rank::S));
    assert_eq!(
        outcomes[1],
        Err(InvalidInputError::UnknownTone("Z9-9".to_string()))
    );
    assert!(matches!(
        outcomes[2],
        Err(InvalidInputError::AgeOutOfRange { age: 5, .. })
    ));
    assert_eq!(
        outcomes[3],
        Err(InvalidInputError::MissingAnswer("whitening".to_string()))
    );
}

#[test]
fn custom_variant_from_json_is_validated_before_use() {
    let mut config = presets::impression();
    config.name = "clinic-b".to_string();
    config.rank_thresholds.reverse();
    let json = serde_json::to_string(&config).expect("serializes");

    let parsed: VariantConfig = serde_json::from_str(&json).expect("deserializes");
    assert!(ScoringEngine::new(parsed).is_err());
}
