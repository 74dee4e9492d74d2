//! Built-in variants. Each one is plain configuration data for the same engine.

use std::collections::BTreeMap;

use super::config::{
    AdviceCatalog, AgeRange, BrightnessDirection, OffsetPolicy, RankInput, RankThreshold,
    StepBucket, SubScoreFormula, SubScoreSpec, VariantConfig,
};
use super::domain::{Answer, LifestyleQuestion, ToneEntry};

pub const STANDARD: &str = "standard";
pub const IMPRESSION: &str = "impression";
pub const LEGACY: &str = "legacy";
pub const BRAND: &str = "brand";

pub const fn names() -> [&'static str; 4] {
    [STANDARD, IMPRESSION, LEGACY, BRAND]
}

pub fn by_name(name: &str) -> Option<VariantConfig> {
    match name.trim().to_ascii_lowercase().as_str() {
        STANDARD => Some(standard()),
        IMPRESSION => Some(impression()),
        LEGACY => Some(legacy()),
        BRAND => Some(brand()),
        _ => None,
    }
}

/// Shade codes of the 25-step scale, brightest first.
const SHADE_SCALE: [&str; 25] = [
    "1M-1", "1M-2", "2L-1", "2L-2", "2M-1", "2M-2", "2M-3", "2R-1", "2R-2", "3L-1", "3L-2",
    "3M-1", "3M-2", "3M-3", "3R-1", "3R-2", "4L-1", "4L-2", "4M-1", "4M-2", "4M-3", "4R-1",
    "4R-2", "5M-1", "5M-2",
];

fn shade_scale() -> Vec<ToneEntry> {
    SHADE_SCALE
        .iter()
        .zip(1u32..)
        .map(|(code, ordinal)| ToneEntry::ordinal(code, ordinal))
        .collect()
}

fn step_buckets() -> OffsetPolicy {
    OffsetPolicy::StepBucket {
        buckets: vec![
            StepBucket::new(2, -5),
            StepBucket::new(5, -4),
            StepBucket::new(8, -3),
            StepBucket::new(10, -2),
            StepBucket::new(12, -1),
            StepBucket::new(14, 0),
            StepBucket::new(16, 1),
            StepBucket::new(18, 2),
            StepBucket::new(20, 3),
            StepBucket::new(24, 4),
        ],
        fallback: 5,
    }
}

fn question(id: &str, prompt: &str, favorable: Answer) -> LifestyleQuestion {
    LifestyleQuestion {
        id: id.to_string(),
        prompt: prompt.to_string(),
        favorable,
    }
}

fn lifestyle_questions() -> Vec<LifestyleQuestion> {
    vec![
        question(
            "coffee",
            "コーヒー・紅茶・ワインを毎日飲みますか？",
            Answer::No,
        ),
        question("smoking", "タバコを吸いますか？", Answer::No),
        question("brushing", "1日2回以上歯を磨いていますか？", Answer::Yes),
        question(
            "cleaning",
            "半年に1回以上、歯科でクリーニングを受けていますか？",
            Answer::Yes,
        ),
        question(
            "whitening",
            "ホワイトニングをしたことがありますか？",
            Answer::Yes,
        ),
    ]
}

fn cleanliness() -> SubScoreSpec {
    SubScoreSpec::new("cleanliness", SubScoreFormula::InverseLinearRescale)
}

fn urgency() -> SubScoreSpec {
    SubScoreSpec::new("urgency", SubScoreFormula::LinearRescale)
}

fn maintenance() -> SubScoreSpec {
    SubScoreSpec::new(
        "maintenance",
        SubScoreFormula::AnswerMatch {
            questions: None,
            base: 10.0,
            step: -2.0,
        },
    )
}

fn answer_weighted(name: &str, questions: &[&str], weight: f64) -> SubScoreSpec {
    SubScoreSpec::new(
        name,
        SubScoreFormula::AnswerMatch {
            questions: Some(questions.iter().map(|id| id.to_string()).collect()),
            base: 0.0,
            step: weight,
        },
    )
    .bounded(0.0, 10.0)
}

fn shade_advice() -> AdviceCatalog {
    AdviceCatalog::from_texts([
        "とても明るく清潔感のある歯のトーンです。今のケアを続けて、この印象をキープしましょう。",
        "明るく好印象なトーンです。定期的なクリーニングで、さらに白さを長く保てます。",
        "平均的なトーンです。生活習慣を少し見直すだけで、より若々しい印象に近づけます。",
        "くすみが見られ、実年齢より上に見られている可能性があります。ホワイトニングの検討をおすすめします。",
        "着色やくすみが目立つ状態です。早めの専門ケアで、印象を大きく改善できます。",
    ])
}

/// 25-step shade scale, step-bucket offsets, the canonical three sub-scores.
pub fn standard() -> VariantConfig {
    VariantConfig {
        name: STANDARD.to_string(),
        description: "25段階トーン × 生活習慣チェック（標準）".to_string(),
        age_range: AgeRange::default(),
        brightness: BrightnessDirection::LowerIsBrighter,
        tones: shade_scale(),
        offset_policy: step_buckets(),
        questions: lifestyle_questions(),
        sub_scores: vec![cleanliness(), urgency(), maintenance()],
        rank_inputs: RankInput::canonical(),
        rank_thresholds: RankThreshold::standard(),
        advice: shade_advice(),
    }
}

/// Linear-divide offsets plus the first-impression, attractiveness and damage metrics.
pub fn impression() -> VariantConfig {
    let mut sub_scores = vec![cleanliness(), urgency(), maintenance()];
    sub_scores.push(answer_weighted(
        "first_impression",
        &["brushing", "cleaning"],
        5.0,
    ));
    sub_scores.push(answer_weighted(
        "attractiveness",
        &["whitening", "smoking"],
        5.0,
    ));
    sub_scores.push(
        SubScoreSpec::new(
            "damage_level",
            SubScoreFormula::AnswerMismatchThreshold {
                questions: vec!["coffee".to_string(), "smoking".to_string()],
                threshold: 15,
                weight: 3.0,
            },
        )
        .bounded(0.0, 10.0),
    );

    VariantConfig {
        name: IMPRESSION.to_string(),
        description: "25段階トーン × 第一印象・魅力度・ダメージ度".to_string(),
        offset_policy: OffsetPolicy::LinearDivide {
            center: 13,
            divisor: 3,
        },
        sub_scores,
        ..standard()
    }
}

/// Older revision ranking on cleanliness, stain risk and the age-gap score.
pub fn legacy() -> VariantConfig {
    VariantConfig {
        name: LEGACY.to_string(),
        description: "25段階トーン（旧版：着色リスク・年齢ギャップ評価）".to_string(),
        sub_scores: vec![
            cleanliness(),
            SubScoreSpec::new("stain_risk", SubScoreFormula::LinearRescale),
            SubScoreSpec::new(
                "age_gap",
                SubScoreFormula::OffsetRescale {
                    base: 5.0,
                    per_year: 1.0,
                },
            ),
            maintenance(),
        ],
        rank_inputs: vec![
            RankInput::direct("cleanliness"),
            RankInput::inverted("stain_risk"),
            RankInput::direct("age_gap"),
        ],
        ..standard()
    }
}

fn brand_tone(code: &str, ordinal: u32, offset: i32, clean: f64, impression: f64) -> ToneEntry {
    let mut attributes = BTreeMap::new();
    attributes.insert("cleanliness".to_string(), clean);
    attributes.insert("impression".to_string(), impression);
    ToneEntry {
        code: code.to_string(),
        ordinal,
        offset: Some(offset),
        attributes,
    }
}

/// Eleven-shade brand table whose entries already carry clinical offsets and scores.
pub fn brand() -> VariantConfig {
    let tones = vec![
        brand_tone("A4", 11, 8, 4.0, 4.5),
        brand_tone("A3", 10, 5, 5.0, 5.5),
        brand_tone("A2", 8, 3, 6.0, 6.5),
        brand_tone("A1", 6, 0, 7.0, 7.5),
        brand_tone("B4", 9, 4, 5.5, 5.8),
        brand_tone("B3", 7, 2, 6.5, 6.8),
        brand_tone("B2", 5, -2, 8.0, 8.5),
        brand_tone("B1", 4, -5, 9.0, 9.2),
        brand_tone("BL3", 3, -6, 9.5, 9.6),
        brand_tone("BL2", 2, -8, 9.8, 9.8),
        brand_tone("BL1", 1, -10, 10.0, 10.0),
    ];

    VariantConfig {
        name: BRAND.to_string(),
        description: "SHIRONO LABO 印象診断（ブランド版）".to_string(),
        age_range: AgeRange { min: 10, max: 100 },
        brightness: BrightnessDirection::LowerIsBrighter,
        tones,
        offset_policy: OffsetPolicy::DirectLookup,
        questions: Vec::new(),
        sub_scores: vec![
            SubScoreSpec::new(
                "cleanliness",
                SubScoreFormula::ToneAttribute {
                    attribute: "cleanliness".to_string(),
                },
            ),
            SubScoreSpec::new(
                "impression",
                SubScoreFormula::ToneAttribute {
                    attribute: "impression".to_string(),
                },
            ),
            SubScoreSpec::new(
                "age_gap",
                SubScoreFormula::OffsetRescale {
                    base: 5.0,
                    per_year: 0.5,
                },
            ),
        ],
        rank_inputs: vec![
            RankInput::direct("cleanliness"),
            RankInput::direct("impression"),
            RankInput::direct("age_gap"),
        ],
        rank_thresholds: RankThreshold::standard(),
        advice: AdviceCatalog::from_texts([
            "SHIRONO LABO 基準で最高ランクの白さです。この透明感をぜひ維持していきましょう。",
            "清潔感のある明るい印象です。メンテナンスで、さらにワントーン上を目指せます。",
            "標準的なトーンです。ホワイトニングで、見た目年齢を若く見せる余地があります。",
            "やや黄ばみが見られます。集中ケアで、清潔感と好印象の大きな改善が期待できます。",
            "トーンの暗さが印象に影響しています。まずは無料カウンセリングでご相談ください。",
        ]),
    }
}
