use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::InvalidInputError;

/// Binary answer to a lifestyle question, serialized with the literal response values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Answer {
    #[serde(rename = "はい", alias = "yes")]
    Yes,
    #[serde(rename = "いいえ", alias = "no")]
    No,
}

impl Answer {
    pub const fn literal(self) -> &'static str {
        match self {
            Self::Yes => "はい",
            Self::No => "いいえ",
        }
    }

    /// Accepts the literal response values as well as `yes`/`no` in any case.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        match trimmed {
            "はい" => return Some(Self::Yes),
            "いいえ" => return Some(Self::No),
            _ => {}
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "yes" | "y" => Some(Self::Yes),
            "no" | "n" => Some(Self::No),
            _ => None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

/// Coarse summary grade, ordered best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    S,
    A,
    B,
    C,
    D,
}

impl Rank {
    pub const fn ordered() -> [Self; 5] {
        [Self::S, Self::A, Self::B, Self::C, Self::D]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A shade on the brightness reference scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneEntry {
    pub code: String,
    /// 1-based position on the brightness scale.
    pub ordinal: u32,
    /// Verbatim age offset, only read by the direct-lookup policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, f64>,
}

impl ToneEntry {
    pub fn ordinal(code: &str, ordinal: u32) -> Self {
        Self {
            code: code.to_string(),
            ordinal,
            offset: None,
            attributes: BTreeMap::new(),
        }
    }
}

/// Lifestyle prompt paired with the answer considered favorable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifestyleQuestion {
    pub id: String,
    pub prompt: String,
    pub favorable: Answer,
}

/// Raw user input for one diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionInput {
    pub tone: String,
    pub age: u32,
    #[serde(default)]
    pub answers: BTreeMap<String, Answer>,
}

impl SubmissionInput {
    pub fn new(tone: impl Into<String>, age: u32) -> Self {
        Self {
            tone: tone.into(),
            age,
            answers: BTreeMap::new(),
        }
    }

    /// Builds an input from collected answer pairs, refusing to let a repeated question id
    /// overwrite an earlier answer.
    pub fn from_answers<I>(tone: impl Into<String>, age: u32, pairs: I) -> Result<Self, InvalidInputError>
    where
        I: IntoIterator<Item = (String, Answer)>,
    {
        let mut answers = BTreeMap::new();
        for (question, answer) in pairs {
            if answers.contains_key(&question) {
                return Err(InvalidInputError::DuplicateAnswer(question));
            }
            answers.insert(question, answer);
        }

        Ok(Self {
            tone: tone.into(),
            age,
            answers,
        })
    }

    pub fn with_answer(mut self, question: impl Into<String>, answer: Answer) -> Self {
        self.answers.insert(question.into(), answer);
        self
    }
}

/// Named derived metric within its declared bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScore {
    pub name: String,
    pub value: f64,
}

/// Output of a single evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub tone: String,
    pub age: u32,
    pub offset: i32,
    pub visual_age: i64,
    pub sub_scores: Vec<SubScore>,
    pub average: i64,
    pub rank: Rank,
    pub advice_key: Rank,
}

impl DiagnosisResult {
    pub fn sub_score(&self, name: &str) -> Option<f64> {
        self.sub_scores
            .iter()
            .find(|score| score.name == name)
            .map(|score| score.value)
    }
}
