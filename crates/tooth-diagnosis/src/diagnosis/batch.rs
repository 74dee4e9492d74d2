use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use super::domain::{Answer, SubmissionInput};

const TONE_COLUMN: &str = "tone";
const AGE_COLUMN: &str = "age";

#[derive(Debug)]
pub enum BatchImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumn(&'static str),
    DuplicateColumn(String),
}

impl std::fmt::Display for BatchImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchImportError::Io(err) => write!(f, "failed to read submissions file: {}", err),
            BatchImportError::Csv(err) => write!(f, "invalid submissions CSV data: {}", err),
            BatchImportError::MissingColumn(column) => {
                write!(f, "submissions CSV has no '{}' column", column)
            }
            BatchImportError::DuplicateColumn(column) => {
                write!(f, "submissions CSV repeats the '{}' column", column)
            }
        }
    }
}

impl std::error::Error for BatchImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchImportError::Io(err) => Some(err),
            BatchImportError::Csv(err) => Some(err),
            BatchImportError::MissingColumn(_) | BatchImportError::DuplicateColumn(_) => None,
        }
    }
}

impl From<std::io::Error> for BatchImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BatchImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// One CSV data row, either ready for the engine or rejected while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRow {
    pub line: u64,
    pub submission: Result<SubmissionInput, String>,
}

pub fn parse_submissions_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<BatchRow>, BatchImportError> {
    let file = std::fs::File::open(path)?;
    parse_submissions(file)
}

/// Reads `tone,age,<question id>...` rows. Empty answer cells are left out so the engine
/// reports them as missing. Malformed rows are returned as rejected rows; only I/O failures
/// and a bad header abort the import.
pub fn parse_submissions<R: Read>(reader: R) -> Result<Vec<BatchRow>, BatchImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let tone_index = column_index(&headers, TONE_COLUMN)?;
    let age_index = column_index(&headers, AGE_COLUMN)?;

    let mut seen = HashSet::new();
    if let Some(repeated) = headers.iter().find(|header| !seen.insert(*header)) {
        return Err(BatchImportError::DuplicateColumn(repeated.to_string()));
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let row = match record {
            Ok(record) => BatchRow {
                line: record.position().map(|pos| pos.line()).unwrap_or_default(),
                submission: parse_row(&headers, &record, tone_index, age_index),
            },
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => BatchRow {
                line: err.position().map(|pos| pos.line()).unwrap_or_default(),
                submission: Err(err.to_string()),
            },
        };
        rows.push(row);
    }

    Ok(rows)
}

fn column_index(headers: &csv::StringRecord, column: &'static str) -> Result<usize, BatchImportError> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(column))
        .ok_or(BatchImportError::MissingColumn(column))
}

fn parse_row(
    headers: &csv::StringRecord,
    record: &csv::StringRecord,
    tone_index: usize,
    age_index: usize,
) -> Result<SubmissionInput, String> {
    if record.len() != headers.len() {
        return Err(format!(
            "row has {} fields, header has {}",
            record.len(),
            headers.len()
        ));
    }

    let tone = record.get(tone_index).unwrap_or_default();
    if tone.is_empty() {
        return Err("tone is empty".to_string());
    }

    let raw_age = record.get(age_index).unwrap_or_default();
    let age = raw_age
        .parse::<u32>()
        .map_err(|_| format!("age '{raw_age}' is not a whole number"))?;

    let mut answers = Vec::new();
    for (index, (header, cell)) in headers.iter().zip(record.iter()).enumerate() {
        if index == tone_index || index == age_index || cell.is_empty() {
            continue;
        }
        let answer = Answer::parse(cell)
            .ok_or_else(|| format!("answer '{cell}' for {header} is not はい/いいえ"))?;
        answers.push((header.to_string(), answer));
    }

    SubmissionInput::from_answers(tone, age, answers).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_rows_with_literal_and_english_answers() {
        let csv = "tone,age,coffee,smoking\n3M-1,30,いいえ,no\n1M-1, 42 ,YES,はい\n";
        let rows = parse_submissions(Cursor::new(csv)).expect("csv parses");

        assert_eq!(rows.len(), 2);
        let first = rows[0].submission.as_ref().expect("first row valid");
        assert_eq!(first.tone, "3M-1");
        assert_eq!(first.answers.get("smoking"), Some(&Answer::No));
        let second = rows[1].submission.as_ref().expect("second row valid");
        assert_eq!(second.age, 42);
        assert_eq!(second.answers.get("coffee"), Some(&Answer::Yes));
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn rejects_rows_individually() {
        let csv = "tone,age,coffee\n3M-1,thirty,いいえ\n3M-1,30,maybe\n3M-1,30,\n";
        let rows = parse_submissions(Cursor::new(csv)).expect("csv parses");

        assert!(rows[0].submission.as_ref().unwrap_err().contains("thirty"));
        assert!(rows[1].submission.as_ref().unwrap_err().contains("maybe"));
        let third = rows[2].submission.as_ref().expect("empty answer is not a parse error");
        assert!(third.answers.is_empty());
    }

    #[test]
    fn rows_with_the_wrong_field_count_are_rejected_without_losing_the_rest() {
        let csv = "tone,age,coffee\n3M-1,30,いいえ\n3M-1,30\n1M-1,20,はい\n3M-1,30,はい,extra\n";
        let rows = parse_submissions(Cursor::new(csv)).expect("csv parses");

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].line, 2);
        assert!(rows[0].submission.is_ok());
        assert_eq!(rows[1].line, 3);
        assert!(rows[1].submission.as_ref().unwrap_err().contains("2 fields"));
        assert_eq!(rows[2].line, 4);
        assert_eq!(
            rows[2].submission.as_ref().expect("row after a short row").tone,
            "1M-1"
        );
        assert!(rows[3].submission.as_ref().unwrap_err().contains("4 fields"));
    }

    #[test]
    fn repeated_question_columns_are_refused() {
        let csv = "tone,age,coffee,smoking,coffee\n3M-1,30,はい,いいえ,いいえ\n";
        let err = parse_submissions(Cursor::new(csv)).unwrap_err();

        assert!(matches!(err, BatchImportError::DuplicateColumn(ref column) if column == "coffee"));
    }

    #[test]
    fn requires_tone_and_age_columns() {
        let err = parse_submissions(Cursor::new("age,coffee\n30,はい\n")).unwrap_err();
        assert!(matches!(err, BatchImportError::MissingColumn("tone")));
    }
}
