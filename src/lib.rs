use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub static QUESTIONNAIRE: Lazy<Questionnaire> = Lazy::new(|| {
    let questionnaire: Questionnaire =
        serde_json::from_str(include_str!("../resources/phq9.json")).unwrap();
    questionnaire.check_master_data();
    questionnaire
});

#[derive(Debug, Clone, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    /// Marks the two core symptoms (anhedonia, depressed mood) that
    /// gate the diagnostic screens.
    pub core: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrequencyOption {
    pub score: u8,
    pub text: String,
}

/// Half-open score range `[lower, upper)` mapped to a severity label.
#[derive(Debug, Clone, Deserialize)]
pub struct SeverityBand {
    pub lower: u8,
    pub upper: u8,
    pub label: String,
}

/// PHQ-9 master data: the nine items, the two answer scales and the
/// published severity cut points at 5, 10, 15 and 20.
#[derive(Debug, Deserialize)]
pub struct Questionnaire {
    pub title: String,
    pub instruction: String,
    pub questions: Vec<Question>,
    pub frequency_options: Vec<FrequencyOption>,
    pub difficulty_prompt: String,
    pub difficulty_levels: Vec<String>,
    pub severity_bands: Vec<SeverityBand>,
}

impl Questionnaire {
    pub fn question(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn frequency_text(&self, score: u8) -> Option<&str> {
        self.frequency_options
            .iter()
            .find(|option| option.score == score)
            .map(|option| option.text.as_str())
    }

    pub fn difficulty_text(&self, level: u8) -> Option<&str> {
        self.difficulty_levels
            .get(usize::from(level))
            .map(String::as_str)
    }

    /// Linear scan over the band table. The bands are non-uniform
    /// (the last one spans 20 through 27), so they are looked up,
    /// never computed from a bucket width.
    pub fn severity_label(&self, total: u8) -> Option<&str> {
        self.severity_bands
            .iter()
            .find(|band| band.lower <= total && total < band.upper)
            .map(|band| band.label.as_str())
    }

    /// The scales must line up with what `Assessment` validates and
    /// the bands must partition 0..28 with no gap.
    fn check_master_data(&self) {
        assert_eq!(self.questions.len(), 9);
        assert_eq!(self.frequency_options.len(), 4);
        for (score, option) in self.frequency_options.iter().enumerate() {
            assert_eq!(usize::from(option.score), score);
        }
        assert_eq!(self.difficulty_levels.len(), 4);
        let mut expected_lower = 0;
        for band in &self.severity_bands {
            assert_eq!(band.lower, expected_lower);
            assert!(band.lower < band.upper);
            expected_lower = band.upper;
        }
        assert_eq!(expected_lower, 28);
    }
}

/// Collects one answer per question, in item order, then the
/// functional difficulty level.
#[derive(Debug, Clone)]
pub struct AnswerStore {
    values: [u8; 9],
    offset: usize,
    difficulty: Option<u8>,
}

impl Default for AnswerStore {
    fn default() -> Self {
        Self {
            values: [0; 9],
            offset: 0,
            difficulty: None,
        }
    }
}

impl AnswerStore {
    /// Records the answer for the next unanswered question. Only 0
    /// to 3 is accepted; a rejected value leaves the store untouched
    /// so the caller can ask again.
    pub fn push(&mut self, score: u8) -> Result<(), Error> {
        if score > 3 {
            return Err(Error::InvalidAnswer);
        }
        if self.offset >= 9 {
            return Err(Error::TooManyAnswers);
        }
        self.values[self.offset] = score;
        self.offset += 1;
        Ok(())
    }

    /// The published instrument asks the difficulty question only
    /// after all nine items are answered.
    pub fn set_difficulty(&mut self, level: u8) -> Result<(), Error> {
        if level > 3 {
            return Err(Error::InvalidAnswer);
        }
        if self.offset < 9 {
            return Err(Error::NotFilled);
        }
        self.difficulty = Some(level);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.offset == 9 && self.difficulty.is_some()
    }

    /// Seals the store into a validated assessment.
    pub fn finish(&self) -> Result<Assessment, Error> {
        match self.difficulty {
            Some(difficulty) if self.offset == 9 => Ok(Assessment {
                answers: self.values,
                difficulty,
            }),
            _ => Err(Error::NotFilled),
        }
    }
}

/// A complete response set. Values only get in here through
/// `AnswerStore` or the validating constructor, so scoring never sees
/// a short or out-of-range sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    answers: [u8; 9],
    difficulty: u8,
}

impl Assessment {
    pub fn new(answers: [u8; 9], difficulty: u8) -> Result<Self, Error> {
        if answers.iter().any(|&answer| answer > 3) || difficulty > 3 {
            return Err(Error::InvalidAnswer);
        }
        Ok(Self {
            answers,
            difficulty,
        })
    }

    pub fn answers(&self) -> &[u8; 9] {
        &self.answers
    }

    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    /// Total score, severity band and the two diagnostic screens of
    /// the PHQ-9 scoring algorithm. "Major depressive disorder" asks
    /// for five or more items at "Nearly every day" including at
    /// least one core item at that frequency; "other depressive
    /// disorder" keeps the core gate with a count of 2 to 4. The
    /// screens are informational flags, not a diagnosis.
    pub fn score(&self) -> Scorecard {
        let total_score: u8 = self.answers.iter().sum();
        let count_of_threes = self.answers.iter().filter(|&&answer| answer == 3).count() as u8;
        let has_core_symptom = QUESTIONNAIRE
            .questions
            .iter()
            .zip(self.answers.iter())
            .any(|(question, &answer)| question.core && answer == 3);
        Scorecard {
            total_score,
            severity: QUESTIONNAIRE
                .severity_label(total_score)
                .expect("severity bands cover every attainable total")
                .to_string(),
            difficulty: QUESTIONNAIRE
                .difficulty_text(self.difficulty)
                .expect("difficulty scale covers levels 0-3")
                .to_string(),
            count_of_threes,
            has_core_symptom,
            potential_major_depression: count_of_threes >= 5 && has_core_symptom,
            potential_other_depression: (2..=4).contains(&count_of_threes) && has_core_symptom,
        }
    }
}

/// Everything derived from one completed assessment. Recomputed on
/// demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scorecard {
    pub total_score: u8,
    pub severity: String,
    pub difficulty: String,
    pub count_of_threes: u8,
    pub has_core_symptom: bool,
    pub potential_major_depression: bool,
    pub potential_other_depression: bool,
}

/// Renders the assessment report. Output depends only on the inputs,
/// so repeated calls produce identical text.
pub fn render_report(assessment: &Assessment, card: &Scorecard) -> String {
    let mut report = String::new();
    report.push_str("\nPHQ-9 Assessment Report");
    report.push('\n');
    report.push_str(&"=".repeat(50));

    report.push_str(&format!("\n\nTotal Score: {}", card.total_score));
    report.push_str(&format!("\nSeverity Level: {}", card.severity));
    report.push_str(&format!("\nFunctional Difficulty: {}", card.difficulty));

    report.push_str("\n\nDetailed Responses:");
    for (question, &answer) in QUESTIONNAIRE
        .questions
        .iter()
        .zip(assessment.answers().iter())
    {
        report.push_str(&format!("\n{}. {}", question.id, question.text));
        report.push_str(&format!(
            "\n   Response: {}",
            QUESTIONNAIRE
                .frequency_text(answer)
                .expect("frequency scale covers scores 0-3")
        ));
    }

    if card.potential_major_depression {
        report.push_str("\n\nClinical Considerations:");
        report.push_str("\n- Consider Major Depressive Disorder");
        report.push_str(
            "\n  (5 or more symptoms at 'Nearly every day' including at least one core symptom)",
        );
    } else if card.potential_other_depression {
        report.push_str("\n\nClinical Considerations:");
        report.push_str("\n- Consider Other Depressive Disorder");
        report.push_str(
            "\n  (2-4 symptoms at 'Nearly every day' including at least one core symptom)",
        );
    }

    report.push_str("\n\nNote: This questionnaire is a screening tool. A definitive diagnosis");
    report.push_str("\nshould be made by a qualified healthcare professional taking into");
    report.push_str("\naccount clinical observation and other relevant information.");

    report
}

/// Reads prerecorded answer sheets from headerless CSV. Each record
/// carries an identifier, the nine answers and the difficulty level,
/// and every value goes through the same validation as the
/// interactive path.
pub fn read_bulk<R: std::io::Read>(
    reader: R,
) -> impl Iterator<Item = Result<(String, Assessment), Error>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
        .into_records()
        .map(|record| {
            let record = record?;
            if record.len() != 11 {
                return Err(Error::MalformedRecord(record.len()));
            }
            let id = record[0].to_string();
            let mut store = AnswerStore::default();
            for field in record.iter().skip(1).take(9) {
                let answer = field
                    .trim()
                    .parse::<u8>()
                    .map_err(|_| Error::InvalidAnswer)?;
                store.push(answer)?;
            }
            let difficulty = record[10]
                .trim()
                .parse::<u8>()
                .map_err(|_| Error::InvalidAnswer)?;
            store.set_difficulty(difficulty)?;
            Ok((id, store.finish()?))
        })
}

#[derive(Debug, Error)]
pub enum Error {
    /// Answer or difficulty outside the published 0 to 3 scale.
    #[error("answers must be a whole number between 0 and 3")]
    InvalidAnswer,
    /// All nine questions already carry an answer.
    #[error("every question has already been answered")]
    TooManyAnswers,
    /// Difficulty or scoring requested before the sheet is complete.
    #[error("the questionnaire is not fully answered yet")]
    NotFilled,
    /// CSV record with the wrong number of fields.
    #[error("expected 11 fields per record, found {0}")]
    MalformedRecord(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
