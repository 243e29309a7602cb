//! Stage definitions and answer checking.

use std::collections::BTreeSet;

use super::errors::ValidationError;

/// Absolute slack added to numeric tolerances so exact answers survive
/// floating point noise.
const NUMERIC_EPSILON: f64 = 1e-9;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StageKind {
    Numeric,
    Selection,
    Imaging,
}

/// A numeric answer accepted within `tolerance_pct` percent of `correct`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumericStage {
    pub prompt: String,
    pub correct: f64,
    pub tolerance_pct: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub time_limit: Option<u32>,
}

/// Multiple choice. Choices are addressed by index.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionStage {
    pub prompt: String,
    pub choices: Vec<String>,
    pub correct: BTreeSet<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub multi_select: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub time_limit: Option<u32>,
}

/// Region picking on an image. Regions are addressed by index.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImagingStage {
    pub prompt: String,
    pub image: String,
    pub region_count: u32,
    pub correct: BTreeSet<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub time_limit: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stage {
    Numeric(NumericStage),
    Selection(SelectionStage),
    Imaging(ImagingStage),
}

/// Player input for one stage.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StageAnswer {
    Numeric(f64),
    Selection(BTreeSet<u32>),
    Regions(BTreeSet<u32>),
}

impl StageAnswer {
    pub fn choice(index: u32) -> Self {
        Self::Selection(BTreeSet::from([index]))
    }

    pub fn choices(indices: impl IntoIterator<Item = u32>) -> Self {
        Self::Selection(indices.into_iter().collect())
    }

    pub fn regions(indices: impl IntoIterator<Item = u32>) -> Self {
        Self::Regions(indices.into_iter().collect())
    }

    pub fn kind(&self) -> StageKind {
        match self {
            Self::Numeric(_) => StageKind::Numeric,
            Self::Selection(_) => StageKind::Selection,
            Self::Regions(_) => StageKind::Imaging,
        }
    }
}

impl Stage {
    pub fn kind(&self) -> StageKind {
        match self {
            Self::Numeric(_) => StageKind::Numeric,
            Self::Selection(_) => StageKind::Selection,
            Self::Imaging(_) => StageKind::Imaging,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            Self::Numeric(stage) => &stage.prompt,
            Self::Selection(stage) => &stage.prompt,
            Self::Imaging(stage) => &stage.prompt,
        }
    }

    /// Tick budget, if the stage is timed.
    pub fn time_limit(&self) -> Option<u32> {
        match self {
            Self::Numeric(stage) => stage.time_limit,
            Self::Selection(stage) => stage.time_limit,
            Self::Imaging(stage) => stage.time_limit,
        }
    }

    /// Checks the stage definition. `index` only feeds error messages.
    pub fn validate(&self, index: usize) -> Result<(), ValidationError> {
        match self {
            Self::Numeric(stage) => {
                if !stage.correct.is_finite() {
                    return Err(ValidationError::NonFiniteNumber);
                }
                if stage.tolerance_pct > 100 {
                    return Err(ValidationError::InvalidTolerance {
                        tolerance_pct: stage.tolerance_pct,
                    });
                }
                Ok(())
            }
            Self::Selection(stage) => {
                let count = choice_count(stage.choices.len());
                if count == 0 {
                    return Err(ValidationError::NoChoices { stage: index });
                }
                check_key(&stage.correct, count, index)?;
                if !stage.multi_select && stage.correct.len() != 1 {
                    return Err(ValidationError::SingleSelectArity {
                        given: stage.correct.len(),
                    });
                }
                Ok(())
            }
            Self::Imaging(stage) => {
                if stage.region_count == 0 {
                    return Err(ValidationError::NoChoices { stage: index });
                }
                check_key(&stage.correct, stage.region_count, index)
            }
        }
    }

    /// Whether `answer` is accepted. Malformed answers are errors, not
    /// rejections.
    pub fn evaluate(&self, answer: &StageAnswer) -> Result<bool, ValidationError> {
        match (self, answer) {
            (Self::Numeric(stage), StageAnswer::Numeric(value)) => {
                if !value.is_finite() {
                    return Err(ValidationError::NonFiniteNumber);
                }
                let tolerance = stage.correct.abs() * f64::from(stage.tolerance_pct) / 100.0;
                Ok((value - stage.correct).abs() <= tolerance + NUMERIC_EPSILON)
            }
            (Self::Selection(stage), StageAnswer::Selection(picked)) => {
                check_range(picked, choice_count(stage.choices.len()))?;
                if !stage.multi_select && picked.len() != 1 {
                    return Err(ValidationError::SingleSelectArity {
                        given: picked.len(),
                    });
                }
                Ok(*picked == stage.correct)
            }
            (Self::Imaging(stage), StageAnswer::Regions(picked)) => {
                check_range(picked, stage.region_count)?;
                Ok(*picked == stage.correct)
            }
            (stage, answer) => Err(ValidationError::AnswerShape {
                expected: stage.kind(),
                found: answer.kind(),
            }),
        }
    }
}

fn choice_count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

fn check_key(key: &BTreeSet<u32>, count: u32, index: usize) -> Result<(), ValidationError> {
    if key.is_empty() {
        return Err(ValidationError::EmptyAnswerKey { stage: index });
    }
    check_range(key, count)
}

fn check_range(picked: &BTreeSet<u32>, count: u32) -> Result<(), ValidationError> {
    // BTreeSet is sorted, so the last element is the largest.
    match picked.last() {
        Some(&choice) if choice >= count => Err(ValidationError::ChoiceOutOfRange { choice, count }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(correct: f64, tolerance_pct: u32) -> Stage {
        Stage::Numeric(NumericStage {
            prompt: "dose".into(),
            correct,
            tolerance_pct,
            time_limit: None,
        })
    }

    fn selection(correct: &[u32], multi_select: bool) -> Stage {
        Stage::Selection(SelectionStage {
            prompt: "pick".into(),
            choices: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct: correct.iter().copied().collect(),
            multi_select,
            time_limit: None,
        })
    }

    #[test]
    fn numeric_answers_within_tolerance_are_accepted() {
        let stage = numeric(200.0, 5);
        assert!(stage.evaluate(&StageAnswer::Numeric(210.0)).unwrap());
        assert!(stage.evaluate(&StageAnswer::Numeric(190.0)).unwrap());
        assert!(!stage.evaluate(&StageAnswer::Numeric(210.5)).unwrap());
    }

    #[test]
    fn zero_tolerance_requires_the_exact_value() {
        let stage = numeric(0.1 + 0.2, 0);
        assert!(stage.evaluate(&StageAnswer::Numeric(0.3)).unwrap());
        assert!(!stage.evaluate(&StageAnswer::Numeric(0.31)).unwrap());

        let zero = numeric(0.0, 50);
        assert!(zero.evaluate(&StageAnswer::Numeric(0.0)).unwrap());
        assert!(!zero.evaluate(&StageAnswer::Numeric(0.01)).unwrap());
    }

    #[test]
    fn non_finite_numbers_are_malformed() {
        let stage = numeric(1.0, 10);
        assert_eq!(
            stage.evaluate(&StageAnswer::Numeric(f64::NAN)),
            Err(ValidationError::NonFiniteNumber)
        );
    }

    #[test]
    fn multi_select_uses_set_equality() {
        let stage = selection(&[0, 2], true);
        assert!(stage.evaluate(&StageAnswer::choices([2, 0])).unwrap());
        assert!(!stage.evaluate(&StageAnswer::choices([0])).unwrap());
        assert!(!stage.evaluate(&StageAnswer::choices([0, 1, 2])).unwrap());
    }

    #[test]
    fn single_select_rejects_multiple_choices() {
        let stage = selection(&[1], false);
        assert!(stage.evaluate(&StageAnswer::choice(1)).unwrap());
        assert_eq!(
            stage.evaluate(&StageAnswer::choices([1, 2])),
            Err(ValidationError::SingleSelectArity { given: 2 })
        );
    }

    #[test]
    fn out_of_range_choices_are_malformed() {
        let stage = selection(&[1], false);
        assert_eq!(
            stage.evaluate(&StageAnswer::choice(4)),
            Err(ValidationError::ChoiceOutOfRange { choice: 4, count: 4 })
        );
    }

    #[test]
    fn answer_shape_must_match_stage() {
        let stage = selection(&[1], false);
        assert_eq!(
            stage.evaluate(&StageAnswer::Numeric(1.0)),
            Err(ValidationError::AnswerShape {
                expected: StageKind::Selection,
                found: StageKind::Numeric,
            })
        );
    }

    #[test]
    fn definitions_are_checked() {
        assert_eq!(
            numeric(1.0, 101).validate(0),
            Err(ValidationError::InvalidTolerance { tolerance_pct: 101 })
        );
        assert_eq!(
            selection(&[0, 1], false).validate(2),
            Err(ValidationError::SingleSelectArity { given: 2 })
        );
        assert_eq!(
            selection(&[], true).validate(3),
            Err(ValidationError::EmptyAnswerKey { stage: 3 })
        );
        let imaging = Stage::Imaging(ImagingStage {
            prompt: "mark the lesion".into(),
            image: "scan.png".into(),
            region_count: 0,
            correct: BTreeSet::new(),
            time_limit: Some(30),
        });
        assert_eq!(
            imaging.validate(1),
            Err(ValidationError::NoChoices { stage: 1 })
        );
    }
}
