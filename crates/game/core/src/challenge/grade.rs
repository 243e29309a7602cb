/// Letter grade for a finished challenge, ordered `C < B < A < S`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum Grade {
    C,
    B,
    A,
    S,
}

impl Grade {
    /// Minimum accepted percentage for each grade.
    pub const S_PERCENT: u32 = 90;
    pub const A_PERCENT: u32 = 75;
    pub const B_PERCENT: u32 = 50;

    pub const fn min_percent(self) -> u32 {
        match self {
            Self::S => Self::S_PERCENT,
            Self::A => Self::A_PERCENT,
            Self::B => Self::B_PERCENT,
            Self::C => 0,
        }
    }

    /// Grades `accepted / total` without floating point: a grade is reached
    /// when `accepted * 100 >= percent * total`.
    pub fn from_counts(accepted: u32, total: u32) -> Self {
        if total == 0 {
            return Self::C;
        }
        let scaled = u64::from(accepted) * 100;
        let reaches = |grade: Self| scaled >= u64::from(grade.min_percent()) * u64::from(total);

        if reaches(Self::S) {
            Self::S
        } else if reaches(Self::A) {
            Self::A
        } else if reaches(Self::B) {
            Self::B
        } else {
            Self::C
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(Grade::from_counts(9, 10), Grade::S);
        assert_eq!(Grade::from_counts(3, 4), Grade::A);
        assert_eq!(Grade::from_counts(1, 2), Grade::B);
        assert_eq!(Grade::from_counts(4, 9), Grade::C);
        assert_eq!(Grade::from_counts(0, 0), Grade::C);
    }

    #[test]
    fn more_accepted_answers_never_lower_the_grade() {
        for total in 1..=20u32 {
            let mut previous = Grade::C;
            for accepted in 0..=total {
                let grade = Grade::from_counts(accepted, total);
                assert!(grade >= previous, "{accepted}/{total} dropped to {grade}");
                previous = grade;
            }
            assert_eq!(previous, Grade::S);
        }
    }

    #[test]
    fn ordering_runs_from_c_to_s() {
        assert!(Grade::C < Grade::B && Grade::B < Grade::A && Grade::A < Grade::S);
        assert_eq!("s".parse::<Grade>().unwrap(), Grade::S);
    }
}
