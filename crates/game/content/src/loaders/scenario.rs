//! Challenge scenario loader.

use std::collections::BTreeSet;
use std::path::Path;

use game_core::{
    ChallengeDescriptor, ChallengeKind, Grade, ImagingStage, NumericStage, SelectionStage, Stage,
};
use serde::Deserialize;

use crate::bank::ScenarioBank;
use crate::loaders::{LoadResult, parse_name, read_file};

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioCatalog {
    pub scenarios: Vec<ScenarioRon>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioRon {
    pub kind: String,
    pub title: String,
    /// Lowest passing grade, e.g. `"A"`.
    #[serde(default)]
    pub pass: Option<String>,
    pub stages: Vec<StageRon>,
}

#[derive(Debug, Clone, Deserialize)]
pub enum StageRon {
    Numeric {
        prompt: String,
        answer: f64,
        tolerance_pct: u32,
        #[serde(default)]
        time_limit: Option<u32>,
    },
    Selection {
        prompt: String,
        choices: Vec<String>,
        correct: Vec<u32>,
        #[serde(default)]
        multi_select: bool,
        #[serde(default)]
        time_limit: Option<u32>,
    },
    Imaging {
        prompt: String,
        image: String,
        regions: u32,
        correct: Vec<u32>,
        #[serde(default)]
        time_limit: Option<u32>,
    },
}

impl From<StageRon> for Stage {
    fn from(stage: StageRon) -> Self {
        match stage {
            StageRon::Numeric {
                prompt,
                answer,
                tolerance_pct,
                time_limit,
            } => Stage::Numeric(NumericStage {
                prompt,
                correct: answer,
                tolerance_pct,
                time_limit,
            }),
            StageRon::Selection {
                prompt,
                choices,
                correct,
                multi_select,
                time_limit,
            } => Stage::Selection(SelectionStage {
                prompt,
                choices,
                correct: correct.into_iter().collect::<BTreeSet<_>>(),
                multi_select,
                time_limit,
            }),
            StageRon::Imaging {
                prompt,
                image,
                regions,
                correct,
                time_limit,
            } => Stage::Imaging(ImagingStage {
                prompt,
                image,
                region_count: regions,
                correct: correct.into_iter().collect(),
                time_limit,
            }),
        }
    }
}

impl ScenarioRon {
    pub fn into_descriptor(self) -> LoadResult<ChallengeDescriptor> {
        let kind: ChallengeKind = parse_name("challenge kind", &self.kind)?;
        let stages = self.stages.into_iter().map(Stage::from).collect();
        let mut descriptor = ChallengeDescriptor::new(kind, self.title, stages)?;
        if let Some(pass) = self.pass {
            let grade: Grade = parse_name("grade", &pass)?;
            descriptor = descriptor.with_success_threshold(grade);
        }
        Ok(descriptor)
    }
}

/// Loader for scenario banks from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<ScenarioBank> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parses and validates every scenario. The first invalid one fails the
    /// whole bank.
    pub fn parse(content: &str) -> LoadResult<ScenarioBank> {
        let catalog: ScenarioCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;

        let mut bank = ScenarioBank::new();
        for (index, entry) in catalog.scenarios.into_iter().enumerate() {
            let title = entry.title.clone();
            let descriptor = entry
                .into_descriptor()
                .map_err(|e| anyhow::anyhow!("Scenario {} ('{}') is invalid: {}", index, title, e))?;
            bank.insert(descriptor)?;
        }

        tracing::debug!(count = bank.len(), "loaded scenario bank");
        Ok(bank)
    }
}
