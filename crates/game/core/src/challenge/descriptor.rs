//! Challenge descriptors: what a node asks of the player.

use crate::map::NodeType;

use super::errors::ValidationError;
use super::grade::Grade;
use super::stage::{Stage, StageKind};

/// Challenge variant. Each challenge node type maps to exactly one kind.
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
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ChallengeKind {
    /// Selection stages only.
    Quiz,
    /// Region-picking stages only.
    Imaging,
    /// Numeric stages only.
    Calculation,
    /// Any mix of stages.
    Boss,
}

impl ChallengeKind {
    pub const fn for_node(node_type: NodeType) -> Option<Self> {
        match node_type {
            NodeType::Quiz => Some(Self::Quiz),
            NodeType::Imaging => Some(Self::Imaging),
            NodeType::Calculation => Some(Self::Calculation),
            NodeType::Boss => Some(Self::Boss),
            NodeType::Start | NodeType::Shop | NodeType::Rest => None,
        }
    }

    pub const fn node_type(self) -> NodeType {
        match self {
            Self::Quiz => NodeType::Quiz,
            Self::Imaging => NodeType::Imaging,
            Self::Calculation => NodeType::Calculation,
            Self::Boss => NodeType::Boss,
        }
    }

    pub const fn allows(self, stage: StageKind) -> bool {
        matches!(
            (self, stage),
            (Self::Boss, _)
                | (Self::Quiz, StageKind::Selection)
                | (Self::Imaging, StageKind::Imaging)
                | (Self::Calculation, StageKind::Numeric)
        )
    }
}

/// A full challenge definition.
///
/// Built through [`ChallengeDescriptor::new`], which validates every stage.
/// Deserialized descriptors are validated again on activation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChallengeDescriptor {
    kind: ChallengeKind,
    title: String,
    stages: Vec<Stage>,
    /// Lowest grade that still counts as success. Defaults to `B`.
    #[cfg_attr(feature = "serde", serde(default))]
    success_threshold: Option<Grade>,
}

impl ChallengeDescriptor {
    pub const DEFAULT_SUCCESS_THRESHOLD: Grade = Grade::B;

    pub fn new(
        kind: ChallengeKind,
        title: impl Into<String>,
        stages: Vec<Stage>,
    ) -> Result<Self, ValidationError> {
        let descriptor = Self {
            kind,
            title: title.into(),
            stages,
            success_threshold: None,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    pub fn with_success_threshold(mut self, grade: Grade) -> Self {
        self.success_threshold = Some(grade);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stages.is_empty() {
            return Err(ValidationError::EmptyStages);
        }
        for (index, stage) in self.stages.iter().enumerate() {
            if !self.kind.allows(stage.kind()) {
                return Err(ValidationError::StageKindNotAllowed {
                    kind: self.kind,
                    stage: index,
                    found: stage.kind(),
                });
            }
            stage.validate(index)?;
        }
        Ok(())
    }

    pub fn kind(&self) -> ChallengeKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn success_threshold(&self) -> Grade {
        self.success_threshold
            .unwrap_or(Self::DEFAULT_SUCCESS_THRESHOLD)
    }

    pub(crate) fn into_parts(self) -> (ChallengeKind, String, Vec<Stage>, Grade) {
        let threshold = self.success_threshold();
        (self.kind, self.title, self.stages, threshold)
    }
}
