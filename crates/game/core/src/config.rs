use crate::challenge::Grade;
use crate::graph::NodePolicies;

/// Insight and research points granted for finishing a challenge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reward {
    pub insight: u32,
    pub research_points: i64,
}

impl Reward {
    pub const fn new(insight: u32, research_points: i64) -> Self {
        Self {
            insight,
            research_points,
        }
    }
}

/// Reward table indexed by grade.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GradeRewards {
    pub s: Reward,
    pub a: Reward,
    pub b: Reward,
    pub c: Reward,
}

impl GradeRewards {
    pub const fn for_grade(&self, grade: Grade) -> Reward {
        match grade {
            Grade::S => self.s,
            Grade::A => self.a,
            Grade::B => self.b,
            Grade::C => self.c,
        }
    }
}

impl Default for GradeRewards {
    fn default() -> Self {
        Self {
            s: Reward::new(30, 15),
            a: Reward::new(20, 10),
            b: Reward::new(10, 5),
            c: Reward::new(0, 1),
        }
    }
}

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub starting_lives: u32,
    /// Lives never exceed this value.
    pub max_lives: u32,
    pub starting_insight: u32,
    pub starting_research_points: i64,
    /// Lives lost when a challenge fails, before item reductions.
    pub failure_penalty: u32,
    /// Lives restored by a rest node, before item bonuses.
    pub rest_heal: u32,
    pub rewards: GradeRewards,
    pub node_policies: NodePolicies,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Interior nodes connect to at least this many nodes of the next layer.
    pub const MIN_OUT_DEGREE: usize = 1;
    /// Out-degree bound for every node except start.
    pub const MAX_OUT_DEGREE: usize = 3;
    /// Repair passes before a map configuration is declared unsatisfiable.
    pub const MAX_REPAIR_PASSES: usize = 8;
    pub const MAX_DIFFICULTY_TIER: u8 = 5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_LIVES: u32 = 3;
    pub const DEFAULT_MAX_LIVES: u32 = 5;
    pub const DEFAULT_INSIGHT: u32 = 50;
    pub const DEFAULT_FAILURE_PENALTY: u32 = 1;
    pub const DEFAULT_REST_HEAL: u32 = 1;

    pub fn new() -> Self {
        Self {
            starting_lives: Self::DEFAULT_LIVES,
            max_lives: Self::DEFAULT_MAX_LIVES,
            starting_insight: Self::DEFAULT_INSIGHT,
            starting_research_points: 0,
            failure_penalty: Self::DEFAULT_FAILURE_PENALTY,
            rest_heal: Self::DEFAULT_REST_HEAL,
            rewards: GradeRewards::default(),
            node_policies: NodePolicies::default(),
        }
    }

    pub fn with_node_policies(mut self, node_policies: NodePolicies) -> Self {
        self.node_policies = node_policies;
        self
    }

    pub fn with_starting_resources(mut self, lives: u32, insight: u32) -> Self {
        self.starting_lives = lives;
        self.starting_insight = insight;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
