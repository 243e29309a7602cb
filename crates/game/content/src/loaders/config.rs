//! Game configuration loader.

use std::collections::BTreeMap;
use std::path::Path;

use game_core::{GameConfig, Grade, GradeRewards, NodePolicy, NodeType, Reward};
use serde::Deserialize;

use crate::loaders::{LoadResult, parse_name, read_file};

/// On-disk shape of `config.toml`. Every field is optional and falls back to
/// [`GameConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigToml {
    pub starting_lives: Option<u32>,
    pub max_lives: Option<u32>,
    pub starting_insight: Option<u32>,
    pub starting_research_points: Option<i64>,
    pub failure_penalty: Option<u32>,
    pub rest_heal: Option<u32>,
    /// Grade letter (`"S"`, `"a"`, ...) to reward.
    pub rewards: BTreeMap<String, RewardToml>,
    /// Node type name to whether a failed attempt may be retried.
    pub retryable: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RewardToml {
    pub insight: u32,
    pub research_points: i64,
}

impl ConfigToml {
    pub fn into_config(self) -> LoadResult<GameConfig> {
        let mut config = GameConfig::default();
        config.starting_lives = self.starting_lives.unwrap_or(config.starting_lives);
        config.max_lives = self.max_lives.unwrap_or(config.max_lives);
        config.starting_insight = self.starting_insight.unwrap_or(config.starting_insight);
        config.starting_research_points = self
            .starting_research_points
            .unwrap_or(config.starting_research_points);
        config.failure_penalty = self.failure_penalty.unwrap_or(config.failure_penalty);
        config.rest_heal = self.rest_heal.unwrap_or(config.rest_heal);

        if config.max_lives == 0 {
            anyhow::bail!("max_lives must be at least 1");
        }
        if config.starting_lives > config.max_lives {
            anyhow::bail!(
                "starting_lives ({}) exceeds max_lives ({})",
                config.starting_lives,
                config.max_lives
            );
        }

        for (grade, reward) in self.rewards {
            let grade = parse_name("grade", &grade)?;
            set_reward(&mut config.rewards, grade, reward);
        }
        for (node_type, retryable) in self.retryable {
            let node_type: NodeType = parse_name("node type", &node_type)?;
            let policy = if retryable {
                NodePolicy::RETRYABLE
            } else {
                NodePolicy::SINGLE_ATTEMPT
            };
            config.node_policies.set(node_type, policy);
        }

        Ok(config)
    }
}

fn set_reward(rewards: &mut GradeRewards, grade: Grade, raw: RewardToml) {
    let reward = Reward::new(raw.insight, raw.research_points);
    match grade {
        Grade::S => rewards.s = reward,
        Grade::A => rewards.a = reward,
        Grade::B => rewards.b = reward,
        Grade::C => rewards.c = reward,
    }
}

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing the config
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let raw: ConfigToml = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        raw.into_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(ConfigLoader::parse("").unwrap(), GameConfig::default());
    }

    #[test]
    fn overrides_rewards_and_policies() {
        let config = ConfigLoader::parse(
            r#"
            starting_lives = 2
            rest_heal = 2

            [rewards.s]
            insight = 50
            research_points = 25

            [retryable]
            quiz = false
            boss = true
            "#,
        )
        .unwrap();

        assert_eq!(config.starting_lives, 2);
        assert_eq!(config.rest_heal, 2);
        assert_eq!(config.rewards.s, Reward::new(50, 25));
        assert!(!config.node_policies.is_retryable(NodeType::Quiz));
        assert!(config.node_policies.is_retryable(NodeType::Boss));
    }

    #[test]
    fn rejects_unknown_names_and_bad_lives() {
        let err = ConfigLoader::parse("[retryable]\nlibrary = true").unwrap_err();
        assert!(err.to_string().contains("library"));
        assert!(ConfigLoader::parse("starting_lives = 9\nmax_lives = 3").is_err());
        assert!(ConfigLoader::parse("lives = 3").is_err());
    }
}
