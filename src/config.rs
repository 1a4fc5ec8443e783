use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub planning: PlanningConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// Number of planning trials for a pose goal; the best result is kept.
    pub point_n_step: u32,
    /// Maximum Cartesian interpolation step in meters.
    pub eef_step: f64,
    /// Maximum allowed joint-space discontinuity between interpolation steps.
    pub jump_threshold: f64,
    /// Algorithm identifier passed to the planning backend.
    pub planner_id: String,
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.planning.point_n_step == 0 {
            bail!("planning.point_n_step must be positive");
        }
        if self.planning.eef_step <= 0.0 {
            bail!("planning.eef_step must be positive");
        }
        if self.planning.jump_threshold <= 0.0 {
            bail!("planning.jump_threshold must be positive");
        }
        if self.planning.planner_id.is_empty() {
            bail!("planning.planner_id must not be empty");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            planning: PlanningConfig {
                point_n_step: 5,
                eef_step: 0.01,
                jump_threshold: 1.2,
                planner_id: "RRTConnectkConfigDefault".to_string(),
            },
        }
    }
}
