use serde::{Deserialize, Serialize};

use super::Validate;
use crate::grid::GRID_SIZE;

pub const CONFIG_FILE_NAME: &str = "matrix_snake_config.yaml";
const HIGH_SCORE_FILE_NAME: &str = "matrix_snake_high_score.yaml";

const MIN_GRID_SIZE: i32 = 10;
const MAX_GRID_SIZE: i32 = 40;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_grid_size")]
    pub grid_size: i32,
    #[serde(default = "default_high_score_file")]
    pub high_score_file: String,
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default = "default_matrix_rain")]
    pub matrix_rain: bool,
}

fn default_grid_size() -> i32 {
    GRID_SIZE
}

fn default_high_score_file() -> String {
    HIGH_SCORE_FILE_NAME.to_string()
}

fn default_matrix_rain() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            high_score_file: default_high_score_file(),
            log_file: None,
            matrix_rain: default_matrix_rain(),
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<(), String> {
        if self.grid_size < MIN_GRID_SIZE || self.grid_size > MAX_GRID_SIZE {
            return Err(format!(
                "Grid size must be between {} and {}",
                MIN_GRID_SIZE, MAX_GRID_SIZE
            ));
        }
        if self.high_score_file.trim().is_empty() {
            return Err("High score file must not be empty".to_string());
        }
        if let Some(log_file) = &self.log_file {
            if log_file.trim().is_empty() {
                return Err("Log file must not be empty when set".to_string());
            }
        }
        Ok(())
    }
}
