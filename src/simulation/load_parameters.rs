// src/simulation/load_parameters.rs

use std::fs::File;
use std::path::Path;

use serde_yaml::from_reader;

use crate::config::{ConfigError, Scenario};

/// シナリオの読み込み
///
/// 省略された項目は既定値で補う。検証は行わないので、
/// 実行前に `Scenario::validate` を通すこと。
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<Scenario, ConfigError> {
    let file = File::open(path)?;
    let scenario: Scenario = from_reader(file)?;
    Ok(scenario)
}

/// YAML 文字列からシナリオを読み込む
pub fn parse_scenario(yaml: &str) -> Result<Scenario, ConfigError> {
    let scenario: Scenario = serde_yaml::from_str(yaml)?;
    Ok(scenario)
}
