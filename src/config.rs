//! Runtime configuration.
//!
//! Loaded from defaults, then `bus-routes.toml` in the working directory when present,
//! then `BUS_ROUTES_*` environment variables.

use crate::error::{Error, Result};
use crate::render::RenderOptions;
use crate::solver::ProcessSolver;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "bus-routes.toml";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub solver: SolverConfig,
    pub render: RenderOptions,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            program: "java".to_string(),
            args: vec!["BusRoutes".to_string()],
        }
    }
}

impl SolverConfig {
    pub fn process(&self) -> ProcessSolver {
        ProcessSolver::new(self.program.clone(), self.args.clone())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the config file and environment variables
    pub fn load() -> Result<Self> {
        let mut config = if Path::new(CONFIG_FILE).is_file() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Config::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| Error::config(format!("Failed to parse config file: {}", e)))
    }

    /// Apply overrides from a variable lookup, normally the process environment
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(command) = var("BUS_ROUTES_SOLVER") {
            let mut words = command.split_whitespace().map(str::to_string);
            self.solver.program = words
                .next()
                .ok_or_else(|| Error::config("BUS_ROUTES_SOLVER is empty"))?;
            self.solver.args = words.collect();
        }

        if let Some(output) = var("BUS_ROUTES_OUTPUT") {
            self.render.output = PathBuf::from(output);
        }

        if let Some(seed) = var("BUS_ROUTES_SEED") {
            self.render.seed = Some(
                seed.trim()
                    .parse()
                    .map_err(|e| Error::config(format!("Invalid layout seed: {}", e)))?,
            );
        }

        if let Some(level) = var("BUS_ROUTES_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.solver.program.trim().is_empty() {
            return Err(Error::config("solver program must not be empty"));
        }
        if self.render.output.as_os_str().is_empty() {
            return Err(Error::config("output path must not be empty"));
        }
        if self.render.width == 0 || self.render.height == 0 {
            return Err(Error::config("canvas width and height must be positive"));
        }
        if !(self.render.scale.is_finite() && self.render.scale > 0.0) {
            return Err(Error::config("render scale must be a positive number"));
        }
        Ok(())
    }
}
