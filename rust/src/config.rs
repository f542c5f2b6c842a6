//! Configuration types for the scheduling engine.

use chrono::NaiveDate;
use pyo3::prelude::*;
use std::str::FromStr;

use crate::error::ScheduleError;

/// Rule deciding which tasks belong to the critical path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CriticalPathTest {
    /// A task is critical when its earliest start equals its earliest finish,
    /// i.e. it has zero expected duration. No backward pass is run.
    #[default]
    ZeroDuration,
    /// A task is critical when its total slack (latest start - earliest start) is zero.
    TotalSlack,
}

impl CriticalPathTest {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZeroDuration => "zero_duration",
            Self::TotalSlack => "total_slack",
        }
    }
}

impl FromStr for CriticalPathTest {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero_duration" => Ok(Self::ZeroDuration),
            "total_slack" => Ok(Self::TotalSlack),
            other => Err(ScheduleError::UnknownCriticalPathTest(other.to_string())),
        }
    }
}

/// Configuration for one scheduling run.
#[pyclass]
#[derive(Clone, Debug)]
pub struct ScheduleConfig {
    /// Critical path test: "zero_duration" or "total_slack"
    #[pyo3(get, set)]
    pub critical_path_test: String,
    /// Verbosity level: 0=silent, 1=summary, 2=phases, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
    /// Calendar day that time 0 maps to; enables date projection when set.
    #[pyo3(get, set)]
    pub project_start: Option<NaiveDate>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            critical_path_test: CriticalPathTest::default().as_str().to_string(),
            verbosity: 0,
            project_start: None,
        }
    }
}

impl ScheduleConfig {
    pub fn with_test(test: CriticalPathTest) -> Self {
        Self {
            critical_path_test: test.as_str().to_string(),
            ..Self::default()
        }
    }

    pub fn parsed_test(&self) -> Result<CriticalPathTest, ScheduleError> {
        self.critical_path_test.parse()
    }
}

#[pymethods]
impl ScheduleConfig {
    #[new]
    #[pyo3(signature = (critical_path_test=None, verbosity=None, project_start=None))]
    fn new(
        critical_path_test: Option<String>,
        verbosity: Option<u8>,
        project_start: Option<NaiveDate>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            critical_path_test: critical_path_test.unwrap_or(defaults.critical_path_test),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
            project_start,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduleConfig(critical_path_test={:?}, verbosity={}, project_start={:?})",
            self.critical_path_test, self.verbosity, self.project_start
        )
    }
}
