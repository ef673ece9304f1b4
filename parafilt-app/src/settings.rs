//! Run settings (JSON file passed with `--config`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use parafilt_core::{
    tuning::DEFAULT_MAX_THREADS, CandidateSet, CoefficientGenerator, ExecutionMode, FilterSpec,
    RunConfig, RunMode,
};
use serde::{Deserialize, Serialize};

const MAX_THREADS_LIMIT: usize = 256;
const MAX_COEFFICIENT_COUNT: usize = 10_000;
const MAX_NOTCH_ORDER: u32 = 16;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct AppSettings {
    pub mode: String,
    pub execution: String,
    pub max_threads: usize,
    pub output_dir: PathBuf,
    pub seed: u64,
    pub bandpass: BandpassSettings,
    pub notch: NotchSettings,
    pub fir: FirSettings,
    pub iir: IirSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            mode: "parallel".into(),
            execution: "exact".into(),
            max_threads: DEFAULT_MAX_THREADS,
            output_dir: PathBuf::from("."),
            seed: 0,
            bandpass: BandpassSettings::default(),
            notch: NotchSettings::default(),
            fir: FirSettings::default(),
            iir: IirSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct BandpassSettings {
    pub df: f32,
}

impl Default for BandpassSettings {
    fn default() -> Self {
        Self { df: 2.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct NotchSettings {
    pub f0: f32,
    pub order: u32,
}

impl Default for NotchSettings {
    fn default() -> Self {
        Self { f0: 3.0, order: 4 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct FirSettings {
    pub coefficients: CoefficientSettings,
}

impl Default for FirSettings {
    fn default() -> Self {
        Self {
            coefficients: CoefficientSettings::Random {
                low: 0.1,
                high: 10.0,
                step: 0.1,
                count: 100,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct IirSettings {
    pub feedforward: CoefficientSettings,
    pub feedback: CoefficientSettings,
}

impl Default for IirSettings {
    fn default() -> Self {
        Self {
            feedforward: CoefficientSettings::Random {
                low: 0.1,
                high: 1.0,
                step: 0.1,
                count: 100,
            },
            feedback: CoefficientSettings::Random {
                low: -1.0,
                high: 1.0,
                step: 0.1,
                count: 100,
            },
        }
    }
}

/// Either an explicit coefficient list or a quantized random draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CoefficientSettings {
    Fixed {
        values: Vec<f32>,
    },
    Random {
        low: f32,
        high: f32,
        step: f32,
        count: usize,
    },
}

impl CoefficientSettings {
    fn resolve(&self, gen: &mut CoefficientGenerator) -> anyhow::Result<Vec<f32>> {
        match self {
            CoefficientSettings::Fixed { values } => Ok(values.clone()),
            CoefficientSettings::Random {
                low,
                high,
                step,
                count,
            } => Ok(gen.generate(*low, *high, *step, *count)?),
        }
    }

    fn normalize(&mut self) {
        match self {
            CoefficientSettings::Fixed { values } => values.truncate(MAX_COEFFICIENT_COUNT),
            CoefficientSettings::Random { count, .. } => {
                *count = (*count).min(MAX_COEFFICIENT_COUNT);
            }
        }
    }
}

impl AppSettings {
    pub fn normalize(&mut self) {
        self.mode = normalize_mode(&self.mode);
        self.execution = normalize_execution(&self.execution);
        self.max_threads = self.max_threads.clamp(1, MAX_THREADS_LIMIT);
        self.bandpass.df = nonzero_or(self.bandpass.df, BandpassSettings::default().df);
        self.notch.f0 = nonzero_or(self.notch.f0, NotchSettings::default().f0);
        self.notch.order = self.notch.order.min(MAX_NOTCH_ORDER);
        self.fir.coefficients.normalize();
        self.iir.feedforward.normalize();
        self.iir.feedback.normalize();
    }

    pub fn run_mode(&self) -> RunMode {
        match self.mode.as_str() {
            "serial" => RunMode::Serial,
            "concurrent" => RunMode::Concurrent,
            _ => RunMode::Parallel,
        }
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        match self.execution.as_str() {
            "approximate" => ExecutionMode::Approximate,
            _ => ExecutionMode::Exact,
        }
    }

    /// Resolve coefficients and build the core run configuration.
    ///
    /// One generator seeded with `seed` draws FIR, IIR feedforward and IIR
    /// feedback in that order, so a seed always reproduces the same bank.
    pub fn to_run_config(&self) -> anyhow::Result<RunConfig> {
        let mut gen = CoefficientGenerator::from_seed(self.seed);
        let fir = self
            .fir
            .coefficients
            .resolve(&mut gen)
            .context("fir coefficients")?;
        let feedforward = self
            .iir
            .feedforward
            .resolve(&mut gen)
            .context("iir feedforward coefficients")?;
        let feedback = self
            .iir
            .feedback
            .resolve(&mut gen)
            .context("iir feedback coefficients")?;

        Ok(RunConfig {
            mode: self.run_mode(),
            execution: self.execution_mode(),
            candidates: CandidateSet::up_to(self.max_threads)?,
            filters: vec![
                FilterSpec::Bandpass {
                    df: self.bandpass.df,
                },
                FilterSpec::Notch {
                    f0: self.notch.f0,
                    order: self.notch.order,
                },
                FilterSpec::Fir { coefficients: fir },
                FilterSpec::Iir {
                    feedforward,
                    feedback,
                },
            ],
            output_dir: self.output_dir.clone(),
        })
    }
}

pub fn normalize_mode(raw: &str) -> String {
    match raw.trim().to_ascii_lowercase().as_str() {
        "serial" | "sequential" => "serial".into(),
        "concurrent" | "per-filter" | "per_filter" => "concurrent".into(),
        _ => "parallel".into(),
    }
}

pub fn normalize_execution(raw: &str) -> String {
    match raw.trim().to_ascii_lowercase().as_str() {
        "approximate" | "approx" | "fast" => "approximate".into(),
        _ => "exact".into(),
    }
}

fn nonzero_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value != 0.0 {
        value
    } else {
        fallback
    }
}

pub fn load_settings(path: &Path) -> anyhow::Result<AppSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading settings {}", path.display()))?;
    let mut settings: AppSettings = serde_json::from_str(&raw)
        .with_context(|| format!("parsing settings {}", path.display()))?;
    settings.normalize();
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let mut s: AppSettings = serde_json::from_str("{}").unwrap();
        s.normalize();
        assert_eq!(s.run_mode(), RunMode::Parallel);
        assert_eq!(s.execution_mode(), ExecutionMode::Exact);
        assert_eq!(s.max_threads, 100);
        assert_eq!(s.notch.order, 4);

        let config = s.to_run_config().unwrap();
        assert_eq!(config.candidates.len(), 100);
        match &config.filters[2] {
            FilterSpec::Fir { coefficients } => assert_eq!(coefficients.len(), 100),
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn camel_case_fields_and_tagged_coefficients_parse() {
        let raw = r#"{
            "mode": "Sequential",
            "execution": "approx",
            "maxThreads": 8,
            "outputDir": "out",
            "seed": 9,
            "bandpass": { "df": 1.5 },
            "notch": { "f0": 2.0, "order": 2 },
            "fir": { "coefficients": { "kind": "fixed", "values": [0.2, 0.3, 0.5] } },
            "iir": {
                "feedforward": { "kind": "fixed", "values": [0.5, 0.2] },
                "feedback": { "kind": "fixed", "values": [1.0, -0.5] }
            }
        }"#;
        let mut s: AppSettings = serde_json::from_str(raw).unwrap();
        s.normalize();
        let config = s.to_run_config().unwrap();

        assert_eq!(config.mode, RunMode::Serial);
        assert_eq!(config.execution, ExecutionMode::Approximate);
        assert_eq!(config.candidates.as_slice(), &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(
            config.filters,
            vec![
                FilterSpec::Bandpass { df: 1.5 },
                FilterSpec::Notch { f0: 2.0, order: 2 },
                FilterSpec::Fir {
                    coefficients: vec![0.2, 0.3, 0.5]
                },
                FilterSpec::Iir {
                    feedforward: vec![0.5, 0.2],
                    feedback: vec![1.0, -0.5],
                },
            ]
        );
    }

    #[test]
    fn normalize_clamps_and_replaces_degenerate_values() {
        let mut s = AppSettings {
            mode: "  CONCURRENT ".into(),
            execution: "whatever".into(),
            max_threads: 0,
            ..AppSettings::default()
        };
        s.bandpass.df = 0.0;
        s.notch.f0 = f32::NAN;
        s.notch.order = 99;
        s.normalize();

        assert_eq!(s.mode, "concurrent");
        assert_eq!(s.execution, "exact");
        assert_eq!(s.max_threads, 1);
        assert_eq!(s.bandpass.df, 2.0);
        assert_eq!(s.notch.f0, 3.0);
        assert_eq!(s.notch.order, MAX_NOTCH_ORDER);

        s.max_threads = 10_000;
        s.normalize();
        assert_eq!(s.max_threads, MAX_THREADS_LIMIT);
    }

    #[test]
    fn same_seed_reproduces_the_bank() {
        let s = AppSettings {
            seed: 1234,
            ..AppSettings::default()
        };
        let a = s.to_run_config().unwrap();
        let b = s.to_run_config().unwrap();
        assert_eq!(a.filters, b.filters);

        let other = AppSettings {
            seed: 4321,
            ..AppSettings::default()
        };
        assert_ne!(a.filters, other.to_run_config().unwrap().filters);
    }

    #[test]
    fn invalid_random_range_is_an_error() {
        let mut s = AppSettings::default();
        s.fir.coefficients = CoefficientSettings::Random {
            low: 1.0,
            high: 0.0,
            step: 0.1,
            count: 3,
        };
        let err = s.to_run_config().unwrap_err();
        assert!(format!("{err:#}").contains("fir coefficients"));
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let dir = std::env::temp_dir().join(format!("parafilt-settings-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        assert!(load_settings(&dir.join("absent.json")).is_err());

        let bad = dir.join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(load_settings(&bad).is_err());

        let good = dir.join("good.json");
        fs::write(&good, r#"{"maxThreads": 0, "mode": "serial"}"#).unwrap();
        let s = load_settings(&good).unwrap();
        assert_eq!(s.max_threads, 1);
        assert_eq!(s.run_mode(), RunMode::Serial);

        let _ = fs::remove_dir_all(&dir);
    }
}
