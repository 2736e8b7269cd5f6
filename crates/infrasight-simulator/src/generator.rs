//! Synthetic sensor readings.
//!
//! Motion readings scatter around a resting accelerometer (x and y at 0 g,
//! z at 1 g) with a uniform spread of `AXIS_SPREAD`, and a fixed pressure.
//! Scenarios add a per-step linear drift on top so the predictor extrapolates
//! past the alert thresholds.

use anyhow::{bail, Result};
use infrasight_common::types::{NewClimateReading, NewMotionReading};
use rand::rngs::StdRng;
use rand::Rng;

pub const AXIS_SPREAD: f64 = 0.1;
pub const RESTING_PRESSURE: f64 = 336.0;

const BASE_TEMPERATURE: f64 = 22.0;
const BASE_HUMIDITY: f64 = 45.0;
const TEMPERATURE_JITTER: f64 = 0.5;
const HUMIDITY_JITTER: f64 = 2.0;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scenario {
    Baseline,
    Heat,
    Humid,
    Vibration,
    Overload,
    All,
}

impl Scenario {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "baseline" => Ok(Self::Baseline),
            "heat" => Ok(Self::Heat),
            "humid" => Ok(Self::Humid),
            "vibration" => Ok(Self::Vibration),
            "overload" => Ok(Self::Overload),
            "all" => Ok(Self::All),
            _ => bail!("unknown scenario: {value}"),
        }
    }

    pub fn names() -> &'static [&'static str] {
        &["all", "baseline", "heat", "humid", "vibration", "overload"]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Heat => "heat",
            Self::Humid => "humid",
            Self::Vibration => "vibration",
            Self::Overload => "overload",
            Self::All => "all",
        }
    }

    /// Per-step increase applied on top of the resting values.
    fn drift(self) -> Drift {
        match self {
            Self::Baseline | Self::All => Drift::default(),
            Self::Heat => Drift {
                temperature: 0.6,
                ..Drift::default()
            },
            Self::Humid => Drift {
                humidity: 1.8,
                ..Drift::default()
            },
            Self::Vibration => Drift {
                accel_z: 0.05,
                ..Drift::default()
            },
            Self::Overload => Drift {
                temperature: 0.6,
                humidity: 1.8,
                accel_z: 0.05,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Drift {
    temperature: f64,
    humidity: f64,
    accel_z: f64,
}

/// One paired climate/motion sample.
#[derive(Clone, Debug)]
pub struct Sample {
    pub scenario: Scenario,
    pub step: usize,
    pub climate: NewClimateReading,
    pub motion: NewMotionReading,
}

fn jitter(rng: &mut StdRng, spread: f64) -> f64 {
    spread * rng.gen_range(-1.0..=1.0)
}

fn sample(rng: &mut StdRng, scenario: Scenario, step: usize) -> Sample {
    let drift = scenario.drift();
    let t = step as f64;
    Sample {
        scenario,
        step,
        climate: NewClimateReading {
            temperature: BASE_TEMPERATURE + drift.temperature * t + jitter(rng, TEMPERATURE_JITTER),
            humidity: BASE_HUMIDITY + drift.humidity * t + jitter(rng, HUMIDITY_JITTER),
        },
        motion: NewMotionReading {
            accel_x: jitter(rng, AXIS_SPREAD),
            accel_y: jitter(rng, AXIS_SPREAD),
            accel_z: 1.0 + drift.accel_z * t + jitter(rng, AXIS_SPREAD),
            pressure: RESTING_PRESSURE,
        },
    }
}

/// `count` samples per scenario; `All` runs every concrete scenario in turn.
pub fn generate(rng: &mut StdRng, scenario: Scenario, count: usize) -> Vec<Sample> {
    let scenarios = match scenario {
        Scenario::All => vec![
            Scenario::Baseline,
            Scenario::Heat,
            Scenario::Humid,
            Scenario::Vibration,
            Scenario::Overload,
        ],
        single => vec![single],
    };

    scenarios
        .into_iter()
        .flat_map(|s| (0..count).map(move |step| (s, step)))
        .map(|(s, step)| sample(rng, s, step))
        .collect()
}
