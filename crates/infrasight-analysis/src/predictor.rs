use crate::error::{AnalysisError, Result};
use infrasight_common::types::{Channel, SensorRow};

/// Least-squares line fitted over `(index, value)` pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearModel {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearModel {
    /// Fits `y = slope * x + intercept` with `x = 0..n-1`.
    ///
    /// Returns `None` for an empty slice. A single value yields a flat line
    /// through that value.
    ///
    /// ```
    /// use infrasight_analysis::predictor::LinearModel;
    ///
    /// let model = LinearModel::fit(&[1.0, 3.0, 5.0]).unwrap();
    /// assert!((model.slope - 2.0).abs() < 1e-12);
    /// assert!((model.intercept - 1.0).abs() < 1e-12);
    /// ```
    pub fn fit(values: &[f64]) -> Option<Self> {
        match values {
            [] => None,
            [only] => Some(Self {
                slope: 0.0,
                intercept: *only,
            }),
            _ => {
                let n = values.len() as f64;

                let mut sum_x = 0.0;
                let mut sum_y = 0.0;
                let mut sum_xy = 0.0;
                let mut sum_x2 = 0.0;

                for (i, y) in values.iter().enumerate() {
                    let x = i as f64;
                    sum_x += x;
                    sum_y += y;
                    sum_xy += x * y;
                    sum_x2 += x * x;
                }

                // Strictly positive for n >= 2 since x takes distinct values
                let denom = n * sum_x2 - sum_x * sum_x;
                let slope = (n * sum_xy - sum_x * sum_y) / denom;
                let intercept = (sum_y - slope * sum_x) / n;

                Some(Self { slope, intercept })
            }
        }
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Extrapolates one step past the last observation, i.e. evaluates the
/// fitted line at `x = values.len()`.
///
/// # Errors
///
/// [`AnalysisError::InsufficientData`] when `values` is empty,
/// [`AnalysisError::NonFiniteObservation`] when any value is NaN or infinite
/// and [`AnalysisError::NonFinitePrediction`] when the fit overflows.
pub fn predict_next(channel: Channel, values: &[f64]) -> Result<f64> {
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(AnalysisError::NonFiniteObservation { channel, index });
    }
    let model = LinearModel::fit(values).ok_or(AnalysisError::InsufficientData { channel })?;
    let next = model.predict(values.len() as f64);
    if !next.is_finite() {
        return Err(AnalysisError::NonFinitePrediction { channel });
    }
    Ok(next)
}

/// The four per-channel observation sequences, indexed by arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationSet {
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
    pub acceleration: Vec<f64>,
    pub pressure: Vec<f64>,
}

impl ObservationSet {
    /// Splits joined store rows into parallel sequences. Acceleration is the
    /// mean of the three axes of each row.
    pub fn from_rows(rows: &[SensorRow]) -> Self {
        let mut set = Self {
            temperature: Vec::with_capacity(rows.len()),
            humidity: Vec::with_capacity(rows.len()),
            acceleration: Vec::with_capacity(rows.len()),
            pressure: Vec::with_capacity(rows.len()),
        };
        for row in rows {
            set.temperature.push(row.temperature);
            set.humidity.push(row.humidity);
            set.acceleration.push(row.acceleration());
            set.pressure.push(row.pressure);
        }
        set
    }

    pub fn get(&self, channel: Channel) -> &[f64] {
        match channel {
            Channel::Temperature => &self.temperature,
            Channel::Humidity => &self.humidity,
            Channel::Acceleration => &self.acceleration,
            Channel::Pressure => &self.pressure,
        }
    }

    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }
}
