use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One of the four monitored sensor channels.
///
/// # Examples
///
/// ```
/// use infrasight_common::types::Channel;
///
/// let ch: Channel = "humidity".parse().unwrap();
/// assert_eq!(ch, Channel::Humidity);
/// assert_eq!(ch.to_string(), "humidity");
/// assert_eq!(ch.unit(), "%");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Temperature,
    Humidity,
    Acceleration,
    Pressure,
}

impl Channel {
    /// All channels in report order.
    pub const ALL: [Channel; 4] = [
        Channel::Temperature,
        Channel::Humidity,
        Channel::Acceleration,
        Channel::Pressure,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Temperature => "temperature",
            Channel::Humidity => "humidity",
            Channel::Acceleration => "acceleration",
            Channel::Pressure => "pressure",
        }
    }

    /// Unit suffix appended to values in alert messages.
    pub fn unit(self) -> &'static str {
        match self {
            Channel::Temperature => "°C",
            Channel::Humidity => "%",
            Channel::Acceleration | Channel::Pressure => "",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "temperature" => Ok(Channel::Temperature),
            "humidity" => Ok(Channel::Humidity),
            "acceleration" => Ok(Channel::Acceleration),
            "pressure" => Ok(Channel::Pressure),
            _ => Err(format!("unknown channel: {s}")),
        }
    }
}

/// A temperature/humidity reading (`tdata` row).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClimateReading {
    /// Shared row identifier, joined against [`MotionReading::id`]
    pub id: i64,
    /// Inner temperature (°C)
    pub temperature: f64,
    /// Inner relative humidity (%)
    pub humidity: f64,
    pub recorded_at: DateTime<Utc>,
}

/// An accelerometer/pressure reading (`adata` row).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MotionReading {
    pub id: i64,
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,
    pub pressure: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Largest absolute value accepted for any ingested reading. Keeps the
/// least-squares sums far from `f64` overflow.
pub const MAX_READING_MAGNITUDE: f64 = 1.0e9;

fn first_out_of_range(fields: &[(&'static str, f64)]) -> Option<&'static str> {
    fields
        .iter()
        .find(|(_, v)| !v.is_finite() || v.abs() > MAX_READING_MAGNITUDE)
        .map(|(name, _)| *name)
}

/// Request body for ingesting a climate reading.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewClimateReading {
    /// Temperature (°C)
    pub temperature: f64,
    /// Relative humidity (%)
    pub humidity: f64,
}

impl NewClimateReading {
    /// Name of the first field that is not finite or exceeds
    /// [`MAX_READING_MAGNITUDE`].
    pub fn out_of_range_field(&self) -> Option<&'static str> {
        first_out_of_range(&[("temperature", self.temperature), ("humidity", self.humidity)])
    }
}

/// Request body for ingesting an accelerometer/pressure reading.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewMotionReading {
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,
    pub pressure: f64,
}

impl NewMotionReading {
    /// Name of the first field that is not finite or exceeds
    /// [`MAX_READING_MAGNITUDE`].
    pub fn out_of_range_field(&self) -> Option<&'static str> {
        first_out_of_range(&[
            ("accel_x", self.accel_x),
            ("accel_y", self.accel_y),
            ("accel_z", self.accel_z),
            ("pressure", self.pressure),
        ])
    }
}

/// One row of the climate/motion join, in store order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorRow {
    pub temperature: f64,
    pub humidity: f64,
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,
    pub pressure: f64,
}

impl SensorRow {
    /// Mean of the three accelerometer axes.
    ///
    /// ```
    /// use infrasight_common::types::SensorRow;
    ///
    /// let row = SensorRow {
    ///     temperature: 21.0,
    ///     humidity: 40.0,
    ///     accel_x: 0.0,
    ///     accel_y: 0.3,
    ///     accel_z: 1.2,
    ///     pressure: 336.0,
    /// };
    /// assert!((row.acceleration() - 0.5).abs() < 1e-12);
    /// ```
    pub fn acceleration(&self) -> f64 {
        (self.accel_x + self.accel_y + self.accel_z) / 3.0
    }
}

/// One extrapolated value per channel for a single analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PredictionSet {
    pub temperature: f64,
    pub humidity: f64,
    pub acceleration: f64,
    pub pressure: f64,
}

impl PredictionSet {
    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Temperature => self.temperature,
            Channel::Humidity => self.humidity,
            Channel::Acceleration => self.acceleration,
            Channel::Pressure => self.pressure,
        }
    }
}

/// One recommended-action list per channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MeasureSet {
    pub temperature: Vec<String>,
    pub humidity: Vec<String>,
    pub acceleration: Vec<String>,
    pub pressure: Vec<String>,
}

impl MeasureSet {
    pub fn get(&self, channel: Channel) -> &[String] {
        match channel {
            Channel::Temperature => &self.temperature,
            Channel::Humidity => &self.humidity,
            Channel::Acceleration => &self.acceleration,
            Channel::Pressure => &self.pressure,
        }
    }

    pub fn get_mut(&mut self, channel: Channel) -> &mut Vec<String> {
        match channel {
            Channel::Temperature => &mut self.temperature,
            Channel::Humidity => &mut self.humidity,
            Channel::Acceleration => &mut self.acceleration,
            Channel::Pressure => &mut self.pressure,
        }
    }
}

/// A persisted predictive-maintenance run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MaintenanceRecord {
    pub id: String,
    pub predictions: PredictionSet,
    pub measures: MeasureSet,
    /// Identity of the requester (an email address for logged-in users)
    pub requested_by: String,
    pub timestamp: DateTime<Utc>,
}

/// An alert to be delivered to a single recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub channel: Channel,
    pub value: f64,
    pub threshold: f64,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_round_trips_through_str() {
        for ch in Channel::ALL {
            let parsed: Channel = ch.to_string().parse().unwrap();
            assert_eq!(parsed, ch);
        }
        assert!("vibration".parse::<Channel>().is_err());
    }

    #[test]
    fn channel_serializes_lowercase() {
        let json = serde_json::to_string(&Channel::Acceleration).unwrap();
        assert_eq!(json, "\"acceleration\"");
    }

    #[test]
    fn measure_set_get_mut_targets_channel() {
        let mut set = MeasureSet::default();
        set.get_mut(Channel::Pressure).push("1. check".into());
        assert_eq!(set.pressure, vec!["1. check".to_string()]);
        assert!(set.get(Channel::Temperature).is_empty());
    }

    #[test]
    fn out_of_range_readings_name_the_field() {
        let ok = NewClimateReading {
            temperature: 21.0,
            humidity: -MAX_READING_MAGNITUDE,
        };
        assert_eq!(ok.out_of_range_field(), None);

        let huge = NewClimateReading {
            temperature: 21.0,
            humidity: 1.0e308,
        };
        assert_eq!(huge.out_of_range_field(), Some("humidity"));

        let motion = NewMotionReading {
            accel_x: 0.0,
            accel_y: f64::NAN,
            accel_z: 1.0e10,
            pressure: 336.0,
        };
        assert_eq!(motion.out_of_range_field(), Some("accel_y"));
    }
}
