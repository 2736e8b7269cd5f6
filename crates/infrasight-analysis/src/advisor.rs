//! Maps predicted channel values to recommended maintenance actions.
//!
//! Every channel owns a table of [`Band`]s ordered from most to least severe.
//! The first band whose floor is strictly below the value wins; the last band
//! of every table has no floor and catches everything else, so selection is
//! exhaustive.

use infrasight_common::types::{Channel, MeasureSet, PredictionSet};

/// A severity tier: values strictly greater than `above` map to `actions`.
/// `above == None` marks the catch-all band.
#[derive(Debug)]
pub struct Band {
    pub above: Option<f64>,
    pub actions: &'static [&'static str],
}

impl Band {
    fn matches(&self, value: f64) -> bool {
        match self.above {
            Some(floor) => value > floor,
            None => true,
        }
    }
}

pub const TEMPERATURE_BANDS: &[Band] = &[
    Band {
        above: Some(35.0),
        actions: &[
            "1. Implement emergency cooling systems to prevent overheating.",
            "2. Consider retrofitting the structure with advanced cooling technologies like evaporative cooling.",
            "3. Increase insulation to prevent heat penetration in critical areas.",
            "4. Encourage usage of heat-reflective external materials to reduce absorbed heat.",
        ],
    },
    Band {
        above: Some(30.0),
        actions: &[
            "1. Increase ventilation or cooling systems to lower temperatures.",
            "2. Inspect HVAC systems for efficiency and maintenance.",
            "3. Use reflective coatings on roofs to reduce heat absorption.",
            "4. Monitor heat-sensitive equipment or materials that could be affected.",
        ],
    },
    Band {
        above: Some(25.0),
        actions: &[
            "1. Ensure that regular inspections of cooling systems are maintained.",
            "2. Consider natural ventilation methods such as cross-ventilation for moderate heat management.",
        ],
    },
    Band {
        above: Some(20.0),
        actions: &[
            "1. Monitor temperature regularly and adjust HVAC settings as needed.",
            "2. Schedule periodic maintenance for insulation and sealing.",
            "3. Avoid overcooling to maintain energy efficiency.",
        ],
    },
    Band {
        above: Some(10.0),
        actions: &[
            "1. Insulate to maintain warmth and prevent freezing.",
            "2. Use space heaters in critical areas to ensure temperature stability.",
            "3. Inspect for possible heat loss through windows and doors.",
        ],
    },
    Band {
        above: None,
        actions: &[
            "1. Apply heavy insulation to maintain indoor warmth and prevent freezing.",
            "2. Ensure all heating systems are functioning optimally to avoid freezing risks.",
            "3. Check for ice formation in cold storage or structural areas.",
        ],
    },
];

pub const HUMIDITY_BANDS: &[Band] = &[
    Band {
        above: Some(80.0),
        actions: &[
            "1. Install industrial dehumidifiers to prevent condensation and mold growth.",
            "2. Conduct moisture testing to ensure the building envelope remains intact.",
            "3. Inspect for potential mold growth and address it immediately.",
            "4. Seal any significant cracks or breaches where humidity may enter.",
        ],
    },
    Band {
        above: Some(70.0),
        actions: &[
            "1. Use dehumidifiers to reduce moisture levels.",
            "2. Improve drainage around the building to prevent water accumulation.",
            "3. Inspect and seal leaks in roofs, windows, and doors.",
            "4. Use moisture-resistant materials in high-risk areas.",
        ],
    },
    Band {
        above: Some(50.0),
        actions: &[
            "1. Install adequate ventilation to prevent excess humidity.",
            "2. Ensure air conditioning systems are properly maintained to manage humidity.",
            "3. Perform inspections for moisture build-up in poorly ventilated areas.",
        ],
    },
    Band {
        above: Some(40.0),
        actions: &[
            "1. Monitor humidity levels and adjust HVAC settings accordingly.",
            "2. Ensure proper ventilation in high-moisture areas like kitchens and bathrooms.",
            "3. Inspect insulation for signs of moisture retention.",
        ],
    },
    Band {
        above: Some(20.0),
        actions: &[
            "1. Use humidifiers to maintain moisture levels.",
            "2. Consider introducing indoor plants to naturally increase humidity.",
            "3. Check for and address any signs of cracking or splitting in materials.",
        ],
    },
    Band {
        above: None,
        actions: &[
            "1. Take additional measures to prevent air becoming too dry by adjusting HVAC settings.",
            "2. Introduce evaporative humidification systems if needed.",
            "3. Address any potential impact of low humidity on sensitive materials like wood.",
        ],
    },
];

pub const ACCELERATION_BANDS: &[Band] = &[
    Band {
        above: Some(1.5),
        actions: &[
            "1. Perform emergency structural assessments to prevent collapse.",
            "2. Reinforce or retrofit areas subject to high stress or shifting.",
            "3. Engage specialists to conduct seismic assessments if located in a seismic zone.",
            "4. Implement vibration-damping techniques like shock absorbers or isolation pads.",
        ],
    },
    Band {
        above: Some(1.0),
        actions: &[
            "1. Conduct structural inspections for potential shifting or displacement.",
            "2. Use accelerometers to continuously monitor vibration levels.",
            "3. Reinforce structural elements that are subject to high stresses.",
            "4. Investigate surrounding activities (construction, heavy machinery) as potential vibration sources.",
        ],
    },
    Band {
        above: Some(0.5),
        actions: &[
            "1. Regularly monitor and ensure no sudden changes occur that might indicate structural issues.",
            "2. Maintain a log of any previous measurements for comparison.",
            "3. Assess the need for localized damping systems to minimize vibrations.",
        ],
    },
    Band {
        above: None,
        actions: &[
            "1. Conduct routine inspections but no immediate action needed.",
            "2. Ensure that vibrations from nearby sources (traffic, machinery) are monitored.",
            "3. Keep a periodic vibration log for reference in case of future anomalies.",
        ],
    },
];

pub const PRESSURE_BANDS: &[Band] = &[
    Band {
        above: Some(150.0),
        actions: &[
            "1. Evaluate emergency support mechanisms for load-bearing structures.",
            "2. Perform thorough inspections of foundations for signs of cracking or stress.",
            "3. Consider redistributing loads or reducing heavy equipment use in certain areas.",
            "4. Consult with structural engineers for reinforcements or repairs.",
        ],
    },
    Band {
        above: Some(100.0),
        actions: &[
            "1. Inspect load-bearing elements for signs of stress.",
            "2. Perform regular checks on foundations and structural integrity.",
            "3. Evaluate load distribution and consider reinforcing areas under high pressure.",
        ],
    },
    Band {
        above: Some(70.0),
        actions: &[
            "1. Ensure that structures are not overloading and plan for weight distribution.",
            "2. Review plans for additional support structures if necessary.",
        ],
    },
    Band {
        above: None,
        actions: &[
            "1. Assess whether the structure is underutilized and if load redistribution is needed.",
            "2. Consider plans for expansion if capacity is not being utilized.",
        ],
    },
];

/// The band table for `channel`, most severe first.
pub fn bands(channel: Channel) -> &'static [Band] {
    match channel {
        Channel::Temperature => TEMPERATURE_BANDS,
        Channel::Humidity => HUMIDITY_BANDS,
        Channel::Acceleration => ACCELERATION_BANDS,
        Channel::Pressure => PRESSURE_BANDS,
    }
}

/// Position of the matching band in [`bands`]; `0` is the most severe.
///
/// NaN matches no floor and lands in the catch-all band.
pub fn band_index(channel: Channel, value: f64) -> usize {
    let table = bands(channel);
    table
        .iter()
        .position(|band| band.matches(value))
        .unwrap_or(table.len() - 1)
}

/// Recommended actions for one channel's predicted value.
///
/// ```
/// use infrasight_analysis::advisor::channel_measures;
/// use infrasight_common::types::Channel;
///
/// let actions = channel_measures(Channel::Temperature, 26.0);
/// assert_eq!(actions.len(), 2);
/// assert!(actions[0].starts_with("1. "));
/// ```
pub fn channel_measures(channel: Channel, value: f64) -> &'static [&'static str] {
    bands(channel)[band_index(channel, value)].actions
}

/// Builds the full measure set for a prediction set.
pub fn advise(predictions: &PredictionSet) -> MeasureSet {
    let mut measures = MeasureSet::default();
    for channel in Channel::ALL {
        *measures.get_mut(channel) = channel_measures(channel, predictions.get(channel))
            .iter()
            .map(|s| (*s).to_string())
            .collect();
    }
    measures
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(channel: Channel) -> Vec<usize> {
        bands(channel).iter().map(|b| b.actions.len()).collect()
    }

    fn floors(channel: Channel) -> Vec<Option<f64>> {
        bands(channel).iter().map(|b| b.above).collect()
    }

    #[test]
    fn tables_have_expected_edges_and_sizes() {
        assert_eq!(
            floors(Channel::Temperature),
            vec![Some(35.0), Some(30.0), Some(25.0), Some(20.0), Some(10.0), None]
        );
        assert_eq!(counts(Channel::Temperature), vec![4, 4, 2, 3, 3, 3]);

        assert_eq!(
            floors(Channel::Humidity),
            vec![Some(80.0), Some(70.0), Some(50.0), Some(40.0), Some(20.0), None]
        );
        assert_eq!(counts(Channel::Humidity), vec![4, 4, 3, 3, 3, 3]);

        assert_eq!(
            floors(Channel::Acceleration),
            vec![Some(1.5), Some(1.0), Some(0.5), None]
        );
        assert_eq!(counts(Channel::Acceleration), vec![4, 4, 3, 3]);

        assert_eq!(
            floors(Channel::Pressure),
            vec![Some(150.0), Some(100.0), Some(70.0), None]
        );
        assert_eq!(counts(Channel::Pressure), vec![4, 3, 2, 2]);
    }

    #[test]
    fn actions_are_numbered_in_order() {
        for channel in Channel::ALL {
            for band in bands(channel) {
                assert!(!band.actions.is_empty());
                for (i, action) in band.actions.iter().enumerate() {
                    assert!(
                        action.starts_with(&format!("{}. ", i + 1)),
                        "{channel}: {action}"
                    );
                }
            }
        }
    }

    #[test]
    fn band_edges_are_strict() {
        assert_eq!(band_index(Channel::Temperature, 35.0), 1);
        assert_eq!(band_index(Channel::Temperature, 35.0001), 0);
        assert_eq!(band_index(Channel::Humidity, 20.0), 5);
        assert_eq!(band_index(Channel::Acceleration, 1.0), 2);
        assert_eq!(band_index(Channel::Acceleration, 0.5), 3);
        assert_eq!(band_index(Channel::Pressure, 70.0), 3);
        assert_eq!(band_index(Channel::Pressure, 100.5), 1);
    }

    #[test]
    fn band_selection_is_monotonic() {
        for channel in Channel::ALL {
            let mut previous = usize::MAX;
            let mut value = -50.0;
            while value < 400.0 {
                let idx = band_index(channel, value);
                assert!(idx < bands(channel).len());
                assert!(idx <= previous, "{channel} moved to a milder band at {value}");
                previous = idx;
                value += 0.05;
            }
        }
    }

    #[test]
    fn extreme_and_nan_values_still_match_a_band() {
        for channel in Channel::ALL {
            let last = bands(channel).len() - 1;
            assert_eq!(band_index(channel, f64::NEG_INFINITY), last);
            assert_eq!(band_index(channel, f64::NAN), last);
            assert_eq!(band_index(channel, f64::INFINITY), 0);
        }
    }

    #[test]
    fn advise_is_deterministic() {
        let predictions = PredictionSet {
            temperature: 31.2,
            humidity: 85.0,
            acceleration: 1.0,
            pressure: 336.0,
        };
        let first = advise(&predictions);
        let second = advise(&predictions);
        assert_eq!(first, second);
        assert_eq!(first.temperature.len(), 4);
        assert_eq!(
            first.temperature[0],
            "1. Increase ventilation or cooling systems to lower temperatures."
        );
        assert_eq!(first.humidity.len(), 4);
        assert_eq!(first.acceleration.len(), 3);
        assert_eq!(first.pressure.len(), 4);
    }
}
