use serde::{Deserialize, Serialize};

/// A named predicate over the host simulation snapshot.
///
/// Conditions gate the start of a storyline or entry into a chapter. All
/// conditions in a list are ANDed; an empty list is vacuously satisfied.
/// `WeeksAfterPrevious` is only meaningful on chapter entry, where it is
/// measured from the moment the chapter became pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TriggerCondition {
    CashRange {
        #[serde(default)]
        min: Option<i64>,
        #[serde(default)]
        max: Option<i64>,
    },
    ReputationRange {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    YearRange {
        #[serde(default)]
        min: Option<u32>,
        #[serde(default)]
        max: Option<u32>,
    },
    StudioValueRange {
        #[serde(default)]
        min: Option<i64>,
        #[serde(default)]
        max: Option<i64>,
    },
    /// Exact-year gate for historical storylines.
    YearExact { year: u32 },
    /// Does any produced film reach this quality?
    AnyFilmQualityAtLeast { quality: f64 },
    /// Is any talent under contract at or above this star power?
    AnyContractStarPowerAtLeast { star_power: f64 },
    /// Are at least `count` contracts at or above this star power?
    ContractsWithStarPowerAtLeast { star_power: f64, count: usize },
    /// Elapsed weeks since the chapter became pending.
    WeeksAfterPrevious { weeks: u32 },
}

impl TriggerCondition {
    /// True for the time-elapsed gate, which has no meaning at storyline
    /// level and is rejected there by catalog validation.
    pub fn is_time_gate(&self) -> bool {
        matches!(self, Self::WeeksAfterPrevious { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_gate_classification() {
        assert!(TriggerCondition::WeeksAfterPrevious { weeks: 4 }.is_time_gate());
        assert!(!TriggerCondition::YearExact { year: 1934 }.is_time_gate());
        assert!(!TriggerCondition::CashRange {
            min: Some(1000),
            max: None
        }
        .is_time_gate());
    }

    #[test]
    fn ron_round_trip() {
        let condition = TriggerCondition::ContractsWithStarPowerAtLeast {
            star_power: 70.0,
            count: 2,
        };
        let serialized = ron::to_string(&condition).unwrap();
        let deserialized: TriggerCondition = ron::from_str(&serialized).unwrap();
        assert_eq!(deserialized, condition);
    }

    #[test]
    fn ron_defaults_for_open_ranges() {
        let condition: TriggerCondition = ron::from_str("CashRange(min: Some(25000))").unwrap();
        assert_eq!(
            condition,
            TriggerCondition::CashRange {
                min: Some(25000),
                max: None
            }
        );
    }
}
