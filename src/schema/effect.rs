use serde::{Deserialize, Serialize};

/// A dynamic value stored in instance variables and contract terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Float(f64),
    Int(i64),
    Bool(bool),
}

impl Value {
    /// Numeric reading of this value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Plain text rendering, used by the template pass.
    pub fn display(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Float(f) => {
                if f.fract() == 0.0 {
                    format!("{}", *f as i64)
                } else {
                    format!("{}", f)
                }
            }
            Self::Int(i) => i.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

/// A single state delta applied when a chapter, choice, or outcome branch
/// fires. Effects that don't touch engine-owned scalars are recorded as
/// instance variables for the host (and later chapters) to read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Add to studio cash; negative amounts spend.
    AdjustCash { amount: i64 },
    /// Add to studio reputation; the result is clamped to [0, 100].
    AdjustReputation { amount: f64 },
    /// Fire-and-forget unlock through the achievement port.
    UnlockAchievement { key: String },
    /// Record a contract term the host is expected to honor
    /// (e.g. field "contract.years", value 5).
    GrantContractTerm { field: String, value: Value },
    /// Record that the storyline's featured talent has left the studio.
    MarkActorLost,
    /// Record a free-form variable for later chapters to branch on.
    SetVariable { key: String, value: Value },
}

impl Effect {
    /// The variable this effect records, if any. The runtime copies captures
    /// into the instance's variable map with first-write-wins semantics.
    pub fn variable_capture(&self) -> Option<(&str, Value)> {
        match self {
            Self::AdjustCash { amount } => Some(("cash", Value::Int(*amount))),
            Self::AdjustReputation { amount } => Some(("reputation", Value::Float(*amount))),
            Self::UnlockAchievement { .. } => None,
            Self::GrantContractTerm { field, value } => Some((field.as_str(), value.clone())),
            Self::MarkActorLost => Some(("actor_lost", Value::Bool(true))),
            Self::SetVariable { key, value } => Some((key.as_str(), value.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_as_f64() {
        assert_eq!(Value::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert_eq!(Value::Bool(true).as_f64(), None);
        assert_eq!(Value::String("x".to_string()).as_f64(), None);
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::String("Vivien".to_string()).display(), "Vivien");
        assert_eq!(Value::Int(25000).display(), "25000");
        assert_eq!(Value::Float(5.0).display(), "5");
        assert_eq!(Value::Float(0.75).display(), "0.75");
        assert_eq!(Value::Bool(false).display(), "false");
    }

    #[test]
    fn cash_capture() {
        let effect = Effect::AdjustCash { amount: -25_000 };
        assert_eq!(effect.variable_capture(), Some(("cash", Value::Int(-25_000))));
    }

    #[test]
    fn achievement_has_no_capture() {
        let effect = Effect::UnlockAchievement {
            key: "star_maker".to_string(),
        };
        assert_eq!(effect.variable_capture(), None);
    }

    #[test]
    fn contract_term_capture_uses_field_as_key() {
        let effect = Effect::GrantContractTerm {
            field: "contract.years".to_string(),
            value: Value::Int(5),
        };
        assert_eq!(
            effect.variable_capture(),
            Some(("contract.years", Value::Int(5)))
        );
    }

    #[test]
    fn actor_lost_capture() {
        assert_eq!(
            Effect::MarkActorLost.variable_capture(),
            Some(("actor_lost", Value::Bool(true)))
        );
    }

    #[test]
    fn set_variable_capture() {
        let effect = Effect::SetVariable {
            key: "starRisk".to_string(),
            value: Value::Float(0.6),
        };
        assert_eq!(
            effect.variable_capture(),
            Some(("starRisk", Value::Float(0.6)))
        );
    }
}
