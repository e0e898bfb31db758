use serde::{Deserialize, Serialize};

use super::condition::TriggerCondition;
use super::effect::Effect;

/// Broad grouping used by the host for sorting and iconography.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Talent,
    Production,
    Business,
    Historical,
}

impl Category {
    /// Returns the tag string for this category (e.g., "category:talent").
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Talent => "category:talent",
            Self::Production => "category:production",
            Self::Business => "category:business",
            Self::Historical => "category:historical",
        }
    }
}

/// A user-facing prompt: title plus templated body text.
///
/// The body may reference `{CASH}`, `{REPUTATION}`, `{YEAR}`, `{ACTOR}` or
/// any instance variable; substitution happens at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modal {
    pub title: String,
    pub body: String,
}

/// One selectable option presented to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    #[serde(default)]
    pub cost: i64,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub next_chapter: Option<String>,
}

/// One side of a conditional outcome. Its modal text is appended to the
/// chapter's own modal, not substituted for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeBranch {
    #[serde(default)]
    pub modal: Option<Modal>,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub next_chapter: Option<String>,
}

fn default_probability() -> f64 {
    0.5
}

/// How a conditional outcome decides between its branches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutcomeCondition {
    /// Sample a literal probability once on chapter entry.
    Random {
        #[serde(default = "default_probability")]
        probability: f64,
    },
    /// Read a stored instance variable; numeric values are sampled as a
    /// probability, booleans short-circuit the branch.
    Variable { name: String },
}

/// A chance- or state-driven binary branch resolved automatically on
/// chapter entry. Exactly one branch is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalOutcome {
    pub condition: OutcomeCondition,
    #[serde(default)]
    pub on_success: OutcomeBranch,
    #[serde(default)]
    pub on_failure: OutcomeBranch,
}

/// One node in a storyline's narrative graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Entry gate, re-checked every tick while the chapter is pending.
    #[serde(default)]
    pub trigger_conditions: Vec<TriggerCondition>,
    #[serde(default)]
    pub modal: Option<Modal>,
    /// Applied unconditionally on entry, before any branching.
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub conditional_outcome: Option<ConditionalOutcome>,
    /// Implicit unconditional advance when no branch selects a target.
    #[serde(default)]
    pub next_chapter: Option<String>,
    /// This chapter ends the storyline.
    #[serde(default)]
    pub resolution: bool,
    /// The resolution is a failure ending.
    #[serde(default)]
    pub failure: bool,
}

impl ChapterDefinition {
    /// A gated chapter parks the instance as pending until its entry
    /// conditions hold; an ungated one is entered immediately.
    pub fn is_gated(&self) -> bool {
        !self.trigger_conditions.is_empty()
    }
}

/// A complete authored storyline arc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorylineDefinition {
    pub id: String,
    pub category: Category,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Gates the start of the storyline; ANDed, empty = always eligible.
    #[serde(default)]
    pub trigger_conditions: Vec<TriggerCondition>,
    /// Ordered; the first chapter is the entry point.
    pub chapters: Vec<ChapterDefinition>,
}

impl StorylineDefinition {
    pub fn chapter_index(&self, chapter_id: &str) -> Option<usize> {
        self.chapters.iter().position(|c| c.id == chapter_id)
    }

    pub fn chapter(&self, chapter_id: &str) -> Option<&ChapterDefinition> {
        self.chapters.iter().find(|c| c.id == chapter_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_chapter_definition() -> StorylineDefinition {
        StorylineDefinition {
            id: "test_arc".to_string(),
            category: Category::Talent,
            name: "Test Arc".to_string(),
            description: String::new(),
            trigger_conditions: Vec::new(),
            chapters: vec![
                ChapterDefinition {
                    id: "opening".to_string(),
                    name: "Opening".to_string(),
                    description: String::new(),
                    trigger_conditions: Vec::new(),
                    modal: None,
                    effects: Vec::new(),
                    choices: Vec::new(),
                    conditional_outcome: None,
                    next_chapter: Some("finale".to_string()),
                    resolution: false,
                    failure: false,
                },
                ChapterDefinition {
                    id: "finale".to_string(),
                    name: "Finale".to_string(),
                    description: String::new(),
                    trigger_conditions: vec![TriggerCondition::WeeksAfterPrevious { weeks: 4 }],
                    modal: None,
                    effects: Vec::new(),
                    choices: Vec::new(),
                    conditional_outcome: None,
                    next_chapter: None,
                    resolution: true,
                    failure: false,
                },
            ],
        }
    }

    #[test]
    fn category_tags() {
        assert_eq!(Category::Talent.tag(), "category:talent");
        assert_eq!(Category::Historical.tag(), "category:historical");
    }

    #[test]
    fn chapter_lookup() {
        let def = two_chapter_definition();
        assert_eq!(def.chapter_index("finale"), Some(1));
        assert!(def.chapter("opening").is_some());
        assert!(def.chapter("missing").is_none());
    }

    #[test]
    fn gating_follows_trigger_conditions() {
        let def = two_chapter_definition();
        assert!(!def.chapters[0].is_gated());
        assert!(def.chapters[1].is_gated());
    }

    #[test]
    fn ron_parse_with_defaults() {
        let input = r#"(
            id: "minimal",
            category: Business,
            name: "Minimal",
            chapters: [
                (id: "only", name: "Only", resolution: true),
            ],
        )"#;
        let def: StorylineDefinition = ron::from_str(input).unwrap();
        assert_eq!(def.id, "minimal");
        assert_eq!(def.chapters.len(), 1);
        assert!(def.chapters[0].resolution);
        assert!(!def.chapters[0].failure);
        assert!(def.chapters[0].choices.is_empty());
        assert!(def.trigger_conditions.is_empty());
    }

    #[test]
    fn outcome_default_probability() {
        let outcome: OutcomeCondition = ron::from_str("Random()").unwrap();
        assert_eq!(
            outcome,
            OutcomeCondition::Random { probability: 0.5 }
        );
    }
}
