/// Storyline catalog — registry, RON loading, and authoring validation.
///
/// Authoring errors (dangling chapter references, conflicting branch
/// mechanisms, dead ends) fail loudly here at load time; the runtime can
/// then assume every reference resolves.

use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;
use thiserror::Error;

use crate::schema::storyline::{ChapterDefinition, StorylineDefinition};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("duplicate storyline id '{0}'")]
    DuplicateStoryline(String),
    #[error("storyline '{0}' has no chapters")]
    EmptyStoryline(String),
    #[error("storyline '{storyline}' has duplicate chapter id '{chapter}'")]
    DuplicateChapter { storyline: String, chapter: String },
    #[error("storyline '{storyline}', chapter '{chapter}': reference to unknown chapter '{target}'")]
    DanglingChapterRef {
        storyline: String,
        chapter: String,
        target: String,
    },
    #[error("storyline '{storyline}', chapter '{chapter}': choices and conditional outcome are mutually exclusive")]
    ConflictingBranches { storyline: String, chapter: String },
    #[error("storyline '{storyline}', chapter '{chapter}': resolution chapters cannot offer choices")]
    ChoicesOnResolution { storyline: String, chapter: String },
    #[error("storyline '{storyline}', chapter '{chapter}': no advancement path and not a resolution")]
    DeadEndChapter { storyline: String, chapter: String },
    #[error("storyline '{storyline}', chapter '{chapter}', choice {index}: no next chapter to advance to")]
    DeadEndChoice {
        storyline: String,
        chapter: String,
        index: usize,
    },
    #[error("storyline '{storyline}': cycle of ungated automatic transitions through chapter '{chapter}'")]
    UngatedCycle { storyline: String, chapter: String },
    #[error("storyline '{0}': weeks_after_previous is only valid on chapter entry conditions")]
    MisplacedWeekGate(String),
}

/// An ordered registry of validated storyline definitions.
#[derive(Debug, Clone, Default)]
pub struct StorylineCatalog {
    definitions: Vec<StorylineDefinition>,
    index: FxHashMap<String, usize>,
}

impl StorylineCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list of definitions, validating each.
    pub fn from_definitions(
        definitions: Vec<StorylineDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.register(definition)?;
        }
        Ok(catalog)
    }

    /// Load a catalog from a RON file holding a list of definitions.
    pub fn load_from_ron(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a catalog from a RON string.
    pub fn parse_ron(input: &str) -> Result<Self, CatalogError> {
        let definitions: Vec<StorylineDefinition> = ron::from_str(input)?;
        Self::from_definitions(definitions)
    }

    /// Validate and insert one definition. Registering an id twice is an
    /// authoring error.
    pub fn register(&mut self, definition: StorylineDefinition) -> Result<(), CatalogError> {
        if self.index.contains_key(&definition.id) {
            return Err(CatalogError::DuplicateStoryline(definition.id));
        }
        validate(&definition)?;
        self.index
            .insert(definition.id.clone(), self.definitions.len());
        self.definitions.push(definition);
        Ok(())
    }

    /// Merge another catalog into this one. Definitions from `other`
    /// override definitions in `self` with the same id.
    pub fn merge(&mut self, other: StorylineCatalog) {
        for definition in other.definitions {
            match self.index.get(&definition.id) {
                Some(&slot) => self.definitions[slot] = definition,
                None => {
                    self.index
                        .insert(definition.id.clone(), self.definitions.len());
                    self.definitions.push(definition);
                }
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&StorylineDefinition> {
        self.index.get(id).map(|&slot| &self.definitions[slot])
    }

    /// Definitions in registration order — the scan order of the weekly
    /// scheduler's catalog pass.
    pub fn iter(&self) -> impl Iterator<Item = &StorylineDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn validate(definition: &StorylineDefinition) -> Result<(), CatalogError> {
    let storyline = &definition.id;

    if definition.chapters.is_empty() {
        return Err(CatalogError::EmptyStoryline(storyline.clone()));
    }

    if definition
        .trigger_conditions
        .iter()
        .any(|c| c.is_time_gate())
    {
        return Err(CatalogError::MisplacedWeekGate(storyline.clone()));
    }

    let mut chapter_ids = FxHashSet::default();
    for chapter in &definition.chapters {
        if !chapter_ids.insert(chapter.id.as_str()) {
            return Err(CatalogError::DuplicateChapter {
                storyline: storyline.clone(),
                chapter: chapter.id.clone(),
            });
        }
    }

    for chapter in &definition.chapters {
        validate_chapter(definition, chapter)?;
    }

    detect_ungated_cycles(definition)?;
    Ok(())
}

fn validate_chapter(
    definition: &StorylineDefinition,
    chapter: &ChapterDefinition,
) -> Result<(), CatalogError> {
    let storyline = definition.id.clone();

    if !chapter.choices.is_empty() && chapter.conditional_outcome.is_some() {
        return Err(CatalogError::ConflictingBranches {
            storyline,
            chapter: chapter.id.clone(),
        });
    }

    if chapter.resolution && !chapter.choices.is_empty() {
        return Err(CatalogError::ChoicesOnResolution {
            storyline,
            chapter: chapter.id.clone(),
        });
    }

    let check_ref = |target: &Option<String>| -> Result<(), CatalogError> {
        if let Some(target) = target {
            if definition.chapter(target).is_none() {
                return Err(CatalogError::DanglingChapterRef {
                    storyline: definition.id.clone(),
                    chapter: chapter.id.clone(),
                    target: target.clone(),
                });
            }
        }
        Ok(())
    };

    check_ref(&chapter.next_chapter)?;
    for choice in &chapter.choices {
        check_ref(&choice.next_chapter)?;
    }
    if let Some(outcome) = &chapter.conditional_outcome {
        check_ref(&outcome.on_success.next_chapter)?;
        check_ref(&outcome.on_failure.next_chapter)?;
    }

    // A choice that names no target must be able to fall through to the
    // chapter's implicit next chapter.
    for (index, choice) in chapter.choices.iter().enumerate() {
        if choice.next_chapter.is_none() && chapter.next_chapter.is_none() {
            return Err(CatalogError::DeadEndChoice {
                storyline: definition.id.clone(),
                chapter: chapter.id.clone(),
                index,
            });
        }
    }

    if !chapter.resolution
        && chapter.choices.is_empty()
        && chapter.conditional_outcome.is_none()
        && chapter.next_chapter.is_none()
    {
        return Err(CatalogError::DeadEndChapter {
            storyline: definition.id.clone(),
            chapter: chapter.id.clone(),
        });
    }

    Ok(())
}

/// Automatic transitions (implicit next chapters and conditional-outcome
/// branches) into ungated targets are taken within a single tick; a cycle
/// of them would recurse forever.
fn detect_ungated_cycles(definition: &StorylineDefinition) -> Result<(), CatalogError> {
    let count = definition.chapters.len();
    // 0 = unvisited, 1 = on the current path, 2 = done.
    let mut marks = vec![0u8; count];

    fn visit(
        definition: &StorylineDefinition,
        marks: &mut [u8],
        slot: usize,
    ) -> Result<(), CatalogError> {
        marks[slot] = 1;
        for next in auto_edges(definition, &definition.chapters[slot]) {
            match marks[next] {
                1 => {
                    return Err(CatalogError::UngatedCycle {
                        storyline: definition.id.clone(),
                        chapter: definition.chapters[next].id.clone(),
                    })
                }
                0 => visit(definition, marks, next)?,
                _ => {}
            }
        }
        marks[slot] = 2;
        Ok(())
    }

    for start in 0..count {
        if marks[start] == 0 {
            visit(definition, &mut marks, start)?;
        }
    }
    Ok(())
}

/// All automatic edges out of `chapter` whose target is ungated. Choice
/// transitions are excluded: they require player input, so they cannot
/// recurse within a single tick.
fn auto_edges(definition: &StorylineDefinition, chapter: &ChapterDefinition) -> Vec<usize> {
    if chapter.resolution || !chapter.choices.is_empty() {
        return Vec::new();
    }

    let mut targets: Vec<&String> = Vec::new();
    if let Some(outcome) = &chapter.conditional_outcome {
        if let Some(t) = &outcome.on_success.next_chapter {
            targets.push(t);
        }
        if let Some(t) = &outcome.on_failure.next_chapter {
            targets.push(t);
        }
    }
    if let Some(t) = &chapter.next_chapter {
        targets.push(t);
    }

    targets
        .into_iter()
        .filter_map(|t| definition.chapter_index(t))
        .filter(|&slot| !definition.chapters[slot].is_gated())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::storyline::{
        Category, Choice, ConditionalOutcome, OutcomeBranch, OutcomeCondition,
    };

    fn chapter(id: &str) -> ChapterDefinition {
        ChapterDefinition {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            trigger_conditions: Vec::new(),
            modal: None,
            effects: Vec::new(),
            choices: Vec::new(),
            conditional_outcome: None,
            next_chapter: None,
            resolution: false,
            failure: false,
        }
    }

    fn definition(id: &str, chapters: Vec<ChapterDefinition>) -> StorylineDefinition {
        StorylineDefinition {
            id: id.to_string(),
            category: Category::Business,
            name: id.to_string(),
            description: String::new(),
            trigger_conditions: Vec::new(),
            chapters,
        }
    }

    fn linear_two_chapter(id: &str) -> StorylineDefinition {
        let mut opening = chapter("opening");
        opening.next_chapter = Some("finale".to_string());
        let mut finale = chapter("finale");
        finale.resolution = true;
        finale.trigger_conditions = vec![
            crate::schema::condition::TriggerCondition::WeeksAfterPrevious { weeks: 2 },
        ];
        definition(id, vec![opening, finale])
    }

    #[test]
    fn register_and_lookup() {
        let mut catalog = StorylineCatalog::new();
        catalog.register(linear_two_chapter("arc_a")).unwrap();
        catalog.register(linear_two_chapter("arc_b")).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("arc_a").is_some());
        assert!(catalog.get("arc_c").is_none());
        let order: Vec<&str> = catalog.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(order, vec!["arc_a", "arc_b"]);
    }

    #[test]
    fn duplicate_storyline_rejected() {
        let mut catalog = StorylineCatalog::new();
        catalog.register(linear_two_chapter("arc")).unwrap();
        let err = catalog.register(linear_two_chapter("arc")).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateStoryline(id) if id == "arc"));
    }

    #[test]
    fn empty_storyline_rejected() {
        let err = StorylineCatalog::from_definitions(vec![definition("empty", Vec::new())])
            .unwrap_err();
        assert!(matches!(err, CatalogError::EmptyStoryline(_)));
    }

    #[test]
    fn duplicate_chapter_rejected() {
        let mut a = chapter("same");
        a.next_chapter = Some("same".to_string());
        let mut b = chapter("same");
        b.resolution = true;
        let err = StorylineCatalog::from_definitions(vec![definition("arc", vec![a, b])])
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateChapter { .. }));
    }

    #[test]
    fn dangling_reference_rejected() {
        let mut opening = chapter("opening");
        opening.next_chapter = Some("missing".to_string());
        let err =
            StorylineCatalog::from_definitions(vec![definition("arc", vec![opening])]).unwrap_err();
        assert!(
            matches!(err, CatalogError::DanglingChapterRef { target, .. } if target == "missing")
        );
    }

    #[test]
    fn dangling_choice_reference_rejected() {
        let mut opening = chapter("opening");
        opening.choices = vec![Choice {
            text: "Go".to_string(),
            cost: 0,
            effects: Vec::new(),
            next_chapter: Some("missing".to_string()),
        }];
        let mut finale = chapter("finale");
        finale.resolution = true;
        let err = StorylineCatalog::from_definitions(vec![definition("arc", vec![opening, finale])])
            .unwrap_err();
        assert!(matches!(err, CatalogError::DanglingChapterRef { .. }));
    }

    #[test]
    fn choices_and_outcome_conflict_rejected() {
        let mut finale = chapter("finale");
        finale.resolution = true;
        let mut opening = chapter("opening");
        opening.choices = vec![Choice {
            text: "Go".to_string(),
            cost: 0,
            effects: Vec::new(),
            next_chapter: Some("finale".to_string()),
        }];
        opening.conditional_outcome = Some(ConditionalOutcome {
            condition: OutcomeCondition::Random { probability: 0.5 },
            on_success: OutcomeBranch {
                next_chapter: Some("finale".to_string()),
                ..Default::default()
            },
            on_failure: OutcomeBranch::default(),
        });
        let err = StorylineCatalog::from_definitions(vec![definition("arc", vec![opening, finale])])
            .unwrap_err();
        assert!(matches!(err, CatalogError::ConflictingBranches { .. }));
    }

    #[test]
    fn dead_end_chapter_rejected() {
        let stuck = chapter("stuck");
        let err =
            StorylineCatalog::from_definitions(vec![definition("arc", vec![stuck])]).unwrap_err();
        assert!(matches!(err, CatalogError::DeadEndChapter { .. }));
    }

    #[test]
    fn week_gate_on_storyline_rejected() {
        let mut def = linear_two_chapter("arc");
        def.trigger_conditions = vec![
            crate::schema::condition::TriggerCondition::WeeksAfterPrevious { weeks: 4 },
        ];
        let err = StorylineCatalog::from_definitions(vec![def]).unwrap_err();
        assert!(matches!(err, CatalogError::MisplacedWeekGate(_)));
    }

    #[test]
    fn ungated_cycle_rejected() {
        let mut a = chapter("a");
        a.next_chapter = Some("b".to_string());
        let mut b = chapter("b");
        b.next_chapter = Some("a".to_string());
        let err =
            StorylineCatalog::from_definitions(vec![definition("arc", vec![a, b])]).unwrap_err();
        assert!(matches!(err, CatalogError::UngatedCycle { .. }));
    }

    #[test]
    fn gated_cycle_allowed() {
        // A loop is fine as long as a week gate breaks the recursion.
        let mut a = chapter("a");
        a.next_chapter = Some("b".to_string());
        let mut b = chapter("b");
        b.trigger_conditions = vec![
            crate::schema::condition::TriggerCondition::WeeksAfterPrevious { weeks: 1 },
        ];
        b.conditional_outcome = Some(ConditionalOutcome {
            condition: OutcomeCondition::Random { probability: 0.5 },
            on_success: OutcomeBranch {
                next_chapter: Some("out".to_string()),
                ..Default::default()
            },
            on_failure: OutcomeBranch {
                next_chapter: Some("a".to_string()),
                ..Default::default()
            },
        });
        let mut out = chapter("out");
        out.resolution = true;
        assert!(StorylineCatalog::from_definitions(vec![definition("arc", vec![a, b, out])]).is_ok());
    }

    #[test]
    fn merge_overrides_by_id() {
        let mut base = StorylineCatalog::new();
        base.register(linear_two_chapter("shared")).unwrap();
        base.register(linear_two_chapter("base_only")).unwrap();

        let mut replacement = linear_two_chapter("shared");
        replacement.name = "Replacement".to_string();
        let mut overlay = StorylineCatalog::new();
        overlay.register(replacement).unwrap();

        base.merge(overlay);
        assert_eq!(base.len(), 2);
        assert_eq!(base.get("shared").unwrap().name, "Replacement");
        assert!(base.get("base_only").is_some());
    }
}
