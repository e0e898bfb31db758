/// The storyline runtime — instance lifecycle, weekly scheduling, and
/// branch resolution.
///
/// One `StorylineEngine` is constructed per game session and driven by the
/// host game loop: `tick` once per simulated week, `submit_choice` whenever
/// the UI reports a player decision. All transitions are synchronous; the
/// only suspensions are week-delay gates (plain pending state re-checked
/// each tick) and unanswered player choices.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::core::catalog::StorylineCatalog;
use crate::core::ports::{ChapterPrompt, ChoiceLabel, HostPorts, Notification, Priority};
use crate::core::template;
use crate::core::trigger;
use crate::schema::effect::{Effect, Value};
use crate::schema::state::GameState;
use crate::schema::storyline::{ChapterDefinition, OutcomeBranch, OutcomeCondition};

/// Concurrency cap: eligible storylines beyond this stay untriggered until
/// a slot frees up.
pub const MAX_ACTIVE: usize = 3;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no active storyline with id '{0}'")]
    UnknownStoryline(String),
    #[error("storyline '{0}' is not awaiting a choice")]
    NoChoicePending(String),
    #[error("storyline '{0}' has no choice at index {1}")]
    InvalidChoiceIndex(String, usize),
}

/// Result of submitting a player choice. Rejection for cost is a normal,
/// user-visible outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceOutcome {
    Applied,
    RejectedCost,
}

/// Append-only log entry for one visited chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterProgress {
    pub chapter_id: String,
    pub started_week: u32,
    pub completed: bool,
    pub choice_index: Option<usize>,
}

/// A scheduled transition whose entry gate has not yet opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingChapter {
    pub chapter_id: String,
    pub wait_start_week: u32,
}

/// Runtime state of one started storyline. Owned and mutated exclusively
/// by the engine; serializable verbatim for save files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorylineInstance {
    pub id: String,
    pub current_chapter_index: usize,
    pub started_week: u32,
    pub started_year: u32,
    pub chapter_progress: Vec<ChapterProgress>,
    /// First-write-wins capture of every effect applied in this instance,
    /// read back by conditional outcomes and the template pass.
    pub variables: HashMap<String, Value>,
    pub pending_chapter: Option<PendingChapter>,
    pub awaiting_choice: bool,
}

impl StorylineInstance {
    fn new(id: String, state: &GameState) -> Self {
        Self {
            id,
            current_chapter_index: 0,
            started_week: state.week,
            started_year: state.year,
            chapter_progress: Vec::new(),
            variables: HashMap::new(),
            pending_chapter: None,
            awaiting_choice: false,
        }
    }
}

/// Serializable engine bookkeeping for save files. The RNG is not part of
/// the save; the host reseeds on construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSave {
    pub active: Vec<StorylineInstance>,
    pub completed: Vec<StorylineInstance>,
    pub failed: Vec<StorylineInstance>,
    pub triggered: Vec<String>,
}

enum EnterResult {
    Continued,
    Resolved,
}

/// The storyline state machine. Construct one per game session.
pub struct StorylineEngine {
    catalog: StorylineCatalog,
    active: Vec<StorylineInstance>,
    completed: Vec<StorylineInstance>,
    failed: Vec<StorylineInstance>,
    /// Definition ids that have ever started; grows monotonically, so a
    /// definition fires at most once per game.
    triggered: FxHashSet<String>,
    rng: StdRng,
}

impl StorylineEngine {
    pub fn new(catalog: StorylineCatalog, seed: u64) -> Self {
        Self {
            catalog,
            active: Vec::new(),
            completed: Vec::new(),
            failed: Vec::new(),
            triggered: FxHashSet::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn catalog(&self) -> &StorylineCatalog {
        &self.catalog
    }

    pub fn active(&self) -> &[StorylineInstance] {
        &self.active
    }

    pub fn completed(&self) -> &[StorylineInstance] {
        &self.completed
    }

    pub fn failed(&self) -> &[StorylineInstance] {
        &self.failed
    }

    pub fn has_triggered(&self, id: &str) -> bool {
        self.triggered.contains(id)
    }

    /// One simulated week. Pass 1 re-checks pending transitions on active
    /// instances in activation order; pass 2 scans the catalog in order and
    /// starts newly eligible storylines while slots remain. The pass order
    /// is fixed so effect application stays deterministic.
    pub fn tick(&mut self, state: &mut GameState, ports: &mut HostPorts<'_>) {
        self.advance_pending(state, ports);
        self.start_eligible(state, ports);
    }

    fn advance_pending(&mut self, state: &mut GameState, ports: &mut HostPorts<'_>) {
        let mut i = 0;
        while i < self.active.len() {
            let ready = match &self.active[i].pending_chapter {
                Some(pending) => {
                    let conditions = self
                        .catalog
                        .get(&self.active[i].id)
                        .and_then(|d| d.chapter(&pending.chapter_id))
                        .map(|c| c.trigger_conditions.clone())
                        .unwrap_or_default();
                    trigger::chapter_ready(
                        &conditions,
                        pending.wait_start_week,
                        state,
                        ports.talent,
                    )
                }
                None => false,
            };

            if ready {
                if let Some(pending) = self.active[i].pending_chapter.take() {
                    match self.enter_chapter(i, &pending.chapter_id, state, ports) {
                        // Resolved: the instance at `i` was removed, so the
                        // next instance now occupies this index.
                        EnterResult::Resolved => continue,
                        EnterResult::Continued => {}
                    }
                }
            }
            i += 1;
        }
    }

    fn start_eligible(&mut self, state: &mut GameState, ports: &mut HostPorts<'_>) {
        let candidates: Vec<String> = self.catalog.iter().map(|d| d.id.clone()).collect();
        for id in candidates {
            if self.active.len() >= MAX_ACTIVE {
                break;
            }
            if self.triggered.contains(&id) {
                continue;
            }
            let (eligible, name, first_chapter) = match self.catalog.get(&id) {
                Some(def) => (
                    trigger::storyline_eligible(&def.trigger_conditions, state, ports.talent),
                    def.name.clone(),
                    def.chapters[0].clone(),
                ),
                None => continue,
            };
            if !eligible {
                continue;
            }

            self.triggered.insert(id.clone());
            self.active.push(StorylineInstance::new(id, state));
            ports.notifications.notify(Notification {
                icon: "storyline".to_string(),
                message: format!("New Storyline: {}", name),
                priority: Priority::Normal,
            });

            let idx = self.active.len() - 1;
            if first_chapter.is_gated() {
                self.active[idx].pending_chapter = Some(PendingChapter {
                    chapter_id: first_chapter.id,
                    wait_start_week: state.week,
                });
            } else {
                self.enter_chapter(idx, &first_chapter.id, state, ports);
            }
        }
    }

    /// Resolve a player's pick for the given active storyline. A choice
    /// whose cost exceeds available cash is rejected with a notification
    /// and zero state mutation.
    pub fn submit_choice(
        &mut self,
        storyline_id: &str,
        choice_index: usize,
        state: &mut GameState,
        ports: &mut HostPorts<'_>,
    ) -> Result<ChoiceOutcome, RuntimeError> {
        let idx = self
            .active
            .iter()
            .position(|instance| instance.id == storyline_id)
            .ok_or_else(|| RuntimeError::UnknownStoryline(storyline_id.to_string()))?;
        if !self.active[idx].awaiting_choice {
            return Err(RuntimeError::NoChoicePending(storyline_id.to_string()));
        }

        let chapter = self
            .current_chapter(idx)
            .ok_or_else(|| RuntimeError::UnknownStoryline(storyline_id.to_string()))?;
        let choice = chapter
            .choices
            .get(choice_index)
            .cloned()
            .ok_or_else(|| {
                RuntimeError::InvalidChoiceIndex(storyline_id.to_string(), choice_index)
            })?;

        if choice.cost > state.cash {
            ports.notifications.notify(Notification {
                icon: "cash".to_string(),
                message: format!("You can't afford \"{}\".", choice.text),
                priority: Priority::High,
            });
            return Ok(ChoiceOutcome::RejectedCost);
        }

        state.adjust_cash(-choice.cost);
        self.apply_effects(idx, &choice.effects, state, ports);

        {
            let instance = &mut self.active[idx];
            instance.awaiting_choice = false;
            if let Some(record) = instance.chapter_progress.last_mut() {
                record.completed = true;
                record.choice_index = Some(choice_index);
            }
        }

        let next = choice.next_chapter.or(chapter.next_chapter);
        if let Some(next) = next {
            self.schedule_chapter(idx, &next, state, ports);
        }
        Ok(ChoiceOutcome::Applied)
    }

    /// Snapshot the serializable bookkeeping for a save file.
    pub fn save_state(&self) -> EngineSave {
        EngineSave {
            active: self.active.clone(),
            completed: self.completed.clone(),
            failed: self.failed.clone(),
            triggered: self.triggered.iter().cloned().collect(),
        }
    }

    /// Restore bookkeeping from a save. The catalog and RNG seed are the
    /// host's responsibility and are not part of the save.
    pub fn restore_state(&mut self, save: EngineSave) {
        self.active = save.active;
        self.completed = save.completed;
        self.failed = save.failed;
        self.triggered = save.triggered.into_iter().collect();
    }

    fn current_chapter(&self, idx: usize) -> Option<ChapterDefinition> {
        let instance = &self.active[idx];
        self.catalog
            .get(&instance.id)
            .and_then(|def| def.chapters.get(instance.current_chapter_index))
            .cloned()
    }

    /// The strict chapter-entry sequence: progress record, effects, modal,
    /// conditional outcome, resolution, then choices or auto-advance.
    fn enter_chapter(
        &mut self,
        idx: usize,
        chapter_id: &str,
        state: &mut GameState,
        ports: &mut HostPorts<'_>,
    ) -> EnterResult {
        let (chapter, chapter_index, storyline_name) = {
            let instance = &self.active[idx];
            let Some(def) = self.catalog.get(&instance.id) else {
                return EnterResult::Continued;
            };
            let Some(chapter_index) = def.chapter_index(chapter_id) else {
                return EnterResult::Continued;
            };
            (
                def.chapters[chapter_index].clone(),
                chapter_index,
                def.name.clone(),
            )
        };

        {
            let instance = &mut self.active[idx];
            instance.current_chapter_index = chapter_index;
            instance.awaiting_choice = false;
            instance.chapter_progress.push(ChapterProgress {
                chapter_id: chapter.id.clone(),
                started_week: state.week,
                completed: false,
                choice_index: None,
            });
        }

        self.apply_effects(idx, &chapter.effects, state, ports);

        let mut body = String::new();
        let mut title = chapter
            .modal
            .as_ref()
            .map(|m| m.title.clone())
            .unwrap_or_else(|| chapter.name.clone());
        if let Some(modal) = &chapter.modal {
            body = template::render(&modal.body, state, &self.active[idx].variables);
        }

        // Conditional outcome: exactly one branch fires; its modal text is
        // appended to the chapter's own, never substituted for it.
        let mut outcome_next: Option<String> = None;
        let mut branch_fired = false;
        if let Some(outcome) = &chapter.conditional_outcome {
            let success = self.sample_outcome(idx, &outcome.condition);
            let branch: &OutcomeBranch = if success {
                &outcome.on_success
            } else {
                &outcome.on_failure
            };
            let branch = branch.clone();

            self.apply_effects(idx, &branch.effects, state, ports);
            if let Some(modal) = &branch.modal {
                let rendered = template::render(&modal.body, state, &self.active[idx].variables);
                if body.is_empty() {
                    title = modal.title.clone();
                    body = rendered;
                } else {
                    body.push_str("\n\n");
                    body.push_str(&rendered);
                }
            }
            outcome_next = branch.next_chapter;
            branch_fired = true;
        }

        let has_prompt = !body.is_empty() || !chapter.choices.is_empty();
        if has_prompt {
            let instance = &self.active[idx];
            let choices = chapter
                .choices
                .iter()
                .enumerate()
                .map(|(index, c)| ChoiceLabel {
                    index,
                    text: c.text.clone(),
                    cost: c.cost,
                })
                .collect();
            ports.presentation.render_chapter_prompt(&ChapterPrompt {
                storyline_id: instance.id.clone(),
                chapter_id: chapter.id.clone(),
                title,
                body,
                choices,
            });
        }

        // Resolution takes precedence over any next chapter scheduled by
        // the same chapter's conditional outcome.
        if chapter.resolution {
            self.resolve_storyline(idx, &storyline_name, chapter.failure, ports);
            return EnterResult::Resolved;
        }

        if !chapter.choices.is_empty() {
            self.active[idx].awaiting_choice = true;
            return EnterResult::Continued;
        }

        if let Some(record) = self.active[idx].chapter_progress.last_mut() {
            record.completed = true;
        }

        let next = if branch_fired {
            outcome_next.or(chapter.next_chapter)
        } else {
            chapter.next_chapter
        };
        match next {
            Some(next) => self.schedule_chapter(idx, &next, state, ports),
            None => EnterResult::Continued,
        }
    }

    /// Schedule a transition: a gated target parks the instance as pending,
    /// an ungated one is entered immediately (bounded recursion; catalog
    /// validation rejects ungated cycles).
    fn schedule_chapter(
        &mut self,
        idx: usize,
        chapter_id: &str,
        state: &mut GameState,
        ports: &mut HostPorts<'_>,
    ) -> EnterResult {
        let gated = self
            .catalog
            .get(&self.active[idx].id)
            .and_then(|def| def.chapter(chapter_id))
            .map(|chapter| chapter.is_gated())
            .unwrap_or(false);

        if gated {
            self.active[idx].pending_chapter = Some(PendingChapter {
                chapter_id: chapter_id.to_string(),
                wait_start_week: state.week,
            });
            EnterResult::Continued
        } else {
            self.enter_chapter(idx, chapter_id, state, ports)
        }
    }

    fn apply_effects(
        &mut self,
        idx: usize,
        effects: &[Effect],
        state: &mut GameState,
        ports: &mut HostPorts<'_>,
    ) {
        for effect in effects {
            match effect {
                Effect::AdjustCash { amount } => state.adjust_cash(*amount),
                Effect::AdjustReputation { amount } => state.adjust_reputation(*amount),
                Effect::UnlockAchievement { key } => {
                    ports.achievements.unlock_achievement(key, state)
                }
                Effect::GrantContractTerm { .. }
                | Effect::MarkActorLost
                | Effect::SetVariable { .. } => {}
            }
            if let Some((key, value)) = effect.variable_capture() {
                self.active[idx]
                    .variables
                    .entry(key.to_string())
                    .or_insert(value);
            }
        }
    }

    fn sample_outcome(&mut self, idx: usize, condition: &OutcomeCondition) -> bool {
        let probability = match condition {
            OutcomeCondition::Random { probability } => *probability,
            OutcomeCondition::Variable { name } => {
                match self.active[idx].variables.get(name) {
                    Some(Value::Bool(flag)) => return *flag,
                    Some(value) => value.as_f64().unwrap_or(0.5),
                    None => 0.5,
                }
            }
        };
        self.rng.gen::<f64>() < probability
    }

    fn resolve_storyline(
        &mut self,
        idx: usize,
        storyline_name: &str,
        failure: bool,
        ports: &mut HostPorts<'_>,
    ) {
        let mut instance = self.active.remove(idx);
        instance.pending_chapter = None;
        instance.awaiting_choice = false;
        if let Some(record) = instance.chapter_progress.last_mut() {
            record.completed = true;
        }

        let (list, label, icon) = if failure {
            (&mut self.failed, "Storyline Ended", "storyline-failed")
        } else {
            (&mut self.completed, "Storyline Complete", "storyline-complete")
        };
        list.push(instance);
        ports.notifications.notify(Notification {
            icon: icon.to_string(),
            message: format!("{}: {}", label, storyline_name),
            priority: Priority::Normal,
        });
    }
}
