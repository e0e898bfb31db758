/// Host-boundary ports — the collaborators the runtime calls out to.
///
/// The engine depends on these abstractly; the host injects concrete
/// adapters (a DOM modal layer, a console printer, test doubles). The
/// presentation adapter only reads prompt content and later calls back
/// `StorylineEngine::submit_choice` — it never mutates instance state.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::schema::state::{GameState, TalentId};

/// Banner priority for host notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Normal,
    High,
}

/// A storyline banner: start, completion, failure, or choice rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub icon: String,
    pub message: String,
    pub priority: Priority,
}

/// A choice button label as the UI should show it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceLabel {
    pub index: usize,
    pub text: String,
    pub cost: i64,
}

/// Everything the UI needs to render one chapter prompt. The body text has
/// already been through the template pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterPrompt {
    pub storyline_id: String,
    pub chapter_id: String,
    pub title: String,
    pub body: String,
    pub choices: Vec<ChoiceLabel>,
}

pub trait PresentationPort {
    /// Surface a chapter prompt. When `choices` is non-empty the UI is
    /// expected to call `StorylineEngine::submit_choice` with the player's
    /// pick; there is no timeout.
    fn render_chapter_prompt(&mut self, prompt: &ChapterPrompt);
}

pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

pub trait AchievementSink {
    /// Fire-and-forget; the engine relies on no return contract.
    fn unlock_achievement(&mut self, key: &str, state: &GameState);
}

pub trait TalentDirectory {
    /// Resolve a contract's talent id to its star power, if known.
    fn star_power(&self, talent_id: TalentId) -> Option<f64>;
}

/// The injected collaborators, bundled for engine entry points.
pub struct HostPorts<'a> {
    pub presentation: &'a mut dyn PresentationPort,
    pub notifications: &'a mut dyn NotificationSink,
    pub achievements: &'a mut dyn AchievementSink,
    pub talent: &'a dyn TalentDirectory,
}

/// Fixed star-power table, convenient for demos and hosts that keep their
/// roster in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticTalentDirectory {
    powers: FxHashMap<TalentId, f64>,
}

impl StaticTalentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, talent_id: TalentId, star_power: f64) {
        self.powers.insert(talent_id, star_power);
    }
}

impl TalentDirectory for StaticTalentDirectory {
    fn star_power(&self, talent_id: TalentId) -> Option<f64> {
        self.powers.get(&talent_id).copied()
    }
}
