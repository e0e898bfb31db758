/// Studio Run demo — drives the built-in storylines through a simulated
/// three years of weekly ticks, printing prompts and auto-picking the
/// first affordable choice.
///
/// Run with: cargo run --example studio_run

use storyline_engine::content;
use storyline_engine::core::ports::{
    AchievementSink, ChapterPrompt, HostPorts, Notification, NotificationSink, PresentationPort,
    StaticTalentDirectory,
};
use storyline_engine::core::runtime::StorylineEngine;
use storyline_engine::schema::state::GameState;

#[derive(Default)]
struct Console {
    last_prompts: Vec<ChapterPrompt>,
}

impl PresentationPort for Console {
    fn render_chapter_prompt(&mut self, prompt: &ChapterPrompt) {
        println!("\n=== {} ===", prompt.title);
        println!("{}", prompt.body);
        for choice in &prompt.choices {
            println!("  [{}] {} (${})", choice.index, choice.text, choice.cost);
        }
        if !prompt.choices.is_empty() {
            self.last_prompts.push(prompt.clone());
        }
    }
}

struct Banners;
impl NotificationSink for Banners {
    fn notify(&mut self, notification: Notification) {
        println!("* [{}] {}", notification.icon, notification.message);
    }
}

struct Trophies;
impl AchievementSink for Trophies {
    fn unlock_achievement(&mut self, key: &str, _state: &GameState) {
        println!("* Achievement unlocked: {}", key);
    }
}

fn main() {
    let catalog = content::builtin_catalog().expect("built-in catalog must validate");
    let mut engine = StorylineEngine::new(catalog, 1933);
    let mut state = GameState::default();
    let talent = StaticTalentDirectory::new();

    let mut console = Console::default();
    let mut banners = Banners;
    let mut trophies = Trophies;

    for week in 0..156u32 {
        state.week = week;
        state.year = 1933 + week / 52;

        let pending_choices: Vec<ChapterPrompt> = {
            let mut ports = HostPorts {
                presentation: &mut console,
                notifications: &mut banners,
                achievements: &mut trophies,
                talent: &talent,
            };
            engine.tick(&mut state, &mut ports);
            console.last_prompts.drain(..).collect()
        };

        // Answer every open prompt with the first affordable option.
        for prompt in pending_choices {
            let pick = prompt
                .choices
                .iter()
                .find(|c| c.cost <= state.cash)
                .map(|c| c.index)
                .unwrap_or(0);
            println!("> choosing [{}] for '{}'", pick, prompt.storyline_id);
            let mut ports = HostPorts {
                presentation: &mut console,
                notifications: &mut banners,
                achievements: &mut trophies,
                talent: &talent,
            };
            engine
                .submit_choice(&prompt.storyline_id, pick, &mut state, &mut ports)
                .expect("prompt came from the engine");
        }
    }

    println!(
        "\nAfter 3 years: ${} cash, {:.0} reputation, {} complete, {} failed",
        state.cash,
        state.reputation,
        engine.completed().len(),
        engine.failed().len()
    );
}
