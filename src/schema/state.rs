use serde::{Deserialize, Serialize};

/// Newtype wrapper for talent IDs owned by the host's talent roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TalentId(pub u64);

/// What kind of talent a contract covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractKind {
    Actor,
    Director,
    Writer,
}

/// A produced or in-production film as the engine sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilmRecord {
    pub title: String,
    pub quality: f64,
    pub box_office: i64,
    pub budget: i64,
    pub released: bool,
}

/// A talent contract currently held by the studio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractRecord {
    pub talent_id: TalentId,
    pub kind: ContractKind,
    pub loyalty: f64,
    pub happiness: f64,
}

/// The host-owned simulation snapshot.
///
/// The engine reads everything here when evaluating trigger conditions and
/// writes back only through `adjust_cash` / `adjust_reputation`. `week` is
/// an absolute counter since game start; `year` is carried separately for
/// year-gated historical storylines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub cash: i64,
    pub reputation: f64,
    pub week: u32,
    pub year: u32,
    pub studio_value: i64,
    pub films: Vec<FilmRecord>,
    pub contracts: Vec<ContractRecord>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            cash: 100_000,
            reputation: 50.0,
            week: 0,
            year: 1933,
            studio_value: 250_000,
            films: Vec::new(),
            contracts: Vec::new(),
        }
    }
}

impl GameState {
    pub fn adjust_cash(&mut self, amount: i64) {
        self.cash += amount;
    }

    /// Reputation stays within [0, 100] no matter the delta sequence.
    pub fn adjust_reputation(&mut self, amount: f64) {
        self.reputation = (self.reputation + amount).clamp(0.0, 100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_a_1933_studio() {
        let state = GameState::default();
        assert_eq!(state.year, 1933);
        assert_eq!(state.week, 0);
        assert!(state.cash > 0);
    }

    #[test]
    fn cash_can_go_negative() {
        let mut state = GameState::default();
        state.adjust_cash(-(state.cash + 500));
        assert_eq!(state.cash, -500);
    }

    #[test]
    fn reputation_clamps_high() {
        let mut state = GameState::default();
        state.adjust_reputation(500.0);
        assert_eq!(state.reputation, 100.0);
    }

    #[test]
    fn reputation_clamps_low() {
        let mut state = GameState::default();
        state.adjust_reputation(-500.0);
        assert_eq!(state.reputation, 0.0);
    }

    #[test]
    fn reputation_clamp_survives_sequences() {
        let mut state = GameState::default();
        for delta in [-30.0, 90.0, 45.0, -250.0, 12.5] {
            state.adjust_reputation(delta);
            assert!((0.0..=100.0).contains(&state.reputation));
        }
    }
}
