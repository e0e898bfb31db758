/// Trigger evaluation — pure predicates over the host state snapshot.
///
/// Safe to call every simulated week for every untried definition; nothing
/// here mutates state or the engine.

use crate::core::ports::TalentDirectory;
use crate::schema::condition::TriggerCondition;
use crate::schema::state::GameState;

/// Storyline-level eligibility: all conditions hold against the snapshot.
/// An empty set is vacuously eligible.
pub fn storyline_eligible(
    conditions: &[TriggerCondition],
    state: &GameState,
    talent: &dyn TalentDirectory,
) -> bool {
    conditions.iter().all(|c| holds(c, state, talent))
}

/// Chapter entry check. The week gate is measured from `wait_start_week`
/// (when the chapter became pending) and ANDed with the general predicates.
pub fn chapter_ready(
    conditions: &[TriggerCondition],
    wait_start_week: u32,
    state: &GameState,
    talent: &dyn TalentDirectory,
) -> bool {
    conditions.iter().all(|c| match c {
        TriggerCondition::WeeksAfterPrevious { weeks } => {
            state.week.saturating_sub(wait_start_week) >= *weeks
        }
        other => holds(other, state, talent),
    })
}

fn holds(condition: &TriggerCondition, state: &GameState, talent: &dyn TalentDirectory) -> bool {
    match condition {
        TriggerCondition::CashRange { min, max } => in_range(state.cash, *min, *max),
        TriggerCondition::ReputationRange { min, max } => in_range(state.reputation, *min, *max),
        TriggerCondition::YearRange { min, max } => in_range(state.year, *min, *max),
        TriggerCondition::StudioValueRange { min, max } => {
            in_range(state.studio_value, *min, *max)
        }
        TriggerCondition::YearExact { year } => state.year == *year,
        TriggerCondition::AnyFilmQualityAtLeast { quality } => {
            state.films.iter().any(|f| f.quality >= *quality)
        }
        TriggerCondition::AnyContractStarPowerAtLeast { star_power } => state
            .contracts
            .iter()
            .any(|c| star_power_of(talent, c.talent_id) >= *star_power),
        TriggerCondition::ContractsWithStarPowerAtLeast { star_power, count } => {
            state
                .contracts
                .iter()
                .filter(|c| star_power_of(talent, c.talent_id) >= *star_power)
                .count()
                >= *count
        }
        // Only meaningful relative to a pending chapter; catalog validation
        // rejects it at storyline level.
        TriggerCondition::WeeksAfterPrevious { .. } => false,
    }
}

fn star_power_of(talent: &dyn TalentDirectory, id: crate::schema::state::TalentId) -> f64 {
    talent.star_power(id).unwrap_or(0.0)
}

fn in_range<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
    if let Some(min) = min {
        if value < min {
            return false;
        }
    }
    if let Some(max) = max {
        if value > max {
            return false;
        }
    }
    true
}
