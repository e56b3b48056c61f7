//! Round lifecycle. Rounds are sealed lazily: there is no scheduler, so every
//! mutating entry point runs [`advance_if_due`] before doing its own work.

use shared::errors::Error;
use shared::events::{ROUND_OPENED, ROUND_SEALED};
use shared::types::RoundInfo;
use soroban_sdk::{log, Env};

use crate::storage::{
    get_config, get_current_round_index, get_round, set_current_round_index, set_round,
};

/// Open round `index` starting now and make it current.
pub fn open_round(env: &Env, index: u64, duration: u64) -> RoundInfo {
    let round = RoundInfo {
        index,
        started_at: env.ledger().timestamp(),
        duration,
        total_vote_weight: 0,
        structure_count: 0,
        sealed: false,
        royalty_paid: 0,
        reward_paid: 0,
    };
    set_round(env, &round);
    set_current_round_index(env, index);

    env.events()
        .publish((ROUND_OPENED, index), round.started_at);

    round
}

pub fn current(env: &Env) -> Result<RoundInfo, Error> {
    let index = get_current_round_index(env)?;
    get_round(env, index)
}

/// Seal the current round if its duration has elapsed and open the next one.
///
/// Returns `true` when a round was sealed. Never fails: anything that would
/// stop the transition (uninitialized contract, index exhaustion) leaves
/// state untouched. The next round starts at the current ledger time, so
/// repeated calls in one due window seal at most once.
pub fn advance_if_due(env: &Env) -> bool {
    let Ok(config) = get_config(env) else {
        return false;
    };
    let Ok(mut round) = current(env) else {
        return false;
    };

    let now = env.ledger().timestamp();
    if !round.is_due(now) {
        return false;
    }
    let Some(next_index) = round.index.checked_add(1) else {
        return false;
    };

    round.sealed = true;
    set_round(env, &round);

    log!(env, "round sealed", round.index, round.total_vote_weight);
    env.events().publish(
        (ROUND_SEALED, round.index),
        (round.total_vote_weight, round.structure_count),
    );

    open_round(env, next_index, config.round_duration);
    true
}

/// A round whose duration has elapsed is settled in effect even before some
/// call seals it: no vote can land in it anymore.
pub fn is_settled(env: &Env, round: &RoundInfo) -> bool {
    round.sealed || round.is_due(env.ledger().timestamp())
}
