//! Royalty and reward withdrawal.
//!
//! Each structure carries two independent one-shot flags. A flag and the
//! round's paid counter are written to storage before the currency transfer
//! is issued, so a currency that calls back into the lodge sees the stream
//! as already taken.

use shared::errors::Error;
use shared::events::{REWARD_WITHDRAWN, ROYALTY_WITHDRAWN};
use shared::types::{Amount, LodgeConfig, RoundInfo, Structure};
use soroban_sdk::{Address, Env, I256};

use crate::access;
use crate::round;
use crate::storage::{get_config, get_round, get_structure, set_round, set_structure};

/// Royalty still payable for one structure. Capped by what the round can
/// still pay so the per-round royalty budget is never exceeded.
pub fn royalty_due(config: &LodgeConfig, round: &RoundInfo) -> Result<Amount, Error> {
    let budget = config
        .royalty_per_building
        .checked_mul(round.structure_count as Amount)
        .ok_or(Error::Overflow)?;
    let remaining = budget.saturating_sub(round.royalty_paid).max(0);
    Ok(config.royalty_per_building.min(remaining))
}

/// `emission * weight / total`, rounded down. Zero when the round collected
/// no votes. Dust left by rounding is never paid out.
///
/// The product is taken in 256 bits: it can exceed `i128` while the quotient,
/// bounded by the emission, always fits.
pub fn reward_due(
    env: &Env,
    config: &LodgeConfig,
    structure: &Structure,
    round: &RoundInfo,
) -> Result<Amount, Error> {
    if round.total_vote_weight == 0 {
        return Ok(0);
    }
    let share = I256::from_i128(env, config.emission_per_round)
        .mul(&I256::from_i128(env, structure.vote_weight))
        .div(&I256::from_i128(env, round.total_vote_weight))
        .to_i128()
        .ok_or(Error::Overflow)?;
    let remaining = config
        .emission_per_round
        .saturating_sub(round.reward_paid)
        .max(0);
    Ok(share.min(remaining))
}

/// Shared guards: structure exists, its round is sealed, `caller` holds the
/// ownership token.
fn settleable(
    env: &Env,
    structure_id: u64,
    caller: &Address,
) -> Result<(LodgeConfig, Structure, RoundInfo), Error> {
    let config = get_config(env)?;
    let structure = get_structure(env, structure_id)?;

    round::advance_if_due(env);
    let round = get_round(env, structure.round)?;
    if !round.sealed {
        return Err(Error::RoundOpen);
    }

    if access::current_owner(env, &config, structure_id)? != *caller {
        return Err(Error::NotOwner);
    }

    Ok((config, structure, round))
}

pub fn withdraw_royalty(env: &Env, structure_id: u64, caller: &Address) -> Result<Amount, Error> {
    let (config, mut structure, mut round) = settleable(env, structure_id, caller)?;
    if structure.royalty_withdrawn {
        return Err(Error::AlreadyWithdrawn);
    }

    let amount = royalty_due(&config, &round)?;

    structure.royalty_withdrawn = true;
    round.royalty_paid = round
        .royalty_paid
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    set_structure(env, &structure);
    set_round(env, &round);

    if amount > 0 {
        access::pay_currency(env, &config, caller, amount)?;
    }

    env.events().publish(
        (ROYALTY_WITHDRAWN, structure_id, caller.clone()),
        amount,
    );

    Ok(amount)
}

pub fn withdraw_reward(env: &Env, structure_id: u64, caller: &Address) -> Result<Amount, Error> {
    let (config, mut structure, mut round) = settleable(env, structure_id, caller)?;
    if structure.reward_withdrawn {
        return Err(Error::AlreadyWithdrawn);
    }

    let amount = reward_due(env, &config, &structure, &round)?;

    structure.reward_withdrawn = true;
    round.reward_paid = round
        .reward_paid
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    set_structure(env, &structure);
    set_round(env, &round);

    if amount > 0 {
        access::pay_currency(env, &config, caller, amount)?;
    }

    env.events().publish(
        (REWARD_WITHDRAWN, structure_id, caller.clone()),
        amount,
    );

    Ok(amount)
}

/// What `withdraw_royalty` would pay now; 0 while the round is still open or
/// once the royalty is taken.
pub fn pending_royalty(env: &Env, structure_id: u64) -> Amount {
    let Ok((config, structure, round)) = settled_view(env, structure_id) else {
        return 0;
    };
    if structure.royalty_withdrawn {
        return 0;
    }
    royalty_due(&config, &round).unwrap_or(0)
}

pub fn pending_reward(env: &Env, structure_id: u64) -> Amount {
    let Ok((config, structure, round)) = settled_view(env, structure_id) else {
        return 0;
    };
    if structure.reward_withdrawn {
        return 0;
    }
    reward_due(env, &config, &structure, &round).unwrap_or(0)
}

fn settled_view(env: &Env, structure_id: u64) -> Result<(LodgeConfig, Structure, RoundInfo), Error> {
    let config = get_config(env)?;
    let structure = get_structure(env, structure_id)?;
    let round = get_round(env, structure.round)?;
    if !round::is_settled(env, &round) {
        return Err(Error::RoundOpen);
    }
    Ok((config, structure, round))
}
