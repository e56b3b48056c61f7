use shared::errors::Error;
use shared::events::VOTE_CAST;
use shared::types::Amount;
use soroban_sdk::{Address, Env};

use crate::access;
use crate::round;
use crate::storage::{
    get_config, get_contribution, get_round, get_structure, set_contribution, set_round,
    set_structure,
};

/// Deposit `amount` of currency from `sponsor` behind a structure.
///
/// Weights are written before the currency is pulled; a rejected transfer
/// fails the call and rolls the weights back with it.
pub fn vote(env: &Env, structure_id: u64, amount: Amount, sponsor: &Address) -> Result<(), Error> {
    if amount <= 0 {
        return Err(Error::ZeroAmount);
    }

    let config = get_config(env)?;
    let mut structure = get_structure(env, structure_id)?;

    round::advance_if_due(env);
    let mut target = get_round(env, structure.round)?;
    if target.sealed {
        return Err(Error::RoundClosed);
    }

    let contribution = get_contribution(env, structure_id, sponsor)
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    structure.vote_weight = structure
        .vote_weight
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    target.total_vote_weight = target
        .total_vote_weight
        .checked_add(amount)
        .ok_or(Error::Overflow)?;

    set_contribution(env, structure_id, sponsor, contribution);
    set_structure(env, &structure);
    set_round(env, &target);

    access::pull_currency(env, &config, sponsor, amount)?;

    env.events().publish(
        (VOTE_CAST, structure_id, sponsor.clone()),
        (amount, structure.vote_weight),
    );

    Ok(())
}

pub fn vote_weight_of(env: &Env, structure_id: u64) -> Amount {
    get_structure(env, structure_id)
        .map(|s| s.vote_weight)
        .unwrap_or(0)
}

pub fn contribution_of(env: &Env, structure_id: u64, sponsor: &Address) -> Amount {
    get_contribution(env, structure_id, sponsor)
}
