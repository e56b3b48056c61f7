use shared::constants::{ACTION_REGISTER, FIRST_STRUCTURE_ID};
use shared::errors::Error;
use shared::events::STRUCTURE_REGISTERED;
use shared::types::Structure;
use soroban_sdk::{Address, Env, String};

use crate::access;
use crate::round;
use crate::storage::{
    get_config, get_next_structure_id, set_next_structure_id, set_round, set_structure,
};

/// Register a structure owned by `owner` into the current round and mint its
/// ownership token. Returns the new structure id.
pub fn register(
    env: &Env,
    owner: &Address,
    sponsored: bool,
    metadata: String,
) -> Result<u64, Error> {
    let config = get_config(env)?;
    access::require_authorized(env, &config, owner, ACTION_REGISTER)?;

    round::advance_if_due(env);
    let mut current = round::current(env)?;
    // Unreachable after the prelude: a due round is sealed and its successor
    // opened in this call. Failing here would also roll that seal back.
    if current.sealed {
        return Err(Error::RoundClosed);
    }

    let id = get_next_structure_id(env);
    let next_id = id.checked_add(1).ok_or(Error::Overflow)?;
    current.structure_count = current
        .structure_count
        .checked_add(1)
        .ok_or(Error::Overflow)?;

    let structure = Structure {
        id,
        owner: owner.clone(),
        round: current.index,
        sponsored,
        metadata,
        vote_weight: 0,
        royalty_withdrawn: false,
        reward_withdrawn: false,
        created_at: env.ledger().timestamp(),
    };

    set_structure(env, &structure);
    set_next_structure_id(env, next_id);
    set_round(env, &current);

    if config.build_fee > 0 {
        access::pull_currency(env, &config, owner, config.build_fee)?;
    }
    access::mint_ownership(env, &config, owner, id)?;

    env.events().publish(
        (STRUCTURE_REGISTERED, id),
        (owner.clone(), current.index, sponsored),
    );

    Ok(id)
}

pub fn total_structures(env: &Env) -> u64 {
    get_next_structure_id(env) - FIRST_STRUCTURE_ID
}
