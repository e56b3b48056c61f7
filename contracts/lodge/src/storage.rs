use shared::constants::{
    FIRST_STRUCTURE_ID, INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD,
    PERSISTENT_BUMP_AMOUNT, PERSISTENT_LIFETIME_THRESHOLD,
};
use shared::errors::Error;
use shared::types::{Amount, LodgeConfig, RoundInfo, Structure};
use soroban_sdk::{contracttype, Address, Env};

/// Storage keys for the lodge.
///
/// Instance keys hold configuration and counters. Round, structure and
/// contribution tables are persistent, one ledger entry per row.
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Admin,
    Config,
    CurrentRound,
    NextStructureId,
    Round(u64),
    Structure(u64),
    Contribution(u64, Address),
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
}

pub fn get_admin(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInit)
}

pub fn set_config(env: &Env, config: &LodgeConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_config(env: &Env) -> Result<LodgeConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInit)
}

pub fn set_current_round_index(env: &Env, index: u64) {
    env.storage().instance().set(&DataKey::CurrentRound, &index);
}

pub fn get_current_round_index(env: &Env) -> Result<u64, Error> {
    env.storage()
        .instance()
        .get(&DataKey::CurrentRound)
        .ok_or(Error::NotInit)
}

/// Next id to hand out; ids start at `FIRST_STRUCTURE_ID`.
pub fn get_next_structure_id(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::NextStructureId)
        .unwrap_or(FIRST_STRUCTURE_ID)
}

pub fn set_next_structure_id(env: &Env, id: u64) {
    env.storage().instance().set(&DataKey::NextStructureId, &id);
}

pub fn set_round(env: &Env, round: &RoundInfo) {
    let key = DataKey::Round(round.index);
    env.storage().persistent().set(&key, round);
    bump_persistent(env, &key);
}

pub fn get_round(env: &Env, index: u64) -> Result<RoundInfo, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Round(index))
        .ok_or(Error::NotFound)
}

pub fn set_structure(env: &Env, structure: &Structure) {
    let key = DataKey::Structure(structure.id);
    env.storage().persistent().set(&key, structure);
    bump_persistent(env, &key);
}

pub fn get_structure(env: &Env, id: u64) -> Result<Structure, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Structure(id))
        .ok_or(Error::NotFound)
}

pub fn set_contribution(env: &Env, structure_id: u64, sponsor: &Address, amount: Amount) {
    let key = DataKey::Contribution(structure_id, sponsor.clone());
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}

/// Cumulative deposit of `sponsor` on a structure, 0 when never voted.
pub fn get_contribution(env: &Env, structure_id: u64, sponsor: &Address) -> Amount {
    env.storage()
        .persistent()
        .get(&DataKey::Contribution(structure_id, sponsor.clone()))
        .unwrap_or(0)
}
