#![no_std]

//! Lodge: a round-based build-and-sponsor competition.
//!
//! Owners register structures into the current round, sponsors back them
//! with currency deposits, and once the round is sealed each structure's
//! current owner withdraws a flat royalty and a vote-weighted share of the
//! round emission, each exactly once.

use shared::{
    constants::{ACTION_ADVANCE, FIRST_ROUND_INDEX, FIRST_STRUCTURE_ID},
    errors::Error,
    events::{LODGE_INITIALIZED, POOL_FUNDED},
    types::{Amount, LodgeConfig, RoundInfo, Structure},
};
use soroban_sdk::{contract, contractimpl, Address, Env, String};

mod access;
mod registry;
mod rewards;
mod round;
mod storage;
mod votes;

#[cfg(test)]
mod test_rewards;

pub use access::{AccessGateClient, OwnershipTokenClient};

use storage::*;

#[contract]
pub struct Lodge;

#[contractimpl]
impl Lodge {
    /// Initialize the lodge and open the first round.
    ///
    /// # Arguments
    /// * `admin` - Deployer recorded as the lodge admin
    /// * `config` - Assets, round duration and payout amounts; immutable afterwards
    ///
    /// # Errors
    /// * `AlreadyInit` - Called a second time
    /// * `InvInput` - Zero round duration or a negative amount
    pub fn initialize(env: Env, admin: Address, config: LodgeConfig) -> Result<(), Error> {
        if is_initialized(&env) {
            return Err(Error::AlreadyInit);
        }
        admin.require_auth();

        if config.round_duration == 0
            || config.royalty_per_building < 0
            || config.emission_per_round < 0
            || config.build_fee < 0
        {
            return Err(Error::InvInput);
        }

        set_admin(&env, &admin);
        set_config(&env, &config);
        set_next_structure_id(&env, FIRST_STRUCTURE_ID);
        round::open_round(&env, FIRST_ROUND_INDEX, config.round_duration);
        bump_instance(&env);

        env.events().publish(
            (LODGE_INITIALIZED,),
            (admin, config.currency, config.ownership_token),
        );

        Ok(())
    }

    /// Seal the current round if its duration has elapsed.
    ///
    /// Any participant may pay for sealing; when an access gate is
    /// configured the caller must be authorized for `advance`.
    /// Returns whether a round was sealed.
    pub fn advance_round(env: Env, caller: Address) -> Result<bool, Error> {
        caller.require_auth();
        let config = get_config(&env)?;
        access::require_authorized(&env, &config, &caller, ACTION_ADVANCE)?;

        let advanced = round::advance_if_due(&env);
        bump_instance(&env);
        Ok(advanced)
    }

    /// Get the current round as stored. A round past its end is reported
    /// unsealed until some call seals it.
    pub fn current_round(env: Env) -> Result<RoundInfo, Error> {
        round::current(&env)
    }

    /// Get any round by index
    pub fn round_info(env: Env, index: u64) -> Result<RoundInfo, Error> {
        get_round(&env, index)
    }

    /// Register a structure in the current round and mint its ownership token
    ///
    /// # Arguments
    /// * `owner` - Receives the ownership token; pays the build fee if any
    /// * `sponsored` - Free-form flag stored with the structure
    /// * `metadata` - Opaque metadata, not validated
    ///
    /// # Errors
    /// * `Unauthorized` - Access gate rejected the owner
    /// * `RoundClosed` - Current round is sealed
    /// * `TransferFailed` - Build fee could not be collected
    /// * `MintFailed` - Ownership token refused to mint (minter role missing)
    pub fn register(
        env: Env,
        owner: Address,
        sponsored: bool,
        metadata: String,
    ) -> Result<u64, Error> {
        owner.require_auth();
        let id = registry::register(&env, &owner, sponsored, metadata)?;
        bump_instance(&env);
        Ok(id)
    }

    pub fn structure(env: Env, structure_id: u64) -> Result<Structure, Error> {
        get_structure(&env, structure_id)
    }

    /// Number of structures registered so far, all rounds
    pub fn total_structures(env: Env) -> u64 {
        registry::total_structures(&env)
    }

    /// Back a structure with `amount` of currency taken from `sponsor`
    ///
    /// # Errors
    /// * `ZeroAmount` - `amount` is not strictly positive
    /// * `NotFound` - Unknown structure
    /// * `RoundClosed` - Structure's round is sealed or past its end
    /// * `TransferFailed` - Currency rejected the deposit
    pub fn vote(env: Env, structure_id: u64, amount: Amount, sponsor: Address) -> Result<(), Error> {
        sponsor.require_auth();
        votes::vote(&env, structure_id, amount, &sponsor)?;
        bump_instance(&env);
        Ok(())
    }

    pub fn vote_weight_of(env: Env, structure_id: u64) -> Amount {
        votes::vote_weight_of(&env, structure_id)
    }

    pub fn contribution_of(env: Env, structure_id: u64, sponsor: Address) -> Amount {
        votes::contribution_of(&env, structure_id, &sponsor)
    }

    /// Withdraw the flat creation royalty of a structure. Returns the amount paid.
    ///
    /// # Errors
    /// * `RoundOpen` - Structure's round is not sealed yet
    /// * `NotOwner` - `caller` does not hold the ownership token
    /// * `AlreadyWithdrawn` - Royalty already paid
    pub fn withdraw_royalty(env: Env, structure_id: u64, caller: Address) -> Result<Amount, Error> {
        caller.require_auth();
        let amount = rewards::withdraw_royalty(&env, structure_id, &caller)?;
        bump_instance(&env);
        Ok(amount)
    }

    /// Withdraw the vote-weighted reward share of a structure. Returns the amount paid.
    ///
    /// # Errors
    /// * `RoundOpen` - Structure's round is not sealed yet
    /// * `NotOwner` - `caller` does not hold the ownership token
    /// * `AlreadyWithdrawn` - Reward already paid
    pub fn withdraw_reward(env: Env, structure_id: u64, caller: Address) -> Result<Amount, Error> {
        caller.require_auth();
        let amount = rewards::withdraw_reward(&env, structure_id, &caller)?;
        bump_instance(&env);
        Ok(amount)
    }

    pub fn pending_royalty(env: Env, structure_id: u64) -> Amount {
        rewards::pending_royalty(&env, structure_id)
    }

    pub fn pending_reward(env: Env, structure_id: u64) -> Amount {
        rewards::pending_reward(&env, structure_id)
    }

    /// Deposit currency into the payout pool
    pub fn fund_pool(env: Env, funder: Address, amount: Amount) -> Result<(), Error> {
        funder.require_auth();
        if amount <= 0 {
            return Err(Error::ZeroAmount);
        }
        let config = get_config(&env)?;
        access::pull_currency(&env, &config, &funder, amount)?;
        bump_instance(&env);

        env.events().publish((POOL_FUNDED, funder), amount);
        Ok(())
    }

    /// Currency held by the lodge: pool funding, votes and build fees, minus payouts
    pub fn pool_balance(env: Env) -> Result<Amount, Error> {
        let config = get_config(&env)?;
        Ok(access::custody_balance(&env, &config))
    }

    pub fn config(env: Env) -> Result<LodgeConfig, Error> {
        get_config(&env)
    }

    pub fn admin(env: Env) -> Result<Address, Error> {
        get_admin(&env)
    }
}
