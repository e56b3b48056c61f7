#![no_std]

//! Ownership token for lodge structures.
//!
//! One token per structure id. Only addresses granted the minter role (the
//! lodge contract) can mint; holders transfer freely, and the lodge pays
//! royalties and rewards to whoever holds the token at withdrawal time.

use shared::constants::{
    INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT,
    PERSISTENT_LIFETIME_THRESHOLD,
};
use shared::errors::Error;
use shared::events::{MINTER_GRANTED, MINTER_REVOKED, TOKEN_MINTED, TOKEN_TRANSFERRED};
use soroban_sdk::{contract, contractimpl, contracttype, Address, Env, String};
use soroban_token_sdk::{metadata::TokenMetadata, TokenUtils};


/// Storage keys for the structure token
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Admin address, grants and revokes the minter role
    Admin,
    /// Set for addresses holding the minter role
    Minter(Address),
    /// Holder of a token id
    Owner(u64),
    /// Number of tokens held by an address
    Balance(Address),
}

#[contract]
pub struct StructureToken;

#[contractimpl]
impl StructureToken {
    /// Initialize the collection
    ///
    /// # Arguments
    /// * `admin` - Address allowed to grant the minter role
    /// * `name` - Collection name
    /// * `symbol` - Collection symbol
    pub fn initialize(env: Env, admin: Address, name: String, symbol: String) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(Error::AlreadyInit);
        }
        admin.require_auth();

        env.storage().instance().set(&DataKey::Admin, &admin);
        TokenUtils::new(&env).metadata().set_metadata(&TokenMetadata {
            decimal: 0,
            name,
            symbol,
        });
        Self::bump_instance(&env);

        Ok(())
    }

    /// Grant the minter role. The lodge contract address must hold it before
    /// structures can be registered.
    pub fn grant_minter(env: Env, minter: Address) -> Result<(), Error> {
        let admin = Self::get_admin(&env)?;
        admin.require_auth();

        env.storage()
            .instance()
            .set(&DataKey::Minter(minter.clone()), &true);
        Self::bump_instance(&env);

        env.events().publish((MINTER_GRANTED,), minter);
        Ok(())
    }

    pub fn revoke_minter(env: Env, minter: Address) -> Result<(), Error> {
        let admin = Self::get_admin(&env)?;
        admin.require_auth();

        env.storage()
            .instance()
            .remove(&DataKey::Minter(minter.clone()));

        env.events().publish((MINTER_REVOKED,), minter);
        Ok(())
    }

    pub fn is_minter(env: Env, account: Address) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::Minter(account))
            .unwrap_or(false)
    }

    /// Mint token `id` to `to`
    ///
    /// # Errors
    /// * `MissingRole` - `minter` does not hold the minter role
    /// * `AlreadyMinted` - `id` exists
    pub fn mint(env: Env, minter: Address, to: Address, id: u64) -> Result<(), Error> {
        Self::get_admin(&env)?;
        minter.require_auth();

        if !Self::is_minter(env.clone(), minter) {
            return Err(Error::MissingRole);
        }
        if env.storage().persistent().has(&DataKey::Owner(id)) {
            return Err(Error::AlreadyMinted);
        }

        Self::set_owner(&env, id, &to);
        Self::adjust_balance(&env, &to, true)?;
        Self::bump_instance(&env);

        env.events().publish((TOKEN_MINTED, id), to);
        Ok(())
    }

    pub fn owner_of(env: Env, id: u64) -> Result<Address, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Owner(id))
            .ok_or(Error::NotFound)
    }

    pub fn balance(env: Env, owner: Address) -> u64 {
        env.storage()
            .persistent()
            .get(&DataKey::Balance(owner))
            .unwrap_or(0)
    }

    /// Move token `id` from `from` to `to`
    ///
    /// # Errors
    /// * `NotFound` - `id` was never minted
    /// * `NotOwner` - `from` does not hold `id`
    pub fn transfer(env: Env, from: Address, to: Address, id: u64) -> Result<(), Error> {
        from.require_auth();

        let owner = Self::owner_of(env.clone(), id)?;
        if owner != from {
            return Err(Error::NotOwner);
        }

        Self::set_owner(&env, id, &to);
        Self::adjust_balance(&env, &from, false)?;
        Self::adjust_balance(&env, &to, true)?;

        env.events().publish((TOKEN_TRANSFERRED, id), (from, to));
        Ok(())
    }

    pub fn name(env: Env) -> String {
        TokenUtils::new(&env).metadata().get_metadata().name
    }

    pub fn symbol(env: Env) -> String {
        TokenUtils::new(&env).metadata().get_metadata().symbol
    }

    fn get_admin(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInit)
    }

    fn set_owner(env: &Env, id: u64, owner: &Address) {
        let key = DataKey::Owner(id);
        env.storage().persistent().set(&key, owner);
        env.storage()
            .persistent()
            .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
    }

    fn adjust_balance(env: &Env, account: &Address, increase: bool) -> Result<(), Error> {
        let key = DataKey::Balance(account.clone());
        let current: u64 = env.storage().persistent().get(&key).unwrap_or(0);
        let updated = if increase {
            current.checked_add(1).ok_or(Error::Overflow)?
        } else {
            current.checked_sub(1).ok_or(Error::InvInput)?
        };
        env.storage().persistent().set(&key, &updated);
        env.storage()
            .persistent()
            .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
        Ok(())
    }

    fn bump_instance(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
    }
}
