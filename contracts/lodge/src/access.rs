//! Glue to the contracts the lodge does not own: the access gate, the
//! ownership token and the currency.

use shared::errors::Error;
use shared::types::{Amount, LodgeConfig};
use soroban_sdk::{contractclient, token::TokenClient, Address, Env, Symbol};

/// Non-fungible token representing structures. The lodge must hold the
/// token's minter role before it can register anything.
#[contractclient(name = "OwnershipTokenClient")]
pub trait OwnershipToken {
    fn mint(env: Env, minter: Address, to: Address, id: u64);
    fn owner_of(env: Env, id: u64) -> Address;
}

#[contractclient(name = "AccessGateClient")]
pub trait AccessGate {
    fn is_authorized(env: Env, caller: Address, action: Symbol) -> bool;
}

/// Without a configured gate every caller is authorized.
pub fn require_authorized(
    env: &Env,
    config: &LodgeConfig,
    caller: &Address,
    action: Symbol,
) -> Result<(), Error> {
    let Some(gate) = &config.access_gate else {
        return Ok(());
    };

    if AccessGateClient::new(env, gate).is_authorized(caller, &action) {
        Ok(())
    } else {
        Err(Error::Unauthorized)
    }
}

pub fn mint_ownership(env: &Env, config: &LodgeConfig, to: &Address, id: u64) -> Result<(), Error> {
    let client = OwnershipTokenClient::new(env, &config.ownership_token);
    match client.try_mint(&env.current_contract_address(), to, &id) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::MintFailed),
    }
}

/// Current holder of the structure's ownership token.
pub fn current_owner(env: &Env, config: &LodgeConfig, id: u64) -> Result<Address, Error> {
    match OwnershipTokenClient::new(env, &config.ownership_token).try_owner_of(&id) {
        Ok(Ok(owner)) => Ok(owner),
        _ => Err(Error::NotOwner),
    }
}

/// Move `amount` from `from` into the lodge's custody.
pub fn pull_currency(
    env: &Env,
    config: &LodgeConfig,
    from: &Address,
    amount: Amount,
) -> Result<(), Error> {
    let token_client = TokenClient::new(env, &config.currency);
    match token_client.try_transfer(from, &env.current_contract_address(), &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::TransferFailed),
    }
}

/// Pay `amount` out of custody to `to`.
pub fn pay_currency(
    env: &Env,
    config: &LodgeConfig,
    to: &Address,
    amount: Amount,
) -> Result<(), Error> {
    let token_client = TokenClient::new(env, &config.currency);
    match token_client.try_transfer(&env.current_contract_address(), to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::TransferFailed),
    }
}

pub fn custody_balance(env: &Env, config: &LodgeConfig) -> Amount {
    TokenClient::new(env, &config.currency).balance(&env.current_contract_address())
}
