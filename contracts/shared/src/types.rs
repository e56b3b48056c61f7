use soroban_sdk::{contracttype, Address, String};

/// Currency amount in the token's smallest unit.
pub type Amount = i128;

/// Immutable lodge configuration, fixed at `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LodgeConfig {
    /// Contract minting one ownership token per structure.
    pub ownership_token: Address,
    /// Fungible currency used for votes, fees and payouts.
    pub currency: Address,
    /// Round length in seconds of ledger time.
    pub round_duration: u64,
    pub royalty_per_building: Amount,
    pub emission_per_round: Amount,
    /// Charged to the owner on registration; 0 disables it.
    pub build_fee: Amount,
    /// When set, `register` and `advance_round` consult this gate.
    pub access_gate: Option<Address>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundInfo {
    pub index: u64,
    pub started_at: u64,
    pub duration: u64,
    pub total_vote_weight: Amount,
    pub structure_count: u64,
    pub sealed: bool,
    pub royalty_paid: Amount,
    pub reward_paid: Amount,
}

impl RoundInfo {
    pub fn ends_at(&self) -> u64 {
        self.started_at.saturating_add(self.duration)
    }

    pub fn is_due(&self, now: u64) -> bool {
        !self.sealed && now >= self.ends_at()
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Structure {
    pub id: u64,
    /// Owner at registration. Payouts go to the ownership token's current holder.
    pub owner: Address,
    pub round: u64,
    pub sponsored: bool,
    pub metadata: String,
    pub vote_weight: Amount,
    pub royalty_withdrawn: bool,
    pub reward_withdrawn: bool,
    pub created_at: u64,
}
