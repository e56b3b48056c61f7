use soroban_sdk::{symbol_short, Symbol};

/// Index of the round opened by `initialize`.
pub const FIRST_ROUND_INDEX: u64 = 1;

/// Structure ids are assigned from here upwards; ownership token ids match.
pub const FIRST_STRUCTURE_ID: u64 = 1;

/// Roughly one day of ledgers at 5s per ledger.
pub const DAY_IN_LEDGERS: u32 = 17_280;

pub const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

/// Round, structure and contribution entries outlive several rounds.
pub const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub const PERSISTENT_LIFETIME_THRESHOLD: u32 = PERSISTENT_BUMP_AMOUNT - DAY_IN_LEDGERS;

/// AccessGate action names.
pub const ACTION_REGISTER: Symbol = symbol_short!("register");
pub const ACTION_ADVANCE: Symbol = symbol_short!("advance");
