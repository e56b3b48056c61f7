use soroban_sdk::{symbol_short, Symbol};

// Lodge
pub const LODGE_INITIALIZED: Symbol = symbol_short!("init");
pub const ROUND_SEALED: Symbol = symbol_short!("r_sealed");
pub const ROUND_OPENED: Symbol = symbol_short!("r_opened");
pub const STRUCTURE_REGISTERED: Symbol = symbol_short!("built");
pub const VOTE_CAST: Symbol = symbol_short!("voted");
pub const ROYALTY_WITHDRAWN: Symbol = symbol_short!("royalty");
pub const REWARD_WITHDRAWN: Symbol = symbol_short!("reward");
pub const POOL_FUNDED: Symbol = symbol_short!("funded");

// Structure token
pub const TOKEN_MINTED: Symbol = symbol_short!("minted");
pub const TOKEN_TRANSFERRED: Symbol = symbol_short!("transfer");
pub const MINTER_GRANTED: Symbol = symbol_short!("minter");
pub const MINTER_REVOKED: Symbol = symbol_short!("unminter");
