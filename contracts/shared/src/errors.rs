use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotInit = 1,
    AlreadyInit = 2,
    Unauthorized = 3,
    InvInput = 4,
    NotFound = 5,

    // Round phase errors
    RoundClosed = 6,
    RoundOpen = 7,

    // Vote ledger errors
    ZeroAmount = 8,
    TransferFailed = 9,

    // Reward errors
    NotOwner = 10,
    AlreadyWithdrawn = 11,
    Overflow = 12,

    // Ownership token errors
    MintFailed = 13,
    AlreadyMinted = 14,
    MissingRole = 15,
}
