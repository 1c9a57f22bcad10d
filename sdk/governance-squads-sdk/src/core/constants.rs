use solana_sdk::pubkey;
use solana_sdk::pubkey::Pubkey;

/// Squads V4 multisig program (mainnet/devnet)
pub const SQUADS_V4_PROGRAM_ID: Pubkey = pubkey!("SQDS4ep65T869zMMBKyuUq6aD6EgTu8psMjkvj52pCf");

/// SPL Governance program
pub const GOVERNANCE_PROGRAM_ID: Pubkey = pubkey!("GovER5Lthms3bLBqWub97yVrMmEogzX7xNjdXpPPCVZw");

/// SPL Name Service program
pub const NAME_PROGRAM_ID: Pubkey = pubkey!("namesLPneVptA9Z5rqUDD9tMTWEJwofgaYwp8cawRkX");

/// Parent name account of every `.sol` domain
pub const SOL_ROOT_DOMAIN: Pubkey = pubkey!("58PwtjSDuFHuUkYjH9BYnnQKHfwo9reZhC2zMJv9JPkx");

pub const NAME_HASH_PREFIX: &str = "SPL Name Service";

/// sha256("global:multisig_add_member")[..8]
pub const MULTISIG_ADD_MEMBER_DISCRIMINATOR: [u8; 8] = [1, 219, 215, 108, 184, 229, 214, 8];

pub const NATIVE_TREASURY_SEED: &[u8] = b"native-treasury";

/// Initiate | Vote | Execute. Members added through governance get full rights.
pub const FULL_PERMISSIONS_MASK: u8 = 7;

/// Each add-member instruction goes into its own transaction chunk.
pub const ADD_MEMBER_CHUNK_BY: u32 = 1;

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
