// PDA Seeds
pub const SALE_CONFIG_SEED: &[u8] = b"sale_config";
pub const SALE_LEDGER_SEED: &[u8] = b"sale_ledger";
pub const WHITELIST_SEED: &[u8] = b"whitelist";
pub const PARTICIPANT_RECORD_SEED: &[u8] = b"participant_record";
pub const SALE_AUTHORITY_SEED: &[u8] = b"sale_authority";
pub const DIVIDEND_VAULT_SEED: &[u8] = b"dividend_vault";
pub const REWARD_VAULT_SEED: &[u8] = b"reward_vault";

// Fixed-point scales
pub const BPS_DENOMINATOR: u128 = 10_000;
pub const MAX_POOL_SHARE_BPS: u16 = 10_000; // 100%
pub const REWARD_RATE_SCALE: u128 = 1_000_000_000_000_000_000; // 1e18
pub const REWARD_PRICE_NUMERATOR: u128 = REWARD_RATE_SCALE * REWARD_RATE_SCALE; // 1e36

