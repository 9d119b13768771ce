use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Claim rejected - stage closed or participant not whitelisted")]
    WrongStageOrNotWhitelisted,
    #[msg("Payment cap exhausted for this participant")]
    CapExhausted,
    #[msg("Stage cannot advance past Finish")]
    InvalidTransition,
    #[msg("Current slot is outside the claim window")]
    OutsideClaimWindow,
    #[msg("Signer is not the sale admin")]
    Unauthorized,
    #[msg("Whitelist entry account does not match the address")]
    WhitelistAccountMismatch,
    #[msg("Pool share must be at most 10000 bps")]
    InvalidPoolShare,
    #[msg("Reward rate must be greater than zero")]
    InvalidRewardRate,
    #[msg("Per-address payment cap must be greater than zero")]
    InvalidPaymentCap,
    #[msg("Auto draw threshold must be greater than zero")]
    InvalidThreshold,
    #[msg("Sink address must be provided")]
    InvalidSink,
    #[msg("Claim window ends before it starts")]
    InvalidClaimWindow,
    #[msg("Failed to collect currency from participant")]
    CurrencyTransferFailed,
    #[msg("Failed to transfer reward tokens to participant")]
    RewardTransferFailed,
    #[msg("Dividend sink transfer failed")]
    SinkTransferFailed,
    #[msg("Math overflow occurred during calculation")]
    MathOverflow,
}
