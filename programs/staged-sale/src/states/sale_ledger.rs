use anchor_lang::prelude::*;
use crate::errors::ErrorCode;
use super::Stage;

/// Running totals of the sale, mutated by every claim and every draw
#[account]
#[derive(InitSpace)]
pub struct SaleLedger {
    /// Current lifecycle stage
    pub stage: Stage,
    /// Total currency accepted across all participants (in lamports)
    pub total_currency_received: u64,
    /// Total reward tokens paid out (in base units)
    pub total_reward_disbursed: u64,
    /// Currency collected since the last draw (in lamports)
    pub undrawn_dividend: u64,
    /// Total currency sent to the sinks (in lamports)
    pub total_dividend_drawn: u64,
    /// Number of non-empty draws
    pub draw_count: u32,
    /// Number of distinct participants with an accepted claim
    pub participant_count: u32,
    /// Timestamp of the last non-empty draw
    pub last_draw_timestamp: i64,
    /// Number of whitelist entries created
    pub whitelisted_count: u32,
    /// Bump seed for the PDA
    pub bump: u8,
}

impl SaleLedger {
    pub fn new(bump: u8) -> Self {
        Self {
            stage: Stage::Prepare,
            total_currency_received: 0,
            total_reward_disbursed: 0,
            undrawn_dividend: 0,
            total_dividend_drawn: 0,
            draw_count: 0,
            participant_count: 0,
            last_draw_timestamp: 0,
            whitelisted_count: 0,
            bump,
        }
    }

    /// Moves to the next stage, returning the stage left behind
    pub fn advance_stage(&mut self) -> Result<Stage> {
        let previous = self.stage;
        self.stage = previous.next().ok_or(ErrorCode::InvalidTransition)?;
        Ok(previous)
    }

    /// Books an accepted claim into the running totals
    pub fn record_claim(&mut self, accepted: u64, reward: u64, new_participant: bool) -> Result<()> {
        self.total_currency_received = self.total_currency_received
            .checked_add(accepted)
            .ok_or(ErrorCode::MathOverflow)?;

        self.total_reward_disbursed = self.total_reward_disbursed
            .checked_add(reward)
            .ok_or(ErrorCode::MathOverflow)?;

        self.undrawn_dividend = self.undrawn_dividend
            .checked_add(accepted)
            .ok_or(ErrorCode::MathOverflow)?;

        if new_participant {
            self.participant_count = self.participant_count
                .checked_add(1)
                .ok_or(ErrorCode::MathOverflow)?;
        }

        Ok(())
    }

    pub fn record_whitelisted(&mut self, added: u32) -> Result<u32> {
        self.whitelisted_count = self.whitelisted_count
            .checked_add(added)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(self.whitelisted_count)
    }

    pub fn should_auto_draw(&self, threshold: u64) -> bool {
        self.undrawn_dividend > 0 && self.undrawn_dividend >= threshold
    }

    /// Zeroes the accumulator and returns what it held.
    /// Must run before any sink transfer.
    pub fn take_undrawn(&mut self, now: i64) -> Result<u64> {
        let amount = self.undrawn_dividend;
        if amount == 0 {
            return Ok(0);
        }

        self.undrawn_dividend = 0;
        self.total_dividend_drawn = self.total_dividend_drawn
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        self.draw_count = self.draw_count
            .checked_add(1)
            .ok_or(ErrorCode::MathOverflow)?;
        self.last_draw_timestamp = now;

        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_four_times_then_fail() {
        let mut ledger = SaleLedger::new(255);
        assert_eq!(ledger.advance_stage().unwrap(), Stage::Prepare);
        assert_eq!(ledger.advance_stage().unwrap(), Stage::PrivateSale);
        assert_eq!(ledger.advance_stage().unwrap(), Stage::PublicSale);
        assert_eq!(ledger.stage, Stage::Finish);

        let err = ledger.advance_stage().unwrap_err();
        assert_eq!(err, Error::from(ErrorCode::InvalidTransition));
        assert_eq!(ledger.stage, Stage::Finish);
    }

    #[test]
    fn test_take_undrawn_is_idempotent() {
        let mut ledger = SaleLedger::new(255);
        ledger.record_claim(700, 350, true).unwrap();
        ledger.record_claim(300, 150, false).unwrap();
        assert_eq!(ledger.participant_count, 1);
        assert_eq!(ledger.undrawn_dividend, 1_000);

        assert_eq!(ledger.take_undrawn(42).unwrap(), 1_000);
        assert_eq!(ledger.take_undrawn(43).unwrap(), 0);

        assert_eq!(ledger.undrawn_dividend, 0);
        assert_eq!(ledger.total_dividend_drawn, 1_000);
        assert_eq!(ledger.total_currency_received, 1_000);
        assert_eq!(ledger.total_reward_disbursed, 500);
        assert_eq!(ledger.draw_count, 1);
        assert_eq!(ledger.last_draw_timestamp, 42);
    }

    #[test]
    fn test_whitelisted_count_accumulates() {
        let mut ledger = SaleLedger::new(255);
        for _ in 0..15 {
            ledger.record_whitelisted(20).unwrap();
        }
        assert_eq!(ledger.record_whitelisted(1).unwrap(), 301);

        ledger.whitelisted_count = u32::MAX;
        let err = ledger.record_whitelisted(1).unwrap_err();
        assert_eq!(err, Error::from(ErrorCode::MathOverflow));
    }

    #[test]
    fn test_should_auto_draw() {
        let mut ledger = SaleLedger::new(255);
        assert!(!ledger.should_auto_draw(0));
        ledger.record_claim(4, 0, true).unwrap();
        assert!(!ledger.should_auto_draw(5));
        ledger.record_claim(1, 0, false).unwrap();
        assert!(ledger.should_auto_draw(5));
    }
}
