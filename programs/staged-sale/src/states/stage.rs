use anchor_lang::prelude::*;

/// Campaign lifecycle. Transitions are forward-only.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub enum Stage {
    #[default]
    Prepare,
    PrivateSale,
    PublicSale,
    Finish,
}

impl Stage {
    /// The stage that follows this one, `None` once finished
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Prepare => Some(Stage::PrivateSale),
            Stage::PrivateSale => Some(Stage::PublicSale),
            Stage::PublicSale => Some(Stage::Finish),
            Stage::Finish => None,
        }
    }

    /// Claim admission for a participant with the given whitelist status
    pub fn admits(self, whitelisted: bool) -> bool {
        match self {
            Stage::Prepare | Stage::Finish => false,
            Stage::PrivateSale => whitelisted,
            Stage::PublicSale => true,
        }
    }
}
