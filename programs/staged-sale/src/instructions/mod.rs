pub mod initialize_sale;
pub use initialize_sale::*;

pub mod advance_stage;
pub use advance_stage::*;

pub mod add_addresses;
pub use add_addresses::*;

pub mod claim;
pub use claim::*;

pub mod draw_dividend;
pub use draw_dividend::*;

pub mod snapshot;
pub use snapshot::*;
