pub mod initialize_distribution;
pub mod configure_categories;
pub mod set_generation_event_date;
pub mod trigger_release;
pub mod initialize_sale;
pub mod fund_sale;
pub mod add_participant;
pub mod lock_tokens;
pub mod release_tokens;
pub mod release_tokens_for;
pub mod close_sale;
pub mod pull_payment;
pub mod emit_sale_quote;
pub mod initialize_stake_pool;
pub mod stake;
pub mod claim_rewards;
pub mod restake_rewards;
pub mod unstake;
pub mod emit_earned_rewards;

pub use initialize_distribution::*;
pub use configure_categories::*;
pub use set_generation_event_date::*;
pub use trigger_release::*;
pub use initialize_sale::*;
pub use fund_sale::*;
pub use add_participant::*;
pub use lock_tokens::*;
pub use release_tokens::*;
pub use release_tokens_for::*;
pub use close_sale::*;
pub use pull_payment::*;
pub use emit_sale_quote::*;
pub use initialize_stake_pool::*;
pub use stake::*;
pub use claim_rewards::*;
pub use restake_rewards::*;
pub use unstake::*;
pub use emit_earned_rewards::*;
