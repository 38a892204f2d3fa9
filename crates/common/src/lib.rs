pub mod ids;
pub mod money;

pub use ids::{CartId, ItemId};
pub use money::{Currency, Money};
