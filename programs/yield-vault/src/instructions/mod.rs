pub mod admin;
pub mod deposit;
pub mod initialize;
pub mod mint_shares;
pub mod redeem;
pub mod strategy;
pub mod view;
pub mod withdraw;

pub use admin::*;
pub use deposit::*;
pub use initialize::*;
pub use mint_shares::*;
pub use redeem::*;
pub use strategy::*;
pub use view::*;
pub use withdraw::*;
