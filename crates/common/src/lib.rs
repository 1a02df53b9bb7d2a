//! Shared value objects for the product-order system.
//!
//! Typed identifiers, fixed-point money, requester identity and
//! pagination types used by every other crate in the workspace.

pub mod identity;
pub mod money;
pub mod page;
pub mod types;

pub use identity::{Identity, Role};
pub use money::Money;
pub use page::{Page, PageRequest};
pub use types::{LineId, OrderId, ProductId, UserId};
