pub mod customer;
pub mod message;
pub mod order;
pub mod product;

pub use customer::CustomerStatus;
pub use message::MessagePriority;
pub use order::{Department, OrderStatus, StageState};
pub use product::ProductStatus;
