//! Domain models hydrated from database rows.

pub mod address;
pub mod cart;
pub mod favorite;
pub mod order;
pub mod product;
pub mod store;
pub mod user;

pub use address::Address;
pub use cart::CartItem;
pub use favorite::Favorite;
pub use order::{Checkout, Order};
pub use product::{Product, ProductType};
pub use store::{Store, StoreMembership};
pub use user::User;
