//! SeaORM entities for the set-top-box account administration.

pub mod account;
pub mod product;
pub mod product_card;
pub mod stb_bind;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::account::Entity as Account;
    pub use super::product::Entity as Product;
    pub use super::product_card::Entity as ProductCard;
    pub use super::stb_bind::Entity as StbBind;
}
