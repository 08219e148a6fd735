use super::{account, product};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

/// Number of days a binding lasts when it is created by the admin flow.
pub const DEFAULT_BIND_DAY: i32 = 356;

/// Join row between an account and a product.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "stbbind")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub account_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: String,
    pub bind_day: i32,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "account::Entity",
        from = "Column::AccountId",
        to = "account::Column::AccountId"
    )]
    Account,
    #[sea_orm(
        belongs_to = "product::Entity",
        from = "Column::ProductId",
        to = "product::Column::ProductId"
    )]
    Product,
}

impl Related<account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// A new binding with the defaults used on create and update.
    pub fn with_defaults(account_id: &str, product_id: &str) -> Self {
        Self {
            account_id: Set(account_id.to_owned()),
            product_id: Set(product_id.to_owned()),
            bind_day: Set(DEFAULT_BIND_DAY),
            is_active: Set(false),
        }
    }
}
