use super::{account, product};
use common::ProductCardDto;
use sea_orm::entity::prelude::*;

/// A prepaid product card, optionally redeemed by an account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "productcard")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub card_number: String,
    pub product_id: String,
    /// Set once the card has been redeemed.
    pub account_id: Option<String>,
    /// Days of service granted by the card.
    pub card_day: i32,
    pub is_used: bool,
    pub used_at: Option<DateTime>,
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

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductCardDto {
    fn from(model: Model) -> Self {
        Self {
            card_number: model.card_number,
            product_id: model.product_id,
            card_day: model.card_day,
            is_used: model.is_used,
            used_at: model.used_at,
        }
    }
}
