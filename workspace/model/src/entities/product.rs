use super::stb_bind;
use common::ProductDto;
use sea_orm::entity::prelude::*;

/// A channel or service that can be bound to accounts.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: String,
    pub product_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stb_bind::Entity")]
    StbBind,
}

impl Related<stb_bind::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StbBind.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductDto {
    fn from(model: Model) -> Self {
        Self {
            product_id: model.product_id,
            product_name: model.product_name,
        }
    }
}
