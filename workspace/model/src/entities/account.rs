use super::{product, product_card, stb_bind};
use common::AccountDto;
use sea_orm::entity::prelude::*;

/// States in which an account may not be updated or deleted.
pub const LOCKED_STATES: [&str; 2] = ["1001", "1004"];

/// State in which an account is created without any product binding.
pub const NO_BINDING_STATE: &str = "1003";

/// Returns true when accounts created in `state` never receive bindings.
pub fn skips_binding(state: &str) -> bool {
    state == NO_BINDING_STATE
}

/// Returns true when `state` forbids update, delete and bulk delete.
pub fn is_locked_state(state: &str) -> bool {
    LOCKED_STATES.contains(&state)
}

/// A set-top-box account.
///
/// The bound products are not stored on the row; they live in `stbbind`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "account")]
pub struct Model {
    /// Assigned by the caller on creation, immutable afterwards.
    #[sea_orm(primary_key, auto_increment = false)]
    pub account_id: String,
    /// Four digit state code, e.g. "1002".
    pub state: String,
    /// Toggled independently of `state`.
    #[sea_orm(default_value = "true")]
    pub enable: bool,
}

impl Model {
    pub fn is_locked(&self) -> bool {
        is_locked_state(&self.state)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stb_bind::Entity")]
    StbBind,
    #[sea_orm(has_many = "super::product_card::Entity")]
    ProductCard,
}

impl Related<stb_bind::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StbBind.def()
    }
}

impl Related<product_card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductCard.def()
    }
}

/// Many-to-many with products through `stbbind`.
impl Related<product::Entity> for Entity {
    fn to() -> RelationDef {
        stb_bind::Relation::Product.def()
    }
    fn via() -> Option<RelationDef> {
        Some(stb_bind::Relation::Account.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for AccountDto {
    fn from(model: Model) -> Self {
        Self {
            account_id: model.account_id,
            state: model.state,
            enable: model.enable,
        }
    }
}
