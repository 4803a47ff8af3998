//! Per-language SDS follower assignment.
//!
//! Settings are keyed `sub_<lang>` (e.g. `sub_fr`) and point to the user
//! following the substitute search for correspondents of that language.

use sea_orm::entity::prelude::*;

/// Setting key for a two-letter language code.
pub fn sub_follower_key(lang_code: &str) -> String {
    format!("sub_{lang_code}")
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sds_follower_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
