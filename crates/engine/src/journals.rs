//! Accounting journals statements are imported into.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "journals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::journal_rules::Entity")]
    JournalRules,
}

impl Related<super::journal_rules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalRules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
