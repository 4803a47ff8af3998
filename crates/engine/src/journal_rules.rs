//! Completion rules enabled on a journal.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "journal_completion_rules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub journal_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub rule_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::journals::Entity",
        from = "Column::JournalId",
        to = "super::journals::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Journals,
    #[sea_orm(
        belongs_to = "super::completion_rules::Entity",
        from = "Column::RuleId",
        to = "super::completion_rules::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    CompletionRules,
}

impl Related<super::journals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Journals.def()
    }
}

impl Related<super::completion_rules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompletionRules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
