//! Invoices, read by the completion rules.

use sea_orm::entity::prelude::*;

/// Supplier invoice.
pub const KIND_SUPPLIER: &str = "in_invoice";
pub const STATE_OPEN: &str = "open";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub partner_id: String,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub state: String,
    pub amount_total_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
