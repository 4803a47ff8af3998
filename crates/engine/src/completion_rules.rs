//! Rules completing bank statement lines.
//!
//! Each journal holds a set of rules. When a statement line is imported,
//! the rules run in `sequence` order and the first one returning values
//! wins.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

/// The strategy a rule applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionFunction {
    /// Match the amount of an open supplier invoice.
    FromAmount,
    /// Match the reference of a previous journal item.
    FromMoveLineRef,
    /// Match the name of a payment line.
    FromPaymentLine,
}

impl CompletionFunction {
    pub const ALL: [CompletionFunction; 3] =
        [Self::FromAmount, Self::FromMoveLineRef, Self::FromPaymentLine];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FromAmount => "get_from_amount",
            Self::FromMoveLineRef => "get_from_move_line_ref",
            Self::FromPaymentLine => "get_from_payment_line",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FromAmount => {
                "Compassion: From line amount (based on the amount of the supplier invoice)"
            }
            Self::FromMoveLineRef => {
                "Compassion: From line reference (based on previous move_line references)"
            }
            Self::FromPaymentLine => "From payment line reference",
        }
    }
}

impl TryFrom<&str> for CompletionFunction {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == value)
            .ok_or_else(|| {
                EngineError::InvalidState(format!("invalid completion function: {value}"))
            })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRule {
    pub id: Uuid,
    /// Lower runs first.
    pub sequence: i32,
    pub name: String,
    pub function: CompletionFunction,
}

/// An imported bank statement line, before completion.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    pub name: String,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    /// Signed amount in minor units, negative for debits.
    pub amount_minor: i64,
}

/// Values proposed for a statement line.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub partner_id: Option<Uuid>,
}

impl Completion {
    pub fn partner(partner_id: Uuid) -> Self {
        Self {
            partner_id: Some(partner_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.partner_id.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "completion_rules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub sequence: i32,
    pub name: String,
    pub function: String,
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

impl TryFrom<Model> for CompletionRule {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "completion rule")?,
            sequence: model.sequence,
            function: CompletionFunction::try_from(model.function.as_str())?,
            name: model.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn functions_parse_from_method_names() {
        for function in CompletionFunction::ALL {
            assert_eq!(
                CompletionFunction::try_from(function.as_str()).unwrap(),
                function
            );
        }
        assert!(CompletionFunction::try_from("get_from_nowhere").is_err());
    }

    #[test]
    fn statement_line_reads_ref_key() {
        let line: StatementLine =
            serde_json::from_str(r#"{"name":"BVR","ref":"0042","amount_minor":-1000}"#).unwrap();
        assert_eq!(line.reference.as_deref(), Some("0042"));
        assert_eq!(line.amount_minor, -1000);
    }
}
