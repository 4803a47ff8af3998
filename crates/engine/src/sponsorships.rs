//! The module contains the `Sponsorship` (recurring contract) and its
//! persistence model.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, SdsState,
    util::{parse_optional_uuid, parse_uuid},
};

/// Code of the end reason "child departure".
pub const END_REASON_CHILD_DEPARTURE: &str = "1";
/// Code of the end reason "exchange of child".
pub const END_REASON_CHILD_EXCHANGE: &str = "11";

/// Base contract workflow. The SDS status reacts to its transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractState {
    #[default]
    Draft,
    Waiting,
    Active,
    Terminated,
    Cancelled,
}

impl ContractState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Waiting => "waiting",
            Self::Active => "active",
            Self::Terminated => "terminated",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for ContractState {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "draft" => Ok(Self::Draft),
            "waiting" => Ok(Self::Waiting),
            "active" => Ok(Self::Active),
            "terminated" => Ok(Self::Terminated),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::InvalidState(format!(
                "invalid contract state: {other}"
            ))),
        }
    }
}

/// A recurring sponsorship commitment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sponsorship {
    pub id: Uuid,
    /// The paying sponsor.
    pub partner_id: Uuid,
    /// The partner writing to the child. Their language selects the SDS
    /// follower.
    pub correspondent_id: Uuid,
    pub child_id: Option<Uuid>,
    /// Contract type code. Containing `S` flags a sponsorship that can
    /// substitute another one.
    pub kind: String,
    pub state: ContractState,
    pub end_reason: Option<String>,
    pub origin_id: Option<Uuid>,
    /// The sponsorship this one substitutes.
    pub parent_id: Option<Uuid>,
    /// The substitute offered for this sponsorship. Not kept in sync with
    /// `parent_id`.
    pub sub_sponsorship_id: Option<Uuid>,
    pub sds_state: SdsState,
    pub sds_state_date: Option<NaiveDate>,
    pub color: i32,
    pub no_sub_reason: Option<String>,
    /// Staff user following the SDS status.
    pub sds_uid: Option<String>,
    pub sub_notes: Option<String>,
    pub cancel_gifts_on_termination: bool,
    pub created_at: DateTime<Utc>,
}

impl Sponsorship {
    pub fn is_substitute_type(&self) -> bool {
        is_substitute_kind(&self.kind)
    }
}

pub(crate) fn is_substitute_kind(kind: &str) -> bool {
    kind.contains('S')
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sponsorships")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub partner_id: String,
    pub correspondent_id: String,
    pub child_id: Option<String>,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub state: String,
    pub end_reason: Option<String>,
    pub origin_id: Option<String>,
    pub parent_id: Option<String>,
    pub sub_sponsorship_id: Option<String>,
    pub sds_state: String,
    pub sds_state_date: Option<Date>,
    pub color: i32,
    pub no_sub_reason: Option<String>,
    pub sds_uid: Option<String>,
    pub sub_notes: Option<String>,
    pub cancel_gifts_on_termination: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::partners::Entity",
        from = "Column::PartnerId",
        to = "super::partners::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Partners,
}

impl Related<super::partners::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Partners.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub(crate) fn sds(&self) -> ResultEngine<SdsState> {
        SdsState::try_from(self.sds_state.as_str())
    }

    pub(crate) fn contract_state(&self) -> ResultEngine<ContractState> {
        ContractState::try_from(self.state.as_str())
    }
}

impl From<&Sponsorship> for ActiveModel {
    fn from(value: &Sponsorship) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            partner_id: ActiveValue::Set(value.partner_id.to_string()),
            correspondent_id: ActiveValue::Set(value.correspondent_id.to_string()),
            child_id: ActiveValue::Set(value.child_id.map(|id| id.to_string())),
            kind: ActiveValue::Set(value.kind.clone()),
            state: ActiveValue::Set(value.state.as_str().to_string()),
            end_reason: ActiveValue::Set(value.end_reason.clone()),
            origin_id: ActiveValue::Set(value.origin_id.map(|id| id.to_string())),
            parent_id: ActiveValue::Set(value.parent_id.map(|id| id.to_string())),
            sub_sponsorship_id: ActiveValue::Set(value.sub_sponsorship_id.map(|id| id.to_string())),
            sds_state: ActiveValue::Set(value.sds_state.as_str().to_string()),
            sds_state_date: ActiveValue::Set(value.sds_state_date),
            color: ActiveValue::Set(value.color),
            no_sub_reason: ActiveValue::Set(value.no_sub_reason.clone()),
            sds_uid: ActiveValue::Set(value.sds_uid.clone()),
            sub_notes: ActiveValue::Set(value.sub_notes.clone()),
            cancel_gifts_on_termination: ActiveValue::Set(value.cancel_gifts_on_termination),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Sponsorship {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "sponsorship")?,
            partner_id: parse_uuid(&model.partner_id, "partner")?,
            correspondent_id: parse_uuid(&model.correspondent_id, "correspondent")?,
            child_id: parse_optional_uuid(model.child_id.as_deref(), "child")?,
            state: model.contract_state()?,
            sds_state: model.sds()?,
            origin_id: parse_optional_uuid(model.origin_id.as_deref(), "origin")?,
            parent_id: parse_optional_uuid(model.parent_id.as_deref(), "parent sponsorship")?,
            sub_sponsorship_id: parse_optional_uuid(
                model.sub_sponsorship_id.as_deref(),
                "sub sponsorship",
            )?,
            kind: model.kind,
            end_reason: model.end_reason,
            sds_state_date: model.sds_state_date,
            color: model.color,
            no_sub_reason: model.no_sub_reason,
            sds_uid: model.sds_uid,
            sub_notes: model.sub_notes,
            cancel_gifts_on_termination: model.cancel_gifts_on_termination,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitute_kind_contains_s() {
        assert!(is_substitute_kind("S"));
        assert!(is_substitute_kind("SC"));
        assert!(!is_substitute_kind("O"));
        assert!(!is_substitute_kind(""));
    }

    #[test]
    fn contract_state_parsing() {
        assert_eq!(
            ContractState::try_from("terminated").unwrap(),
            ContractState::Terminated
        );
        assert_eq!(
            ContractState::try_from("mandate").unwrap_err(),
            EngineError::InvalidState("invalid contract state: mandate".to_string())
        );
    }
}
