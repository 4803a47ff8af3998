//! Child requests sent by SMS.
//!
//! A request is created when someone texts the sponsorship keyword; a child
//! is reserved for it and the sender gets a link to the mobile form.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_optional_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsChildRequest {
    pub id: i64,
    /// Phone number the SMS came from.
    pub sender: String,
    pub partner_id: Option<Uuid>,
    pub child_id: Option<Uuid>,
    pub sponsorship_confirmed: bool,
    pub preferences: ChildPreferences,
    pub sponsorship_id: Option<Uuid>,
}

/// Criteria used to pick another child for a request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildPreferences {
    pub gender: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub field_office_id: Option<Uuid>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sms_child_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub sender: String,
    pub partner_id: Option<String>,
    pub child_id: Option<String>,
    pub sponsorship_confirmed: bool,
    pub gender: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub field_office_id: Option<String>,
    pub sponsorship_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for SmsChildRequest {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            sender: model.sender,
            partner_id: parse_optional_uuid(model.partner_id.as_deref(), "partner")?,
            child_id: parse_optional_uuid(model.child_id.as_deref(), "child")?,
            sponsorship_confirmed: model.sponsorship_confirmed,
            preferences: ChildPreferences {
                gender: model.gender,
                min_age: model.min_age,
                max_age: model.max_age,
                field_office_id: parse_optional_uuid(
                    model.field_office_id.as_deref(),
                    "field office",
                )?,
            },
            sponsorship_id: parse_optional_uuid(model.sponsorship_id.as_deref(), "sponsorship")?,
        })
    }
}
