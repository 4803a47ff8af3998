//! Sponsored children, as mirrored from the child pool.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError,
    util::{parse_optional_uuid, parse_uuid},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    pub id: Uuid,
    /// Identifier shared with the national offices.
    pub global_id: String,
    pub local_id: Option<String>,
    pub name: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub gender: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub age: Option<i32>,
    pub weight: Option<String>,
    pub height: Option<String>,
    pub education_level: Option<String>,
    pub academic_performance: Option<String>,
    pub vocational_training_type: Option<String>,
    pub sponsorship_status: Option<String>,
    pub desc_en: Option<String>,
    pub image_url: Option<String>,
    pub field_office_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub sponsor_id: Option<Uuid>,
}

impl Child {
    /// Name shown to sponsors, `local_id` first when known.
    pub fn display_name(&self) -> String {
        match &self.local_id {
            Some(local_id) => format!("{local_id} - {}", self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "children")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub global_id: String,
    pub local_id: Option<String>,
    pub name: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub gender: Option<String>,
    pub birthdate: Option<Date>,
    pub age: Option<i32>,
    pub weight: Option<String>,
    pub height: Option<String>,
    pub education_level: Option<String>,
    pub academic_performance: Option<String>,
    pub vocational_training_type: Option<String>,
    pub sponsorship_status: Option<String>,
    pub desc_en: Option<String>,
    pub image_url: Option<String>,
    pub field_office_id: Option<String>,
    pub project_id: Option<String>,
    pub sponsor_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::child_pictures::Entity")]
    Pictures,
}

impl Related<super::child_pictures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pictures.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Child {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "child")?,
            field_office_id: parse_optional_uuid(model.field_office_id.as_deref(), "field office")?,
            project_id: parse_optional_uuid(model.project_id.as_deref(), "project")?,
            sponsor_id: parse_optional_uuid(model.sponsor_id.as_deref(), "sponsor")?,
            global_id: model.global_id,
            local_id: model.local_id,
            name: model.name,
            firstname: model.firstname,
            lastname: model.lastname,
            gender: model.gender,
            birthdate: model.birthdate,
            age: model.age,
            weight: model.weight,
            height: model.height,
            education_level: model.education_level,
            academic_performance: model.academic_performance,
            vocational_training_type: model.vocational_training_type,
            sponsorship_status: model.sponsorship_status,
            desc_en: model.desc_en,
            image_url: model.image_url,
        })
    }
}
