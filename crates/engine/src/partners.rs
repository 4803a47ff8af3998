//! Partners: sponsors, correspondents and suppliers.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError,
    util::{parse_optional_uuid, parse_uuid},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub id: Uuid,
    /// Public reference, used by the mobile app as the user id.
    pub reference: Option<String>,
    pub firstname: Option<String>,
    pub lastname: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Locale such as `fr_CH`.
    pub lang: Option<String>,
    pub commercial_partner_id: Option<Uuid>,
}

impl Partner {
    pub fn new(firstname: Option<String>, lastname: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            reference: None,
            firstname,
            lastname,
            email: None,
            phone: None,
            lang: None,
            commercial_partner_id: None,
        }
    }

    /// The company a contact belongs to, or the partner itself.
    pub fn commercial_partner(&self) -> Uuid {
        self.commercial_partner_id.unwrap_or(self.id)
    }

    /// Two-letter language code, e.g. `fr` for `fr_CH`.
    pub fn lang_code(&self) -> Option<&str> {
        self.lang.as_deref().and_then(|lang| lang.get(..2))
    }

    pub fn display_name(&self) -> String {
        match &self.firstname {
            Some(firstname) => format!("{firstname} {}", self.lastname),
            None => self.lastname.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "partners")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_name = "ref")]
    pub reference: Option<String>,
    pub firstname: Option<String>,
    pub lastname: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub lang: Option<String>,
    pub commercial_partner_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sponsorships::Entity")]
    Sponsorships,
}

impl Related<super::sponsorships::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sponsorships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Partner> for ActiveModel {
    fn from(value: &Partner) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            reference: ActiveValue::Set(value.reference.clone()),
            firstname: ActiveValue::Set(value.firstname.clone()),
            lastname: ActiveValue::Set(value.lastname.clone()),
            email: ActiveValue::Set(value.email.clone()),
            phone: ActiveValue::Set(value.phone.clone()),
            lang: ActiveValue::Set(value.lang.clone()),
            commercial_partner_id: ActiveValue::Set(
                value.commercial_partner_id.map(|id| id.to_string()),
            ),
        }
    }
}

impl TryFrom<Model> for Partner {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "partner")?,
            commercial_partner_id: parse_optional_uuid(
                model.commercial_partner_id.as_deref(),
                "commercial partner",
            )?,
            reference: model.reference,
            firstname: model.firstname,
            lastname: model.lastname,
            email: model.email,
            phone: model.phone,
            lang: model.lang,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lang_code_takes_two_letters() {
        let mut partner = Partner::new(None, "Muster".to_string());
        assert_eq!(partner.lang_code(), None);
        partner.lang = Some("de_CH".to_string());
        assert_eq!(partner.lang_code(), Some("de"));
        partner.lang = Some("x".to_string());
        assert_eq!(partner.lang_code(), None);
    }

    #[test]
    fn commercial_partner_defaults_to_self() {
        let mut partner = Partner::new(Some("Anna".to_string()), "Muster".to_string());
        assert_eq!(partner.commercial_partner(), partner.id);
        let company = Uuid::new_v4();
        partner.commercial_partner_id = Some(company);
        assert_eq!(partner.commercial_partner(), company);
        assert_eq!(partner.display_name(), "Anna Muster");
    }
}
