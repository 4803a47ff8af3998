//! SMS sponsorship flow.
//!
//! Requests are read and confirmed by anonymous visitors, so these
//! operations accept [`Actor::Public`]. Records they create on the visitor's
//! behalf are written as [`Actor::System`].

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Actor, Child, ChildPreferences, EngineError, FieldOffice, Partner, ResultEngine,
    SmsChildRequest, Sponsorship, children, field_offices, sms_requests,
    util::{normalize_optional_text, parse_optional_uuid, parse_uuid},
};

use super::{Engine, PartnerNew, SponsorshipNew, with_tx};

/// Sponsorship type created from an SMS request.
const SMS_SPONSORSHIP_KIND: &str = "S";

/// What the mobile form shows for a request.
#[derive(Clone, Debug, PartialEq)]
pub enum SmsChildData {
    /// No such request.
    Invalid,
    /// The sponsorship was already confirmed.
    Confirmed,
    /// No child is reserved for the request.
    NoChild,
    Child {
        child: Child,
        field_office: Option<FieldOffice>,
        /// Field offices available on the childpool, to pick another child.
        countries: Vec<FieldOffice>,
        partner: Option<Partner>,
    },
}

/// Sponsor data submitted with the mobile form.
#[derive(Clone, Debug, Default)]
pub struct SmsSponsorForm {
    pub firstname: Option<String>,
    pub lastname: String,
    pub email: Option<String>,
}

/// Parse an age range written `min-max`. Blank clears it.
fn parse_age_range(age: &str) -> ResultEngine<(Option<i32>, Option<i32>)> {
    let age = age.trim();
    if age.is_empty() {
        return Ok((None, None));
    }
    let invalid = || EngineError::Validation(format!("invalid age range \"{age}\""));
    let (min, max) = age.split_once('-').ok_or_else(invalid)?;
    let min: i32 = min.trim().parse().map_err(|_| invalid())?;
    let max: i32 = max.trim().parse().map_err(|_| invalid())?;
    if min > max {
        return Err(invalid());
    }
    Ok((Some(min), Some(max)))
}

impl Engine {
    /// Register a child request received by SMS.
    pub async fn new_sms_request(
        &self,
        sender: &str,
        child_id: Option<Uuid>,
        partner_id: Option<Uuid>,
        actor: &Actor,
    ) -> ResultEngine<i64> {
        actor.require_authenticated()?;
        let sender = sender.trim();
        if sender.is_empty() {
            return Err(EngineError::Validation("sender must not be empty".to_string()));
        }
        with_tx!(self, |db_tx| {
            if let Some(child_id) = child_id {
                self.require_child(&db_tx, child_id).await?;
            }
            if let Some(partner_id) = partner_id {
                self.require_partner(&db_tx, partner_id).await?;
            }
            let model = sms_requests::ActiveModel {
                id: ActiveValue::NotSet,
                sender: ActiveValue::Set(sender.to_string()),
                partner_id: ActiveValue::Set(partner_id.map(|id| id.to_string())),
                child_id: ActiveValue::Set(child_id.map(|id| id.to_string())),
                sponsorship_confirmed: ActiveValue::Set(false),
                gender: ActiveValue::Set(None),
                min_age: ActiveValue::Set(None),
                max_age: ActiveValue::Set(None),
                field_office_id: ActiveValue::Set(None),
                sponsorship_id: ActiveValue::Set(None),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(request = model.id, "registered SMS child request");
            Ok(model.id)
        })
    }

    /// Return an SMS request.
    pub async fn sms_request(&self, request_id: i64, actor: &Actor) -> ResultEngine<SmsChildRequest> {
        actor.require_authenticated()?;
        with_tx!(self, |db_tx| {
            let model = self.require_sms_request(&db_tx, request_id).await?;
            SmsChildRequest::try_from(model)
        })
    }

    /// Data displayed by the first step of the mobile form.
    pub async fn sms_child_data(&self, request_id: i64, actor: &Actor) -> ResultEngine<SmsChildData> {
        actor.require_visitor()?;
        with_tx!(self, |db_tx| {
            let Some(request) = sms_requests::Entity::find_by_id(request_id)
                .one(&db_tx)
                .await?
            else {
                return Ok(SmsChildData::Invalid);
            };
            let request = SmsChildRequest::try_from(request)?;
            if request.sponsorship_confirmed {
                return Ok(SmsChildData::Confirmed);
            }
            let Some(child_id) = request.child_id else {
                return Ok(SmsChildData::NoChild);
            };

            let child = Child::try_from(self.require_child(&db_tx, child_id).await?)?;
            let field_office = match child.field_office_id {
                Some(id) => Some(FieldOffice::try_from(
                    self.require_field_office(&db_tx, id).await?,
                )?),
                None => None,
            };
            let countries = field_offices::Entity::find()
                .filter(field_offices::Column::AvailableOnChildpool.eq(true))
                .order_by_asc(field_offices::Column::Name)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(FieldOffice::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;
            let partner = match request.partner_id {
                Some(id) => Some(Partner::try_from(self.require_partner(&db_tx, id).await?)?),
                None => None,
            };

            Ok(SmsChildData::Child {
                child,
                field_office,
                countries,
                partner,
            })
        })
    }

    /// Confirm the sponsorship of the reserved child.
    ///
    /// The phone of the sponsor is the SMS sender. A partner is created when
    /// the request has none.
    pub async fn confirm_sms_sponsorship(
        &self,
        request_id: i64,
        form: SmsSponsorForm,
        actor: &Actor,
    ) -> ResultEngine<Uuid> {
        actor.require_visitor()?;
        with_tx!(self, |db_tx| {
            let request =
                SmsChildRequest::try_from(self.require_sms_request(&db_tx, request_id).await?)?;
            if request.sponsorship_confirmed {
                return Err(EngineError::InvalidState(
                    "sponsorship already confirmed".to_string(),
                ));
            }
            let child_id = request.child_id.ok_or_else(|| {
                EngineError::InvalidState("no child reserved for the request".to_string())
            })?;

            let partner_id = match request.partner_id {
                Some(partner_id) => partner_id,
                None => {
                    let cmd = PartnerNew {
                        firstname: form.firstname,
                        lastname: form.lastname,
                        email: form.email,
                        phone: Some(request.sender.clone()),
                        ..Default::default()
                    };
                    self.insert_partner(&db_tx, cmd).await?
                }
            };

            let cmd = SponsorshipNew {
                partner_id,
                child_id: Some(child_id),
                kind: SMS_SPONSORSHIP_KIND.to_string(),
                ..Default::default()
            };
            let sponsorship_id = self.insert_sponsorship(&db_tx, cmd, &Actor::System).await?;

            sms_requests::ActiveModel {
                id: ActiveValue::Unchanged(request.id),
                partner_id: ActiveValue::Set(Some(partner_id.to_string())),
                sponsorship_confirmed: ActiveValue::Set(true),
                sponsorship_id: ActiveValue::Set(Some(sponsorship_id.to_string())),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;

            tracing::info!(request = request.id, sponsorship = %sponsorship_id, "SMS sponsorship confirmed");
            Ok(sponsorship_id)
        })
    }

    /// Store the visitor's preferences and reserve another child matching
    /// them.
    ///
    /// Blank values clear a preference; an unknown country clears the field
    /// office. Returns the newly reserved child, if one matched.
    pub async fn change_sms_child(
        &self,
        request_id: i64,
        gender: &str,
        age: &str,
        country: &str,
        actor: &Actor,
    ) -> ResultEngine<Option<Uuid>> {
        actor.require_visitor()?;
        let (min_age, max_age) = parse_age_range(age)?;
        let gender = normalize_optional_text(Some(gender));
        let country = normalize_optional_text(Some(country));
        with_tx!(self, |db_tx| {
            let request =
                SmsChildRequest::try_from(self.require_sms_request(&db_tx, request_id).await?)?;
            if request.sponsorship_confirmed {
                return Err(EngineError::InvalidState(
                    "sponsorship already confirmed".to_string(),
                ));
            }

            let field_office = match &country {
                Some(code) => field_offices::Entity::find()
                    .filter(field_offices::Column::CountryCode.eq(code.clone()))
                    .one(&db_tx)
                    .await?
                    .map(|fo| parse_uuid(&fo.id, "field office"))
                    .transpose()?,
                None => None,
            };
            let preferences = ChildPreferences {
                gender,
                min_age,
                max_age,
                field_office_id: field_office,
            };

            let child_id = self
                .find_available_child(&db_tx, &request, &preferences)
                .await?;

            sms_requests::ActiveModel {
                id: ActiveValue::Unchanged(request.id),
                child_id: ActiveValue::Set(child_id.map(|id| id.to_string())),
                gender: ActiveValue::Set(preferences.gender),
                min_age: ActiveValue::Set(preferences.min_age),
                max_age: ActiveValue::Set(preferences.max_age),
                field_office_id: ActiveValue::Set(
                    preferences.field_office_id.map(|id| id.to_string()),
                ),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;

            tracing::debug!(request = request.id, child = ?child_id, "SMS child changed");
            Ok(child_id)
        })
    }

    /// Sponsorship and sponsor prefilling the registration form.
    ///
    /// Only sponsorships created through an SMS request are exposed.
    pub async fn sms_sponsorship_form(
        &self,
        sponsorship_id: Uuid,
        actor: &Actor,
    ) -> ResultEngine<(Sponsorship, Partner)> {
        actor.require_visitor()?;
        with_tx!(self, |db_tx| {
            let linked = sms_requests::Entity::find()
                .filter(sms_requests::Column::SponsorshipId.eq(sponsorship_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if !linked {
                return Err(EngineError::KeyNotFound("sponsorship not exists".to_string()));
            }
            let sponsorship =
                Sponsorship::try_from(self.require_sponsorship(&db_tx, sponsorship_id).await?)?;
            let partner =
                Partner::try_from(self.require_partner(&db_tx, sponsorship.partner_id).await?)?;
            Ok((sponsorship, partner))
        })
    }

    async fn require_sms_request(
        &self,
        db: &DatabaseTransaction,
        request_id: i64,
    ) -> ResultEngine<sms_requests::Model> {
        sms_requests::Entity::find_by_id(request_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("sms child request not exists".to_string()))
    }

    /// First unsponsored child matching the preferences, not reserved by
    /// another pending request and different from the current one.
    async fn find_available_child(
        &self,
        db: &DatabaseTransaction,
        request: &SmsChildRequest,
        preferences: &ChildPreferences,
    ) -> ResultEngine<Option<Uuid>> {
        let reserved: Vec<String> = sms_requests::Entity::find()
            .filter(sms_requests::Column::SponsorshipConfirmed.eq(false))
            .filter(sms_requests::Column::ChildId.is_not_null())
            .all(db)
            .await?
            .into_iter()
            .filter_map(|r| r.child_id)
            .collect();

        let mut query = children::Entity::find()
            .filter(children::Column::SponsorId.is_null())
            .filter(children::Column::Id.is_not_in(reserved));
        if let Some(current) = request.child_id {
            query = query.filter(children::Column::Id.ne(current.to_string()));
        }
        if let Some(gender) = &preferences.gender {
            query = query.filter(children::Column::Gender.eq(gender.clone()));
        }
        if let Some(min_age) = preferences.min_age {
            query = query.filter(children::Column::Age.gte(min_age));
        }
        if let Some(max_age) = preferences.max_age {
            query = query.filter(children::Column::Age.lte(max_age));
        }
        if let Some(field_office) = preferences.field_office_id {
            query = query.filter(children::Column::FieldOfficeId.eq(field_office.to_string()));
        }

        let child = query
            .order_by_asc(children::Column::GlobalId)
            .one(db)
            .await?;
        parse_optional_uuid(child.as_ref().map(|c| c.id.as_str()), "child")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_range_is_parsed() {
        assert_eq!(parse_age_range("4-7"), Ok((Some(4), Some(7))));
        assert_eq!(parse_age_range(" 0 - 3 "), Ok((Some(0), Some(3))));
        assert_eq!(parse_age_range(""), Ok((None, None)));
    }

    #[test]
    fn age_range_rejects_garbage() {
        assert!(parse_age_range("4").is_err());
        assert!(parse_age_range("a-b").is_err());
        assert!(parse_age_range("9-2").is_err());
    }
}
