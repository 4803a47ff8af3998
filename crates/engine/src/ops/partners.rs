use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Actor, EngineError, Origin, Partner, ResultEngine, followers, origins,
    origins::SUB_ORIGIN_TYPE,
    partners,
    util::{normalize_optional_text, normalize_required_name, parse_uuid},
};

use super::{Engine, with_tx};

/// Input of [`Engine::new_partner`].
#[derive(Clone, Debug, Default)]
pub struct PartnerNew {
    pub reference: Option<String>,
    pub firstname: Option<String>,
    pub lastname: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub lang: Option<String>,
    pub commercial_partner_id: Option<Uuid>,
}

impl Engine {
    /// Add a new partner.
    ///
    /// The reference, when given, must be unique.
    pub async fn new_partner(&self, cmd: PartnerNew, actor: &Actor) -> ResultEngine<Uuid> {
        actor.require_authenticated()?;
        with_tx!(self, |db_tx| self.insert_partner(&db_tx, cmd).await)
    }

    pub(super) async fn insert_partner(
        &self,
        db: &DatabaseTransaction,
        cmd: PartnerNew,
    ) -> ResultEngine<Uuid> {
        let lastname = normalize_required_name(&cmd.lastname, "lastname")?;
        let reference = normalize_optional_text(cmd.reference.as_deref());

        if let Some(reference) = &reference {
            let exists = partners::Entity::find()
                .filter(partners::Column::Reference.eq(reference.clone()))
                .one(db)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(reference.clone()));
            }
        }
        if let Some(company) = cmd.commercial_partner_id {
            self.require_partner(db, company).await?;
        }

        let mut partner = Partner::new(normalize_optional_text(cmd.firstname.as_deref()), lastname);
        partner.reference = reference;
        partner.email = normalize_optional_text(cmd.email.as_deref());
        partner.phone = normalize_optional_text(cmd.phone.as_deref());
        partner.lang = normalize_optional_text(cmd.lang.as_deref());
        partner.commercial_partner_id = cmd.commercial_partner_id;

        partners::ActiveModel::from(&partner).insert(db).await?;
        Ok(partner.id)
    }

    /// Return a partner.
    pub async fn partner(&self, partner_id: Uuid, actor: &Actor) -> ResultEngine<Partner> {
        actor.require_authenticated()?;
        with_tx!(self, |db_tx| {
            let model = self.require_partner(&db_tx, partner_id).await?;
            Partner::try_from(model)
        })
    }

    /// Assign the user following substitute searches for a language.
    pub async fn set_sds_follower(
        &self,
        lang_code: &str,
        username: &str,
        actor: &Actor,
    ) -> ResultEngine<()> {
        actor.require_authenticated()?;
        let lang_code = normalize_required_name(lang_code, "language")?;
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, username).await?;
            let key = followers::sub_follower_key(&lang_code);
            let exists = followers::Entity::find_by_id(key.clone())
                .one(&db_tx)
                .await?
                .is_some();
            let model = followers::ActiveModel {
                key: ActiveValue::Set(key),
                user_id: ActiveValue::Set(username.to_string()),
            };
            if exists {
                model.update(&db_tx).await?;
            } else {
                model.insert(&db_tx).await?;
            }
            Ok(())
        })
    }

    /// Return the follower configured for a language, if any.
    pub async fn sds_follower(&self, lang_code: &str) -> ResultEngine<Option<String>> {
        with_tx!(self, |db_tx| self.sds_follower_in(&db_tx, lang_code).await)
    }

    pub(super) async fn sds_follower_in(
        &self,
        db: &DatabaseTransaction,
        lang_code: &str,
    ) -> ResultEngine<Option<String>> {
        let setting = followers::Entity::find_by_id(followers::sub_follower_key(lang_code))
            .one(db)
            .await?;
        Ok(setting.map(|s| s.user_id))
    }

    /// Add a contract origin.
    pub async fn new_origin(&self, name: &str, kind: &str, actor: &Actor) -> ResultEngine<Uuid> {
        actor.require_authenticated()?;
        let name = normalize_required_name(name, "origin name")?;
        let kind = normalize_required_name(kind, "origin type")?;
        with_tx!(self, |db_tx| {
            let id = Uuid::new_v4();
            origins::ActiveModel {
                id: ActiveValue::Set(id.to_string()),
                name: ActiveValue::Set(name),
                kind: ActiveValue::Set(kind),
            }
            .insert(&db_tx)
            .await?;
            Ok(id)
        })
    }

    /// First origin typed for substitute sponsorships.
    pub(super) async fn sub_origin(&self, db: &DatabaseTransaction) -> ResultEngine<Option<Origin>> {
        origins::Entity::find()
            .filter(origins::Column::Kind.eq(SUB_ORIGIN_TYPE))
            .one(db)
            .await?
            .map(Origin::try_from)
            .transpose()
    }

    /// Commercial partner of a stored partner id.
    pub(super) async fn commercial_partner_of(
        &self,
        db: &DatabaseTransaction,
        partner_id: &str,
    ) -> ResultEngine<Uuid> {
        let model = self
            .require_partner(db, parse_uuid(partner_id, "partner")?)
            .await?;
        Ok(Partner::try_from(model)?.commercial_partner())
    }
}
