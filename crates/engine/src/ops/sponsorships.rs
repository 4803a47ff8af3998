use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Actor, ContractState, EngineError, ResultEngine, SdsGroup, SdsState, Sponsorship, color,
    group_by_sds_state, origins, sponsorships,
    sponsorships::is_substitute_kind,
    util::{normalize_optional_text, normalize_required_name, parse_uuid, today},
};

use super::{Engine, with_tx};

/// Input of [`Engine::create_sponsorship`].
#[derive(Clone, Debug, Default)]
pub struct SponsorshipNew {
    pub partner_id: Uuid,
    /// Defaults to the partner.
    pub correspondent_id: Option<Uuid>,
    pub child_id: Option<Uuid>,
    pub kind: String,
    pub origin_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    /// Defaults to the acting user.
    pub sds_uid: Option<String>,
    pub sub_notes: Option<String>,
}

/// The set of fields changed by an update.
///
/// `None` leaves a field untouched; for nullable fields `Some(None)` clears
/// it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SponsorshipUpdate {
    pub sds_state: Option<SdsState>,
    pub color: Option<i32>,
    pub parent_id: Option<Option<Uuid>>,
    pub origin_id: Option<Option<Uuid>>,
    pub sub_sponsorship_id: Option<Option<Uuid>>,
    pub sds_uid: Option<Option<String>>,
    pub no_sub_reason: Option<Option<String>>,
    pub sub_notes: Option<Option<String>>,
    pub cancel_gifts_on_termination: Option<bool>,
}

impl SponsorshipUpdate {
    pub fn sds_state(state: SdsState) -> Self {
        Self {
            sds_state: Some(state),
            ..Default::default()
        }
    }

    pub fn sds_state_with_color(state: SdsState, color: i32) -> Self {
        Self {
            sds_state: Some(state),
            color: Some(color),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Engine {
    /// Create a draft sponsorship.
    ///
    /// If the new sponsorship substitutes a parent waiting for a substitute,
    /// the parent moves to `sub` (red until the substitute is active).
    pub async fn create_sponsorship(&self, cmd: SponsorshipNew, actor: &Actor) -> ResultEngine<Uuid> {
        actor.require_authenticated()?;
        with_tx!(self, |db_tx| self.insert_sponsorship(&db_tx, cmd, actor).await)
    }

    pub(super) async fn insert_sponsorship(
        &self,
        db: &DatabaseTransaction,
        cmd: SponsorshipNew,
        actor: &Actor,
    ) -> ResultEngine<Uuid> {
        let kind = normalize_required_name(&cmd.kind, "sponsorship type")?;
        self.require_partner(db, cmd.partner_id).await?;
        let correspondent_id = cmd.correspondent_id.unwrap_or(cmd.partner_id);
        self.require_partner(db, correspondent_id).await?;
        if let Some(child_id) = cmd.child_id {
            self.require_child(db, child_id).await?;
        }
        if let Some(origin_id) = cmd.origin_id {
            origins::Entity::find_by_id(origin_id.to_string())
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("origin not exists".to_string()))?;
        }
        let parent = match cmd.parent_id {
            Some(parent_id) => Some(self.require_sponsorship(db, parent_id).await?),
            None => None,
        };
        let sds_uid = cmd
            .sds_uid
            .or_else(|| actor.username().map(ToString::to_string));
        if let Some(username) = &sds_uid {
            self.require_user(db, username).await?;
        }

        let sponsorship = Sponsorship {
            id: Uuid::new_v4(),
            partner_id: cmd.partner_id,
            correspondent_id,
            child_id: cmd.child_id,
            kind,
            state: ContractState::Draft,
            end_reason: None,
            origin_id: cmd.origin_id,
            parent_id: cmd.parent_id,
            sub_sponsorship_id: None,
            sds_state: SdsState::Draft,
            sds_state_date: None,
            color: color::DEFAULT,
            no_sub_reason: None,
            sds_uid,
            sub_notes: normalize_optional_text(cmd.sub_notes.as_deref()),
            cancel_gifts_on_termination: false,
            created_at: Utc::now(),
        };
        sponsorships::ActiveModel::from(&sponsorship).insert(db).await?;

        if let Some(parent) = parent {
            self.promote_waiting_parent(db, &parent).await?;
        }

        tracing::debug!(sponsorship = %sponsorship.id, "created sponsorship");
        Ok(sponsorship.id)
    }

    /// Return a sponsorship.
    pub async fn sponsorship(&self, sponsorship_id: Uuid, actor: &Actor) -> ResultEngine<Sponsorship> {
        actor.require_authenticated()?;
        with_tx!(self, |db_tx| {
            let model = self.require_sponsorship(&db_tx, sponsorship_id).await?;
            Sponsorship::try_from(model)
        })
    }

    /// Write the changed fields of a sponsorship.
    ///
    /// Any state may be set from any state. Changing `parent_id` of a
    /// substitute sponsorship that left draft and already has a parent is
    /// rejected.
    pub async fn update_sponsorship(
        &self,
        sponsorship_id: Uuid,
        update: SponsorshipUpdate,
        actor: &Actor,
    ) -> ResultEngine<Sponsorship> {
        actor.require_authenticated()?;
        with_tx!(self, |db_tx| {
            let model = self.require_sponsorship(&db_tx, sponsorship_id).await?;
            if let Some(Some(username)) = &update.sds_uid {
                self.require_user(&db_tx, username).await?;
            }
            if let Some(Some(sub_id)) = update.sub_sponsorship_id {
                self.require_sponsorship(&db_tx, sub_id).await?;
            }
            self.apply_update(&db_tx, &model, update).await?;

            let model = self.require_sponsorship(&db_tx, sponsorship_id).await?;
            Sponsorship::try_from(model)
        })
    }

    /// Change the correspondent of a sponsorship.
    ///
    /// A draft substitute sponsorship is linked to the correspondent's
    /// sponsorship waiting for a substitute, if there is a free one, and
    /// gets the `sub` origin.
    pub async fn change_correspondent(
        &self,
        sponsorship_id: Uuid,
        correspondent_id: Uuid,
        actor: &Actor,
    ) -> ResultEngine<Sponsorship> {
        actor.require_authenticated()?;
        with_tx!(self, |db_tx| {
            let model = self.require_sponsorship(&db_tx, sponsorship_id).await?;
            self.require_partner(&db_tx, correspondent_id).await?;

            sponsorships::ActiveModel {
                id: ActiveValue::Set(model.id.clone()),
                correspondent_id: ActiveValue::Set(correspondent_id.to_string()),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;

            if is_substitute_kind(&model.kind) {
                let origin = self.sub_origin(&db_tx).await?;
                let parent_id = self
                    .define_parent_id(&db_tx, correspondent_id, Some(&model.id))
                    .await?;
                if let Some(parent_id) = parent_id
                    && model.contract_state()? == ContractState::Draft
                {
                    let update = SponsorshipUpdate {
                        parent_id: Some(Some(parent_id)),
                        origin_id: Some(origin.map(|o| o.id)),
                        ..Default::default()
                    };
                    self.apply_update(&db_tx, &model, update).await?;
                }
            }

            let model = self.require_sponsorship(&db_tx, sponsorship_id).await?;
            Sponsorship::try_from(model)
        })
    }

    /// Sponsorship of a correspondent that could receive a substitute.
    pub async fn suggest_parent(
        &self,
        correspondent_id: Uuid,
        actor: &Actor,
    ) -> ResultEngine<Option<Uuid>> {
        actor.require_authenticated()?;
        with_tx!(self, |db_tx| {
            self.define_parent_id(&db_tx, correspondent_id, None).await
        })
    }

    /// Sponsorships followed by the acting user that wait for a substitute.
    pub async fn followed_sub_waiting(&self, actor: &Actor) -> ResultEngine<Vec<Sponsorship>> {
        let username = actor
            .username()
            .ok_or_else(|| EngineError::Forbidden("operation requires a user".to_string()))?;
        with_tx!(self, |db_tx| {
            let models = sponsorships::Entity::find()
                .filter(sponsorships::Column::SdsUid.eq(username))
                .filter(sponsorships::Column::SdsState.eq(SdsState::SubWaiting.as_str()))
                .order_by_asc(sponsorships::Column::SdsStateDate)
                .order_by_asc(sponsorships::Column::Id)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Sponsorship::try_from).collect()
        })
    }

    /// Count sponsorships per SDS state for the follow-up view.
    ///
    /// Only `active` and the `sub*` states are returned, in enumeration
    /// order, with `active` folded.
    pub async fn sds_groups(&self, actor: &Actor) -> ResultEngine<Vec<SdsGroup>> {
        actor.require_authenticated()?;
        with_tx!(self, |db_tx| {
            let rows: Vec<(String, i64)> = sponsorships::Entity::find()
                .select_only()
                .column(sponsorships::Column::SdsState)
                .column_as(Expr::col(sponsorships::Column::Id).count(), "count")
                .group_by(sponsorships::Column::SdsState)
                .into_tuple()
                .all(&db_tx)
                .await?;

            let mut counts = Vec::with_capacity(rows.len());
            for (state, count) in rows {
                counts.push((SdsState::try_from(state.as_str())?, count.max(0) as u64));
            }
            Ok(group_by_sds_state(counts))
        })
    }

    /// Write an update, running the `parent_id` check first.
    pub(super) async fn apply_update(
        &self,
        db: &DatabaseTransaction,
        model: &sponsorships::Model,
        update: SponsorshipUpdate,
    ) -> ResultEngine<()> {
        if let Some(parent_id) = update.parent_id {
            self.parent_id_changed(db, model, parent_id).await?;
        }
        self.write_columns(db, &model.id, update).await
    }

    /// Write the columns of an update. A new SDS state always stamps
    /// `sds_state_date`.
    pub(super) async fn write_columns(
        &self,
        db: &DatabaseTransaction,
        sponsorship_id: &str,
        update: SponsorshipUpdate,
    ) -> ResultEngine<()> {
        if update.is_empty() {
            return Ok(());
        }

        let mut active = sponsorships::ActiveModel {
            id: ActiveValue::Set(sponsorship_id.to_string()),
            ..Default::default()
        };
        if let Some(state) = update.sds_state {
            active.sds_state = ActiveValue::Set(state.as_str().to_string());
            active.sds_state_date = ActiveValue::Set(Some(today()));
            tracing::debug!(sponsorship = sponsorship_id, sds_state = state.as_str(), "sds state changed");
        }
        if let Some(color) = update.color {
            active.color = ActiveValue::Set(color);
        }
        if let Some(parent_id) = update.parent_id {
            active.parent_id = ActiveValue::Set(parent_id.map(|id| id.to_string()));
        }
        if let Some(origin_id) = update.origin_id {
            active.origin_id = ActiveValue::Set(origin_id.map(|id| id.to_string()));
        }
        if let Some(sub_id) = update.sub_sponsorship_id {
            active.sub_sponsorship_id = ActiveValue::Set(sub_id.map(|id| id.to_string()));
        }
        if let Some(sds_uid) = update.sds_uid {
            active.sds_uid = ActiveValue::Set(sds_uid);
        }
        if let Some(reason) = update.no_sub_reason {
            active.no_sub_reason = ActiveValue::Set(normalize_optional_text(reason.as_deref()));
        }
        if let Some(notes) = update.sub_notes {
            active.sub_notes = ActiveValue::Set(normalize_optional_text(notes.as_deref()));
        }
        if let Some(cancel_gifts) = update.cancel_gifts_on_termination {
            active.cancel_gifts_on_termination = ActiveValue::Set(cancel_gifts);
        }
        active.update(db).await?;
        Ok(())
    }

    async fn parent_id_changed(
        &self,
        db: &DatabaseTransaction,
        model: &sponsorships::Model,
        parent_id: Option<Uuid>,
    ) -> ResultEngine<()> {
        if is_substitute_kind(&model.kind)
            && model.contract_state()? != ContractState::Draft
            && model.parent_id.is_some()
        {
            return Err(EngineError::Validation(
                "You cannot change the sub sponsorship.".to_string(),
            ));
        }

        let Some(parent_id) = parent_id else {
            return Ok(());
        };
        if parent_id.to_string() == model.id {
            return Err(EngineError::Validation(
                "a sponsorship cannot substitute itself".to_string(),
            ));
        }
        let parent = self.require_sponsorship(db, parent_id).await?;
        self.promote_waiting_parent(db, &parent).await
    }

    /// A parent waiting for a substitute got one: mark it `sub`, red until
    /// the substitute is active.
    async fn promote_waiting_parent(
        &self,
        db: &DatabaseTransaction,
        parent: &sponsorships::Model,
    ) -> ResultEngine<()> {
        if parent.sds()? == SdsState::SubWaiting {
            self.write_columns(
                db,
                &parent.id,
                SponsorshipUpdate::sds_state_with_color(SdsState::Sub, color::PENDING),
            )
            .await?;
        }
        Ok(())
    }

    /// Find a sponsorship of `correspondent_id` waiting for a substitute that
    /// no sponsorship references as parent yet.
    ///
    /// Candidates are visited oldest first.
    pub(super) async fn define_parent_id(
        &self,
        db: &DatabaseTransaction,
        correspondent_id: Uuid,
        exclude_id: Option<&str>,
    ) -> ResultEngine<Option<Uuid>> {
        let candidates = sponsorships::Entity::find()
            .filter(sponsorships::Column::CorrespondentId.eq(correspondent_id.to_string()))
            .filter(sponsorships::Column::SdsState.eq(SdsState::SubWaiting.as_str()))
            .order_by_asc(sponsorships::Column::CreatedAt)
            .order_by_asc(sponsorships::Column::Id)
            .all(db)
            .await?;

        for candidate in candidates {
            if exclude_id == Some(candidate.id.as_str()) {
                continue;
            }
            let children = sponsorships::Entity::find()
                .filter(sponsorships::Column::ParentId.eq(candidate.id.clone()))
                .count(db)
                .await?;
            if children == 0 {
                return parse_uuid(&candidate.id, "sponsorship").map(Some);
            }
        }
        Ok(None)
    }
}
