//! Contract workflow events and their effect on the SDS status.

use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Actor, ContractState, END_REASON_CHILD_DEPARTURE, END_REASON_CHILD_EXCHANGE, Partner,
    ResultEngine, SdsState, color, sponsorships,
    util::parse_uuid,
};

use super::{Engine, SponsorshipUpdate, with_tx};

impl Engine {
    /// Contracts validated and waiting for their first payment.
    ///
    /// Sponsorships still in SDS `draft` become `active`.
    pub async fn contract_waiting(&self, ids: &[Uuid], actor: &Actor) -> ResultEngine<()> {
        actor.require_authenticated()?;
        with_tx!(self, |db_tx| {
            for model in self.require_sponsorships(&db_tx, ids).await? {
                self.set_contract_state(&db_tx, &model.id, ContractState::Waiting, None)
                    .await?;
                if model.sds()? == SdsState::Draft {
                    self.write_columns(&db_tx, &model.id, SponsorshipUpdate::sds_state(SdsState::Active))
                        .await?;
                }
            }
            Ok(())
        })
    }

    /// Contracts activated.
    ///
    /// A parent whose substitute offer is pending (`sub`) turns green.
    pub async fn contract_active(&self, ids: &[Uuid], actor: &Actor) -> ResultEngine<()> {
        actor.require_authenticated()?;
        with_tx!(self, |db_tx| {
            for model in self.require_sponsorships(&db_tx, ids).await? {
                self.set_contract_state(&db_tx, &model.id, ContractState::Active, None)
                    .await?;
                let parent = self
                    .find_linked_sponsorship(&db_tx, model.parent_id.as_deref())
                    .await?;
                if let Some(parent) = parent
                    && parent.sds()? == SdsState::Sub
                {
                    let update = SponsorshipUpdate {
                        color: Some(color::ACCEPTED),
                        ..Default::default()
                    };
                    self.write_columns(&db_tx, &parent.id, update).await?;
                }
            }
            Ok(())
        })
    }

    /// Contracts cancelled before activation.
    pub async fn contract_cancelled(
        &self,
        ids: &[Uuid],
        end_reason: Option<&str>,
        actor: &Actor,
    ) -> ResultEngine<()> {
        actor.require_authenticated()?;
        with_tx!(self, |db_tx| {
            self.end_contracts(&db_tx, ids, ContractState::Cancelled, end_reason)
                .await
        })
    }

    /// Active contracts terminated.
    pub async fn contract_terminated(
        &self,
        ids: &[Uuid],
        end_reason: Option<&str>,
        actor: &Actor,
    ) -> ResultEngine<()> {
        actor.require_authenticated()?;
        with_tx!(self, |db_tx| {
            self.end_contracts(&db_tx, ids, ContractState::Terminated, end_reason)
                .await
        })
    }

    /// Verify the outcome of substitute offers: `sub_accept` when the linked
    /// substitute is active, `sub_reject` otherwise.
    pub async fn check_sub_state(&self, ids: &[Uuid], actor: &Actor) -> ResultEngine<()> {
        actor.require_authenticated()?;
        with_tx!(self, |db_tx| {
            for model in self.require_sponsorships(&db_tx, ids).await? {
                let sub = self
                    .find_linked_sponsorship(&db_tx, model.sub_sponsorship_id.as_deref())
                    .await?;
                let sub_active = match sub {
                    Some(sub) => sub.contract_state()? == ContractState::Active,
                    None => false,
                };
                let state = if sub_active {
                    SdsState::SubAccept
                } else {
                    SdsState::SubReject
                };
                self.write_columns(&db_tx, &model.id, SponsorshipUpdate::sds_state(state))
                    .await?;
            }
            Ok(())
        })
    }

    /// The sponsor will not get a substitute.
    pub async fn mark_no_sub(
        &self,
        ids: &[Uuid],
        reason: Option<&str>,
        actor: &Actor,
    ) -> ResultEngine<()> {
        let update = SponsorshipUpdate {
            sds_state: Some(SdsState::NoSub),
            no_sub_reason: reason.map(|r| Some(r.to_string())),
            ..Default::default()
        };
        self.update_batch(ids, update, actor).await
    }

    /// A substitute was proposed to the sponsor.
    pub async fn mark_sub(&self, ids: &[Uuid], actor: &Actor) -> ResultEngine<()> {
        self.update_batch(ids, SponsorshipUpdate::sds_state(SdsState::Sub), actor)
            .await
    }

    async fn update_batch(
        &self,
        ids: &[Uuid],
        update: SponsorshipUpdate,
        actor: &Actor,
    ) -> ResultEngine<()> {
        actor.require_authenticated()?;
        with_tx!(self, |db_tx| {
            for model in self.require_sponsorships(&db_tx, ids).await? {
                self.apply_update(&db_tx, &model, update.clone()).await?;
            }
            Ok(())
        })
    }

    async fn end_contracts(
        &self,
        db: &DatabaseTransaction,
        ids: &[Uuid],
        state: ContractState,
        end_reason: Option<&str>,
    ) -> ResultEngine<()> {
        for model in self.require_sponsorships(db, ids).await? {
            self.set_contract_state(db, &model.id, state, end_reason)
                .await?;
        }
        self.check_need_sub(db, ids).await
    }

    /// Update SDS statuses of ended contracts.
    ///
    /// A child departure reopens the sponsorship as waiting for a substitute
    /// and accepts a pending offer on its parent. Any other reason cancels
    /// it and rejects a pending offer, unless the child was exchanged.
    /// Sponsorships marked `no_sub` keep their status.
    async fn check_need_sub(&self, db: &DatabaseTransaction, ids: &[Uuid]) -> ResultEngine<()> {
        for id in ids {
            let contract = self.require_sponsorship(db, *id).await?;
            let correspondent = self
                .require_partner(db, parse_uuid(&contract.correspondent_id, "correspondent")?)
                .await?;
            let correspondent = Partner::try_from(correspondent)?;
            let sds_user = match correspondent.lang_code() {
                Some(lang_code) => self.sds_follower_in(db, lang_code).await?,
                None => None,
            };

            let parent = self
                .find_linked_sponsorship(db, contract.parent_id.as_deref())
                .await?;
            let pending_parent = match parent {
                Some(parent) if parent.sds()? == SdsState::Sub => Some(parent),
                _ => None,
            };
            let end_reason = contract.end_reason.as_deref();

            let update = if end_reason == Some(END_REASON_CHILD_DEPARTURE) {
                if let Some(parent) = &pending_parent {
                    self.write_columns(
                        db,
                        &parent.id,
                        SponsorshipUpdate::sds_state_with_color(SdsState::SubAccept, color::ACCEPTED),
                    )
                    .await?;
                }
                SponsorshipUpdate {
                    sds_state: Some(SdsState::SubWaiting),
                    color: Some(color::WAITING),
                    sds_uid: sds_user.map(Some),
                    ..Default::default()
                }
            } else {
                if let Some(parent) = &pending_parent
                    && end_reason != Some(END_REASON_CHILD_EXCHANGE)
                {
                    self.write_columns(
                        db,
                        &parent.id,
                        SponsorshipUpdate::sds_state_with_color(SdsState::SubReject, color::PENDING),
                    )
                    .await?;
                }
                SponsorshipUpdate::sds_state_with_color(SdsState::Cancelled, color::CANCELLED)
            };

            if contract.sds()? != SdsState::NoSub {
                self.write_columns(db, &contract.id, update).await?;
            }
        }
        Ok(())
    }

    async fn set_contract_state(
        &self,
        db: &DatabaseTransaction,
        sponsorship_id: &str,
        state: ContractState,
        end_reason: Option<&str>,
    ) -> ResultEngine<()> {
        let mut active = sponsorships::ActiveModel {
            id: ActiveValue::Set(sponsorship_id.to_string()),
            state: ActiveValue::Set(state.as_str().to_string()),
            ..Default::default()
        };
        if let Some(end_reason) = end_reason {
            active.end_reason = ActiveValue::Set(Some(end_reason.to_string()));
        }
        active.update(db).await?;
        Ok(())
    }
}
