//! Queries behind the mobile app endpoints.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Actor, Child, ChildAppData, ChildPicture, EngineError, Project, ResultEngine,
    child_local_time, child_pictures, children, partners, projects,
};

use super::{Engine, with_tx};

/// Return a request parameter or fail with `MissingParameter`.
fn required_param<'a>(key: &str, params: &'a HashMap<String, String>) -> ResultEngine<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| EngineError::MissingParameter(key.to_string()))
}

impl Engine {
    /// Children, pictures and location needed to render the app tiles.
    ///
    /// Returns `None` when no child is asked for.
    pub async fn child_app_data(
        &self,
        ids: &[Uuid],
        actor: &Actor,
    ) -> ResultEngine<Option<ChildAppData>> {
        actor.require_authenticated()?;
        if ids.is_empty() {
            return Ok(None);
        }
        with_tx!(self, |db_tx| {
            let children = self.children_by_ids(&db_tx, ids).await?;

            let child_ids: Vec<String> = children.iter().map(|c| c.id.to_string()).collect();
            let pictures = child_pictures::Entity::find()
                .filter(child_pictures::Column::ChildId.is_in(child_ids))
                .filter(child_pictures::Column::ImageUrl.is_not_null())
                .order_by_desc(child_pictures::Column::Date)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(ChildPicture::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            let project = match children.first().and_then(|c| c.project_id) {
                Some(project_id) => projects::Entity::find_by_id(project_id.to_string())
                    .one(&db_tx)
                    .await?
                    .map(Project::try_from)
                    .transpose()?,
                None => None,
            };

            Ok(Some(ChildAppData {
                children,
                pictures,
                project,
                child_time: child_local_time(Utc::now()),
            }))
        })
    }

    /// The children alone, without pictures or location.
    pub async fn children_connect_data(
        &self,
        ids: &[Uuid],
        actor: &Actor,
    ) -> ResultEngine<Vec<Child>> {
        actor.require_authenticated()?;
        with_tx!(self, |db_tx| self.children_by_ids(&db_tx, ids).await)
    }

    /// Children sponsored by the partner whose reference is `userid`.
    ///
    /// An unknown reference yields no children.
    pub async fn mobile_sponsor_children(
        &self,
        params: &HashMap<String, String>,
        actor: &Actor,
    ) -> ResultEngine<Vec<Child>> {
        actor.require_authenticated()?;
        let partner_ref = required_param("userid", params)?;
        with_tx!(self, |db_tx| {
            let sponsor = partners::Entity::find()
                .filter(partners::Column::Reference.eq(partner_ref))
                .one(&db_tx)
                .await?;
            let Some(sponsor) = sponsor else {
                return Ok(Vec::new());
            };

            children::Entity::find()
                .filter(children::Column::SponsorId.eq(sponsor.id))
                .order_by_asc(children::Column::GlobalId)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Child::try_from)
                .collect()
        })
    }

    /// Biography of the child identified by `child_global_id`.
    pub async fn mobile_child_bio(
        &self,
        params: &HashMap<String, String>,
        actor: &Actor,
    ) -> ResultEngine<Child> {
        actor.require_authenticated()?;
        let global_id = required_param("child_global_id", params)?;
        with_tx!(self, |db_tx| {
            let model = children::Entity::find()
                .filter(children::Column::GlobalId.eq(global_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("child not exists".to_string()))?;
            Child::try_from(model)
        })
    }

    /// Load children keeping the order of `ids`.
    async fn children_by_ids(
        &self,
        db: &DatabaseTransaction,
        ids: &[Uuid],
    ) -> ResultEngine<Vec<Child>> {
        let mut children = Vec::with_capacity(ids.len());
        for id in ids {
            let model = self.require_child(db, *id).await?;
            children.push(Child::try_from(model)?);
        }
        Ok(children)
    }
}
