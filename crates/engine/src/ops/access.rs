use sea_orm::{DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, children, field_offices, journals, partners, sponsorships, users,
};

use super::Engine;

/// Generates a `require_*` lookup returning the model or `KeyNotFound`.
macro_rules! impl_require {
    ($require_fn:ident, $entity:path, $model:path, $err_msg:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            id: Uuid,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(id.to_string())
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_require!(
        require_sponsorship,
        sponsorships::Entity,
        sponsorships::Model,
        "sponsorship not exists"
    );

    impl_require!(
        require_partner,
        partners::Entity,
        partners::Model,
        "partner not exists"
    );

    impl_require!(
        require_child,
        children::Entity,
        children::Model,
        "child not exists"
    );

    impl_require!(
        require_journal,
        journals::Entity,
        journals::Model,
        "journal not exists"
    );

    impl_require!(
        require_field_office,
        field_offices::Entity,
        field_offices::Model,
        "field office not exists"
    );

    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    /// Load every sponsorship of a batch, failing on the first unknown id.
    pub(super) async fn require_sponsorships(
        &self,
        db: &DatabaseTransaction,
        ids: &[Uuid],
    ) -> ResultEngine<Vec<sponsorships::Model>> {
        let mut models = Vec::with_capacity(ids.len());
        for id in ids {
            models.push(self.require_sponsorship(db, *id).await?);
        }
        Ok(models)
    }

    /// Sponsorship referenced by an optional foreign key.
    pub(super) async fn find_linked_sponsorship(
        &self,
        db: &DatabaseTransaction,
        id: Option<&str>,
    ) -> ResultEngine<Option<sponsorships::Model>> {
        match id {
            Some(id) => sponsorships::Entity::find_by_id(id.to_string())
                .one(db)
                .await
                .map_err(Into::into),
            None => Ok(None),
        }
    }
}
