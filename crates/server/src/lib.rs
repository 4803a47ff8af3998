use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};

mod completion;
mod mobile;
mod partners;
mod sds;
mod server;
mod sms;
mod sponsorships;
mod user;
mod workflow;

pub mod types {
    pub mod sponsorship {
        pub use api_types::sponsorship::{
            ContractState, CorrespondentChange, ParentSuggestion, SdsState, SponsorshipCreated,
            SponsorshipList, SponsorshipNew, SponsorshipUpdate, SponsorshipView,
        };
    }

    pub mod workflow {
        pub use api_types::workflow::{ContractBatch, ContractEnd, NoSub};
    }

    pub mod sds {
        pub use api_types::sds::{FollowerSet, SdsGroup, SdsGroups, SdsStateChoice};
    }

    pub mod partner {
        pub use api_types::partner::{PartnerCreated, PartnerNew, PartnerView};
    }

    pub mod completion {
        pub use api_types::completion::{
            CompletionFunction, CompletionResult, JournalCreated, JournalNew, RuleList, RuleNew,
            RuleView, StatementLine,
        };
    }

    pub mod mobile {
        pub use api_types::mobile::{
            ChildApp, ChildBio, ChildBioResponse, ChildConnectData, ChildIds, ChildImage,
            ChildTime, Location,
        };
    }

    pub mod sms {
        pub use api_types::sms::{
            Country, FieldOfficeRef, SmsChangeChild, SmsChangeChildResult, SmsChildData,
            SmsConfirm, SmsConfirmResult, SmsPartner, SmsRequestCreated, SmsRequestNew,
            SmsSponsorshipForm,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::MissingParameter(_) | EngineError::InvalidId(_) => StatusCode::BAD_REQUEST,
        EngineError::Validation(_) | EngineError::InvalidState(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_forbidden_maps_to_403() {
        let res = ServerError::from(EngineError::Forbidden("forbidden".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::Validation("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn missing_parameter_maps_to_400() {
        let res =
            ServerError::from(EngineError::MissingParameter("userid".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_error_is_not_leaked() {
        let res = ServerError::from(EngineError::Database(sea_orm::DbErr::Custom(
            "secret".to_string(),
        )))
        .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
