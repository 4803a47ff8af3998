//! Bank statement completion endpoints

use api_types::completion::{
    CompletionFunction, CompletionResult, JournalCreated, JournalNew, RuleList, RuleNew, RuleView,
    StatementLine,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn function_from_api(function: CompletionFunction) -> engine::CompletionFunction {
    match function {
        CompletionFunction::FromAmount => engine::CompletionFunction::FromAmount,
        CompletionFunction::FromMoveLineRef => engine::CompletionFunction::FromMoveLineRef,
        CompletionFunction::FromPaymentLine => engine::CompletionFunction::FromPaymentLine,
    }
}

fn function_to_api(function: engine::CompletionFunction) -> CompletionFunction {
    match function {
        engine::CompletionFunction::FromAmount => CompletionFunction::FromAmount,
        engine::CompletionFunction::FromMoveLineRef => CompletionFunction::FromMoveLineRef,
        engine::CompletionFunction::FromPaymentLine => CompletionFunction::FromPaymentLine,
    }
}

pub async fn journal_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<JournalNew>,
) -> Result<(StatusCode, Json<JournalCreated>), ServerError> {
    let id = state
        .engine
        .new_journal(&payload.name, &user.actor())
        .await?;
    Ok((StatusCode::CREATED, Json(JournalCreated { id })))
}

pub async fn rule_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<RuleNew>,
) -> Result<(StatusCode, Json<RuleView>), ServerError> {
    let function = function_from_api(payload.function);
    let id = state
        .engine
        .new_completion_rule(
            &payload.name,
            payload.sequence,
            function,
            &payload.journal_ids,
            &user.actor(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RuleView {
            id,
            sequence: payload.sequence,
            name: payload.name,
            function: payload.function,
            function_label: function.label().to_string(),
        }),
    ))
}

/// Rules of a journal, in execution order
pub async fn rules(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(journal_id): Path<Uuid>,
) -> Result<Json<RuleList>, ServerError> {
    let rules = state.engine.journal_rules(journal_id, &user.actor()).await?;

    Ok(Json(RuleList {
        rules: rules
            .into_iter()
            .map(|rule| RuleView {
                id: rule.id,
                sequence: rule.sequence,
                name: rule.name,
                function: function_to_api(rule.function),
                function_label: rule.function.label().to_string(),
            })
            .collect(),
    }))
}

/// Complete a statement line with the rules of the journal
pub async fn complete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(journal_id): Path<Uuid>,
    Json(payload): Json<StatementLine>,
) -> Result<Json<CompletionResult>, ServerError> {
    let line = engine::StatementLine {
        name: payload.name,
        reference: payload.reference,
        amount_minor: payload.amount_minor,
    };
    let completion = state
        .engine
        .auto_complete(journal_id, &line, &user.actor())
        .await?;

    Ok(Json(CompletionResult {
        partner_id: completion.partner_id,
    }))
}
