//! Bank statement completion.

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Actor, Completion, CompletionFunction, CompletionRule, EngineError, ResultEngine,
    StatementLine, completion_rules, invoices, journal_rules, journals, move_lines,
    payment_lines,
    util::normalize_required_name,
};

use super::{Engine, with_tx};

impl Engine {
    /// Add a statement journal.
    pub async fn new_journal(&self, name: &str, actor: &Actor) -> ResultEngine<Uuid> {
        actor.require_authenticated()?;
        let name = normalize_required_name(name, "journal name")?;
        with_tx!(self, |db_tx| {
            let exists = journals::Entity::find()
                .filter(journals::Column::Name.eq(name.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            let id = Uuid::new_v4();
            journals::ActiveModel {
                id: ActiveValue::Set(id.to_string()),
                name: ActiveValue::Set(name),
            }
            .insert(&db_tx)
            .await?;
            Ok(id)
        })
    }

    /// Add a completion rule and enable it on the given journals.
    pub async fn new_completion_rule(
        &self,
        name: &str,
        sequence: i32,
        function: CompletionFunction,
        journal_ids: &[Uuid],
        actor: &Actor,
    ) -> ResultEngine<Uuid> {
        actor.require_authenticated()?;
        let name = normalize_required_name(name, "rule name")?;
        with_tx!(self, |db_tx| {
            let id = Uuid::new_v4();
            completion_rules::ActiveModel {
                id: ActiveValue::Set(id.to_string()),
                sequence: ActiveValue::Set(sequence),
                name: ActiveValue::Set(name),
                function: ActiveValue::Set(function.as_str().to_string()),
            }
            .insert(&db_tx)
            .await?;

            for journal_id in journal_ids {
                self.require_journal(&db_tx, *journal_id).await?;
                journal_rules::ActiveModel {
                    journal_id: ActiveValue::Set(journal_id.to_string()),
                    rule_id: ActiveValue::Set(id.to_string()),
                }
                .insert(&db_tx)
                .await?;
            }
            Ok(id)
        })
    }

    /// Rules of a journal, in the order they run.
    pub async fn journal_rules(
        &self,
        journal_id: Uuid,
        actor: &Actor,
    ) -> ResultEngine<Vec<CompletionRule>> {
        actor.require_authenticated()?;
        with_tx!(self, |db_tx| self.rules_in_order(&db_tx, journal_id).await)
    }

    /// Run the rules of a journal on a statement line.
    ///
    /// The first rule returning values wins; an empty completion means no
    /// rule matched.
    pub async fn auto_complete(
        &self,
        journal_id: Uuid,
        line: &StatementLine,
        actor: &Actor,
    ) -> ResultEngine<Completion> {
        actor.require_authenticated()?;
        with_tx!(self, |db_tx| {
            for rule in self.rules_in_order(&db_tx, journal_id).await? {
                let completion = match rule.function {
                    CompletionFunction::FromAmount => self.from_amount(&db_tx, line).await?,
                    CompletionFunction::FromMoveLineRef => {
                        self.from_move_line_ref(&db_tx, line).await?
                    }
                    CompletionFunction::FromPaymentLine => {
                        self.from_payment_line(&db_tx, line).await?
                    }
                };
                if !completion.is_empty() {
                    tracing::debug!(rule = %rule.name, line = %line.name, "statement line completed");
                    return Ok(completion);
                }
            }
            Ok(Completion::default())
        })
    }

    async fn rules_in_order(
        &self,
        db: &DatabaseTransaction,
        journal_id: Uuid,
    ) -> ResultEngine<Vec<CompletionRule>> {
        self.require_journal(db, journal_id).await?;
        let models = completion_rules::Entity::find()
            .inner_join(journal_rules::Entity)
            .filter(journal_rules::Column::JournalId.eq(journal_id.to_string()))
            .order_by_asc(completion_rules::Column::Sequence)
            .order_by_asc(completion_rules::Column::Id)
            .all(db)
            .await?;
        models.into_iter().map(CompletionRule::try_from).collect()
    }

    /// A debit matching the total of open supplier invoices is paid to the
    /// supplier of the first one.
    async fn from_amount(
        &self,
        db: &DatabaseTransaction,
        line: &StatementLine,
    ) -> ResultEngine<Completion> {
        if line.amount_minor >= 0 {
            return Ok(Completion::default());
        }
        let Some(amount) = line.amount_minor.checked_neg() else {
            return Ok(Completion::default());
        };

        let invoices = invoices::Entity::find()
            .filter(invoices::Column::Kind.eq(invoices::KIND_SUPPLIER))
            .filter(invoices::Column::State.eq(invoices::STATE_OPEN))
            .filter(invoices::Column::AmountTotalMinor.eq(amount))
            .order_by_asc(invoices::Column::Id)
            .all(db)
            .await?;
        let Some(first) = invoices.first() else {
            return Ok(Completion::default());
        };

        if invoices.iter().any(|inv| inv.partner_id != first.partner_id) {
            tracing::warn!(
                "Line named \"{}\" (Ref:{}) was matched by more than one invoice while looking on open supplier invoices",
                line.name,
                line.reference.as_deref().unwrap_or_default()
            );
        }

        let partner = self.commercial_partner_of(db, &first.partner_id).await?;
        Ok(Completion::partner(partner))
    }

    /// Partner of a previous journal item with the same reference.
    async fn from_move_line_ref(
        &self,
        db: &DatabaseTransaction,
        line: &StatementLine,
    ) -> ResultEngine<Completion> {
        let Some(reference) = line.reference.as_deref().filter(|r| !r.is_empty()) else {
            return Ok(Completion::default());
        };

        let move_line = move_lines::Entity::find()
            .filter(move_lines::Column::Reference.eq(reference))
            .filter(move_lines::Column::PartnerId.is_not_null())
            .order_by_asc(move_lines::Column::Id)
            .one(db)
            .await?;

        match move_line.and_then(|ml| ml.partner_id) {
            Some(partner_id) => Ok(Completion::partner(
                self.commercial_partner_of(db, &partner_id).await?,
            )),
            None => Ok(Completion::default()),
        }
    }

    /// Partner of the most recent payment line named after the reference.
    async fn from_payment_line(
        &self,
        db: &DatabaseTransaction,
        line: &StatementLine,
    ) -> ResultEngine<Completion> {
        let Some(reference) = line.reference.as_deref().filter(|r| !r.is_empty()) else {
            return Ok(Completion::default());
        };

        let payment_line = payment_lines::Entity::find()
            .filter(payment_lines::Column::Name.eq(reference))
            .order_by_desc(payment_lines::Column::Date)
            .one(db)
            .await?;

        match payment_line {
            Some(payment_line) => Ok(Completion::partner(
                self.commercial_partner_of(db, &payment_line.partner_id).await?,
            )),
            None => Ok(Completion::default()),
        }
    }
}
