//! Sponsorship tracking engine.
//!
//! The [`Engine`] owns the database connection and exposes every business
//! operation: the sub-sponsorship (SDS) workflow on sponsorships, bank
//! statement completion, mobile app data and the SMS sponsorship flow.

pub use actor::Actor;
pub use child_pictures::ChildPicture;
pub use children::Child;
pub use completion_rules::{Completion, CompletionFunction, CompletionRule, StatementLine};
pub use error::EngineError;
pub use field_offices::FieldOffice;
pub use mobile::{ChildAppData, child_local_time};
pub use ops::{
    Engine, EngineBuilder, PartnerNew, SmsChildData, SmsSponsorForm, SponsorshipNew,
    SponsorshipUpdate,
};
pub use origins::Origin;
pub use partners::Partner;
pub use projects::Project;
pub use sds::{SdsGroup, SdsState, color, group_by_sds_state};
pub use sms_requests::{ChildPreferences, SmsChildRequest};
pub use sponsorships::{
    ContractState, END_REASON_CHILD_DEPARTURE, END_REASON_CHILD_EXCHANGE, Sponsorship,
};

mod actor;
mod child_pictures;
mod children;
mod completion_rules;
mod error;
mod field_offices;
mod followers;
mod invoices;
mod journal_rules;
mod journals;
mod mobile;
mod move_lines;
mod ops;
mod origins;
mod partners;
mod payment_lines;
mod projects;
mod sds;
mod sms_requests;
mod sponsorships;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
