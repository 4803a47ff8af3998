use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Deserialize a nullable field of a partial update.
///
/// A missing key stays `None` (untouched), an explicit `null` becomes
/// `Some(None)` (cleared).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A JSON value that is a single object for one item and a list otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn from_vec(mut items: Vec<T>) -> Self {
        match items.len() {
            1 => Self::One(items.remove(0)),
            _ => Self::Many(items),
        }
    }
}

pub mod sponsorship {
    use super::*;

    /// Status of the search for a substitute sponsorship.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SdsState {
        Draft,
        Active,
        SubWaiting,
        Sub,
        SubAccept,
        SubReject,
        NoSub,
        Cancelled,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ContractState {
        Draft,
        Waiting,
        Active,
        Terminated,
        Cancelled,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SponsorshipNew {
        pub partner_id: Uuid,
        /// Defaults to the partner.
        pub correspondent_id: Option<Uuid>,
        pub child_id: Option<Uuid>,
        #[serde(rename = "type")]
        pub kind: String,
        pub origin_id: Option<Uuid>,
        pub parent_id: Option<Uuid>,
        /// Defaults to the authenticated user.
        pub sds_uid: Option<String>,
        pub sub_notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SponsorshipCreated {
        pub id: Uuid,
    }

    /// Partial update; absent keys are left untouched, `null` clears.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SponsorshipUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub sds_state: Option<SdsState>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub color: Option<i32>,
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub parent_id: Option<Option<Uuid>>,
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub origin_id: Option<Option<Uuid>>,
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub sub_sponsorship_id: Option<Option<Uuid>>,
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub sds_uid: Option<Option<String>>,
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub no_sub_reason: Option<Option<String>>,
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub sub_notes: Option<Option<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub cancel_gifts_on_termination: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SponsorshipView {
        pub id: Uuid,
        pub partner_id: Uuid,
        pub correspondent_id: Uuid,
        pub child_id: Option<Uuid>,
        #[serde(rename = "type")]
        pub kind: String,
        pub state: ContractState,
        pub end_reason: Option<String>,
        pub origin_id: Option<Uuid>,
        pub parent_id: Option<Uuid>,
        pub sub_sponsorship_id: Option<Uuid>,
        pub sds_state: SdsState,
        pub sds_state_date: Option<NaiveDate>,
        pub color: i32,
        pub no_sub_reason: Option<String>,
        pub sds_uid: Option<String>,
        pub sub_notes: Option<String>,
        pub cancel_gifts_on_termination: bool,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SponsorshipList {
        pub sponsorships: Vec<SponsorshipView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CorrespondentChange {
        pub correspondent_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParentSuggestion {
        pub parent_id: Option<Uuid>,
    }
}

pub mod workflow {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContractBatch {
        pub ids: Vec<Uuid>,
    }

    /// Cancellation or termination of contracts.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContractEnd {
        pub ids: Vec<Uuid>,
        /// `1` child departure, `11` exchange of child.
        pub end_reason: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NoSub {
        pub ids: Vec<Uuid>,
        pub reason: Option<String>,
    }
}

pub mod sds {
    use super::*;
    use crate::sponsorship::SdsState;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SdsStateChoice {
        pub state: SdsState,
        pub label: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SdsGroup {
        pub state: SdsState,
        pub label: String,
        pub count: u64,
        pub folded: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SdsGroups {
        pub groups: Vec<SdsGroup>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FollowerSet {
        pub lang_code: String,
        pub username: String,
    }
}

pub mod partner {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PartnerNew {
        #[serde(rename = "ref")]
        pub reference: Option<String>,
        pub firstname: Option<String>,
        pub lastname: String,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub lang: Option<String>,
        pub commercial_partner_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PartnerCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PartnerView {
        pub id: Uuid,
        #[serde(rename = "ref")]
        pub reference: Option<String>,
        pub firstname: Option<String>,
        pub lastname: String,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub lang: Option<String>,
        pub commercial_partner_id: Uuid,
    }
}

pub mod completion {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum CompletionFunction {
        #[serde(rename = "get_from_amount")]
        FromAmount,
        #[serde(rename = "get_from_move_line_ref")]
        FromMoveLineRef,
        #[serde(rename = "get_from_payment_line")]
        FromPaymentLine,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct JournalNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct JournalCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RuleNew {
        pub name: String,
        pub sequence: i32,
        pub function: CompletionFunction,
        pub journal_ids: Vec<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RuleView {
        pub id: Uuid,
        pub sequence: i32,
        pub name: String,
        pub function: CompletionFunction,
        /// Human readable name of the function.
        pub function_label: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RuleList {
        pub rules: Vec<RuleView>,
    }

    /// A bank statement line to complete.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatementLine {
        pub name: String,
        #[serde(rename = "ref")]
        pub reference: Option<String>,
        /// Negative for debits.
        pub amount_minor: i64,
    }

    /// Values found for the line; all empty when no rule matched.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CompletionResult {
        pub partner_id: Option<Uuid>,
    }
}

pub mod mobile {
    use super::*;

    /// `GET /mobile/children` query: comma separated child ids.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChildIds {
        pub ids: String,
        #[serde(default)]
        pub multi: bool,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct ChildConnectData {
        pub id: Uuid,
        pub global_id: String,
        pub local_id: Option<String>,
        pub name: String,
        pub preferred_name: Option<String>,
        pub last_name: Option<String>,
        pub full_name: String,
        pub gender: Option<String>,
        pub birth_date: Option<NaiveDate>,
        pub age: Option<i32>,
        #[serde(rename = "ImageURL")]
        pub image_url: Option<String>,
        pub sponsorship_status: Option<String>,
        pub project_id: Option<Uuid>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct ChildImage {
        pub id: Uuid,
        pub child_id: Uuid,
        #[serde(rename = "ImageURL")]
        pub image_url: Option<String>,
        pub date: Option<NaiveDate>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct Location {
        pub fcp_id: String,
        pub name: String,
        pub city: Option<String>,
        pub country: Option<String>,
        pub latitude: Option<f64>,
        pub longitude: Option<f64>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ChildTime {
        /// `%d/%m/%Y %H:%M:%S` at the child.
        #[serde(rename = "ChildTime")]
        pub child_time: String,
    }

    /// Tile data; serializes to `{}` when no child was requested.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct ChildApp {
        #[serde(rename = "Child", default, skip_serializing_if = "Option::is_none")]
        pub child: Option<OneOrMany<ChildConnectData>>,
        #[serde(rename = "Children", default, skip_serializing_if = "Option::is_none")]
        pub children: Option<OneOrMany<ChildConnectData>>,
        #[serde(rename = "Images", default, skip_serializing_if = "Option::is_none")]
        pub images: Option<Vec<ChildImage>>,
        #[serde(rename = "Location", default, skip_serializing_if = "Option::is_none")]
        pub location: Option<Option<Location>>,
        #[serde(rename = "Time", default, skip_serializing_if = "Option::is_none")]
        pub time: Option<ChildTime>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ChildBio {
        pub name: String,
        pub first_name: Option<String>,
        pub last_name: Option<String>,
        pub gender: Option<String>,
        pub birthdate: Option<NaiveDate>,
        pub age: Option<i32>,
        pub weight: Option<String>,
        pub height: Option<String>,
        pub education_level: Option<String>,
        pub academic_performance: Option<String>,
        pub vocational_training_type: Option<String>,
        pub sponsorship_status: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ChildBioResponse {
        #[serde(rename = "ChildBioServiceResult")]
        pub result: ChildBio,
    }
}

pub mod sms {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Country {
        /// Country code of the field office.
        pub value: String,
        pub text: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct FieldOfficeRef {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct SmsPartner {
        pub firstname: Option<String>,
        pub lastname: String,
        pub email: Option<String>,
    }

    /// One item of the `get_child_data` answer.
    ///
    /// Only the flags are present when the request is invalid, confirmed or
    /// has no child.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct SmsChildData {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub invalid_sms_child_request: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub sponsorship_confirmed: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub has_a_child: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub id: Option<Uuid>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub birthdate: Option<NaiveDate>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub display_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub desc_en: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub field_office: Option<FieldOfficeRef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub gender: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub image_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub age: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub countries: Option<Vec<Country>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub partner: Option<SmsPartner>,
    }

    /// Child request received by the SMS gateway.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SmsRequestNew {
        pub sender: String,
        pub child_id: Option<Uuid>,
        pub partner_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SmsRequestCreated {
        pub id: i64,
        /// Link sent back to the sender.
        pub url: String,
    }

    /// Form submitted to confirm a sponsorship.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SmsConfirm {
        pub firstname: Option<String>,
        pub lastname: String,
        pub email: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SmsConfirmResult {
        pub result: String,
        pub sponsorship_id: Uuid,
    }

    /// Preferences for another child. Empty strings clear a preference.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct SmsChangeChild {
        pub gender: String,
        /// `min-max`
        pub age: String,
        /// Field office country code.
        pub country: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SmsChangeChildResult {
        pub child_id: Option<Uuid>,
    }

    /// Data prefilling the registration form of step 2.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SmsSponsorshipForm {
        pub sponsorship_id: Uuid,
        pub child_id: Option<Uuid>,
        pub state: crate::sponsorship::ContractState,
        pub firstname: Option<String>,
        pub lastname: String,
        pub email: Option<String>,
        pub phone: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_item_is_not_wrapped_in_a_list() {
        assert_eq!(OneOrMany::from_vec(vec![1]), OneOrMany::One(1));
        assert_eq!(OneOrMany::from_vec(vec![1, 2]), OneOrMany::Many(vec![1, 2]));
    }

    #[test]
    fn update_distinguishes_missing_and_null() {
        let update: sponsorship::SponsorshipUpdate =
            serde_json::from_str(r#"{"parent_id": null, "sds_state": "sub_waiting"}"#).unwrap();
        assert_eq!(update.parent_id, Some(None));
        assert_eq!(update.origin_id, None);
        assert_eq!(update.sds_state, Some(sponsorship::SdsState::SubWaiting));
    }
}
