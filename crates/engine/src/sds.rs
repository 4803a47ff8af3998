//! Sub-sponsorship (SDS) status.
//!
//! When a sponsorship ends because the child left, the sponsor is offered a
//! substitute child. The SDS status tracks that offer on the original
//! sponsorship (the *parent*) while the substitute (the *child* sponsorship)
//! goes through its own contract workflow.

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Display colors written alongside SDS transitions.
pub mod color {
    pub const DEFAULT: i32 = 0;
    pub const CANCELLED: i32 = 1;
    /// Red, a substitute is pending or was declined.
    pub const PENDING: i32 = 2;
    /// Yellow, waiting for a substitute.
    pub const WAITING: i32 = 3;
    /// Green, substitute accepted.
    pub const ACCEPTED: i32 = 5;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SdsState {
    #[default]
    Draft,
    Active,
    SubWaiting,
    Sub,
    SubAccept,
    SubReject,
    NoSub,
    Cancelled,
}

impl SdsState {
    /// Every state, in display order.
    pub const ALL: [SdsState; 8] = [
        Self::Draft,
        Self::Active,
        Self::SubWaiting,
        Self::Sub,
        Self::SubAccept,
        Self::SubReject,
        Self::NoSub,
        Self::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::SubWaiting => "sub_waiting",
            Self::Sub => "sub",
            Self::SubAccept => "sub_accept",
            Self::SubReject => "sub_reject",
            Self::NoSub => "no_sub",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Active => "Active",
            Self::SubWaiting => "Sub waiting",
            Self::Sub => "Sub",
            Self::SubAccept => "Sub Accept",
            Self::SubReject => "Sub Reject",
            Self::NoSub => "No sub",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Ordered `(code, label)` pairs of all states.
    pub fn choices() -> Vec<(&'static str, &'static str)> {
        Self::ALL.iter().map(|s| (s.as_str(), s.label())).collect()
    }

    /// States shown in the grouped follow-up view: `active` and every state
    /// whose code mentions `sub`.
    pub fn is_displayed_in_groups(self) -> bool {
        self == Self::Active || self.as_str().contains("sub")
    }
}

impl TryFrom<&str> for SdsState {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == value)
            .ok_or_else(|| EngineError::InvalidState(format!("invalid sds state: {value}")))
    }
}

/// One group of the follow-up list view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SdsGroup {
    pub state: SdsState,
    pub label: &'static str,
    pub count: u64,
    /// Collapsed by default in the view.
    pub folded: bool,
}

/// Reshape raw `(state, count)` rows into the labelled, ordered groups of the
/// follow-up view.
///
/// States outside the displayed subset are dropped, states without rows are
/// omitted, and `active` is folded.
pub fn group_by_sds_state<I>(rows: I) -> Vec<SdsGroup>
where
    I: IntoIterator<Item = (SdsState, u64)>,
{
    let mut counts = [None::<u64>; SdsState::ALL.len()];
    for (state, count) in rows {
        if !state.is_displayed_in_groups() {
            continue;
        }
        if let Some(index) = SdsState::ALL.iter().position(|s| *s == state) {
            *counts[index].get_or_insert(0) += count;
        }
    }

    SdsState::ALL
        .iter()
        .zip(counts)
        .filter_map(|(state, count)| {
            count.map(|count| SdsGroup {
                state: *state,
                label: state.label(),
                count,
                folded: *state == SdsState::Active,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_are_ordered() {
        let codes: Vec<_> = SdsState::choices().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            codes,
            vec![
                "draft",
                "active",
                "sub_waiting",
                "sub",
                "sub_accept",
                "sub_reject",
                "no_sub",
                "cancelled"
            ]
        );
        assert_eq!(SdsState::choices()[2].1, "Sub waiting");
    }

    #[test]
    fn parse_roundtrips_codes() {
        for state in SdsState::ALL {
            assert_eq!(SdsState::try_from(state.as_str()).unwrap(), state);
        }
        assert!(SdsState::try_from("waiting").is_err());
    }

    #[test]
    fn serde_uses_codes() {
        let json = serde_json::to_string(&SdsState::SubWaiting).unwrap();
        assert_eq!(json, "\"sub_waiting\"");
    }

    #[test]
    fn draft_and_cancelled_are_not_grouped() {
        assert!(!SdsState::Draft.is_displayed_in_groups());
        assert!(!SdsState::Cancelled.is_displayed_in_groups());
        assert!(SdsState::NoSub.is_displayed_in_groups());
        assert!(SdsState::Active.is_displayed_in_groups());
    }

    #[test]
    fn groups_follow_enumeration_order() {
        let groups = group_by_sds_state(vec![
            (SdsState::SubReject, 1),
            (SdsState::Draft, 7),
            (SdsState::Active, 4),
            (SdsState::SubWaiting, 2),
            (SdsState::Cancelled, 3),
        ]);

        let states: Vec<_> = groups.iter().map(|g| g.state).collect();
        assert_eq!(
            states,
            vec![SdsState::Active, SdsState::SubWaiting, SdsState::SubReject]
        );
        assert!(groups[0].folded);
        assert!(!groups[1].folded);
        assert_eq!(groups[1].label, "Sub waiting");
        assert_eq!(groups[2].count, 1);
    }
}
