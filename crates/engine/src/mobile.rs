//! Data served to the mobile app.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::{Child, ChildPicture, Project};

/// Timezone used for the "time at the child" widget.
pub const CHILD_TIMEZONE: Tz = chrono_tz::America::Managua;

/// Everything the app needs to render child tiles.
#[derive(Clone, Debug, PartialEq)]
pub struct ChildAppData {
    pub children: Vec<Child>,
    /// Pictures of the children that have an url.
    pub pictures: Vec<ChildPicture>,
    /// Project of the first child.
    pub project: Option<Project>,
    pub child_time: String,
}

/// Current time at the child, formatted for the app (`%d/%m/%Y %H:%M:%S`).
pub fn child_local_time(now: DateTime<Utc>) -> String {
    now.with_timezone(&CHILD_TIMEZONE)
        .format("%d/%m/%Y %H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn child_time_is_managua_local() {
        // Managua is UTC-6 all year.
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 14, 5, 9).unwrap();
        assert_eq!(child_local_time(now), "01/03/2024 08:05:09");
    }

    #[test]
    fn child_time_crosses_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 3, 0, 0).unwrap();
        assert_eq!(child_local_time(now), "31/12/2023 21:00:00");
    }
}
