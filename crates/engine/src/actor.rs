//! Permission context passed to every engine operation.
//!
//! Nothing in the engine escalates privileges on its own: callers say who
//! is acting, and operations that need staff access check it.

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Actor {
    /// An authenticated staff user (`username`).
    User(String),
    /// Anonymous visitor of the public SMS pages.
    Public,
    /// Internal processing acting on behalf of a public request.
    System,
}

impl Actor {
    pub fn user(username: impl Into<String>) -> Self {
        Self::User(username.into())
    }

    /// Username of a staff user, if any.
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::User(username) => Some(username),
            Self::Public | Self::System => None,
        }
    }

    pub(crate) fn require_authenticated(&self) -> ResultEngine<()> {
        match self {
            Self::User(_) | Self::System => Ok(()),
            Self::Public => Err(EngineError::Forbidden(
                "operation requires an authenticated user".to_string(),
            )),
        }
    }

    /// Operations reachable from a public SMS link accept every actor.
    pub(crate) fn require_visitor(&self) -> ResultEngine<()> {
        match self {
            Self::Public | Self::System | Self::User(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_actor_is_not_authenticated() {
        assert!(Actor::Public.require_authenticated().is_err());
        assert!(Actor::System.require_authenticated().is_ok());
        assert!(Actor::user("ecino").require_authenticated().is_ok());
    }

    #[test]
    fn every_actor_may_follow_an_sms_link() {
        assert!(Actor::Public.require_visitor().is_ok());
        assert!(Actor::System.require_visitor().is_ok());
        assert!(Actor::user("ecino").require_visitor().is_ok());
    }

    #[test]
    fn only_users_have_a_username() {
        assert_eq!(Actor::user("ecino").username(), Some("ecino"));
        assert_eq!(Actor::System.username(), None);
    }
}
