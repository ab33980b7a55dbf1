//! Authorization predicates.
//!
//! Pure checks applied by the domain services once the caller's identity
//! has been verified. They never touch storage; services fetch whatever
//! record a check needs and pass it in.

use thiserror::Error;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    /// Authenticated, but not allowed to act on the resource.
    #[error("Forbidden")]
    Forbidden,

    /// A relationship operation naming the actor on both sides.
    #[error("Cannot target your own account")]
    SelfReference,
}

/// The actor must own the resource.
pub fn ensure_owner(actor: &UserId, owner: &UserId) -> Result<(), AuthorizationError> {
    if actor == owner {
        Ok(())
    } else {
        Err(AuthorizationError::Forbidden)
    }
}

/// The account must hold the paid membership tier.
pub fn ensure_elevated_tier(user: &User) -> Result<(), AuthorizationError> {
    if user.is_chirpy_red {
        Ok(())
    } else {
        Err(AuthorizationError::Forbidden)
    }
}

/// Subject and object of a relationship operation must differ.
///
/// Services call this before any lookup so a self-targeted request never
/// reaches storage.
pub fn ensure_distinct_parties(subject: &UserId, object: &UserId) -> Result<(), AuthorizationError> {
    if subject == object {
        Err(AuthorizationError::SelfReference)
    } else {
        Ok(())
    }
}

/// The actor must be one of the two parties of a relationship.
pub fn ensure_party(actor: &UserId, a: &UserId, b: &UserId) -> Result<(), AuthorizationError> {
    if actor == a || actor == b {
        Ok(())
    } else {
        Err(AuthorizationError::Forbidden)
    }
}
