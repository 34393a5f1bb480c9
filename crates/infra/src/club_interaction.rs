//! Viewer-dependent club state and the like toggle.
//!
//! Everything here is pure: the caller passes the current user explicitly and
//! gets a value back. `repos::clubs::toggle_like` applies the same rule inside
//! a single `UPDATE` so the store never sees a client-computed overwrite.
use thiserror::Error;
use uuid::Uuid;

use crate::models::ClubRow;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClubError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewFlags {
    pub is_creator: bool,
    pub has_liked: bool,
}

/// Derive what the viewer may see on a club page.
///
/// A logged-out viewer (`None`) is never the creator and never has liked.
pub fn compute_view_flags(club: &ClubRow, current_user_id: Option<Uuid>) -> ViewFlags {
    match current_user_id {
        Some(uid) => ViewFlags {
            is_creator: club.creator == uid,
            has_liked: club.people_liked.contains(&uid),
        },
        None => ViewFlags::default(),
    }
}

/// Flip `user_id`'s like on `club`.
///
/// Adds the user and increments `likes` when absent; removes the user and
/// decrements `likes` when present. A missing or nil id is rejected.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use infra::club_interaction::toggle_like;
/// use infra::models::ClubRow;
/// use uuid::Uuid;
///
/// let club = ClubRow {
///     id: Uuid::new_v4(),
///     title: "Arsenal".into(),
///     description: String::new(),
///     first_player: String::new(),
///     second_player: String::new(),
///     third_player: String::new(),
///     image_url: String::new(),
///     creator: Uuid::new_v4(),
///     people_liked: vec![],
///     likes: 0,
///     created_at: Utc::now(),
///     updated_at: Utc::now(),
/// };
/// let fan = Uuid::new_v4();
///
/// let liked = toggle_like(club, Some(fan)).unwrap();
/// assert_eq!(liked.likes, 1);
///
/// let unliked = toggle_like(liked, Some(fan)).unwrap();
/// assert_eq!(unliked.likes, 0);
/// assert!(unliked.people_liked.is_empty());
/// ```
pub fn toggle_like(mut club: ClubRow, user_id: Option<Uuid>) -> Result<ClubRow, ClubError> {
    let uid = require_liker(user_id)?;

    if let Some(pos) = club.people_liked.iter().position(|id| *id == uid) {
        club.people_liked.remove(pos);
        club.likes -= 1;
    } else {
        club.people_liked.push(uid);
        club.likes += 1;
    }

    Ok(club)
}

/// Precondition shared by the in-memory and the store-side toggle: a present,
/// non-nil user id.
pub fn require_liker(user_id: Option<Uuid>) -> Result<Uuid, ClubError> {
    match user_id {
        Some(uid) if !uid.is_nil() => Ok(uid),
        _ => Err(ClubError::InvalidArgument(
            "a user id is required to like a club".to_string(),
        )),
    }
}

/// Client-side registration checks; the identity provider is not consulted.
pub fn validate_registration(
    email: &str,
    password: &str,
    repeat_password: &str,
) -> Result<(), ClubError> {
    if email.is_empty() {
        return Err(ClubError::InvalidInput("Email is required".to_string()));
    }

    if password != repeat_password {
        return Err(ClubError::InvalidInput("Passwords do not match".to_string()));
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ClubError::InvalidInput(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }

    Ok(())
}
