//! User model
//!
//! A person listed in the directory. Field names serialize in PascalCase and
//! in declaration order; audit snapshots and their flattened display rely on
//! both.

use chrono::{Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::entity::{Entity, EntityKind};
use super::ids::UserId;

/// Oldest date of birth accepted, in years before today
const MAX_AGE_YEARS: u32 = 130;

/// A user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    /// Store-assigned identifier
    pub id: UserId,

    /// Given name
    pub forename: String,

    /// Family name
    pub surname: String,

    /// Contact email
    pub email: String,

    /// Whether the account is active
    pub is_active: bool,

    /// Date of birth, if known
    pub date_of_birth: Option<NaiveDate>,
}

impl User {
    /// Create a new, active user with no identity assigned yet
    pub fn new(
        forename: impl Into<String>,
        surname: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId::UNSET,
            forename: forename.into(),
            surname: surname.into(),
            email: email.into(),
            is_active: true,
            date_of_birth: None,
        }
    }

    /// Set the date of birth
    pub fn with_date_of_birth(mut self, date_of_birth: NaiveDate) -> Self {
        self.date_of_birth = Some(date_of_birth);
        self
    }

    /// Set the active flag
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// "Forename Surname", the label audit records freeze at write time
    pub fn full_name(&self) -> String {
        format!("{} {}", self.forename, self.surname)
    }

    /// Validate the user against today's date
    pub fn validate(&self) -> Result<(), UserValidationError> {
        self.validate_as_of(Utc::now().date_naive())
    }

    /// Validate the user against a given "today"
    pub fn validate_as_of(&self, today: NaiveDate) -> Result<(), UserValidationError> {
        if self.forename.trim().is_empty() {
            return Err(UserValidationError::EmptyForename);
        }

        if self.surname.trim().is_empty() {
            return Err(UserValidationError::EmptySurname);
        }

        if self.email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }

        if !is_valid_email(&self.email) {
            return Err(UserValidationError::InvalidEmail(self.email.clone()));
        }

        if let Some(dob) = self.date_of_birth {
            if dob > today {
                return Err(UserValidationError::DateOfBirthInFuture(dob));
            }

            let earliest = today
                .checked_sub_months(Months::new(MAX_AGE_YEARS * 12))
                .unwrap_or(NaiveDate::MIN);
            if dob < earliest {
                return Err(UserValidationError::DateOfBirthTooOld(dob));
            }
        }

        Ok(())
    }

    /// Check if this user's email matches (case-insensitive)
    pub fn matches_email(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }

    /// Check if this user's full name matches (case-insensitive)
    pub fn matches_name(&self, name: &str) -> bool {
        self.full_name().to_lowercase() == name.trim().to_lowercase()
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn key(&self) -> u64 {
        self.id.value()
    }

    fn assign_key(&mut self, key: u64) {
        self.id = UserId::new(key);
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// A partial edit of a user; `None` leaves the field as it is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub forename: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
    /// `Some(None)` clears a recorded date of birth
    pub date_of_birth: Option<Option<NaiveDate>>,
}

impl UserPatch {
    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Produce the edited copy of `user`; the identity is never touched
    pub fn apply_to(&self, user: &User) -> User {
        let mut edited = user.clone();
        if let Some(forename) = &self.forename {
            edited.forename = forename.trim().to_string();
        }
        if let Some(surname) = &self.surname {
            edited.surname = surname.trim().to_string();
        }
        if let Some(email) = &self.email {
            edited.email = email.trim().to_string();
        }
        if let Some(is_active) = self.is_active {
            edited.is_active = is_active;
        }
        if let Some(dob) = self.date_of_birth {
            edited.date_of_birth = dob;
        }
        edited
    }
}

/// Validation errors for users
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyForename,
    EmptySurname,
    EmptyEmail,
    InvalidEmail(String),
    DateOfBirthInFuture(NaiveDate),
    DateOfBirthTooOld(NaiveDate),
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyForename => write!(f, "Forename cannot be empty"),
            Self::EmptySurname => write!(f, "Surname cannot be empty"),
            Self::EmptyEmail => write!(f, "Email cannot be empty"),
            Self::InvalidEmail(email) => {
                write!(f, "'{}' is not a valid email address", email)
            }
            Self::DateOfBirthInFuture(date) => {
                write!(f, "Date of birth {} cannot be in the future", date)
            }
            Self::DateOfBirthTooOld(date) => {
                write!(f, "Date of birth {} is not realistic", date)
            }
        }
    }
}

impl std::error::Error for UserValidationError {}
