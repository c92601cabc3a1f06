//! [`Registration`] definitions.

use std::{collections::BTreeMap, sync::LazyLock};

use derive_more::{Display, From, FromStr, Into};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::{
    tournament::{self, Tournament},
    user::{self, Gender, User},
};

/// Enrollment of a [`User`] into a [`Tournament`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// ID of this [`Registration`].
    pub id: Id,

    /// [`Tournament`] this [`Registration`] belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tournament: Option<tournament::Ref>,

    /// ID of the [`Tournament`] this [`Registration`] belongs to, when the
    /// server sends it flat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tournament_id: Option<tournament::Id>,

    /// [`User`] who registered, if the server disclosed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<user::Ref>,

    /// Category this [`Registration`] competes in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// [`Gender`] of the registered participant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    /// Email of the registered participant's partner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_email: Option<String>,
}

impl Registration {
    /// Returns ID of the [`Tournament`] this [`Registration`] belongs to,
    /// if known.
    #[must_use]
    pub fn tournament_id(&self) -> Option<tournament::Id> {
        self.tournament.as_ref().map(|t| t.id).or(self.tournament_id)
    }

    /// Indicates whether this [`Registration`] was made by the provided
    /// [`User`].
    #[must_use]
    pub fn is_by(&self, user_id: user::Id) -> bool {
        self.user.as_ref().is_some_and(|u| u.id == user_id)
    }

    /// Returns the name to display for the participant of this
    /// [`Registration`].
    ///
    /// Falls back to the provided current [`User`] when the server omitted the
    /// name of their own [`Registration`], and then to the local part of the
    /// partner email.
    #[must_use]
    pub fn display_name(&self, current: Option<&User>) -> String {
        if let Some(name) = self.user.as_ref().and_then(|u| u.name.clone()) {
            return name;
        }
        if let Some(me) = current.filter(|me| self.is_by(me.id)) {
            return me.name.to_string();
        }
        self.partner_email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .filter(|n| !n.is_empty())
            .map_or_else(|| "unknown".to_owned(), ToOwned::to_owned)
    }
}

/// ID of a [`Registration`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub struct Id(i64);

/// Payload of a [`Registration`] to be created.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct New {
    /// ID of the [`Tournament`] to register into.
    pub tournament_id: tournament::Id,

    /// Category to compete in, if the [`Tournament`] has categories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// [`Gender`] of the participant.
    pub gender: Gender,

    /// Email of the participant's partner.
    pub partner_email: String,
}

/// Registration form being filled in for a [`Tournament`].
#[derive(Clone, Debug, Default)]
pub struct Form {
    /// Selected [`Gender`].
    pub gender: Option<Gender>,

    /// Selected category.
    pub category: Option<String>,

    /// Entered partner email.
    pub partner_email: String,
}

impl Form {
    /// Creates a new [`Form`] prefilled for the provided [`User`].
    #[must_use]
    pub fn for_user(user: Option<&User>) -> Self {
        Self {
            gender: user.and_then(|u| u.gender),
            ..Self::default()
        }
    }

    /// Validates this [`Form`] against the provided [`Tournament`], producing
    /// a [`New`] [`Registration`] payload.
    ///
    /// # Errors
    ///
    /// With every invalid [`Field`] and its message, if any.
    pub fn validate(&self, tournament: &Tournament) -> Result<New, FormErrors> {
        /// Loose email format accepted for partners.
        static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"\S+@\S+\.\S+").expect("valid regex")
        });

        let mut errors = FormErrors::default();

        if self.gender.is_none() {
            errors.add(Field::Gender, "gender is required");
        }

        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        if !tournament.categories.is_empty() {
            match category {
                None => errors.add(Field::Category, "category is required"),
                Some(c) if !tournament.categories.iter().any(|k| k == c) => {
                    errors.add(
                        Field::Category,
                        "category is not offered by this tournament",
                    );
                }
                Some(_) => {}
            }
        }

        let partner_email = self.partner_email.trim();
        if partner_email.is_empty() {
            errors.add(Field::PartnerEmail, "partner email is required");
        } else if !EMAIL.is_match(partner_email) {
            errors.add(Field::PartnerEmail, "partner email is invalid");
        }

        match self.gender {
            Some(gender) if errors.is_empty() => Ok(New {
                tournament_id: tournament.id,
                category: category
                    .filter(|_| !tournament.categories.is_empty())
                    .map(ToOwned::to_owned),
                gender,
                partner_email: partner_email.to_owned(),
            }),
            Some(_) | None => Err(errors),
        }
    }
}

/// Field of a [`Form`].
#[derive(Clone, Copy, Debug, Display, Eq, Ord, PartialEq, PartialOrd)]
pub enum Field {
    /// [`Form::gender`].
    #[display("gender")]
    Gender,

    /// [`Form::category`].
    #[display("category")]
    Category,

    /// [`Form::partner_email`].
    #[display("partner email")]
    PartnerEmail,
}

/// Validation errors of a [`Form`], collected per [`Field`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FormErrors(BTreeMap<Field, &'static str>);

impl FormErrors {
    /// Records the provided `message` for the provided [`Field`].
    fn add(&mut self, field: Field, message: &'static str) {
        drop(self.0.insert(field, message));
    }

    /// Indicates whether no errors were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the message recorded for the provided [`Field`], if any.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    /// Iterates over all the recorded errors in [`Field`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(f, m)| (*f, *m))
    }
}
