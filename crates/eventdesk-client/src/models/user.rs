//! User accounts.

use serde::{Deserialize, Serialize};

use crate::auth::Profile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub paternal_surname: String,
    #[serde(default)]
    pub maternal_surname: String,
    #[serde(default)]
    pub state_code: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub person: Person,
    pub profile: Profile,
}

impl User {
    pub fn full_name(&self) -> String {
        [
            self.person.name.as_str(),
            self.person.paternal_surname.as_str(),
            self.person.maternal_surname.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserData {
    pub email: String,
    pub password: String,
    pub name: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub state_code: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserData {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub state_code: String,
    pub phone: String,
    /// Set only when the password is being changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Client option for event owner pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectClient {
    pub id: i64,
    pub name: String,
}
