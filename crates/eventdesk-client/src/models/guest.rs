//! Guests of an event.

use serde::{Deserialize, Serialize};

/// RSVP state, carried as a number on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assistance {
    Unconfirmed,
    Assisting,
    NotAssisting,
}

impl Assistance {
    pub fn code(self) -> u8 {
        match self {
            Assistance::Unconfirmed => 0,
            Assistance::Assisting => 1,
            Assistance::NotAssisting => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Assistance::Unconfirmed),
            1 => Some(Assistance::Assisting),
            2 => Some(Assistance::NotAssisting),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub paternal_surname: String,
    #[serde(default)]
    pub maternal_surname: String,
    pub phone_number: String,
    pub assistance: u8,
    pub escorts: u32,
    #[serde(default)]
    pub personal_message: String,
    #[serde(default)]
    pub notes: String,
}

impl Guest {
    pub fn assistance(&self) -> Option<Assistance> {
        Assistance::from_code(self.assistance)
    }
}

/// Body for creating or updating a guest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestPayload {
    pub name: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub phone_number: String,
    pub assistance: u8,
    pub escorts: u32,
    pub personal_message: String,
    pub notes: String,
}
