// Per-record payload for `POST /ers/config/guestuser`. Field order follows
// the ERS GuestUser resource.

use crate::error::ImportError;
use crate::records::GuestUserRecord;
use crate::xml_payload::{GUEST_LOCATION, VALID_DAYS};
use serde::{Deserialize, Serialize};

/// Top-level wrapper ISE expects around a single guest user.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct GuestUserEnvelope {
    #[serde(rename = "GuestUser")]
    pub guest_user: GuestUserResource,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GuestUserResource {
    pub custom_fields: CustomFields,
    pub guest_access_info: GuestAccessInfo,
    pub guest_info: GuestInfo,
    pub guest_type: String,
    pub portal_id: String,
}

/// Always sent empty; the resource schema requires the key.
#[derive(Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct CustomFields {}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GuestAccessInfo {
    pub from_date: String,
    pub location: String,
    pub to_date: String,
    pub valid_days: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GuestInfo {
    pub email_address: String,
    pub enabled: bool,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub user_name: String,
}

impl GuestUserEnvelope {
    pub fn new(user: &GuestUserRecord, portal_id: &str) -> Self {
        GuestUserEnvelope {
            guest_user: GuestUserResource {
                custom_fields: CustomFields::default(),
                guest_access_info: GuestAccessInfo {
                    from_date: user.from_date.clone(),
                    location: GUEST_LOCATION.to_string(),
                    to_date: user.to_date.clone(),
                    valid_days: VALID_DAYS,
                },
                guest_info: GuestInfo {
                    email_address: user.email_address.clone(),
                    enabled: true,
                    first_name: user.first_name.clone(),
                    last_name: user.last_name.clone(),
                    password: user.password.clone(),
                    user_name: user.user_name.clone(),
                },
                guest_type: user.guest_type.clone(),
                portal_id: portal_id.to_string(),
            },
        }
    }
}

/// Serialize one guest user as indented JSON. Callers loop over the
/// record list and submit each document on its own.
pub fn build_guest_user_json(user: &GuestUserRecord, portal_id: &str) -> Result<String, ImportError> {
    Ok(serde_json::to_string_pretty(&GuestUserEnvelope::new(
        user, portal_id,
    ))?)
}
