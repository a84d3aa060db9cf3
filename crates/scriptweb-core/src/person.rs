//! The person record passed into scripts and read back out of them

use serde::{Deserialize, Serialize};

/// Flat personal-data record.
///
/// Serialized field names are PascalCase; those names are also the free
/// variables a script sees when a `Person` is bound as its globals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Person {
    /// Family name
    pub last_name: String,
    /// Given name
    pub first_name: String,
    /// Middle name
    pub middle_name: String,
    /// Birth date as entered, not validated
    pub birth_date: String,
    /// Street address
    pub address: String,
    /// City of residence
    pub city: String,
    /// State of residence
    pub state: String,
    /// Postal code
    pub zip: String,
    /// County of residence
    pub county: String,
    /// Social security number
    pub social: String,
    /// Phone number
    pub phone: String,
    /// Weight in pounds
    pub pounds: i32,
    /// Height, feet part
    pub feet: i32,
    /// Height, inches part
    pub inches: i32,
    /// City of birth
    pub birth_city: String,
    /// State of birth
    pub birth_state: String,
    /// Sex
    pub sex: String,
    /// ISO country code, if known
    #[serde(default)]
    pub country_code: Option<String>,
}

impl Person {
    /// `"{first} {middle} {last}"`
    pub fn full_name(&self) -> String {
        format!("{} {} {}", self.first_name, self.middle_name, self.last_name)
    }

    /// Height in total inches
    pub fn height_inches(&self) -> i32 {
        self.feet * 12 + self.inches
    }
}
