//! Fixed input record used by every page load

use scriptweb_core::Person;

/// The person every run copies
pub fn person_to_copy() -> Person {
    Person {
        last_name: "Rizzo".to_string(),
        first_name: "Frank".to_string(),
        middle_name: "R-I-Z-Z-O".to_string(),
        birth_date: "05/04/1972".to_string(),
        address: "1234 Any Street".to_string(),
        city: "New York City".to_string(),
        state: "NY".to_string(),
        zip: "10001".to_string(),
        county: "New York County".to_string(),
        social: "555-44-3333".to_string(),
        phone: "555-555-5555".to_string(),
        pounds: 165,
        feet: 5,
        inches: 6,
        birth_city: "Trenton".to_string(),
        birth_state: "NJ".to_string(),
        sex: "Male".to_string(),
        country_code: None,
    }
}
