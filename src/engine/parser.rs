//! Record parsing: one raw line into the fixed customer field layout.

use crate::Customer;
use crate::utils::config::{MAX_FIELDS, MIN_FIELDS};

/// Result of splitting one line. Malformed lines keep whatever fields they had.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedLine {
    Ok(Customer),
    Malformed(Customer),
}

/// Split `line` on `,` into first name, last name, city, state, zip, phone, email, and optional IP.
///
/// Trailing empty fields are dropped before counting, so `...,email,,` is a 7-field record and
/// `...,email,ip,` an 8-field one. Exactly 7 fields → IP absent. Exactly 8 → IP is the 8th field.
/// Any other field count is [`ParsedLine::Malformed`]; missing positions are empty strings.
pub fn parse_line(line: &str) -> ParsedLine {
    let mut fields: Vec<&str> = line.split(',').collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    let customer = customer_from_fields(&fields);
    if (MIN_FIELDS..=MAX_FIELDS).contains(&fields.len()) {
        ParsedLine::Ok(customer)
    } else {
        ParsedLine::Malformed(customer)
    }
}

fn customer_from_fields(fields: &[&str]) -> Customer {
    let at = |i: usize| fields.get(i).copied().unwrap_or("").to_string();
    let ip_address = match fields.len() {
        MAX_FIELDS => Some(fields[MAX_FIELDS - 1]),
        _ => None,
    };
    Customer {
        first_name: at(0),
        last_name: at(1),
        city: at(2),
        state: at(3),
        zip_code: at(4),
        phone: at(5),
        email: at(6),
        ip_address: ip_address.map(str::to_string),
    }
}
