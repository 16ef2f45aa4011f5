//! Chunk processing: parse and validate an ordered batch of lines into one [`PartitionedResult`].

use crate::engine::parser::{ParsedLine, parse_line};
use crate::engine::validator::classify;
use crate::{InvalidCustomer, PartitionedResult, ValidCustomer};

/// Parse, validate and partition `lines` in order. Touches no state outside the returned result.
pub fn process_chunk(lines: &[String]) -> PartitionedResult {
    let mut result = PartitionedResult::default();
    for line in lines {
        push_line(&mut result, line);
    }
    result
}

fn push_line(result: &mut PartitionedResult, line: &str) {
    let customer = match parse_line(line) {
        ParsedLine::Ok(c) => c,
        ParsedLine::Malformed(c) => {
            result.invalid.push(InvalidCustomer::malformed(c, line));
            return;
        }
    };
    match classify(&customer.email, &customer.phone) {
        None => {
            result.phones.insert(customer.phone.clone());
            result.emails.insert(customer.email.clone());
            result.valid.push(ValidCustomer(customer));
        }
        Some(reason) => result.invalid.push(InvalidCustomer::rejected(customer, reason)),
    }
}
