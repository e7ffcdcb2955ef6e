//! Big-integer-safe decoding of raw registrant payloads.
//!
//! Provider identifiers are 18-19 digit integers that do not survive a round trip through
//! `f64`. Every bare numeric literal in the raw text is wrapped in quotes before structural
//! parsing, so identifiers (and every other number) surface as exact strings.

// self
use crate::{_prelude::*, error::DecodeError, registrant::Registrant};

/// Decodes a raw registrant payload into a [`Registrant`], preserving every numeric digit.
pub fn decode_registrant(raw: &str) -> Result<Registrant, DecodeError> {
	match decode_value(raw)? {
		JsonValue::Object(fields) => Ok(Registrant::from_fields(fields)),
		_ => Err(DecodeError::NotAnObject),
	}
}

/// Decodes arbitrary JSON text with every numeric literal turned into a string.
pub fn decode_value(raw: &str) -> Result<JsonValue, DecodeError> {
	let quoted = quote_numeric_literals(raw);
	let mut de = serde_json::Deserializer::from_str(&quoted);
	let value: JsonValue = serde_path_to_error::deserialize(&mut de).map_err(|err| {
		let path = err.path().to_string();

		DecodeError::Malformed { path, source: err.into_inner() }
	})?;

	de.end().map_err(|source| DecodeError::Malformed { path: ".".into(), source })?;

	Ok(value)
}

/// Wraps every numeric literal outside of string literals in double quotes.
///
/// The scan only tracks string boundaries and escapes; anything else is copied verbatim, so
/// malformed input stays malformed and is reported by the structural parser.
pub fn quote_numeric_literals(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len() + 16);
	let mut chars = raw.chars().peekable();
	let mut in_string = false;
	let mut escaped = false;

	while let Some(c) = chars.next() {
		if in_string {
			out.push(c);

			if escaped {
				escaped = false;
			} else if c == '\\' {
				escaped = true;
			} else if c == '"' {
				in_string = false;
			}

			continue;
		}

		match c {
			'"' => {
				in_string = true;

				out.push(c);
			},
			'-' | '0'..='9' => {
				out.push('"');
				out.push(c);

				while let Some(&next) = chars.peek() {
					if next.is_ascii_digit() || matches!(next, '.' | 'e' | 'E' | '+' | '-') {
						out.push(next);
						chars.next();
					} else {
						break;
					}
				}

				out.push('"');
			},
			_ => out.push(c),
		}
	}

	out
}
