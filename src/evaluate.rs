//! Operator-driven comparison of a field value against an expectation.
//!
//! [`evaluate`] maps an operator name, the actual value, and the expectation onto a
//! [`Verdict`]. Both sides are JSON values; the engine coerces them as follows:
//!
//! - Numbers and numeric-looking strings compare numerically. Integers compare exactly (no
//!   float rounding), so 19-digit identifiers decoded as strings still compare correctly.
//! - Everything else compares by its text rendering (`null` renders as the empty string).
//! - `be greater than` / `be less than` refuse non-numeric operands with
//!   [`EvaluationError::InvalidOperand`] instead of silently failing.

// std
use std::cmp::Ordering;
// crates.io
use regex::RegexBuilder;
// self
use crate::_prelude::*;

/// Operator names in the order they are presented to users.
pub const OPERATORS: &[&str] = &[
	"be",
	"not be",
	"contain",
	"not contain",
	"be greater than",
	"be less than",
	"be one of",
	"not be one of",
	"be set",
	"not be set",
	"match",
	"not match",
];

/// Evaluation failures that callers report differently from a plain mismatch.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum EvaluationError {
	/// Operator name is not one of [`OPERATORS`].
	#[error("Unknown operator `{operator}`.")]
	UnknownOperator {
		/// Operator as supplied by the caller.
		operator: String,
		/// Valid operator names.
		valid: &'static [&'static str],
	},
	/// Operand cannot be used with the operator (non-numeric comparison, invalid pattern).
	#[error("{message}")]
	InvalidOperand {
		/// Field whose check failed.
		field: String,
		/// User-facing explanation naming the field.
		message: String,
	},
	/// Operator needs an expectation but none was supplied.
	#[error("The operator '{operator}' requires an expected value.")]
	MissingExpectation {
		/// Operator lacking an expectation.
		operator: Operator,
	},
}

/// Pass/fail outcome of one operator evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Verdict {
	/// Whether the field satisfied the operator.
	pub valid: bool,
	/// Human-readable explanation.
	pub message: String,
}

/// Comparison rules understood by the evaluator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Operator {
	/// `be`: equality after numeric coercion.
	Be,
	/// `not be`.
	NotBe,
	/// `contain`: substring or array membership.
	Contain,
	/// `not contain`.
	NotContain,
	/// `be greater than`: numeric only.
	BeGreaterThan,
	/// `be less than`: numeric only.
	BeLessThan,
	/// `be one of`: comma-delimited list or JSON array.
	BeOneOf,
	/// `not be one of`.
	NotBeOneOf,
	/// `be set`: not null and not empty.
	BeSet,
	/// `not be set`.
	NotBeSet,
	/// `match`: regular expression.
	Match,
	/// `not match`.
	NotMatch,
}
impl Operator {
	/// Every operator, matching the order of [`OPERATORS`].
	pub const ALL: [Operator; 12] = [
		Operator::Be,
		Operator::NotBe,
		Operator::Contain,
		Operator::NotContain,
		Operator::BeGreaterThan,
		Operator::BeLessThan,
		Operator::BeOneOf,
		Operator::NotBeOneOf,
		Operator::BeSet,
		Operator::NotBeSet,
		Operator::Match,
		Operator::NotMatch,
	];

	/// Returns the operator's textual name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operator::Be => "be",
			Operator::NotBe => "not be",
			Operator::Contain => "contain",
			Operator::NotContain => "not contain",
			Operator::BeGreaterThan => "be greater than",
			Operator::BeLessThan => "be less than",
			Operator::BeOneOf => "be one of",
			Operator::NotBeOneOf => "not be one of",
			Operator::BeSet => "be set",
			Operator::NotBeSet => "not be set",
			Operator::Match => "match",
			Operator::NotMatch => "not match",
		}
	}

	/// Returns true unless the operator is `be set` / `not be set`.
	pub const fn requires_expectation(self) -> bool {
		!matches!(self, Operator::BeSet | Operator::NotBeSet)
	}

	/// Evaluates `actual` against `expected` for the field named `field`.
	///
	/// A `null` expectation counts as absent: every operator other than `be set` and
	/// `not be set` reports [`EvaluationError::MissingExpectation`] for it, including
	/// `be` with a `null` actual value. Scalars are strings, numbers, and booleans.
	pub fn evaluate(
		self,
		actual: &JsonValue,
		expected: Option<&JsonValue>,
		field: &str,
	) -> Result<Verdict, EvaluationError> {
		let expected = expected.filter(|value| !value.is_null());

		if !self.requires_expectation() {
			let set = is_set(actual);
			let (valid, message) = match (self, set) {
				(Operator::BeSet, true) | (Operator::NotBeSet, false) =>
					(true, format!("The {field} field was {}, as expected.", set_word(set))),
				(Operator::BeSet, false) =>
					(false, format!("Expected {field} field to be set, but it was not.")),
				_ => (
					false,
					format!(
						"Expected {field} field not to be set, but it was actually {}.",
						text(actual)
					),
				),
			};

			return Ok(Verdict { valid, message });
		}

		let expected = expected.ok_or(EvaluationError::MissingExpectation { operator: self })?;
		let valid = match self {
			Operator::Be => values_equal(actual, expected),
			Operator::NotBe => !values_equal(actual, expected),
			Operator::Contain => contains(actual, expected),
			Operator::NotContain => !contains(actual, expected),
			Operator::BeGreaterThan =>
				compare(self, actual, expected, field)? == Ordering::Greater,
			Operator::BeLessThan => compare(self, actual, expected, field)? == Ordering::Less,
			Operator::BeOneOf => one_of(actual, expected),
			Operator::NotBeOneOf => !one_of(actual, expected),
			Operator::Match => matches_pattern(actual, expected, field)?,
			Operator::NotMatch => !matches_pattern(actual, expected, field)?,
			Operator::BeSet => is_set(actual),
			Operator::NotBeSet => !is_set(actual),
		};
		let message = if valid {
			format!(
				"The {field} field was {}, as expected ({self} {}).",
				text(actual),
				text(expected)
			)
		} else {
			format!(
				"Expected {field} field to {self} {}, but it was actually {}.",
				text(expected),
				text(actual)
			)
		};

		Ok(Verdict { valid, message })
	}
}
impl FromStr for Operator {
	type Err = EvaluationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized = s.trim().to_lowercase();

		Operator::ALL.into_iter().find(|operator| operator.as_str() == normalized).ok_or_else(
			|| EvaluationError::UnknownOperator { operator: s.to_owned(), valid: OPERATORS },
		)
	}
}
impl TryFrom<String> for Operator {
	type Error = EvaluationError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}
impl From<Operator> for &'static str {
	fn from(operator: Operator) -> Self {
		operator.as_str()
	}
}
impl Display for Operator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Parses `operator` and evaluates `actual` against `expected` for `field`.
///
/// See [`Operator::evaluate`] for how a `null` expectation is treated.
pub fn evaluate(
	operator: &str,
	actual: &JsonValue,
	expected: Option<&JsonValue>,
	field: &str,
) -> Result<Verdict, EvaluationError> {
	operator.parse::<Operator>()?.evaluate(actual, expected, field)
}

#[derive(Clone, Copy, Debug)]
enum Numeric {
	Int(i128),
	Float(f64),
}
impl Numeric {
	fn as_f64(self) -> f64 {
		match self {
			Numeric::Int(value) => value as f64,
			Numeric::Float(value) => value,
		}
	}

	fn compare_to(self, other: Numeric) -> Option<Ordering> {
		match (self, other) {
			(Numeric::Int(a), Numeric::Int(b)) => Some(a.cmp(&b)),
			(a, b) => a.as_f64().partial_cmp(&b.as_f64()),
		}
	}
}

fn numeric(value: &JsonValue) -> Option<Numeric> {
	match value {
		JsonValue::Number(number) => number
			.as_i64()
			.map(|v| Numeric::Int(v.into()))
			.or_else(|| number.as_u64().map(|v| Numeric::Int(v.into())))
			.or_else(|| number.as_f64().map(Numeric::Float)),
		JsonValue::String(text) => parse_numeric(text),
		_ => None,
	}
}

fn parse_numeric(raw: &str) -> Option<Numeric> {
	let trimmed = raw.trim();

	if trimmed.is_empty() || !trimmed.bytes().any(|b| b.is_ascii_digit()) {
		return None;
	}
	if let Ok(value) = trimmed.parse::<i128>() {
		return Some(Numeric::Int(value));
	}

	trimmed.parse::<f64>().ok().filter(|value| value.is_finite()).map(Numeric::Float)
}

fn text(value: &JsonValue) -> String {
	match value {
		JsonValue::Null => String::new(),
		JsonValue::String(text) => text.clone(),
		other => other.to_string(),
	}
}

fn set_word(set: bool) -> &'static str {
	if set { "set" } else { "not set" }
}

fn is_set(value: &JsonValue) -> bool {
	match value {
		JsonValue::Null => false,
		JsonValue::String(text) => !text.is_empty(),
		JsonValue::Array(items) => !items.is_empty(),
		JsonValue::Object(fields) => !fields.is_empty(),
		_ => true,
	}
}

fn values_equal(actual: &JsonValue, expected: &JsonValue) -> bool {
	if let (Some(a), Some(b)) = (numeric(actual), numeric(expected)) {
		return a.compare_to(b) == Some(Ordering::Equal);
	}

	text(actual) == text(expected)
}

fn contains(actual: &JsonValue, expected: &JsonValue) -> bool {
	match actual {
		JsonValue::Array(items) => items.iter().any(|item| values_equal(item, expected)),
		JsonValue::Object(fields) => fields.contains_key(&text(expected)),
		other => text(other).contains(&text(expected)),
	}
}

fn one_of(actual: &JsonValue, expected: &JsonValue) -> bool {
	match expected {
		JsonValue::Array(items) => items.iter().any(|item| values_equal(actual, item)),
		other => text(other)
			.split(',')
			.any(|candidate| values_equal(actual, &JsonValue::String(candidate.trim().to_owned()))),
	}
}

fn compare(
	operator: Operator,
	actual: &JsonValue,
	expected: &JsonValue,
	field: &str,
) -> Result<Ordering, EvaluationError> {
	numeric(actual)
		.zip(numeric(expected))
		.and_then(|(a, b)| a.compare_to(b))
		.ok_or_else(|| EvaluationError::InvalidOperand {
			field: field.to_owned(),
			message: format!(
				"Cannot check whether the {field} field ({}) is {} {}: both values must be numeric.",
				text(actual),
				operator.as_str().trim_start_matches("be "),
				text(expected)
			),
		})
}

fn matches_pattern(
	actual: &JsonValue,
	expected: &JsonValue,
	field: &str,
) -> Result<bool, EvaluationError> {
	let raw = text(expected);
	let (pattern, flags) = split_pattern_literal(&raw);
	let regex = RegexBuilder::new(pattern)
		.case_insensitive(flags.contains('i'))
		.multi_line(flags.contains('m'))
		.dot_matches_new_line(flags.contains('s'))
		.build()
		.map_err(|_| EvaluationError::InvalidOperand {
			field: field.to_owned(),
			message: format!(
				"The expectation `{raw}` for the {field} field is not a valid regular expression."
			),
		})?;

	Ok(regex.is_match(&text(actual)))
}

/// Splits a `/pattern/flags` literal; anything else is a bare pattern without flags.
fn split_pattern_literal(raw: &str) -> (&str, &str) {
	let Some(body) = raw.strip_prefix('/') else {
		return (raw, "");
	};

	match body.rfind('/') {
		Some(end) if body[end + 1..].chars().all(|flag| "gimsu".contains(flag)) =>
			(&body[..end], &body[end + 1..]),
		_ => (raw, ""),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn check(operator: &str, actual: JsonValue, expected: JsonValue) -> bool {
		evaluate(operator, &actual, Some(&expected), "field")
			.expect("Evaluation should not error.")
			.valid
	}

	#[test]
	fn be_holds_for_identical_scalars() {
		for value in [
			JsonValue::from("x"),
			JsonValue::from(12),
			JsonValue::from(-3.5),
			JsonValue::from(true),
			JsonValue::from("1234567890123456789"),
		] {
			assert!(check("be", value.clone(), value.clone()), "`be` should hold for {value}");
			assert!(!check("not be", value.clone(), value), "`not be` should fail for equal values");
		}
	}

	#[test]
	fn be_coerces_numeric_strings() {
		assert!(check("be", JsonValue::from("42"), JsonValue::from(42)));
		assert!(check("be", JsonValue::from("1.50"), JsonValue::from("1.5")));
		assert!(!check("be", JsonValue::from("Abc"), JsonValue::from("abc")));
		assert!(check("not be", JsonValue::from("a"), JsonValue::from("b")));
	}

	#[test]
	fn large_identifiers_compare_exactly() {
		assert!(!check(
			"be",
			JsonValue::from("1234567890123456789"),
			JsonValue::from("1234567890123456788")
		));
	}

	#[test]
	fn contain_checks_substrings_and_members() {
		assert!(check("contain", JsonValue::from("jane@example.com"), JsonValue::from("example")));
		assert!(check("contain", serde_json::json!(["a", "b"]), JsonValue::from("b")));
		assert!(check("not contain", serde_json::json!([1, 2]), JsonValue::from("3")));
	}

	#[test]
	fn ordering_operators_require_numbers() {
		assert!(check("be greater than", JsonValue::from("10"), JsonValue::from(5)));
		assert!(check("be less than", JsonValue::from(-1), JsonValue::from("0.5")));
		assert!(!check("be less than", JsonValue::from(5), JsonValue::from(5)));

		let err = evaluate("be greater than", &JsonValue::from("abc"), Some(&JsonValue::from(5)), "age")
			.expect_err("Non-numeric operands should be rejected.");

		match err {
			EvaluationError::InvalidOperand { field, message } => {
				assert_eq!(field, "age");
				assert!(message.contains("age"));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn one_of_splits_delimited_lists() {
		assert!(check("be one of", JsonValue::from("b"), JsonValue::from("a,b,c")));
		assert!(check("be one of", JsonValue::from("b"), JsonValue::from("a, b , c")));
		assert!(check("be one of", JsonValue::from(2), serde_json::json!([1, 2])));

		let verdict = evaluate("be one of", &JsonValue::from("d"), Some(&JsonValue::from("a,b,c")), "tier")
			.expect("Evaluation should not error.");

		assert!(!verdict.valid);
		assert!(verdict.message.contains("tier"));
		assert!(verdict.message.contains("a,b,c"));
		assert!(check("not be one of", JsonValue::from("d"), JsonValue::from("a,b,c")));
	}

	#[test]
	fn set_operators_ignore_expectation() {
		let unset = evaluate("be set", &JsonValue::Null, None, "f").expect("Evaluation should not error.");

		assert!(!unset.valid);

		let set = evaluate("be set", &JsonValue::from("x"), None, "f").expect("Evaluation should not error.");

		assert!(set.valid);
		assert!(evaluate("not be set", &JsonValue::from(""), None, "f")
			.expect("Evaluation should not error.")
			.valid);
		assert!(!evaluate("not be set", &JsonValue::from(0), None, "f")
			.expect("Evaluation should not error.")
			.valid);
	}

	#[test]
	fn match_supports_bare_and_literal_patterns() {
		assert!(check("match", JsonValue::from("jane@example.com"), JsonValue::from("^jane@")));
		assert!(check("match", JsonValue::from("JANE"), JsonValue::from("/^jane$/i")));
		assert!(check("not match", JsonValue::from("jane"), JsonValue::from("^bob")));

		let err = evaluate("match", &JsonValue::from("x"), Some(&JsonValue::from("(")), "email")
			.expect_err("Invalid patterns should be rejected.");

		assert!(matches!(err, EvaluationError::InvalidOperand { .. }));
	}

	#[test]
	fn unknown_operators_name_the_valid_set() {
		let err = evaluate("unknown", &JsonValue::from(1), Some(&JsonValue::from(1)), "f")
			.expect_err("Unknown operators should be rejected.");

		match err {
			EvaluationError::UnknownOperator { operator, valid } => {
				assert_eq!(operator, "unknown");
				assert_eq!(valid, OPERATORS);
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn missing_expectation_is_reported() {
		let err = evaluate("contain", &JsonValue::from("x"), Some(&JsonValue::Null), "f")
			.expect_err("Missing expectations should be rejected.");

		assert_eq!(err, EvaluationError::MissingExpectation { operator: Operator::Contain });

		for operator in ["be", "not be"] {
			let err = evaluate(operator, &JsonValue::Null, Some(&JsonValue::Null), "f")
				.expect_err("A null expectation counts as absent.");

			assert!(matches!(err, EvaluationError::MissingExpectation { .. }));
		}
	}

	#[test]
	fn operator_names_round_trip() {
		for (operator, name) in Operator::ALL.into_iter().zip(OPERATORS) {
			assert_eq!(operator.as_str(), *name);
			assert_eq!(name.parse::<Operator>(), Ok(operator));
		}

		assert_eq!(" Be Set ".parse::<Operator>(), Ok(Operator::BeSet));
	}
}
