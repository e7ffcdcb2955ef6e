//! Step contract shared with the host orchestration runtime, plus the registrant steps.
//!
//! A host discovers steps through their [`StepDefinition`], sends a [`StepRequest`] (a JSON
//! object of inputs), and receives a [`StepResponse`] carrying the outcome, a printf-style
//! message, and key-value [`StepRecord`]s. Steps never return errors to the host: every
//! failure is folded into an [`StepOutcome::Error`] response.

pub mod create;
pub mod delete;
pub mod field_equals;

pub use create::*;
pub use delete::*;
pub use field_equals::*;

// self
use crate::{
	_prelude::*,
	client::RegistrantApi,
	error::ApiError,
	obs::{self, StepSpan},
};

/// Input key carrying the step's position in the host scenario.
pub const STEP_ORDER_FIELD: &str = "__stepOrder";

/// Empty argument list for messages without placeholders.
pub const NO_ARGS: [&str; 0] = [];

/// Boxed future returned by [`Step::execute`].
pub type StepFuture<'a> = Pin<Box<dyn Future<Output = StepResponse> + 'a + Send>>;

/// A unit of automation the host can discover and run.
pub trait Step
where
	Self: Send + Sync,
{
	/// Static description of the step.
	fn definition(&self) -> &StepDefinition;

	/// Runs the step; failures are reported through the response outcome.
	fn execute<'a>(&'a self, request: &'a StepRequest) -> StepFuture<'a>;
}

/// Returns every registrant step bound to `api`.
pub fn steps(api: Arc<dyn RegistrantApi>) -> Vec<Box<dyn Step>> {
	vec![
		Box::new(CreateRegistrantStep::new(api.clone())),
		Box::new(DeleteRegistrantStep::new(api.clone())),
		Box::new(RegistrantFieldEqualsStep::new(api)),
	]
}

/// Returns the step whose id is `step_id`.
pub fn find_step(api: Arc<dyn RegistrantApi>, step_id: &str) -> Option<Box<dyn Step>> {
	steps(api).into_iter().find(|step| step.definition().step_id == step_id)
}

/// Whether a step changes state or only inspects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
	/// Mutates provider state.
	Action,
	/// Asserts on provider state.
	Validation,
}

/// Value type of a step input or record field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
	/// Text.
	String,
	/// Object of field names to values.
	Map,
	/// Any JSON scalar.
	AnyScalar,
	/// Number.
	Numeric,
}

/// Whether the host must supply an input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Optionality {
	/// Input is mandatory.
	#[default]
	Required,
	/// Input may be omitted.
	Optional,
}

/// Input or record field advertised by a step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldDefinition {
	/// Field key.
	pub key: &'static str,
	/// Value type.
	#[serde(rename = "type")]
	pub field_type: FieldType,
	/// Whether the field is mandatory.
	pub optionality: Optionality,
	/// Human-readable description.
	pub description: &'static str,
}
impl FieldDefinition {
	/// Declares a required field.
	pub const fn required(
		key: &'static str,
		field_type: FieldType,
		description: &'static str,
	) -> Self {
		Self { key, field_type, optionality: Optionality::Required, description }
	}

	/// Declares an optional field.
	pub const fn optional(
		key: &'static str,
		field_type: FieldType,
		description: &'static str,
	) -> Self {
		Self { key, field_type, optionality: Optionality::Optional, description }
	}
}

/// Shape of a key-value record a step may emit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecordDefinition {
	/// Record id.
	pub id: &'static str,
	/// Fields always present in the record.
	pub fields: Vec<FieldDefinition>,
	/// True when the record may carry fields beyond `fields`.
	pub dynamic_fields: bool,
}

/// Static description of a step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepDefinition {
	/// Stable identifier used by the host.
	pub step_id: &'static str,
	/// Display name.
	pub name: &'static str,
	/// Natural-language expression (a regular expression) the host matches scenarios against.
	pub expression: &'static str,
	/// Action or validation.
	pub kind: StepKind,
	/// Inputs the step reads.
	pub expected_fields: Vec<FieldDefinition>,
	/// Records the step emits.
	pub expected_records: Vec<RecordDefinition>,
}

/// Input that could not be read from a [`StepRequest`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum StepInputError {
	/// Required input is absent or `null`.
	#[error("Missing required field: {field}.")]
	Missing {
		/// Input key.
		field: String,
	},
	/// Input is present but has the wrong shape.
	#[error("Field {field} must be {expected}.")]
	Invalid {
		/// Input key.
		field: String,
		/// Expected shape.
		expected: &'static str,
	},
}

/// Inputs sent by the host for one step execution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepRequest(JsonMap<String, JsonValue>);
impl StepRequest {
	/// Wraps the host's input object.
	pub fn new(data: JsonMap<String, JsonValue>) -> Self {
		Self(data)
	}

	/// Adds an input, returning the updated request.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
		self.0.insert(key.into(), value.into());

		self
	}

	/// Returns the input stored under `key`; `null` counts as absent.
	pub fn value(&self, key: &str) -> Option<&JsonValue> {
		self.0.get(key).filter(|value| !value.is_null())
	}

	/// Reads a required scalar input as text; numbers and booleans are rendered.
	pub fn string(&self, key: &str) -> Result<String, StepInputError> {
		self.optional_string(key)?.ok_or_else(|| StepInputError::Missing { field: key.into() })
	}

	/// Reads an optional scalar input as text.
	pub fn optional_string(&self, key: &str) -> Result<Option<String>, StepInputError> {
		match self.value(key) {
			None => Ok(None),
			Some(JsonValue::String(text)) => Ok(Some(text.clone())),
			Some(value @ (JsonValue::Number(_) | JsonValue::Bool(_))) =>
				Ok(Some(value.to_string())),
			Some(_) => Err(StepInputError::Invalid { field: key.into(), expected: "a scalar" }),
		}
	}

	/// Reads a required object input.
	pub fn map(&self, key: &str) -> Result<JsonMap<String, JsonValue>, StepInputError> {
		match self.value(key) {
			None => Err(StepInputError::Missing { field: key.into() }),
			Some(JsonValue::Object(map)) => Ok(map.clone()),
			Some(_) => Err(StepInputError::Invalid { field: key.into(), expected: "a map" }),
		}
	}

	/// Position of the step in the host scenario (`__stepOrder`), defaulting to 1.
	pub fn step_order(&self) -> u64 {
		match self.value(STEP_ORDER_FIELD) {
			Some(JsonValue::Number(number)) => number.as_u64(),
			Some(JsonValue::String(text)) => text.trim().parse().ok(),
			_ => None,
		}
		.unwrap_or(1)
	}
}
impl From<JsonMap<String, JsonValue>> for StepRequest {
	fn from(data: JsonMap<String, JsonValue>) -> Self {
		Self(data)
	}
}

/// Result reported to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
	/// Step succeeded.
	Passed,
	/// Assertion did not hold.
	Failed,
	/// Step could not run to completion.
	Error,
}
impl StepOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StepOutcome::Passed => "passed",
			StepOutcome::Failed => "failed",
			StepOutcome::Error => "error",
		}
	}
}
impl Display for StepOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Key-value record attached to a response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
	/// Record id, e.g. `registrant` or `registrant.2`.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Record fields.
	pub fields: JsonMap<String, JsonValue>,
}
impl StepRecord {
	/// Builds a key-value record.
	pub fn key_value(
		id: impl Into<String>,
		name: impl Into<String>,
		fields: JsonMap<String, JsonValue>,
	) -> Self {
		Self { id: id.into(), name: name.into(), fields }
	}
}

/// Response returned to the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepResponse {
	/// Outcome.
	pub outcome: StepOutcome,
	/// Message with `%s` placeholders.
	pub message_format: String,
	/// Values substituted into `message_format`, in order.
	pub message_args: Vec<String>,
	/// Records produced by the step.
	pub records: Vec<StepRecord>,
}
impl StepResponse {
	/// Builds a response with no records.
	pub fn new<I, S>(
		outcome: StepOutcome,
		message_format: impl Into<String>,
		message_args: I,
	) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			outcome,
			message_format: message_format.into(),
			message_args: message_args.into_iter().map(Into::into).collect(),
			records: Vec::new(),
		}
	}

	/// Passing response.
	pub fn pass<I, S>(message_format: impl Into<String>, message_args: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::new(StepOutcome::Passed, message_format, message_args)
	}

	/// Failing response.
	pub fn fail<I, S>(message_format: impl Into<String>, message_args: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::new(StepOutcome::Failed, message_format, message_args)
	}

	/// Error response.
	pub fn error<I, S>(message_format: impl Into<String>, message_args: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::new(StepOutcome::Error, message_format, message_args)
	}

	/// Attaches records, returning the updated response.
	pub fn with_records(mut self, records: impl IntoIterator<Item = StepRecord>) -> Self {
		self.records.extend(records);

		self
	}

	/// Renders the message: each `%s` takes the next argument, surplus arguments are appended
	/// separated by spaces, and unmatched placeholders stay literal.
	pub fn message(&self) -> String {
		let mut args = self.message_args.iter();
		let mut rendered = String::with_capacity(self.message_format.len());
		let mut pieces = self.message_format.split("%s").peekable();

		while let Some(piece) = pieces.next() {
			rendered.push_str(piece);

			if pieces.peek().is_some() {
				match args.next() {
					Some(arg) => rendered.push_str(arg),
					None => rendered.push_str("%s"),
				}
			}
		}
		for arg in args {
			rendered.push(' ');
			rendered.push_str(arg);
		}

		rendered
	}

	/// Returns the record with `id`, if any.
	pub fn record(&self, id: &str) -> Option<&StepRecord> {
		self.records.iter().find(|record| record.id == id)
	}
}
impl From<StepInputError> for StepResponse {
	fn from(err: StepInputError) -> Self {
		StepResponse::error("%s", [err.to_string()])
	}
}

/// Runs a step body inside its span and records the reported outcome.
pub(crate) async fn observe<F>(step_id: &'static str, body: F) -> StepResponse
where
	F: Future<Output = StepResponse>,
{
	let span = StepSpan::new(step_id);
	let response = span.instrument(body).await;

	span.finished(response.outcome.as_str());
	obs::record_step_outcome(step_id, response.outcome);

	response
}

/// Returns the provider error when `err` is a `404 Not Found` response.
pub(crate) fn not_found(err: &Error) -> Option<&ApiError> {
	match err {
		Error::Api(api) if api.is_not_found() => Some(api),
		_ => None,
	}
}

/// Serializes the identifying keys of a request for error messages.
pub(crate) fn keys_json(keys: &[(&str, &str)]) -> String {
	let object = keys
		.iter()
		.map(|(key, value)| ((*key).to_owned(), JsonValue::String((*value).to_owned())))
		.collect::<JsonMap<_, _>>();

	JsonValue::Object(object).to_string()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn message_substitutes_placeholders_in_order() {
		let response = StepResponse::error(
			"Registrant %s is already registered in webinar with id %s",
			["ada@example.com", "W1"],
		);

		assert_eq!(
			response.message(),
			"Registrant ada@example.com is already registered in webinar with id W1"
		);
		assert_eq!(StepResponse::pass("%s and %s", ["one"]).message(), "one and %s");
		assert_eq!(StepResponse::fail("done", ["extra"]).message(), "done extra");
	}

	#[test]
	fn request_coerces_scalars_to_text() {
		let request = StepRequest::default()
			.with("webinarKey", 1_234_567_890_123_456_789_u64)
			.with("organizerKey", "O1")
			.with("flag", true)
			.with("empty", JsonValue::Null)
			.with("registrant", serde_json::json!({ "email": "a@b.co" }));

		assert_eq!(request.string("webinarKey"), Ok("1234567890123456789".into()));
		assert_eq!(request.string("organizerKey"), Ok("O1".into()));
		assert_eq!(request.string("flag"), Ok("true".into()));
		assert_eq!(request.string("empty"), Err(StepInputError::Missing { field: "empty".into() }));
		assert_eq!(
			request.string("registrant"),
			Err(StepInputError::Invalid { field: "registrant".into(), expected: "a scalar" })
		);
		assert!(request.map("registrant").is_ok());
		assert_eq!(
			request.map("organizerKey"),
			Err(StepInputError::Invalid { field: "organizerKey".into(), expected: "a map" })
		);
	}

	#[test]
	fn step_order_defaults_to_one() {
		assert_eq!(StepRequest::default().step_order(), 1);
		assert_eq!(StepRequest::default().with(STEP_ORDER_FIELD, 3).step_order(), 3);
		assert_eq!(StepRequest::default().with(STEP_ORDER_FIELD, "4").step_order(), 4);
	}

	#[test]
	fn missing_input_becomes_error_response() {
		let response = StepResponse::from(StepInputError::Missing { field: "webinarKey".into() });

		assert_eq!(response.outcome, StepOutcome::Error);
		assert_eq!(response.message(), "Missing required field: webinarKey.");
	}

	#[test]
	fn keys_json_keeps_values_as_strings() {
		let rendered = keys_json(&[("webinarKey", "W1"), ("organizerKey", "O1")]);
		let value: JsonValue = serde_json::from_str(&rendered).expect("Keys should be JSON.");

		assert_eq!(value, serde_json::json!({ "webinarKey": "W1", "organizerKey": "O1" }));
	}
}
