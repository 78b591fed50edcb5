//! SoQL `$where` expressions built from typed criteria.

use std::fmt::{Display, Formatter};

use time::{Date, PrimitiveDateTime, macros::format_description};

use crate::{
	criteria::{AnyCriteria, Criterion, DatasetCriteria, DateCriterion, Field, FieldValue, Scalar},
	dataset::{DOCUMENT_ID_FIELD, Dataset, DocumentId},
};

pub type Result<T, E = FilterError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
	#[error(
		"{field} must be a date (YYYY-MM-DD) or timestamp (YYYY-MM-DDTHH:MM:SS), got '{value}'."
	)]
	InvalidDate { field: String, value: String },
	#[error("{field} must not contain the wildcard characters '%' or '_'.")]
	Wildcard { field: String },
	#[error("{field} list must contain at least one value.")]
	EmptyList { field: String },
	#[error("{field} range must have a start or an end.")]
	EmptyRange { field: String },
}

/// Conjunction of SoQL clauses. An empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoqlFilter {
	clauses: Vec<String>,
}
impl SoqlFilter {
	pub fn is_empty(&self) -> bool {
		self.clauses.is_empty()
	}

	pub fn clauses(&self) -> &[String] {
		&self.clauses
	}

	pub fn and(mut self, clause: impl Into<String>) -> Self {
		self.clauses.push(clause.into());

		self
	}

	/// The `$where` value, or `None` when nothing constrains the query.
	pub fn expression(&self) -> Option<String> {
		if self.clauses.is_empty() { None } else { Some(self.clauses.join(" AND ")) }
	}
}

impl Display for SoqlFilter {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.clauses.join(" AND "))
	}
}

/// A filter bound to the dataset whose columns it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFilter {
	pub dataset: Dataset,
	pub filter: SoqlFilter,
}
impl DatasetFilter {
	pub fn build<C>(criteria: &C) -> Result<Self>
	where
		C: DatasetCriteria,
	{
		Ok(Self { dataset: C::DATASET, filter: build_filter(criteria)? })
	}

	pub fn from_any(criteria: &AnyCriteria) -> Result<Self> {
		Ok(Self { dataset: criteria.dataset(), filter: build_fields(&criteria.fields())? })
	}
}

pub fn build_filter<C>(criteria: &C) -> Result<SoqlFilter>
where
	C: DatasetCriteria,
{
	build_fields(&criteria.fields())
}

pub fn build_fields(fields: &[Field<'_>]) -> Result<SoqlFilter> {
	let mut filter = SoqlFilter::default();

	for field in fields {
		let clause = match field.value {
			FieldValue::Exact(criterion) => exact_clause(field.name, criterion)?,
			FieldValue::Contains(value) => contains_clause(field.name, value)?,
			FieldValue::Date(criterion) => date_clause(field.name, criterion)?,
		};

		filter = filter.and(clause);
	}

	Ok(filter)
}

/// Doubles single quotes so a value cannot terminate its literal.
pub fn escape(value: &str) -> String {
	value.replace('\'', "''")
}

pub fn quote(value: &str) -> String {
	format!("'{}'", escape(value))
}

pub fn document_ids_in(ids: &[DocumentId]) -> String {
	let quoted = ids.iter().map(|id| quote(id)).collect::<Vec<_>>().join(", ");

	format!("{DOCUMENT_ID_FIELD} in ({quoted})")
}

pub fn document_id_prefix(prefix: &str) -> String {
	format!("starts_with({DOCUMENT_ID_FIELD}, {})", quote(prefix))
}

fn literal(value: &Scalar) -> String {
	match value {
		Scalar::Text(text) => quote(text),
		Scalar::Number(number) => number.to_string(),
	}
}

fn exact_clause(name: &str, criterion: &Criterion) -> Result<String> {
	match criterion {
		Criterion::One(value) => Ok(format!("{name} = {}", literal(value))),
		Criterion::Many(values) => {
			if values.is_empty() {
				return Err(FilterError::EmptyList { field: name.to_string() });
			}

			let list = values.iter().map(literal).collect::<Vec<_>>().join(", ");

			Ok(format!("{name} in ({list})"))
		},
	}
}

/// SoQL `like` has no escape clause, so literal wildcards cannot be matched and are refused.
fn contains_clause(name: &str, value: &str) -> Result<String> {
	if value.contains(['%', '_']) {
		return Err(FilterError::Wildcard { field: name.to_string() });
	}

	Ok(format!("{name} like '%{}%'", escape(value)))
}

fn date_clause(name: &str, criterion: &DateCriterion) -> Result<String> {
	let (start, end) = match criterion {
		DateCriterion::On(value) => {
			let on = floating_timestamp(name, value, Bound::Start)?;

			return Ok(format!("{name} = {}", quote(&on)));
		},
		DateCriterion::Pair([start, end]) => (Some(start), Some(end)),
		DateCriterion::Range { start, end } => (start.as_ref(), end.as_ref()),
	};
	let start = start.map(|value| floating_timestamp(name, value, Bound::Start)).transpose()?;
	let end = end.map(|value| floating_timestamp(name, value, Bound::End)).transpose()?;

	match (start, end) {
		(Some(start), Some(end)) =>
			Ok(format!("{name} between {} and {}", quote(&start), quote(&end))),
		(Some(start), None) => Ok(format!("{name} >= {}", quote(&start))),
		(None, Some(end)) => Ok(format!("{name} <= {}", quote(&end))),
		(None, None) => Err(FilterError::EmptyRange { field: name.to_string() }),
	}
}

#[derive(Clone, Copy)]
enum Bound {
	Start,
	End,
}

/// Normalizes a day or timestamp to the Socrata floating timestamp form. A bare day widens to
/// its first or last millisecond depending on which end of a range it bounds.
fn floating_timestamp(field: &str, value: &str, bound: Bound) -> Result<String> {
	let value = value.trim();

	if let Ok(date) = Date::parse(value, format_description!("[year]-[month]-[day]")) {
		let time = match bound {
			Bound::Start => "00:00:00.000",
			Bound::End => "23:59:59.999",
		};

		return Ok(format!("{}T{time}", day(date)));
	}

	let parsed = PrimitiveDateTime::parse(
		value,
		format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
	)
	.or_else(|_| {
		PrimitiveDateTime::parse(
			value,
			format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
		)
	})
	.map_err(|_| FilterError::InvalidDate { field: field.to_string(), value: value.to_string() })?;

	Ok(format!(
		"{}T{:02}:{:02}:{:02}.{:03}",
		day(parsed.date()),
		parsed.hour(),
		parsed.minute(),
		parsed.second(),
		parsed.millisecond()
	))
}

fn day(date: Date) -> String {
	format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}
