//! Typed search criteria, one struct per dataset.
//!
//! Each struct carries only the columns the filter builder is allowed to translate. Unknown
//! JSON keys are ignored on deserialization so callers and the remote schema may drift apart
//! without breaking requests.

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
	Text(String),
	Number(serde_json::Number),
}
impl Scalar {
	pub fn is_blank(&self) -> bool {
		matches!(self, Self::Text(value) if value.trim().is_empty())
	}
}

impl From<&str> for Scalar {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for Scalar {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<i64> for Scalar {
	fn from(value: i64) -> Self {
		Self::Number(value.into())
	}
}

/// A single value matched exactly, or a list matched as "one of".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Criterion {
	One(Scalar),
	Many(Vec<Scalar>),
}
impl Criterion {
	pub fn one(value: impl Into<Scalar>) -> Self {
		Self::One(value.into())
	}

	pub fn many<I, T>(values: I) -> Self
	where
		I: IntoIterator<Item = T>,
		T: Into<Scalar>,
	{
		Self::Many(values.into_iter().map(Into::into).collect())
	}

	pub fn values(&self) -> Vec<&Scalar> {
		match self {
			Self::One(value) => vec![value],
			Self::Many(values) => values.iter().collect(),
		}
	}

	/// True when there is nothing usable to match on.
	pub fn is_blank(&self) -> bool {
		self.values().iter().all(|value| value.is_blank())
	}
}

/// Date column criterion. A bare string is an exact day or timestamp; a two element array or a
/// `{start, end}` object is an inclusive range, either end of which may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateCriterion {
	On(String),
	Pair([String; 2]),
	Range { start: Option<String>, end: Option<String> },
}

#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
	Exact(&'a Criterion),
	Contains(&'a str),
	Date(&'a DateCriterion),
}

#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
	pub name: &'static str,
	pub value: FieldValue<'a>,
}

pub trait DatasetCriteria {
	const DATASET: Dataset;

	/// Populated allow-listed fields, in declaration order.
	fn fields(&self) -> Vec<Field<'_>>;

	fn is_empty(&self) -> bool {
		self.fields().is_empty()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MasterCriteria {
	pub document_id: Option<Criterion>,
	pub record_type: Option<Criterion>,
	pub crfn: Option<Criterion>,
	pub recorded_borough: Option<Criterion>,
	pub doc_type: Option<Criterion>,
	pub document_date: Option<DateCriterion>,
	pub document_amt: Option<Criterion>,
	pub recorded_datetime: Option<DateCriterion>,
	pub modified_date: Option<DateCriterion>,
	pub reel_yr: Option<Criterion>,
	pub reel_nbr: Option<Criterion>,
	pub reel_pg: Option<Criterion>,
	pub percent_trans: Option<Criterion>,
}
impl DatasetCriteria for MasterCriteria {
	const DATASET: Dataset = Dataset::Master;

	fn fields(&self) -> Vec<Field<'_>> {
		FieldList::default()
			.exact("document_id", &self.document_id)
			.exact("record_type", &self.record_type)
			.exact("crfn", &self.crfn)
			.exact("recorded_borough", &self.recorded_borough)
			.exact("doc_type", &self.doc_type)
			.date("document_date", &self.document_date)
			.exact("document_amt", &self.document_amt)
			.date("recorded_datetime", &self.recorded_datetime)
			.date("modified_date", &self.modified_date)
			.exact("reel_yr", &self.reel_yr)
			.exact("reel_nbr", &self.reel_nbr)
			.exact("reel_pg", &self.reel_pg)
			.exact("percent_trans", &self.percent_trans)
			.finish()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartiesCriteria {
	pub document_id: Option<Criterion>,
	pub record_type: Option<Criterion>,
	pub party_type: Option<Criterion>,
	pub name: Option<String>,
	pub address_1: Option<String>,
	pub address_2: Option<Criterion>,
	pub country: Option<Criterion>,
	pub city: Option<Criterion>,
	pub state: Option<Criterion>,
	pub zip: Option<Criterion>,
}
impl DatasetCriteria for PartiesCriteria {
	const DATASET: Dataset = Dataset::Parties;

	fn fields(&self) -> Vec<Field<'_>> {
		FieldList::default()
			.exact("document_id", &self.document_id)
			.exact("record_type", &self.record_type)
			.exact("party_type", &self.party_type)
			.contains("name", &self.name)
			.contains("address_1", &self.address_1)
			.exact("address_2", &self.address_2)
			.exact("country", &self.country)
			.exact("city", &self.city)
			.exact("state", &self.state)
			.exact("zip", &self.zip)
			.finish()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegalsCriteria {
	pub document_id: Option<Criterion>,
	pub record_type: Option<Criterion>,
	pub borough: Option<Criterion>,
	pub block: Option<Criterion>,
	pub lot: Option<Criterion>,
	pub easement: Option<Criterion>,
	pub partial_lot: Option<Criterion>,
	pub air_rights: Option<Criterion>,
	pub subterranean_rights: Option<Criterion>,
	pub property_type: Option<Criterion>,
	pub street_number: Option<Criterion>,
	pub street_name: Option<String>,
	pub unit: Option<Criterion>,
}
impl DatasetCriteria for LegalsCriteria {
	const DATASET: Dataset = Dataset::Legals;

	fn fields(&self) -> Vec<Field<'_>> {
		FieldList::default()
			.exact("document_id", &self.document_id)
			.exact("record_type", &self.record_type)
			.exact("borough", &self.borough)
			.exact("block", &self.block)
			.exact("lot", &self.lot)
			.exact("easement", &self.easement)
			.exact("partial_lot", &self.partial_lot)
			.exact("air_rights", &self.air_rights)
			.exact("subterranean_rights", &self.subterranean_rights)
			.exact("property_type", &self.property_type)
			.exact("street_number", &self.street_number)
			.contains("street_name", &self.street_name)
			.exact("unit", &self.unit)
			.finish()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferencesCriteria {
	pub document_id: Option<Criterion>,
	pub record_type: Option<Criterion>,
	pub reference_by_crfn_: Option<Criterion>,
	pub reference_by_doc_id: Option<Criterion>,
	pub reference_by_reel_year: Option<Criterion>,
	pub reference_by_reel_borough: Option<Criterion>,
	pub reference_by_reel_nbr: Option<Criterion>,
	pub reference_by_reel_page: Option<Criterion>,
}
impl DatasetCriteria for ReferencesCriteria {
	const DATASET: Dataset = Dataset::References;

	fn fields(&self) -> Vec<Field<'_>> {
		FieldList::default()
			.exact("document_id", &self.document_id)
			.exact("record_type", &self.record_type)
			.exact("reference_by_crfn_", &self.reference_by_crfn_)
			.exact("reference_by_doc_id", &self.reference_by_doc_id)
			.exact("reference_by_reel_year", &self.reference_by_reel_year)
			.exact("reference_by_reel_borough", &self.reference_by_reel_borough)
			.exact("reference_by_reel_nbr", &self.reference_by_reel_nbr)
			.exact("reference_by_reel_page", &self.reference_by_reel_page)
			.finish()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemarksCriteria {
	pub document_id: Option<Criterion>,
	pub record_type: Option<Criterion>,
	pub sequence_number: Option<Criterion>,
	pub remark_text: Option<String>,
}
impl DatasetCriteria for RemarksCriteria {
	const DATASET: Dataset = Dataset::Remarks;

	fn fields(&self) -> Vec<Field<'_>> {
		FieldList::default()
			.exact("document_id", &self.document_id)
			.exact("record_type", &self.record_type)
			.exact("sequence_number", &self.sequence_number)
			.contains("remark_text", &self.remark_text)
			.finish()
	}
}

/// Criteria for any one dataset, tagged by dataset name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dataset", content = "criteria", rename_all = "snake_case")]
pub enum AnyCriteria {
	Master(MasterCriteria),
	Parties(PartiesCriteria),
	Legals(LegalsCriteria),
	References(ReferencesCriteria),
	Remarks(RemarksCriteria),
}
impl AnyCriteria {
	pub fn dataset(&self) -> Dataset {
		match self {
			Self::Master(_) => Dataset::Master,
			Self::Parties(_) => Dataset::Parties,
			Self::Legals(_) => Dataset::Legals,
			Self::References(_) => Dataset::References,
			Self::Remarks(_) => Dataset::Remarks,
		}
	}

	pub fn fields(&self) -> Vec<Field<'_>> {
		match self {
			Self::Master(criteria) => criteria.fields(),
			Self::Parties(criteria) => criteria.fields(),
			Self::Legals(criteria) => criteria.fields(),
			Self::References(criteria) => criteria.fields(),
			Self::Remarks(criteria) => criteria.fields(),
		}
	}
}

#[derive(Default)]
struct FieldList<'a>(Vec<Field<'a>>);
impl<'a> FieldList<'a> {
	fn exact(mut self, name: &'static str, value: &'a Option<Criterion>) -> Self {
		if let Some(value) = value.as_ref() {
			self.0.push(Field { name, value: FieldValue::Exact(value) });
		}

		self
	}

	fn contains(mut self, name: &'static str, value: &'a Option<String>) -> Self {
		if let Some(value) = value.as_deref() {
			self.0.push(Field { name, value: FieldValue::Contains(value) });
		}

		self
	}

	fn date(mut self, name: &'static str, value: &'a Option<DateCriterion>) -> Self {
		if let Some(value) = value.as_ref() {
			self.0.push(Field { name, value: FieldValue::Date(value) });
		}

		self
	}

	fn finish(self) -> Vec<Field<'a>> {
		self.0
	}
}
