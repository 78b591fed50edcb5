use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Column shared by every dataset and the only join key between them.
pub const DOCUMENT_ID_FIELD: &str = "document_id";

/// Opaque identifier of a recorded document. Always taken from a remote row, never minted.
pub type DocumentId = String;

/// One remote row, kept verbatim.
pub type DatasetRecord = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
	Master,
	Parties,
	Legals,
	References,
	Remarks,
}
impl Dataset {
	pub const ALL: [Self; 5] =
		[Self::Master, Self::Parties, Self::Legals, Self::References, Self::Remarks];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Master => "master",
			Self::Parties => "parties",
			Self::Legals => "legals",
			Self::References => "references",
			Self::Remarks => "remarks",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::Master => "Master",
			Self::Parties => "Parties",
			Self::Legals => "Legals",
			Self::References => "References",
			Self::Remarks => "Remarks",
		}
	}
}

impl Display for Dataset {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.label())
	}
}

/// Reads the `document_id` column of a row, accepting numeric ids as text.
pub fn record_document_id(record: &DatasetRecord) -> Option<DocumentId> {
	match record.get(DOCUMENT_ID_FIELD)? {
		serde_json::Value::String(value) => Some(value.clone()),
		serde_json::Value::Number(value) => Some(value.to_string()),
		_ => None,
	}
}
