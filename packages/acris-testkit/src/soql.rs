use serde_json::Value;

use acris_domain::DatasetRecord;

/// One clause of the SoQL subset produced by the filter builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
	Eq(String, String),
	In(String, Vec<String>),
	Like(String, String),
	Between(String, String, String),
	Gte(String, String),
	Lte(String, String),
	StartsWith(String, String),
}
impl Predicate {
	pub fn matches(&self, row: &DatasetRecord) -> bool {
		let column = match self {
			Self::Eq(column, _)
			| Self::In(column, _)
			| Self::Like(column, _)
			| Self::Between(column, _, _)
			| Self::Gte(column, _)
			| Self::Lte(column, _)
			| Self::StartsWith(column, _) => column,
		};
		let Some(value) = row.get(column).and_then(text) else {
			return false;
		};

		match self {
			Self::Eq(_, expected) => &value == expected,
			Self::In(_, options) => options.contains(&value),
			Self::Like(_, pattern) => like(&value, pattern),
			Self::Between(_, low, high) => &value >= low && &value <= high,
			Self::Gte(_, low) => &value >= low,
			Self::Lte(_, high) => &value <= high,
			Self::StartsWith(_, prefix) => value.starts_with(prefix.as_str()),
		}
	}
}

pub(crate) fn parse_filter(filter: &str) -> Result<Vec<Predicate>, String> {
	split_conjunction(filter).into_iter().map(parse_clause).collect()
}

fn text(value: &Value) -> Option<String> {
	match value {
		Value::String(value) => Some(value.clone()),
		Value::Number(value) => Some(value.to_string()),
		Value::Bool(value) => Some(value.to_string()),
		_ => None,
	}
}

fn like(value: &str, pattern: &str) -> bool {
	match (pattern.strip_prefix('%'), pattern.strip_suffix('%')) {
		(Some(rest), Some(_)) => value.contains(rest.strip_suffix('%').unwrap_or(rest)),
		(Some(suffix), None) => value.ends_with(suffix),
		(None, Some(prefix)) => value.starts_with(prefix),
		(None, None) => value == pattern,
	}
}

/// Splits on ` AND ` outside of quotes and parentheses.
fn split_conjunction(filter: &str) -> Vec<&str> {
	let bytes = filter.as_bytes();
	let mut parts = Vec::new();
	let mut in_quote = false;
	let mut depth = 0_usize;
	let mut start = 0;
	let mut i = 0;

	while i < bytes.len() {
		match bytes[i] {
			b'\'' => in_quote = !in_quote,
			b'(' if !in_quote => depth += 1,
			b')' if !in_quote => depth = depth.saturating_sub(1),
			b' ' if !in_quote && depth == 0 && filter[i..].starts_with(" AND ") => {
				parts.push(&filter[start..i]);
				i += " AND ".len();
				start = i;

				continue;
			},
			_ => {},
		}

		i += 1;
	}

	parts.push(&filter[start..]);

	parts
}

fn parse_clause(clause: &str) -> Result<Predicate, String> {
	let mut cursor = Cursor::new(clause);
	let predicate = if clause.trim_start().starts_with("starts_with(") {
		cursor.keyword("starts_with")?;
		cursor.symbol("(")?;

		let column = cursor.ident()?;

		cursor.symbol(",")?;

		let prefix = cursor.literal()?;

		cursor.symbol(")")?;

		Predicate::StartsWith(column, prefix)
	} else {
		let column = cursor.ident()?;

		if cursor.try_symbol(">=") {
			Predicate::Gte(column, cursor.literal()?)
		} else if cursor.try_symbol("<=") {
			Predicate::Lte(column, cursor.literal()?)
		} else if cursor.try_symbol("=") {
			Predicate::Eq(column, cursor.literal()?)
		} else {
			match cursor.ident()?.as_str() {
				"in" => {
					cursor.symbol("(")?;

					let mut options = vec![cursor.literal()?];

					while cursor.try_symbol(",") {
						options.push(cursor.literal()?);
					}

					cursor.symbol(")")?;

					Predicate::In(column, options)
				},
				"like" => Predicate::Like(column, cursor.literal()?),
				"between" => {
					let low = cursor.literal()?;

					cursor.keyword("and")?;

					Predicate::Between(column, low, cursor.literal()?)
				},
				other => return Err(format!("Unsupported SoQL operator '{other}' in '{clause}'.")),
			}
		}
	};

	cursor.finish()?;

	Ok(predicate)
}

struct Cursor<'a> {
	rest: &'a str,
	clause: &'a str,
}
impl<'a> Cursor<'a> {
	fn new(clause: &'a str) -> Self {
		Self { rest: clause, clause }
	}

	fn skip_ws(&mut self) {
		self.rest = self.rest.trim_start();
	}

	fn error(&self, expected: &str) -> String {
		format!("Could not parse SoQL '{}': expected {expected} at '{}'.", self.clause, self.rest)
	}

	fn try_symbol(&mut self, symbol: &str) -> bool {
		self.skip_ws();

		match self.rest.strip_prefix(symbol) {
			Some(rest) => {
				self.rest = rest;

				true
			},
			None => false,
		}
	}

	fn symbol(&mut self, symbol: &str) -> Result<(), String> {
		if self.try_symbol(symbol) { Ok(()) } else { Err(self.error(symbol)) }
	}

	fn keyword(&mut self, keyword: &str) -> Result<(), String> {
		if self.ident()? == keyword { Ok(()) } else { Err(self.error(keyword)) }
	}

	fn ident(&mut self) -> Result<String, String> {
		self.skip_ws();

		let end = self
			.rest
			.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
			.unwrap_or(self.rest.len());

		if end == 0 {
			return Err(self.error("an identifier"));
		}

		let (ident, rest) = self.rest.split_at(end);

		self.rest = rest;

		Ok(ident.to_string())
	}

	fn literal(&mut self) -> Result<String, String> {
		self.skip_ws();

		if let Some(body) = self.rest.strip_prefix('\'') {
			let mut value = String::new();
			let mut chars = body.char_indices().peekable();

			while let Some((index, c)) = chars.next() {
				if c != '\'' {
					value.push(c);

					continue;
				}
				if matches!(chars.peek(), Some((_, '\''))) {
					value.push('\'');
					chars.next();

					continue;
				}

				self.rest = &body[index + 1..];

				return Ok(value);
			}

			return Err(self.error("a closing quote"));
		}

		let end = self
			.rest
			.find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
			.unwrap_or(self.rest.len());

		if end == 0 {
			return Err(self.error("a literal"));
		}

		let (number, rest) = self.rest.split_at(end);

		self.rest = rest;

		Ok(number.to_string())
	}

	fn finish(&mut self) -> Result<(), String> {
		self.skip_ws();

		if self.rest.is_empty() { Ok(()) } else { Err(self.error("end of clause")) }
	}
}
