use std::collections::HashSet;

use acris_domain::DocumentId;

/// Deduplicating identifier accumulator that remembers first-seen order.
#[derive(Debug, Default, Clone)]
pub struct IdSet {
	seen: HashSet<DocumentId>,
	ordered: Vec<DocumentId>,
}
impl IdSet {
	pub fn insert(&mut self, id: DocumentId) -> bool {
		if self.seen.contains(&id) {
			return false;
		}

		self.seen.insert(id.clone());
		self.ordered.push(id);

		true
	}

	pub fn len(&self) -> usize {
		self.ordered.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ordered.is_empty()
	}

	pub fn into_vec(self) -> Vec<DocumentId> {
		self.ordered
	}
}

impl Extend<DocumentId> for IdSet {
	fn extend<I>(&mut self, iter: I)
	where
		I: IntoIterator<Item = DocumentId>,
	{
		for id in iter {
			self.insert(id);
		}
	}
}

impl FromIterator<DocumentId> for IdSet {
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = DocumentId>,
	{
		let mut set = Self::default();

		set.extend(iter);

		set
	}
}
