use std::collections::BTreeMap;

/// Attribute map of a class node. Keys are unique, order is not significant.
pub type Attributes = BTreeMap<String, String>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
	Node,
	Edge,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeElement {
	pub id: String,
	pub label: String,
	pub attributes: Attributes,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeElement {
	pub id: String,
	/// Relation type, e.g. `inheritance`.
	pub relation: String,
	pub source: String,
	pub target: String,
	/// Display text derived from `relation`.
	pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphElement {
	Node(NodeElement),
	Edge(EdgeElement),
}

impl GraphElement {
	pub fn id(&self) -> &str {
		match self {
			GraphElement::Node(node) => &node.id,
			GraphElement::Edge(edge) => &edge.id,
		}
	}

	#[cfg(test)]
	pub fn kind(&self) -> ElementKind {
		match self {
			GraphElement::Node(_) => ElementKind::Node,
			GraphElement::Edge(_) => ElementKind::Edge,
		}
	}
}

/// Data patch applied through the rendering port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementPatch {
	/// Replaces a node's attribute map.
	Attributes(Attributes),
	/// Sets an edge's relation type and display label together.
	Relation { relation: String, label: String },
}

/// Ordered, duplicate-free set of element ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementSet(Vec<String>);

impl ElementSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, id: impl Into<String>) -> bool {
		let id = id.into();
		if self.contains(&id) {
			return false;
		}
		self.0.push(id);
		true
	}

	pub fn contains(&self, id: &str) -> bool {
		self.0.iter().any(|known| known == id)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}
}

impl<S: Into<String>> FromIterator<S> for ElementSet {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		let mut set = ElementSet::new();
		for id in iter {
			set.insert(id);
		}
		set
	}
}
