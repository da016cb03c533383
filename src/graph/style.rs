//! Stylesheet handed to the rendering port.
//!
//! Rules apply in order; a later matching rule overrides the fields it sets.

use std::collections::BTreeSet;

use super::element::ElementKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
	Node,
	Edge,
	/// Edges whose display label equals the given text.
	EdgeLabel(String),
	/// Elements carrying the given class.
	Class(String),
}

impl Selector {
	fn matches(&self, kind: ElementKind, label: &str, classes: &BTreeSet<String>) -> bool {
		match self {
			Selector::Node => kind == ElementKind::Node,
			Selector::Edge => kind == ElementKind::Edge,
			Selector::EdgeLabel(text) => kind == ElementKind::Edge && label == text,
			Selector::Class(class) => classes.contains(class),
		}
	}
}

/// Partial style; unset fields inherit from earlier rules.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
	pub fill: Option<String>,
	pub border_color: Option<String>,
	pub border_width: Option<f64>,
	pub line_color: Option<String>,
	pub line_width: Option<f64>,
	pub dashed: Option<bool>,
	pub source_arrow: Option<bool>,
	pub target_arrow: Option<bool>,
	pub show_label: Option<bool>,
	pub label_background: Option<bool>,
}

impl Style {
	pub fn fill(mut self, color: &str) -> Self {
		self.fill = Some(color.into());
		self
	}

	pub fn border(mut self, color: &str, width: f64) -> Self {
		self.border_color = Some(color.into());
		self.border_width = Some(width);
		self
	}

	pub fn line(mut self, color: &str, width: f64) -> Self {
		self.line_color = Some(color.into());
		self.line_width = Some(width);
		self
	}

	pub fn dashed(mut self, dashed: bool) -> Self {
		self.dashed = Some(dashed);
		self
	}

	pub fn arrows(mut self, source: bool, target: bool) -> Self {
		self.source_arrow = Some(source);
		self.target_arrow = Some(target);
		self
	}

	pub fn label(mut self, show: bool, background: bool) -> Self {
		self.show_label = Some(show);
		self.label_background = Some(background);
		self
	}
}

/// Fully resolved style of one element.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
	pub fill: String,
	pub border_color: String,
	pub border_width: f64,
	pub line_color: String,
	pub line_width: f64,
	pub dashed: bool,
	pub source_arrow: bool,
	pub target_arrow: bool,
	pub show_label: bool,
	pub label_background: bool,
}

impl Default for ResolvedStyle {
	fn default() -> Self {
		Self {
			fill: "#999999".into(),
			border_color: "#999999".into(),
			border_width: 0.0,
			line_color: "#999999".into(),
			line_width: 1.0,
			dashed: false,
			source_arrow: false,
			target_arrow: false,
			show_label: true,
			label_background: false,
		}
	}
}

impl ResolvedStyle {
	fn apply(&mut self, style: &Style) {
		if let Some(fill) = &style.fill {
			self.fill = fill.clone();
		}
		if let Some(color) = &style.border_color {
			self.border_color = color.clone();
		}
		if let Some(width) = style.border_width {
			self.border_width = width;
		}
		if let Some(color) = &style.line_color {
			self.line_color = color.clone();
		}
		if let Some(width) = style.line_width {
			self.line_width = width;
		}
		if let Some(dashed) = style.dashed {
			self.dashed = dashed;
		}
		if let Some(arrow) = style.source_arrow {
			self.source_arrow = arrow;
		}
		if let Some(arrow) = style.target_arrow {
			self.target_arrow = arrow;
		}
		if let Some(show) = style.show_label {
			self.show_label = show;
		}
		if let Some(background) = style.label_background {
			self.label_background = background;
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct StyleRule {
	pub selector: Selector,
	pub style: Style,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleSheet {
	rules: Vec<StyleRule>,
}

impl StyleSheet {
	pub fn rule(mut self, selector: Selector, style: Style) -> Self {
		self.rules.push(StyleRule { selector, style });
		self
	}

	/// Look of the ontology diagram. `marker` is the class toggled by search
	/// highlighting and must come last so it wins over every other rule.
	pub fn ontology(marker: &str) -> Self {
		StyleSheet::default()
			.rule(
				Selector::Node,
				Style::default()
					.fill("#ffffff")
					.border("#000000", 1.0)
					.label(true, false),
			)
			.rule(
				Selector::Edge,
				Style::default()
					.line("#555555", 1.0)
					.arrows(false, true)
					.label(true, true),
			)
			.rule(
				Selector::EdgeLabel("≡".into()),
				Style::default()
					.line("#000000", 2.0)
					.dashed(false)
					.arrows(true, true),
			)
			.rule(
				Selector::EdgeLabel("disjoint".into()),
				Style::default()
					.line("#000000", 1.0)
					.dashed(true)
					.arrows(false, false),
			)
			.rule(
				Selector::EdgeLabel("inherits".into()),
				Style::default()
					.line("#000000", 2.0)
					.dashed(false)
					.arrows(false, true),
			)
			.rule(
				Selector::Class(marker.into()),
				Style::default()
					.fill("yellow")
					.border("red", 4.0)
					.line("red", 4.0),
			)
	}

	pub fn resolve(&self, kind: ElementKind, label: &str, classes: &BTreeSet<String>) -> ResolvedStyle {
		let mut resolved = ResolvedStyle::default();
		for rule in &self.rules {
			if rule.selector.matches(kind, label, classes) {
				resolved.apply(&rule.style);
			}
		}
		resolved
	}
}
