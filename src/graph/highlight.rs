//! Blinking marker over the elements matched by a search.
//!
//! At most one session exists: starting a new one always stops the old one
//! first, and stopping clears the marker from every element, not only from
//! the previous targets.

use log::debug;

use super::element::ElementSet;
use super::port::GraphPort;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	On,
	Off,
}

impl Phase {
	fn toggled(self) -> Self {
		match self {
			Phase::On => Phase::Off,
			Phase::Off => Phase::On,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum HighlightState {
	#[default]
	Idle,
	Blinking { targets: ElementSet, phase: Phase },
}

/// Recurring timer driven by frame deltas. Dropping it cancels it.
#[derive(Debug)]
struct BlinkTimer {
	period: f64,
	elapsed: f64,
}

impl BlinkTimer {
	fn new(period: f64) -> Self {
		Self { period, elapsed: 0.0 }
	}

	/// Advances by `dt` seconds and returns how many periods completed.
	fn advance(&mut self, dt: f64) -> u64 {
		if self.period <= 0.0 {
			return 0;
		}
		self.elapsed += dt.max(0.0);
		let fired = (self.elapsed / self.period).floor();
		self.elapsed -= fired * self.period;
		fired as u64
	}
}

#[derive(Debug)]
pub struct Highlighter {
	class: String,
	period: f64,
	state: HighlightState,
	timer: Option<BlinkTimer>,
}

impl Highlighter {
	pub fn new(class: impl Into<String>, period_secs: f64) -> Self {
		Self {
			class: class.into(),
			period: period_secs,
			state: HighlightState::Idle,
			timer: None,
		}
	}

	#[cfg(test)]
	pub fn state(&self) -> &HighlightState {
		&self.state
	}

	#[cfg(test)]
	pub fn is_active(&self) -> bool {
		self.timer.is_some()
	}

	pub fn start<P: GraphPort>(&mut self, port: &mut P, targets: ElementSet) {
		self.stop(port);
		if targets.is_empty() {
			return;
		}
		debug!("highlight started on {} element(s)", targets.len());
		self.state = HighlightState::Blinking {
			targets,
			phase: Phase::Off,
		};
		self.timer = Some(BlinkTimer::new(self.period));
	}

	pub fn stop<P: GraphPort>(&mut self, port: &mut P) {
		self.timer = None;
		if std::mem::take(&mut self.state) != HighlightState::Idle {
			debug!("highlight stopped");
		}
		let everything = port.all();
		let class = self.class.as_str();
		port.batch(|port| port.set_class(&everything, class, false));
		port.refresh_style();
	}

	pub fn tick<P: GraphPort>(&mut self, port: &mut P, dt: f64) {
		let Some(timer) = self.timer.as_mut() else {
			return;
		};
		// An even number of missed periods lands on the same phase.
		if timer.advance(dt) % 2 == 1 {
			self.toggle(port);
		}
	}

	fn toggle<P: GraphPort>(&mut self, port: &mut P) {
		let HighlightState::Blinking { targets, phase } = &mut self.state else {
			return;
		};
		*phase = phase.toggled();
		let on = *phase == Phase::On;
		let class = self.class.as_str();
		port.batch(|port| port.set_class(targets, class, on));
		port.refresh_style();
	}
}
