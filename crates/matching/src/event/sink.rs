// Copyright 2025 itscheems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::ExchangeEvent;

/// Event sink trait - receives events of completed work
///
/// Called after fills are committed and transfers executed, so a sink never
/// sees events of work that was rolled back. Sinks cannot veto.
pub trait EventSink {
	fn emit(&mut self, event: ExchangeEvent);
}

/// In-memory event sink
#[derive(Debug, Default, Clone)]
pub struct MemoryEventSink {
	events: Vec<ExchangeEvent>,
}

impl MemoryEventSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn events(&self) -> &[ExchangeEvent] {
		&self.events
	}

	pub fn match_count(&self) -> usize {
		self.events.iter().filter(|e| e.is_match()).count()
	}

	pub fn transfer_count(&self) -> usize {
		self.events.iter().filter(|e| e.is_transfer()).count()
	}

	/// Take all recorded events, leaving the sink empty
	pub fn drain(&mut self) -> Vec<ExchangeEvent> {
		std::mem::take(&mut self.events)
	}
}

impl EventSink for MemoryEventSink {
	fn emit(&mut self, event: ExchangeEvent) {
		self.events.push(event);
	}
}
