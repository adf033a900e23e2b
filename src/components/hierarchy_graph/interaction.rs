//! Derived hover/selection state and draw priority.

use std::cmp::Ordering;

use super::class_names::ClassNames;

/// Raw interaction flags. "Focus" marks something related to the hovered or selected entity,
/// "parent" marks an ancestor of it. Nothing stops an entity from being selected and previewed
/// at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InteractionState {
	pub selected: bool,
	pub selected_focus: bool,
	pub selected_parent: bool,
	pub previewed: bool,
	pub previewed_focus: bool,
	pub previewed_parent: bool,
}

impl InteractionState {
	pub fn is_focus(&self) -> bool {
		self.previewed_focus || self.selected_focus || self.selected_parent || self.previewed_parent
	}

	pub fn is_related(&self) -> bool {
		self.selected || self.previewed || self.is_focus()
	}

	pub fn is_selected(&self) -> bool {
		self.selected || self.selected_focus || self.selected_parent
	}

	pub fn is_previewed(&self) -> bool {
		self.previewed || self.previewed_focus || self.previewed_parent
	}

	pub fn clear_previewed(&mut self) {
		self.previewed = false;
		self.previewed_focus = false;
		self.previewed_parent = false;
	}

	pub fn clear_selected(&mut self) {
		self.selected = false;
		self.selected_focus = false;
		self.selected_parent = false;
	}

	/// Each interaction class paired with whether it currently applies.
	pub fn classes(&self, names: &ClassNames) -> [(&'static str, bool); 6] {
		[
			(names.previewed, self.previewed),
			(names.previewed_focus, self.previewed_focus),
			(names.previewed_parent, self.previewed_parent),
			(names.selected, self.selected),
			(names.selected_focus, self.selected_focus),
			(names.selected_parent, self.selected_parent),
		]
	}
}

/// Anything carrying interaction flags.
pub trait Interactive {
	fn interaction(&self) -> &InteractionState;

	/// Graph nodes draw above links when nothing else decides.
	fn is_graph_node(&self) -> bool;
}

pub fn interaction_priority(d: &impl Interactive) -> i32 {
	let state = d.interaction();
	if state.is_previewed() {
		3
	} else if state.is_selected() {
		2
	} else if d.is_graph_node() {
		1
	} else {
		0
	}
}

/// Signed priority difference; ascending order puts the most relevant entity last (on top).
pub fn interaction_sort(a: &impl Interactive, b: &impl Interactive) -> i32 {
	interaction_priority(a) - interaction_priority(b)
}

/// [`interaction_sort`] as an [`Ordering`], for `sort_by` (which is stable).
pub fn interaction_ordering(a: &impl Interactive, b: &impl Interactive) -> Ordering {
	interaction_sort(a, b).cmp(&0)
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Entity {
		state: InteractionState,
		node: bool,
	}

	impl Interactive for Entity {
		fn interaction(&self) -> &InteractionState {
			&self.state
		}

		fn is_graph_node(&self) -> bool {
			self.node
		}
	}

	fn from_bits(bits: u8) -> InteractionState {
		InteractionState {
			selected: bits & 1 != 0,
			selected_focus: bits & 2 != 0,
			selected_parent: bits & 4 != 0,
			previewed: bits & 8 != 0,
			previewed_focus: bits & 16 != 0,
			previewed_parent: bits & 32 != 0,
		}
	}

	#[test]
	fn related_covers_every_other_predicate() {
		for bits in 0..64u8 {
			let state = from_bits(bits);
			let any = state.is_focus() || state.is_selected() || state.is_previewed();
			assert_eq!(state.is_related(), any, "bits {bits:06b}");
			assert_eq!(state.is_related(), bits != 0, "bits {bits:06b}");
		}
	}

	#[test]
	fn selected_and_previewed_can_coexist() {
		let state = InteractionState {
			selected: true,
			previewed: true,
			..Default::default()
		};
		assert!(state.is_selected());
		assert!(state.is_previewed());
		assert!(!state.is_focus());
	}

	#[test]
	fn parent_flags_count_as_focus() {
		let state = InteractionState {
			selected_parent: true,
			..Default::default()
		};
		assert!(state.is_focus());
		assert!(state.is_selected());
		assert!(!state.is_previewed());
	}

	#[test]
	fn priority_orders_previewed_selected_node_link() {
		let link = Entity {
			state: InteractionState::default(),
			node: false,
		};
		let node = Entity {
			state: InteractionState::default(),
			node: true,
		};
		let selected = Entity {
			state: InteractionState {
				selected: true,
				..Default::default()
			},
			node: false,
		};
		let previewed = Entity {
			state: InteractionState {
				previewed: true,
				..Default::default()
			},
			node: false,
		};
		let ranked = [&link, &node, &selected, &previewed];
		for (i, a) in ranked.iter().enumerate() {
			for (j, b) in ranked.iter().enumerate() {
				let cmp = interaction_sort(*a, *b);
				assert_eq!(cmp.signum(), (i as i32 - j as i32).signum());
				assert_eq!(cmp, -interaction_sort(*b, *a));
			}
		}
		assert_eq!(interaction_sort(&previewed, &link), 3);
	}

	#[test]
	fn sort_is_stable_within_a_priority() {
		let mut items: Vec<(usize, Entity)> = [false, true, false, true]
			.into_iter()
			.map(|node| {
				Entity {
					state: InteractionState::default(),
					node,
				}
			})
			.enumerate()
			.collect();
		items.sort_by(|(_, a), (_, b)| interaction_ordering(a, b));
		let order: Vec<usize> = items.iter().map(|(i, _)| *i).collect();
		assert_eq!(order, vec![0, 2, 1, 3]);
	}

	#[test]
	fn classes_follow_flags() {
		let names = ClassNames::default();
		let state = InteractionState {
			previewed_focus: true,
			selected: true,
			..Default::default()
		};
		let on: Vec<&str> = state
			.classes(&names)
			.into_iter()
			.filter(|(_, on)| *on)
			.map(|(name, _)| name)
			.collect();
		assert_eq!(on, vec!["previewedFocus", "selected"]);
	}
}
