/// CSS classes shared with the stylesheet. The literal strings are part of the styling contract
/// and must not change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassNames {
	// Root
	pub graph_root: &'static str,
	pub is_zooming: &'static str,
	pub transform_wrapper: &'static str,

	// Graph types (nested)
	pub super_graph: &'static str,
	pub group_graph: &'static str,
	pub sub_graph: &'static str,

	// Node types
	pub super_node: &'static str,
	pub group_node: &'static str,
	pub sub_node: &'static str,

	// Network types
	pub server_node: &'static str,
	pub computer_node: &'static str,
	pub software_node: &'static str,

	// Label types
	pub super_node_count_label: &'static str,
	pub super_node_name_label: &'static str,
	pub sub_node_name_label: &'static str,
	pub occluded_label: &'static str,

	// Simulation nodes & links
	pub key_node: &'static str,
	pub sibling_link: &'static str,
	pub parent_link_node: &'static str,
	pub parent_link: &'static str,

	// Interaction state
	pub previewed: &'static str,
	pub previewed_focus: &'static str,
	pub previewed_parent: &'static str,
	pub selected: &'static str,
	pub selected_focus: &'static str,
	pub selected_parent: &'static str,

	// Time state
	pub future: &'static str,
	pub present: &'static str,
	pub past: &'static str,
}

pub const CLASS_NAMES: ClassNames = ClassNames {
	graph_root: "graphRoot",
	is_zooming: "isZooming",
	transform_wrapper: "transformWrapper",

	super_graph: "superGraph",
	group_graph: "groupGraph",
	sub_graph: "subGraph",

	super_node: "superNode",
	group_node: "groupNode",
	sub_node: "subNode",

	server_node: "serverNode",
	computer_node: "computerNode",
	software_node: "softwareNode",

	super_node_count_label: "superNodeCountLabel",
	super_node_name_label: "superNodeNameLabel",
	sub_node_name_label: "subNodeNameLabel",
	occluded_label: "occludedLabel",

	key_node: "keyNode",
	sibling_link: "siblingLink",
	parent_link_node: "parentLinkNode",
	parent_link: "parentLink",

	previewed: "previewed",
	previewed_focus: "previewedFocus",
	previewed_parent: "previewedParent",
	selected: "selected",
	selected_focus: "selectedFocus",
	selected_parent: "selectedParent",

	future: "future",
	present: "present",
	past: "past",
};

impl Default for ClassNames {
	fn default() -> Self {
		CLASS_NAMES
	}
}

impl ClassNames {
	pub fn network(&self, kind: super::types::NetworkKind) -> &'static str {
		use super::types::NetworkKind::*;
		match kind {
			Server => self.server_node,
			Computer => self.computer_node,
			Software => self.software_node,
		}
	}

	pub fn time(&self, time: super::types::TimeState) -> &'static str {
		use super::types::TimeState::*;
		match time {
			Future => self.future,
			Present => self.present,
			Past => self.past,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::super::types::{NetworkKind, TimeState};
	use super::*;

	#[test]
	fn lookups_use_the_table() {
		let names = ClassNames::default();
		assert_eq!(names.network(NetworkKind::Software), "softwareNode");
		assert_eq!(names.time(TimeState::Future), "future");
		// reserved for stylesheets, nothing in the renderer emits them
		assert_eq!((names.group_graph, names.key_node), ("groupGraph", "keyNode"));
	}
}
