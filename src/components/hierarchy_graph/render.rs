use log::debug;
use web_sys::{Document, Element};

use super::class_names::ClassNames;
use super::dom::{
	ClassListSink, TranslateCenter, assign_id, assign_id_label, create_svg_element,
	translate_center, update_class_name,
};
use super::geometry::{ShortenMode, round, shorten_line};
use super::interaction::interaction_ordering;
use super::state::{HierarchyGraphState, NodeRef};
use super::types::{LinkKind, NodeOrLink, NodeType, SimNode};

struct NodeItem {
	index: usize,
	group: Element,
}

struct LinkItem {
	index: usize,
	line: Element,
}

/// One `<g>` per graph level. Levels are appended in order so members draw above their parent.
struct Layer {
	element: Element,
	nodes: Vec<NodeItem>,
	links: Vec<LinkItem>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LabelKind {
	Name,
	Count,
}

struct LabelItem {
	at: NodeRef,
	kind: LabelKind,
	text: Element,
}

/// Retained SVG for a [`HierarchyGraphState`]. Built once per graph, updated every frame.
pub struct SvgScene {
	classes: ClassNames,
	svg: Element,
	wrapper: Element,
	layers: Vec<Layer>,
	labels: Vec<LabelItem>,
}

fn set(element: &Element, name: &str, value: impl ToString) {
	let _ = element.set_attribute(name, &value.to_string());
}

impl SvgScene {
	pub fn new(
		document: &Document,
		host: &Element,
		state: &HierarchyGraphState,
		classes: ClassNames,
	) -> Option<Self> {
		let svg = create_svg_element(document, "svg")?;
		set(&svg, "width", "100%");
		set(&svg, "height", "100%");
		let wrapper = create_svg_element(document, "g")?;
		wrapper.add_class(classes.transform_wrapper);
		let label_layer = create_svg_element(document, "g")?;

		let mut layers = Vec::with_capacity(state.levels.len());
		let mut labels = Vec::new();
		for (level, graph) in state.levels.iter().enumerate() {
			let element = create_svg_element(document, "g")?;
			element.add_class(if level == 0 {
				classes.super_graph
			} else {
				classes.sub_graph
			});

			let mut links = Vec::with_capacity(graph.links.len());
			for (index, link) in graph.links.iter().enumerate() {
				let line = create_svg_element(document, "line")?;
				line.add_class(match link.kind {
					LinkKind::Sibling => classes.sibling_link,
					LinkKind::Parent => classes.parent_link,
				});
				if let Some(id) = assign_id(NodeOrLink::Link(link)) {
					set(&line, "id", id);
				}
				let _ = element.append_child(&line);
				links.push(LinkItem { index, line });
			}

			let mut nodes = Vec::with_capacity(graph.nodes.len());
			for node in &graph.nodes {
				let group = create_svg_element(document, "g")?;
				for class in node_classes(&classes, level, node) {
					group.add_class(class);
				}
				update_class_name(&group, &node.data);
				if let Some(id) = assign_id(NodeOrLink::Node(node)) {
					set(&group, "id", id);
				}
				let circle = create_svg_element(document, "circle")?;
				set(&circle, "r", round(node.r, 2));
				let _ = group.append_child(&circle);
				let _ = element.append_child(&group);
				nodes.push(NodeItem {
					index: node.index,
					group,
				});

				let at = NodeRef {
					level,
					index: node.index,
				};
				if let Some(label) = &node.data.label {
					let text = create_svg_element(document, "text")?;
					text.add_class(if level == 0 {
						classes.super_node_name_label
					} else {
						classes.sub_node_name_label
					});
					if let Some(id) = assign_id_label(NodeOrLink::Node(node)) {
						set(&text, "id", id);
					}
					set(&text, "text-anchor", "middle");
					text.set_text_content(Some(label.as_str()));
					let _ = label_layer.append_child(&text);
					labels.push(LabelItem {
						at,
						kind: LabelKind::Name,
						text,
					});
				}
				if let Some(members) = node.subgraph.and_then(|l| state.levels.get(l)) {
					let text = create_svg_element(document, "text")?;
					text.add_class(classes.super_node_count_label);
					set(&text, "text-anchor", "middle");
					text.set_text_content(Some(members.member_count().to_string().as_str()));
					let _ = label_layer.append_child(&text);
					labels.push(LabelItem {
						at,
						kind: LabelKind::Count,
						text,
					});
				}
			}

			let _ = wrapper.append_child(&element);
			layers.push(Layer {
				element,
				nodes,
				links,
			});
		}

		let _ = svg.append_child(&wrapper);
		let _ = svg.append_child(&label_layer);
		let _ = host.append_child(&svg);
		debug!(
			"svg scene built: {} layers, {} labels",
			layers.len(),
			labels.len()
		);

		Some(Self {
			classes,
			svg,
			wrapper,
			layers,
			labels,
		})
	}

	pub fn update(&mut self, state: &mut HierarchyGraphState) {
		let t = state.transform;
		set(
			&self.wrapper,
			"transform",
			format!(
				"translate({}, {}) scale({})",
				round(t.x, 2),
				round(t.y, 2),
				round(t.k, 4)
			),
		);

		for (level, layer) in self.layers.iter().enumerate() {
			let Some(graph) = state.levels.get(level) else {
				continue;
			};
			let (ox, oy) = state.level_offset(level);
			for item in &layer.nodes {
				if let Some(node) = graph.nodes.get(item.index) {
					let transform = translate_center(
						node,
						TranslateCenter {
							tx: ox,
							ty: oy,
							..Default::default()
						},
					);
					set(&item.group, "transform", transform);
				}
			}
			for item in &layer.links {
				let Some(link) = graph.links.get(item.index) else {
					continue;
				};
				let (Some(source), Some(target)) =
					(graph.nodes.get(link.source), graph.nodes.get(link.target))
				else {
					continue;
				};
				// stop at the target's rim
				let short = shorten_line(
					source.x + ox,
					source.y + oy,
					target.x + ox,
					target.y + oy,
					target.r,
					ShortenMode::By,
				);
				set(&item.line, "x1", round(short.source.x, 2));
				set(&item.line, "y1", round(short.source.y, 2));
				set(&item.line, "x2", round(short.target.x, 2));
				set(&item.line, "y2", round(short.target.y, 2));
			}
		}

		let occluded = t.k < state.config.label_occlusion_zoom;
		for label in &self.labels {
			let Some(node) = state.node(label.at) else {
				continue;
			};
			let (ox, oy) = state.level_offset(label.at.level);
			let transform = translate_center(
				node,
				TranslateCenter {
					zk: t.k,
					zx: t.x,
					zy: t.y,
					tx: ox * t.k,
					ty: oy * t.k,
					..Default::default()
				},
			);
			set(&label.text, "transform", transform);
			let dy = match label.kind {
				LabelKind::Name => -(node.r * t.k + 4.0),
				LabelKind::Count => 4.0,
			};
			set(&label.text, "dy", round(dy, 2));
			if label.at.level > 0 {
				label
					.text
					.toggle_class(self.classes.occluded_label, occluded);
			}
		}

		if state.interaction_dirty {
			self.restyle(state);
			state.interaction_dirty = false;
		}
	}

	/// Apply interaction classes and restore draw order inside each layer.
	fn restyle(&self, state: &HierarchyGraphState) {
		for (level, layer) in self.layers.iter().enumerate() {
			let Some(graph) = state.levels.get(level) else {
				continue;
			};
			let mut order: Vec<(NodeOrLink<'_>, &Element)> =
				Vec::with_capacity(layer.nodes.len() + layer.links.len());

			for item in &layer.links {
				if let Some(link) = graph.links.get(item.index) {
					for (name, on) in link.interaction.classes(&self.classes) {
						item.line.toggle_class(name, on);
					}
					order.push((NodeOrLink::Link(link), &item.line));
				}
			}
			for item in &layer.nodes {
				if let Some(node) = graph.nodes.get(item.index) {
					for (name, on) in node.interaction.classes(&self.classes) {
						item.group.toggle_class(name, on);
					}
					update_class_name(&item.group, &node.data);
					order.push((NodeOrLink::Node(node), &item.group));
				}
			}

			order.sort_by(|a, b| interaction_ordering(&a.0, &b.0));
			for (_, element) in order {
				let _ = layer.element.append_child(element);
			}
		}
	}

	pub fn remove(&self) {
		self.svg.remove();
	}
}

/// Static classes of a node: its place in the hierarchy and its network kind.
fn node_classes(classes: &ClassNames, level: usize, node: &SimNode) -> Vec<&'static str> {
	let mut out = Vec::with_capacity(2);
	if node.node_type == NodeType::ParentLinkNode {
		out.push(classes.parent_link_node);
		return out;
	}
	out.push(match (level, node.subgraph) {
		(0, Some(_)) => classes.super_node,
		(0, None) => classes.group_node,
		_ => classes.sub_node,
	});
	if let Some(kind) = node.data.kind {
		out.push(classes.network(kind));
	}
	out
}

#[cfg(test)]
mod tests {
	use super::super::class_names::CLASS_NAMES;
	use super::super::types::NetworkKind;
	use super::*;

	#[test]
	fn node_classes_follow_the_hierarchy() {
		let mut node = SimNode::default();
		assert_eq!(node_classes(&CLASS_NAMES, 0, &node), vec!["groupNode"]);

		node.subgraph = Some(1);
		assert_eq!(node_classes(&CLASS_NAMES, 0, &node), vec!["superNode"]);

		node.subgraph = None;
		node.data.kind = Some(NetworkKind::Server);
		assert_eq!(
			node_classes(&CLASS_NAMES, 1, &node),
			vec!["subNode", "serverNode"]
		);

		node.node_type = NodeType::ParentLinkNode;
		assert_eq!(node_classes(&CLASS_NAMES, 1, &node), vec!["parentLinkNode"]);
	}
}
