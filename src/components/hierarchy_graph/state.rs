use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use log::{debug, info};

use super::class_names::ClassNames;
use super::config::LayoutConfig;
use super::forces::{ForceClampToRadius, Radius, position_parent_link_nodes};
use super::geometry::{circle_area, circle_radius, clamp_xy_to_radius};
use super::interaction::InteractionState;
use super::simulation::Simulation;
use super::types::{
	Datum, GraphData, GraphNode, LinkKind, NodeType, SimLink, SimNode, ZoomTransform,
};

/// Screen pixels a pointer may travel before a press stops counting as a click.
const CLICK_SLOP: f64 = 3.0;

/// Address of a node: `level` 0 is the root graph, every parent owns one further level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef {
	pub level: usize,
	pub index: usize,
}

/// One simulated graph level.
pub struct Subgraph {
	pub parent: Option<NodeRef>,
	pub nodes: Vec<SimNode>,
	pub links: Vec<SimLink>,
	pub simulation: Simulation,
}

impl Subgraph {
	/// Members that are real graph nodes, i.e. not parent-link stand-ins.
	pub fn member_count(&self) -> usize {
		self.nodes
			.iter()
			.filter(|d| d.node_type == NodeType::Node)
			.count()
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<NodeRef>,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
	Previewed,
	Selected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
	Own,
	Focus,
	Parent,
}

fn apply(state: &mut InteractionState, mark: Mark, role: Role) {
	let flag = match (mark, role) {
		(Mark::Previewed, Role::Own) => &mut state.previewed,
		(Mark::Previewed, Role::Focus) => &mut state.previewed_focus,
		(Mark::Previewed, Role::Parent) => &mut state.previewed_parent,
		(Mark::Selected, Role::Own) => &mut state.selected,
		(Mark::Selected, Role::Focus) => &mut state.selected_focus,
		(Mark::Selected, Role::Parent) => &mut state.selected_parent,
	};
	*flag = true;
}

pub struct HierarchyGraphState {
	pub levels: Vec<Subgraph>,
	pub config: LayoutConfig,
	pub transform: ZoomTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hovered: Option<NodeRef>,
	pub selected: Option<NodeRef>,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	/// Set whenever interaction flags change; the renderer clears it after restyling.
	pub interaction_dirty: bool,
}

impl HierarchyGraphState {
	pub fn new(
		data: &GraphData,
		config: LayoutConfig,
		classes: &ClassNames,
		width: f64,
		height: f64,
	) -> Self {
		let levels = build_levels(data, &config, classes);
		info!(
			"hierarchy graph built: {} levels, {} nodes, {} links",
			levels.len(),
			levels.iter().map(|l| l.nodes.len()).sum::<usize>(),
			levels.iter().map(|l| l.links.len()).sum::<usize>(),
		);

		Self {
			levels,
			config,
			transform: ZoomTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hovered: None,
			selected: None,
			width,
			height,
			animation_running: true,
			interaction_dirty: true,
		}
	}

	pub fn node(&self, at: NodeRef) -> Option<&SimNode> {
		self.levels.get(at.level)?.nodes.get(at.index)
	}

	fn node_mut(&mut self, at: NodeRef) -> Option<&mut SimNode> {
		self.levels.get_mut(at.level)?.nodes.get_mut(at.index)
	}

	/// World-space origin of a level's local coordinates.
	pub fn level_offset(&self, level: usize) -> (f64, f64) {
		self.levels
			.get(level)
			.and_then(|l| l.parent)
			.map(|p| self.world_position(p))
			.unwrap_or((0.0, 0.0))
	}

	pub fn world_position(&self, at: NodeRef) -> (f64, f64) {
		let Some(node) = self.node(at) else {
			return (0.0, 0.0);
		};
		let (ox, oy) = self.level_offset(at.level);
		(ox + node.x, oy + node.y)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost real node under a screen position. Members win over their parent.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeRef> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let hit = |level: usize| -> Option<(NodeRef, f64)> {
			let (ox, oy) = self.level_offset(level);
			self.levels[level]
				.nodes
				.iter()
				.filter(|d| d.node_type == NodeType::Node)
				.filter_map(|d| {
					let distance = (d.x + ox - gx).hypot(d.y + oy - gy);
					(distance < d.r.max(self.config.hit_radius)).then_some((
						NodeRef {
							level,
							index: d.index,
						},
						distance,
					))
				})
				.min_by(|a, b| a.1.total_cmp(&b.1))
		};

		(1..self.levels.len())
			.filter_map(&hit)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.or_else(|| if self.levels.is_empty() { None } else { hit(0) })
			.map(|(at, _)| at)
	}

	pub fn set_hover(&mut self, node: Option<NodeRef>) {
		if self.hovered == node {
			return;
		}
		self.hovered = node;
		self.remark(Mark::Previewed, node);
	}

	pub fn set_selected(&mut self, node: Option<NodeRef>) {
		if self.selected == node {
			return;
		}
		self.selected = node;
		self.remark(Mark::Selected, node);
	}

	fn remark(&mut self, mark: Mark, target: Option<NodeRef>) {
		for level in &mut self.levels {
			let states = level
				.nodes
				.iter_mut()
				.map(|d| &mut d.interaction)
				.chain(level.links.iter_mut().map(|l| &mut l.interaction));
			for state in states {
				match mark {
					Mark::Previewed => state.clear_previewed(),
					Mark::Selected => state.clear_selected(),
				}
			}
		}
		if let Some(target) = target {
			self.mark(mark, target);
		}
		self.interaction_dirty = true;
	}

	/// Flag the target, its links and neighbours, and its enclosing parent. Links leaving the
	/// parent carry the focus on to the root-level link and its far end.
	fn mark(&mut self, mark: Mark, target: NodeRef) {
		let Some(level) = self.levels.get_mut(target.level) else {
			return;
		};
		if target.index >= level.nodes.len() {
			return;
		}
		apply(&mut level.nodes[target.index].interaction, mark, Role::Own);

		let mut crossing = Vec::new();
		for link in level.links.iter_mut().filter(|l| l.touches(target.index)) {
			apply(&mut link.interaction, mark, Role::Focus);
			let other = &mut level.nodes[link.other(target.index)];
			apply(&mut other.interaction, mark, Role::Focus);
			if let Some(parent_link) = other.parent_link {
				crossing.push(parent_link);
			}
		}

		let parent = level.parent;
		if let Some(parent) = parent {
			if let Some(node) = self.node_mut(parent) {
				apply(&mut node.interaction, mark, Role::Parent);
			}
			let Some(outer) = self.levels.get_mut(parent.level) else {
				return;
			};
			for index in crossing {
				let Some(link) = outer.links.get_mut(index) else {
					continue;
				};
				apply(&mut link.interaction, mark, Role::Focus);
				let far = link.other(parent.index);
				if let Some(node) = outer.nodes.get_mut(far) {
					apply(&mut node.interaction, mark, Role::Focus);
				}
			}
		}
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		if let Some(at) = self.node_at_position(x, y) {
			let (node_start_x, node_start_y) =
				self.node(at).map(|d| (d.x, d.y)).unwrap_or_default();
			self.drag = DragState {
				active: true,
				node: Some(at),
				moved: false,
				start_x: x,
				start_y: y,
				node_start_x,
				node_start_y,
			};
		} else {
			self.pan = PanState {
				active: true,
				moved: false,
				start_x: x,
				start_y: y,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	/// Returns true when the pan/zoom transform changed.
	pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
		if !self.drag.active {
			let hovered = self.node_at_position(x, y);
			self.set_hover(hovered);
		}

		if self.drag.active {
			let Some(at) = self.drag.node else {
				return false;
			};
			if (x - self.drag.start_x).hypot(y - self.drag.start_y) > CLICK_SLOP {
				self.drag.moved = true;
			}
			if !self.drag.moved {
				return false;
			}
			let (dx, dy) = (
				(x - self.drag.start_x) / self.transform.k,
				(y - self.drag.start_y) / self.transform.k,
			);
			let (mut nx, mut ny) = (self.drag.node_start_x + dx, self.drag.node_start_y + dy);
			if let Some(parent) = self.levels[at.level].parent.and_then(|p| self.node(p)) {
				let r = self.node(at).map(|d| d.r).unwrap_or_default();
				let clamped = clamp_xy_to_radius([nx, ny], Some(parent.r - r));
				(nx, ny) = (clamped.x, clamped.y);
			}
			if let Some(node) = self.node_mut(at) {
				node.pin(nx, ny);
				node.x = nx;
				node.y = ny;
			}
			self.reheat(at.level);
			false
		} else if self.pan.active {
			if (x - self.pan.start_x).hypot(y - self.pan.start_y) > CLICK_SLOP {
				self.pan.moved = true;
			}
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
			true
		} else {
			false
		}
	}

	pub fn pointer_up(&mut self) {
		if self.drag.active && !self.drag.moved {
			let clicked = self.drag.node;
			let next = if self.selected == clicked { None } else { clicked };
			self.set_selected(next);
		} else if self.pan.active && !self.pan.moved {
			self.set_selected(None);
		}
		self.drag = DragState::default();
		self.pan = PanState::default();
	}

	pub fn pointer_leave(&mut self) {
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.set_hover(None);
	}

	/// Zoom about a screen point; wheel down zooms out.
	pub fn zoom_at(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(self.config.min_zoom, self.config.max_zoom);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Warm up a level; the root carries its subgraphs along since their parents move.
	fn reheat(&mut self, level: usize) {
		if level == 0 {
			for l in &mut self.levels {
				l.simulation.reheat(0.3);
			}
		} else if let Some(l) = self.levels.get_mut(level) {
			l.simulation.reheat(0.3);
		}
	}

	pub fn tick(&mut self) {
		let dt = self.config.tick_dt;
		let Some((root, rest)) = self.levels.split_first_mut() else {
			return;
		};
		if !root.simulation.is_settled() {
			root.simulation.tick(&mut root.nodes, dt);
		}
		for level in rest.iter_mut() {
			if let Some(parent) = level.parent.and_then(|p| root.nodes.get(p.index)) {
				position_parent_link_nodes(parent, &root.nodes, &root.links, &mut level.nodes);
			}
			if !level.simulation.is_settled() {
				level.simulation.tick(&mut level.nodes, dt);
			}
		}
	}

	/// Keeps the view centred on the same graph point when the viewport changes size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.width = width;
		self.height = height;
	}
}

fn top_level_ancestor<'a>(id: &'a str, known: &HashMap<&'a str, &'a GraphNode>) -> &'a str {
	let mut current = id;
	// bounded walk so a parent cycle cannot hang the build
	for _ in 0..known.len() {
		match known
			.get(current)
			.copied()
			.and_then(|n| n.parent.as_deref())
			.filter(|p| known.contains_key(p))
		{
			// a node whose chain loops back to itself is treated as top level
			Some(parent) if parent == id => return id,
			Some(parent) => current = parent,
			None => break,
		}
	}
	current
}

fn node_datum(node: &GraphNode, classes: &ClassNames) -> Datum {
	let mut data = Datum {
		id: node.id.clone(),
		label: node.label.clone(),
		kind: node.kind,
		time: node.time,
		is_graph_node: true,
		..Default::default()
	};
	data.set_class_name(data.time.map(|t| classes.time(t)));
	data
}

struct LevelDraft {
	parent: Option<NodeRef>,
	nodes: Vec<SimNode>,
	links: Vec<SimLink>,
}

impl LevelDraft {
	fn new(parent: Option<NodeRef>) -> Self {
		Self {
			parent,
			nodes: Vec::new(),
			links: Vec::new(),
		}
	}

	fn push_node(&mut self, mut node: SimNode) -> usize {
		let index = self.nodes.len();
		node.index = index;
		self.nodes.push(node);
		index
	}

	fn push_link(&mut self, source: usize, target: usize, kind: LinkKind) -> usize {
		let id = format!("{}--{}", self.nodes[source].data.id, self.nodes[target].data.id);
		self.links.push(SimLink {
			source,
			target,
			kind,
			data: Datum {
				id,
				..Default::default()
			},
			interaction: InteractionState::default(),
		});
		self.links.len() - 1
	}
}

/// Flatten the input into a root level plus one level per parent.
///
/// Deeper nesting collapses onto the top-level ancestor. A link crossing levels becomes one
/// root-level link between the top-level ancestors, plus a parent-link node and a parent link
/// inside each subgraph it leaves.
fn build_levels(data: &GraphData, config: &LayoutConfig, classes: &ClassNames) -> Vec<Subgraph> {
	let known: HashMap<&str, &GraphNode> = data.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
	let mut drafts = vec![LevelDraft::new(None)];
	let mut placement: HashMap<&str, NodeRef> = HashMap::new();

	for node in &data.nodes {
		if placement.contains_key(node.id.as_str()) {
			debug!("duplicate node id {}", node.id);
			continue;
		}
		if top_level_ancestor(&node.id, &known) == node.id {
			let index = drafts[0].push_node(SimNode {
				r: config.node_radius,
				data: node_datum(node, classes),
				..Default::default()
			});
			placement.insert(&node.id, NodeRef { level: 0, index });
		}
	}

	for node in &data.nodes {
		let top = top_level_ancestor(&node.id, &known);
		if top == node.id || placement.contains_key(node.id.as_str()) {
			continue;
		}
		let Some(&parent) = placement.get(top) else {
			continue;
		};
		let level = match drafts[0].nodes[parent.index].subgraph {
			Some(level) => level,
			None => {
				drafts.push(LevelDraft::new(Some(parent)));
				let level = drafts.len() - 1;
				drafts[0].nodes[parent.index].subgraph = Some(level);
				level
			}
		};
		let index = drafts[level].push_node(SimNode {
			r: config.node_radius,
			data: node_datum(node, classes),
			..Default::default()
		});
		placement.insert(&node.id, NodeRef { level, index });
	}

	let mut root_links: HashMap<(usize, usize), usize> = HashMap::new();
	let mut parent_link_nodes: HashMap<(usize, usize), usize> = HashMap::new();
	let mut parent_links: HashSet<(usize, usize, usize)> = HashSet::new();
	for link in &data.links {
		let (Some(&s), Some(&t)) = (
			placement.get(link.source.as_str()),
			placement.get(link.target.as_str()),
		) else {
			debug!("link {} -> {} has an unknown endpoint", link.source, link.target);
			continue;
		};
		if s == t {
			continue;
		}
		if s.level == t.level && s.level != 0 {
			drafts[s.level].push_link(s.index, t.index, LinkKind::Sibling);
			continue;
		}

		let top_of = |at: NodeRef| drafts[at.level].parent.unwrap_or(at);
		let (s_top, t_top) = (top_of(s), top_of(t));
		if s_top == t_top {
			debug!("link {} -> {} stays inside its parent's boundary", link.source, link.target);
			continue;
		}
		let root_link = *root_links
			.entry((s_top.index, t_top.index))
			.or_insert_with(|| drafts[0].push_link(s_top.index, t_top.index, LinkKind::Sibling));

		for (end, is_source) in [(s, true), (t, false)] {
			if end.level == 0 {
				continue;
			}
			let level = &mut drafts[end.level];
			let stand_in = *parent_link_nodes
				.entry((end.level, root_link))
				.or_insert_with(|| {
					level.push_node(SimNode {
						node_type: NodeType::ParentLinkNode,
						r: config.parent_link_node_radius,
						parent_link: Some(root_link),
						data: Datum {
							id: format!("{}{}", classes.parent_link_node, root_link),
							..Default::default()
						},
						..Default::default()
					})
				});
			let (source, target) = if is_source {
				(end.index, stand_in)
			} else {
				(stand_in, end.index)
			};
			// several members of one parent may reach the same far member
			if parent_links.insert((end.level, source, target)) {
				level.push_link(source, target, LinkKind::Parent);
			}
		}
	}

	size_parents(&mut drafts, config);
	spread(&mut drafts, config);

	let (root, rest) = drafts.split_at_mut(1);
	let root = &root[0];
	for level in rest.iter_mut() {
		if let Some(parent) = level.parent.and_then(|p| root.nodes.get(p.index)) {
			position_parent_link_nodes(parent, &root.nodes, &root.links, &mut level.nodes);
		}
		for node in level.nodes.iter_mut() {
			if let (Some(fx), Some(fy)) = (node.fx, node.fy) {
				node.x = fx;
				node.y = fy;
			}
		}
	}

	let parent_radii: Vec<f64> = drafts
		.iter()
		.map(|d| {
			d.parent
				.and_then(|p| drafts[0].nodes.get(p.index))
				.map(|p| p.r)
				.unwrap_or_default()
		})
		.collect();

	drafts
		.into_iter()
		.zip(parent_radii)
		.map(|(draft, parent_r)| {
			let physics = if draft.parent.is_some() {
				&config.subgraph_physics
			} else {
				&config.physics
			};
			let mut simulation = Simulation::new(&draft.nodes, &draft.links, physics);
			if draft.parent.is_some() {
				let radius = Radius::Function(Box::new(move |d: &SimNode, _: usize, _: &[SimNode]| {
					parent_r - d.r
				}));
				simulation.add_force(
					"clampToParent",
					Box::new(ForceClampToRadius::new(radius)),
					&draft.nodes,
				);
			}
			Subgraph {
				parent: draft.parent,
				nodes: draft.nodes,
				links: draft.links,
				simulation,
			}
		})
		.collect()
}

/// A parent's area holds its padded members `parent_area_scale` times over.
fn size_parents(drafts: &mut [LevelDraft], config: &LayoutConfig) {
	for level in 1..drafts.len() {
		let Some(parent) = drafts[level].parent else {
			continue;
		};
		let area: f64 = drafts[level]
			.nodes
			.iter()
			.filter(|d| d.node_type == NodeType::Node)
			.map(|d| circle_area(d.r + config.parent_padding))
			.sum();
		let r = circle_radius(area * config.parent_area_scale).max(config.node_radius);
		drafts[0].nodes[parent.index].r = r;
	}
}

/// Start real nodes on a circle: wide at the root, half the parent radius inside a parent.
fn spread(drafts: &mut [LevelDraft], config: &LayoutConfig) {
	for level in 0..drafts.len() {
		let radius = match drafts[level].parent {
			Some(p) => drafts[0].nodes[p.index].r / 2.0,
			None => config.initial_spread,
		};
		let nodes = &mut drafts[level].nodes;
		let count = nodes
			.iter()
			.filter(|d| d.node_type == NodeType::Node)
			.count()
			.max(1);
		for (i, node) in nodes
			.iter_mut()
			.filter(|d| d.node_type == NodeType::Node)
			.enumerate()
		{
			let angle = (i as f64) * 2.0 * PI / count as f64;
			node.x = radius * angle.cos();
			node.y = radius * angle.sin();
		}
	}
}
