use super::interaction::{InteractionState, Interactive};

/// Node record supplied by the host page.
#[derive(Clone, Debug, Default)]
pub struct GraphNode {
	pub id: String,
	pub label: Option<String>,
	/// Id of the enclosing node, if any.
	pub parent: Option<String>,
	pub kind: Option<NetworkKind>,
	pub time: Option<TimeState>,
}

#[derive(Clone, Debug)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
}

#[derive(Clone, Debug, Default)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkKind {
	Server,
	Computer,
	Software,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeState {
	Future,
	Present,
	Past,
}

/// Pan/zoom state: screen = world * k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ZoomTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeType {
	#[default]
	Node,
	/// Stand-in for a link that leaves the enclosing parent.
	ParentLinkNode,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkKind {
	#[default]
	Sibling,
	/// Connects a member of a subgraph to one of its parent-link nodes.
	Parent,
}

/// Domain payload bound to a rendered node or link.
#[derive(Clone, Debug, Default)]
pub struct Datum {
	pub id: String,
	pub label: Option<String>,
	pub kind: Option<NetworkKind>,
	pub time: Option<TimeState>,
	pub class_name: Option<&'static str>,
	pub remove_class_name: Option<&'static str>,
	pub is_graph_node: bool,
}

impl Datum {
	/// Record a new class, remembering the previous one so the renderer can swap them.
	pub fn set_class_name(&mut self, next: Option<&'static str>) {
		self.remove_class_name = self.class_name.filter(|current| Some(*current) != next);
		self.class_name = next;
	}
}

/// A simulated point. Owned by its subgraph, mutated every tick.
#[derive(Clone, Debug, Default)]
pub struct SimNode {
	pub index: usize,
	pub node_type: NodeType,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub fx: Option<f64>,
	pub fy: Option<f64>,
	pub r: f64,
	/// Level holding this node's children.
	pub subgraph: Option<usize>,
	/// Link on the parent's level that this parent-link node stands in for.
	pub parent_link: Option<usize>,
	pub data: Datum,
	pub interaction: InteractionState,
}

impl SimNode {
	pub fn is_fixed(&self) -> bool {
		self.fx.is_some() && self.fy.is_some()
	}

	pub fn pin(&mut self, x: f64, y: f64) {
		self.fx = Some(x);
		self.fy = Some(y);
	}
}

#[derive(Clone, Debug, Default)]
pub struct SimLink {
	pub source: usize,
	pub target: usize,
	pub kind: LinkKind,
	pub data: Datum,
	pub interaction: InteractionState,
}

impl SimLink {
	pub fn touches(&self, index: usize) -> bool {
		self.source == index || self.target == index
	}

	/// The endpoint opposite `index`.
	pub fn other(&self, index: usize) -> usize {
		if self.source == index {
			self.target
		} else {
			self.source
		}
	}
}

impl Interactive for SimNode {
	fn interaction(&self) -> &InteractionState {
		&self.interaction
	}

	fn is_graph_node(&self) -> bool {
		self.data.is_graph_node
	}
}

impl Interactive for SimLink {
	fn interaction(&self) -> &InteractionState {
		&self.interaction
	}

	fn is_graph_node(&self) -> bool {
		false
	}
}

/// Borrowed view over either entity, for mixed sorting and id assignment.
#[derive(Clone, Copy, Debug)]
pub enum NodeOrLink<'a> {
	Node(&'a SimNode),
	Link(&'a SimLink),
}

impl Interactive for NodeOrLink<'_> {
	fn interaction(&self) -> &InteractionState {
		match self {
			NodeOrLink::Node(node) => &node.interaction,
			NodeOrLink::Link(link) => &link.interaction,
		}
	}

	fn is_graph_node(&self) -> bool {
		match self {
			NodeOrLink::Node(node) => node.is_graph_node(),
			NodeOrLink::Link(link) => link.is_graph_node(),
		}
	}
}
