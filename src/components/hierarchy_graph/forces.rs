use super::geometry::{clamp_xy_to_radius, def_num, point_along_line};
use super::types::{NodeType, SimLink, SimNode};

/// A per-tick adjustment plugged into a [`Simulation`](super::simulation::Simulation).
pub trait SimulationForce {
	/// Called with the full node array whenever the node set (or anything the force caches
	/// per node) changes.
	fn initialize(&mut self, nodes: &[SimNode]);

	fn force(&mut self, nodes: &mut [SimNode], alpha: f64);
}

pub type RadiusFn = Box<dyn Fn(&SimNode, usize, &[SimNode]) -> f64>;

/// Radius of a clamp force, either fixed or computed per node at initialization.
pub enum Radius {
	Constant(f64),
	Function(RadiusFn),
}

impl Default for Radius {
	fn default() -> Self {
		Radius::Constant(30.0)
	}
}

impl From<f64> for Radius {
	fn from(value: f64) -> Self {
		Radius::Constant(value)
	}
}

impl Radius {
	fn resolve(&self, node: &SimNode, index: usize, nodes: &[SimNode]) -> f64 {
		match self {
			Radius::Constant(r) => *r,
			Radius::Function(f) => f(node, index, nodes),
		}
	}
}

/// Stops nodes at a circle around the origin. Radii are evaluated once in
/// [`SimulationForce::initialize`]; re-initialize after node sizes change.
#[derive(Default)]
pub struct ForceClampToRadius {
	radius: Radius,
	radiuses: Vec<f64>,
}

impl ForceClampToRadius {
	pub fn new(radius: impl Into<Radius>) -> Self {
		Self {
			radius: radius.into(),
			radiuses: Vec::new(),
		}
	}
}

impl SimulationForce for ForceClampToRadius {
	fn initialize(&mut self, nodes: &[SimNode]) {
		self.radiuses = nodes
			.iter()
			.enumerate()
			.map(|(i, node)| self.radius.resolve(node, i, nodes))
			.collect();
	}

	fn force(&mut self, nodes: &mut [SimNode], _alpha: f64) {
		for (node, &r) in nodes.iter_mut().zip(&self.radiuses) {
			let next = [node.x + node.vx, node.y + node.vy];
			let clamped = clamp_xy_to_radius(next, Some(r));
			if clamped.was_clamped {
				node.vx = 0.0;
				node.vy = 0.0;
				node.x = clamped.x;
				node.y = clamped.y;
			}
		}
	}
}

/// Pin every parent-link child of `parent` on the parent's boundary, facing the far end of the
/// link it stands in for. `siblings` and `links` are the parent's own level.
pub fn position_parent_link_nodes(
	parent: &SimNode,
	siblings: &[SimNode],
	links: &[SimLink],
	children: &mut [SimNode],
) {
	let boundary = if parent.r == 0.0 || parent.r.is_nan() {
		1.0
	} else {
		parent.r
	};

	for child in children
		.iter_mut()
		.filter(|d| d.node_type == NodeType::ParentLinkNode)
	{
		let Some(link) = child.parent_link.and_then(|i| links.get(i)) else {
			continue;
		};
		let (Some(source), Some(target)) = (siblings.get(link.source), siblings.get(link.target))
		else {
			continue;
		};
		let mut x = def_num(source.x) - def_num(target.x);
		let mut y = def_num(source.y) - def_num(target.y);
		if source.index == parent.index {
			x *= -1.0;
			y *= -1.0;
		}
		let p = point_along_line(x, y, boundary);
		child.pin(p.x, p.y);
	}
}
