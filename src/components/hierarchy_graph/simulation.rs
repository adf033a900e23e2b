//! Step-based simulation host: `force_graph` supplies the charge/spring physics, registered
//! [`SimulationForce`]s adjust the result every tick.

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::config::PhysicsConfig;
use super::forces::SimulationForce;
use super::types::{SimLink, SimNode};

const ALPHA_MIN: f64 = 0.001;

pub struct Simulation {
	graph: ForceGraph<usize, ()>,
	forces: Vec<(&'static str, Box<dyn SimulationForce>)>,
	alpha: f64,
	alpha_target: f64,
	alpha_decay: f64,
}

impl Simulation {
	pub fn new(nodes: &[SimNode], links: &[SimLink], physics: &PhysicsConfig) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: physics.force_charge,
			force_spring: physics.force_spring,
			force_max: physics.force_max,
			node_speed: physics.node_speed,
			damping_factor: physics.damping_factor,
		});

		let handles: Vec<DefaultNodeIdx> = nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				graph.add_node(NodeData {
					x: node.x as f32,
					y: node.y as f32,
					mass: physics.mass,
					is_anchor: node.is_fixed(),
					user_data: i,
				})
			})
			.collect();

		for link in links {
			if let (Some(&src), Some(&tgt)) = (handles.get(link.source), handles.get(link.target)) {
				graph.add_edge(src, tgt, EdgeData::default());
			}
		}

		Self {
			graph,
			forces: Vec::new(),
			alpha: 1.0,
			alpha_target: 0.0,
			alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
		}
	}

	/// Register a force under `name`, replacing any force already registered with it.
	pub fn add_force(
		&mut self,
		name: &'static str,
		mut force: Box<dyn SimulationForce>,
		nodes: &[SimNode],
	) {
		force.initialize(nodes);
		if let Some(slot) = self.forces.iter_mut().find(|(n, _)| *n == name) {
			slot.1 = force;
		} else {
			self.forces.push((name, force));
		}
	}

	/// True once alpha has cooled below the minimum; settled levels are not ticked.
	pub fn is_settled(&self) -> bool {
		self.alpha < ALPHA_MIN
	}

	/// Warm the simulation back up, e.g. after a drag.
	pub fn reheat(&mut self, alpha: f64) {
		self.alpha = self.alpha.max(alpha);
	}

	pub fn tick(&mut self, nodes: &mut [SimNode], dt: f32) {
		// pins
		self.graph.visit_nodes_mut(|n| {
			let Some(node) = nodes.get(n.data.user_data) else {
				return;
			};
			n.data.is_anchor = node.is_fixed();
			if let (Some(fx), Some(fy)) = (node.fx, node.fy) {
				n.data.x = fx as f32;
				n.data.y = fy as f32;
			}
		});

		self.graph.update(dt);

		self.graph.visit_nodes(|n| {
			if let Some(node) = nodes.get_mut(n.data.user_data) {
				node.vx = n.x() as f64 - node.x;
				node.vy = n.y() as f64 - node.y;
			}
		});

		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
		for (_, force) in &mut self.forces {
			force.force(nodes, self.alpha);
		}

		for node in nodes.iter_mut() {
			match (node.fx, node.fy) {
				(Some(fx), Some(fy)) => {
					node.x = fx;
					node.y = fy;
					node.vx = 0.0;
					node.vy = 0.0;
				}
				_ => {
					node.x += node.vx;
					node.y += node.vy;
				}
			}
		}

		self.graph.visit_nodes_mut(|n| {
			if let Some(node) = nodes.get(n.data.user_data) {
				n.data.x = node.x as f32;
				n.data.y = node.y as f32;
			}
		});
	}
}

#[cfg(test)]
mod tests {
	use super::super::forces::ForceClampToRadius;
	use super::*;

	fn ring(n: usize, radius: f64) -> Vec<SimNode> {
		(0..n)
			.map(|i| {
				let angle = i as f64 * std::f64::consts::TAU / n as f64;
				SimNode {
					index: i,
					x: radius * angle.cos(),
					y: radius * angle.sin(),
					r: 2.0,
					..Default::default()
				}
			})
			.collect()
	}

	#[test]
	fn alpha_decays_towards_zero() {
		let mut nodes = ring(3, 10.0);
		let mut sim = Simulation::new(&nodes, &[], &PhysicsConfig::default());
		let start = sim.alpha;
		for _ in 0..10 {
			sim.tick(&mut nodes, 0.016);
		}
		assert!(sim.alpha < start);
		assert!(sim.alpha > 0.0);
		assert!(!sim.is_settled());
	}

	#[test]
	fn fixed_nodes_stay_put() {
		let mut nodes = ring(4, 20.0);
		nodes[0].pin(3.0, -4.0);
		let mut sim = Simulation::new(&nodes, &[], &PhysicsConfig::default());
		for _ in 0..20 {
			sim.tick(&mut nodes, 0.016);
		}
		assert_eq!((nodes[0].x, nodes[0].y), (3.0, -4.0));
		assert_eq!((nodes[0].vx, nodes[0].vy), (0.0, 0.0));
	}

	#[test]
	fn clamp_force_keeps_nodes_inside() {
		let mut nodes = ring(6, 5.0);
		let mut sim = Simulation::new(&nodes, &[], &PhysicsConfig::default());
		sim.add_force("clamp", Box::new(ForceClampToRadius::new(8.0)), &nodes);
		for _ in 0..60 {
			sim.tick(&mut nodes, 0.016);
			for node in &nodes {
				assert!(node.x.hypot(node.y) <= 8.0 + 1e-6);
			}
		}
	}

	#[test]
	fn forces_are_replaced_by_name() {
		let nodes = ring(2, 5.0);
		let mut sim = Simulation::new(&nodes, &[], &PhysicsConfig::default());
		sim.add_force("clamp", Box::new(ForceClampToRadius::new(8.0)), &nodes);
		sim.add_force("clamp", Box::new(ForceClampToRadius::new(4.0)), &nodes);
		sim.add_force("other", Box::new(ForceClampToRadius::new(2.0)), &nodes);
		let names: Vec<_> = sim.forces.iter().map(|(n, _)| *n).collect();
		assert_eq!(names, ["clamp", "other"]);
	}
}
