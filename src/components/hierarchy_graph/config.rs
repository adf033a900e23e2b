/// Physics parameters handed to `force_graph` for one simulation level.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
	pub force_charge: f32,
	pub force_spring: f32,
	pub force_max: f32,
	pub node_speed: f32,
	pub damping_factor: f32,
	pub mass: f32,
}

impl Default for PhysicsConfig {
	fn default() -> Self {
		Self {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			mass: 10.0,
		}
	}
}

/// Layout and rendering knobs for a [`HierarchyGraph`](super::HierarchyGraph).
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	pub physics: PhysicsConfig,
	/// Physics inside a parent; weaker so members settle within the boundary.
	pub subgraph_physics: PhysicsConfig,
	pub node_radius: f64,
	pub parent_link_node_radius: f64,
	/// Extra room around each member when sizing a parent.
	pub parent_padding: f64,
	/// Parent area as a multiple of its members' padded area.
	pub parent_area_scale: f64,
	/// Radius of the circle nodes start on.
	pub initial_spread: f64,
	/// Hit-test radius in world units.
	pub hit_radius: f64,
	pub dot_distance: f64,
	/// Sub node labels hide below this zoom level.
	pub label_occlusion_zoom: f64,
	pub tick_dt: f32,
	pub min_zoom: f64,
	pub max_zoom: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			physics: PhysicsConfig::default(),
			subgraph_physics: PhysicsConfig {
				force_charge: 40.0,
				force_spring: 0.08,
				force_max: 40.0,
				node_speed: 1500.0,
				..PhysicsConfig::default()
			},
			node_radius: 5.0,
			parent_link_node_radius: 2.0,
			parent_padding: 6.0,
			parent_area_scale: 2.5,
			initial_spread: 100.0,
			hit_radius: 12.0,
			dot_distance: 40.0,
			label_occlusion_zoom: 0.8,
			tick_dt: 0.016,
			min_zoom: 0.1,
			max_zoom: 10.0,
		}
	}
}
