use leptos::prelude::*;

use crate::components::hierarchy_graph::{
	GraphData, GraphLink, GraphNode, HierarchyGraph, LayoutConfig, NetworkKind, TimeState,
};

const KINDS: [NetworkKind; 3] = [
	NetworkKind::Server,
	NetworkKind::Computer,
	NetworkKind::Software,
];
const TIMES: [TimeState; 3] = [TimeState::Future, TimeState::Present, TimeState::Past];

/// Generate a sample network: `groups` sites with a handful of hosts each, plus a few
/// standalone hosts. Hosts link inside their site and occasionally across sites.
fn generate_sample_data(groups: usize, standalone: usize) -> GraphData {
	let mut nodes = Vec::new();
	let mut links = Vec::new();

	for g in 0..groups {
		let site = format!("site-{g}");
		nodes.push(GraphNode {
			id: site.clone(),
			label: Some(format!("Site {g}")),
			..Default::default()
		});

		let hosts = 2 + (rand_simple(g) * 6.0) as usize;
		for h in 0..hosts {
			let seed = g * 31 + h;
			let id = format!("{site}-host-{h}");
			nodes.push(GraphNode {
				id: id.clone(),
				label: Some(format!("Host {g}.{h}")),
				parent: Some(site.clone()),
				kind: Some(KINDS[seed % KINDS.len()]),
				time: Some(TIMES[(rand_simple(seed) * 3.0) as usize % TIMES.len()]),
			});
			if h > 0 {
				let target = (rand_simple(seed + 7) * h as f64) as usize;
				links.push(GraphLink {
					source: id.clone(),
					target: format!("{site}-host-{target}"),
				});
			}
			// cross-site links get drawn through the parents' boundaries
			if g > 0 && rand_simple(seed + 13) < 0.2 {
				let other = (rand_simple(seed + 17) * g as f64) as usize;
				links.push(GraphLink {
					source: id,
					target: format!("site-{other}-host-0"),
				});
			}
		}
	}

	for s in 0..standalone {
		let id = format!("host-{s}");
		nodes.push(GraphNode {
			id: id.clone(),
			label: Some(format!("Host {s}")),
			kind: Some(KINDS[s % KINDS.len()]),
			time: Some(TimeState::Present),
			..Default::default()
		});
		if groups > 0 {
			let site = (rand_simple(s + 101) * groups as f64) as usize;
			links.push(GraphLink {
				source: id,
				target: format!("site-{site}"),
			});
		}
	}

	GraphData { nodes, links }
}

/// Six sites need more room than the default starting circle.
fn sample_config() -> LayoutConfig {
	LayoutConfig {
		initial_spread: 160.0,
		..LayoutConfig::default()
	}
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = Signal::derive(move || generate_sample_data(6, 4));
	let config = sample_config();

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<HierarchyGraph data=graph_data config=config fullscreen=true />
				<div class="graph-overlay">
					<h1>"Network Overview"</h1>
					<p class="subtitle">
						"Hover to preview connections. Click to select. Drag to move, scroll to zoom."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	#[test]
	fn sample_links_point_at_known_nodes() {
		let data = generate_sample_data(6, 4);
		let ids: HashSet<&str> = data.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids.len(), data.nodes.len());
		for link in &data.links {
			assert!(ids.contains(link.source.as_str()), "{}", link.source);
			assert!(ids.contains(link.target.as_str()), "{}", link.target);
		}
	}

	#[test]
	fn sample_config_only_widens_the_spread() {
		let config = sample_config();
		assert!(config.initial_spread > LayoutConfig::default().initial_spread);
		assert_eq!(
			LayoutConfig {
				initial_spread: LayoutConfig::default().initial_spread,
				..config
			},
			LayoutConfig::default()
		);
	}

	#[test]
	fn every_site_has_members() {
		let data = generate_sample_data(3, 0);
		for g in 0..3 {
			let site = format!("site-{g}");
			assert!(
				data.nodes
					.iter()
					.filter(|n| n.parent.as_deref() == Some(site.as_str()))
					.count() >= 2
			);
		}
	}
}
