//! Turning layout state into DOM attributes. Everything that touches an element goes through the
//! sink traits so the layout core does not depend on `web_sys`.

use web_sys::{Document, Element, HtmlElement};

use super::geometry::def_num;
use super::types::{Datum, NodeOrLink, NodeType, SimNode, ZoomTransform};

pub const XMLNS: &str = "http://www.w3.org/2000/svg";

const ID_LABEL_SUFFIX: &str = "-label";

/// Receives inline style property writes.
pub trait StyleSink {
	fn set_style_property(&self, name: &str, value: &str);
}

/// Receives class list edits.
pub trait ClassListSink {
	fn add_class(&self, name: &str);
	fn remove_class(&self, name: &str);

	fn toggle_class(&self, name: &str, on: bool) {
		if on {
			self.add_class(name);
		} else {
			self.remove_class(name);
		}
	}
}

impl StyleSink for HtmlElement {
	fn set_style_property(&self, name: &str, value: &str) {
		let _ = self.style().set_property(name, value);
	}
}

impl ClassListSink for Element {
	fn add_class(&self, name: &str) {
		let _ = self.class_list().add_1(name);
	}

	fn remove_class(&self, name: &str) {
		let _ = self.class_list().remove_1(name);
	}
}

impl ClassListSink for HtmlElement {
	fn add_class(&self, name: &str) {
		let _ = self.class_list().add_1(name);
	}

	fn remove_class(&self, name: &str) {
		let _ = self.class_list().remove_1(name);
	}
}

pub fn create_svg_element(document: &Document, tag: &str) -> Option<Element> {
	document.create_element_ns(Some(XMLNS), tag).ok()
}

/// Scale and offset terms for [`translate_center`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TranslateCenter {
	/// Radius scale.
	pub rk: f64,
	/// Zoom scale.
	pub zk: f64,
	pub zx: f64,
	pub zy: f64,
	pub tx: f64,
	pub ty: f64,
}

impl Default for TranslateCenter {
	fn default() -> Self {
		Self {
			rk: 1.0,
			zk: 1.0,
			zx: 0.0,
			zy: 0.0,
			tx: 0.0,
			ty: 0.0,
		}
	}
}

pub fn translate_center(d: &SimNode, t: TranslateCenter) -> String {
	format!(
		"translate({}, {})",
		def_num(d.x) * t.rk * t.zk + t.zx + t.tx,
		def_num(d.y) * t.rk * t.zk + t.zy + t.ty,
	)
}

/// Swap the datum's previous class for its current one without reading the element's class list.
pub fn update_class_name(element: &impl ClassListSink, datum: &Datum) {
	if let Some(name) = datum.remove_class_name {
		element.remove_class(name);
	}
	if let Some(name) = datum.class_name {
		element.add_class(name);
	}
}

/// Parent-link nodes get no id.
pub fn assign_id<'a>(d: NodeOrLink<'a>) -> Option<&'a str> {
	match d {
		NodeOrLink::Node(node) if node.node_type == NodeType::ParentLinkNode => None,
		NodeOrLink::Node(node) => Some(&node.data.id),
		NodeOrLink::Link(link) => Some(&link.data.id),
	}
}

pub fn assign_id_label(d: NodeOrLink<'_>) -> Option<String> {
	assign_id(d).map(|id| format!("{id}{ID_LABEL_SUFFIX}"))
}

/// Dot-grid values for one transform. Spacing always lands in `[dot_distance, 2 * dot_distance)`
/// so the background density looks constant while zooming.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotGridStyle {
	pub spacing: f64,
	pub offset_x: f64,
	pub offset_y: f64,
	pub sub_opacity: f64,
}

impl DotGridStyle {
	pub fn compute(transform: &ZoomTransform, dot_distance: f64) -> Self {
		let round_down_to_power = 2f64.powf(transform.k.log2().floor());
		let spacing = (transform.k / round_down_to_power) * dot_distance;
		Self {
			spacing,
			offset_x: transform.x % spacing,
			offset_y: transform.y % spacing,
			sub_opacity: (spacing - dot_distance) / dot_distance,
		}
	}

	pub fn apply(&self, element: &impl StyleSink) {
		element.set_style_property("--dot-spacing", &format!("{}px", self.spacing));
		element.set_style_property("--dot-offset-x", &format!("{}px", self.offset_x));
		element.set_style_property("--dot-offset-y", &format!("{}px", self.offset_y));
		element.set_style_property("--dot-sub-opacity-multiplier", &self.sub_opacity.to_string());
	}
}

/// Returns a draw function that writes the dot-grid custom properties for a transform.
pub fn dot_grid<S: StyleSink>(element: S, dot_distance: f64) -> impl Fn(&ZoomTransform) {
	move |transform| DotGridStyle::compute(transform, dot_distance).apply(&element)
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use super::super::types::{SimLink, TimeState};
	use super::*;

	#[derive(Default)]
	struct Recorder {
		writes: RefCell<Vec<(String, String)>>,
	}

	impl StyleSink for Recorder {
		fn set_style_property(&self, name: &str, value: &str) {
			self.writes
				.borrow_mut()
				.push((name.to_string(), value.to_string()));
		}
	}

	impl ClassListSink for Recorder {
		fn add_class(&self, name: &str) {
			self.writes
				.borrow_mut()
				.push(("add".to_string(), name.to_string()));
		}

		fn remove_class(&self, name: &str) {
			self.writes
				.borrow_mut()
				.push(("remove".to_string(), name.to_string()));
		}
	}

	impl StyleSink for &Recorder {
		fn set_style_property(&self, name: &str, value: &str) {
			(**self).set_style_property(name, value);
		}
	}

	#[test]
	fn dot_spacing_stays_within_one_octave() {
		let distance = 40.0;
		for k in [0.1, 0.5, 1.0, 2.0, 3.9, 4.0, 100.0] {
			let style = DotGridStyle::compute(
				&ZoomTransform {
					x: 0.0,
					y: 0.0,
					k,
				},
				distance,
			);
			assert!(style.spacing >= distance, "k = {k}");
			assert!(style.spacing < 2.0 * distance, "k = {k}");
			assert!((0.0..1.0).contains(&style.sub_opacity), "k = {k}");
		}
	}

	#[test]
	fn dot_grid_writes_custom_properties() {
		let recorder = Recorder::default();
		let draw = dot_grid(&recorder, 40.0);
		draw(&ZoomTransform {
			x: 100.0,
			y: -30.0,
			k: 1.0,
		});
		let writes = recorder.writes.borrow();
		let expected = [
			("--dot-spacing", "40px"),
			("--dot-offset-x", "20px"),
			("--dot-offset-y", "-30px"),
			("--dot-sub-opacity-multiplier", "0"),
		];
		assert_eq!(writes.len(), expected.len());
		for ((name, value), (want_name, want_value)) in writes.iter().zip(expected) {
			assert_eq!(name, want_name);
			assert_eq!(value, want_value);
		}
	}

	#[test]
	fn translate_center_scales_then_offsets() {
		let node = SimNode {
			x: 10.0,
			y: f64::NAN,
			..Default::default()
		};
		let s = translate_center(
			&node,
			TranslateCenter {
				rk: 2.0,
				zk: 0.5,
				zx: 3.0,
				zy: 4.0,
				tx: 1.0,
				ty: -1.0,
			},
		);
		assert_eq!(s, "translate(14, 3)");
		assert_eq!(
			translate_center(&node, TranslateCenter::default()),
			"translate(10, 0)"
		);
	}

	#[test]
	fn update_class_name_swaps() {
		let recorder = Recorder::default();
		let mut datum = Datum {
			time: Some(TimeState::Past),
			..Default::default()
		};
		datum.set_class_name(Some("present"));
		datum.set_class_name(Some("past"));
		update_class_name(&recorder, &datum);
		let writes = recorder.writes.borrow();
		assert_eq!(
			*writes,
			vec![
				("remove".to_string(), "present".to_string()),
				("add".to_string(), "past".to_string()),
			]
		);
	}

	#[test]
	fn parent_link_nodes_have_no_id() {
		let mut node = SimNode::default();
		node.data.id = "host-1".into();
		assert_eq!(assign_id(NodeOrLink::Node(&node)), Some("host-1"));
		assert_eq!(
			assign_id_label(NodeOrLink::Node(&node)).as_deref(),
			Some("host-1-label")
		);

		node.node_type = NodeType::ParentLinkNode;
		assert_eq!(assign_id(NodeOrLink::Node(&node)), None);
		assert_eq!(assign_id_label(NodeOrLink::Node(&node)), None);

		let mut link = SimLink::default();
		link.data.id = "a--b".into();
		assert_eq!(assign_id(NodeOrLink::Link(&link)), Some("a--b"));
	}
}
