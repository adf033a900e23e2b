use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, MouseEvent, WheelEvent, Window};

use super::class_names::ClassNames;
use super::config::LayoutConfig;
use super::dom::{ClassListSink, dot_grid};
use super::render::SvgScene;
use super::state::HierarchyGraphState;
use super::types::{GraphData, ZoomTransform};

/// How long `isZooming` stays on the root after the last wheel event.
const ZOOM_SETTLE_MS: f64 = 150.0;

type DrawGrid = Box<dyn Fn(&ZoomTransform)>;

fn local_point(container: &Element, ev: &MouseEvent) -> (f64, f64) {
	let rect = container.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Resizing moves the transform, so the dot grid offsets have to follow.
fn resize_and_redraw(
	state: &mut HierarchyGraphState,
	grid: Option<&DrawGrid>,
	width: f64,
	height: f64,
) {
	state.resize(width, height);
	if let Some(draw) = grid {
		draw(&state.transform);
	}
}

#[component]
pub fn HierarchyGraph(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(optional)] config: Option<LayoutConfig>,
	#[prop(optional)] width: Option<f64>,
	#[prop(optional)] height: Option<f64>,
) -> impl IntoView {
	let classes = use_context::<ClassNames>().unwrap_or_default();
	let config = config.unwrap_or_default();
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let state: Rc<RefCell<Option<HierarchyGraphState>>> = Rc::new(RefCell::new(None));
	let scene: Rc<RefCell<Option<SvgScene>>> = Rc::new(RefCell::new(None));
	let grid: Rc<RefCell<Option<DrawGrid>>> = Rc::new(RefCell::new(None));
	let zooming_since: Rc<Cell<Option<f64>>> = Rc::new(Cell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, scene_init, grid_init, animate_init, resize_cb_init) = (
		state.clone(),
		scene.clone(),
		grid.clone(),
		animate.clone(),
		resize_cb.clone(),
	);
	let zooming_anim = zooming_since.clone();

	// Runs again whenever `data` changes; the scene is rebuilt, the loops are reused.
	Effect::new(move |_| {
		let Some(container) = container_ref.get() else {
			return;
		};
		let container: HtmlElement = container.into();
		let Some(window) = web_sys::window() else {
			warn!("no window, graph not mounted");
			return;
		};
		let Some(document) = window.document() else {
			warn!("no document, graph not mounted");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| container.client_width() as f64),
				height.unwrap_or_else(|| container.client_height() as f64),
			)
		};

		let graph = HierarchyGraphState::new(&data.get(), config.clone(), &classes, w, h);
		if let Some(old) = scene_init.borrow_mut().take() {
			old.remove();
		}
		let Some(built) = SvgScene::new(&document, &container, &graph, classes) else {
			warn!("could not create svg elements");
			return;
		};
		let draw = dot_grid(container.clone(), config.dot_distance);
		draw(&graph.transform);
		*grid_init.borrow_mut() = Some(Box::new(draw));
		*scene_init.borrow_mut() = Some(built);
		*state_init.borrow_mut() = Some(graph);

		if fullscreen && resize_cb_init.borrow().is_none() {
			let (state_resize, grid_resize) = (state_init.clone(), grid_init.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					resize_and_redraw(s, grid_resize.borrow().as_ref(), nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		if animate_init.borrow().is_some() {
			return;
		}
		let (state_anim, scene_anim, animate_inner, zooming, root) = (
			state_init.clone(),
			scene_init.clone(),
			animate_init.clone(),
			zooming_anim.clone(),
			container.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			{
				let mut state = state_anim.borrow_mut();
				let mut scene = scene_anim.borrow_mut();
				if let (Some(s), Some(scene)) = (state.as_mut(), scene.as_mut()) {
					if s.animation_running {
						s.tick();
					}
					scene.update(s);
				}
			}
			if let Some(since) = zooming.get() {
				if js_sys::Date::now() - since > ZOOM_SETTLE_MS {
					root.remove_class(classes.is_zooming);
					zooming.set(None);
				}
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(container) = container_ref.get() else {
			return;
		};
		let (x, y) = local_point(&container, &ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let (state_mm, grid_mm) = (state.clone(), grid.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some(container) = container_ref.get() else {
			return;
		};
		let (x, y) = local_point(&container, &ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.pointer_move(x, y) {
				if let Some(draw) = grid_mm.borrow().as_ref() {
					draw(&s.transform);
				}
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
	};

	let (state_wh, grid_wh) = (state.clone(), grid.clone());
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(container) = container_ref.get() else {
			return;
		};
		let (x, y) = local_point(&container, &ev);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom_at(x, y, ev.delta_y());
			if let Some(draw) = grid_wh.borrow().as_ref() {
				draw(&s.transform);
			}
		}
		let root: HtmlElement = container.into();
		root.add_class(classes.is_zooming);
		zooming_since.set(Some(js_sys::Date::now()));
	};

	view! {
		<div
			node_ref=container_ref
			class=classes.graph_root
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="position: relative; width: 100%; height: 100%; overflow: hidden; cursor: grab;"
		/>
	}
}

#[cfg(test)]
mod tests {
	use super::super::class_names::CLASS_NAMES;
	use super::*;

	#[test]
	fn resize_redraws_the_grid_with_the_new_transform() {
		let mut state = HierarchyGraphState::new(
			&GraphData::default(),
			LayoutConfig::default(),
			&CLASS_NAMES,
			800.0,
			600.0,
		);
		let seen = Rc::new(RefCell::new(Vec::new()));
		let record = seen.clone();
		let grid: DrawGrid = Box::new(move |t: &ZoomTransform| record.borrow_mut().push(*t));

		resize_and_redraw(&mut state, Some(&grid), 1000.0, 500.0);
		assert_eq!(*seen.borrow(), vec![state.transform]);
		assert_eq!((state.transform.x, state.transform.y), (500.0, 250.0));

		resize_and_redraw(&mut state, None, 800.0, 600.0);
		assert_eq!(seen.borrow().len(), 1);
	}
}
