//! Leptos component wrapping the recipe diagram canvas.
//!
//! The component owns one [`PlaybackScheduler`] and one timer callback for its
//! whole lifetime. Changing the tree, direction, algorithm or mode restarts
//! playback from an empty diagram; the previous run's pending timeout is
//! cleared before the new run is scheduled. A `requestAnimationFrame` loop
//! re-lays out the visible graph whenever the scheduler's revision moves and
//! redraws it every frame.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::DiagramState;
use super::theme::Theme;
use super::timer::Timeout;
use crate::graph::{Strategy, TraversalEvent, traversal_events};
use crate::layout::{Direction, LayeredLayout};
use crate::playback::{PlaybackMode, PlaybackScheduler, RunToken, Tick};
use crate::recipe::RecipeNode;

type Callback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Scheduler plus the timer driving its current live run.
struct Playback {
	scheduler: PlaybackScheduler,
	token: Option<RunToken>,
	timeout: Option<Timeout>,
}

impl Playback {
	fn new() -> Self {
		Self {
			scheduler: PlaybackScheduler::default(),
			token: None,
			timeout: None,
		}
	}

	fn restart(
		&mut self,
		events: Vec<TraversalEvent>,
		mode: PlaybackMode,
		interval_ms: u32,
		tick: &Closure<dyn FnMut()>,
	) {
		// Clears the superseded run's pending timeout.
		self.timeout = None;
		self.token = self.scheduler.start(events, mode, interval_ms);
		if self.token.is_some() {
			self.arm(Timeout::set(tick, self.scheduler.interval_ms()));
		}
	}

	/// Keeps the pending timeout, or stops the run if none could be set.
	fn arm(&mut self, timeout: Option<Timeout>) {
		if timeout.is_none() {
			warn!("recipe-flow: could not schedule the next step, stopping playback");
			self.scheduler.stop();
			self.token = None;
		}
		self.timeout = timeout;
	}

	fn advance(&mut self, tick: &Closure<dyn FnMut()>) {
		self.timeout = None;
		let Some(token) = self.token else {
			return;
		};
		match self.scheduler.tick(token) {
			Tick::Stale => debug!("recipe-flow: ignored tick from a cancelled run"),
			Tick::Continue { delay_ms } => self.arm(Timeout::set(tick, delay_ms)),
			Tick::Finished => {
				self.token = None;
				let (applied, _) = self.scheduler.progress();
				info!("recipe-flow: playback finished after {} steps", applied);
			}
		}
	}
}

fn viewport(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Renders a recipe tree as a layered diagram, revealed in traversal order.
///
/// In live mode one node or edge appears per `interval_ms`; instant mode shows
/// the whole diagram at once. Drag the background to pan and scroll to zoom.
/// The diagram fits itself to the canvas until the user pans or zooms.
#[component]
pub fn RecipeFlow(
	#[prop(into)] tree: Signal<Option<RecipeNode>>,
	#[prop(into)] direction: Signal<Direction>,
	#[prop(into)] strategy: Signal<Strategy>,
	#[prop(into)] mode: Signal<PlaybackMode>,
	#[prop(into)] interval_ms: Signal<u32>,
	#[prop(default = None)] theme: Option<Theme>,
	#[prop(default = false)] fullscreen: bool,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let diagram = Rc::new(RefCell::new(DiagramState::new(800.0, 600.0)));
	let playback = Rc::new(RefCell::new(Playback::new()));
	let tick: Callback = Rc::new(RefCell::new(None));
	let animate: Callback = Rc::new(RefCell::new(None));
	let resize_cb: Callback = Rc::new(RefCell::new(None));
	let progress = RwSignal::new((0_usize, 0_usize));
	let theme = theme.unwrap_or_default();

	let (playback_tick, tick_inner) = (playback.clone(), tick.clone());
	*tick.borrow_mut() = Some(Closure::new(move || {
		if let Some(ref cb) = *tick_inner.borrow() {
			let mut pb = playback_tick.borrow_mut();
			pb.advance(cb);
			progress.set(pb.scheduler.progress());
		}
	}));

	let (playback_run, tick_run, diagram_run) = (playback.clone(), tick.clone(), diagram.clone());
	Effect::new(move |_| {
		let tree = tree.get();
		let (direction, strategy, mode) = (direction.get(), strategy.get(), mode.get());
		let events = traversal_events(tree.as_ref(), strategy);
		info!(
			"recipe-flow: {} playback of {} ({} steps, {}, {})",
			mode,
			tree.as_ref().map_or("nothing", |t| t.name.as_str()),
			events.len(),
			strategy,
			direction
		);

		diagram_run.borrow_mut().restart(direction);
		if let Some(ref cb) = *tick_run.borrow() {
			let mut pb = playback_run.borrow_mut();
			pb.restart(events, mode, interval_ms.get_untracked(), cb);
			progress.set(pb.scheduler.progress());
		}
	});

	let playback_interval = playback.clone();
	Effect::new(move |_| {
		let ms = interval_ms.get();
		playback_interval.borrow_mut().scheduler.set_interval(ms);
	});

	let (diagram_init, playback_init) = (diagram.clone(), playback.clone());
	let (animate_init, resize_cb_init) = (animate.clone(), resize_cb.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			viewport(&window).unwrap_or((800.0, 600.0))
		} else {
			canvas
				.parent_element()
				.map(|p| (p.client_width() as f64, p.client_height() as f64))
				.unwrap_or((800.0, 600.0))
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		diagram_init.borrow_mut().resize(w, h);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				warn!("recipe-flow: canvas has no 2d context");
				return;
			}
		};

		if fullscreen {
			let (diagram_resize, canvas_resize) = (diagram_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(viewport) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				diagram_resize.borrow_mut().resize(nw, nh);
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let engine = LayeredLayout::default();
		let theme = theme.clone();
		let (diagram_anim, playback_anim, animate_inner) =
			(diagram_init.clone(), playback_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			{
				let (revision, snapshot) = {
					let pb = playback_anim.borrow();
					(pb.scheduler.revision(), pb.scheduler.snapshot())
				};
				let mut d = diagram_anim.borrow_mut();
				d.sync(revision, snapshot, &engine);
				render::render(&d, &ctx, &theme);
			}
			if let (Some(window), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let local_point = move |ev: &MouseEvent| -> Option<(f64, f64)> {
		let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
		let rect = canvas.get_bounding_client_rect();
		Some((
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	let diagram_md = diagram.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = local_point(&ev) {
			diagram_md.borrow_mut().begin_pan(x, y);
		}
	};

	let diagram_mm = diagram.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = local_point(&ev) {
			diagram_mm.borrow_mut().pan_to(x, y);
		}
	};

	let diagram_mu = diagram.clone();
	let on_mouseup = move |_: MouseEvent| diagram_mu.borrow_mut().end_pan();

	let diagram_ml = diagram.clone();
	let on_mouseleave = move |_: MouseEvent| diagram_ml.borrow_mut().end_pan();

	let diagram_wh = diagram.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = local_point(ev.as_ref()) {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			diagram_wh.borrow_mut().zoom_at(x, y, factor);
		}
	};

	view! {
		<div class="recipe-flow">
			<canvas
				node_ref=canvas_ref
				class="recipe-flow-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="playback-progress">
				{move || {
					let (applied, total) = progress.get();
					format!("{applied} / {total} steps revealed")
				}}
			</div>
		</div>
	}
}
