use std::collections::HashSet;

use pretty_assertions::assert_eq;
use recipe_flow::layout::layout_graph;
use recipe_flow::playback::{RunToken, Status, Tick};
use recipe_flow::{
	Direction, GraphEdge, GraphNode, LayeredLayout, PlaybackMode, PlaybackScheduler, RecipeGraph,
	RecipeNode, Reveal, Strategy, build_graph, traversal_events,
};

fn fixture() -> RecipeNode {
	RecipeNode::from_json(include_str!("fixtures/brick.json")).unwrap()
}

fn sets(graph: &RecipeGraph) -> (HashSet<GraphNode>, HashSet<GraphEdge>) {
	(
		graph.nodes.iter().cloned().collect(),
		graph.edges.iter().cloned().collect(),
	)
}

fn run_to_end(scheduler: &mut PlaybackScheduler, token: RunToken) -> usize {
	let mut ticks = 0;
	loop {
		ticks += 1;
		match scheduler.tick(token) {
			Tick::Continue { .. } => {}
			Tick::Finished => return ticks,
			Tick::Stale => panic!("run was cancelled"),
		}
	}
}

/// Due time and token of each scheduled tick, fired in due-time order.
struct FakeTimer {
	now: u64,
	queue: Vec<(u64, RunToken)>,
}

impl FakeTimer {
	fn new() -> Self {
		Self {
			now: 0,
			queue: Vec::new(),
		}
	}

	fn schedule(&mut self, delay_ms: u32, token: RunToken) {
		self.queue.push((self.now + delay_ms as u64, token));
	}

	fn advance_to(&mut self, t: u64) {
		self.now = t;
	}

	fn next(&mut self) -> Option<RunToken> {
		let i = (0..self.queue.len()).min_by_key(|&i| self.queue[i].0)?;
		let (due, token) = self.queue.remove(i);
		self.now = due;
		Some(token)
	}
}

#[test]
fn every_strategy_and_mode_reveals_the_built_graph() {
	let tree = fixture();
	let expected = sets(&build_graph(Some(&tree)));

	for strategy in [Strategy::Bfs, Strategy::Dfs] {
		let mut instant = PlaybackScheduler::default();
		instant.start(traversal_events(Some(&tree), strategy), PlaybackMode::Instant, 100);
		assert_eq!(sets(instant.visible()), expected, "{strategy} instant");

		let mut live = PlaybackScheduler::default();
		let token = live
			.start(traversal_events(Some(&tree), strategy), PlaybackMode::Live, 100)
			.unwrap();
		let total = live.progress().1;
		assert_eq!(run_to_end(&mut live, token), total);
		assert_eq!(sets(live.visible()), expected, "{strategy} live");
	}
}

#[test]
fn fixture_numbers_each_root_recipe() {
	let tree = fixture();
	let labels: Vec<String> = build_graph(Some(&tree))
		.edges
		.into_iter()
		.filter_map(|e| e.label.filter(|l| l.starts_with("Recipe ")))
		.collect();

	assert_eq!(tree.recipes.len(), 2);
	assert_eq!(labels, vec!["Recipe 1", "Recipe 2"]);
}

#[test]
fn restart_mid_run_matches_a_fresh_run() {
	let first = fixture();
	let second = RecipeNode::leaf("Brick")
		.with_recipe(RecipeNode::leaf("Mud"), RecipeNode::leaf("Fire"))
		.with_recipe(RecipeNode::leaf("Clay"), RecipeNode::leaf("Stone"));

	let mut restarted = PlaybackScheduler::default();
	let stale = restarted
		.start(traversal_events(Some(&first), Strategy::Bfs), PlaybackMode::Live, 500)
		.unwrap();
	for _ in 0..5 {
		restarted.tick(stale);
	}
	let token = restarted
		.start(traversal_events(Some(&second), Strategy::Dfs), PlaybackMode::Live, 500)
		.unwrap();
	assert!(restarted.visible().is_empty());
	assert_eq!(restarted.tick(stale), Tick::Stale);
	run_to_end(&mut restarted, token);

	let mut fresh = PlaybackScheduler::default();
	let token = fresh
		.start(traversal_events(Some(&second), Strategy::Dfs), PlaybackMode::Live, 500)
		.unwrap();
	run_to_end(&mut fresh, token);

	assert_eq!(restarted.visible(), fresh.visible());
}

#[test]
fn late_tick_from_superseded_run_never_reaches_visible_state() {
	let first = fixture();
	let second = RecipeNode::leaf("Steam")
		.with_recipe(RecipeNode::leaf("Water"), RecipeNode::leaf("Fire"));
	let second_events = traversal_events(Some(&second), Strategy::Bfs);
	let allowed: HashSet<Reveal> = second_events.iter().map(|e| e.reveal.clone()).collect();

	let mut scheduler = PlaybackScheduler::default();
	let mut timer = FakeTimer::new();

	let first_token = scheduler
		.start(traversal_events(Some(&first), Strategy::Bfs), PlaybackMode::Live, 500)
		.unwrap();
	timer.schedule(500, first_token);

	timer.advance_to(50);
	let second_token = scheduler.start(second_events, PlaybackMode::Live, 500).unwrap();
	timer.schedule(500, second_token);

	while let Some(token) = timer.next() {
		match scheduler.tick(token) {
			Tick::Stale => assert_eq!(token, first_token),
			Tick::Continue { delay_ms } => timer.schedule(delay_ms, token),
			Tick::Finished => {}
		}
		let visible = scheduler.visible();
		for node in &visible.nodes {
			assert!(allowed.contains(&Reveal::Node(node.clone())), "{}", node.label);
		}
		for edge in &visible.edges {
			assert!(allowed.contains(&Reveal::Edge(edge.clone())), "{}", edge.id);
		}
	}

	assert_eq!(scheduler.status(), Status::Idle);
	assert_eq!(sets(scheduler.visible()), sets(&build_graph(Some(&second))));
}

#[test]
fn stopping_twice_keeps_partial_progress() {
	let mut scheduler = PlaybackScheduler::default();
	let token = scheduler
		.start(traversal_events(Some(&fixture()), Strategy::Dfs), PlaybackMode::Live, 100)
		.unwrap();
	for _ in 0..4 {
		scheduler.tick(token);
	}

	assert!(scheduler.stop());
	let after_first = (scheduler.visible().clone(), scheduler.progress(), scheduler.revision());
	assert!(!scheduler.stop());
	assert_eq!(
		(scheduler.visible().clone(), scheduler.progress(), scheduler.revision()),
		after_first
	);
	assert_eq!(scheduler.visible().nodes.len() + scheduler.visible().edges.len(), 4);
}

#[test]
fn every_live_snapshot_can_be_laid_out() {
	let tree = fixture();
	let engine = LayeredLayout::default();

	for strategy in [Strategy::Bfs, Strategy::Dfs] {
		let mut scheduler = PlaybackScheduler::default();
		let token = scheduler
			.start(traversal_events(Some(&tree), strategy), PlaybackMode::Live, 10)
			.unwrap();
		loop {
			let tick = scheduler.tick(token);
			let snapshot = scheduler.snapshot();
			let positions = layout_graph(&engine, &snapshot, Direction::LeftRight).unwrap();
			assert_eq!(positions.len(), snapshot.nodes.len());
			if tick == Tick::Finished {
				break;
			}
		}
	}
}
