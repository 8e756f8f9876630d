//! farmyard: small end-to-end demo for the npc behavior framework.
//!
//! Five characters share one walkable yard for a minute of simulated time:
//!
//! * a guard walking the fence line from an embedded waypoint CSV,
//! * three chickens roaming and pecking around their coop,
//! * a villager alternating between sitting and a short stroll.
//!
//! Set `RUST_LOG=debug` to see every state transition and path query.

mod yard;

use std::io::Cursor;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

use npc_behavior::{
    Agent, AgentBuilder, AnimationKind, AnimatorTrigger, ForagingConfig, ForagingState,
    IdleConfig, IdleState, PatrolState, RecordingAnimator, StateChange, Waypoint,
    load_waypoints_reader,
};
use npc_core::{AgentId, AgentRng, Frame, RandomSource, SimConfig, SimRng, StateId, Transform, Vec3};
use npc_movement::{MoverConfig, NavMover};
use npc_nav::NavigationService;
use npc_sim::{SimBuilder, SimObserver};

use yard::{SPACING, build_yard, cell};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:                   u64 = 42;
const FRAME_DELTA_SECS:       f32 = 0.1;
const SIM_SECS:               u64 = 60;
const OUTPUT_INTERVAL_FRAMES: u64 = 100; // one snapshot every 10 s

const GUARD:    AgentId = AgentId(0);
const VILLAGER: AgentId = AgentId(4);
const CHICKENS: [AgentId; 3] = [AgentId(1), AgentId(2), AgentId(3)];

// ── Guard route ───────────────────────────────────────────────────────────────

// Fence corners, counter-clockwise.  The guard looks outward at the two
// gate corners.
const ROUTE_CSV: &str = "\
x,y,z,wait_secs,rotate_on_arrival,yaw_deg\n\
-8,0,-8,1.5,true,180\n\
8,0,-8,0.5,false,\n\
8,0,8,2.0,true,0\n\
-8,0,8,0.5,false,\n\
";

// ── Observer ──────────────────────────────────────────────────────────────────

fn name_of(id: AgentId) -> &'static str {
    match id {
        GUARD    => "guard",
        VILLAGER => "villager",
        _        => "chicken",
    }
}

/// Prints transitions and periodic position tables.
#[derive(Default)]
struct FarmObserver {
    transitions: usize,
    snapshots:   usize,
}

impl SimObserver for FarmObserver {
    fn on_state_change(&mut self, frame: Frame, agent: &Agent, change: StateChange) {
        self.transitions += 1;
        println!(
            "  [{frame}] {:<8} {} -> {} ({})",
            name_of(agent.id()),
            change.from,
            change.to,
            agent.active_state().name(),
        );
    }

    fn on_snapshot(&mut self, frame: Frame, agents: &[Agent]) {
        self.snapshots += 1;
        println!("  [{frame}] snapshot");
        for agent in agents {
            let pos = agent.position().unwrap_or(Vec3::ZERO);
            println!(
                "      {:<8} {:<9} ({:>6.2}, {:>6.2})",
                name_of(agent.id()),
                agent.active_state().name(),
                pos.x,
                pos.z,
            );
        }
    }
}

// ── Agents ────────────────────────────────────────────────────────────────────

fn mover_at(nav: &Arc<dyn NavigationService>, start: Vec3, speed: f32) -> Result<NavMover> {
    let config = MoverConfig { speed, ..MoverConfig::default() };
    Ok(NavMover::new(nav.clone(), config, Transform::at(start))?)
}

fn guard(nav: &Arc<dyn NavigationService>, animator: RecordingAnimator) -> Result<Agent> {
    let route = load_waypoints_reader(Cursor::new(ROUTE_CSV))?;
    println!("Guard route: {} waypoints", route.len());

    Ok(AgentBuilder::new(GUARD)
        .state(PatrolState::new(route))
        .mover(Box::new(mover_at(nav, cell(0, 4), 2.5)?))
        .animator(Box::new(animator))
        .rng(Box::new(AgentRng::new(SEED, GUARD)))
        .priority(1)
        .build()?)
}

fn chicken(
    nav:      &Arc<dyn NavigationService>,
    id:       AgentId,
    coop:     Vec3,
    start:    Vec3,
    animator: RecordingAnimator,
) -> Result<Agent> {
    let config = ForagingConfig { roam_radius: 2.0 * SPACING, eat_secs_min: 1.0, eat_secs_max: 3.0 };
    Ok(AgentBuilder::new(id)
        .state(ForagingState::new(coop, config)?)
        .mover(Box::new(mover_at(nav, start, 1.5)?))
        .animator(Box::new(animator))
        .rng(Box::new(AgentRng::new(SEED, id)))
        .build()?)
}

/// Sits for 8 s, strolls for 20 s, repeat.
fn villager(nav: &Arc<dyn NavigationService>, animator: RecordingAnimator) -> Result<Agent> {
    let bench = cell(2, 4);
    let stroll = vec![
        Waypoint::new(bench).with_wait(1.0)?,
        Waypoint::new(cell(2, 1)),
        Waypoint::new(cell(6, 1)).with_wait(2.0)?.facing(0.0),
    ];

    Ok(AgentBuilder::new(VILLAGER)
        .state(IdleState::new(IdleConfig::new(AnimationKind::Sit, 1.0, 2.5))?) // StateId(0)
        .state(PatrolState::new(stroll))                                         // StateId(1)
        .transition_if(StateId(0), StateId(1), |g| g.time_in_state > 8.0)
        .transition_if(StateId(1), StateId(0), |g| g.time_in_state > 20.0)
        .mover(Box::new(mover_at(nav, bench, 1.2)?))
        .animator(Box::new(animator))
        .rng(Box::new(AgentRng::new(SEED, VILLAGER)))
        .build()?)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("=== farmyard: npc behavior demo ===");
    println!("Seed: {SEED}  |  {SIM_SECS} s at {FRAME_DELTA_SECS} s/frame");
    println!();

    // 1. Walkable yard.
    let graph = build_yard();
    println!("Yard: {} nodes, {} links", graph.node_count(), graph.edge_count());
    let nav: Arc<dyn NavigationService> = Arc::new(graph);

    // 2. Agents, each with an animator handle kept here for the summary.
    let animators: Vec<(AgentId, RecordingAnimator)> = std::iter::once(GUARD)
        .chain(CHICKENS)
        .chain(std::iter::once(VILLAGER))
        .map(|id| (id, RecordingAnimator::new()))
        .collect();
    let animator_of = |id: AgentId| {
        animators
            .iter()
            .find(|(a, _)| *a == id)
            .map(|(_, anim)| anim.clone())
            .unwrap_or_default()
    };

    let coop = cell(2, 6);
    let mut agents = vec![
        guard(&nav, animator_of(GUARD))?,
        villager(&nav, animator_of(VILLAGER))?,
    ];
    // Chickens start scattered within a metre of the coop.
    let mut spawn_rng = SimRng::new(SEED);
    for id in CHICKENS {
        let start = coop + (spawn_rng.inside_unit_sphere() * 0.5 * SPACING).flatten();
        agents.push(chicken(&nav, id, coop, start, animator_of(id))?);
    }

    // 3. Sim.
    let frames = (SIM_SECS as f32 / FRAME_DELTA_SECS).round() as u64;
    let config = SimConfig {
        frame_delta_secs:       FRAME_DELTA_SECS,
        total_frames:           frames,
        seed:                   SEED,
        output_interval_frames: OUTPUT_INTERVAL_FRAMES,
    };
    let mut sim = SimBuilder::new(config, nav).agents(agents).build()?;
    println!("Sim: {} agents, {frames} frames", sim.agents().len());
    println!();

    // 4. Run.
    let mut obs = FarmObserver::default();
    sim.initialize();
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();
    sim.dispose();

    // 5. Summary.
    println!();
    println!("Simulation complete in {:.3} ms", elapsed.as_secs_f64() * 1_000.0);
    println!("  transitions : {}", obs.transitions);
    println!("  snapshots   : {}", obs.snapshots);
    println!();

    println!("{:<10} {:<8} {:<9} {:>6} {:>6}", "Agent", "Name", "State", "Sits", "Meals");
    println!("{}", "-".repeat(43));
    for agent in sim.agents() {
        let log = animator_of(agent.id()).log();
        println!(
            "{:<10} {:<8} {:<9} {:>6} {:>6}",
            agent.id().to_string(),
            name_of(agent.id()),
            agent.active_state().name(),
            log.count(AnimatorTrigger::Sit),
            log.meals,
        );
    }

    Ok(())
}
