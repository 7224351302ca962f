//! Headless session driver wiring the world, scheduler, autopilot and a renderer.

use std::time::Duration;

use anyhow::{Context, Result};
use snake_floors_core::{Command, Event, Rules, RunId, RunSummary, SessionPhase};
use snake_floors_rendering::{RenderingBackend, Scene};
use snake_floors_system_autopilot::Autopilot;
use snake_floors_system_scheduler::TickScheduler;
use snake_floors_world::{self as world, query, World};
use tracing::{debug, info};

/// Simulated wall-clock time between frames.
const FRAME: Duration = Duration::from_millis(16);

/// Parameters of a headless session.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HeadlessConfig {
    pub(crate) seed: u64,
    pub(crate) runs: u32,
    pub(crate) max_ticks: u64,
    pub(crate) frame_every: u64,
}

/// How a run came to an end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RunOutcome {
    GameOver,
    Halted,
    TickLimit,
}

/// Result of a single run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RunReport {
    pub(crate) run: RunId,
    pub(crate) outcome: RunOutcome,
    pub(crate) ticks: u64,
    pub(crate) summary: RunSummary,
}

/// Plays `config.runs` runs back to back, returning the banner and one report per run.
pub(crate) fn play<B: RenderingBackend>(
    rules: Rules,
    config: &HeadlessConfig,
    backend: &mut B,
) -> Result<(&'static str, Vec<RunReport>)> {
    let mut world = World::new(rules, config.seed).context("rules rejected by the world")?;
    let banner = query::welcome_banner(&world);
    let mut scheduler = TickScheduler::default();
    let autopilot = Autopilot;
    let mut reports = Vec::new();

    for index in 0..config.runs {
        let lifecycle = if index == 0 {
            Command::Start
        } else {
            Command::Restart
        };
        let mut events = Vec::new();
        world::apply(&mut world, lifecycle, &mut events);
        scheduler.handle(&events, Duration::ZERO);

        let report = play_run(&mut world, &mut scheduler, &autopilot, config, backend)?;
        info!(
            run = report.run.get(),
            ticks = report.ticks,
            score = report.summary.score,
            "run finished"
        );
        reports.push(report);
    }

    Ok((banner, reports))
}

fn play_run<B: RenderingBackend>(
    world: &mut World,
    scheduler: &mut TickScheduler,
    autopilot: &Autopilot,
    config: &HeadlessConfig,
    backend: &mut B,
) -> Result<RunReport> {
    let run = query::run(world);
    let mut ticks = 0;

    loop {
        match query::phase(world) {
            SessionPhase::GameOver => return Ok(report(world, run, RunOutcome::GameOver, ticks)),
            SessionPhase::Halted => return Ok(report(world, run, RunOutcome::Halted, ticks)),
            _ if ticks >= config.max_ticks => {
                return Ok(report(world, run, RunOutcome::TickLimit, ticks))
            }
            _ => {}
        }

        let mut commands = Vec::new();
        autopilot.handle(&query::snapshot(world), &mut commands);
        let mut events = Vec::new();
        for command in commands {
            world::apply(world, command, &mut events);
        }
        log_notable(&events);
        scheduler.handle(&events, FRAME);

        while ticks < config.max_ticks {
            let Some(tick) = scheduler.poll(query::tick_interval(world)) else {
                break;
            };
            let mut events = Vec::new();
            world::apply(world, tick, &mut events);
            log_notable(&events);
            scheduler.handle(&events, Duration::ZERO);
            ticks += 1;

            if config.frame_every > 0 && ticks % config.frame_every == 0 {
                let scene = Scene::from_snapshot(&query::snapshot(world))
                    .context("failed to build scene")?;
                backend.present(&scene)?;
            }
        }
    }
}

fn report(world: &World, run: RunId, outcome: RunOutcome, ticks: u64) -> RunReport {
    RunReport {
        run,
        outcome,
        ticks,
        summary: query::summary(world),
    }
}

fn log_notable(events: &[Event]) {
    for event in events {
        match event {
            Event::FloorAdvanced { .. }
            | Event::UpgradeOffered { .. }
            | Event::AbilityAcquired { .. }
            | Event::AbilityActivated { .. }
            | Event::SnakeDied { .. }
            | Event::PowerUpTriggered { .. } => debug!(?event, "session event"),
            _ => {}
        }
    }
}
