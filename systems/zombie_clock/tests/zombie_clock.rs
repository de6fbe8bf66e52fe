use std::time::Duration;

use zombie_rescue_core::{CellCoord, Command, Difficulty, Event, SessionLayout};
use zombie_rescue_system_zombie_clock::ZombieClock;
use zombie_rescue_world::{self as world, query, World};

fn frame(world: &mut World, clock: &mut ZombieClock, command: Command) -> Vec<Command> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    let mut commands = Vec::new();
    clock.handle(&events, query::phase(world), &mut commands);
    commands
}

fn hard_session() -> (World, ZombieClock, Vec<Event>) {
    let mut layout = SessionLayout::new(10, 10, CellCoord::new(1, 1));
    layout.difficulty = Difficulty::Hard;
    layout.zombies.push(CellCoord::new(8, 8));
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::LoadLayout { layout }, &mut events);
    (world, ZombieClock::default(), events)
}

#[test]
fn adopts_session_interval_on_start() {
    let (world, mut clock, events) = hard_session();
    let mut commands = Vec::new();
    clock.handle(&events, query::phase(&world), &mut commands);

    assert!(commands.is_empty());
    assert_eq!(clock.interval(), Duration::from_millis(200));
}

#[test]
fn first_tick_fires_when_grace_ends() {
    let (mut world, mut clock, events) = hard_session();
    let mut commands = Vec::new();
    clock.handle(&events, query::phase(&world), &mut commands);

    let during_grace = frame(
        &mut world,
        &mut clock,
        Command::Tick {
            dt: Duration::from_millis(2_000),
        },
    );
    assert!(during_grace.is_empty());

    let at_grace_end = frame(
        &mut world,
        &mut clock,
        Command::Tick {
            dt: Duration::from_millis(1_000),
        },
    );
    assert_eq!(at_grace_end, vec![Command::TickZombies]);
}

#[test]
fn emits_one_tick_per_interval() {
    let (mut world, mut clock, events) = hard_session();
    let mut commands = Vec::new();
    clock.handle(&events, query::phase(&world), &mut commands);
    let _ = frame(
        &mut world,
        &mut clock,
        Command::Tick {
            dt: Duration::from_secs(3),
        },
    );

    let short = frame(
        &mut world,
        &mut clock,
        Command::Tick {
            dt: Duration::from_millis(150),
        },
    );
    assert!(short.is_empty());

    let long = frame(
        &mut world,
        &mut clock,
        Command::Tick {
            dt: Duration::from_millis(450),
        },
    );
    assert_eq!(long, vec![Command::TickZombies; 3]);
}

#[test]
fn terminal_sessions_stop_the_clock() {
    let mut clock = ZombieClock::new(Duration::from_millis(100));
    let mut commands = Vec::new();
    clock.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_secs(1),
        }],
        zombie_rescue_core::SessionPhase::Won,
        &mut commands,
    );

    assert!(commands.is_empty());
}
