//! Timer behavior, alone and inside a session tick.

use std::{cell::Cell, rc::Rc};

use spindash::prelude::*;

use crate::{fixture, init_logger};

#[test]
fn test_simultaneous_timers_fire_once_each() {
	let mut timers: TimerManager<Vec<&'static str>> = TimerManager::new();
	timers.register(Timer::new("left", TimerKind::Camera, 2, |log: &mut Vec<&'static str>| {
		log.push("left");
		Ok(())
	}));
	timers.register(Timer::new("right", TimerKind::Gameplay, 2, |log: &mut Vec<&'static str>| {
		log.push("right");
		Ok(())
	}));

	let mut log = Vec::new();
	assert!(timers.tick(&mut log).fired.is_empty());
	let report = timers.tick(&mut log);

	assert_eq!(report.fired.len(), 2);
	log.sort_unstable();
	assert_eq!(log, vec!["left", "right"]);
	assert!(timers.is_empty());
}

#[test]
fn test_reregistering_replaces_timer() {
	let fired = Rc::new(Cell::new(0));
	let mut timers: TimerManager<()> = TimerManager::new();

	let old = Rc::clone(&fired);
	timers.register(Timer::new("X", TimerKind::Other, 2, move |_: &mut ()| {
		old.set(old.get() + 1);
		Ok(())
	}));
	let new = Rc::clone(&fired);
	timers.register(Timer::new("X", TimerKind::Other, 5, move |_: &mut ()| {
		new.set(new.get() + 10);
		Ok(())
	}));

	assert_eq!(timers.lookup("X").map(Timer::remaining), Some(5));
	for _ in 0..5 {
		timers.tick(&mut ());
	}
	assert_eq!(fired.get(), 10);
}

#[test]
fn test_timer_runs_before_animation_advance() {
	init_logger();
	let mut session = fixture::session();
	session.register_timer(Timer::new("roll", TimerKind::Animation, 1, |world: &mut World| {
		world.set_animation("sonic", "roll")?;
		Ok(())
	}));

	// roll shows each frame for one tick: the switch and the first advance
	// both happen in this tick
	session.tick();
	let sonic = session.world().sprite("sonic").unwrap();
	assert_eq!(sonic.animation().current(), Some("roll"));
	assert_eq!(sonic.animation().step(), 1);
}

#[test]
fn test_failed_timer_is_reported_and_dropped() {
	init_logger();
	let mut session = fixture::session();
	session.spawn(Sprite::monitor("monitor", 200, 112, Monitor::new(MonitorKind::Shield)));

	session.register_timer(Timer::new("bad-anim", TimerKind::Animation, 3, |world: &mut World| {
		world.set_animation("sonic", "fly")?;
		Ok(())
	}));
	session.register_timer(Timer::new("walk-in", TimerKind::Gameplay, 3, |world: &mut World| {
		world.sprite_mut("sonic").ok_or_else(|| TimerFailure::message("sonic is gone"))?.set_position(200, 112);
		Ok(())
	}));

	let mut reports = Vec::new();
	for _ in 0..3 {
		reports.push(session.tick());
	}
	let last = reports.pop().unwrap();
	assert_eq!(last.fired.len(), 2);
	assert_eq!(last.failures.len(), 1);
	assert_eq!(last.failures[0].code, "bad-anim");
	assert_eq!(last.failures[0].kind, TimerKind::Animation);
	assert!(session.timers().is_empty());

	let sonic = session.world().sprite("sonic").unwrap();
	let monitor = session.world().sprite("monitor").unwrap();
	assert!(sonic.overlaps(monitor));
	assert!(session.collide("monitor", "sonic").unwrap());
	assert!(session.world().player().shield);
	assert_eq!(session.world().len(), 1);
}
