//! # Infinite Walk Integration Test
//!
//! Proves the viewer can travel forever while residency stays bounded.

use std::time::Duration;

use archipelago_procedural::streamer::Instant;
use archipelago_procedural::{ChunkCoord, WorldConfig, WorldSeed, WorldStreamer};

/// Test: Walk 200 chunks east with a cleanup on every step.
#[test]
fn test_long_walk_bounded_residency() {
    let config = WorldConfig::default();
    let chunk_px = config.chunk_size_px();
    let keep = config.keep_radius;
    let window = ((2 * keep + 1) * (2 * keep + 1)) as usize;

    let mut streamer = WorldStreamer::new(WorldSeed::new(42.0), config).unwrap();
    let start = Instant::now();
    let mut peak = 0usize;

    for step in 0..200u32 {
        let x = f64::from(step) * chunk_px + 0.5 * chunk_px;
        // three seconds per step, always past the cleanup interval
        let now = start + Duration::from_secs(u64::from(step) * 3);
        let update = streamer.update(x, 10.0, now);

        assert_eq!(update.center.x, i32::try_from(step).unwrap());
        peak = peak.max(streamer.stats().resident);
    }

    let stats = streamer.stats();
    println!("Generated total: {}", stats.generated_this_session);
    println!("Evicted total: {}", stats.evicted_this_session);
    println!("Peak residency: {peak}");

    assert!(peak <= window, "Residency {peak} exceeded keep window {window}");
    assert_eq!(
        stats.generated_this_session - stats.evicted_this_session,
        stats.resident as u64
    );
    assert!(streamer
        .cache()
        .coords()
        .all(|c| c.within(ChunkCoord::new(199, 0), keep)));
}

/// Test: Walk in a square spiral and check the load window is always resident.
#[test]
fn test_spiral_walk_coverage() {
    let config = WorldConfig::default().with_radii(1, 2);
    let chunk_px = config.chunk_size_px();
    let mut streamer = WorldStreamer::new(WorldSeed::new(12345.0), config).unwrap();
    let start = Instant::now();

    let (mut cx, mut cy) = (0i32, 0i32);
    let mut direction = 0; // 0=E, 1=S, 2=W, 3=N
    let mut leg_length = 1;
    let mut steps_in_leg = 0;
    let mut legs_completed = 0;

    for step in 0..120u64 {
        match direction {
            0 => cx += 1,
            1 => cy += 1,
            2 => cx -= 1,
            3 => cy -= 1,
            _ => unreachable!(),
        }

        steps_in_leg += 1;
        if steps_in_leg >= leg_length {
            steps_in_leg = 0;
            direction = (direction + 1) % 4;
            legs_completed += 1;
            if legs_completed % 2 == 0 {
                leg_length += 1;
            }
        }

        let now = start + Duration::from_millis(step * 500);
        let update = streamer.update(
            (f64::from(cx) + 0.5) * chunk_px,
            (f64::from(cy) + 0.5) * chunk_px,
            now,
        );
        assert_eq!(update.center, ChunkCoord::new(cx, cy));

        for dy in -1..=1 {
            for dx in -1..=1 {
                assert!(
                    streamer.cache().contains(ChunkCoord::new(cx + dx, cy + dy)),
                    "Hole in load window at step {step}"
                );
            }
        }
    }

    println!("Final position: ({cx}, {cy})");
    println!("Chunks resident: {}", streamer.stats().resident);
}

/// Test: Teleport far away and back; content is identical on return.
#[test]
fn test_teleport_round_trip() {
    let config = WorldConfig::default().with_radii(1, 1);
    let chunk_px = config.chunk_size_px();
    let mut streamer = WorldStreamer::new(WorldSeed::new(99999.0), config).unwrap();
    let start = Instant::now();

    streamer.update(0.0, 0.0, start);
    let before = streamer.visible();

    let far = 1_000_000.0 * chunk_px;
    streamer.update(far, -far, start + Duration::from_secs(3));
    assert!(!streamer.cache().contains(ChunkCoord::new(0, 0)), "Origin evicted");

    streamer.update(0.0, 0.0, start + Duration::from_secs(6));
    let after = streamer.visible();

    assert_eq!(before.len(), after.len());
    for (a, b) in before.iter().zip(&after) {
        assert_eq!(**a, **b, "Chunk {:?} changed after regeneration", a.coord());
    }
}
