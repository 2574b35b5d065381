//! Circle Pop entry point
//!
//! The browser build starts from `circle_pop::web`. Natively this runs a
//! headless demo: a simulated player mashes the spacebar through one session,
//! the score is saved to a JSON leaderboard directory, and the top 5 printed.
//!
//! Usage: `circle-pop [NAME] [DATA_DIR]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Circle Pop (native demo) starting...");

    let mut args = std::env::args().skip(1);
    let name = args.next().unwrap_or_else(|| "Demo".to_string());
    let data_dir = args
        .next()
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::path::PathBuf::from("circle-pop-data"));

    if let Err(e) = demo::run(&name, &data_dir) {
        eprintln!("circle-pop: {}", e);
        std::process::exit(2);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::Path;
    use std::time::{SystemTime, UNIX_EPOCH};

    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use circle_pop::consts::TIMER_INTERVAL_MS;
    use circle_pop::highscores::format_age;
    use circle_pop::persistence::JsonDirBackend;
    use circle_pop::platform::ManualClock;
    use circle_pop::sim::SessionEvent;
    use circle_pop::{ConfigError, Game, Settings};

    /// Simulated player: presses between these gaps (ms)
    const PRESS_GAP_MS: std::ops::Range<f64> = 80.0..400.0;

    fn wall_clock_ms() -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }

    pub fn run(name: &str, data_dir: &Path) -> Result<(), ConfigError> {
        let settings_path = data_dir.join("settings.json");
        let settings = Settings::load_from(&settings_path);

        let seed = wall_clock_ms() as u64;
        let clock = ManualClock::new(0.0);
        let mut game = Game::new(
            settings,
            clock.clone(),
            Pcg32::seed_from_u64(seed),
            JsonDirBackend::new(data_dir),
            Vec2::new(800.0, 600.0),
        )?;
        let mut player = Pcg32::seed_from_u64(seed.rotate_left(17));

        println!(
            "Playing a {}s session as {}...",
            game.settings().duration_secs,
            name
        );

        let generation = game.session().generation();
        let mut next_press = 0.0;
        let mut now = 0.0;
        let mut next_report = 1000.0;
        let mut peak_particles = 0;

        'session: loop {
            // Presses that happened before this timer tick
            while next_press <= now {
                clock.set(next_press);
                game.hit(None);
                next_press += player.random_range(PRESS_GAP_MS);
            }

            clock.set(now);
            game.tick_for(generation, now);
            peak_particles = peak_particles.max(game.snapshot().count());

            if now >= next_report {
                let hud = game.hud();
                println!("  {}  presses {:>4}  rate {}", hud.time, hud.presses, hud.rate);
                next_report += 1000.0;
            }

            for event in game.drain_events() {
                if let SessionEvent::Finished(score) = event {
                    println!(
                        "Time up! {} presses in {}s (peak {} circles on screen)",
                        score.hit_count, score.duration_secs, peak_particles
                    );
                    break 'session;
                }
            }

            now += TIMER_INTERVAL_MS;
        }

        if let Some(rank) = game.potential_rank() {
            println!("That would place #{}", rank);
        }
        match game.save_score(name, wall_clock_ms()) {
            Ok(Some(rank)) => println!("Saved! Your rank: #{}", rank),
            Ok(None) => println!("Saved, but not in the top scores this time."),
            Err(e) => println!("Not saved: {}", e),
        }

        if let Err(e) = game.settings().save_to(&settings_path) {
            log::warn!("Could not save settings: {}", e);
        }

        let now = wall_clock_ms();
        let rows = game.leaderboard_rows();
        if rows.is_empty() {
            println!("No scores yet - be the first!");
        }
        let entries = game
            .leaderboard()
            .top_n(game.settings().duration_secs, rows.len());
        for (row, entry) in rows.iter().zip(&entries) {
            let trophy = if row.trophy { "*" } else { " " };
            println!(
                "{} {:>2}. {:<16} {:>5}  {}",
                trophy,
                row.rank,
                row.name,
                row.score,
                format_age(now, entry.timestamp)
            );
        }

        Ok(())
    }
}
