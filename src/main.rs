//! Septic Surfer entry point
//!
//! On the web the library's start hook does the setup and the page drives
//! the frame loop. Natively this plays a seeded headless run on autopilot.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use septic_surfer::Tuning;
    use septic_surfer::consts::TARGET_FRAME_MS;
    use septic_surfer::persistence::MemoryStorage;
    use septic_surfer::sim::{GameEvent, GamePhase, Session, Viewport};
    use septic_surfer::telegram::NullNotifier;

    septic_surfer::platform::init_logging();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::load_or_default(&json),
            Err(e) => {
                log::warn!("Could not read {path}: {e}, using default tuning");
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };
    log::info!("Septic Surfer (native) headless run, seed {seed}");

    let mut session = Session::new(
        seed,
        Viewport::new(800.0, 600.0),
        tuning,
        Box::new(MemoryStorage::new()),
        Box::new(NullNotifier),
    );
    session.set_autopilot(true);
    session.start();

    // Ten minutes of 60 fps
    let max_frames = 60 * 60 * 10;
    // Frames are stepped at a fixed rate from the current wall clock
    let started = septic_surfer::platform::now_ms();
    let mut now = started;
    let mut jumps = 0;
    for _ in 0..max_frames {
        now += f64::from(TARGET_FRAME_MS);
        for event in session.advance(now, TARGET_FRAME_MS) {
            match event {
                GameEvent::Jumped | GameEvent::DoubleJumped => jumps += 1,
                GameEvent::GameOver { .. } => log::info!("{event:?}"),
                _ => {}
            }
        }
        if session.phase() == GamePhase::GameOver {
            break;
        }
    }

    let state = session.state();
    println!(
        "seed {seed}: score {} | {:.0} m | level {} | {jumps} jumps | {:.1} s",
        state.score,
        state.distance,
        state.level,
        (now - started) / 1000.0
    );
    if let Some(message) = session.message() {
        println!("{} {} {}", message.emoji, message.title, message.text);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the library's start hook, this is just to satisfy the compiler
}
