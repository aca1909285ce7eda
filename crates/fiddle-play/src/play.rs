//! The frame loop.

use std::{io, panic, time::Instant};

use anyhow::{Context, Result};
use color_backtrace::{BacktracePrinter, default_output_stream};
use crossterm::terminal;
use fiddle::{Expanse, Ui};
use scopeguard::guard;

use crate::{
    game::Game,
    hud,
    options::PlayOptions,
    term::{self, Keys, Screen, Session},
};

/// Run the playground until the user quits.
pub fn run(opts: &PlayOptions) -> Result<()> {
    let mut session = Session::start().context("setting up terminal")?;
    let enhanced = session.enhanced();

    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |pi| {
        drop(term::restore(&mut io::stdout(), enhanced));
        drop(BacktracePrinter::new().print_panic_info(pi, &mut default_output_stream()));
    }));
    let _hook = guard(previous, |hook| {
        panic::set_hook(hook);
    });

    let mut screen = Screen::new(io::stdout());
    let mut keys = Keys::new(enhanced);
    let mut ui = Ui::new();
    let mut game = Game::new(opts.split);
    let budget = opts.frame_time();
    tracing::info!(fps = opts.fps, split = opts.split, enhanced, "playground started");

    let mut last = Instant::now();
    while keys.poll_until(last + budget)? {
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;
        game.update(&keys.sample(now), dt);

        let (w, h) = terminal::size()?;
        match hud::build(&mut ui, &game, Expanse::new(w.into(), h.into())) {
            Ok(hud) => {
                game.camera.offset = term::view_center(hud.view);
                screen.draw(&game, &hud)?;
            }
            Err(e) => tracing::warn!(frame = ui.frame(), error = %e, "frame skipped"),
        }
    }

    tracing::info!(frames = ui.frame(), "playground stopped");
    session.stop()?;
    Ok(())
}
