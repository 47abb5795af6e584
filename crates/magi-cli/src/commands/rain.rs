//! Rain command: the matrix draw loop on a recording canvas

use anyhow::Result;
use magi_matrix::MatrixState;
use magi_render::DisplayList;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::path::Path;

pub fn run(path: Option<&Path>, width: u32, height: u32, ticks: u32) -> Result<()> {
    if width == 0 || height == 0 {
        anyhow::bail!("--width and --height must be positive");
    }
    let config = super::load_config(path)?;
    let font_size = config.matrix.font_size;

    let mut canvas = DisplayList::new(width, height);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
    let mut state = MatrixState::new(font_size, config.matrix.color, false, 1.0);
    state.resize(&mut canvas, width, height, &mut rng);

    for tick in 0..ticks {
        // only the final frame's glyphs are printed
        if tick + 1 == ticks {
            canvas.drain();
        }
        state.draw(&mut canvas, &mut rng);
    }

    for row in canvas.text_grid(font_size) {
        println!("{}", row.trim_end());
    }
    Ok(())
}
