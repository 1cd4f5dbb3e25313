use std::fs;
use std::path::Path;

use irisgate::{IntroOpts, IntroSession};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opts = IntroOpts {
        width: 640,
        height: 360,
        particle_count: 48,
        ..IntroOpts::default()
    };
    let mut session = IntroSession::new(opts)?;
    session.on_eye_opened(|| println!("eye opened"));
    session.on_zoom_complete(|| println!("zoom complete"));

    // Play at 60 fps; keep a frame from the middle of the dolly zoom.
    let mut shot = None;
    for k in 0u64.. {
        let t = k as f64 * 1000.0 / 60.0;
        let tick = session.tick(t)?;
        if t >= 5000.0 && shot.is_none() {
            shot = Some(tick.frame);
        }
        if tick.done {
            break;
        }
    }
    let Some(frame) = shot else {
        anyhow::bail!("run ended before the capture timestamp");
    };

    let out_dir = Path::new("target/irisgate_examples");
    fs::create_dir_all(out_dir)?;
    let out_path = out_dir.join("intro_5000ms.png");

    let straight = frame.straight_alpha_data();
    let img = image::RgbaImage::from_raw(frame.width, frame.height, straight)
        .ok_or_else(|| anyhow::anyhow!("invalid rgba buffer size"))?;
    img.save(&out_path)?;

    eprintln!("wrote {}", out_path.display());
    Ok(())
}
