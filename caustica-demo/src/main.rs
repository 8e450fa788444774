mod args;
mod scenes;
mod shapes;

use std::env;
use std::process::ExitCode;

use caustica::{Engine, RenderSettings, TemporalDenoiser};
use log::info;

use self::args::Args;
use self::scenes::DemoParams;

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let args = match Args::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: {err}\n\n{}", Args::USAGE);
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> caustica::Result<()> {
    info!("Starting; args={args:?}");

    let mut engine = Engine::<DemoParams>::new();
    let camera = args.scene.build(&mut engine)?;

    let settings = RenderSettings::default()
        .with_samples_per_pixel(args.spp)
        .with_max_bounces(args.bounces)
        .with_photons(args.photons, 0.15)
        .with_denoiser(args.denoiser)
        .with_debug_mode(args.debug);

    let mut viewport = engine.create_viewport(args.size, camera, settings)?;

    viewport.set_denoiser(TemporalDenoiser::new().with_min_alpha(0.05));

    for _ in 0..args.frames.max(1) {
        let stats = engine.render(&mut viewport);

        info!(
            "Frame {} done; rays={}, photons={}, took={:?}",
            stats.frame, stats.rays, stats.photons.stored, stats.elapsed,
        );
    }

    viewport.save_png(&args.output)?;

    info!("Saved {}", args.output.display());

    Ok(())
}
