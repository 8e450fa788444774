use std::path::PathBuf;
use std::str::FromStr;

use caustica::DebugMode;
use glam::{uvec2, UVec2};

use crate::scenes::SceneKind;

#[derive(Debug)]
pub struct Args {
    pub scene: SceneKind,
    pub size: UVec2,
    pub spp: u32,
    pub bounces: u32,
    pub frames: u32,
    pub photons: u32,
    pub denoiser: bool,
    pub debug: DebugMode,
    pub output: PathBuf,
}

impl Args {
    pub const USAGE: &'static str = "\
Usage: caustica-demo [--scene glass|cornell|instancing] [--size WxH]
                     [--spp N] [--bounces N] [--frames N] [--photons N]
                     [--denoiser on|off] [--debug MODE] [--output PATH]";

    /// Parses `--flag value` pairs; unknown flags are rejected.
    pub fn parse(
        args: impl IntoIterator<Item = String>,
    ) -> Result<Self, String> {
        let mut this = Self::default();
        let mut args = args.into_iter();

        while let Some(flag) = args.next() {
            let value = args
                .next()
                .ok_or_else(|| format!("missing value for `{flag}`"))?;

            match flag.as_str() {
                "--scene" => this.scene = value.parse()?,
                "--size" => this.size = parse_size(&value)?,
                "--spp" => this.spp = parse(&flag, &value)?,
                "--bounces" => this.bounces = parse(&flag, &value)?,
                "--frames" => this.frames = parse(&flag, &value)?,
                "--photons" => this.photons = parse(&flag, &value)?,
                "--denoiser" => this.denoiser = parse_switch(&value)?,
                "--debug" => this.debug = parse_debug_mode(&value)?,
                "--output" => this.output = value.into(),
                _ => return Err(format!("unknown flag `{flag}`")),
            }
        }

        Ok(this)
    }
}

impl Default for Args {
    fn default() -> Self {
        Self {
            scene: SceneKind::Glass,
            size: uvec2(512, 384),
            spp: 4,
            bounces: 6,
            frames: 8,
            photons: 65536,
            denoiser: true,
            debug: DebugMode::None,
            output: "caustica.png".into(),
        }
    }
}

fn parse<T>(flag: &str, value: &str) -> Result<T, String>
where
    T: FromStr,
{
    value
        .parse()
        .map_err(|_| format!("invalid value for `{flag}`: {value}"))
}

fn parse_size(value: &str) -> Result<UVec2, String> {
    let (width, height) = value
        .split_once('x')
        .ok_or_else(|| format!("invalid size: {value}"))?;

    Ok(uvec2(parse("--size", width)?, parse("--size", height)?))
}

fn parse_switch(value: &str) -> Result<bool, String> {
    match value {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(format!("expected `on` or `off`, got: {value}")),
    }
}

fn parse_debug_mode(value: &str) -> Result<DebugMode, String> {
    DebugMode::ALL
        .into_iter()
        .find(|mode| format!("{mode:?}").eq_ignore_ascii_case(value))
        .ok_or_else(|| format!("unknown debug mode: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Result<Args, String> {
        Args::parse(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn parse() {
        let args = args(&[
            "--scene",
            "cornell",
            "--size",
            "64x32",
            "--debug",
            "rayheatmap",
            "--denoiser",
            "off",
        ])
        .unwrap();

        assert_eq!(SceneKind::Cornell, args.scene);
        assert_eq!(uvec2(64, 32), args.size);
        assert_eq!(DebugMode::RayHeatmap, args.debug);
        assert!(!args.denoiser);
    }

    #[test]
    fn errors() {
        assert!(args(&["--spp"]).is_err());
        assert!(args(&["--spp", "many"]).is_err());
        assert!(args(&["--size", "64"]).is_err());
        assert!(args(&["--colour", "red"]).is_err());
    }
}
