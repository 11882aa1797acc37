use anyhow::Context;
use ripple_core::{BackgroundImage, RippleParams};
use std::fs;
use std::path::{Path, PathBuf};

pub const USAGE: &str = "usage: ripple-native [--config <params.json>] [--background <image>]";

#[derive(Debug, Default, PartialEq)]
pub struct Options {
    pub config: Option<PathBuf>,
    pub background: Option<PathBuf>,
    pub help: bool,
}

pub fn parse_args<I>(args: I) -> anyhow::Result<Options>
where
    I: IntoIterator<Item = String>,
{
    let mut opts = Options::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let v = it.next().context("--config needs a file path")?;
                opts.config = Some(PathBuf::from(v));
            }
            "--background" | "-b" => {
                let v = it.next().context("--background needs an image path")?;
                opts.background = Some(PathBuf::from(v));
            }
            "--help" | "-h" => opts.help = true,
            other => anyhow::bail!("unknown argument '{}'\n{}", other, USAGE),
        }
    }
    Ok(opts)
}

/// Parse and validate a JSON parameter file. Missing fields keep their
/// defaults.
pub fn params_from_json(json: &str) -> anyhow::Result<RippleParams> {
    let params: RippleParams = serde_json::from_str(json)?;
    params.validate()?;
    Ok(params)
}

pub fn load_params(path: &Path) -> anyhow::Result<RippleParams> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let params =
        params_from_json(&data).with_context(|| format!("parsing {}", path.display()))?;
    log::info!("loaded parameters from {}", path.display());
    Ok(params)
}

pub fn load_background(path: &Path) -> anyhow::Result<BackgroundImage> {
    let img = image::open(path)
        .with_context(|| format!("opening {}", path.display()))?
        .to_rgba8();
    let (w, h) = img.dimensions();
    let bg = BackgroundImage::from_rgba8(w, h, img.into_raw())?;
    log::info!("background {} ({}x{})", path.display(), w, h);
    Ok(bg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_args_means_defaults() {
        assert_eq!(parse_args(args(&[])).unwrap(), Options::default());
    }

    #[test]
    fn config_and_background_paths() {
        let opts = parse_args(args(&["--config", "p.json", "-b", "sea.png"])).unwrap();
        assert_eq!(opts.config, Some(PathBuf::from("p.json")));
        assert_eq!(opts.background, Some(PathBuf::from("sea.png")));
        assert!(!opts.help);
    }

    #[test]
    fn missing_value_and_unknown_flag_fail() {
        assert!(parse_args(args(&["--config"])).is_err());
        assert!(parse_args(args(&["--speed", "2"])).is_err());
    }

    #[test]
    fn partial_json_overrides_only_listed_fields() {
        let p = params_from_json(r#"{ "specular_intensity": 0.5 }"#).unwrap();
        assert_eq!(p.specular_intensity, 0.5);
        assert_eq!(p.delta, RippleParams::default().delta);
    }

    #[test]
    fn invalid_json_params_are_rejected() {
        assert!(params_from_json(r#"{ "pressure_decay": 1.5 }"#).is_err());
        assert!(params_from_json(r#"{ "light_direction": [0.0, 0.0, 0.0] }"#).is_err());
        assert!(params_from_json("not json").is_err());
    }
}
