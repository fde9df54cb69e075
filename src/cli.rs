use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Flags that may be spelled with a single dash, e.g. `-config`
const SINGLE_DASH_FLAGS: &[&str] = &["config", "empty", "music", "version"];

#[derive(Parser, Debug, Default, Clone)]
#[command(name = "gomu")]
#[command(about = "Terminal music player")]
pub struct Args {
    /// Specify config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Open gomu with empty queue. Does not override previous queue
    #[arg(long)]
    pub empty: bool,

    /// Specify music directory
    #[arg(long, value_name = "PATH")]
    pub music: Option<PathBuf>,

    /// Print gomu version
    #[arg(long)]
    pub version: bool,
}

impl Args {
    /// Parse the process arguments, accepting single-dash long flags
    pub fn from_env() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }
}

/// Rewrite `-config`/`-config=x` style flags to their `--` form
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            if i == 0 {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            let Some(flag) = text.strip_prefix('-') else {
                return arg;
            };
            if flag.starts_with('-') {
                return arg;
            }
            let name = flag.split('=').next().unwrap_or(flag);
            if SINGLE_DASH_FLAGS.contains(&name) {
                OsString::from(format!("-{}", text))
            } else {
                arg
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::parse_from(normalize_args(args.iter().map(OsString::from)))
    }

    #[test]
    fn test_single_dash_flags() {
        let args = parse(&["gomu", "-config", "/tmp/c", "-empty", "-music=/tmp/m"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/c")));
        assert!(args.empty);
        assert_eq!(args.music, Some(PathBuf::from("/tmp/m")));
        assert!(!args.version);
    }

    #[test]
    fn test_double_dash_flags() {
        let args = parse(&["gomu", "--version"]);
        assert!(args.version);
    }

    #[test]
    fn test_values_left_alone() {
        let normalized = normalize_args(["gomu", "-config", "-empty"].map(OsString::from));
        assert_eq!(normalized[2], OsString::from("--empty"));
        let normalized = normalize_args(["gomu", "--config", "-x"].map(OsString::from));
        assert_eq!(normalized[2], OsString::from("-x"));
    }
}
