//! Command-line configuration.

use std::path::PathBuf;

use grimoire_foundation::{Error, Result};

/// Options of the `grimoire` binary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Command files to run before the REPL starts.
    pub scripts: Vec<PathBuf>,
    /// Run the scripts and exit without starting the REPL.
    pub batch: bool,
    /// Snapshot to load at startup.
    pub load: Option<PathBuf>,
    /// Snapshot to write on exit.
    pub save: Option<PathBuf>,
    /// Owner selected at startup.
    pub owner: Option<String>,
    /// Row-key seed, for reproducible runs.
    pub seed: Option<u64>,
    /// Log filter, in `RUST_LOG` syntax.
    pub log: Option<String>,
    /// Print usage and exit.
    pub show_help: bool,
    /// Print the version and exit.
    pub show_version: bool,
}

impl RuntimeConfig {
    /// Parses arguments, skipping the program name.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown options, missing option values and
    /// unparsable seeds.
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter().map(Into::<String>::into).skip(1);

        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .ok_or_else(|| Error::command(format!("{name} requires a value")))
            };
            match arg.as_str() {
                "-h" | "--help" => config.show_help = true,
                "-V" | "--version" => config.show_version = true,
                "-b" | "--batch" => config.batch = true,
                "--load" => config.load = Some(PathBuf::from(value("--load")?)),
                "--save" => config.save = Some(PathBuf::from(value("--save")?)),
                "--owner" => config.owner = Some(value("--owner")?),
                "--log" => config.log = Some(value("--log")?),
                "--seed" => {
                    let seed = value("--seed")?;
                    config.seed = Some(
                        seed.parse()
                            .map_err(|_| Error::command(format!("invalid --seed value: {seed}")))?,
                    );
                }
                other if other.starts_with('-') => {
                    return Err(Error::command(format!("unknown option: {other}")));
                }
                path => config.scripts.push(PathBuf::from(path)),
            }
        }

        Ok(config)
    }
}
