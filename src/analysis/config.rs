use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::thread;

use smol_str::SmolStr;

use super::ImplError;
use crate::project::WalkOptions;

/// Slots in the bounded symbol channel between collectors and the aggregator.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Target interface given as `packageName.InterfaceName`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterfaceName {
    package: SmolStr,
    name: SmolStr,
}

impl InterfaceName {
    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for InterfaceName {
    type Err = ImplError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((package, name)) if !package.is_empty() && !name.is_empty() && !name.contains('.') => {
                Ok(Self {
                    package: package.into(),
                    name: name.into(),
                })
            }
            _ => Err(ImplError::usage(format!(
                "invalid interface {:?}: must be in format packageName.interfaceName",
                s
            ))),
        }
    }
}

impl fmt::Display for InterfaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.package, self.name)
    }
}

/// Everything one query needs, built once and passed by reference.
#[derive(Debug, Clone)]
pub struct Config {
    /// File or directory to analyse.
    pub root: PathBuf,
    pub interface: InterfaceName,
    /// Report concrete implementers only.
    pub concrete_only: bool,
    pub walk: WalkOptions,
    /// Collector threads; at least one is always used.
    pub workers: usize,
    pub channel_capacity: usize,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>, interface: InterfaceName) -> Self {
        Self {
            root: root.into(),
            interface,
            concrete_only: false,
            walk: WalkOptions::default(),
            workers: default_workers(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_concrete_only(mut self, concrete_only: bool) -> Self {
        self.concrete_only = concrete_only;
        self
    }

    pub fn with_walk(mut self, walk: WalkOptions) -> Self {
        self.walk = walk;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

fn default_workers() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_name_parses() {
        let name: InterfaceName = "testpkg.Foo".parse().unwrap();
        assert_eq!(name.package(), "testpkg");
        assert_eq!(name.name(), "Foo");
        assert_eq!(name.to_string(), "testpkg.Foo");
    }

    #[test]
    fn test_interface_name_rejects_bad_syntax() {
        for bad in ["Foo", "a.b.c", ".Foo", "pkg.", ""] {
            let err = bad.parse::<InterfaceName>().unwrap_err();
            assert!(matches!(err, ImplError::Usage(_)), "{bad}");
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::new("internal", "p.I".parse().unwrap()).with_workers(0);
        assert_eq!(config.workers, 1);
        assert!(!config.concrete_only);
        assert!(config.walk.recursive);
        assert_eq!(config.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
    }
}
