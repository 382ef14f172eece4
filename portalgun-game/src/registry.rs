//! Resolving a strategy by built-in name or by location.
//!
//! Built-ins are matched by name. Anything else goes to a single loader hook,
//! which must validate what it loads against the [`Strategy`] shape before
//! handing it out.
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::strategy::{ClassicMorty, DescribedMorty, LazyMorty, Strategy, StrategyDescriptor};

#[derive(Debug, Error)]
pub enum StrategyLoadError {
    #[error("Morty module not found at {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read Morty module {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Morty module {} is not valid: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unable to load a Morty from {}: no entry has the name/description/keep shape", path.display())]
    NoCandidate { path: PathBuf },
}

/// Constructor for a built-in strategy.
pub type StrategyCtor = fn() -> Box<dyn Strategy>;

/// Entry in the built-in lookup table.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinStrategy {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub build: StrategyCtor,
}

impl BuiltinStrategy {
    fn matches(&self, requested: &str) -> bool {
        self.name.eq_ignore_ascii_case(requested)
            || self
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(requested))
    }
}

pub const BUILTINS: &[BuiltinStrategy] = &[
    BuiltinStrategy {
        name: "classic",
        aliases: &["classicmorty"],
        build: build_classic,
    },
    BuiltinStrategy {
        name: "lazy",
        aliases: &["lazymorty"],
        build: build_lazy,
    },
];

fn build_classic() -> Box<dyn Strategy> {
    Box::new(ClassicMorty)
}

fn build_lazy() -> Box<dyn Strategy> {
    Box::new(LazyMorty)
}

/// Hook for strategies that are not built in.
pub trait StrategyLoader {
    /// Load and validate the strategy found at `location`.
    ///
    /// # Errors
    ///
    /// Returns an error when nothing of the right shape can be loaded.
    fn load(&self, location: &str) -> Result<Box<dyn Strategy>, StrategyLoadError>;
}

/// Loads JSON strategy descriptors from disk.
///
/// A file holds one descriptor or an array of candidates; the first
/// candidate with the descriptor shape wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptorLoader;

impl DescriptorLoader {
    /// # Errors
    ///
    /// Returns an error when the text is not JSON or holds no usable descriptor.
    pub fn parse(path: &Path, text: &str) -> Result<StrategyDescriptor, StrategyLoadError> {
        let value: Value =
            serde_json::from_str(text).map_err(|source| StrategyLoadError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        match value {
            Value::Array(candidates) => candidates
                .into_iter()
                .find_map(|candidate| serde_json::from_value(candidate).ok())
                .ok_or_else(|| StrategyLoadError::NoCandidate {
                    path: path.to_path_buf(),
                }),
            Value::Object(_) => {
                serde_json::from_value(value).map_err(|source| StrategyLoadError::Malformed {
                    path: path.to_path_buf(),
                    source,
                })
            }
            _ => Err(StrategyLoadError::NoCandidate {
                path: path.to_path_buf(),
            }),
        }
    }
}

impl StrategyLoader for DescriptorLoader {
    fn load(&self, location: &str) -> Result<Box<dyn Strategy>, StrategyLoadError> {
        let path = Path::new(location);
        let resolved = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if !resolved.is_file() {
            return Err(StrategyLoadError::NotFound { path: resolved });
        }
        let text = fs::read_to_string(&resolved).map_err(|source| StrategyLoadError::Read {
            path: resolved.clone(),
            source,
        })?;
        let descriptor = Self::parse(&resolved, &text)?;
        log::info!(
            "loaded strategy {:?} from {}",
            descriptor.name,
            resolved.display()
        );
        Ok(Box::new(DescribedMorty::new(descriptor)))
    }
}

/// Name-to-strategy lookup: built-ins first, then the loader hook.
#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry<L = DescriptorLoader> {
    loader: L,
}

impl StrategyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: StrategyLoader> StrategyRegistry<L> {
    pub const fn with_loader(loader: L) -> Self {
        Self { loader }
    }

    #[must_use]
    pub const fn builtins(&self) -> &'static [BuiltinStrategy] {
        BUILTINS
    }

    /// Resolve a built-in name (case-insensitive) or hand the value to the loader.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when the name is not built in and cannot be loaded.
    pub fn resolve(&self, name_or_location: &str) -> Result<Box<dyn Strategy>, StrategyLoadError> {
        let requested = name_or_location.trim();
        if let Some(builtin) = BUILTINS.iter().find(|b| b.matches(requested)) {
            log::debug!("resolved built-in strategy {}", builtin.name);
            return Ok((builtin.build)());
        }
        self.loader.load(requested)
    }
}
