//! The browser environment a polyfill decision is made for.
//!
//! User-agent strings are not parsed here. An external [`UserAgentParser`]
//! produces a [`ParsedUserAgent`], and [`EnvironmentDescriptor::from_parsed`]
//! turns that into a descriptor in which every name and version is known.
//!
//! Engine and browser versions must be numeric. OS versions are kept as
//! reported (Linux reports its architecture, e.g. `x86_64`) and are only read
//! as numbers when compared.

mod version;

pub use version::*;

use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Which part of the environment a [`EnvironmentError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// The rendering engine (e.g. `Blink`, `WebKit`).
    Engine,
    /// The operating system (e.g. `iOS`, `Mac OS`).
    Os,
    /// The browser (e.g. `Safari`, `Chrome`).
    Browser,
}

impl Display for Component {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Component::Engine => write!(f, "engine"),
            Component::Os => write!(f, "OS"),
            Component::Browser => write!(f, "browser"),
        }
    }
}

/// Errors constructing an [`EnvironmentDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvironmentError {
    /// The parser could not determine a name for the component.
    #[error("{0} name not found")]
    MissingName(Component),

    /// The parser could not determine a version for the component.
    #[error("{0} version not found")]
    MissingVersion(Component),

    /// The reported version is not a dotted sequence of numbers.
    #[error("{component} version is not numeric: {source}")]
    InvalidVersion {
        /// The component whose version failed to parse.
        component: Component,
        /// The underlying version parse failure.
        source: VersionError,
    },
}

/// A single name/version pair as reported by a user-agent parser. Either half
/// may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedComponent {
    /// The reported name, if any.
    pub name: Option<String>,
    /// The reported version text, if any.
    pub version: Option<String>,
}

impl ParsedComponent {
    /// A component with both halves present.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            version: Some(version.into()),
        }
    }
}

/// The raw output of a [`UserAgentParser`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedUserAgent {
    /// Rendering engine.
    pub engine: ParsedComponent,
    /// Operating system.
    pub os: ParsedComponent,
    /// Browser.
    pub browser: ParsedComponent,
}

/// An external user-agent parser.
///
/// When `user_agent` is `None` the parser reads the ambient runtime's own
/// user agent.
pub trait UserAgentParser {
    /// Parse the given (or ambient) user agent.
    fn parse(&self, user_agent: Option<&str>) -> ParsedUserAgent;
}

/// A named, versioned part of the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedVersion {
    /// Name exactly as the parser emitted it.
    pub name: String,
    /// Numeric version.
    pub version: Version,
}

impl NamedVersion {
    fn from_parsed(component: Component, parsed: ParsedComponent) -> Result<Self, EnvironmentError> {
        let name = parsed
            .name
            .filter(|name| !name.is_empty())
            .ok_or(EnvironmentError::MissingName(component))?;
        let version = parsed
            .version
            .filter(|version| !version.is_empty())
            .ok_or(EnvironmentError::MissingVersion(component))?;
        let version = version
            .parse()
            .map_err(|source| EnvironmentError::InvalidVersion { component, source })?;
        Ok(Self { name, version })
    }

    /// Whether this is `name` at a version in `[from, until)`.
    pub fn is_within(&self, name: &str, from: Version, until: Version) -> bool {
        self.name == name && self.version >= from && self.version < until
    }

    /// Whether this is `name` at `from` or later.
    pub fn is_at_least(&self, name: &str, from: Version) -> bool {
        self.name == name && self.version >= from
    }
}

impl Display for NamedVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// The operating system, with its version text as reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatingSystem {
    /// Name exactly as the parser emitted it.
    pub name: String,
    /// Version text exactly as the parser emitted it.
    pub version: String,
}

impl OperatingSystem {
    /// An OS with the given name and version text.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    fn from_parsed(parsed: ParsedComponent) -> Result<Self, EnvironmentError> {
        let name = parsed
            .name
            .filter(|name| !name.is_empty())
            .ok_or(EnvironmentError::MissingName(Component::Os))?;
        let version = parsed
            .version
            .filter(|version| !version.is_empty())
            .ok_or(EnvironmentError::MissingVersion(Component::Os))?;
        Ok(Self { name, version })
    }

    /// The version read as a number, or `None` if the text is not numeric.
    pub fn numeric_version(&self) -> Option<Version> {
        self.version.parse().ok()
    }

    /// Whether this is `name` at a numeric version in `[from, until)`.
    pub fn is_within(&self, name: &str, from: Version, until: Version) -> bool {
        self.name == name
            && self
                .numeric_version()
                .is_some_and(|version| version >= from && version < until)
    }

    /// Whether this is `name` at a numeric version of `from` or later.
    pub fn is_at_least(&self, name: &str, from: Version) -> bool {
        self.name == name && self.numeric_version().is_some_and(|version| version >= from)
    }
}

impl Display for OperatingSystem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// The engine, OS and browser a polyfill decision is made for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentDescriptor {
    engine: NamedVersion,
    os: OperatingSystem,
    browser: NamedVersion,
}

impl EnvironmentDescriptor {
    /// Build a descriptor from already-known parts.
    pub fn new(engine: NamedVersion, os: OperatingSystem, browser: NamedVersion) -> Self {
        Self {
            engine,
            os,
            browser,
        }
    }

    /// Parse `user_agent` (or the ambient user agent) with `parser`.
    ///
    /// # Errors
    ///
    /// Fails if any component lacks a name or a version, or if the engine or
    /// browser version is not numeric.
    pub fn detect<P>(parser: &P, user_agent: Option<&str>) -> Result<Self, EnvironmentError>
    where
        P: UserAgentParser + ?Sized,
    {
        Self::from_parsed(parser.parse(user_agent))
    }

    /// Convert parser output into a descriptor.
    ///
    /// # Errors
    ///
    /// Fails if any component lacks a name or a version, or if the engine or
    /// browser version is not numeric. Components are checked in browser,
    /// engine, OS order.
    pub fn from_parsed(parsed: ParsedUserAgent) -> Result<Self, EnvironmentError> {
        let browser = NamedVersion::from_parsed(Component::Browser, parsed.browser)?;
        let engine = NamedVersion::from_parsed(Component::Engine, parsed.engine)?;
        let os = OperatingSystem::from_parsed(parsed.os)?;
        Ok(Self::new(engine, os, browser))
    }

    /// The rendering engine.
    pub fn engine(&self) -> &NamedVersion {
        &self.engine
    }

    /// The operating system.
    pub fn os(&self) -> &OperatingSystem {
        &self.os
    }

    /// The browser.
    pub fn browser(&self) -> &NamedVersion {
        &self.browser
    }
}

impl Display for EnvironmentDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) on {}", self.browser, self.engine, self.os)
    }
}
