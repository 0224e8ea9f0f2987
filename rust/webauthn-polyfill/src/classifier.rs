//! Named environment predicates describing which known browser gaps apply.
//!
//! Names follow the output of ua-parser-js 1.x, which is the parser the
//! browser binding consumes (`"Mac OS"`, not `"macOS"`).

use crate::environment::{EnvironmentDescriptor, EnvironmentError, UserAgentParser, Version};

/// OS name for iPhone and iPad.
pub const IOS: &str = "iOS";
/// OS name for desktop macOS.
pub const MAC_OS: &str = "Mac OS";
/// Chromium's rendering engine.
pub const BLINK: &str = "Blink";
/// Desktop Safari's browser name.
pub const SAFARI: &str = "Safari";

/// OS names on which a Blink version number refers to a desktop build.
pub const DESKTOP_OS_NAMES: [&str; 5] = [MAC_OS, "Windows", "Linux", "Chromium OS", "Ubuntu"];

const GLITCH_FROM: Version = Version::minor(17, 4);
const GLITCH_UNTIL: Version = Version::minor(18, 2);

/// Boolean facts about an environment, computed once from its descriptor.
///
/// Each field is a pure function of the descriptor. New gaps get new fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Predicates {
    /// iOS in `[17.4, 18.2)`, where `getClientCapabilities` reports
    /// `conditionalMediation` instead of `conditionalGet`.
    pub ios_17_4_to_18_2: bool,
    /// Desktop Safari in `[17.4, 18.2)`, with the same rename.
    pub safari_17_4_to_18_2: bool,
    /// iOS 18 or later.
    pub ios_18_or_later: bool,
    /// Blink 128 or later on a desktop OS.
    pub desktop_blink_128_or_later: bool,
    /// Blink 135 or later on a desktop OS.
    pub desktop_blink_135_or_later: bool,
}

impl Predicates {
    /// Classify a descriptor.
    pub fn classify(descriptor: &EnvironmentDescriptor) -> Self {
        let os = descriptor.os();
        let browser = descriptor.browser();
        let engine = descriptor.engine();
        let desktop = DESKTOP_OS_NAMES.contains(&os.name.as_str());

        let predicates = Self {
            ios_17_4_to_18_2: os.is_within(IOS, GLITCH_FROM, GLITCH_UNTIL),
            safari_17_4_to_18_2: os.name == MAC_OS
                && browser.is_within(SAFARI, GLITCH_FROM, GLITCH_UNTIL),
            ios_18_or_later: os.is_at_least(IOS, Version::major(18)),
            desktop_blink_128_or_later: desktop && engine.is_at_least(BLINK, Version::major(128)),
            desktop_blink_135_or_later: desktop && engine.is_at_least(BLINK, Version::major(135)),
        };

        tracing::debug!(
            environment = %descriptor,
            ios_17_4_to_18_2 = predicates.ios_17_4_to_18_2,
            safari_17_4_to_18_2 = predicates.safari_17_4_to_18_2,
            ios_18_or_later = predicates.ios_18_or_later,
            desktop_blink_128_or_later = predicates.desktop_blink_128_or_later,
            desktop_blink_135_or_later = predicates.desktop_blink_135_or_later,
            "classified environment"
        );

        predicates
    }

    /// Parse the given (or ambient) user agent and classify it.
    ///
    /// # Errors
    ///
    /// Fails if the parser cannot determine every name and version.
    pub fn detect<P>(parser: &P, user_agent: Option<&str>) -> Result<Self, EnvironmentError>
    where
        P: UserAgentParser + ?Sized,
    {
        Ok(Self::classify(&EnvironmentDescriptor::detect(
            parser, user_agent,
        )?))
    }

    /// Whether the native `getClientCapabilities` is known to report the
    /// pre-final field name.
    pub fn in_glitch_window(&self) -> bool {
        self.ios_17_4_to_18_2 || self.safari_17_4_to_18_2
    }

    /// Whether conditional (passkey upgrade) creation is available.
    pub fn supports_conditional_create(&self) -> bool {
        self.ios_18_or_later || self.desktop_blink_135_or_later
    }

    /// Whether related origin requests are available.
    pub fn supports_related_origins(&self) -> bool {
        self.ios_18_or_later || self.desktop_blink_128_or_later
    }
}
