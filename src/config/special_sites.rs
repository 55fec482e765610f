//! Per-domain policy resolution.
//!
//! Special sites (YouTube, Reddit, ...) answer automated clients with odd
//! status codes or near-empty shells. A URL is matched once against the
//! configured patterns and the resulting [`SitePolicy`] is consulted by every
//! checking stage.

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};

use crate::config::types::{CheckerSettings, DetectionMethod};
use crate::error_handling::InitializationError;

/// Effective policy for one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePolicy {
    /// Name of the matching special site, if any
    pub site: Option<String>,
    pub treat_all_status_codes_as_valid: bool,
    pub valid_status_codes: BTreeSet<u16>,
    pub detection_method: DetectionMethod,
    pub ignore_empty_visual_content: bool,
    pub min_dom_content_length: usize,
}

impl SitePolicy {
    /// Whether `code` counts as valid under this policy.
    pub fn accepts(&self, code: u16) -> bool {
        self.treat_all_status_codes_as_valid || self.valid_status_codes.contains(&code)
    }
}

struct CompiledSite {
    name: String,
    pattern: Regex,
}

/// Compiled special-site patterns plus the global defaults they override.
pub struct SiteMatcher {
    sites: Vec<CompiledSite>,
    settings: CheckerSettings,
}

impl SiteMatcher {
    /// Compiles every special-site pattern (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::SitePatternError` naming the first site
    /// whose pattern does not compile.
    pub fn new(settings: &CheckerSettings) -> Result<Self, InitializationError> {
        let sites = settings
            .special_sites
            .iter()
            .map(|(name, site)| {
                RegexBuilder::new(&site.domain_pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|pattern| CompiledSite {
                        name: name.clone(),
                        pattern,
                    })
                    .map_err(|source| InitializationError::SitePatternError {
                        site: name.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sites,
            settings: settings.clone(),
        })
    }

    /// Resolves the policy for `url`. The first matching site (by name) wins.
    pub fn policy_for(&self, url: &str) -> SitePolicy {
        let browser = &self.settings.layered_checking.headless_browser;
        let mut policy = SitePolicy {
            site: None,
            treat_all_status_codes_as_valid: false,
            valid_status_codes: self.settings.valid_status_codes.clone(),
            detection_method: browser.detection_method,
            ignore_empty_visual_content: false,
            min_dom_content_length: browser.min_dom_content_length,
        };

        let Some(matched) = self.sites.iter().find(|s| s.pattern.is_match(url)) else {
            return policy;
        };
        let Some(site) = self.settings.special_sites.get(&matched.name) else {
            return policy;
        };

        policy.site = Some(matched.name.clone());
        policy.treat_all_status_codes_as_valid = site.treat_all_status_codes_as_valid;
        policy
            .valid_status_codes
            .extend(site.extra_valid_status_codes.iter().copied());
        if let Some(method) = site.detection_method {
            policy.detection_method = method;
        }
        policy.ignore_empty_visual_content = site.ignore_empty_visual_content;
        if let Some(min) = site.min_dom_content_length {
            policy.min_dom_content_length = min;
        }
        policy
    }
}
