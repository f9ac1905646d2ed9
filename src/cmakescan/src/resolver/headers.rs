// cmakescan/src/resolver/headers.rs

//! Public header naming rules.
//!
//! Mirrors what goes into a module's public include directory: only `.h`
//! files, not `_p.h` private ones, nothing from `3rdparty/`, nothing from
//! outside the module's directory, and nothing a private header filter
//! claims.

use crate::error::{ParseError, Result};
use log::debug;
use regex::Regex;

/// Decides which evaluated source names are public headers.
#[derive(Debug, Clone)]
pub struct HeaderFilter {
    private: Vec<Regex>,
}

impl HeaderFilter {
    /// Compile private header filter patterns. Each is anchored at the
    /// start of the name, but not at its end.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut private = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let regex = Regex::new(&format!("^(?:{})", pattern)).map_err(|err| {
                ParseError::invalid_filter_regex(pattern.to_string(), err.to_string())
            })?;
            debug!("private header filter: {}", regex.as_str());
            private.push(regex);
        }
        Ok(Self { private })
    }

    /// True if `name` should be reported as a public header.
    pub fn accepts(&self, name: &str) -> bool {
        if !is_public_header_name(name) {
            return false;
        }
        if let Some(regex) = self.private.iter().find(|r| r.is_match(name)) {
            debug!("{} matches private header filter {}", name, regex.as_str());
            return false;
        }
        true
    }
}

/// The naming rules, without private header filters.
pub fn is_public_header_name(name: &str) -> bool {
    if !name.ends_with(".h") || name.ends_with("_p.h") {
        return false;
    }
    if name.starts_with("3rdparty/") || name.contains("/3rdparty/") {
        debug!("{} is third-party", name);
        return false;
    }
    if name.starts_with("../") {
        debug!("{} is outside the module", name);
        return false;
    }
    true
}
