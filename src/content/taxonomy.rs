//! Category normalization against the configured taxonomy

use crate::config::BlogConfig;

/// Allowed categories plus the fallback set for posts without a valid one
#[derive(Debug, Clone)]
pub struct Taxonomy {
    allowed: Vec<String>,
    defaults: Vec<String>,
}

impl Taxonomy {
    pub fn new(allowed: Vec<String>, defaults: Vec<String>) -> Self {
        Self { allowed, defaults }
    }

    pub fn from_config(blog: &BlogConfig) -> Self {
        Self::new(blog.categories.clone(), blog.default_categories.clone())
    }

    /// Allowed categories, in configured order
    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    /// Normalize raw front-matter categories.
    ///
    /// Values are matched trimmed and ASCII case-insensitively and come
    /// back in the taxonomy's spelling, in input order, without duplicates.
    /// Unknown values are dropped. When nothing survives, a fresh copy of
    /// the default set is returned. An empty taxonomy accepts any non-blank
    /// value.
    pub fn normalize(&self, raw: &[String]) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();

        for value in raw {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let canonical = if self.allowed.is_empty() {
                Some(value)
            } else {
                self.allowed
                    .iter()
                    .find(|allowed| allowed.eq_ignore_ascii_case(value))
                    .map(String::as_str)
            };
            match canonical {
                Some(c) if !out.iter().any(|o| o == c) => out.push(c.to_string()),
                Some(_) => {}
                None => tracing::debug!("Dropping unknown category {:?}", value),
            }
        }

        if out.is_empty() {
            self.defaults.clone()
        } else {
            out
        }
    }
}
