// src/environment.rs

//! Environment resolution and the shared environment cell.
//!
//! The active environment is fixed once per invocation by [`resolve`] and
//! afterwards only changes through the dedicated force-environment task
//! (see `pipelines`). Tasks read the value at the moment they run via
//! [`Environment::get`]; nothing caches a stale read across an await.

use std::sync::{Arc, RwLock};

use regex::Regex;

/// Environment used when no `--env` flag is present.
pub const DEVELOPMENT: &str = "development";

/// Environment forced by the `build` pipeline.
pub const PRODUCTION: &str = "production";

/// Determine the active environment from invocation arguments.
///
/// Scans for `--env=<value>` where `<value>` is `[A-Za-z]+`; the first
/// match wins. The two-token form `--env <value>` is accepted as well,
/// since that is what the CLI layer advertises. Falls back to
/// [`DEVELOPMENT`] when nothing matches.
pub fn resolve<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let flag = Regex::new(r"^--env=([A-Za-z]+)$").expect("static regex");
    let value = Regex::new(r"^[A-Za-z]+$").expect("static regex");

    let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();

    let mut i = 0;
    while i < args.len() {
        if let Some(caps) = flag.captures(&args[i]) {
            return caps[1].to_string();
        }
        if args[i] == "--env" {
            if let Some(next) = args.get(i + 1) {
                if value.is_match(next) {
                    return next.clone();
                }
            }
        }
        i += 1;
    }

    DEVELOPMENT.to_string()
}

/// Shared, mutable environment value carried inside the task context.
///
/// Cloning is cheap; clones observe the same underlying cell, so an
/// override performed mid-pipeline is seen by every task that runs
/// afterwards in the same execution.
#[derive(Debug, Clone)]
pub struct Environment {
    inner: Arc<RwLock<String>>,
}

impl Environment {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial.into())),
        }
    }

    /// Current environment value.
    pub fn get(&self) -> String {
        self.inner.read().expect("environment lock poisoned").clone()
    }

    /// Overwrite the environment. Only the force-environment task calls
    /// this in production code.
    pub fn set(&self, value: impl Into<String>) {
        *self.inner.write().expect("environment lock poisoned") = value.into();
    }

    /// Whether the current value is the production environment.
    pub fn is_production(&self) -> bool {
        self.get() == PRODUCTION
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(DEVELOPMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_env_flag() {
        assert_eq!(resolve(["--env=production"]), "production");
        assert_eq!(resolve(["--env", "staging"]), "staging");
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(resolve(["--env=alpha", "--env=beta"]), "alpha");
    }

    #[test]
    fn falls_back_to_default() {
        assert_eq!(resolve(["--foo"]), DEVELOPMENT);
        assert_eq!(resolve(Vec::<String>::new()), DEVELOPMENT);
        // Digits are not a valid environment name.
        assert_eq!(resolve(["--env=v2"]), DEVELOPMENT);
    }

    #[test]
    fn resolution_is_idempotent() {
        let args = ["taskpipe", "watch", "--env=production"];
        assert_eq!(resolve(args), resolve(args));
    }

    #[test]
    fn override_is_visible_through_clones() {
        let env = Environment::new(DEVELOPMENT);
        let clone = env.clone();
        env.set(PRODUCTION);
        assert!(clone.is_production());
    }
}
