//! Language-version gating for builtins and experiment-gated syntax
//! (spec.md §4.7).

use cue_core::ast::{Experiment, LanguageVersion};

use crate::error::{CompileError, CompileResult};

/// Parses a `vX.Y.Z`-shaped version string into `(major, minor, patch)`,
/// defaulting missing components to 0. Unparseable input sorts as `(0,0,0)`
/// so a malformed `language: version:` never accidentally unlocks gated
/// builtins.
fn parse(version: &str) -> (u32, u32, u32) {
    let trimmed = version.trim_start_matches('v');
    let mut parts = trimmed.split('.');
    let major = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let minor = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let patch = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    (major, minor, patch)
}

/// `true` if `actual` is greater than or equal to `required`.
pub fn satisfies(actual: &str, required: &str) -> bool {
    parse(actual) >= parse(required)
}

/// Checks a builtin's minimum-version requirement against the file's
/// declared language version (spec.md §4.2 rule 5).
pub fn check_version(
    name: &str,
    required: Option<&str>,
    language: &LanguageVersion,
) -> CompileResult<()> {
    if let Some(required) = required {
        if !language.version.is_empty() && !satisfies(&language.version, required) {
            return Err(CompileError::VersionError {
                name: name.to_string(),
                required: required.to_string(),
                actual: language.version.clone(),
            });
        }
    }
    Ok(())
}

/// Checks that a gated piece of syntax's experiment is enabled.
pub fn check_experiment(
    name: &str,
    required: Option<Experiment>,
    language: &LanguageVersion,
) -> CompileResult<()> {
    if let Some(experiment) = required {
        if !language.experiments.contains(experiment) {
            return Err(CompileError::ExperimentRequired {
                name: name.to_string(),
                experiment: format!("{experiment:?}"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod version_tests {
    use super::*;

    #[test]
    fn newer_actual_satisfies_older_requirement() {
        assert!(satisfies("v0.9.0", "v0.8.0"));
    }

    #[test]
    fn older_actual_does_not_satisfy_newer_requirement() {
        assert!(!satisfies("v0.7.0", "v0.8.0"));
    }

    #[test]
    fn missing_required_version_always_passes() {
        let lang = LanguageVersion {
            version: "v0.1.0".to_string(),
            experiments: Default::default(),
        };
        assert!(check_version("len", None, &lang).is_ok());
    }

    #[test]
    fn unmet_required_version_errors() {
        let lang = LanguageVersion {
            version: "v0.5.0".to_string(),
            experiments: Default::default(),
        };
        let err = check_version("matchN", Some("v0.8.0"), &lang).unwrap_err();
        assert!(matches!(err, CompileError::VersionError { .. }));
    }
}
