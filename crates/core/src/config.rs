//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Services never read environment variables themselves; the binary collects raw values and
//! hands them to [`CoreConfig::from_env_values`].

use crate::constants::DEFAULT_PATIENT_ID;
use crate::error::{CoreError, CoreResult};
use famhx_types::NonEmptyText;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    patient_id: NonEmptyText,
    seed_file: Option<PathBuf>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(patient_id: NonEmptyText, seed_file: Option<PathBuf>) -> Self {
        Self {
            patient_id,
            seed_file,
        }
    }

    /// Resolve configuration from raw (typically environment) values.
    ///
    /// Blank values are treated as absent. A missing patient id falls back to
    /// [`DEFAULT_PATIENT_ID`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if the patient id contains a `/`, which would make
    /// the `Patient/{id}` reference ambiguous.
    pub fn from_env_values(
        patient_id: Option<String>,
        seed_file: Option<String>,
    ) -> CoreResult<Self> {
        let patient_id = match NonEmptyText::from_optional(patient_id) {
            Some(id) => id,
            None => NonEmptyText::new(DEFAULT_PATIENT_ID)
                .map_err(|e| CoreError::InvalidInput(format!("default patient id: {e}")))?,
        };

        if patient_id.as_str().contains('/') {
            return Err(CoreError::InvalidInput(format!(
                "patient id must not contain '/': {patient_id}"
            )));
        }

        let seed_file = NonEmptyText::from_optional(seed_file).map(|p| PathBuf::from(p.as_str()));

        Ok(Self::new(patient_id, seed_file))
    }

    pub fn patient_id(&self) -> &NonEmptyText {
        &self.patient_id
    }

    pub fn seed_file(&self) -> Option<&Path> {
        self.seed_file.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_supplied_values() {
        let cfg = CoreConfig::from_env_values(
            Some(" 123 ".into()),
            Some("data/family.json".into()),
        )
        .expect("valid config");
        assert_eq!(cfg.patient_id().as_str(), "123");
        assert_eq!(cfg.seed_file(), Some(Path::new("data/family.json")));
    }

    #[test]
    fn blank_values_fall_back() {
        let cfg = CoreConfig::from_env_values(Some("   ".into()), Some("".into()))
            .expect("valid config");
        assert_eq!(cfg.patient_id().as_str(), DEFAULT_PATIENT_ID);
        assert!(cfg.seed_file().is_none());

        let cfg = CoreConfig::from_env_values(None, None).expect("valid config");
        assert_eq!(cfg.patient_id().as_str(), DEFAULT_PATIENT_ID);
    }

    #[test]
    fn rejects_patient_id_with_slash() {
        let err = CoreConfig::from_env_values(Some("Patient/123".into()), None)
            .expect_err("slash in id");
        match err {
            CoreError::InvalidInput(msg) => assert!(msg.contains("Patient/123")),
            other => panic!("expected InvalidInput error, got {other:?}"),
        }
    }
}
