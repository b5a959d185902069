use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::EntenteStage;

/// Party whose signature an entente may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signatory {
    Etudiant,
    Employeur,
    Gestionnaire,
}

impl Signatory {
    pub const fn ordered() -> [Self; 3] {
        [Self::Etudiant, Self::Employeur, Self::Gestionnaire]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Etudiant => "etudiant",
            Self::Employeur => "employeur",
            Self::Gestionnaire => "gestionnaire",
        }
    }

    fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "etudiant" | "student" => Some(Self::Etudiant),
            "employeur" | "employer" => Some(Self::Employeur),
            "gestionnaire" | "manager" => Some(Self::Gestionnaire),
            _ => None,
        }
    }
}

impl fmt::Display for Signatory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignaturePolicyError {
    #[error("unknown signatory '{0}'")]
    UnknownSignatory(String),
    #[error("the {0} signature is always required")]
    MissingMandatory(Signatory),
}

/// Set of signatures that must be present before an entente flips to `VALIDEE`.
///
/// Student and employer are always part of the set; the manager countersignature is
/// optional per deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignaturePolicy {
    required: BTreeSet<Signatory>,
}

impl SignaturePolicy {
    pub fn new<I>(required: I) -> Result<Self, SignaturePolicyError>
    where
        I: IntoIterator<Item = Signatory>,
    {
        let required: BTreeSet<Signatory> = required.into_iter().collect();
        for mandatory in [Signatory::Etudiant, Signatory::Employeur] {
            if !required.contains(&mandatory) {
                return Err(SignaturePolicyError::MissingMandatory(mandatory));
            }
        }
        Ok(Self { required })
    }

    pub fn all_parties() -> Self {
        Self {
            required: Signatory::ordered().into_iter().collect(),
        }
    }

    pub fn student_and_employer() -> Self {
        Self {
            required: [Signatory::Etudiant, Signatory::Employeur]
                .into_iter()
                .collect(),
        }
    }

    /// Parses a comma separated list such as `etudiant,employeur`.
    pub fn parse(raw: &str) -> Result<Self, SignaturePolicyError> {
        let mut required = Vec::new();
        for token in raw.split(',').filter(|token| !token.trim().is_empty()) {
            let signatory = Signatory::from_label(token)
                .ok_or_else(|| SignaturePolicyError::UnknownSignatory(token.trim().to_string()))?;
            required.push(signatory);
        }
        Self::new(required)
    }

    pub fn requires(&self, signatory: Signatory) -> bool {
        self.required.contains(&signatory)
    }

    pub fn required(&self) -> impl Iterator<Item = Signatory> + '_ {
        self.required.iter().copied()
    }

    pub fn missing(&self, entente: &EntenteStage) -> Vec<Signatory> {
        self.required
            .iter()
            .copied()
            .filter(|signatory| entente.signature(*signatory).is_none())
            .collect()
    }

    pub fn is_satisfied(&self, entente: &EntenteStage) -> bool {
        self.missing(entente).is_empty()
    }
}

impl Default for SignaturePolicy {
    fn default() -> Self {
        Self::all_parties()
    }
}
