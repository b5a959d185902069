use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{EmployeurId, GestionnaireId, ProfesseurId, StudentId};
use super::error::PlacementError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Etudiant,
    Employeur,
    Professeur,
    Gestionnaire,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Etudiant => "etudiant",
            Self::Employeur => "employeur",
            Self::Professeur => "professeur",
            Self::Gestionnaire => "gestionnaire",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "etudiant" | "student" => Some(Self::Etudiant),
            "employeur" | "employer" => Some(Self::Employeur),
            "professeur" | "prof" | "professor" => Some(Self::Professeur),
            "gestionnaire" | "manager" => Some(Self::Gestionnaire),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Caller identity supplied by the auth collaborator. Trusted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: u64,
    pub role: Role,
}

const WRONG_ROLE: &str = "Cette action n'est pas permise pour votre rôle";

impl Actor {
    pub const fn student(id: u64) -> Self {
        Self {
            id,
            role: Role::Etudiant,
        }
    }

    pub const fn employeur(id: u64) -> Self {
        Self {
            id,
            role: Role::Employeur,
        }
    }

    pub const fn professeur(id: u64) -> Self {
        Self {
            id,
            role: Role::Professeur,
        }
    }

    pub const fn gestionnaire(id: u64) -> Self {
        Self {
            id,
            role: Role::Gestionnaire,
        }
    }

    pub fn as_student(&self) -> Result<StudentId, PlacementError> {
        self.require(Role::Etudiant).map(|_| StudentId(self.id))
    }

    pub fn as_employeur(&self) -> Result<EmployeurId, PlacementError> {
        self.require(Role::Employeur).map(|_| EmployeurId(self.id))
    }

    pub fn as_professeur(&self) -> Result<ProfesseurId, PlacementError> {
        self.require(Role::Professeur).map(|_| ProfesseurId(self.id))
    }

    pub fn as_gestionnaire(&self) -> Result<GestionnaireId, PlacementError> {
        self.require(Role::Gestionnaire).map(|_| GestionnaireId(self.id))
    }

    fn require(&self, role: Role) -> Result<(), PlacementError> {
        if self.role == role {
            Ok(())
        } else {
            Err(PlacementError::ownership(WRONG_ROLE))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_specific_ids_require_matching_role() {
        let actor = Actor::employeur(7);
        assert_eq!(actor.as_employeur().expect("employer id"), EmployeurId(7));
        assert!(matches!(
            actor.as_student(),
            Err(PlacementError::Ownership(_))
        ));
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!(Role::parse("Prof"), Some(Role::Professeur));
        assert_eq!(Role::parse(" manager "), Some(Role::Gestionnaire));
        assert_eq!(Role::parse("admin"), None);
    }
}
