//! User-facing messages carried by `PlacementError`.

pub(crate) const CANDIDATURE_NOT_FOUND: &str = "Candidature introuvable";
pub(crate) const OFFER_NOT_FOUND: &str = "Offre de stage introuvable";
pub(crate) const ENTENTE_NOT_FOUND: &str = "Entente introuvable";
pub(crate) const CONVOCATION_NOT_FOUND: &str = "Convocation introuvable";

pub(crate) const ALREADY_APPLIED: &str = "Vous avez déjà postulé à cette offre";
pub(crate) const NOT_YOUR_CANDIDATURE: &str = "Cette candidature ne vous appartient pas";
pub(crate) const NOT_YOUR_OFFER: &str = "Cette offre ne vous appartient pas";

pub(crate) const ALREADY_REJECTED: &str = "Cette candidature a déjà été rejetée";
pub(crate) const ALREADY_FULLY_ACCEPTED: &str =
    "Cette candidature a déjà été acceptée par les deux parties";
pub(crate) const AWAITING_STUDENT: &str =
    "Vous avez déjà accepté cette candidature, en attente de la réponse de l'étudiant";
pub(crate) const EMPLOYER_MUST_ACCEPT_FIRST: &str =
    "L'employeur doit d'abord accepter cette candidature";
pub(crate) const STUDENT_ALREADY_ACCEPTED: &str = "Vous avez déjà accepté cette candidature";
pub(crate) const CANNOT_REJECT_ACCEPTED: &str =
    "Impossible de rejeter une candidature déjà acceptée par les deux parties";
pub(crate) const ONLY_REFUSE_EMPLOYER_ACCEPTED: &str =
    "Vous ne pouvez refuser que les candidatures acceptées par l'employeur";
pub(crate) const CONVENED_IS_FROZEN: &str =
    "Cette candidature ne peut pas changer d'état dans sa situation actuelle";
pub(crate) const CANDIDATURE_STALE: &str =
    "La candidature a été modifiée par une autre requête, veuillez réessayer";

pub(crate) const MISSIONS_REQUIRED: &str = "Les missions et objectifs sont obligatoires";
pub(crate) const CANDIDATURE_NOT_ACCEPTED: &str =
    "La candidature doit être acceptée par les deux parties avant de créer une entente";
pub(crate) const ENTENTE_EXISTS: &str = "Une entente existe déjà pour cette candidature";
pub(crate) const ENTENTE_NOT_DRAFT: &str = "L'entente n'est plus modifiable";
pub(crate) const ENTENTE_NOT_AWAITING_SIGNATURE: &str =
    "L'entente n'est pas en attente de signature";
pub(crate) const ALREADY_SIGNED: &str = "Vous avez déjà signé cette entente";
pub(crate) const STUDENT_CANNOT_SIGN: &str =
    "L'étudiant n'est pas autorisé à signer cette entente";
pub(crate) const EMPLOYER_CANNOT_SIGN: &str =
    "L'employeur n'est pas autorisé à signer cette entente";
pub(crate) const MANAGER_CANNOT_SIGN: &str =
    "Le gestionnaire n'est pas autorisé à signer cette entente";
pub(crate) const ENTENTE_STALE: &str =
    "L'entente a été modifiée par une autre requête, veuillez réessayer";
pub(crate) const NOT_A_PARTICIPANT: &str = "Vous ne participez pas à cette entente";

pub(crate) const CONVOCATION_EXISTS: &str = "Une convocation existe déjà pour cette candidature";
pub(crate) const CONVOCATION_REQUIRES_PENDING: &str =
    "Seules les candidatures en attente peuvent recevoir une convocation";
pub(crate) const CONVOCATION_ALREADY_ANSWERED: &str = "Vous avez déjà répondu à cette convocation";
pub(crate) const CONVOCATION_LOCATION_REQUIRED: &str = "Le lieu de la convocation est obligatoire";
pub(crate) const CONVOCATION_STALE: &str =
    "La convocation a été modifiée par une autre requête, veuillez réessayer";

pub(crate) const SCORE_OUT_OF_RANGE: &str = "La note doit être comprise entre 1 et 5";
pub(crate) const ENTENTE_NOT_VALIDATED: &str =
    "L'entente doit être validée avant de soumettre une évaluation";
pub(crate) const EVALUATION_EXISTS: &str = "Cette évaluation a déjà été soumise";
pub(crate) const NOT_ASSIGNED_PROFESSOR: &str =
    "Vous n'êtes pas le professeur assigné à cette entente";
pub(crate) const MANAGERS_ONLY: &str = "Cette liste est réservée aux gestionnaires";
