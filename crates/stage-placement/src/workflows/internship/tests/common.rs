use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::internship::domain::{
    Candidature, CandidatureId, CandidatureStatus, CvId, EmployeurId, EntenteId, EntenteStage,
    EntenteStatut, GestionnaireId, InternshipOffer, OfferId, ProfesseurId, StudentId,
};
use crate::workflows::internship::memory::{InMemoryCandidatureRepository, InMemoryOfferCatalog};
use crate::workflows::internship::repository::{CandidatureRepository, RepositoryError};
use crate::workflows::internship::router::{USER_ID_HEADER, USER_ROLE_HEADER};
use crate::workflows::internship::{
    Actor, InternshipPlacement, PlacementStores, SignaturePolicy,
};

pub(super) const STUDENT: StudentId = StudentId(11);
pub(super) const OTHER_STUDENT: StudentId = StudentId(12);
pub(super) const EMPLOYEUR: EmployeurId = EmployeurId(21);
pub(super) const OTHER_EMPLOYEUR: EmployeurId = EmployeurId(22);
pub(super) const PROFESSEUR: ProfesseurId = ProfesseurId(31);
pub(super) const OTHER_PROFESSEUR: ProfesseurId = ProfesseurId(32);
pub(super) const GESTIONNAIRE: GestionnaireId = GestionnaireId(41);
pub(super) const OTHER_GESTIONNAIRE: GestionnaireId = GestionnaireId(42);

pub(super) const OFFER: OfferId = OfferId(101);
pub(super) const OTHER_OFFER: OfferId = OfferId(102);
pub(super) const CV: CvId = CvId(7);

pub(super) fn offer(id: OfferId, employeur_id: EmployeurId) -> InternshipOffer {
    InternshipOffer {
        id,
        employeur_id,
        title: format!("Stage développeur {}", id),
        remuneration_cents: 2_000,
        address: "1111 rue Lapierre, Montréal".to_string(),
        duration_weeks: 12,
        start_date: NaiveDate::from_ymd_opt(2025, 5, 5).expect("valid date"),
    }
}

pub(super) fn catalog() -> InMemoryOfferCatalog {
    InMemoryOfferCatalog::from_offers([offer(OFFER, EMPLOYEUR), offer(OTHER_OFFER, OTHER_EMPLOYEUR)])
}

pub(super) fn placement() -> InternshipPlacement {
    InternshipPlacement::in_memory(catalog(), SignaturePolicy::all_parties())
}

pub(super) fn placement_with(policy: SignaturePolicy) -> InternshipPlacement {
    InternshipPlacement::in_memory(catalog(), policy)
}

/// Placement plus direct handles to its stores, for seeding records and asserting on them.
pub(super) fn placement_and_stores() -> (InternshipPlacement, PlacementStores, InMemoryOfferCatalog)
{
    let offers = catalog();
    let stores = PlacementStores::in_memory(offers.clone());
    let placement = InternshipPlacement::new(stores.clone(), SignaturePolicy::all_parties());
    (placement, stores, offers)
}

pub(super) fn accepted_candidature(placement: &InternshipPlacement) -> Candidature {
    let candidature = placement
        .candidatures
        .apply(STUDENT, OFFER, CV)
        .expect("application succeeds");
    placement
        .candidatures
        .accept_by_employeur(candidature.id, EMPLOYEUR)
        .expect("employer accepts");
    placement
        .candidatures
        .accept_by_student(candidature.id, STUDENT)
        .expect("student accepts")
}

pub(super) fn draft_entente(placement: &InternshipPlacement) -> EntenteStage {
    let candidature = accepted_candidature(placement);
    placement
        .ententes
        .create_draft(candidature.id, "Développer le module de facturation")
        .expect("draft created")
}

pub(super) fn entente_awaiting_signatures(placement: &InternshipPlacement) -> EntenteStage {
    let draft = draft_entente(placement);
    placement
        .ententes
        .assign_professeur(draft.id, PROFESSEUR)
        .expect("professeur assigned");
    placement
        .ententes
        .request_signatures(draft.id, GESTIONNAIRE)
        .expect("signatures requested")
}

pub(super) fn validated_entente(placement: &InternshipPlacement) -> EntenteStage {
    let entente = entente_awaiting_signatures(placement);
    placement
        .ententes
        .signer_par_etudiant(entente.id, STUDENT)
        .expect("student signs");
    placement
        .ententes
        .signer_par_employeur(entente.id, EMPLOYEUR)
        .expect("employer signs");
    placement
        .ententes
        .signer_par_gestionnaire(entente.id, GESTIONNAIRE)
        .expect("manager signs")
}

pub(super) fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn seeded_candidature(
    id: u64,
    student_id: StudentId,
    offer_id: OfferId,
    status: CandidatureStatus,
    application_date: DateTime<Utc>,
) -> Candidature {
    Candidature {
        id: CandidatureId(id),
        student_id,
        offer_id,
        cv_id: CV,
        status,
        application_date,
        version: 0,
    }
}

pub(super) fn seeded_entente(
    id: u64,
    candidature_id: CandidatureId,
    professeur_id: Option<ProfesseurId>,
    statut: EntenteStatut,
    created_at: DateTime<Utc>,
) -> EntenteStage {
    EntenteStage {
        id: EntenteId(id),
        candidature_id,
        professeur_id,
        gestionnaire_id: None,
        statut,
        missions_objectifs: "Analyse de données".to_string(),
        date_signature_etudiant: None,
        date_signature_employeur: None,
        date_signature_gestionnaire: None,
        date_validation: None,
        created_at,
        version: 0,
    }
}

/// Candidature store that lets another writer land between every read and the caller's write.
#[derive(Default, Clone)]
pub(super) struct InterleavingCandidatures {
    pub(super) inner: InMemoryCandidatureRepository,
}

impl CandidatureRepository for InterleavingCandidatures {
    fn next_id(&self) -> Result<CandidatureId, RepositoryError> {
        self.inner.next_id()
    }

    fn insert(&self, record: Candidature) -> Result<Candidature, RepositoryError> {
        self.inner.insert(record)
    }

    fn update(&self, record: Candidature) -> Result<Candidature, RepositoryError> {
        self.inner.update(record)
    }

    fn fetch(&self, id: CandidatureId) -> Result<Option<Candidature>, RepositoryError> {
        let snapshot = self.inner.fetch(id)?;
        if let Some(current) = snapshot.clone() {
            self.inner.update(current)?;
        }
        Ok(snapshot)
    }

    fn by_student(&self, student_id: StudentId) -> Result<Vec<Candidature>, RepositoryError> {
        self.inner.by_student(student_id)
    }

    fn by_offers(&self, offer_ids: &[OfferId]) -> Result<Vec<Candidature>, RepositoryError> {
        self.inner.by_offers(offer_ids)
    }

    fn by_status(&self, status: CandidatureStatus) -> Result<Vec<Candidature>, RepositoryError> {
        self.inner.by_status(status)
    }

    fn all(&self) -> Result<Vec<Candidature>, RepositoryError> {
        self.inner.all()
    }
}

pub(super) struct UnavailableCandidatures;

impl CandidatureRepository for UnavailableCandidatures {
    fn next_id(&self) -> Result<CandidatureId, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _record: Candidature) -> Result<Candidature, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: Candidature) -> Result<Candidature, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: CandidatureId) -> Result<Option<Candidature>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn by_student(&self, _student_id: StudentId) -> Result<Vec<Candidature>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn by_offers(&self, _offer_ids: &[OfferId]) -> Result<Vec<Candidature>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn by_status(&self, _status: CandidatureStatus) -> Result<Vec<Candidature>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<Candidature>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn placement_with_candidatures(
    candidatures: Arc<dyn CandidatureRepository>,
) -> InternshipPlacement {
    let mut stores = PlacementStores::in_memory(catalog());
    stores.candidatures = candidatures;
    InternshipPlacement::new(stores, SignaturePolicy::all_parties())
}

pub(super) fn request(
    method: Method,
    uri: &str,
    actor: Option<Actor>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder
            .header(USER_ID_HEADER, actor.id.to_string())
            .header(USER_ROLE_HEADER, actor.role.label());
    }
    let body = match body {
        Some(payload) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&payload).expect("serialize payload"))
        }
        None => Body::empty(),
    };
    builder.body(body).expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
