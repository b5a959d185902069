//! Mutex-backed stores used by the API service, the CLI demo, and tests.
//!
//! Each store serializes its writes behind a single lock, so the version check and the
//! write in `update` happen atomically per record.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    Candidature, CandidatureId, CandidatureStatus, Convocation, ConvocationId, EmployeurId,
    EntenteId, EntenteStage, EntenteStatut, Evaluation, EvaluationId, InternshipOffer, OfferId,
    ProfesseurId, StudentId,
};
use super::repository::{
    CandidatureRepository, ConvocationRepository, EntenteRepository, EvaluationRepository,
    OfferCatalog, RepositoryError,
};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
}

/// Rows plus the store-owned identifier sequence, guarded by one lock.
struct Table<K, V> {
    rows: BTreeMap<K, V>,
    last_id: u64,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<K: Ord, V> Table<K, V> {
    fn issue(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    /// Explicit identifiers (seeded or imported records) move the sequence past them.
    fn put(&mut self, key: K, raw_id: u64, value: V) {
        self.last_id = self.last_id.max(raw_id);
        self.rows.insert(key, value);
    }
}

fn check_version(stored: u64, incoming: u64) -> Result<u64, RepositoryError> {
    if stored == incoming {
        Ok(stored + 1)
    } else {
        Err(RepositoryError::StaleVersion)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryCandidatureRepository {
    records: Arc<Mutex<Table<CandidatureId, Candidature>>>,
}

impl CandidatureRepository for InMemoryCandidatureRepository {
    fn next_id(&self) -> Result<CandidatureId, RepositoryError> {
        Ok(CandidatureId(lock(&self.records)?.issue()))
    }

    fn insert(&self, record: Candidature) -> Result<Candidature, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.rows.contains_key(&record.id) {
            return Err(RepositoryError::DuplicateId(record.id.0));
        }
        let duplicate = guard.rows.values().any(|existing| {
            existing.student_id == record.student_id && existing.offer_id == record.offer_id
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard.put(record.id, record.id.0, record.clone());
        Ok(record)
    }

    fn update(&self, mut record: Candidature) -> Result<Candidature, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let stored = guard.rows.get(&record.id).ok_or(RepositoryError::NotFound)?;
        record.version = check_version(stored.version, record.version)?;
        guard.rows.insert(record.id, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: CandidatureId) -> Result<Option<Candidature>, RepositoryError> {
        Ok(lock(&self.records)?.rows.get(&id).cloned())
    }

    fn by_student(&self, student_id: StudentId) -> Result<Vec<Candidature>, RepositoryError> {
        Ok(lock(&self.records)?
            .rows
            .values()
            .filter(|record| record.student_id == student_id)
            .cloned()
            .collect())
    }

    fn by_offers(&self, offer_ids: &[OfferId]) -> Result<Vec<Candidature>, RepositoryError> {
        Ok(lock(&self.records)?
            .rows
            .values()
            .filter(|record| offer_ids.contains(&record.offer_id))
            .cloned()
            .collect())
    }

    fn by_status(&self, status: CandidatureStatus) -> Result<Vec<Candidature>, RepositoryError> {
        Ok(lock(&self.records)?
            .rows
            .values()
            .filter(|record| record.status == status)
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<Candidature>, RepositoryError> {
        Ok(lock(&self.records)?.rows.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryEntenteRepository {
    records: Arc<Mutex<Table<EntenteId, EntenteStage>>>,
}

impl EntenteRepository for InMemoryEntenteRepository {
    fn next_id(&self) -> Result<EntenteId, RepositoryError> {
        Ok(EntenteId(lock(&self.records)?.issue()))
    }

    fn insert(&self, record: EntenteStage) -> Result<EntenteStage, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.rows.contains_key(&record.id) {
            return Err(RepositoryError::DuplicateId(record.id.0));
        }
        let duplicate = guard
            .rows
            .values()
            .any(|existing| existing.candidature_id == record.candidature_id);
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard.put(record.id, record.id.0, record.clone());
        Ok(record)
    }

    fn update(&self, mut record: EntenteStage) -> Result<EntenteStage, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let stored = guard.rows.get(&record.id).ok_or(RepositoryError::NotFound)?;
        record.version = check_version(stored.version, record.version)?;
        guard.rows.insert(record.id, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: EntenteId) -> Result<Option<EntenteStage>, RepositoryError> {
        Ok(lock(&self.records)?.rows.get(&id).cloned())
    }

    fn exists_for_candidature(
        &self,
        candidature_id: CandidatureId,
    ) -> Result<bool, RepositoryError> {
        Ok(lock(&self.records)?
            .rows
            .values()
            .any(|record| record.candidature_id == candidature_id))
    }

    fn by_candidatures(
        &self,
        candidature_ids: &[CandidatureId],
    ) -> Result<Vec<EntenteStage>, RepositoryError> {
        Ok(lock(&self.records)?
            .rows
            .values()
            .filter(|record| candidature_ids.contains(&record.candidature_id))
            .cloned()
            .collect())
    }

    fn by_professeur(
        &self,
        professeur_id: ProfesseurId,
    ) -> Result<Vec<EntenteStage>, RepositoryError> {
        Ok(lock(&self.records)?
            .rows
            .values()
            .filter(|record| record.professeur_id == Some(professeur_id))
            .cloned()
            .collect())
    }

    fn by_status(&self, statut: EntenteStatut) -> Result<Vec<EntenteStage>, RepositoryError> {
        Ok(lock(&self.records)?
            .rows
            .values()
            .filter(|record| record.statut == statut)
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<EntenteStage>, RepositoryError> {
        Ok(lock(&self.records)?.rows.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryConvocationRepository {
    records: Arc<Mutex<Table<ConvocationId, Convocation>>>,
}

impl ConvocationRepository for InMemoryConvocationRepository {
    fn next_id(&self) -> Result<ConvocationId, RepositoryError> {
        Ok(ConvocationId(lock(&self.records)?.issue()))
    }

    fn insert(&self, record: Convocation) -> Result<Convocation, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.rows.contains_key(&record.id) {
            return Err(RepositoryError::DuplicateId(record.id.0));
        }
        let duplicate = guard
            .rows
            .values()
            .any(|existing| existing.candidature_id == record.candidature_id);
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard.put(record.id, record.id.0, record.clone());
        Ok(record)
    }

    fn update(&self, mut record: Convocation) -> Result<Convocation, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let stored = guard.rows.get(&record.id).ok_or(RepositoryError::NotFound)?;
        record.version = check_version(stored.version, record.version)?;
        guard.rows.insert(record.id, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: ConvocationId) -> Result<Option<Convocation>, RepositoryError> {
        Ok(lock(&self.records)?.rows.get(&id).cloned())
    }

    fn by_candidatures(
        &self,
        candidature_ids: &[CandidatureId],
    ) -> Result<Vec<Convocation>, RepositoryError> {
        Ok(lock(&self.records)?
            .rows
            .values()
            .filter(|record| candidature_ids.contains(&record.candidature_id))
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<Convocation>, RepositoryError> {
        Ok(lock(&self.records)?.rows.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryEvaluationRepository {
    records: Arc<Mutex<Table<EvaluationId, Evaluation>>>,
}

impl EvaluationRepository for InMemoryEvaluationRepository {
    fn next_id(&self) -> Result<EvaluationId, RepositoryError> {
        Ok(EvaluationId(lock(&self.records)?.issue()))
    }

    fn insert(&self, record: Evaluation) -> Result<Evaluation, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.rows.contains_key(&record.id) {
            return Err(RepositoryError::DuplicateId(record.id.0));
        }
        let duplicate = guard.rows.values().any(|existing| {
            existing.entente_id == record.entente_id && existing.kind == record.kind
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard.put(record.id, record.id.0, record.clone());
        Ok(record)
    }

    fn by_entente(&self, entente_id: EntenteId) -> Result<Vec<Evaluation>, RepositoryError> {
        Ok(lock(&self.records)?
            .rows
            .values()
            .filter(|record| record.entente_id == entente_id)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryOfferCatalog {
    offers: Arc<Mutex<BTreeMap<OfferId, InternshipOffer>>>,
}

impl InMemoryOfferCatalog {
    pub fn from_offers<I>(offers: I) -> Self
    where
        I: IntoIterator<Item = InternshipOffer>,
    {
        let offers = offers.into_iter().map(|offer| (offer.id, offer)).collect();
        Self {
            offers: Arc::new(Mutex::new(offers)),
        }
    }

    /// Publishes or replaces an offer.
    pub fn publish(&self, offer: InternshipOffer) -> Result<(), RepositoryError> {
        lock(&self.offers)?.insert(offer.id, offer);
        Ok(())
    }

    pub fn len(&self) -> usize {
        lock(&self.offers).map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OfferCatalog for InMemoryOfferCatalog {
    fn fetch(&self, id: OfferId) -> Result<Option<InternshipOffer>, RepositoryError> {
        Ok(lock(&self.offers)?.get(&id).cloned())
    }

    fn by_employeur(
        &self,
        employeur_id: EmployeurId,
    ) -> Result<Vec<InternshipOffer>, RepositoryError> {
        Ok(lock(&self.offers)?
            .values()
            .filter(|offer| offer.employeur_id == employeur_id)
            .cloned()
            .collect())
    }
}
