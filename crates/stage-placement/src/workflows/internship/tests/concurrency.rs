use std::sync::{Arc, Barrier};
use std::thread;

use super::common::*;

use crate::workflows::internship::domain::{CandidatureStatus, EntenteStatut};
use crate::workflows::internship::messages::*;
use crate::workflows::internship::{
    Candidature, EntenteStage, InternshipPlacement, PlacementError, Signatory,
};

fn race<A, B, T>(first: A, second: B) -> (Result<T, PlacementError>, Result<T, PlacementError>)
where
    A: FnOnce() -> Result<T, PlacementError> + Send,
    B: FnOnce() -> Result<T, PlacementError> + Send,
    T: Send,
{
    let barrier = Barrier::new(2);
    thread::scope(|scope| {
        let left = scope.spawn(|| {
            barrier.wait();
            first()
        });
        let right = scope.spawn(|| {
            barrier.wait();
            second()
        });
        (
            left.join().expect("left thread"),
            right.join().expect("right thread"),
        )
    })
}

fn assert_single_winner<T>(results: &[&Result<T, PlacementError>]) {
    let winners = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(winners, 1, "exactly one concurrent write must succeed");
    for result in results {
        if let Err(err) = result {
            assert!(
                matches!(
                    err,
                    PlacementError::StaleState(_) | PlacementError::InvalidState(_)
                ),
                "loser must see a state error, got {err:?}"
            );
        }
    }
}

#[test]
fn concurrent_employer_acceptances_apply_once() {
    for _ in 0..20 {
        let placement = placement();
        let candidature = placement
            .candidatures
            .apply(STUDENT, OFFER, CV)
            .expect("apply");

        let (left, right) = race(
            || placement.candidatures.accept_by_employeur(candidature.id, EMPLOYEUR),
            || placement.candidatures.accept_by_employeur(candidature.id, EMPLOYEUR),
        );

        assert_single_winner(&[&left, &right]);
        let stored = placement.candidatures.get(candidature.id).expect("stored");
        assert_eq!(stored.status, CandidatureStatus::AcceptedByEmployeur);
        assert_eq!(stored.version, 1);
    }
}

#[test]
fn concurrent_withdrawal_and_acceptance_leave_one_outcome() {
    for _ in 0..20 {
        let placement = placement();
        let candidature = placement
            .candidatures
            .apply(STUDENT, OFFER, CV)
            .expect("apply");
        placement
            .candidatures
            .accept_by_employeur(candidature.id, EMPLOYEUR)
            .expect("employer accepts");

        let (withdrawal, acceptance) = race(
            || placement.candidatures.reject_by_employeur(candidature.id, EMPLOYEUR),
            || placement.candidatures.accept_by_student(candidature.id, STUDENT),
        );

        assert_single_winner(&[&withdrawal, &acceptance]);
        let winner: &Candidature = withdrawal
            .as_ref()
            .or(acceptance.as_ref())
            .expect("one winner");
        let stored = placement.candidatures.get(candidature.id).expect("stored");
        assert_eq!(stored.status, winner.status);
        assert!(matches!(
            stored.status,
            CandidatureStatus::Accepted | CandidatureStatus::Rejected
        ));
    }
}

#[test]
fn interleaved_write_surfaces_as_stale_state() {
    let candidatures = Arc::new(InterleavingCandidatures::default());
    let placement = placement_with_candidatures(candidatures.clone());
    let candidature = placement
        .candidatures
        .apply(STUDENT, OFFER, CV)
        .expect("apply");

    let err = placement
        .candidatures
        .accept_by_employeur(candidature.id, EMPLOYEUR)
        .expect_err("another writer got there first");

    assert!(matches!(err, PlacementError::StaleState(ref message) if message == CANDIDATURE_STALE));
}

fn sign_until_recorded(
    placement: &InternshipPlacement,
    entente: &EntenteStage,
    signatory: Signatory,
) -> EntenteStage {
    loop {
        let result = match signatory {
            Signatory::Etudiant => placement.ententes.signer_par_etudiant(entente.id, STUDENT),
            Signatory::Employeur => placement.ententes.signer_par_employeur(entente.id, EMPLOYEUR),
            Signatory::Gestionnaire => placement
                .ententes
                .signer_par_gestionnaire(entente.id, GESTIONNAIRE),
        };
        match result {
            Ok(stored) => return stored,
            Err(PlacementError::StaleState(_)) => continue,
            Err(other) => panic!("unexpected signature failure: {other:?}"),
        }
    }
}

#[test]
fn concurrent_signatures_are_never_lost() {
    for _ in 0..20 {
        let placement = placement();
        let entente = entente_awaiting_signatures(&placement);
        let barrier = Barrier::new(3);

        let results: Vec<EntenteStage> = thread::scope(|scope| {
            let handles: Vec<_> = Signatory::ordered()
                .into_iter()
                .map(|signatory| {
                    let placement = &placement;
                    let entente = &entente;
                    let barrier = &barrier;
                    scope.spawn(move || {
                        barrier.wait();
                        sign_until_recorded(placement, entente, signatory)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("signer thread"))
                .collect()
        });

        let validations = results
            .iter()
            .filter(|record| record.statut == EntenteStatut::Validee)
            .count();
        assert_eq!(validations, 1, "only the completing signature validates");

        let stored = placement.ententes.get(entente.id).expect("stored");
        assert_eq!(stored.statut, EntenteStatut::Validee);
        assert!(Signatory::ordered()
            .iter()
            .all(|signatory| stored.signature(*signatory).is_some()));
        assert!(stored.date_validation.is_some());
    }
}
