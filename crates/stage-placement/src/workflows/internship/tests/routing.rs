use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use super::common::*;

use crate::workflows::internship::messages::*;
use crate::workflows::internship::{placement_router, Actor, InternshipPlacement};

fn router_for(placement: InternshipPlacement) -> Router {
    placement_router(Arc::new(placement))
}

fn student() -> Actor {
    Actor::student(STUDENT.0)
}

fn employer() -> Actor {
    Actor::employeur(EMPLOYEUR.0)
}

fn manager() -> Actor {
    Actor::gestionnaire(GESTIONNAIRE.0)
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    actor: Option<Actor>,
    body: Option<serde_json::Value>,
) -> axum::response::Response {
    router
        .clone()
        .oneshot(request(method, uri, actor, body))
        .await
        .expect("route executes")
}

#[tokio::test]
async fn apply_route_creates_pending_candidature() {
    let router = router_for(placement());

    let response = send(
        &router,
        Method::POST,
        "/api/v1/candidatures",
        Some(student()),
        Some(json!({ "offer_id": OFFER.0, "cv_id": CV.0 })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "PENDING");
    assert_eq!(payload["student_id"], STUDENT.0);
}

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let router = router_for(placement());
    let response = send(&router, Method::GET, "/api/v1/candidatures", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["kind"], "unauthenticated");
}

#[tokio::test]
async fn state_errors_map_to_conflict_with_message() {
    let placement = placement();
    let candidature = placement
        .candidatures
        .apply(STUDENT, OFFER, CV)
        .expect("apply");
    let router = router_for(placement);

    let response = send(
        &router,
        Method::POST,
        &format!("/api/v1/candidatures/{}/accept", candidature.id),
        Some(student()),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], EMPLOYER_MUST_ACCEPT_FIRST);
    assert_eq!(payload["kind"], "invalid_state");
}

#[tokio::test]
async fn foreign_employer_is_forbidden() {
    let placement = placement();
    let candidature = placement
        .candidatures
        .apply(STUDENT, OFFER, CV)
        .expect("apply");
    let router = router_for(placement);

    let response = send(
        &router,
        Method::POST,
        &format!("/api/v1/candidatures/{}/reject", candidature.id),
        Some(Actor::employeur(OTHER_EMPLOYEUR.0)),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], NOT_YOUR_OFFER);
}

#[tokio::test]
async fn unknown_candidature_is_not_found() {
    let router = router_for(placement());
    let response = send(
        &router,
        Method::POST,
        "/api/v1/candidatures/9999/accept",
        Some(employer()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn entente_creation_is_reserved_to_managers_and_validated() {
    let placement = placement();
    let candidature = accepted_candidature(&placement);
    let router = router_for(placement);

    let response = send(
        &router,
        Method::POST,
        "/api/v1/ententes",
        Some(student()),
        Some(json!({ "candidature_id": candidature.id, "missions_objectifs": "Missions" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        &router,
        Method::POST,
        "/api/v1/ententes",
        Some(manager()),
        Some(json!({ "candidature_id": candidature.id, "missions_objectifs": " " })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn repository_failures_are_internal_errors() {
    let router = router_for(placement_with_candidatures(Arc::new(UnavailableCandidatures)));
    let response = send(
        &router,
        Method::POST,
        "/api/v1/candidatures",
        Some(student()),
        Some(json!({ "offer_id": OFFER.0, "cv_id": CV.0 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(payload["kind"], "internal");
}

#[tokio::test]
async fn full_placement_over_http() {
    let router = router_for(placement());

    let response = send(
        &router,
        Method::POST,
        "/api/v1/candidatures",
        Some(student()),
        Some(json!({ "offer_id": OFFER.0, "cv_id": CV.0 })),
    )
    .await;
    let candidature_id = read_json_body(response).await["id"]
        .as_u64()
        .expect("candidature id");

    for actor in [employer(), student()] {
        let response = send(
            &router,
            Method::POST,
            &format!("/api/v1/candidatures/{candidature_id}/accept"),
            Some(actor),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = send(
        &router,
        Method::POST,
        "/api/v1/ententes",
        Some(manager()),
        Some(json!({
            "candidature_id": candidature_id,
            "missions_objectifs": "Automatiser les tests de régression"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let entente_id = read_json_body(response).await["id"]
        .as_u64()
        .expect("entente id");

    let response = send(
        &router,
        Method::POST,
        &format!("/api/v1/ententes/{entente_id}/professeur"),
        Some(manager()),
        Some(json!({ "professeur_id": PROFESSEUR.0 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &router,
        Method::POST,
        &format!("/api/v1/ententes/{entente_id}/submit"),
        Some(manager()),
        None,
    )
    .await;
    assert_eq!(read_json_body(response).await["statut"], "EN_ATTENTE_SIGNATURE");

    let mut last = serde_json::Value::Null;
    for actor in [student(), employer(), manager()] {
        let response = send(
            &router,
            Method::POST,
            &format!("/api/v1/ententes/{entente_id}/sign"),
            Some(actor),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        last = read_json_body(response).await;
    }
    assert_eq!(last["statut"], "VALIDEE");
    assert!(!last["date_validation"].is_null());

    let response = send(
        &router,
        Method::GET,
        &format!("/api/v1/ententes/{entente_id}"),
        Some(Actor::professeur(PROFESSEUR.0)),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let view = read_json_body(response).await;
    assert_eq!(view["offer_id"], OFFER.0);
    assert_eq!(view["remuneration_cents"], 2_000);

    let response = send(
        &router,
        Method::POST,
        &format!("/api/v1/ententes/{entente_id}/evaluations"),
        Some(employer()),
        Some(json!({ "kind": "stagiaire", "score": 5, "comments": "Excellent" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(
        &router,
        Method::GET,
        &format!("/api/v1/ententes/{entente_id}/evaluations"),
        Some(student()),
        None,
    )
    .await;
    let evaluations = read_json_body(response).await;
    assert_eq!(evaluations.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn listings_are_scoped_by_role() {
    let placement = placement();
    placement
        .candidatures
        .apply(STUDENT, OFFER, CV)
        .expect("apply");
    placement
        .candidatures
        .apply(OTHER_STUDENT, OTHER_OFFER, CV)
        .expect("apply");
    let router = router_for(placement);

    let response = send(
        &router,
        Method::GET,
        "/api/v1/candidatures",
        Some(student()),
        None,
    )
    .await;
    let listed = read_json_body(response).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let response = send(
        &router,
        Method::GET,
        &format!("/api/v1/offers/{}/candidatures", OTHER_OFFER),
        Some(employer()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        &router,
        Method::GET,
        "/api/v1/candidatures",
        Some(manager()),
        None,
    )
    .await;
    let listed = read_json_body(response).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn convocation_round_trip_over_http() {
    let placement = placement();
    let candidature = placement
        .candidatures
        .apply(STUDENT, OFFER, CV)
        .expect("apply");
    let router = router_for(placement);

    let response = send(
        &router,
        Method::POST,
        &format!("/api/v1/candidatures/{}/convocation", candidature.id),
        Some(employer()),
        Some(json!({
            "scheduled_at": "2025-03-12T14:00:00Z",
            "location": "Salle 3",
            "message": "Entrevue technique"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let convocation_id = read_json_body(response).await["id"]
        .as_u64()
        .expect("convocation id");

    let response = send(
        &router,
        Method::POST,
        &format!("/api/v1/convocations/{convocation_id}/response"),
        Some(student()),
        Some(json!({ "accept": true })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["statut"], "ACCEPTEE");
}
