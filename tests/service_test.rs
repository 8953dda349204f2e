//! Service behaviour against a real (in-memory SQLite) database.

mod common;

use common::{admin, certificate, register};
use gift_certificates::domain::{
    CertificateFilter, CertificateQuery, CreateTag, Role, UpdateCertificate,
};
use gift_certificates::errors::AppError;
use gift_certificates::messages;
use gift_certificates::services::ServiceContainer;
use gift_certificates::types::PaginationParams;

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn purchase_creates_exactly_one_order() {
    let (_db, services) = common::services().await;
    let alice = register(&services, "alice").await;
    let spa = services
        .certificates()
        .save(certificate("Spa day", 4999, &["spa"]))
        .await
        .unwrap();

    let order = services
        .users()
        .purchase_certificate(alice.id, spa.id)
        .await
        .unwrap();

    assert_eq!(order.user_id, alice.id);
    assert_eq!(order.certificate_id, spa.id);
    assert_eq!(order.cost, spa.price);

    let orders = services
        .orders()
        .list_by_user(alice.id, PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(orders.meta.total_elements, 1);
    assert_eq!(orders.data[0].id, order.id);
}

#[tokio::test]
async fn failed_purchase_leaves_no_order() {
    let (_db, services) = common::services().await;
    let alice = register(&services, "alice").await;
    let spa = services
        .certificates()
        .save(certificate("Spa day", 4999, &["spa"]))
        .await
        .unwrap();

    let missing_certificate = services.users().purchase_certificate(alice.id, 999).await;
    let missing_user = services.users().purchase_certificate(999, spa.id).await;

    assert!(matches!(
        missing_certificate,
        Err(AppError::NotFound(messages::CERTIFICATE_NOT_FOUND))
    ));
    assert!(matches!(
        missing_user,
        Err(AppError::NotFound(messages::USER_NOT_FOUND))
    ));

    let orders = services
        .orders()
        .list(PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(orders.meta.total_elements, 0);
}

#[tokio::test]
async fn order_lookup_is_scoped_to_its_user() {
    let (_db, services) = common::services().await;
    let alice = register(&services, "alice").await;
    let bob = register(&services, "bob").await;
    let spa = services
        .certificates()
        .save(certificate("Spa day", 4999, &["spa"]))
        .await
        .unwrap();
    let order = services
        .users()
        .purchase_certificate(alice.id, spa.id)
        .await
        .unwrap();

    assert!(services.orders().find_for_user(alice.id, order.id).await.is_ok());
    assert!(matches!(
        services.orders().find_for_user(bob.id, order.id).await,
        Err(AppError::NotFound(messages::ORDER_NOT_FOUND))
    ));
}

// =============================================================================
// Tags
// =============================================================================

#[tokio::test]
async fn duplicate_tag_fails_validation_and_nothing_is_written() {
    let (_db, services) = common::services().await;
    let tags = services.tags();

    tags.save(CreateTag {
        name: "spa".to_string(),
    })
    .await
    .unwrap();

    let duplicate = tags
        .save(CreateTag {
            name: "  spa ".to_string(),
        })
        .await;

    assert!(matches!(
        duplicate,
        Err(AppError::Invalid(messages::TAG_EXISTS))
    ));
    assert_eq!(tags.count().await.unwrap(), 1);
}

#[tokio::test]
async fn deleting_unknown_ids_is_not_found() {
    let (_db, services) = common::services().await;

    assert!(matches!(
        services.tags().delete(42).await,
        Err(AppError::NotFound(messages::TAG_NOT_FOUND))
    ));
    assert!(matches!(
        services.users().delete(42).await,
        Err(AppError::NotFound(messages::USER_NOT_FOUND))
    ));
    assert!(matches!(
        services.orders().delete(42).await,
        Err(AppError::NotFound(messages::ORDER_NOT_FOUND))
    ));
    assert!(matches!(
        services.certificates().delete(42).await,
        Err(AppError::NotFound(messages::CERTIFICATE_NOT_FOUND))
    ));
}

#[tokio::test]
async fn most_popular_tag_comes_from_the_top_spender() {
    let (_db, services) = common::services().await;

    assert!(matches!(
        services.tags().most_popular_tag().await,
        Err(AppError::NotFound(messages::POPULAR_TAG_NOT_FOUND))
    ));

    let alice = register(&services, "alice").await;
    let bob = register(&services, "bob").await;
    let certificates = services.certificates();
    let spa = certificates
        .save(certificate("Spa day", 1000, &["spa"]))
        .await
        .unwrap();
    let dinner = certificates
        .save(certificate("Dinner", 10000, &["food"]))
        .await
        .unwrap();
    let yoga = certificates
        .save(certificate("Yoga", 5000, &["relax"]))
        .await
        .unwrap();

    let users = services.users();
    users.purchase_certificate(alice.id, spa.id).await.unwrap();
    users.purchase_certificate(bob.id, dinner.id).await.unwrap();
    users.purchase_certificate(bob.id, dinner.id).await.unwrap();
    users.purchase_certificate(bob.id, yoga.id).await.unwrap();

    let popular = services.tags().most_popular_tag().await.unwrap();
    assert_eq!(popular.name, "food");
}

// =============================================================================
// Certificates
// =============================================================================

#[tokio::test]
async fn saving_certificates_reuses_existing_tags() {
    let (_db, services) = common::services().await;
    let certificates = services.certificates();

    let first = certificates
        .save(certificate("Spa day", 4999, &["spa", "relax"]))
        .await
        .unwrap();
    let second = certificates
        .save(certificate("Sauna", 2999, &["spa"]))
        .await
        .unwrap();

    assert_eq!(first.tags.len(), 2);
    assert_eq!(services.tags().count().await.unwrap(), 2);
    assert!(first.tags.iter().any(|t| t.id == second.tags[0].id));
}

#[tokio::test]
async fn search_requires_every_tag() {
    let (_db, services) = common::services().await;
    let certificates = services.certificates();
    certificates
        .save(certificate("Spa day", 4999, &["spa", "relax"]))
        .await
        .unwrap();
    certificates
        .save(certificate("Sauna", 2999, &["spa"]))
        .await
        .unwrap();

    let filter = CertificateFilter::from(CertificateQuery {
        tags: Some("relax, spa".to_string()),
        ..Default::default()
    });
    let page = certificates
        .search(filter, PaginationParams::default())
        .await
        .unwrap();

    assert_eq!(page.meta.total_elements, 1);
    assert_eq!(page.data[0].name, "Spa day");

    let filter = CertificateFilter::from(CertificateQuery {
        search: Some("sauna".to_string()),
        ..Default::default()
    });
    let page = certificates
        .search(filter, PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].name, "Sauna");
}

#[tokio::test]
async fn search_text_matches_wildcards_literally() {
    let (_db, services) = common::services().await;
    let certificates = services.certificates();
    certificates
        .save(certificate("50% off spa", 4999, &[]))
        .await
        .unwrap();
    certificates
        .save(certificate("500 club", 2999, &[]))
        .await
        .unwrap();

    let filter = CertificateFilter::from(CertificateQuery {
        search: Some("50%".to_string()),
        ..Default::default()
    });
    let page = certificates
        .search(filter, PaginationParams::default())
        .await
        .unwrap();

    assert_eq!(page.meta.total_elements, 1);
    assert_eq!(page.data[0].name, "50% off spa");
}

#[tokio::test]
async fn update_replaces_tags_and_bumps_last_update() {
    let (_db, services) = common::services().await;
    let certificates = services.certificates();
    let created = certificates
        .save(certificate("Spa day", 4999, &["spa", "relax"]))
        .await
        .unwrap();

    let updated = certificates
        .update(
            created.id,
            UpdateCertificate {
                tags: Some(vec!["wellness".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let names: Vec<&str> = updated.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["wellness"]);
    assert_eq!(updated.name, created.name);
    assert!(updated.last_update_date >= created.last_update_date);
}

#[tokio::test]
async fn ordered_certificate_cannot_be_deleted() {
    let (_db, services) = common::services().await;
    let alice = register(&services, "alice").await;
    let spa = services
        .certificates()
        .save(certificate("Spa day", 4999, &["spa"]))
        .await
        .unwrap();
    services
        .users()
        .purchase_certificate(alice.id, spa.id)
        .await
        .unwrap();

    assert!(matches!(
        services.certificates().delete(spa.id).await,
        Err(AppError::Conflict(messages::CERTIFICATE_IN_USE))
    ));

    // Removing the user drops their orders with them
    services.users().delete(alice.id).await.unwrap();
    services.certificates().delete(spa.id).await.unwrap();
}

#[tokio::test]
async fn attaching_a_tag_twice_keeps_one_link() {
    let (_db, services) = common::services().await;
    let spa = services
        .certificates()
        .save(certificate("Spa day", 4999, &[]))
        .await
        .unwrap();
    let tag = services
        .tags()
        .save(CreateTag {
            name: "gift".to_string(),
        })
        .await
        .unwrap();

    let first = services.tags().attach_to_certificate(tag.id, spa.id).await.unwrap();
    let attached = services
        .tags()
        .attach_to_certificate(tag.id, spa.id)
        .await
        .unwrap();

    assert_eq!(first.tags.len(), 1);
    assert!(first.last_update_date >= spa.last_update_date);
    assert_eq!(attached.tags.len(), 1);
    assert_eq!(attached.last_update_date, first.last_update_date);
    assert!(matches!(
        services.tags().attach_to_certificate(tag.id, 999).await,
        Err(AppError::NotFound(messages::CERTIFICATE_NOT_FOUND))
    ));
    assert!(matches!(
        services.tags().attach_to_certificate(999, spa.id).await,
        Err(AppError::NotFound(messages::TAG_NOT_FOUND))
    ));
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn admin_holds_both_roles_and_names_stay_unique() {
    let (_db, services) = common::services().await;
    let root = admin(&services, "root").await;

    assert!(root.has_role(Role::Admin));
    assert!(root.has_role(Role::User));

    let taken = services
        .users()
        .register(common::registration("root"))
        .await;
    assert!(matches!(taken, Err(AppError::Conflict(messages::USER_EXISTS))));
}

#[tokio::test]
async fn login_issues_a_verifiable_token() {
    let (_db, services) = common::services().await;
    let alice = register(&services, "alice").await;

    let token = services
        .auth()
        .login("alice".to_string(), "correct-horse".to_string())
        .await
        .unwrap();
    let claims = services.auth().verify_token(&token.access_token).unwrap();

    assert_eq!(claims.sub, alice.id);
    assert_eq!(claims.roles, vec![Role::User]);
    assert!(matches!(
        services
            .auth()
            .login("alice".to_string(), "wrong-horse".to_string())
            .await,
        Err(AppError::InvalidCredentials)
    ));
}
