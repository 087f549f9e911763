//! Integration tests for the ticket service and cross-entity cascades.

mod common;

use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use cinebook_core::ticket::TicketFilter;
use cinebook_core::user::{User, UserRole};
use cinebook_db::repositories::TicketRepository;
use cinebook_db::services::{CreateMovieInput, CreateSessionInput};
use cinebook_db::{MovieService, ResponseCache, TicketService, UserService};
use cinebook_shared::AppError;

/// Creates a customer directly through the user service.
async fn create_customer(db: &DatabaseConnection) -> Uuid {
    let user = User::new(
        &common::unique("ticket-user"),
        "$argon2id$test".to_string(),
        UserRole::Customer,
        25,
    )
    .expect("user should validate");

    UserService::new(db.clone())
        .create_user(db, user)
        .await
        .expect("user create should succeed")
        .id
}

/// Creates a movie with one scheduled session, returning the session ID.
async fn create_session(db: &DatabaseConnection) -> Uuid {
    let movies = MovieService::new(db.clone(), ResponseCache::new());

    let movie = movies
        .create_movie(CreateMovieInput {
            title: common::unique("Ticketed"),
            age_restriction: 10,
        })
        .await
        .expect("movie create should succeed");

    movies
        .create_session(
            movie.id,
            CreateSessionInput {
                date: Utc::now() + Duration::days(30),
                timeslot: "20:00-22:00".to_string(),
                room_number: common::unique_room(),
            },
        )
        .await
        .expect("session create should succeed")
        .id
}

#[tokio::test]
async fn test_buy_ticket() {
    let Some(db) = common::setup().await else {
        return;
    };
    let user_id = create_customer(&db).await;
    let session_id = create_session(&db).await;
    let service = TicketService::new(db);

    let ticket = service
        .buy_ticket(user_id, session_id)
        .await
        .expect("purchase should succeed");

    assert_eq!(ticket.user_id, user_id);
    assert_eq!(ticket.session_id, Some(session_id));
    assert!(!ticket.is_used);
    assert!(ticket.used_at.is_none());
}

#[tokio::test]
async fn test_double_purchase_conflicts() {
    let Some(db) = common::setup().await else {
        return;
    };
    let user_id = create_customer(&db).await;
    let session_id = create_session(&db).await;
    let service = TicketService::new(db);

    service
        .buy_ticket(user_id, session_id)
        .await
        .expect("first purchase should succeed");

    let err = service
        .buy_ticket(user_id, session_id)
        .await
        .expect_err("second purchase should fail");
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn test_concurrent_purchases_have_one_winner() {
    let Some(db) = common::setup().await else {
        return;
    };
    let user_id = create_customer(&db).await;
    let session_id = create_session(&db).await;

    // Two independent service handles racing the same purchase. The
    // pre-check cannot see the other transaction; the unique index
    // decides, and the loser still surfaces as a Conflict.
    let first = TicketService::new(db.clone());
    let second = TicketService::new(db.clone());
    let (a, b) = tokio::join!(
        first.buy_ticket(user_id, session_id),
        second.buy_ticket(user_id, session_id)
    );

    let winners = usize::from(a.is_ok()) + usize::from(b.is_ok());
    assert_eq!(winners, 1, "exactly one purchase should win: {a:?} {b:?}");

    let err = match (a, b) {
        (Err(e), Ok(_)) | (Ok(_), Err(e)) => e,
        other => panic!("expected one winner and one loser, got {other:?}"),
    };
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn test_buy_ticket_checks_references() {
    let Some(db) = common::setup().await else {
        return;
    };
    let user_id = create_customer(&db).await;
    let session_id = create_session(&db).await;
    let service = TicketService::new(db);

    let err = service
        .buy_ticket(Uuid::new_v4(), session_id)
        .await
        .expect_err("unknown user should fail");
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");

    let err = service
        .buy_ticket(user_id, Uuid::new_v4())
        .await
        .expect_err("unknown session should fail");
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_use_ticket_is_one_way() {
    let Some(db) = common::setup().await else {
        return;
    };
    let user_id = create_customer(&db).await;
    let session_id = create_session(&db).await;
    let service = TicketService::new(db);

    let ticket = service
        .buy_ticket(user_id, session_id)
        .await
        .expect("purchase should succeed");

    let used = service
        .use_ticket(ticket.id)
        .await
        .expect("first use should succeed");
    assert!(used.is_used);
    assert!(used.used_at.is_some());

    let err = service
        .use_ticket(ticket.id)
        .await
        .expect_err("second use should fail");
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    // Still used afterwards; the state never reverts.
    let tickets = service
        .get_user_tickets(user_id, TicketFilter::Used)
        .await
        .expect("history should succeed");
    assert_eq!(tickets.len(), 1);
    assert!(tickets[0].is_used);
}

#[tokio::test]
async fn test_use_missing_ticket_not_found() {
    let Some(db) = common::setup().await else {
        return;
    };
    let err = TicketService::new(db)
        .use_ticket(Uuid::new_v4())
        .await
        .expect_err("should fail");
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_delete_ticket() {
    let Some(db) = common::setup().await else {
        return;
    };
    let user_id = create_customer(&db).await;
    let session_id = create_session(&db).await;
    let service = TicketService::new(db);

    let ticket = service
        .buy_ticket(user_id, session_id)
        .await
        .expect("purchase should succeed");

    service
        .delete_ticket(ticket.id)
        .await
        .expect("delete should succeed");

    let err = service
        .delete_ticket(ticket.id)
        .await
        .expect_err("second delete should fail");
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_user_ticket_filters() {
    let Some(db) = common::setup().await else {
        return;
    };
    let user_id = create_customer(&db).await;
    let first_session = create_session(&db).await;
    let second_session = create_session(&db).await;
    let service = TicketService::new(db);

    let used_ticket = service
        .buy_ticket(user_id, first_session)
        .await
        .expect("purchase should succeed");
    let unused_ticket = service
        .buy_ticket(user_id, second_session)
        .await
        .expect("purchase should succeed");
    service
        .use_ticket(used_ticket.id)
        .await
        .expect("use should succeed");

    let all = service
        .get_user_tickets(user_id, TicketFilter::All)
        .await
        .expect("history should succeed");
    assert_eq!(all.len(), 2);

    let used = service
        .get_user_tickets(user_id, TicketFilter::Used)
        .await
        .expect("history should succeed");
    assert_eq!(used.len(), 1);
    assert_eq!(used[0].id, used_ticket.id);

    let unused = service
        .get_user_tickets(user_id, TicketFilter::Unused)
        .await
        .expect("history should succeed");
    assert_eq!(unused.len(), 1);
    assert_eq!(unused[0].id, unused_ticket.id);
}

#[tokio::test]
async fn test_user_tickets_for_missing_user_not_found() {
    let Some(db) = common::setup().await else {
        return;
    };
    let err = TicketService::new(db)
        .get_user_tickets(Uuid::new_v4(), TicketFilter::All)
        .await
        .expect_err("should fail");
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_deleting_session_detaches_tickets() {
    let Some(db) = common::setup().await else {
        return;
    };
    let user_id = create_customer(&db).await;
    let session_id = create_session(&db).await;
    let tickets = TicketService::new(db.clone());

    let ticket = tickets
        .buy_ticket(user_id, session_id)
        .await
        .expect("purchase should succeed");

    MovieService::new(db.clone(), ResponseCache::new())
        .delete_session(session_id)
        .await
        .expect("session delete should succeed");

    // The ticket survives as history with its session detached.
    let model = TicketRepository::find_by_id(&db, ticket.id)
        .await
        .expect("query should succeed")
        .expect("ticket should still exist");
    assert_eq!(model.session_id, None);
}

#[tokio::test]
async fn test_deleting_user_cascades_to_tickets() {
    let Some(db) = common::setup().await else {
        return;
    };
    let user_id = create_customer(&db).await;
    let session_id = create_session(&db).await;
    let tickets = TicketService::new(db.clone());

    let ticket = tickets
        .buy_ticket(user_id, session_id)
        .await
        .expect("purchase should succeed");

    UserService::new(db.clone())
        .delete_user(user_id)
        .await
        .expect("user delete should succeed");

    let found = TicketRepository::find_by_id(&db, ticket.id)
        .await
        .expect("query should succeed");
    assert!(found.is_none(), "ticket should be gone with its user");
}

#[tokio::test]
async fn test_get_user_by_id_includes_ticket_history() {
    let Some(db) = common::setup().await else {
        return;
    };
    let user_id = create_customer(&db).await;
    let session_id = create_session(&db).await;

    TicketService::new(db.clone())
        .buy_ticket(user_id, session_id)
        .await
        .expect("purchase should succeed");

    let detail = UserService::new(db)
        .get_user_by_id(user_id)
        .await
        .expect("detail should succeed");

    assert_eq!(detail.user.id, user_id);
    assert_eq!(detail.tickets.len(), 1);
    assert_eq!(detail.tickets[0].session_id, Some(session_id));
}
