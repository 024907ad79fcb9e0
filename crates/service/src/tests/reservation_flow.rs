use chrono::Duration;
use models::reservation::{self, ReservationStatus};
use models::timestamps;
use sea_orm::{ActiveModelTrait, EntityTrait};
use uuid::Uuid;

use super::{seed_author, seed_book};
use crate::errors::ServiceError;
use crate::pagination::PageParams;
use crate::reservation::domain::{CreateReservationRequest, ReservationFilter};
use crate::test_support::get_db;
use crate::{AuthorService, BookService, ReservationPolicy, ReservationService};

fn request(book_id: i64, user: &str) -> CreateReservationRequest {
    CreateReservationRequest { book_id: Some(book_id), user_name: Some(user.into()) }
}

#[tokio::test]
async fn reserve_cancel_and_reserve_again() -> Result<(), anyhow::Error> {
    let Some(db) = get_db().await? else { return Ok(()) };
    let authors = AuthorService::new(db.clone());
    let books = BookService::new(db.clone());
    let svc = ReservationService::new(db, ReservationPolicy::default());

    let a = seed_author(&authors, "Res", "Author").await?;
    let b = seed_book(&books, "Reservable", vec![a]).await?;

    let first = svc.create(request(b, "alice")).await?;
    assert_eq!(first.status, ReservationStatus::Active);
    assert_eq!(first.book_title, "Reservable");
    assert_eq!(first.expires_at - first.reserved_at, Duration::days(14));
    assert!(first.cancelled_at.is_none());

    match svc.create(request(b, "bob")).await {
        Err(ServiceError::BookAlreadyReserved(id)) => assert_eq!(id, b),
        other => panic!("unexpected {other:?}"),
    }

    let cancelled = svc.cancel(first.id).await?;
    assert_eq!(cancelled.status, ReservationStatus::Cancelled);
    assert!(cancelled.cancelled_at.is_some());

    assert!(matches!(
        svc.cancel(first.id).await,
        Err(ServiceError::InvalidReservationState { status: ReservationStatus::Cancelled, .. })
    ));

    let second = svc.create(request(b, "bob")).await?;
    assert_ne!(second.id, first.id);
    assert_eq!(svc.get(first.id).await?.status, ReservationStatus::Cancelled);
    Ok(())
}

#[tokio::test]
async fn missing_book_is_not_found() -> Result<(), anyhow::Error> {
    let Some(db) = get_db().await? else { return Ok(()) };
    let svc = ReservationService::new(db, ReservationPolicy::default());
    match svc.create(request(i64::MAX, "nobody")).await {
        Err(ServiceError::NotFound { entity, .. }) => assert_eq!(entity, "Book"),
        other => panic!("unexpected {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn overdue_reservation_is_replaced() -> Result<(), anyhow::Error> {
    let Some(db) = get_db().await? else { return Ok(()) };
    let authors = AuthorService::new(db.clone());
    let books = BookService::new(db.clone());
    let svc = ReservationService::new(db.clone(), ReservationPolicy::default());

    let a = seed_author(&authors, "Late", "Return").await?;
    let b = seed_book(&books, "Overdue", vec![a]).await?;
    let stale = reservation::new_active(b, "frank", timestamps::now() - Duration::days(20), 14)
        .insert(db.as_ref())
        .await?;

    let fresh = svc.create(request(b, "gina")).await?;
    assert_eq!(fresh.status, ReservationStatus::Active);
    let old = reservation::Entity::find_by_id(stale.id).one(db.as_ref()).await?.unwrap();
    assert_eq!(old.status, ReservationStatus::Expired);
    Ok(())
}

#[tokio::test]
async fn concurrent_requests_yield_one_reservation() -> Result<(), anyhow::Error> {
    let Some(db) = get_db().await? else { return Ok(()) };
    let authors = AuthorService::new(db.clone());
    let books = BookService::new(db.clone());
    let svc = ReservationService::new(db, ReservationPolicy::default());

    let a = seed_author(&authors, "Race", "Condition").await?;
    let b = seed_book(&books, "Contested", vec![a]).await?;

    let mut handles = Vec::new();
    for i in 0..10 {
        let svc = svc.clone();
        handles.push(tokio::spawn(async move { svc.create(request(b, &format!("user{}", i))).await }));
    }
    let mut ok = 0;
    let mut conflicts = 0;
    for h in handles {
        match h.await? {
            Ok(_) => ok += 1,
            Err(ServiceError::BookAlreadyReserved(_)) | Err(ServiceError::Conflict(_)) => conflicts += 1,
            Err(other) => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(conflicts, 9);
    Ok(())
}

#[tokio::test]
async fn list_filters_and_sweep() -> Result<(), anyhow::Error> {
    let Some(db) = get_db().await? else { return Ok(()) };
    let authors = AuthorService::new(db.clone());
    let books = BookService::new(db.clone());
    let svc = ReservationService::new(db.clone(), ReservationPolicy::default());

    let a = seed_author(&authors, "Filter", "Me").await?;
    let b1 = seed_book(&books, "First", vec![a]).await?;
    let b2 = seed_book(&books, "Second", vec![a]).await?;
    let user = format!("user-{}", Uuid::new_v4());
    svc.create(request(b1, &user)).await?;
    reservation::new_active(b2, &user, timestamps::now() - Duration::days(30), 14).insert(db.as_ref()).await?;

    let by_user = ReservationFilter { user_name: Some(user.clone()), ..Default::default() };
    let all = svc.list(&by_user, &PageParams::default()).await?;
    assert_eq!(all.total_elements, 2);

    assert!(svc.expire_overdue().await? >= 1);

    let expired = ReservationFilter { user_name: Some(user.clone()), status: Some("EXPIRED".into()), ..Default::default() };
    let page = svc.list(&expired, &PageParams::default()).await?;
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].book_id, b2);
    assert_eq!(page.content[0].book_title, "Second");

    let by_book = ReservationFilter { book_id: Some(b1), ..Default::default() };
    let page = svc.list(&by_book, &PageParams::default()).await?;
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].status, ReservationStatus::Active);
    Ok(())
}
