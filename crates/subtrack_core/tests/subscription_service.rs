use serde_json::json;
use subtrack_core::db::open_db_in_memory;
use subtrack_core::{
    parse_subscription_id, ServiceError, SqliteSubscriptionRepository, SubscriptionRepository,
    SubscriptionService, ValidationError,
};

#[test]
fn create_from_json_keeps_input_strings_and_coerces_price() {
    let conn = open_db_in_memory().unwrap();
    let service = SubscriptionService::new(SqliteSubscriptionRepository::new(&conn));

    let created = service
        .create_from_json(&json!({
            "name": "Netflix",
            "price": 15.99,
            "cycle": "Monthly ",
            "startDate": "2023-01-01"
        }))
        .unwrap();

    assert_eq!(created.name, "Netflix");
    assert_eq!(created.cycle, "Monthly ");
    assert_eq!(created.price, 15.99);
    assert!(created.active);
}

#[test]
fn create_from_json_rejects_each_missing_or_falsy_field() {
    let conn = open_db_in_memory().unwrap();
    let service = SubscriptionService::new(SqliteSubscriptionRepository::new(&conn));
    let complete = json!({
        "name": "Spotify",
        "price": 9.99,
        "cycle": "monthly",
        "startDate": "2023-02-01"
    });

    for field in ["name", "price", "cycle", "startDate"] {
        let mut missing = complete.clone();
        missing.as_object_mut().unwrap().remove(field);
        let err = service.create_from_json(&missing).unwrap_err();
        assert!(
            matches!(err, ServiceError::Validation(ValidationError::MissingField(_))),
            "missing {field} should be rejected, got {err}"
        );
    }

    for (field, falsy) in [
        ("name", json!("")),
        ("price", json!(0)),
        ("cycle", json!(null)),
        ("startDate", json!(false)),
    ] {
        let mut body = complete.clone();
        body[field] = falsy;
        let err = service.create_from_json(&body).unwrap_err();
        assert!(
            matches!(err, ServiceError::Validation(ValidationError::MissingField(f)) if f == field),
            "falsy {field} should be rejected, got {err}"
        );
    }

    let repo = SqliteSubscriptionRepository::new(&conn);
    assert_eq!(repo.count_subscriptions().unwrap(), 0);
}

#[test]
fn create_from_json_rejects_unparseable_dates() {
    let conn = open_db_in_memory().unwrap();
    let service = SubscriptionService::new(SqliteSubscriptionRepository::new(&conn));

    let err = service
        .create_from_json(&json!({
            "name": "iCloud",
            "price": 0.99,
            "cycle": "monthly",
            "startDate": "sometime"
        }))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::InvalidDate(_))
    ));
}

#[test]
fn update_from_json_rejects_empty_and_unrecognized_bodies() {
    let conn = open_db_in_memory().unwrap();
    let service = SubscriptionService::new(SqliteSubscriptionRepository::new(&conn));
    let created = service
        .create_from_json(&json!({
            "name": "Netflix",
            "price": 15.99,
            "cycle": "monthly",
            "startDate": "2023-01-01"
        }))
        .unwrap();
    for body in [json!({}), json!({ "unrecognizedKey": "x" })] {
        let err = service.update_from_json(created.id, &body).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::EmptyUpdate)
        ));
    }
}

#[test]
fn update_from_json_sets_only_price() {
    let conn = open_db_in_memory().unwrap();
    let service = SubscriptionService::new(SqliteSubscriptionRepository::new(&conn));
    let created = service
        .create_from_json(&json!({
            "name": "Netflix",
            "price": 15.99,
            "cycle": "monthly",
            "startDate": "2023-01-01"
        }))
        .unwrap();

    let updated = service
        .update_from_json(created.id, &json!({ "price": 5 }))
        .unwrap();

    assert_eq!(updated.price, 5.0);
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.cycle, created.cycle);
    assert_eq!(updated.start_date, created.start_date);
    assert_eq!(updated.active, created.active);
    assert_eq!(updated.created_at, created.created_at);
}

#[test]
fn invalid_ids_fail_before_touching_storage() {
    let conn = open_db_in_memory().unwrap();
    let service = SubscriptionService::new(SqliteSubscriptionRepository::new(&conn));
    service
        .create_from_json(&json!({
            "name": "Netflix",
            "price": 15.99,
            "cycle": "monthly",
            "startDate": "2023-01-01"
        }))
        .unwrap();

    for bad in ["abc", "0", "", "-1"] {
        let err = parse_subscription_id(bad).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidId(_)), "`{bad}`");
    }

    assert_eq!(service.list().unwrap().len(), 1);
}

#[test]
fn unknown_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = SubscriptionService::new(SqliteSubscriptionRepository::new(&conn));

    assert!(matches!(
        service.delete(999).unwrap_err(),
        ServiceError::NotFound(999)
    ));
    assert!(matches!(
        service
            .update_from_json(999, &json!({ "active": false }))
            .unwrap_err(),
        ServiceError::NotFound(999)
    ));
}

#[test]
fn create_from_json_accepts_string_zero_price() {
    let conn = open_db_in_memory().unwrap();
    let service = SubscriptionService::new(SqliteSubscriptionRepository::new(&conn));

    let created = service
        .create_from_json(&json!({
            "name": "Free tier",
            "price": "0",
            "cycle": "monthly",
            "startDate": "2023-04-01"
        }))
        .unwrap();

    assert_eq!(created.price, 0.0);
    assert_eq!(service.list().unwrap(), vec![created]);
}
