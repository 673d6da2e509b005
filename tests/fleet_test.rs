//! Tests de integración de flota, mantenimiento, tarjetas de visita y panel

#[macro_use]
mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;
use tower::ServiceExt;

use fleet_booking::models::user::UserRole;

use common::{booking_body, unique_plate};

#[tokio::test]
async fn test_car_type_in_use_cannot_be_deleted() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let car_id = app.create_car(&admin.token, 4, 0).await;

    let (_, car) = app.get(&format!("/api/cars/{}", car_id), &admin.token).await;
    let car_type_id = car["car_type_id"].as_str().unwrap().to_string();
    assert_eq!(car["capacity"], 4);

    let (status, body) = app
        .delete(&format!("/api/car-types/{}", car_type_id), &admin.token)
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let (status, _) = app.delete(&format!("/api/cars/{}", car_id), &admin.token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .delete(&format!("/api/car-types/{}", car_type_id), &admin.token)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_license_plate() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let car_id = app.create_car(&admin.token, 4, 0).await;

    let (_, car) = app.get(&format!("/api/cars/{}", car_id), &admin.token).await;
    let plate = car["license_plate"].as_str().unwrap().to_lowercase();

    // La matrícula se normaliza a mayúsculas antes de comparar
    let (status, _) = app
        .post(
            "/api/cars",
            &admin.token,
            json!({
                "car_type_id": car["car_type_id"],
                "license_plate": plate,
                "brand": "Seat",
                "model": "Leon",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_upload_car_image() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let car_id = app.create_car(&admin.token, 4, 0).await;

    let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    let (status, body) = app
        .post(
            &format!("/api/cars/{}/image", car_id),
            &admin.token,
            json!({ "filename": "front.png", "content_base64": STANDARD.encode(png) }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let image_url = body["data"]["image_url"].as_str().unwrap().to_string();
    assert!(image_url.starts_with("/uploads/cars/"));

    let relative = image_url.trim_start_matches("/uploads/");
    assert!(app.uploads_path().join(relative).exists());

    // Servida como fichero estático
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri(&image_url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Contenido que no es una imagen
    let (status, _) = app
        .post(
            &format!("/api/cars/{}/image", car_id),
            &admin.token,
            json!({ "filename": "front.png", "content_base64": STANDARD.encode(b"plain text") }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_maintenance_flow() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let employee = app.create_user(UserRole::Employee).await;
    let car_id = app.create_car(&admin.token, 4, 3_000).await;

    let (status, created) = app
        .post(
            "/api/maintenance",
            &admin.token,
            json!({ "car_id": car_id, "description": "Brake pads", "cost": "120.50" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["data"]["mileage"], 3_000);
    assert!(created["data"]["completed_at"].is_null());
    let record_id = created["data"]["id"].as_str().unwrap().to_string();

    let (_, car) = app.get(&format!("/api/cars/{}", car_id), &admin.token).await;
    assert_eq!(car["status"], "maintenance");

    // No se puede reservar un vehículo en mantenimiento
    let (status, _) = app
        .post("/api/bookings", &employee.token, booking_body(car_id, 20, "09:00", "10:00"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, completed) = app
        .put(&format!("/api/maintenance/{}/complete", record_id), &admin.token, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK, "{completed}");
    assert!(completed["data"]["completed_at"].is_string());

    let (_, car) = app.get(&format!("/api/cars/{}", car_id), &admin.token).await;
    assert_eq!(car["status"], "available");

    let (status, _) = app
        .put(&format!("/api/maintenance/{}/complete", record_id), &admin.token, json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, list) = app
        .get(&format!("/api/maintenance?car_id={}", car_id), &admin.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_maintenance_rejected_while_booked() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let employee = app.create_user(UserRole::Employee).await;
    let car_id = app.create_car(&admin.token, 4, 0).await;

    let (_, booking) = app
        .post("/api/bookings", &employee.token, booking_body(car_id, 21, "09:00", "10:00"))
        .await;
    let booking_id = booking["data"]["id"].as_str().unwrap().to_string();
    app.put(&format!("/api/bookings/{}/approve", booking_id), &admin.token, json!({}))
        .await;

    let (status, _) = app
        .post(
            "/api/maintenance",
            &admin.token,
            json!({ "car_id": car_id, "description": "Oil change" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_deleting_open_maintenance_releases_car() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let car_id = app.create_car(&admin.token, 4, 0).await;

    let (_, created) = app
        .post(
            "/api/maintenance",
            &admin.token,
            json!({ "car_id": car_id, "description": "Registered by mistake" }),
        )
        .await;
    let record_id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .delete(&format!("/api/maintenance/{}", record_id), &admin.token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, car) = app.get(&format!("/api/cars/{}", car_id), &admin.token).await;
    assert_eq!(car["status"], "available");
}

#[tokio::test]
async fn test_business_card_prefill_and_vcard() {
    require_db!(app);
    let employee = app.create_user(UserRole::Employee).await;
    let other = app.create_user(UserRole::Employee).await;

    let (status, created) = app
        .post(
            "/api/business-cards",
            &employee.token,
            json!({ "address": "Calle Mayor 1, Madrid" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["data"]["full_name"], "Test User");
    assert_eq!(created["data"]["department"], "Operations");
    assert_eq!(created["data"]["company_name"], "Acme Test");
    let card_id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .get(&format!("/api/business-cards/{}", card_id), &other.token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/business-cards?all=true", &employee.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = app
        .put(
            &format!("/api/business-cards/{}", card_id),
            &employee.token,
            json!({ "position": "Team Lead" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["position"], "Team Lead");
    assert_eq!(updated["data"]["address"], "Calle Mayor 1, Madrid");

    let request = Request::builder()
        .uri(format!("/api/business-cards/{}/vcard", card_id))
        .header(header::AUTHORIZATION, format!("Bearer {}", employee.token))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/vcard"));
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("test-user.vcf"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let vcard = String::from_utf8(body.to_vec()).unwrap();
    assert!(vcard.starts_with("BEGIN:VCARD\r\nVERSION:3.0\r\n"));
    assert!(vcard.contains("TITLE:Team Lead\r\n"));
    assert!(vcard.contains("ADR;TYPE=WORK:;;Calle Mayor 1\\, Madrid;;;;\r\n"));

    let (status, list) = app.get("/api/business-cards", &employee.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = app
        .delete(&format!("/api/business-cards/{}", card_id), &employee.token)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_dashboard_stats() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let employee = app.create_user(UserRole::Employee).await;
    let car_id = app.create_car(&admin.token, 4, 100).await;

    let (_, booking) = app
        .post("/api/bookings", &employee.token, booking_body(car_id, 22, "09:00", "10:00"))
        .await;
    let booking_id = booking["data"]["id"].as_str().unwrap().to_string();
    app.put(&format!("/api/bookings/{}/approve", booking_id), &admin.token, json!({}))
        .await;
    app.put(
        &format!("/api/bookings/{}/return", booking_id),
        &employee.token,
        json!({ "end_mileage": 175 }),
    )
    .await;

    let (status, stats) = app.get("/api/dashboard/stats", &admin.token).await;
    assert_eq!(status, StatusCode::OK, "{stats}");

    // La base de datos es compartida: solo cotas inferiores
    assert!(stats["cars"]["total"].as_i64().unwrap() >= 1);
    assert!(stats["bookings"]["completed"].as_i64().unwrap() >= 1);
    assert!(stats["total_distance"].as_i64().unwrap() >= 75);
    assert!(stats["active_users"].as_i64().unwrap() >= 2);
    assert_eq!(
        stats["cars"]["total"].as_i64().unwrap(),
        stats["cars"]["available"].as_i64().unwrap()
            + stats["cars"]["booked"].as_i64().unwrap()
            + stats["cars"]["maintenance"].as_i64().unwrap()
    );
}

#[tokio::test]
async fn test_car_status_follows_approved_bookings() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let employee = app.create_user(UserRole::Employee).await;
    let car_id = app.create_car(&admin.token, 4, 0).await;
    let status_uri = format!("/api/cars/{}/status", car_id);

    // Solo la aprobación de una reserva marca el vehículo como reservado
    let (status, _) = app.put(&status_uri, &admin.token, json!({ "status": "booked" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, booking) = app
        .post("/api/bookings", &employee.token, booking_body(car_id, 22, "09:00", "10:00"))
        .await;
    let booking_id = booking["data"]["id"].as_str().unwrap().to_string();
    let (status, _) = app
        .put(&format!("/api/bookings/{}/approve", booking_id), &admin.token, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    for target in ["maintenance", "available"] {
        let (status, body) = app.put(&status_uri, &admin.token, json!({ "status": target })).await;
        assert_eq!(status, StatusCode::CONFLICT, "{target}: {body}");
    }

    // Mismo estado: no cambia nada
    let (status, same) = app.put(&status_uri, &admin.token, json!({ "status": "booked" })).await;
    assert_eq!(status, StatusCode::OK, "{same}");
    assert_eq!(same["data"]["status"], "booked");

    app.put(&format!("/api/bookings/{}/cancel", booking_id), &admin.token, json!({}))
        .await;

    let (status, body) = app
        .put(&status_uri, &admin.token, json!({ "status": "maintenance" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "maintenance");

    let (status, body) = app.put(&status_uri, &admin.token, json!({ "status": "available" })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "available");
}

#[tokio::test]
async fn test_car_status_follows_open_maintenance() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let employee = app.create_user(UserRole::Employee).await;
    let car_id = app.create_car(&admin.token, 4, 0).await;
    let status_uri = format!("/api/cars/{}/status", car_id);

    let (_, created) = app
        .post(
            "/api/maintenance",
            &admin.token,
            json!({ "car_id": car_id, "description": "Brake pads" }),
        )
        .await;
    let record_id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app.put(&status_uri, &admin.token, json!({ "status": "available" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Sigue en mantenimiento: no se puede reservar
    let (status, _) = app
        .post("/api/bookings", &employee.token, booking_body(car_id, 23, "09:00", "10:00"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .put(&format!("/api/maintenance/{}/complete", record_id), &admin.token, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, car) = app.get(&format!("/api/cars/{}", car_id), &admin.token).await;
    assert_eq!(car["status"], "available");
}

#[tokio::test]
async fn test_employee_cannot_change_car_status() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let employee = app.create_user(UserRole::Employee).await;
    let car_id = app.create_car(&admin.token, 4, 0).await;

    let (status, _) = app
        .put(
            &format!("/api/cars/{}/status", car_id),
            &employee.token,
            json!({ "status": "maintenance" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_car_with_active_bookings_cannot_be_deleted() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let employee = app.create_user(UserRole::Employee).await;
    let car_id = app.create_car(&admin.token, 4, 0).await;

    let (_, booking) = app
        .post("/api/bookings", &employee.token, booking_body(car_id, 24, "09:00", "10:00"))
        .await;
    let booking_id = booking["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app.delete(&format!("/api/cars/{}", car_id), &admin.token).await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    app.put(&format!("/api/bookings/{}/cancel", booking_id), &employee.token, json!({}))
        .await;

    let (status, _) = app.delete(&format!("/api/cars/{}", car_id), &admin.token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/api/cars/{}", car_id), &admin.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let car_id = app.create_car(&admin.token, 4, 0).await;

    // MAX_UPLOAD_BYTES = 1 MiB en los tests; el límite del cuerpo ronda 1.4 MiB
    let content = "A".repeat(2 * 1024 * 1024);
    let (status, _) = app
        .post(
            &format!("/api/cars/{}/image", car_id),
            &admin.token,
            json!({ "filename": "huge.png", "content_base64": content }),
        )
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

    let (_, car) = app.get(&format!("/api/cars/{}", car_id), &admin.token).await;
    assert!(car["image_url"].is_null());
}

#[test]
fn test_unique_plates_are_valid() {
    let plate = unique_plate();
    assert!(fleet_booking::utils::validation::validate_license_plate(&plate).is_ok());
}
