//! Tests de integración del ciclo de vida de las reservas
//!
//! Cada test crea su propio vehículo, así que pueden ejecutarse en paralelo
//! sobre la misma base de datos.

#[macro_use]
mod common;

use axum::http::StatusCode;
use serde_json::json;

use fleet_booking::models::user::UserRole;

use common::booking_body;

#[tokio::test]
async fn test_full_booking_lifecycle() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let employee = app.create_user(UserRole::Employee).await;
    let car_id = app.create_car(&admin.token, 5, 10_000).await;

    // Solicitud
    let (status, created) = app
        .post("/api/bookings", &employee.token, booking_body(car_id, 10, "09:00", "12:00"))
        .await;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["data"]["status"], "pending");
    assert!(created["data"]["license_plate"].is_string());
    let booking_id = created["data"]["id"].as_str().unwrap().to_string();

    // Solapamiento con una solicitud pendiente
    let (status, _) = app
        .post("/api/bookings", &employee.token, booking_body(car_id, 10, "11:00", "13:00"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Intervalos semiabiertos: empezar justo al terminar no solapa
    let (status, back_to_back) = app
        .post("/api/bookings", &employee.token, booking_body(car_id, 10, "12:00", "13:00"))
        .await;
    assert_eq!(status, StatusCode::OK, "{back_to_back}");

    // Aprobación
    let (status, approved) = app
        .put(&format!("/api/bookings/{}/approve", booking_id), &admin.token, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK, "{approved}");
    assert_eq!(approved["data"]["status"], "approved");
    assert_eq!(approved["data"]["start_mileage"], 10_000);
    assert_eq!(approved["data"]["approved_by"], admin.user.id.to_string());

    let (_, car) = app.get(&format!("/api/cars/{}", car_id), &employee.token).await;
    assert_eq!(car["status"], "booked");

    // Una reserva aprobada no se puede volver a aprobar
    let (status, _) = app
        .put(&format!("/api/bookings/{}/approve", booking_id), &admin.token, json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Devolución
    let (status, returned) = app
        .put(
            &format!("/api/bookings/{}/return", booking_id),
            &employee.token,
            json!({ "end_mileage": 10_120 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{returned}");
    assert_eq!(returned["data"]["status"], "completed");
    assert_eq!(returned["data"]["distance"], 120);

    let (_, car) = app.get(&format!("/api/cars/{}", car_id), &employee.token).await;
    assert_eq!(car["status"], "available");
    assert_eq!(car["mileage"], 10_120);

    // Estado terminal
    let (status, _) = app
        .put(&format!("/api/bookings/{}/cancel", booking_id), &employee.token, json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_reject_booking() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let employee = app.create_user(UserRole::Employee).await;
    let car_id = app.create_car(&admin.token, 5, 0).await;

    let (_, created) = app
        .post("/api/bookings", &employee.token, booking_body(car_id, 11, "08:00", "09:30"))
        .await;
    let booking_id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, rejected) = app
        .put(
            &format!("/api/bookings/{}/reject", booking_id),
            &admin.token,
            json!({ "reason": "Vehicle reserved for management" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{rejected}");
    assert_eq!(rejected["data"]["status"], "rejected");
    assert_eq!(rejected["data"]["rejection_reason"], "Vehicle reserved for management");

    let (status, _) = app
        .put(&format!("/api/bookings/{}/approve", booking_id), &admin.token, json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // El hueco queda libre otra vez
    let (status, _) = app
        .post("/api/bookings", &employee.token, booking_body(car_id, 11, "08:00", "09:30"))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_cancel_approved_booking_releases_car() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let employee = app.create_user(UserRole::Employee).await;
    let car_id = app.create_car(&admin.token, 5, 500).await;

    let (_, created) = app
        .post("/api/bookings", &employee.token, booking_body(car_id, 12, "14:00", "18:00"))
        .await;
    let booking_id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .put(&format!("/api/bookings/{}/approve", booking_id), &admin.token, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, cancelled) = app
        .put(&format!("/api/bookings/{}/cancel", booking_id), &employee.token, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK, "{cancelled}");
    assert_eq!(cancelled["data"]["status"], "cancelled");

    let (_, car) = app.get(&format!("/api/cars/{}", car_id), &admin.token).await;
    assert_eq!(car["status"], "available");
}

#[tokio::test]
async fn test_consecutive_bookings_measure_their_own_trip() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let employee = app.create_user(UserRole::Employee).await;
    let car_id = app.create_car(&admin.token, 5, 10_000).await;

    let mut ids = Vec::new();
    for day in [15, 16] {
        let (_, created) = app
            .post("/api/bookings", &employee.token, booking_body(car_id, day, "09:00", "17:00"))
            .await;
        let booking_id = created["data"]["id"].as_str().unwrap().to_string();
        let (status, approved) = app
            .put(&format!("/api/bookings/{}/approve", booking_id), &admin.token, json!({}))
            .await;
        assert_eq!(status, StatusCode::OK, "{approved}");
        assert_eq!(approved["data"]["start_mileage"], 10_000);
        ids.push(booking_id);
    }

    let (status, first) = app
        .put(&format!("/api/bookings/{}/return", ids[0]), &employee.token, json!({ "end_mileage": 10_100 }))
        .await;
    assert_eq!(status, StatusCode::OK, "{first}");
    assert_eq!(first["data"]["distance"], 100);

    // La segunda reserva sigue reteniendo el vehículo
    let (_, car) = app.get(&format!("/api/cars/{}", car_id), &admin.token).await;
    assert_eq!(car["status"], "booked");

    // Por debajo de lo que ya marcó la primera devolución
    let (status, _) = app
        .put(&format!("/api/bookings/{}/return", ids[1]), &employee.token, json!({ "end_mileage": 10_050 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, second) = app
        .put(&format!("/api/bookings/{}/return", ids[1]), &employee.token, json!({ "end_mileage": 10_150 }))
        .await;
    assert_eq!(status, StatusCode::OK, "{second}");
    assert_eq!(second["data"]["start_mileage"], 10_100);
    assert_eq!(second["data"]["end_mileage"], 10_150);
    assert_eq!(second["data"]["distance"], 50);

    let (_, car) = app.get(&format!("/api/cars/{}", car_id), &admin.token).await;
    assert_eq!(car["status"], "available");
    assert_eq!(car["mileage"], 10_150);
}

#[tokio::test]
async fn test_return_with_lower_mileage_is_rejected() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let employee = app.create_user(UserRole::Employee).await;
    let car_id = app.create_car(&admin.token, 5, 2_000).await;

    let (_, created) = app
        .post("/api/bookings", &employee.token, booking_body(car_id, 13, "09:00", "10:00"))
        .await;
    let booking_id = created["data"]["id"].as_str().unwrap().to_string();
    app.put(&format!("/api/bookings/{}/approve", booking_id), &admin.token, json!({}))
        .await;

    let (status, _) = app
        .put(
            &format!("/api/bookings/{}/return", booking_id),
            &employee.token,
            json!({ "end_mileage": 1_999 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nada ha cambiado
    let (_, booking) = app.get(&format!("/api/bookings/{}", booking_id), &employee.token).await;
    assert_eq!(booking["status"], "approved");
}

#[tokio::test]
async fn test_return_pending_booking_is_conflict() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let employee = app.create_user(UserRole::Employee).await;
    let car_id = app.create_car(&admin.token, 5, 0).await;

    let (_, created) = app
        .post("/api/bookings", &employee.token, booking_body(car_id, 14, "09:00", "10:00"))
        .await;
    let booking_id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .put(
            &format!("/api/bookings/{}/return", booking_id),
            &employee.token,
            json!({ "end_mileage": 50 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_booking_permissions() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let owner = app.create_user(UserRole::Employee).await;
    let other = app.create_user(UserRole::Employee).await;
    let car_id = app.create_car(&admin.token, 5, 0).await;

    let (_, created) = app
        .post("/api/bookings", &owner.token, booking_body(car_id, 15, "09:00", "10:00"))
        .await;
    let booking_id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .put(&format!("/api/bookings/{}/approve", booking_id), &owner.token, json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get(&format!("/api/bookings/{}", booking_id), &other.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .put(&format!("/api/bookings/{}/cancel", booking_id), &other.token, json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Un empleado solo ve sus propias reservas aunque filtre por otro usuario
    let (status, list) = app
        .get(&format!("/api/bookings?user_id={}", owner.user.id), &other.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 0);

    let (_, list) = app
        .get(&format!("/api/bookings?car_id={}", car_id), &admin.token)
        .await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_booking_validation() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let employee = app.create_user(UserRole::Employee).await;
    let car_id = app.create_car(&admin.token, 2, 0).await;

    // Más pasajeros que plazas
    let mut body = booking_body(car_id, 16, "09:00", "10:00");
    body["passengers"] = json!(3);
    let (status, _) = app.post("/api/bookings", &employee.token, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Fin antes del inicio
    let (status, _) = app
        .post("/api/bookings", &employee.token, booking_body(car_id, 16, "10:00", "09:00"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Fecha pasada
    let mut body = booking_body(car_id, 16, "09:00", "10:00");
    body["start_date"] = json!("2020-01-01");
    body["end_date"] = json!("2020-01-01");
    let (status, _) = app.post("/api/bookings", &employee.token, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Fecha mal formada
    let mut body = booking_body(car_id, 16, "09:00", "10:00");
    body["start_date"] = json!("16/03/2099");
    let (status, error) = app.post("/api/bookings", &employee.token, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_available_cars_excludes_booked_window() {
    require_db!(app);
    let admin = app.create_user(UserRole::Admin).await;
    let employee = app.create_user(UserRole::Employee).await;
    let car_id = app.create_car(&admin.token, 5, 0).await;

    app.post("/api/bookings", &employee.token, booking_body(car_id, 17, "09:00", "17:00"))
        .await;

    let query = "start_date=2099-03-17&start_time=10:00&end_date=2099-03-17&end_time=11:00";
    let (status, cars) = app.get(&format!("/api/cars/available?{}", query), &employee.token).await;
    assert_eq!(status, StatusCode::OK, "{cars}");
    let ids: Vec<&str> = cars
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["id"].as_str())
        .collect();
    assert!(!ids.contains(&car_id.to_string().as_str()));

    let query = "start_date=2099-03-17&start_time=17:00&end_date=2099-03-17&end_time=18:00";
    let (_, cars) = app.get(&format!("/api/cars/available?{}", query), &employee.token).await;
    assert!(cars
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["id"] == car_id.to_string()));
}
