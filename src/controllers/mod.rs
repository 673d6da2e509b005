pub mod auth_controller;
pub mod booking_controller;
pub mod business_card_controller;
pub mod car_controller;
pub mod car_type_controller;
pub mod dashboard_controller;
pub mod maintenance_controller;
pub mod user_controller;
