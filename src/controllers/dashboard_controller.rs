use sqlx::PgPool;

use crate::dto::dashboard_dto::{BookingStatusCounts, CarStatusCounts, DashboardStats};
use crate::models::booking::BookingStatus;
use crate::models::car::CarStatus;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::car_repository::CarRepository;
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppResult;

pub struct DashboardController {
    cars: CarRepository,
    bookings: BookingRepository,
    users: UserRepository,
    maintenance: MaintenanceRepository,
}

impl DashboardController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            cars: CarRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            maintenance: MaintenanceRepository::new(pool),
        }
    }

    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let (cars, bookings, total_distance, active_users, open_maintenance) = tokio::try_join!(
            self.cars.count_by_status(),
            self.bookings.count_by_status(),
            self.bookings.total_distance(),
            self.users.count_active(),
            self.maintenance.count_open(),
        )?;

        Ok(DashboardStats {
            cars: fold_car_counts(&cars),
            bookings: fold_booking_counts(&bookings),
            total_distance,
            active_users,
            open_maintenance,
        })
    }
}

fn fold_car_counts(rows: &[(CarStatus, i64)]) -> CarStatusCounts {
    rows.iter().fold(CarStatusCounts::default(), |mut acc, (status, count)| {
        acc.total += count;
        match status {
            CarStatus::Available => acc.available += count,
            CarStatus::Booked => acc.booked += count,
            CarStatus::Maintenance => acc.maintenance += count,
        }
        acc
    })
}

fn fold_booking_counts(rows: &[(BookingStatus, i64)]) -> BookingStatusCounts {
    rows.iter().fold(BookingStatusCounts::default(), |mut acc, (status, count)| {
        acc.total += count;
        match status {
            BookingStatus::Pending => acc.pending += count,
            BookingStatus::Approved => acc.approved += count,
            BookingStatus::Rejected => acc.rejected += count,
            BookingStatus::Completed => acc.completed += count,
            BookingStatus::Cancelled => acc.cancelled += count,
        }
        acc
    })
}
