use serde::Serialize;

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct CarStatusCounts {
    pub total: i64,
    pub available: i64,
    pub booked: i64,
    pub maintenance: i64,
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct BookingStatusCounts {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub completed: i64,
    pub cancelled: i64,
}

// Estadísticas del panel de administración
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub cars: CarStatusCounts,
    pub bookings: BookingStatusCounts,
    pub total_distance: i64,
    pub active_users: i64,
    pub open_maintenance: i64,
}
