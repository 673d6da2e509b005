use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_phone;

// Request de tarjeta de visita; los campos omitidos se toman del perfil
#[derive(Debug, Default, Deserialize, Validate)]
pub struct BusinessCardRequest {
    #[validate(length(min = 2, max = 100))]
    pub full_name: Option<String>,
    #[validate(length(max = 100))]
    pub position: Option<String>,
    #[validate(length(max = 100))]
    pub department: Option<String>,
    #[validate(length(max = 150))]
    pub company_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BusinessCardFilters {
    // Solo administradores: listar las tarjetas de todos
    pub all: Option<bool>,
}
