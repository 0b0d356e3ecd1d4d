// src/services/company_service.rs

use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::CompanyRepository;
use crate::models::company::{Company, CompanyType};

// Cadastro de firmas e acentas do hotel. Toda operação é escopada pelo
// tenant do solicitante; registro de outro hotel responde 404.
#[derive(Clone)]
pub struct CompanyService {
    company_repo: CompanyRepository,
}

impl CompanyService {
    pub fn new(company_repo: CompanyRepository) -> Self {
        Self { company_repo }
    }

    pub async fn list(&self, hotel_id: Uuid) -> Result<Vec<Company>, AppError> {
        self.company_repo.list_by_hotel(hotel_id).await
    }

    pub async fn create(
        &self,
        hotel_id: Uuid,
        name: &str,
        company_type: CompanyType,
        contact_person: Option<&str>,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<Company, AppError> {
        let company = self
            .company_repo
            .create(hotel_id, name, company_type, contact_person, phone, email)
            .await?;

        tracing::info!("🏢 Firma cadastrada: {} ({:?})", company.name, company.company_type);
        Ok(company)
    }

    pub async fn update(
        &self,
        id: Uuid,
        hotel_id: Uuid,
        name: &str,
        company_type: CompanyType,
        contact_person: Option<&str>,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<Company, AppError> {
        self.company_repo
            .update(id, hotel_id, name, company_type, contact_person, phone, email)
            .await?
            .ok_or(AppError::NotFound("Firma bulunamadı."))
    }

    // As ofertas da firma caem junto via ON DELETE CASCADE
    pub async fn delete(&self, id: Uuid, hotel_id: Uuid) -> Result<(), AppError> {
        let deleted = self.company_repo.delete(id, hotel_id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Firma bulunamadı."));
        }
        Ok(())
    }
}
