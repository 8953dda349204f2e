//! Gift certificate service.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{
    Certificate, CertificateFilter, CertificatePatch, CreateCertificate, NewCertificate,
    UpdateCertificate,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::messages;
use crate::types::{Paginated, PaginationParams};
use crate::validators::validate_certificate;
use crate::with_transaction;

/// Certificate service trait for dependency injection.
#[async_trait]
pub trait CertificateService: Send + Sync {
    /// Create a certificate, creating any tag that does not exist yet
    async fn save(&self, dto: CreateCertificate) -> AppResult<Certificate>;

    /// Apply a partial update; a given tag list replaces the current one
    async fn update(&self, id: i32, dto: UpdateCertificate) -> AppResult<Certificate>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn find_by_id(&self, id: i32) -> AppResult<Certificate>;

    async fn search(
        &self,
        filter: CertificateFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<Certificate>>;
}

/// Concrete implementation of CertificateService using Unit of Work.
pub struct CertificateManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CertificateManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CertificateService for CertificateManager<U> {
    async fn save(&self, dto: CreateCertificate) -> AppResult<Certificate> {
        let new = NewCertificate::from(dto);
        validate_certificate(&new)?;

        let certificate =
            with_transaction!(self.uow, |ctx| ctx.certificates().create(new).await)?;

        tracing::info!(
            certificate_id = certificate.id,
            tags = certificate.tags.len(),
            "Certificate created"
        );
        Ok(certificate)
    }

    async fn update(&self, id: i32, dto: UpdateCertificate) -> AppResult<Certificate> {
        let current = self.find_by_id(id).await?;

        let patch = CertificatePatch::from(dto);
        if patch.is_empty() {
            return Ok(current);
        }
        validate_certificate(&patch.merged_with(&current))?;

        let certificate =
            with_transaction!(self.uow, |ctx| ctx.certificates().update(id, patch).await)?;

        tracing::info!(certificate_id = id, "Certificate updated");
        Ok(certificate)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let certificates = self.uow.certificates();
        if certificates.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound(messages::CERTIFICATE_NOT_FOUND));
        }
        if certificates.has_orders(id).await? {
            return Err(AppError::Conflict(messages::CERTIFICATE_IN_USE));
        }

        certificates.delete(id).await?;
        tracing::info!(certificate_id = id, "Certificate deleted");
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Certificate> {
        self.uow
            .certificates()
            .find_by_id(id)
            .await?
            .ok_or_not_found(messages::CERTIFICATE_NOT_FOUND)
    }

    async fn search(
        &self,
        filter: CertificateFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<Certificate>> {
        let certificates = self.uow.certificates();
        let (data, total) = tokio::try_join!(
            certificates.search(&filter, params),
            certificates.count(&filter)
        )?;
        Ok(Paginated::new(data, &params, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SortField, SortOrder, Tag};
    use crate::infra::MockCertificateRepository;
    use crate::services::test_support::TestUnitOfWork;
    use chrono::Utc;
    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    fn service(certificates: MockCertificateRepository) -> CertificateManager<TestUnitOfWork> {
        let uow = TestUnitOfWork::default().with_certificates(certificates);
        CertificateManager::new(Arc::new(uow))
    }

    fn certificate(id: i32) -> Certificate {
        let now = Utc::now();
        Certificate {
            id,
            name: "Spa weekend".to_string(),
            description: "Two days of sauna".to_string(),
            price: Decimal::new(14999, 2),
            duration: 90,
            create_date: now,
            last_update_date: now,
            tags: vec![Tag {
                id: 1,
                name: "spa".to_string(),
            }],
        }
    }

    fn create_dto() -> CreateCertificate {
        CreateCertificate {
            name: "Spa weekend".to_string(),
            description: "Two days of sauna".to_string(),
            price: Decimal::new(14999, 2),
            duration: 90,
            tags: vec!["spa".to_string(), "relax".to_string()],
        }
    }

    #[tokio::test]
    async fn test_save_rejects_duplicate_tags_before_writing() {
        let mut dto = create_dto();
        dto.tags = vec!["Spa".to_string(), "spa".to_string()];

        let err = service(MockCertificateRepository::new())
            .save(dto)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Invalid(messages::CERTIFICATE_DUPLICATE_TAGS)
        ));
    }

    #[tokio::test]
    async fn test_save_rejects_negative_price() {
        let mut dto = create_dto();
        dto.price = Decimal::new(-1, 0);

        let err = service(MockCertificateRepository::new())
            .save(dto)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_missing_certificate() {
        let mut certificates = MockCertificateRepository::new();
        certificates.expect_find_by_id().returning(|_| Ok(None));

        let err = service(certificates)
            .update(8, UpdateCertificate::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::NotFound(messages::CERTIFICATE_NOT_FOUND)
        ));
    }

    #[tokio::test]
    async fn test_empty_update_returns_current() {
        let mut certificates = MockCertificateRepository::new();
        certificates
            .expect_find_by_id()
            .returning(|id| Ok(Some(certificate(id))));

        let unchanged = service(certificates)
            .update(3, UpdateCertificate::default())
            .await
            .unwrap();
        assert_eq!(unchanged.id, 3);
        assert_eq!(unchanged.name, "Spa weekend");
    }

    #[tokio::test]
    async fn test_update_revalidates_merged_state() {
        let mut certificates = MockCertificateRepository::new();
        certificates
            .expect_find_by_id()
            .returning(|id| Ok(Some(certificate(id))));

        let dto = UpdateCertificate {
            price: Some(Decimal::new(1, 3)),
            ..Default::default()
        };
        let err = service(certificates).update(3, dto).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_ordered_certificate_conflicts() {
        let mut certificates = MockCertificateRepository::new();
        certificates
            .expect_find_by_id()
            .returning(|id| Ok(Some(certificate(id))));
        certificates.expect_has_orders().returning(|_| Ok(true));
        certificates.expect_delete().never();

        let err = service(certificates).delete(3).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(messages::CERTIFICATE_IN_USE)));
    }

    #[tokio::test]
    async fn test_delete_missing_certificate() {
        let mut certificates = MockCertificateRepository::new();
        certificates.expect_find_by_id().returning(|_| Ok(None));
        certificates.expect_delete().never();

        let err = service(certificates).delete(3).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::NotFound(messages::CERTIFICATE_NOT_FOUND)
        ));
    }

    #[tokio::test]
    async fn test_search_passes_filter_through() {
        let filter = CertificateFilter {
            tags: vec!["spa".to_string()],
            search: Some("sauna".to_string()),
            sort: SortField::Name,
            order: SortOrder::Desc,
        };

        let mut certificates = MockCertificateRepository::new();
        certificates
            .expect_search()
            .with(eq(filter.clone()), eq(PaginationParams::new(1, 5)))
            .returning(|_, _| Ok(vec![certificate(1)]));
        certificates
            .expect_count()
            .with(eq(filter.clone()))
            .returning(|_| Ok(6));

        let page = service(certificates)
            .search(filter, PaginationParams::new(1, 5))
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.meta.total_pages, 2);
        assert!(!page.meta.has_next());
    }
}
