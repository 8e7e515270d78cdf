//! Section service
//!
//! Sections are created by administrators (or seeded from configuration)
//! and looked up by slug from the public URLs.

use crate::config::SectionSeed;
use crate::db::repositories::SectionRepository;
use crate::models::{CreateSectionInput, Section, ValidationError};
use anyhow::Context;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum SectionServiceError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Section slug already exists: {0}")]
    DuplicateSlug(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct SectionService {
    repo: Arc<dyn SectionRepository>,
}

impl SectionService {
    pub fn new(repo: Arc<dyn SectionRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreateSectionInput) -> Result<Section, SectionServiceError> {
        input.full_clean()?;

        if self
            .repo
            .exists_by_slug(&input.slug)
            .await
            .context("Failed to check slug uniqueness")?
        {
            return Err(SectionServiceError::DuplicateSlug(input.slug));
        }

        let section = self
            .repo
            .create(&input)
            .await
            .context("Failed to create section")?;
        tracing::info!(section_id = section.id, slug = %section.slug, "Created section");
        Ok(section)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Section>, SectionServiceError> {
        Ok(self.repo.get_by_id(id).await.context("Failed to get section")?)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Section>, SectionServiceError> {
        Ok(self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get section by slug")?)
    }

    /// Enabled sections ordered by name; these are the choices offered to authors.
    pub async fn list_enabled(&self) -> Result<Vec<Section>, SectionServiceError> {
        Ok(self.repo.list(true).await.context("Failed to list sections")?)
    }

    /// Create every configured section whose slug is not taken yet.
    /// Returns how many were created.
    pub async fn seed(&self, seeds: &[SectionSeed]) -> Result<usize, SectionServiceError> {
        let mut created = 0;
        for seed in seeds {
            if self
                .repo
                .exists_by_slug(&seed.slug)
                .await
                .context("Failed to check slug uniqueness")?
            {
                continue;
            }
            self.create(CreateSectionInput::new(seed.name.clone(), seed.slug.clone()))
                .await?;
            created += 1;
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxSectionRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SectionService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool).await.unwrap();
        SectionService::new(SqlxSectionRepository::boxed(pool))
    }

    fn seed(name: &str, slug: &str) -> SectionSeed {
        SectionSeed {
            name: name.to_string(),
            slug: slug.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let service = setup().await;
        let created = service
            .create(CreateSectionInput::new("Apples", "apples"))
            .await
            .unwrap();

        let found = service.get_by_slug("apples").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(service.get_by_slug("pears").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_slug() {
        let service = setup().await;
        service.create(CreateSectionInput::new("Apples", "apples")).await.unwrap();

        let result = service.create(CreateSectionInput::new("More Apples", "apples")).await;
        assert!(matches!(result, Err(SectionServiceError::DuplicateSlug(slug)) if slug == "apples"));
    }

    #[tokio::test]
    async fn test_invalid_input() {
        let service = setup().await;
        let result = service.create(CreateSectionInput::new("", "empty")).await;
        assert!(matches!(result, Err(SectionServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let service = setup().await;
        let seeds = vec![seed("Oranges", "oranges"), seed("Apples", "apples")];

        assert_eq!(service.seed(&seeds).await.unwrap(), 2);
        assert_eq!(service.seed(&seeds).await.unwrap(), 0);

        let names: Vec<String> = service
            .list_enabled()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Apples", "Oranges"]);
    }
}
