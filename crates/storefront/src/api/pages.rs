//! Website-builder pages.

use elegance_core::models::Page;
use elegance_core::{PageId, SectionId};
use reqwest::Method;
use serde::Serialize;
use tracing::{info, instrument};

use super::ApiClient;
use super::cache::{CacheKey, CacheValue, QueryFamily};
use crate::error::ApiError;

#[derive(Serialize)]
struct ReorderBody<'a> {
    section_ids: &'a [SectionId],
}

fn page_path(id: &PageId) -> String {
    format!("/api/admin/pages/{}", urlencoding::encode(id.as_str()))
}

impl ApiClient {
    /// All pages, drafts included.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn pages(&self) -> Result<Vec<Page>, ApiError> {
        if let Some(CacheValue::Pages(pages)) = self.cached(&CacheKey::Pages).await {
            return Ok(pages);
        }
        let pages: Vec<Page> = self.get_list("/api/pages", &[]).await?;
        self.cache_insert(CacheKey::Pages, CacheValue::Pages(pages.clone()))
            .await;
        Ok(pages)
    }

    /// One page by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the page does not exist.
    #[instrument(skip(self), fields(page_id = %id))]
    pub async fn page(&self, id: &PageId) -> Result<Page, ApiError> {
        let cache_key = CacheKey::Page(id.clone());
        if let Some(CacheValue::Page(page)) = self.cached(&cache_key).await {
            return Ok(*page);
        }
        let path = format!("/api/pages/{}", urlencoding::encode(id.as_str()));
        let page: Page = self.get(&path).await?;
        self.cache_insert(cache_key, CacheValue::Page(Box::new(page.clone())))
            .await;
        Ok(page)
    }

    /// Create a page.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if the page has no title, or an
    /// error if the backend rejects it.
    #[instrument(skip(self, page), fields(title = %page.title))]
    pub async fn create_page(&self, page: &Page) -> Result<Page, ApiError> {
        page.validate()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let created: Page = self.send_json(Method::POST, "/api/admin/pages", page).await?;
        self.invalidate(&[QueryFamily::Pages]).await;
        info!(page_id = ?created.id, "Page created");
        Ok(created)
    }

    /// Save a page's content, metadata and sections.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if the page has no title, or an
    /// error if the backend rejects it.
    #[instrument(skip(self, page), fields(page_id = %id))]
    pub async fn update_page(&self, id: &PageId, page: &Page) -> Result<Page, ApiError> {
        page.validate()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let updated: Page = self.send_json(Method::PUT, &page_path(id), page).await?;
        self.invalidate(&[QueryFamily::Pages]).await;
        Ok(updated)
    }

    /// Delete a page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(page_id = %id))]
    pub async fn delete_page(&self, id: &PageId) -> Result<(), ApiError> {
        self.send_discarding(self.request(Method::DELETE, &page_path(id)))
            .await?;
        self.invalidate(&[QueryFamily::Pages]).await;
        info!("Page deleted");
        Ok(())
    }

    /// Make a page publicly visible.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn publish_page(&self, id: &PageId) -> Result<Page, ApiError> {
        self.page_action(id, "publish").await
    }

    /// Return a page to draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn unpublish_page(&self, id: &PageId) -> Result<Page, ApiError> {
        self.page_action(id, "unpublish").await
    }

    /// Copy a page; the copy starts as a draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn duplicate_page(&self, id: &PageId) -> Result<Page, ApiError> {
        self.page_action(id, "duplicate").await
    }

    #[instrument(skip(self), fields(page_id = %id))]
    async fn page_action(&self, id: &PageId, action: &str) -> Result<Page, ApiError> {
        let path = format!("{}/{action}", page_path(id));
        let page: Page = self.execute(self.request(Method::POST, &path)).await?;
        self.invalidate(&[QueryFamily::Pages]).await;
        info!(action, "Page updated");
        Ok(page)
    }

    /// Persist a new section order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, section_ids), fields(page_id = %id, count = section_ids.len()))]
    pub async fn reorder_sections(
        &self,
        id: &PageId,
        section_ids: &[SectionId],
    ) -> Result<Page, ApiError> {
        let path = format!("{}/reorder-sections", page_path(id));
        let page: Page = self
            .send_json(Method::POST, &path, &ReorderBody { section_ids })
            .await?;
        self.invalidate(&[QueryFamily::Pages]).await;
        Ok(page)
    }
}
