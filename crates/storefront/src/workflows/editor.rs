//! Page editing session.

use chrono::Utc;
use elegance_core::models::{MoveDirection, Page, PageSection, SectionKind};
use elegance_core::{PageId, SectionId};
use serde_json::Value;
use tracing::{debug, instrument};

use super::WorkflowError;
use crate::api::ApiClient;

/// A page being edited, with a flag for changes not yet saved.
pub struct PageEditor {
    client: ApiClient,
    page: Page,
    dirty: bool,
}

impl PageEditor {
    /// Start editing a page that may not exist on the backend yet.
    #[must_use]
    pub const fn new(client: ApiClient, page: Page) -> Self {
        Self {
            client,
            page,
            dirty: false,
        }
    }

    /// Fetch a page and start editing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched.
    pub async fn open(client: ApiClient, id: &PageId) -> Result<Self, WorkflowError> {
        let page = client.page(id).await?;
        Ok(Self::new(client, page))
    }

    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Change the page title and meta title.
    pub fn set_title(&mut self, title: &str) {
        title.trim().clone_into(&mut self.page.title);
        title.trim().clone_into(&mut self.page.meta_title);
        self.dirty = true;
    }

    /// Append a section of `kind` with its defaults.
    pub fn add_section(&mut self, kind: SectionKind) -> SectionId {
        let id = self
            .page
            .add_section(PageSection::new_default(kind))
            .clone();
        self.dirty = true;
        id
    }

    /// # Errors
    ///
    /// Returns an error if no section has this ID.
    pub fn remove_section(&mut self, id: &SectionId) -> Result<PageSection, WorkflowError> {
        let removed = self.page.remove_section(id)?;
        self.dirty = true;
        Ok(removed)
    }

    /// Move a section one place. Returns whether it moved.
    pub fn move_section(&mut self, id: &SectionId, direction: MoveDirection) -> bool {
        let moved = self.page.move_section(id, direction);
        self.dirty |= moved;
        moved
    }

    /// Merge a JSON patch into a section.
    ///
    /// # Errors
    ///
    /// Returns an error if the section does not exist or the patch does not
    /// fit it; the page is unchanged in that case.
    pub fn update_section(&mut self, id: &SectionId, patch: &Value) -> Result<(), WorkflowError> {
        self.page.update_section(id, patch)?;
        self.dirty = true;
        Ok(())
    }

    pub fn reorder_sections(&mut self, order: &[SectionId]) {
        self.page.reorder_sections(order);
        self.dirty = true;
    }

    /// Persist the page, creating it if it has no ID yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the page is invalid or the backend rejects it.
    /// Unsaved changes are kept.
    #[instrument(skip(self), fields(title = %self.page.title))]
    pub async fn save(&mut self) -> Result<(), WorkflowError> {
        let saved = self.persist(&self.page).await?;
        self.page = saved;
        self.dirty = false;
        debug!("Page saved");
        Ok(())
    }

    /// Publish the page.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::UnsavedChanges`] while edits are unsaved, or
    /// an error if the update fails.
    #[instrument(skip(self), fields(title = %self.page.title))]
    pub async fn publish(&mut self) -> Result<(), WorkflowError> {
        if self.dirty {
            return Err(WorkflowError::UnsavedChanges);
        }
        let mut next = self.page.clone();
        next.publish(Utc::now());
        self.page = self.persist(&next).await?;
        Ok(())
    }

    /// Return the page to draft.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::UnsavedChanges`] while edits are unsaved, or
    /// an error if the update fails.
    pub async fn unpublish(&mut self) -> Result<(), WorkflowError> {
        if self.dirty {
            return Err(WorkflowError::UnsavedChanges);
        }
        let mut next = self.page.clone();
        next.unpublish();
        self.page = self.persist(&next).await?;
        Ok(())
    }

    async fn persist(&self, page: &Page) -> Result<Page, WorkflowError> {
        let saved = match &page.id {
            Some(id) => self.client.update_page(id, page).await?,
            None => self.client.create_page(page).await?,
        };
        Ok(saved)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use elegance_core::PageTemplate;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::ClientConfig;

    use super::*;

    fn offline_client() -> ApiClient {
        ApiClient::new(ClientConfig::new("http://127.0.0.1:9").unwrap()).unwrap()
    }

    #[test]
    fn test_edits_mark_dirty() {
        let mut editor = PageEditor::new(
            offline_client(),
            Page::for_title("Home", PageTemplate::Home),
        );
        assert!(!editor.is_dirty());

        let first = editor.page().section_ids()[0].clone();
        assert!(!editor.move_section(&first, MoveDirection::Up));
        assert!(!editor.is_dirty());

        editor
            .update_section(&first, &json!({"title": "Welcome"}))
            .unwrap();
        assert!(editor.is_dirty());
        assert_eq!(editor.page().sections[0].title(), Some("Welcome"));
    }

    #[tokio::test]
    async fn test_publish_refused_while_dirty() {
        let mut editor = PageEditor::new(
            offline_client(),
            Page::for_title("About", PageTemplate::About),
        );
        editor.add_section(SectionKind::Spacer);

        let err = editor.publish().await.unwrap_err();
        assert!(matches!(err, WorkflowError::UnsavedChanges));
        assert!(!editor.page().is_published());
    }

    #[tokio::test]
    async fn test_save_creates_then_clears_dirty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/pages"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true, "status": 201,
                "data": {"id": "p7", "title": "Lookbook", "slug": "/lookbook", "sections": []}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(ClientConfig::new(&server.uri()).unwrap()).unwrap();
        let mut editor = PageEditor::new(client, Page::for_title("Lookbook", PageTemplate::Custom));
        editor.add_section(SectionKind::Gallery);
        editor.save().await.unwrap();

        assert!(!editor.is_dirty());
        assert_eq!(editor.page().id, Some(PageId::new("p7")));
    }
}
