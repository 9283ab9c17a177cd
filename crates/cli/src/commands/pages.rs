//! Website-builder page commands.

use elegance_core::models::{MoveDirection, Page, SectionKind};
use elegance_core::{PageId, PageTemplate, SectionId};
use elegance_storefront::workflows::PageEditor;

use super::{CommandError, Context};
use crate::output;

fn parse_direction(direction: &str) -> Result<MoveDirection, CommandError> {
    match direction {
        "up" => Ok(MoveDirection::Up),
        "down" => Ok(MoveDirection::Down),
        _ => Err(CommandError::InvalidDirection(direction.to_owned())),
    }
}

pub async fn list(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let pages = ctx.client.pages().await?;
    if pages.is_empty() {
        output::print("No pages yet");
    }
    for page in &pages {
        output::print(&output::page_line(page));
    }
    Ok(())
}

pub async fn show(ctx: &Context, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let page = ctx.client.page(&PageId::new(id)).await?;
    output::print(&output::page_details(&page));
    Ok(())
}

pub async fn create(
    ctx: &Context,
    title: &str,
    template: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let template: PageTemplate = template.parse()?;
    let mut editor = PageEditor::new(ctx.client.clone(), Page::for_title(title, template));
    editor.save().await?;
    output::print(&output::page_details(editor.page()));
    Ok(())
}

/// Create or update a page from a YAML document.
pub async fn import(ctx: &Context, file: &str) -> Result<(), Box<dyn std::error::Error>> {
    let content = tokio::fs::read_to_string(file).await?;
    let page: Page = serde_yaml::from_str(&content)?;

    let saved = match &page.id {
        Some(id) => ctx.client.update_page(id, &page).await?,
        None => ctx.client.create_page(&page).await?,
    };
    tracing::info!(title = %saved.title, sections = saved.sections.len(), "Page imported");
    output::print(&output::page_details(&saved));
    Ok(())
}

pub async fn add_section(
    ctx: &Context,
    id: &str,
    kind: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind: SectionKind = kind.parse()?;
    let mut editor = PageEditor::open(ctx.client.clone(), &PageId::new(id)).await?;
    let section_id = editor.add_section(kind);
    editor.save().await?;
    output::print(&format!("Added {kind} section {section_id}"));
    Ok(())
}

pub async fn remove_section(
    ctx: &Context,
    id: &str,
    section_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = PageEditor::open(ctx.client.clone(), &PageId::new(id)).await?;
    let removed = editor.remove_section(&SectionId::new(section_id))?;
    editor.save().await?;
    output::print(&format!("Removed {} section {section_id}", removed.kind()));
    Ok(())
}

pub async fn move_section(
    ctx: &Context,
    id: &str,
    section_id: &str,
    direction: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let direction = parse_direction(direction)?;
    let page_id = PageId::new(id);
    let mut editor = PageEditor::open(ctx.client.clone(), &page_id).await?;
    if !editor.move_section(&SectionId::new(section_id), direction) {
        output::print("Section is already at that end of the page");
        return Ok(());
    }
    let page = ctx
        .client
        .reorder_sections(&page_id, &editor.page().section_ids())
        .await?;
    output::print(&output::page_details(&page));
    Ok(())
}

pub async fn publish(ctx: &Context, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let page = ctx.client.publish_page(&PageId::new(id)).await?;
    output::print(&format!("Published {}", page.slug));
    Ok(())
}

pub async fn unpublish(ctx: &Context, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let page = ctx.client.unpublish_page(&PageId::new(id)).await?;
    output::print(&format!("{} is now a draft", page.slug));
    Ok(())
}

pub async fn duplicate(ctx: &Context, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let copy = ctx.client.duplicate_page(&PageId::new(id)).await?;
    output::print(&output::page_line(&copy));
    Ok(())
}

pub async fn delete(ctx: &Context, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    ctx.client.delete_page(&PageId::new(id)).await?;
    output::print("Page deleted");
    Ok(())
}
