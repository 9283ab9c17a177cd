//! Website-builder pages and their typed content sections.
//!
//! A [`Page`] is an ordered list of [`PageSection`]s. Each section is one of a
//! fixed set of block types (hero, about, features, ...) encoded on the wire
//! as a JSON object tagged by `type`. The editor operations here are pure:
//! they mutate the in-memory page and leave saving to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ValidationError, null_as_default};
use crate::types::{CategoryId, PageId, PageStatus, PageTemplate, ProductId, SectionId, slugify};

/// Errors raised by page editing operations.
#[derive(thiserror::Error, Debug)]
pub enum PageError {
    /// No section with this ID exists on the page.
    #[error("section not found: {0}")]
    SectionNotFound(SectionId),

    /// A section patch was not a JSON object.
    #[error("section patch must be a JSON object")]
    PatchNotObject,

    /// Applying a patch produced a section that no longer decodes.
    #[error("invalid section patch: {0}")]
    InvalidPatch(#[from] serde_json::Error),

    /// Page or section content failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

// =============================================================================
// Option enums
// =============================================================================

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Side an image sits on next to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImagePosition {
    Left,
    #[default]
    Right,
}

/// Block height or content width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Size {
    Small,
    #[default]
    Medium,
    Large,
    Full,
}

/// How a collection of items is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    Grid,
    List,
    Carousel,
    Masonry,
}

/// Section background fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundType {
    #[default]
    Image,
    Gradient,
    Video,
    Solid,
}

/// Which products a products section pulls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductsDisplay {
    #[default]
    Featured,
    New,
    Category,
    Manual,
}

/// Call-to-action button look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    #[default]
    Primary,
    Secondary,
    Outline,
}

/// Where an embedded video is hosted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VideoType {
    #[default]
    Youtube,
    Vimeo,
    File,
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HeroSection {
    pub id: SectionId,
    pub title: String,
    pub subtitle: String,
    pub cta_text: String,
    pub cta_link: String,
    #[serde(default)]
    pub background_image: String,
    #[serde(default)]
    pub background_type: BackgroundType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_video: Option<String>,
    #[serde(default)]
    pub overlay: bool,
    #[serde(default)]
    pub overlay_opacity: f64,
    #[serde(default)]
    pub overlay_color: String,
    #[serde(default)]
    pub text_alignment: Alignment,
    #[serde(default)]
    pub height: Size,
    #[serde(default)]
    pub show_scroll_indicator: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AboutSection {
    pub id: SectionId,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub image_position: ImagePosition,
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FeatureItem {
    pub id: SectionId,
    pub icon: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FeaturesSection {
    pub id: SectionId,
    pub title: String,
    pub subtitle: String,
    #[serde(default)]
    pub layout: Layout,
    pub columns: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<FeatureItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProductsSection {
    pub id: SectionId,
    pub title: String,
    pub subtitle: String,
    #[serde(default)]
    pub display_type: ProductsDisplay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_ids: Option<Vec<ProductId>>,
    pub limit: u32,
    pub columns: u8,
    #[serde(default)]
    pub show_price: bool,
    #[serde(default)]
    pub show_add_to_cart: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TestimonialItem {
    pub id: SectionId,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub avatar: String,
    pub rating: u8,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TestimonialsSection {
    pub id: SectionId,
    pub title: String,
    pub subtitle: String,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<TestimonialItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GalleryImage {
    pub id: SectionId,
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GallerySection {
    pub id: SectionId,
    pub title: String,
    pub subtitle: String,
    #[serde(default)]
    pub layout: Layout,
    pub columns: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<GalleryImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContactSection {
    pub id: SectionId,
    pub title: String,
    pub subtitle: String,
    #[serde(default)]
    pub show_form: bool,
    #[serde(default)]
    pub show_info: bool,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub show_map: bool,
    #[serde(default)]
    pub map_url: String,
    #[serde(default)]
    pub social_links: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CtaSection {
    pub id: SectionId,
    pub title: String,
    pub description: String,
    pub button_text: String,
    pub button_link: String,
    #[serde(default)]
    pub button_style: ButtonStyle,
    #[serde(default)]
    pub background_type: BackgroundType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default)]
    pub text_alignment: Alignment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TextSection {
    pub id: SectionId,
    pub content: String,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub max_width: Size,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VideoSection {
    pub id: SectionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub video_url: String,
    #[serde(default)]
    pub video_type: VideoType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub autoplay: bool,
    #[serde(default, rename = "loop")]
    pub looping: bool,
    #[serde(default)]
    pub controls: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SpacerSection {
    pub id: SectionId,
    #[serde(default)]
    pub height: Size,
}

/// One typed block of page content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageSection {
    Hero(HeroSection),
    About(AboutSection),
    Features(FeaturesSection),
    Products(ProductsSection),
    Testimonials(TestimonialsSection),
    Gallery(GallerySection),
    Contact(ContactSection),
    Cta(CtaSection),
    Text(TextSection),
    Video(VideoSection),
    Spacer(SpacerSection),
}

/// The section types an editor can add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Hero,
    About,
    Features,
    Products,
    Testimonials,
    Gallery,
    Contact,
    Cta,
    Text,
    Video,
    Spacer,
}

impl SectionKind {
    /// Every kind, in the order the "add section" picker lists them.
    pub const ALL: [Self; 11] = [
        Self::Hero,
        Self::About,
        Self::Features,
        Self::Products,
        Self::Testimonials,
        Self::Gallery,
        Self::Contact,
        Self::Cta,
        Self::Text,
        Self::Video,
        Self::Spacer,
    ];

    /// Wire tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::About => "about",
            Self::Features => "features",
            Self::Products => "products",
            Self::Testimonials => "testimonials",
            Self::Gallery => "gallery",
            Self::Contact => "contact",
            Self::Cta => "cta",
            Self::Text => "text",
            Self::Video => "video",
            Self::Spacer => "spacer",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("invalid section type: {s}"))
    }
}

fn feature_item(icon: &str, title: &str, description: &str) -> FeatureItem {
    FeatureItem {
        id: SectionId::generate(),
        icon: icon.to_owned(),
        title: title.to_owned(),
        description: description.to_owned(),
        link: None,
    }
}

impl PageSection {
    /// A new section of `kind` with a fresh ID and starter content.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn new_default(kind: SectionKind) -> Self {
        let id = SectionId::generate();
        match kind {
            SectionKind::Hero => Self::Hero(HeroSection {
                id,
                title: "Welcome to Our Store".to_owned(),
                subtitle: "Discover our latest collection".to_owned(),
                cta_text: "Shop Now".to_owned(),
                cta_link: "/products".to_owned(),
                background_type: BackgroundType::Image,
                overlay: true,
                overlay_opacity: 0.5,
                overlay_color: "#000000".to_owned(),
                text_alignment: Alignment::Center,
                height: Size::Large,
                show_scroll_indicator: true,
                ..HeroSection::default()
            }),
            SectionKind::About => Self::About(AboutSection {
                id,
                title: "About Us".to_owned(),
                subtitle: "Our Story".to_owned(),
                description: "Tell your customers who you are and what you stand for.".to_owned(),
                ..AboutSection::default()
            }),
            SectionKind::Features => Self::Features(FeaturesSection {
                id,
                title: "Why Choose Us".to_owned(),
                subtitle: "What makes shopping with us different".to_owned(),
                layout: Layout::Grid,
                columns: 3,
                items: vec![
                    feature_item("truck", "Fast Delivery", "Free delivery on orders over KSh 10,000"),
                    feature_item("shield", "Secure Payments", "Pay safely with M-Pesa"),
                    feature_item("award", "Quality Guarantee", "Carefully selected products"),
                ],
                background_color: None,
            }),
            SectionKind::Products => Self::Products(ProductsSection {
                id,
                title: "Featured Products".to_owned(),
                subtitle: "Handpicked for you".to_owned(),
                display_type: ProductsDisplay::Featured,
                limit: 8,
                columns: 4,
                show_price: true,
                show_add_to_cart: true,
                ..ProductsSection::default()
            }),
            SectionKind::Testimonials => Self::Testimonials(TestimonialsSection {
                id,
                title: "What Our Customers Say".to_owned(),
                subtitle: "Real reviews from real shoppers".to_owned(),
                layout: Layout::Grid,
                ..TestimonialsSection::default()
            }),
            SectionKind::Gallery => Self::Gallery(GallerySection {
                id,
                title: "Gallery".to_owned(),
                subtitle: String::new(),
                layout: Layout::Grid,
                columns: 3,
                ..GallerySection::default()
            }),
            SectionKind::Contact => Self::Contact(ContactSection {
                id,
                title: "Get in Touch".to_owned(),
                subtitle: "We'd love to hear from you".to_owned(),
                show_form: true,
                show_info: true,
                social_links: true,
                ..ContactSection::default()
            }),
            SectionKind::Cta => Self::Cta(CtaSection {
                id,
                title: "Ready to Shop?".to_owned(),
                description: "Browse the full collection today.".to_owned(),
                button_text: "Shop Now".to_owned(),
                button_link: "/products".to_owned(),
                button_style: ButtonStyle::Primary,
                background_type: BackgroundType::Solid,
                text_alignment: Alignment::Center,
                ..CtaSection::default()
            }),
            SectionKind::Text => Self::Text(TextSection {
                id,
                content: String::new(),
                alignment: Alignment::Left,
                max_width: Size::Medium,
                background_color: None,
            }),
            SectionKind::Video => Self::Video(VideoSection {
                id,
                video_type: VideoType::Youtube,
                controls: true,
                ..VideoSection::default()
            }),
            SectionKind::Spacer => Self::Spacer(SpacerSection {
                id,
                height: Size::Medium,
            }),
        }
    }

    /// The section's ID.
    #[must_use]
    pub const fn id(&self) -> &SectionId {
        match self {
            Self::Hero(s) => &s.id,
            Self::About(s) => &s.id,
            Self::Features(s) => &s.id,
            Self::Products(s) => &s.id,
            Self::Testimonials(s) => &s.id,
            Self::Gallery(s) => &s.id,
            Self::Contact(s) => &s.id,
            Self::Cta(s) => &s.id,
            Self::Text(s) => &s.id,
            Self::Video(s) => &s.id,
            Self::Spacer(s) => &s.id,
        }
    }

    /// The section's type tag.
    #[must_use]
    pub const fn kind(&self) -> SectionKind {
        match self {
            Self::Hero(_) => SectionKind::Hero,
            Self::About(_) => SectionKind::About,
            Self::Features(_) => SectionKind::Features,
            Self::Products(_) => SectionKind::Products,
            Self::Testimonials(_) => SectionKind::Testimonials,
            Self::Gallery(_) => SectionKind::Gallery,
            Self::Contact(_) => SectionKind::Contact,
            Self::Cta(_) => SectionKind::Cta,
            Self::Text(_) => SectionKind::Text,
            Self::Video(_) => SectionKind::Video,
            Self::Spacer(_) => SectionKind::Spacer,
        }
    }

    /// Heading shown for the section in editor listings, if it has one.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Hero(s) => Some(&s.title),
            Self::About(s) => Some(&s.title),
            Self::Features(s) => Some(&s.title),
            Self::Products(s) => Some(&s.title),
            Self::Testimonials(s) => Some(&s.title),
            Self::Gallery(s) => Some(&s.title),
            Self::Contact(s) => Some(&s.title),
            Self::Cta(s) => Some(&s.title),
            Self::Video(s) => s.title.as_deref(),
            Self::Text(_) | Self::Spacer(_) => None,
        }
    }

    /// Check numeric option ranges the editor form enforces.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Hero(s) if !(0.0..=1.0).contains(&s.overlay_opacity) => Err(
                ValidationError::invalid("overlay_opacity", "must be between 0 and 1"),
            ),
            Self::Features(s) if !(2..=4).contains(&s.columns) => {
                Err(ValidationError::invalid("columns", "must be 2, 3 or 4"))
            }
            Self::Products(s) if !(2..=4).contains(&s.columns) => {
                Err(ValidationError::invalid("columns", "must be 2, 3 or 4"))
            }
            Self::Products(s) if s.limit == 0 => {
                Err(ValidationError::invalid("limit", "must be at least 1"))
            }
            Self::Gallery(s) if !(2..=5).contains(&s.columns) => {
                Err(ValidationError::invalid("columns", "must be between 2 and 5"))
            }
            Self::Testimonials(s) if s.items.iter().any(|t| !(1..=5).contains(&t.rating)) => {
                Err(ValidationError::invalid("rating", "must be between 1 and 5"))
            }
            _ => Ok(()),
        }
    }

    /// Shallow-merge a JSON object onto this section.
    ///
    /// Top-level keys in `patch` replace the section's values. `id` and
    /// `type` are never changed.
    ///
    /// # Errors
    ///
    /// Returns an error if `patch` is not an object or the merged value no
    /// longer decodes as the same section type.
    pub fn apply_patch(&mut self, patch: &Value) -> Result<(), PageError> {
        let Value::Object(changes) = patch else {
            return Err(PageError::PatchNotObject);
        };

        let mut current = serde_json::to_value(&*self)?;
        if let Value::Object(fields) = &mut current {
            for (key, value) in changes {
                if key != "id" && key != "type" {
                    fields.insert(key.clone(), value.clone());
                }
            }
        }

        *self = serde_json::from_value(current)?;
        Ok(())
    }
}

// =============================================================================
// Page
// =============================================================================

/// Direction for moving a section one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// A website-builder page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PageId>,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub template: PageTemplate,
    #[serde(default)]
    pub status: PageStatus,
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub meta_keywords: String,
    #[serde(default)]
    pub og_image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<PageSection>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Page {
    /// A draft page seeded with the starter sections for `template`.
    #[must_use]
    pub fn new_default(template: PageTemplate) -> Self {
        let kinds: &[SectionKind] = match template {
            PageTemplate::Home => &[
                SectionKind::Hero,
                SectionKind::Features,
                SectionKind::Products,
                SectionKind::Testimonials,
                SectionKind::Cta,
            ],
            PageTemplate::About => &[SectionKind::Hero, SectionKind::About, SectionKind::Features],
            PageTemplate::Contact => &[SectionKind::Hero, SectionKind::Contact],
            PageTemplate::Custom => &[],
        };

        Self {
            id: None,
            title: String::new(),
            slug: String::new(),
            template,
            status: PageStatus::Draft,
            meta_title: String::new(),
            meta_description: String::new(),
            meta_keywords: String::new(),
            og_image: String::new(),
            sections: kinds.iter().copied().map(PageSection::new_default).collect(),
            created_at: None,
            updated_at: None,
            published_at: None,
        }
    }

    /// A new draft page named `title`, slugged as `/<slug>`.
    #[must_use]
    pub fn for_title(title: &str, template: PageTemplate) -> Self {
        let title = title.trim();
        Self {
            title: title.to_owned(),
            slug: format!("/{}", slugify(title)),
            meta_title: title.to_owned(),
            ..Self::new_default(template)
        }
    }

    /// Validate the page before saving.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank title or an invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::required("title"));
        }
        self.sections.iter().try_for_each(PageSection::validate)
    }

    /// Look up a section by ID.
    #[must_use]
    pub fn section(&self, id: &SectionId) -> Option<&PageSection> {
        self.sections.iter().find(|s| s.id() == id)
    }

    fn position(&self, id: &SectionId) -> Option<usize> {
        self.sections.iter().position(|s| s.id() == id)
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    /// Append a section at the end of the page.
    pub fn add_section(&mut self, section: PageSection) -> &SectionId {
        self.sections.push(section);
        self.touch();
        let last = self.sections.len() - 1;
        self.sections
            .get(last)
            .map(PageSection::id)
            .unwrap_or_else(|| unreachable!("section was just pushed"))
    }

    /// Remove a section.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::SectionNotFound`] for an unknown ID.
    pub fn remove_section(&mut self, id: &SectionId) -> Result<PageSection, PageError> {
        let index = self
            .position(id)
            .ok_or_else(|| PageError::SectionNotFound(id.clone()))?;
        let removed = self.sections.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Swap a section with its neighbour. Returns whether anything moved;
    /// moving past either end or naming an unknown section is a no-op.
    pub fn move_section(&mut self, id: &SectionId, direction: MoveDirection) -> bool {
        let Some(current) = self.position(id) else {
            return false;
        };
        let target = match direction {
            MoveDirection::Up => current.checked_sub(1),
            MoveDirection::Down => Some(current + 1).filter(|&i| i < self.sections.len()),
        };
        let Some(target) = target else {
            return false;
        };
        self.sections.swap(current, target);
        self.touch();
        true
    }

    /// Merge `patch` into a section (see [`PageSection::apply_patch`]).
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown ID or an invalid patch; the page is
    /// left unchanged in either case.
    pub fn update_section(&mut self, id: &SectionId, patch: &Value) -> Result<(), PageError> {
        let index = self
            .position(id)
            .ok_or_else(|| PageError::SectionNotFound(id.clone()))?;
        let mut updated = self
            .sections
            .get(index)
            .cloned()
            .ok_or_else(|| PageError::SectionNotFound(id.clone()))?;
        updated.apply_patch(patch)?;
        if let Some(slot) = self.sections.get_mut(index) {
            *slot = updated;
        }
        self.touch();
        Ok(())
    }

    /// Put the listed sections first, in the given order.
    ///
    /// Unknown IDs are ignored. Sections not listed keep their relative
    /// order after the listed ones, so no content is ever dropped.
    pub fn reorder_sections(&mut self, order: &[SectionId]) {
        let mut remaining: Vec<Option<PageSection>> =
            std::mem::take(&mut self.sections).into_iter().map(Some).collect();
        let mut reordered = Vec::with_capacity(remaining.len());

        for id in order {
            if let Some(slot) = remaining
                .iter_mut()
                .find(|slot| slot.as_ref().is_some_and(|s| s.id() == id))
            {
                reordered.extend(slot.take());
            }
        }
        reordered.extend(remaining.into_iter().flatten());

        self.sections = reordered;
        self.touch();
    }

    /// Section IDs in page order.
    #[must_use]
    pub fn section_ids(&self) -> Vec<SectionId> {
        self.sections.iter().map(|s| s.id().clone()).collect()
    }

    /// An unsaved draft copy: "<title> (Copy)" at "<slug>-copy".
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: None,
            title: format!("{} (Copy)", self.title),
            slug: format!("{}-copy", self.slug),
            status: PageStatus::Draft,
            created_at: None,
            updated_at: None,
            published_at: None,
            ..self.clone()
        }
    }

    /// Mark the page published as of `now`.
    pub fn publish(&mut self, now: DateTime<Utc>) {
        self.status = PageStatus::Published;
        self.published_at = Some(now);
        self.updated_at = Some(now);
    }

    /// Return the page to draft.
    pub fn unpublish(&mut self) {
        self.status = PageStatus::Draft;
        self.touch();
    }

    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == PageStatus::Published
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;

    fn page_with(kinds: &[SectionKind]) -> Page {
        let mut page = Page::for_title("Landing", PageTemplate::Custom);
        for kind in kinds {
            page.add_section(PageSection::new_default(*kind));
        }
        page
    }

    fn kinds(page: &Page) -> Vec<SectionKind> {
        page.sections.iter().map(PageSection::kind).collect()
    }

    #[test]
    fn test_every_default_section_is_valid_and_tagged() {
        for kind in SectionKind::ALL {
            let section = PageSection::new_default(kind);
            assert_eq!(section.kind(), kind);
            assert!(section.validate().is_ok(), "{kind} default invalid");
            let value = serde_json::to_value(&section).unwrap();
            assert_eq!(value["type"], kind.as_str());
            assert_eq!(value["id"], section.id().as_str());
        }
    }

    #[test]
    fn test_section_decodes_from_backend_json() {
        let json = json!({
            "type": "video", "id": "s1", "video_url": "https://youtu.be/x",
            "video_type": "youtube", "autoplay": false, "loop": true, "controls": true
        });
        let section: PageSection = serde_json::from_value(json).unwrap();
        let PageSection::Video(video) = section else {
            panic!("expected video section");
        };
        assert!(video.looping);
        assert_eq!(video.title, None);
    }

    #[test]
    fn test_template_defaults() {
        assert_eq!(
            kinds(&Page::new_default(PageTemplate::Home)),
            vec![
                SectionKind::Hero,
                SectionKind::Features,
                SectionKind::Products,
                SectionKind::Testimonials,
                SectionKind::Cta
            ]
        );
        assert_eq!(
            kinds(&Page::new_default(PageTemplate::Contact)),
            vec![SectionKind::Hero, SectionKind::Contact]
        );
        assert!(Page::new_default(PageTemplate::Custom).sections.is_empty());
    }

    #[test]
    fn test_for_title_sets_slug_and_meta() {
        let page = Page::for_title("  Our Story & Team ", PageTemplate::About);
        assert_eq!(page.title, "Our Story & Team");
        assert_eq!(page.slug, "/our-story-team");
        assert_eq!(page.meta_title, "Our Story & Team");
        assert_eq!(page.status, PageStatus::Draft);
    }

    #[test]
    fn test_validate_requires_title() {
        let page = Page::new_default(PageTemplate::Custom);
        assert_eq!(page.validate().unwrap_err().field, "title");
    }

    #[test]
    fn test_move_section_swaps_neighbours() {
        let mut page = page_with(&[SectionKind::Hero, SectionKind::Text, SectionKind::Spacer]);
        let text = page.sections[1].id().clone();

        assert!(page.move_section(&text, MoveDirection::Up));
        assert_eq!(
            kinds(&page),
            vec![SectionKind::Text, SectionKind::Hero, SectionKind::Spacer]
        );

        assert!(page.move_section(&text, MoveDirection::Down));
        assert!(page.move_section(&text, MoveDirection::Down));
        assert_eq!(
            kinds(&page),
            vec![SectionKind::Hero, SectionKind::Spacer, SectionKind::Text]
        );
    }

    #[test]
    fn test_move_section_boundaries_are_noops() {
        let mut page = page_with(&[SectionKind::Hero, SectionKind::Text]);
        let first = page.sections[0].id().clone();
        let last = page.sections[1].id().clone();

        assert!(!page.move_section(&first, MoveDirection::Up));
        assert!(!page.move_section(&last, MoveDirection::Down));
        assert!(!page.move_section(&SectionId::new("missing"), MoveDirection::Up));
        assert_eq!(kinds(&page), vec![SectionKind::Hero, SectionKind::Text]);
    }

    #[test]
    fn test_remove_section() {
        let mut page = page_with(&[SectionKind::Hero, SectionKind::Text]);
        let hero = page.sections[0].id().clone();

        let removed = page.remove_section(&hero).unwrap();
        assert_eq!(removed.kind(), SectionKind::Hero);
        assert_eq!(kinds(&page), vec![SectionKind::Text]);
        assert!(matches!(
            page.remove_section(&hero),
            Err(PageError::SectionNotFound(_))
        ));
    }

    #[test]
    fn test_update_section_merges_and_keeps_identity() {
        let mut page = page_with(&[SectionKind::Hero]);
        let id = page.sections[0].id().clone();

        page.update_section(
            &id,
            &json!({"title": "Big Sale", "id": "hijack", "type": "text", "height": "full"}),
        )
        .unwrap();

        let PageSection::Hero(hero) = &page.sections[0] else {
            panic!("section type changed");
        };
        assert_eq!(hero.id, id);
        assert_eq!(hero.title, "Big Sale");
        assert_eq!(hero.height, Size::Full);
        assert_eq!(hero.cta_text, "Shop Now");
    }

    #[test]
    fn test_update_section_rejects_bad_patch_without_changes() {
        let mut page = page_with(&[SectionKind::Spacer]);
        let id = page.sections[0].id().clone();
        let before = page.sections.clone();

        assert!(matches!(
            page.update_section(&id, &json!({"height": "enormous"})),
            Err(PageError::InvalidPatch(_))
        ));
        assert!(matches!(
            page.update_section(&id, &json!(["not", "an", "object"])),
            Err(PageError::PatchNotObject)
        ));
        assert_eq!(page.sections, before);
    }

    #[test]
    fn test_reorder_sections_keeps_unlisted_and_ignores_unknown() {
        let mut page = page_with(&[
            SectionKind::Hero,
            SectionKind::Text,
            SectionKind::Spacer,
            SectionKind::Cta,
        ]);
        let ids = page.section_ids();

        page.reorder_sections(&[ids[3].clone(), SectionId::new("ghost"), ids[1].clone()]);

        assert_eq!(
            kinds(&page),
            vec![
                SectionKind::Cta,
                SectionKind::Text,
                SectionKind::Hero,
                SectionKind::Spacer
            ]
        );
    }

    #[test]
    fn test_duplicate_is_unsaved_draft() {
        let mut page = page_with(&[SectionKind::Hero]);
        page.id = Some(PageId::new("pg1"));
        page.publish(Utc::now());

        let copy = page.duplicate();
        assert_eq!(copy.id, None);
        assert_eq!(copy.title, "Landing (Copy)");
        assert_eq!(copy.slug, "/landing-copy");
        assert_eq!(copy.status, PageStatus::Draft);
        assert_eq!(copy.published_at, None);
        assert_eq!(copy.sections, page.sections);
    }

    #[test]
    fn test_publish_and_unpublish() {
        let mut page = page_with(&[]);
        let now = Utc::now();
        page.publish(now);
        assert!(page.is_published());
        assert_eq!(page.published_at, Some(now));

        page.unpublish();
        assert_eq!(page.status, PageStatus::Draft);
    }

    #[test]
    fn test_invalid_columns_rejected() {
        let mut section = PageSection::new_default(SectionKind::Gallery);
        section.apply_patch(&json!({"columns": 7})).unwrap();
        assert_eq!(section.validate().unwrap_err().field, "columns");
    }
}
