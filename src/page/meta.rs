//! Single-valued page metadata plus image, list/table and link inventories.

use super::clip;
use super::signals::AnchorRecord;
use super::structure::Structure;
use super::tokenizer::Attributes;

const ALT_LIMIT: usize = 100;
const ANCHOR_LIMIT: usize = 100;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PageMeta {
    pub title: String,
    pub meta_description: String,
    pub og_title: String,
    pub og_description: String,
    pub og_image: String,
    pub twitter_card: String,
    pub canonical: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImageTally {
    pub total: usize,
    pub with_alt: usize,
    pub missing_alt: usize,
    pub alt_texts: Vec<String>,
}

#[derive(Debug)]
struct OpenAnchor {
    href: String,
    parts: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MetaCollector {
    pub meta: PageMeta,
    pub images: ImageTally,
    pub lists_count: usize,
    pub tables_count: usize,
    /// Absolute http(s) hrefs, in document order.
    pub links: Vec<String>,
    /// Every closed anchor with text and href, unfiltered.
    pub anchors: Vec<AnchorRecord>,
    /// Trimmed body text fragments, for the page word count.
    pub body_text: Vec<String>,
    title_parts: Vec<String>,
    open_anchor: Option<OpenAnchor>,
}

impl MetaCollector {
    pub fn start_tag(&mut self, name: &str, attrs: &Attributes, structure: &Structure) {
        match name {
            "meta" => self.meta_tag(attrs),
            "link" => {
                let href = attrs.value("href");
                if attrs.value("rel").to_lowercase() == "canonical" && !href.is_empty() {
                    self.meta.canonical = href.to_string();
                }
            }
            "title" => self.title_parts.clear(),
            _ => {}
        }

        if !structure.in_body() {
            return;
        }
        match name {
            "ul" | "ol" => self.lists_count += 1,
            "table" => self.tables_count += 1,
            "img" => self.image(attrs),
            "a" => {
                let href = attrs.value("href");
                if href.starts_with("http") {
                    self.links.push(href.to_string());
                }
                self.open_anchor = Some(OpenAnchor {
                    href: href.to_string(),
                    parts: Vec::new(),
                });
            }
            _ => {}
        }
    }

    pub fn end_tag(&mut self, name: &str, structure: &Structure) {
        match name {
            "title" => {
                if !structure.in_body() {
                    self.meta.title = self.title_parts.join(" ").trim().to_string();
                }
                self.title_parts.clear();
            }
            "a" => {
                if let Some(anchor) = self.open_anchor.take() {
                    let text = anchor.parts.join(" ");
                    let text = text.trim();
                    if !text.is_empty() && !anchor.href.is_empty() {
                        self.anchors.push(AnchorRecord {
                            text: clip(text, ANCHOR_LIMIT),
                            href: anchor.href,
                        });
                    }
                }
            }
            _ => {}
        }
    }

    /// `text` is already trimmed and non-empty.
    pub fn text(&mut self, text: &str, structure: &Structure) {
        if structure.innermost() == Some("title") {
            self.title_parts.push(text.to_string());
        }
        if let Some(anchor) = self.open_anchor.as_mut() {
            anchor.parts.push(text.to_string());
        }
        if structure.in_body() {
            self.body_text.push(text.to_string());
        }
    }

    fn meta_tag(&mut self, attrs: &Attributes) {
        let name = attrs.value("name").to_lowercase();
        let property = attrs.value("property").to_lowercase();
        let content = attrs.value("content").to_string();

        if name == "description" {
            self.meta.meta_description = content;
        } else if name == "twitter:card" {
            self.meta.twitter_card = content;
        } else if property == "og:title" {
            self.meta.og_title = content;
        } else if property == "og:description" {
            self.meta.og_description = content;
        } else if property == "og:image" {
            self.meta.og_image = content;
        }
    }

    fn image(&mut self, attrs: &Attributes) {
        self.images.total += 1;
        // Absent and blank alt both count as missing.
        match attrs.get("alt").map(str::trim).filter(|alt| !alt.is_empty()) {
            Some(alt) => {
                self.images.with_alt += 1;
                self.images.alt_texts.push(clip(alt, ALT_LIMIT));
            }
            None => self.images.missing_alt += 1,
        }
    }
}
