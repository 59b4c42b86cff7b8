use serde::Serialize;
use serde_json::Value;

/// Everything extracted from one page. Field order is the output key order.
#[derive(Debug, Clone, Serialize)]
pub struct PageSignals {
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub og_title: String,
    pub og_description: String,
    pub og_image: String,
    pub twitter_card: String,
    pub canonical: String,
    pub word_count: usize,
    pub headings: Vec<Heading>,
    pub json_ld: Vec<JsonLdEntry>,
    pub schema_types: Vec<String>,
    pub has_faq_schema: bool,
    pub has_howto_schema: bool,
    pub has_article_schema: bool,
    pub has_breadcrumb_schema: bool,
    pub has_video_object_schema: bool,
    pub has_local_business_schema: bool,
    pub has_speakable_schema: bool,
    pub entity_properties: EntityProperties,
    pub bluf_analysis: Vec<BlufSection>,
    pub lists_count: usize,
    pub tables_count: usize,
    pub images_count: usize,
    pub images_with_alt: usize,
    pub images_missing_alt: usize,
    pub alt_texts: Vec<String>,
    pub internal_links: usize,
    pub external_links: usize,
    pub internal_link_anchors: Vec<AnchorRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    /// Upper-cased tag name, e.g. `H2`.
    pub tag: String,
    pub text: String,
    pub is_question: bool,
}

/// First content block after an h2.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlufSection {
    pub heading: String,
    pub first_content: String,
    pub word_count: usize,
    pub starts_with_answer: bool,
    #[serde(rename = "bluf_pattern_type")]
    pub pattern_type: PatternType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    Definition,
    Number,
    Verdict,
    Step,
    YesNo,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchorRecord {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonLdEntry {
    #[serde(rename = "type")]
    pub kind: Value,
    pub raw: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntityProperties {
    pub has_same_as: bool,
    pub same_as_urls: Vec<String>,
    pub has_about: bool,
    pub has_main_entity: bool,
    pub author_details: Option<AuthorDetails>,
}

/// Author as declared in JSON-LD. Sub-fields are kept verbatim since
/// publishers put strings, arrays or objects there.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AuthorDetails {
    Entity {
        #[serde(rename = "type")]
        kind: Value,
        name: Value,
        url: Value,
    },
    NameOnly {
        name: String,
    },
}
