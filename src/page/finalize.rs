//! Turns collector state into the final `PageSignals`.

use serde_json::Value;
use url::Url;

use super::jsonld;
use super::meta::MetaCollector;
use super::signals::{AnchorRecord, BlufSection, Heading, JsonLdEntry, PageSignals};

const ARTICLE_TYPES: &[&str] = &["article", "newsarticle", "blogposting", "technicalarticle"];

/// Everything the scan gathered, handed over once the token stream ends.
pub struct Collected {
    pub meta: MetaCollector,
    pub headings: Vec<Heading>,
    pub sections: Vec<BlufSection>,
    pub documents: Vec<Value>,
}

pub fn finalize(collected: Collected, url: &str) -> PageSignals {
    let Collected {
        meta,
        headings,
        sections,
        documents,
    } = collected;

    let word_count = meta.body_text.join(" ").split_whitespace().count();
    let schema_types = jsonld::schema_types(&documents);
    let flags = SchemaFlags::from_types(&schema_types);
    let entity_properties = jsonld::entity_properties(&documents);

    let page_host = host_of(url);
    let (internal_links, external_links) = tally_links(&meta.links, page_host.as_deref());
    let internal_link_anchors = internal_anchors(meta.anchors, page_host.as_deref());

    let json_ld = documents
        .into_iter()
        .map(|raw| JsonLdEntry {
            kind: jsonld::document_type(&raw),
            raw,
        })
        .collect();

    PageSignals {
        url: url.to_string(),
        title: meta.meta.title,
        meta_description: meta.meta.meta_description,
        og_title: meta.meta.og_title,
        og_description: meta.meta.og_description,
        og_image: meta.meta.og_image,
        twitter_card: meta.meta.twitter_card,
        canonical: meta.meta.canonical,
        word_count,
        headings,
        json_ld,
        schema_types,
        has_faq_schema: flags.faq,
        has_howto_schema: flags.howto,
        has_article_schema: flags.article,
        has_breadcrumb_schema: flags.breadcrumb,
        has_video_object_schema: flags.video_object,
        has_local_business_schema: flags.local_business,
        has_speakable_schema: flags.speakable,
        entity_properties,
        bluf_analysis: sections,
        lists_count: meta.lists_count,
        tables_count: meta.tables_count,
        images_count: meta.images.total,
        images_with_alt: meta.images.with_alt,
        images_missing_alt: meta.images.missing_alt,
        alt_texts: meta.images.alt_texts,
        internal_links,
        external_links,
        internal_link_anchors,
    }
}

#[derive(Debug, Default, PartialEq)]
struct SchemaFlags {
    faq: bool,
    howto: bool,
    article: bool,
    breadcrumb: bool,
    video_object: bool,
    local_business: bool,
    speakable: bool,
}

impl SchemaFlags {
    fn from_types(types: &[String]) -> Self {
        let mut flags = SchemaFlags::default();
        for t in types.iter().map(|t| t.to_lowercase()) {
            flags.faq |= t.contains("faqpage");
            flags.howto |= t.contains("howto");
            flags.article |= ARTICLE_TYPES.contains(&t.as_str());
            flags.breadcrumb |= t.contains("breadcrumblist");
            flags.video_object |= t.contains("videoobject");
            flags.local_business |= t.contains("localbusiness") || t.ends_with("business");
            flags.speakable |= t.contains("speakable");
        }
        flags
    }
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .map(|host| host.to_lowercase())
}

/// Internal/external counts for absolute links. A link whose host cannot be
/// parsed counts as external.
fn tally_links(links: &[String], page_host: Option<&str>) -> (usize, usize) {
    let internal = links
        .iter()
        .filter(|link| page_host.is_some() && host_of(link).as_deref() == page_host)
        .count();
    (internal, links.len() - internal)
}

/// Anchors pointing at this page's host: relative hrefs, or absolute ones on
/// the same host. Unlike `tally_links`, an unparseable href is excluded.
fn internal_anchors(anchors: Vec<AnchorRecord>, page_host: Option<&str>) -> Vec<AnchorRecord> {
    anchors
        .into_iter()
        .filter(|anchor| {
            if !anchor.href.starts_with("http") {
                return true;
            }
            page_host.is_some() && host_of(&anchor.href).as_deref() == page_host
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(text: &str, href: &str) -> AnchorRecord {
        AnchorRecord {
            text: text.into(),
            href: href.into(),
        }
    }

    fn types(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn host_parsing() {
        assert_eq!(host_of("https://Example.COM:8080/page").as_deref(), Some("example.com"));
        assert_eq!(host_of("page.html"), None);
        assert_eq!(host_of(""), None);
    }

    #[test]
    fn link_tally() {
        let links = types(&[
            "https://example.com/other",
            "https://other.org",
            "http://EXAMPLE.com/x",
            "https://www.example.com/",
            "http://[bad",
        ]);
        assert_eq!(tally_links(&links, Some("example.com")), (2, 3));
    }

    #[test]
    fn link_tally_without_page_host_is_all_external() {
        let links = types(&["https://example.com/a", "https://example.com/b"]);
        assert_eq!(tally_links(&links, None), (0, 2));
    }

    #[test]
    fn anchor_filter() {
        let anchors = vec![
            anchor("Rel", "/relative"),
            anchor("Same", "https://example.com/x"),
            anchor("Other", "https://other.org/"),
            anchor("Broken", "http://[bad"),
            anchor("Mail", "mailto:a@example.com"),
        ];
        let kept = internal_anchors(anchors, Some("example.com"));
        let texts: Vec<&str> = kept.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, vec!["Rel", "Same", "Mail"]);
    }

    #[test]
    fn anchor_filter_without_page_host_keeps_relative_only() {
        let anchors = vec![anchor("Rel", "/r"), anchor("Abs", "https://example.com/")];
        let kept = internal_anchors(anchors, None);
        assert_eq!(kept, vec![anchor("Rel", "/r")]);
    }

    #[test]
    fn schema_flags() {
        let flags = SchemaFlags::from_types(&types(&[
            "FAQPage",
            "HowTo",
            "BlogPosting",
            "BreadcrumbList",
            "VideoObject",
            "AutoBusiness",
            "SpeakableSpecification",
        ]));
        assert_eq!(
            flags,
            SchemaFlags {
                faq: true,
                howto: true,
                article: true,
                breadcrumb: true,
                video_object: true,
                local_business: true,
                speakable: true,
            }
        );
    }

    #[test]
    fn article_flag_is_exact() {
        assert!(!SchemaFlags::from_types(&types(&["ArticleSeries"])).article);
        assert!(SchemaFlags::from_types(&types(&["NewsArticle"])).article);
        assert!(SchemaFlags::from_types(&types(&["LocalBusiness"])).local_business);
        assert_eq!(SchemaFlags::from_types(&[]), SchemaFlags::default());
    }
}
