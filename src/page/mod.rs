pub mod finalize;
pub mod jsonld;
pub mod meta;
pub mod outline;
pub mod pattern;
pub mod signals;
pub mod structure;
pub mod tokenizer;

use tracing::debug;

use finalize::Collected;
use jsonld::JsonLdHarvester;
use meta::MetaCollector;
use outline::OutlineAnalyzer;
use structure::Structure;
use tokenizer::{EventHandler, TagEvent};

pub use signals::PageSignals;

/// Single pass over the markup, then one finalize. Malformed HTML and
/// malformed JSON-LD degrade quietly; nothing here fails.
pub fn extract_signals(html: &str, url: &str) -> PageSignals {
    let scan = tokenizer::tokenize(html, PageScan::default());
    if scan.structure.depth() > 0 {
        debug!(open_tags = scan.structure.depth(), "document ended with unclosed tags");
    }

    let signals = finalize::finalize(scan.finish(), url);
    debug!(
        url,
        words = signals.word_count,
        headings = signals.headings.len(),
        json_ld = signals.json_ld.len(),
        links = signals.internal_links + signals.external_links,
        "extracted page signals"
    );
    signals
}

/// Per-document state. Every listener sees every event; the structure
/// tracker goes first on start tags and last on end tags, so listeners
/// observe the element being opened or closed as innermost.
#[derive(Default)]
struct PageScan {
    structure: Structure,
    meta: MetaCollector,
    outline: OutlineAnalyzer,
    json_ld: JsonLdHarvester,
}

impl PageScan {
    fn finish(self) -> Collected {
        let (headings, sections) = self.outline.finish();
        Collected {
            meta: self.meta,
            headings,
            sections,
            documents: self.json_ld.into_documents(),
        }
    }
}

impl EventHandler for PageScan {
    fn handle(&mut self, event: TagEvent) {
        match event {
            TagEvent::Start { name, attrs } => {
                self.structure.open(&name, &attrs);
                self.meta.start_tag(&name, &attrs, &self.structure);
                self.outline.start_tag(&name);
            }
            TagEvent::End { name } => {
                self.meta.end_tag(&name, &self.structure);
                self.outline.end_tag(&name);
                if let Some(source) = self.structure.close(&name) {
                    self.json_ld.accept(&source);
                }
            }
            TagEvent::Text(text) => {
                if let Some(text) = self.structure.route_text(&text) {
                    self.meta.text(text, &self.structure);
                    self.outline.text(text, self.structure.innermost());
                }
            }
        }
    }
}

/// First `max` characters of `s`.
pub(crate) fn clip(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
