//! Streams raw markup as start-tag / end-tag / text events.
//!
//! Built on html5ever's standalone tokenizer: no tree is constructed, names
//! come out lower-cased and character references decoded.

use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use tracing::trace;

/// Elements that never have content, so they never go on the open-tag stack.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

#[derive(Debug, Clone, PartialEq)]
pub enum TagEvent {
    Start { name: String, attrs: Attributes },
    End { name: String },
    Text(String),
}

/// Attributes of a start tag in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Value or empty string, for attributes where absent and empty mean the same.
    pub fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Attributes(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

pub trait EventHandler {
    fn handle(&mut self, event: TagEvent);
}

/// Feed `html` through the tokenizer, delivering every event to `handler`,
/// and hand the handler back once the input is exhausted.
pub fn tokenize<H: EventHandler>(html: &str, handler: H) -> H {
    let handler = RefCell::new(handler);
    let sink = EventSink {
        handler: &handler,
        text: RefCell::new(String::new()),
    };
    let tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
    let queue = BufferQueue::default();
    queue.push_back(StrTendril::from_slice(html));
    let _ = tokenizer.feed(&queue);
    tokenizer.end();
    tokenizer.sink.flush_text();
    drop(tokenizer);

    handler.into_inner()
}

struct EventSink<'h, H> {
    handler: &'h RefCell<H>,
    /// Character tokens waiting to be merged into one text event.
    text: RefCell<String>,
}

impl<H: EventHandler> EventSink<'_, H> {
    fn emit(&self, event: TagEvent) {
        self.handler.borrow_mut().handle(event);
    }

    fn flush_text(&self) {
        let text = std::mem::take(&mut *self.text.borrow_mut());
        if !text.is_empty() {
            self.emit(TagEvent::Text(text));
        }
    }
}

impl<H: EventHandler> TokenSink for EventSink<'_, H> {
    type Handle = ();

    fn process_token(&self, token: Token, line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(chunk) => {
                self.text.borrow_mut().push_str(&chunk);
            }
            Token::TagToken(tag) => {
                self.flush_text();
                let name = tag.name.to_string();
                match tag.kind {
                    TagKind::StartTag => {
                        let attrs = tag
                            .attrs
                            .iter()
                            .map(|a| (a.name.local.to_string(), a.value.to_string()))
                            .collect();
                        self.emit(TagEvent::Start {
                            name: name.clone(),
                            attrs,
                        });

                        if VOID_ELEMENTS.contains(&name.as_str()) {
                            return TokenSinkResult::Continue;
                        }
                        if tag.self_closing {
                            self.emit(TagEvent::End { name });
                            return TokenSinkResult::Continue;
                        }
                        if let Some(kind) = raw_kind(&name) {
                            return TokenSinkResult::RawData(kind);
                        }
                    }
                    TagKind::EndTag => self.emit(TagEvent::End { name }),
                }
            }
            Token::CommentToken(_) | Token::DoctypeToken(_) | Token::EOFToken => {
                self.flush_text();
            }
            Token::ParseError(err) => {
                trace!(line = line_number, "html parse error: {}", err);
            }
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

fn raw_kind(name: &str) -> Option<RawKind> {
    match name {
        "script" => Some(RawKind::ScriptData),
        "style" => Some(RawKind::Rawtext),
        "title" | "textarea" => Some(RawKind::Rcdata),
        _ => None,
    }
}
