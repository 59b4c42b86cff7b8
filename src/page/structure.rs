//! Open-tag stack plus body/script/style modes. Decides where text goes.

use super::tokenizer::{Attributes, VOID_ELEMENTS};

const JSON_LD_TYPE: &str = "application/ld+json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFrame {
    pub name: String,
}

/// Whether text currently counts as page body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Region {
    #[default]
    Outside,
    Body,
}

/// What the tokenizer is currently inside. Script and style are exclusive.
#[derive(Debug, Default)]
pub enum Content {
    #[default]
    Markup,
    Script(ScriptBlock),
    Style,
}

#[derive(Debug, Default)]
pub struct ScriptBlock {
    json_ld: bool,
    source: String,
}

#[derive(Debug, Default)]
pub struct Structure {
    stack: Vec<TagFrame>,
    region: Region,
    content: Content,
}

impl Structure {
    pub fn open(&mut self, name: &str, attrs: &Attributes) {
        if !VOID_ELEMENTS.contains(&name) {
            self.stack.push(TagFrame {
                name: name.to_string(),
            });
        }

        match name {
            "body" => self.region = Region::Body,
            "script" => {
                self.content = Content::Script(ScriptBlock {
                    json_ld: attrs.value("type").trim().eq_ignore_ascii_case(JSON_LD_TYPE),
                    source: String::new(),
                })
            }
            "style" => self.content = Content::Style,
            _ => {}
        }
    }

    /// Apply an end tag. Returns the source of a JSON-LD script block when
    /// this closes one with a non-blank body.
    pub fn close(&mut self, name: &str) -> Option<String> {
        let mut json_ld = None;
        match name {
            "script" => {
                if let Content::Script(block) = std::mem::take(&mut self.content) {
                    if block.json_ld && !block.source.trim().is_empty() {
                        json_ld = Some(block.source);
                    }
                }
            }
            "style" => {
                if matches!(self.content, Content::Style) {
                    self.content = Content::Markup;
                }
            }
            "body" => self.region = Region::Outside,
            _ => {}
        }

        // Mismatched end tags leave the stack alone.
        if self.stack.last().is_some_and(|frame| frame.name == name) {
            self.stack.pop();
        }
        json_ld
    }

    /// Route a text event. Script text is buffered, style text dropped;
    /// markup text comes back trimmed, or `None` when it is blank.
    pub fn route_text<'t>(&mut self, text: &'t str) -> Option<&'t str> {
        match &mut self.content {
            Content::Script(block) => {
                block.source.push_str(text);
                None
            }
            Content::Style => None,
            Content::Markup => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
        }
    }

    pub fn innermost(&self) -> Option<&str> {
        self.stack.last().map(|frame| frame.name.as_str())
    }

    pub fn in_body(&self) -> bool {
        self.region == Region::Body
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
