//! HTML to Markdown conversion for work item content.
//!
//! CodePlex renders descriptions and comments as HTML. GitHub wants Markdown,
//! so block and inline structure is translated rather than stripped: headings,
//! emphasis, code, lists, links, images, quotes and line breaks all survive.
//! Text without markup passes through untouched apart from trimming.

use scraper::{ElementRef, Html, Node};

/// Converts an HTML fragment into Markdown.
#[must_use]
pub fn to_markdown(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    render_block(fragment.root_element())
}

/// Renders an element's children and trims the result.
fn render_block(element: ElementRef<'_>) -> String {
    let mut writer = MarkdownWriter::default();
    writer.children(element);
    writer.out.trim().to_string()
}

/// Renders an element's children without trimming.
fn render_inline(element: ElementRef<'_>) -> String {
    let mut writer = MarkdownWriter::default();
    writer.children(element);
    writer.out
}

#[derive(Default)]
struct MarkdownWriter {
    out: String,
}

impl MarkdownWriter {
    fn children(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.text(text),
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        self.element(child);
                    }
                }
                _ => {}
            }
        }
    }

    fn text(&mut self, text: &str) {
        // Source formatting whitespace after a break or block is not content.
        let text = if self.at_line_start() {
            text.trim_start()
        } else {
            text
        };
        self.out.push_str(text);
    }

    fn element(&mut self, element: ElementRef<'_>) {
        let name = element.value().name();
        match name {
            "br" => self.out.push('\n'),
            "p" | "div" | "section" | "article" | "table" | "thead" | "tbody" | "center" => {
                self.block_break();
                self.children(element);
                self.block_break();
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => self.heading(element, name),
            "strong" | "b" => self.wrap(element, "**"),
            "em" | "i" => self.wrap(element, "*"),
            "del" | "s" | "strike" => self.wrap(element, "~~"),
            "code" | "tt" => {
                let code: String = element.text().collect();
                if !code.is_empty() {
                    self.out.push('`');
                    self.out.push_str(&code);
                    self.out.push('`');
                }
            }
            "pre" => {
                let code: String = element.text().collect();
                self.block_break();
                self.out.push_str("```\n");
                self.out.push_str(code.trim_matches('\n'));
                self.out.push_str("\n```");
                self.block_break();
            }
            "a" => self.link(element),
            "img" => self.image(element),
            "ul" => self.list(element, false),
            "ol" => self.list(element, true),
            "blockquote" => self.quote(element),
            "hr" => {
                self.block_break();
                self.out.push_str("---");
                self.block_break();
            }
            "tr" => {
                self.line_break();
                self.children(element);
                self.line_break();
            }
            "td" | "th" => {
                self.children(element);
                self.out.push(' ');
            }
            "script" | "style" | "head" | "title" => {}
            _ => self.children(element),
        }
    }

    fn heading(&mut self, element: ElementRef<'_>, name: &str) {
        let level = name[1..].parse::<usize>().unwrap_or(1);
        let text = render_block(element).replace('\n', " ");
        if text.is_empty() {
            return;
        }
        self.block_break();
        self.out.push_str(&"#".repeat(level));
        self.out.push(' ');
        self.out.push_str(&text);
        self.block_break();
    }

    fn wrap(&mut self, element: ElementRef<'_>, marker: &str) {
        let inner = render_inline(element);
        let trimmed = inner.trim();
        if trimmed.is_empty() {
            self.text(&inner);
            return;
        }
        // Markers must hug the text; surrounding spaces stay outside.
        let leading = &inner[..inner.len() - inner.trim_start().len()];
        let trailing = &inner[inner.trim_end().len()..];
        self.text(leading);
        self.out.push_str(marker);
        self.out.push_str(trimmed);
        self.out.push_str(marker);
        self.out.push_str(trailing);
    }

    fn link(&mut self, element: ElementRef<'_>) {
        let href = element.value().attr("href").unwrap_or_default().trim();
        let text = render_inline(element);
        let text = text.trim();
        if href.is_empty() || href.starts_with("javascript:") {
            self.out.push_str(text);
        } else if text.is_empty() || text == href {
            self.out.push_str(href);
        } else {
            self.out.push('[');
            self.out.push_str(text);
            self.out.push_str("](");
            self.out.push_str(href);
            self.out.push(')');
        }
    }

    fn image(&mut self, element: ElementRef<'_>) {
        let src = element.value().attr("src").unwrap_or_default().trim();
        if src.is_empty() {
            return;
        }
        let alt = element.value().attr("alt").unwrap_or_default().trim();
        self.out.push_str("![");
        self.out.push_str(alt);
        self.out.push_str("](");
        self.out.push_str(src);
        self.out.push(')');
    }

    fn list(&mut self, element: ElementRef<'_>, ordered: bool) {
        self.block_break();
        let items = element
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| child.value().name() == "li");

        for (index, item) in items.enumerate() {
            let marker = if ordered {
                format!("{}. ", index + 1)
            } else {
                "- ".to_string()
            };
            let indent = " ".repeat(marker.len());
            let content = render_block(item);

            self.out.push_str(&marker);
            let lines = content.lines().filter(|line| !line.trim().is_empty());
            for (n, line) in lines.enumerate() {
                if n > 0 {
                    self.out.push('\n');
                    self.out.push_str(&indent);
                }
                self.out.push_str(line);
            }
            self.out.push('\n');
        }
        self.block_break();
    }

    fn quote(&mut self, element: ElementRef<'_>) {
        let content = render_block(element);
        if content.is_empty() {
            return;
        }
        self.block_break();
        let quoted: Vec<String> = content
            .lines()
            .map(|line| {
                if line.is_empty() {
                    ">".to_string()
                } else {
                    format!("> {line}")
                }
            })
            .collect();
        self.out.push_str(&quoted.join("\n"));
        self.block_break();
    }

    /// Ends the current block with exactly one blank line.
    fn block_break(&mut self) {
        if self.out.is_empty() {
            return;
        }
        while self.out.ends_with(' ') {
            self.out.pop();
        }
        let newlines = self.out.chars().rev().take_while(|c| *c == '\n').count();
        for _ in newlines..2 {
            self.out.push('\n');
        }
    }

    fn line_break(&mut self) {
        if !self.at_line_start() {
            self.out.push('\n');
        }
    }

    fn at_line_start(&self) -> bool {
        self.out.is_empty() || self.out.ends_with('\n')
    }
}
