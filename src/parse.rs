use log::warn;
use scraper::{ElementRef, Html, Node};

/// Elements whose text content never reaches the output.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style"];

/// Extracts visible text from an HTML document.
///
/// `script` and `style` elements are dropped before the text is collected,
/// `noscript` content is parsed as markup, then the text goes through
/// [`normalize_whitespace`].
///
/// # Arguments
///
/// * `html` - A string slice that holds the HTML content of the webpage.
///
/// # Returns
///
/// The normalized text, possibly empty for pages without visible text.
#[must_use]
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::new();
    collect_visible_text(document.root_element(), &mut raw);

    let text = normalize_whitespace(&raw);
    if text.is_empty() {
        warn!("No visible text found in {} bytes of HTML", html.len());
    }
    text
}

fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(child_element) if SKIPPED_ELEMENTS.contains(&child_element.name()) => {}
            // The parser keeps noscript content as one raw text node.
            Node::Element(child_element) if child_element.name() == "noscript" => {
                if let Some(child_ref) = ElementRef::wrap(child) {
                    let markup = child_ref.text().collect::<String>();
                    let fragment = Html::parse_fragment(&markup);
                    collect_visible_text(fragment.root_element(), out);
                }
            }
            Node::Element(_) => {
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_visible_text(child_ref, out);
                }
            }
            _ => {}
        }
    }
}

/// Normalizes scraped text into one phrase per line.
///
/// Lines are trimmed and split on double spaces; every resulting phrase is
/// trimmed and empty phrases are dropped. The original line structure is
/// not kept, only the order of the surviving phrases.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split(is_line_break)
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|phrase| !phrase.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}
