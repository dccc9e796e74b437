use scraper::{ElementRef, Selector};

/// Compile a selector that is part of the source, not user input.
pub fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

/// All text below `el`, whitespace runs collapsed to single spaces.
pub fn clean_text(el: ElementRef) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of `el` when its only child is a single text node.
fn sole_text<'a>(el: ElementRef<'a>) -> Option<&'a str> {
    let mut children = el.children();
    let only = children.next()?;
    if children.next().is_some() {
        return None;
    }
    only.value().as_text().map(|t| t.trim())
}

#[derive(Debug, Clone, Copy)]
enum Source {
    Text,
    Attr(&'static str),
    /// Elements made of one text node containing the needle; value is that text.
    SoleTextContaining(&'static str),
}

/// One way of reading a field: a selector plus what to take from the match.
#[derive(Debug, Clone)]
pub struct Extractor {
    selector: Selector,
    source: Source,
}

impl Extractor {
    pub fn text(css: &str) -> Self {
        Self {
            selector: selector(css),
            source: Source::Text,
        }
    }

    pub fn attr(css: &str, name: &'static str) -> Self {
        Self {
            selector: selector(css),
            source: Source::Attr(name),
        }
    }

    pub fn sole_text_containing(css: &str, needle: &'static str) -> Self {
        Self {
            selector: selector(css),
            source: Source::SoleTextContaining(needle),
        }
    }

    /// Whether any element below `scope` matches, regardless of its content.
    pub fn is_present(&self, scope: ElementRef) -> bool {
        scope.select(&self.selector).next().is_some()
    }

    /// Value of the first matching element below `scope`, if it is non-empty.
    pub fn extract(&self, scope: ElementRef) -> Option<String> {
        let value = match self.source {
            Source::Text => scope.select(&self.selector).next().map(clean_text),
            Source::Attr(name) => scope
                .select(&self.selector)
                .next()
                .and_then(|el| el.value().attr(name))
                .map(|v| v.trim().to_string()),
            Source::SoleTextContaining(needle) => scope
                .select(&self.selector)
                .filter_map(sole_text)
                .find(|text| text.contains(needle))
                .map(str::to_string),
        };
        value.filter(|v| !v.is_empty())
    }
}

/// Try each extractor in order; the first non-empty value wins.
pub fn first_of(extractors: &[Extractor], scope: ElementRef) -> Option<String> {
    extractors.iter().find_map(|ex| ex.extract(scope))
}
