//! Tag factories and attribute sugar.
//!
//! Factories create an [`Element`] in the active scope and pre-set only the
//! attributes that belong to construction. Everything else (ids, classes,
//! children) goes through the regular builder methods:
//!
//! ```
//! use elem::{a, div, h};
//!
//! let nav = div().id("nav").class("links").append((
//!     h(2).append("Links"),
//!     a("https://example.com").blank().append("Example"),
//! ));
//! assert_eq!(
//!     nav.to_html(),
//!     "<div id=\"nav\" class=\"links\"><h2>Links</h2>\
//!      <a href=\"https://example.com\" target=\"_blank\" rel=\"noopener noreferrer\">Example</a></div>"
//! );
//! ```

use crate::element::Element;

/// Element with an arbitrary tag.
#[must_use]
pub fn el(tag: &str) -> Element {
    Element::new(tag)
}

/// Document root. Serializes with a leading doctype.
#[must_use]
pub fn html(lang: &str) -> Element {
    Element::new("html").lang(lang)
}

#[must_use]
pub fn head() -> Element {
    Element::new("head")
}

#[must_use]
pub fn body() -> Element {
    Element::new("body")
}

#[must_use]
pub fn title(text: &str) -> Element {
    Element::with_text("title", text)
}

#[must_use]
pub fn meta() -> Element {
    Element::new("meta")
}

/// Inline stylesheet; the CSS is emitted verbatim.
#[must_use]
pub fn style(css: &str) -> Element {
    with_source("style", css)
}

/// Inline script; the code is emitted verbatim.
#[must_use]
pub fn script(code: &str) -> Element {
    with_source("script", code)
}

/// Element holding unescaped source. Text appended later is still escaped.
fn with_source(tag: &str, source: &str) -> Element {
    let element = Element::new(tag);
    if !source.is_empty() {
        element.push_raw_text(source.to_owned());
    }
    element
}

/// External script.
#[must_use]
pub fn script_src(src: &str) -> Element {
    Element::new("script").src(src)
}

#[must_use]
pub fn link(href: &str, rel: &str) -> Element {
    Element::new("link").href(href).rel(rel)
}

/// `<link rel="stylesheet">` for an external stylesheet.
#[must_use]
pub fn stylesheet(href: &str) -> Element {
    link(href, "stylesheet")
}

#[must_use]
pub fn div() -> Element {
    Element::new("div")
}

#[must_use]
pub fn span() -> Element {
    Element::new("span")
}

#[must_use]
pub fn p() -> Element {
    Element::new("p")
}

/// Heading `h1` to `h6`; other levels are clamped into that range.
#[must_use]
pub fn h(level: u8) -> Element {
    Element::new(format!("h{}", level.clamp(1, 6)))
}

#[must_use]
pub fn a(href: &str) -> Element {
    Element::new("a").href(href)
}

#[must_use]
pub fn img(src: &str, alt: &str) -> Element {
    Element::new("img").src(src).alt(alt)
}

/// Button with `type="button"`, so it does not submit an enclosing form.
#[must_use]
pub fn button() -> Element {
    Element::new("button").kind("button")
}

#[must_use]
pub fn input(kind: &str) -> Element {
    Element::new("input").kind(kind)
}

/// Form posting to `action`.
#[must_use]
pub fn form(action: &str) -> Element {
    Element::new("form").action(action).method("post")
}

#[must_use]
pub fn label(for_id: &str) -> Element {
    Element::new("label").attr("for", for_id)
}

#[must_use]
pub fn ul() -> Element {
    Element::new("ul")
}

#[must_use]
pub fn ol() -> Element {
    Element::new("ol")
}

#[must_use]
pub fn li() -> Element {
    Element::new("li")
}

#[must_use]
pub fn table() -> Element {
    Element::new("table")
}

#[must_use]
pub fn tr() -> Element {
    Element::new("tr")
}

#[must_use]
pub fn td() -> Element {
    Element::new("td")
}

#[must_use]
pub fn th() -> Element {
    Element::new("th")
}

#[must_use]
pub fn textarea(name: &str) -> Element {
    Element::new("textarea").name(name)
}

#[must_use]
pub fn select(name: &str) -> Element {
    Element::new("select").name(name)
}

/// Select option. An empty `text` leaves the option without content.
#[must_use]
pub fn option(value: &str, text: &str, selected: bool) -> Element {
    Element::with_text("option", text)
        .value(value)
        .when(selected, |option| {
            option.selected();
        })
}

/// Named setters over [`Element::attr`].
///
/// Boolean attributes are written as `name="name"`.
impl Element {
    pub fn href(&self, href: &str) -> Self {
        self.attr("href", href)
    }

    pub fn target(&self, target: &str) -> Self {
        self.attr("target", target)
    }

    /// Open in a new tab without exposing `window.opener`.
    pub fn blank(&self) -> Self {
        self.target("_blank").rel("noopener noreferrer")
    }

    pub fn rel(&self, rel: &str) -> Self {
        self.attr("rel", rel)
    }

    pub fn name(&self, name: &str) -> Self {
        self.attr("name", name)
    }

    pub fn value(&self, value: &str) -> Self {
        self.attr("value", value)
    }

    pub fn placeholder(&self, placeholder: &str) -> Self {
        self.attr("placeholder", placeholder)
    }

    pub fn required(&self) -> Self {
        self.attr("required", "required")
    }

    pub fn disabled(&self) -> Self {
        self.attr("disabled", "disabled")
    }

    pub fn selected(&self) -> Self {
        self.attr("selected", "selected")
    }

    pub fn rows(&self, rows: u32) -> Self {
        self.attr("rows", rows.to_string())
    }

    pub fn cols(&self, cols: u32) -> Self {
        self.attr("cols", cols.to_string())
    }

    pub fn src(&self, src: &str) -> Self {
        self.attr("src", src)
    }

    pub fn alt(&self, alt: &str) -> Self {
        self.attr("alt", alt)
    }

    pub fn width(&self, width: u32) -> Self {
        self.attr("width", width.to_string())
    }

    pub fn height(&self, height: u32) -> Self {
        self.attr("height", height.to_string())
    }

    pub fn action(&self, action: &str) -> Self {
        self.attr("action", action)
    }

    pub fn method(&self, method: &str) -> Self {
        self.attr("method", method)
    }

    pub fn lang(&self, lang: &str) -> Self {
        self.attr("lang", lang)
    }

    pub fn charset(&self, charset: &str) -> Self {
        self.attr("charset", charset)
    }

    pub fn content(&self, content: &str) -> Self {
        self.attr("content", content)
    }

    /// Set the `type` attribute.
    pub fn kind(&self, kind: &str) -> Self {
        self.attr("type", kind)
    }

    pub fn defer(&self) -> Self {
        self.attr("defer", "defer")
    }

    pub fn async_(&self) -> Self {
        self.attr("async", "async")
    }

    /// Append `content` wrapped in an `li`.
    pub fn item<'a>(&self, content: impl Into<crate::Child<'a>>) -> Self {
        self.append(li().append(content))
    }

    /// Append `content` wrapped in a `td`.
    pub fn cell<'a>(&self, content: impl Into<crate::Child<'a>>) -> Self {
        self.append(td().append(content))
    }

    /// Append `content` wrapped in a `th`.
    pub fn header_cell<'a>(&self, content: impl Into<crate::Child<'a>>) -> Self {
        self.append(th().append(content))
    }

    /// Append an `option` child.
    pub fn option(&self, value: &str, text: &str, selected: bool) -> Self {
        self.append(option(value, text, selected))
    }
}
