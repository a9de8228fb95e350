//! Bundled demo pages.

use std::fmt;
use std::str::FromStr;

use elem::{
    Child, Element, ElemError, a, body, button, div, form, h, head, html, input, label, li, meta,
    p, raw_html, select, span, style, table, td, text, textarea, title, tr, ul,
};
use elem_config::DemoConfig;

use crate::error::CliError;

const DEMO_CSS: &str = "body { font-family: sans-serif; margin: 2rem; }
.container { max-width: 40rem; margin: 0 auto; }
.muted { color: #666; }";

/// Demo page selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Page {
    Basic,
    Form,
    List,
    Raw,
}

impl Page {
    pub(crate) const ALL: [Page; 4] = [Self::Basic, Self::Form, Self::List, Self::Raw];

    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Form => "form",
            Self::List => "list",
            Self::Raw => "raw",
        }
    }

    /// Build the page tree in the active scope.
    pub(crate) fn build(self, config: &DemoConfig) -> Result<Element, ElemError> {
        let content = match self {
            Self::Basic => basic(),
            Self::Form => signup_form()?,
            Self::List => inventory(),
            Self::Raw => raw_content(),
        };
        Ok(page_layout(config, content))
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Page {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|page| page.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|page| page.name()).collect();
                CliError::Validation(format!(
                    "unknown page '{s}' (expected one of: {})",
                    known.join(", ")
                ))
            })
    }
}

/// Shared document shell with a body slot.
fn page_layout<'a>(config: &DemoConfig, content: impl Into<Child<'a>>) -> Element {
    html(&config.lang).append((
        head().append((
            meta().charset("UTF-8"),
            meta()
                .name("viewport")
                .content("width=device-width, initial-scale=1.0"),
            title(&config.title),
            style(DEMO_CSS),
        )),
        body().append(div().id("app").class("container").append(content)),
    ))
}

fn basic() -> Element {
    div().append((
        h(1).append("Hello"),
        p().append("World"),
        p().class("muted")
            .append(("Built with ", a("https://www.rust-lang.org").blank().append("Rust"), ".")),
    ))
}

fn signup_form() -> Result<Element, ElemError> {
    let email = input("email")
        .id("email")
        .name("email")
        .placeholder("you@example.com")
        .required()
        .attach_script("el.focus();")?;

    Ok(form("/signup").id("signup").append((
        h(2).append("Sign up"),
        label("email").append("Email"),
        email,
        label("plan").append("Plan"),
        select("plan")
            .id("plan")
            .option("free", "Free", true)
            .option("pro", "Pro", false),
        label("about").append("About you"),
        textarea("about").id("about").rows(4).cols(40),
        button().kind("submit").append("Create account"),
    )))
}

fn inventory() -> Element {
    let fruits = ["Apple", "Banana", "Cherry", "Date", "Elderberry"];
    let stock = [("Apple", 12), ("Banana", 0), ("Cherry", 7)];

    div().append((
        h(2).append("Fruits"),
        ul().append_all(fruits.iter().map(|fruit| li().append(*fruit))),
        h(2).append("Stock"),
        table().append((
            tr().header_cell("Item").header_cell("Count"),
            stock
                .iter()
                .map(|(item, count)| {
                    tr().class(if *count == 0 { "empty" } else { "" })
                        .cell(*item)
                        .append(td().append(count.to_string()))
                })
                .collect::<Vec<_>>(),
        )),
        stock.iter().all(|(_, count)| *count > 0).then(|| p().append("Everything in stock")),
    ))
}

fn raw_content() -> Element {
    let comment = "<script>alert('hi')</script> & welcome";
    div().append((
        h(2).append("Escaped"),
        p().append(comment),
        h(2).append("Trusted markup"),
        raw_html("<p>Rendered <strong>as is</strong>, even <em>unclosed"),
        p().append((
            span().class("muted").append("Empty wrappers vanish:"),
            text(""),
            raw_html(""),
        )),
    ))
}
