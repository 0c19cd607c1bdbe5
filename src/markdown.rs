use pulldown_cmark::{html, Options, Parser};
use tracing::warn;

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options
}

/// Writes the HTML for `markdown` into `out`.
pub fn write_markdown_html<W: std::fmt::Write>(out: &mut W, markdown: &str) -> std::fmt::Result {
    let parser = Parser::new_ext(markdown, markdown_options());
    html::write_html_fmt(out, parser)
}

/// Renders a post body. A write failure is logged and whatever was
/// produced up to that point is returned.
pub fn render_markdown_to_html(markdown: &str) -> String {
    let mut html_out = String::with_capacity(markdown.len() * 3 / 2);
    if let Err(e) = write_markdown_html(&mut html_out, markdown) {
        warn!("Markdown conversion failed: {}", e);
    }
    html_out
}
