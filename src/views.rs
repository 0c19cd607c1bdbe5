//! Page components. Each returns a fragment; the layout is applied later by
//! [`crate::render::apply_layout`].

use htmlescape::encode_minimal;

use crate::models::{Meta, Post};
use crate::render::Fragment;

const LAYOUT_HTML: &str = include_str!("../templates/layout.html");

const HOT_RELOAD_SCRIPT: &str = r#"
<script>
    const socket = new WebSocket("ws://" + window.location.host + "/ws");
    socket.onmessage = (event) => {
        if (event.data === "reload") {
            window.location.reload();
        }
    };
</script>
"#;

/// Full page shell around a fragment.
pub fn index(content: &str, is_development: bool) -> String {
    let mut page = LAYOUT_HTML.replace("{{ content }}", content);
    if is_development {
        page = page.replace("</body>", &format!("{}</body>", HOT_RELOAD_SCRIPT));
    }
    page
}

fn nav_link(href: &str, label: &str) -> String {
    format!(
        "<a href=\"{href}\" hx-get=\"{href}\" hx-target=\"#content\" hx-push-url=\"true\">{label}</a>",
        href = encode_minimal(href),
        label = encode_minimal(label),
    )
}

pub fn home() -> Fragment {
    Fragment::new(format!(
        r#"<section class="home">
  <h1 class="hero">Hello, world.</h1>
  <p class="lead">I build backend systems, small tools and the occasional web page. This is where I write about them.</p>
  <div class="home-actions">
    {posts}
    {contact}
  </div>
</section>"#,
        posts = nav_link("/posts", "Read the blog"),
        contact = nav_link("/contact", "Get in touch"),
    ))
}

pub fn post_list(posts: &[Post]) -> Fragment {
    if posts.is_empty() {
        return Fragment::new(
            r#"<section class="posts"><h1>Posts</h1><p class="empty">Nothing published yet.</p></section>"#,
        );
    }

    let mut list_items = String::new();
    for post in posts {
        list_items.push_str(&format!(
            r##"<li class="post-card">
  <a href="{link}" hx-get="{link}" hx-target="#content" hx-push-url="true">
    <h2 class="post-card-title">{title}</h2>
    <p class="post-card-desc">{desc}</p>
    <p class="post-card-meta"><span class="date">{date}</span> · <span class="author">{author}</span></p>
  </a>
</li>
"##,
            link = encode_minimal(&post.link),
            title = encode_minimal(&post.title),
            desc = encode_minimal(&post.content),
            date = encode_minimal(&post.date),
            author = encode_minimal(&post.author),
        ));
    }

    Fragment::new(format!(
        "<section class=\"posts\"><h1>Posts</h1><ul class=\"post-list\">\n{}</ul></section>",
        list_items
    ))
}

/// `body_html` is trusted markdown output and is inserted as-is.
pub fn post_content(meta: &Meta, body_html: &str) -> Fragment {
    Fragment::new(format!(
        r#"<article class="post">
  <header class="post-header">
    <p class="post-title">{title}</p>
    <p class="post-meta"><span class="date">{date}</span> · <span class="author">{author}</span></p>
    <p class="post-desc">{desc}</p>
  </header>
  <div class="post-body">
{body}
  </div>
  <footer class="post-footer">{back}</footer>
</article>"#,
        title = encode_minimal(&meta.title),
        date = encode_minimal(&meta.date),
        author = encode_minimal(&meta.author),
        desc = encode_minimal(&meta.desc),
        body = body_html,
        back = nav_link("/posts", "← All posts"),
    ))
}

pub fn contact(contact_email: Option<&str>) -> Fragment {
    let copy_email = match contact_email {
        Some(email) => format!(
            r#"
  <p class="direct-email">Prefer your own mail client? <button type="button" class="copy-email" data-email="{email}" onclick="copyEmail(this)">Copy my email</button></p>"#,
            email = encode_minimal(email),
        ),
        None => String::new(),
    };
    Fragment::new(format!(
        r##"<section class="contact">
  <h1>Contact</h1>
  <p>Send a message and I will get back to you by email.</p>{copy_email}
  <div id="contact-form-container">
    <form id="contact-form" action="/contact/send" method="post" hx-post="/contact/send" hx-target="#contact-form-container" hx-swap="innerHTML">
      <label for="email">Your email</label>
      <input type="email" id="email" name="email" required>
      <label for="subject">Subject</label>
      <input type="text" id="subject" name="subject">
      <label for="message">Message</label>
      <textarea id="message" name="message" rows="6" required></textarea>
      <button type="submit" id="submit-btn">
        <span class="btn-text">Send</span>
        <span class="btn-icon">→</span>
        <span class="btn-loader">Sending…</span>
      </button>
    </form>
  </div>
</section>"##,
    ))
}

pub fn contact_success() -> Fragment {
    Fragment::new(
        r#"<div class="contact-success">
  <h2>Message sent</h2>
  <p>Thanks for reaching out. I will reply as soon as I can.</p>
</div>"#,
    )
}

pub fn not_found() -> Fragment {
    Fragment::new(format!(
        r#"<section class="not-found">
  <h1>404</h1>
  <p>There is nothing here.</p>
  <p>{}</p>
</section>"#,
        nav_link("/", "Back home"),
    ))
}

pub fn error(message: &str) -> Fragment {
    Fragment::new(format!(
        r#"<section class="error"><h1>Something went wrong</h1><p>{}</p></section>"#,
        encode_minimal(message),
    ))
}
