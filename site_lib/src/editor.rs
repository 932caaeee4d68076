//! Rich-text editor extensions for the admin: named commands and content filters.
//!
//! Commands take their input as an argument and return the edit to apply.
//! Filters rewrite HTML as it is pasted or loaded into the editor.

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::SiteError;
use crate::validation::validate_anchor_id;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum EditorError {
    #[error("command '{0}' is already registered")]
    DuplicateCommand(String),
    #[error("filter '{0}' is already registered")]
    DuplicateFilter(String),
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("no video URL given")]
    EmptyUrl,
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error("pattern error: {0}")]
    Pattern(String),
}

/// Tags that take an `id` directly; anything else gets wrapped in a `<span>`.
const ID_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "p", "a", "span", "div"];

/// What the editor currently has selected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// Tag name of the element the selection starts in, if any.
    pub element: Option<String>,
    /// Selected markup.
    pub html: String,
}

/// Editor state a command may consult.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditorContext {
    /// Origin of the admin page, e.g. `http://127.0.0.1:8001`.
    pub origin: Option<String>,
    pub selection: Selection,
}

/// Change a command asks the editor to make.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorEdit {
    /// Insert markup at the caret.
    InsertHtml(String),
    /// Set an attribute on the selected element.
    SetAttribute { name: String, value: String },
    /// Replace the selection with this markup.
    ReplaceSelection(String),
}

/// Typed handler behind a named command.
pub trait CommandHandler: Send + Sync {
    fn exec(&self, ctx: &EditorContext, arg: &str) -> Result<EditorEdit, EditorError>;
}

impl<F> CommandHandler for F
where
    F: Fn(&EditorContext, &str) -> Result<EditorEdit, EditorError> + Send + Sync,
{
    fn exec(&self, ctx: &EditorContext, arg: &str) -> Result<EditorEdit, EditorError> {
        self(ctx, arg)
    }
}

/// Rewrites markup entering the editor.
pub trait ContentFilter: Send + Sync {
    fn filter(&self, html: &str) -> String;
}

impl<F> ContentFilter for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn filter(&self, html: &str) -> String {
        self(html)
    }
}

/// Registered commands and filters.
#[derive(Default)]
pub struct ExtensionRegistry {
    commands: BTreeMap<String, Box<dyn CommandHandler>>,
    filters: Vec<(String, Box<dyn ContentFilter>)>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `insert_video`, `set_id` and the `sanitize_video` filter.
    pub fn with_defaults() -> Result<Self, EditorError> {
        let mut registry = Self::new();
        registry.register_command("insert_video", insert_video)?;
        registry.register_command("set_id", set_id)?;
        registry.register_filter("sanitize_video", sanitize_video)?;
        Ok(registry)
    }

    pub fn register_command<H>(&mut self, name: &str, handler: H) -> Result<(), EditorError>
    where
        H: CommandHandler + 'static,
    {
        if self.commands.contains_key(name) {
            return Err(EditorError::DuplicateCommand(name.to_string()));
        }
        self.commands.insert(name.to_string(), Box::new(handler));
        Ok(())
    }

    pub fn register_filter<F>(&mut self, name: &str, filter: F) -> Result<(), EditorError>
    where
        F: ContentFilter + 'static,
    {
        if self.filters.iter().any(|(n, _)| n == name) {
            return Err(EditorError::DuplicateFilter(name.to_string()));
        }
        self.filters.push((name.to_string(), Box::new(filter)));
        Ok(())
    }

    pub fn command_names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    pub fn exec(&self, name: &str, ctx: &EditorContext, arg: &str) -> Result<EditorEdit, EditorError> {
        let handler = self
            .commands
            .get(name)
            .ok_or_else(|| EditorError::UnknownCommand(name.to_string()))?;
        handler.exec(ctx, arg)
    }

    /// Runs every filter, in registration order, over pasted markup.
    pub fn on_paste(&self, html: &str) -> String {
        self.apply_filters(html)
    }

    /// Runs every filter over markup loaded from storage.
    pub fn on_load(&self, html: &str) -> String {
        self.apply_filters(html)
    }

    fn apply_filters(&self, html: &str) -> String {
        self.filters
            .iter()
            .fold(html.to_string(), |acc, (_, filter)| filter.filter(&acc))
    }
}

/// `insert_video` command: embeds the video at `arg`.
pub fn insert_video(ctx: &EditorContext, arg: &str) -> Result<EditorEdit, EditorError> {
    video_embed_html(arg, ctx.origin.as_deref()).map(EditorEdit::InsertHtml)
}

/// `set_id` command: tags the selection with the id in `arg`.
pub fn set_id(ctx: &EditorContext, arg: &str) -> Result<EditorEdit, EditorError> {
    let id = validate_anchor_id(arg).map_err(|e| match e {
        SiteError::InvalidInput(msg) => EditorError::InvalidId(msg),
        other => EditorError::InvalidId(other.to_string()),
    })?;
    let id = id.as_str();
    let takes_id = ctx
        .selection
        .element
        .as_deref()
        .map(|tag| ID_TAGS.contains(&tag.to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    if takes_id {
        Ok(EditorEdit::SetAttribute {
            name: "id".to_string(),
            value: id.to_string(),
        })
    } else {
        Ok(EditorEdit::ReplaceSelection(format!(
            r#"<span id="{}">{}</span>"#,
            html_encode(id),
            ctx.selection.html
        )))
    }
}

/// Normalizes a pasted video URL to an embeddable one.
pub fn normalize_video_url(raw: &str, origin: Option<&str>) -> String {
    let mut url = raw.trim().to_string();
    if let Some(inner) = url.strip_prefix('`').and_then(|u| u.strip_suffix('`')) {
        url = inner.trim().to_string();
    }

    if url.contains("youtube.com/watch") {
        let id = after(&url, "v=").split('&').next().unwrap_or("");
        if !id.is_empty() {
            url = format!("https://www.youtube.com/embed/{}", id);
        }
    }
    if url.contains("youtu.be/") {
        let id = after(&url, "youtu.be/")
            .split(['?', '&'])
            .next()
            .unwrap_or("");
        if !id.is_empty() {
            url = format!("https://www.youtube.com/embed/{}", id);
        }
    }
    if url.contains("vimeo.com/") && !url.contains("player.vimeo.com") {
        let id = after(&url, "vimeo.com/")
            .split(['?', '&'])
            .next()
            .unwrap_or("");
        if !id.is_empty() {
            url = format!("https://player.vimeo.com/video/{}", id);
        }
    }

    if let Some(origin) = origin.map(|o| o.trim_end_matches('/')).filter(|o| !o.is_empty()) {
        if url.starts_with("/media/") {
            url = format!("{}{}", origin, url);
        }
    }
    url
}

/// Markup for a video: a `<video>` element for direct files and uploads,
/// otherwise an iframe embed.
pub fn video_embed_html(raw: &str, origin: Option<&str>) -> Result<String, EditorError> {
    let url = normalize_video_url(raw, origin);
    if url.is_empty() {
        return Err(EditorError::EmptyUrl);
    }
    let file_re = Regex::new(r"\.(mp4|webm|ogg)(\?.*)?$")
        .map_err(|e| EditorError::Pattern(format!("regex compile error: {}", e)))?;
    let safe = html_encode(&url);
    if file_re.is_match(&url) || url.contains("/media/") {
        Ok(format!(
            r#"<video controls width="640" playsinline><source src="{}" type="video/mp4">Your browser does not support the video tag.</video>"#,
            safe
        ))
    } else {
        Ok(format!(
            r#"<iframe width="560" height="315" src="{}" frameborder="0" allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" allowfullscreen></iframe>"#,
            safe
        ))
    }
}

/// Rewrites YouTube watch/short links and Vimeo links to their embed form.
pub fn sanitize_video_html(html: &str) -> Result<String, EditorError> {
    let compile = |pattern: &str| {
        Regex::new(pattern).map_err(|e| EditorError::Pattern(format!("regex compile error: {}", e)))
    };
    let watch_src =
        compile(r#"src=["']https?://(?:www\.)?youtube\.com/watch\?v=([A-Za-z0-9_-]+)[^"']*["']"#)?;
    let watch = compile(r"https?://(?:www\.)?youtube\.com/watch\?v=([A-Za-z0-9_-]+)")?;
    let short = compile(r"https?://(?:www\.)?youtu\.be/([A-Za-z0-9_-]+)")?;
    let vimeo = compile(r"https?://(?:www\.)?vimeo\.com/([0-9]+)")?;

    let out = watch_src.replace_all(html, r#"src="https://www.youtube.com/embed/$1""#);
    let out = watch.replace_all(&out, "https://www.youtube.com/embed/$1");
    let out = short.replace_all(&out, "https://www.youtube.com/embed/$1");
    let out = vimeo.replace_all(&out, "https://player.vimeo.com/video/$1");
    Ok(out.into_owned())
}

/// `sanitize_video` filter. Leaves the markup untouched if it cannot be processed.
pub fn sanitize_video(html: &str) -> String {
    sanitize_video_html(html).unwrap_or_else(|e| {
        tracing::warn!("sanitize_video skipped: {}", e);
        html.to_string()
    })
}

fn after<'a>(s: &'a str, marker: &str) -> &'a str {
    s.split_once(marker).map(|(_, rest)| rest).unwrap_or("")
}

fn html_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iframe(src: &str) -> String {
        format!(
            r#"<iframe width="560" height="315" src="{}" frameborder="0" allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" allowfullscreen></iframe>"#,
            src
        )
    }

    #[test]
    fn youtube_watch_becomes_embed() {
        let html = video_embed_html("https://www.youtube.com/watch?v=abc123&t=42", None).unwrap();
        assert_eq!(html, iframe("https://www.youtube.com/embed/abc123"));
    }

    #[test]
    fn short_links_and_backticks() {
        assert_eq!(
            normalize_video_url(" `https://youtu.be/XyZ_9?si=share` ", None),
            "https://www.youtube.com/embed/XyZ_9"
        );
    }

    #[test]
    fn vimeo_becomes_player() {
        assert_eq!(
            normalize_video_url("https://vimeo.com/76979871", None),
            "https://player.vimeo.com/video/76979871"
        );
        assert_eq!(
            normalize_video_url("https://player.vimeo.com/video/1", None),
            "https://player.vimeo.com/video/1"
        );
    }

    #[test]
    fn media_paths_get_origin_and_video_tag() {
        let html = video_embed_html("/media/uploads/clip.mp4", Some("http://127.0.0.1:8001/")).unwrap();
        assert_eq!(
            html,
            r#"<video controls width="640" playsinline><source src="http://127.0.0.1:8001/media/uploads/clip.mp4" type="video/mp4">Your browser does not support the video tag.</video>"#
        );
    }

    #[test]
    fn direct_files_with_query_use_video_tag() {
        let html = video_embed_html("https://cdn.example.com/a.webm?x=1&y=2", None).unwrap();
        assert!(html.starts_with("<video"));
        assert!(html.contains("a.webm?x=1&amp;y=2"));
    }

    #[test]
    fn empty_url_is_an_error() {
        assert_eq!(video_embed_html("  ", None), Err(EditorError::EmptyUrl));
        assert_eq!(video_embed_html("``", None), Err(EditorError::EmptyUrl));
    }

    #[test]
    fn set_id_on_allowed_element() {
        let ctx = EditorContext {
            selection: Selection {
                element: Some("H2".into()),
                html: "Rates".into(),
            },
            ..Default::default()
        };
        assert_eq!(
            set_id(&ctx, " rates ").unwrap(),
            EditorEdit::SetAttribute {
                name: "id".into(),
                value: "rates".into()
            }
        );
    }

    #[test]
    fn set_id_wraps_other_selections() {
        let ctx = EditorContext {
            selection: Selection {
                element: Some("td".into()),
                html: "cell".into(),
            },
            ..Default::default()
        };
        assert_eq!(
            set_id(&ctx, "cell-1").unwrap(),
            EditorEdit::ReplaceSelection(r#"<span id="cell-1">cell</span>"#.into())
        );
        assert!(matches!(set_id(&ctx, "two words"), Err(EditorError::InvalidId(_))));
        assert!(matches!(set_id(&ctx, "   "), Err(EditorError::InvalidId(_))));
    }

    #[test]
    fn set_id_reports_anchor_validation_messages() {
        let ctx = EditorContext::default();
        assert_eq!(
            set_id(&ctx, "  "),
            Err(EditorError::InvalidId("id must not be empty".into()))
        );
        assert_eq!(
            set_id(&ctx, "my id"),
            Err(EditorError::InvalidId("invalid id 'my id'. Ids cannot contain spaces".into()))
        );
        let registry = ExtensionRegistry::with_defaults().unwrap();
        assert!(matches!(
            registry.exec("set_id", &ctx, "a\tb"),
            Err(EditorError::InvalidId(_))
        ));
    }

    #[test]
    fn sanitize_rewrites_links() {
        let html = r#"<iframe src='https://www.youtube.com/watch?v=abc&list=x'></iframe> see https://youtu.be/def and http://vimeo.com/42"#;
        assert_eq!(
            sanitize_video(html),
            r#"<iframe src="https://www.youtube.com/embed/abc"></iframe> see https://www.youtube.com/embed/def and https://player.vimeo.com/video/42"#
        );
    }

    #[test]
    fn registry_rejects_duplicates() {
        let mut registry = ExtensionRegistry::with_defaults().unwrap();
        assert_eq!(
            registry.register_command("set_id", set_id),
            Err(EditorError::DuplicateCommand("set_id".into()))
        );
        assert_eq!(registry.command_names(), vec!["insert_video", "set_id"]);
    }

    #[test]
    fn registry_dispatches_and_filters() {
        let mut registry = ExtensionRegistry::with_defaults().unwrap();
        registry
            .register_filter("shout", |html: &str| html.to_uppercase())
            .unwrap();
        let edit = registry
            .exec("insert_video", &EditorContext::default(), "https://youtu.be/q1")
            .unwrap();
        assert_eq!(edit, EditorEdit::InsertHtml(iframe("https://www.youtube.com/embed/q1")));
        assert_eq!(
            registry.exec("bold", &EditorContext::default(), ""),
            Err(EditorError::UnknownCommand("bold".into()))
        );
        assert_eq!(
            registry.on_load("https://vimeo.com/7"),
            "HTTPS://PLAYER.VIMEO.COM/VIDEO/7"
        );
        assert_eq!(registry.on_paste("x"), "X");
    }
}
