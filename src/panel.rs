use std::fmt::{self, Write as _};

use log::warn;

use crate::content::{ContentRecord, ContentStore};
use crate::target::Target;

/// Visual style of a tag chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagStyle {
    Plain,
    Area,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub link: Option<String>,
}

/// One block of the info panel, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelBlock {
    Heading(String),
    Paragraph(String),
    Tags { style: TagStyle, items: Vec<String> },
    Cards(Vec<Card>),
    Field { name: String, link: Link },
}

/// Renderable content of an open info panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub target: Target,
    pub title: String,
    pub blocks: Vec<PanelBlock>,
}

/// Builds panel views from the content store.
#[derive(Debug, Clone, Copy)]
pub struct InfoPanelPresenter<'a> {
    content: &'a ContentStore,
}

impl<'a> InfoPanelPresenter<'a> {
    pub fn new(content: &'a ContentStore) -> Self {
        Self { content }
    }

    /// Returns the view for the visible panel, or `None` when nothing should
    /// be shown. Targets without content render nothing.
    pub fn present(&self, visible_panel: Option<&Target>) -> Option<PanelView> {
        let target = visible_panel?;
        match self.content.lookup(target) {
            Ok(record) => Some(build_view(target, record)),
            Err(err) => {
                warn!("{err}; panel left empty");
                None
            }
        }
    }
}

fn build_view(target: &Target, record: ContentRecord<'_>) -> PanelView {
    let (title, blocks) = match record {
        ContentRecord::About(about) => (
            "ABOUT ME",
            vec![
                PanelBlock::Heading("PROFESSIONAL SUMMARY".into()),
                PanelBlock::Paragraph(about.summary.clone()),
                PanelBlock::Heading("EDUCATION".into()),
                PanelBlock::Paragraph(about.education.clone()),
            ],
        ),
        ContentRecord::Projects(projects) => (
            "PROJECTS",
            vec![PanelBlock::Cards(
                projects
                    .iter()
                    .map(|project| Card {
                        title: project.name.clone(),
                        body: project.desc.clone(),
                        tags: project.tech.clone(),
                        link: safe_link(&project.link),
                    })
                    .collect(),
            )],
        ),
        ContentRecord::SkillsAndExperience { skills, experience } => (
            "SKILLS & EXPERIENCE",
            vec![
                PanelBlock::Heading("Languages & Databases".into()),
                PanelBlock::Tags {
                    style: TagStyle::Plain,
                    items: skills.languages.clone(),
                },
                PanelBlock::Heading("Focus Areas".into()),
                PanelBlock::Tags {
                    style: TagStyle::Area,
                    items: skills.focus_areas.clone(),
                },
                PanelBlock::Heading("Frameworks & Tools".into()),
                PanelBlock::Tags {
                    style: TagStyle::Plain,
                    items: skills.frameworks_and_tools.clone(),
                },
                PanelBlock::Heading("Experience".into()),
                PanelBlock::Cards(
                    experience
                        .iter()
                        .map(|entry| Card {
                            title: format!("{} - {}", entry.role, entry.org),
                            body: entry.desc.clone(),
                            tags: Vec::new(),
                            link: None,
                        })
                        .collect(),
                ),
            ],
        ),
        ContentRecord::Contact(contact) => (
            "CONTACT & LINKS",
            vec![
                field("Email", &contact.email, format!("mailto:{}", contact.email)),
                field("LinkedIn", &contact.linkedin, https(&contact.linkedin)),
                field("GitHub", &contact.github, https(&contact.github)),
            ],
        ),
    };

    PanelView {
        target: target.clone(),
        title: title.to_string(),
        blocks,
    }
}

fn field(name: &str, label: &str, href: String) -> PanelBlock {
    PanelBlock::Field {
        name: name.to_string(),
        link: Link {
            label: label.to_string(),
            href,
        },
    }
}

/// Project links end up in `href`, so only web and mail schemes pass.
/// Bare hosts get `https://`.
fn safe_link(address: &str) -> Option<String> {
    let address = address.trim_matches(|c: char| c.is_whitespace() || c.is_control());
    let lower = address.to_ascii_lowercase();
    if ["http://", "https://", "mailto:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return Some(address.to_string());
    }
    let scheme = address.split(':').next().unwrap_or_default();
    if address.is_empty() || (address.contains(':') && !scheme.contains(['.', '/'])) {
        warn!("dropping project link {address:?}");
        return None;
    }
    Some(https(address))
}

fn https(address: &str) -> String {
    if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("https://{address}")
    }
}

impl PanelView {
    /// HTML fragment for the browser overlay. The close button carries the
    /// `close-button` class so the host can wire it to a close request.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str(r#"<div class="info-panel-content">"#);
        html.push_str(r#"<button class="close-button">×</button>"#);
        let _ = write!(html, "<h2>{}</h2>", escape(&self.title));
        html.push_str(r#"<div class="content-section">"#);
        for block in &self.blocks {
            match block {
                PanelBlock::Heading(text) => {
                    let _ = write!(html, "<h3>{}</h3>", escape(text));
                }
                PanelBlock::Paragraph(text) => {
                    let _ = write!(html, "<p>{}</p>", escape(text));
                }
                PanelBlock::Tags { style, items } => push_tags(&mut html, *style, items),
                PanelBlock::Cards(cards) => {
                    html.push_str(r#"<div class="content-grid">"#);
                    for card in cards {
                        push_card(&mut html, card);
                    }
                    html.push_str("</div>");
                }
                PanelBlock::Field { name, link } => {
                    let _ = write!(
                        html,
                        r#"<p><strong>{}:</strong> <a href="{}" target="_blank" rel="noopener noreferrer">{}</a></p>"#,
                        escape(name),
                        escape(&link.href),
                        escape(&link.label)
                    );
                }
            }
        }
        html.push_str("</div></div>");
        html
    }
}

fn push_tags(html: &mut String, style: TagStyle, items: &[String]) {
    html.push_str(r#"<div class="tech-tags">"#);
    for item in items {
        match style {
            TagStyle::Plain => {
                let _ = write!(html, "<span>{}</span>", escape(item));
            }
            TagStyle::Area => {
                let _ = write!(html, r#"<span class="area">{}</span>"#, escape(item));
            }
        }
    }
    html.push_str("</div>");
}

fn push_card(html: &mut String, card: &Card) {
    if let Some(link) = &card.link {
        let _ = write!(
            html,
            r#"<a href="{}" target="_blank" rel="noopener noreferrer" class="card-link">"#,
            escape(link)
        );
    }
    html.push_str(r#"<div class="card">"#);
    let _ = write!(
        html,
        "<h3>{}</h3><p>{}</p>",
        escape(&card.title),
        escape(&card.body)
    );
    if !card.tags.is_empty() {
        push_tags(html, TagStyle::Plain, &card.tags);
    }
    html.push_str("</div>");
    if card.link.is_some() {
        html.push_str("</a>");
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Plain-text rendering used by the console front ends.
impl fmt::Display for PanelView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        for block in &self.blocks {
            match block {
                PanelBlock::Heading(text) => writeln!(f, "# {text}")?,
                PanelBlock::Paragraph(text) => writeln!(f, "{text}")?,
                PanelBlock::Tags { items, .. } => writeln!(f, "[{}]", items.join("] ["))?,
                PanelBlock::Cards(cards) => {
                    for card in cards {
                        writeln!(f, "* {}: {}", card.title, card.body)?;
                        if !card.tags.is_empty() {
                            writeln!(f, "  [{}]", card.tags.join("] ["))?;
                        }
                        if let Some(link) = &card.link {
                            writeln!(f, "  {link}")?;
                        }
                    }
                }
                PanelBlock::Field { name, link } => {
                    writeln!(f, "{name}: {} <{}>", link.label, link.href)?
                }
            }
        }
        Ok(())
    }
}
