use std::fs;
use std::path::Path;

use roxmltree::{Document, Node};
use thiserror::Error;

use crate::target::Target;

const BUILTIN_XML: &str = include_str!("../content/portfolio.xml");

/// Errors raised while loading or querying site content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("no content for target \"{0}\"")]
    UnknownTarget(Target),
    #[error("invalid content XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("<{0}> tag is missing")]
    MissingField(&'static str),
    #[error("unable to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct About {
    pub summary: String,
    pub education: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub desc: String,
    pub tech: Vec<String>,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skills {
    pub languages: Vec<String>,
    pub focus_areas: Vec<String>,
    pub frameworks_and_tools: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experience {
    pub role: String,
    pub org: String,
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub email: String,
    pub linkedin: String,
    pub github: String,
}

/// Content block the info panel renders for one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRecord<'a> {
    About(&'a About),
    Projects(&'a [Project]),
    SkillsAndExperience {
        skills: &'a Skills,
        experience: &'a [Experience],
    },
    Contact(&'a Contact),
}

/// Immutable site content, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentStore {
    pub name: String,
    pub slogan: String,
    pub about: About,
    pub projects: Vec<Project>,
    pub skills: Skills,
    pub experience: Vec<Experience>,
    pub contact: Contact,
}

impl ContentStore {
    /// Content compiled into the binary.
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_xml(BUILTIN_XML)
    }

    /// Loads content from an XML file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let xml = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_xml(&xml)
    }

    /// Parses the `<portfolio>` document shape used by `content/portfolio.xml`.
    pub fn from_xml(xml: &str) -> Result<Self, ContentError> {
        let document = Document::parse(xml)?;
        let root = document.root_element();

        let about = child(&root, "about")?;
        let skills = child(&root, "skills")?;
        let contact = child(&root, "contact")?;

        let projects = optional_child(&root, "projects")
            .map(|node| {
                elements(&node, "project")
                    .map(|project| {
                        Ok(Project {
                            name: required_text(&project, "name")?,
                            desc: required_text(&project, "desc")?,
                            tech: texts(&project, "tech"),
                            link: required_text(&project, "link")?,
                        })
                    })
                    .collect::<Result<Vec<_>, ContentError>>()
            })
            .transpose()?
            .unwrap_or_default();

        let experience = optional_child(&root, "experience")
            .map(|node| {
                elements(&node, "entry")
                    .map(|entry| {
                        Ok(Experience {
                            role: required_text(&entry, "role")?,
                            org: required_text(&entry, "org")?,
                            desc: required_text(&entry, "desc")?,
                        })
                    })
                    .collect::<Result<Vec<_>, ContentError>>()
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            name: required_text(&root, "name")?,
            slogan: optional_text(&root, "slogan").unwrap_or_default(),
            about: About {
                summary: required_text(&about, "summary")?,
                education: required_text(&about, "education")?,
            },
            projects,
            skills: Skills {
                languages: item_list(&skills, "languages"),
                focus_areas: item_list(&skills, "focus-areas"),
                frameworks_and_tools: item_list(&skills, "frameworks"),
            },
            experience,
            contact: Contact {
                email: required_text(&contact, "email")?,
                linkedin: required_text(&contact, "linkedin")?,
                github: required_text(&contact, "github")?,
            },
        })
    }

    /// Returns the content block for `target`.
    pub fn lookup(&self, target: &Target) -> Result<ContentRecord<'_>, ContentError> {
        let record = if *target == Target::ABOUT_ME {
            ContentRecord::About(&self.about)
        } else if *target == Target::PROJECTS {
            ContentRecord::Projects(&self.projects)
        } else if *target == Target::SKILLS {
            ContentRecord::SkillsAndExperience {
                skills: &self.skills,
                experience: &self.experience,
            }
        } else if *target == Target::CONTACT {
            ContentRecord::Contact(&self.contact)
        } else {
            return Err(ContentError::UnknownTarget(target.clone()));
        };
        Ok(record)
    }
}

fn elements<'a, 'input: 'a>(
    node: &Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |child| child.has_tag_name(tag))
}

fn optional_child<'a, 'input>(node: &Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(tag))
}

fn child<'a, 'input>(
    node: &Node<'a, 'input>,
    tag: &'static str,
) -> Result<Node<'a, 'input>, ContentError> {
    optional_child(node, tag).ok_or(ContentError::MissingField(tag))
}

fn required_text(node: &Node<'_, '_>, tag: &'static str) -> Result<String, ContentError> {
    optional_text(node, tag).ok_or(ContentError::MissingField(tag))
}

fn optional_text(node: &Node<'_, '_>, tag: &str) -> Option<String> {
    optional_child(node, tag).and_then(|child| node_text(&child))
}

fn node_text(node: &Node<'_, '_>) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
}

fn texts(node: &Node<'_, '_>, tag: &'static str) -> Vec<String> {
    elements(node, tag).filter_map(|child| node_text(&child)).collect()
}

fn item_list(node: &Node<'_, '_>, tag: &str) -> Vec<String> {
    optional_child(node, tag)
        .map(|list| texts(&list, "item"))
        .unwrap_or_default()
}
