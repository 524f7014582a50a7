use std::borrow::Cow;
use std::fmt;

/// Identifier of an activatable section of the site.
///
/// Targets compare by label. The four sections the site ships with are
/// available as associated constants, but any label can be represented so
/// that callers are free to activate something the content does not know.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Target(Cow<'static, str>);

impl Target {
    pub const ABOUT_ME: Self = Self::from_static("About Me");
    pub const PROJECTS: Self = Self::from_static("Projects");
    pub const SKILLS: Self = Self::from_static("Skills & Experience");
    pub const CONTACT: Self = Self::from_static("Contact");

    /// Targets rendered as floating crystals, left to right.
    pub const CRYSTALS: [Self; 3] = [Self::PROJECTS, Self::SKILLS, Self::CONTACT];

    /// Every target the built-in content knows about.
    pub const ALL: [Self; 4] = [Self::ABOUT_ME, Self::PROJECTS, Self::SKILLS, Self::CONTACT];

    pub const fn from_static(label: &'static str) -> Self {
        Self(Cow::Borrowed(label))
    }

    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        // Reuse the static label when one matches so clones stay cheap.
        match Self::ALL.into_iter().find(|known| known.label() == label) {
            Some(known) => known,
            None => Self(Cow::Owned(label)),
        }
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        Self::ALL.contains(self)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for Target {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Target {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_label() {
        assert_eq!(Target::new("Contact"), Target::CONTACT);
        assert_eq!(Target::from(String::from("Projects")), Target::PROJECTS);
        assert_ne!(Target::new("contact"), Target::CONTACT);
    }

    #[test]
    fn unknown_labels_are_representable() {
        let target = Target::new("Blog");
        assert_eq!(target.label(), "Blog");
        assert!(!target.is_known());
        assert!(Target::SKILLS.is_known());
    }
}
