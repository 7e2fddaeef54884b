//! Section grouper
//!
//! A purely cosmetic wrapper around a group of nodes. Sections carry no field
//! of their own; composition descends into them and rebuilds them with the
//! same style around the bound children.

use crate::node::FormNode;

/// Visual styling of a section
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SectionStyle {
    /// Background color token or CSS color
    pub background: Option<String>,
    /// Border color token or CSS color
    pub border: Option<String>,
    /// Inner padding in pixels
    pub padding: f32,
}

/// A cosmetic group of form nodes
#[derive(Clone, Debug, Default)]
pub struct Section {
    /// Styling preserved through composition
    pub style: SectionStyle,
    /// Grouped nodes in display order
    pub children: Vec<FormNode>,
}

impl Section {
    /// Create an empty section
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the background color
    pub fn bg(mut self, color: impl Into<String>) -> Self {
        self.style.background = Some(color.into());
        self
    }

    /// Set the border color
    pub fn border(mut self, color: impl Into<String>) -> Self {
        self.style.border = Some(color.into());
        self
    }

    /// Set the inner padding
    pub fn padding(mut self, padding: f32) -> Self {
        self.style.padding = padding;
        self
    }

    /// Append a child node
    pub fn child(mut self, child: impl Into<FormNode>) -> Self {
        self.children.push(child.into());
        self
    }
}

/// Create an empty section
pub fn section() -> Section {
    Section::new()
}
