//! Form node tree
//!
//! Pages are authored as trees of [`FormNode`]s. The composer matches on the
//! variant: fields are bound, sections are descended into, literals pass
//! through.

use crate::controls::{CheckSelect, Control, DropSelect, Switch, TextField, Upload};
use crate::section::Section;

/// One node of a page's declaration tree
#[derive(Clone, Debug)]
pub enum FormNode {
    /// A leaf control bound to one field
    Field(Control),
    /// A cosmetic group
    Section(Section),
    /// Static content, e.g. a heading or instructions
    Literal(String),
}

impl FormNode {
    /// The field name, if this node is a leaf control
    pub fn field(&self) -> Option<&str> {
        match self {
            FormNode::Field(control) => Some(control.field()),
            _ => None,
        }
    }

    /// Declared field names in this subtree, depth-first
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    pub(crate) fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            FormNode::Field(control) => out.push(control.field()),
            FormNode::Section(section) => {
                for child in &section.children {
                    child.collect_fields(out);
                }
            }
            FormNode::Literal(_) => {}
        }
    }
}

impl From<Control> for FormNode {
    fn from(control: Control) -> Self {
        FormNode::Field(control)
    }
}

impl From<TextField> for FormNode {
    fn from(control: TextField) -> Self {
        FormNode::Field(Control::Text(control))
    }
}

impl From<DropSelect> for FormNode {
    fn from(control: DropSelect) -> Self {
        FormNode::Field(Control::DropSelect(control))
    }
}

impl From<CheckSelect> for FormNode {
    fn from(control: CheckSelect) -> Self {
        FormNode::Field(Control::CheckSelect(control))
    }
}

impl From<Upload> for FormNode {
    fn from(control: Upload) -> Self {
        FormNode::Field(Control::Upload(control))
    }
}

impl From<Switch> for FormNode {
    fn from(control: Switch) -> Self {
        FormNode::Field(Control::Switch(control))
    }
}

impl From<Section> for FormNode {
    fn from(section: Section) -> Self {
        FormNode::Section(section)
    }
}

impl From<&str> for FormNode {
    fn from(text: &str) -> Self {
        FormNode::Literal(text.to_string())
    }
}

impl From<String> for FormNode {
    fn from(text: String) -> Self {
        FormNode::Literal(text)
    }
}
