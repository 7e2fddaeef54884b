//! Page composer
//!
//! [`FormPage::compose`] walks a page's node tree in order and produces a
//! [`Rendered`] tree of the same shape:
//!
//! - literals pass through unchanged
//! - sections are rebuilt with their original style around their composed
//!   children
//! - controls are bound to the record entry named by their declared field
//!   (absent entries bind as `None`) and to the shared change callback
//!
//! A control whose field name is not in the record's key set fails
//! composition with [`FormError::UnknownField`]; no partial tree is returned.

use clubhouse_core::{FieldKey, Record};

use crate::controls::{BoundControl, ChangeCallback};
use crate::error::{FormError, Result};
use crate::node::FormNode;
use crate::section::SectionStyle;

/// One page of a multi-page form
#[derive(Clone, Debug, Default)]
pub struct FormPage {
    /// Page heading
    pub title: String,
    /// Top-level nodes in display order
    pub children: Vec<FormNode>,
}

impl FormPage {
    /// Create an empty page
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            children: Vec::new(),
        }
    }

    /// Append a child node
    pub fn child(mut self, child: impl Into<FormNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append several child nodes
    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<FormNode>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Declared field names on this page, depth-first
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for child in &self.children {
            child.collect_fields(&mut out);
        }
        out
    }

    /// Bind every control on the page to `record` and `on_change`
    pub fn compose<K: FieldKey>(
        &self,
        record: &Record<K>,
        on_change: &ChangeCallback<K>,
    ) -> Result<Vec<Rendered<K>>> {
        compose_nodes(&self.title, &self.children, record, on_change)
    }
}

/// Create an empty page
pub fn page(title: impl Into<String>) -> FormPage {
    FormPage::new(title)
}

fn compose_nodes<K: FieldKey>(
    page: &str,
    nodes: &[FormNode],
    record: &Record<K>,
    on_change: &ChangeCallback<K>,
) -> Result<Vec<Rendered<K>>> {
    nodes
        .iter()
        .map(|node| compose_node(page, node, record, on_change))
        .collect()
}

fn compose_node<K: FieldKey>(
    page: &str,
    node: &FormNode,
    record: &Record<K>,
    on_change: &ChangeCallback<K>,
) -> Result<Rendered<K>> {
    match node {
        FormNode::Literal(text) => Ok(Rendered::Literal(text.clone())),
        FormNode::Section(section) => Ok(Rendered::Section {
            style: section.style.clone(),
            children: compose_nodes(page, &section.children, record, on_change)?,
        }),
        FormNode::Field(control) => {
            let key = K::from_name(control.field()).ok_or_else(|| FormError::UnknownField {
                field: control.field().to_string(),
                page: page.to_string(),
            })?;
            Ok(Rendered::Control(BoundControl::new(
                key,
                control.clone(),
                record.get_shared(key),
                on_change.clone(),
            )))
        }
    }
}

/// A composed node
#[derive(Clone, Debug)]
pub enum Rendered<K: FieldKey> {
    /// A control bound to its record slice
    Control(BoundControl<K>),
    /// A section rebuilt around its composed children
    Section {
        style: SectionStyle,
        children: Vec<Rendered<K>>,
    },
    /// Static content
    Literal(String),
}

impl<K: FieldKey> Rendered<K> {
    /// Bound controls in this subtree, depth-first in display order
    pub fn controls(&self) -> Vec<&BoundControl<K>> {
        let mut out = Vec::new();
        self.collect_controls(&mut out);
        out
    }

    /// Number of bound controls in this subtree
    pub fn count_controls(&self) -> usize {
        match self {
            Rendered::Control(_) => 1,
            Rendered::Section { children, .. } => children.iter().map(Rendered::count_controls).sum(),
            Rendered::Literal(_) => 0,
        }
    }

    fn collect_controls<'a>(&'a self, out: &mut Vec<&'a BoundControl<K>>) {
        match self {
            Rendered::Control(control) => out.push(control),
            Rendered::Section { children, .. } => {
                for child in children {
                    child.collect_controls(out);
                }
            }
            Rendered::Literal(_) => {}
        }
    }
}

/// Bound controls across a list of composed nodes, in display order
pub fn controls_of<K: FieldKey>(nodes: &[Rendered<K>]) -> Vec<&BoundControl<K>> {
    let mut out = Vec::new();
    for node in nodes {
        node.collect_controls(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::{check_select, drop_select, text_field, upload, Control};
    use crate::requirements::Requirements;
    use crate::section::section;
    use clubhouse_core::FieldValue;
    use std::sync::{Arc, Mutex};

    clubhouse_core::field_keys! {
        enum Charter {
            Name => "name",
            Url => "url",
            Level => "commitment_level",
            Socials => "socials",
            Picture => "picture",
        }
    }

    fn basic_info() -> FormPage {
        page("Basic Info")
            .child(
                section()
                    .bg("red")
                    .child(
                        text_field("name")
                            .label("Name")
                            .required()
                            .requirements(Requirements::new().min_char(3).max_char(40).only_alpha()),
                    )
                    .child(text_field("url").label("Url").required()),
            )
            .child(
                drop_select("commitment_level")
                    .label("Commitment Level")
                    .selection("LOW", "Low"),
            )
            .child("Anything else?")
            .child(text_field("socials").label("Socials (optional)"))
            .child(upload("picture").display())
    }

    fn noop() -> ChangeCallback<Charter> {
        Arc::new(|_, _| {})
    }

    #[test]
    fn test_structure_and_order_preserved() {
        let page = basic_info();
        let record = Record::new().with(Charter::Name, "Chess");

        let rendered = page.compose(&record, &noop()).unwrap();

        assert_eq!(rendered.len(), page.children.len());
        assert!(matches!(rendered[0], Rendered::Section { .. }));
        assert!(matches!(rendered[2], Rendered::Literal(ref t) if t == "Anything else?"));

        let keys: Vec<Charter> = controls_of(&rendered).iter().map(|c| c.key()).collect();
        assert_eq!(
            keys,
            vec![
                Charter::Name,
                Charter::Url,
                Charter::Level,
                Charter::Socials,
                Charter::Picture,
            ]
        );
        assert_eq!(page.fields().len(), keys.len());
        assert_eq!(rendered.iter().map(Rendered::count_controls).sum::<usize>(), keys.len());
    }

    #[test]
    fn test_section_style_preserved() {
        let rendered = basic_info()
            .compose(&Record::new(), &noop())
            .unwrap();
        match &rendered[0] {
            Rendered::Section { style, children } => {
                assert_eq!(style.background.as_deref(), Some("red"));
                assert_eq!(children.len(), 2);
            }
            other => panic!("expected section, got {other:?}"),
        }
    }

    #[test]
    fn test_injected_values_match_record() {
        let record = Record::new()
            .with(Charter::Name, "Chess")
            .with(Charter::Level, "LOW");
        let rendered = basic_info().compose(&record, &noop()).unwrap();

        for control in controls_of(&rendered) {
            assert_eq!(control.value(), record.get(control.key()));
            if let Some(shared) = control.shared_value() {
                assert!(Arc::ptr_eq(
                    shared,
                    &record.get_shared(control.key()).unwrap()
                ));
            }
        }

        let socials = controls_of(&rendered)
            .into_iter()
            .find(|c| c.key() == Charter::Socials)
            .unwrap();
        assert!(socials.value().is_none());
    }

    #[test]
    fn test_declared_properties_survive_binding() {
        let page = basic_info();
        let rendered = page.compose(&Record::new(), &noop()).unwrap();
        let name = controls_of(&rendered)[0];

        match name.control() {
            Control::Text(field) => {
                assert_eq!(field.meta().label.as_deref(), Some("Name"));
                assert!(field.meta().required);
                assert_eq!(field.meta().requirements.max_char, Some(40));
            }
            other => panic!("expected text field, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_field_fails_fast() {
        let page = page("Oops")
            .child(text_field("name"))
            .child(section().child(check_select("meeting_days")));

        let err = page.compose(&Record::<Charter>::new(), &noop()).unwrap_err();

        assert_eq!(
            err,
            FormError::UnknownField {
                field: "meeting_days".into(),
                page: "Oops".into(),
            }
        );
    }

    #[test]
    fn test_callback_shared_by_all_controls() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let callback: ChangeCallback<Charter> = Arc::new(move |key, value| {
            sink.lock().unwrap().push((key, value));
        });

        let rendered = basic_info().compose(&Record::new(), &callback).unwrap();
        let controls = controls_of(&rendered);
        controls[0].input("Go").unwrap();
        controls[2].select("LOW").unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                (Charter::Name, FieldValue::from("Go")),
                (Charter::Level, FieldValue::from("LOW")),
            ]
        );
    }
}
