//! Multi-page orchestrator
//!
//! Tracks which page of a form is active and wires every page to the shared
//! [`RecordStore`]. The record itself belongs to whoever created the store;
//! the orchestrator only reads snapshots for rendering and writes single
//! fields through the change callback it injects.
//!
//! Navigation is a bounded index: `back` on the first page and `next` on the
//! last page are no-ops, and `submit` is only accepted on the last page.

use std::sync::Arc;

use clubhouse_core::{FieldKey, Record, RecordStore};
use smallvec::SmallVec;

use crate::controls::{BoundControl, ChangeCallback};
use crate::error::{FormError, Result};
use crate::page::{controls_of, FormPage, Rendered};
use crate::requirements::RequirementViolation;

type Hook = Box<dyn FnMut() + Send>;

const DEFAULT_SUBMIT_TEXT: &str = "Submit";

/// A form spread over several pages
pub struct MultiPageForm<K: FieldKey> {
    title: String,
    submit_text: Option<String>,
    pages: Vec<FormPage>,
    index: usize,
    store: Arc<RecordStore<K>>,
    on_next: Option<Hook>,
    on_back: Option<Hook>,
    on_submit: Option<Hook>,
}

impl<K: FieldKey> MultiPageForm<K> {
    /// Create a form editing the record held by `store`
    pub fn new(title: impl Into<String>, store: Arc<RecordStore<K>>) -> Self {
        Self {
            title: title.into(),
            submit_text: None,
            pages: Vec::new(),
            index: 0,
            store,
            on_next: None,
            on_back: None,
            on_submit: None,
        }
    }

    /// Append a page
    pub fn page(mut self, page: FormPage) -> Self {
        self.pages.push(page);
        self
    }

    /// Label of the submit button (defaults to "Submit")
    pub fn submit_text(mut self, text: impl Into<String>) -> Self {
        self.submit_text = Some(text.into());
        self
    }

    /// Hook run after moving forward
    pub fn on_next<F: FnMut() + Send + 'static>(mut self, f: F) -> Self {
        self.on_next = Some(Box::new(f));
        self
    }

    /// Hook run after moving back
    pub fn on_back<F: FnMut() + Send + 'static>(mut self, f: F) -> Self {
        self.on_back = Some(Box::new(f));
        self
    }

    /// Hook run on submit
    ///
    /// The hook takes no arguments; it reads the record through the store it
    /// shares with the form.
    pub fn on_submit<F: FnMut() + Send + 'static>(mut self, f: F) -> Self {
        self.on_submit = Some(Box::new(f));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Index of the active page
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[FormPage] {
        &self.pages
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        !self.pages.is_empty() && self.index + 1 == self.pages.len()
    }

    /// The active page
    pub fn current_page(&self) -> Option<&FormPage> {
        self.pages.get(self.index)
    }

    /// The shared record store
    pub fn store(&self) -> &Arc<RecordStore<K>> {
        &self.store
    }

    /// Snapshot of the record under edit
    pub fn record(&self) -> Record<K> {
        self.store.get()
    }

    /// Move to the next page; returns `false` when already on the last page
    pub fn next(&mut self) -> bool {
        if self.pages.is_empty() || self.is_last() {
            tracing::debug!(index = self.index, "next ignored on last page");
            return false;
        }
        self.index += 1;
        tracing::debug!(index = self.index, form = %self.title, "moved to next page");
        if let Some(hook) = self.on_next.as_mut() {
            hook();
        }
        true
    }

    /// Move to the previous page; returns `false` when already on the first page
    pub fn back(&mut self) -> bool {
        if self.is_first() {
            tracing::debug!("back ignored on first page");
            return false;
        }
        self.index -= 1;
        tracing::debug!(index = self.index, form = %self.title, "moved to previous page");
        if let Some(hook) = self.on_back.as_mut() {
            hook();
        }
        true
    }

    /// Run the submit hook; only accepted on the last page
    ///
    /// Failures inside the hook are the hook's business; the form stays on the
    /// last page with the record untouched either way.
    pub fn submit(&mut self) -> Result<()> {
        self.ensure_last()?;
        tracing::debug!(form = %self.title, "submit");
        if let Some(hook) = self.on_submit.as_mut() {
            hook();
        }
        Ok(())
    }

    /// Submit with a handler that receives the record snapshot
    ///
    /// The handler's return value is passed through, so an async handler can
    /// hand back its future for the caller to await.
    pub fn submit_with<F, R>(&mut self, handler: F) -> Result<R>
    where
        F: FnOnce(Record<K>) -> R,
    {
        self.ensure_last()?;
        tracing::debug!(form = %self.title, "submit");
        Ok(handler(self.store.get()))
    }

    fn ensure_last(&self) -> Result<()> {
        if self.pages.is_empty() {
            return Err(FormError::EmptyForm);
        }
        if !self.is_last() {
            return Err(FormError::NotOnLastPage {
                index: self.index,
                last: self.pages.len() - 1,
            });
        }
        Ok(())
    }

    /// Callback merging one field into the shared record
    ///
    /// Every call writes immediately; there is no debounce.
    pub fn change_callback(&self) -> ChangeCallback<K> {
        let store = self.store.clone();
        Arc::new(move |key, value| store.set_field(key, value))
    }

    /// Compose the active page against the current record
    pub fn render(&self) -> Result<RenderedPage<K>> {
        let page = self.current_page().ok_or(FormError::EmptyForm)?;
        let record = self.store.get();
        let children = page.compose(&record, &self.change_callback())?;

        let primary = if self.is_last() {
            PrimaryAction::Submit(
                self.submit_text
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SUBMIT_TEXT.to_string()),
            )
        } else {
            PrimaryAction::Next
        };

        Ok(RenderedPage {
            title: self.title.clone(),
            page_title: page.title.clone(),
            index: self.index,
            page_count: self.pages.len(),
            children,
            navigation: Navigation {
                show_back: !self.is_first(),
                primary,
            },
        })
    }

    /// Requirement violations on the active page
    pub fn validate_page(&self) -> Result<Vec<FieldIssue<K>>> {
        let page = self.current_page().ok_or(FormError::EmptyForm)?;
        issues(page, &self.store.get(), &self.change_callback())
    }

    /// Requirement violations across every page
    pub fn validate_all(&self) -> Result<Vec<FieldIssue<K>>> {
        let record = self.store.get();
        let callback = self.change_callback();
        let mut out = Vec::new();
        for page in &self.pages {
            out.extend(issues(page, &record, &callback)?);
        }
        Ok(out)
    }
}

fn issues<K: FieldKey>(
    page: &FormPage,
    record: &Record<K>,
    callback: &ChangeCallback<K>,
) -> Result<Vec<FieldIssue<K>>> {
    let children = page.compose(record, callback)?;
    Ok(controls_of(&children)
        .into_iter()
        .filter_map(|control| {
            let violations = control.violations();
            (!violations.is_empty()).then(|| FieldIssue {
                key: control.key(),
                violations,
            })
        })
        .collect())
}

/// Requirement violations for one field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldIssue<K: FieldKey> {
    pub key: K,
    pub violations: SmallVec<[RequirementViolation; 2]>,
}

/// Primary navigation button of a page
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrimaryAction {
    Next,
    /// Submit, with the button label
    Submit(String),
}

/// Navigation buttons shown under a page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub show_back: bool,
    pub primary: PrimaryAction,
}

/// The active page, composed
#[derive(Clone, Debug)]
pub struct RenderedPage<K: FieldKey> {
    /// Form title
    pub title: String,
    /// Active page title
    pub page_title: String,
    pub index: usize,
    pub page_count: usize,
    pub children: Vec<Rendered<K>>,
    pub navigation: Navigation,
}

impl<K: FieldKey> RenderedPage<K> {
    /// Bound controls in display order
    pub fn controls(&self) -> Vec<&BoundControl<K>> {
        controls_of(&self.children)
    }

    /// The bound control for `key`, if it is on this page
    pub fn control(&self, key: K) -> Option<&BoundControl<K>> {
        self.controls().into_iter().find(|control| control.key() == key)
    }
}
