//! Projection of caller-supplied options into dialog controls.
//!
//! A [`ChoicePanel`] is the toolkit-independent model of the extra controls a
//! dialog shows below its file list. Backends render it and write user input
//! back through [`ChoicePanel::set_checked`] / [`ChoicePanel::select`]; once
//! the dialog is accepted the panel is collapsed into the `choices` result.

use indexmap::IndexMap;

use crate::core::{ChoiceDescriptor, ChoiceOption, SelectedChoice};

const TRUE: &str = "true";
const FALSE: &str = "false";

/// Live state of one control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChoiceControl {
    /// Check box
    Toggle {
        /// Check box text
        label: String,
        /// Current state
        checked: bool,
    },
    /// Combo box with a label in front of it
    Select {
        /// Label text, always ending with `:`
        label: String,
        /// Entries in caller order (never empty)
        entries: Vec<ChoiceOption>,
        /// Index of the current entry
        current: usize,
    },
}

impl ChoiceControl {
    fn from_descriptor(desc: &ChoiceDescriptor) -> Self {
        if desc.is_toggle() {
            return ChoiceControl::Toggle {
                label: desc.label.clone(),
                checked: desc.initial == TRUE,
            };
        }
        let current = desc
            .options
            .iter()
            .position(|o| o.value == desc.initial)
            .unwrap_or(0);
        let mut label = desc.label.clone();
        if !label.ends_with(':') {
            label.push(':');
        }
        ChoiceControl::Select {
            label,
            entries: desc.options.clone(),
            current,
        }
    }

    /// Value reported for this control.
    pub fn value(&self) -> &str {
        match self {
            ChoiceControl::Toggle { checked: true, .. } => TRUE,
            ChoiceControl::Toggle { checked: false, .. } => FALSE,
            ChoiceControl::Select {
                entries, current, ..
            } => entries
                .get(*current)
                .map(|e| e.value.as_str())
                .unwrap_or_default(),
        }
    }

    /// Display label.
    pub fn label(&self) -> &str {
        match self {
            ChoiceControl::Toggle { label, .. } | ChoiceControl::Select { label, .. } => label,
        }
    }
}

/// Set of controls keyed by option id, in declaration order.
///
/// Options sharing an id collapse into one control: the later declaration
/// replaces the earlier one but keeps its position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChoicePanel {
    controls: IndexMap<String, ChoiceControl>,
}

impl ChoicePanel {
    /// Build a panel from caller options, or `None` when there are none.
    pub fn project(options: &[ChoiceDescriptor]) -> Option<Self> {
        if options.is_empty() {
            return None;
        }
        let controls = options
            .iter()
            .map(|desc| (desc.id.clone(), ChoiceControl::from_descriptor(desc)))
            .collect();
        Some(Self { controls })
    }

    /// Iterate `(id, control)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChoiceControl)> {
        self.controls.iter().map(|(id, c)| (id.as_str(), c))
    }

    /// Control with the given id.
    pub fn get(&self, id: &str) -> Option<&ChoiceControl> {
        self.controls.get(id)
    }

    /// Number of controls.
    pub fn len(&self) -> usize {
        self.controls.len()
    }

    /// Returns `true` if the panel has no controls.
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Update a check box. Returns `false` if `id` is not a toggle.
    pub fn set_checked(&mut self, id: &str, value: bool) -> bool {
        match self.controls.get_mut(id) {
            Some(ChoiceControl::Toggle { checked, .. }) => {
                *checked = value;
                true
            }
            _ => false,
        }
    }

    /// Select the entry whose value is `value`. Returns `false` if `id` is not
    /// an enumeration or has no such entry.
    pub fn select(&mut self, id: &str, value: &str) -> bool {
        match self.controls.get_mut(id) {
            Some(ChoiceControl::Select {
                entries, current, ..
            }) => match entries.iter().position(|e| e.value == value) {
                Some(idx) => {
                    *current = idx;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Reduce the live state into the `choices` result.
    pub fn collapse(&self) -> Vec<SelectedChoice> {
        self.controls
            .iter()
            .map(|(id, control)| SelectedChoice::new(id.clone(), control.value()))
            .collect()
    }
}
