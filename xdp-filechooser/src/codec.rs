//! Wire codec for the FileChooser structures.
//!
//! Field order is fixed and must match what portal frontends and the flatpak
//! platform plugin build on their side:
//!
//! | Structure | Signature | Fields |
//! |-----------|-----------|--------|
//! | Filter | `(us)` | kind, pattern |
//! | FilterGroup | `(sa(us))` | name, filters |
//! | Choice | `(ss)` | id, value |
//! | Option | `(ssa(ss)s)` | id, label, choices, initial choice id |
//!
//! Decoding only checks shape. Semantic checks live in [`crate::normalize`].

use std::collections::HashMap;

use thiserror::Error;
use zvariant::{OwnedValue, Value};

use crate::core::{
    ChoiceDescriptor, ChoiceOption, Filter, FilterGroup, FilterKind, ResponseDescriptor,
    ResponseStatus, SelectedChoice,
};

/// Filter as sent on the wire: `(kind, pattern)`.
pub type FilterWire = (u32, String);
/// Filter group as sent on the wire: `(name, filters)`.
pub type FilterGroupWire = (String, Vec<FilterWire>);
/// Choice as sent on the wire: `(id, value)`.
pub type ChoiceWire = (String, String);
/// Option as sent on the wire: `(id, label, choices, initial_choice_id)`.
pub type OptionWire = (String, String, Vec<ChoiceWire>, String);

/// Shape mismatch while decoding, or a conversion failure while encoding.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Value has a different type than the structure field requires
    #[error("expected {expected} for {what}, found `{found}`")]
    UnexpectedType {
        /// Structure being decoded
        what: &'static str,
        /// Expected D-Bus signature
        expected: &'static str,
        /// Signature actually received
        found: String,
    },
    /// Structure with the wrong number of fields
    #[error("{what} has {found} fields, expected {expected}")]
    FieldCount {
        /// Structure being decoded
        what: &'static str,
        /// Expected field count
        expected: usize,
        /// Field count actually received
        found: usize,
    },
    /// zvariant refused a conversion
    #[error(transparent)]
    Variant(#[from] zvariant::Error),
}

/// Encode a [`Filter`] as `(us)`.
pub fn encode_filter(filter: &Filter) -> FilterWire {
    (filter.kind.as_u32(), filter.pattern.clone())
}

/// Decode a `(us)` filter.
pub fn decode_filter(value: &Value<'_>) -> Result<Filter, CodecError> {
    const WHAT: &str = "filter";
    let fields = structure_fields(value, WHAT, "(us)", 2)?;
    Ok(Filter {
        kind: FilterKind::from_u32(u32_field(&fields[0], WHAT)?),
        pattern: str_field(&fields[1], WHAT)?.to_owned(),
    })
}

/// Encode a [`FilterGroup`] as `(sa(us))`.
pub fn encode_filter_group(group: &FilterGroup) -> FilterGroupWire {
    (
        group.name.clone(),
        group.filters.iter().map(encode_filter).collect(),
    )
}

/// Decode a `(sa(us))` filter group.
pub fn decode_filter_group(value: &Value<'_>) -> Result<FilterGroup, CodecError> {
    const WHAT: &str = "filter group";
    let fields = structure_fields(value, WHAT, "(sa(us))", 2)?;
    let name = str_field(&fields[0], WHAT)?.to_owned();
    let filters = array_items(&fields[1], WHAT, "a(us)")?
        .map(decode_filter)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FilterGroup { name, filters })
}

/// Decode an `a(sa(us))` list of filter groups.
pub fn decode_filter_groups(value: &Value<'_>) -> Result<Vec<FilterGroup>, CodecError> {
    array_items(value, "filter list", "a(sa(us))")?
        .map(decode_filter_group)
        .collect()
}

/// Encode a [`SelectedChoice`] as `(ss)`.
pub fn encode_selected_choice(choice: &SelectedChoice) -> ChoiceWire {
    (choice.id.clone(), choice.value.clone())
}

/// Decode a `(ss)` choice into a [`SelectedChoice`].
pub fn decode_selected_choice(value: &Value<'_>) -> Result<SelectedChoice, CodecError> {
    let (id, value) = decode_choice_pair(value)?;
    Ok(SelectedChoice { id, value })
}

/// Decode an `a(ss)` list of selected choices.
pub fn decode_selected_choices(value: &Value<'_>) -> Result<Vec<SelectedChoice>, CodecError> {
    array_items(value, "choices", "a(ss)")?
        .map(decode_selected_choice)
        .collect()
}

/// Encode a [`ChoiceDescriptor`] as `(ssa(ss)s)`.
pub fn encode_choice_descriptor(choice: &ChoiceDescriptor) -> OptionWire {
    (
        choice.id.clone(),
        choice.label.clone(),
        choice
            .options
            .iter()
            .map(|o| (o.value.clone(), o.label.clone()))
            .collect(),
        choice.initial.clone(),
    )
}

/// Decode a `(ssa(ss)s)` option.
pub fn decode_choice_descriptor(value: &Value<'_>) -> Result<ChoiceDescriptor, CodecError> {
    const WHAT: &str = "option";
    let fields = structure_fields(value, WHAT, "(ssa(ss)s)", 4)?;
    let id = str_field(&fields[0], WHAT)?.to_owned();
    let label = str_field(&fields[1], WHAT)?.to_owned();
    let options = array_items(&fields[2], WHAT, "a(ss)")?
        .map(|v| decode_choice_pair(v).map(|(value, label)| ChoiceOption { value, label }))
        .collect::<Result<Vec<_>, _>>()?;
    let initial = str_field(&fields[3], WHAT)?.to_owned();
    Ok(ChoiceDescriptor {
        id,
        label,
        options,
        initial,
    })
}

/// Decode an `a(ssa(ss)s)` option list.
pub fn decode_choice_descriptors(value: &Value<'_>) -> Result<Vec<ChoiceDescriptor>, CodecError> {
    array_items(value, "option list", "a(ssa(ss)s)")?
        .map(decode_choice_descriptor)
        .collect()
}

/// Build the `a{sv}` result bag for a response.
///
/// `uris` is always present on success, possibly as an empty list. Other
/// fields are only inserted when set, so a cancelled response encodes to an
/// empty map.
pub fn encode_results(
    response: &ResponseDescriptor,
) -> Result<HashMap<String, OwnedValue>, CodecError> {
    let mut results = HashMap::new();
    if response.status == ResponseStatus::Success || !response.uris.is_empty() {
        let uris: Vec<String> = response.uris.iter().map(|u| u.as_str().to_owned()).collect();
        results.insert("uris".to_owned(), owned(Value::from(uris))?);
    }
    if let Some(writable) = response.writable {
        results.insert("writable".to_owned(), owned(Value::from(writable))?);
    }
    if let Some(choices) = &response.choices {
        let wire: Vec<ChoiceWire> = choices.iter().map(encode_selected_choice).collect();
        results.insert("choices".to_owned(), owned(Value::from(wire))?);
    }
    if let Some(group) = &response.current_filter {
        results.insert(
            "current_filter".to_owned(),
            owned(Value::from(encode_filter_group(group)))?,
        );
    }
    Ok(results)
}

/// Strip any number of variant-in-variant wrappers.
pub(crate) fn peel<'v, 'a>(value: &'v Value<'a>) -> &'v Value<'a> {
    match value {
        Value::Value(inner) => peel(inner),
        other => other,
    }
}

pub(crate) fn signature_of(value: &Value<'_>) -> String {
    value.value_signature().to_string()
}

fn owned(value: Value<'_>) -> Result<OwnedValue, CodecError> {
    Ok(OwnedValue::try_from(value)?)
}

fn decode_choice_pair(value: &Value<'_>) -> Result<(String, String), CodecError> {
    const WHAT: &str = "choice";
    let fields = structure_fields(value, WHAT, "(ss)", 2)?;
    Ok((
        str_field(&fields[0], WHAT)?.to_owned(),
        str_field(&fields[1], WHAT)?.to_owned(),
    ))
}

fn structure_fields<'v, 'a>(
    value: &'v Value<'a>,
    what: &'static str,
    expected: &'static str,
    len: usize,
) -> Result<&'v [Value<'a>], CodecError> {
    match peel(value) {
        Value::Structure(s) if s.fields().len() == len => Ok(s.fields()),
        Value::Structure(s) => Err(CodecError::FieldCount {
            what,
            expected: len,
            found: s.fields().len(),
        }),
        other => Err(unexpected(what, expected, other)),
    }
}

fn array_items<'v, 'a>(
    value: &'v Value<'a>,
    what: &'static str,
    expected: &'static str,
) -> Result<impl Iterator<Item = &'v Value<'a>>, CodecError> {
    match peel(value) {
        Value::Array(a) => Ok(a.iter()),
        other => Err(unexpected(what, expected, other)),
    }
}

fn str_field<'v>(value: &'v Value<'_>, what: &'static str) -> Result<&'v str, CodecError> {
    match peel(value) {
        Value::Str(s) => Ok(s.as_str()),
        other => Err(unexpected(what, "s", other)),
    }
}

fn u32_field(value: &Value<'_>, what: &'static str) -> Result<u32, CodecError> {
    match peel(value) {
        Value::U32(v) => Ok(*v),
        other => Err(unexpected(what, "u", other)),
    }
}

fn unexpected(what: &'static str, expected: &'static str, found: &Value<'_>) -> CodecError {
    CodecError::UnexpectedType {
        what,
        expected,
        found: signature_of(found),
    }
}
