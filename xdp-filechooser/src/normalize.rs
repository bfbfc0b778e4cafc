//! Option bag normalization.
//!
//! [`normalize`] never fails: a missing or malformed option falls back to its
//! documented default and unknown keys are ignored.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use url::Url;
use zvariant::{OwnedValue, Value};

use crate::codec::{self, peel, signature_of};
use crate::core::{ChoiceDescriptor, FilterGroup, FilterKind, RequestDescriptor, RequestKind};
use crate::mime::MimeLookup;

/// Untyped `a{sv}` option bag as received from the bus.
pub type OptionBag = HashMap<String, OwnedValue>;

/// Name filters rendered for the dialog, with the way back to their groups.
///
/// Labels have the form `"<name> (<pattern> <pattern> ...)"`. The same string
/// is the dialog's filter label and the key used to map the filter that was
/// active at accept time back to its [`FilterGroup`]. Two groups rendering to
/// the same label share one key; the later group wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameFilters {
    labels: Vec<String>,
    groups: IndexMap<String, FilterGroup>,
    selected: Option<String>,
}

impl NameFilters {
    /// Labels in the order they should appear in the filter selector.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Label of the filter to preselect, if the caller asked for one.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Group that rendered to `label`.
    pub fn group_for(&self, label: &str) -> Option<&FilterGroup> {
        self.groups.get(label)
    }

    /// Returns `true` if no filter survived normalization.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn push(&mut self, label: String, group: FilterGroup) {
        self.labels.push(label.clone());
        self.groups.insert(label, group);
    }

    fn promote(&mut self, label: String, group: FilterGroup) {
        self.labels.retain(|l| *l != label);
        self.labels.insert(0, label.clone());
        self.groups.entry(label.clone()).or_insert(group);
        self.selected = Some(label);
    }
}

/// Normalize the option bag of an `OpenFile` or `SaveFile` call.
pub fn normalize(kind: RequestKind, options: &OptionBag, mime: &dyn MimeLookup) -> RequestDescriptor {
    let mut req = RequestDescriptor::new(kind);

    if let Some(modal) = bool_option(options, "modal") {
        req.modal = modal;
    }
    if kind == RequestKind::Open {
        if let Some(multiple) = bool_option(options, "multiple") {
            req.multiple = multiple;
        }
        if let Some(directory) = bool_option(options, "directory") {
            req.directory = directory;
        }
    }

    req.current_folder = path_option(options, "current_folder")
        .and_then(|p| file_url(&p, "current_folder"));

    if kind == RequestKind::Save {
        req.current_name = string_option(options, "current_name").filter(|s| !s.is_empty());
        req.current_file =
            path_option(options, "current_file").and_then(|p| file_url(&p, "current_file"));
    }

    req.accept_label = string_option(options, "accept_label")
        .map(|label| translate_accept_label(&label))
        .unwrap_or_default();
    req.name_filters = extract_name_filters(options, mime);
    req.choices = extract_choices(options);
    req
}

/// Translate a portal accept label into `&`-mnemonic syntax.
///
/// Literal `&` is doubled and the first `_` becomes the mnemonic marker `&`.
/// Later underscores are kept as-is.
pub fn translate_accept_label(label: &str) -> String {
    let mut out = label.replace('&', "&&");
    if let Some(pos) = out.find('_') {
        out.replace_range(pos..pos + 1, "&");
    }
    out
}

/// Expand and render one filter group.
///
/// Returns `None` when none of the group's filters produced a pattern.
pub fn render_filter_group(group: &FilterGroup, mime: &dyn MimeLookup) -> Option<String> {
    let patterns: Vec<String> = group
        .filters
        .iter()
        .flat_map(|filter| match filter.kind {
            FilterKind::Glob => vec![filter.pattern.clone()],
            FilterKind::MimeType => mime.globs_for(&filter.pattern),
        })
        .collect();
    if patterns.is_empty() {
        return None;
    }
    Some(format!("{} ({})", group.name, patterns.join(" ")))
}

/// Build the name filter list from the `filters` and `current_filter` keys.
pub fn extract_name_filters(options: &OptionBag, mime: &dyn MimeLookup) -> NameFilters {
    let mut out = NameFilters::default();

    if let Some(value) = options.get("filters") {
        match codec::decode_filter_groups(value) {
            Ok(groups) => {
                for group in groups {
                    match render_filter_group(&group, mime) {
                        Some(label) => out.push(label, group),
                        None => {
                            portal_debug!(name = %group.name, "dropping filter group without patterns");
                        }
                    }
                }
            }
            Err(_err) => {
                portal_debug!(error = %_err, "ignoring malformed 'filters' option");
            }
        }
    }

    if let Some(value) = options.get("current_filter") {
        match codec::decode_filter_group(value) {
            Ok(group) if group.filters.len() == 1 => match render_filter_group(&group, mime) {
                Some(label) => out.promote(label, group),
                None => {
                    portal_debug!(name = %group.name, "ignoring 'current_filter' without patterns");
                }
            },
            Ok(_) => {
                portal_debug!("ignoring 'current_filter' with 0 or multiple filters");
            }
            Err(_err) => {
                portal_debug!(error = %_err, "ignoring malformed 'current_filter' option");
            }
        }
    }

    out
}

fn extract_choices(options: &OptionBag) -> Vec<ChoiceDescriptor> {
    let Some(value) = options.get("choices") else {
        return Vec::new();
    };
    codec::decode_choice_descriptors(value).unwrap_or_else(|_err| {
        portal_debug!(error = %_err, "ignoring malformed 'choices' option");
        Vec::new()
    })
}

fn bool_option(options: &OptionBag, key: &'static str) -> Option<bool> {
    match peel(options.get(key)?) {
        Value::Bool(b) => Some(*b),
        other => {
            mistyped(key, "b", other);
            None
        }
    }
}

fn string_option(options: &OptionBag, key: &'static str) -> Option<String> {
    match peel(options.get(key)?) {
        Value::Str(s) => Some(s.as_str().to_owned()),
        other => {
            mistyped(key, "s", other);
            None
        }
    }
}

/// Paths arrive either as strings or as NUL-terminated byte arrays.
fn path_option(options: &OptionBag, key: &'static str) -> Option<PathBuf> {
    let value = peel(options.get(key)?);
    match value {
        Value::Str(s) if s.as_str().is_empty() => None,
        Value::Str(s) => Some(PathBuf::from(s.as_str())),
        Value::Array(items) => {
            let Some(mut bytes) = items
                .iter()
                .map(|v| match v {
                    Value::U8(b) => Some(*b),
                    _ => None,
                })
                .collect::<Option<Vec<u8>>>()
            else {
                mistyped(key, "ay", value);
                return None;
            };
            while bytes.last() == Some(&0) {
                bytes.pop();
            }
            if bytes.is_empty() {
                return None;
            }
            Some(path_from_bytes(bytes))
        }
        other => {
            mistyped(key, "ay", other);
            None
        }
    }
}

#[cfg(unix)]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    use std::os::unix::ffi::OsStringExt;
    PathBuf::from(std::ffi::OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(&bytes).into_owned())
}

fn file_url(path: &Path, _key: &'static str) -> Option<Url> {
    match Url::from_file_path(path) {
        Ok(url) => Some(url),
        Err(()) => {
            portal_debug!(key = _key, path = %path.display(), "ignoring non-absolute path");
            None
        }
    }
}

fn mistyped(_key: &'static str, _expected: &'static str, _found: &Value<'_>) {
    portal_debug!(
        key = _key,
        expected = _expected,
        found = %signature_of(_found),
        "ignoring option with unexpected type"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChoiceOption, Filter};
    use crate::mime::NoMimeLookup;
    use pretty_assertions::assert_eq;

    struct TableMime(HashMap<&'static str, Vec<&'static str>>);

    impl MimeLookup for TableMime {
        fn globs_for(&self, mime_type: &str) -> Vec<String> {
            self.0
                .get(mime_type)
                .map(|g| g.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default()
        }
    }

    fn mime_table() -> TableMime {
        TableMime(HashMap::from([
            ("image/png", vec!["*.png"]),
            ("image/jpeg", vec!["*.jpg", "*.jpeg"]),
        ]))
    }

    fn bag(entries: Vec<(&str, Value<'static>)>) -> OptionBag {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_owned(), OwnedValue::try_from(v).unwrap()))
            .collect()
    }

    fn group_value(name: &str, filters: &[(u32, &str)]) -> Value<'static> {
        let filters: Vec<(u32, String)> =
            filters.iter().map(|(k, p)| (*k, p.to_string())).collect();
        Value::from((name.to_owned(), filters))
    }

    fn groups_value(groups: &[(&str, &[(u32, &str)])]) -> Value<'static> {
        let groups: Vec<(String, Vec<(u32, String)>)> = groups
            .iter()
            .map(|(name, filters)| {
                (
                    name.to_string(),
                    filters.iter().map(|(k, p)| (*k, p.to_string())).collect(),
                )
            })
            .collect();
        Value::from(groups)
    }

    #[test]
    fn empty_bag_yields_defaults() {
        let req = normalize(RequestKind::Open, &OptionBag::new(), &NoMimeLookup);
        assert_eq!(req, RequestDescriptor::new(RequestKind::Open));
    }

    #[test]
    fn flags_are_read() {
        let options = bag(vec![
            ("modal", Value::from(false)),
            ("multiple", Value::from(true)),
            ("directory", Value::from(true)),
            ("unknown_key", Value::from(42u32)),
        ]);
        let req = normalize(RequestKind::Open, &options, &NoMimeLookup);
        assert!(!req.modal);
        assert!(req.multiple);
        assert!(req.directory);
    }

    #[test]
    fn mistyped_flags_fall_back_to_defaults() {
        let options = bag(vec![
            ("modal", Value::from("no")),
            ("multiple", Value::from(1u32)),
        ]);
        let req = normalize(RequestKind::Open, &options, &NoMimeLookup);
        assert!(req.modal);
        assert!(!req.multiple);
    }

    #[test]
    fn save_ignores_open_only_flags() {
        let options = bag(vec![
            ("multiple", Value::from(true)),
            ("directory", Value::from(true)),
        ]);
        let req = normalize(RequestKind::Save, &options, &NoMimeLookup);
        assert!(!req.multiple);
        assert!(!req.directory);
    }

    #[test]
    fn open_ignores_save_only_options() {
        let options = bag(vec![
            ("current_name", Value::from("report.txt")),
            ("current_file", Value::from("/tmp/report.txt")),
        ]);
        let req = normalize(RequestKind::Open, &options, &NoMimeLookup);
        assert_eq!(req.current_name, None);
        assert_eq!(req.current_file, None);
    }

    #[test]
    fn folders_accept_strings_and_nul_terminated_bytes() {
        let options = bag(vec![("current_folder", Value::from(b"/home/user/Music\0".to_vec()))]);
        let req = normalize(RequestKind::Open, &options, &NoMimeLookup);
        assert_eq!(
            req.current_folder.as_ref().map(Url::as_str),
            Some("file:///home/user/Music")
        );

        let options = bag(vec![
            ("current_folder", Value::from("/home/user/Music")),
            ("current_file", Value::from(b"/home/user/a b.txt\0".to_vec())),
            ("current_name", Value::from("x.txt")),
        ]);
        let req = normalize(RequestKind::Save, &options, &NoMimeLookup);
        assert_eq!(
            req.current_folder.as_ref().map(Url::as_str),
            Some("file:///home/user/Music")
        );
        assert_eq!(
            req.current_file.as_ref().map(Url::as_str),
            Some("file:///home/user/a%20b.txt")
        );
        assert_eq!(req.current_name.as_deref(), Some("x.txt"));
    }

    #[test]
    fn relative_and_empty_folders_are_ignored() {
        for folder in [Value::from("relative/dir"), Value::from(""), Value::from(vec![0u8])] {
            let options = bag(vec![("current_folder", folder)]);
            let req = normalize(RequestKind::Open, &options, &NoMimeLookup);
            assert_eq!(req.current_folder, None);
        }
    }

    #[test]
    fn non_byte_arrays_are_not_paths() {
        for folder in [Value::from(vec!["/home", "user"]), Value::from(vec![47u32, 0])] {
            let options = bag(vec![("current_folder", folder)]);
            let req = normalize(RequestKind::Open, &options, &NoMimeLookup);
            assert_eq!(req.current_folder, None);
        }
    }

    #[test]
    fn accept_label_mnemonics() {
        assert_eq!(translate_accept_label("_Open"), "&Open");
        assert_eq!(translate_accept_label("Save & Quit"), "Save && Quit");
        assert_eq!(translate_accept_label("A_B_C"), "A&B_C");
        assert_eq!(translate_accept_label("Plain"), "Plain");
        assert_eq!(translate_accept_label("R&_D"), "R&&&D");

        let options = bag(vec![("accept_label", Value::from("_Select"))]);
        let req = normalize(RequestKind::Open, &options, &NoMimeLookup);
        assert_eq!(req.accept_label, "&Select");
    }

    #[test]
    fn filters_render_and_map_back() {
        let options = bag(vec![(
            "filters",
            groups_value(&[
                ("Images", &[(1, "image/png"), (1, "image/jpeg")]),
                ("Text", &[(0, "*.txt"), (0, "*.md")]),
            ]),
        )]);
        let filters = extract_name_filters(&options, &mime_table());
        assert_eq!(
            filters.labels(),
            &[
                "Images (*.png *.jpg *.jpeg)".to_owned(),
                "Text (*.txt *.md)".to_owned(),
            ]
        );
        assert_eq!(filters.selected(), None);
        assert_eq!(
            filters.group_for("Text (*.txt *.md)"),
            Some(&FilterGroup::new(
                "Text",
                vec![Filter::glob("*.txt"), Filter::glob("*.md")]
            ))
        );
    }

    #[test]
    fn groups_without_patterns_are_dropped() {
        let options = bag(vec![(
            "filters",
            groups_value(&[
                ("Weird", &[(1, "application/x-unknown-a"), (1, "application/x-unknown-b")]),
                ("Empty", &[]),
                ("PNG", &[(1, "image/png"), (1, "application/x-unknown-c")]),
            ]),
        )]);
        let filters = extract_name_filters(&options, &mime_table());
        assert_eq!(filters.labels(), &["PNG (*.png)".to_owned()]);
        assert_eq!(filters.group_for("Weird ()"), None);
    }

    #[test]
    fn unknown_mime_groups_never_appear() {
        for mime in ["", "x/y", "image/x-nope", "application/octet-stream"] {
            let options = bag(vec![("filters", groups_value(&[("G", &[(1, mime)])]))]);
            let filters = extract_name_filters(&options, &mime_table());
            assert!(filters.is_empty(), "{mime}");
        }
    }

    #[test]
    fn colliding_labels_keep_last_group() {
        let options = bag(vec![(
            "filters",
            groups_value(&[("A", &[(0, "*.a")]), ("A", &[(1, "text/x-a")])]),
        )]);
        let mime = TableMime(HashMap::from([("text/x-a", vec!["*.a"])]));
        let filters = extract_name_filters(&options, &mime);
        assert_eq!(filters.labels().len(), 2);
        assert_eq!(
            filters.group_for("A (*.a)"),
            Some(&FilterGroup::new("A", vec![Filter::mime("text/x-a")]))
        );
    }

    #[test]
    fn single_current_filter_becomes_first_and_selected() {
        let options = bag(vec![
            (
                "filters",
                groups_value(&[
                    ("Images", &[(1, "image/png")]),
                    ("Text", &[(0, "*.txt")]),
                ]),
            ),
            ("current_filter", group_value("Text", &[(0, "*.txt")])),
        ]);
        let filters = extract_name_filters(&options, &mime_table());
        assert_eq!(
            filters.labels(),
            &["Text (*.txt)".to_owned(), "Images (*.png)".to_owned()]
        );
        assert_eq!(filters.selected(), Some("Text (*.txt)"));
    }

    #[test]
    fn current_filter_outside_filters_is_prepended() {
        let options = bag(vec![
            ("filters", groups_value(&[("Images", &[(1, "image/png")])])),
            ("current_filter", group_value("Rust", &[(0, "*.rs")])),
        ]);
        let filters = extract_name_filters(&options, &mime_table());
        assert_eq!(
            filters.labels(),
            &["Rust (*.rs)".to_owned(), "Images (*.png)".to_owned()]
        );
        assert_eq!(
            filters.group_for("Rust (*.rs)"),
            Some(&FilterGroup::new("Rust", vec![Filter::glob("*.rs")]))
        );
    }

    #[test]
    fn current_filter_with_zero_or_many_filters_is_ignored() {
        let base = groups_value(&[("Images", &[(1, "image/png")]), ("Text", &[(0, "*.txt")])]);
        let expected = extract_name_filters(&bag(vec![("filters", base.clone())]), &mime_table());

        for current in [
            group_value("Text", &[]),
            group_value("Text", &[(0, "*.txt"), (0, "*.md")]),
            Value::from("Text"),
        ] {
            let options = bag(vec![("filters", base.clone()), ("current_filter", current)]);
            let filters = extract_name_filters(&options, &mime_table());
            assert_eq!(filters.labels(), expected.labels());
            assert_eq!(filters.selected(), None);
        }
    }

    #[test]
    fn malformed_filters_are_ignored() {
        let options = bag(vec![("filters", Value::from("*.txt"))]);
        let req = normalize(RequestKind::Open, &options, &NoMimeLookup);
        assert!(req.name_filters.is_empty());
    }

    #[test]
    fn choices_are_decoded() {
        let options: Vec<(String, String, Vec<(String, String)>, String)> = vec![(
            "encoding".into(),
            "Encoding".into(),
            vec![("utf8".into(), "UTF-8".into())],
            "utf8".into(),
        )];
        let req = normalize(
            RequestKind::Save,
            &bag(vec![("choices", Value::from(options))]),
            &NoMimeLookup,
        );
        assert_eq!(
            req.choices,
            vec![ChoiceDescriptor::select(
                "encoding",
                "Encoding",
                vec![ChoiceOption::new("utf8", "UTF-8")],
                "utf8"
            )]
        );
    }
}
