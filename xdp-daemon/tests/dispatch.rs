use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use url::Url;
use xdp_daemon::service::FileChooserService;
use xdp_filechooser::normalize::OptionBag;
use xdp_filechooser::zvariant::{OwnedValue, Value};
use xdp_filechooser::{
    ChoicePanel, DialogBackend, DialogConfig, DialogOutcome, FileChooserPortal, FileDialog,
    NoMimeLookup, ParentWindow, RequestKind,
};

/// Accepts with a fixed selection, or cancels when `picks` is `None`.
#[derive(Clone, Default)]
struct FixedBackend {
    picks: Option<Vec<&'static str>>,
    titles: Arc<Mutex<Vec<String>>>,
}

struct FixedDialog {
    picks: Option<Vec<&'static str>>,
    titles: Arc<Mutex<Vec<String>>>,
}

impl DialogBackend for FixedBackend {
    type Dialog = FixedDialog;

    fn create_dialog(&self) -> FixedDialog {
        FixedDialog {
            picks: self.picks.clone(),
            titles: self.titles.clone(),
        }
    }
}

impl FileDialog for FixedDialog {
    fn configure(&mut self, config: DialogConfig) {
        self.titles.lock().unwrap().push(config.title);
    }

    fn set_parent(&mut self, _parent: &ParentWindow) {}

    async fn run(&mut self, _choices: Option<&mut ChoicePanel>) -> DialogOutcome {
        if self.picks.is_some() {
            DialogOutcome::Accepted
        } else {
            DialogOutcome::Rejected
        }
    }

    fn selected_files(&self) -> Vec<Url> {
        self.picks
            .iter()
            .flatten()
            .map(|s| Url::parse(s).unwrap())
            .collect()
    }

    fn active_filter(&self) -> Option<String> {
        None
    }

    fn directory(&self) -> Option<Url> {
        None
    }
}

fn service(backend: FixedBackend) -> FileChooserService<FixedBackend, NoMimeLookup> {
    FileChooserService::new(FileChooserPortal::new(backend, NoMimeLookup))
}

const HANDLE: &str = "/org/freedesktop/portal/desktop/request/1_7/t";

#[test]
fn open_reply_carries_status_and_results() {
    let backend = FixedBackend {
        picks: Some(vec!["file:///home/user/a%20b.txt"]),
        ..Default::default()
    };
    let titles = backend.titles.clone();
    let service = service(backend);
    let options = OptionBag::new();

    let (status, results) = pollster::block_on(service.dispatch(
        RequestKind::Open,
        HANDLE,
        "org.example.App",
        "x11:2a",
        "Open Document",
        &options,
    ))
    .unwrap();

    assert_eq!(status, 0);
    let uris = OwnedValue::try_from(Value::from(vec!["file:///home/user/a%20b.txt"])).unwrap();
    assert_eq!(results.get("uris"), Some(&uris));
    assert_eq!(titles.lock().unwrap().clone(), vec!["Open Document".to_owned()]);
}

#[test]
fn cancelled_save_replies_one_with_empty_results() {
    let service = service(FixedBackend::default());
    let mut options = OptionBag::new();
    options.insert(
        "current_name".into(),
        OwnedValue::try_from(Value::from("notes.txt")).unwrap(),
    );

    let (status, results) = pollster::block_on(service.dispatch(
        RequestKind::Save,
        HANDLE,
        "org.example.App",
        "",
        "Save As",
        &options,
    ))
    .unwrap();

    assert_eq!(status, 1);
    assert!(results.is_empty());
}

#[test]
fn sequential_calls_share_the_portal() {
    let backend = FixedBackend {
        picks: Some(vec!["file:///tmp/x"]),
        ..Default::default()
    };
    let titles = backend.titles.clone();
    let service = service(backend);
    let options = OptionBag::new();

    for title in ["first", "second"] {
        let (status, _) = pollster::block_on(service.dispatch(
            RequestKind::Open,
            HANDLE,
            "",
            "",
            title,
            &options,
        ))
        .unwrap();
        assert_eq!(status, 0);
    }
    assert_eq!(
        titles.lock().unwrap().clone(),
        vec!["first".to_owned(), "second".to_owned()]
    );
}
