use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use super::*;
use crate::library::{Artwork, LibraryError, Track};

fn t(id: u64, title: &str) -> Track {
    Track {
        id,
        title: Some(title.into()),
        artist: Some("Artist".into()),
        source: format!("/music/{id}.flac"),
        album_id: 1,
        artwork: None,
    }
}

fn list_of(n: u64) -> TrackList {
    TrackList::new((1..=n).map(|i| t(i, &format!("Song {i}"))).collect())
}

#[test]
fn rows_apply_fallbacks() {
    let bare = Track {
        id: 7,
        title: None,
        artist: None,
        source: "/music/7.flac".into(),
        album_id: 3,
        artwork: Some("/music/cover.jpg".into()),
    };
    let list = TrackList::new(vec![bare, t(8, "Named")]);

    let rows: Vec<_> = list.rows().collect();
    assert_eq!(rows[0].title, "Unknown Title");
    assert_eq!(rows[0].artist, "Unknown Artist");
    assert_eq!(rows[0].artwork, Artwork::Image("/music/cover.jpg".into()));
    assert_eq!(rows[1].title, "Named");
    assert_eq!(rows[1].artwork, Artwork::Placeholder);
}

#[test]
fn cursor_wraps_both_ways() {
    let mut list = list_of(3);
    list.prev();
    assert_eq!(list.selected(), 2);
    list.next();
    assert_eq!(list.selected(), 0);
    list.next();
    list.next();
    assert_eq!(list.selected(), 2);
}

#[test]
fn first_and_last_jump() {
    let mut list = list_of(4);
    list.last();
    assert_eq!(list.selected(), 3);
    list.first();
    assert_eq!(list.selected(), 0);
}

#[test]
fn navigation_on_empty_list_is_inert() {
    let mut list = TrackList::default();
    list.next();
    list.prev();
    list.last();
    assert_eq!(list.selected(), 0);
    assert_eq!(list.activate(), None);
}

#[test]
fn activation_notifies_observer_with_index() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut list = list_of(3);
    let sink = Rc::clone(&seen);
    list.on_activate(move |i| sink.borrow_mut().push(i));

    list.next();
    assert_eq!(list.activate(), Some(1));
    list.last();
    assert_eq!(list.activate(), Some(2));

    assert_eq!(*seen.borrow(), vec![1, 2]);
}

#[test]
fn bind_resets_cursor_and_keeps_observer() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut list = list_of(3);
    let sink = Rc::clone(&seen);
    list.on_activate(move |i| sink.borrow_mut().push(i));
    list.last();

    list.bind(vec![t(10, "Other")]);
    assert_eq!(list.selected(), 0);
    list.activate();
    assert_eq!(*seen.borrow(), vec![0]);
}

#[test]
fn app_starts_loading() {
    let app = App::new(Some("/music".into()));
    assert_eq!(app.screen, Screen::Loading);
}

#[test]
fn loaded_tracks_show_library() {
    let mut app = App::new(None);
    app.library_loaded(Ok(vec![t(1, "A"), t(2, "B")]));
    assert_eq!(app.screen, Screen::Library);
    assert_eq!(app.list.len(), 2);
}

#[test]
fn empty_load_shows_empty_screen() {
    let mut app = App::new(None);
    app.library_loaded(Ok(Vec::new()));
    assert!(matches!(app.screen, Screen::Empty(_)));
}

#[test]
fn denied_load_shows_denied_screen() {
    let mut app = App::new(None);
    app.library_loaded(Err(LibraryError::PermissionDenied(PathBuf::from("/music"))));
    assert_eq!(
        app.screen,
        Screen::Denied("Permission to read /music was denied".into())
    );
}

#[test]
fn unavailable_index_shows_message() {
    let mut app = App::new(None);
    app.library_loaded(Err(LibraryError::Unavailable {
        path: PathBuf::from("/gone"),
        source: io::Error::from(io::ErrorKind::NotFound),
    }));
    match &app.screen {
        Screen::Empty(msg) => assert!(msg.contains("/gone")),
        other => panic!("unexpected screen {other:?}"),
    }
}

#[test]
fn access_denied_names_current_dir() {
    let mut app = App::new(Some("/srv/music".into()));
    app.access_denied();
    assert_eq!(
        app.screen,
        Screen::Denied("Permission to read /srv/music was denied".into())
    );
}

#[test]
fn open_player_hands_off_full_collection() {
    let mut app = App::new(None);
    let tracks = vec![t(1, "A"), t(2, "B"), t(3, "C")];
    app.library_loaded(Ok(tracks.clone()));

    let handoff = app.open_player(2).expect("handoff");
    assert_eq!(handoff.tracks, tracks);
    assert_eq!(handoff.start, 2);
    assert_eq!(app.screen, Screen::Player);
    assert_eq!(app.list.selected(), 2);

    app.close_player();
    assert_eq!(app.screen, Screen::Library);
}

#[test]
fn open_player_rejects_out_of_range_and_wrong_screen() {
    let mut app = App::new(None);
    assert_eq!(app.open_player(0), None);

    app.library_loaded(Ok(vec![t(1, "A")]));
    assert_eq!(app.open_player(1), None);
    assert_eq!(app.screen, Screen::Library);

    assert!(app.open_player(0).is_some());
    assert_eq!(app.open_player(0), None);
}
