use std::rc::Rc;

use mood_player::{Container, Context, Element, MediaElement, Player, SimulatedMedia, Song};

fn context_with(titles: &[&str]) -> Rc<Context> {
    let context = Rc::new(Context::new());
    {
        let mut playlist = context.playlist_mut();
        for title in titles {
            playlist.add_song(Song::new(format!("{title}.mp3")).with("title", *title));
        }
        playlist.template(|song| song.text("title").unwrap_or_default());
    }
    context.enable_playlist();
    context
}

fn player(context: &Rc<Context>, media: &Rc<SimulatedMedia>) -> Player {
    let container = Container::new()
        .child(Element::audio(media.clone()))
        .child(Element::new("ul").data("playlist", ""))
        .child(Element::new("button").data("next", ""))
        .child(Element::new("button").data("prev", ""))
        .child(Element::new("span").data("meta", "title"));
    let player = Player::new(context, Rc::new(container));
    player.init().unwrap();
    player
}

fn title(player: &Player) -> Option<String> {
    player.ui("meta")[0].text()
}

#[test]
fn first_song_is_handed_over_at_init() {
    let context = context_with(&["one", "two", "three"]);
    let media = Rc::new(SimulatedMedia::new());
    let player = player(&context, &media);

    assert_eq!(player.song().unwrap().url(), "one.mp3");
    assert_eq!(title(&player).as_deref(), Some("one"));
    assert_eq!(player.ui("playlist")[0].items(), vec!["one", "two", "three"]);
    // Picking a song does not load it.
    assert!(media.sources().is_empty());
}

#[test]
fn next_and_prev_walk_the_cursor() {
    let context = context_with(&["one", "two", "three"]);
    let media = Rc::new(SimulatedMedia::new());
    let player = player(&context, &media);
    let (next, prev) = (player.ui("next")[0].clone(), player.ui("prev")[0].clone());

    prev.click();
    assert_eq!(context.playlist().position(), 0);
    assert!(media.sources().is_empty());

    next.click();
    assert_eq!(context.playlist().position(), 1);
    assert_eq!(title(&player).as_deref(), Some("two"));
    assert_eq!(media.sources(), vec![Some("two.mp3".to_string())]);

    next.click();
    next.click();
    assert_eq!(context.playlist().position(), 2);
    assert_eq!(media.sources(), vec![Some("three.mp3".to_string())]);

    prev.click();
    assert_eq!(title(&player).as_deref(), Some("two"));
    assert_eq!(media.sources(), vec![Some("two.mp3".to_string())]);
}

#[test]
fn skipping_keeps_playback_going() {
    let context = context_with(&["one", "two"]);
    let media = Rc::new(SimulatedMedia::with_probe(|_| Some(60.0)));
    let player = player(&context, &media);

    player.load(None, true).unwrap();
    assert!(!media.paused());
    media.advance(5.0);

    player.ui("next")[0].click();
    assert_eq!(media.sources(), vec![Some("two.mp3".to_string())]);
    assert_eq!(media.current_time(), 0.0);
    assert!(!media.paused());
}

#[test]
fn skipping_while_paused_stays_paused() {
    let context = context_with(&["one", "two"]);
    let media = Rc::new(SimulatedMedia::with_probe(|_| Some(60.0)));
    let player = player(&context, &media);

    player.ui("next")[0].click();
    assert_eq!(media.duration(), 60.0);
    assert!(media.paused());
}

#[test]
fn an_empty_playlist_leaves_the_player_without_a_song() {
    let context = context_with(&[]);
    let media = Rc::new(SimulatedMedia::new());
    let player = player(&context, &media);

    assert!(player.song().is_none());
    assert!(player.ui("playlist")[0].items().is_empty());
    player.ui("next")[0].click();
    assert!(media.sources().is_empty());
}

#[test]
fn a_playlist_control_needs_a_template() {
    let context = Rc::new(Context::new());
    context.playlist_mut().add_song(Song::new("one.mp3"));
    context.enable_playlist();

    let media = Rc::new(SimulatedMedia::new());
    let container = Container::new()
        .child(Element::audio(media))
        .child(Element::new("ul").data("playlist", ""));
    let player = Player::new(&context, Rc::new(container));

    assert!(player.init().unwrap_err().is_configuration());
}

#[test]
fn enabling_twice_registers_one_hook() {
    let context = context_with(&["one"]);
    context.enable_playlist();
    assert_eq!(context.init_hooks().len(), 1);
}
