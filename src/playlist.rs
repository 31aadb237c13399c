use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::song::Song;

/// Renders one song into a fragment for the `playlist` control.
pub type SongTemplate = Rc<dyn Fn(&Song) -> String>;

/// Ordered songs plus a bounded position.
///
/// `position < max(1, len)` holds after every mutation; on an empty list the
/// position is 0 and addresses nothing.
#[derive(Default)]
pub struct PlaylistCursor {
    songs: Vec<Song>,
    position: usize,
    template: Option<SongTemplate>,
}

impl PlaylistCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn add_song(&mut self, song: Song) {
        self.songs.push(song);
    }

    /// Out-of-range indexes are ignored.
    pub fn remove_song(&mut self, index: usize) {
        if index >= self.songs.len() {
            return;
        }
        self.songs.remove(index);
        if self.position >= self.songs.len() {
            self.position = self.songs.len().saturating_sub(1);
        }
    }

    /// Empties the list and rewinds. The template survives.
    pub fn clear(&mut self) {
        self.songs.clear();
        self.position = 0;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves to `index`, but only while the *current* position is before the last
    /// song. Once the cursor sits on the last song (or the list is empty) every
    /// call is ignored, even for a valid target.
    pub fn set_position(&mut self, index: usize) {
        let len = self.songs.len();
        if self.position + 1 < len && index < len {
            self.position = index;
        }
    }

    pub fn next(&mut self) {
        if self.position + 1 < self.songs.len() {
            self.position += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.position > 0 {
            self.position -= 1;
        }
    }

    pub fn current(&self) -> Option<&Song> {
        self.songs.get(self.position)
    }

    pub fn template(&mut self, render: impl Fn(&Song) -> String + 'static) {
        self.template = Some(Rc::new(render));
    }

    pub fn has_template(&self) -> bool {
        self.template.is_some()
    }

    pub fn render(&self) -> Result<Vec<String>> {
        let template = self
            .template
            .as_ref()
            .ok_or_else(|| Error::configuration("playlist template has not been set"))?;

        Ok(self.songs.iter().map(|song| template(song)).collect())
    }
}

impl fmt::Debug for PlaylistCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaylistCursor")
            .field("songs", &self.songs.len())
            .field("position", &self.position)
            .field("template", &self.template.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cursor(n: usize) -> PlaylistCursor {
        let mut cursor = PlaylistCursor::new();
        for i in 0..n {
            cursor.add_song(Song::new(format!("{i}.mp3")));
        }
        cursor
    }

    #[test]
    fn add_and_remove() {
        let mut list = cursor(0);
        list.add_song(Song::new("test.mp3"));
        assert_eq!(list.len(), 1);
        list.remove_song(0);
        assert!(list.is_empty());
    }

    #[test]
    fn remove_out_of_range_is_ignored() {
        let mut list = cursor(2);
        list.next();
        list.remove_song(2);
        assert_eq!(list.len(), 2);
        assert_eq!(list.position(), 1);
    }

    #[test]
    fn removing_the_current_last_song_pulls_position_back() {
        let mut list = cursor(2);
        list.next();
        list.remove_song(1);
        assert_eq!(list.position(), 0);
        assert_eq!(list.current().unwrap().url(), "0.mp3");
    }

    #[test]
    fn clear_rewinds() {
        let mut list = cursor(3);
        list.next();
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.position(), 0);
        assert!(list.current().is_none());
    }

    #[test]
    fn set_position_moves_from_an_inner_position() {
        let mut list = cursor(2);
        list.set_position(1);
        assert_eq!(list.position(), 1);
    }

    #[test]
    fn set_position_is_ignored_on_the_last_song() {
        let mut list = cursor(2);
        list.set_position(1);
        list.set_position(0);
        assert_eq!(list.position(), 1);
    }

    #[test]
    fn set_position_is_ignored_on_an_empty_list() {
        let mut list = cursor(0);
        list.set_position(1);
        assert_eq!(list.position(), 0);
    }

    #[test]
    fn set_position_rejects_targets_past_the_end() {
        let mut list = cursor(3);
        list.set_position(7);
        assert_eq!(list.position(), 0);
    }

    #[test]
    fn next_and_prev_stop_at_the_edges() {
        let mut list = cursor(2);
        list.next();
        assert_eq!(list.position(), 1);
        list.next();
        assert_eq!(list.position(), 1);

        list.prev();
        assert_eq!(list.position(), 0);
        list.prev();
        assert_eq!(list.position(), 0);
    }

    #[test]
    fn next_on_a_single_song_does_nothing() {
        let mut list = cursor(1);
        list.next();
        assert_eq!(list.position(), 0);
    }

    #[test]
    fn render_needs_a_template() {
        let mut list = cursor(0);
        list.add_song(Song::new("a.mp3").with("title", "Title 1"));
        list.add_song(Song::new("b.mp3").with("title", "Title 2"));
        assert!(list.render().unwrap_err().is_configuration());

        list.template(|song| song.text("title").unwrap_or_default());
        assert_eq!(list.render().unwrap(), vec!["Title 1", "Title 2"]);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add,
        Remove(usize),
        Next,
        Prev,
        Set(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Add),
            (0usize..8).prop_map(Op::Remove),
            Just(Op::Next),
            Just(Op::Prev),
            (0usize..8).prop_map(Op::Set),
        ]
    }

    proptest! {
        #[test]
        fn position_stays_in_bounds(ops in prop::collection::vec(op(), 0..64)) {
            let mut list = cursor(0);
            for op in ops {
                match op {
                    Op::Add => list.add_song(Song::new("x.mp3")),
                    Op::Remove(i) => list.remove_song(i),
                    Op::Next => list.next(),
                    Op::Prev => list.prev(),
                    Op::Set(i) => list.set_position(i),
                }
                prop_assert!(list.position() < list.len().max(1));
            }
        }

        #[test]
        fn next_is_idempotent_at_the_end(n in 1usize..10, extra in 1usize..5) {
            let mut list = cursor(n);
            for _ in 0..n + extra {
                list.next();
            }
            prop_assert_eq!(list.position(), n - 1);
        }
    }
}
