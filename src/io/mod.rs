use std::path::{Path, PathBuf};

use id3::{Tag, TagLike, no_tag_ok};
use tracing::debug;

use crate::context::SongCallback;
use crate::error::Result;
use crate::song::Song;

/// Every file under `root` with one of `extensions`, sorted by path.
pub fn get_files(root: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let mut files = vec![];
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for entry in dir.read_dir()? {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
            } else if let Some(ext) = path.extension() {
                if extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)) {
                    files.push(path);
                }
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Song metadata from a file's ID3 tag. Untagged files still get a `url` and a
/// `title` taken from the file name.
pub fn read_song(path: &Path) -> Result<Song> {
    let mut song = Song::new(path.to_string_lossy());
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let Some(tag) = no_tag_ok(Tag::read_from_path(path))? else {
        debug!(?path, "no tag");
        return Ok(song.with("title", stem));
    };

    song = song.with("title", tag.title().map(str::to_string).unwrap_or(stem));
    if let Some(artist) = tag.artist() {
        song = song.with("artist", artist);
    }
    if let Some(album) = tag.album() {
        song = song.with("album", album);
    }
    if let Some(ms) = tag.duration() {
        song = song.with("duration", f64::from(ms) / 1000.0);
    }

    Ok(song)
}

/// Track length in seconds, when the tag records one.
pub fn probe_duration(path: &str) -> Option<f64> {
    let tag = no_tag_ok(Tag::read_from_path(path)).ok().flatten()?;
    tag.duration().map(|ms| f64::from(ms) / 1000.0)
}

/// A song loader that treats the query as a file path.
pub fn file_loader() -> impl Fn(&str, SongCallback) -> Result<()> {
    |query: &str, done: SongCallback| {
        let song = read_song(Path::new(query))?;
        done(song.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use id3::Version;
    use tempfile::TempDir;

    fn tagged(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"").unwrap();

        let mut tag = Tag::new();
        tag.set_title("Title");
        tag.set_artist("Artist");
        tag.set_duration(70_000);
        tag.write_to_path(&path, Version::Id3v24).unwrap();
        path
    }

    #[test]
    fn get_files_walks_nested_directories() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("album")).unwrap();
        std::fs::write(dir.path().join("album/b.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("a.MP3"), b"").unwrap();
        std::fs::write(dir.path().join("cover.jpg"), b"").unwrap();

        let files = get_files(dir.path(), &["mp3"]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.MP3", "b.mp3"]);
    }

    #[test]
    fn read_song_uses_tags() {
        let dir = TempDir::new().unwrap();
        let path = tagged(dir.path(), "track.mp3");

        let song = read_song(&path).unwrap();
        assert_eq!(song.url(), path.to_string_lossy());
        assert_eq!(song.text("title").as_deref(), Some("Title"));
        assert_eq!(song.text("artist").as_deref(), Some("Artist"));
        assert_eq!(probe_duration(&path.to_string_lossy()), Some(70.0));
    }

    #[test]
    fn untagged_files_fall_back_to_the_file_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain song.mp3");
        std::fs::write(&path, b"not really audio").unwrap();

        let song = read_song(&path).unwrap();
        assert_eq!(song.text("title").as_deref(), Some("plain song"));
        assert!(song.get("artist").is_none());
        assert_eq!(probe_duration(&path.to_string_lossy()), None);
    }

    #[test]
    fn file_loader_reports_through_the_callback() {
        let dir = TempDir::new().unwrap();
        let path = tagged(dir.path(), "track.mp3");
        let loader = file_loader();

        let seen = std::rc::Rc::new(std::cell::RefCell::new(None));
        let sink = seen.clone();
        loader(
            &path.to_string_lossy(),
            Box::new(move |value: serde_json::Value| {
                *sink.borrow_mut() = Some(value);
                Ok(())
            }),
        )
        .unwrap();

        let value = seen.borrow_mut().take().unwrap();
        assert_eq!(value["title"], "Title");
    }
}
