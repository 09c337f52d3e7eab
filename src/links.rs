// src/links.rs
//! The link list file: one absolute URL per line, no header.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::events::{Event, EventSink};

pub const DEFAULT_LINKS_FILE: &str = "urls.txt";
pub const DEFAULT_STATIC_FILE: &str = "CQA_res.txt";
pub const DEFAULT_BULK_DUMP: &str = "bulk_urls.txt";

/// Read a link file, trimming lines and dropping blank ones.
pub fn read_links(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::MissingLinksFile(path.to_path_buf()),
        _ => Error::Io(e),
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Write links newline-separated, in the order given.
pub fn write_links<I, S>(path: &Path, links: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let body = links
        .into_iter()
        .map(|l| l.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("\n");
    fs::write(path, body)?;
    Ok(())
}

/// Drop repeated links, keeping the first occurrence of each.
pub fn dedup_preserving_order<I>(links: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|l| seen.insert(l.clone()))
        .collect()
}

/// Where submission links come from when none are given on the command line.
#[derive(Debug, Clone)]
pub struct LinkSources {
    pub main: PathBuf,
    pub static_file: PathBuf,
    pub skip_static: bool,
}

impl Default for LinkSources {
    fn default() -> Self {
        Self {
            main: PathBuf::from(DEFAULT_LINKS_FILE),
            static_file: PathBuf::from(DEFAULT_STATIC_FILE),
            skip_static: false,
        }
    }
}

impl LinkSources {
    /// Main file links followed by static file links, duplicates removed.
    ///
    /// A missing main file is an error. A missing static file is reported and ignored.
    pub fn combine(&self, sink: &dyn EventSink) -> Result<Vec<String>> {
        let mut all = read_links(&self.main)?;
        sink.emit(Event::LinksLoaded {
            path: self.main.clone(),
            count: all.len(),
        });

        if self.skip_static {
            sink.emit(Event::StaticLinksSkipped {
                path: self.static_file.clone(),
            });
        } else {
            match read_links(&self.static_file) {
                Ok(extra) => {
                    sink.emit(Event::LinksLoaded {
                        path: self.static_file.clone(),
                        count: extra.len(),
                    });
                    all.extend(extra);
                }
                Err(Error::MissingLinksFile(path)) => {
                    sink.emit(Event::StaticLinksMissing { path });
                }
                Err(e) => return Err(e),
            }
        }

        let unique = dedup_preserving_order(all);
        sink.emit(Event::LinksMerged {
            total: unique.len(),
        });
        Ok(unique)
    }
}

/// Write the HTTP(S) links to the manual fallback file and return them.
pub fn write_bulk_dump(path: &Path, links: &[String], sink: &dyn EventSink) -> Result<Vec<String>> {
    let urls: Vec<String> = links
        .iter()
        .filter(|l| l.starts_with("http"))
        .cloned()
        .collect();

    write_links(path, &urls)?;
    sink.emit(Event::BulkDumpWritten {
        path: path.to_path_buf(),
        count: urls.len(),
    });
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;

    #[test]
    fn reads_trimmed_non_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        fs::write(&path, "https://a/1\n\n  https://a/2  \n").unwrap();

        assert_eq!(read_links(&path).unwrap(), vec!["https://a/1", "https://a/2"]);
    }

    #[test]
    fn missing_file_is_reported_as_such() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.txt");
        assert!(matches!(read_links(&path), Err(Error::MissingLinksFile(p)) if p == path));
    }

    #[test]
    fn merge_keeps_first_seen_order() {
        let dir = tempfile::tempdir().unwrap();
        let main = dir.path().join("urls.txt");
        let extra = dir.path().join("static.txt");
        fs::write(&main, "https://a/3\nhttps://a/1\nhttps://a/3").unwrap();
        fs::write(&extra, "https://b/0\nhttps://a/1\nhttps://a/2").unwrap();

        let sources = LinkSources {
            main,
            static_file: extra,
            skip_static: false,
        };
        let sink = RecordingSink::new();
        let links = sources.combine(&sink).unwrap();

        assert_eq!(
            links,
            vec!["https://a/3", "https://a/1", "https://b/0", "https://a/2"]
        );
        assert!(sink.contains(|e| matches!(e, Event::LinksMerged { total: 4 })));
    }

    #[test]
    fn static_file_can_be_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let main = dir.path().join("urls.txt");
        let extra = dir.path().join("static.txt");
        fs::write(&main, "https://a/1").unwrap();
        fs::write(&extra, "https://b/1").unwrap();

        let sources = LinkSources {
            main,
            static_file: extra,
            skip_static: true,
        };
        let sink = RecordingSink::new();

        assert_eq!(sources.combine(&sink).unwrap(), vec!["https://a/1"]);
        assert!(sink.contains(|e| matches!(e, Event::StaticLinksSkipped { .. })));
    }

    #[test]
    fn missing_static_file_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let main = dir.path().join("urls.txt");
        fs::write(&main, "https://a/1").unwrap();

        let sources = LinkSources {
            main,
            static_file: dir.path().join("absent.txt"),
            skip_static: false,
        };
        let sink = RecordingSink::new();

        assert_eq!(sources.combine(&sink).unwrap(), vec!["https://a/1"]);
        assert!(sink.contains(|e| matches!(e, Event::StaticLinksMissing { .. })));
    }

    #[test]
    fn missing_main_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let sources = LinkSources {
            main: dir.path().join("absent.txt"),
            static_file: dir.path().join("static.txt"),
            skip_static: false,
        };
        assert!(matches!(
            sources.combine(&RecordingSink::new()),
            Err(Error::MissingLinksFile(_))
        ));
    }

    #[test]
    fn bulk_dump_keeps_only_http_links() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bulk_urls.txt");
        let links = vec![
            "https://a/1".to_string(),
            "notes about the batch".to_string(),
            "http://b/2".to_string(),
        ];

        let urls = write_bulk_dump(&path, &links, &RecordingSink::new()).unwrap();

        assert_eq!(urls, vec!["https://a/1", "http://b/2"]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "https://a/1\nhttp://b/2");
    }
}
