//! Directory listing page

use crate::http::response::escape_html;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt::Write;
use std::io;
use std::path::Path;
use tokio::fs;

/// Characters left unescaped in listing links
const HREF: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    fn display_name(&self) -> String {
        if self.is_symlink {
            format!("{}@", self.name)
        } else if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    fn link_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Read `dir` and render its listing for `request_path`
pub async fn render_directory(dir: &Path, request_path: &str) -> io::Result<String> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let file_type = entry.file_type().await?;
        let is_symlink = file_type.is_symlink();
        // Symlinks are listed as directories when their target is one
        let is_dir = if is_symlink {
            fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir())
        } else {
            file_type.is_dir()
        };

        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }

    entries.sort_by_cached_key(|e| e.name.to_lowercase());
    Ok(render_page(&entries, request_path))
}

/// Render the listing HTML for already-sorted entries
pub fn render_page(entries: &[ListingEntry], request_path: &str) -> String {
    let display_path = escape_html(&percent_decode_str(request_path).decode_utf8_lossy());
    let title = format!("Directory listing for {display_path}");

    let mut page = format!(
        "<!DOCTYPE HTML>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         </head>\n\
         <body>\n\
         <h1>{title}</h1>\n\
         <hr>\n\
         <ul>\n"
    );

    for entry in entries {
        let _ = writeln!(
            page,
            "<li><a href=\"{}\">{}</a></li>",
            utf8_percent_encode(&entry.link_name(), HREF),
            escape_html(&entry.display_name()),
        );
    }

    page.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool, is_symlink: bool) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            is_dir,
            is_symlink,
        }
    }

    #[test]
    fn test_render_page() {
        let page = render_page(
            &[
                entry("css", true, false),
                entry("index.html", false, false),
                entry("latest", true, true),
            ],
            "/assets/",
        );
        assert!(page.contains("<title>Directory listing for /assets/</title>"));
        assert!(page.contains("<li><a href=\"css/\">css/</a></li>"));
        assert!(page.contains("<li><a href=\"index.html\">index.html</a></li>"));
        assert!(page.contains("<li><a href=\"latest/\">latest@</a></li>"));
    }

    #[test]
    fn test_render_page_escapes_names() {
        let page = render_page(&[entry("a <b> & c.txt", false, false)], "/my%20dir/");
        assert!(page.contains("Directory listing for /my dir/"));
        assert!(page.contains("href=\"a%20%3Cb%3E%20%26%20c.txt\""));
        assert!(page.contains(">a &lt;b&gt; &amp; c.txt<"));
    }

    #[tokio::test]
    async fn test_render_directory_sorted_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("beta.txt"), "b").unwrap();
        std::fs::write(dir.path().join("Alpha.txt"), "a").unwrap();
        std::fs::create_dir(dir.path().join("gamma")).unwrap();

        let page = render_directory(dir.path(), "/").await.unwrap();
        let alpha = page.find("Alpha.txt").unwrap();
        let beta = page.find("beta.txt").unwrap();
        let gamma = page.find("gamma/").unwrap();
        assert!(alpha < beta && beta < gamma);
    }

    #[tokio::test]
    async fn test_render_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(render_directory(&dir.path().join("nope"), "/nope/")
            .await
            .is_err());
    }
}
