//! Random-article corpus generation for fitting the TF-IDF model.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::Result;
use crate::provider::ContentProvider;

/// Article text flattened onto one line.
pub fn corpus_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First free `corpus-<count>.txt` in `dir`, falling back to
/// `corpus-<count>_1.txt`, `corpus-<count>_2.txt`, ...
pub fn default_output_path(dir: &Path, count: usize) -> PathBuf {
    let first = dir.join(format!("corpus-{}.txt", count));
    if !first.exists() {
        return first;
    }
    (1usize..)
        .map(|i| dir.join(format!("corpus-{}_{}.txt", count, i)))
        .find(|path| !path.exists())
        .unwrap_or(first)
}

/// Sample `count` random articles and write one flattened text per line.
///
/// Articles whose fetch fails, or whose text is empty, are skipped. A
/// provider that cannot sample at all aborts the run. Returns the number of
/// lines written.
pub async fn write_random_corpus<W: Write>(
    provider: &dyn ContentProvider,
    count: usize,
    writer: &mut W,
) -> Result<usize> {
    let started = Instant::now();
    let mut written = 0;

    for i in 0..count {
        let title = provider.random_title().await?;
        let text = match provider.text_and_links(&title).await {
            Ok((text, _)) => text,
            Err(e) => {
                log::warn!("Skipping {}: {}", title, e);
                continue;
            }
        };

        let line = corpus_line(&text);
        if line.is_empty() {
            log::debug!("Skipping {}: no text", title);
            continue;
        }
        writeln!(writer, "{}", line)?;
        written += 1;
        log::info!("[{}/{}] {}", i + 1, count, title);
    }
    writer.flush()?;

    log::info!(
        "Wrote {} of {} sampled articles in {:.2}s",
        written,
        count,
        started.elapsed().as_secs_f64()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::TfIdfModel;
    use crate::provider::MemoryProvider;
    use std::fs::File;
    use std::io::BufWriter;
    use tempfile::TempDir;

    fn graph() -> MemoryProvider {
        MemoryProvider::new()
            .with_article(
                "Bat",
                "Bats are flying mammals.\n\nMost bats use echolocation.",
                &["Mammal"],
            )
            .with_article("Empty", "", &[])
            .with_article("Mammal", "Mammals nurse\ntheir young.", &[])
    }

    #[test]
    fn test_corpus_line_flattens_paragraphs() {
        assert_eq!(corpus_line("One.\n\n  Two\r\nthree. "), "One. Two three.");
        assert_eq!(corpus_line("\n\n"), "");
    }

    #[tokio::test]
    async fn test_write_random_corpus() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corpus.txt");
        let provider = graph();

        let mut writer = BufWriter::new(File::create(&path).unwrap());
        let written = write_random_corpus(&provider, 4, &mut writer).await.unwrap();
        drop(writer);

        // Bat, Empty (skipped), Mammal, Bat
        assert_eq!(written, 3);
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Bats are flying mammals. Most bats use echolocation.",
                "Mammals nurse their young.",
                "Bats are flying mammals. Most bats use echolocation.",
            ]
        );

        let model = TfIdfModel::from_corpus_file(&path).unwrap();
        assert_eq!(model.document_count(), 3);
    }

    #[tokio::test]
    async fn test_empty_graph_aborts() {
        let mut out = Vec::new();
        let err = write_random_corpus(&MemoryProvider::new(), 2, &mut out)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(out.is_empty());
    }

    #[test]
    fn test_default_output_path_skips_existing() {
        let dir = TempDir::new().unwrap();
        let first = default_output_path(dir.path(), 50);
        assert_eq!(first, dir.path().join("corpus-50.txt"));

        std::fs::write(&first, "x").unwrap();
        std::fs::write(dir.path().join("corpus-50_1.txt"), "x").unwrap();
        assert_eq!(
            default_output_path(dir.path(), 50),
            dir.path().join("corpus-50_2.txt")
        );
    }
}
