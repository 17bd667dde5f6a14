use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::RenameArgs;
use crate::model::{RenameCounts, RenameEntry, RenameRunManifest};
use crate::naming::{NamingConfig, NamingPipeline, sanitize_filename};
use crate::pdf::SourceDocument;
use crate::util::{now_utc_string, unique_destination, utc_compact_string, write_json_pretty};

enum Outcome {
    Renamed { new_name: String },
    Skipped { reason: String },
}

pub fn run(args: RenameArgs) -> Result<()> {
    let started_ts = Utc::now();

    let pipeline = NamingPipeline::new(&NamingConfig {
        keywords: args.keywords.clone(),
        id_formats: args.id_formats.clone(),
        trailing_markers: args.trailing_markers.clone(),
    })?;

    let mut pdfs = discover_pdfs(&args.directory)?;
    pdfs.sort();

    if pdfs.is_empty() {
        warn!(directory = %args.directory.display(), "no PDFs to rename");
    }

    info!(
        directory = %args.directory.display(),
        pdf_count = pdfs.len(),
        "starting rename"
    );

    let mut entries = Vec::with_capacity(pdfs.len());
    let mut renamed = 0;
    let mut skipped = 0;

    for path in &pdfs {
        let original = match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => name.to_string(),
            None => path.display().to_string(),
        };

        // Every per-file failure becomes a diagnostic plus a skip; only
        // the manifest write at the end can abort the batch.
        let outcome = rename_one(path, &args.directory, &pipeline)
            .unwrap_or_else(|err| Outcome::Skipped {
                reason: format!("{err:#}"),
            });

        match outcome {
            Outcome::Renamed { new_name } => {
                info!(from = %original, to = %new_name, "renamed");
                renamed += 1;
                entries.push(RenameEntry {
                    original,
                    renamed_to: Some(new_name),
                    skipped: None,
                });
            }
            Outcome::Skipped { reason } => {
                warn!(file = %original, reason = %reason, "skipped");
                skipped += 1;
                entries.push(RenameEntry {
                    original,
                    renamed_to: None,
                    skipped: Some(reason),
                });
            }
        }
    }

    let manifest = RenameRunManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        directory: args.directory.display().to_string(),
        keywords: args.keywords.clone(),
        id_formats: args
            .id_formats
            .iter()
            .map(|format| format.as_str().to_string())
            .collect(),
        counts: RenameCounts {
            pdf_count: pdfs.len(),
            renamed,
            skipped,
        },
        entries,
    };

    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        args.directory
            .join("manifests")
            .join(format!("rename_run_{}.json", utc_compact_string(started_ts)))
    });
    write_json_pretty(&manifest_path, &manifest)?;

    info!(path = %manifest_path.display(), "wrote rename run manifest");
    info!(renamed, skipped, "rename completed");

    Ok(())
}

fn rename_one(path: &Path, directory: &Path, pipeline: &NamingPipeline) -> Result<Outcome> {
    let document = SourceDocument::load(path)?;

    let mut page_texts = Vec::with_capacity(document.page_count());
    for page in document.page_numbers() {
        match document.page_text(page) {
            Ok(text) => page_texts.push(text),
            Err(err) => {
                warn!(file = %path.display(), page, error = %err, "text extraction failed, treating page as empty");
                page_texts.push(String::new());
            }
        }
    }

    let Some(located) = pipeline.locate(&page_texts) else {
        return Ok(Outcome::Skipped {
            reason: "no holder name found".to_string(),
        });
    };

    let candidate = sanitize_filename(&pipeline.strip_identifiers(&located));
    if candidate.is_empty() {
        return Ok(Outcome::Skipped {
            reason: "candidate name empty after sanitization".to_string(),
        });
    }

    let target_name = format!("{candidate}.pdf");
    if path.file_name().and_then(|name| name.to_str()) == Some(target_name.as_str()) {
        return Ok(Outcome::Skipped {
            reason: "already has the target name".to_string(),
        });
    }

    let destination = unique_destination(directory, &candidate, "pdf");
    fs::rename(path, &destination).with_context(|| {
        format!(
            "failed to rename {} to {}",
            path.display(),
            destination.display()
        )
    })?;

    let new_name = destination
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(&candidate)
        .to_string();

    Ok(Outcome::Renamed { new_name })
}

fn discover_pdfs(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();

    let entries = fs::read_dir(directory)
        .with_context(|| format!("failed to read {}", directory.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", directory.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);

        if is_pdf {
            pdfs.push(path);
        }
    }

    Ok(pdfs)
}

#[cfg(test)]
mod tests {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    use super::*;
    use crate::cli::IdFormat;

    /// One-page PDF with the given text, enough for the extractor to
    /// read back.
    fn write_pdf(path: &Path, text: &str) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        doc.save(path).unwrap();
    }

    fn args_for(directory: &Path) -> RenameArgs {
        RenameArgs {
            directory: directory.to_path_buf(),
            keywords: vec!["Nome Completo".to_string()],
            id_formats: vec![IdFormat::Cpf],
            trailing_markers: Vec::new(),
            manifest_path: Some(directory.join("manifests").join("rename_run.json")),
        }
    }

    fn pipeline() -> NamingPipeline {
        NamingPipeline::new(&NamingConfig {
            keywords: vec!["Nome Completo".to_string()],
            id_formats: vec![IdFormat::Cpf],
            trailing_markers: Vec::new(),
        })
        .unwrap()
    }

    #[test]
    fn unreadable_pdf_is_skipped_and_the_batch_continues() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("aaa.pdf"), b"not a pdf container").unwrap();
        write_pdf(&dir.path().join("bbb.pdf"), "Nome Completo MARIA SOUZA");

        run(args_for(dir.path())).unwrap();

        // the corrupt file is left untouched under its original name
        assert!(dir.path().join("aaa.pdf").exists());
        assert!(!dir.path().join("bbb.pdf").exists());
        assert!(dir.path().join("MARIA SOUZA.pdf").exists());
    }

    #[test]
    fn file_already_bearing_its_target_name_is_not_churned() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("MARIA SOUZA.pdf");
        write_pdf(&path, "Nome Completo MARIA SOUZA");

        let outcome = rename_one(&path, dir.path(), &pipeline()).unwrap();

        match outcome {
            Outcome::Skipped { reason } => assert_eq!(reason, "already has the target name"),
            Outcome::Renamed { new_name } => panic!("unexpected rename to {new_name}"),
        }
        assert!(path.exists());
        assert!(!dir.path().join("MARIA SOUZA (1).pdf").exists());
    }

    #[test]
    fn colliding_names_get_numeric_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        write_pdf(&dir.path().join("informe_1.pdf"), "Nome Completo MARIA SOUZA");
        write_pdf(&dir.path().join("informe_2.pdf"), "Nome Completo MARIA SOUZA");

        run(args_for(dir.path())).unwrap();

        assert!(dir.path().join("MARIA SOUZA.pdf").exists());
        assert!(dir.path().join("MARIA SOUZA (1).pdf").exists());
        assert!(!dir.path().join("informe_1.pdf").exists());
        assert!(!dir.path().join("informe_2.pdf").exists());
    }

    #[test]
    fn discover_pdfs_keeps_only_pdf_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.pdf"), b"").unwrap();
        fs::write(dir.path().join("b.PDF"), b"").unwrap();
        fs::write(dir.path().join("c.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("manifests")).unwrap();

        let mut found = discover_pdfs(dir.path()).unwrap();
        found.sort();

        let names: Vec<_> = found
            .iter()
            .map(|path| path.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.PDF"]);
    }
}
