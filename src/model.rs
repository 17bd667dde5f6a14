use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SegmentEntry {
    pub index: usize,
    pub first_page: u32,
    pub last_page: u32,
    pub output_file: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitRunManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub input_path: String,
    pub input_sha256: String,
    pub boundary_marker: String,
    pub fuzzy_threshold: usize,
    pub page_count: usize,
    pub segment_count: usize,
    pub trailing_pages_flushed: bool,
    pub trailing_pages_dropped: usize,
    pub segments: Vec<SegmentEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenameEntry {
    pub original: String,
    pub renamed_to: Option<String>,
    pub skipped: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenameCounts {
    pub pdf_count: usize,
    pub renamed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenameRunManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub directory: String,
    pub keywords: Vec<String>,
    pub id_formats: Vec<String>,
    pub counts: RenameCounts,
    pub entries: Vec<RenameEntry>,
}
