use strsim::levenshtein;

/// A contiguous run of pages belonging to one report, as 0-based offsets
/// into the extracted page-text sequence, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub first: usize,
    pub last: usize,
}

#[derive(Debug, Clone)]
pub struct SegmentPlan {
    pub segments: Vec<Segment>,
    pub trailing_pages_flushed: bool,
    pub trailing_pages_dropped: usize,
}

/// A page ends a report when the boundary marker occurs verbatim in its
/// text, or when the marker is within `threshold` edits of the page's
/// trailing `marker_chars + 2` characters. The fuzzy window absorbs
/// extraction noise such as dropped accents.
pub fn is_boundary_page(text: &str, marker: &str, threshold: usize) -> bool {
    if text.contains(marker) {
        return true;
    }

    let window = marker.chars().count() + 2;
    let tail = tail_chars(text, window);
    levenshtein(&tail, marker) < threshold
}

fn tail_chars(text: &str, window: usize) -> String {
    let total = text.chars().count();
    text.chars().skip(total.saturating_sub(window)).collect()
}

/// Walks the page texts in order and cuts a segment at every boundary
/// page. Segments are contiguous, non-overlapping, and increasing; with
/// `flush_remainder` they cover every page exactly once even when the
/// document does not end on a boundary.
pub fn plan_segments(
    page_texts: &[String],
    marker: &str,
    threshold: usize,
    flush_remainder: bool,
) -> SegmentPlan {
    let mut segments = Vec::new();
    let mut start = 0;

    for (index, text) in page_texts.iter().enumerate() {
        if is_boundary_page(text, marker, threshold) {
            segments.push(Segment {
                first: start,
                last: index,
            });
            start = index + 1;
        }
    }

    let mut trailing_pages_flushed = false;
    let mut trailing_pages_dropped = 0;

    if start < page_texts.len() {
        if flush_remainder {
            segments.push(Segment {
                first: start,
                last: page_texts.len() - 1,
            });
            trailing_pages_flushed = true;
        } else {
            trailing_pages_dropped = page_texts.len() - start;
        }
    }

    SegmentPlan {
        segments,
        trailing_pages_flushed,
        trailing_pages_dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "FIM DO INFORME";

    fn pages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn exact_marker_anywhere_in_page_is_a_boundary() {
        assert!(is_boundary_page("rendimentos FIM DO INFORME rodapé", MARKER, 5));
        assert!(!is_boundary_page("texto de rendimentos comuns", MARKER, 5));
    }

    #[test]
    fn near_miss_in_trailing_window_is_a_boundary() {
        // tail window: "a FIM DO 1NFORME", three edits from the marker
        assert!(is_boundary_page("página FIM DO 1NFORME", MARKER, 5));
    }

    #[test]
    fn threshold_is_exclusive() {
        assert!(is_boundary_page("ABBBB", "AAAAA", 5));
        assert!(!is_boundary_page("BBBBB", "AAAAA", 5));
    }

    #[test]
    fn boundaries_cut_contiguous_covering_segments() {
        let texts = pages(&[
            "página 1",
            "página 2 FIM DO INFORME",
            "página 3",
            "página 4",
            "página 5 FIM DO INFORME",
        ]);

        let plan = plan_segments(&texts, MARKER, 5, true);

        assert_eq!(
            plan.segments,
            vec![
                Segment { first: 0, last: 1 },
                Segment { first: 2, last: 4 },
            ]
        );
        assert!(!plan.trailing_pages_flushed);
        assert_eq!(plan.trailing_pages_dropped, 0);
    }

    #[test]
    fn boundary_on_every_page_yields_single_page_segments() {
        let texts = pages(&["FIM DO INFORME", "FIM DO INFORME", "FIM DO INFORME"]);

        let plan = plan_segments(&texts, MARKER, 5, true);

        assert_eq!(plan.segments.len(), 3);
        for (index, segment) in plan.segments.iter().enumerate() {
            assert_eq!(segment.first, index);
            assert_eq!(segment.last, index);
        }
    }

    #[test]
    fn remainder_is_flushed_as_a_final_segment() {
        let texts = pages(&["página 1 FIM DO INFORME", "página 2", "página 3"]);

        let plan = plan_segments(&texts, MARKER, 5, true);

        assert_eq!(
            plan.segments,
            vec![
                Segment { first: 0, last: 0 },
                Segment { first: 1, last: 2 },
            ]
        );
        assert!(plan.trailing_pages_flushed);
    }

    #[test]
    fn remainder_is_dropped_when_flushing_is_disabled() {
        let texts = pages(&["página 1 FIM DO INFORME", "página 2", "página 3"]);

        let plan = plan_segments(&texts, MARKER, 5, false);

        assert_eq!(plan.segments, vec![Segment { first: 0, last: 0 }]);
        assert!(!plan.trailing_pages_flushed);
        assert_eq!(plan.trailing_pages_dropped, 2);
    }

    #[test]
    fn empty_document_plans_no_segments() {
        let plan = plan_segments(&[], MARKER, 5, true);

        assert!(plan.segments.is_empty());
        assert!(!plan.trailing_pages_flushed);
        assert_eq!(plan.trailing_pages_dropped, 0);
    }
}
