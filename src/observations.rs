//! Observation list: lead paragraph followed by one numbered sequence built from
//! the free-form items and the media descriptions flagged for inclusion.

use crate::payload::MediaItem;

/// Built observation list
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObservationList {
    /// Template text, verbatim and unnumbered
    pub lead: String,
    /// "{n}. ..." entries, n = 1, 2, ...
    pub entries: Vec<String>,
}

impl ObservationList {
    /// Lead paragraph first, then the numbered entries
    pub fn to_lines(&self) -> Vec<String> {
        std::iter::once(self.lead.clone())
            .chain(self.entries.iter().cloned())
            .collect()
    }
}

/// Merge items and included media descriptions under one counter.
///
/// Figure numbers are media-list positions and ignore the include flag.
pub fn build(template: &str, items: &[String], media: &[MediaItem]) -> ObservationList {
    let item_texts = items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string);

    let media_texts = media.iter().enumerate().filter_map(|(index, entry)| {
        let description = entry.description.trim();
        (entry.include_in_observations && !description.is_empty())
            .then(|| format!("{} (Figure {})", description, index + 1))
    });

    let entries = item_texts
        .chain(media_texts)
        .enumerate()
        .map(|(n, text)| format!("{}. {}", n + 1, text))
        .collect();

    ObservationList {
        lead: template.to_string(),
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn media(description: &str, include: bool) -> MediaItem {
        MediaItem::new(None, description, include)
    }

    #[test]
    fn test_items_then_media_share_counter() {
        let list = build(
            "Lead.",
            &["Add stirrup".into(), "Clean forms".into()],
            &[media("Overview", false), media("Crack at GB-3", true)],
        );
        assert_eq!(list.lead, "Lead.");
        assert_eq!(
            list.entries,
            vec!["1. Add stirrup", "2. Clean forms", "3. Crack at GB-3 (Figure 2)"]
        );
    }

    #[test]
    fn test_empty_sources_give_lead_only() {
        let list = build("", &[], &[media("Not included", false), media("  ", true)]);
        assert!(list.entries.is_empty());
        assert_eq!(list.to_lines(), vec![String::new()]);
    }

    #[test]
    fn test_blank_items_are_skipped() {
        let list = build("Lead", &["".into(), "  ".into(), "Real".into()], &[]);
        assert_eq!(list.entries, vec!["1. Real"]);
    }

    #[test]
    fn test_template_is_not_interpreted() {
        let template = "See Figure 1.00 {n}. \n kept";
        assert_eq!(build(template, &[], &[]).lead, template);
    }

    fn arb_media() -> impl Strategy<Value = Vec<(bool, bool)>> {
        // (include flag, description non-blank)
        prop::collection::vec((any::<bool>(), any::<bool>()), 0..25)
    }

    proptest! {
        #[test]
        fn prop_numbering_is_contiguous(items in prop::collection::vec("[a-z ]{0,12}", 0..15), flags in arb_media()) {
            let media: Vec<MediaItem> = flags
                .iter()
                .enumerate()
                .map(|(i, (include, filled))| {
                    let description = if *filled { format!("desc {}", i) } else { String::new() };
                    MediaItem::new(None, description, *include)
                })
                .collect();
            let list = build("lead", &items, &media);

            let n = items.iter().filter(|s| !s.trim().is_empty()).count();
            let k = flags.iter().filter(|(include, filled)| *include && *filled).count();
            prop_assert_eq!(list.entries.len(), n + k);
            for (i, entry) in list.entries.iter().enumerate() {
                let prefix = format!("{}. ", i + 1);
                prop_assert!(entry.starts_with(&prefix));
            }
        }

        #[test]
        fn prop_figure_index_is_media_position(flags in arb_media()) {
            let media: Vec<MediaItem> = flags
                .iter()
                .enumerate()
                .map(|(i, (include, _))| MediaItem::new(None, format!("desc {}", i), *include))
                .collect();
            let list = build("", &[], &media);
            for entry in &list.entries {
                let desc_index: usize = entry
                    .split("desc ")
                    .nth(1)
                    .and_then(|rest| rest.split(' ').next())
                    .and_then(|s| s.parse().ok())
                    .unwrap();
                let expected = format!("(Figure {})", desc_index + 1);
                prop_assert!(entry.ends_with(&expected));
            }
        }
    }
}
