//! Catalog filtering: folder inclusion/exclusion, title matching and the
//! optional "currently recording" pass.

use crate::error::Result;
use crate::models::{Folder, Item, ShowRecordings};
use crate::options::{FilterOptions, ListMode};
use crate::traits::RecordingProbe;

/// Filter the catalog, probing items when the mode asks for live recordings
pub async fn filter_recordings(
    folders: &[Folder],
    options: &FilterOptions,
    probe: &dyn RecordingProbe,
) -> Result<Vec<ShowRecordings>> {
    let selected = select_recordings(folders, options);
    if options.mode != ListMode::CurrentlyRecording {
        return Ok(selected);
    }
    retain_recording(selected, probe).await
}

/// Apply the title predicates. Result order follows catalog order.
pub fn select_recordings(folders: &[Folder], options: &FilterOptions) -> Vec<ShowRecordings> {
    folders
        .iter()
        .filter(|folder| has_include_folder(folder, options) && !has_exclude_folder(folder, options))
        .map(|folder| {
            let mut show = ShowRecordings::from_folder(folder);
            if options.mode != ListMode::Shows {
                show.items = folder
                    .items
                    .iter()
                    .filter(|item| has_title_match(item, options))
                    .cloned()
                    .collect();
            }
            show
        })
        .collect()
}

/// Keep only items the probe reports as recording, and drop shows left empty
pub async fn retain_recording(
    shows: Vec<ShowRecordings>,
    probe: &dyn RecordingProbe,
) -> Result<Vec<ShowRecordings>> {
    let mut result = Vec::new();
    for mut show in shows {
        let mut recording = Vec::new();
        for mut item in show.items {
            if probe.is_recording(&item).await? {
                item.recording = true;
                recording.push(item);
            }
        }
        if !recording.is_empty() {
            show.items = recording;
            result.push(show);
        }
    }
    Ok(result)
}

pub fn has_include_folder(folder: &Folder, options: &FilterOptions) -> bool {
    options.folders.is_empty() || contains_any(&folder.title, &options.folders)
}

pub fn has_exclude_folder(folder: &Folder, options: &FilterOptions) -> bool {
    contains_any(&folder.title, &options.exclude)
}

pub fn has_title_match(item: &Item, options: &FilterOptions) -> bool {
    options.titles.is_empty() || contains_any(&item.title, &options.titles)
}

/// Case-insensitive substring match against any token
fn contains_any(text: &str, tokens: &[String]) -> bool {
    let text = text.to_lowercase();
    tokens
        .iter()
        .any(|token| text.contains(&token.trim().to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    fn item(id: &str, title: &str) -> Item {
        Item {
            id: id.to_string(),
            title: title.to_string(),
            url: format!("http://server/web/{}", id),
            ..Default::default()
        }
    }

    fn folder(id: &str, title: &str, items: Vec<Item>) -> Folder {
        Folder {
            id: id.to_string(),
            parent_id: "61".to_string(),
            title: title.to_string(),
            items,
        }
    }

    fn catalog() -> Vec<Folder> {
        vec![
            folder("1", "ShowA", vec![item("a1", "Ep1"), item("a2", "Ep2")]),
            folder("2", "ShowB", vec![item("b1", "Ep1")]),
        ]
    }

    fn titles(shows: &[ShowRecordings]) -> Vec<&str> {
        shows.iter().map(|s| s.title.as_str()).collect()
    }

    /// Reports the items whose id is listed as recording
    struct FakeProbe(Vec<&'static str>);

    #[async_trait]
    impl RecordingProbe for FakeProbe {
        async fn is_recording(&self, item: &Item) -> Result<bool> {
            Ok(self.0.contains(&item.id.as_str()))
        }
    }

    #[test]
    fn test_no_filters_returns_everything() {
        let result = select_recordings(&catalog(), &FilterOptions::default());
        assert_eq!(titles(&result), vec!["ShowA", "ShowB"]);
        assert_eq!(result[0].items.len(), 2);
        assert_eq!(result[1].items.len(), 1);
    }

    #[test]
    fn test_include_folder() {
        let options = FilterOptions::default().with_folders(&["ShowA"]);
        let result = select_recordings(&catalog(), &options);
        assert_eq!(titles(&result), vec!["ShowA"]);
        assert_eq!(result[0].items.len(), 2);
    }

    #[test]
    fn test_exclude_folder() {
        let options = FilterOptions::default().with_exclude(&["ShowA"]);
        let result = select_recordings(&catalog(), &options);
        assert_eq!(titles(&result), vec!["ShowB"]);
    }

    #[test]
    fn test_exclude_applies_after_include() {
        let options = FilterOptions::default()
            .with_folders(&["show"])
            .with_exclude(&["showb"]);
        let result = select_recordings(&catalog(), &options);
        assert_eq!(titles(&result), vec!["ShowA"]);
    }

    #[test]
    fn test_folder_match_is_case_insensitive() {
        let folders = vec![
            folder("1", "LEGO Masters", vec![]),
            folder("2", "Lego Masters", vec![]),
            folder("3", "2 Broke Girls", vec![]),
        ];
        let options = FilterOptions::default().with_folders(&["lego masters"]);
        assert_eq!(select_recordings(&folders, &options).len(), 2);

        let options = FilterOptions::default().with_exclude(&["2 Broke Girls, Lego Masters"]);
        assert!(select_recordings(&folders, &options).is_empty());
    }

    #[test]
    fn test_title_match() {
        let folders = vec![folder(
            "1",
            "2 Broke Girls",
            vec![item("e12", "S4 E12"), item("e13", "S4 E13")],
        )];

        let options = FilterOptions::default().with_titles(&["S4 E12"]);
        let result = select_recordings(&folders, &options);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].items.len(), 1);
        assert_eq!(result[0].items[0].title, "S4 E12");

        let options = FilterOptions::default().with_titles(&["S4 E12, S4 E13"]);
        assert_eq!(select_recordings(&folders, &options)[0].items.len(), 2);
    }

    #[test]
    fn test_recordings_mode_keeps_folders_without_matching_items() {
        let options = FilterOptions::default().with_titles(&["Ep2"]);
        let result = select_recordings(&catalog(), &options);
        assert_eq!(titles(&result), vec!["ShowA", "ShowB"]);
        assert!(result[1].items.is_empty());
    }

    #[test]
    fn test_shows_mode_skips_items() {
        let options = FilterOptions::new(ListMode::Shows).with_titles(&["Ep1"]);
        let result = select_recordings(&catalog(), &options);
        assert_eq!(titles(&result), vec!["ShowA", "ShowB"]);
        assert!(result.iter().all(|show| show.items.is_empty()));
    }

    #[tokio::test]
    async fn test_shows_mode_never_probes() {
        struct PanicProbe;

        #[async_trait]
        impl RecordingProbe for PanicProbe {
            async fn is_recording(&self, _item: &Item) -> Result<bool> {
                panic!("probe must not be called");
            }
        }

        let options = FilterOptions::new(ListMode::Shows);
        let result = filter_recordings(&catalog(), &options, &PanicProbe).await.unwrap();
        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_currently_recording_mode() {
        let options = FilterOptions::new(ListMode::CurrentlyRecording);
        let probe = FakeProbe(vec!["a2"]);
        let result = filter_recordings(&catalog(), &options, &probe).await.unwrap();

        assert_eq!(titles(&result), vec!["ShowA"]);
        assert_eq!(result[0].items.len(), 1);
        assert_eq!(result[0].items[0].id, "a2");
        assert!(result[0].items[0].recording);
    }

    #[tokio::test]
    async fn test_currently_recording_none() {
        let options = FilterOptions::new(ListMode::CurrentlyRecording);
        let result = filter_recordings(&catalog(), &options, &FakeProbe(vec![]))
            .await
            .unwrap();
        assert!(result.is_empty());
    }
}
