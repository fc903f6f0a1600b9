use serde::{Deserialize, Serialize};

/// Knobs for the tree builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Deepest list nesting level. Deeper indentation is clamped to it.
    pub max_list_depth: usize,
    /// File extensions (without the dot) that turn an embed into an image.
    pub image_extensions: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_list_depth: 5,
            image_extensions: ["jpg", "jpeg", "png", "gif", "svg", "webp", "bmp"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl ParseOptions {
    /// Whether `target` names an image file, by extension, ignoring case.
    pub fn is_image(&self, target: &str) -> bool {
        let Some((stem, extension)) = target.rsplit_once('.') else {
            return false;
        };
        !stem.is_empty()
            && self
                .image_extensions
                .iter()
                .any(|known| known.eq_ignore_ascii_case(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("pic.jpg", true)]
    #[case("pic.PNG", true)]
    #[case("folder/diagram.svg", true)]
    #[case("archive.tar.gz", false)]
    #[case("notes", false)]
    #[case(".png", false)]
    #[case("pic.jpg.txt", false)]
    fn image_detection(#[case] target: &str, #[case] expected: bool) {
        assert_eq!(ParseOptions::default().is_image(target), expected);
    }

    #[test]
    fn custom_extensions_replace_defaults() {
        let options = ParseOptions {
            image_extensions: vec!["heic".into()],
            ..ParseOptions::default()
        };
        assert!(options.is_image("photo.HEIC"));
        assert!(!options.is_image("photo.jpg"));
    }
}
