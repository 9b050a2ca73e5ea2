//! Style preset registry for image generation.
//!
//! Presets steer the renderer via a prompt suffix and fix the output
//! dimensions and model. Clients select presets by name; unknown names
//! fall back to the default preset.

use once_cell::sync::Lazy;

use crate::ports::StylePreset;

/// Name of the preset used when the client names none or an unknown one.
pub const DEFAULT_STYLE: &str = "vivid";

static PRESETS: Lazy<Vec<StylePreset>> = Lazy::new(|| {
    vec![
        StylePreset {
            name: "vivid",
            prompt_suffix: "vibrant colors, high detail, dramatic lighting",
            width: 1024,
            height: 1024,
            model: "dall-e-3",
        },
        StylePreset {
            name: "photographic",
            prompt_suffix: "photorealistic, 35mm photograph, natural lighting, sharp focus",
            width: 1024,
            height: 1024,
            model: "dall-e-3",
        },
        StylePreset {
            name: "anime",
            prompt_suffix: "anime style, cel shading, clean line art",
            width: 1024,
            height: 1024,
            model: "dall-e-3",
        },
        StylePreset {
            name: "digital-art",
            prompt_suffix: "digital art, concept art, detailed illustration",
            width: 1024,
            height: 1024,
            model: "dall-e-3",
        },
        StylePreset {
            name: "sketch",
            prompt_suffix: "pencil sketch, monochrome, hand drawn",
            width: 1024,
            height: 1024,
            model: "dall-e-2",
        },
    ]
});

/// Resolves a preset by name, falling back to the default preset.
///
/// Matching is case-insensitive; `None` and unknown names both resolve to
/// [`DEFAULT_STYLE`].
pub fn resolve_style(name: Option<&str>) -> &'static StylePreset {
    let wanted = name.unwrap_or(DEFAULT_STYLE);
    PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(wanted))
        .unwrap_or_else(|| {
            PRESETS
                .iter()
                .find(|p| p.name == DEFAULT_STYLE)
                .expect("default preset must exist")
        })
}

/// Lists all preset names.
pub fn style_names() -> Vec<&'static str> {
    PRESETS.iter().map(|p| p.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_named_preset() {
        let preset = resolve_style(Some("photographic"));
        assert_eq!(preset.name, "photographic");
    }

    #[test]
    fn resolution_is_case_insensitive() {
        let preset = resolve_style(Some("ANIME"));
        assert_eq!(preset.name, "anime");
    }

    #[test]
    fn unknown_style_falls_back_to_default() {
        let preset = resolve_style(Some("cubist-watercolor"));
        assert_eq!(preset.name, DEFAULT_STYLE);
    }

    #[test]
    fn missing_style_falls_back_to_default() {
        let preset = resolve_style(None);
        assert_eq!(preset.name, DEFAULT_STYLE);
    }

    #[test]
    fn all_presets_have_dimensions_and_model() {
        for name in style_names() {
            let preset = resolve_style(Some(name));
            assert!(preset.width > 0);
            assert!(preset.height > 0);
            assert!(!preset.model.is_empty());
        }
    }
}
