//! Built-in language packs: the small Vosk models published on the Vosk
//! model site, keyed by the language codes the CLI accepts.

pub const DEFAULT_LANGUAGE: &str = "en-us";

const MODEL_BASE_URL: &str = "https://alphacephei.com/vosk/models";

pub struct LanguagePack {
    pub language: &'static str,
    pub model_name: &'static str,
}

impl LanguagePack {
    pub fn archive_url(&self) -> String {
        format!("{MODEL_BASE_URL}/{}.zip", self.model_name)
    }
}

pub const LANGUAGE_PACKS: &[LanguagePack] = &[
    LanguagePack { language: "en-us", model_name: "vosk-model-small-en-us-0.15" },
    LanguagePack { language: "en-in", model_name: "vosk-model-small-en-in-0.4" },
    LanguagePack { language: "cn", model_name: "vosk-model-small-cn-0.22" },
    LanguagePack { language: "ru", model_name: "vosk-model-small-ru-0.22" },
    LanguagePack { language: "fr", model_name: "vosk-model-small-fr-0.22" },
    LanguagePack { language: "de", model_name: "vosk-model-small-de-0.15" },
    LanguagePack { language: "es", model_name: "vosk-model-small-es-0.42" },
    LanguagePack { language: "pt", model_name: "vosk-model-small-pt-0.3" },
    LanguagePack { language: "it", model_name: "vosk-model-small-it-0.22" },
    LanguagePack { language: "nl", model_name: "vosk-model-small-nl-0.22" },
    LanguagePack { language: "ca", model_name: "vosk-model-small-ca-0.4" },
    LanguagePack { language: "tr", model_name: "vosk-model-small-tr-0.3" },
    LanguagePack { language: "uk", model_name: "vosk-model-small-uk-v3-small" },
    LanguagePack { language: "vn", model_name: "vosk-model-small-vn-0.4" },
    LanguagePack { language: "hi", model_name: "vosk-model-small-hi-0.22" },
    LanguagePack { language: "ja", model_name: "vosk-model-small-ja-0.22" },
    LanguagePack { language: "ko", model_name: "vosk-model-small-ko-0.22" },
];

pub fn find(language: &str) -> Option<&'static LanguagePack> {
    LANGUAGE_PACKS.iter().find(|pack| pack.language == language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_language_has_a_pack() {
        assert!(find(DEFAULT_LANGUAGE).is_some());
    }

    #[test]
    fn test_find_dutch_pack() {
        let pack = find("nl").expect("nl pack");
        assert!(pack.model_name.contains("-nl-"));
    }

    #[test]
    fn test_unknown_language_has_no_pack() {
        assert!(find("tlh").is_none());
    }

    #[test]
    fn test_archive_url_points_at_model_site() {
        let url = find("en-us").unwrap().archive_url();
        assert_eq!(
            url,
            "https://alphacephei.com/vosk/models/vosk-model-small-en-us-0.15.zip"
        );
    }
}
