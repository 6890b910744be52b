//! Locale registry: the locales this server can offer translations for.
//!
//! The built-in table mirrors the GlotPress locale list and is initialised
//! once with `OnceLock`. A `LocaleRegistry` value is built from it at startup
//! (optionally restricted by configuration) and handed to the service, so
//! request handling never reads global state.

use anyhow::{bail, Result};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::OnceLock;

/// Metadata for a single locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleInfo {
    /// GlotPress short code, used for matching (e.g. "pl", "pt-br")
    pub slug: &'static str,

    /// English name of the locale (e.g. "Polish")
    pub english_name: &'static str,

    /// Native name of the locale (e.g. "Polski")
    pub native_name: &'static str,

    /// WordPress locale (e.g. "pl_PL")
    pub wp_locale: Option<&'static str>,

    /// Facebook locale (e.g. "pl_PL")
    pub facebook_locale: Option<&'static str>,
}

impl LocaleInfo {
    /// Language code used in package names and, in `WpLocale` style, in
    /// update-check responses.
    ///
    /// Falls back from the WordPress locale to the Facebook locale to the
    /// short code, skipping empty values.
    pub fn language_code(&self) -> &'static str {
        self.wp_locale
            .filter(|code| !code.is_empty())
            .or(self.facebook_locale.filter(|code| !code.is_empty()))
            .unwrap_or(self.slug)
    }
}

/// Which code is reported in the `language` field of an update candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageCodeStyle {
    /// The GlotPress short code (`pl`)
    #[default]
    Slug,
    /// The derived language code (`pl_PL`)
    WpLocale,
}

impl LanguageCodeStyle {
    pub fn code_for(&self, locale: &LocaleInfo) -> String {
        match self {
            Self::Slug => locale.slug.to_string(),
            Self::WpLocale => locale.language_code().to_string(),
        }
    }
}

impl FromStr for LanguageCodeStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slug" => Ok(Self::Slug),
            "wp_locale" => Ok(Self::WpLocale),
            other => bail!(
                "Unknown language code style: '{}'. Expected 'slug' or 'wp_locale'",
                other
            ),
        }
    }
}

/// Set of locales the server supports.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    locales: Vec<LocaleInfo>,
}

/// Built-in locale table (initialized lazily)
static BUILTIN: OnceLock<Vec<LocaleInfo>> = OnceLock::new();

impl LocaleRegistry {
    pub fn new(locales: Vec<LocaleInfo>) -> Self {
        Self { locales }
    }

    /// The full built-in locale table.
    pub fn builtin() -> &'static [LocaleInfo] {
        BUILTIN.get_or_init(builtin_locales)
    }

    /// Registry containing every built-in locale.
    pub fn with_builtin() -> Self {
        Self::new(Self::builtin().to_vec())
    }

    /// Registry restricted to the given short codes.
    ///
    /// # Errors
    /// Fails if a code is not a built-in locale, or if `codes` is empty.
    pub fn restricted_to<S: AsRef<str>>(codes: &[S]) -> Result<Self> {
        if codes.is_empty() {
            bail!("Locale restriction list is empty");
        }

        let builtin = Self::builtin();
        let mut locales = Vec::with_capacity(codes.len());

        for code in codes {
            let code = code.as_ref();
            match builtin.iter().find(|locale| locale.slug == code) {
                Some(locale) if !locales.contains(locale) => locales.push(locale.clone()),
                Some(_) => {}
                None => bail!("Unknown locale code: '{}'", code),
            }
        }

        Ok(Self::new(locales))
    }

    /// Look up a locale by its short code.
    pub fn by_short_code(&self, code: &str) -> Option<&LocaleInfo> {
        self.locales.iter().find(|locale| locale.slug == code)
    }

    /// Short codes of every supported locale.
    pub fn all_supported_short_codes(&self) -> HashSet<&'static str> {
        self.locales.iter().map(|locale| locale.slug).collect()
    }

    pub fn len(&self) -> usize {
        self.locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }
}

impl Default for LocaleRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

const fn locale(
    slug: &'static str,
    english_name: &'static str,
    native_name: &'static str,
    wp_locale: Option<&'static str>,
    facebook_locale: Option<&'static str>,
) -> LocaleInfo {
    LocaleInfo {
        slug,
        english_name,
        native_name,
        wp_locale,
        facebook_locale,
    }
}

fn builtin_locales() -> Vec<LocaleInfo> {
    vec![
        locale("af", "Afrikaans", "Afrikaans", Some("af"), Some("af_ZA")),
        locale("ar", "Arabic", "العربية", Some("ar"), Some("ar_AR")),
        locale("bg", "Bulgarian", "Български", Some("bg_BG"), Some("bg_BG")),
        locale("ca", "Catalan", "Català", Some("ca"), Some("ca_ES")),
        locale("cs", "Czech", "Čeština", Some("cs_CZ"), Some("cs_CZ")),
        locale("cy", "Welsh", "Cymraeg", Some("cy"), Some("cy_GB")),
        locale("da", "Danish", "Dansk", Some("da_DK"), Some("da_DK")),
        locale("de", "German", "Deutsch", Some("de_DE"), Some("de_DE")),
        locale("el", "Greek", "Ελληνικά", Some("el"), Some("el_GR")),
        locale("en", "English", "English", Some("en_US"), Some("en_US")),
        locale("en-gb", "English (UK)", "English (UK)", Some("en_GB"), Some("en_GB")),
        locale("eo", "Esperanto", "Esperanto", Some("eo"), Some("eo_EO")),
        locale("es", "Spanish (Spain)", "Español", Some("es_ES"), Some("es_ES")),
        locale("et", "Estonian", "Eesti", Some("et"), Some("et_EE")),
        locale("eu", "Basque", "Euskara", Some("eu"), Some("eu_ES")),
        locale("fa", "Persian", "فارسی", Some("fa_IR"), Some("fa_IR")),
        locale("fi", "Finnish", "Suomi", Some("fi"), Some("fi_FI")),
        locale("fr", "French (France)", "Français", Some("fr_FR"), Some("fr_FR")),
        locale("fy", "Frisian", "Frysk", Some("fy"), Some("fy_NL")),
        locale("ga", "Irish", "Gaelige", Some("ga"), Some("ga_IE")),
        locale("gl", "Galician", "Galego", Some("gl_ES"), Some("gl_ES")),
        locale("he", "Hebrew", "עִבְרִית", Some("he_IL"), Some("he_IL")),
        locale("hi", "Hindi", "हिन्दी", Some("hi_IN"), Some("hi_IN")),
        locale("hr", "Croatian", "Hrvatski", Some("hr"), Some("hr_HR")),
        locale("hu", "Hungarian", "Magyar", Some("hu_HU"), Some("hu_HU")),
        locale("id", "Indonesian", "Bahasa Indonesia", Some("id_ID"), Some("id_ID")),
        locale("is", "Icelandic", "Íslenska", Some("is_IS"), Some("is_IS")),
        locale("it", "Italian", "Italiano", Some("it_IT"), Some("it_IT")),
        locale("ja", "Japanese", "日本語", Some("ja"), Some("ja_JP")),
        locale("ka", "Georgian", "ქართული", Some("ka_GE"), Some("ka_GE")),
        locale("ko", "Korean", "한국어", Some("ko_KR"), Some("ko_KR")),
        locale("lt", "Lithuanian", "Lietuvių kalba", Some("lt_LT"), Some("lt_LT")),
        locale("lv", "Latvian", "Latviešu valoda", Some("lv"), Some("lv_LV")),
        locale("mk", "Macedonian", "Македонски јазик", Some("mk_MK"), Some("mk_MK")),
        locale("nb", "Norwegian (Bokmål)", "Norsk bokmål", Some("nb_NO"), Some("nb_NO")),
        locale("nl", "Dutch", "Nederlands", Some("nl_NL"), Some("nl_NL")),
        locale("pl", "Polish", "Polski", Some("pl_PL"), Some("pl_PL")),
        locale("pt", "Portuguese (Portugal)", "Português", Some("pt_PT"), Some("pt_PT")),
        locale("pt-br", "Portuguese (Brazil)", "Português do Brasil", Some("pt_BR"), Some("pt_BR")),
        locale("ro", "Romanian", "Română", Some("ro_RO"), Some("ro_RO")),
        locale("ru", "Russian", "Русский", Some("ru_RU"), Some("ru_RU")),
        locale("sk", "Slovak", "Slovenčina", Some("sk_SK"), Some("sk_SK")),
        locale("sl", "Slovenian", "Slovenščina", Some("sl_SI"), Some("sl_SI")),
        locale("sq", "Albanian", "Shqip", Some("sq"), Some("sq_AL")),
        locale("sr", "Serbian", "Српски језик", Some("sr_RS"), Some("sr_RS")),
        locale("sv", "Swedish", "Svenska", Some("sv_SE"), Some("sv_SE")),
        locale("th", "Thai", "ไทย", Some("th"), Some("th_TH")),
        locale("tr", "Turkish", "Türkçe", Some("tr_TR"), Some("tr_TR")),
        locale("uk", "Ukrainian", "Українська", Some("uk"), Some("uk_UA")),
        locale("vi", "Vietnamese", "Tiếng Việt", Some("vi"), Some("vi_VN")),
        locale("zh-cn", "Chinese (China)", "简体中文", Some("zh_CN"), Some("zh_CN")),
        locale("zh-tw", "Chinese (Taiwan)", "繁體中文", Some("zh_TW"), Some("zh_TW")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Builtin Table Tests ====================

    #[test]
    fn test_builtin_slugs_are_unique() {
        let builtin = LocaleRegistry::builtin();
        let slugs: HashSet<_> = builtin.iter().map(|l| l.slug).collect();
        assert_eq!(slugs.len(), builtin.len());
    }

    #[test]
    fn test_builtin_contains_common_locales() {
        let registry = LocaleRegistry::with_builtin();
        for code in ["pl", "en", "de", "fr", "pt-br"] {
            assert!(registry.by_short_code(code).is_some(), "missing {}", code);
        }
    }

    #[test]
    fn test_by_short_code_unknown() {
        let registry = LocaleRegistry::with_builtin();
        assert!(registry.by_short_code("xx").is_none());
        assert!(registry.by_short_code("pl_PL").is_none());
    }

    // ==================== Restriction Tests ====================

    #[test]
    fn test_restricted_to() {
        let registry = LocaleRegistry::restricted_to(&["pl", "de"]).unwrap();
        assert_eq!(registry.len(), 2);
        let codes = registry.all_supported_short_codes();
        assert!(codes.contains("pl"));
        assert!(codes.contains("de"));
        assert!(!codes.contains("en"));
    }

    #[test]
    fn test_restricted_to_deduplicates() {
        let registry = LocaleRegistry::restricted_to(&["pl", "pl"]).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_restricted_to_unknown_code() {
        let result = LocaleRegistry::restricted_to(&["pl", "klingon"]);
        assert!(result.unwrap_err().to_string().contains("klingon"));
    }

    #[test]
    fn test_restricted_to_empty() {
        let result = LocaleRegistry::restricted_to::<&str>(&[]);
        assert!(result.is_err());
    }

    // ==================== Language Code Tests ====================

    #[test]
    fn test_language_code_prefers_wp_locale() {
        let polish = LocaleRegistry::with_builtin().by_short_code("pl").cloned().unwrap();
        assert_eq!(polish.language_code(), "pl_PL");
    }

    #[test]
    fn test_language_code_falls_back_to_facebook() {
        let info = locale("xx", "X", "X", None, Some("xx_XX"));
        assert_eq!(info.language_code(), "xx_XX");

        let empty_wp = locale("xx", "X", "X", Some(""), Some("xx_XX"));
        assert_eq!(empty_wp.language_code(), "xx_XX");
    }

    #[test]
    fn test_language_code_falls_back_to_slug() {
        let info = locale("xx", "X", "X", None, None);
        assert_eq!(info.language_code(), "xx");

        let empty = locale("xx", "X", "X", Some(""), Some(""));
        assert_eq!(empty.language_code(), "xx");
    }

    #[test]
    fn test_language_code_style() {
        let polish = locale("pl", "Polish", "Polski", Some("pl_PL"), None);
        assert_eq!(LanguageCodeStyle::Slug.code_for(&polish), "pl");
        assert_eq!(LanguageCodeStyle::WpLocale.code_for(&polish), "pl_PL");
    }

    #[test]
    fn test_language_code_style_from_str() {
        assert_eq!("slug".parse::<LanguageCodeStyle>().unwrap(), LanguageCodeStyle::Slug);
        assert_eq!(
            " WP_LOCALE ".parse::<LanguageCodeStyle>().unwrap(),
            LanguageCodeStyle::WpLocale
        );
        assert!("facebook".parse::<LanguageCodeStyle>().is_err());
    }
}
