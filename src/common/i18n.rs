// src/common/i18n.rs

use std::{collections::HashMap, sync::LazyLock};

pub const DEFAULT_LANG: &str = "en";

// Catálogos embutidos no binário: idioma -> (código -> mensagem)
const CATALOGS: &[(&str, &str)] = &[
    ("en", include_str!("../../locales/en.json")),
    ("zh", include_str!("../../locales/zh.json")),
    ("pt", include_str!("../../locales/pt.json")),
];

static SHARED: LazyLock<I18nStore> = LazyLock::new(|| {
    // Os catálogos são embutidos em tempo de compilação e cobertos pelos testes.
    I18nStore::load().unwrap_or_default()
});

#[derive(Debug, Clone, Default)]
pub struct I18nStore {
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl I18nStore {
    /// Carrega todos os catálogos embutidos.
    pub fn load() -> anyhow::Result<Self> {
        let mut catalogs = HashMap::new();
        for (lang, raw) in CATALOGS {
            let messages: HashMap<String, String> = serde_json::from_str(raw)
                .map_err(|e| anyhow::anyhow!("Catálogo '{}' inválido: {}", lang, e))?;
            catalogs.insert(lang.to_string(), messages);
        }
        Ok(Self { catalogs })
    }

    /// Instância global, usada quando não há AppState à mão (guards).
    pub fn shared() -> &'static I18nStore {
        &SHARED
    }

    /// Traduz um código. Cai para o inglês e, por fim, para o próprio código.
    pub fn translate(&self, lang: &str, code: &str) -> String {
        self.catalogs
            .get(lang)
            .and_then(|c| c.get(code))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|c| c.get(code)))
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }

    pub fn languages(&self) -> Vec<&str> {
        self.catalogs.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_catalogs_parse() {
        let store = I18nStore::load().expect("catálogos válidos");
        let mut langs = store.languages();
        langs.sort();
        assert_eq!(langs, vec!["en", "pt", "zh"]);
    }

    #[test]
    fn every_catalog_has_the_same_keys_as_english() {
        let store = I18nStore::load().unwrap();
        let en = &store.catalogs["en"];
        for (lang, catalog) in &store.catalogs {
            for key in en.keys() {
                assert!(catalog.contains_key(key), "'{}' sem a chave '{}'", lang, key);
            }
        }
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let store = I18nStore::shared();
        assert_eq!(store.translate("fr", "project_not_found"), "Project not found.");
    }

    #[test]
    fn unknown_code_is_returned_verbatim() {
        assert_eq!(I18nStore::shared().translate("zh", "nao_existe"), "nao_existe");
    }

    #[test]
    fn chinese_catalog_is_used_when_requested() {
        assert_eq!(I18nStore::shared().translate("zh", "project_not_found"), "項目不存在。");
    }
}
