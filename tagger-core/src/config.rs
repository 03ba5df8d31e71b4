//! # Configuração do Etiquetador
//!
//! Monta um [`Tagger`] a partir de um arquivo JSON. Todos os campos são
//! opcionais:
//!
//! ```json
//! {
//!   "tokenizer": "standard",
//!   "token_pattern": null,
//!   "lexicon": "lexicon.json",
//!   "reject_empty": false
//! }
//! ```
//!
//! Quando `token_pattern` está presente ele tem precedência sobre `tokenizer`.
//! Um `lexicon` relativo é resolvido a partir do diretório do arquivo de
//! configuração.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::pipeline::Tagger;
use crate::predictor::{Lexicon, LexiconPredictor};
use crate::tokenizer::{RegexTokenizer, TokenizerMode};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    pub tokenizer: TokenizerMode,
    /// Padrão regex cujos casamentos viram tokens
    pub token_pattern: Option<String>,
    /// Caminho do léxico JSON usado pelo [`LexiconPredictor`]
    pub lexicon: Option<PathBuf>,
    /// Sentenças sem nenhum token viram `InvalidInput` em vez de resultado vazio
    pub reject_empty: bool,
}

impl TaggerConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&content)?;

        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        config.lexicon = config
            .lexicon
            .map(|lexicon| if lexicon.is_relative() { dir.join(lexicon) } else { lexicon });
        Ok(config)
    }

    /// Carrega o léxico configurado (vazio se nenhum caminho foi informado).
    pub fn load_lexicon(&self) -> Result<Lexicon> {
        match &self.lexicon {
            Some(path) => Lexicon::from_json_file(path),
            None => Ok(Lexicon::new()),
        }
    }

    /// Constrói o etiquetador com o tokenizador e o preditor por léxico configurados.
    pub fn build(&self) -> Result<Tagger> {
        let lexicon = self.load_lexicon()?;
        let predictor = LexiconPredictor::new(&lexicon);
        info!(
            phrases = predictor.phrase_count(),
            tokenizer = ?self.tokenizer,
            pattern = self.token_pattern.as_deref().unwrap_or("-"),
            "etiquetador configurado"
        );

        Ok(match &self.token_pattern {
            Some(pattern) => Tagger::new(RegexTokenizer::new(pattern)?, predictor),
            None => Tagger::new(self.tokenizer, predictor),
        }
        .reject_empty(self.reject_empty))
    }
}
