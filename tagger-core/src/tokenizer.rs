//! # Tokenizadores Plugáveis
//!
//! Responsável por dividir o texto bruto em tokens. O etiquetador não depende
//! de nenhuma estratégia específica: qualquer tipo que implemente [`Tokenizer`]
//! (inclusive uma closure `Fn(&str) -> Vec<String>`) pode ser injetado.
//!
//! ## Estratégias incluídas
//!
//! - **Whitespace** (padrão): separa apenas por espaços em branco.
//! - **Standard**: separa pontuações, preservando abreviações e números decimais.
//! - **UnicodeWords**: fronteiras de palavra do UAX #29.
//! - [`RegexTokenizer`]: cada casamento de um padrão vira um token.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use tagger_core::tokenizer::{Tokenizer, TokenizerMode};
//!
//! let text = "Dr. Silva visited the White House.";
//!
//! // Whitespace: "Dr.", "Silva", "visited", "the", "White", "House."
//! let tokens = TokenizerMode::Whitespace.tokenize(text).unwrap();
//! assert_eq!(tokens.last().unwrap(), "House.");
//!
//! // Standard: "Dr.", "Silva", "visited", "the", "White", "House", "."
//! let tokens = TokenizerMode::Standard.tokenize(text).unwrap();
//! assert_eq!(tokens.last().unwrap(), ".");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{BoxError, Result};

/// Contrato do tokenizador: texto → sequência ordenada de tokens.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> std::result::Result<Vec<String>, BoxError>;
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn tokenize(&self, text: &str) -> std::result::Result<Vec<String>, BoxError> {
        Ok(self(text))
    }
}

/// Estratégias de Tokenização disponíveis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerMode {
    /// **Espaços**: equivalente a `str::split_whitespace`. Pontuação fica grudada
    /// na palavra ("House.").
    #[default]
    Whitespace,
    /// **Padrão**: Separa por espaços e pontuações, mas preserva abreviações comuns
    /// (ex: "Dr.", "Mr.") e números decimais. Ideal para textos jornalísticos.
    Standard,
    /// **Unicode**: segmentação de palavras UAX #29; descarta segmentos de espaço.
    UnicodeWords,
}

impl Tokenizer for TokenizerMode {
    fn tokenize(&self, text: &str) -> std::result::Result<Vec<String>, BoxError> {
        Ok(tokenize_with_mode(text, *self))
    }
}

/// Abreviações cujo ponto não deve ser separado
const ABBREVIATIONS: &[&str] = &[
    "Dr", "Dra", "Mr", "Mrs", "Ms", "Sr", "Sra", "Jr", "Prof", "Profa", "Gov",
    "Sen", "Rep", "Gen", "Col", "Capt", "Lt", "Sgt", "St", "Mt", "Inc", "Ltd",
    "Corp", "Co", "vs", "etc", "No", "vol", "pp", "Jan", "Feb", "Aug", "Sept",
    "Oct", "Nov", "Dec",
];

/// Tokeniza um texto com o modo especificado.
pub fn tokenize_with_mode(text: &str, mode: TokenizerMode) -> Vec<String> {
    match mode {
        TokenizerMode::Whitespace => text.split_whitespace().map(str::to_string).collect(),
        TokenizerMode::Standard => tokenize_standard(text),
        TokenizerMode::UnicodeWords => text
            .split_word_bounds()
            .filter(|w| !w.trim().is_empty())
            .map(str::to_string)
            .collect(),
    }
}

fn tokenize_standard(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = text.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_alphanumeric() || (ch == '-' || ch == '\'' || ch == '\u{2019}') && !current.is_empty() {
            current.push(ch);
        } else if ch == '.' && !current.is_empty() {
            let is_abbrev = ABBREVIATIONS.contains(&current.as_str());
            let current_is_num = current.chars().all(char::is_numeric);
            let next_is_num = chars.get(i + 1).is_some_and(|c| c.is_numeric());

            if is_abbrev || (current_is_num && next_is_num) {
                current.push('.');
            } else {
                flush_token(&mut tokens, &mut current);
                tokens.push(".".to_string());
            }
        } else if ch.is_whitespace() {
            flush_token(&mut tokens, &mut current);
        } else {
            flush_token(&mut tokens, &mut current);
            tokens.push(ch.to_string());
        }
    }
    flush_token(&mut tokens, &mut current);

    tokens
}

/// Fecha o token acumulado e adiciona à lista (se não vazio)
fn flush_token(tokens: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}

/// Tokenizador por expressão regular: cada casamento do padrão é um token.
///
/// Útil para reproduzir a tokenização usada no treinamento de um modelo
/// externo (ex: `\w+|[^\w\s]`).
#[derive(Debug, Clone)]
pub struct RegexTokenizer {
    pattern: Regex,
}

impl RegexTokenizer {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> std::result::Result<Vec<String>, BoxError> {
        Ok(self
            .pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .filter(|t| !t.is_empty())
            .collect())
    }
}
