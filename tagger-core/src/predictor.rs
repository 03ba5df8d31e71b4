//! # Preditores de Labels
//!
//! O preditor é o colaborador que, dada a lista de tokens, devolve uma tag BIO
//! por token. Um modelo neural treinado entra aqui implementando
//! [`LabelPredictor`]; o etiquetador só exige que a saída tenha o mesmo
//! tamanho da entrada e use a convenção `O` / `B-TIPO` / `I-TIPO`.
//!
//! ## Preditor por Léxico
//!
//! [`LexiconPredictor`] é um preditor determinístico baseado em gazetteers:
//! listas de nomes conhecidos por tipo de entidade. Ele faz o casamento guloso
//! do maior n-grama a partir de cada posição, como um motor de regras.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BoxError, Result, TaggerError};
use crate::tagger::{ChunkClass, OUTSIDE, SEPARATOR};

/// Contrato do preditor: tokens → tags BIO, uma por token, na mesma ordem.
pub trait LabelPredictor {
    fn predict(&self, tokens: &[String]) -> std::result::Result<Vec<String>, BoxError>;
}

impl<F> LabelPredictor for F
where
    F: Fn(&[String]) -> Vec<String>,
{
    fn predict(&self, tokens: &[String]) -> std::result::Result<Vec<String>, BoxError> {
        Ok(self(tokens))
    }
}

/// Gazetteers por tipo de entidade.
///
/// Formato JSON:
/// ```json
/// {
///   "case_sensitive": false,
///   "entries": {
///     "PERSON": ["Barack Obama", "Obama"],
///     "LOCATION": ["White House"]
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lexicon {
    #[serde(default)]
    pub case_sensitive: bool,
    /// Tipo → frases conhecidas
    #[serde(default)]
    pub entries: IndexMap<String, Vec<String>>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Carrega e valida um léxico a partir de um arquivo JSON.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let lexicon: Lexicon = serde_json::from_str(&content)?;
        lexicon.validate()?;
        Ok(lexicon)
    }

    /// Adiciona uma frase ao tipo `entity_type`.
    pub fn insert(&mut self, entity_type: &str, phrase: &str) -> Result<()> {
        validate_type(entity_type)?;
        self.entries
            .entry(entity_type.to_string())
            .or_default()
            .push(phrase.to_string());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.entries.keys().try_for_each(|t| validate_type(t))
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// O tipo vira o sufixo das tags `B-TIPO`/`I-TIPO`, então não pode conter o
/// separador nem colidir com `O`.
fn validate_type(entity_type: &str) -> Result<()> {
    if entity_type.is_empty() {
        return Err(TaggerError::InvalidLexicon("tipo de entidade vazio".into()));
    }
    if entity_type.contains(SEPARATOR) {
        return Err(TaggerError::InvalidLexicon(format!(
            "tipo {entity_type:?} contém o separador '{SEPARATOR}'"
        )));
    }
    if entity_type == OUTSIDE {
        return Err(TaggerError::InvalidLexicon(format!(
            "tipo {OUTSIDE:?} é reservado"
        )));
    }
    Ok(())
}

/// Uma frase do léxico já dividida em palavras.
#[derive(Debug, Clone)]
struct Phrase {
    parts: Vec<String>,
    entity_type: String,
}

/// Preditor baseado em gazetteers com casamento do maior n-grama.
#[derive(Debug, Clone)]
pub struct LexiconPredictor {
    /// Ordenadas do maior para o menor número de palavras
    phrases: Vec<Phrase>,
    case_sensitive: bool,
}

impl LexiconPredictor {
    pub fn new(lexicon: &Lexicon) -> Self {
        let case_sensitive = lexicon.case_sensitive;
        let mut phrases: Vec<Phrase> = lexicon
            .entries
            .iter()
            .flat_map(|(entity_type, names)| {
                names.iter().filter_map(move |name| {
                    let parts: Vec<String> = name
                        .split_whitespace()
                        .map(|p| normalize(p, case_sensitive))
                        .collect();
                    (!parts.is_empty()).then(|| Phrase {
                        parts,
                        entity_type: entity_type.clone(),
                    })
                })
            })
            .collect();
        // Estável: em empate de tamanho vale a ordem do léxico
        phrases.sort_by(|a, b| b.parts.len().cmp(&a.parts.len()));

        Self {
            phrases,
            case_sensitive,
        }
    }

    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }

    /// Aplica os gazetteers à sequência de tokens.
    ///
    /// Em cada posição livre procura a frase mais longa que casa; os tokens
    /// casados recebem `B-TIPO` seguido de `I-TIPO`, os demais `O`.
    pub fn tag_tokens(&self, tokens: &[String]) -> Vec<String> {
        let normalized: Vec<String> = tokens
            .iter()
            .map(|t| normalize(t, self.case_sensitive))
            .collect();
        let mut tags = vec![OUTSIDE.to_string(); tokens.len()];

        let mut i = 0;
        while i < normalized.len() {
            let matched = self.phrases.iter().find(|phrase| {
                i + phrase.parts.len() <= normalized.len()
                    && phrase
                        .parts
                        .iter()
                        .zip(&normalized[i..])
                        .all(|(part, token)| part == token)
            });

            match matched {
                Some(phrase) => {
                    debug!(start = i, len = phrase.parts.len(), entity_type = %phrase.entity_type, "frase do léxico casada");
                    tags[i] = bio_label(ChunkClass::Begin, &phrase.entity_type);
                    for tag in &mut tags[i + 1..i + phrase.parts.len()] {
                        *tag = bio_label(ChunkClass::Inside, &phrase.entity_type);
                    }
                    i += phrase.parts.len();
                }
                None => i += 1,
            }
        }

        tags
    }
}

impl LabelPredictor for LexiconPredictor {
    fn predict(&self, tokens: &[String]) -> std::result::Result<Vec<String>, BoxError> {
        Ok(self.tag_tokens(tokens))
    }
}

fn normalize(token: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        token.to_string()
    } else {
        token.to_lowercase()
    }
}

fn bio_label(class: ChunkClass, entity_type: &str) -> String {
    format!("{}{}{}", class.prefix(), SEPARATOR, entity_type)
}
